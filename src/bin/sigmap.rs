//! sigmap CLI - Generate a signature map of a project.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use glob::Pattern;
use serde::Serialize;
use sigmap::builder::{ProjectMap, SigMap};
use sigmap::config::DEFAULT_OUTPUT_FILE;
use sigmap::errors::{exit_code, SigmapError};
use sigmap::filter::{detect_category, Category};
use sigmap::output::{render, OutputError, OutputFormat, OutputOptions};
use sigmap::signatures::{extract_file, SignatureEntry};
use sigmap::tokens::{Encoding, MapStats};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sigmap")]
#[command(about = "Generate a condensed signature map of a source tree")]
#[command(version)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the project map
    Generate(GenerateArgs),

    /// Print the signatures of a single file
    Signatures {
        /// File to extract from
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Category (name or extension) to use instead of the one implied
        /// by the file's extension
        #[arg(long)]
        category: Option<String>,
    },

    /// Show supported file categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Root directory to map
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Write the map here instead of <PATH>/PROJECT_MAP.md
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the map to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Render JSON instead of Markdown
    #[arg(long)]
    json: bool,

    /// Descend into hidden directories
    #[arg(long)]
    include_hidden: bool,

    /// Do not honour .gitignore files
    #[arg(long)]
    no_gitignore: bool,

    /// Maximum directory depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Leave out paths matching this glob (relative to PATH)
    #[arg(long, value_parser = parse_glob)]
    exclude: Vec<Pattern>,

    /// Omit the generation timestamp
    #[arg(long)]
    no_timestamp: bool,

    /// Token encoding for the summary (cl100k, o200k)
    #[arg(long, default_value = "cl100k")]
    encoding: Encoding,
}

fn parse_glob(s: &str) -> Result<Pattern, String> {
    Pattern::new(s).map_err(|e| format!("invalid glob '{s}': {e}"))
}

fn init_tracing(verbose: bool) {
    // stdout may carry the map, so logs always go to stderr
    let filter = if verbose {
        EnvFilter::new("sigmap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sigmap=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_output = json_flag(&cli.command);

    let result = match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Signatures {
            file,
            json,
            category,
        } => run_signatures(file, json, category.as_deref()),
        Commands::Categories { json } => run_categories(json),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sigmap", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

fn json_flag(cmd: &Commands) -> bool {
    match cmd {
        Commands::Generate(args) => args.json,
        Commands::Signatures { json, .. } => *json,
        Commands::Categories { json } => *json,
        Commands::Completions { .. } => false,
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, SigmapError> {
    serde_json::to_string_pretty(value).map_err(|e| SigmapError::Output(e.into()))
}

// --- Generate command ---

fn run_generate(args: GenerateArgs) -> Result<(), SigmapError> {
    let mut builder = SigMap::new(&args.path)
        .include_hidden(args.include_hidden)
        .respect_gitignore(!args.no_gitignore);
    if let Some(depth) = args.max_depth {
        builder = builder.max_depth(depth);
    }
    for pattern in args.exclude {
        builder = builder.exclude(pattern);
    }
    let map = builder.build()?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Markdown
    };
    let options = if args.no_timestamp {
        OutputOptions {
            format,
            generated: None,
        }
    } else {
        OutputOptions::stamped(format)
    };

    let document = render(&map.tree, &options)?;
    let stats = MapStats::measure(&document, args.encoding);

    if args.stdout {
        print!("{document}");
        eprintln!(
            "Mapped {}: {} code files, {} signatures ({} lines, ~{} tokens, {})",
            map.name(),
            map.code_file_count(),
            map.signature_count(),
            stats.lines,
            stats.tokens,
            stats.encoding
        );
        return Ok(());
    }

    let target = output_path(args.output, &map, args.json);
    debug!(path = %target.display(), "writing map");
    fs::write(&target, &document).map_err(|source| OutputError::Write {
        path: target.clone(),
        source,
    })?;

    eprintln!(
        "Wrote {} ({} code files, {} signatures, {} lines, ~{} tokens, {})",
        target.display(),
        map.code_file_count(),
        map.signature_count(),
        stats.lines,
        stats.tokens,
        stats.encoding
    );

    Ok(())
}

/// `--output` as given, else the configured output, else the default name,
/// the latter two relative to the project root.
fn output_path(explicit: Option<PathBuf>, map: &ProjectMap, json: bool) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let default = if json {
        Path::new(DEFAULT_OUTPUT_FILE).with_extension("json")
    } else {
        PathBuf::from(DEFAULT_OUTPUT_FILE)
    };
    map.root.join(map.output.clone().unwrap_or(default))
}

// --- Signatures command ---

fn run_signatures(file: PathBuf, json: bool, category: Option<&str>) -> Result<(), SigmapError> {
    if !file.exists() {
        return Err(SigmapError::PathNotFound(file));
    }

    let category = match category {
        Some(name) => name.parse::<Category>()?,
        None => {
            detect_category(&file).ok_or_else(|| SigmapError::UnsupportedFile(file.clone()))?
        }
    };
    let entries = extract_file(&file, category);

    if json {
        #[derive(Serialize)]
        struct Output<'a> {
            path: String,
            category: Category,
            signatures: &'a [SignatureEntry],
        }
        let output = Output {
            path: file.display().to_string(),
            category,
            signatures: &entries,
        };
        println!("{}", to_json(&output)?);
    } else {
        use std::io::{BufWriter, Write};
        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        for entry in &entries {
            writeln!(out, "{entry}")?;
        }
        out.flush()?;
    }

    Ok(())
}

// --- Categories command ---

#[derive(Serialize)]
struct CategoryInfo {
    name: String,
    extensions: Vec<String>,
    comment: &'static str,
}

fn run_categories(json: bool) -> Result<(), SigmapError> {
    let categories: Vec<CategoryInfo> = Category::all()
        .iter()
        .map(|category| CategoryInfo {
            name: category.to_string(),
            extensions: category
                .extensions()
                .iter()
                .map(|e| format!(".{}", e))
                .collect(),
            comment: category.comment_marker(),
        })
        .collect();

    if json {
        #[derive(Serialize)]
        struct Output {
            categories: Vec<CategoryInfo>,
        }
        println!("{}", to_json(&Output { categories })?);
    } else {
        println!("Supported categories:");
        for category in &categories {
            println!("  {:16} {}", category.name, category.extensions.join(", "));
        }
    }

    Ok(())
}
