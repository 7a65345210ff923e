//! Error types for sigmap.
//!
//! Signature extraction itself never fails (unreadable files become inline
//! diagnostics); these cover the walk, configuration and output around it.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::filter::FilterError;
use crate::output::OutputError;
use crate::walker::WalkError;

/// Top-level error type for sigmap operations.
#[derive(Debug, thiserror::Error)]
pub enum SigmapError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("unsupported file type: {0}")]
    UnsupportedFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Filter(#[from] FilterError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Map an error to its exit code.
pub fn exit_code(error: &SigmapError) -> i32 {
    match error {
        SigmapError::PathNotFound(_) => 3,
        SigmapError::UnsupportedFile(_) => 5,
        SigmapError::Io(_) => 1,
        SigmapError::Walk(WalkError::PermissionDenied { .. }) => 4,
        SigmapError::Walk(_) => 2,
        SigmapError::Config(_) => 6,
        SigmapError::Filter(_) => 1,
        SigmapError::Output(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&SigmapError::PathNotFound("x".into())), 3);
        assert_eq!(
            exit_code(&SigmapError::Walk(WalkError::NotADirectory { path: "x".into() })),
            2
        );
        assert_eq!(
            exit_code(&SigmapError::Walk(WalkError::PermissionDenied { path: "x".into() })),
            4
        );
        assert_eq!(exit_code(&SigmapError::UnsupportedFile("a.rs".into())), 5);
    }

    #[test]
    fn test_filter_error_message_passes_through() {
        let err: SigmapError = FilterError::UnknownCategory("cobol".into()).into();
        assert!(err.to_string().starts_with("unknown category: cobol"));
    }
}
