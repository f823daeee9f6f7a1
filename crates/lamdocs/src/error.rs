//! CLI error types.

use lamdocs_config::ConfigError;
use lamdocs_loader::LoaderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Loader(#[from] LoaderError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{}: {}", .path.display(), .source)]
    Page {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Validation(String),
}
