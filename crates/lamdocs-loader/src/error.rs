//! Loader error types.

use std::path::PathBuf;

/// Error produced while resolving or loading a module.
///
/// Hooks never create these themselves; they come from the host resolver
/// and loader and travel back through the chain unchanged.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// Nothing on disk matches the specifier.
    #[error("Cannot find module '{specifier}' imported from {from}")]
    ModuleNotFound {
        /// Specifier or URL as requested.
        specifier: String,
        /// Parent URL or base directory the lookup started from.
        from: String,
    },
    /// The specifier or URL cannot be handled at all.
    #[error("Invalid module specifier '{specifier}': {reason}")]
    InvalidSpecifier {
        /// Specifier or URL as requested.
        specifier: String,
        /// Why it was rejected.
        reason: String,
    },
    /// I/O error while reading a module.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A `package.json` could not be parsed.
    #[error("Invalid package.json at {}: {source}", path.display())]
    PackageJson {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

impl LoaderError {
    pub(crate) fn not_found(specifier: impl Into<String>, from: impl Into<String>) -> Self {
        Self::ModuleNotFound {
            specifier: specifier.into(),
            from: from.into(),
        }
    }

    pub(crate) fn invalid(specifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpecifier {
            specifier: specifier.into(),
            reason: reason.into(),
        }
    }
}
