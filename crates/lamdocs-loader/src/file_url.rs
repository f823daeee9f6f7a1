//! Conversion between file system paths and `file:` URLs.
//!
//! Hosts hand hooks percent-encoded URLs, so a project under `my site/`
//! arrives as `file:///…/my%20site/…`. Both directions go through [`Url`].

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::LoaderError;

/// Percent-encoded `file:` URL for an absolute path.
///
/// # Errors
///
/// Returns [`LoaderError::InvalidSpecifier`] when `path` is not absolute.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use lamdocs_loader::path_to_url;
///
/// let url = path_to_url(Path::new("/srv/my site/index.js")).unwrap();
/// assert_eq!(url, "file:///srv/my%20site/index.js");
/// ```
pub fn path_to_url(path: &Path) -> Result<String, LoaderError> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| LoaderError::invalid(path.display().to_string(), "path is not absolute"))
}

/// Decoded file system path of a `file:` URL. `None` for other schemes and
/// for URLs that name no local path.
#[must_use]
pub fn url_to_path(url: &str) -> Option<PathBuf> {
    let url = Url::parse(url).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_path_to_url_encodes() {
        assert_eq!(
            path_to_url(Path::new("/work/my site/λ#1.js")).unwrap(),
            "file:///work/my%20site/%CE%BB%231.js"
        );
    }

    #[test]
    fn test_relative_path_rejected() {
        assert!(matches!(
            path_to_url(Path::new("docs/index.js")),
            Err(LoaderError::InvalidSpecifier { .. })
        ));
    }

    #[test]
    fn test_url_to_path_decodes() {
        assert_eq!(
            url_to_path("file:///work/my%20site/100%25.js"),
            Some(PathBuf::from("/work/my site/100%.js"))
        );
    }

    #[test]
    fn test_url_to_path_other_schemes() {
        assert_eq!(url_to_path("https://cdn.example/a.js"), None);
        assert_eq!(url_to_path("node:fs"), None);
        assert_eq!(url_to_path("not a url"), None);
    }
}
