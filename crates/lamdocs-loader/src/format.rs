//! Module formats, using the names of the Node.js loader.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Format of a loaded module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// ECMAScript module.
    Module,
    /// CommonJS script.
    Commonjs,
    /// JSON document.
    Json,
    /// WebAssembly module.
    Wasm,
    /// Runtime built-in (`node:*`).
    Builtin,
}

impl ModuleFormat {
    /// Format name as used by the host loader.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Commonjs => "commonjs",
            Self::Json => "json",
            Self::Wasm => "wasm",
            Self::Builtin => "builtin",
        }
    }

    /// Format implied by the file extension alone.
    ///
    /// Returns `None` for `.js`, whose format depends on the nearest
    /// `package.json`, and for unknown extensions.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "mjs" => Some(Self::Module),
            "cjs" => Some(Self::Commonjs),
            "json" => Some(Self::Json),
            "wasm" => Some(Self::Wasm),
            _ => None,
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, thiserror::Error)]
#[error("Unknown module format '{0}'")]
pub struct UnknownFormat(String);

impl FromStr for ModuleFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "module" => Ok(Self::Module),
            "commonjs" => Ok(Self::Commonjs),
            "json" => Ok(Self::Json),
            "wasm" => Ok(Self::Wasm),
            "builtin" => Ok(Self::Builtin),
            other => Err(UnknownFormat(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for format in [
            ModuleFormat::Module,
            ModuleFormat::Commonjs,
            ModuleFormat::Json,
            ModuleFormat::Wasm,
            ModuleFormat::Builtin,
        ] {
            assert_eq!(format.as_str().parse::<ModuleFormat>().unwrap(), format);
        }
        assert!("esm".parse::<ModuleFormat>().is_err());
    }

    #[test]
    fn test_serialized_lowercase() {
        assert_eq!(
            serde_json::to_string(&ModuleFormat::Commonjs).unwrap(),
            "\"commonjs\""
        );
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(
            ModuleFormat::from_extension(Path::new("a/b.mjs")),
            Some(ModuleFormat::Module)
        );
        assert_eq!(
            ModuleFormat::from_extension(Path::new("b.cjs")),
            Some(ModuleFormat::Commonjs)
        );
        assert_eq!(ModuleFormat::from_extension(Path::new("b.js")), None);
        assert_eq!(ModuleFormat::from_extension(Path::new("Makefile")), None);
    }
}
