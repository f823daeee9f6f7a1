//! Hooks that make the `lamcalc` interpreter package loadable.
//!
//! The package ships ES module syntax, but its `package.json` carries no
//! `"type": "module"`, so the host guesses `commonjs` for its files and then
//! fails to evaluate them. The shim fixes both halves of that:
//!
//! - a bare `lamcalc` import resolves straight to the package entry file,
//!   as a module, without asking the host;
//! - any `.js` file inside `node_modules/lamcalc/` is loaded as a module,
//!   whatever format the host inferred.
//!
//! Everything else is passed to the next resolver or loader untouched,
//! including its errors.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::LoaderError;
use crate::file_url::path_to_url;
use crate::format::ModuleFormat;
use crate::hooks::{LoadContext, LoadResult, Loader, ModuleHooks, ResolveContext, ResolveResult, Resolver};

/// Package whose format the shim corrects.
pub const RESERVED_PACKAGE: &str = "lamcalc";

/// Entry file of [`RESERVED_PACKAGE`], relative to the project root.
pub const RESERVED_ENTRY: &str = "node_modules/lamcalc/lamcalc.js";

/// Resolve and load hooks for one reserved package.
#[derive(Clone, Debug)]
pub struct ReservedPackageShim {
    root: PathBuf,
    package: String,
    entry_url: String,
    load_pattern: Regex,
}

impl ReservedPackageShim {
    /// Shim for `lamcalc` installed under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            entry_url: entry_url(&root, RESERVED_ENTRY),
            load_pattern: load_pattern(RESERVED_PACKAGE),
            package: RESERVED_PACKAGE.to_owned(),
            root,
        }
    }

    /// Shim for `lamcalc` installed under the current working directory.
    pub fn from_current_dir() -> Result<Self, LoaderError> {
        let root = std::env::current_dir().map_err(|source| LoaderError::Io {
            path: ".".into(),
            source,
        })?;
        Ok(Self::new(root))
    }

    /// Shim for an arbitrary package. `entry` is relative to `root`.
    #[must_use]
    pub fn for_package(root: impl Into<PathBuf>, package: &str, entry: &str) -> Self {
        Self::new(root).with_package(package, entry)
    }

    /// Reserve another package under the same root.
    #[must_use]
    pub fn with_package(self, package: &str, entry: &str) -> Self {
        Self {
            entry_url: entry_url(&self.root, entry),
            load_pattern: load_pattern(package),
            package: package.to_owned(),
            root: self.root,
        }
    }

    /// Project root the entry URL is built from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserved package name.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// URL every import of the package resolves to.
    #[must_use]
    pub fn entry_url(&self) -> &str {
        &self.entry_url
    }

    /// Whether `url` points at a `.js` file of the reserved package.
    #[must_use]
    pub fn owns_url(&self, url: &str) -> bool {
        self.load_pattern.is_match(url)
    }
}

/// `file:` URL of `entry` under `root`. Relative roots cannot form a file
/// URL and are joined as text.
fn entry_url(root: &Path, entry: &str) -> String {
    let path = root.join(entry.trim_start_matches("./"));
    path_to_url(&path).unwrap_or_else(|_| format!("file://{}", path.display()))
}

fn load_pattern(package: &str) -> Regex {
    let pattern = format!(r"node_modules/{}/.*\.js$", regex::escape(package));
    Regex::new(&pattern).expect("escaped package name forms a valid pattern")
}

impl ModuleHooks for ReservedPackageShim {
    fn name(&self) -> &str {
        "reserved_package"
    }

    fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
        next: &dyn Resolver,
    ) -> Result<ResolveResult, LoaderError> {
        if specifier != self.package {
            return next.resolve(specifier, context);
        }
        tracing::info!(specifier, url = %self.entry_url, format = %ModuleFormat::Module, "resolved reserved package");
        Ok(ResolveResult {
            url: self.entry_url.clone(),
            format: Some(ModuleFormat::Module),
            short_circuit: true,
        })
    }

    fn load(
        &self,
        url: &str,
        context: &LoadContext,
        next: &dyn Loader,
    ) -> Result<LoadResult, LoaderError> {
        if context.format == Some(ModuleFormat::Module) || !self.owns_url(url) {
            return next.load(url, context);
        }
        tracing::info!(
            url,
            inferred = ?context.format,
            format = %ModuleFormat::Module,
            "correcting module format"
        );
        next.load(url, &context.with_format(ModuleFormat::Module))
    }
}
