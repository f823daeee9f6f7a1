//! Configuration management for lamdocs.
//!
//! Parses `lamdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.title`
//! - `site.description`
//! - `docs.source_dir`
//! - `docs.out_dir`
//! - `loader.root`

mod expand;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub out_dir: Option<PathBuf>,
    /// Override footnote document id.
    pub doc_id: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lamdocs.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site metadata.
    pub site: SiteConfig,
    /// Documentation paths (relative strings from TOML).
    docs: DocsConfigRaw,
    /// Markdown pipeline options.
    pub markdown: MarkdownConfig,
    /// Component tag names emitted for directives.
    pub components: ComponentsConfig,
    /// Module loader shim (paths are relative strings from TOML).
    loader: LoaderConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved loader configuration (set after loading).
    #[serde(skip)]
    pub loader_resolved: LoaderConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site metadata, written to the build manifest.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// One-line description.
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Road to λ-Calculus".to_owned(),
            description: "Learn lambda calculus interactively!".to_owned(),
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    out_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Directory rendered pages are written to.
    pub out_dir: PathBuf,
}

/// Markdown pipeline options.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Prefix for footnote anchors, for pages that embed several documents.
    pub doc_id: Option<String>,
    /// Extra literal macros, applied after the standard ones in key order.
    pub macros: BTreeMap<String, String>,
}

/// Component tag names.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    /// Tag for `` l`EXPR` ``.
    #[serde(rename = "static")]
    pub static_ref: String,
    /// Tag for `` dL`EXPR` ``.
    pub definition: String,
    /// Tag for `lambda-defs` blocks.
    pub listing: String,
    /// Tag for `lambda-interactive` blocks.
    pub interactive: String,
    /// Client-only wrapper around interactive blocks.
    pub client_only: String,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            static_ref: "LambdaStatic".to_owned(),
            definition: "LambdaDef".to_owned(),
            listing: "LambdaRaw".to_owned(),
            interactive: "LambdaInteractive".to_owned(),
            client_only: "ClientOnly".to_owned(),
        }
    }
}

impl ComponentsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, field) in [
            (&self.static_ref, "components.static"),
            (&self.definition, "components.definition"),
            (&self.listing, "components.listing"),
            (&self.interactive, "components.interactive"),
            (&self.client_only, "components.client_only"),
        ] {
            require_tag_name(name, field)?;
        }
        Ok(())
    }
}

/// Raw loader configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LoaderConfigRaw {
    package: Option<String>,
    entry: Option<String>,
    root: Option<String>,
}

/// Resolved loader configuration.
#[derive(Debug)]
pub struct LoaderConfig {
    /// Package whose module format is corrected.
    pub package: String,
    /// Package entry file, relative to `root`.
    pub entry: String,
    /// Project root holding `node_modules`. `None` means the current
    /// working directory at the time of use.
    pub root: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_owned(),
            entry: DEFAULT_ENTRY.to_owned(),
            root: None,
        }
    }
}

impl LoaderConfig {
    /// Absolute project root.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the current directory cannot be read.
    pub fn root_dir(&self) -> std::io::Result<PathBuf> {
        match &self.root {
            Some(root) => std::path::absolute(root),
            None => std::env::current_dir(),
        }
    }

    /// Path of the package's `package.json`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the root cannot be determined.
    pub fn package_json(&self) -> std::io::Result<PathBuf> {
        Ok(self
            .root_dir()?
            .join("node_modules")
            .join(&self.package)
            .join("package.json"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.package, "loader.package")?;
        require_non_empty(&self.entry, "loader.entry")?;
        if Path::new(&self.entry).is_absolute() {
            return Err(ConfigError::Validation(
                "loader.entry must be relative to loader.root".to_owned(),
            ));
        }
        Ok(())
    }
}

const DEFAULT_PACKAGE: &str = "lamcalc";
const DEFAULT_ENTRY: &str = "node_modules/lamcalc/lamcalc.js";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`loader.root`").
        field: String,
        /// Error message (e.g., "${`LAMDOCS_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a component tag name: a letter, then letters, digits, `-`, `_` or `.`.
fn require_tag_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    let mut chars = value.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_with_letter || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
        return Err(ConfigError::Validation(format!(
            "{field} is not a valid tag name: {value:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lamdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.docs_resolved.out_dir.clone_from(out_dir);
        }
        if let Some(doc_id) = &settings.doc_id {
            self.markdown.doc_id = Some(doc_id.clone());
        }
    }

    /// Version of the interpreter package installed under the loader root.
    ///
    /// Degrades to an empty string when the package or its version cannot be
    /// read; a missing version never fails a build.
    #[must_use]
    pub fn package_version(&self) -> String {
        let path = match self.loader_resolved.package_json() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(error = %e, "package version unavailable");
                return String::new();
            }
        };
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "package version unavailable");
                return String::new();
            }
        };
        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(manifest) => manifest
                .get("version")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "package version unavailable");
                String::new()
            }
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            docs: DocsConfigRaw::default(),
            markdown: MarkdownConfig::default(),
            components: ComponentsConfig::default(),
            loader: LoaderConfigRaw::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                out_dir: base.join("dist"),
            },
            loader_resolved: LoaderConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let path = std::path::absolute(path)?;
        let content = std::fs::read_to_string(&path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path);

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        self.validate_markdown()?;
        self.components.validate()?;
        self.loader_resolved.validate()?;
        Ok(())
    }

    fn validate_markdown(&self) -> Result<(), ConfigError> {
        if let Some(doc_id) = &self.markdown.doc_id
            && (doc_id.is_empty() || doc_id.contains(char::is_whitespace))
        {
            return Err(ConfigError::Validation(
                "markdown.doc_id must be non-empty and contain no whitespace".to_owned(),
            ));
        }
        if self.markdown.macros.keys().any(String::is_empty) {
            return Err(ConfigError::Validation(
                "markdown.macros cannot have an empty pattern".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.title = expand::expand_env(&self.site.title, "site.title")?;
        self.site.description = expand::expand_env(&self.site.description, "site.description")?;

        if let Some(ref dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(dir, "docs.source_dir")?);
        }
        if let Some(ref dir) = self.docs.out_dir {
            self.docs.out_dir = Some(expand::expand_env(dir, "docs.out_dir")?);
        }
        if let Some(ref root) = self.loader.root {
            self.loader.root = Some(expand::expand_env(root, "loader.root")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| match path.unwrap_or(default) {
            "." | "" => config_dir.to_path_buf(),
            path => config_dir.join(path),
        };

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            out_dir: resolve(self.docs.out_dir.as_deref(), "dist"),
        };

        self.loader_resolved = LoaderConfig {
            package: self
                .loader
                .package
                .clone()
                .unwrap_or_else(|| DEFAULT_PACKAGE.to_owned()),
            entry: self
                .loader
                .entry
                .clone()
                .unwrap_or_else(|| DEFAULT_ENTRY.to_owned()),
            root: self.loader.root.as_deref().map(|root| resolve(Some(root), ".")),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.title, "Road to λ-Calculus");
        assert_eq!(config.site.description, "Learn lambda calculus interactively!");
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.out_dir, PathBuf::from("/test/dist"));
        assert_eq!(config.loader_resolved.package, "lamcalc");
        assert_eq!(config.loader_resolved.entry, "node_modules/lamcalc/lamcalc.js");
        assert_eq!(config.loader_resolved.root, None);
        assert_eq!(config.components.static_ref, "LambdaStatic");
        assert!(config.markdown.doc_id.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.title, "Road to λ-Calculus");
        assert_eq!(config.components.client_only, "ClientOnly");
        assert!(config.markdown.macros.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
title = "Lambda"
description = "Notes"

[docs]
source_dir = "content"
out_dir = "public"

[markdown]
doc_id = "intro"
macros = { "{Y}" = "Y combinator", "{S}" = "S combinator" }

[components]
static = "Term"
definition = "Def"
listing = "Listing"
interactive = "Repl"
client_only = "NoSsr"

[loader]
package = "lamcalc-next"
entry = "node_modules/lamcalc-next/index.js"
root = "site"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.site.title, "Lambda");
        assert_eq!(config.site.description, "Notes");
        assert_eq!(config.markdown.doc_id.as_deref(), Some("intro"));
        assert_eq!(
            config.markdown.macros.keys().collect::<Vec<_>>(),
            vec!["{S}", "{Y}"]
        );
        assert_eq!(config.components.static_ref, "Term");
        assert_eq!(config.components.client_only, "NoSsr");
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(config.docs_resolved.out_dir, PathBuf::from("/project/public"));
        assert_eq!(config.loader_resolved.package, "lamcalc-next");
        assert_eq!(config.loader_resolved.root, Some(PathBuf::from("/project/site")));
        config.validate().unwrap();
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/project/docs"));
        assert_eq!(config.docs_resolved.out_dir, PathBuf::from("/project/dist"));
        assert_eq!(config.loader_resolved.root, None);
    }

    #[test]
    fn test_absolute_root_kept() {
        let mut config: Config = toml::from_str("[loader]\nroot = \"/opt/site\"").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.loader_resolved.root, Some(PathBuf::from("/opt/site")));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lamdocs.toml");
        std::fs::write(&path, "[docs]\nsource_dir = \"lessons\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.docs_resolved.source_dir, dir.path().join("lessons"));
        assert_eq!(config.loader_resolved.root, None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/lamdocs.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lamdocs.toml");
        std::fs::write(&path, "[site\ntitle = ").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_expands_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lamdocs.toml");
        std::fs::write(
            &path,
            "[site]\ntitle = \"${LAMDOCS_CFG_TITLE:-Fallback}\"\n[loader]\nroot = \"${LAMDOCS_CFG_ROOT}\"\n",
        )
        .unwrap();
        // SAFETY: the variable names are unique to this test
        unsafe {
            std::env::remove_var("LAMDOCS_CFG_TITLE");
            std::env::set_var("LAMDOCS_CFG_ROOT", "/srv/lambda");
        }

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.title, "Fallback");
        assert_eq!(config.loader_resolved.root, Some(PathBuf::from("/srv/lambda")));
        unsafe {
            std::env::remove_var("LAMDOCS_CFG_ROOT");
        }
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            out_dir: Some(PathBuf::from("/tmp/out")),
            doc_id: Some("ch1".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.docs_resolved.out_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs")); // Unchanged
        assert_eq!(config.markdown.doc_id.as_deref(), Some("ch1"));
    }

    #[test]
    fn test_apply_cli_settings_source_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/custom/docs"));
        assert!(config.markdown.doc_id.is_none());
    }

    #[test]
    fn test_loader_root_dir() {
        let unset = LoaderConfig::default();
        assert_eq!(unset.root_dir().unwrap(), std::env::current_dir().unwrap());

        let set = LoaderConfig {
            root: Some(PathBuf::from("/srv/site")),
            ..LoaderConfig::default()
        };
        assert_eq!(set.root_dir().unwrap(), PathBuf::from("/srv/site"));
        assert_eq!(
            set.package_json().unwrap(),
            PathBuf::from("/srv/site/node_modules/lamcalc/package.json")
        );
    }

    #[test]
    fn test_package_version() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("node_modules/lamcalc");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("package.json"), r#"{"name": "lamcalc", "version": "0.3.1"}"#).unwrap();

        let mut config = Config::default_with_base(dir.path());
        config.loader_resolved.root = Some(dir.path().to_path_buf());
        assert_eq!(config.package_version(), "0.3.1");
    }

    #[test]
    fn test_package_version_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default_with_base(dir.path());
        config.loader_resolved.root = Some(dir.path().to_path_buf());
        assert_eq!(config.package_version(), "");

        let pkg = dir.path().join("node_modules/lamcalc");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("package.json"), "not json").unwrap();
        assert_eq!(config.package_version(), "");

        std::fs::write(pkg.join("package.json"), r#"{"name": "lamcalc"}"#).unwrap();
        assert_eq!(config.package_version(), "");
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_empty_title() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.title = String::new();
        assert_validation_error(&config, &["site.title", "empty"]);
    }

    #[test]
    fn test_validate_component_names() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.components.interactive = "Lambda Interactive".to_owned();
        assert_validation_error(&config, &["components.interactive", "tag name"]);

        config.components.interactive = "1Lambda".to_owned();
        assert_validation_error(&config, &["components.interactive"]);

        config.components.interactive = "lambda-repl".to_owned();
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_doc_id() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.markdown.doc_id = Some("two words".to_owned());
        assert_validation_error(&config, &["markdown.doc_id"]);
    }

    #[test]
    fn test_validate_empty_macro_pattern() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.markdown.macros.insert(String::new(), "x".to_owned());
        assert_validation_error(&config, &["markdown.macros"]);
    }

    #[test]
    fn test_validate_loader() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.loader_resolved.entry = "/abs/lamcalc.js".to_owned();
        assert_validation_error(&config, &["loader.entry", "relative"]);

        config.loader_resolved.entry = "node_modules/lamcalc/lamcalc.js".to_owned();
        config.loader_resolved.package = String::new();
        assert_validation_error(&config, &["loader.package", "empty"]);
    }
}
