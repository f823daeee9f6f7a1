//! A small Node.js-style host resolver and loader.
//!
//! Covers what the documentation site needs: `file://` URLs, absolute and
//! relative paths, `node:` built-ins, and bare package imports looked up in
//! `node_modules` directories. Package entry points come from `exports`
//! (string, condition map or subpath map), then `main`, then `index.js`.
//!
//! Formats follow the host heuristic: `.mjs`, `.cjs`, `.json` and `.wasm`
//! by extension, `.js` by the `type` field of the nearest `package.json`,
//! `commonjs` when that field is missing. A package that ships ES module
//! syntax without `"type": "module"` is therefore mislabeled, which is what
//! [`ReservedPackageShim`](crate::ReservedPackageShim) corrects.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::LoaderError;
use crate::file_url::{path_to_url, url_to_path};
use crate::format::ModuleFormat;
use crate::hooks::{LoadContext, LoadResult, Loader, ResolveContext, ResolveResult, Resolver};

/// Built-in modules importable without the `node:` prefix.
const BUILTIN_MODULES: &[&str] = &[
    "assert",
    "buffer",
    "child_process",
    "crypto",
    "events",
    "fs",
    "http",
    "https",
    "module",
    "net",
    "os",
    "path",
    "process",
    "stream",
    "url",
    "util",
    "worker_threads",
    "zlib",
];

/// Export conditions used when the request carries none.
const DEFAULT_CONDITIONS: &[&str] = &["node", "import"];

/// Host resolver rooted at a project directory.
#[derive(Clone, Debug)]
pub struct NodeResolver {
    base_dir: PathBuf,
}

impl NodeResolver {
    /// Resolver for imports without a parent, relative to `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory that relative and bare specifiers are looked up from.
    fn lookup_dir(&self, specifier: &str, context: &ResolveContext) -> Result<PathBuf, LoaderError> {
        let dir = match &context.parent_url {
            Some(parent) => {
                let path = url_to_path(parent).ok_or_else(|| {
                    LoaderError::invalid(specifier, format!("parent URL '{parent}' is not a file URL"))
                })?;
                path.parent()
                    .map_or_else(|| PathBuf::from("/"), Path::to_path_buf)
            }
            None => self.base_dir.clone(),
        };
        let dir = std::path::absolute(&dir).map_err(|source| LoaderError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(normalize(&dir))
    }

    fn resolve_bare(
        specifier: &str,
        from: &Path,
        context: &ResolveContext,
    ) -> Result<PathBuf, LoaderError> {
        let (name, subpath) = split_package(specifier)
            .ok_or_else(|| LoaderError::invalid(specifier, "scoped package name needs a '/'"))?;

        let Some(package_dir) = from
            .ancestors()
            .map(|dir| dir.join("node_modules").join(name))
            .find(|dir| dir.is_dir())
        else {
            return Err(LoaderError::not_found(specifier, from.display().to_string()));
        };
        tracing::debug!(specifier, package = %package_dir.display(), "found package");

        let manifest = PackageJson::read(&package_dir)?.unwrap_or_default();
        let target = match manifest.export_target(subpath, &context.conditions) {
            Some(target) => package_dir.join(target.trim_start_matches("./")),
            None if subpath.is_empty() => manifest
                .main
                .as_ref()
                .map_or_else(|| package_dir.clone(), |main| package_dir.join(main)),
            None => package_dir.join(subpath),
        };
        resolve_file(&normalize(&target))
            .ok_or_else(|| LoaderError::not_found(specifier, from.display().to_string()))
    }
}

impl Resolver for NodeResolver {
    fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
    ) -> Result<ResolveResult, LoaderError> {
        if specifier.is_empty() {
            return Err(LoaderError::invalid(specifier, "empty specifier"));
        }
        if let Some(url) = builtin_url(specifier) {
            return Ok(ResolveResult {
                url,
                format: Some(ModuleFormat::Builtin),
                short_circuit: false,
            });
        }

        let from = self.lookup_dir(specifier, context)?;
        let path = if specifier.starts_with("file:") {
            let path = url_to_path(specifier)
                .ok_or_else(|| LoaderError::invalid(specifier, "not a local file URL"))?;
            resolve_file(&normalize(&path))
                .ok_or_else(|| LoaderError::not_found(specifier, from.display().to_string()))?
        } else if specifier.starts_with('/') {
            resolve_file(&normalize(Path::new(specifier)))
                .ok_or_else(|| LoaderError::not_found(specifier, from.display().to_string()))?
        } else if is_relative(specifier) {
            resolve_file(&normalize(&from.join(specifier)))
                .ok_or_else(|| LoaderError::not_found(specifier, from.display().to_string()))?
        } else {
            Self::resolve_bare(specifier, &from, context)?
        };

        Ok(ResolveResult {
            url: path_to_url(&path)?,
            format: infer_format(&path)?,
            short_circuit: false,
        })
    }
}

/// Host loader reading modules from the file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeLoader;

impl NodeLoader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Loader for NodeLoader {
    fn load(&self, url: &str, context: &LoadContext) -> Result<LoadResult, LoaderError> {
        if url.starts_with("node:") {
            return Ok(LoadResult {
                format: ModuleFormat::Builtin,
                source: None,
                short_circuit: false,
            });
        }
        let Some(path) = url_to_path(url) else {
            return Err(LoaderError::invalid(url, "only file: and node: URLs can be loaded"));
        };

        let format = match context.format {
            Some(format) => format,
            None => infer_format(&path)?
                .ok_or_else(|| LoaderError::invalid(url, "unknown file extension"))?,
        };
        let source = fs::read(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                LoaderError::not_found(url, "the file system")
            } else {
                LoaderError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        Ok(LoadResult {
            format,
            source: Some(source),
            short_circuit: false,
        })
    }
}

/// The fields of `package.json` that matter for resolution.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PackageJson {
    #[serde(rename = "type")]
    kind: Option<String>,
    main: Option<String>,
    exports: Option<Value>,
}

impl PackageJson {
    /// Read `dir/package.json`. `Ok(None)` when there is none.
    fn read(dir: &Path) -> Result<Option<Self>, LoaderError> {
        let path = dir.join("package.json");
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(LoaderError::Io { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| LoaderError::PackageJson { path, source })
    }

    /// Target of `subpath` ("" for the package root) in `exports`.
    fn export_target(&self, subpath: &str, conditions: &[String]) -> Option<String> {
        let exports = self.exports.as_ref()?;
        let entry = match exports {
            Value::Object(map) if map.keys().all(|key| key.starts_with('.')) => {
                let key = if subpath.is_empty() {
                    ".".to_owned()
                } else {
                    format!("./{subpath}")
                };
                map.get(&key)?
            }
            _ if subpath.is_empty() => exports,
            _ => return None,
        };
        select_condition(entry, conditions)
    }
}

/// Pick a target from an exports entry. Requested conditions are tried in
/// order, then `default`.
fn select_condition(entry: &Value, conditions: &[String]) -> Option<String> {
    match entry {
        Value::String(target) => Some(target.clone()),
        Value::Array(items) => items
            .iter()
            .find_map(|item| select_condition(item, conditions)),
        Value::Object(map) => {
            let requested: Vec<&str> = if conditions.is_empty() {
                DEFAULT_CONDITIONS.to_vec()
            } else {
                conditions.iter().map(String::as_str).collect()
            };
            requested
                .into_iter()
                .chain(["default"])
                .find_map(|condition| map.get(condition))
                .and_then(|target| select_condition(target, conditions))
        }
        _ => None,
    }
}

/// Format of the file at `path`, or `None` for unknown extensions.
fn infer_format(path: &Path) -> Result<Option<ModuleFormat>, LoaderError> {
    if let Some(format) = ModuleFormat::from_extension(path) {
        return Ok(Some(format));
    }
    if path.extension().is_none_or(|ext| ext != "js") {
        return Ok(None);
    }
    for dir in path.ancestors().skip(1) {
        if let Some(manifest) = PackageJson::read(dir)? {
            let format = match manifest.kind.as_deref() {
                Some("module") => ModuleFormat::Module,
                _ => ModuleFormat::Commonjs,
            };
            return Ok(Some(format));
        }
    }
    Ok(Some(ModuleFormat::Commonjs))
}

/// `node:` URL for a built-in specifier.
fn builtin_url(specifier: &str) -> Option<String> {
    if specifier.starts_with("node:") {
        return Some(specifier.to_owned());
    }
    let root = specifier.split('/').next().unwrap_or(specifier);
    BUILTIN_MODULES
        .contains(&root)
        .then(|| format!("node:{specifier}"))
}

fn is_relative(specifier: &str) -> bool {
    matches!(specifier, "." | "..") || specifier.starts_with("./") || specifier.starts_with("../")
}

/// Split a bare specifier into package name and subpath.
fn split_package(specifier: &str) -> Option<(&str, &str)> {
    let name_end = if specifier.starts_with('@') {
        let (slash, _) = specifier.match_indices('/').next()?;
        specifier[slash + 1..]
            .find('/')
            .map_or(specifier.len(), |i| slash + 1 + i)
    } else {
        specifier.find('/').unwrap_or(specifier.len())
    };
    let (name, rest) = specifier.split_at(name_end);
    Some((name, rest.trim_start_matches('/')))
}

/// Existing file for `path`: as is, with `.js` appended, or `index.js`
/// inside it.
fn resolve_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    let mut with_ext = OsString::from(path.as_os_str());
    with_ext.push(".js");
    let with_ext = PathBuf::from(with_ext);
    if with_ext.is_file() {
        return Some(with_ext);
    }
    let index = path.join("index.js");
    index.is_file().then_some(index)
}

/// Lexically remove `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Project with a `lamcalc` install lacking `"type": "module"`.
    fn project() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "package.json", r#"{"name": "site", "type": "module"}"#);
        write(dir.path(), "docs/.vitepress/theme/index.js", "export default {}");
        write(
            dir.path(),
            "node_modules/lamcalc/package.json",
            r#"{"name": "lamcalc", "version": "0.3.1", "main": "lamcalc.js"}"#,
        );
        write(dir.path(), "node_modules/lamcalc/lamcalc.js", "export function parse() {}");
        dir
    }

    fn file_url(path: &Path) -> String {
        path_to_url(path).unwrap()
    }

    fn resolver(dir: &TempDir) -> NodeResolver {
        NodeResolver::new(dir.path())
    }

    #[test]
    fn test_bare_package_uses_main_and_mislabels_format() {
        let dir = project();
        let resolved = resolver(&dir)
            .resolve("lamcalc", &ResolveContext::default())
            .unwrap();
        assert_eq!(
            resolved.url,
            file_url(&dir.path().join("node_modules/lamcalc/lamcalc.js"))
        );
        assert_eq!(resolved.format, Some(ModuleFormat::Commonjs));
    }

    #[test]
    fn test_relative_from_parent() {
        let dir = project();
        let parent = file_url(&dir.path().join("docs/.vitepress/theme/index.js"));
        write(dir.path(), "docs/.vitepress/components/LambdaStatic.js", "export {}");

        let resolved = resolver(&dir)
            .resolve(
                "../components/LambdaStatic.js",
                &ResolveContext::from_parent(parent),
            )
            .unwrap();
        assert_eq!(
            resolved.url,
            file_url(&dir.path().join("docs/.vitepress/components/LambdaStatic.js"))
        );
        assert_eq!(resolved.format, Some(ModuleFormat::Module));
    }

    #[test]
    fn test_relative_without_extension_and_directory_index() {
        let dir = project();
        write(dir.path(), "lib/util.js", "");
        write(dir.path(), "lib/nested/index.js", "");
        let r = resolver(&dir);
        let ctx = ResolveContext::default();
        assert!(r.resolve("./lib/util", &ctx).unwrap().url.ends_with("lib/util.js"));
        assert!(
            r.resolve("./lib/nested", &ctx)
                .unwrap()
                .url
                .ends_with("lib/nested/index.js")
        );
    }

    #[test]
    fn test_exports_conditions() {
        let dir = project();
        write(
            dir.path(),
            "node_modules/dual/package.json",
            r#"{"exports": {".": {"require": "./cjs/index.cjs", "import": "./esm/index.mjs"}, "./extra": "./extra.js"}}"#,
        );
        write(dir.path(), "node_modules/dual/cjs/index.cjs", "");
        write(dir.path(), "node_modules/dual/esm/index.mjs", "");
        write(dir.path(), "node_modules/dual/extra.js", "");
        let r = resolver(&dir);

        let esm = r.resolve("dual", &ResolveContext::default()).unwrap();
        assert!(esm.url.ends_with("esm/index.mjs"));
        assert_eq!(esm.format, Some(ModuleFormat::Module));

        let ctx = ResolveContext {
            conditions: vec!["require".to_owned()],
            ..ResolveContext::default()
        };
        let cjs = r.resolve("dual", &ctx).unwrap();
        assert!(cjs.url.ends_with("cjs/index.cjs"));
        assert_eq!(cjs.format, Some(ModuleFormat::Commonjs));

        let extra = r.resolve("dual/extra", &ResolveContext::default()).unwrap();
        assert!(extra.url.ends_with("dual/extra.js"));
    }

    #[test]
    fn test_scoped_package() {
        let dir = project();
        write(dir.path(), "node_modules/@scope/pkg/index.js", "");
        let resolved = resolver(&dir)
            .resolve("@scope/pkg", &ResolveContext::default())
            .unwrap();
        assert!(resolved.url.ends_with("node_modules/@scope/pkg/index.js"));

        let err = resolver(&dir)
            .resolve("@scope", &ResolveContext::default())
            .unwrap_err();
        assert!(matches!(err, LoaderError::InvalidSpecifier { .. }));
    }

    #[test]
    fn test_package_found_in_ancestor_node_modules() {
        let dir = project();
        let parent = file_url(&dir.path().join("docs/.vitepress/theme/index.js"));
        let resolved = resolver(&dir)
            .resolve("lamcalc", &ResolveContext::from_parent(parent))
            .unwrap();
        assert!(resolved.url.ends_with("node_modules/lamcalc/lamcalc.js"));
    }

    #[test]
    fn test_builtins() {
        let dir = project();
        let r = resolver(&dir);
        for (specifier, url) in [("node:fs", "node:fs"), ("path", "node:path"), ("fs/promises", "node:fs/promises")] {
            let resolved = r.resolve(specifier, &ResolveContext::default()).unwrap();
            assert_eq!(resolved.url, url);
            assert_eq!(resolved.format, Some(ModuleFormat::Builtin));
        }
    }

    #[test]
    fn test_missing_package() {
        let dir = project();
        let err = resolver(&dir)
            .resolve("missing-pkg", &ResolveContext::default())
            .unwrap_err();
        assert!(matches!(
            err,
            LoaderError::ModuleNotFound { ref specifier, .. } if specifier == "missing-pkg"
        ));
    }

    #[test]
    fn test_invalid_specifiers() {
        let dir = project();
        let r = resolver(&dir);
        assert!(matches!(
            r.resolve("", &ResolveContext::default()),
            Err(LoaderError::InvalidSpecifier { .. })
        ));
        assert!(matches!(
            r.resolve("./x.js", &ResolveContext::from_parent("https://cdn.example/a.js")),
            Err(LoaderError::InvalidSpecifier { .. })
        ));
    }

    #[test]
    fn test_malformed_package_json() {
        let dir = project();
        write(dir.path(), "node_modules/broken/package.json", "{ not json");
        let err = resolver(&dir)
            .resolve("broken", &ResolveContext::default())
            .unwrap_err();
        assert!(matches!(err, LoaderError::PackageJson { .. }));
    }

    #[test]
    fn test_loader_reads_source_with_inferred_format() {
        let dir = project();
        let url = file_url(&dir.path().join("node_modules/lamcalc/lamcalc.js"));
        let loaded = NodeLoader::new().load(&url, &LoadContext::default()).unwrap();
        assert_eq!(loaded.format, ModuleFormat::Commonjs);
        assert_eq!(loaded.source_text(), Some("export function parse() {}"));
    }

    #[test]
    fn test_loader_honours_format_hint() {
        let dir = project();
        let url = file_url(&dir.path().join("node_modules/lamcalc/lamcalc.js"));
        let context = LoadContext::with_format_hint(Some(ModuleFormat::Module));
        let loaded = NodeLoader::new().load(&url, &context).unwrap();
        assert_eq!(loaded.format, ModuleFormat::Module);
    }

    #[test]
    fn test_loader_errors() {
        let dir = project();
        let missing = file_url(&dir.path().join("nope.js"));
        assert!(matches!(
            NodeLoader::new().load(&missing, &LoadContext::default()),
            Err(LoaderError::ModuleNotFound { .. })
        ));
        assert!(matches!(
            NodeLoader::new().load("https://cdn.example/a.js", &LoadContext::default()),
            Err(LoaderError::InvalidSpecifier { .. })
        ));
        let builtin = NodeLoader::new().load("node:fs", &LoadContext::default()).unwrap();
        assert_eq!(builtin.format, ModuleFormat::Builtin);
        assert_eq!(builtin.source, None);
    }

    #[test]
    fn test_paths_with_spaces_round_trip_through_urls() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("my site");
        write(&root, "package.json", r#"{"type": "module"}"#);
        write(&root, "theme/index.js", "import './util.js';");
        write(&root, "theme/util.js", "export const util = 1;");
        let parent = file_url(&root.join("theme/index.js"));
        assert!(parent.contains("/my%20site/"));

        let resolved = NodeResolver::new(&root)
            .resolve("./util.js", &ResolveContext::from_parent(parent))
            .unwrap();
        assert_eq!(resolved.url, file_url(&root.join("theme/util.js")));
        assert!(resolved.url.contains("/my%20site/"));
        assert_eq!(resolved.format, Some(ModuleFormat::Module));

        let loaded = NodeLoader::new()
            .load(&resolved.url, &LoadContext::default())
            .unwrap();
        assert_eq!(loaded.source_text(), Some("export const util = 1;"));

        let by_url = NodeResolver::new(dir.path())
            .resolve(&resolved.url, &ResolveContext::default())
            .unwrap();
        assert_eq!(by_url.url, resolved.url);
    }

    #[test]
    fn test_split_package() {
        assert_eq!(split_package("lamcalc"), Some(("lamcalc", "")));
        assert_eq!(split_package("lamcalc/dist/x.js"), Some(("lamcalc", "dist/x.js")));
        assert_eq!(split_package("@a/b/c"), Some(("@a/b", "c")));
        assert_eq!(split_package("@a"), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }
}
