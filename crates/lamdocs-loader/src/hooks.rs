//! Resolve/load hook contract and the chain that runs hooks in front of a
//! host resolver and loader.
//!
//! A hook sees each request together with a `next` continuation for the
//! rest of the chain. It either answers the request itself (a
//! short-circuited result) or calls `next`, possibly with adjusted
//! arguments. Hooks are stateless; every request is independent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LoaderError;
use crate::format::ModuleFormat;

/// Context passed along with a resolve request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolveContext {
    /// Export conditions, e.g. `import`, `node`.
    pub conditions: Vec<String>,
    /// Import attributes (`with { type: "json" }`).
    pub import_attributes: BTreeMap<String, String>,
    /// URL of the importing module, if any.
    pub parent_url: Option<String>,
    /// Format hint from an earlier hook.
    pub format: Option<ModuleFormat>,
}

impl ResolveContext {
    /// Context for an import from `parent_url`.
    #[must_use]
    pub fn from_parent(parent_url: impl Into<String>) -> Self {
        Self {
            parent_url: Some(parent_url.into()),
            ..Self::default()
        }
    }
}

/// Context passed along with a load request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadContext {
    /// Export conditions.
    pub conditions: Vec<String>,
    /// Import attributes.
    pub import_attributes: BTreeMap<String, String>,
    /// Format inferred during resolution, if any.
    pub format: Option<ModuleFormat>,
}

impl LoadContext {
    /// Context with only a format hint.
    #[must_use]
    pub fn with_format_hint(format: Option<ModuleFormat>) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Copy of this context with `format` replaced. `self` is left as is.
    #[must_use]
    pub fn with_format(&self, format: ModuleFormat) -> Self {
        Self {
            format: Some(format),
            ..self.clone()
        }
    }
}

/// Result of a resolve request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResult {
    /// Absolute URL of the module.
    pub url: String,
    /// Format, when known at resolution time.
    pub format: Option<ModuleFormat>,
    /// Set by a hook that answered without calling `next`.
    pub short_circuit: bool,
}

/// Result of a load request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadResult {
    /// Format the module is evaluated as.
    pub format: ModuleFormat,
    /// Module source. `None` for built-ins.
    pub source: Option<Vec<u8>>,
    /// Set by a hook that answered without calling `next`.
    pub short_circuit: bool,
}

impl LoadResult {
    /// Source as text, if present and valid UTF-8.
    #[must_use]
    pub fn source_text(&self) -> Option<&str> {
        self.source
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

/// Something that maps a specifier to a module URL.
pub trait Resolver: Send + Sync {
    fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
    ) -> Result<ResolveResult, LoaderError>;
}

/// Something that reads a module URL into source and format.
pub trait Loader: Send + Sync {
    fn load(&self, url: &str, context: &LoadContext) -> Result<LoadResult, LoaderError>;
}

impl<F> Resolver for F
where
    F: Fn(&str, &ResolveContext) -> Result<ResolveResult, LoaderError> + Send + Sync,
{
    fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
    ) -> Result<ResolveResult, LoaderError> {
        self(specifier, context)
    }
}

impl<F> Loader for F
where
    F: Fn(&str, &LoadContext) -> Result<LoadResult, LoaderError> + Send + Sync,
{
    fn load(&self, url: &str, context: &LoadContext) -> Result<LoadResult, LoaderError> {
        self(url, context)
    }
}

/// A pair of resolve/load hooks.
///
/// Both methods delegate to `next` by default, so a hook only overrides the
/// side it cares about.
pub trait ModuleHooks: Send + Sync {
    /// Hook name, for logs.
    fn name(&self) -> &str;

    fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
        next: &dyn Resolver,
    ) -> Result<ResolveResult, LoaderError> {
        next.resolve(specifier, context)
    }

    fn load(
        &self,
        url: &str,
        context: &LoadContext,
        next: &dyn Loader,
    ) -> Result<LoadResult, LoaderError> {
        next.load(url, context)
    }
}

/// Hooks registered in front of a host resolver and loader.
///
/// As in the Node.js loader, the most recently registered hook runs first
/// and its `next` is the hook registered before it. The host runs last.
///
/// # Example
///
/// ```
/// use lamdocs_loader::{HookChain, NodeLoader, NodeResolver, ReservedPackageShim, Resolver, ResolveContext};
///
/// let chain = HookChain::new(NodeResolver::new("/srv/site"), NodeLoader::new())
///     .with_hooks(ReservedPackageShim::new("/srv/site"));
///
/// let resolved = chain.resolve("lamcalc", &ResolveContext::default()).unwrap();
/// assert_eq!(resolved.url, "file:///srv/site/node_modules/lamcalc/lamcalc.js");
/// assert!(resolved.short_circuit);
/// ```
pub struct HookChain {
    hooks: Vec<Box<dyn ModuleHooks>>,
    resolver: Box<dyn Resolver>,
    loader: Box<dyn Loader>,
}

impl HookChain {
    /// Chain with no hooks over the given host.
    pub fn new(resolver: impl Resolver + 'static, loader: impl Loader + 'static) -> Self {
        Self {
            hooks: Vec::new(),
            resolver: Box::new(resolver),
            loader: Box::new(loader),
        }
    }

    /// Register a hook. It runs before every hook registered earlier.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl ModuleHooks + 'static) -> Self {
        self.hooks.push(Box::new(hooks));
        self
    }

    /// Hook names in execution order.
    pub fn hook_names(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().rev().map(|hook| hook.name())
    }
}

impl Resolver for HookChain {
    fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
    ) -> Result<ResolveResult, LoaderError> {
        NextResolve {
            hooks: &self.hooks,
            host: self.resolver.as_ref(),
        }
        .resolve(specifier, context)
    }
}

impl Loader for HookChain {
    fn load(&self, url: &str, context: &LoadContext) -> Result<LoadResult, LoaderError> {
        NextLoad {
            hooks: &self.hooks,
            host: self.loader.as_ref(),
        }
        .load(url, context)
    }
}

/// Continuation over the hooks not yet run.
struct NextResolve<'a> {
    hooks: &'a [Box<dyn ModuleHooks>],
    host: &'a dyn Resolver,
}

impl Resolver for NextResolve<'_> {
    fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
    ) -> Result<ResolveResult, LoaderError> {
        match self.hooks.split_last() {
            Some((hook, rest)) => {
                tracing::trace!(hook = hook.name(), specifier, "resolve hook");
                let next = NextResolve {
                    hooks: rest,
                    host: self.host,
                };
                hook.resolve(specifier, context, &next)
            }
            None => self.host.resolve(specifier, context),
        }
    }
}

struct NextLoad<'a> {
    hooks: &'a [Box<dyn ModuleHooks>],
    host: &'a dyn Loader,
}

impl Loader for NextLoad<'_> {
    fn load(&self, url: &str, context: &LoadContext) -> Result<LoadResult, LoaderError> {
        match self.hooks.split_last() {
            Some((hook, rest)) => {
                tracing::trace!(hook = hook.name(), url, "load hook");
                let next = NextLoad {
                    hooks: rest,
                    host: self.host,
                };
                hook.load(url, context, &next)
            }
            None => self.host.load(url, context),
        }
    }
}
