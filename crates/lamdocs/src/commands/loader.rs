//! `lamdocs loader` subcommand group.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use lamdocs_config::{Config, LoaderConfig};
use lamdocs_loader::{
    HookChain, LoadContext, LoadResult, Loader, ModuleFormat, NodeLoader, NodeResolver,
    ReservedPackageShim, ResolveContext, Resolver,
};

use crate::error::CliError;
use crate::output::Output;

/// Module resolution commands.
#[derive(Subcommand)]
pub(crate) enum LoaderCommand {
    /// Resolve a module specifier through the hook chain.
    Resolve(ResolveArgs),
    /// Load a module URL through the hook chain.
    Load(LoadArgs),
}

impl LoaderCommand {
    /// Execute the loader subcommand.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Resolve(args) => args.execute(),
            Self::Load(args) => args.execute(),
        }
    }
}

/// Arguments for `loader resolve`.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Module specifier, e.g. `lamcalc` or `./theme/index.js`.
    specifier: String,

    /// URL of the importing module.
    #[arg(long)]
    parent: Option<String>,

    /// Export condition; repeat for several (default: node, import).
    #[arg(long = "condition")]
    conditions: Vec<String>,

    /// Path to configuration file (default: auto-discover lamdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ResolveArgs {
    fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let context = ResolveContext {
            conditions: self.conditions,
            parent_url: self.parent,
            ..ResolveContext::default()
        };

        let resolved = hook_chain(&config.loader_resolved)?.resolve(&self.specifier, &context)?;
        Output::new().document(&serde_json::to_string_pretty(&resolved)?)?;
        Ok(())
    }
}

/// Arguments for `loader load`.
#[derive(Args)]
pub(crate) struct LoadArgs {
    /// Module URL, e.g. `file:///site/node_modules/lamcalc/lamcalc.js`.
    url: String,

    /// Format inferred by an earlier resolve step.
    #[arg(long)]
    format: Option<ModuleFormat>,

    /// Path to configuration file (default: auto-discover lamdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl LoadArgs {
    fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let context = LoadContext::with_format_hint(self.format);

        let loaded = hook_chain(&config.loader_resolved)?.load(&self.url, &context)?;
        Output::new().document(&serde_json::to_string_pretty(&load_summary(&self.url, &loaded))?)?;
        Ok(())
    }
}

/// Host resolver and loader with the reserved package shim in front.
///
/// Without a configured `loader.root` the project is the current directory.
fn hook_chain(loader: &LoaderConfig) -> Result<HookChain, CliError> {
    let shim = match &loader.root {
        Some(root) => ReservedPackageShim::new(std::path::absolute(root)?),
        None => ReservedPackageShim::from_current_dir()?,
    }
    .with_package(&loader.package, &loader.entry);
    let resolver = NodeResolver::new(shim.root());
    Ok(HookChain::new(resolver, NodeLoader::new()).with_hooks(shim))
}

/// JSON view of a load result. Non-UTF-8 sources are reported by size only.
fn load_summary(url: &str, loaded: &LoadResult) -> serde_json::Value {
    serde_json::json!({
        "url": url,
        "format": loaded.format,
        "shortCircuit": loaded.short_circuit,
        "bytes": loaded.source.as_ref().map_or(0, Vec::len),
        "source": loaded.source_text(),
    })
}
