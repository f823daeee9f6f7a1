//! Module resolution hooks for the lambda calculus documentation site.
//!
//! The interpreter package (`lamcalc`) is ES module code that the host
//! loader cannot identify as such. [`ReservedPackageShim`] sits in front of
//! the host as a pair of resolve/load hooks and fixes that; [`HookChain`]
//! composes hooks over a host [`Resolver`] and [`Loader`].
//!
//! [`NodeResolver`] and [`NodeLoader`] are a small file-system host that
//! follows the Node.js rules closely enough to reproduce the problem the
//! shim solves.
//!
//! # Example
//!
//! ```no_run
//! use lamdocs_loader::{HookChain, LoadContext, Loader, NodeLoader, NodeResolver, ReservedPackageShim, ModuleFormat};
//!
//! let shim = ReservedPackageShim::from_current_dir()?;
//! let url = shim.entry_url().to_owned();
//! let chain = HookChain::new(NodeResolver::new(shim.root()), NodeLoader::new()).with_hooks(shim);
//!
//! let module = chain.load(&url, &LoadContext::default())?;
//! assert_eq!(module.format, ModuleFormat::Module);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file_url;
mod format;
mod hooks;
mod node;
mod shim;

pub use error::LoaderError;
pub use file_url::{path_to_url, url_to_path};
pub use format::{ModuleFormat, UnknownFormat};
pub use hooks::{
    HookChain, LoadContext, LoadResult, Loader, ModuleHooks, ResolveContext, ResolveResult,
    Resolver,
};
pub use node::{NodeLoader, NodeResolver};
pub use shim::{RESERVED_ENTRY, RESERVED_PACKAGE, ReservedPackageShim};
