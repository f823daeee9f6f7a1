//! Lambda directives embedded in lesson prose.
//!
//! Four shapes are recognized and rewritten into component markup before
//! the markdown parser runs:
//!
//! | Syntax | Variant | Default markup |
//! |--------|---------|----------------|
//! | `` l`EXPR` `` | [`Directive::StaticRef`] | `<LambdaStatic exp="EXPR" />` |
//! | `` dL`EXPR` `` | [`Directive::DefinableBlock`] | `<LambdaDef exp="EXPR" :block="true" />` |
//! | ```` ```lambda-defs ```` fence with a file path | [`Directive::DefinitionsListing`] | `<LambdaRaw file="FILE" />` |
//! | ```` ```lambda-interactive ```` fence with `CTX`, `---TITLE`, `EXPR` | [`Directive::InteractiveBlock`] | `<LambdaInteractive …/>` inside `<ClientOnly>` |
//!
//! Interactive blocks need a live evaluator, which does not exist while the
//! static pages are generated, so they are always wrapped in the client-only
//! boundary.
//!
//! # Example
//!
//! ```
//! use lamdocs_renderer::directive::DirectiveExpander;
//!
//! let src = "```lambda-defs\nbool.defs\n```";
//! assert_eq!(DirectiveExpander::new().expand(src), r#"<LambdaRaw file="bool.defs" />"#);
//! ```

mod expander;
mod kind;
mod parser;

pub use expander::DirectiveExpander;
pub use kind::{ComponentNames, Directive};
