//! Markdown pipeline for interactive lambda calculus lessons.
//!
//! Lesson pages are plain markdown with a few extras that are rewritten
//! before parsing:
//!
//! - **macros** ([`MacroSet`]): `{L}`, `{l}` and the legacy `` L`X` `` inline code
//! - **directives** ([`directive`]): `` l`EXPR` ``, `` dL`EXPR` `` and the
//!   `lambda-defs` / `lambda-interactive` fenced blocks, expanded into
//!   component tags that the site runtime turns into live widgets
//!
//! The rewritten source is then parsed with pulldown-cmark and rendered to
//! HTML by [`MarkdownRenderer`], with footnote back-references produced by
//! a replaceable [`FootnoteAnchorRule`].
//!
//! # Example
//!
//! ```
//! use lamdocs_renderer::{MarkdownPipeline, RenderEnv};
//!
//! let source = "# Identity\n\n```lambda-interactive\nid.defs\n---\nI y\n```\n";
//! let page = MarkdownPipeline::new().render(source, &RenderEnv::default());
//!
//! assert_eq!(page.title.as_deref(), Some("Identity"));
//! assert!(page.html.contains(r#"<LambdaInteractive file="id.defs" exp="I y" />"#));
//! ```

pub mod directive;
mod footnote;
mod macros;
mod pipeline;
mod renderer;
mod util;

pub use footnote::{
    BackrefAnchor, DefaultFootnoteAnchor, FOOTNOTE_ANCHOR_RULE, FootnoteAnchorRule,
    FootnoteNaming, FootnoteToken, RenderEnv, StandardNaming,
};
pub use macros::{MacroRule, MacroSet};
pub use pipeline::{MarkdownPipeline, SourceRule};
pub use renderer::{MarkdownRenderer, RenderResult, TocEntry};
pub use util::escape_html;
