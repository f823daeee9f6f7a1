//! Document pipeline: source rules, normalization, parsing, rendering.
//!
//! Source rules run on the raw document text before anything else, in
//! registration order. The standard pipeline registers the macro set first
//! and the directive expander second, then renders with the
//! [`BackrefAnchor`] footnote rule.
//!
//! A pipeline holds only read-only configuration. It is `Send + Sync` and is
//! meant to be built once and shared by every document in a build.

use std::borrow::Cow;
use std::sync::Arc;

use crate::directive::DirectiveExpander;
use crate::footnote::{BackrefAnchor, FootnoteAnchorRule, FootnoteNaming, RenderEnv, StandardNaming};
use crate::macros::MacroSet;
use crate::renderer::{MarkdownRenderer, RenderResult};

/// A text transform applied to the raw document source.
pub trait SourceRule: Send + Sync {
    /// Rule name, for logs.
    fn name(&self) -> &str;

    /// Rewrite `source`. Must not fail; unmatched input is returned as is.
    fn apply<'t>(&self, source: &'t str) -> Cow<'t, str>;
}

impl<T: SourceRule + ?Sized> SourceRule for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply<'t>(&self, source: &'t str) -> Cow<'t, str> {
        (**self).apply(source)
    }
}

/// Markdown pipeline for lesson pages.
///
/// # Example
///
/// ```
/// use lamdocs_renderer::{MarkdownPipeline, RenderEnv};
///
/// let pipeline = MarkdownPipeline::new();
/// let page = pipeline.render("# {L}\n\nIdentity: l`{l}x.x`", &RenderEnv::default());
/// assert_eq!(page.title.as_deref(), Some("λ-calculus"));
/// assert!(page.html.contains(r#"<LambdaStatic exp="λx.x" />"#));
/// ```
pub struct MarkdownPipeline {
    rules: Vec<Box<dyn SourceRule>>,
    naming: Arc<dyn FootnoteNaming>,
    anchor_rule: Arc<dyn FootnoteAnchorRule>,
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownPipeline {
    /// Standard pipeline: standard macros, default components, site footnote anchor.
    #[must_use]
    pub fn new() -> Self {
        Self::empty()
            .with_rule(MacroSet::standard())
            .with_rule(DirectiveExpander::new())
    }

    /// Pipeline with the given macros and directive expander.
    #[must_use]
    pub fn with_parts(macros: MacroSet, expander: DirectiveExpander) -> Self {
        Self::empty().with_rule(macros).with_rule(expander)
    }

    /// Pipeline with no source rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            naming: Arc::new(StandardNaming),
            anchor_rule: Arc::new(BackrefAnchor),
        }
    }

    /// Append a source rule. It runs after all rules added before it.
    #[must_use]
    pub fn with_rule<R: SourceRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Replace the footnote naming helper.
    #[must_use]
    pub fn with_footnote_naming(mut self, naming: Arc<dyn FootnoteNaming>) -> Self {
        self.naming = naming;
        self
    }

    /// Replace the footnote anchor rule.
    #[must_use]
    pub fn with_footnote_anchor(mut self, rule: Arc<dyn FootnoteAnchorRule>) -> Self {
        self.anchor_rule = rule;
        self
    }

    /// Names of the registered source rules, in order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Run the source rules and normalization, returning the markdown that
    /// the parser will see.
    #[must_use]
    pub fn preprocess(&self, source: &str) -> String {
        let rewritten = self.rules.iter().fold(Cow::Borrowed(source), |text, rule| {
            let next = match rule.apply(&text) {
                Cow::Owned(next) => Some(next),
                Cow::Borrowed(_) => None,
            };
            tracing::trace!(rule = rule.name(), changed = next.is_some(), "applied source rule");
            next.map_or(text, Cow::Owned)
        });
        normalize(&rewritten).into_owned()
    }

    /// Render a document to HTML, extracting its title.
    #[must_use]
    pub fn render(&self, source: &str, env: &RenderEnv) -> RenderResult {
        let markdown = self.preprocess(source);
        MarkdownRenderer::new()
            .with_title_extraction()
            .with_env(env.clone())
            .with_footnote_naming(Arc::clone(&self.naming))
            .with_footnote_anchor(Arc::clone(&self.anchor_rule))
            .render_markdown(&markdown)
    }
}

/// Normalize line endings to `\n` and replace NUL with U+FFFD.
fn normalize(text: &str) -> Cow<'_, str> {
    if !text.contains(['\r', '\0']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\0', "\u{fffd}"),
    )
}
