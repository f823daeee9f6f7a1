//! Whole-document directive expansion.

use std::borrow::Cow;

use regex::Captures;

use super::parser::{directive_regex, parse_captures};
use super::{ComponentNames, Directive};
use crate::pipeline::SourceRule;

/// Rewrites lambda directives into component markup.
///
/// Anything that does not fully match a directive shape is left untouched,
/// so a broken directive shows up as literal text in the page instead of
/// failing the build.
///
/// # Example
///
/// ```
/// use lamdocs_renderer::directive::DirectiveExpander;
///
/// let expander = DirectiveExpander::new();
/// let out = expander.expand(r"The identity l`\x.x` returns its argument.");
/// assert_eq!(out, r#"The identity <LambdaStatic exp="\x.x" /> returns its argument."#);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DirectiveExpander {
    components: ComponentNames,
}

impl DirectiveExpander {
    /// Create an expander with the default component names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom component names.
    #[must_use]
    pub fn with_components(mut self, components: ComponentNames) -> Self {
        self.components = components;
        self
    }

    /// Component names used for expansion.
    #[must_use]
    pub fn components(&self) -> &ComponentNames {
        &self.components
    }

    /// Replace every directive in `text` with its markup.
    pub fn expand<'t>(&self, text: &'t str) -> Cow<'t, str> {
        directive_regex().replace_all(text, |caps: &Captures<'_>| {
            match parse_captures(caps, text) {
                Some(directive) => {
                    tracing::trace!(kind = directive.name(), "expanding directive");
                    directive.to_markup(&self.components)
                }
                None => caps[0].to_owned(),
            }
        })
    }

    /// List the directives in `text` in document order, without rewriting.
    #[must_use]
    pub fn scan(&self, text: &str) -> Vec<Directive> {
        directive_regex()
            .captures_iter(text)
            .filter_map(|caps| parse_captures(&caps, text))
            .collect()
    }
}

impl SourceRule for DirectiveExpander {
    fn name(&self) -> &str {
        "lambda_directives"
    }

    fn apply<'t>(&self, source: &'t str) -> Cow<'t, str> {
        self.expand(source)
    }
}
