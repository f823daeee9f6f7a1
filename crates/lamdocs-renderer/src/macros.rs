//! Macro substitution over raw markdown source.
//!
//! Macros are plain regex rewrites applied before any structural parsing.
//! Rules run in declaration order and each rule sees the output of the
//! previous one:
//!
//! ```
//! use lamdocs_renderer::MacroSet;
//!
//! let out = MacroSet::standard().apply("The {L} uses {l}x.x");
//! assert_eq!(out, "The λ-calculus uses λx.x");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::pipeline::SourceRule;

type ReplaceFn = dyn Fn(&Captures<'_>) -> String + Send + Sync;

/// One macro: a pattern and the function producing its replacement.
pub struct MacroRule {
    pattern: Regex,
    replace: Box<ReplaceFn>,
}

impl MacroRule {
    /// Create a rule from a compiled pattern and a replacement function.
    pub fn new<F>(pattern: Regex, replace: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            pattern,
            replace: Box::new(replace),
        }
    }

    /// Create a rule replacing every literal occurrence of `token` with `text`.
    #[must_use]
    pub fn literal(token: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        // An escaped literal is always a valid pattern.
        let pattern = Regex::new(&regex::escape(token)).expect("escaped literal is a valid regex");
        Self::new(pattern, move |_| text.clone())
    }

    /// Apply this rule globally to `text`.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, |caps: &Captures<'_>| (self.replace)(caps))
    }

    /// Source of the rule's pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl fmt::Debug for MacroRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroRule")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Ordered list of macro rules.
#[derive(Debug, Default)]
pub struct MacroSet {
    rules: Vec<MacroRule>,
}

static STANDARD: LazyLock<MacroSet> = LazyLock::new(MacroSet::with_standard_rules);

impl MacroSet {
    /// Create an empty macro set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared instance of the standard rules.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Build an owned copy of the standard rules, to extend with more.
    ///
    /// Order: `{L}`, `{l}`, then the legacy `` L`X` `` inline code form.
    /// The legacy form needs a word boundary before `L`, so the `L` of a
    /// `` dL`X` `` directive is never consumed here.
    #[must_use]
    pub fn with_standard_rules() -> Self {
        let legacy_code = Regex::new(r"\bL`([^`\n]+)`").expect("legacy code pattern is valid");
        Self::new()
            .with_literal("{L}", "λ-calculus")
            .with_literal("{l}", "λ")
            .with_rule(MacroRule::new(legacy_code, |caps| {
                format!("<code>{}</code>", &caps[1])
            }))
    }

    /// Append a rule. It runs after every rule already in the set.
    #[must_use]
    pub fn with_rule(mut self, rule: MacroRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a literal token replacement.
    #[must_use]
    pub fn with_literal(self, token: &str, text: impl Into<String>) -> Self {
        self.with_rule(MacroRule::literal(token, text))
    }

    /// Apply all rules in order, feeding each rule the previous output.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.rules
            .iter()
            .fold(Cow::Borrowed(text), |acc, rule| {
                let rewritten = match rule.apply(&acc) {
                    Cow::Owned(next) => Some(next),
                    Cow::Borrowed(_) => None,
                };
                rewritten.map_or(acc, Cow::Owned)
            })
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl SourceRule for MacroSet {
    fn name(&self) -> &str {
        "lambda_macros"
    }

    fn apply<'t>(&self, source: &'t str) -> Cow<'t, str> {
        MacroSet::apply(self, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_tokens() {
        let out = MacroSet::standard().apply("{L} and {l}");
        assert_eq!(out, "λ-calculus and λ");
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        let out = MacroSet::standard().apply("nothing to see here");
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_legacy_inline_code() {
        let out = MacroSet::standard().apply(r"try L`\x.x` now");
        assert_eq!(out, r"try <code>\x.x</code> now");
    }

    #[test]
    fn test_legacy_does_not_touch_definable_directive() {
        let out = MacroSet::standard().apply(r"dL`I = \x.x`");
        assert_eq!(out, r"dL`I = \x.x`");
    }

    #[test]
    fn test_legacy_does_not_touch_static_directive() {
        let out = MacroSet::standard().apply(r"l`\x.x`");
        assert_eq!(out, r"l`\x.x`");
    }

    #[test]
    fn test_legacy_unterminated_passes_through() {
        let out = MacroSet::standard().apply("L`open\nspan`");
        assert_eq!(out, "L`open\nspan`");
    }

    #[test]
    fn test_sequential_application() {
        let bang = Regex::new("A").unwrap();
        let set = MacroSet::new()
            .with_literal("{L}", "A")
            .with_rule(MacroRule::new(bang, |caps| format!("{}!", &caps[0])));
        assert_eq!(set.apply("{L}"), "A!");
    }

    #[test]
    fn test_order_is_significant() {
        let bang = Regex::new("A").unwrap();
        let set = MacroSet::new()
            .with_rule(MacroRule::new(bang, |caps| format!("{}!", &caps[0])))
            .with_literal("{L}", "A");
        assert_eq!(set.apply("{L}"), "A");
    }

    #[test]
    fn test_literal_is_not_a_pattern() {
        let set = MacroSet::new().with_literal("{Y}", "Y combinator");
        assert_eq!(set.apply("the {Y} and Y"), "the Y combinator and Y");
        assert_eq!(set.rules[0].pattern(), r"\{Y\}");
    }

    #[test]
    fn test_standard_rule_count() {
        assert_eq!(MacroSet::standard().len(), 3);
        assert!(MacroSet::new().is_empty());
    }
}
