//! Directive recognition.
//!
//! All four shapes live in one alternation so a single left-to-right scan
//! finds them. Fenced blocks are matched whole, which keeps inline markers
//! inside their bodies from being rewritten separately.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::Directive;

/// Combined directive pattern.
///
/// - fences are anchored to line start and the closer must be alone on its line
/// - `lambda-defs` body is exactly one line
/// - `lambda-interactive` body is `CONTEXT`, `---TITLE`, then the expression
///   up to the first closing fence (non-greedy, may span lines, trailing
///   blank lines dropped)
/// - inline forms need a word boundary before the marker and a body with no
///   backtick or newline
static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)",
        r"^```lambda-defs[ \t]*\n(?P<defs_file>[^\n]*)\n```[ \t]*$",
        r"|^```lambda-interactive[ \t]*\n(?P<ctx>[^\n]*)\n---(?P<title>[^\n]*)\n(?P<iexp>(?s:.*?))\n```[ \t]*$",
        r"|\bdL`(?P<def_exp>[^`\n]+)`",
        r"|\bl`(?P<static_exp>[^`\n]+)`",
    ))
    .expect("directive pattern is valid")
});

pub(crate) fn directive_regex() -> &'static Regex {
    &DIRECTIVE_RE
}

/// Build a directive from one match of [`directive_regex`].
///
/// `haystack` is the full text the match came from; it is needed to decide
/// whether a definition stands on its own line. Returns `None` when the
/// match is syntactically present but unusable (an empty definitions path).
pub(crate) fn parse_captures(caps: &Captures<'_>, haystack: &str) -> Option<Directive> {
    if let Some(file) = caps.name("defs_file") {
        let file = file.as_str().trim();
        if file.is_empty() {
            return None;
        }
        return Some(Directive::DefinitionsListing {
            file: file.to_owned(),
        });
    }

    if let (Some(ctx), Some(title), Some(exp)) = (caps.name("ctx"), caps.name("title"), caps.name("iexp"))
    {
        return Some(Directive::InteractiveBlock {
            context: ctx.as_str().trim().to_owned(),
            title: title.as_str().trim().to_owned(),
            exp: exp.as_str().trim_end().to_owned(),
        });
    }

    if let Some(exp) = caps.name("def_exp") {
        let whole = caps.get(0)?;
        return Some(Directive::DefinableBlock {
            exp: exp.as_str().to_owned(),
            block: stands_alone(haystack, whole.start(), whole.end()),
        });
    }

    caps.name("static_exp").map(|exp| Directive::StaticRef {
        exp: exp.as_str().to_owned(),
    })
}

/// Whether `haystack[start..end]` has only whitespace around it on its line.
fn stands_alone(haystack: &str, start: usize, end: usize) -> bool {
    let line_start = haystack[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = haystack[end..].find('\n').map_or(haystack.len(), |i| end + i);
    haystack[line_start..start].trim().is_empty() && haystack[end..line_end].trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(text: &str) -> Option<Directive> {
        let caps = directive_regex().captures(text)?;
        parse_captures(&caps, text)
    }

    #[test]
    fn test_static_ref() {
        assert_eq!(
            first("see l`x y` here"),
            Some(Directive::StaticRef {
                exp: "x y".to_owned()
            })
        );
    }

    #[test]
    fn test_static_ref_needs_word_boundary() {
        assert_eq!(first("all`x`"), None);
    }

    #[test]
    fn test_definable_block_alone() {
        assert_eq!(
            first("intro\n  dL`I = \\x.x`  \nmore"),
            Some(Directive::DefinableBlock {
                exp: r"I = \x.x".to_owned(),
                block: true,
            })
        );
    }

    #[test]
    fn test_definable_block_inline() {
        assert_eq!(
            first("define dL`K` here"),
            Some(Directive::DefinableBlock {
                exp: "K".to_owned(),
                block: false,
            })
        );
    }

    #[test]
    fn test_defs_block() {
        assert_eq!(
            first("```lambda-defs\nfoo/bar.defs\n```"),
            Some(Directive::DefinitionsListing {
                file: "foo/bar.defs".to_owned()
            })
        );
    }

    #[test]
    fn test_defs_block_empty_path() {
        assert_eq!(first("```lambda-defs\n   \n```"), None);
    }

    #[test]
    fn test_interactive_block() {
        assert_eq!(
            first("```lambda-interactive\nctx1\n---mytitle\n(\\x.x) y\n```"),
            Some(Directive::InteractiveBlock {
                context: "ctx1".to_owned(),
                title: "mytitle".to_owned(),
                exp: r"(\x.x) y".to_owned(),
            })
        );
    }

    #[test]
    fn test_interactive_trailing_blank_lines_dropped() {
        assert_eq!(
            first("```lambda-interactive\nc\n---t\n  x\n\n  \n```"),
            Some(Directive::InteractiveBlock {
                context: "c".to_owned(),
                title: "t".to_owned(),
                exp: "  x".to_owned(),
            })
        );
    }

    #[test]
    fn test_no_directive() {
        assert!(directive_regex().captures("plain `code` text").is_none());
    }

    #[test]
    fn test_stands_alone() {
        let text = "a\n  X \nb";
        assert!(stands_alone(text, 4, 5));
        assert!(!stands_alone("a X", 2, 3));
    }
}
