//! Footnote references, definitions and back-reference anchors.
//!
//! Footnote markup follows the common `footnote-ref` / `footnote-item` /
//! `footnote-backref` shape. The back-reference anchor is a replaceable
//! render rule named [`FOOTNOTE_ANCHOR_RULE`]; the pipeline installs
//! [`BackrefAnchor`] in place of [`DefaultFootnoteAnchor`].
//!
//! Repeated references to one footnote get increasing sub-ids. The first
//! reference has sub-id 0 and keeps the plain anchor name, later ones are
//! suffixed with `:N` so every reference has its own back-link.

use std::collections::HashMap;
use std::fmt::Write;

/// Name of the back-reference anchor rule.
pub const FOOTNOTE_ANCHOR_RULE: &str = "footnote_anchor";

/// Per-document values visible to render rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderEnv {
    /// Optional document id, prefixed to footnote anchor names so several
    /// documents can share one page.
    pub doc_id: Option<String>,
}

impl RenderEnv {
    /// Environment with a document id.
    #[must_use]
    pub fn with_doc_id(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: Some(doc_id.into()),
        }
    }
}

/// One footnote reference in the token stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FootnoteToken {
    /// Footnote number, zero-based, in order of first reference.
    pub id: usize,
    /// Occurrence of this reference among references to the same footnote.
    pub sub_id: usize,
    /// Footnote label as written in the source.
    pub label: String,
}

/// Naming helper shared by the footnote rules.
pub trait FootnoteNaming: Send + Sync {
    /// Base anchor name for the token at `idx`, without any sub-id suffix.
    fn anchor_name(&self, tokens: &[FootnoteToken], idx: usize, env: &RenderEnv) -> String;

    /// Visible caption of a reference, e.g. `[2]` or `[2:1]`.
    fn caption(&self, tokens: &[FootnoteToken], idx: usize, _env: &RenderEnv) -> String {
        let Some(token) = tokens.get(idx) else {
            return String::new();
        };
        let mut n = (token.id + 1).to_string();
        if token.sub_id > 0 {
            write!(n, ":{}", token.sub_id).unwrap();
        }
        format!("[{n}]")
    }
}

/// Standard naming: the one-based footnote number, prefixed with
/// `-{doc_id}-` when the environment has a document id.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardNaming;

impl FootnoteNaming for StandardNaming {
    fn anchor_name(&self, tokens: &[FootnoteToken], idx: usize, env: &RenderEnv) -> String {
        let Some(token) = tokens.get(idx) else {
            return String::new();
        };
        let n = token.id + 1;
        match &env.doc_id {
            Some(doc_id) => format!("-{doc_id}-{n}"),
            None => n.to_string(),
        }
    }
}

/// Render rule for the back-reference anchor at the end of a footnote.
pub trait FootnoteAnchorRule: Send + Sync {
    /// Rule name. Rules replace each other by name.
    fn name(&self) -> &str {
        FOOTNOTE_ANCHOR_RULE
    }

    /// Render the anchor for `tokens[idx]`.
    fn render(
        &self,
        tokens: &[FootnoteToken],
        idx: usize,
        env: &RenderEnv,
        naming: &dyn FootnoteNaming,
    ) -> String;
}

/// Anchor name with the `:sub_id` suffix for repeated references.
fn suffixed_anchor(
    tokens: &[FootnoteToken],
    idx: usize,
    env: &RenderEnv,
    naming: &dyn FootnoteNaming,
) -> Option<String> {
    let token = tokens.get(idx)?;
    let mut id = naming.anchor_name(tokens, idx, env);
    if token.sub_id > 0 {
        write!(id, ":{}", token.sub_id).unwrap();
    }
    Some(id)
}

/// Stock anchor: a space, then the arrow with a text presentation selector.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFootnoteAnchor;

impl FootnoteAnchorRule for DefaultFootnoteAnchor {
    fn render(
        &self,
        tokens: &[FootnoteToken],
        idx: usize,
        env: &RenderEnv,
        naming: &dyn FootnoteNaming,
    ) -> String {
        suffixed_anchor(tokens, idx, env, naming).map_or_else(String::new, |id| {
            format!(" <a href=\"#fnref{id}\" class=\"footnote-backref\">\u{21a9}\u{fe0e}</a>")
        })
    }
}

/// Site anchor: no leading space and a plain `↩︎` glyph, styled through the
/// `footnote-backref` class.
#[derive(Clone, Copy, Debug, Default)]
pub struct BackrefAnchor;

impl FootnoteAnchorRule for BackrefAnchor {
    fn render(
        &self,
        tokens: &[FootnoteToken],
        idx: usize,
        env: &RenderEnv,
        naming: &dyn FootnoteNaming,
    ) -> String {
        suffixed_anchor(tokens, idx, env, naming).map_or_else(String::new, |id| {
            format!(r##"<a href="#fnref{id}" class="footnote-backref">↩︎</a>"##)
        })
    }
}

/// Render a footnote reference (`<sup>` link to the footnote body).
pub(crate) fn render_reference(
    token: &FootnoteToken,
    env: &RenderEnv,
    naming: &dyn FootnoteNaming,
) -> String {
    let tokens = std::slice::from_ref(token);
    let id = naming.anchor_name(tokens, 0, env);
    let refid = suffixed_anchor(tokens, 0, env, naming).unwrap_or_default();
    let caption = naming.caption(tokens, 0, env);
    format!(r##"<sup class="footnote-ref"><a href="#fn{id}" id="fnref{refid}">{caption}</a></sup>"##)
}

/// Footnotes seen while rendering one document.
#[derive(Debug, Default)]
pub(crate) struct FootnoteCollector {
    ids: HashMap<String, usize>,
    /// Label and reference count, indexed by footnote id.
    refs: Vec<(String, usize)>,
    definitions: HashMap<String, String>,
}

impl FootnoteCollector {
    /// Record a reference to `label` and return its token.
    pub(crate) fn reference(&mut self, label: &str) -> FootnoteToken {
        let next_id = self.refs.len();
        let id = *self.ids.entry(label.to_owned()).or_insert(next_id);
        if id == next_id {
            self.refs.push((label.to_owned(), 0));
        }
        let sub_id = self.refs[id].1;
        self.refs[id].1 += 1;
        FootnoteToken {
            id,
            sub_id,
            label: label.to_owned(),
        }
    }

    /// Store the rendered body of a footnote definition.
    pub(crate) fn define(&mut self, label: &str, html: String) {
        self.definitions.insert(label.to_owned(), html);
    }

    /// Render the footnote list. Empty when nothing was referenced.
    pub(crate) fn render_section(
        &self,
        env: &RenderEnv,
        naming: &dyn FootnoteNaming,
        anchor: &dyn FootnoteAnchorRule,
    ) -> String {
        if self.refs.is_empty() {
            return String::new();
        }

        let mut out = String::from(
            "<hr class=\"footnotes-sep\">\n<section class=\"footnotes\">\n<ol class=\"footnotes-list\">\n",
        );
        for (id, (label, count)) in self.refs.iter().enumerate() {
            let tokens: Vec<FootnoteToken> = (0..*count)
                .map(|sub_id| FootnoteToken {
                    id,
                    sub_id,
                    label: label.clone(),
                })
                .collect();
            let name = naming.anchor_name(&tokens, 0, env);
            let anchors: String = (0..tokens.len())
                .map(|idx| anchor.render(&tokens, idx, env, naming))
                .collect();

            let body = self.definitions.get(label).map_or("", String::as_str);
            write!(out, r#"<li id="fn{name}" class="footnote-item">"#).unwrap();
            // Anchors go inside the last paragraph when there is one.
            match body.strip_suffix("</p>") {
                Some(head) => write!(out, "{head}{anchors}</p>").unwrap(),
                None => write!(out, "{body}{anchors}").unwrap(),
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ol>\n</section>\n");
        out
    }
}
