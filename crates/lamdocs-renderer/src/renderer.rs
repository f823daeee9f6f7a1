//! HTML renderer over pulldown-cmark events.

use std::fmt::Write;
use std::sync::{Arc, LazyLock};

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::footnote::{
    BackrefAnchor, DefaultFootnoteAnchor, FootnoteAnchorRule, FootnoteCollector, FootnoteNaming,
    RenderEnv, StandardNaming, render_reference,
};
use crate::util::{Slugger, escape_html, unescape_attr};

/// `exp` attribute of a component tag.
static EXP_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sexp="([^"]*)""#).expect("valid exp attribute pattern"));

/// Heading entry for a table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Plain heading text.
    pub title: String,
    /// Anchor id.
    pub id: String,
}

/// Result of rendering one document.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Text of the first H1 (if title extraction was enabled).
    pub title: Option<String>,
    /// Headings other than the extracted title.
    pub toc: Vec<TocEntry>,
}

#[derive(Debug)]
struct OpenHeading {
    level: u8,
    start: usize,
    text: String,
}

#[derive(Debug, Default)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

impl TableState {
    fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }

    fn alignment_attr(&self) -> &'static str {
        match self.alignments.get(self.cell) {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            _ => "",
        }
    }
}

/// Markdown to HTML renderer.
///
/// One renderer handles one document. Footnote naming and the footnote
/// anchor rule are shared, so they are held behind `Arc`.
///
/// # Example
///
/// ```
/// use lamdocs_renderer::MarkdownRenderer;
///
/// let result = MarkdownRenderer::new()
///     .with_title_extraction()
///     .render_markdown("# Booleans\n\nTrue is `K`.");
/// assert_eq!(result.title.as_deref(), Some("Booleans"));
/// assert!(result.html.contains("<code>K</code>"));
/// ```
pub struct MarkdownRenderer {
    output: String,
    env: RenderEnv,
    naming: Arc<dyn FootnoteNaming>,
    anchor_rule: Arc<dyn FootnoteAnchorRule>,
    footnotes: FootnoteCollector,
    /// Output saved while a footnote definition is being rendered.
    outer_output: Option<(String, String)>,
    extract_title: bool,
    title: Option<String>,
    toc: Vec<TocEntry>,
    slugger: Slugger,
    heading: Option<OpenHeading>,
    code: Option<(Option<String>, String)>,
    image_start: Option<usize>,
    pending_image: Option<(String, String)>,
    table: TableState,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a renderer with the stock footnote anchor rule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            env: RenderEnv::default(),
            naming: Arc::new(StandardNaming),
            anchor_rule: Arc::new(DefaultFootnoteAnchor),
            footnotes: FootnoteCollector::default(),
            outer_output: None,
            extract_title: false,
            title: None,
            toc: Vec::new(),
            slugger: Slugger::default(),
            heading: None,
            code: None,
            image_start: None,
            pending_image: None,
            table: TableState::default(),
        }
    }

    /// Capture the first H1 as the document title. The heading is still rendered.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Set the render environment.
    #[must_use]
    pub fn with_env(mut self, env: RenderEnv) -> Self {
        self.env = env;
        self
    }

    /// Replace the footnote naming helper.
    #[must_use]
    pub fn with_footnote_naming(mut self, naming: Arc<dyn FootnoteNaming>) -> Self {
        self.naming = naming;
        self
    }

    /// Override the footnote anchor rule.
    #[must_use]
    pub fn with_footnote_anchor(mut self, rule: Arc<dyn FootnoteAnchorRule>) -> Self {
        tracing::trace!(rule = rule.name(), "footnote anchor rule overridden");
        self.anchor_rule = rule;
        self
    }

    /// Use the site back-reference anchor ([`BackrefAnchor`]).
    #[must_use]
    pub fn with_backref_anchor(self) -> Self {
        self.with_footnote_anchor(Arc::new(BackrefAnchor))
    }

    /// Parser options: tables, strikethrough, task lists and footnotes.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES
    }

    /// Parse and render markdown text.
    pub fn render_markdown(self, markdown: &str) -> RenderResult {
        self.render(Parser::new_ext(markdown, Self::parser_options()))
    }

    /// Render a stream of markdown events.
    pub fn render<'a, I>(mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        let section = self
            .footnotes
            .render_section(&self.env, self.naming.as_ref(), self.anchor_rule.as_ref());
        if !section.is_empty() {
            self.output.push('\n');
            self.output.push_str(&section);
        }

        RenderResult {
            html: self.output,
            title: self.title,
            toc: self.toc,
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(heading) = &mut self.heading {
                    heading.text.push_str(&code);
                }
                write!(self.output, "<code>{}</code>", escape_html(&code)).unwrap();
            }
            Event::Html(html) => self.output.push_str(&html),
            Event::InlineHtml(html) => {
                // Component tags contribute their expression to heading text.
                if let Some(heading) = &mut self.heading
                    && let Some(caps) = EXP_ATTR.captures(&html)
                {
                    heading.text.push_str(&unescape_attr(&caps[1]));
                }
                self.output.push_str(&html);
            }
            Event::FootnoteReference(label) => {
                let token = self.footnotes.reference(&label);
                let html = render_reference(&token, &self.env, self.naming.as_ref());
                self.output.push_str(&html);
            }
            Event::SoftBreak => self.output.push('\n'),
            Event::HardBreak => self.output.push_str("<br>\n"),
            Event::Rule => self.output.push_str("<hr>\n"),
            Event::TaskListMarker(checked) => {
                let attr = if checked { " checked" } else { "" };
                write!(self.output, r#"<input type="checkbox" disabled{attr}>"#).unwrap();
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.output.push_str(&escape_html(&math));
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                self.heading = Some(OpenHeading {
                    level: heading_level_to_num(level),
                    start: self.output.len(),
                    text: String::new(),
                });
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(ToOwned::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((lang, String::new()));
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>\n"),
            Tag::List(Some(start)) => writeln!(self.output, "<ol start=\"{start}\">").unwrap(),
            Tag::List(None) => self.output.push_str("<ul>\n"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(label) => {
                let outer = std::mem::take(&mut self.output);
                self.outer_output = Some((label.to_string(), outer));
            }
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.cell = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let tag = self.table.cell_tag();
                let align = self.table.alignment_attr();
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.output.push_str("<em>"),
            Tag::Strong => self.output.push_str("<strong>"),
            Tag::Strikethrough => self.output.push_str("<s>"),
            Tag::Superscript => self.output.push_str("<sup>"),
            Tag::Subscript => self.output.push_str("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                write!(self.output, r#"<a href="{}""#, escape_html(&dest_url)).unwrap();
                if !title.is_empty() {
                    write!(self.output, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                self.output.push('>');
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image_start = Some(self.output.len());
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::DefinitionList => self.output.push_str("<dl>\n"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>\n"),
            TagEnd::Heading(_) => self.end_heading(),
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => {
                if let Some((lang, content)) = self.code.take() {
                    match lang {
                        Some(lang) => writeln!(
                            self.output,
                            "<pre><code class=\"language-{}\">{}</code></pre>",
                            escape_html(&lang),
                            escape_html(&content)
                        )
                        .unwrap(),
                        None => writeln!(
                            self.output,
                            "<pre><code>{}</code></pre>",
                            escape_html(&content)
                        )
                        .unwrap(),
                    }
                }
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::FootnoteDefinition => {
                if let Some((label, outer)) = self.outer_output.take() {
                    let body = std::mem::replace(&mut self.output, outer);
                    self.footnotes.define(&label, body.trim_end().to_owned());
                }
            }
            TagEnd::Table => self.output.push_str("</tbody></table>\n"),
            TagEnd::TableHead => {
                self.table.in_head = false;
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                write!(self.output, "</{}>", self.table.cell_tag()).unwrap();
                self.table.cell += 1;
            }
            TagEnd::Emphasis => self.output.push_str("</em>"),
            TagEnd::Strong => self.output.push_str("</strong>"),
            TagEnd::Strikethrough => self.output.push_str("</s>"),
            TagEnd::Superscript => self.output.push_str("</sup>"),
            TagEnd::Subscript => self.output.push_str("</sub>"),
            TagEnd::Link => self.output.push_str("</a>"),
            TagEnd::Image => {
                let alt = self
                    .image_start
                    .take()
                    .map(|start| self.output.split_off(start))
                    .unwrap_or_default();
                if let Some((src, title)) = self.pending_image.take() {
                    write!(self.output, r#"<img src="{}" alt="{alt}""#, escape_html(&src)).unwrap();
                    if !title.is_empty() {
                        write!(self.output, r#" title="{}""#, escape_html(&title)).unwrap();
                    }
                    self.output.push('>');
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>\n"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>\n"),
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn end_heading(&mut self) {
        let Some(heading) = self.heading.take() else {
            return;
        };
        let html = self.output.split_off(heading.start);
        let text = heading.text.split_whitespace().collect::<Vec<_>>().join(" ");
        let id = self.slugger.slug(&text);
        let level = heading.level;
        write!(self.output, r#"<h{level} id="{id}">{}</h{level}>"#, html.trim()).unwrap();
        self.output.push('\n');

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(text);
        } else {
            self.toc.push(TocEntry {
                level,
                title: text,
                id,
            });
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, content)) = &mut self.code {
            content.push_str(text);
            return;
        }
        if let Some(heading) = &mut self.heading {
            heading.text.push_str(text);
        }
        self.output.push_str(&escape_html(text));
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
