//! Markdown renderer.
//!
//! Emits a Markdown dialect with raw HTML for constructs Markdown has no
//! syntax for (tables, infoboxes, buttons). Whitespace is driven by the
//! sink's line-start cursor: block-level nodes are preceded by exactly one
//! blank line and inline nodes are separated by at most one space.
//!
//! Two conventions are in use in the wild and both are kept, selected through
//! [`MarkdownOptions`]:
//! - classic: headings one notch below the lab title (`level + 1` hashes),
//!   padded italics, indented terminal transcripts;
//! - style guide: headings at `level` hashes, bare italics, terminal
//!   transcripts as fenced `bash` blocks.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::render_html::{ContentRenderer, html_content};
use crate::sink::Sink;
use crate::types::{
    ButtonNode, CodeNode, GridNode, HeaderNode, ImageNode, InfoboxNode, ItemsListNode, ListNode,
    Node, TextNode, UrlNode,
};

/// Indent applied to every line of an indented terminal transcript.
const TERMINAL_INDENT: &str = "    ";

/// Longest `#` run Markdown reads as a heading.
const MAX_HEADING_MARKERS: usize = 6;

/// How header levels map to runs of `#`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevels {
    /// `level + 1` hashes, keeping every heading one notch below the lab title.
    #[default]
    Nested,
    /// Exactly `level` hashes, so level 0 carries no marker at all.
    Flat,
}

impl HeadingLevels {
    /// Number of `#` emitted for `level`, capped at six.
    pub fn marker_len(self, level: usize) -> usize {
        let len = match self {
            HeadingLevels::Nested => level.saturating_add(1),
            HeadingLevels::Flat => level,
        };
        len.min(MAX_HEADING_MARKERS)
    }
}

/// How terminal transcripts are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalCode {
    /// Every line indented by four spaces.
    #[default]
    Indented,
    /// A fenced block, like any other code.
    Fenced,
}

/// Named presets for [`MarkdownOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flavor {
    #[default]
    Classic,
    StyleGuide,
}

impl Flavor {
    pub fn options(self) -> MarkdownOptions {
        match self {
            Flavor::Classic => MarkdownOptions::default(),
            Flavor::StyleGuide => MarkdownOptions::style_guide(),
        }
    }
}

/// Per-deployment Markdown conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkdownOptions {
    pub heading_levels: HeadingLevels,
    /// Surround italic markers with spaces (` *x* `) so they never touch
    /// neighbouring punctuation.
    pub italic_padding: bool,
    pub terminal_code: TerminalCode,
    /// Language tag for fenced terminal blocks. Falls back to the node's own
    /// language when unset.
    pub terminal_lang: Option<String>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            heading_levels: HeadingLevels::Nested,
            italic_padding: true,
            terminal_code: TerminalCode::Indented,
            terminal_lang: None,
        }
    }
}

impl MarkdownOptions {
    pub fn style_guide() -> Self {
        Self {
            heading_levels: HeadingLevels::Flat,
            italic_padding: false,
            terminal_code: TerminalCode::Fenced,
            terminal_lang: Some("bash".to_string()),
        }
    }
}

/// Render `nodes` as classic-flavored Markdown for the target environment.
pub fn to_markdown(nodes: &[Node], env: &str) -> Result<String, RenderError> {
    to_markdown_with(nodes, env, &MarkdownOptions::default())
}

/// Render `nodes` as Markdown using `options`.
pub fn to_markdown_with(
    nodes: &[Node],
    env: &str,
    options: &MarkdownOptions,
) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    write_markdown(&mut buf, nodes, env, options)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Same as [`to_markdown_with`] but streams the output into `w`.
///
/// Bytes written before a failure stay in `w`.
pub fn write_markdown<W: Write>(
    w: W,
    nodes: &[Node],
    env: &str,
    options: &MarkdownOptions,
) -> Result<(), RenderError> {
    MarkdownWriter::new(w, env, options).write(nodes)
}

/// Stateful Markdown writer.
///
/// Tables and infoboxes are handed to a [`ContentRenderer`], the HTML
/// backend unless replaced with [`MarkdownWriter::with_fallback`]. The
/// fallback writes through the same sink, so its output moves the cursor and
/// its failures become this writer's sticky error.
pub struct MarkdownWriter<'a, W> {
    out: Sink<W>,
    env: &'a str,
    options: &'a MarkdownOptions,
    fallback: ContentRenderer,
}

impl<'a, W: Write> MarkdownWriter<'a, W> {
    pub fn new(w: W, env: &'a str, options: &'a MarkdownOptions) -> Self {
        Self {
            out: Sink::new(w),
            env,
            options,
            fallback: html_content,
        }
    }

    pub fn with_fallback(mut self, fallback: ContentRenderer) -> Self {
        self.fallback = fallback;
        self
    }

    /// Render `nodes`, continuing from wherever earlier calls left the cursor.
    pub fn write(&mut self, nodes: &[Node]) -> Result<(), RenderError> {
        tracing::debug!(env = self.env, nodes = nodes.len(), "Rendering Markdown");
        self.write_nodes(nodes)
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_nodes(&mut self, nodes: &[Node]) -> Result<(), RenderError> {
        for node in nodes {
            self.out.check()?;
            if !node.env().matches(self.env) {
                tracing::trace!(kind = node.kind_name(), env = self.env, "Skipping node");
                continue;
            }
            match node {
                Node::Text(n) => self.text(n)?,
                Node::Image(n) => self.image(n)?,
                Node::Url(n) => self.url(n)?,
                // Buttons with a destination arrive wrapped in a Url node;
                // a bare one links nowhere.
                Node::Button(n) => self.button(n, None)?,
                Node::Code(n) => self.code(n)?,
                Node::List(n) => self.list(n)?,
                Node::Import(n) => self.write_nodes(&n.content)?,
                Node::ItemsList(n) => self.items_list(n)?,
                Node::Grid(n) => self.grid(n)?,
                Node::Infobox(n) => self.infobox(n)?,
                Node::Header(n) => self.header(n)?,
                Node::Survey(_) | Node::YouTube(_) => {
                    tracing::debug!(kind = node.kind_name(), "Node kind has no Markdown form");
                }
            }
        }
        self.out.check()
    }

    fn text(&mut self, n: &TextNode) -> Result<(), RenderError> {
        let (italic_open, italic_close) = if self.options.italic_padding {
            (" *", "* ")
        } else {
            ("*", "*")
        };
        if n.bold {
            self.out.write_str("__")?;
        }
        if n.italic {
            self.out.write_str(italic_open)?;
        }
        if n.code {
            self.out.write_str("`")?;
        }
        self.out.write_str(&n.value)?;
        if n.code {
            self.out.write_str("`")?;
        }
        if n.italic {
            self.out.write_str(italic_close)?;
        }
        if n.bold {
            self.out.write_str("__")?;
        }
        Ok(())
    }

    fn image(&mut self, n: &ImageNode) -> Result<(), RenderError> {
        self.out.space()?;
        self.out
            .write_args(format_args!("![{}]({})", base_name(&n.src), n.src))
    }

    fn url(&mut self, n: &UrlNode) -> Result<(), RenderError> {
        // Markdown has no buttons: a linked button becomes a raw anchor.
        if let Some(button) = n.button(self.env) {
            return self.button(button, n.url.as_deref());
        }

        self.out.space()?;
        let label = self.label(&n.content);
        match n.url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => self.out.write_args(format_args!("[{label}]({url})")),
            None => self.out.write_str(&label),
        }
    }

    fn button(&mut self, n: &ButtonNode, url: Option<&str>) -> Result<(), RenderError> {
        let url = url.filter(|u| !u.is_empty()).unwrap_or("#");
        self.out.space()?;
        self.out
            .write_str(r#"<a class="codelabs-downloadbutton" href=""#)?;
        self.out.write_escaped(url)?;
        self.out.write_str(r#"" target="_blank">"#)?;
        let label = self.label(&n.content);
        self.out.write_str(&label)?;
        self.out.write_str("</a>")
    }

    fn code(&mut self, n: &CodeNode) -> Result<(), RenderError> {
        self.out.new_block()?;
        if n.term && self.options.terminal_code == TerminalCode::Indented {
            self.out.write_str(&indent_lines(&n.value, TERMINAL_INDENT))?;
        } else {
            let lang = if n.term {
                self.options.terminal_lang.as_deref().or(n.lang.as_deref())
            } else {
                n.lang.as_deref()
            };
            self.out.write_str("```")?;
            self.out.write_str(lang.unwrap_or(""))?;
            self.out.write_str("\n")?;
            self.out.write_str(&n.value)?;
            self.out.ensure_newline()?;
            self.out.write_str("```")?;
        }
        self.out.ensure_newline()
    }

    fn list(&mut self, n: &ListNode) -> Result<(), RenderError> {
        if n.is_block() {
            self.out.new_block()?;
        }
        self.write_nodes(&n.nodes)?;
        self.out.ensure_newline()
    }

    fn items_list(&mut self, n: &ItemsListNode) -> Result<(), RenderError> {
        self.out.new_block()?;
        for (i, item) in n.items.iter().enumerate() {
            if n.is_numbered() {
                self.out.write_args(format_args!("{}. ", n.start.saturating_add(i)))?;
            } else {
                self.out.write_str("* ")?;
            }
            self.write_nodes(item)?;
            self.out.ensure_newline()?;
        }
        Ok(())
    }

    fn grid(&mut self, n: &GridNode) -> Result<(), RenderError> {
        self.out.new_block()?;
        self.out.write_str("<table>\n")?;
        for row in &n.rows {
            self.out.write_str("<tr>")?;
            for cell in row {
                self.out.write_args(format_args!(
                    r#"<td colspan="{}" rowspan="{}">"#,
                    cell.colspan, cell.rowspan
                ))?;
                self.delegate(&cell.content)?;
                self.out.write_str("</td>")?;
            }
            self.out.write_str("</tr>\n")?;
        }
        self.out.write_str("</table>")
    }

    fn infobox(&mut self, n: &InfoboxNode) -> Result<(), RenderError> {
        self.out.new_block()?;
        self.out
            .write_str(r#"<div class="codelabs-infobox codelabs-infobox-"#)?;
        self.out.write_escaped(&n.kind)?;
        self.out.write_str(r#"">"#)?;
        self.delegate(&n.content)?;
        self.out.write_str("</div>")
    }

    fn header(&mut self, n: &HeaderNode) -> Result<(), RenderError> {
        self.out.new_block()?;
        let hashes = self.options.heading_levels.marker_len(n.level);
        self.out.write_str(&"#".repeat(hashes))?;
        self.out.write_str(" ")?;
        self.write_nodes(&n.content)?;
        self.out.ensure_newline()
    }

    /// Render `nodes` with the fallback backend into this writer's sink.
    fn delegate(&mut self, nodes: &[Node]) -> Result<(), RenderError> {
        self.out.check()?;
        let fallback = self.fallback;
        if let Err(err) = fallback(&mut self.out, nodes, self.env) {
            return Err(self.out.fail(err));
        }
        Ok(())
    }

    /// Literal text of the visible text children; everything else is dropped.
    fn label(&self, content: &[Node]) -> String {
        content
            .iter()
            .filter(|child| child.env().matches(self.env))
            .filter_map(|child| match child {
                Node::Text(t) => Some(t.value.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Final segment of a slash-separated path, ignoring trailing slashes.
fn base_name(src: &str) -> &str {
    if src.is_empty() {
        return ".";
    }
    let trimmed = src.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}

/// Prefix every line of `s` with `prefix`, including the line after each
/// embedded newline.
fn indent_lines(s: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(s.len() + prefix.len());
    let mut line_start = true;
    for c in s.chars() {
        if line_start {
            out.push_str(prefix);
        }
        out.push(c);
        line_start = c == '\n';
    }
    out
}
