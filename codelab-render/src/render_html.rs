//! HTML fragment renderer.
//!
//! Emits real tags for every node kind. Text and attribute values are
//! HTML-escaped. Block-level kinds are followed by a newline so the generated
//! markup stays readable. No `<html>`/`<body>` wrapper is produced.
//!
//! This backend doubles as the fallback the Markdown renderer uses for tables
//! and infoboxes, see [`html_content`].

use std::io::Write;

use crate::error::RenderError;
use crate::sink::Sink;
use crate::types::{
    ButtonNode, CodeNode, GridNode, HeaderKind, HeaderNode, ImageNode, InfoboxNode,
    ItemsListNode, ListKind, ListNode, Node, TextNode, UrlNode,
};

/// A function that renders a node sequence into a sink for a target
/// environment. The Markdown renderer holds one of these for constructs it
/// cannot express natively.
pub type ContentRenderer = fn(&mut dyn Write, &[Node], &str) -> Result<(), RenderError>;

/// Render `nodes` as an HTML fragment for the target environment `env`.
pub fn to_html(nodes: &[Node], env: &str) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    write_html(&mut buf, nodes, env)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Same as [`to_html`] but streams the markup into `w`.
///
/// Bytes written before a failure stay in `w`.
pub fn write_html<W: Write>(w: W, nodes: &[Node], env: &str) -> Result<(), RenderError> {
    tracing::debug!(env, nodes = nodes.len(), "Rendering HTML");
    let mut writer = HtmlWriter {
        out: Sink::new(w),
        env,
    };
    writer.write_nodes(nodes)
}

/// [`write_html`] as a [`ContentRenderer`].
pub fn html_content(w: &mut dyn Write, nodes: &[Node], env: &str) -> Result<(), RenderError> {
    write_html(w, nodes, env)
}

struct HtmlWriter<'e, W> {
    out: Sink<W>,
    env: &'e str,
}

impl<W: Write> HtmlWriter<'_, W> {
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
                Node::Button(n) => self.button(n)?,
                Node::Code(n) => {
                    self.code(n)?;
                    self.out.write_str("\n")?;
                }
                Node::List(n) => {
                    self.list(n)?;
                    self.out.write_str("\n")?;
                }
                Node::Import(n) => {
                    if n.content.is_empty() {
                        continue;
                    }
                    self.write_nodes(&n.content)?;
                    self.out.write_str("\n")?;
                }
                Node::ItemsList(n) => {
                    self.items_list(n)?;
                    self.out.write_str("\n")?;
                }
                Node::Grid(n) => {
                    self.grid(n)?;
                    self.out.write_str("\n")?;
                }
                Node::Infobox(n) => {
                    self.infobox(n)?;
                    self.out.write_str("\n")?;
                }
                Node::Header(n) => {
                    self.header(n)?;
                    self.out.write_str("\n")?;
                }
                // Reserved for embedding; nothing is emitted yet.
                Node::Survey(_) | Node::YouTube(_) => {
                    tracing::debug!(kind = node.kind_name(), "Node kind has no HTML form yet");
                }
            }
        }
        self.out.check()
    }

    fn text(&mut self, n: &TextNode) -> Result<(), RenderError> {
        if n.bold {
            self.out.write_str("<strong>")?;
        }
        if n.italic {
            self.out.write_str("<em>")?;
        }
        if n.code {
            self.out.write_str("<code>")?;
        }
        self.out.write_str(&escape_text(&n.value))?;
        if n.code {
            self.out.write_str("</code>")?;
        }
        if n.italic {
            self.out.write_str("</em>")?;
        }
        if n.bold {
            self.out.write_str("</strong>")?;
        }
        Ok(())
    }

    fn image(&mut self, n: &ImageNode) -> Result<(), RenderError> {
        self.out.write_str("<img")?;
        if let Some(width) = n.max_width.filter(|w| *w > 0.0) {
            self.out
                .write_args(format_args!(r#" style="max-width: {width:.2}px""#))?;
        }
        self.out.write_str(r#" src=""#)?;
        self.out.write_escaped(&n.src)?;
        self.out.write_str(r#"">"#)
    }

    fn url(&mut self, n: &UrlNode) -> Result<(), RenderError> {
        self.out.write_str("<a")?;
        self.attr("href", n.url.as_deref())?;
        self.attr("name", n.name.as_deref())?;
        self.attr("target", n.target.as_deref())?;
        self.out.write_str(">")?;
        self.write_nodes(&n.content)?;
        self.out.write_str("</a>")
    }

    fn button(&mut self, n: &ButtonNode) -> Result<(), RenderError> {
        self.out.write_str("<button")?;
        if n.colored {
            self.out.write_str(r#" class="codelabs-downloadbutton""#)?;
        }
        if n.raised {
            self.out.write_str(" raised")?;
        }
        self.out.write_str(">")?;
        if n.download {
            self.out
                .write_str(r#"<i class="material-icons">file_download</i>"#)?;
        }
        self.write_nodes(&n.content)?;
        self.out.write_str("</button>")
    }

    fn code(&mut self, n: &CodeNode) -> Result<(), RenderError> {
        self.out.write_str(r#"<pre class="prettyprint">"#)?;
        if !n.term {
            self.out.write_str("<code")?;
            if let Some(lang) = n.lang.as_deref().filter(|l| !l.is_empty()) {
                self.attr("language", Some(lang))?;
                self.attr("class", Some(lang))?;
            }
            self.out.write_str(">")?;
        }
        self.out.write_escaped(&n.value)?;
        if !n.term {
            self.out.write_str("</code>")?;
        }
        self.out.write_str("</pre>")
    }

    fn list(&mut self, n: &ListNode) -> Result<(), RenderError> {
        let wrap = n.is_block();
        if wrap {
            self.out.write_str("<p>")?;
        }
        self.write_nodes(&n.nodes)?;
        if wrap {
            self.out.write_str("</p>")?;
        }
        Ok(())
    }

    fn items_list(&mut self, n: &ItemsListNode) -> Result<(), RenderError> {
        let tag = if n.is_numbered() { "ol" } else { "ul" };
        self.out.write_args(format_args!("<{tag}"))?;
        match n.list_kind {
            ListKind::Checklist => self.out.write_str(r#" class="checklist""#)?,
            ListKind::Faq => self.out.write_str(r#" class="faq""#)?,
            ListKind::Plain | ListKind::Ordered => {
                self.attr("type", n.list_type.as_deref())?;
                if n.start > 0 {
                    self.out.write_args(format_args!(r#" start="{}""#, n.start))?;
                }
            }
        }
        self.out.write_str(">\n")?;

        for item in &n.items {
            self.out.write_str("<li>")?;
            self.write_nodes(item)?;
            self.out.write_str("</li>\n")?;
        }

        self.out.write_args(format_args!("</{tag}>"))
    }

    fn grid(&mut self, n: &GridNode) -> Result<(), RenderError> {
        self.out.write_str("<table>\n")?;
        for row in &n.rows {
            self.out.write_str("<tr>")?;
            for cell in row {
                self.out.write_args(format_args!(
                    r#"<td colspan="{}" rowspan="{}">"#,
                    cell.colspan, cell.rowspan
                ))?;
                self.write_nodes(&cell.content)?;
                self.out.write_str("</td>")?;
            }
            self.out.write_str("</tr>\n")?;
        }
        self.out.write_str("</table>")
    }

    fn infobox(&mut self, n: &InfoboxNode) -> Result<(), RenderError> {
        self.out.write_str(r#"<aside class=""#)?;
        self.out.write_escaped(&n.kind)?;
        self.out.write_str(r#"">"#)?;
        self.write_nodes(&n.content)?;
        self.out.write_str("</aside>")
    }

    fn header(&mut self, n: &HeaderNode) -> Result<(), RenderError> {
        // Level 0 is the lab title slot, so tags start one notch down at h1
        // for level 0 and stop at h6.
        let tag = format!("h{}", n.level.saturating_add(1).min(6));
        self.out.write_args(format_args!("<{tag}"))?;
        match n.header_kind {
            HeaderKind::Checklist => self.out.write_str(r#" class="checklist""#)?,
            HeaderKind::Faq => self.out.write_str(r#" class="faq""#)?,
            HeaderKind::Plain => {}
        }
        self.out.write_str(">")?;
        self.write_nodes(&n.content)?;
        self.out.write_args(format_args!("</{tag}>"))
    }

    /// Write ` name="value"` when `value` is set and non-empty.
    fn attr(&mut self, name: &str, value: Option<&str>) -> Result<(), RenderError> {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        self.out.write_args(format_args!(" {name}=\""))?;
        self.out.write_escaped(value)?;
        self.out.write_str("\"")
    }
}

/// Escape text content and turn embedded newlines into `<br>`.
fn escape_text(s: &str) -> String {
    crate::sink::escape_html(s).replace('\n', "<br>")
}
