//! `codelab-render`: Markdown and HTML backends for codelab document trees.
//!
//! A codelab arrives as a tree of [`Node`]s produced by an upstream parser.
//! This crate streams that tree into an output writer as Markdown (in either
//! the classic or style-guide convention) or as an HTML fragment, filtering
//! out nodes that do not belong to the target environment.
//!
//! # Quick start
//!
//! ```
//! use codelab_render::{Node, TextNode, to_html, to_markdown};
//!
//! let nodes = vec![
//!     Node::header(1, vec![Node::text("Intro")]),
//!     TextNode::new("hello").bold().into(),
//! ];
//! assert_eq!(to_markdown(&nodes, "web").unwrap(), "\n## Intro\n__hello__");
//! assert_eq!(to_html(&nodes, "web").unwrap(), "<h2>Intro</h2>\n<strong>hello</strong>");
//! ```

pub mod error;
pub mod render_html;
pub mod render_md;
pub mod sink;
pub mod types;
pub mod validate;

pub use error::*;
pub use render_html::{ContentRenderer, html_content, to_html, write_html};
pub use render_md::{
    Flavor, HeadingLevels, MarkdownOptions, MarkdownWriter, TerminalCode, to_markdown,
    to_markdown_with, write_markdown,
};
pub use types::*;
pub use validate::validate;

/// Parse a JSON array of nodes.
pub fn from_json(input: &str) -> Result<Vec<Node>, LoadError> {
    let nodes: Vec<Node> = serde_json::from_str(input)?;
    tracing::debug!(nodes = nodes.len(), "Loaded node tree");
    Ok(nodes)
}
