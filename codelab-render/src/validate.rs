//! Producer-contract checks for node trees.
//!
//! Walks the whole tree regardless of environment and reports input the
//! renderers would mishandle or silently drop. Returns a list of
//! `Diagnostic` items (non-fatal).

use crate::error::{Diagnostic, Severity};
use crate::types::{Env, Node};

/// Validate a node sequence and return any diagnostics.
///
/// This function never modifies the tree.
pub fn validate(nodes: &[Node]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_nodes(nodes, "", &mut diagnostics);
    diagnostics
}

fn validate_nodes(nodes: &[Node], parent: &str, diagnostics: &mut Vec<Diagnostic>) {
    for (i, node) in nodes.iter().enumerate() {
        let path = format!("{parent}[{i}]");
        validate_env(node.env(), &path, diagnostics);
        validate_node(node, &path, diagnostics);
    }
}

fn push(
    diagnostics: &mut Vec<Diagnostic>,
    severity: Severity,
    code: &str,
    path: &str,
    message: impl Into<String>,
) {
    diagnostics.push(Diagnostic {
        severity,
        message: message.into(),
        path: path.to_string(),
        code: Some(code.into()),
    });
}

fn validate_env(env: &Env, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let labels = env.labels();
    if labels.windows(2).any(|w| w[0] > w[1]) {
        push(
            diagnostics,
            Severity::Error,
            "V001",
            path,
            format!("Environment labels are not sorted: {labels:?}"),
        );
    }
    if labels.windows(2).any(|w| w[0] == w[1]) {
        push(
            diagnostics,
            Severity::Warning,
            "V002",
            path,
            "Environment labels contain duplicates",
        );
    }
}

fn validate_node(node: &Node, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    match node {
        Node::Text(_) | Node::Code(_) => {}

        Node::Image(n) => {
            if n.src.is_empty() {
                push(
                    diagnostics,
                    Severity::Error,
                    "V010",
                    path,
                    "Image is missing its source",
                );
            }
        }

        Node::Url(n) => {
            let has_url = n.url.as_deref().is_some_and(|u| !u.is_empty());
            let has_name = n.name.as_deref().is_some_and(|u| !u.is_empty());
            if !has_url && !has_name {
                push(
                    diagnostics,
                    Severity::Warning,
                    "V050",
                    path,
                    "Link has neither a destination nor an anchor name",
                );
            }
            validate_nodes(&n.content, &format!("{path}.content"), diagnostics);
        }

        Node::Button(n) => validate_nodes(&n.content, &format!("{path}.content"), diagnostics),

        Node::List(n) => validate_nodes(&n.nodes, &format!("{path}.nodes"), diagnostics),

        Node::ItemsList(n) => {
            if n.items.is_empty() {
                push(
                    diagnostics,
                    Severity::Warning,
                    "V060",
                    path,
                    "List has no items",
                );
            }
            for (i, item) in n.items.iter().enumerate() {
                validate_nodes(item, &format!("{path}.items[{i}]"), diagnostics);
            }
        }

        Node::Grid(n) => {
            if n.rows.is_empty() {
                push(
                    diagnostics,
                    Severity::Warning,
                    "V031",
                    path,
                    "Table has no rows",
                );
            }
            for (r, row) in n.rows.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    let cell_path = format!("{path}.rows[{r}][{c}]");
                    if cell.colspan == 0 || cell.rowspan == 0 {
                        push(
                            diagnostics,
                            Severity::Error,
                            "V030",
                            &cell_path,
                            format!(
                                "Table cell spans must be at least 1 (colspan={}, rowspan={})",
                                cell.colspan, cell.rowspan
                            ),
                        );
                    }
                    validate_nodes(&cell.content, &format!("{cell_path}.content"), diagnostics);
                }
            }
        }

        Node::Infobox(n) => validate_nodes(&n.content, &format!("{path}.content"), diagnostics),

        Node::Header(n) => {
            if n.level > 5 {
                push(
                    diagnostics,
                    Severity::Warning,
                    "V020",
                    path,
                    format!("Header level {} is deeper than HTML allows; rendered as h6", n.level),
                );
            }
            validate_nodes(&n.content, &format!("{path}.content"), diagnostics);
        }

        Node::Import(n) => {
            if n.content.is_empty() {
                let source = n.url.as_deref().unwrap_or("unknown source");
                push(
                    diagnostics,
                    Severity::Info,
                    "V040",
                    path,
                    format!("Import from {source} has no resolved content and renders nothing"),
                );
            }
            validate_nodes(&n.content, &format!("{path}.content"), diagnostics);
        }

        Node::Survey(_) | Node::YouTube(_) => {
            push(
                diagnostics,
                Severity::Info,
                "V070",
                path,
                format!("{} nodes are not rendered by any backend", node.kind_name()),
            );
        }
    }
}
