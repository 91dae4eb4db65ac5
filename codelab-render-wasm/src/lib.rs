//! WASM bindings for `codelab-render`.
//!
//! Exposes the renderers to JavaScript via wasm-bindgen. Node trees are
//! passed either as a JSON string or, for `render_html_value()`, as a plain
//! JS array.

use codelab_render::{Flavor, Node};
use wasm_bindgen::prelude::*;

/// Render a JSON node array as Markdown for `env`.
///
/// `style_guide` selects the style-guide convention (flat headings, fenced
/// terminal blocks) instead of the classic one.
#[wasm_bindgen]
pub fn render_markdown(json: &str, env: &str, style_guide: bool) -> Result<String, JsError> {
    markdown(json, env, style_guide).map_err(|e| JsError::new(&e))
}

/// Render a JSON node array as an HTML fragment for `env`.
#[wasm_bindgen]
pub fn render_html(json: &str, env: &str) -> Result<String, JsError> {
    html(json, env).map_err(|e| JsError::new(&e))
}

/// Render a JS array of node objects as an HTML fragment, skipping the JSON
/// round trip.
#[wasm_bindgen]
pub fn render_html_value(value: JsValue, env: &str) -> Result<String, JsError> {
    let nodes: Vec<Node> =
        serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&e.to_string()))?;
    codelab_render::to_html(&nodes, env).map_err(|e| JsError::new(&e.to_string()))
}

/// Validate a JSON node array and return diagnostics as JSON.
///
/// Returns a JSON array of `{ severity, message, path, code }` objects.
/// An empty array means the tree is valid.
#[wasm_bindgen]
pub fn validate(json: &str) -> Result<String, JsError> {
    diagnostics(json).map_err(|e| JsError::new(&e))
}

fn markdown(json: &str, env: &str, style_guide: bool) -> Result<String, String> {
    let nodes = codelab_render::from_json(json).map_err(|e| e.to_string())?;
    let flavor = if style_guide {
        Flavor::StyleGuide
    } else {
        Flavor::Classic
    };
    codelab_render::to_markdown_with(&nodes, env, &flavor.options()).map_err(|e| e.to_string())
}

fn html(json: &str, env: &str) -> Result<String, String> {
    let nodes = codelab_render::from_json(json).map_err(|e| e.to_string())?;
    codelab_render::to_html(&nodes, env).map_err(|e| e.to_string())
}

fn diagnostics(json: &str) -> Result<String, String> {
    let nodes = codelab_render::from_json(json).map_err(|e| e.to_string())?;
    serde_json::to_string(&codelab_render::validate(&nodes)).map_err(|e| e.to_string())
}
