use anyhow::{Context, Result};
use codelab_render::{Flavor, HeadingLevels, MarkdownOptions, TerminalCode};
use serde::Deserialize;
use std::path::Path;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "codelab-render.json";

/// Top-level codelab-render.json schema.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Target environment; empty renders every node.
    #[serde(default)]
    pub env: String,

    #[serde(default)]
    pub format: Format,

    #[serde(default)]
    pub markdown: MarkdownConfig,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Markdown,
    Html,
}

/// Markdown section: a flavor preset plus optional per-field overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownConfig {
    #[serde(default)]
    pub flavor: Flavor,

    #[serde(default)]
    pub heading_levels: Option<HeadingLevels>,

    #[serde(default)]
    pub italic_padding: Option<bool>,

    #[serde(default)]
    pub terminal_code: Option<TerminalCode>,

    #[serde(default)]
    pub terminal_lang: Option<String>,
}

impl MarkdownConfig {
    /// Resolve the writer options. `flavor` replaces the configured preset;
    /// field overrides from the file still apply on top of it.
    pub fn options(&self, flavor: Option<Flavor>) -> MarkdownOptions {
        let mut options = flavor.unwrap_or(self.flavor).options();
        if let Some(levels) = self.heading_levels {
            options.heading_levels = levels;
        }
        if let Some(padding) = self.italic_padding {
            options.italic_padding = padding;
        }
        if let Some(code) = self.terminal_code {
            options.terminal_code = code;
        }
        if let Some(lang) = &self.terminal_lang {
            options.terminal_lang = Some(lang.clone());
        }
        options
    }
}

/// Load config from `explicit`, or from `codelab-render.json` in the working
/// directory, or return defaults if that file is missing.
///
/// An explicitly named file must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<RenderConfig> {
    let config_path = match explicit {
        Some(path) => path,
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if !default_path.exists() {
                tracing::debug!("No {CONFIG_FILE} found, using defaults");
                return Ok(RenderConfig::default());
            }
            default_path
        }
    };

    let raw = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: RenderConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "Loaded config");
    Ok(config)
}
