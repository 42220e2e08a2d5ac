use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ExplainError, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub placeholder: PlaceholderConfig,
    pub html: HtmlConfig,
    pub typst: TypstConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Emitted verbatim for empty input.
    pub text: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            text: "No explanation available".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HtmlConfig {
    /// Class of the outer `<div>`. Empty means no wrapper.
    pub wrapper_class: String,
    pub title_tag: String,
    pub answer_class: String,
    /// Inline style for nested sub-detail lists.
    pub square_style: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            wrapper_class: "explanation".to_string(),
            title_tag: "h3".to_string(),
            answer_class: "correct-answer".to_string(),
            square_style: "list-style-type: square".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TypstConfig {
    pub title_level: u8,
    /// Lists with at most this many items (nested ones included) are kept on one page.
    pub keep_together_max_items: usize,
    pub answer_fill: String,
    pub square_marker: String,
}

impl Default for TypstConfig {
    fn default() -> Self {
        Self {
            title_level: 2,
            keep_together_max_items: 5,
            answer_fill: "luma(235)".to_string(),
            square_marker: "▪".to_string(),
        }
    }
}

const TITLE_TAGS: [&str; 8] = ["h1", "h2", "h3", "h4", "h5", "h6", "p", "div"];

impl Config {
    /// The bundled defaults from `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ExplainError::io(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ExplainError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the generated markup.
    pub fn validate(&self) -> Result<()> {
        if !TITLE_TAGS.contains(&self.html.title_tag.as_str()) {
            return Err(ExplainError::config(format!(
                "html.title_tag must be one of {}, got {:?}",
                TITLE_TAGS.join(", "),
                self.html.title_tag
            )));
        }
        if !(1..=6).contains(&self.typst.title_level) {
            return Err(ExplainError::config(format!(
                "typst.title_level must be between 1 and 6, got {}",
                self.typst.title_level
            )));
        }
        Ok(())
    }
}
