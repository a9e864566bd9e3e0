// Library exports for tabchart

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod graph;
pub mod output;
pub mod palette;
pub mod parser;
pub mod recipes;
pub mod stats;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    Png,
    #[serde(rename = "svg")]
    #[default]
    Svg,
}

/// Rendering configuration, deserialized from the `--options` JSON
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenderOptions {
    /// Figure width in inches; charts with their own figure size ignore this
    #[serde(default = "default_width")]
    pub width: f64,
    /// Figure height in inches; charts with their own figure size ignore this
    #[serde(default = "default_height")]
    pub height: f64,
    /// Resolution for file output
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Resolution for the interactive preview
    #[serde(default = "default_display_dpi")]
    pub display_dpi: u32,
    /// Format used when the output extension is not recognised
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
    /// Viewer program and arguments; the image path is appended
    #[serde(default)]
    pub viewer: Option<Vec<String>>,
}

fn default_width() -> f64 { 6.4 }
fn default_height() -> f64 { 4.8 }
fn default_dpi() -> u32 { 300 }
fn default_display_dpi() -> u32 { 100 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            dpi: default_dpi(),
            display_dpi: default_display_dpi(),
            format: OutputFormat::Svg,
            viewer: None,
        }
    }
}

impl RenderOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse render options")
    }

    /// Configured viewer, or the platform's default image opener
    pub fn viewer_command(&self) -> Vec<String> {
        if let Some(viewer) = &self.viewer {
            return viewer.clone();
        }

        let default: &[&str] = if cfg!(target_os = "macos") {
            &["open", "-W"]
        } else if cfg!(target_os = "windows") {
            &["cmd", "/C", "start", "/WAIT", ""]
        } else {
            &["xdg-open"]
        };
        default.iter().map(|s| s.to_string()).collect()
    }
}
