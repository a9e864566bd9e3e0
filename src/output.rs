// Chart output: file export or interactive display

use crate::graph::Chart;
use crate::{OutputFormat, RenderOptions};
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where a rendered chart goes
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// Hand the chart to an image viewer and wait for it to exit
    Display,
    /// Write the chart to this path
    File(PathBuf),
}

impl Destination {
    pub fn from_output(output: Option<PathBuf>) -> Self {
        match output {
            Some(path) => Destination::File(path),
            None => Destination::Display,
        }
    }
}

/// Render `chart` to `destination`
pub fn render(chart: &Chart, destination: &Destination, options: &RenderOptions) -> Result<()> {
    match destination {
        Destination::File(path) => write_file(chart, path, options),
        Destination::Display => display(chart, options),
    }
}

/// Output format for a path: its extension, else the configured default
pub fn format_for_path(path: &Path, default: &OutputFormat) -> OutputFormat {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "png" => OutputFormat::Png,
        "svg" => OutputFormat::Svg,
        _ => default.clone(),
    }
}

/// Largest canvas, in pixels, that a chart may be rendered to
pub const MAX_PIXELS: u64 = 1 << 28;

/// Pixel dimensions for a chart at the given DPI
pub fn pixel_size(chart: &Chart, options: &RenderOptions, dpi: u32) -> Result<(u32, u32)> {
    let (width_in, height_in) = chart
        .figure_size
        .unwrap_or((options.width, options.height));
    let to_px = |inches: f64| ((inches * dpi as f64).round() as u32).max(1);
    let (width, height) = (to_px(width_in), to_px(height_in));

    if u64::from(width) * u64::from(height) > MAX_PIXELS {
        bail!(
            "{}x{} in at {} dpi gives a {}x{} image, larger than {} pixels",
            width_in,
            height_in,
            dpi,
            width,
            height,
            MAX_PIXELS
        );
    }
    Ok((width, height))
}

fn write_file(chart: &Chart, path: &Path, options: &RenderOptions) -> Result<()> {
    let (width, height) = pixel_size(chart, options, options.dpi)?;
    let format = format_for_path(path, &options.format);

    match format {
        OutputFormat::Svg => {
            let svg = chart.render_svg(width, height)?;
            fs::write(path, svg)
                .with_context(|| format!("Failed to write SVG to {}", path.display()))?;
        }
        OutputFormat::Png => {
            let png = chart.render_png(width, height)?;
            fs::write(path, png)
                .with_context(|| format!("Failed to write PNG to {}", path.display()))?;
        }
    }

    log::info!("wrote {}x{} chart to {}", width, height, path.display());
    Ok(())
}

fn display(chart: &Chart, options: &RenderOptions) -> Result<()> {
    let (width, height) = pixel_size(chart, options, options.display_dpi)?;
    let png = chart.render_png(width, height)?;

    let path = std::env::temp_dir().join(format!("tabchart-{}.png", std::process::id()));
    fs::write(&path, png)
        .with_context(|| format!("Failed to write preview to {}", path.display()))?;

    let viewer = options.viewer_command();
    let (program, args) = viewer
        .split_first()
        .ok_or_else(|| anyhow!("viewer command is empty"))?;

    log::info!("opening {} with {}", path.display(), program);
    let status = Command::new(program)
        .args(args)
        .arg(&path)
        .status()
        .with_context(|| format!("Failed to launch viewer '{}'", program))?;

    if !status.success() {
        anyhow::bail!("viewer '{}' exited with {}", program, status);
    }

    Ok(())
}
