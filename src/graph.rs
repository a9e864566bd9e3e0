use crate::palette::{resolve_color, ColorPalette};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::chart::SeriesAnno;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// Point marker shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    Circle,
    Cross,
}

/// Style configuration for line layers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineStyle {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub alpha: Option<f64>,
    /// Draw a marker on every vertex
    pub marker: Option<Marker>,
    pub marker_size: Option<f64>,
}

/// Style configuration for point layers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointStyle {
    pub color: Option<String>,
    pub size: Option<f64>,
    pub shape: Marker,
    pub alpha: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    Continuous,
    /// Categorical axis; x values are slot indices into the labels
    Categorical(Vec<String>),
}

/// One overlay on a chart
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Line {
        points: Vec<(f64, f64)>,
        style: LineStyle,
        label: Option<String>,
    },
    Points {
        points: Vec<(f64, f64)>,
        style: PointStyle,
        label: Option<String>,
    },
}

impl Layer {
    pub fn points(&self) -> &[(f64, f64)] {
        match self {
            Layer::Line { points, .. } | Layer::Points { points, .. } => points,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Layer::Line { label, .. } | Layer::Points { label, .. } => label.as_deref(),
        }
    }
}

/// A single chart: axes, labels and a stack of layers drawn in order
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_axis: XAxis,
    pub layers: Vec<Layer>,
    /// Figure size in inches, overriding the render options
    pub figure_size: Option<(f64, f64)>,
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            x_axis: XAxis::Continuous,
            layers: Vec::new(),
            figure_size: None,
        }
    }
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn labels(mut self, x: &str, y: &str) -> Self {
        self.x_label = Some(x.to_string());
        self.y_label = Some(y.to_string());
        self
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn has_legend(&self) -> bool {
        self.layers.iter().any(|l| l.label().is_some())
    }

    /// Padded data ranges over every drawable point
    pub fn bounds(&self) -> (Range<f64>, Range<f64>) {
        let points: Vec<(f64, f64)> = self
            .layers
            .iter()
            .flat_map(|l| l.points().iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        let y_range = padded_range(points.iter().map(|p| p.1));

        let x_range = match &self.x_axis {
            XAxis::Categorical(categories) => {
                let n = categories.len().max(1) as f64;
                -0.5..(n - 0.5)
            }
            XAxis::Continuous => padded_range(points.iter().map(|p| p.0)),
        };

        (x_range, y_range)
    }

    /// Draw the chart onto any plotters drawing area
    pub fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).context("Failed to fill background")?;

        let (x_range, y_range) = self.bounds();

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(self.title.as_deref().unwrap_or(""), ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .context("Failed to build chart")?;

        let categories = match &self.x_axis {
            XAxis::Categorical(c) => c.clone(),
            XAxis::Continuous => Vec::new(),
        };
        let category_label = |x: &f64| {
            let slot = x.round();
            if (x - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            categories.get(slot as usize).cloned().unwrap_or_default()
        };

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.x_label.clone().unwrap_or_default())
            .y_desc(self.y_label.clone().unwrap_or_default());
        if let XAxis::Categorical(c) = &self.x_axis {
            mesh.x_labels(c.len().max(1))
                .x_label_formatter(&category_label)
                .disable_x_mesh();
        }
        mesh.draw().context("Failed to draw mesh")?;

        let palette = ColorPalette::default();
        let mut slot = 0;

        for layer in &self.layers {
            let points: Vec<(f64, f64)> = layer
                .points()
                .iter()
                .copied()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect();

            match layer {
                Layer::Line { style, label, .. } => {
                    let color = resolve_color(style.color.as_deref(), &palette, slot)
                        .mix(style.alpha.unwrap_or(1.0));
                    let width = style.width.unwrap_or(1.5).round().max(1.0) as u32;
                    if style.color.is_none() {
                        slot += 1;
                    }

                    let anno = chart
                        .draw_series(LineSeries::new(points.clone(), color.stroke_width(width)))
                        .context("Failed to draw line series")?;
                    if let Some(label) = label {
                        anno.label(label.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width))
                        });
                    }

                    if let Some(marker) = style.marker {
                        let size = style.marker_size.unwrap_or(3.0).round().max(1.0) as i32;
                        draw_markers(&mut chart, &points, marker, size, color)?;
                    }
                }
                Layer::Points { style, label, .. } => {
                    let color = resolve_color(style.color.as_deref(), &palette, slot)
                        .mix(style.alpha.unwrap_or(1.0));
                    let size = style.size.unwrap_or(3.0).round().max(1.0) as i32;
                    if style.color.is_none() {
                        slot += 1;
                    }

                    let anno = draw_markers(&mut chart, &points, style.shape, size, color)?;
                    if let Some(label) = label {
                        let anno = anno.label(label.as_str());
                        match style.shape {
                            Marker::Circle => anno.legend(move |(x, y)| {
                                Circle::new((x + 10, y), 4, color.filled())
                            }),
                            Marker::Cross => anno.legend(move |(x, y)| {
                                Cross::new((x + 10, y), 4, color.stroke_width(2))
                            }),
                        };
                    }
                }
            }
        }

        if self.has_legend() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .context("Failed to draw legend")?;
        }

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Render into an RGB buffer and encode it as PNG
    pub fn render_png(&self, width: u32, height: u32) -> Result<Vec<u8>> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .with_context(|| format!("Image size {}x{} is too large", width, height))?;
        let mut buffer = vec![0u8; len];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root)?;
        }

        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, width, height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }

    /// Render as an SVG document
    pub fn render_svg(&self, width: u32, height: u32) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            self.draw(&root)?;
        }
        Ok(svg)
    }
}

fn draw_markers<'a, 'b, DB>(
    chart: &'b mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: &[(f64, f64)],
    marker: Marker,
    size: i32,
    color: RGBAColor,
) -> Result<&'b mut SeriesAnno<'a, DB>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let drawn = match marker {
        Marker::Circle => chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), size, color.filled())),
        ),
        Marker::Cross => chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Cross::new((x, y), size, color.stroke_width(2))),
        ),
    };
    drawn.context("Failed to draw point series")
}

fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}
