// Chart pipelines: load, reshape, summarize, lay out

use crate::csv_reader;
use crate::data::Table;
use crate::error::TableError;
use crate::graph::{Chart, Layer, LineStyle, Marker, PointStyle, XAxis};
use crate::parser::Predicate;
use crate::stats::{self, Aggregate};
use anyhow::{Context, Result};
use std::path::Path;

pub const BEAT_TIME: &str = "beat_time";
pub const ELAPSED: &str = "elapsed";
pub const WAVE_TYPE: &str = "wave_type";
pub const TIME: &str = "t";
pub const FREQUENCY: &str = "f";
pub const TARGET: &str = "target_0";

/// Inter-beat threshold applied by the sweep chart unless overridden
pub const DEFAULT_BEAT_THRESHOLD: f64 = 0.55;

/// The chart pipelines exposed on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum Recipe {
    /// Scatter of delay against inter-beat time with a least-squares line
    Sweep { filter: Option<Predicate> },
    /// Delay per wave type with group means
    Waves,
    /// Every column over time with the target highlighted
    Series,
    /// Every column against frequency, or time as a fallback
    Freq,
}

impl Recipe {
    pub fn default_input(&self) -> &'static str {
        match self {
            Recipe::Sweep { .. } => "sweep-18-04-2024.csv",
            Recipe::Waves => "test_waves.csv",
            Recipe::Series | Recipe::Freq => "out.csv",
        }
    }

    /// Build the chart for an already loaded table
    pub fn build(&self, table: &Table) -> Result<Chart> {
        match self {
            Recipe::Sweep { filter } => sweep_chart(table, BEAT_TIME, ELAPSED, filter.as_ref()),
            Recipe::Waves => waves_chart(table, WAVE_TYPE, ELAPSED),
            Recipe::Series => series_chart(table, TIME, TARGET),
            Recipe::Freq => freq_chart(table, &[FREQUENCY, TIME]),
        }
    }
}

/// Load a CSV file into a Table
pub fn load_table(path: &Path) -> Result<Table> {
    let csv = csv_reader::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(Table::from_csv(csv))
}

/// Scatter `y_col` against `x_col` with an OLS fit line overlaid
pub fn sweep_chart(
    table: &Table,
    x_col: &str,
    y_col: &str,
    filter: Option<&Predicate>,
) -> Result<Chart> {
    let table = match filter {
        Some(predicate) => table
            .filter_rows(predicate)
            .with_context(|| format!("Failed to apply filter '{}'", predicate))?,
        None => table.clone(),
    };

    let xs = table.numeric_column(x_col)?;
    let ys = table.numeric_column(y_col)?;
    let points: Vec<(f64, f64)> = xs
        .into_iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .collect();

    let mut chart = Chart::new()
        .title("Delay Time by Inter-Beat Time")
        .labels("Inter-Beat Time [s]", "Delay Time [s]");

    chart.add_layer(Layer::Points {
        points: points.clone(),
        style: PointStyle {
            color: Some("darkblue".to_string()),
            ..Default::default()
        },
        label: None,
    });

    if points.len() < 2 {
        log::warn!(
            "{} point(s) left after filtering, skipping fit line",
            points.len()
        );
        return Ok(chart);
    }

    let (fit_x, fit_y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
    let fit = stats::fit_linear(&fit_x, &fit_y)
        .with_context(|| format!("Failed to fit {} against {}", y_col, x_col))?;
    log::info!("fit: slope = {}, intercept = {}", fit.slope, fit.intercept);

    let mut line_x = fit_x;
    line_x.sort_by(|a, b| a.total_cmp(b));
    chart.add_layer(Layer::Line {
        points: line_x.into_iter().map(|x| (x, fit.eval(x))).collect(),
        style: LineStyle {
            color: Some("red".to_string()),
            ..Default::default()
        },
        label: None,
    });

    Ok(chart)
}

/// One scatter group per category, with each group's mean as a black cross
pub fn waves_chart(table: &Table, group_col: &str, value_col: &str) -> Result<Chart> {
    let groups = stats::group_values(table, group_col, value_col)?;
    let means = stats::group_and_aggregate(table, group_col, value_col, Aggregate::Mean)?;

    let mut chart = Chart::new()
        .title("Delay Time by Wave Type")
        .labels("Wave Type", "Delay Time [s]");
    chart.x_axis = XAxis::Categorical(groups.iter().map(|(key, _)| key.clone()).collect());

    for (slot, (key, values)) in groups.into_iter().enumerate() {
        chart.add_layer(Layer::Points {
            points: values.into_iter().map(|v| (slot as f64, v)).collect(),
            style: PointStyle::default(),
            label: Some(key),
        });
    }

    chart.add_layer(Layer::Points {
        points: means
            .iter()
            .enumerate()
            .map(|(slot, (_, mean))| (slot as f64, *mean))
            .collect(),
        style: PointStyle {
            color: Some("black".to_string()),
            size: Some(5.0),
            shape: Marker::Cross,
            alpha: None,
        },
        label: None,
    });

    Ok(chart)
}

/// Every numeric column as a line over the index, target drawn on top
pub fn series_chart(table: &Table, index_col: &str, target_col: &str) -> Result<Chart> {
    let table = table.clone().set_index(index_col)?;
    let x = table.index_values()?;

    let mut chart = Chart::new().labels(index_col, "");
    chart.figure_size = Some((15.0, 7.0));

    for column in table.plottable_columns(&[target_col]) {
        let y = table.numeric_column(&column)?;
        chart.add_layer(Layer::Line {
            points: x.iter().copied().zip(y).collect(),
            style: LineStyle::default(),
            label: Some(column),
        });
    }

    match target_overlay(&table, &x, target_col)? {
        Some(layer) => chart.add_layer(layer),
        None => log::debug!("no '{}' column, drawing without target", target_col),
    }

    Ok(chart)
}

/// Target series drawn in black with small circle markers, if the column exists
pub fn target_overlay(table: &Table, x: &[f64], target_col: &str) -> Result<Option<Layer>> {
    if !table.has_column(target_col) {
        return Ok(None);
    }

    let y = table.numeric_column(target_col)?;
    Ok(Some(Layer::Line {
        points: x.iter().copied().zip(y).collect(),
        style: LineStyle {
            color: Some("black".to_string()),
            marker: Some(Marker::Circle),
            marker_size: Some(2.0),
            ..Default::default()
        },
        label: Some("target".to_string()),
    }))
}

/// Every numeric column as a line against the first usable sort key
pub fn freq_chart(table: &Table, sort_keys: &[&str]) -> Result<Chart> {
    let (table, key) = sort_on_first_key(table, sort_keys);
    let x = table.index_values()?;

    let mut chart = Chart::new().labels(key.as_deref().unwrap_or("row"), "");

    for column in table.plottable_columns(&[]) {
        let y = table.numeric_column(&column)?;
        chart.add_layer(Layer::Line {
            points: x.iter().copied().zip(y).collect(),
            style: LineStyle::default(),
            label: Some(column),
        });
    }

    Ok(chart)
}

/// Sort and index on the first key that works; unsorted if none does
fn sort_on_first_key(table: &Table, keys: &[&str]) -> (Table, Option<String>) {
    for key in keys {
        let attempt: Result<Table, TableError> =
            table.sort_by(key).and_then(|sorted| sorted.set_index(key));
        match attempt {
            Ok(sorted) => return (sorted, Some(key.to_string())),
            Err(e) => log::debug!("cannot sort on '{}': {}", key, e),
        }
    }
    log::debug!("no usable sort key, plotting rows in file order");
    (table.clone(), None)
}
