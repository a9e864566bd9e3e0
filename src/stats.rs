use crate::data::Table;
use crate::error::TableError;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Ordinary least-squares line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitLine {
    pub slope: f64,
    pub intercept: f64,
}

impl FitLine {
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Per-group aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
}

/// Least-squares fit of y against x.
///
/// Needs two or more points and at least two distinct x values.
pub fn fit_linear(x_values: &[f64], y_values: &[f64]) -> Result<FitLine, TableError> {
    if x_values.len() != y_values.len() {
        return Err(TableError::LengthMismatch {
            x: x_values.len(),
            y: y_values.len(),
        });
    }

    if x_values.len() < 2 {
        return Err(TableError::InsufficientData {
            operation: "linear fit",
            needed: 2,
            got: x_values.len(),
        });
    }

    if x_values.iter().all(|&x| x == x_values[0]) {
        return Err(TableError::DegenerateFit);
    }

    let n = x_values.len() as f64;
    let mean_x = x_values.iter().sum::<f64>() / n;
    let mean_y = y_values.iter().sum::<f64>() / n;

    // Centered sums keep precision when x is far from zero
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in x_values.iter().zip(y_values) {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    Ok(FitLine { slope, intercept })
}

/// Partition rows by `group_column` and aggregate `value_column` per group.
///
/// Keys come back in ascending order, numerically when every key is a number.
pub fn group_and_aggregate(
    table: &Table,
    group_column: &str,
    value_column: &str,
    aggregate: Aggregate,
) -> Result<Vec<(String, f64)>, TableError> {
    let groups = group_values(table, group_column, value_column)?;

    Ok(groups
        .into_iter()
        .map(|(key, values)| {
            let value = match aggregate {
                Aggregate::Mean => mean(&values),
            };
            (key, value)
        })
        .collect())
}

/// Group the values of `value_column` by `group_column`, keys sorted
pub fn group_values(
    table: &Table,
    group_column: &str,
    value_column: &str,
) -> Result<Vec<(String, Vec<f64>)>, TableError> {
    let keys = table.column(group_column)?;
    let values = table.numeric_column(value_column)?;

    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    let mut skipped = 0;
    for (key, value) in keys.into_iter().zip(values) {
        if key.is_empty() {
            skipped += 1;
            continue;
        }
        groups.entry(key.to_string()).or_default().push(value);
    }
    if skipped > 0 {
        log::debug!("dropped {} rows with no '{}' value", skipped, group_column);
    }

    let mut sorted_keys: Vec<String> = groups.keys().cloned().collect();
    sort_categories(&mut sorted_keys);

    Ok(sorted_keys
        .into_iter()
        .map(|key| {
            let values = groups.remove(&key).unwrap_or_default();
            (key, values)
        })
        .collect())
}

/// Sort category labels numerically if all parse as numbers, lexically otherwise
pub fn sort_categories(categories: &mut [String]) {
    let all_numeric = categories.iter().all(|s| s.parse::<f64>().is_ok());
    if all_numeric {
        categories.sort_by(|a, b| {
            let fa = a.parse::<f64>().unwrap_or(f64::NAN);
            let fb = b.parse::<f64>().unwrap_or(f64::NAN);
            cmp_nan_last(fa, fb)
        });
    } else {
        categories.sort();
    }
}

/// Total order on floats with NaN after every number
pub fn cmp_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}

/// Arithmetic mean ignoring NaN (missing) values
fn mean(values: &[f64]) -> f64 {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        return f64::NAN;
    }
    present.iter().sum::<f64>() / present.len() as f64
}
