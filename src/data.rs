use crate::csv_reader::CsvData;
use crate::error::TableError;
use crate::parser::{Literal, Predicate};
use crate::stats::cmp_nan_last;

/// In-memory table: named columns over string cells, with an optional index column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    index: Option<usize>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            rows,
            index: None,
        }
    }

    /// Create a Table from loaded CSV contents
    pub fn from_csv(csv: CsvData) -> Self {
        Self::new(csv.headers, csv.rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// Name of the index column, if one was set
    pub fn index_name(&self) -> Option<&str> {
        self.index.map(|idx| self.headers[idx].as_str())
    }

    /// Designate `name` as the row index. Data is left untouched.
    pub fn set_index(mut self, name: &str) -> Result<Self, TableError> {
        self.index = Some(self.column_index(name)?);
        Ok(self)
    }

    /// Raw cells of one column
    pub fn column(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Parse one column as numbers. Empty cells become NaN.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| parse_cell(&row[idx], name, row_idx))
            .collect()
    }

    /// Index values as numbers, or row positions when no index is set
    pub fn index_values(&self) -> Result<Vec<f64>, TableError> {
        match self.index_name() {
            Some(name) => self.numeric_column(name),
            None => Ok((0..self.rows.len()).map(|i| i as f64).collect()),
        }
    }

    /// Non-index columns whose cells all parse as numbers, in header order
    pub fn plottable_columns(&self, exclude: &[&str]) -> Vec<String> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(idx, name)| Some(*idx) != self.index && !exclude.contains(&name.as_str()))
            .filter(|(idx, name)| {
                let numeric = self
                    .rows
                    .iter()
                    .enumerate()
                    .all(|(row_idx, row)| parse_cell(&row[*idx], name, row_idx).is_ok());
                if !numeric {
                    log::warn!("skipping non-numeric column '{}'", name);
                }
                numeric
            })
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Keep only the named columns (plus the index column, if any)
    pub fn select(&self, columns: &[&str]) -> Result<Self, TableError> {
        let mut keep: Vec<usize> = Vec::new();
        if let Some(idx) = self.index {
            keep.push(idx);
        }
        for name in columns {
            let idx = self.column_index(name)?;
            if !keep.contains(&idx) {
                keep.push(idx);
            }
        }

        let headers = keep.iter().map(|&i| self.headers[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Self {
            headers,
            rows,
            index: self.index.map(|_| 0),
        })
    }

    /// Keep the rows satisfying `predicate`. The column set is unchanged.
    pub fn filter_rows(&self, predicate: &Predicate) -> Result<Self, TableError> {
        let idx = self.column_index(&predicate.column)?;

        let mut rows = Vec::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            let cell = &row[idx];
            let keep = match &predicate.value {
                Literal::Number(rhs) => {
                    let lhs = parse_cell(cell, &predicate.column, row_idx)?;
                    predicate.op.compare_f64(lhs, *rhs)
                }
                Literal::Text(rhs) => predicate.op.compare_str(cell, rhs),
            };
            if keep {
                rows.push(row.clone());
            }
        }

        log::debug!(
            "filter '{}' kept {} of {} rows",
            predicate,
            rows.len(),
            self.rows.len()
        );

        Ok(Self {
            headers: self.headers.clone(),
            rows,
            index: self.index,
        })
    }

    /// Stable ascending sort on a numeric column, missing keys last
    pub fn sort_by(&self, name: &str) -> Result<Self, TableError> {
        let keys = self.numeric_column(name)?;
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| cmp_nan_last(keys[a], keys[b]));

        Ok(Self {
            headers: self.headers.clone(),
            rows: order.into_iter().map(|i| self.rows[i].clone()).collect(),
            index: self.index,
        })
    }
}

fn parse_cell(cell: &str, column: &str, row: usize) -> Result<f64, TableError> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| TableError::NotNumeric {
        column: column.to_string(),
        row: row + 1,
        value: cell.to_string(),
    })
}
