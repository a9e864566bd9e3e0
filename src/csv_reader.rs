// CSV ingestion

use crate::error::TableError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Raw CSV contents: header tokens plus string cells, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Load a CSV file with a header row from disk
pub fn load(path: &Path) -> Result<CsvData, TableError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TableError::FileNotFound(path.to_path_buf()),
        _ => TableError::Parse(format!("{}: {}", path.display(), e)),
    })?;

    let data = read_csv(file)?;
    log::info!(
        "loaded {} rows x {} columns from {}",
        data.rows.len(),
        data.headers.len(),
        path.display()
    );
    Ok(data)
}

/// Read CSV from any reader. Every record must have as many fields as the header.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvData, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(TableError::Parse("missing header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    Ok(CsvData { headers, rows })
}
