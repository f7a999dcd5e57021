use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::input::InputError;

/// Name given to a blank header cell, the saved row-index column.
pub const UNNAMED_INDEX_COLUMN: &str = "Unnamed: 0";

#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset, InputError> {
    let reader = open_maybe_gz(path)?;
    read_dataset(reader)
}

pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, InputError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let mut columns = Vec::new();
    for (idx, name) in csv.headers()?.iter().enumerate() {
        let name = name.trim();
        if name.is_empty() {
            columns.push(format!("Unnamed: {idx}"));
        } else {
            columns.push(name.to_string());
        }
    }
    if columns.is_empty() {
        return Err(InputError::Parse("dataset header is empty".to_string()));
    }

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    Ok(Dataset { columns, rows })
}
