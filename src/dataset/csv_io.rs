//! Loading datasets from headered CSV files.
//!
//! Column kinds are inferred: a column whose every cell parses as `f64` is
//! numeric, anything else is nominal. [`CsvOptions::with_kind`] forces a kind,
//! e.g. for numeric-looking codes such as `MS_SubClass`.

use crate::dataset::{Column, ColumnData, ColumnKind, Dataset};
use crate::error::{BlueprintError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Options for CSV loading.
#[derive(Clone, Debug)]
pub struct CsvOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Kinds forced for specific columns, bypassing inference.
    pub kinds: HashMap<String, ColumnKind>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            kinds: HashMap::new(),
        }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Force the kind of a column.
    pub fn with_kind(mut self, column: impl Into<String>, kind: ColumnKind) -> Self {
        self.kinds.insert(column.into(), kind);
        self
    }
}

/// Load a dataset from a CSV file.
pub fn read_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Dataset> {
    let file = File::open(path.as_ref())?;
    let dataset = read_csv_from_reader(BufReader::new(file), options)?;
    info!(
        path = %path.as_ref().display(),
        rows = dataset.n_rows(),
        cols = dataset.n_cols(),
        "loaded CSV dataset"
    );
    Ok(dataset)
}

/// Load a dataset from any CSV reader.
///
/// # Errors
/// - [`BlueprintError::Csv`] for malformed CSV.
/// - [`BlueprintError::InvalidDataset`] for an empty or unparsable cell in a
///   numeric column.
pub fn read_csv_from_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let records: Vec<StringRecord> = rdr.records().collect::<std::result::Result<_, _>>()?;

    let mut columns = Vec::with_capacity(headers.len());
    for (j, name) in headers.iter().enumerate() {
        let cells: Vec<&str> = records.iter().map(|r| r.get(j).unwrap_or("")).collect();
        let kind = match options.kinds.get(name) {
            Some(&kind) => kind,
            None => infer_kind(&cells),
        };
        columns.push(Column::new(name.clone(), parse_column(name, &cells, kind)?));
    }

    Dataset::new(columns)
}

fn infer_kind(cells: &[&str]) -> ColumnKind {
    let non_empty = cells.iter().filter(|c| !c.is_empty());
    let mut any = false;
    for cell in non_empty {
        any = true;
        if cell.parse::<f64>().is_err() {
            return ColumnKind::Nominal;
        }
    }
    if any {
        ColumnKind::Numeric
    } else {
        ColumnKind::Nominal
    }
}

fn parse_column(name: &str, cells: &[&str], kind: ColumnKind) -> Result<ColumnData> {
    match kind {
        ColumnKind::Nominal => Ok(ColumnData::Nominal(
            cells.iter().map(|c| c.to_string()).collect(),
        )),
        ColumnKind::Numeric => cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.parse::<f64>().map_err(|_| {
                    BlueprintError::InvalidDataset(format!(
                        "column `{}` row {}: cannot parse {:?} as a number",
                        name, row, cell
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()
            .map(ColumnData::Numeric),
    }
}
