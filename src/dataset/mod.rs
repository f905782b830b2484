//! Tabular datasets with named, typed columns.
//!
//! A [`Dataset`] is an ordered sequence of records sharing one [`Schema`].
//! Storage is column-major: each [`Column`] holds either numeric (`f64`) or
//! nominal (string) values.
//!
//! # Example
//!
//! ```rust
//! use tabular_blueprint::dataset::{Column, Dataset};
//!
//! let dataset = Dataset::new(vec![
//!     Column::numeric("Gr_Liv_Area", vec![1710.0, 1262.0, 1786.0]),
//!     Column::nominal("Neighborhood", vec!["North_Ames", "Gilbert", "North_Ames"]),
//!     Column::numeric("Sale_Price", vec![208500.0, 181500.0, 223500.0]),
//! ])
//! .unwrap();
//!
//! assert_eq!(dataset.n_rows(), 3);
//! assert_eq!(dataset.schema().names(), vec!["Gr_Liv_Area", "Neighborhood", "Sale_Price"]);
//! ```

use crate::error::{BlueprintError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub mod csv_io;
pub mod split;
pub mod tensor;

pub use self::split::train_test_split;
pub use self::tensor::{split, BatchIter, TensorData};

/// Base kind of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Real-valued column.
    Numeric,
    /// Categorical column with string levels.
    Nominal,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Nominal => write!(f, "nominal"),
        }
    }
}

/// A single cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Numeric(f64),
    Nominal(String),
}

impl Value {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Value::Numeric(_) => ColumnKind::Numeric,
            Value::Nominal(_) => ColumnKind::Nominal,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Nominal(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Nominal(v)
    }
}

/// Values of one column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Nominal(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Nominal(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Nominal(_) => ColumnKind::Nominal,
        }
    }

    /// Numeric values, or `None` for a nominal column.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Nominal(_) => None,
        }
    }

    /// Nominal values, or `None` for a numeric column.
    pub fn as_nominal(&self) -> Option<&[String]> {
        match self {
            ColumnData::Numeric(_) => None,
            ColumnData::Nominal(v) => Some(v),
        }
    }

    fn value(&self, row: usize) -> Option<Value> {
        match self {
            ColumnData::Numeric(v) => v.get(row).map(|&x| Value::Numeric(x)),
            ColumnData::Nominal(v) => v.get(row).map(|s| Value::Nominal(s.clone())),
        }
    }

    fn take(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Nominal(v) => {
                ColumnData::Nominal(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// A named column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create a numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    /// Create a nominal column.
    pub fn nominal<S: Into<String>>(name: impl Into<String>, values: Vec<S>) -> Self {
        Self::new(
            name,
            ColumnData::Nominal(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> ColumnData {
        self.data
    }
}

/// Name and kind of one column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered column schema. Equality is order-sensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnSchema>) -> Self {
        Self { columns }
    }

    /// Build a schema from `(name, kind)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, ColumnKind)>) -> Self {
        Self {
            columns: pairs
                .into_iter()
                .map(|(name, kind)| ColumnSchema::new(name, kind))
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, kind: ColumnKind) {
        self.columns.push(ColumnSchema::new(name, kind));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSchema> {
        self.columns.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.get(name).map(|c| c.kind)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Whether every column is numeric.
    pub fn is_all_numeric(&self) -> bool {
        self.columns.iter().all(|c| c.kind == ColumnKind::Numeric)
    }

    /// Names of columns of `kind`, skipping `exclude`.
    pub fn names_of_kind(&self, kind: ColumnKind, exclude: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind && c.name != exclude)
            .map(|c| c.name.clone())
            .collect()
    }
}

/// An in-memory table of equally long, uniquely named columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Create a dataset from columns.
    ///
    /// # Errors
    /// [`BlueprintError::InvalidDataset`] if column lengths differ or a name repeats.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.len() != n_rows {
                return Err(BlueprintError::InvalidDataset(format!(
                    "column `{}` has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    n_rows
                )));
            }
            if !seen.insert(column.name()) {
                return Err(BlueprintError::InvalidDataset(format!(
                    "duplicate column name `{}`",
                    column.name()
                )));
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Create a dataset from row-major records.
    ///
    /// Every record must have one value per schema column, of the declared kind.
    pub fn from_records(schema: &Schema, records: Vec<Vec<Value>>) -> Result<Self> {
        let mut data: Vec<ColumnData> = schema
            .iter()
            .map(|c| match c.kind {
                ColumnKind::Numeric => ColumnData::Numeric(Vec::with_capacity(records.len())),
                ColumnKind::Nominal => ColumnData::Nominal(Vec::with_capacity(records.len())),
            })
            .collect();

        for (row, record) in records.into_iter().enumerate() {
            if record.len() != schema.len() {
                return Err(BlueprintError::InvalidDataset(format!(
                    "record {} has {} values, schema has {} columns",
                    row,
                    record.len(),
                    schema.len()
                )));
            }
            for ((value, column), spec) in record.into_iter().zip(data.iter_mut()).zip(schema.iter())
            {
                match (value, column) {
                    (Value::Numeric(v), ColumnData::Numeric(values)) => values.push(v),
                    (Value::Nominal(s), ColumnData::Nominal(values)) => values.push(s),
                    (value, _) => {
                        return Err(BlueprintError::InvalidDataset(format!(
                            "record {} has a {} value in {} column `{}`",
                            row,
                            value.kind(),
                            spec.kind,
                            spec.name
                        )))
                    }
                }
            }
        }

        let columns = schema
            .iter()
            .zip(data)
            .map(|(spec, data)| Column::new(spec.name.clone(), data))
            .collect();
        Self::new(columns)
    }

    /// Assemble a dataset from columns already known to be consistent.
    pub(crate) fn from_parts(columns: Vec<Column>, n_rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == n_rows));
        Self { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|c| ColumnSchema::new(c.name.clone(), c.kind()))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// The record at `row`, in column order.
    pub fn record(&self, row: usize) -> Option<Vec<Value>> {
        self.columns.iter().map(|c| c.data.value(row)).collect()
    }

    /// A new dataset with the given rows, in the given order.
    ///
    /// # Errors
    /// [`BlueprintError::InvalidParameter`] if an index is out of range.
    pub fn take_rows(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_rows) {
            return Err(BlueprintError::InvalidParameter(format!(
                "row index {} out of range for {} rows",
                bad, self.n_rows
            )));
        }
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.data.take(indices)))
            .collect();
        Ok(Self::from_parts(columns, indices.len()))
    }

    /// Project onto `schema`, in its order, checking names and kinds.
    ///
    /// Columns not named by `schema` are dropped.
    ///
    /// # Errors
    /// [`BlueprintError::SchemaMismatch`] naming the first missing or retyped column.
    pub fn select(&self, schema: &Schema) -> Result<Self> {
        let mut columns = Vec::with_capacity(schema.len());
        for spec in schema.iter() {
            let column = self
                .column(&spec.name)
                .ok_or_else(|| BlueprintError::schema_mismatch(&spec.name, "column is missing"))?;
            if column.kind() != spec.kind {
                return Err(BlueprintError::schema_mismatch(
                    &spec.name,
                    format!("expected {} column, found {}", spec.kind, column.kind()),
                ));
            }
            columns.push(column.clone());
        }
        Ok(Self::from_parts(columns, self.n_rows))
    }

    /// Verify every numeric cell is finite.
    pub fn check_finite(&self) -> Result<()> {
        for column in &self.columns {
            if let Some(values) = column.data.as_numeric() {
                if let Some(row) = values.iter().position(|v| !v.is_finite()) {
                    return Err(BlueprintError::NonFinite {
                        column: column.name.clone(),
                        row,
                    });
                }
            }
        }
        Ok(())
    }
}
