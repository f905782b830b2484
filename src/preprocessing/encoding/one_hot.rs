//! One-hot encoding for nominal columns.
//!
//! Each nominal column is replaced by one 0/1 indicator column per frozen
//! category. Encoding is full rank: no reference level is dropped.
//!
//! ```text
//! Roof_Style: ["Gable", "Hip", "Shed"]   (Shed unseen at fit)
//! =>
//! Roof_Style_Gable  Roof_Style_Hip  Roof_Style_other
//!        1                0                0
//!        0                1                0
//!        0                0                1
//! ```

use crate::dataset::{Column, ColumnData, ColumnKind, Dataset, Schema};
use crate::error::{BlueprintError, Result};
use crate::preprocessing::encoding::collapse_rare::DEFAULT_OTHER_LABEL;
use crate::preprocessing::report::ApplyReport;
use crate::preprocessing::traits::{ensure_rows, ensure_schema, FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Configuration for [`OneHotEncoder`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotConfig {
    /// Category that absorbs values outside the frozen set. Always present
    /// and always the last indicator of a column.
    pub other_label: String,
}

impl Default for OneHotConfig {
    fn default() -> Self {
        Self {
            other_label: DEFAULT_OTHER_LABEL.to_string(),
        }
    }
}

/// One-hot encoder (unfit).
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    config: OneHotConfig,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: OneHotConfig) -> Self {
        Self { config }
    }

    /// Set the fallback category label.
    pub fn with_other_label(mut self, label: impl Into<String>) -> Self {
        self.config.other_label = label.into();
        self
    }
}

/// Frozen categories of one nominal column and the names of its indicators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DummyEncoding {
    pub column: String,
    /// Sorted training categories followed by the fallback label.
    pub categories: Vec<String>,
    /// `{column}_{category}` for each entry of `categories`.
    pub names: Vec<String>,
}

impl DummyEncoding {
    fn new(column: &str, values: &[String], other: &str) -> Self {
        let mut categories: Vec<String> = values
            .iter()
            .map(String::as_str)
            .filter(|v| *v != other)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        categories.push(other.to_string());

        let names = categories
            .iter()
            .map(|c| format!("{}_{}", column, c))
            .collect();
        Self {
            column: column.to_string(),
            categories,
            names,
        }
    }

    /// Index of the fallback indicator.
    fn other_index(&self) -> usize {
        self.categories.len() - 1
    }
}

/// Fitted one-hot encoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedOneHotEncoder {
    config: OneHotConfig,
    encodings: Vec<DummyEncoding>,
    input_schema: Schema,
    output_schema: Schema,
}

impl FittedOneHotEncoder {
    /// Frozen encodings, in input column order.
    pub fn encodings(&self) -> &[DummyEncoding] {
        &self.encodings
    }

    pub fn encoding(&self, column: &str) -> Option<&DummyEncoding> {
        self.encodings.iter().find(|e| e.column == column)
    }

    /// Total number of indicator columns produced.
    pub fn n_indicators(&self) -> usize {
        self.encodings.iter().map(|e| e.names.len()).sum()
    }
}

impl Transformer for OneHotEncoder {
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Dataset, target: &str) -> Result<Self::Fitted> {
        ensure_rows(data, "OneHotEncoder")?;
        if self.config.other_label.is_empty() {
            return Err(BlueprintError::InvalidParameter(
                "one-hot fallback label must not be empty".to_string(),
            ));
        }
        let input_schema = data.schema();

        let encodings: Vec<DummyEncoding> = data
            .columns()
            .iter()
            .filter(|c| c.name() != target)
            .filter_map(|c| {
                c.data()
                    .as_nominal()
                    .map(|values| DummyEncoding::new(c.name(), values, &self.config.other_label))
            })
            .collect();

        let mut output_schema = Schema::new(
            input_schema
                .iter()
                .filter(|c| c.kind == ColumnKind::Numeric)
                .cloned()
                .collect(),
        );
        let mut taken: HashSet<String> = input_schema.iter().map(|c| c.name.clone()).collect();
        for encoding in &encodings {
            debug!(column = %encoding.column, categories = ?encoding.categories, "one-hot encoding fit");
            for name in &encoding.names {
                if !taken.insert(name.clone()) {
                    return Err(BlueprintError::InvalidParameter(format!(
                        "indicator column `{}` for `{}` collides with an existing column",
                        name, encoding.column
                    )));
                }
                output_schema.push(name.clone(), ColumnKind::Numeric);
            }
        }

        Ok(FittedOneHotEncoder {
            config: self.config.clone(),
            encodings,
            input_schema,
            output_schema,
        })
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    fn transform(&self, data: &Dataset, report: &mut ApplyReport) -> Result<Dataset> {
        ensure_schema(data, &self.input_schema)?;
        let n_rows = data.n_rows();

        let mut columns: Vec<Column> = self
            .input_schema
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .filter_map(|c| data.column(&c.name).cloned())
            .collect();

        for encoding in &self.encodings {
            let values = data
                .column(&encoding.column)
                .and_then(|c| c.data().as_nominal())
                .ok_or_else(|| {
                    BlueprintError::schema_mismatch(&encoding.column, "expected nominal column")
                })?;

            let index: HashMap<&str, usize> = encoding
                .categories
                .iter()
                .enumerate()
                .map(|(i, c)| (c.as_str(), i))
                .collect();
            let other = encoding.other_index();

            let mut indicators = vec![vec![0.0; n_rows]; encoding.categories.len()];
            for (row, value) in values.iter().enumerate() {
                let hot = match index.get(value.as_str()) {
                    Some(&i) => i,
                    None => {
                        report.record_unseen(&encoding.column, value);
                        other
                    }
                };
                indicators[hot][row] = 1.0;
            }

            columns.extend(
                encoding
                    .names
                    .iter()
                    .zip(indicators)
                    .map(|(name, values)| Column::new(name.clone(), ColumnData::Numeric(values))),
            );
        }

        Ok(Dataset::from_parts(columns, n_rows))
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    fn step_name(&self) -> &'static str {
        "OneHotEncoder"
    }
}
