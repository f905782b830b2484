//! Rare-category collapsing.
//!
//! Categories whose relative training frequency is below `threshold` are
//! pooled into a single `other` level. The kept set is frozen per column; at
//! apply time any value outside it (including values never seen at fit) maps
//! to `other`.

use crate::dataset::{Column, ColumnData, Dataset, Schema};
use crate::error::{BlueprintError, Result};
use crate::preprocessing::report::ApplyReport;
use crate::preprocessing::traits::{ensure_rows, ensure_schema, FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Label of the pooled level unless configured otherwise.
pub const DEFAULT_OTHER_LABEL: &str = "other";

/// Configuration for [`CollapseRare`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollapseRareConfig {
    /// Relative frequency below which a category is pooled.
    pub threshold: f64,
    /// Label of the pooled level.
    pub other_label: String,
}

impl Default for CollapseRareConfig {
    fn default() -> Self {
        Self {
            threshold: 0.01,
            other_label: DEFAULT_OTHER_LABEL.to_string(),
        }
    }
}

impl CollapseRareConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(BlueprintError::InvalidParameter(format!(
                "rare-category threshold must be in [0, 1), got {}",
                self.threshold
            )));
        }
        if self.other_label.is_empty() {
            return Err(BlueprintError::InvalidParameter(
                "other label must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rare-category collapser (unfit).
#[derive(Clone, Debug, Default)]
pub struct CollapseRare {
    config: CollapseRareConfig,
}

impl CollapseRare {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: CollapseRareConfig) -> Self {
        Self { config }
    }

    /// Set the relative frequency threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the label of the pooled level.
    pub fn with_other_label(mut self, label: impl Into<String>) -> Self {
        self.config.other_label = label.into();
        self
    }
}

/// Frozen levels for one column. Both lists are sorted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeptLevels {
    pub column: String,
    pub kept: Vec<String>,
    pub collapsed: Vec<String>,
}

impl KeptLevels {
    fn is_kept(&self, value: &str) -> bool {
        self.kept
            .binary_search_by(|k| k.as_str().cmp(value))
            .is_ok()
    }

    fn was_seen(&self, value: &str) -> bool {
        self.is_kept(value)
            || self
                .collapsed
                .binary_search_by(|k| k.as_str().cmp(value))
                .is_ok()
    }
}

/// Fitted rare-category collapser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedCollapseRare {
    config: CollapseRareConfig,
    levels: Vec<KeptLevels>,
    input_schema: Schema,
}

impl FittedCollapseRare {
    /// Frozen levels per nominal column, in column order.
    pub fn levels(&self) -> &[KeptLevels] {
        &self.levels
    }

    /// Frozen levels of `column`, if it was collapsed.
    pub fn levels_of(&self, column: &str) -> Option<&KeptLevels> {
        self.levels.iter().find(|l| l.column == column)
    }

    pub fn other_label(&self) -> &str {
        &self.config.other_label
    }
}

impl Transformer for CollapseRare {
    type Fitted = FittedCollapseRare;

    fn fit(&self, data: &Dataset, target: &str) -> Result<Self::Fitted> {
        self.config.validate()?;
        ensure_rows(data, "CollapseRare")?;

        let n = data.n_rows() as f64;
        let mut levels = Vec::new();
        for column in data.columns() {
            let Some(values) = column.data().as_nominal() else {
                continue;
            };
            if column.name() == target {
                continue;
            }

            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for v in values {
                *counts.entry(v.as_str()).or_insert(0) += 1;
            }

            let (kept, collapsed): (Vec<_>, Vec<_>) = counts
                .into_iter()
                .partition(|&(_, count)| count as f64 / n >= self.config.threshold);
            let kept: Vec<String> = kept.into_iter().map(|(v, _)| v.to_string()).collect();
            let collapsed: Vec<String> =
                collapsed.into_iter().map(|(v, _)| v.to_string()).collect();

            debug!(column = column.name(), ?collapsed, "collapsed rare categories");
            levels.push(KeptLevels {
                column: column.name().to_string(),
                kept,
                collapsed,
            });
        }

        Ok(FittedCollapseRare {
            config: self.config.clone(),
            levels,
            input_schema: data.schema(),
        })
    }
}

impl FittedTransformer for FittedCollapseRare {
    fn transform(&self, data: &Dataset, report: &mut ApplyReport) -> Result<Dataset> {
        ensure_schema(data, &self.input_schema)?;
        let other = self.config.other_label.as_str();

        let mut columns = Vec::with_capacity(self.input_schema.len());
        for spec in self.input_schema.iter() {
            let column = data
                .column(&spec.name)
                .ok_or_else(|| BlueprintError::schema_mismatch(&spec.name, "column is missing"))?;
            let (Some(levels), Some(values)) =
                (self.levels_of(&spec.name), column.data().as_nominal())
            else {
                columns.push(column.clone());
                continue;
            };

            let mapped = values
                .iter()
                .map(|v| {
                    if levels.is_kept(v) {
                        v.clone()
                    } else {
                        if v != other && !levels.was_seen(v) {
                            report.record_unseen(&spec.name, v);
                        }
                        other.to_string()
                    }
                })
                .collect();
            columns.push(Column::new(spec.name.clone(), ColumnData::Nominal(mapped)));
        }

        Ok(Dataset::from_parts(columns, data.n_rows()))
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    /// Collapsing keeps every column and its kind.
    fn output_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn step_name(&self) -> &'static str {
        "CollapseRare"
    }
}
