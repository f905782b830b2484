//! Near-zero-variance filter for nominal columns.
//!
//! For each nominal column two statistics are computed on the training data:
//! ```text
//! freq_ratio     = count(most frequent value) / count(second most frequent value)
//! percent_unique = 100 * distinct values / rows
//! ```
//! A column with a single distinct value has an infinite frequency ratio and is
//! always removed.

use crate::dataset::{Dataset, Schema};
use crate::error::{BlueprintError, Result};
use crate::preprocessing::report::ApplyReport;
use crate::preprocessing::traits::{ensure_rows, ensure_schema, FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// How the two criteria combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NzvRule {
    /// Remove when both the frequency ratio and the unique percentage flag the column.
    ///
    /// This is the default because it is the rule of the caret/recipes
    /// `nearZeroVar` filter. A column with few distinct but balanced levels,
    /// such as a two-level flag, fails the unique percentage alone and would
    /// be dropped under [`NzvRule::Either`].
    #[default]
    Both,
    /// Remove when either criterion flags the column.
    Either,
}

/// Configuration for [`NearZeroVariance`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NearZeroVarianceConfig {
    /// Frequency ratio above which a column is flagged.
    pub freq_cut: f64,
    /// Unique-value percentage (0-100) below which a column is flagged.
    pub unique_cut: f64,
    /// How the two flags combine.
    pub rule: NzvRule,
}

impl Default for NearZeroVarianceConfig {
    fn default() -> Self {
        Self {
            freq_cut: 95.0 / 5.0,
            unique_cut: 10.0,
            rule: NzvRule::Both,
        }
    }
}

impl NearZeroVarianceConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.freq_cut >= 1.0) {
            return Err(BlueprintError::InvalidParameter(format!(
                "freq_cut must be >= 1, got {}",
                self.freq_cut
            )));
        }
        if !(0.0..=100.0).contains(&self.unique_cut) {
            return Err(BlueprintError::InvalidParameter(format!(
                "unique_cut must be in [0, 100], got {}",
                self.unique_cut
            )));
        }
        Ok(())
    }
}

/// Near-zero-variance filter (unfit).
#[derive(Clone, Debug, Default)]
pub struct NearZeroVariance {
    config: NearZeroVarianceConfig,
}

impl NearZeroVariance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: NearZeroVarianceConfig) -> Self {
        Self { config }
    }

    /// Set the frequency ratio cutoff.
    pub fn with_freq_cut(mut self, freq_cut: f64) -> Self {
        self.config.freq_cut = freq_cut;
        self
    }

    /// Set the unique-value percentage cutoff.
    pub fn with_unique_cut(mut self, unique_cut: f64) -> Self {
        self.config.unique_cut = unique_cut;
        self
    }

    /// Set how the two criteria combine.
    pub fn with_rule(mut self, rule: NzvRule) -> Self {
        self.config.rule = rule;
        self
    }
}

/// Training statistics for one nominal column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnVariance {
    pub column: String,
    pub freq_ratio: f64,
    pub percent_unique: f64,
    pub removed: bool,
}

/// Fitted near-zero-variance filter: the frozen list of removed columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedNearZeroVariance {
    config: NearZeroVarianceConfig,
    stats: Vec<ColumnVariance>,
    removed: Vec<String>,
    input_schema: Schema,
    output_schema: Schema,
}

impl FittedNearZeroVariance {
    /// Columns dropped on every apply, in input order.
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    /// Statistics of every nominal column seen at fit.
    pub fn stats(&self) -> &[ColumnVariance] {
        &self.stats
    }
}

fn column_variance(column: &str, values: &[String], config: &NearZeroVarianceConfig) -> ColumnVariance {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }

    let mut freqs: Vec<usize> = counts.values().copied().collect();
    freqs.sort_unstable_by(|a, b| b.cmp(a));

    let distinct = freqs.len();
    let freq_ratio = match freqs.as_slice() {
        [first, second, ..] => *first as f64 / *second as f64,
        _ => f64::INFINITY,
    };
    let percent_unique = 100.0 * distinct as f64 / values.len() as f64;

    let freq_flag = freq_ratio > config.freq_cut;
    let unique_flag = percent_unique < config.unique_cut;
    let removed = distinct <= 1
        || match config.rule {
            NzvRule::Both => freq_flag && unique_flag,
            NzvRule::Either => freq_flag || unique_flag,
        };

    ColumnVariance {
        column: column.to_string(),
        freq_ratio,
        percent_unique,
        removed,
    }
}

impl Transformer for NearZeroVariance {
    type Fitted = FittedNearZeroVariance;

    fn fit(&self, data: &Dataset, target: &str) -> Result<Self::Fitted> {
        self.config.validate()?;
        ensure_rows(data, "NearZeroVariance")?;

        let input_schema = data.schema();
        let mut stats = Vec::new();
        for column in data.columns() {
            if column.name() == target {
                continue;
            }
            if let Some(values) = column.data().as_nominal() {
                stats.push(column_variance(column.name(), values, &self.config));
            }
        }

        let removed: Vec<String> = stats
            .iter()
            .filter(|s| s.removed)
            .map(|s| s.column.clone())
            .collect();
        let output_schema = Schema::new(
            input_schema
                .iter()
                .filter(|c| !removed.contains(&c.name))
                .cloned()
                .collect(),
        );
        debug!(?removed, "near-zero-variance filter fit");

        Ok(FittedNearZeroVariance {
            config: self.config.clone(),
            stats,
            removed,
            input_schema,
            output_schema,
        })
    }
}

impl FittedTransformer for FittedNearZeroVariance {
    fn transform(&self, data: &Dataset, _report: &mut ApplyReport) -> Result<Dataset> {
        ensure_schema(data, &self.input_schema)?;
        let columns = self
            .output_schema
            .iter()
            .filter_map(|spec| data.column(&spec.name).cloned())
            .collect();
        Ok(Dataset::from_parts(columns, data.n_rows()))
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    fn step_name(&self) -> &'static str {
        "NearZeroVariance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn repeat(parts: &[(&str, usize)]) -> Vec<String> {
        parts
            .iter()
            .flat_map(|&(v, n)| std::iter::repeat(v.to_string()).take(n))
            .collect()
    }

    fn create_test_data() -> Dataset {
        Dataset::new(vec![
            // 96 / 4 = 24 > 19, 2 distinct of 100 rows = 2% < 10%
            Column::nominal("Street", repeat(&[("Pave", 96), ("Grvl", 4)])),
            // 60 / 40 = 1.5
            Column::nominal("Lot_Shape", repeat(&[("Regular", 60), ("Irregular", 40)])),
            Column::nominal("Utilities", repeat(&[("AllPub", 100)])),
            Column::numeric("Lot_Area", (0..100).map(|i| i as f64).collect()),
            Column::numeric("Sale_Price", (0..100).map(|i| 1000.0 * i as f64).collect()),
        ])
        .unwrap()
    }

    #[test]
    fn test_nzv_removes_imbalanced_and_constant() {
        let fitted = NearZeroVariance::new().fit(&create_test_data(), "Sale_Price").unwrap();
        assert_eq!(fitted.removed(), &["Street".to_string(), "Utilities".to_string()]);
        assert_eq!(
            fitted.output_schema().names(),
            vec!["Lot_Shape", "Lot_Area", "Sale_Price"]
        );
    }

    #[test]
    fn test_nzv_stats() {
        let fitted = NearZeroVariance::new().fit(&create_test_data(), "Sale_Price").unwrap();
        let street = &fitted.stats()[0];
        assert_eq!(street.column, "Street");
        assert!((street.freq_ratio - 24.0).abs() < 1e-12);
        assert!((street.percent_unique - 2.0).abs() < 1e-12);
        assert!(fitted.stats()[2].freq_ratio.is_infinite());
    }

    #[test]
    fn test_nzv_default_rule_needs_both_criteria() {
        assert_eq!(NzvRule::default(), NzvRule::Both);
        // Lot_Shape fails only the unique percentage and survives.
        let fitted = NearZeroVariance::new().fit(&create_test_data(), "Sale_Price").unwrap();
        let lot_shape = &fitted.stats()[1];
        assert_eq!(lot_shape.column, "Lot_Shape");
        assert!(lot_shape.percent_unique < 10.0);
        assert!(!fitted.removed().contains(&"Lot_Shape".to_string()));
    }

    #[test]
    fn test_nzv_either_rule() {
        // Lot_Shape: 2% unique < 10% flags it under Either.
        let fitted = NearZeroVariance::new()
            .with_rule(NzvRule::Either)
            .fit(&create_test_data(), "Sale_Price")
            .unwrap();
        assert!(fitted.removed().contains(&"Lot_Shape".to_string()));
    }

    #[test]
    fn test_nzv_relaxed_cut_keeps_column() {
        let fitted = NearZeroVariance::new()
            .with_freq_cut(50.0)
            .fit(&create_test_data(), "Sale_Price")
            .unwrap();
        assert_eq!(fitted.removed(), &["Utilities".to_string()]);
    }

    #[test]
    fn test_nzv_apply_drops_same_columns() {
        let fitted = NearZeroVariance::new().fit(&create_test_data(), "Sale_Price").unwrap();
        // A balanced Street column at apply time is still dropped.
        let holdout = Dataset::new(vec![
            Column::nominal("Street", vec!["Pave", "Grvl"]),
            Column::nominal("Lot_Shape", vec!["Regular", "Regular"]),
            Column::nominal("Utilities", vec!["AllPub", "NoSewr"]),
            Column::numeric("Lot_Area", vec![1.0, 2.0]),
            Column::numeric("Sale_Price", vec![1.0, 2.0]),
        ])
        .unwrap();
        let out = fitted.transform(&holdout, &mut ApplyReport::default()).unwrap();
        assert_eq!(out.schema(), *fitted.output_schema());
    }

    #[test]
    fn test_nzv_ignores_numeric_columns() {
        let ds = Dataset::new(vec![
            Column::numeric("Pool_Area", vec![0.0; 20]),
            Column::numeric("Sale_Price", vec![1.0; 20]),
        ])
        .unwrap();
        let fitted = NearZeroVariance::new().fit(&ds, "Sale_Price").unwrap();
        assert!(fitted.removed().is_empty());
    }

    #[test]
    fn test_nzv_invalid_config() {
        let result = NearZeroVariance::new()
            .with_unique_cut(150.0)
            .fit(&create_test_data(), "Sale_Price");
        assert!(matches!(result, Err(BlueprintError::InvalidParameter(_))));
    }

    #[test]
    fn test_nzv_empty_data() {
        let ds = Dataset::new(vec![Column::nominal("a", Vec::<String>::new())]).unwrap();
        assert!(matches!(
            NearZeroVariance::new().fit(&ds, "price"),
            Err(BlueprintError::EmptyData(_))
        ));
    }
}
