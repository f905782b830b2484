//! Ordinal encoding for quality/condition columns.
//!
//! Nominal columns whose name matches a pattern (by default `Qual|Cond|QC|Qu`,
//! matching e.g. `Overall_Qual`, `Bsmt_Cond`, `Heating_QC`, `Fireplace_Qu`)
//! are mapped to integers. Level `i` of the frozen level list maps to `i + 1`;
//! any value outside it maps to `0`. The fallback label written by rare
//! collapsing also maps to `0` but is not reported as unseen, since
//! collapsing already reported the value it replaced.
//!
//! Level order is the declared order when one is configured for the column,
//! otherwise the order in which levels first appear in the training data.

use crate::dataset::{Column, ColumnData, ColumnKind, Dataset, Schema};
use crate::error::{BlueprintError, Result};
use crate::preprocessing::encoding::collapse_rare::DEFAULT_OTHER_LABEL;
use crate::preprocessing::report::ApplyReport;
use crate::preprocessing::traits::{ensure_rows, ensure_schema, FittedTransformer, Transformer};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Code for values outside the frozen levels.
pub const UNKNOWN_CODE: f64 = 0.0;

/// Configuration for [`OrdinalEncoder`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrdinalConfig {
    /// Regex matched against column names.
    pub pattern: String,
    /// Declared level order per column. Declared columns are encoded even if
    /// their name does not match `pattern`.
    pub declared_levels: BTreeMap<String, Vec<String>>,
    /// Label produced by rare collapsing for unseen values.
    pub other_label: String,
}

impl Default for OrdinalConfig {
    fn default() -> Self {
        Self {
            pattern: "Qual|Cond|QC|Qu".to_string(),
            declared_levels: BTreeMap::new(),
            other_label: DEFAULT_OTHER_LABEL.to_string(),
        }
    }
}

impl OrdinalConfig {
    pub(crate) fn compile(&self) -> Result<Regex> {
        Regex::new(&self.pattern).map_err(|e| {
            BlueprintError::InvalidParameter(format!(
                "invalid ordinal column pattern {:?}: {}",
                self.pattern, e
            ))
        })
    }
}

/// Ordinal encoder (unfit).
#[derive(Clone, Debug, Default)]
pub struct OrdinalEncoder {
    config: OrdinalConfig,
}

impl OrdinalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: OrdinalConfig) -> Self {
        Self { config }
    }

    /// Set the column-name pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = pattern.into();
        self
    }

    /// Set the fallback label that is encoded silently.
    pub fn with_other_label(mut self, label: impl Into<String>) -> Self {
        self.config.other_label = label.into();
        self
    }

    /// Declare the level order of a column, lowest first.
    pub fn with_levels<S: Into<String>>(
        mut self,
        column: impl Into<String>,
        levels: impl IntoIterator<Item = S>,
    ) -> Self {
        self.config
            .declared_levels
            .insert(column.into(), levels.into_iter().map(Into::into).collect());
        self
    }
}

/// Frozen level order for one column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrdinalMapping {
    pub column: String,
    pub levels: Vec<String>,
    pub declared: bool,
}

impl OrdinalMapping {
    /// Code of `value`: its 1-based level position, or [`UNKNOWN_CODE`].
    pub fn code(&self, value: &str) -> f64 {
        self.levels
            .iter()
            .position(|l| l == value)
            .map_or(UNKNOWN_CODE, |i| (i + 1) as f64)
    }
}

/// Fitted ordinal encoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedOrdinalEncoder {
    config: OrdinalConfig,
    mappings: Vec<OrdinalMapping>,
    input_schema: Schema,
    output_schema: Schema,
}

impl FittedOrdinalEncoder {
    /// Frozen mappings, in column order.
    pub fn mappings(&self) -> &[OrdinalMapping] {
        &self.mappings
    }

    pub fn mapping(&self, column: &str) -> Option<&OrdinalMapping> {
        self.mappings.iter().find(|m| m.column == column)
    }
}

fn first_seen_levels(values: &[String]) -> Vec<String> {
    let mut levels: Vec<String> = Vec::new();
    for v in values {
        if !levels.contains(v) {
            levels.push(v.clone());
        }
    }
    levels
}

impl Transformer for OrdinalEncoder {
    type Fitted = FittedOrdinalEncoder;

    fn fit(&self, data: &Dataset, target: &str) -> Result<Self::Fitted> {
        ensure_rows(data, "OrdinalEncoder")?;
        let pattern = self.config.compile()?;
        let input_schema = data.schema();

        for column in self.config.declared_levels.keys() {
            if input_schema.kind_of(column) == Some(ColumnKind::Numeric) {
                return Err(BlueprintError::InvalidParameter(format!(
                    "ordinal levels declared for numeric column `{}`",
                    column
                )));
            }
        }

        let mut mappings = Vec::new();
        for column in data.columns() {
            let Some(values) = column.data().as_nominal() else {
                continue;
            };
            let name = column.name();
            if name == target {
                continue;
            }

            let mapping = match self.config.declared_levels.get(name) {
                Some(levels) => OrdinalMapping {
                    column: name.to_string(),
                    levels: levels.clone(),
                    declared: true,
                },
                None if pattern.is_match(name) => OrdinalMapping {
                    column: name.to_string(),
                    levels: first_seen_levels(values),
                    declared: false,
                },
                None => continue,
            };
            debug!(column = name, levels = ?mapping.levels, "ordinal mapping fit");
            mappings.push(mapping);
        }

        let output_schema = Schema::new(
            input_schema
                .iter()
                .map(|c| {
                    let mut c = c.clone();
                    if mappings.iter().any(|m| m.column == c.name) {
                        c.kind = ColumnKind::Numeric;
                    }
                    c
                })
                .collect(),
        );

        Ok(FittedOrdinalEncoder {
            config: self.config.clone(),
            mappings,
            input_schema,
            output_schema,
        })
    }
}

impl FittedTransformer for FittedOrdinalEncoder {
    fn transform(&self, data: &Dataset, report: &mut ApplyReport) -> Result<Dataset> {
        ensure_schema(data, &self.input_schema)?;

        let mut columns = Vec::with_capacity(self.input_schema.len());
        for spec in self.input_schema.iter() {
            let column = data
                .column(&spec.name)
                .ok_or_else(|| BlueprintError::schema_mismatch(&spec.name, "column is missing"))?;
            let (Some(mapping), Some(values)) =
                (self.mapping(&spec.name), column.data().as_nominal())
            else {
                columns.push(column.clone());
                continue;
            };

            let codes: HashMap<&str, f64> = mapping
                .levels
                .iter()
                .enumerate()
                .map(|(i, l)| (l.as_str(), (i + 1) as f64))
                .collect();
            let encoded = values
                .iter()
                .map(|v| match codes.get(v.as_str()) {
                    Some(&code) => code,
                    None => {
                        if *v != self.config.other_label {
                            report.record_unseen(&spec.name, v);
                        }
                        UNKNOWN_CODE
                    }
                })
                .collect();
            columns.push(Column::new(spec.name.clone(), ColumnData::Numeric(encoded)));
        }

        Ok(Dataset::from_parts(columns, data.n_rows()))
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    fn step_name(&self) -> &'static str {
        "OrdinalEncoder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_data() -> Dataset {
        Dataset::new(vec![
            Column::nominal("Overall_Qual", vec!["Good", "Average", "Good", "Excellent"]),
            Column::nominal("Heating_QC", vec!["Fair", "Fair", "Typical", "Fair"]),
            Column::nominal("Neighborhood", vec!["Gilbert", "Edwards", "Gilbert", "Sawyer"]),
            Column::numeric("Sale_Price", vec![1.0, 2.0, 3.0, 4.0]),
        ])
        .unwrap()
    }

    fn numeric(ds: &Dataset, name: &str) -> Vec<f64> {
        ds.column(name).unwrap().data().as_numeric().unwrap().to_vec()
    }

    #[test]
    fn test_ordinal_matches_pattern() {
        let fitted = OrdinalEncoder::new().fit(&create_test_data(), "Sale_Price").unwrap();
        let names: Vec<&str> = fitted.mappings().iter().map(|m| m.column.as_str()).collect();
        assert_eq!(names, vec!["Overall_Qual", "Heating_QC"]);
        assert_eq!(
            fitted.output_schema().kind_of("Overall_Qual"),
            Some(ColumnKind::Numeric)
        );
        assert_eq!(
            fitted.output_schema().kind_of("Neighborhood"),
            Some(ColumnKind::Nominal)
        );
    }

    #[test]
    fn test_ordinal_first_seen_order() {
        let (fitted, out) = OrdinalEncoder::new()
            .fit_transform(&create_test_data(), "Sale_Price")
            .unwrap();
        assert_eq!(
            fitted.mapping("Overall_Qual").unwrap().levels,
            vec!["Good", "Average", "Excellent"]
        );
        assert_eq!(numeric(&out, "Overall_Qual"), vec![1.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_ordinal_declared_order() {
        let (fitted, out) = OrdinalEncoder::new()
            .with_levels("Overall_Qual", ["Poor", "Average", "Good", "Excellent"])
            .fit_transform(&create_test_data(), "Sale_Price")
            .unwrap();
        assert!(fitted.mapping("Overall_Qual").unwrap().declared);
        assert_eq!(numeric(&out, "Overall_Qual"), vec![3.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_ordinal_unseen_maps_to_zero() {
        let fitted = OrdinalEncoder::new().fit(&create_test_data(), "Sale_Price").unwrap();
        let holdout = Dataset::new(vec![
            Column::nominal("Overall_Qual", vec!["Very_Poor", "Good"]),
            Column::nominal("Heating_QC", vec!["Fair", "Excellent"]),
            Column::nominal("Neighborhood", vec!["Gilbert", "Gilbert"]),
            Column::numeric("Sale_Price", vec![1.0, 2.0]),
        ])
        .unwrap();
        let mut report = ApplyReport::default();
        let out = fitted.transform(&holdout, &mut report).unwrap();

        assert_eq!(numeric(&out, "Overall_Qual"), vec![UNKNOWN_CODE, 1.0]);
        assert_eq!(numeric(&out, "Heating_QC"), vec![1.0, UNKNOWN_CODE]);
        assert_eq!(report.unseen_count("Overall_Qual"), 1);
    }

    #[test]
    fn test_ordinal_other_label_not_reported() {
        let fitted = OrdinalEncoder::new()
            .with_other_label("Rare")
            .fit(&create_test_data(), "Sale_Price")
            .unwrap();
        let holdout = Dataset::new(vec![
            Column::nominal("Overall_Qual", vec!["Rare", "Rare", "Good"]),
            Column::nominal("Heating_QC", vec!["Fair", "other", "Fair"]),
            Column::nominal("Neighborhood", vec!["Gilbert"; 3]),
            Column::numeric("Sale_Price", vec![1.0, 2.0, 3.0]),
        ])
        .unwrap();
        let mut report = ApplyReport::default();
        let out = fitted.transform(&holdout, &mut report).unwrap();

        assert_eq!(numeric(&out, "Overall_Qual"), vec![UNKNOWN_CODE, UNKNOWN_CODE, 1.0]);
        assert_eq!(report.unseen_count("Overall_Qual"), 0);
        // Only the configured label is silent.
        assert_eq!(numeric(&out, "Heating_QC"), vec![1.0, UNKNOWN_CODE, 1.0]);
        assert_eq!(report.unseen_count("Heating_QC"), 1);
    }

    #[test]
    fn test_ordinal_custom_pattern() {
        let fitted = OrdinalEncoder::new()
            .with_pattern("^Neighborhood$")
            .fit(&create_test_data(), "Sale_Price")
            .unwrap();
        assert_eq!(fitted.mappings().len(), 1);
        assert_eq!(fitted.mappings()[0].column, "Neighborhood");
    }

    #[test]
    fn test_ordinal_invalid_pattern() {
        let result = OrdinalEncoder::new()
            .with_pattern("(Qual")
            .fit(&create_test_data(), "Sale_Price");
        assert!(matches!(result, Err(BlueprintError::InvalidParameter(_))));
    }

    #[test]
    fn test_ordinal_declared_numeric_column() {
        let result = OrdinalEncoder::new()
            .with_levels("Sale_Price", ["low", "high"])
            .fit(&create_test_data(), "Sale_Price");
        assert!(matches!(result, Err(BlueprintError::InvalidParameter(_))));
    }

    #[test]
    fn test_mapping_code() {
        let mapping = OrdinalMapping {
            column: "Kitchen_Qual".to_string(),
            levels: vec!["Fair".to_string(), "Good".to_string()],
            declared: true,
        };
        assert_eq!(mapping.code("Good"), 2.0);
        assert_eq!(mapping.code("Poor"), UNKNOWN_CODE);
    }
}
