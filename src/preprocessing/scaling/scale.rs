//! Scaling to unit standard deviation.
//!
//! Each numeric feature column is divided by its training standard deviation.
//! A column whose standard deviation is zero, negligible relative to its
//! magnitude, or undefined (fewer than `ddof + 1` rows) is degenerate: it is
//! divided by 1 instead, and every apply reports it.

use crate::dataset::{Dataset, Schema};
use crate::error::{BlueprintError, Result};
use crate::preprocessing::report::ApplyReport;
use crate::preprocessing::scaling::{map_numeric, numeric_features, std_dev};
use crate::preprocessing::traits::{ensure_rows, ensure_schema, FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Standard deviations at or below this fraction of the largest absolute
/// value are treated as zero.
const RELATIVE_STD_TOLERANCE: f64 = 1e-12;

/// Configuration for [`Scale`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Delta degrees of freedom of the standard deviation.
    pub ddof: usize,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self { ddof: 1 }
    }
}

impl ScaleConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.ddof > 1 {
            return Err(BlueprintError::InvalidParameter(format!(
                "ddof must be 0 or 1, got {}",
                self.ddof
            )));
        }
        Ok(())
    }
}

/// Scaling step (unfit).
#[derive(Clone, Debug, Default)]
pub struct Scale {
    config: ScaleConfig,
}

impl Scale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ScaleConfig) -> Self {
        Self { config }
    }

    /// Set the delta degrees of freedom (0 for population, 1 for sample std).
    pub fn with_ddof(mut self, ddof: usize) -> Self {
        self.config.ddof = ddof;
        self
    }
}

/// Frozen scale of one column. `factor` is `std`, or 1 for degenerate columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnScale {
    pub column: String,
    pub std: f64,
    pub factor: f64,
}

/// Fitted scaling step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedScale {
    config: ScaleConfig,
    scales: Vec<ColumnScale>,
    degenerate: Vec<String>,
    input_schema: Schema,
}

impl FittedScale {
    pub fn scales(&self) -> &[ColumnScale] {
        &self.scales
    }

    pub fn scale_of(&self, column: &str) -> Option<&ColumnScale> {
        self.scales.iter().find(|s| s.column == column)
    }

    /// Columns scaled by 1 because their training std was zero.
    pub fn degenerate(&self) -> &[String] {
        &self.degenerate
    }
}

fn is_degenerate(std: f64, values: &[f64]) -> bool {
    let max_abs = values.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    !std.is_finite() || std == 0.0 || std <= RELATIVE_STD_TOLERANCE * max_abs
}

impl Transformer for Scale {
    type Fitted = FittedScale;

    fn fit(&self, data: &Dataset, target: &str) -> Result<Self::Fitted> {
        self.config.validate()?;
        ensure_rows(data, "Scale")?;

        let mut scales = Vec::new();
        let mut degenerate = Vec::new();
        for (column, values) in numeric_features(data, target) {
            let std = std_dev(values, self.config.ddof);
            let factor = if is_degenerate(std, values) {
                warn!(column, std, "zero standard deviation, scaling by 1");
                degenerate.push(column.to_string());
                1.0
            } else {
                std
            };
            debug!(column, std, "scale fit");
            scales.push(ColumnScale {
                column: column.to_string(),
                std,
                factor,
            });
        }

        Ok(FittedScale {
            config: self.config.clone(),
            scales,
            degenerate,
            input_schema: data.schema(),
        })
    }
}

impl FittedTransformer for FittedScale {
    fn transform(&self, data: &Dataset, report: &mut ApplyReport) -> Result<Dataset> {
        ensure_schema(data, &self.input_schema)?;
        for column in &self.degenerate {
            report.record_degenerate(column);
        }
        map_numeric(data, &self.input_schema, |column, values| {
            self.scale_of(column)
                .map(|s| values.iter().map(|x| x / s.factor).collect())
        })
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn step_name(&self) -> &'static str {
        "Scale"
    }
}
