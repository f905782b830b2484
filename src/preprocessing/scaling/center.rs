//! Mean centering.

use crate::dataset::{Dataset, Schema};
use crate::error::Result;
use crate::preprocessing::report::ApplyReport;
use crate::preprocessing::scaling::{map_numeric, mean, numeric_features};
use crate::preprocessing::traits::{ensure_rows, ensure_schema, FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Subtracts the training mean of every numeric feature column.
#[derive(Clone, Debug, Default)]
pub struct Center;

impl Center {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnMean {
    pub column: String,
    pub mean: f64,
}

/// Fitted centering step with frozen means.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedCenter {
    means: Vec<ColumnMean>,
    input_schema: Schema,
}

impl FittedCenter {
    pub fn means(&self) -> &[ColumnMean] {
        &self.means
    }

    pub fn mean_of(&self, column: &str) -> Option<f64> {
        self.means.iter().find(|m| m.column == column).map(|m| m.mean)
    }
}

impl Transformer for Center {
    type Fitted = FittedCenter;

    fn fit(&self, data: &Dataset, target: &str) -> Result<Self::Fitted> {
        ensure_rows(data, "Center")?;
        let means: Vec<ColumnMean> = numeric_features(data, target)
            .map(|(column, values)| ColumnMean {
                column: column.to_string(),
                mean: mean(values),
            })
            .collect();
        debug!(columns = means.len(), "center fit");

        Ok(FittedCenter {
            means,
            input_schema: data.schema(),
        })
    }
}

impl FittedTransformer for FittedCenter {
    fn transform(&self, data: &Dataset, _report: &mut ApplyReport) -> Result<Dataset> {
        ensure_schema(data, &self.input_schema)?;
        map_numeric(data, &self.input_schema, |column, values| {
            self.mean_of(column)
                .map(|m| values.iter().map(|x| x - m).collect())
        })
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn step_name(&self) -> &'static str {
        "Center"
    }
}
