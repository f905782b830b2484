//! Yeo-Johnson power transform.
//!
//! ```text
//! x >= 0, λ != 0:  ((x + 1)^λ - 1) / λ
//! x >= 0, λ == 0:  ln(x + 1)
//! x <  0, λ != 2:  -((1 - x)^(2 - λ) - 1) / (2 - λ)
//! x <  0, λ == 2:  -ln(1 - x)
//! ```
//!
//! The lambda of each column maximizes the profile log-likelihood
//! ```text
//! llf(λ) = (λ - 1) Σ sign(x) ln(|x| + 1) - n/2 ln(var(yj(x, λ)))
//! ```
//! over a bounded interval, found by golden-section search.

use crate::dataset::{Dataset, Schema};
use crate::error::{BlueprintError, Result};
use crate::preprocessing::report::ApplyReport;
use crate::preprocessing::scaling::{map_numeric, numeric_features};
use crate::preprocessing::traits::{ensure_rows, ensure_schema, FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use tracing::debug;

const LAMBDA_EPS: f64 = 1e-10;

/// Transform a single value.
pub fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < LAMBDA_EPS {
            x.ln_1p()
        } else {
            ((lambda * x.ln_1p()).exp() - 1.0) / lambda
        }
    } else if (lambda - 2.0).abs() < LAMBDA_EPS {
        -(-x).ln_1p()
    } else {
        let p = 2.0 - lambda;
        -((p * (-x).ln_1p()).exp() - 1.0) / p
    }
}

/// Profile log-likelihood of `lambda` for `values`. `-inf` when the
/// transformed variance is zero or not finite.
pub fn log_likelihood(values: &[f64], lambda: f64) -> f64 {
    let n = values.len() as f64;
    let transformed: Vec<f64> = values.iter().map(|&x| yeo_johnson(x, lambda)).collect();
    let m = transformed.iter().sum::<f64>() / n;
    let var = transformed.iter().map(|y| (y - m) * (y - m)).sum::<f64>() / n;
    if !(var.is_finite() && var > 0.0) {
        return f64::NEG_INFINITY;
    }
    let jacobian: f64 = values.iter().map(|&x| x.signum() * x.abs().ln_1p()).sum();
    (lambda - 1.0) * jacobian - n / 2.0 * var.ln()
}

/// Lambda in `[lower, upper]` maximizing [`log_likelihood`], to within `tolerance`.
pub fn estimate_lambda(values: &[f64], lower: f64, upper: f64, tolerance: f64) -> f64 {
    let inv_phi = (5.0f64.sqrt() - 1.0) / 2.0;
    let (mut a, mut b) = (lower, upper);
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = log_likelihood(values, c);
    let mut fd = log_likelihood(values, d);

    while b - a > tolerance {
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = log_likelihood(values, c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = log_likelihood(values, d);
        }
    }
    (a + b) / 2.0
}

/// Configuration for [`YeoJohnson`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YeoJohnsonConfig {
    /// Lower bound of the lambda search interval.
    pub lower: f64,
    /// Upper bound of the lambda search interval.
    pub upper: f64,
    /// Width of the final search interval.
    pub tolerance: f64,
    /// Columns with fewer distinct training values are left untransformed.
    pub min_unique: usize,
}

impl Default for YeoJohnsonConfig {
    fn default() -> Self {
        Self {
            lower: -5.0,
            upper: 5.0,
            tolerance: 1e-8,
            min_unique: 5,
        }
    }
}

impl YeoJohnsonConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.lower.is_finite() && self.upper.is_finite() && self.lower < self.upper) {
            return Err(BlueprintError::InvalidParameter(format!(
                "lambda search interval [{}, {}] is empty or unbounded",
                self.lower, self.upper
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(BlueprintError::InvalidParameter(format!(
                "lambda tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Yeo-Johnson transform (unfit).
#[derive(Clone, Debug, Default)]
pub struct YeoJohnson {
    config: YeoJohnsonConfig,
}

impl YeoJohnson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: YeoJohnsonConfig) -> Self {
        Self { config }
    }

    /// Set the lambda search interval.
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.config.lower = lower;
        self.config.upper = upper;
        self
    }

    /// Set the minimum number of distinct values a column needs to be transformed.
    pub fn with_min_unique(mut self, min_unique: usize) -> Self {
        self.config.min_unique = min_unique;
        self
    }
}

/// Frozen lambda of one column; `None` leaves the column untransformed.
///
/// `min` and `max` bound the training values. A new value whose transform
/// overflows is clamped into that range before transforming.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnLambda {
    pub column: String,
    pub lambda: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl ColumnLambda {
    /// Transform `x` with the frozen lambda, falling back to the training
    /// range when the result is not finite.
    pub fn apply(&self, lambda: f64, x: f64) -> f64 {
        let y = yeo_johnson(x, lambda);
        if y.is_finite() {
            y
        } else {
            yeo_johnson(x.clamp(self.min, self.max), lambda)
        }
    }
}

/// Fitted Yeo-Johnson transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedYeoJohnson {
    config: YeoJohnsonConfig,
    lambdas: Vec<ColumnLambda>,
    input_schema: Schema,
}

impl FittedYeoJohnson {
    pub fn lambdas(&self) -> &[ColumnLambda] {
        &self.lambdas
    }

    /// Frozen lambda of `column`, if it is transformed.
    pub fn lambda(&self, column: &str) -> Option<f64> {
        self.lambdas
            .iter()
            .find(|l| l.column == column)
            .and_then(|l| l.lambda)
    }
}

fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

impl Transformer for YeoJohnson {
    type Fitted = FittedYeoJohnson;

    fn fit(&self, data: &Dataset, target: &str) -> Result<Self::Fitted> {
        self.config.validate()?;
        ensure_rows(data, "YeoJohnson")?;

        let lambdas = numeric_features(data, target)
            .map(|(column, values)| {
                let lambda = if distinct_count(values) < self.config.min_unique {
                    None
                } else {
                    let lambda = estimate_lambda(
                        values,
                        self.config.lower,
                        self.config.upper,
                        self.config.tolerance,
                    );
                    // Overflowing lambdas would leave non-finite training values.
                    values
                        .iter()
                        .all(|&x| yeo_johnson(x, lambda).is_finite())
                        .then_some(lambda)
                        .filter(|&l| log_likelihood(values, l).is_finite())
                };
                debug!(column, ?lambda, "yeo-johnson lambda");
                let (min, max) = values
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                        (lo.min(x), hi.max(x))
                    });
                ColumnLambda {
                    column: column.to_string(),
                    lambda,
                    min,
                    max,
                }
            })
            .collect();

        Ok(FittedYeoJohnson {
            config: self.config.clone(),
            lambdas,
            input_schema: data.schema(),
        })
    }
}

impl FittedTransformer for FittedYeoJohnson {
    fn transform(&self, data: &Dataset, _report: &mut ApplyReport) -> Result<Dataset> {
        ensure_schema(data, &self.input_schema)?;
        map_numeric(data, &self.input_schema, |column, values| {
            let frozen = self.lambdas.iter().find(|l| l.column == column)?;
            let lambda = frozen.lambda?;
            Some(values.iter().map(|&x| frozen.apply(lambda, x)).collect())
        })
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn step_name(&self) -> &'static str {
        "YeoJohnson"
    }
}
