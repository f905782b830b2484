//! Core traits for blueprint steps.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: the unfit step; holds only configuration and learns from data.
//! - [`FittedTransformer`]: the fit step; holds frozen parameters and applies them.
//!
//! Fitted steps carry their input and output [`Schema`] so that step
//! composition can be checked without running any data through it.

use crate::dataset::{Dataset, Schema};
use crate::error::{BlueprintError, Result};
use crate::preprocessing::report::ApplyReport;

/// Unfit step with configuration only.
///
/// `fit` is a pure function of the configuration and the training data; it
/// never mutates either.
///
/// # Example
/// ```ignore
/// use tabular_blueprint::preprocessing::{Center, Transformer, FittedTransformer};
///
/// let fitted = Center::new().fit(&training, "Sale_Price")?;
/// let centered = fitted.transform(&holdout, &mut ApplyReport::default())?;
/// ```
pub trait Transformer: Clone {
    /// The fit step produced by [`Transformer::fit`].
    type Fitted: FittedTransformer;

    /// Learn parameters from `data`. The `target` column is never transformed.
    ///
    /// # Errors
    /// Returns [`BlueprintError`] if:
    /// - Data is empty
    /// - The configuration is out of range
    fn fit(&self, data: &Dataset, target: &str) -> Result<Self::Fitted>;

    /// Fit on `data` and transform it in one step.
    fn fit_transform(&self, data: &Dataset, target: &str) -> Result<(Self::Fitted, Dataset)> {
        let fitted = self.fit(data, target)?;
        let transformed = fitted.transform(data, &mut ApplyReport::default())?;
        Ok((fitted, transformed))
    }
}

/// Fit step with frozen parameters.
///
/// `transform` uses only the frozen parameters; nothing is re-estimated from
/// the data it is applied to.
pub trait FittedTransformer: Clone {
    /// Apply the frozen transformation.
    ///
    /// Recovered conditions (unseen categories, degenerate columns) are
    /// recorded in `report` instead of failing.
    ///
    /// # Errors
    /// [`BlueprintError::SchemaMismatch`] if `data` does not match [`input_schema`](Self::input_schema).
    fn transform(&self, data: &Dataset, report: &mut ApplyReport) -> Result<Dataset>;

    /// Schema the step was fit on.
    fn input_schema(&self) -> &Schema;

    /// Schema the step produces.
    fn output_schema(&self) -> &Schema;

    /// Human-readable step name.
    fn step_name(&self) -> &'static str;
}

/// Check that every column of `schema` is present in `data` with the same kind.
pub(crate) fn ensure_schema(data: &Dataset, schema: &Schema) -> Result<()> {
    for spec in schema.iter() {
        match data.column(&spec.name) {
            None => {
                return Err(BlueprintError::schema_mismatch(
                    &spec.name,
                    "column is missing",
                ))
            }
            Some(column) if column.kind() != spec.kind => {
                return Err(BlueprintError::schema_mismatch(
                    &spec.name,
                    format!("expected {} column, found {}", spec.kind, column.kind()),
                ))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Fail with [`BlueprintError::EmptyData`] when `data` has no rows.
pub(crate) fn ensure_rows(data: &Dataset, step: &str) -> Result<()> {
    if data.is_empty() {
        return Err(BlueprintError::EmptyData(format!(
            "cannot fit {} on empty data",
            step
        )));
    }
    Ok(())
}
