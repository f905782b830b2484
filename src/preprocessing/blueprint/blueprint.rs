//! Fit-once, apply-many feature blueprint.
//!
//! A [`Blueprint`] is an ordered list of unfit steps. Fitting runs each step
//! on the output of the previous one over the training data and freezes the
//! result into a [`FittedBlueprint`], which is immutable and can be applied
//! to any dataset with the fit-time schema.
//!
//! # Example
//! ```ignore
//! use tabular_blueprint::{Blueprint, BlueprintConfig};
//!
//! let fitted = Blueprint::standard(&BlueprintConfig::default()).fit(&train, "Sale_Price")?;
//! let train_x = fitted.transform_split(&train)?;
//! let test_x = fitted.transform_split(&test)?;
//!
//! fitted.save_to_file("blueprint.bin")?;
//! let loaded = FittedBlueprint::load_from_file("blueprint.bin")?;
//! ```

use super::step::{FittedStep, Step};
use crate::config::BlueprintConfig;
use crate::dataset::{split, ColumnKind, Dataset, Schema, TensorData};
use crate::error::{BlueprintError, Result};
use crate::preprocessing::encoding::{CollapseRare, OneHotEncoder, OrdinalEncoder};
use crate::preprocessing::filter::NearZeroVariance;
use crate::preprocessing::report::ApplyReport;
use crate::preprocessing::scaling::{Center, Scale, YeoJohnson};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Version written into every serialized blueprint.
pub const FORMAT_VERSION: u32 = 1;

/// Unfit blueprint: an ordered list of step configurations.
#[derive(Clone, Debug, Default)]
pub struct Blueprint {
    steps: Vec<Step>,
}

impl Blueprint {
    /// Create an empty blueprint.
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven-step home price recipe:
    /// near-zero-variance filter, rare-category collapse, ordinal encoding,
    /// Yeo-Johnson, center, scale and one-hot encoding.
    pub fn standard(config: &BlueprintConfig) -> Self {
        Self::new()
            .add_near_zero_variance(NearZeroVariance::from_config(config.nzv.clone()))
            .add_collapse_rare(CollapseRare::from_config(config.rare.clone()))
            .add_ordinal(
                OrdinalEncoder::from_config(config.ordinal.clone())
                    .with_other_label(config.rare.other_label.clone()),
            )
            .add_yeo_johnson(YeoJohnson::from_config(config.yeo_johnson.clone()))
            .add_center(Center::new())
            .add_scale(Scale::from_config(config.scale.clone()))
            .add_one_hot(OneHotEncoder::from_config(config.one_hot()))
    }

    pub fn add_near_zero_variance(mut self, step: NearZeroVariance) -> Self {
        self.steps.push(Step::NearZeroVariance(step));
        self
    }

    pub fn add_collapse_rare(mut self, step: CollapseRare) -> Self {
        self.steps.push(Step::CollapseRare(step));
        self
    }

    pub fn add_ordinal(mut self, step: OrdinalEncoder) -> Self {
        self.steps.push(Step::Ordinal(step));
        self
    }

    pub fn add_yeo_johnson(mut self, step: YeoJohnson) -> Self {
        self.steps.push(Step::YeoJohnson(step));
        self
    }

    pub fn add_center(mut self, step: Center) -> Self {
        self.steps.push(Step::Center(step));
        self
    }

    pub fn add_scale(mut self, step: Scale) -> Self {
        self.steps.push(Step::Scale(step));
        self
    }

    pub fn add_one_hot(mut self, step: OneHotEncoder) -> Self {
        self.steps.push(Step::OneHot(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(Step::name).collect()
    }
}

fn check_target(schema: &Schema, target: &str) -> Result<()> {
    match schema.kind_of(target) {
        None => Err(BlueprintError::invalid_target(target, "column is missing")),
        Some(ColumnKind::Nominal) => Err(BlueprintError::invalid_target(
            target,
            "expected numeric column, found nominal",
        )),
        Some(ColumnKind::Numeric) => Ok(()),
    }
}

/// Verify each step consumes what the previous one produces and the final
/// schema is numeric and still holds the target.
fn check_chain(input: &Schema, steps: &[FittedStep], target: &str) -> Result<Schema> {
    let mut current = input;
    for (i, step) in steps.iter().enumerate() {
        if step.input_schema() != current {
            return Err(BlueprintError::InvalidParameter(format!(
                "step {} ({}) was fit on a schema that differs from its predecessor's output",
                i,
                step.step_name()
            )));
        }
        current = step.output_schema();
    }

    if let Some(column) = current.iter().find(|c| c.kind != ColumnKind::Numeric) {
        return Err(BlueprintError::InvalidParameter(format!(
            "blueprint leaves nominal column `{}` in its output",
            column.name
        )));
    }
    check_target(current, target)?;
    Ok(current.clone())
}

impl Transformer for Blueprint {
    type Fitted = FittedBlueprint;

    /// Fit every step, in order, on the training data.
    ///
    /// # Errors
    /// - [`BlueprintError::InvalidTarget`] if `target` is missing or nominal.
    /// - [`BlueprintError::EmptyData`] if `data` has no rows.
    /// - [`BlueprintError::NonFinite`] if a numeric cell is NaN or infinite.
    /// - [`BlueprintError::InvalidParameter`] for an empty blueprint, an
    ///   out-of-range step setting, or an output that is not all numeric.
    fn fit(&self, data: &Dataset, target: &str) -> Result<FittedBlueprint> {
        if self.steps.is_empty() {
            return Err(BlueprintError::InvalidParameter(
                "cannot fit an empty blueprint".to_string(),
            ));
        }
        let input_schema = data.schema();
        check_target(&input_schema, target)?;
        if data.is_empty() {
            return Err(BlueprintError::EmptyData(
                "cannot fit blueprint on empty data".to_string(),
            ));
        }
        data.check_finite()?;

        let mut steps = Vec::with_capacity(self.steps.len());
        let mut current = data.clone();
        let mut report = ApplyReport::default();
        for step in &self.steps {
            let fitted = step.fit(&current, target)?;
            current = fitted.transform(&current, &mut report)?;
            debug!(
                step = fitted.step_name(),
                columns_out = current.n_cols(),
                "step fit"
            );
            steps.push(fitted);
        }

        let output_schema = check_chain(&input_schema, &steps, target)?;
        info!(
            rows = data.n_rows(),
            columns_in = input_schema.len(),
            columns_out = output_schema.len(),
            "blueprint fit"
        );

        Ok(FittedBlueprint {
            target: target.to_string(),
            input_schema,
            output_schema,
            steps,
        })
    }
}

/// A blueprint with frozen parameters.
///
/// Immutable after fitting; `apply` only reads it, so a single instance can
/// be shared across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedBlueprint {
    target: String,
    input_schema: Schema,
    output_schema: Schema,
    steps: Vec<FittedStep>,
}

impl FittedBlueprint {
    /// Apply the frozen steps to `data`.
    ///
    /// Columns outside the fit-time schema are ignored.
    ///
    /// # Errors
    /// - [`BlueprintError::SchemaMismatch`] naming a missing or retyped column.
    /// - [`BlueprintError::NonFinite`] for NaN or infinite numeric input.
    /// - [`BlueprintError::NonNumericOutput`] if an output cell is not a finite number.
    pub fn apply(&self, data: &Dataset) -> Result<Dataset> {
        self.apply_with_report(data).map(|(out, _)| out)
    }

    /// Like [`apply`](Self::apply), also returning the conditions recovered
    /// by fallback (unseen categories, degenerate columns).
    pub fn apply_with_report(&self, data: &Dataset) -> Result<(Dataset, ApplyReport)> {
        let mut report = ApplyReport::default();
        let out = self.transform(data, &mut report)?;
        info!(
            rows = out.n_rows(),
            columns_out = out.n_cols(),
            recovered = report.conditions().len(),
            "blueprint apply"
        );
        Ok((out, report))
    }

    /// [`apply`](Self::apply) followed by [`split`](crate::dataset::split)
    /// on the target column.
    pub fn transform_split(&self, data: &Dataset) -> Result<TensorData> {
        let out = self.apply(data)?;
        split(&out, &self.target)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Raw schema the blueprint was fit on, target included.
    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    /// Schema of every applied dataset: numeric columns, then indicators.
    pub fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    pub fn steps(&self) -> &[FittedStep] {
        &self.steps
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(FittedStep::step_name).collect()
    }

    /// Names of the feature columns produced, target excluded.
    pub fn feature_names(&self) -> Vec<&str> {
        self.output_schema
            .names()
            .into_iter()
            .filter(|name| *name != self.target)
            .collect()
    }

    /// Copy out the frozen parameters.
    pub fn extract_params(&self) -> FittedBlueprintParams {
        FittedBlueprintParams {
            version: FORMAT_VERSION,
            target: self.target.clone(),
            input_schema: self.input_schema.clone(),
            output_schema: self.output_schema.clone(),
            steps: self.steps.clone(),
        }
    }

    /// Rebuild a blueprint from parameters, re-verifying the step chain.
    ///
    /// # Errors
    /// [`BlueprintError::InvalidParameter`] for an unknown version or an
    /// inconsistent step chain.
    pub fn from_params(params: FittedBlueprintParams) -> Result<Self> {
        if params.version != FORMAT_VERSION {
            return Err(BlueprintError::InvalidParameter(format!(
                "unsupported blueprint format version {} (expected {})",
                params.version, FORMAT_VERSION
            )));
        }
        check_target(&params.input_schema, &params.target)?;
        let output_schema = check_chain(&params.input_schema, &params.steps, &params.target)?;
        if output_schema != params.output_schema {
            return Err(BlueprintError::InvalidParameter(
                "stored output schema does not match the step chain".to_string(),
            ));
        }
        Ok(Self {
            target: params.target,
            input_schema: params.input_schema,
            output_schema,
            steps: params.steps,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.extract_params().to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_params(FittedBlueprintParams::from_bytes(bytes)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.extract_params().save_to_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_params(FittedBlueprintParams::load_from_file(path)?)
    }
}

impl FittedTransformer for FittedBlueprint {
    fn transform(&self, data: &Dataset, report: &mut ApplyReport) -> Result<Dataset> {
        let mut current = data.select(&self.input_schema)?;
        current.check_finite()?;
        for step in &self.steps {
            current = step.transform(&current, report)?;
        }
        ensure_numeric_output(&current)?;
        Ok(current)
    }

    fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    fn step_name(&self) -> &'static str {
        "Blueprint"
    }
}

fn ensure_numeric_output(data: &Dataset) -> Result<()> {
    for column in data.columns() {
        let row = match column.data().as_numeric() {
            Some(values) => values.iter().position(|v| !v.is_finite()),
            None => Some(0),
        };
        if let Some(row) = row {
            return Err(BlueprintError::NonNumericOutput {
                column: column.name().to_string(),
                row,
            });
        }
    }
    Ok(())
}

/// Serializable form of a [`FittedBlueprint`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedBlueprintParams {
    pub version: u32,
    pub target: String,
    pub input_schema: Schema,
    pub output_schema: Schema,
    pub steps: Vec<FittedStep>,
}
