//! Blueprint: ordered preprocessing steps with fit/apply semantics.

#[allow(clippy::module_inception)]
mod blueprint;
pub mod step;

pub use blueprint::{Blueprint, FittedBlueprint, FittedBlueprintParams, FORMAT_VERSION};
pub use step::{FittedStep, Step};

use crate::config::BlueprintConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::preprocessing::traits::Transformer;

/// Fit the standard recipe with default settings.
pub fn fit(training: &Dataset, target: &str) -> Result<FittedBlueprint> {
    Blueprint::standard(&BlueprintConfig::default()).fit(training, target)
}

/// Apply a fitted blueprint to `dataset`.
pub fn apply(fitted: &FittedBlueprint, dataset: &Dataset) -> Result<Dataset> {
    fitted.apply(dataset)
}
