//! Closed sets of unfit and fitted steps.
//!
//! Steps are stored as enums rather than trait objects so a fitted blueprint
//! can be serialized with its step kinds tagged.

use crate::dataset::{Dataset, Schema};
use crate::error::Result;
use crate::preprocessing::encoding::{
    CollapseRare, FittedCollapseRare, FittedOneHotEncoder, FittedOrdinalEncoder, OneHotEncoder,
    OrdinalEncoder,
};
use crate::preprocessing::filter::{FittedNearZeroVariance, NearZeroVariance};
use crate::preprocessing::report::ApplyReport;
use crate::preprocessing::scaling::{
    Center, FittedCenter, FittedScale, FittedYeoJohnson, Scale, YeoJohnson,
};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};

/// A step in an unfit blueprint.
#[derive(Clone, Debug)]
pub enum Step {
    NearZeroVariance(NearZeroVariance),
    CollapseRare(CollapseRare),
    Ordinal(OrdinalEncoder),
    YeoJohnson(YeoJohnson),
    Center(Center),
    Scale(Scale),
    OneHot(OneHotEncoder),
}

impl Step {
    pub(crate) fn fit(&self, data: &Dataset, target: &str) -> Result<FittedStep> {
        match self {
            Step::NearZeroVariance(t) => t.fit(data, target).map(FittedStep::NearZeroVariance),
            Step::CollapseRare(t) => t.fit(data, target).map(FittedStep::CollapseRare),
            Step::Ordinal(t) => t.fit(data, target).map(FittedStep::Ordinal),
            Step::YeoJohnson(t) => t.fit(data, target).map(FittedStep::YeoJohnson),
            Step::Center(t) => t.fit(data, target).map(FittedStep::Center),
            Step::Scale(t) => t.fit(data, target).map(FittedStep::Scale),
            Step::OneHot(t) => t.fit(data, target).map(FittedStep::OneHot),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::NearZeroVariance(_) => "NearZeroVariance",
            Step::CollapseRare(_) => "CollapseRare",
            Step::Ordinal(_) => "OrdinalEncoder",
            Step::YeoJohnson(_) => "YeoJohnson",
            Step::Center(_) => "Center",
            Step::Scale(_) => "Scale",
            Step::OneHot(_) => "OneHotEncoder",
        }
    }
}

/// A step in a fitted blueprint, with its frozen parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FittedStep {
    NearZeroVariance(FittedNearZeroVariance),
    CollapseRare(FittedCollapseRare),
    Ordinal(FittedOrdinalEncoder),
    YeoJohnson(FittedYeoJohnson),
    Center(FittedCenter),
    Scale(FittedScale),
    OneHot(FittedOneHotEncoder),
}

impl FittedTransformer for FittedStep {
    fn transform(&self, data: &Dataset, report: &mut ApplyReport) -> Result<Dataset> {
        match self {
            FittedStep::NearZeroVariance(t) => t.transform(data, report),
            FittedStep::CollapseRare(t) => t.transform(data, report),
            FittedStep::Ordinal(t) => t.transform(data, report),
            FittedStep::YeoJohnson(t) => t.transform(data, report),
            FittedStep::Center(t) => t.transform(data, report),
            FittedStep::Scale(t) => t.transform(data, report),
            FittedStep::OneHot(t) => t.transform(data, report),
        }
    }

    fn input_schema(&self) -> &Schema {
        match self {
            FittedStep::NearZeroVariance(t) => t.input_schema(),
            FittedStep::CollapseRare(t) => t.input_schema(),
            FittedStep::Ordinal(t) => t.input_schema(),
            FittedStep::YeoJohnson(t) => t.input_schema(),
            FittedStep::Center(t) => t.input_schema(),
            FittedStep::Scale(t) => t.input_schema(),
            FittedStep::OneHot(t) => t.input_schema(),
        }
    }

    fn output_schema(&self) -> &Schema {
        match self {
            FittedStep::NearZeroVariance(t) => t.output_schema(),
            FittedStep::CollapseRare(t) => t.output_schema(),
            FittedStep::Ordinal(t) => t.output_schema(),
            FittedStep::YeoJohnson(t) => t.output_schema(),
            FittedStep::Center(t) => t.output_schema(),
            FittedStep::Scale(t) => t.output_schema(),
            FittedStep::OneHot(t) => t.output_schema(),
        }
    }

    fn step_name(&self) -> &'static str {
        match self {
            FittedStep::NearZeroVariance(t) => t.step_name(),
            FittedStep::CollapseRare(t) => t.step_name(),
            FittedStep::Ordinal(t) => t.step_name(),
            FittedStep::YeoJohnson(t) => t.step_name(),
            FittedStep::Center(t) => t.step_name(),
            FittedStep::Scale(t) => t.step_name(),
            FittedStep::OneHot(t) => t.step_name(),
        }
    }
}
