//! Feature preprocessing.
//!
//! Every step comes in two types: an unfit configuration implementing
//! [`Transformer`] and a fitted, immutable parameter record implementing
//! [`FittedTransformer`]. Steps are composed into a [`Blueprint`].
//!
//! | Module | Steps |
//! |--------|-------|
//! | [`filter`] | [`NearZeroVariance`] |
//! | [`encoding`] | [`CollapseRare`], [`OrdinalEncoder`], [`OneHotEncoder`] |
//! | [`scaling`] | [`YeoJohnson`], [`Center`], [`Scale`] |

pub mod blueprint;
pub mod encoding;
pub mod filter;
pub mod report;
pub mod scaling;
pub mod traits;

pub use blueprint::{
    apply, fit, Blueprint, FittedBlueprint, FittedBlueprintParams, FittedStep, Step,
};
pub use encoding::{
    CollapseRare, CollapseRareConfig, FittedCollapseRare, FittedOneHotEncoder,
    FittedOrdinalEncoder, OneHotConfig, OneHotEncoder, OrdinalConfig, OrdinalEncoder,
};
pub use filter::{FittedNearZeroVariance, NearZeroVariance, NearZeroVarianceConfig, NzvRule};
pub use report::ApplyReport;
pub use scaling::{
    Center, FittedCenter, FittedScale, FittedYeoJohnson, Scale, ScaleConfig, YeoJohnson,
    YeoJohnsonConfig,
};
pub use traits::{FittedTransformer, Transformer};
