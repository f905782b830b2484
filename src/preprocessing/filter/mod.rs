//! Column filters.
//!
//! Filters decide at fit time which columns to remove; the decision is frozen
//! and replayed on every apply.

mod near_zero_variance;

pub use near_zero_variance::{
    ColumnVariance, FittedNearZeroVariance, NearZeroVariance, NearZeroVarianceConfig, NzvRule,
};
