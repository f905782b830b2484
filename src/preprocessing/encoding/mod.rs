//! Nominal column handling.
//!
//! - [`CollapseRare`] pools infrequent categories into a fallback level.
//! - [`OrdinalEncoder`] maps ordered quality/condition levels to integers.
//! - [`OneHotEncoder`] replaces each nominal column with indicator columns.
//!
//! All three fall back deterministically on values not seen at fit time and
//! record them in the [`ApplyReport`](crate::preprocessing::ApplyReport).

pub mod collapse_rare;
pub mod one_hot;
pub mod ordinal;

pub use collapse_rare::{CollapseRare, CollapseRareConfig, FittedCollapseRare, KeptLevels};
pub use one_hot::{DummyEncoding, FittedOneHotEncoder, OneHotConfig, OneHotEncoder};
pub use ordinal::{FittedOrdinalEncoder, OrdinalConfig, OrdinalEncoder, OrdinalMapping};
