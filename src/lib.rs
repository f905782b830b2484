//! # tabular-blueprint
//!
//! Deterministic, fit-once / apply-many feature preprocessing for tabular
//! regression data such as home sale prices.
//!
//! A [`Blueprint`] is fit once on training data. The resulting
//! [`FittedBlueprint`] holds only frozen parameters and turns any dataset with
//! the same raw schema into a fully numeric table, which [`split`] then
//! separates into an `ndarray` feature matrix and target vector for an
//! external trainer.
//!
//! The standard recipe, in order:
//! 1. drop near-zero-variance nominal columns
//! 2. collapse rare categories into `other`
//! 3. ordinal-encode quality/condition columns
//! 4. Yeo-Johnson transform numeric columns
//! 5. center
//! 6. scale
//! 7. one-hot encode the remaining nominal columns
//!
//! # Example
//! ```ignore
//! use tabular_blueprint::{train_test_split, Blueprint, BlueprintConfig, Transformer};
//! use tabular_blueprint::dataset::csv_io::{read_csv, CsvOptions};
//!
//! let data = read_csv("ames.csv", &CsvOptions::new())?;
//! let (train, test) = train_test_split(&data, 0.7, 123)?;
//!
//! let fitted = Blueprint::standard(&BlueprintConfig::default()).fit(&train, "Sale_Price")?;
//! let train_xy = fitted.transform_split(&train)?;
//! let test_xy = fitted.transform_split(&test)?;
//! for (x, y) in train_xy.batches(32) {
//!     // hand off to the trainer
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod preprocessing;
pub mod serialization;

pub use config::BlueprintConfig;
pub use dataset::{
    split, train_test_split, Column, ColumnData, ColumnKind, Dataset, Schema, TensorData, Value,
};
pub use error::{BlueprintError, RecoveredCondition, Result};
pub use preprocessing::{
    apply, fit, ApplyReport, Blueprint, FittedBlueprint, FittedTransformer, Transformer,
};
pub use serialization::SerializableParams;
