//! Numeric column transformations.
//!
//! | Step | Learns | Applies |
//! |------|--------|---------|
//! | [`YeoJohnson`] | lambda per column | power transform |
//! | [`Center`] | training mean | `x - mean` |
//! | [`Scale`] | training std (ddof 1) | `x / std`, or `x` when std is zero |
//!
//! Every step acts on the numeric, non-target columns present at fit time and
//! passes all other columns through unchanged.

pub mod center;
pub mod scale;
pub mod yeo_johnson;

pub use center::{Center, ColumnMean, FittedCenter};
pub use scale::{ColumnScale, FittedScale, Scale, ScaleConfig};
pub use yeo_johnson::{
    estimate_lambda, log_likelihood, yeo_johnson, ColumnLambda, FittedYeoJohnson, YeoJohnson,
    YeoJohnsonConfig,
};

use crate::dataset::{Column, ColumnData, Dataset, Schema};
use crate::error::{BlueprintError, Result};

/// Numeric, non-target columns of `data`, in column order.
pub(crate) fn numeric_features<'a>(
    data: &'a Dataset,
    target: &'a str,
) -> impl Iterator<Item = (&'a str, &'a [f64])> + 'a {
    data.columns()
        .iter()
        .filter(move |c| c.name() != target)
        .filter_map(|c| c.data().as_numeric().map(|v| (c.name(), v)))
}

/// Rebuild `data` in `schema` order, replacing numeric columns for which `f`
/// returns new values.
pub(crate) fn map_numeric<F>(data: &Dataset, schema: &Schema, mut f: F) -> Result<Dataset>
where
    F: FnMut(&str, &[f64]) -> Option<Vec<f64>>,
{
    let mut columns = Vec::with_capacity(schema.len());
    for spec in schema.iter() {
        let column = data
            .column(&spec.name)
            .ok_or_else(|| BlueprintError::schema_mismatch(&spec.name, "column is missing"))?;
        let mapped = column
            .data()
            .as_numeric()
            .and_then(|values| f(&spec.name, values));
        match mapped {
            Some(values) => columns.push(Column::new(spec.name.clone(), ColumnData::Numeric(values))),
            None => columns.push(column.clone()),
        }
    }
    Ok(Dataset::from_parts(columns, data.n_rows()))
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with `ddof` delta degrees of freedom. NaN when
/// `values.len() <= ddof`.
pub(crate) fn std_dev(values: &[f64], ddof: usize) -> f64 {
    let n = values.len();
    if n <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m) * (x - m)).sum();
    (ss / (n - ddof) as f64).sqrt()
}
