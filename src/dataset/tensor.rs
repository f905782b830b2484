//! Numeric tensors handed to an external trainer.
//!
//! [`split`] separates a fully numeric dataset into a feature matrix and a
//! target vector. [`TensorData::batches`] then yields consecutive mini-batches
//! (the last may be smaller than requested).

use crate::dataset::Dataset;
use crate::error::{BlueprintError, Result};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

/// Feature matrix `(n_samples, n_features)`, target vector `(n_samples,)`
/// and the feature names in matrix column order.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorData {
    pub features: Array2<f64>,
    pub target: Array1<f64>,
    pub feature_names: Vec<String>,
}

impl TensorData {
    pub fn n_samples(&self) -> usize {
        self.target.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Iterate over mini-batches of `batch_size` rows.
    ///
    /// A `batch_size` of zero yields no batches.
    pub fn batches(&self, batch_size: usize) -> BatchIter<'_> {
        BatchIter {
            data: self,
            batch_size,
            current: 0,
        }
    }
}

/// Iterator over [`TensorData`] mini-batches, created by [`TensorData::batches`].
pub struct BatchIter<'a> {
    data: &'a TensorData,
    batch_size: usize,
    /// Index of the next sample to yield.
    current: usize,
}

impl<'a> Iterator for BatchIter<'a> {
    type Item = (ArrayView2<'a, f64>, ArrayView1<'a, f64>);

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.data.n_samples();
        if self.batch_size == 0 || self.current >= total {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let x = self.data.features.slice(s![self.current..end, ..]);
        let y = self.data.target.slice(s![self.current..end]);
        self.current = end;
        Some((x, y))
    }
}

/// Split a transformed dataset into features and target.
///
/// Features keep the dataset's column order, minus `target`.
///
/// # Errors
/// - [`BlueprintError::InvalidTarget`] if `target` is missing or nominal.
/// - [`BlueprintError::NonNumericOutput`] if a feature column is nominal.
pub fn split(dataset: &Dataset, target: &str) -> Result<TensorData> {
    let target_values = dataset
        .column(target)
        .ok_or_else(|| BlueprintError::invalid_target(target, "column is missing"))?
        .data()
        .as_numeric()
        .ok_or_else(|| BlueprintError::invalid_target(target, "expected numeric column"))?;

    let n_rows = dataset.n_rows();
    let feature_columns: Vec<_> = dataset
        .columns()
        .iter()
        .filter(|c| c.name() != target)
        .collect();

    let mut features = Array2::<f64>::zeros((n_rows, feature_columns.len()));
    let mut feature_names = Vec::with_capacity(feature_columns.len());
    for (j, column) in feature_columns.iter().enumerate() {
        let values = column.data().as_numeric().ok_or_else(|| {
            BlueprintError::NonNumericOutput {
                column: column.name().to_string(),
                row: 0,
            }
        })?;
        for (i, &v) in values.iter().enumerate() {
            features[[i, j]] = v;
        }
        feature_names.push(column.name().to_string());
    }

    Ok(TensorData {
        features,
        target: Array1::from(target_values.to_vec()),
        feature_names,
    })
}
