//! Seeded train/validation splitting.

use crate::dataset::Dataset;
use crate::error::{BlueprintError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Shuffle rows with a `seed`-initialized RNG and split them.
///
/// The first `round(n_rows * train_fraction)` shuffled rows form the training
/// part. The same seed always yields the same split.
///
/// # Errors
/// [`BlueprintError::InvalidParameter`] if `train_fraction` is not in `(0, 1)`.
pub fn train_test_split(
    dataset: &Dataset,
    train_fraction: f64,
    seed: u64,
) -> Result<(Dataset, Dataset)> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(BlueprintError::InvalidParameter(format!(
            "train_fraction must be in (0, 1), got {}",
            train_fraction
        )));
    }

    let n_rows = dataset.n_rows();
    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_train = (n_rows as f64 * train_fraction).round() as usize;
    let (train_idx, test_idx) = indices.split_at(n_train);
    debug!(
        n_rows,
        n_train,
        n_test = test_idx.len(),
        seed,
        "split dataset"
    );

    Ok((dataset.take_rows(train_idx)?, dataset.take_rows(test_idx)?))
}
