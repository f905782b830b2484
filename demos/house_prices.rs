//! House price feature blueprint, end to end.
//!
//! This example:
//! - generates a synthetic Ames-like dataset (numeric areas and years,
//!   neighborhoods, quality ratings, a near-constant street type)
//! - splits it into training and validation parts with a fixed seed
//! - fits the standard seven-step blueprint on the training part only
//! - applies it to both parts and splits them into feature/target tensors
//! - saves and reloads the fitted blueprint
//! - iterates mini-batches, the hand-off point to a trainer
//!
//! Run with: RUST_LOG=debug cargo run --example house_prices

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use tabular_blueprint::preprocessing::Transformer;
use tabular_blueprint::{
    train_test_split, Blueprint, BlueprintConfig, Column, Dataset, FittedBlueprint,
};
use tracing_subscriber::EnvFilter;

const TARGET: &str = "Sale_Price";
const SEED: u64 = 123;
const BATCH_SIZE: usize = 32;

fn synthetic_ames(n: usize, seed: u64) -> Result<Dataset, Box<dyn Error>> {
    const NEIGHBORHOODS: [&str; 5] = ["North_Ames", "College_Creek", "Old_Town", "Edwards", "Somerset"];
    const QUALITY: [&str; 5] = ["Poor", "Fair", "Typical", "Good", "Excellent"];
    let mut rng = StdRng::seed_from_u64(seed);

    let mut area = Vec::with_capacity(n);
    let mut year = Vec::with_capacity(n);
    let mut lot = Vec::with_capacity(n);
    let mut pool = Vec::with_capacity(n);
    let mut neighborhood = Vec::with_capacity(n);
    let mut kitchen = Vec::with_capacity(n);
    let mut street = Vec::with_capacity(n);
    let mut price = Vec::with_capacity(n);

    for i in 0..n {
        let a: f64 = rng.gen_range(500.0..4000.0);
        let y: f64 = rng.gen_range(1880..2010) as f64;
        let q = rng.gen_range(0..QUALITY.len());
        let nb = rng.gen_range(0..NEIGHBORHOODS.len());
        area.push(a.round());
        year.push(y);
        lot.push(rng.gen_range(7.5f64..11.5).exp().round());
        pool.push(0.0);
        // A single listing in a brand new subdivision: collapsed as rare.
        neighborhood.push(if i == 0 { "Green_Hills" } else { NEIGHBORHOODS[nb] });
        kitchen.push(QUALITY[q]);
        street.push(if rng.gen_bool(0.996) { "Pave" } else { "Grvl" });
        price.push(
            15_000.0 + 70.0 * a + 400.0 * (y - 1880.0) + 12_000.0 * q as f64
                + 8_000.0 * nb as f64
                + rng.gen_range(-10_000.0..10_000.0),
        );
    }

    Ok(Dataset::new(vec![
        Column::numeric("Gr_Liv_Area", area),
        Column::numeric("Year_Built", year),
        Column::numeric("Lot_Area", lot),
        Column::numeric("Pool_Area", pool),
        Column::nominal("Neighborhood", neighborhood),
        Column::nominal("Kitchen_Qual", kitchen),
        Column::nominal("Street", street),
        Column::numeric(TARGET, price),
    ])?)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== House Price Feature Blueprint ===\n");

    // 1. Data
    let data = synthetic_ames(1000, SEED)?;
    println!("Raw data: {} rows, columns {:?}", data.n_rows(), data.schema().names());

    // 2. Train/validation split, seed passed explicitly
    let (train, valid) = train_test_split(&data, 0.7, SEED)?;
    println!("Split: {} training rows, {} validation rows", train.n_rows(), valid.n_rows());

    // 3. Fit on training data only
    let config = BlueprintConfig::default()
        .with_ordinal_levels("Kitchen_Qual", ["Poor", "Fair", "Typical", "Good", "Excellent"]);
    let fitted = Blueprint::standard(&config).fit(&train, TARGET)?;
    println!("\nFitted steps: {:?}", fitted.step_names());
    println!("Output features: {:?}", fitted.feature_names());

    // 4. Apply to both parts
    let train_xy = fitted.transform_split(&train)?;
    let (valid_out, report) = fitted.apply_with_report(&valid)?;
    let valid_xy = tabular_blueprint::split(&valid_out, TARGET)?;
    println!(
        "\nTraining tensors: X {:?}, y {:?}",
        train_xy.features.dim(),
        train_xy.target.dim()
    );
    println!(
        "Validation tensors: X {:?}, y {:?}",
        valid_xy.features.dim(),
        valid_xy.target.dim()
    );
    for condition in report.conditions() {
        println!("  recovered: {:?}", condition);
    }

    // 5. Persist and reload
    let path = std::env::temp_dir().join("house_prices_blueprint.bin");
    fitted.save_to_file(&path)?;
    let loaded = FittedBlueprint::load_from_file(&path)?;
    assert_eq!(loaded.apply(&valid)?, valid_out);
    println!("\nSaved and reloaded blueprint from {}", path.display());
    std::fs::remove_file(&path)?;

    // 6. Hand off to a trainer
    let mut batches = 0;
    for (x, y) in train_xy.batches(BATCH_SIZE) {
        debug_assert_eq!(x.nrows(), y.len());
        batches += 1;
    }
    println!("\nIterated {} training batches of up to {} rows", batches, BATCH_SIZE);

    Ok(())
}
