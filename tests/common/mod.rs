//! Shared fixtures for integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tabular_blueprint::{Column, Dataset};

pub const TARGET: &str = "Sale_Price";

const NEIGHBORHOODS: [&str; 6] = [
    "North_Ames",
    "College_Creek",
    "Old_Town",
    "Edwards",
    "Somerset",
    "Gilbert",
];
const QUALITY: [&str; 5] = ["Poor", "Fair", "Average", "Good", "Excellent"];

/// A small Ames-like dataset with numeric, nominal, quality and
/// near-constant columns.
pub fn ames_like(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut area = Vec::with_capacity(n);
    let mut year = Vec::with_capacity(n);
    let mut lot = Vec::with_capacity(n);
    let mut neighborhood = Vec::with_capacity(n);
    let mut quality = Vec::with_capacity(n);
    let mut street = Vec::with_capacity(n);
    let mut price = Vec::with_capacity(n);

    for _ in 0..n {
        let a: f64 = rng.gen_range(600.0..3500.0);
        let y = rng.gen_range(1900..2010) as f64;
        let q = rng.gen_range(0..QUALITY.len());
        area.push(a.round());
        year.push(y);
        lot.push((rng.gen_range(7.0f64..11.0)).exp().round());
        neighborhood.push(NEIGHBORHOODS[rng.gen_range(0..NEIGHBORHOODS.len())]);
        quality.push(QUALITY[q]);
        street.push(if rng.gen_bool(0.995) { "Pave" } else { "Grvl" });
        price.push(20_000.0 + 80.0 * a + 500.0 * (y - 1900.0) + 15_000.0 * q as f64);
    }

    Dataset::new(vec![
        Column::numeric("Gr_Liv_Area", area),
        Column::numeric("Year_Built", year),
        Column::numeric("Lot_Area", lot),
        Column::nominal("Neighborhood", neighborhood),
        Column::nominal("Overall_Qual", quality),
        Column::nominal("Street", street),
        Column::numeric(TARGET, price),
    ])
    .unwrap()
}

pub fn numeric<'a>(ds: &'a Dataset, name: &str) -> &'a [f64] {
    ds.column(name)
        .unwrap_or_else(|| panic!("missing column {}", name))
        .data()
        .as_numeric()
        .unwrap_or_else(|| panic!("column {} is not numeric", name))
}

/// Repeat each `(value, count)` pair.
pub fn repeat(parts: &[(&str, usize)]) -> Vec<String> {
    parts
        .iter()
        .flat_map(|&(v, n)| std::iter::repeat(v.to_string()).take(n))
        .collect()
}
