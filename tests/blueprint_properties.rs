//! End-to-end behavior of the standard blueprint.

mod common;

use common::{ames_like, numeric, repeat, TARGET};
use tabular_blueprint::preprocessing::{FittedStep, Transformer};
use tabular_blueprint::{
    fit, split, train_test_split, Blueprint, BlueprintConfig, BlueprintError, Column, Dataset,
    FittedBlueprint, RecoveredCondition,
};

fn standard() -> Blueprint {
    Blueprint::standard(&BlueprintConfig::default())
}

#[test]
fn test_output_is_numeric_for_train_and_holdout() {
    let data = ames_like(300, 1);
    let (train, test) = train_test_split(&data, 0.7, 42).unwrap();
    let fitted = fit(&train, TARGET).unwrap();
    assert_eq!(*fitted.input_schema(), train.schema());

    for ds in [&train, &test] {
        let out = fitted.apply(ds).unwrap();
        assert!(out.schema().is_all_numeric());
        assert_eq!(out.schema(), *fitted.output_schema());
        for column in out.columns() {
            assert!(column.data().as_numeric().unwrap().iter().all(|v| v.is_finite()));
        }
    }
}

#[test]
fn test_standard_recipe_drops_and_encodes() {
    let fitted = fit(&ames_like(300, 2), TARGET).unwrap();
    let names = fitted.output_schema().names();

    assert!(!names.iter().any(|n| n.starts_with("Street")));
    assert!(names.contains(&"Overall_Qual"));
    assert!(names.contains(&"Neighborhood_Gilbert"));
    assert_eq!(names.last(), Some(&"Neighborhood_other"));
}

#[test]
fn test_apply_is_deterministic() {
    let data = ames_like(200, 3);
    let fitted = fit(&data, TARGET).unwrap();

    let a = fitted.transform_split(&data).unwrap();
    let b = fitted.transform_split(&data).unwrap();
    let bits = |t: &tabular_blueprint::TensorData| -> Vec<u64> {
        t.features.iter().chain(t.target.iter()).map(|v| v.to_bits()).collect()
    };
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a.feature_names, b.feature_names);
}

fn center_means(fitted: &FittedBlueprint) -> Vec<f64> {
    fitted
        .steps()
        .iter()
        .find_map(|s| match s {
            FittedStep::Center(c) => Some(c.means().iter().map(|m| m.mean).collect()),
            _ => None,
        })
        .unwrap()
}

#[test]
fn test_no_leakage_between_training_subsets() {
    let a = ames_like(200, 4);
    let b = ames_like(200, 5);
    let fitted_a = fit(&a, TARGET).unwrap();
    let fitted_b = fit(&b, TARGET).unwrap();
    assert_ne!(center_means(&fitted_a), center_means(&fitted_b));

    // Applying A's blueprint to B reuses A's parameters: B's scaled columns
    // are not re-centered on B's own mean.
    let out = fitted_a.apply(&b).unwrap();
    let refit = fitted_b.apply(&b).unwrap();
    assert_ne!(numeric(&out, "Gr_Liv_Area"), numeric(&refit, "Gr_Liv_Area"));
    assert_eq!(fitted_a, fit(&a, TARGET).unwrap());
}

#[test]
fn test_no_leakage_in_kept_categories() {
    let train_a = Dataset::new(vec![
        Column::nominal("Roof_Style", repeat(&[("Gable", 95), ("Hip", 5)])),
        Column::numeric(TARGET, (0..100).map(|i| i as f64).collect()),
    ])
    .unwrap();
    let train_b = Dataset::new(vec![
        Column::nominal("Roof_Style", repeat(&[("Gable", 99), ("Hip", 1)])),
        Column::numeric(TARGET, (0..100).map(|i| i as f64).collect()),
    ])
    .unwrap();
    let config = BlueprintConfig::default()
        .with_nzv_cuts(1000.0, 10.0)
        .with_rare_threshold(0.02);

    let kept = |ds: &Dataset| -> Vec<String> {
        let fitted = Blueprint::standard(&config).fit(ds, TARGET).unwrap();
        fitted
            .steps()
            .iter()
            .find_map(|s| match s {
                FittedStep::CollapseRare(c) => Some(c.levels_of("Roof_Style").unwrap().kept.clone()),
                _ => None,
            })
            .unwrap()
    };
    assert_eq!(kept(&train_a), vec!["Gable", "Hip"]);
    assert_eq!(kept(&train_b), vec!["Gable"]);
}

#[test]
fn test_split_shape_invariant() {
    let data = ames_like(150, 6);
    let (train, test) = train_test_split(&data, 0.8, 7).unwrap();
    let fitted = fit(&train, TARGET).unwrap();

    for ds in [&train, &test] {
        let xy = fitted.transform_split(ds).unwrap();
        assert_eq!(xy.features.nrows(), xy.target.len());
        assert_eq!(xy.target.len(), ds.n_rows());
        assert_eq!(xy.n_features(), fitted.output_schema().len() - 1);
        assert_eq!(xy.feature_names, fitted.feature_names());
    }
}

#[test]
fn test_unseen_category_encodes_as_other() {
    let train = Dataset::new(vec![
        Column::nominal("C", repeat(&[("A", 90), ("B", 10)])),
        Column::numeric("Lot_Area", (0..100).map(|i| 1000.0 + i as f64).collect()),
        Column::numeric(TARGET, (0..100).map(|i| i as f64).collect()),
    ])
    .unwrap();
    let fitted = standard().fit(&train, TARGET).unwrap();

    let holdout = Dataset::new(vec![
        Column::nominal("C", vec!["Z", "other", "A"]),
        Column::numeric("Lot_Area", vec![1050.0; 3]),
        Column::numeric(TARGET, vec![1.0; 3]),
    ])
    .unwrap();
    let (out, report) = fitted.apply_with_report(&holdout).unwrap();
    let row = |i: usize| -> Vec<f64> {
        ["C_A", "C_B", "C_other"]
            .iter()
            .map(|c| numeric(&out, c)[i])
            .collect()
    };

    assert_eq!(row(0), row(1));
    assert_eq!(row(0), vec![0.0, 0.0, 1.0]);
    assert_eq!(row(2), vec![1.0, 0.0, 0.0]);
    assert!(report.conditions().contains(&RecoveredCondition::UnseenCategory {
        column: "C".to_string(),
        value: "Z".to_string(),
        count: 1,
    }));
}

#[test]
fn test_unseen_ordinal_level_reported_once() {
    let train = Dataset::new(vec![
        Column::nominal(
            "Kitchen_Qual",
            repeat(&[("Fair", 30), ("Good", 40), ("Excellent", 30)]),
        ),
        Column::numeric(TARGET, (0..100).map(|i| i as f64).collect()),
    ])
    .unwrap();
    let fitted = standard().fit(&train, TARGET).unwrap();

    let holdout = Dataset::new(vec![
        Column::nominal("Kitchen_Qual", vec!["Poor", "Good"]),
        Column::numeric(TARGET, vec![1.0, 2.0]),
    ])
    .unwrap();
    let (out, report) = fitted.apply_with_report(&holdout).unwrap();

    assert!(numeric(&out, "Kitchen_Qual").iter().all(|v| v.is_finite()));
    assert_eq!(
        report.conditions(),
        vec![RecoveredCondition::UnseenCategory {
            column: "Kitchen_Qual".to_string(),
            value: "Poor".to_string(),
            count: 1,
        }]
    );
}

#[test]
fn test_numeric_value_far_outside_training_range() {
    let train = Dataset::new(vec![
        Column::numeric(
            "Lot_Area",
            (0..100).map(|i| 100.0 - (i * i) as f64 / 100.0).collect(),
        ),
        Column::numeric("Gr_Liv_Area", (0..100).map(|i| 900.0 + 7.0 * i as f64).collect()),
        Column::numeric(TARGET, (0..100).map(|i| i as f64).collect()),
    ])
    .unwrap();
    let fitted = standard().fit(&train, TARGET).unwrap();

    let holdout = Dataset::new(vec![
        Column::numeric("Lot_Area", vec![1e300, 50.0]),
        Column::numeric("Gr_Liv_Area", vec![1000.0, 1100.0]),
        Column::numeric(TARGET, vec![1.0, 2.0]),
    ])
    .unwrap();
    let out = fitted.apply(&holdout).unwrap();
    let lot = numeric(&out, "Lot_Area");
    assert!(lot.iter().all(|v| v.is_finite()));
    // The clamped value lands at the training maximum, above the midpoint.
    assert!(lot[0] > lot[1]);
}

#[test]
fn test_constant_column_becomes_zero() {
    let train = Dataset::new(vec![
        Column::numeric("Pool_Qual_Score", vec![5.0; 50]),
        Column::numeric("Gr_Liv_Area", (0..50).map(|i| 900.0 + 10.0 * i as f64).collect()),
        Column::numeric(TARGET, (0..50).map(|i| i as f64).collect()),
    ])
    .unwrap();
    let fitted = standard().fit(&train, TARGET).unwrap();

    let (out, report) = fitted.apply_with_report(&train).unwrap();
    assert!(numeric(&out, "Pool_Qual_Score").iter().all(|&v| v == 0.0));
    assert!(report.conditions().contains(&RecoveredCondition::DegenerateColumn {
        column: "Pool_Qual_Score".to_string()
    }));

    let holdout = Dataset::new(vec![
        Column::numeric("Pool_Qual_Score", vec![5.0; 3]),
        Column::numeric("Gr_Liv_Area", vec![1000.0, 1200.0, 1400.0]),
        Column::numeric(TARGET, vec![1.0; 3]),
    ])
    .unwrap();
    let out = fitted.apply(&holdout).unwrap();
    assert_eq!(numeric(&out, "Pool_Qual_Score"), &[0.0, 0.0, 0.0]);
}

#[test]
fn test_rare_categories_collapse_to_two_indicators() {
    let train = Dataset::new(vec![
        Column::nominal("C", repeat(&[("x", 990), ("y", 5), ("z", 5)])),
        Column::numeric(TARGET, (0..1000).map(|i| i as f64).collect()),
    ])
    .unwrap();
    // The column is near-zero-variance under the default cuts; relax them so
    // collapsing is observable.
    let config = BlueprintConfig::default().with_nzv_cuts(1000.0, 10.0);
    let fitted = Blueprint::standard(&config).fit(&train, TARGET).unwrap();

    let indicators: Vec<&str> = fitted
        .output_schema()
        .names()
        .into_iter()
        .filter(|n| n.starts_with("C_"))
        .collect();
    assert_eq!(indicators, vec!["C_x", "C_other"]);

    let out = fitted.apply(&train).unwrap();
    assert_eq!(numeric(&out, "C_other").iter().sum::<f64>(), 10.0);
}

#[test]
fn test_rare_column_dropped_under_default_cuts() {
    let train = Dataset::new(vec![
        Column::nominal("C", repeat(&[("x", 990), ("y", 5), ("z", 5)])),
        Column::numeric(TARGET, (0..1000).map(|i| i as f64).collect()),
    ])
    .unwrap();
    let fitted = fit(&train, TARGET).unwrap();
    assert_eq!(fitted.output_schema().names(), vec![TARGET]);
}

#[test]
fn test_schema_mismatch_missing_column() {
    let data = ames_like(100, 8);
    let fitted = fit(&data, TARGET).unwrap();
    let columns: Vec<Column> = data
        .clone()
        .into_columns()
        .into_iter()
        .filter(|c| c.name() != "Year_Built")
        .collect();
    let narrowed = Dataset::new(columns).unwrap();

    match fitted.apply(&narrowed) {
        Err(BlueprintError::SchemaMismatch { column, .. }) => assert_eq!(column, "Year_Built"),
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn test_schema_mismatch_kind_changed() {
    let data = ames_like(100, 9);
    let fitted = fit(&data, TARGET).unwrap();
    let columns: Vec<Column> = data
        .clone()
        .into_columns()
        .into_iter()
        .map(|c| {
            if c.name() == "Lot_Area" {
                let text: Vec<String> = c
                    .data()
                    .as_numeric()
                    .unwrap()
                    .iter()
                    .map(|v| v.to_string())
                    .collect();
                Column::nominal("Lot_Area", text)
            } else {
                c
            }
        })
        .collect();
    let retyped = Dataset::new(columns).unwrap();

    assert!(matches!(
        fitted.apply(&retyped),
        Err(BlueprintError::SchemaMismatch { column, .. }) if column == "Lot_Area"
    ));
}

#[test]
fn test_split_requires_numeric_target() {
    let data = ames_like(50, 10);
    assert!(matches!(
        split(&data, "Neighborhood"),
        Err(BlueprintError::InvalidTarget { .. })
    ));
}

#[test]
fn test_save_and_load_roundtrip() {
    let data = ames_like(120, 11);
    let fitted = fit(&data, TARGET).unwrap();

    let path = std::env::temp_dir().join(format!("blueprint-{}.bin", std::process::id()));
    fitted.save_to_file(&path).unwrap();
    let loaded = FittedBlueprint::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, fitted);
    assert_eq!(loaded.apply(&data).unwrap(), fitted.apply(&data).unwrap());
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("does-not-exist-blueprint.bin");
    assert!(matches!(
        FittedBlueprint::load_from_file(path),
        Err(BlueprintError::Io(_))
    ));
}

#[test]
fn test_fitted_blueprint_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FittedBlueprint>();

    let data = ames_like(80, 12);
    let fitted = std::sync::Arc::new(fit(&data, TARGET).unwrap());
    let expected = fitted.apply(&data).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let fitted = fitted.clone();
            let data = data.clone();
            std::thread::spawn(move || fitted.apply(&data).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
