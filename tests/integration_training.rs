//! Integration tests for ingestion, training, persistence, and forecasting.

mod common;

use ev_demand_planner::error::{ModelError, PipelineError};
use ev_demand_planner::forecast::{DailyForecast, DemandQuery};
use ev_demand_planner::io::artifact;
use ev_demand_planner::model::{
    BoostingParams, RegressorConfig, TrainOptions, persist, restore, train,
};
use ev_demand_planner::pipeline::{TrainingSet, train_from_config};

fn two_week_set() -> TrainingSet {
    TrainingSet::from_partitions(&[
        common::station_samples(14, 1),
        common::station_samples(14, 2),
    ])
    .expect("partitions share a schema")
}

#[test]
fn hourly_rows_per_station() {
    let set = two_week_set();
    assert_eq!(set.len(), 2 * 14 * 24);
    assert_eq!(set.features.len(), set.targets.len());
}

#[test]
fn same_seed_same_model() {
    let set = two_week_set();
    let a = set.train(&common::quick_options(42)).expect("train");
    let b = set.train(&common::quick_options(42)).expect("train");
    assert_eq!(a, b);
    assert_eq!(a.metrics(), b.metrics());
}

#[test]
fn learns_evening_peak() {
    let set = two_week_set();
    let model = set.train(&common::quick_options(42)).expect("train");
    // Monday
    let forecast = DailyForecast::predict(&model, DemandQuery::new(12, 0, 0.5, 1.0))
        .expect("forecast");
    let hourly = forecast.hourly_kwh();
    assert_eq!(hourly.len(), 24);
    assert!(hourly[19] > hourly[3] * 2.0);
    assert!((17..=21).contains(&forecast.peak_hour()));
}

#[test]
fn metrics_are_finite_and_ordered() {
    let set = two_week_set();
    let model = set.train(&common::quick_options(7)).expect("train");
    let m = model.metrics();
    assert!(m.mae.is_finite() && m.rmse.is_finite());
    assert!(m.mae >= 0.0);
    assert!(m.rmse >= m.mae - 1e-12);
}

#[test]
fn boosted_learner_trains_on_pipeline_output() {
    let set = two_week_set();
    let options = TrainOptions {
        regressor: RegressorConfig::GradientBoosted(BoostingParams {
            n_estimators: 30,
            ..BoostingParams::default()
        }),
        ..TrainOptions::default()
    };
    let model = set.train(&options).expect("train");
    assert_eq!(model.kind(), "gradient_boosted");
    let point: f64 = model
        .predict(&DemandQuery::new(19, 1, 0.5, 1.0))
        .expect("predict");
    assert!(point.is_finite());
}

#[test]
fn restored_model_predicts_identically() {
    let set = two_week_set();
    let model = set.train(&common::quick_options(42)).expect("train");
    let restored = restore(&persist(&model).expect("persist")).expect("restore");
    assert_eq!(restored, model);

    let sweep = DemandQuery::new(8, 5, 0.7, 0.9).daily_sweep();
    let before = model.predict(&sweep).expect("predict");
    let after = restored.predict(&sweep).expect("predict");
    assert_eq!(before, after);
}

#[test]
fn single_row_is_insufficient() {
    let set = TrainingSet::from_samples(&common::station_samples(1, 3)[..12]);
    assert_eq!(set.len(), 1);
    let err = train(&set.features, &set.targets, &common::quick_options(1)).unwrap_err();
    assert!(matches!(err, ModelError::InsufficientData { rows: 1 }));
}

#[test]
fn pipeline_trains_from_station_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_station_csv(&dir.path().join("1001.csv"), &common::station_samples(7, 1));
    common::write_station_csv(&dir.path().join("1002.csv"), &common::station_samples(7, 2));
    let model_path = dir.path().join("models").join("rf.json");
    let cfg = common::quick_config(dir.path(), &["1001.csv", "1002.csv", "absent.csv"], &model_path);

    let (set, model) = train_from_config(&cfg).expect("pipeline");
    assert_eq!(set.len(), 2 * 7 * 24);

    artifact::save(&model_path, &model).expect("save");
    let loaded = artifact::load(&model_path).expect("load");
    assert_eq!(loaded, model);
}

#[test]
fn pipeline_surfaces_malformed_station_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("bad.csv"),
        "time,busy,idle,s_price,e_price,duration,volume\nyesterday,1,1,0.5,1.0,5,1\n",
    )
    .expect("write");
    let cfg = common::quick_config(dir.path(), &["bad.csv"], &dir.path().join("m.json"));
    let err = train_from_config(&cfg).unwrap_err();
    assert!(matches!(err, PipelineError::Data(_)));
}

#[test]
fn missing_artifact_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nope.json");
    assert!(matches!(
        artifact::load(&path),
        Err(ModelError::MissingArtifact { .. })
    ));
    assert!(artifact::load_optional(&path).is_none());
}
