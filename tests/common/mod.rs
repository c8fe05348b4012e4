//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ev_demand_planner::config::PlannerConfig;
use ev_demand_planner::features::RawSample;
use ev_demand_planner::model::{ForestParams, RegressorConfig, TrainOptions};

/// First sample timestamp, a Thursday.
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 9, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date")
}

/// Per-sample charging volume (kWh) with an evening peak and a weekend dip.
pub fn demand_shape(ts: NaiveDateTime) -> f64 {
    use chrono::{Datelike, Timelike};
    let hour = f64::from(ts.hour());
    let peak = (-(hour - 19.0).powi(2) / 8.0).exp() * 3.0;
    let weekend = if ts.weekday().num_days_from_monday() >= 5 {
        0.6
    } else {
        1.0
    };
    (0.5 + peak) * weekend
}

/// Seeded synthetic 5-minute telemetry for one station over `days` days.
pub fn station_samples(days: i64, seed: u64) -> Vec<RawSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..days * 24 * 12)
        .map(|i| {
            let timestamp = start() + TimeDelta::minutes(5 * i);
            let noise: f64 = rng.random_range(-0.1..0.1);
            RawSample {
                timestamp,
                busy: rng.random_range(0.0..10.0),
                idle: rng.random_range(0.0..10.0),
                s_price: 0.5,
                e_price: 1.0,
                duration: 5.0,
                volume: (demand_shape(timestamp) + noise).max(0.0),
            }
        })
        .collect()
}

/// Writes samples as a station CSV in the ingestion layout.
pub fn write_station_csv(path: &Path, samples: &[RawSample]) {
    let mut out = String::from("time,busy,idle,s_price,e_price,duration,volume\n");
    for s in samples {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            s.timestamp.format("%Y-%m-%d %H:%M:%S"),
            s.busy,
            s.idle,
            s.s_price,
            s.e_price,
            s.duration,
            s.volume
        )
        .expect("write to string");
    }
    fs::write(path, out).expect("write station csv");
}

/// Small forest so tests stay quick.
pub fn quick_options(seed: u64) -> TrainOptions {
    TrainOptions {
        test_ratio: 0.2,
        seed,
        regressor: RegressorConfig::RandomForest(ForestParams {
            n_estimators: 10,
            max_depth: 6,
            min_samples_split: 2,
        }),
    }
}

/// Quick preset pointed at `data_dir` with the given station files.
pub fn quick_config(data_dir: &Path, stations: &[&str], model_path: &Path) -> PlannerConfig {
    let mut cfg = PlannerConfig::quick();
    cfg.data.data_dir = data_dir.to_path_buf();
    cfg.data.stations = stations.iter().map(|s| s.to_string()).collect();
    cfg.model.path = model_path.to_path_buf();
    cfg
}
