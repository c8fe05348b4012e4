//! End-to-end training pipeline: station samples to a validated model.

use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::error::{ModelError, PipelineError};
use crate::features::{Bucket, FeatureTable, RawSample, aggregate};
use crate::io::samples::read_samples_from_path;
use crate::model::{TrainOptions, TrainedModel, train};

/// Feature table and aligned `volume` targets, possibly spanning stations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub features: FeatureTable,
    pub targets: Vec<f64>,
}

impl TrainingSet {
    /// Aggregates one station's samples hourly and derives its features.
    pub fn from_samples(samples: &[RawSample]) -> Self {
        let records = aggregate(samples, Bucket::Hour);
        Self {
            features: FeatureTable::from_hourly(&records),
            targets: records.iter().map(|r| r.volume).collect(),
        }
    }

    /// Builds and concatenates one set per station partition, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Schema`] if partitions disagree on columns.
    pub fn from_partitions<P: AsRef<[RawSample]>>(partitions: &[P]) -> Result<Self, ModelError> {
        let mut set = Self::default();
        for partition in partitions {
            set.extend(Self::from_samples(partition.as_ref()))?;
        }
        Ok(set)
    }

    /// Appends `other` below this set.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Schema`] if `other` lacks one of this set's columns.
    pub fn extend(&mut self, other: Self) -> Result<(), ModelError> {
        self.features.append(&other.features)?;
        self.targets.extend(other.targets);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Trains a model on this set.
    ///
    /// # Errors
    ///
    /// See [`train`].
    pub fn train(&self, options: &TrainOptions) -> Result<TrainedModel, ModelError> {
        train(&self.features, &self.targets, options)
    }
}

/// Loads every configured station file that exists, skipping absent ones.
///
/// # Errors
///
/// Returns [`PipelineError::Data`] if a present file cannot be parsed.
pub fn load_training_set(cfg: &PlannerConfig) -> Result<TrainingSet, PipelineError> {
    let mut set = TrainingSet::default();
    let mut loaded = 0_usize;
    for path in cfg.data.station_paths() {
        if !path.exists() {
            warn!(path = %path.display(), "station file not found, skipping");
            continue;
        }
        let samples = read_samples_from_path(&path)?;
        let station = TrainingSet::from_samples(&samples);
        info!(
            path = %path.display(),
            n_samples = samples.len(),
            n_hours = station.len(),
            "loaded station"
        );
        set.extend(station)?;
        loaded += 1;
    }
    info!(stations = loaded, rows = set.len(), "assembled training set");
    Ok(set)
}

/// Loads the configured stations and trains the configured learner.
///
/// # Errors
///
/// Returns [`PipelineError::Data`] on unreadable station files and
/// [`PipelineError::Model`] when training fails, including
/// `InsufficientData` when no station could be loaded.
pub fn train_from_config(
    cfg: &PlannerConfig,
) -> Result<(TrainingSet, TrainedModel), PipelineError> {
    let set = load_training_set(cfg)?;
    let model = set.train(&cfg.train_options())?;
    Ok((set, model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn station(hours: i64, offset: f64) -> Vec<RawSample> {
        let start: NaiveDateTime = NaiveDate::from_ymd_opt(2022, 9, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        (0..hours * 12)
            .map(|i| RawSample {
                timestamp: start + TimeDelta::minutes(5 * i),
                busy: 0.5,
                idle: 0.5,
                s_price: 0.5,
                e_price: 1.0,
                duration: 5.0,
                volume: offset,
            })
            .collect()
    }

    #[test]
    fn one_row_per_hour() {
        let set = TrainingSet::from_samples(&station(10, 1.0));
        assert_eq!(set.len(), 10);
        assert_eq!(set.features.len(), 10);
        // 12 five-minute samples of 1.0 kWh per hour
        assert!(set.targets.iter().all(|v| (*v - 12.0).abs() < 1e-9));
    }

    #[test]
    fn partitions_concatenate_in_order() {
        let set = TrainingSet::from_partitions(&[station(3, 1.0), station(2, 2.0)]).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.targets[2], 12.0);
        assert_eq!(set.targets[3], 24.0);
    }

    #[test]
    fn no_stations_is_insufficient() {
        let mut cfg = PlannerConfig::quick();
        cfg.data.data_dir = "/definitely/not/a/dir".into();
        let err = train_from_config(&cfg).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Model(ModelError::InsufficientData { rows: 0 })
        ));
    }
}
