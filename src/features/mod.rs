//! Feature pipeline: raw station samples to hourly records to model features.
//!
//! Both stages are pure. Disjoint station partitions can be processed
//! independently and concatenated afterwards; within a partition, records
//! keep bucket order.

pub mod aggregate;
pub mod derive;
pub mod sample;
pub mod table;

pub use aggregate::{Bucket, aggregate};
pub use derive::{FeatureVector, derive_features};
pub use sample::{HourlyRecord, RawSample};
pub use table::{FeatureRow, FeatureTable};
