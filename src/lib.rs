//! K-nearest-neighbors classification with a parallel search over train/test shuffle seeds.
//!
//! The pipeline is: [`partition`](partition::partition) a dataset with a seed, find each
//! test sample's neighbors by brute force, take the majority vote, and score the
//! predictions. [`seed_search`] repeats that pipeline for many seeds on a worker pool
//! and keeps the best one.

pub mod common_types;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod knn;
pub mod partition;
pub mod pipeline;
pub mod seed_search;

#[cfg(feature = "python")]
mod python;

pub use common_types::{Dataset, Partition, Sample, SeedResult};
pub use config::KnnConfig;
pub use error::{KnnError, Result};
pub use evaluation::{accuracy, ConfusionMatrix};
pub use knn::classifier::{classify, majority_vote, KnnClassifier};
pub use knn::neighbors::{find_neighbors, Neighbor};
pub use knn::{euclidean_distance, KnnDistance};
pub use pipeline::{evaluate_partition, evaluate_seed, run_single, Evaluation, RunReport};
pub use seed_search::{search, select_best, KnnSeedEvaluator, SearchOutcome, SeedEvaluator, SeedSearch};
