//! Core-facing configuration shared by single-run and seed-search modes.

use crate::error::{KnnError, Result};
use crate::evaluation::ConfusionMatrix;
use crate::knn::KnnDistance;

pub const DEFAULT_TRAIN_PERCENT: u8 = 80;
pub const DEFAULT_K: usize = 3;
pub const DEFAULT_SEED_COUNT: u64 = 200;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnnConfig {
    /// Share of the shuffled dataset used for training, 0..=100.
    pub train_percent: u8,
    /// Neighbors consulted per prediction.
    pub k: usize,
    /// Confusion-matrix dimension; must cover every label in the dataset.
    pub num_classes: usize,
    /// Seeds swept by the search, in the order they are submitted.
    pub seeds: Vec<u64>,
    /// Worker threads for the search; `None` uses the available hardware parallelism.
    pub workers: Option<usize>,
    pub metric: KnnDistance,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            train_percent: DEFAULT_TRAIN_PERCENT,
            k: DEFAULT_K,
            num_classes: ConfusionMatrix::DEFAULT_NUM_CLASSES,
            seeds: (0..DEFAULT_SEED_COUNT).collect(),
            workers: None,
            metric: KnnDistance::Euclidean,
        }
    }
}

impl KnnConfig {
    pub fn validate(&self) -> Result<()> {
        if self.train_percent > 100 {
            return Err(KnnError::InvalidConfiguration(format!(
                "train_percent must be within 0..=100, got {}",
                self.train_percent
            )));
        }
        if self.k == 0 {
            return Err(KnnError::InvalidConfiguration("k must be at least 1".into()));
        }
        if self.num_classes == 0 {
            return Err(KnnError::InvalidConfiguration("num_classes must be at least 1".into()));
        }
        if self.seeds.is_empty() {
            return Err(KnnError::InvalidConfiguration("seed list is empty".into()));
        }
        if self.workers == Some(0) {
            return Err(KnnError::InvalidConfiguration("workers must be at least 1".into()));
        }
        self.metric.validate()
    }
}
