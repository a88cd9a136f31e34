//! This module contains the data structures shared by the search, partitioning and evaluation stages.

use crate::error::{KnnError, Result};

/// Represents a single labeled sample.
///
/// - `F`: The numeric type of both the features and the label (e.g., `f64`, `f32`).
///   Labels are class identifiers stored in the same numeric type as the features,
///   which is how the whitespace-delimited datasets carry them (column 0).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample<F> {
    pub label: F,
    pub features: Vec<F>,
}

impl<F> Sample<F> {
    pub fn new(label: F, features: Vec<F>) -> Self {
        Sample { label, features }
    }

    pub fn dimension(&self) -> usize {
        self.features.len()
    }
}

/// A non-empty, read-only collection of samples sharing one dimensionality.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dataset<F> {
    samples: Vec<Sample<F>>,
    dimension: usize,
}

impl<F> Dataset<F> {
    /// Builds a dataset, rejecting empty input and ragged feature vectors.
    pub fn new(samples: Vec<Sample<F>>) -> Result<Self> {
        let dimension = match samples.first() {
            Some(first) => first.dimension(),
            None => return Err(KnnError::EmptyDataset),
        };

        if let Some((index, bad)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.dimension() != dimension)
        {
            return Err(KnnError::DimensionMismatch {
                expected: dimension,
                found: bad.dimension(),
            }
            .at_sample(index));
        }

        Ok(Dataset { samples, dimension })
    }

    pub fn samples(&self) -> &[Sample<F>] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true for a constructed dataset.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of features per sample.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn into_samples(self) -> Vec<Sample<F>> {
        self.samples
    }
}

/// A train/test split of one shuffled dataset.
///
/// `train` followed by `test` is exactly the shuffled dataset: nothing is dropped or duplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<F> {
    pub train: Vec<Sample<F>>,
    pub test: Vec<Sample<F>>,
}

impl<F> Partition<F> {
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }
}

/// Accuracy achieved by one seed's partition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedResult {
    pub seed: u64,
    /// Percentage in `[0, 100]`.
    pub accuracy: f64,
}
