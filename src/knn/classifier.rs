//! Majority-vote classification over a neighbor set, and the `KnnClassifier` built on top of it.

use num_traits::{AsPrimitive, Float};

use super::neighbors::{find_neighbors, Neighbor};
use super::KnnDistance;
use crate::common_types::Sample;
use crate::error::{KnnError, Result};

/// Returns the most frequent label.
///
/// Labels with an equal top count are resolved in favour of the one that appeared
/// first in `labels`. For a nearest-first neighbor list that means the nearest
/// neighbor wins ties, never the numerically smaller or larger label.
pub fn majority_vote<L>(labels: impl IntoIterator<Item = L>) -> Result<L>
where
    L: Copy + PartialEq,
{
    // Tallies in order of first appearance.
    let mut tallies: Vec<(L, usize)> = Vec::new();
    for label in labels {
        match tallies.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => tallies.push((label, 1)),
        }
    }

    let mut best: Option<(L, usize)> = None;
    for &(label, count) in &tallies {
        // Strict comparison keeps the earliest label on ties.
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }

    best.map(|(label, _)| label)
        .ok_or_else(|| KnnError::InvalidConfiguration("cannot vote over an empty neighbor set".into()))
}

/// Predicts a label from a nearest-first neighbor set.
pub fn classify<F>(neighbors: &[Neighbor<'_, F>]) -> Result<F>
where
    F: Copy + PartialEq,
{
    majority_vote(neighbors.iter().map(|n| n.sample.label))
}

/// The K-Nearest Neighbors Classifier.
///
/// Training an instance-based learner just means keeping the samples around;
/// every prediction is a brute-force scan of them.
#[derive(Debug, Clone)]
pub struct KnnClassifier<F> {
    k: usize,
    training_data: Vec<Sample<F>>,
    pub distance_metric: KnnDistance,
}

impl<F> KnnClassifier<F>
where
    F: Float + AsPrimitive<f64>,
{
    pub fn new(k: usize, distance_metric: KnnDistance) -> Self {
        Self {
            k,
            training_data: Vec::new(),
            distance_metric,
        }
    }

    /// Stores the training data, replacing anything previously fitted.
    pub fn fit(&mut self, training_data: Vec<Sample<F>>) {
        self.training_data = training_data;
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn training_data(&self) -> &[Sample<F>] {
        &self.training_data
    }

    /// Predicts the label of one feature vector.
    ///
    /// Fails with `InvalidK` if the classifier is unfitted or `k` exceeds the training set.
    pub fn predict_single(&self, features: &[F]) -> Result<F> {
        let neighbors = find_neighbors(&self.training_data, features, self.k, self.distance_metric)?;
        classify(&neighbors)
    }

    /// Predicts labels for a batch of feature vectors.
    ///
    /// The first failing query aborts the batch; its position is attached to the error.
    pub fn predict(&self, test_data: &[Vec<F>]) -> Result<Vec<F>> {
        test_data
            .iter()
            .enumerate()
            .map(|(index, features)| self.predict_single(features).map_err(|e| e.at_sample(index)))
            .collect()
    }
}
