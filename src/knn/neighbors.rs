//! Brute-force k-nearest-neighbor search.

use num_traits::{AsPrimitive, Float};
use ordered_float::OrderedFloat;

use super::KnnDistance;
use crate::common_types::Sample;
use crate::error::{KnnError, Result};

/// A training sample paired with its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, F> {
    /// Position of the sample in the training set.
    pub index: usize,
    pub sample: &'a Sample<F>,
    pub distance: f64,
}

/// Returns the `k` training samples closest to `query`, nearest first.
///
/// Every training sample is scored (the label never enters the distance), the
/// scored list is stably sorted by distance so exact ties keep training-set order,
/// and the first `k` entries are returned.
pub fn find_neighbors<'a, F>(
    train: &'a [Sample<F>],
    query: &[F],
    k: usize,
    metric: KnnDistance,
) -> Result<Vec<Neighbor<'a, F>>>
where
    F: Float + AsPrimitive<f64>,
{
    if k == 0 || k > train.len() {
        return Err(KnnError::InvalidK { k, train_len: train.len() });
    }

    let mut scored = Vec::with_capacity(train.len());
    for (index, sample) in train.iter().enumerate() {
        let distance = metric.distance(query, &sample.features)?;
        scored.push(Neighbor { index, sample, distance });
    }

    // `sort_by_key` is stable; OrderedFloat gives NaN a place in the order instead of panicking.
    scored.sort_by_key(|n| OrderedFloat(n.distance));
    scored.truncate(k);
    Ok(scored)
}
