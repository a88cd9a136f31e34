//! Seeded shuffle-and-split of a dataset into train and test sets.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::common_types::{Dataset, Partition};
use crate::error::{KnnError, Result};

/// Number of training samples for a dataset of `len` samples: `floor(len * train_percent / 100)`.
pub fn split_index(len: usize, train_percent: u8) -> usize {
    len * train_percent as usize / 100
}

/// Shuffles a copy of `dataset` with a generator seeded from `seed`, then splits it.
///
/// The generator is created here and dropped on return, so concurrent calls never
/// share random state and the same `(dataset, train_percent, seed)` always yields
/// the same partition on any thread.
pub fn partition<F: Clone>(dataset: &Dataset<F>, train_percent: u8, seed: u64) -> Result<Partition<F>> {
    if train_percent > 100 {
        return Err(KnnError::InvalidConfiguration(format!(
            "train percent must be within 0..=100, got {train_percent}"
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut shuffled = dataset.samples().to_vec();
    shuffled.shuffle(&mut rng);

    let split = split_index(shuffled.len(), train_percent);
    let test = shuffled.split_off(split);
    debug!(seed, train = shuffled.len(), test = test.len(), "partitioned dataset");

    Ok(Partition { train: shuffled, test })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common_types::Sample;

    fn numbered_dataset(n: usize) -> Dataset<f64> {
        let samples = (0..n).map(|i| Sample::new((i % 4) as f64, vec![i as f64, (i * 2) as f64])).collect();
        Dataset::new(samples).unwrap()
    }

    #[test]
    fn test_same_seed_same_partition() {
        let dataset = numbered_dataset(50);
        let first = partition(&dataset, 80, 25).unwrap();
        let second = partition(&dataset, 80, 25).unwrap();
        assert_eq!(first, second, "Partitioning must be deterministic for a fixed seed");
    }

    #[test]
    fn test_different_seeds_differ() {
        let dataset = numbered_dataset(50);
        let a = partition(&dataset, 80, 1).unwrap();
        let b = partition(&dataset, 80, 2).unwrap();
        assert_ne!(a, b, "Different seeds should produce different orders");
    }

    #[test]
    fn test_partition_is_a_permutation() {
        let dataset = numbered_dataset(37);
        let parts = partition(&dataset, 70, 112).unwrap();
        let mut ids: Vec<usize> = parts
            .train
            .iter()
            .chain(parts.test.iter())
            .map(|s| s.features[0] as usize)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..37).collect::<Vec<_>>(), "No sample may be dropped or duplicated");
    }

    #[test]
    fn test_split_sizes_for_every_percent() {
        let dataset = numbered_dataset(23);
        for percent in 0..=100u8 {
            let parts = partition(&dataset, percent, 3).unwrap();
            assert_eq!(parts.train.len(), 23 * percent as usize / 100, "Train size at {percent}%");
            assert_eq!(parts.train.len() + parts.test.len(), dataset.len(), "Sizes at {percent}%");
        }
    }

    #[test]
    fn test_extremes() {
        let dataset = numbered_dataset(10);
        let all_test = partition(&dataset, 0, 9).unwrap();
        assert!(all_test.train.is_empty());
        assert_eq!(all_test.test.len(), 10);

        let all_train = partition(&dataset, 100, 9).unwrap();
        assert_eq!(all_train.train.len(), 10);
        assert!(all_train.test.is_empty());
    }

    #[test]
    fn test_percent_above_100_rejected() {
        let dataset = numbered_dataset(5);
        assert!(matches!(
            partition(&dataset, 101, 0).unwrap_err(),
            KnnError::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn test_concurrent_partitions_match_sequential() {
        let dataset = numbered_dataset(40);
        let sequential: Vec<_> = (0..16u64).map(|s| partition(&dataset, 80, s).unwrap()).collect();
        let threaded: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16u64)
                .map(|s| {
                    let dataset = &dataset;
                    scope.spawn(move || partition(dataset, 80, s).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(sequential, threaded, "Thread placement must not change any partition");
    }
}
