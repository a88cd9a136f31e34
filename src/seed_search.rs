//! Parallel sweep over shuffle seeds, keeping the seed whose partition classifies best.
//!
//! Each seed runs the full pipeline on its own worker. Results travel back over a
//! channel in whatever order the workers finish, and are reported in that order.
//! Selection compares seeds as well as accuracies, so the winner is the same on
//! every run: highest accuracy, lowest seed among ties.

use std::sync::mpsc;

use num_traits::{AsPrimitive, Float};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{error, info};

use crate::common_types::{Dataset, SeedResult};
use crate::error::{KnnError, Result};
use crate::knn::KnnDistance;
use crate::pipeline::evaluate_seed;

/// Produces the accuracy for a single seed. Implementations must be safe to call
/// from several workers at once.
pub trait SeedEvaluator: Sync {
    fn evaluate(&self, seed: u64) -> Result<SeedResult>;
}

/// The real per-seed pipeline over a shared, read-only dataset.
#[derive(Debug, Clone, Copy)]
pub struct KnnSeedEvaluator<'a, F> {
    pub dataset: &'a Dataset<F>,
    pub train_percent: u8,
    pub k: usize,
    pub metric: KnnDistance,
}

impl<'a, F> KnnSeedEvaluator<'a, F> {
    pub fn new(dataset: &'a Dataset<F>, train_percent: u8, k: usize) -> Self {
        Self {
            dataset,
            train_percent,
            k,
            metric: KnnDistance::Euclidean,
        }
    }
}

impl<F> SeedEvaluator for KnnSeedEvaluator<'_, F>
where
    F: Float + AsPrimitive<f64> + Sync,
{
    fn evaluate(&self, seed: u64) -> Result<SeedResult> {
        evaluate_seed(self.dataset, self.train_percent, self.k, self.metric, seed)
    }
}

/// Outcome of a completed sweep.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOutcome {
    pub best: SeedResult,
    /// One entry per submitted seed, ordered by seed.
    pub results: Vec<SeedResult>,
}

/// Picks the result with the strictly highest accuracy, breaking ties by the lowest seed.
///
/// The input order is irrelevant: a candidate replaces the current best only if it
/// scores higher, or scores the same with a lower seed.
pub fn select_best(results: &[SeedResult]) -> Option<SeedResult> {
    let mut best: Option<SeedResult> = None;
    for &result in results {
        let better = best.map_or(true, |b| {
            result.accuracy > b.accuracy || (result.accuracy == b.accuracy && result.seed < b.seed)
        });
        if better {
            best = Some(result);
        }
    }
    best
}

/// Worker pool that fans seeds out and gathers their results.
pub struct SeedSearch {
    pool: ThreadPool,
}

impl SeedSearch {
    /// Builds a pool with `workers` threads, or one per available core when `None`.
    pub fn new(workers: Option<usize>) -> Result<Self> {
        let threads = match workers {
            Some(0) => {
                return Err(KnnError::InvalidConfiguration("workers must be at least 1".into()));
            }
            Some(n) => n,
            None => std::thread::available_parallelism().map_or(1, |n| n.get()),
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("seed-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Evaluates every seed and selects the best one.
    ///
    /// `on_result` sees each successful result as soon as its worker finishes, which
    /// can be out of seed order. If any seed fails, every failure is logged and the
    /// lowest failing seed's error is returned; no partial winner is produced.
    pub fn run<E, P>(&self, evaluator: &E, seeds: &[u64], mut on_result: P) -> Result<SearchOutcome>
    where
        E: SeedEvaluator,
        P: FnMut(&SeedResult),
    {
        if seeds.is_empty() {
            return Err(KnnError::InvalidConfiguration("seed list is empty".into()));
        }
        info!(seeds = seeds.len(), workers = self.workers(), "starting seed search");

        let (tx, rx) = mpsc::channel::<(u64, Result<SeedResult>)>();
        let mut results = Vec::with_capacity(seeds.len());
        let mut failures: Vec<(u64, KnnError)> = Vec::new();

        // The closure runs on the calling thread, so draining `rx` here never ties up a worker.
        self.pool.in_place_scope(|scope| {
            for &seed in seeds {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = evaluator.evaluate(seed);
                    // `rx` is drained until every sender is gone, so this cannot fail.
                    let _ = tx.send((seed, outcome));
                });
            }
            drop(tx);

            for (seed, outcome) in rx.iter() {
                match outcome {
                    Ok(result) => {
                        info!(seed = result.seed, accuracy = result.accuracy, "seed evaluated");
                        on_result(&result);
                        results.push(result);
                    }
                    Err(err) => {
                        error!(seed, error = %err, "seed evaluation failed");
                        failures.push((seed, err));
                    }
                }
            }
        });

        if let Some((seed, err)) = failures.into_iter().min_by_key(|(seed, _)| *seed) {
            return Err(err.for_seed(seed));
        }

        // Ordering is only for the returned list; `select_best` does not depend on it.
        results.sort_by_key(|r| r.seed);
        let best = select_best(&results).ok_or(KnnError::EmptyEvaluationSet)?;
        info!(seed = best.seed, accuracy = best.accuracy, "best seed selected");
        Ok(SearchOutcome { best, results })
    }
}

/// Sweeps `seeds` over `dataset` with the default pool size and Euclidean distance.
pub fn search<F>(dataset: &Dataset<F>, train_percent: u8, k: usize, seeds: &[u64]) -> Result<SearchOutcome>
where
    F: Float + AsPrimitive<f64> + Sync,
{
    let evaluator = KnnSeedEvaluator::new(dataset, train_percent, k);
    SeedSearch::new(None)?.run(&evaluator, seeds, |_| {})
}
