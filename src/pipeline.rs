//! The partition → search → vote → score pipeline, for one seed or one reported run.

use num_traits::{AsPrimitive, Float};
use tracing::debug;

use crate::common_types::{Dataset, Partition, SeedResult};
use crate::config::KnnConfig;
use crate::error::{KnnError, Result};
use crate::evaluation::{accuracy, ConfusionMatrix};
use crate::knn::classifier::KnnClassifier;
use crate::knn::KnnDistance;
use crate::partition::partition;

/// Predictions for one test set alongside the labels they are scored against.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<F> {
    pub actual: Vec<F>,
    pub predicted: Vec<F>,
    pub accuracy: f64,
}

/// Classifies every test sample against the training set and scores the result.
///
/// An empty test set fails with `EmptyEvaluationSet`; a `k` the training set cannot
/// satisfy fails with `InvalidK` before any sample is processed.
pub fn evaluate_partition<F>(partition: Partition<F>, k: usize, metric: KnnDistance) -> Result<Evaluation<F>>
where
    F: Float + AsPrimitive<f64>,
{
    let Partition { train, test } = partition;
    if test.is_empty() {
        return Err(KnnError::EmptyEvaluationSet);
    }
    if k == 0 || k > train.len() {
        return Err(KnnError::InvalidK { k, train_len: train.len() });
    }

    let mut classifier = KnnClassifier::new(k, metric);
    classifier.fit(train);

    let mut actual = Vec::with_capacity(test.len());
    let mut predicted = Vec::with_capacity(test.len());
    for (index, sample) in test.iter().enumerate() {
        let label = classifier
            .predict_single(&sample.features)
            .map_err(|e| e.at_sample(index))?;
        actual.push(sample.label);
        predicted.push(label);
    }

    let accuracy = accuracy(&actual, &predicted)?;
    Ok(Evaluation { actual, predicted, accuracy })
}

/// Runs the whole pipeline for one seed.
pub fn evaluate_seed<F>(
    dataset: &Dataset<F>,
    train_percent: u8,
    k: usize,
    metric: KnnDistance,
    seed: u64,
) -> Result<SeedResult>
where
    F: Float + AsPrimitive<f64>,
{
    let parts = partition(dataset, train_percent, seed)?;
    let evaluation = evaluate_partition(parts, k, metric)?;
    Ok(SeedResult { seed, accuracy: evaluation.accuracy })
}

/// Everything the single-run mode reports.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    pub seed: u64,
    pub total: usize,
    pub train_len: usize,
    pub test_len: usize,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

/// Single-run mode: one partition, its accuracy and its confusion matrix.
///
/// Any failure is reported as `SeedFailed` so the run can be reproduced.
pub fn run_single<F>(dataset: &Dataset<F>, config: &KnnConfig, seed: u64) -> Result<RunReport>
where
    F: Float + AsPrimitive<f64>,
{
    report_for_seed(dataset, config, seed).map_err(|e| e.for_seed(seed))
}

fn report_for_seed<F>(dataset: &Dataset<F>, config: &KnnConfig, seed: u64) -> Result<RunReport>
where
    F: Float + AsPrimitive<f64>,
{
    config.metric.validate()?;
    let parts = partition(dataset, config.train_percent, seed)?;
    let (train_len, test_len) = (parts.train.len(), parts.test.len());
    debug!(seed, train_len, test_len, k = config.k, "single run");

    let evaluation = evaluate_partition(parts, config.k, config.metric)?;
    let confusion = ConfusionMatrix::from_labels(&evaluation.actual, &evaluation.predicted, config.num_classes)?;

    Ok(RunReport {
        seed,
        total: dataset.len(),
        train_len,
        test_len,
        accuracy: evaluation.accuracy,
        confusion,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::common_types::Sample;

    /// Five class-0 samples near the origin and five class-1 samples far away.
    pub(crate) fn two_clusters() -> Dataset<f64> {
        let mut samples = Vec::new();
        for i in 0..5 {
            let offset = i as f64 * 0.1;
            samples.push(Sample::new(0.0, vec![offset, 0.2 - offset]));
            samples.push(Sample::new(1.0, vec![100.0 + offset, 100.0 - offset]));
        }
        Dataset::new(samples).unwrap()
    }

    #[test]
    fn test_separable_clusters_score_100() {
        let dataset = two_clusters();
        for seed in [0, 7, 25, 112] {
            let result = evaluate_seed(&dataset, 80, 3, KnnDistance::Euclidean, seed).unwrap();
            assert_eq!(result.seed, seed);
            assert_eq!(result.accuracy, 100.0, "Separable clusters must be classified perfectly (seed {seed})");
        }
    }

    #[test]
    fn test_all_training_is_an_empty_evaluation() {
        let dataset = two_clusters();
        let err = evaluate_seed(&dataset, 100, 3, KnnDistance::Euclidean, 1).unwrap_err();
        assert!(matches!(err, KnnError::EmptyEvaluationSet), "Expected EmptyEvaluationSet, got {err:?}");
    }

    #[test]
    fn test_no_training_is_invalid_k() {
        let dataset = two_clusters();
        let err = evaluate_seed(&dataset, 0, 3, KnnDistance::Euclidean, 1).unwrap_err();
        assert!(matches!(err, KnnError::InvalidK { k: 3, train_len: 0 }), "Got {err:?}");
    }

    #[test]
    fn test_evaluate_partition_keeps_test_order() {
        let partition = Partition {
            train: vec![Sample::new(0.0, vec![0.0]), Sample::new(1.0, vec![10.0])],
            test: vec![Sample::new(1.0, vec![9.0]), Sample::new(1.0, vec![1.0])],
        };
        let evaluation = evaluate_partition(partition, 1, KnnDistance::Euclidean).unwrap();
        assert_eq!(evaluation.actual, vec![1.0, 1.0]);
        assert_eq!(evaluation.predicted, vec![1.0, 0.0]);
        assert_eq!(evaluation.accuracy, 50.0);
    }

    #[test]
    fn test_run_single_report() {
        let dataset = two_clusters();
        let config = KnnConfig { train_percent: 80, num_classes: 2, ..KnnConfig::default() };
        let report = run_single(&dataset, &config, 25).unwrap();

        assert_eq!(report.total, 10);
        assert_eq!(report.train_len, 8);
        assert_eq!(report.test_len, 2);
        assert_eq!(report.accuracy, 100.0);
        assert_eq!(report.confusion.total(), report.test_len, "Matrix total must equal the test-set size");
        assert_eq!(report.confusion.get(0, 1), Some(0));
        assert_eq!(report.confusion.get(1, 0), Some(0));
    }

    #[test]
    fn test_run_single_label_out_of_range() {
        let dataset = Dataset::new(vec![
            Sample::new(0.0, vec![0.0]),
            Sample::new(12.0, vec![1.0]),
            Sample::new(12.0, vec![1.1]),
            Sample::new(0.0, vec![0.1]),
        ])
        .unwrap();
        let config = KnnConfig { train_percent: 50, k: 1, ..KnnConfig::default() };
        let err = run_single(&dataset, &config, 3).unwrap_err();
        match &err {
            KnnError::SeedFailed { seed, source } => {
                assert_eq!(*seed, 3, "The failing seed must be reported");
                let is_range_error = matches!(**source, KnnError::LabelOutOfRange { .. })
                    || matches!(&**source, KnnError::AtSample { source, .. } if matches!(**source, KnnError::LabelOutOfRange { .. }));
                assert!(is_range_error, "Label 12 with 10 classes must be rejected, got {err:?}");
            }
            other => panic!("Unexpected error {other:?}"),
        }
        assert!(err.report().starts_with("seed 3: sample "), "Got {:?}", err.report());
    }

    #[test]
    fn test_run_single_failure_carries_seed() {
        let dataset = two_clusters();
        let config = KnnConfig { train_percent: 100, ..KnnConfig::default() };
        let err = run_single(&dataset, &config, 4242).unwrap_err();
        match err {
            KnnError::SeedFailed { seed, source } => {
                assert_eq!(seed, 4242);
                assert!(matches!(*source, KnnError::EmptyEvaluationSet), "Got {source:?}");
            }
            other => panic!("Expected SeedFailed, got {other:?}"),
        }
    }
}
