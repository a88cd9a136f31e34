//! Error type shared by every stage of the classification pipeline.

use thiserror::Error;

/// Errors raised while partitioning, searching, classifying or evaluating.
///
/// None of these are transient: each one points at a configuration or data
/// problem, so callers surface them instead of retrying.
#[derive(Debug, Error)]
pub enum KnnError {
    #[error("feature vectors differ in length: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("k must satisfy 0 < k <= {train_len} (training set size), got k = {k}")]
    InvalidK { k: usize, train_len: usize },

    #[error("cannot evaluate accuracy over an empty test set")]
    EmptyEvaluationSet,

    #[error("actual and predicted label sequences differ in length ({actual} vs {predicted})")]
    LengthMismatch { actual: usize, predicted: usize },

    #[error("label {label} is outside the confusion matrix range [0, {num_classes})")]
    LabelOutOfRange { label: f64, num_classes: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("dataset contains no samples")]
    EmptyDataset,

    #[error("line {line}: cannot parse {token:?} as a number")]
    MalformedRow { line: usize, token: String },

    #[error("sample {index}")]
    AtSample {
        index: usize,
        #[source]
        source: Box<KnnError>,
    },

    #[error("seed {seed}")]
    SeedFailed {
        seed: u64,
        #[source]
        source: Box<KnnError>,
    },

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl KnnError {
    /// Wraps `self` with the position of the sample being processed.
    pub fn at_sample(self, index: usize) -> Self {
        KnnError::AtSample { index, source: Box::new(self) }
    }

    /// Wraps `self` with the seed whose pipeline produced it.
    pub fn for_seed(self, seed: u64) -> Self {
        KnnError::SeedFailed { seed, source: Box::new(self) }
    }

    /// Renders the error and all of its causes as one line, outermost first.
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

/// Convenient alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, KnnError>;
