//! Accuracy and confusion-matrix scoring of predicted labels against actual ones.

use std::fmt;

use num_traits::AsPrimitive;

use crate::error::{KnnError, Result};

fn check_lengths<L>(actual: &[L], predicted: &[L]) -> Result<()> {
    if actual.len() != predicted.len() {
        return Err(KnnError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    Ok(())
}

/// Percentage of positions where the predicted label equals the actual one.
///
/// Fails with `EmptyEvaluationSet` on empty input rather than dividing by zero.
pub fn accuracy<L: PartialEq>(actual: &[L], predicted: &[L]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    if actual.is_empty() {
        return Err(KnnError::EmptyEvaluationSet);
    }
    let correct = actual.iter().zip(predicted).filter(|(a, p)| a == p).count();
    Ok(100.0 * correct as f64 / actual.len() as f64)
}

/// Square count table indexed by `(actual class, predicted class)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfusionMatrix {
    num_classes: usize,
    cells: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub const DEFAULT_NUM_CLASSES: usize = 10;

    pub fn new(num_classes: usize) -> Result<Self> {
        if num_classes == 0 {
            return Err(KnnError::InvalidConfiguration(
                "confusion matrix needs at least one class".to_string(),
            ));
        }
        Ok(Self {
            num_classes,
            cells: vec![vec![0; num_classes]; num_classes],
        })
    }

    /// Builds the matrix for paired label sequences.
    pub fn from_labels<L>(actual: &[L], predicted: &[L], num_classes: usize) -> Result<Self>
    where
        L: AsPrimitive<f64>,
    {
        check_lengths(actual, predicted)?;
        let mut matrix = Self::new(num_classes)?;
        for (index, (a, p)) in actual.iter().zip(predicted).enumerate() {
            matrix.record(*a, *p).map_err(|e| e.at_sample(index))?;
        }
        Ok(matrix)
    }

    /// Counts one `(actual, predicted)` pair. Labels are truncated toward zero before indexing.
    pub fn record<L: AsPrimitive<f64>>(&mut self, actual: L, predicted: L) -> Result<()> {
        let row = self.class_index(actual.as_())?;
        let col = self.class_index(predicted.as_())?;
        self.cells[row][col] += 1;
        Ok(())
    }

    fn class_index(&self, label: f64) -> Result<usize> {
        let truncated = label.trunc();
        // NaN fails both comparisons and is rejected too.
        if truncated >= 0.0 && truncated < self.num_classes as f64 {
            Ok(truncated as usize)
        } else {
            Err(KnnError::LabelOutOfRange {
                label,
                num_classes: self.num_classes,
            })
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn get(&self, actual: usize, predicted: usize) -> Option<usize> {
        self.cells.get(actual).and_then(|row| row.get(predicted)).copied()
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Number of recorded samples whose actual class is `actual`.
    pub fn row_sum(&self, actual: usize) -> usize {
        self.cells.get(actual).map_or(0, |row| row.iter().sum())
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        for (i, row) in self.cells.iter().enumerate() {
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == self.cells.len() { "]]" } else { "]" };
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            write!(f, "{open}{}{close}", cells.join(" "))?;
            if i + 1 < self.cells.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
