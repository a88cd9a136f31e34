//! Distance metrics plus the brute-force neighbor search and majority-vote classifier built on them.

use num_traits::{AsPrimitive, Float};

use crate::error::{KnnError, Result};

pub mod classifier;
pub mod neighbors;

/// Dissimilarity measure between two feature vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KnnDistance {
    #[default]
    Euclidean,
    Manhattan,
    Minkowski { p: u32 }, // p is the order for Minkowski distance
}

impl KnnDistance {
    /// Largest Minkowski order whose exponent `powi` can represent.
    pub const MAX_MINKOWSKI_P: u32 = i32::MAX as u32;

    /// Rejects Minkowski orders outside `1..=MAX_MINKOWSKI_P`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            KnnDistance::Minkowski { p } if p == 0 || p > Self::MAX_MINKOWSKI_P => {
                Err(KnnError::InvalidConfiguration(format!(
                    "Minkowski order p must be within 1..={}, got {p}",
                    Self::MAX_MINKOWSKI_P
                )))
            }
            _ => Ok(()),
        }
    }

    /// Computes the distance between `a` and `b`.
    ///
    /// Fails with `DimensionMismatch` when the vectors differ in length.
    pub fn distance<F>(&self, a: &[F], b: &[F]) -> Result<f64>
    where
        F: Float + AsPrimitive<f64>,
    {
        check_dimensions(a, b)?;
        match *self {
            KnnDistance::Euclidean => Ok(squared_euclidean(a, b).sqrt()),
            KnnDistance::Manhattan => Ok(minkowski_unchecked(a, b, 1)),
            KnnDistance::Minkowski { p } => {
                self.validate()?;
                Ok(minkowski_unchecked(a, b, p))
            }
        }
    }
}

fn check_dimensions<F>(a: &[F], b: &[F]) -> Result<()> {
    if a.len() != b.len() {
        return Err(KnnError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

fn squared_euclidean<F>(a: &[F], b: &[F]) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x.as_() - y.as_();
            diff * diff
        })
        .sum()
}

fn minkowski_unchecked<F>(a: &[F], b: &[F], p: u32) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    let sum_of_powers: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x.as_() - y.as_()).abs().powi(p as i32))
        .sum();
    if p == 1 {
        return sum_of_powers;
    }
    sum_of_powers.powf(1.0 / (p as f64))
}

/// Euclidean distance `sqrt(sum((a_i - b_i)^2))`.
pub fn euclidean_distance<F>(a: &[F], b: &[F]) -> Result<f64>
where
    F: Float + AsPrimitive<f64>,
{
    KnnDistance::Euclidean.distance(a, b)
}
