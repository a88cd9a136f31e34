//! Loader for whitespace-delimited numeric datasets: one sample per line, label first.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::common_types::{Dataset, Sample};
use crate::error::{KnnError, Result};

/// Parses rows of the form `label f1 f2 ... fn`. Blank lines are skipped.
pub fn parse_dataset<R: BufRead>(reader: R) -> Result<Dataset<f64>> {
    let mut samples: Vec<Sample<f64>> = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let mut values = Vec::new();
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| KnnError::MalformedRow {
                line: line_idx + 1,
                token: token.to_string(),
            })?;
            values.push(value);
        }

        if values.is_empty() {
            continue;
        }
        let label = values.remove(0);

        if let Some(first) = samples.first() {
            if first.dimension() != values.len() {
                return Err(KnnError::DimensionMismatch {
                    expected: first.dimension(),
                    found: values.len(),
                }
                .at_sample(samples.len()));
            }
        }
        samples.push(Sample::new(label, values));
    }

    Dataset::new(samples)
}

/// Reads and parses a dataset file.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset<f64>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = parse_dataset(BufReader::new(file))?;
    debug!(path = %path.display(), samples = dataset.len(), dimension = dataset.dimension(), "loaded dataset");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_rows() {
        let text = "0 1.5 2.0\n\n  1 -3 4e1  \n2\t0.0\t0.5\n";
        let dataset = parse_dataset(Cursor::new(text)).unwrap();
        assert_eq!(dataset.len(), 3, "Blank line must be skipped");
        assert_eq!(dataset.dimension(), 2);
        assert_eq!(dataset.samples()[1], Sample::new(1.0, vec![-3.0, 40.0]));
        assert_eq!(dataset.samples()[2].label, 2.0);
    }

    #[test]
    fn test_malformed_token_reports_line() {
        let text = "0 1 2\n1 3 x\n";
        let err = parse_dataset(Cursor::new(text)).unwrap_err();
        match err {
            KnnError::MalformedRow { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("Unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = parse_dataset(Cursor::new("0 1 2\n1 3\n")).unwrap_err();
        assert!(matches!(err, KnnError::AtSample { index: 1, .. }), "Got {err:?}");
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = parse_dataset(Cursor::new("\n   \n")).unwrap_err();
        assert!(matches!(err, KnnError::EmptyDataset));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_dataset("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, KnnError::Io(_)));
    }
}
