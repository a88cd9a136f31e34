//! Python bindings, built into the extension module with the `python` feature.

use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::common_types::{Dataset, Sample};
use crate::error::KnnError;
use crate::knn::classifier::KnnClassifier;
use crate::knn::{euclidean_distance, KnnDistance};
use crate::seed_search::search;

impl From<KnnError> for PyErr {
    fn from(err: KnnError) -> Self {
        PyValueError::new_err(err.report())
    }
}

/// Calculates the Euclidean distance between two vectors of f64.
#[pyfunction]
fn euclidean_distance_py(a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    Ok(euclidean_distance(&a, &b)?)
}

/// Python-friendly representation of KnnDistance
#[pyclass(name = "KnnDistance")]
#[derive(Clone)]
enum PyKnnDistance {
    Euclidean,
    Manhattan,
}

impl From<PyKnnDistance> for KnnDistance {
    fn from(val: PyKnnDistance) -> Self {
        match val {
            PyKnnDistance::Euclidean => KnnDistance::Euclidean,
            PyKnnDistance::Manhattan => KnnDistance::Manhattan,
        }
    }
}

#[pyclass(name = "KnnClassifier")]
struct PyKnnClassifier {
    classifier: KnnClassifier<f64>,
}

#[pymethods]
impl PyKnnClassifier {
    #[new]
    #[pyo3(signature = (k, distance_metric = None))]
    fn new(k: usize, distance_metric: Option<PyKnnDistance>) -> Self {
        let metric = distance_metric.map(KnnDistance::from).unwrap_or_default();
        PyKnnClassifier {
            classifier: KnnClassifier::new(k, metric),
        }
    }

    /// Accepts a list of `{'features': [...], 'label': n}` dicts or `([...], n)` tuples.
    fn fit(&mut self, training_data_py: &Bound<'_, PyList>) -> PyResult<()> {
        let mut training_data: Vec<Sample<f64>> = Vec::with_capacity(training_data_py.len());

        for item_py in training_data_py {
            if let Ok(dict) = item_py.downcast::<PyDict>() {
                let features: Vec<f64> = dict
                    .get_item("features")?
                    .ok_or_else(|| PyValueError::new_err("Missing 'features' key"))?
                    .extract()?;
                let label: f64 = dict
                    .get_item("label")?
                    .ok_or_else(|| PyValueError::new_err("Missing 'label' key"))?
                    .extract()?;
                training_data.push(Sample::new(label, features));
            } else if let Ok((features, label)) = item_py.extract::<(Vec<f64>, f64)>() {
                training_data.push(Sample::new(label, features));
            } else {
                return Err(PyTypeError::new_err(
                    "Training data items must be dictionaries {'features': [...], 'label': n} or tuples ([...], n)",
                ));
            }
        }

        // Validates that every row shares one dimensionality.
        let dataset = Dataset::new(training_data)?;
        self.classifier.fit(dataset.into_samples());
        Ok(())
    }

    fn predict_single(&self, test_sample_features: Vec<f64>) -> PyResult<f64> {
        Ok(self.classifier.predict_single(&test_sample_features)?)
    }

    fn predict(&self, test_data: Vec<Vec<f64>>) -> PyResult<Vec<f64>> {
        Ok(self.classifier.predict(&test_data)?)
    }

    #[getter]
    fn k(&self) -> usize {
        self.classifier.k()
    }
}

/// Runs the parallel seed search over `rows` (label in column 0).
///
/// Returns `(best_seed, best_accuracy, [(seed, accuracy), ...])` with the list ordered by seed.
#[pyfunction]
fn seed_search_py(
    py: Python<'_>,
    rows: Vec<Vec<f64>>,
    train_percent: u8,
    k: usize,
    seeds: Vec<u64>,
) -> PyResult<(u64, f64, Vec<(u64, f64)>)> {
    let mut samples = Vec::with_capacity(rows.len());
    for (index, mut row) in rows.into_iter().enumerate() {
        if row.is_empty() {
            return Err(PyValueError::new_err(format!("row {index} is empty; expected a label column")));
        }
        let label = row.remove(0);
        samples.push(Sample::new(label, row));
    }
    let dataset = Dataset::new(samples)?;

    let outcome = py.allow_threads(|| search(&dataset, train_percent, k, &seeds))?;
    let results = outcome.results.iter().map(|r| (r.seed, r.accuracy)).collect();
    Ok((outcome.best.seed, outcome.best.accuracy, results))
}

/// The Python extension module. Its name must match `lib.name` in `Cargo.toml`.
#[pymodule]
fn knn_seed_search(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(euclidean_distance_py, m)?)?;
    m.add_function(wrap_pyfunction!(seed_search_py, m)?)?;
    m.add_class::<PyKnnDistance>()?;
    m.add_class::<PyKnnClassifier>()?;
    Ok(())
}
