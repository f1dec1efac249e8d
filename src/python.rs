use pyo3::exceptions::{PyMemoryError, PyRuntimeError};
use pyo3::prelude::*;

use crate::{primes, PrimeError, GREETING, VERSION};

impl From<PrimeError> for PyErr {
    fn from(err: PrimeError) -> Self {
        match &err {
            PrimeError::Allocation { .. } => PyMemoryError::new_err(err.to_string()),
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Find the first N primes.
#[pyfunction]
fn get_primes(py: Python<'_>, target: usize) -> PyResult<Vec<u64>> {
    Ok(py.allow_threads(|| primes::generate(target))?)
}

/// Find the first N primes with an incremental sieve.
#[pyfunction]
fn get_primes_faster(py: Python<'_>, target: usize) -> PyResult<Vec<u64>> {
    Ok(py.allow_threads(|| primes::generate_sieve(target))?)
}

#[pymodule]
#[pyo3(name = "CPrimes")]
fn cprimes(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(get_primes, m)?)?;
    m.add_function(wrap_pyfunction!(get_primes_faster, m)?)?;

    m.add("__version__", VERSION)?;
    m.add("string", GREETING)?;
    m.add("__doc__", "Prime number generation implemented in Rust.")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use pyo3::exceptions::PyOverflowError;

    use super::*;

    fn with_module<F>(check: F)
    where
        F: for<'py> FnOnce(Python<'py>, &Bound<'py, PyModule>),
    {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let module = PyModule::new_bound(py, "CPrimes").unwrap();
            cprimes(&module).unwrap();
            check(py, &module);
        });
    }

    #[test]
    fn module_attributes() {
        with_module(|_, m| {
            let version: String = m.getattr("__version__").unwrap().extract().unwrap();
            let string: String = m.getattr("string").unwrap().extract().unwrap();
            let doc: String = m.getattr("__doc__").unwrap().extract().unwrap();
            assert_eq!(version, "1.1");
            assert_eq!(string, "Hello my old friend.");
            assert!(doc.contains("Rust"));

            let fn_doc: String = m
                .getattr("get_primes")
                .unwrap()
                .getattr("__doc__")
                .unwrap()
                .extract()
                .unwrap();
            assert!(fn_doc.contains("Find the first N primes."));
        });
    }

    #[test]
    fn both_functions_return_lists() {
        with_module(|_, m| {
            for name in ["get_primes", "get_primes_faster"] {
                let function = m.getattr(name).unwrap();

                let primes: Vec<u64> = function.call1((5,)).unwrap().extract().unwrap();
                assert_eq!(primes, vec![2, 3, 5, 7, 11], "{name}");

                let empty: Vec<u64> = function.call1((0,)).unwrap().extract().unwrap();
                assert!(empty.is_empty(), "{name}");
            }
        });
    }

    #[test]
    fn negative_count_is_rejected_by_extraction() {
        with_module(|py, m| {
            let err = m.getattr("get_primes").unwrap().call1((-1,)).unwrap_err();
            assert!(err.is_instance_of::<PyOverflowError>(py));
        });
    }

    #[test]
    fn unallocatable_count_raises_memory_error() {
        with_module(|py, m| {
            let err = m
                .getattr("get_primes_faster")
                .unwrap()
                .call1((usize::MAX,))
                .unwrap_err();
            assert!(err.is_instance_of::<PyMemoryError>(py));
        });
    }

    #[test]
    fn error_mapping() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let allocation: PyErr = primes::generate(usize::MAX).unwrap_err().into();
            assert!(allocation.is_instance_of::<PyMemoryError>(py));

            let limit: PyErr = PrimeError::LimitExceeded {
                requested: 10,
                max: 5,
            }
            .into();
            assert!(limit.is_instance_of::<PyRuntimeError>(py));
        });
    }
}
