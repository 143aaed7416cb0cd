//! Environment bindings for Python.

use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::{EngineConfig, EngineError};
use crate::rules::RollAndRake;

fn to_py_err(err: EngineError) -> PyErr {
    PyErr::new::<PyValueError, _>(err.to_string())
}

/// Python wrapper for `RollAndRake`.
///
/// Observations are returned as float32 numpy arrays.
#[pyclass(name = "RollAndRakeEnv")]
pub struct PyRollAndRakeEnv {
    engine: RollAndRake,
}

#[pymethods]
impl PyRollAndRakeEnv {
    /// Create a new environment.
    ///
    /// # Arguments
    /// - variant: "phased" or "simplified"
    /// - seed: RNG seed; defaults to the preset's seed
    /// - config_json: optional engine configuration document, overrides
    ///   `variant`
    #[new]
    #[pyo3(signature = (variant = "phased", seed = None, config_json = None))]
    fn new(variant: &str, seed: Option<u64>, config_json: Option<&str>) -> PyResult<Self> {
        let mut config = match (config_json, variant) {
            (Some(json), _) => EngineConfig::from_json_str(json).map_err(to_py_err)?,
            (None, "phased") => EngineConfig::phased(),
            (None, "simplified") => EngineConfig::simplified(),
            (None, other) => {
                return Err(PyErr::new::<PyValueError, _>(format!(
                    "unknown variant {other:?}, expected \"phased\" or \"simplified\""
                )))
            }
        };
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        let engine = RollAndRake::new(config).map_err(to_py_err)?;
        Ok(Self { engine })
    }

    /// Start a new episode and return the first observation.
    #[pyo3(signature = (seed = None))]
    fn reset<'py>(&mut self, py: Python<'py>, seed: Option<u64>) -> Bound<'py, PyArray1<f32>> {
        let observation = match seed {
            Some(seed) => self.engine.reset_with_seed(seed),
            None => self.engine.reset(),
        };
        PyArray1::from_vec_bound(py, observation.tensor)
    }

    /// Apply an action id.
    ///
    /// Returns `(observation, reward, done, info)`. Raises `ValueError` for
    /// out-of-range or illegal ids; an illegal id leaves the episode as it was.
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        action: usize,
    ) -> PyResult<(Bound<'py, PyArray1<f32>>, f32, bool, Bound<'py, PyDict>)> {
        let outcome = self.engine.step(action).map_err(to_py_err)?;
        let info = PyDict::new_bound(py);
        info.set_item("action", outcome.info.action.to_string())?;
        info.set_item("turn", outcome.info.turn)?;
        info.set_item("phase", outcome.info.phase.to_string())?;
        info.set_item("pace", outcome.info.pace)?;
        info.set_item("score", outcome.info.score)?;
        info.set_item("turn_ended", outcome.info.turn_ended)?;
        Ok((
            PyArray1::from_vec_bound(py, outcome.observation.tensor),
            outcome.reward,
            outcome.done,
            info,
        ))
    }

    /// Legal action ids in ascending order.
    fn legal_actions(&self) -> Vec<usize> {
        self.engine.legal_actions()
    }

    /// Legal-action mask as a bool array.
    fn legal_action_mask<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<bool>> {
        PyArray1::from_vec_bound(py, self.engine.legal_action_mask())
    }

    /// Current observation without stepping.
    fn observation<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_vec_bound(py, self.engine.observation().tensor)
    }

    /// Total score.
    fn score(&self) -> i32 {
        self.engine.score()
    }

    /// Per-section scores keyed by section name.
    fn section_scores(&self) -> Vec<(String, i32)> {
        self.engine
            .sections()
            .iter()
            .map(|s| (s.name().to_string(), s.score()))
            .collect()
    }

    #[getter]
    fn done(&self) -> bool {
        self.engine.is_done()
    }

    #[getter]
    fn observation_size(&self) -> usize {
        self.engine.observation_size()
    }

    #[getter]
    fn action_space_size(&self) -> usize {
        self.engine.action_space_size()
    }

    /// Serialized snapshot of the current episode.
    fn snapshot(&self) -> PyResult<Vec<u8>> {
        self.engine.snapshot().to_bytes().map_err(to_py_err)
    }

    /// Resume from bytes produced by `snapshot`.
    fn restore(&mut self, data: Vec<u8>) -> PyResult<()> {
        let snapshot = crate::rules::EngineSnapshot::from_bytes(&data).map_err(to_py_err)?;
        self.engine.restore(&snapshot).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        let state = self.engine.state();
        format!(
            "RollAndRakeEnv(variant={}, turn={}, pace={}, score={})",
            self.engine.config().variant,
            state.turn,
            state.pace,
            self.engine.score()
        )
    }
}
