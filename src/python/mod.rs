//! Python bindings for the Roll and Rake engine.
//!
//! # Quick Start
//!
//! ```python
//! import roll_and_rake as rr
//!
//! env = rr.RollAndRakeEnv(variant="phased", seed=10)
//! obs = env.reset()
//! while not env.done:
//!     action = env.legal_actions()[0]
//!     obs, reward, done, info = env.step(action)
//! print(env.score())
//! ```

use pyo3::prelude::*;

mod py_env;

pub use py_env::*;

/// roll_and_rake: a dice-scoring environment for RL agents.
#[pymodule]
fn roll_and_rake(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRollAndRakeEnv>()?;
    Ok(())
}
