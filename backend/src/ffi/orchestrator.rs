//! PyO3 wrapper for Orchestrator
//!
//! This module provides the Python interface to the Rust orchestrator.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::orchestrator::{ConfigPatch, Orchestrator as RustOrchestrator, SimConfig};

/// Python wrapper for Rust Orchestrator
///
/// # Example (from Python)
///
/// ```python
/// import json
/// from elevator_dispatch_core import Orchestrator
///
/// orch = Orchestrator(json.dumps({"floors": 10, "elevators": 2}))
/// orch.add_request(0, 7)
/// for _ in range(100):
///     orch.tick()
/// state = json.loads(orch.snapshot_json())
/// print(state["metrics"]["totalTrips"])
/// ```
#[pyclass(name = "Orchestrator")]
pub struct PyOrchestrator {
    inner: RustOrchestrator,
}

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[pymethods]
impl PyOrchestrator {
    /// Create an orchestrator from a JSON config (defaults when omitted)
    ///
    /// Raises ValueError on malformed JSON or invalid structure.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => SimConfig::from_json(json).map_err(value_error)?,
            None => SimConfig::default(),
        };
        let inner = RustOrchestrator::new(config).map_err(value_error)?;
        Ok(PyOrchestrator { inner })
    }

    /// Execute one tick; returns the tick result as JSON
    fn tick(&mut self) -> PyResult<String> {
        let result = self.inner.tick();
        serde_json::to_string(&result).map_err(value_error)
    }

    fn start(&mut self) {
        self.inner.start();
    }

    fn pause(&mut self) {
        self.inner.pause();
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    fn sim_time(&self) -> u64 {
        self.inner.sim_time()
    }

    /// Merge a partial JSON config; raises ValueError and leaves state
    /// untouched when rejected
    fn configure(&mut self, patch_json: &str) -> PyResult<()> {
        let patch = ConfigPatch::from_json(patch_json).map_err(value_error)?;
        self.inner.configure(&patch).map_err(value_error)
    }

    /// Returns the passenger id, or None when the floors are rejected
    fn add_request(&mut self, origin: usize, dest: usize) -> Option<String> {
        self.inner.add_request(origin, dest)
    }

    fn toggle_door(&mut self, elevator_id: &str) -> bool {
        self.inner.toggle_door(elevator_id)
    }

    fn spawn_burst(&mut self, floor: usize, count: usize) -> Vec<String> {
        self.inner.spawn_burst(floor, count)
    }

    fn set_speed(&mut self, multiplier: f64) -> bool {
        self.inner.set_speed(multiplier)
    }

    fn simulation_id(&self) -> String {
        self.inner.simulation_id().to_string()
    }

    /// Full observable state as JSON
    fn snapshot_json(&self) -> PyResult<String> {
        self.inner.snapshot_json().map_err(value_error)
    }

    fn metrics_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.metrics_summary()).map_err(value_error)
    }
}
