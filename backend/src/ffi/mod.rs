//! Python bindings (feature `pyo3`)
//!
//! Configuration and state cross the boundary as JSON strings, so the
//! Python side never depends on Rust struct layouts.

pub mod orchestrator;
