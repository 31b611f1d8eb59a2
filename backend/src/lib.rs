//! Elevator Dispatch Core - Rust Engine
//!
//! Discrete-time simulation of a bank of elevators under destination
//! dispatch, with deterministic execution.
//!
//! # Architecture
//!
//! - **rng**: Deterministic random number generation
//! - **core**: Simulation clock
//! - **models**: Domain types (Passenger, Elevator, Lobby, Event, State)
//! - **arrivals**: Poisson passenger generation
//! - **costs**: Request-to-car cost model
//! - **dispatch**: Batch assignment of buffered requests
//! - **fsm**: Per-car door and motion state machine
//! - **metrics**: Wait/ride percentiles, utilization, energy
//! - **orchestrator**: Configuration and the main simulation loop
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG owned by the orchestrator)
//! 2. Simulation time only moves in whole ticks
//! 3. Cars, lobbies and passengers refer to each other by id only
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod arrivals;
pub mod core;
pub mod costs;
pub mod dispatch;
pub mod fsm;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use arrivals::ArrivalGenerator;
pub use core::time::SimClock;
pub use costs::{cost_for, CostBreakdown};
pub use dispatch::{assign_requests_batch, Assignment};
pub use metrics::{percentile, Metrics, MetricsSummary};
pub use models::{
    Direction, DoorState, Elevator, ElevatorMode, EventKind, EventLog, Lobby, Passenger,
    PassengerStore, Priority, Request, SimEvent, SimulationState,
};
pub use orchestrator::{
    ConfigError, ConfigPatch, CostWeights, Orchestrator, Preset, SimConfig, SimulationError,
    SimulationSnapshot, SlaConfig, TickResult,
};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn elevator_dispatch_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::orchestrator::PyOrchestrator>()?;
    Ok(())
}
