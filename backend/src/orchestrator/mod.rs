//! Orchestrator - configuration, presets and the main simulation loop
//!
//! See `engine.rs` for the tick loop.

pub mod config;
pub mod engine;
pub mod presets;

pub use config::{ConfigError, ConfigPatch, CostWeights, SimConfig, SlaConfig};
pub use engine::{Orchestrator, SimulationError, SimulationSnapshot, TickResult};
pub use presets::Preset;
