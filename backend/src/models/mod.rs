//! Domain models for the elevator simulator

pub mod elevator;
pub mod event;
pub mod lobby;
pub mod passenger;
pub mod state;

// Re-exports
pub use elevator::{Direction, DoorState, Elevator, ElevatorMode};
pub use event::{EventKind, EventLog, SimEvent};
pub use lobby::Lobby;
pub use passenger::{Passenger, Priority, Request};
pub use state::{PassengerStore, SimulationState};
