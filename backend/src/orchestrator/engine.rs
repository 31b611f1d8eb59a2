//! Orchestrator engine
//!
//! The single owner of simulation state. Hosts drive it by calling
//! [`Orchestrator::tick`] and issue commands between ticks; the engine never
//! schedules itself.
//!
//! # Tick loop
//!
//! ```text
//! For each tick:
//! 1. Advance the clock by tickMs
//! 2. Generate arrivals (Poisson per floor, capped population)
//! 3. Dispatch the batch buffer once the batch window has elapsed
//! 4. Step every car's door/motion state machine (boarding, alighting)
//! 5. Summarize metrics
//! ```
//!
//! Each stage sees the effects of the previous one, so a request created in
//! a tick can be dispatched in the same tick only if the window boundary
//! falls on it.
//!
//! # Example
//!
//! ```rust
//! use elevator_dispatch_core::{Orchestrator, SimConfig};
//!
//! let config = SimConfig {
//!     elevators: 1,
//!     arrival_rates: vec![0.0; 20],
//!     ..SimConfig::default()
//! };
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//!
//! let id = orchestrator.add_request(0, 5).unwrap();
//! for _ in 0..60 {
//!     orchestrator.tick();
//! }
//!
//! let passenger = orchestrator.passengers().get(&id).unwrap();
//! assert!(passenger.is_completed());
//! assert_eq!(orchestrator.metrics().total_trips, 1);
//! ```

use super::config::{ConfigError, ConfigPatch, SimConfig};
use crate::arrivals::{uniform_other_floor, ArrivalGenerator};
use crate::core::time::SimClock;
use crate::dispatch::{apply_assignment, assign_requests_batch};
use crate::fsm::{step_elevator, TickTiming};
use crate::metrics::{Metrics, MetricsSummary};
use crate::models::{
    Elevator, EventKind, EventLog, Lobby, Passenger, PassengerStore, Priority, SimEvent,
    SimulationState,
};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Errors surfaced by the command API
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Elevator not found: {0}")]
    ElevatorNotFound(String),
}

/// Result of a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickResult {
    /// Simulation time after the tick (ms)
    pub sim_time: u64,

    /// Passengers generated this tick
    pub num_arrivals: usize,

    /// Requests assigned to a car this tick
    pub num_assignments: usize,

    pub num_pickups: usize,
    pub num_dropoffs: usize,

    /// Whether a dispatch pass ran this tick
    pub dispatched: bool,
}

/// Full observable state, for hosts that render or persist it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSnapshot {
    pub simulation_id: String,
    pub sim_time: u64,
    pub running: bool,
    pub speed: f64,
    pub elevators: Vec<Elevator>,
    pub lobbies: Vec<Lobby>,
    pub passengers: Vec<Passenger>,
    pub events: Vec<SimEvent>,
    pub metrics: MetricsSummary,
}

/// Main simulation orchestrator
///
/// Owns configuration, state, clock, RNG, event log and metrics. Two
/// orchestrators built from the same config and driven by the same command
/// sequence produce identical event logs and state.
pub struct Orchestrator {
    /// Current (sanitized, validated) configuration
    config: SimConfig,

    /// Cars, lobbies, passengers and the dispatch buffer
    state: SimulationState,

    /// Simulation clock and batch-window bookkeeping
    clock: SimClock,

    /// Deterministic RNG
    rng: RngManager,

    /// Arrival generator; owns the passenger id sequence
    arrival_generator: ArrivalGenerator,

    /// Bounded event log
    event_log: EventLog,

    /// Metric accumulators
    metrics: Metrics,

    /// Host-facing run flag; `tick` ignores it
    running: bool,

    /// Host-facing time multiplier; the engine never reads it
    speed_multiplier: f64,

    /// Per-instance id, never part of simulation output
    simulation_id: Uuid,
}

impl Orchestrator {
    /// Create an orchestrator from a configuration
    ///
    /// Malformed numeric fields are replaced by defaults; structural errors
    /// are rejected.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let config = config.sanitized();
        config.validate()?;

        let simulation_id = Uuid::new_v4();
        info!(
            %simulation_id,
            floors = config.floors,
            elevators = config.elevators,
            seed = config.random_seed,
            "simulation created"
        );

        Ok(Self {
            state: SimulationState::new(build_elevators(&config), config.floors),
            clock: SimClock::new(config.tick_ms),
            rng: RngManager::new(config.random_seed),
            arrival_generator: ArrivalGenerator::new(),
            event_log: EventLog::with_capacity(config.event_log_capacity),
            metrics: Metrics::new(),
            running: false,
            speed_multiplier: 1.0,
            simulation_id,
            config,
        })
    }

    /// Create an orchestrator from a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(SimConfig::from_json(json)?)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Merge `patch` into the configuration and rebuild cars and lobbies
    ///
    /// In-flight passengers (waiting or riding) and the dispatch buffer are
    /// discarded; completed passengers, metrics, events, simulation time and
    /// the RNG stream are kept. On error nothing changes.
    pub fn configure(&mut self, patch: &ConfigPatch) -> Result<(), ConfigError> {
        let next = self.config.merged(patch).sanitized();
        next.validate()?;

        self.state.rebuild(build_elevators(&next), next.floors);
        self.clock.set_tick_ms(next.tick_ms);
        self.event_log.set_capacity(next.event_log_capacity);
        self.config = next;

        info!(
            simulation_id = %self.simulation_id,
            floors = self.config.floors,
            elevators = self.config.elevators,
            "simulation reconfigured"
        );
        Ok(())
    }

    /// Reinitialize everything from the current config and its seed
    pub fn reset(&mut self) {
        self.state = SimulationState::new(build_elevators(&self.config), self.config.floors);
        self.clock = SimClock::new(self.config.tick_ms);
        self.rng.reset(self.config.random_seed);
        self.arrival_generator = ArrivalGenerator::new();
        self.event_log.clear();
        self.event_log.set_capacity(self.config.event_log_capacity);
        self.metrics = Metrics::new();
        self.running = false;

        info!(
            simulation_id = %self.simulation_id,
            seed = self.config.random_seed,
            "simulation reset"
        );
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Store the host driver's time multiplier
    ///
    /// Non-positive or non-finite values are ignored. Returns whether the
    /// value was accepted.
    pub fn set_speed(&mut self, multiplier: f64) -> bool {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return false;
        }
        self.speed_multiplier = multiplier;
        true
    }

    pub fn speed(&self) -> f64 {
        self.speed_multiplier
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the simulation by one tick
    pub fn tick(&mut self) -> TickResult {
        let now = self.clock.advance_tick();
        let timing = TickTiming {
            now_ms: now,
            delta_ms: self.clock.tick_ms(),
        };

        // STEP 1: ARRIVALS
        let num_arrivals = self.generate_arrivals(timing);

        // STEP 2: BATCH DISPATCH
        let (dispatched, num_assignments) = self.dispatch(now);

        // STEP 3: DOORS AND MOTION
        let mut num_pickups = 0;
        let mut num_dropoffs = 0;
        let (elevators, passengers) = self.state.split_mut();
        for elevator in elevators.iter_mut() {
            let outcome = step_elevator(
                elevator,
                passengers,
                &mut self.metrics,
                &mut self.event_log,
                &self.config,
                timing,
            );
            num_pickups += outcome.pickups;
            num_dropoffs += outcome.dropoffs;
        }

        trace!(
            sim_time = now,
            arrivals = num_arrivals,
            assignments = num_assignments,
            pickups = num_pickups,
            dropoffs = num_dropoffs,
            "tick"
        );

        TickResult {
            sim_time: now,
            num_arrivals,
            num_assignments,
            num_pickups,
            num_dropoffs,
            dispatched,
        }
    }

    fn generate_arrivals(&mut self, timing: TickTiming) -> usize {
        let arrivals = self.arrival_generator.generate(
            &self.config,
            timing.now_ms,
            timing.delta_ms,
            self.state.passengers().len(),
            &mut self.rng,
        );
        let count = arrivals.len();
        for passenger in arrivals {
            self.admit(passenger);
        }
        count
    }

    /// Run a dispatch pass if the batch window has elapsed
    ///
    /// Costs are computed against the cars as they stand at the start of the
    /// pass; assignments are then applied in buffer order. Returns whether a
    /// pass ran and how many requests it assigned.
    fn dispatch(&mut self, now: u64) -> (bool, usize) {
        if self.state.buffer_size() == 0
            || !self.clock.batch_window_elapsed(self.config.batch_window_ms)
        {
            return (false, 0);
        }

        let assignments = assign_requests_batch(
            self.state.batch_buffer(),
            self.state.elevators(),
            &self.config,
            now,
        );

        let mut assigned_ids = Vec::with_capacity(assignments.len());
        for assignment in &assignments {
            let Some(request) = self
                .state
                .batch_buffer()
                .iter()
                .find(|r| r.id == assignment.request_id)
                .cloned()
            else {
                continue;
            };
            let Some(elevator) = self
                .state
                .elevators_mut()
                .get_mut(assignment.elevator_index)
            else {
                continue;
            };

            if elevator.is_full() {
                self.metrics.record_overload_assignment();
            }
            apply_assignment(elevator, &request);

            self.event_log.log(
                SimEvent::new(EventKind::Assign, now)
                    .with_elevator(&assignment.elevator_id)
                    .with_floor(request.origin)
                    .with_passenger(&request.id)
                    .with_details(format!("Assigned to {}", assignment.elevator_id)),
            );
            assigned_ids.push(request.id);
        }

        debug!(
            sim_time = now,
            buffered = self.state.buffer_size(),
            assigned = assigned_ids.len(),
            "dispatch pass"
        );

        self.state.consume_requests(&assigned_ids);
        self.clock.mark_batch();
        (true, assigned_ids.len())
    }

    /// Register a passenger and log its arrival
    fn admit(&mut self, passenger: Passenger) {
        self.event_log.log(
            SimEvent::new(EventKind::Arrival, passenger.created_at)
                .with_floor(passenger.origin)
                .with_passenger(&passenger.id)
                .with_details(format!(
                    "Passenger {} arrived at floor {}, going to {}",
                    passenger.id, passenger.origin, passenger.dest
                )),
        );
        self.state.admit(passenger);
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Inject a manual request at the current simulation time
    ///
    /// Returns the new passenger id, or `None` (and no event) when either
    /// floor is out of range or `origin == dest`. Manual requests are not
    /// subject to the population cap.
    pub fn add_request(&mut self, origin: usize, dest: usize) -> Option<String> {
        self.add_request_with_priority(origin, dest, Priority::Normal)
    }

    pub fn add_request_with_priority(
        &mut self,
        origin: usize,
        dest: usize,
        priority: Priority,
    ) -> Option<String> {
        let floors = self.config.floors;
        if origin >= floors || dest >= floors || origin == dest {
            debug!(origin, dest, floors, "manual request rejected");
            return None;
        }

        let id = self.arrival_generator.next_passenger_id();
        let passenger =
            Passenger::new(id.clone(), origin, dest, self.clock.now_ms()).with_priority(priority);
        self.admit(passenger);
        Some(id)
    }

    /// Inject `count` manual requests at `floor` with random destinations
    ///
    /// Returns the new passenger ids; empty for an out-of-range floor.
    pub fn spawn_burst(&mut self, floor: usize, count: usize) -> Vec<String> {
        let floors = self.config.floors;
        if floor >= floors {
            return Vec::new();
        }
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let dest = uniform_other_floor(floor, floors, &mut self.rng);
            if let Some(id) = self.add_request(floor, dest) {
                ids.push(id);
            }
        }
        ids
    }

    /// Manual door command; returns whether it took effect
    ///
    /// Only `Closed → Opening` and `Open → Closing` apply; unknown ids and
    /// transitional door states are silent no-ops.
    pub fn toggle_door(&mut self, elevator_id: &str) -> bool {
        self.try_toggle_door(elevator_id).unwrap_or(false)
    }

    /// Like [`Orchestrator::toggle_door`], but reports unknown elevators
    pub fn try_toggle_door(&mut self, elevator_id: &str) -> Result<bool, SimulationError> {
        let elevator = self
            .state
            .get_elevator_mut(elevator_id)
            .ok_or_else(|| SimulationError::ElevatorNotFound(elevator_id.to_string()))?;
        Ok(elevator.toggle_door())
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Current simulation time (ms)
    pub fn sim_time(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.clock.ticks_elapsed()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn elevators(&self) -> &[Elevator] {
        self.state.elevators()
    }

    pub fn lobbies(&self) -> &[Lobby] {
        self.state.lobbies()
    }

    pub fn passengers(&self) -> &PassengerStore {
        self.state.passengers()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn metrics_summary(&self) -> MetricsSummary {
        self.metrics.summarize(&self.state)
    }

    pub fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }

    pub fn simulation_id(&self) -> Uuid {
        self.simulation_id
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            simulation_id: self.simulation_id.to_string(),
            sim_time: self.clock.now_ms(),
            running: self.running,
            speed: self.speed_multiplier,
            elevators: self.state.elevators().to_vec(),
            lobbies: self.state.lobbies().to_vec(),
            passengers: self.state.passengers().all().to_vec(),
            events: self.event_log.to_vec(),
            metrics: self.metrics_summary(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("simulation_id", &self.simulation_id)
            .field("sim_time", &self.clock.now_ms())
            .field("elevators", &self.state.elevators().len())
            .field("passengers", &self.state.passengers().len())
            .field("running", &self.running)
            .finish()
    }
}

/// Cars `E1..En`, at floor 0 with doors closed
fn build_elevators(config: &SimConfig) -> Vec<Elevator> {
    (0..config.elevators)
        .map(|i| {
            Elevator::new(
                format!("E{}", i + 1),
                config.capacity_per_elevator,
                config.speed_floors_per_sec,
                config.mode,
                config.zone_for(i),
            )
        })
        .collect()
}
