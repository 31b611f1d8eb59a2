//! Elevator state machine
//!
//! Doors cycle `Closed → Opening → Open → Closing → Closed`; the car only
//! moves while its doors are `Closed`. Each tick performs exactly one phase
//! for a car:
//!
//! ```text
//! Opening/Closing  accumulate door timer; at door_open_close_ms flip to
//!                  Open/Closed and log DoorOpen/DoorClose
//! Open             accumulate dwell; alight riders for this floor; board
//!                  waiting passengers whose destination is queued on this
//!                  car while load < capacity; at door_dwell_ms start
//!                  Closing, drop this floor from the queue, count a stop
//! Closed + queue   head for the first queued stop; within one tick's travel
//!                  snap onto it and start Opening, else advance one tick
//! ```
//!
//! After the phase, a car with an empty queue is forced to `Idle`.
//!
//! Boarding requires the passenger's destination to be queued on this car.
//! That gate keeps riders off cars the dispatcher did not route them to when
//! several cars open on the same floor; a door opened by hand on a car with
//! no matching stops boards nobody.

use crate::metrics::Metrics;
use crate::models::{Direction, DoorState, Elevator, EventKind, EventLog, PassengerStore, SimEvent};
use crate::orchestrator::SimConfig;
use tracing::debug;

/// Timing of the tick being executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTiming {
    /// Simulation time after this tick (ms)
    pub now_ms: u64,
    /// Tick length (ms)
    pub delta_ms: u64,
}

/// What one car did during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub pickups: usize,
    pub dropoffs: usize,
}

/// Advance one car by one tick
pub fn step_elevator(
    elevator: &mut Elevator,
    passengers: &mut PassengerStore,
    metrics: &mut Metrics,
    events: &mut EventLog,
    config: &SimConfig,
    timing: TickTiming,
) -> StepOutcome {
    let outcome = match elevator.door_state {
        DoorState::Opening | DoorState::Closing => {
            advance_door(elevator, events, config, timing);
            StepOutcome::default()
        }
        DoorState::Open => dwell(elevator, passengers, metrics, events, config, timing),
        DoorState::Closed => {
            travel(elevator, config, timing);
            StepOutcome::default()
        }
    };

    if elevator.queue.is_empty() {
        elevator.direction = Direction::Idle;
    }

    outcome
}

fn advance_door(
    elevator: &mut Elevator,
    events: &mut EventLog,
    config: &SimConfig,
    timing: TickTiming,
) {
    elevator.door_timer_ms += timing.delta_ms;
    if elevator.door_timer_ms < config.door_open_close_ms {
        return;
    }

    let (next_state, kind, word) = match elevator.door_state {
        DoorState::Opening => (DoorState::Open, EventKind::DoorOpen, "open"),
        _ => (DoorState::Closed, EventKind::DoorClose, "closed"),
    };
    elevator.door_state = next_state;
    elevator.door_timer_ms = 0;

    let floor = elevator.rounded_floor();
    debug!(elevator = %elevator.id, floor, state = word, "door transition");
    events.log(
        SimEvent::new(kind, timing.now_ms)
            .with_elevator(&elevator.id)
            .with_floor(floor)
            .with_details(format!("{} door {} at floor {}", elevator.id, word, floor)),
    );
}

fn dwell(
    elevator: &mut Elevator,
    passengers: &mut PassengerStore,
    metrics: &mut Metrics,
    events: &mut EventLog,
    config: &SimConfig,
    timing: TickTiming,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    elevator.door_timer_ms += timing.delta_ms;
    let floor = elevator.rounded_floor();

    // Alight
    let mut staying = Vec::with_capacity(elevator.passengers.len());
    for id in std::mem::take(&mut elevator.passengers) {
        let Some(passenger) = passengers.get_mut(&id) else {
            continue;
        };
        if passenger.dest != floor {
            staying.push(id);
            continue;
        }
        if passenger.dropped_at.is_none() {
            passenger.mark_dropped_off(timing.now_ms);
            metrics.record_trip(passenger);
            outcome.dropoffs += 1;
            events.log(
                SimEvent::new(EventKind::Dropoff, timing.now_ms)
                    .with_elevator(&elevator.id)
                    .with_floor(floor)
                    .with_passenger(&id)
                    .with_details(format!("Passenger {} dropped off at floor {}", id, floor)),
            );
        }
    }
    elevator.passengers = staying;
    elevator.sync_load();

    // Board
    for id in passengers.waiting_at(floor) {
        if elevator.load >= elevator.capacity {
            break;
        }
        let Some(passenger) = passengers.get_mut(&id) else {
            continue;
        };
        if !elevator.has_stop(passenger.dest) {
            continue;
        }
        passenger.mark_picked_up(timing.now_ms);
        elevator.passengers.push(id.clone());
        elevator.sync_load();
        outcome.pickups += 1;
        events.log(
            SimEvent::new(EventKind::Pickup, timing.now_ms)
                .with_elevator(&elevator.id)
                .with_floor(floor)
                .with_passenger(&id)
                .with_details(format!(
                    "Passenger {} boarded {} at floor {}",
                    id, elevator.id, floor
                )),
        );
    }

    if elevator.door_timer_ms >= config.door_dwell_ms {
        elevator.door_state = DoorState::Closing;
        elevator.door_timer_ms = 0;
        elevator.remove_stop(floor);
        metrics.record_stop();
    }

    outcome
}

fn travel(elevator: &mut Elevator, config: &SimConfig, timing: TickTiming) {
    let Some(next) = elevator.next_stop() else {
        return;
    };
    let target = next as f64;
    elevator.direction = Direction::toward(elevator.current_floor, target);

    let distance = (target - elevator.current_floor).abs();
    let step = elevator.speed * timing.delta_ms as f64 / 1000.0;

    if distance <= step {
        elevator.current_floor = target;
        elevator.energy_kwh += distance * config.energy_per_floor_kwh;
        elevator.door_state = DoorState::Opening;
        elevator.door_timer_ms = 0;
    } else {
        match elevator.direction {
            Direction::Up => elevator.current_floor += step,
            _ => elevator.current_floor -= step,
        }
        elevator.energy_kwh += step * config.energy_per_floor_kwh;
    }
}
