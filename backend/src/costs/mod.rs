//! Assignment cost model
//!
//! Scores an (elevator, request) pair; lower is better. The score is a
//! weighted sum of four estimates plus flat penalties:
//!
//! | term | estimate |
//! |---|---|
//! | wait | ms until the car reaches the request's origin |
//! | ride | ms of travel plus expected intermediate stops |
//! | stops | number of new stops the request adds (0–2) |
//! | energy | kWh for the origin→destination run |
//!
//! Penalties (each scaled by 1000): overload, reversal of a committed run,
//! projected SLA breach. Zoning adds a flat 10 000 when the origin is outside
//! the car's zone.
//!
//! Every function here is pure. All inputs are finite by construction
//! (configuration is sanitized before use), so the result is never NaN.

use crate::models::{Direction, Elevator, Request};
use crate::orchestrator::SimConfig;
use serde::{Deserialize, Serialize};

/// Flat cost added when the origin lies outside the car's zone
pub const OUT_OF_ZONE_PENALTY: f64 = 10_000.0;

/// Per-term view of one cost evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub eta_wait_ms: f64,
    pub ride_time_ms: f64,
    pub added_stops: u32,
    pub energy_kwh: f64,
    /// Weighted sum of the four estimates
    pub weighted: f64,
    pub overload_penalty: f64,
    pub reversal_penalty: f64,
    pub sla_penalty: f64,
    pub zone_penalty: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.weighted
            + self.overload_penalty
            + self.reversal_penalty
            + self.sla_penalty
            + self.zone_penalty
    }
}

/// Time (ms) for `elevator` to reach `target`
///
/// With an empty queue this is straight travel. Otherwise the queued stops
/// are visited in order, each costing travel plus a door cycle, up to and
/// including `target` (appended as a final stop if not queued).
pub fn estimate_time_to_reach(elevator: &Elevator, target: usize, config: &SimConfig) -> f64 {
    let speed = elevator.speed;

    if elevator.queue.is_empty() {
        return (target as f64 - elevator.current_floor).abs() / speed * 1000.0;
    }

    let door_cycle = (config.door_open_close_ms + config.door_dwell_ms) as f64;
    let stops_to_target = match elevator.queue.iter().position(|&f| f == target) {
        Some(i) => i + 1,
        None => elevator.queue.len() + 1,
    };

    let mut time = 0.0;
    let mut position = elevator.current_floor;
    for i in 0..stops_to_target {
        let stop = elevator.queue.get(i).copied().unwrap_or(target) as f64;
        time += (stop - position).abs() / speed * 1000.0;
        time += door_cycle;
        position = stop;
    }
    time
}

/// In-cabin time (ms): travel plus an allowance for intermediate stops
pub fn estimate_ride_time(
    elevator: &Elevator,
    origin: usize,
    dest: usize,
    config: &SimConfig,
) -> f64 {
    let distance = origin.abs_diff(dest) as f64;
    let travel = distance / elevator.speed * 1000.0;
    let expected_stops = (elevator.queue.len() as f64).min(distance / 3.0);
    travel + expected_stops * (config.door_open_close_ms + config.door_dwell_ms) as f64
}

/// Stops the request would add to the queue (0, 1 or 2)
pub fn estimate_added_stops(elevator: &Elevator, origin: usize, dest: usize) -> u32 {
    u32::from(!elevator.has_stop(origin)) + u32::from(!elevator.has_stop(dest))
}

/// Energy (kWh) for the origin→destination run
pub fn estimate_energy(origin: usize, dest: usize, config: &SimConfig) -> f64 {
    origin.abs_diff(dest) as f64 * config.energy_per_floor_kwh
}

/// Full per-term evaluation of assigning `request` to `elevator` at `now_ms`
pub fn cost_breakdown(
    elevator: &Elevator,
    request: &Request,
    config: &SimConfig,
    now_ms: u64,
) -> CostBreakdown {
    let w = &config.weights;

    let eta_wait_ms = estimate_time_to_reach(elevator, request.origin, config);
    let ride_time_ms = estimate_ride_time(elevator, request.origin, request.dest, config);
    let added_stops = estimate_added_stops(elevator, request.origin, request.dest);
    let energy_kwh = estimate_energy(request.origin, request.dest, config);

    let weighted = w.w_wait * eta_wait_ms
        + w.w_ride * ride_time_ms
        + w.w_stops * f64::from(added_stops) * 1000.0
        + w.w_energy * energy_kwh * 1000.0;

    let overload_penalty = if elevator.is_full() {
        w.penalty_overload * 1000.0
    } else {
        0.0
    };

    let request_direction = if request.is_upward() {
        Direction::Up
    } else {
        Direction::Down
    };
    let reversal_penalty = if elevator.direction != Direction::Idle
        && elevator.direction != request_direction
        && !elevator.queue.is_empty()
    {
        w.penalty_reversal * 1000.0
    } else {
        0.0
    };

    let waited_ms = now_ms.saturating_sub(request.created_at) as f64;
    let sla_penalty = if eta_wait_ms + waited_ms > config.sla.max_wait_ms_p95 as f64 {
        w.penalty_sla_breach * 1000.0
    } else {
        0.0
    };

    let zone_penalty = if config.zoning_enabled && elevator.is_out_of_zone(request.origin) {
        OUT_OF_ZONE_PENALTY
    } else {
        0.0
    };

    CostBreakdown {
        eta_wait_ms,
        ride_time_ms,
        added_stops,
        energy_kwh,
        weighted,
        overload_penalty,
        reversal_penalty,
        sla_penalty,
        zone_penalty,
    }
}

/// Cost of assigning `request` to `elevator` at `now_ms`; lower is better
///
/// # Example
///
/// ```rust
/// use elevator_dispatch_core::costs::cost_for;
/// use elevator_dispatch_core::{Elevator, ElevatorMode, Passenger, SimConfig};
///
/// let config = SimConfig::default();
/// let car = Elevator::new("E1".to_string(), 12, 1.5, ElevatorMode::Normal, None);
/// let request = Passenger::new("P1".to_string(), 3, 0, 0).to_request();
///
/// // 3 floors away at 1.5 floors/s → 2000 ms wait, 2000 ms ride (×0.5),
/// // two new stops (×0.3×1000), 0.15 kWh (×0.1×1000)
/// let cost = cost_for(&car, &request, &config, 0);
/// assert!((cost - (2000.0 + 1000.0 + 600.0 + 15.0)).abs() < 1e-6);
/// ```
pub fn cost_for(elevator: &Elevator, request: &Request, config: &SimConfig, now_ms: u64) -> f64 {
    cost_breakdown(elevator, request, config, now_ms).total()
}
