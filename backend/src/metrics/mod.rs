//! Service-quality metrics
//!
//! Accumulators grow monotonically (sample lists) or increment (counters)
//! and are only ever cleared by a reset. Wait and ride samples are recorded
//! together at dropoff: wait = pickup − created, ride = dropoff − pickup.
//!
//! Everything else is derived on demand by [`Metrics::summarize`].

use crate::models::{Passenger, SimulationState};
use serde::{Deserialize, Serialize};

/// Raw accumulators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub wait_times: Vec<u64>,
    pub ride_times: Vec<u64>,
    /// Door cycles completed (dwell ended)
    pub total_stops: u64,
    pub total_trips: u64,
    /// Assignments made to a car already at or over capacity
    pub overload_count: u64,
    pub completed_passengers: Vec<Passenger>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished trip; `passenger` must carry its dropoff stamp
    pub fn record_trip(&mut self, passenger: &Passenger) {
        let picked = passenger.picked_at.unwrap_or(passenger.created_at);
        let dropped = passenger.dropped_at.unwrap_or(picked);

        self.wait_times.push(picked.saturating_sub(passenger.created_at));
        self.ride_times.push(dropped.saturating_sub(picked));
        self.completed_passengers.push(passenger.clone());
        self.total_trips += 1;
    }

    pub fn record_stop(&mut self) {
        self.total_stops += 1;
    }

    pub fn record_overload_assignment(&mut self) {
        self.overload_count += 1;
    }

    /// Derive the reporting view from accumulators and current state
    pub fn summarize(&self, state: &SimulationState) -> MetricsSummary {
        let total_capacity = state.total_capacity();
        let utilization = if total_capacity > 0 {
            state.total_load() as f64 / total_capacity as f64
        } else {
            0.0
        };
        let avg_stops_per_trip = if self.total_trips > 0 {
            self.total_stops as f64 / self.total_trips as f64
        } else {
            0.0
        };

        MetricsSummary {
            wait_p50_ms: percentile(&self.wait_times, 50.0),
            wait_p90_ms: percentile(&self.wait_times, 90.0),
            wait_p95_ms: percentile(&self.wait_times, 95.0),
            ride_p50_ms: percentile(&self.ride_times, 50.0),
            ride_p90_ms: percentile(&self.ride_times, 90.0),
            ride_p95_ms: percentile(&self.ride_times, 95.0),
            avg_stops_per_trip,
            utilization,
            total_energy_kwh: state.total_energy_kwh(),
            total_trips: self.total_trips,
            total_stops: self.total_stops,
            overload_count: self.overload_count,
            active_passengers: state.passengers().active_count(),
        }
    }
}

/// Derived metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub wait_p50_ms: u64,
    pub wait_p90_ms: u64,
    pub wait_p95_ms: u64,
    pub ride_p50_ms: u64,
    pub ride_p90_ms: u64,
    pub ride_p95_ms: u64,
    pub avg_stops_per_trip: f64,
    /// Total load / total capacity, in [0, 1] unless a car is overloaded
    pub utilization: f64,
    pub total_energy_kwh: f64,
    pub total_trips: u64,
    pub total_stops: u64,
    pub overload_count: u64,
    /// Passengers created and not yet dropped off
    pub active_passengers: usize,
}

/// Nearest-rank percentile of `samples`
///
/// Sorts a copy and takes index `ceil(p/100 × n) − 1`, clamped to the valid
/// range. An empty slice yields 0.
///
/// # Example
/// ```
/// use elevator_dispatch_core::metrics::percentile;
///
/// assert_eq!(percentile(&[100, 200, 300, 400], 50.0), 200);
/// assert_eq!(percentile(&[], 90.0), 0);
/// ```
pub fn percentile(samples: &[u64], p: f64) -> u64 {
    if samples.is_empty() {
        return 0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let rank = (p / 100.0 * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Elevator, ElevatorMode};

    #[test]
    fn test_percentile_nearest_rank() {
        let samples = [400, 100, 300, 200];
        assert_eq!(percentile(&samples, 50.0), 200);
        assert_eq!(percentile(&samples, 90.0), 400);
        assert_eq!(percentile(&samples, 95.0), 400);
        assert_eq!(percentile(&samples, 0.0), 100);
        assert_eq!(percentile(&samples, 100.0), 400);
    }

    #[test]
    fn test_percentile_single_sample() {
        assert_eq!(percentile(&[7], 50.0), 7);
    }

    #[test]
    fn test_record_trip() {
        let mut m = Metrics::new();
        let mut p = Passenger::new("P1".to_string(), 0, 3, 1_000);
        p.mark_picked_up(4_000);
        p.mark_dropped_off(9_000);

        m.record_trip(&p);

        assert_eq!(m.wait_times, vec![3_000]);
        assert_eq!(m.ride_times, vec![5_000]);
        assert_eq!(m.total_trips, 1);
        assert_eq!(m.completed_passengers.len(), 1);
    }

    #[test]
    fn test_summary_utilization_and_stops() {
        let mut cars = vec![
            Elevator::new("E1".to_string(), 10, 1.5, ElevatorMode::Normal, None),
            Elevator::new("E2".to_string(), 10, 1.5, ElevatorMode::Normal, None),
        ];
        cars[0].load = 5;
        cars[1].energy_kwh = 0.25;
        let state = SimulationState::new(cars, 4);

        let mut m = Metrics::new();
        m.record_stop();
        m.record_stop();
        m.record_stop();
        let mut p = Passenger::new("P1".to_string(), 0, 3, 0);
        p.mark_picked_up(0);
        p.mark_dropped_off(10);
        m.record_trip(&p);
        m.record_trip(&p);

        let s = m.summarize(&state);
        assert_eq!(s.utilization, 0.25);
        assert_eq!(s.avg_stops_per_trip, 1.5);
        assert_eq!(s.total_energy_kwh, 0.25);
    }

    #[test]
    fn test_summary_without_elevators_is_zero() {
        let state = SimulationState::new(Vec::new(), 4);
        let s = Metrics::new().summarize(&state);
        assert_eq!(s.utilization, 0.0);
        assert_eq!(s.avg_stops_per_trip, 0.0);
        assert_eq!(s.wait_p95_ms, 0);
    }
}
