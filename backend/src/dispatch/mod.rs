//! Batch dispatcher
//!
//! Requests accumulate in a buffer for one batch window; then a single pass
//! assigns every buffered request to the elevator with the strictly lowest
//! cost (ties go to the first elevator in iteration order).
//!
//! The pass is greedy, one request at a time, and every request is scored
//! against the cars as they were at the start of the pass. It is
//! O(requests × elevators) and makes no attempt at a global optimum, so a
//! later request can be worse off than under a joint matching.
//!
//! [`assign_requests_batch`] is pure: it maps (requests, elevators, config,
//! time) to a list of assignments without touching any state. The
//! orchestrator applies the result with [`apply_assignment`].

use crate::costs::cost_for;
use crate::models::{Elevator, Request};
use crate::orchestrator::SimConfig;
use serde::{Deserialize, Serialize};

/// One request → elevator decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub request_id: String,
    /// Index into the elevator slice the pass was run against
    pub elevator_index: usize,
    pub elevator_id: String,
    pub cost: f64,
}

/// Assign each request to its cheapest elevator
///
/// Requests no elevator can take (only possible with an empty elevator set)
/// are absent from the result and stay buffered.
///
/// # Example
///
/// ```rust
/// use elevator_dispatch_core::dispatch::assign_requests_batch;
/// use elevator_dispatch_core::{Elevator, ElevatorMode, Passenger, SimConfig};
///
/// let config = SimConfig::default();
/// let mut far = Elevator::new("E1".to_string(), 12, 1.5, ElevatorMode::Normal, None);
/// far.current_floor = 15.0;
/// let near = Elevator::new("E2".to_string(), 12, 1.5, ElevatorMode::Normal, None);
///
/// let requests = vec![Passenger::new("P1".to_string(), 1, 4, 0).to_request()];
/// let assignments = assign_requests_batch(&requests, &[far, near], &config, 0);
///
/// assert_eq!(assignments.len(), 1);
/// assert_eq!(assignments[0].elevator_id, "E2");
/// ```
pub fn assign_requests_batch(
    requests: &[Request],
    elevators: &[Elevator],
    config: &SimConfig,
    now_ms: u64,
) -> Vec<Assignment> {
    let mut assignments = Vec::with_capacity(requests.len());

    for request in requests {
        let mut best: Option<(usize, f64)> = None;

        for (index, elevator) in elevators.iter().enumerate() {
            let cost = cost_for(elevator, request, config, now_ms);
            let better = match best {
                Some((_, best_cost)) => cost < best_cost,
                None => cost < f64::INFINITY,
            };
            if better {
                best = Some((index, cost));
            }
        }

        if let Some((index, cost)) = best {
            assignments.push(Assignment {
                request_id: request.id.clone(),
                elevator_index: index,
                elevator_id: elevators[index].id.clone(),
                cost,
            });
        }
    }

    assignments
}

/// Add a request's origin and destination to the car's queue
///
/// Floors already queued are skipped; the queue is then re-sorted for the
/// car's committed direction. Returns the number of stops added.
pub fn apply_assignment(elevator: &mut Elevator, request: &Request) -> usize {
    let added = usize::from(elevator.push_stop(request.origin))
        + usize::from(elevator.push_stop(request.dest));
    elevator.sort_queue();
    added
}
