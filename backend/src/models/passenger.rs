//! Passenger and request models
//!
//! A passenger is created once (by the arrival generator or a manual call)
//! and is never deleted: pickup and dropoff are stamped in place by the
//! elevator state machine, and the record is retained for metrics.
//!
//! A request is the dispatch-facing projection of a passenger. It shares the
//! passenger's id and is consumed exactly once, by the batch dispatcher.

use serde::{Deserialize, Serialize};

/// Service priority of a passenger
///
/// Carried through dispatch; it does not alter cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    #[default]
    Normal,
    Vip,
    Accessible,
}

/// A person travelling from `origin` to `dest`
///
/// # Example
/// ```
/// use elevator_dispatch_core::Passenger;
///
/// let mut p = Passenger::new("P000001".to_string(), 0, 5, 1_000);
/// assert!(p.is_waiting());
///
/// p.mark_picked_up(2_000);
/// assert!(p.is_riding());
///
/// p.mark_dropped_off(6_000);
/// assert_eq!(p.wait_time_ms(), Some(1_000));
/// assert_eq!(p.ride_time_ms(), Some(4_000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: String,
    pub origin: usize,
    pub dest: usize,
    pub created_at: u64,
    pub picked_at: Option<u64>,
    pub dropped_at: Option<u64>,
    pub priority: Priority,
}

impl Passenger {
    pub fn new(id: String, origin: usize, dest: usize, created_at: u64) -> Self {
        Self {
            id,
            origin,
            dest,
            created_at,
            picked_at: None,
            dropped_at: None,
            priority: Priority::Normal,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Still in the lobby
    pub fn is_waiting(&self) -> bool {
        self.picked_at.is_none() && self.dropped_at.is_none()
    }

    /// Onboard an elevator
    pub fn is_riding(&self) -> bool {
        self.picked_at.is_some() && self.dropped_at.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.dropped_at.is_some()
    }

    pub fn mark_picked_up(&mut self, now_ms: u64) {
        self.picked_at = Some(now_ms);
    }

    pub fn mark_dropped_off(&mut self, now_ms: u64) {
        self.dropped_at = Some(now_ms);
    }

    /// pickup − created, once picked up
    pub fn wait_time_ms(&self) -> Option<u64> {
        self.picked_at.map(|p| p.saturating_sub(self.created_at))
    }

    /// dropoff − pickup, once dropped off
    pub fn ride_time_ms(&self) -> Option<u64> {
        match (self.picked_at, self.dropped_at) {
            (Some(p), Some(d)) => Some(d.saturating_sub(p)),
            _ => None,
        }
    }

    /// The request this passenger is dispatched by
    pub fn to_request(&self) -> Request {
        Request {
            id: self.id.clone(),
            origin: self.origin,
            dest: self.dest,
            created_at: self.created_at,
            priority: self.priority,
        }
    }
}

/// Dispatch-facing view of a passenger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub origin: usize,
    pub dest: usize,
    pub created_at: u64,
    pub priority: Priority,
}

impl Request {
    /// True when the trip goes up (`dest > origin`)
    pub fn is_upward(&self) -> bool {
        self.dest > self.origin
    }
}
