//! Event logging for simulation replay and inspection.
//!
//! Every observable state change of the engine is recorded as a
//! [`SimEvent`]: arrivals, assignments, door transitions, pickups and
//! dropoffs. Events are immutable once logged.
//!
//! The log is bounded: only the most recent entries are kept (1000 by
//! default), oldest evicted first. Metrics never depend on the log, so
//! eviction loses no accounting.
//!
//! # Example
//!
//! ```rust
//! use elevator_dispatch_core::models::{EventKind, EventLog, SimEvent};
//!
//! let mut log = EventLog::with_capacity(2);
//! log.log(SimEvent::new(EventKind::Arrival, 200).with_floor(0));
//! log.log(SimEvent::new(EventKind::Assign, 1600).with_elevator("E1"));
//! log.log(SimEvent::new(EventKind::DoorOpen, 1800).with_elevator("E1"));
//!
//! assert_eq!(log.len(), 2);
//! assert_eq!(log.events().next().map(|e| e.kind), Some(EventKind::Assign));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of retained events
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1000;

/// Kind of a logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Passenger appeared in a lobby (generated or manual)
    Arrival,
    /// Request assigned to an elevator
    Assign,
    DoorOpen,
    DoorClose,
    /// Passenger boarded
    Pickup,
    /// Passenger alighted at destination
    Dropoff,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Arrival => "Arrival",
            EventKind::Assign => "Assign",
            EventKind::DoorOpen => "DoorOpen",
            EventKind::DoorClose => "DoorClose",
            EventKind::Pickup => "Pickup",
            EventKind::Dropoff => "Dropoff",
        }
    }
}

/// Immutable log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimEvent {
    /// Sequence id assigned by the log (`EV…`)
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: u64,
    pub elevator_id: Option<String>,
    pub floor: Option<usize>,
    pub passenger_id: Option<String>,
    pub details: String,
}

impl SimEvent {
    pub fn new(kind: EventKind, timestamp: u64) -> Self {
        Self {
            id: String::new(),
            kind,
            timestamp,
            elevator_id: None,
            floor: None,
            passenger_id: None,
            details: String::new(),
        }
    }

    pub fn with_elevator(mut self, elevator_id: &str) -> Self {
        self.elevator_id = Some(elevator_id.to_string());
        self
    }

    pub fn with_floor(mut self, floor: usize) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn with_passenger(mut self, passenger_id: &str) -> Self {
        self.passenger_id = Some(passenger_id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}

/// Bounded, append-only event log
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
    capacity: usize,
    /// Events ever logged, including evicted ones
    total_logged: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    /// Log retaining the default 1000 most recent events
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }

    /// Log retaining at most `capacity` events (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            total_logged: 0,
        }
    }

    /// Append an event, assigning its id and evicting the oldest if full
    pub fn log(&mut self, mut event: SimEvent) {
        self.total_logged += 1;
        event.id = format!("EV{:08}", self.total_logged);

        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the retention bound, evicting the oldest events if needed
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    /// Events ever logged, evicted ones included
    pub fn total_logged(&self) -> u64 {
        self.total_logged
    }

    /// Retained events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    pub fn to_vec(&self) -> Vec<SimEvent> {
        self.events.iter().cloned().collect()
    }

    /// Events logged at a given simulation time
    pub fn events_at(&self, timestamp: u64) -> Vec<&SimEvent> {
        self.events
            .iter()
            .filter(|e| e.timestamp == timestamp)
            .collect()
    }

    pub fn events_of_kind(&self, kind: EventKind) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn events_for_passenger(&self, passenger_id: &str) -> Vec<&SimEvent> {
        self.events
            .iter()
            .filter(|e| e.passenger_id.as_deref() == Some(passenger_id))
            .collect()
    }

    pub fn events_for_elevator(&self, elevator_id: &str) -> Vec<&SimEvent> {
        self.events
            .iter()
            .filter(|e| e.elevator_id.as_deref() == Some(elevator_id))
            .collect()
    }

    /// Drop all events and restart the id sequence
    pub fn clear(&mut self) {
        self.events.clear();
        self.total_logged = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrival(ts: u64, pid: &str) -> SimEvent {
        SimEvent::new(EventKind::Arrival, ts)
            .with_floor(0)
            .with_passenger(pid)
    }

    #[test]
    fn test_event_log_basic() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.log(arrival(200, "P000001"));

        assert_eq!(log.len(), 1);
        assert_eq!(log.events().next().map(|e| e.id.as_str()), Some("EV00000001"));
    }

    #[test]
    fn test_event_log_evicts_oldest() {
        let mut log = EventLog::new();
        for i in 0..1005u64 {
            log.log(arrival(i, "P"));
        }

        assert_eq!(log.len(), 1000);
        assert_eq!(log.total_logged(), 1005);
        assert_eq!(log.events().next().map(|e| e.timestamp), Some(5));
        assert_eq!(log.events().last().map(|e| e.timestamp), Some(1004));
    }

    #[test]
    fn test_event_log_queries() {
        let mut log = EventLog::new();
        log.log(arrival(200, "P000001"));
        log.log(
            SimEvent::new(EventKind::Assign, 1600)
                .with_elevator("E2")
                .with_floor(0)
                .with_passenger("P000001"),
        );
        log.log(SimEvent::new(EventKind::DoorOpen, 1600).with_elevator("E1"));

        assert_eq!(log.events_at(1600).len(), 2);
        assert_eq!(log.events_of_kind(EventKind::Arrival).len(), 1);
        assert_eq!(log.events_for_passenger("P000001").len(), 2);
        assert_eq!(log.events_for_elevator("E1").len(), 1);
    }

    #[test]
    fn test_event_kind_serializes_as_type() {
        let e = SimEvent::new(EventKind::Dropoff, 5).with_details("done");
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"type\":\"Dropoff\""));
        assert!(json.contains("\"passengerId\":null"));
    }

    #[test]
    fn test_event_log_clear_restarts_ids() {
        let mut log = EventLog::with_capacity(3);
        log.log(arrival(1, "P"));
        log.log(arrival(2, "P"));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.total_logged(), 0);
        assert_eq!(log.capacity(), 3);

        log.log(arrival(3, "P"));
        assert_eq!(log.events().next().map(|e| e.id.as_str()), Some("EV00000001"));
    }

    #[test]
    fn test_event_kind_name_matches_wire_tag() {
        for kind in [
            EventKind::Arrival,
            EventKind::Assign,
            EventKind::DoorOpen,
            EventKind::DoorClose,
            EventKind::Pickup,
            EventKind::Dropoff,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
