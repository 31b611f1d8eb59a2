//! Elevator model
//!
//! An elevator owns its stop queue and the ids of its onboard passengers.
//! It never holds passenger records themselves; those live in the
//! simulation state and are resolved by id.
//!
//! # Invariants
//!
//! 1. The stop queue never contains the same floor twice
//! 2. `load == passengers.len()` after every state-machine step
//! 3. Boarding never takes `load` above `capacity` (overload is only
//!    penalized at assignment time, never forced)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Committed travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
    #[default]
    Idle,
}

impl Direction {
    /// Direction of travel from `from` towards `to`
    pub fn toward(from: f64, to: f64) -> Self {
        match to.partial_cmp(&from) {
            Some(Ordering::Greater) => Direction::Up,
            Some(Ordering::Less) => Direction::Down,
            _ => Direction::Idle,
        }
    }
}

/// Door lifecycle: `Closed → Opening → Open → Closing → Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DoorState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Traffic pattern the car is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElevatorMode {
    #[default]
    Normal,
    UpPeak,
    DownPeak,
    Interfloor,
}

/// One elevator car
///
/// # Example
/// ```
/// use elevator_dispatch_core::{DoorState, Elevator, ElevatorMode};
///
/// let mut car = Elevator::new("E1".to_string(), 12, 1.5, ElevatorMode::Normal, None);
/// assert!(car.push_stop(4));
/// assert!(!car.push_stop(4)); // duplicates are ignored
/// assert_eq!(car.queue, vec![4]);
///
/// assert!(car.toggle_door());
/// assert_eq!(car.door_state, DoorState::Opening);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Elevator {
    pub id: String,
    /// Continuous position in floors
    pub current_floor: f64,
    pub direction: Direction,
    /// Ordered stops, no duplicates
    pub queue: Vec<usize>,
    /// Ids of onboard passengers
    pub passengers: Vec<String>,
    pub capacity: usize,
    pub load: usize,
    pub door_state: DoorState,
    pub door_timer_ms: u64,
    /// Floors per second
    pub speed: f64,
    pub energy_kwh: f64,
    pub mode: ElevatorMode,
    /// Inclusive floor range served when zoning is on
    pub zone: Option<(usize, usize)>,
}

impl Elevator {
    pub fn new(
        id: String,
        capacity: usize,
        speed: f64,
        mode: ElevatorMode,
        zone: Option<(usize, usize)>,
    ) -> Self {
        Self {
            id,
            current_floor: 0.0,
            direction: Direction::Idle,
            queue: Vec::new(),
            passengers: Vec::new(),
            capacity,
            load: 0,
            door_state: DoorState::Closed,
            door_timer_ms: 0,
            speed,
            energy_kwh: 0.0,
            mode,
            zone,
        }
    }

    /// Nearest whole floor to the car's position
    pub fn rounded_floor(&self) -> usize {
        self.current_floor.round().max(0.0) as usize
    }

    pub fn has_stop(&self, floor: usize) -> bool {
        self.queue.contains(&floor)
    }

    /// Append a stop unless already queued; returns whether it was added
    pub fn push_stop(&mut self, floor: usize) -> bool {
        if self.has_stop(floor) {
            return false;
        }
        self.queue.push(floor);
        true
    }

    pub fn remove_stop(&mut self, floor: usize) {
        self.queue.retain(|&f| f != floor);
    }

    pub fn next_stop(&self) -> Option<usize> {
        self.queue.first().copied()
    }

    /// Re-order the queue for the committed direction
    ///
    /// Ascending when going up, descending when going down, otherwise
    /// nearest-to-current-floor first. The sort is stable, so equally
    /// ranked stops keep their insertion order.
    ///
    /// # Example
    /// ```
    /// use elevator_dispatch_core::{Direction, Elevator, ElevatorMode};
    ///
    /// let mut car = Elevator::new("E1".to_string(), 12, 1.5, ElevatorMode::Normal, None);
    /// car.current_floor = 5.0;
    /// car.queue = vec![9, 4, 7];
    /// car.sort_queue();
    /// assert_eq!(car.queue, vec![4, 7, 9]);
    ///
    /// car.direction = Direction::Down;
    /// car.sort_queue();
    /// assert_eq!(car.queue, vec![9, 7, 4]);
    /// ```
    pub fn sort_queue(&mut self) {
        match self.direction {
            Direction::Up => self.queue.sort(),
            Direction::Down => self.queue.sort_by(|a, b| b.cmp(a)),
            Direction::Idle => {
                let here = self.current_floor;
                self.queue.sort_by(|a, b| {
                    let da = (*a as f64 - here).abs();
                    let db = (*b as f64 - here).abs();
                    da.total_cmp(&db)
                });
            }
        }
    }

    pub fn is_full(&self) -> bool {
        self.load >= self.capacity
    }

    /// Recompute `load` from the onboard set
    pub fn sync_load(&mut self) {
        self.load = self.passengers.len();
    }

    /// Manual door command
    ///
    /// `Closed → Opening` and `Open → Closing`; any transitional state is
    /// left alone. Returns whether the command took effect.
    pub fn toggle_door(&mut self) -> bool {
        match self.door_state {
            DoorState::Closed => {
                self.door_state = DoorState::Opening;
                self.door_timer_ms = 0;
                true
            }
            DoorState::Open => {
                self.door_state = DoorState::Closing;
                self.door_timer_ms = 0;
                true
            }
            DoorState::Opening | DoorState::Closing => false,
        }
    }

    /// True when zoning restricts this car and `floor` is outside its zone
    pub fn is_out_of_zone(&self, floor: usize) -> bool {
        match self.zone {
            Some((min, max)) => floor < min || floor > max,
            None => false,
        }
    }
}
