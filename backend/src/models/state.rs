//! Simulation State
//!
//! Complete mutable state of one elevator-bank simulation: the cars, one
//! lobby per floor, every passenger ever created, and the dispatch buffer of
//! requests not yet assigned.
//!
//! Cars, lobbies and passengers never hold references to each other. They
//! are linked only by floor number and string id, resolved through this
//! struct's collections.
//!
//! # Critical Invariants
//!
//! 1. **Conservation**: sum of car loads equals the number of passengers
//!    picked up and not yet dropped off
//! 2. **Passenger Uniqueness**: each passenger id appears exactly once
//! 3. **Lobby Placement**: an unassigned request sits in its origin lobby and
//!    in the batch buffer, nowhere else

use crate::models::elevator::Elevator;
use crate::models::lobby::Lobby;
use crate::models::passenger::{Passenger, Request};
use std::collections::HashMap;

/// Arena of passengers addressed by id, kept in creation order
#[derive(Debug, Clone, Default)]
pub struct PassengerStore {
    passengers: Vec<Passenger>,
    index: HashMap<String, usize>,
}

impl PassengerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a passenger
    ///
    /// # Panics
    ///
    /// Panics if the passenger id already exists
    pub fn insert(&mut self, passenger: Passenger) {
        assert!(
            !self.index.contains_key(&passenger.id),
            "Passenger ID {} already exists",
            passenger.id
        );
        self.index.insert(passenger.id.clone(), self.passengers.len());
        self.passengers.push(passenger);
    }

    pub fn get(&self, id: &str) -> Option<&Passenger> {
        self.index.get(id).map(|&i| &self.passengers[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Passenger> {
        match self.index.get(id) {
            Some(&i) => self.passengers.get_mut(i),
            None => None,
        }
    }

    /// All passengers in creation order
    pub fn all(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    /// Ids of passengers still waiting at `floor`, in creation order
    pub fn waiting_at(&self, floor: usize) -> Vec<String> {
        self.passengers
            .iter()
            .filter(|p| p.origin == floor && p.is_waiting())
            .map(|p| p.id.clone())
            .collect()
    }

    /// Passengers picked up and not yet dropped off
    pub fn riding_count(&self) -> usize {
        self.passengers.iter().filter(|p| p.is_riding()).count()
    }

    /// Passengers not yet dropped off
    pub fn active_count(&self) -> usize {
        self.passengers.iter().filter(|p| !p.is_completed()).count()
    }

    /// Keep only passengers matching `keep`
    pub fn retain(&mut self, keep: impl Fn(&Passenger) -> bool) {
        self.passengers.retain(|p| keep(p));
        self.index = self
            .passengers
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
    }
}

/// Complete simulation state
///
/// # Example
///
/// ```rust
/// use elevator_dispatch_core::{Elevator, ElevatorMode, SimulationState};
///
/// let cars = vec![Elevator::new("E1".to_string(), 12, 1.5, ElevatorMode::Normal, None)];
/// let state = SimulationState::new(cars, 10);
/// assert_eq!(state.num_floors(), 10);
/// assert_eq!(state.buffer_size(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationState {
    elevators: Vec<Elevator>,
    lobbies: Vec<Lobby>,
    passengers: PassengerStore,
    /// Requests awaiting the next dispatch pass, in arrival order
    batch_buffer: Vec<Request>,
}

impl SimulationState {
    /// Create a state with the given cars and `floors` empty lobbies
    pub fn new(elevators: Vec<Elevator>, floors: usize) -> Self {
        Self {
            elevators,
            lobbies: (0..floors).map(Lobby::new).collect(),
            passengers: PassengerStore::new(),
            batch_buffer: Vec::new(),
        }
    }

    pub fn num_floors(&self) -> usize {
        self.lobbies.len()
    }

    pub fn elevators(&self) -> &[Elevator] {
        &self.elevators
    }

    pub fn elevators_mut(&mut self) -> &mut [Elevator] {
        &mut self.elevators
    }

    pub fn get_elevator(&self, id: &str) -> Option<&Elevator> {
        self.elevators.iter().find(|e| e.id == id)
    }

    pub fn get_elevator_mut(&mut self, id: &str) -> Option<&mut Elevator> {
        self.elevators.iter_mut().find(|e| e.id == id)
    }

    pub fn lobbies(&self) -> &[Lobby] {
        &self.lobbies
    }

    pub fn lobby_mut(&mut self, floor: usize) -> Option<&mut Lobby> {
        self.lobbies.get_mut(floor)
    }

    pub fn passengers(&self) -> &PassengerStore {
        &self.passengers
    }

    pub fn passengers_mut(&mut self) -> &mut PassengerStore {
        &mut self.passengers
    }

    /// Borrow cars and passengers mutably at the same time
    pub fn split_mut(&mut self) -> (&mut [Elevator], &mut PassengerStore) {
        (&mut self.elevators, &mut self.passengers)
    }

    /// Register a new passenger: arena, origin lobby and dispatch buffer
    pub fn admit(&mut self, passenger: Passenger) {
        let request = passenger.to_request();
        if let Some(lobby) = self.lobbies.get_mut(request.origin) {
            lobby.push(request.clone());
        }
        self.batch_buffer.push(request);
        self.passengers.insert(passenger);
    }

    pub fn batch_buffer(&self) -> &[Request] {
        &self.batch_buffer
    }

    pub fn buffer_size(&self) -> usize {
        self.batch_buffer.len()
    }

    /// Drop assigned requests from the buffer and their origin lobbies
    pub fn consume_requests(&mut self, assigned_ids: &[String]) {
        for id in assigned_ids {
            if let Some(pos) = self.batch_buffer.iter().position(|r| &r.id == id) {
                let request = self.batch_buffer.remove(pos);
                if let Some(lobby) = self.lobbies.get_mut(request.origin) {
                    lobby.remove(&request.id);
                }
            }
        }
    }

    /// Sum of car loads
    pub fn total_load(&self) -> usize {
        self.elevators.iter().map(|e| e.load).sum()
    }

    pub fn total_capacity(&self) -> usize {
        self.elevators.iter().map(|e| e.capacity).sum()
    }

    pub fn total_energy_kwh(&self) -> f64 {
        self.elevators.iter().map(|e| e.energy_kwh).sum()
    }

    /// Replace cars and lobbies and forget every in-flight passenger
    ///
    /// Completed passengers are kept; their trips are already in the metrics.
    pub fn rebuild(&mut self, elevators: Vec<Elevator>, floors: usize) {
        self.elevators = elevators;
        self.lobbies = (0..floors).map(Lobby::new).collect();
        self.batch_buffer.clear();
        self.passengers.retain(|p| p.is_completed());
    }
}
