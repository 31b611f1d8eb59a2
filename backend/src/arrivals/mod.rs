//! Arrival generation module for deterministic passenger creation.
//!
//! Each tick, every floor draws a Poisson-distributed number of new
//! passengers with mean `arrival_rate[floor] × tick_ms / 1000`. Destinations
//! come from the floor's demand-matrix row when one is configured, otherwise
//! uniformly from the other floors.
//!
//! # Key Principles
//!
//! 1. **Determinism**: same seed + same config → same arrivals, in increasing
//!    floor order and then increasing arrival index within a floor
//! 2. **No silent drops**: when a demand row's mass runs out before the draw
//!    is covered, the destination falls back to a uniform floor ≠ origin
//! 3. **Population cap**: generation stops once the total number of
//!    passengers ever created reaches `max_sim_people`
//!
//! # Example
//!
//! ```
//! use elevator_dispatch_core::arrivals::ArrivalGenerator;
//! use elevator_dispatch_core::rng::RngManager;
//! use elevator_dispatch_core::SimConfig;
//!
//! let config = SimConfig {
//!     arrival_rates: vec![5.0; 20],
//!     ..SimConfig::default()
//! };
//! let mut generator = ArrivalGenerator::new();
//! let mut rng = RngManager::new(42);
//!
//! let arrivals = generator.generate(&config, 1_000, 1_000, 0, &mut rng);
//! assert!(arrivals.iter().all(|p| p.origin != p.dest && p.dest < 20));
//! assert!(arrivals.windows(2).all(|w| w[0].origin <= w[1].origin));
//! ```

use crate::models::Passenger;
use crate::orchestrator::SimConfig;
use crate::rng::RngManager;

/// Generator for passenger arrivals across all floors.
///
/// Owns the passenger id sequence, which manual requests share so that ids
/// stay unique and deterministic.
#[derive(Debug, Clone, Default)]
pub struct ArrivalGenerator {
    /// Next passenger id counter
    next_passenger_id: u64,
}

impl ArrivalGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next passenger id (`P000001`, `P000002`, ...)
    pub fn next_passenger_id(&mut self) -> String {
        self.next_passenger_id += 1;
        format!("P{:06}", self.next_passenger_id)
    }

    /// Generate this tick's arrivals.
    ///
    /// # Arguments
    ///
    /// * `config` - Rates, demand matrix, floor count and population cap
    /// * `now_ms` - Timestamp stamped on new passengers
    /// * `delta_ms` - Tick length the rates are scaled by
    /// * `existing` - Passengers created so far (counts toward the cap)
    /// * `rng` - Simulation RNG
    ///
    /// # Returns
    ///
    /// New passengers in floor order, then arrival order within a floor
    pub fn generate(
        &mut self,
        config: &SimConfig,
        now_ms: u64,
        delta_ms: u64,
        existing: usize,
        rng: &mut RngManager,
    ) -> Vec<Passenger> {
        let mut passengers = Vec::new();
        if existing >= config.max_sim_people || config.floors < 2 {
            return passengers;
        }

        for floor in 0..config.floors {
            let rate = config.arrival_rates.get(floor).copied().unwrap_or(0.0);
            let lambda = rate * delta_ms as f64 / 1000.0;
            let count = rng.poisson(lambda);

            for _ in 0..count {
                if existing + passengers.len() >= config.max_sim_people {
                    return passengers;
                }
                let dest = sample_destination(floor, config.floors, config.demand_row(floor), rng);
                passengers.push(Passenger::new(self.next_passenger_id(), floor, dest, now_ms));
            }
        }

        passengers
    }
}

/// Pick a destination for a passenger starting at `origin`
///
/// With a demand row, one uniform draw walks the row's cumulative sum and
/// takes the first destination with positive probability whose cumulative
/// mass covers the draw. If the mass runs out first, or the row selects the
/// origin itself, a uniform destination ≠ origin is drawn instead.
pub fn sample_destination(
    origin: usize,
    floors: usize,
    demand_row: Option<&[f64]>,
    rng: &mut RngManager,
) -> usize {
    if let Some(row) = demand_row {
        let draw = rng.next_f64();
        let mut cumulative = 0.0;
        for (dest, &p) in row.iter().take(floors).enumerate() {
            cumulative += p;
            if p > 0.0 && draw <= cumulative {
                if dest != origin {
                    return dest;
                }
                break;
            }
        }
    }
    uniform_other_floor(origin, floors, rng)
}

/// Uniform floor in `[0, floors)` other than `origin`, from a single draw
pub fn uniform_other_floor(origin: usize, floors: usize, rng: &mut RngManager) -> usize {
    let pick = rng.next_int(0, floors as i64 - 2) as usize;
    if pick >= origin {
        pick + 1
    } else {
        pick
    }
}
