//! Simulation configuration
//!
//! [`SimConfig`] is an immutable snapshot of every simulation parameter.
//! It (de)serializes as camelCase JSON, so hosts can send either a full
//! config or a [`ConfigPatch`] holding only the fields to change.
//!
//! Two kinds of problems are distinguished:
//!
//! - **Malformed numbers** (zero capacity, non-finite speed, negative rates,
//!   ...) are repaired by [`SimConfig::sanitized`], falling back to the
//!   documented defaults. They are never errors.
//! - **Structural errors** (zoning without cars, missing or out-of-range
//!   zones) are rejected by [`SimConfig::validate`] with a [`ConfigError`].

use crate::models::ElevatorMode;
use crate::models::event::DEFAULT_EVENT_LOG_CAPACITY;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_FLOORS: usize = 20;
pub const DEFAULT_ELEVATORS: usize = 4;
pub const DEFAULT_CAPACITY: usize = 12;
pub const DEFAULT_SPEED_FLOORS_PER_SEC: f64 = 1.5;
pub const DEFAULT_TICK_MS: u64 = 200;
pub const DEFAULT_ARRIVAL_RATE: f64 = 0.2;
pub const DEFAULT_ENERGY_PER_FLOOR_KWH: f64 = 0.05;
pub const DEFAULT_MAX_SIM_PEOPLE: usize = 1000;

/// Structural configuration errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Zoning is enabled but there are no elevators to zone")]
    ZoningWithoutElevators,

    #[error("Zone [{min}, {max}] of elevator {elevator} is invalid for {floors} floors")]
    InvalidZone {
        elevator: usize,
        min: usize,
        max: usize,
        floors: usize,
    },

    #[error("Invalid config JSON: {0}")]
    InvalidJson(String),
}

/// Cost weights and penalties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostWeights {
    pub w_wait: f64,
    pub w_ride: f64,
    pub w_stops: f64,
    pub w_energy: f64,
    pub penalty_overload: f64,
    pub penalty_reversal: f64,
    #[serde(rename = "penaltySLABreach")]
    pub penalty_sla_breach: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            w_wait: 1.0,
            w_ride: 0.5,
            w_stops: 0.3,
            w_energy: 0.1,
            penalty_overload: 100.0,
            penalty_reversal: 5.0,
            penalty_sla_breach: 20.0,
        }
    }
}

impl CostWeights {
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (value, default, name) in [
            (&mut self.w_wait, defaults.w_wait, "wWait"),
            (&mut self.w_ride, defaults.w_ride, "wRide"),
            (&mut self.w_stops, defaults.w_stops, "wStops"),
            (&mut self.w_energy, defaults.w_energy, "wEnergy"),
            (&mut self.penalty_overload, defaults.penalty_overload, "penaltyOverload"),
            (&mut self.penalty_reversal, defaults.penalty_reversal, "penaltyReversal"),
            (&mut self.penalty_sla_breach, defaults.penalty_sla_breach, "penaltySLABreach"),
        ] {
            if !value.is_finite() {
                warn!(
                    field = name,
                    value = *value,
                    fallback = default,
                    "non-finite weight replaced"
                );
                *value = default;
            }
        }
        self
    }
}

/// Service-level target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlaConfig {
    /// Target 95th-percentile wait (ms)
    pub max_wait_ms_p95: u64,
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            max_wait_ms_p95: 60_000,
        }
    }
}

/// Complete simulation configuration
///
/// # Example
/// ```
/// use elevator_dispatch_core::SimConfig;
///
/// let config = SimConfig::from_json(r#"{ "floors": 10, "elevators": 2 }"#).unwrap();
/// assert_eq!(config.floors, 10);
/// assert_eq!(config.arrival_rates.len(), 10);
/// assert_eq!(config.capacity_per_elevator, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    pub floors: usize,
    pub elevators: usize,
    pub capacity_per_elevator: usize,
    pub speed_floors_per_sec: f64,
    pub door_open_close_ms: u64,
    pub door_dwell_ms: u64,
    pub batch_window_ms: u64,
    pub tick_ms: u64,
    pub weights: CostWeights,
    #[serde(rename = "SLA")]
    pub sla: SlaConfig,
    pub zoning_enabled: bool,
    /// Inclusive floor range per elevator, by index
    pub zones: Option<Vec<(usize, usize)>>,
    /// Passengers per second, per floor
    pub arrival_rates: Vec<f64>,
    /// `demand_matrix[origin][dest]` destination probabilities
    pub demand_matrix: Option<Vec<Vec<f64>>>,
    pub random_seed: u64,
    /// Cap on passengers ever generated
    pub max_sim_people: usize,
    pub energy_per_floor_kwh: f64,
    /// Operating mode given to every car
    pub mode: ElevatorMode,
    pub event_log_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            floors: DEFAULT_FLOORS,
            elevators: DEFAULT_ELEVATORS,
            capacity_per_elevator: DEFAULT_CAPACITY,
            speed_floors_per_sec: DEFAULT_SPEED_FLOORS_PER_SEC,
            door_open_close_ms: 1000,
            door_dwell_ms: 1500,
            batch_window_ms: 1500,
            tick_ms: DEFAULT_TICK_MS,
            weights: CostWeights::default(),
            sla: SlaConfig::default(),
            zoning_enabled: false,
            zones: None,
            arrival_rates: vec![DEFAULT_ARRIVAL_RATE; DEFAULT_FLOORS],
            demand_matrix: None,
            random_seed: 42,
            max_sim_people: DEFAULT_MAX_SIM_PEOPLE,
            energy_per_floor_kwh: DEFAULT_ENERGY_PER_FLOOR_KWH,
            mode: ElevatorMode::Normal,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config, then sanitize and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        let config = config.sanitized();
        config.validate()?;
        Ok(config)
    }

    /// Copy with malformed numeric fields replaced by defaults
    ///
    /// Arrival rates are padded with zeros or truncated to `floors`; negative
    /// or non-finite rates and demand probabilities become 0.
    pub fn sanitized(mut self) -> Self {
        if self.floors < 2 {
            warn!(floors = self.floors, fallback = DEFAULT_FLOORS, "floors must be at least 2");
            self.floors = DEFAULT_FLOORS;
        }
        if self.capacity_per_elevator == 0 {
            warn!(fallback = DEFAULT_CAPACITY, "capacityPerElevator must be positive");
            self.capacity_per_elevator = DEFAULT_CAPACITY;
        }
        if !self.speed_floors_per_sec.is_finite() || self.speed_floors_per_sec <= 0.0 {
            warn!(
                speed = self.speed_floors_per_sec,
                fallback = DEFAULT_SPEED_FLOORS_PER_SEC,
                "speedFloorsPerSec must be positive"
            );
            self.speed_floors_per_sec = DEFAULT_SPEED_FLOORS_PER_SEC;
        }
        if self.tick_ms == 0 {
            warn!(fallback = DEFAULT_TICK_MS, "tickMs must be positive");
            self.tick_ms = DEFAULT_TICK_MS;
        }
        if !self.energy_per_floor_kwh.is_finite() || self.energy_per_floor_kwh < 0.0 {
            warn!(
                fallback = DEFAULT_ENERGY_PER_FLOOR_KWH,
                "energyPerFloorKwh must be non-negative"
            );
            self.energy_per_floor_kwh = DEFAULT_ENERGY_PER_FLOOR_KWH;
        }
        if self.event_log_capacity == 0 {
            self.event_log_capacity = DEFAULT_EVENT_LOG_CAPACITY;
        }
        self.weights = self.weights.sanitized();

        if self.arrival_rates.len() != self.floors {
            warn!(
                rates = self.arrival_rates.len(),
                floors = self.floors,
                "arrivalRates length differs from floors; padding/truncating"
            );
            self.arrival_rates.resize(self.floors, 0.0);
        }
        for rate in &mut self.arrival_rates {
            if !rate.is_finite() || *rate < 0.0 {
                *rate = 0.0;
            }
        }

        if let Some(matrix) = &mut self.demand_matrix {
            for row in matrix.iter_mut() {
                for p in row.iter_mut() {
                    if !p.is_finite() || *p < 0.0 {
                        *p = 0.0;
                    }
                }
            }
        }

        self
    }

    /// Reject structurally invalid configuration
    ///
    /// Zones are optional per car: a car without an entry is unzoned and
    /// served normally. Zones present for existing cars must lie within the
    /// building.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.zoning_enabled {
            return Ok(());
        }
        if self.elevators == 0 {
            return Err(ConfigError::ZoningWithoutElevators);
        }
        let zones = self.zones.as_deref().unwrap_or(&[]);
        for (elevator, &(min, max)) in zones.iter().enumerate().take(self.elevators) {
            if min > max || max >= self.floors {
                return Err(ConfigError::InvalidZone {
                    elevator,
                    min,
                    max,
                    floors: self.floors,
                });
            }
        }
        Ok(())
    }

    /// Zone for the car at `index`, when zoning is on
    pub fn zone_for(&self, index: usize) -> Option<(usize, usize)> {
        if !self.zoning_enabled {
            return None;
        }
        self.zones.as_ref().and_then(|z| z.get(index).copied())
    }

    /// Demand-matrix row for `origin`, if one is configured
    pub fn demand_row(&self, origin: usize) -> Option<&[f64]> {
        self.demand_matrix
            .as_ref()
            .and_then(|m| m.get(origin))
            .map(|row| row.as_slice())
    }

    /// Apply a patch, producing a new (unsanitized) config
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        let mut next = self.clone();

        if let Some(v) = patch.floors {
            next.floors = v;
            // Keep the per-floor rate vector in step unless the patch sets it
            if patch.arrival_rates.is_none() {
                let fill = next.arrival_rates.last().copied().unwrap_or(0.0);
                next.arrival_rates.resize(v, fill);
            }
        }
        if let Some(v) = patch.elevators {
            next.elevators = v;
        }
        if let Some(v) = patch.capacity_per_elevator {
            next.capacity_per_elevator = v;
        }
        if let Some(v) = patch.speed_floors_per_sec {
            next.speed_floors_per_sec = v;
        }
        if let Some(v) = patch.door_open_close_ms {
            next.door_open_close_ms = v;
        }
        if let Some(v) = patch.door_dwell_ms {
            next.door_dwell_ms = v;
        }
        if let Some(v) = patch.batch_window_ms {
            next.batch_window_ms = v;
        }
        if let Some(v) = patch.tick_ms {
            next.tick_ms = v;
        }
        if let Some(v) = &patch.weights {
            next.weights = v.clone();
        }
        if let Some(v) = &patch.sla {
            next.sla = v.clone();
        }
        if let Some(v) = patch.zoning_enabled {
            next.zoning_enabled = v;
        }
        if let Some(v) = &patch.zones {
            next.zones = v.clone();
        }
        if let Some(v) = &patch.arrival_rates {
            next.arrival_rates = v.clone();
        }
        if let Some(v) = &patch.demand_matrix {
            next.demand_matrix = v.clone();
        }
        if let Some(v) = patch.random_seed {
            next.random_seed = v;
        }
        if let Some(v) = patch.max_sim_people {
            next.max_sim_people = v;
        }
        if let Some(v) = patch.energy_per_floor_kwh {
            next.energy_per_floor_kwh = v;
        }
        if let Some(v) = patch.mode {
            next.mode = v;
        }
        if let Some(v) = patch.event_log_capacity {
            next.event_log_capacity = v;
        }

        next
    }
}

/// Partial configuration for `configure`
///
/// Absent fields keep their current value. For `zones` and `demandMatrix`
/// an explicit `null` clears the field.
///
/// # Example
/// ```
/// use elevator_dispatch_core::{ConfigPatch, SimConfig};
///
/// let patch = ConfigPatch::from_json(r#"{ "elevators": 2, "demandMatrix": null }"#).unwrap();
/// let next = SimConfig::default().merged(&patch);
/// assert_eq!(next.elevators, 2);
/// assert_eq!(next.floors, 20);
/// assert_eq!(patch.demand_matrix, Some(None));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub floors: Option<usize>,
    pub elevators: Option<usize>,
    pub capacity_per_elevator: Option<usize>,
    pub speed_floors_per_sec: Option<f64>,
    pub door_open_close_ms: Option<u64>,
    pub door_dwell_ms: Option<u64>,
    pub batch_window_ms: Option<u64>,
    pub tick_ms: Option<u64>,
    pub weights: Option<CostWeights>,
    #[serde(rename = "SLA")]
    pub sla: Option<SlaConfig>,
    pub zoning_enabled: Option<bool>,
    #[serde(deserialize_with = "double_option")]
    pub zones: Option<Option<Vec<(usize, usize)>>>,
    pub arrival_rates: Option<Vec<f64>>,
    #[serde(deserialize_with = "double_option")]
    pub demand_matrix: Option<Option<Vec<Vec<f64>>>>,
    pub random_seed: Option<u64>,
    pub max_sim_people: Option<usize>,
    pub energy_per_floor_kwh: Option<f64>,
    pub mode: Option<ElevatorMode>,
    pub event_log_capacity: Option<usize>,
}

impl ConfigPatch {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))
    }
}

/// Present-but-null → `Some(None)`; absent → `None` (via `default`)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
