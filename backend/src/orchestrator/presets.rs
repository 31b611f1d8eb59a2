//! Traffic presets
//!
//! Canned configurations for the classic building traffic patterns. All of
//! them start from [`SimConfig::default`] (20 floors, lobby at floor 0) and
//! only replace arrival rates, the demand matrix and the operating mode.

use super::config::SimConfig;
use crate::models::ElevatorMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    #[default]
    Default,
    /// Morning rush: heavy lobby arrivals heading up
    UpPeak,
    /// Evening rush: upper floors heading to the lobby
    DownPeak,
    /// Uniform floor-to-floor traffic
    Interfloor,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Default,
        Preset::UpPeak,
        Preset::DownPeak,
        Preset::Interfloor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::UpPeak => "up-peak",
            Preset::DownPeak => "down-peak",
            Preset::Interfloor => "interfloor",
        }
    }

    /// Build the preset's configuration
    ///
    /// # Example
    /// ```
    /// use elevator_dispatch_core::orchestrator::Preset;
    ///
    /// let config = Preset::UpPeak.config();
    /// assert_eq!(config.arrival_rates[0], 2.0);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn config(&self) -> SimConfig {
        let base = SimConfig::default();
        let floors = base.floors;
        let others = (floors - 1) as f64;

        match self {
            Preset::Default => base,
            Preset::UpPeak => {
                let mut arrival_rates = vec![0.1; floors];
                arrival_rates[0] = 2.0;
                let matrix: Vec<Vec<f64>> = (0..floors)
                    .map(|origin| {
                        (0..floors)
                            .map(|dest| match (origin, dest) {
                                (0, 0) => 0.0,
                                (0, _) => 1.0 / others,
                                (_, 0) => 0.8,
                                _ => 0.2 / others,
                            })
                            .collect()
                    })
                    .collect();
                SimConfig {
                    arrival_rates,
                    demand_matrix: Some(matrix),
                    mode: ElevatorMode::UpPeak,
                    ..base
                }
            }
            Preset::DownPeak => {
                let arrival_rates = (0..floors)
                    .map(|f| if f >= 11 { 1.5 } else { 0.1 })
                    .collect();
                let matrix: Vec<Vec<f64>> = (0..floors)
                    .map(|origin| {
                        (0..floors)
                            .map(|dest| {
                                if origin >= 11 {
                                    if dest == 0 { 0.9 } else { 0.1 / others }
                                } else if dest == origin {
                                    0.0
                                } else {
                                    1.0 / others
                                }
                            })
                            .collect()
                    })
                    .collect();
                SimConfig {
                    arrival_rates,
                    demand_matrix: Some(matrix),
                    mode: ElevatorMode::DownPeak,
                    ..base
                }
            }
            Preset::Interfloor => SimConfig {
                arrival_rates: vec![0.5; floors],
                demand_matrix: Some(uniform_off_diagonal(floors)),
                mode: ElevatorMode::Interfloor,
                ..base
            },
        }
    }
}

fn uniform_off_diagonal(floors: usize) -> Vec<Vec<f64>> {
    let p = 1.0 / (floors - 1) as f64;
    (0..floors)
        .map(|origin| {
            (0..floors)
                .map(|dest| if dest == origin { 0.0 } else { p })
                .collect()
        })
        .collect()
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "default" => Ok(Preset::Default),
            "up-peak" | "uppeak" => Ok(Preset::UpPeak),
            "down-peak" | "downpeak" => Ok(Preset::DownPeak),
            "interfloor" => Ok(Preset::Interfloor),
            other => Err(format!("unknown preset '{}'", other)),
        }
    }
}
