//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::model::{Capability, CapabilitySet, Point, Station};
use crate::sim::dispatch::DispatchWeights;
use crate::sim::engine::EngineParams;
use crate::sim::registry::StationRegistry;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// City geometry, timing, and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Dispatcher scoring weights and routing budget.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Synthetic incident generation parameters.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Station roster.
    #[serde(default = "default_stations")]
    pub stations: Vec<StationConfig>,
}

/// City geometry, timing, and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Side length of the square city grid; valid coordinates are
    /// `[0, grid_size)`.
    pub grid_size: f64,
    /// Unit travel speed, distance units per second.
    pub unit_speed: f64,
    /// Base on-scene handling time in seconds.
    pub handling_base_s: f64,
    /// Scoring weight multiplier for disaster incidents.
    pub disaster_multiplier: f64,
    /// Master random seed (generator and optimizer).
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 200.0,
            unit_speed: 1.0,
            handling_base_s: 30.0,
            disaster_multiplier: 10.0,
            seed: 42,
        }
    }
}

/// Dispatcher scoring weights and routing budget.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    pub urgency_weight: f64,
    pub time_remaining_weight: f64,
    pub distance_weight: f64,
    /// Maximum travel cost for a dispatch (inclusive boundary).
    pub routing_budget: f64,
    /// Floor for the urgency denominator, seconds.
    pub epsilon: f64,
    /// Points charged per unservable incident (negative).
    pub failure_penalty: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let w = DispatchWeights::default();
        Self {
            urgency_weight: w.urgency_weight,
            time_remaining_weight: w.time_remaining_weight,
            distance_weight: w.distance_weight,
            routing_budget: w.routing_budget,
            epsilon: w.epsilon,
            failure_penalty: w.failure_penalty,
        }
    }
}

impl DispatchConfig {
    /// Converts into the dispatcher's weight struct.
    pub fn to_weights(&self) -> DispatchWeights {
        DispatchWeights {
            urgency_weight: self.urgency_weight,
            time_remaining_weight: self.time_remaining_weight,
            distance_weight: self.distance_weight,
            routing_budget: self.routing_budget,
            epsilon: self.epsilon,
            failure_penalty: self.failure_penalty,
        }
    }
}

/// Synthetic incident generation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of incidents to generate.
    pub count: usize,
    /// Horizon over which arrivals are spread, seconds (72h default).
    pub horizon_s: f64,
    /// Fraction of incidents that are disasters, 0.0 to 1.0.
    pub disaster_fraction: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 200,
            horizon_s: 72.0 * 3600.0,
            disaster_fraction: 0.05,
        }
    }
}

/// One station entry from the `[[stations]]` table array.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    /// Human-readable label, e.g. `"F1"`.
    pub label: String,
    pub x: f64,
    pub y: f64,
    /// Capability names: `"fire"`, `"medical"`, `"police"`.
    pub capabilities: Vec<String>,
    /// Number of units stationed here.
    pub units: u32,
}

fn default_stations() -> Vec<StationConfig> {
    ScenarioConfig::baseline().stations
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.grid_size"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: three mixed-capability stations on a
    /// 200×200 grid.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            dispatch: DispatchConfig::default(),
            generator: GeneratorConfig::default(),
            stations: vec![
                StationConfig {
                    label: "F1".to_string(),
                    x: 50.0,
                    y: 50.0,
                    capabilities: vec!["fire".to_string(), "medical".to_string()],
                    units: 2,
                },
                StationConfig {
                    label: "M1".to_string(),
                    x: 150.0,
                    y: 50.0,
                    capabilities: vec!["medical".to_string(), "police".to_string()],
                    units: 2,
                },
                StationConfig {
                    label: "P1".to_string(),
                    x: 100.0,
                    y: 150.0,
                    capabilities: vec!["police".to_string()],
                    units: 2,
                },
            ],
        }
    }

    /// Returns the sparse-coverage preset: two stations, a tight routing
    /// budget, and a heavier incident stream.
    pub fn sparse_coverage() -> Self {
        Self {
            dispatch: DispatchConfig {
                routing_budget: 120.0,
                ..DispatchConfig::default()
            },
            generator: GeneratorConfig {
                count: 400,
                disaster_fraction: 0.1,
                ..GeneratorConfig::default()
            },
            stations: vec![
                StationConfig {
                    label: "F1".to_string(),
                    x: 60.0,
                    y: 60.0,
                    capabilities: vec!["fire".to_string(), "medical".to_string()],
                    units: 3,
                },
                StationConfig {
                    label: "P1".to_string(),
                    x: 140.0,
                    y: 140.0,
                    capabilities: vec!["medical".to_string(), "police".to_string()],
                    units: 3,
                },
            ],
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "sparse_coverage"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "sparse_coverage" => Ok(Self::sparse_coverage()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.grid_size <= 0.0 {
            errors.push(ConfigError {
                field: "simulation.grid_size".into(),
                message: "must be > 0".into(),
            });
        }
        if s.unit_speed <= 0.0 {
            errors.push(ConfigError {
                field: "simulation.unit_speed".into(),
                message: "must be > 0".into(),
            });
        }
        if s.handling_base_s <= 0.0 {
            errors.push(ConfigError {
                field: "simulation.handling_base_s".into(),
                message: "must be > 0".into(),
            });
        }
        if s.disaster_multiplier < 1.0 {
            errors.push(ConfigError {
                field: "simulation.disaster_multiplier".into(),
                message: "must be >= 1".into(),
            });
        }

        let d = &self.dispatch;
        if d.routing_budget <= 0.0 {
            errors.push(ConfigError {
                field: "dispatch.routing_budget".into(),
                message: "must be > 0".into(),
            });
        }
        if d.epsilon <= 0.0 {
            errors.push(ConfigError {
                field: "dispatch.epsilon".into(),
                message: "must be > 0".into(),
            });
        }
        for (field, value) in [
            ("dispatch.urgency_weight", d.urgency_weight),
            ("dispatch.time_remaining_weight", d.time_remaining_weight),
            ("dispatch.distance_weight", d.distance_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be finite and >= 0".into(),
                });
            }
        }
        if d.failure_penalty > 0.0 {
            errors.push(ConfigError {
                field: "dispatch.failure_penalty".into(),
                message: "must be <= 0".into(),
            });
        }

        let g = &self.generator;
        if g.count == 0 {
            errors.push(ConfigError {
                field: "generator.count".into(),
                message: "must be > 0".into(),
            });
        }
        if g.horizon_s <= 0.0 {
            errors.push(ConfigError {
                field: "generator.horizon_s".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&g.disaster_fraction) {
            errors.push(ConfigError {
                field: "generator.disaster_fraction".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        if self.stations.is_empty() {
            errors.push(ConfigError {
                field: "stations".into(),
                message: "at least one station is required".into(),
            });
        }
        for (i, station) in self.stations.iter().enumerate() {
            if station.label.is_empty() {
                errors.push(ConfigError {
                    field: format!("stations[{i}].label"),
                    message: "must not be empty".into(),
                });
            }
            if s.grid_size > 0.0 && !(0.0..s.grid_size).contains(&station.x) {
                errors.push(ConfigError {
                    field: format!("stations[{i}].x"),
                    message: format!("coordinate must lie within [0, {})", s.grid_size),
                });
            }
            if s.grid_size > 0.0 && !(0.0..s.grid_size).contains(&station.y) {
                errors.push(ConfigError {
                    field: format!("stations[{i}].y"),
                    message: format!("coordinate must lie within [0, {})", s.grid_size),
                });
            }
            if station.units == 0 {
                errors.push(ConfigError {
                    field: format!("stations[{i}].units"),
                    message: "must be > 0".into(),
                });
            }
            if station.capabilities.is_empty() {
                errors.push(ConfigError {
                    field: format!("stations[{i}].capabilities"),
                    message: "must not be empty".into(),
                });
            }
            for cap in &station.capabilities {
                if cap.parse::<Capability>().is_err() {
                    errors.push(ConfigError {
                        field: format!("stations[{i}].capabilities"),
                        message: format!(
                            "unknown capability \"{cap}\", expected fire, medical, or police"
                        ),
                    });
                }
            }
        }

        errors
    }

    /// Builds the immutable station registry from the configured roster.
    ///
    /// # Errors
    ///
    /// Returns the first capability-parse error; call [`Self::validate`]
    /// first for a full report.
    pub fn station_registry(&self) -> Result<StationRegistry, ConfigError> {
        let mut stations = Vec::with_capacity(self.stations.len());
        for (i, cfg) in self.stations.iter().enumerate() {
            let mut caps = CapabilitySet::EMPTY;
            for name in &cfg.capabilities {
                let cap = name.parse::<Capability>().map_err(|e| ConfigError {
                    field: format!("stations[{i}].capabilities"),
                    message: e,
                })?;
                caps = caps.with(cap);
            }
            stations.push(Station {
                id: i as u32,
                label: cfg.label.clone(),
                location: Point::new(cfg.x, cfg.y),
                capabilities: caps,
                unit_count: cfg.units,
            });
        }
        Ok(StationRegistry::new(stations))
    }

    /// Engine parameters derived from the simulation section.
    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            unit_speed: self.simulation.unit_speed,
            handling_base_s: self.simulation.handling_base_s,
        }
    }
}
