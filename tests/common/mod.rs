//! Shared test fixtures for integration tests.

use dispatch_sim::config::ScenarioConfig;
use dispatch_sim::model::{Capability, CapabilitySet, Incident, IncidentKind, Point, Station};
use dispatch_sim::sim::dispatch::DispatchWeights;
use dispatch_sim::sim::engine::EngineParams;
use dispatch_sim::sim::registry::StationRegistry;

/// Baseline scenario (three mixed-capability stations, seed 42).
pub fn baseline_scenario() -> ScenarioConfig {
    ScenarioConfig::baseline()
}

/// A single fire-only station at the origin with the given roster size.
pub fn fire_station_registry(units: u32) -> StationRegistry {
    StationRegistry::new(vec![Station {
        id: 0,
        label: "F1".to_string(),
        location: Point::new(0.0, 0.0),
        capabilities: CapabilitySet::of(&[Capability::Fire]),
        unit_count: units,
    }])
}

/// A fire incident with unit priority weight.
pub fn fire_incident(id: u32, x: f64, y: f64, arrival: f64, window: f64) -> Incident {
    Incident {
        id,
        kind: IncidentKind::Fire,
        location: Point::new(x, y),
        arrival_time: arrival,
        deadline: arrival + window,
        priority_weight: 1.0,
    }
}

/// A disaster incident carrying the default 10x weight.
pub fn disaster_incident(id: u32, x: f64, y: f64, arrival: f64, window: f64) -> Incident {
    Incident {
        id,
        kind: IncidentKind::Disaster,
        location: Point::new(x, y),
        arrival_time: arrival,
        deadline: arrival + window,
        priority_weight: 10.0,
    }
}

/// Default dispatch weights.
pub fn default_weights() -> DispatchWeights {
    DispatchWeights::default()
}

/// Default engine parameters (speed 1.0, handling base 30s).
pub fn default_params() -> EngineParams {
    EngineParams::default()
}
