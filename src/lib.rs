//! City-scale emergency dispatch simulator.

pub mod config;
/// Seeded synthetic incident generation for demo runs.
pub mod generator;
pub mod io;
/// CSV incident loader with pre-run validation.
pub mod loader;
/// Incident, unit, station, and capability value types.
pub mod model;
/// Weighted k-means station placement.
pub mod optimizer;
/// Event queue, registries, dispatcher, and simulation engine.
pub mod sim;
