//! Value types shared across the simulator.

pub mod capability;
pub mod incident;
pub mod point;
pub mod station;
pub mod unit;

pub use capability::{Capability, CapabilitySet};
pub use incident::{Incident, IncidentKind};
pub use point::Point;
pub use station::Station;
pub use unit::{Unit, UnitId};
