//! Station configuration values.

use super::capability::CapabilitySet;
use super::point::Point;

/// A fixed facility owning a roster of units.
///
/// Stations are immutable after simulation setup; they exist to resolve
/// home locations and to seed the unit registry.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: u32,
    /// Human-readable label, e.g. `"F1"`.
    pub label: String,
    pub location: Point,
    /// Capabilities shared by every unit stationed here.
    pub capabilities: CapabilitySet,
    /// Number of units to seed at this station.
    pub unit_count: u32,
}
