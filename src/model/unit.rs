//! Mutable responder unit state.

use super::capability::CapabilitySet;
use super::point::Point;

/// Identifier of a responder unit.
pub type UnitId = u32;

/// A mobile responder instance.
///
/// Units are owned exclusively by the unit registry; all mutation goes
/// through its `assign` and `release` operations.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub capabilities: CapabilitySet,
    /// Station the unit belongs to.
    pub home_station: u32,
    /// Location of the home station.
    pub home: Point,
    /// Current position; the incident site while on assignment.
    pub location: Point,
    /// Timestamp at which the unit is back home and free again.
    /// `None` means available now.
    pub busy_until: Option<f64>,
}

impl Unit {
    /// Returns `true` when the unit is free at `at_time`.
    pub fn is_available(&self, at_time: f64) -> bool {
        match self.busy_until {
            None => true,
            Some(t) => t <= at_time,
        }
    }

    /// Returns `true` when the unit's capabilities intersect `required`.
    pub fn can_serve(&self, required: CapabilitySet) -> bool {
        self.capabilities.intersects(required)
    }
}
