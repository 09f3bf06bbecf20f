//! Station configuration and mutable unit state.

use std::fmt;

use crate::model::{CapabilitySet, Point, Station, Unit, UnitId};

/// Internal consistency violation: an operation was applied to a unit in a
/// state that should be unreachable when the dispatcher only selects from
/// `available_units`. Fatal; aborts the run.
#[derive(Debug)]
pub struct InvalidState {
    pub unit_id: UnitId,
    pub message: String,
}

impl fmt::Display for InvalidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid state for unit {}: {}", self.unit_id, self.message)
    }
}

/// Immutable station list, fixed at simulation setup.
#[derive(Debug, Clone)]
pub struct StationRegistry {
    stations: Vec<Station>,
}

impl StationRegistry {
    /// Creates a registry from a station list.
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// All stations.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Looks up a station by id.
    pub fn get(&self, id: u32) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Builds the initial unit roster: `unit_count` units per station with
    /// sequential ids, stationed at home and available immediately.
    pub fn seed_units(&self) -> Vec<Unit> {
        let mut units = Vec::new();
        let mut next_id: UnitId = 0;
        for station in &self.stations {
            for _ in 0..station.unit_count {
                units.push(Unit {
                    id: next_id,
                    capabilities: station.capabilities,
                    home_station: station.id,
                    home: station.location,
                    location: station.location,
                    busy_until: None,
                });
                next_id += 1;
            }
        }
        units
    }
}

/// Exclusive owner of all mutable unit state.
#[derive(Debug)]
pub struct UnitRegistry {
    /// Units in ascending id order.
    units: Vec<Unit>,
}

impl UnitRegistry {
    /// Seeds the registry from the station configuration.
    pub fn from_stations(stations: &StationRegistry) -> Self {
        Self {
            units: stations.seed_units(),
        }
    }

    /// All units (ascending id order).
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Looks up a unit by id.
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Units free at `at_time` whose capabilities intersect `required`,
    /// in ascending id order.
    pub fn available_units(
        &self,
        required: CapabilitySet,
        at_time: f64,
    ) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |u| u.is_available(at_time) && u.can_serve(required))
    }

    /// Commits an assignment: moves the unit to the incident site and marks
    /// it busy until `busy_until` (which includes handling and the return
    /// leg, so the unit is home when released).
    ///
    /// # Errors
    ///
    /// `InvalidState` if the unit does not exist or is not available at
    /// `at_time`. This is a defensive check; it signals a dispatcher bug.
    pub fn assign(
        &mut self,
        unit_id: UnitId,
        incident_location: Point,
        busy_until: f64,
        at_time: f64,
    ) -> Result<(), InvalidState> {
        let unit = self.get_mut(unit_id)?;
        if !unit.is_available(at_time) {
            return Err(InvalidState {
                unit_id,
                message: format!(
                    "assigned at t={at_time} while busy until t={:?}",
                    unit.busy_until
                ),
            });
        }
        unit.location = incident_location;
        unit.busy_until = Some(busy_until);
        Ok(())
    }

    /// Implicitly releases every unit whose busy window has ended by
    /// `at_time`: each is snapped back home and marked free. Busy windows
    /// already include the return leg, so a unit is home the instant its
    /// window ends, even if the matching availability event is still queued.
    pub fn release_due(&mut self, at_time: f64) {
        for unit in &mut self.units {
            if let Some(t) = unit.busy_until {
                if t <= at_time {
                    unit.busy_until = None;
                    unit.location = unit.home;
                }
            }
        }
    }

    /// Releases a unit whose busy window has ended: back home and available
    /// immediately. A release that no longer matches the unit's state (it
    /// was already released implicitly, or re-assigned with a later window)
    /// is a no-op, so stale availability events are harmless.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the unit does not exist.
    pub fn release(&mut self, unit_id: UnitId, at_time: f64) -> Result<(), InvalidState> {
        let unit = self.get_mut(unit_id)?;
        if let Some(t) = unit.busy_until {
            if t <= at_time {
                unit.busy_until = None;
                unit.location = unit.home;
            }
        }
        Ok(())
    }

    fn get_mut(&mut self, unit_id: UnitId) -> Result<&mut Unit, InvalidState> {
        self.units
            .iter_mut()
            .find(|u| u.id == unit_id)
            .ok_or_else(|| InvalidState {
                unit_id,
                message: "unknown unit id".to_string(),
            })
    }
}
