//! Incident records fed into the simulation.

use std::fmt;
use std::str::FromStr;

use super::capability::{Capability, CapabilitySet};
use super::point::Point;

/// The category of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentKind {
    Fire,
    Medical,
    Police,
    Disaster,
}

impl IncidentKind {
    /// The capability set a unit must intersect to serve this kind.
    ///
    /// Fire incidents need fire crews; medical incidents can be served by
    /// fire or medical crews; police incidents by medical or police crews.
    /// A disaster accepts any responder.
    pub fn required_capabilities(self) -> CapabilitySet {
        match self {
            IncidentKind::Fire => CapabilitySet::of(&[Capability::Fire]),
            IncidentKind::Medical => {
                CapabilitySet::of(&[Capability::Fire, Capability::Medical])
            }
            IncidentKind::Police => {
                CapabilitySet::of(&[Capability::Medical, Capability::Police])
            }
            IncidentKind::Disaster => CapabilitySet::ALL,
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IncidentKind::Fire => "fire",
            IncidentKind::Medical => "medical",
            IncidentKind::Police => "police",
            IncidentKind::Disaster => "disaster",
        };
        write!(f, "{s}")
    }
}

impl FromStr for IncidentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fire" => Ok(IncidentKind::Fire),
            "medical" => Ok(IncidentKind::Medical),
            "police" => Ok(IncidentKind::Police),
            "disaster" => Ok(IncidentKind::Disaster),
            _ => Err(format!(
                "unknown incident type \"{s}\", expected fire, medical, police, or disaster"
            )),
        }
    }
}

/// A single emergency requiring one responder unit.
///
/// Immutable once created: the loader (or generator) builds incidents, the
/// dispatcher consumes each exactly once.
#[derive(Debug, Clone, Copy)]
pub struct Incident {
    pub id: u32,
    pub kind: IncidentKind,
    pub location: Point,
    /// Time the incident occurs (seconds since simulation start).
    pub arrival_time: f64,
    /// Latest acceptable on-scene arrival (seconds since simulation start).
    pub deadline: f64,
    /// Scoring weight of the incident class; disasters carry an order of
    /// magnitude more weight than routine classes.
    pub priority_weight: f64,
}

impl Incident {
    /// The allowed response window in seconds (`deadline - arrival_time`).
    pub fn response_window(&self) -> f64 {
        self.deadline - self.arrival_time
    }

    /// The urgency of the incident at `at_time`: priority weight divided by
    /// the time left before the deadline, floored at `epsilon`.
    pub fn urgency(&self, at_time: f64, epsilon: f64) -> f64 {
        self.priority_weight / (self.deadline - at_time).max(epsilon)
    }
}

/// Sorts incidents for event scheduling: by arrival time, then descending
/// urgency, then id.
///
/// Simultaneous arrivals are dispatched most-urgent-first, so when two
/// incidents compete for the same unit the one the scoring heuristic values
/// higher is attempted first.
pub fn sort_for_dispatch(incidents: &mut [Incident]) {
    incidents.sort_by(|a, b| {
        a.arrival_time
            .total_cmp(&b.arrival_time)
            .then_with(|| {
                let ua = a.priority_weight / a.response_window().max(f64::MIN_POSITIVE);
                let ub = b.priority_weight / b.response_window().max(f64::MIN_POSITIVE);
                ub.total_cmp(&ua)
            })
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(id: u32, kind: IncidentKind, t: f64, window: f64, weight: f64) -> Incident {
        Incident {
            id,
            kind,
            location: Point::new(10.0, 10.0),
            arrival_time: t,
            deadline: t + window,
            priority_weight: weight,
        }
    }

    #[test]
    fn required_capabilities_match_compatibility_rules() {
        assert!(
            IncidentKind::Medical
                .required_capabilities()
                .contains(Capability::Fire)
        );
        assert!(
            IncidentKind::Police
                .required_capabilities()
                .contains(Capability::Medical)
        );
        assert!(
            !IncidentKind::Fire
                .required_capabilities()
                .contains(Capability::Police)
        );
        assert_eq!(
            IncidentKind::Disaster.required_capabilities(),
            CapabilitySet::ALL
        );
    }

    #[test]
    fn urgency_grows_as_deadline_approaches() {
        let inc = incident(0, IncidentKind::Fire, 0.0, 120.0, 1.0);
        let early = inc.urgency(0.0, 1.0);
        let late = inc.urgency(100.0, 1.0);
        assert!(late > early);
    }

    #[test]
    fn urgency_is_floored_by_epsilon() {
        let inc = incident(0, IncidentKind::Fire, 0.0, 10.0, 1.0);
        // Past the deadline the denominator clamps to epsilon.
        assert_eq!(inc.urgency(20.0, 1.0), 1.0);
    }

    #[test]
    fn sort_orders_by_time_then_urgency() {
        let mut incidents = vec![
            incident(0, IncidentKind::Fire, 50.0, 120.0, 1.0),
            incident(1, IncidentKind::Disaster, 10.0, 120.0, 10.0),
            incident(2, IncidentKind::Medical, 10.0, 120.0, 1.0),
        ];
        sort_for_dispatch(&mut incidents);
        // t=10 arrivals first, disaster (higher urgency) before medical.
        assert_eq!(incidents[0].id, 1);
        assert_eq!(incidents[1].id, 2);
        assert_eq!(incidents[2].id, 0);
    }

    #[test]
    fn parse_kind() {
        assert_eq!("disaster".parse::<IncidentKind>(), Ok(IncidentKind::Disaster));
        assert!("flood".parse::<IncidentKind>().is_err());
    }
}
