//! Priority-aware unit selection.

use crate::model::{Incident, UnitId};

use super::registry::UnitRegistry;
use super::spatial::SpatialModel;

/// Tunable parameters of the scoring heuristic.
///
/// The defaults are one reasonable operating point; every term is
/// configurable per scenario.
#[derive(Debug, Clone)]
pub struct DispatchWeights {
    /// Weight of the urgency term (priority weight over time to deadline).
    pub urgency_weight: f64,
    /// Weight of the slack term, rewarding clearly reachable incidents.
    pub time_remaining_weight: f64,
    /// Weight of the travel-cost term (subtracted).
    pub distance_weight: f64,
    /// Maximum travel cost for a candidate to be considered at all.
    /// The boundary is inclusive: a unit exactly at the budget is eligible.
    pub routing_budget: f64,
    /// Floor for the urgency denominator.
    pub epsilon: f64,
    /// Points charged for an unservable incident (negative).
    pub failure_penalty: f64,
}

impl Default for DispatchWeights {
    fn default() -> Self {
        Self {
            urgency_weight: 100.0,
            time_remaining_weight: 0.5,
            distance_weight: 2.0,
            routing_budget: 2000.0,
            epsilon: 1.0,
            failure_penalty: -2.0,
        }
    }
}

/// A dispatch decision: which unit to send and what the trip costs.
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    pub unit_id: UnitId,
    /// Travel cost from the unit's current location to the incident.
    pub travel_cost: f64,
    /// Travel time for the outbound leg, in seconds.
    pub travel_time: f64,
}

/// Greedy per-incident dispatcher.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    weights: DispatchWeights,
    /// Unit travel speed, distance units per second.
    unit_speed: f64,
}

impl Dispatcher {
    /// Creates a dispatcher with the given weights and unit speed.
    pub fn new(weights: DispatchWeights, unit_speed: f64) -> Self {
        Self {
            weights,
            unit_speed,
        }
    }

    /// The configured weights.
    pub fn weights(&self) -> &DispatchWeights {
        &self.weights
    }

    /// Selects the best eligible unit for `incident` at `at_time`.
    ///
    /// Candidates must be available, capability-compatible, within the
    /// routing budget (inclusive), and able to reach the scene before the
    /// deadline. Each is scored as
    ///
    /// ```text
    /// urgency_weight * priority / max(deadline - at_time, epsilon)
    ///   + time_remaining_weight * (deadline - at_time)
    ///   - distance_weight * travel_cost
    /// ```
    ///
    /// and the maximum wins; ties go to the lowest unit id. `None` means
    /// the incident is unservable, a normal outcome.
    pub fn select(
        &self,
        incident: &Incident,
        units: &UnitRegistry,
        spatial: &mut SpatialModel,
        at_time: f64,
    ) -> Option<Selection> {
        let required = incident.kind.required_capabilities();
        let urgency = incident.urgency(at_time, self.weights.epsilon);
        let time_remaining = incident.deadline - at_time;

        let mut best: Option<(f64, Selection)> = None;
        for unit in units.available_units(required, at_time) {
            let travel_cost = spatial.cost(unit.location, incident.location);
            if travel_cost > self.weights.routing_budget {
                continue;
            }
            let travel_time = if self.unit_speed > 0.0 {
                travel_cost / self.unit_speed
            } else {
                f64::INFINITY
            };
            if at_time + travel_time > incident.deadline {
                // A unit that would arrive late is never dispatched.
                continue;
            }

            let score = self.weights.urgency_weight * urgency
                + self.weights.time_remaining_weight * time_remaining
                - self.weights.distance_weight * travel_cost;

            // Candidates iterate in ascending id order, so a strict
            // comparison keeps the lowest id on ties.
            let better = match &best {
                None => true,
                Some((best_score, _)) => score > *best_score,
            };
            if better {
                best = Some((
                    score,
                    Selection {
                        unit_id: unit.id,
                        travel_cost,
                        travel_time,
                    },
                ));
            }
        }

        best.map(|(_, selection)| selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capability, CapabilitySet, IncidentKind, Point, Station};
    use crate::sim::registry::StationRegistry;

    fn registry_at(points: &[Point]) -> UnitRegistry {
        let stations = points
            .iter()
            .enumerate()
            .map(|(i, &p)| Station {
                id: i as u32,
                label: format!("F{}", i + 1),
                location: p,
                capabilities: CapabilitySet::of(&[Capability::Fire]),
                unit_count: 1,
            })
            .collect();
        UnitRegistry::from_stations(&StationRegistry::new(stations))
    }

    fn fire_incident(location: Point, arrival: f64, window: f64) -> Incident {
        Incident {
            id: 0,
            kind: IncidentKind::Fire,
            location,
            arrival_time: arrival,
            deadline: arrival + window,
            priority_weight: 1.0,
        }
    }

    #[test]
    fn selects_nearest_unit_when_otherwise_equal() {
        let units = registry_at(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        let mut spatial = SpatialModel::new();
        let dispatcher = Dispatcher::new(DispatchWeights::default(), 1.0);
        let incident = fire_incident(Point::new(10.0, 0.0), 0.0, 600.0);

        let selection = dispatcher
            .select(&incident, &units, &mut spatial, 0.0)
            .expect("a unit should be selected");
        assert_eq!(selection.unit_id, 0);
        assert_eq!(selection.travel_cost, 10.0);
    }

    #[test]
    fn budget_boundary_is_inclusive() {
        let units = registry_at(&[Point::new(0.0, 0.0)]);
        let mut spatial = SpatialModel::new();
        let weights = DispatchWeights {
            routing_budget: 50.0,
            ..DispatchWeights::default()
        };
        let dispatcher = Dispatcher::new(weights.clone(), 1.0);

        let at_budget = fire_incident(Point::new(50.0, 0.0), 0.0, 600.0);
        assert!(
            dispatcher
                .select(&at_budget, &units, &mut spatial, 0.0)
                .is_some()
        );

        let beyond = fire_incident(Point::new(50.1, 0.0), 0.0, 600.0);
        assert!(
            dispatcher
                .select(&beyond, &units, &mut spatial, 0.0)
                .is_none()
        );
    }

    #[test]
    fn unreachable_deadline_excludes_candidate() {
        let units = registry_at(&[Point::new(0.0, 0.0)]);
        let mut spatial = SpatialModel::new();
        let dispatcher = Dispatcher::new(DispatchWeights::default(), 1.0);
        // 100 distance units away but only 50 seconds of window at speed 1.
        let incident = fire_incident(Point::new(100.0, 0.0), 0.0, 50.0);
        assert!(
            dispatcher
                .select(&incident, &units, &mut spatial, 0.0)
                .is_none()
        );
    }

    #[test]
    fn no_capable_unit_is_unservable() {
        let units = registry_at(&[Point::new(0.0, 0.0)]);
        let mut spatial = SpatialModel::new();
        let dispatcher = Dispatcher::new(DispatchWeights::default(), 1.0);
        let incident = Incident {
            kind: IncidentKind::Police,
            ..fire_incident(Point::new(10.0, 0.0), 0.0, 600.0)
        };
        assert!(
            dispatcher
                .select(&incident, &units, &mut spatial, 0.0)
                .is_none()
        );
    }

    #[test]
    fn equidistant_tie_goes_to_lowest_unit_id() {
        let units = registry_at(&[Point::new(0.0, 0.0), Point::new(20.0, 0.0)]);
        let mut spatial = SpatialModel::new();
        let dispatcher = Dispatcher::new(DispatchWeights::default(), 1.0);
        let incident = fire_incident(Point::new(10.0, 0.0), 0.0, 600.0);
        let selection = dispatcher
            .select(&incident, &units, &mut spatial, 0.0)
            .expect("a unit should be selected");
        assert_eq!(selection.unit_id, 0);
    }

    #[test]
    fn selected_unit_satisfies_eligibility_by_construction() {
        let units = registry_at(&[
            Point::new(0.0, 0.0),
            Point::new(30.0, 40.0),
            Point::new(120.0, 160.0),
        ]);
        let mut spatial = SpatialModel::new();
        let weights = DispatchWeights {
            routing_budget: 100.0,
            ..DispatchWeights::default()
        };
        let dispatcher = Dispatcher::new(weights.clone(), 1.0);
        let incident = fire_incident(Point::new(15.0, 20.0), 0.0, 300.0);

        let selection = dispatcher
            .select(&incident, &units, &mut spatial, 0.0)
            .expect("a unit should be selected");
        let unit = units.get(selection.unit_id).expect("unit exists");
        assert!(unit.can_serve(incident.kind.required_capabilities()));
        assert!(unit.is_available(0.0));
        assert!(selection.travel_cost <= weights.routing_budget);
    }
}
