//! Simulation engine orchestrating the event loop.

use std::fmt;

use crate::model::{Incident, IncidentKind, UnitId, incident::sort_for_dispatch};

use super::dispatch::{DispatchWeights, Dispatcher};
use super::queue::{EventKind, EventQueue};
use super::registry::{InvalidState, StationRegistry, UnitRegistry};
use super::spatial::SpatialModel;

/// Engine lifecycle. `Drained` is terminal and exposes the final ledger
/// and outcome log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Drained,
}

/// Physical parameters of the simulated city.
#[derive(Debug, Clone)]
pub struct EngineParams {
    /// Unit travel speed, distance units per second.
    pub unit_speed: f64,
    /// Base on-scene handling time in seconds.
    pub handling_base_s: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            unit_speed: 1.0,
            handling_base_s: 30.0,
        }
    }
}

/// Running score totals, mutated only on the single execution path.
#[derive(Debug, Default, Clone)]
pub struct ScoreLedger {
    /// Points earned (successes) and charged (failure penalties).
    pub points: f64,
    /// Total travel distance accumulated, outbound and return legs.
    pub travel_distance: f64,
    pub served: usize,
    pub failed: usize,
}

impl ScoreLedger {
    fn record_served(&mut self, points: f64, distance: f64) {
        self.points += points;
        self.travel_distance += distance;
        self.served += 1;
    }

    fn record_failed(&mut self, penalty: f64) {
        self.points += penalty;
        self.failed += 1;
    }

    /// Final score: points earned minus travel distance accumulated.
    pub fn net_score(&self) -> f64 {
        self.points - self.travel_distance
    }
}

/// How a single incident was resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Served {
        unit_id: UnitId,
        /// Clock time the unit reached the scene.
        arrival_at_scene: f64,
        /// Outbound travel time in seconds.
        travel_time: f64,
        /// Outbound plus return travel distance.
        travel_distance: f64,
        /// Seconds of slack left before the deadline on arrival.
        slack_s: f64,
        points: f64,
    },
    Failed {
        penalty: f64,
    },
}

/// One row of the per-incident outcome log.
#[derive(Debug, Clone)]
pub struct IncidentOutcome {
    pub incident_id: u32,
    pub kind: IncidentKind,
    /// The incident's arrival timestamp.
    pub time: f64,
    pub outcome: Outcome,
}

impl fmt::Display for IncidentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Served {
                unit_id,
                travel_time,
                slack_s,
                points,
                ..
            } => write!(
                f,
                "t={:>8.1}s | incident {:>4} ({:>8}) served by unit {:>3} | \
                 response {:>6.1}s  slack {:>6.1}s  {:+.2} pts",
                self.time, self.incident_id, self.kind, unit_id, travel_time, slack_s, points
            ),
            Outcome::Failed { penalty } => write!(
                f,
                "t={:>8.1}s | incident {:>4} ({:>8}) unservable {:>24} {:+.2} pts",
                self.time, self.incident_id, self.kind, "", penalty
            ),
        }
    }
}

/// Discrete-event simulation engine.
///
/// Owns the whole simulation state tree: event queue, registries, spatial
/// cache, ledger, and outcome log. Time advances only by jumping to the
/// next event's timestamp. Each incident is attempted at most once; each
/// assignment schedules exactly one `UnitAvailable` event.
pub struct SimulationEngine {
    incidents: Vec<Incident>,
    queue: EventQueue,
    units: UnitRegistry,
    stations: StationRegistry,
    spatial: SpatialModel,
    dispatcher: Dispatcher,
    params: EngineParams,
    ledger: ScoreLedger,
    outcomes: Vec<IncidentOutcome>,
    state: EngineState,
}

impl SimulationEngine {
    /// Creates an engine in the `Idle` state with the queue populated and
    /// the unit registry seeded from the station configuration.
    ///
    /// Incidents are ordered by arrival time; simultaneous arrivals are
    /// dispatched most-urgent-first.
    pub fn new(
        stations: StationRegistry,
        mut incidents: Vec<Incident>,
        weights: DispatchWeights,
        params: EngineParams,
    ) -> Self {
        sort_for_dispatch(&mut incidents);
        let units = UnitRegistry::from_stations(&stations);
        let mut queue = EventQueue::new();
        for (idx, incident) in incidents.iter().enumerate() {
            queue.schedule(incident.arrival_time, EventKind::IncidentArrival(idx));
        }
        let dispatcher = Dispatcher::new(weights, params.unit_speed);
        Self {
            incidents,
            queue,
            units,
            stations,
            spatial: SpatialModel::new(),
            dispatcher,
            params,
            ledger: ScoreLedger::default(),
            outcomes: Vec::new(),
            state: EngineState::Idle,
        }
    }

    /// Drains the event queue to completion.
    ///
    /// # Errors
    ///
    /// `InvalidState` if an internal consistency invariant is violated;
    /// this indicates a logic defect and the run must be aborted.
    pub fn run(&mut self) -> Result<(), InvalidState> {
        if self.state == EngineState::Drained {
            return Ok(());
        }
        self.state = EngineState::Running;
        while let Some(event) = self.queue.pop() {
            match event.kind {
                EventKind::IncidentArrival(idx) => self.handle_arrival(idx)?,
                EventKind::UnitAvailable(unit_id) => {
                    self.units.release(unit_id, self.queue.now())?;
                }
            }
        }
        self.state = EngineState::Drained;
        Ok(())
    }

    fn handle_arrival(&mut self, idx: usize) -> Result<(), InvalidState> {
        let incident = self.incidents[idx];
        let now = self.queue.now();

        // Units whose busy window ends at or before now are home and free,
        // even when their availability events are still in the queue
        // (arrivals process first at equal timestamps).
        self.units.release_due(now);

        let Some(selection) =
            self.dispatcher
                .select(&incident, &self.units, &mut self.spatial, now)
        else {
            let penalty = self.dispatcher.weights().failure_penalty;
            self.ledger.record_failed(penalty);
            self.outcomes.push(IncidentOutcome {
                incident_id: incident.id,
                kind: incident.kind,
                time: incident.arrival_time,
                outcome: Outcome::Failed { penalty },
            });
            return Ok(());
        };

        let home = self
            .units
            .get(selection.unit_id)
            .map(|u| u.home)
            .ok_or_else(|| InvalidState {
                unit_id: selection.unit_id,
                message: "selected unit not in registry".to_string(),
            })?;

        let arrival_at_scene = now + selection.travel_time;
        let handling = self.handling_time(incident.response_window());
        let return_cost = self.spatial.cost(incident.location, home);
        let return_time = self.spatial.travel_time(incident.location, home, self.params.unit_speed);
        let busy_until = arrival_at_scene + handling + return_time;

        self.units
            .assign(selection.unit_id, incident.location, busy_until, now)?;
        self.queue
            .schedule(busy_until, EventKind::UnitAvailable(selection.unit_id));

        let slack_s = incident.deadline - arrival_at_scene;
        // One point per spare minute on arrival.
        let points = slack_s / 60.0;
        let travel_distance = selection.travel_cost + return_cost;
        self.ledger.record_served(points, travel_distance);
        self.outcomes.push(IncidentOutcome {
            incident_id: incident.id,
            kind: incident.kind,
            time: incident.arrival_time,
            outcome: Outcome::Served {
                unit_id: selection.unit_id,
                arrival_at_scene,
                travel_time: selection.travel_time,
                travel_distance,
                slack_s,
                points,
            },
        });
        Ok(())
    }

    /// On-scene handling time, tiered by the incident's response window:
    /// tight windows get the base duration, wider windows take longer.
    fn handling_time(&self, response_window: f64) -> f64 {
        let base = self.params.handling_base_s;
        if response_window <= 30.0 {
            base
        } else if response_window <= 60.0 {
            base * 1.5
        } else {
            base * 2.0
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Running score totals.
    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// Per-incident outcome log, in processing order.
    pub fn outcomes(&self) -> &[IncidentOutcome] {
        &self.outcomes
    }

    /// The unit registry (read-only view).
    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    /// The station configuration.
    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    /// Current simulation time.
    pub fn now(&self) -> f64 {
        self.queue.now()
    }
}
