//! Seeded synthetic incident generation for demo runs.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::{GeneratorConfig, SimulationConfig};
use crate::model::{Incident, IncidentKind, Point, incident::sort_for_dispatch};

/// Response windows drawn for routine incidents, in seconds.
const WINDOWS_S: [f64; 5] = [30.0, 60.0, 120.0, 300.0, 600.0];

/// Routine incident kinds, cycled through uniformly.
const ROUTINE_KINDS: [IncidentKind; 3] = [
    IncidentKind::Fire,
    IncidentKind::Medical,
    IncidentKind::Police,
];

/// Generates a deterministic incident stream from the configured seed.
///
/// Locations are uniform over the grid, arrivals uniform over the horizon,
/// and a `disaster_fraction` share of incidents are disasters with the
/// tightest response window. Output is sorted ready for the engine.
pub fn synthetic_incidents(cfg: &GeneratorConfig, sim: &SimulationConfig) -> Vec<Incident> {
    let mut rng = StdRng::seed_from_u64(sim.seed);
    let mut incidents = Vec::with_capacity(cfg.count);

    for id in 0..cfg.count {
        let arrival_time = rng.random_range(0.0..cfg.horizon_s);
        let location = Point::new(
            rng.random_range(0.0..sim.grid_size),
            rng.random_range(0.0..sim.grid_size),
        );
        let (kind, window) = if rng.random::<f64>() < cfg.disaster_fraction {
            (IncidentKind::Disaster, WINDOWS_S[0])
        } else {
            let kind = ROUTINE_KINDS[rng.random_range(0..ROUTINE_KINDS.len())];
            let window = WINDOWS_S[rng.random_range(0..WINDOWS_S.len())];
            (kind, window)
        };
        let priority_weight = if kind == IncidentKind::Disaster {
            sim.disaster_multiplier
        } else {
            1.0
        };

        incidents.push(Incident {
            id: id as u32,
            kind,
            location,
            arrival_time,
            deadline: arrival_time + window,
            priority_weight,
        });
    }

    sort_for_dispatch(&mut incidents);
    incidents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs(seed: u64) -> (GeneratorConfig, SimulationConfig) {
        let cfg = GeneratorConfig {
            count: 100,
            horizon_s: 3600.0,
            disaster_fraction: 0.1,
        };
        let sim = SimulationConfig {
            seed,
            ..SimulationConfig::default()
        };
        (cfg, sim)
    }

    #[test]
    fn generates_requested_count_within_grid() {
        let (cfg, sim) = configs(42);
        let incidents = synthetic_incidents(&cfg, &sim);
        assert_eq!(incidents.len(), 100);
        for inc in &incidents {
            assert!(inc.location.in_grid(sim.grid_size));
            assert!(inc.arrival_time >= 0.0 && inc.arrival_time < cfg.horizon_s);
            assert!(inc.deadline > inc.arrival_time);
        }
    }

    #[test]
    fn output_is_sorted_by_arrival() {
        let (cfg, sim) = configs(42);
        let incidents = synthetic_incidents(&cfg, &sim);
        for pair in incidents.windows(2) {
            assert!(pair[0].arrival_time <= pair[1].arrival_time);
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let (cfg, sim) = configs(7);
        let a = synthetic_incidents(&cfg, &sim);
        let b = synthetic_incidents(&cfg, &sim);
        assert_eq!(a.len(), b.len());
        for (ia, ib) in a.iter().zip(&b) {
            assert_eq!(ia.id, ib.id);
            assert_eq!(ia.arrival_time, ib.arrival_time);
            assert_eq!(ia.location, ib.location);
            assert_eq!(ia.kind, ib.kind);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let (cfg, sim_a) = configs(1);
        let (_, sim_b) = configs(2);
        let a = synthetic_incidents(&cfg, &sim_a);
        let b = synthetic_incidents(&cfg, &sim_b);
        assert!(
            a.iter()
                .zip(&b)
                .any(|(ia, ib)| ia.arrival_time != ib.arrival_time)
        );
    }

    #[test]
    fn disasters_carry_the_configured_weight() {
        let (mut cfg, sim) = configs(3);
        cfg.disaster_fraction = 1.0;
        let incidents = synthetic_incidents(&cfg, &sim);
        assert!(incidents.iter().all(|i| i.kind == IncidentKind::Disaster));
        assert!(incidents.iter().all(|i| i.priority_weight == 10.0));
    }
}
