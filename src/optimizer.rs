//! Station placement via weighted k-means over historical incidents.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::model::{Incident, Point, Station};

/// Centroid movement below which the iteration stops.
const CONVERGENCE_THRESHOLD: f64 = 0.01;
/// Iteration cap for non-converging inputs.
const MAX_ITERATIONS: usize = 100;

/// Proposes new locations for the given stations from the incident history.
///
/// Stations are grouped by capability set; each group's locations are the
/// weighted k-means centroids of the incidents that group can serve, with
/// urgent incidents (short response windows) pulling centroids harder.
/// Labels, capability sets, and unit counts are preserved; only locations
/// change. A group with no relevant incidents is placed uniformly at
/// random. Deterministic for a fixed seed.
pub fn optimize_station_layout(
    stations: &[Station],
    incidents: &[Incident],
    grid_size: f64,
    seed: u64,
) -> Vec<Station> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut result: Vec<Station> = stations.to_vec();

    // Group station indices by capability set, preserving first-seen order.
    let mut groups: Vec<(crate::model::CapabilitySet, Vec<usize>)> = Vec::new();
    for (i, station) in stations.iter().enumerate() {
        match groups.iter_mut().find(|(caps, _)| *caps == station.capabilities) {
            Some((_, members)) => members.push(i),
            None => groups.push((station.capabilities, vec![i])),
        }
    }

    for (caps, members) in groups {
        let mut points = Vec::new();
        let mut weights = Vec::new();
        for incident in incidents {
            if incident.kind.required_capabilities().intersects(caps) {
                points.push(incident.location);
                weights.push(1.0 / incident.response_window().max(1.0));
            }
        }

        let centroids = if points.is_empty() {
            (0..members.len())
                .map(|_| {
                    Point::new(
                        rng.random_range(0.0..grid_size),
                        rng.random_range(0.0..grid_size),
                    )
                })
                .collect()
        } else {
            kmeans(&points, &weights, members.len(), &mut rng)
        };

        for (&idx, centroid) in members.iter().zip(centroids) {
            result[idx].location = centroid;
        }
    }

    result
}

/// Weighted k-means clustering.
///
/// Centroids initialize uniformly within the bounding box of `points` and
/// update to the weighted mean of their cluster; an empty cluster keeps its
/// centroid. Stops after [`MAX_ITERATIONS`] or when every centroid moves
/// less than [`CONVERGENCE_THRESHOLD`].
fn kmeans(points: &[Point], weights: &[f64], k: usize, rng: &mut StdRng) -> Vec<Point> {
    debug_assert_eq!(points.len(), weights.len());
    if k == 0 || points.is_empty() {
        return Vec::new();
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let mut centroids: Vec<Point> = (0..k)
        .map(|_| {
            Point::new(
                if max_x > min_x {
                    rng.random_range(min_x..max_x)
                } else {
                    min_x
                },
                if max_y > min_y {
                    rng.random_range(min_y..max_y)
                } else {
                    min_y
                },
            )
        })
        .collect();

    for _ in 0..MAX_ITERATIONS {
        // Weighted accumulators per cluster.
        let mut sum_x = vec![0.0; k];
        let mut sum_y = vec![0.0; k];
        let mut sum_w = vec![0.0; k];

        for (p, &w) in points.iter().zip(weights) {
            let nearest = nearest_centroid(*p, &centroids);
            sum_x[nearest] += p.x * w;
            sum_y[nearest] += p.y * w;
            sum_w[nearest] += w;
        }

        let mut converged = true;
        for i in 0..k {
            if sum_w[i] > 0.0 {
                let updated = Point::new(sum_x[i] / sum_w[i], sum_y[i] / sum_w[i]);
                let moved = ((updated.x - centroids[i].x).powi(2)
                    + (updated.y - centroids[i].y).powi(2))
                .sqrt();
                if moved >= CONVERGENCE_THRESHOLD {
                    converged = false;
                }
                centroids[i] = updated;
            }
        }
        if converged {
            break;
        }
    }

    centroids
}

fn nearest_centroid(p: Point, centroids: &[Point]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let dist = (p.x - c.x).powi(2) + (p.y - c.y).powi(2);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capability, CapabilitySet, IncidentKind};

    fn fire_station(id: u32, location: Point) -> Station {
        Station {
            id,
            label: format!("F{}", id + 1),
            location,
            capabilities: CapabilitySet::of(&[Capability::Fire]),
            unit_count: 2,
        }
    }

    fn fire_incident(id: u32, x: f64, y: f64, window: f64) -> Incident {
        Incident {
            id,
            kind: IncidentKind::Fire,
            location: Point::new(x, y),
            arrival_time: 0.0,
            deadline: window,
            priority_weight: 1.0,
        }
    }

    #[test]
    fn single_cluster_converges_to_weighted_mean() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let weights = vec![1.0, 3.0];
        let centroids = kmeans(&points, &weights, 1, &mut rng);
        assert_eq!(centroids.len(), 1);
        assert!((centroids[0].x - 7.5).abs() < 0.1);
        assert!(centroids[0].y.abs() < 0.1);
    }

    #[test]
    fn two_clusters_separate_distant_groups() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut points = Vec::new();
        for i in 0..10 {
            points.push(Point::new(5.0 + f64::from(i) * 0.1, 5.0));
            points.push(Point::new(180.0 + f64::from(i) * 0.1, 180.0));
        }
        let weights = vec![1.0; points.len()];
        let mut centroids = kmeans(&points, &weights, 2, &mut rng);
        centroids.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert!(centroids[0].x < 50.0);
        assert!(centroids[1].x > 150.0);
    }

    #[test]
    fn layout_keeps_labels_and_rosters() {
        let stations = vec![
            fire_station(0, Point::new(0.0, 0.0)),
            fire_station(1, Point::new(200.0 - 1.0, 199.0)),
        ];
        let incidents: Vec<Incident> = (0..20)
            .map(|i| fire_incident(i, 100.0 + f64::from(i % 3), 100.0, 120.0))
            .collect();
        let optimized = optimize_station_layout(&stations, &incidents, 200.0, 42);
        assert_eq!(optimized.len(), 2);
        assert_eq!(optimized[0].label, "F1");
        assert_eq!(optimized[1].unit_count, 2);
        // Both centroids end up near the incident mass.
        for s in &optimized {
            assert!((s.location.x - 101.0).abs() < 5.0);
            assert!((s.location.y - 100.0).abs() < 5.0);
        }
    }

    #[test]
    fn no_relevant_incidents_places_within_grid() {
        let stations = vec![fire_station(0, Point::new(0.0, 0.0))];
        let police_only = vec![Incident {
            kind: IncidentKind::Police,
            ..fire_incident(0, 50.0, 50.0, 120.0)
        }];
        let optimized = optimize_station_layout(&stations, &police_only, 200.0, 42);
        assert!(optimized[0].location.in_grid(200.0));
    }

    #[test]
    fn same_seed_is_deterministic() {
        let stations = vec![
            fire_station(0, Point::new(0.0, 0.0)),
            fire_station(1, Point::new(10.0, 10.0)),
        ];
        let incidents: Vec<Incident> = (0..30)
            .map(|i| fire_incident(i, f64::from(i * 6 % 190), f64::from(i * 11 % 190), 60.0))
            .collect();
        let a = optimize_station_layout(&stations, &incidents, 200.0, 9);
        let b = optimize_station_layout(&stations, &incidents, 200.0, 9);
        for (sa, sb) in a.iter().zip(&b) {
            assert_eq!(sa.location, sb.location);
        }
    }
}
