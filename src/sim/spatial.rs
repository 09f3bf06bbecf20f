//! Travel-cost computation with a memoized pair table.

use std::collections::HashMap;

use crate::model::Point;

/// Cache key: coordinate bit patterns of both endpoints, normalized so that
/// `(a, b)` and `(b, a)` map to the same entry.
type PairKey = ((u64, u64), (u64, u64));

fn pair_key(a: Point, b: Point) -> PairKey {
    let ka = (a.x.to_bits(), a.y.to_bits());
    let kb = (b.x.to_bits(), b.y.to_bits());
    if ka <= kb { (ka, kb) } else { (kb, ka) }
}

/// Euclidean distance on the grid, memoized by unordered point pair.
///
/// Costs are deterministic, symmetric, and non-negative. The cache is read
/// and written from the single simulation thread only.
#[derive(Debug, Default)]
pub struct SpatialModel {
    cache: HashMap<PairKey, f64>,
}

impl SpatialModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Travel cost (distance) between two points.
    pub fn cost(&mut self, a: Point, b: Point) -> f64 {
        *self
            .cache
            .entry(pair_key(a, b))
            .or_insert_with(|| euclidean(a, b))
    }

    /// Travel time between two points at the given speed (distance per
    /// second). A non-positive speed yields infinity.
    pub fn travel_time(&mut self, a: Point, b: Point, speed: f64) -> f64 {
        if speed > 0.0 {
            self.cost(a, b) / speed
        } else {
            f64::INFINITY
        }
    }

    /// Number of cached point pairs.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

fn euclidean(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}
