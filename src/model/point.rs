/// A position on the city grid.
///
/// Coordinates are in abstract distance units; valid positions lie within
/// `[0, grid_size)` on both axes. Range checking happens at load time, not
/// here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` when both coordinates lie within `[0, grid_size)`.
    pub fn in_grid(&self, grid_size: f64) -> bool {
        (0.0..grid_size).contains(&self.x) && (0.0..grid_size).contains(&self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn in_grid_boundaries() {
        assert!(Point::new(0.0, 0.0).in_grid(200.0));
        assert!(Point::new(199.9, 100.0).in_grid(200.0));
        assert!(!Point::new(200.0, 100.0).in_grid(200.0));
        assert!(!Point::new(-0.1, 0.0).in_grid(200.0));
    }
}
