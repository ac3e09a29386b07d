// Circle overlap and distance helpers used by targeting and collision checks.

/// Axis-aligned bounding box; collision treats it as a circle whose radius is
/// half the smaller dimension.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }
}

/// True Euclidean distance between box centers (not squared; collision
/// thresholds are specified on real distances).
pub fn center_distance(a: Bounds, b: Bounds) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
}

/// Circular overlap test with an optional fairness buffer.
pub fn circles_overlap(a: Bounds, b: Bounds, buffer: f64) -> bool {
    center_distance(a, b) < a.radius() + b.radius() + buffer
}
