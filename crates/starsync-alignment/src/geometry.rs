//! Triangle geometry on the projection plane
//!
//! Areas are in square degrees. The containment test compares the
//! triangle area against the sum of the three sub-triangles formed with
//! the query point; a point inside (or on an edge) makes them equal.

use starsync_core::PlanePoint;

/// Absolute slack for area comparisons, square degrees
pub const AREA_ABS_TOLERANCE: f64 = 1e-9;

/// Slack for area comparisons relative to the triangle area
pub const AREA_REL_TOLERANCE: f64 = 1e-9;

/// Triangle with plane point vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub a: PlanePoint,
    /// Second vertex
    pub b: PlanePoint,
    /// Third vertex
    pub c: PlanePoint,
}

impl Triangle {
    /// Create a triangle
    pub fn new(a: PlanePoint, b: PlanePoint, c: PlanePoint) -> Self {
        Self { a, b, c }
    }

    /// Unsigned area
    pub fn area(&self) -> f64 {
        area(&self.a, &self.b, &self.c)
    }

    /// Collinear or coincident vertices
    pub fn is_degenerate(&self) -> bool {
        self.area() <= AREA_ABS_TOLERANCE
    }

    /// Whether `p` lies inside or on the boundary
    pub fn contains(&self, p: &PlanePoint) -> bool {
        let full = self.area();
        let parts = area(p, &self.b, &self.c) + area(&self.a, p, &self.c) + area(&self.a, &self.b, p);
        (full - parts).abs() <= AREA_ABS_TOLERANCE + AREA_REL_TOLERANCE * full
    }

    /// Centre point, taken as the intersection of two medians
    ///
    /// The line from `a` to the midpoint of `bc` is intersected with the
    /// line from `b` to the midpoint of `ac`. A zero denominator is
    /// nudged so a degenerate triangle still yields a finite point.
    pub fn centre(&self) -> PlanePoint {
        let (a, b, c) = (&self.a, &self.b, &self.c);
        let m1 = ((b.x + c.x) / 2.0, (b.y + c.y) / 2.0);
        let m2 = ((a.x + c.x) / 2.0, (a.y + c.y) / 2.0);

        let (xd1, yd1) = (m1.0 - a.x, m1.1 - a.y);
        let (xd2, yd2) = (m2.0 - b.x, m2.1 - b.y);
        let (xd3, yd3) = (a.x - b.x, a.y - b.y);

        let mut denominator = yd2 * xd1 - xd2 * yd1;
        if denominator == 0.0 {
            denominator = 1e-8;
        }
        let ua = (xd2 * yd3 - yd2 * xd3) / denominator;

        a.with_xy(a.x + ua * xd1, a.y + ua * yd1)
    }
}

/// Unsigned shoelace area of three points
pub fn area(a: &PlanePoint, b: &PlanePoint, c: &PlanePoint) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
}
