//! Planar geometry used to classify axis samples into triangular regions

use std::ops::Sub;

/// A point (or vector) on the axis plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the z component of the cross product of the two vectors
    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Self) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A triangle defined by three fixed vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl Triangle {
    pub const fn new(p1: Point, p2: Point, p3: Point) -> Self {
        Self { p1, p2, p3 }
    }

    /// Returns true if the given point lies inside the triangle.
    ///
    /// The test checks that the point sits on a consistent side of each edge
    /// using the sign of a 2D cross product. Zero is never "positive", so
    /// points on some edges (and always on the shared vertex at `p3` when it
    /// is the origin) are reported as outside.
    pub fn contains(&self, point: Point) -> bool {
        let a_s = point - self.p1;
        let b_s = point - self.p2;

        let s_ab = (self.p2 - self.p1).cross(&a_s) > 0.0;
        let s_ca = (self.p3 - self.p1).cross(&a_s) > 0.0;
        let s_cb = (self.p3 - self.p2).cross(&b_s) > 0.0;

        if s_ca == s_ab {
            return false;
        }
        if s_cb != s_ab {
            return false;
        }

        true
    }
}
