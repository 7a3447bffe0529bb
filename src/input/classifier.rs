use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    geometry::{Point, Triangle},
    region::{Corner, DpadRegion, Region, Side},
};

/// A classifier quantizes a normalized axis sample into a discrete region.
/// Implementations must be pure and total: every (x, y) pair, including
/// values outside of [-1.0, 1.0] and NaN, maps to some region.
pub trait Classifier {
    type Region: Region;

    fn classify(&self, x: f64, y: f64) -> Self::Region;
}

/// Available classification schemes that can be selected at runtime
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Four quadrants (top-left, top-right, bottom-left, bottom-right)
    Corner,
    /// Four triangles from the center to each edge (up, down, left, right)
    #[default]
    Side,
}

impl Scheme {
    /// Classify the given sample using this scheme
    pub fn classify(&self, x: f64, y: f64) -> DpadRegion {
        match self {
            Scheme::Corner => CornerClassifier.classify(x, y).into(),
            Scheme::Side => SideClassifier.classify(x, y).into(),
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Corner => write!(f, "corner"),
            Scheme::Side => write!(f, "side"),
        }
    }
}

/// Classifies samples into one of four quadrants using range tests. The
/// positive half of each axis (including zero) belongs to the top/right
/// quadrants.
#[derive(Debug, Clone, Copy, Default)]
pub struct CornerClassifier;

impl Classifier for CornerClassifier {
    type Region = Corner;

    fn classify(&self, x: f64, y: f64) -> Corner {
        let negative = -1.0..0.0;
        let positive = 0.0..=1.0;

        if x == 0.0 && y == 0.0 {
            return Corner::None;
        }
        if negative.contains(&x) && positive.contains(&y) {
            return Corner::TopLeft;
        }
        if positive.contains(&x) && positive.contains(&y) {
            return Corner::TopRight;
        }
        if positive.contains(&x) && negative.contains(&y) {
            return Corner::BottomRight;
        }
        if negative.contains(&x) && negative.contains(&y) {
            return Corner::BottomLeft;
        }

        Corner::None
    }
}

const ORIGIN: Point = Point::new(0.0, 0.0);

/// Triangles for each side in the order they are tested
const SIDE_TRIANGLES: [(Side, Triangle); 4] = [
    (
        Side::Up,
        Triangle::new(Point::new(-1.0, 1.0), Point::new(1.0, 1.0), ORIGIN),
    ),
    (
        Side::Down,
        Triangle::new(Point::new(-1.0, -1.0), Point::new(1.0, -1.0), ORIGIN),
    ),
    (
        Side::Left,
        Triangle::new(Point::new(-1.0, 1.0), Point::new(-1.0, -1.0), ORIGIN),
    ),
    (
        Side::Right,
        Triangle::new(Point::new(1.0, 1.0), Point::new(1.0, -1.0), ORIGIN),
    ),
];

/// Classifies samples into one of four triangular wedges that run from the
/// center of the surface to each of its edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideClassifier;

impl SideClassifier {
    /// Returns every side whose triangle contains the given point. Used to
    /// verify that the wedges never overlap.
    pub fn containing(&self, x: f64, y: f64) -> Vec<Side> {
        let point = Point::new(x, y);
        SIDE_TRIANGLES
            .iter()
            .filter(|(_, triangle)| triangle.contains(point))
            .map(|(side, _)| *side)
            .collect()
    }
}

impl Classifier for SideClassifier {
    type Region = Side;

    fn classify(&self, x: f64, y: f64) -> Side {
        let point = Point::new(x, y);
        for (side, triangle) in SIDE_TRIANGLES.iter() {
            if triangle.contains(point) {
                return *side;
            }
        }

        Side::None
    }
}
