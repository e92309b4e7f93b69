//! Axis-aligned bounding boxes on two axes.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box over a pair of axes (a, b).
///
/// Used for the crossover short-circuit: when a geometry's box does not
/// intersect the grid's box, rasterization skips every per-point test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_a: f64,
    pub min_b: f64,
    pub max_a: f64,
    pub max_b: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_a: f64, min_b: f64, max_a: f64, max_b: f64) -> Self {
        Self {
            min_a,
            min_b,
            max_a,
            max_b,
        }
    }

    /// Smallest box containing every point; None for an empty sequence.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f64; 2]>) -> Option<Self> {
        let mut bbox: Option<BoundingBox> = None;
        for &[a, b] in points {
            bbox = Some(match bbox {
                None => BoundingBox::new(a, b, a, b),
                Some(prev) => BoundingBox::new(
                    prev.min_a.min(a),
                    prev.min_b.min(b),
                    prev.max_a.max(a),
                    prev.max_b.max(b),
                ),
            });
        }
        bbox
    }

    /// Extent along the first axis.
    pub fn width(&self) -> f64 {
        self.max_a - self.min_a
    }

    /// Extent along the second axis.
    pub fn height(&self) -> f64 {
        self.max_b - self.min_b
    }

    /// Check per-axis interval overlap with another box.
    ///
    /// Boxes that merely touch at an edge count as intersecting.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.max_a < other.min_a
            || self.min_a > other.max_a
            || self.max_b < other.min_b
            || self.min_b > other.max_b)
    }

    /// Check if a point is contained within this box.
    pub fn contains(&self, a: f64, b: f64) -> bool {
        a >= self.min_a && a <= self.max_a && b >= self.min_b && b <= self.max_b
    }

    /// Expand the box by a buffer amount on every side.
    pub fn expand(&self, buffer: f64) -> Self {
        Self {
            min_a: self.min_a - buffer,
            min_b: self.min_b - buffer,
            max_a: self.max_a + buffer,
            max_b: self.max_b + buffer,
        }
    }
}
