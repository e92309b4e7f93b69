//! Vector geometries used to derive coverage masks.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;

/// A polygon or line geometry on two axes.
///
/// Vertices are `[a, b]` coordinate pairs whose order must match the
/// axis order declared to the rasterizer. Polygons may carry multiple
/// rings; holes are handled by even-odd containment, so interior rings
/// need no particular winding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    /// A filled polygon, possibly with holes.
    Polygon { rings: Vec<Vec<[f64; 2]>> },
    /// An open polyline.
    Line { points: Vec<[f64; 2]> },
}

impl Geometry {
    /// Create a single-ring polygon.
    pub fn polygon(ring: Vec<[f64; 2]>) -> Self {
        Self::Polygon { rings: vec![ring] }
    }

    /// Create a polygon from an exterior ring and interior hole rings.
    pub fn polygon_with_holes(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self::Polygon { rings }
    }

    /// Create a polyline.
    pub fn line(points: Vec<[f64; 2]>) -> Self {
        Self::Line { points }
    }

    /// Flatten all rings/parts into one vertex sequence.
    pub fn vertices(&self) -> impl Iterator<Item = &[f64; 2]> {
        match self {
            Geometry::Polygon { rings } => {
                Box::new(rings.iter().flatten()) as Box<dyn Iterator<Item = &[f64; 2]>>
            }
            Geometry::Line { points } => Box::new(points.iter()) as Box<dyn Iterator<Item = &[f64; 2]>>,
        }
    }

    /// Check if the geometry has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices().next().is_none()
    }

    /// Axis-aligned bounding box of all vertices; None when empty.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }

    #[test]
    fn test_polygon_bbox() {
        let polygon = Geometry::polygon(unit_square());
        assert_eq!(polygon.bbox(), Some(BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_vertices_flatten_rings() {
        let hole = vec![[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75]];
        let polygon = Geometry::polygon_with_holes(vec![unit_square(), hole]);
        assert_eq!(polygon.vertices().count(), 8);
    }

    #[test]
    fn test_empty_geometry() {
        let empty = Geometry::Polygon { rings: vec![] };
        assert!(empty.is_empty());
        assert!(empty.bbox().is_none());

        let empty_ring = Geometry::polygon(vec![]);
        assert!(empty_ring.is_empty());
    }

    #[test]
    fn test_line_serde_round_trip() {
        let line = Geometry::line(vec![[0.0, 0.0], [2.0, 3.0]]);
        let json = serde_json::to_string(&line).unwrap();
        let back: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(line, back);
    }
}
