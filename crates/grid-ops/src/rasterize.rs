//! Geometry rasterization.
//!
//! Converts a polygon or line into a boolean coverage grid over two
//! target axes. Containment is tested at cell centers, one sample per
//! cell; a bounding-box crossover check short-circuits the whole scan
//! when the geometry and the grid are disjoint.

use rayon::prelude::*;

use grid_common::{
    Axis, BoundingBox, CellValue, CoverageMask, Geometry, GridError, LabeledArray, Result,
};

/// Rasterize a geometry onto the grid spanned by two axes.
///
/// Both axes are shifted to center locus before sampling, so a cell is
/// covered when its center lies inside the polygon (approximating
/// "majority of the cell is inside"). Lines cover the cells whose
/// centers fall within half a cell size of the line; that band test is
/// a documented approximation, not an exact point-to-segment distance.
pub fn rasterize(axis_a: &Axis, axis_b: &Axis, geometry: &Geometry) -> Result<CoverageMask> {
    let geom_bbox = geometry
        .bbox()
        .ok_or_else(|| GridError::invalid_argument("geometry has no vertices"))?;

    let centered_a = axis_a.to_center_locus();
    let centered_b = axis_b.to_center_locus();

    let (min_a, max_a) = centered_a.extent();
    let (min_b, max_b) = centered_b.extent();
    let grid_bbox = BoundingBox::new(min_a, min_b, max_a, max_b);

    if !grid_bbox.intersects(&geom_bbox) {
        tracing::debug!(
            grid = ?grid_bbox,
            geometry = ?geom_bbox,
            "bounding boxes disjoint, returning empty coverage"
        );
        return Ok(CoverageMask::all_false(
            axis_a.len(),
            axis_b.len(),
            (axis_a.tag.as_str(), axis_b.tag.as_str()),
        ));
    }

    // Lines are tested as a closed pseudo-ring (the vertices followed by
    // their reverse) with a positive boundary tolerance; the ring has no
    // interior, so only the tolerance band fires.
    let pseudo_ring: Vec<Vec<[f64; 2]>>;
    let (rings, tolerance): (&[Vec<[f64; 2]>], f64) = match geometry {
        Geometry::Polygon { rings } => (rings.as_slice(), 0.0),
        Geometry::Line { points } => {
            pseudo_ring = vec![points
                .iter()
                .chain(points.iter().rev())
                .copied()
                .collect()];
            (
                pseudo_ring.as_slice(),
                line_tolerance(&centered_a, &centered_b),
            )
        }
    };

    let len_b = centered_b.len();
    let data: Vec<bool> = centered_a
        .coords
        .par_iter()
        .flat_map_iter(|&a| {
            centered_b
                .coords
                .iter()
                .map(move |&b| point_covered(a, b, rings, tolerance))
        })
        .collect();

    debug_assert_eq!(data.len(), centered_a.len() * len_b);
    CoverageMask::new(
        data,
        centered_a.len(),
        len_b,
        (axis_a.tag.as_str(), axis_b.tag.as_str()),
    )
}

/// Rasterize a geometry on two tagged axes of an array.
pub fn rasterize_on<T: CellValue>(
    array: &LabeledArray<T>,
    tags: (&str, &str),
    geometry: &Geometry,
) -> Result<CoverageMask> {
    let axis_a = array
        .axis(tags.0)
        .ok_or_else(|| GridError::dimension_mismatch(format!("axis '{}'", tags.0), array.axis_tags()))?;
    let axis_b = array
        .axis(tags.1)
        .ok_or_else(|| GridError::dimension_mismatch(format!("axis '{}'", tags.1), array.axis_tags()))?;
    rasterize(axis_a, axis_b, geometry)
}

/// Half the mean cell size per axis, maxed across the two axes.
fn line_tolerance(axis_a: &Axis, axis_b: &Axis) -> f64 {
    let half_a = axis_a.step().abs() / 2.0;
    let half_b = axis_b.step().abs() / 2.0;
    half_a.max(half_b)
}

/// Even-odd crossing-number containment over all rings, with an
/// optional boundary tolerance band.
fn point_covered(a: f64, b: f64, rings: &[Vec<[f64; 2]>], tolerance: f64) -> bool {
    let mut inside = false;

    for ring in rings {
        if ring.len() < 2 {
            continue;
        }
        let mut prev = ring[ring.len() - 1];
        for &vertex in ring {
            if tolerance > 0.0 && near_segment(a, b, prev, vertex, tolerance) {
                return true;
            }

            let [pa, pb] = prev;
            let [qa, qb] = vertex;
            // does the edge cross the horizontal ray from (a, b) toward +a?
            if (pb > b) != (qb > b) {
                let t = (b - pb) / (qb - pb);
                if a < pa + t * (qa - pa) {
                    inside = !inside;
                }
            }
            prev = vertex;
        }
    }

    inside
}

/// Tolerance-band proximity test for one edge.
///
/// The cross product is normalized by the Manhattan edge length rather
/// than the Euclidean one, so the band is slightly narrower on diagonal
/// edges. Ties exactly at the tolerance count as covered.
fn near_segment(a: f64, b: f64, p: [f64; 2], q: [f64; 2], tolerance: f64) -> bool {
    let min_a = p[0].min(q[0]) - tolerance;
    let max_a = p[0].max(q[0]) + tolerance;
    let min_b = p[1].min(q[1]) - tolerance;
    let max_b = p[1].max(q[1]) + tolerance;
    if a < min_a || a > max_a || b < min_b || b > max_b {
        return false;
    }

    let da = q[0] - p[0];
    let db = q[1] - p[1];
    let cross = (da * (b - p[1]) - db * (a - p[0])).abs();
    cross <= tolerance * (da.abs() + db.abs())
}
