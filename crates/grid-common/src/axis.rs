//! Named axes for labeled arrays.

use serde::{Deserialize, Serialize};

/// Which part of a cell an axis coordinate names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locus {
    /// Coordinate names the cell's leading edge.
    Start,
    /// Coordinate names the cell's center.
    #[default]
    Center,
    /// Coordinate names the cell's trailing edge.
    End,
}

/// A named dimension of a labeled array.
///
/// An axis pairs a tag (e.g. "x", "y", "time", "band") with an ordered
/// coordinate sequence and a [`Locus`]. Arrays look axes up by tag, not
/// by position. Coordinates may ascend or descend; the step is signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Axis name used for lookup.
    pub tag: String,
    /// Ordered coordinate sequence, one entry per cell.
    pub coords: Vec<f64>,
    /// What each coordinate names within its cell.
    pub locus: Locus,
}

impl Axis {
    /// Create a new axis.
    pub fn new(tag: impl Into<String>, coords: Vec<f64>, locus: Locus) -> Self {
        Self {
            tag: tag.into(),
            coords,
            locus,
        }
    }

    /// Create a center-locus axis from an origin, step, and length.
    pub fn regular(tag: impl Into<String>, origin: f64, step: f64, len: usize) -> Self {
        let coords = (0..len).map(|i| origin + i as f64 * step).collect();
        Self::new(tag, coords, Locus::Center)
    }

    /// Number of cells along this axis.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if the axis has no cells.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Mean coordinate spacing (signed; negative for descending axes).
    ///
    /// Zero for axes with fewer than two coordinates.
    pub fn step(&self) -> f64 {
        if self.coords.len() < 2 {
            return 0.0;
        }
        let first = self.coords[0];
        let last = self.coords[self.coords.len() - 1];
        (last - first) / (self.coords.len() - 1) as f64
    }

    /// Shift coordinates so they name cell centers.
    ///
    /// Returns a clone when the axis is already center-locus.
    pub fn to_center_locus(&self) -> Axis {
        let half = self.step() / 2.0;
        let shift = match self.locus {
            Locus::Start => half,
            Locus::Center => 0.0,
            Locus::End => -half,
        };

        Axis {
            tag: self.tag.clone(),
            coords: self.coords.iter().map(|c| c + shift).collect(),
            locus: Locus::Center,
        }
    }

    /// Cell-edge extent of the axis as a (min, max) interval.
    ///
    /// Covers full cells: the centered coordinate range expanded by half
    /// a step on each side.
    pub fn extent(&self) -> (f64, f64) {
        let centered = self.to_center_locus();
        let half = centered.step().abs() / 2.0;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &c in &centered.coords {
            min = min.min(c);
            max = max.max(c);
        }

        (min - half, max + half)
    }

    /// Restrict the axis to an inclusive index interval.
    pub fn slice(&self, start: usize, end: usize) -> Axis {
        Axis {
            tag: self.tag.clone(),
            coords: self.coords[start..=end].to_vec(),
            locus: self.locus,
        }
    }
}
