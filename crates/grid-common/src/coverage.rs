//! Boolean coverage grids produced by rasterization.

use crate::array::LabeledArray;
use crate::axis::Axis;
use crate::error::{GridError, Result};

/// A boolean grid over two target axes; `true` = cell is covered.
///
/// Row-major over (a, b): the flat index of cell `(ia, ib)` is
/// `ia * len_b + ib`, matching the flattening order the rasterizer
/// samples in.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageMask {
    data: Vec<bool>,
    len_a: usize,
    len_b: usize,
    tags: (String, String),
}

impl CoverageMask {
    /// Create a mask from row-major data.
    pub fn new(
        data: Vec<bool>,
        len_a: usize,
        len_b: usize,
        tags: (impl Into<String>, impl Into<String>),
    ) -> Result<Self> {
        if data.len() != len_a * len_b {
            return Err(GridError::dimension_mismatch(
                format!("{} cells", data.len()),
                format!("{}x{} grid", len_a, len_b),
            ));
        }
        Ok(Self {
            data,
            len_a,
            len_b,
            tags: (tags.0.into(), tags.1.into()),
        })
    }

    /// An all-false (nothing covered) mask.
    pub fn all_false(
        len_a: usize,
        len_b: usize,
        tags: (impl Into<String>, impl Into<String>),
    ) -> Self {
        Self {
            data: vec![false; len_a * len_b],
            len_a,
            len_b,
            tags: (tags.0.into(), tags.1.into()),
        }
    }

    /// An all-true (everything covered) mask.
    pub fn all_true(
        len_a: usize,
        len_b: usize,
        tags: (impl Into<String>, impl Into<String>),
    ) -> Self {
        Self {
            data: vec![true; len_a * len_b],
            len_a,
            len_b,
            tags: (tags.0.into(), tags.1.into()),
        }
    }

    /// Grid shape as (len_a, len_b).
    pub fn shape(&self) -> (usize, usize) {
        (self.len_a, self.len_b)
    }

    /// Tags of the two target axes, in sample order.
    pub fn tags(&self) -> (&str, &str) {
        (&self.tags.0, &self.tags.1)
    }

    /// Coverage at cell `(ia, ib)`; out of bounds reads as not covered.
    pub fn get(&self, ia: usize, ib: usize) -> bool {
        if ia >= self.len_a || ib >= self.len_b {
            return false;
        }
        self.data[ia * self.len_b + ib]
    }

    /// Number of covered cells.
    pub fn count_covered(&self) -> usize {
        self.data.iter().filter(|&&c| c).count()
    }

    /// Row-major coverage values.
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Convert into a two-axis boolean [`LabeledArray`].
    ///
    /// The axes must match the mask's shape (and should be the axes the
    /// mask was rasterized on).
    pub fn to_grid(&self, axis_a: &Axis, axis_b: &Axis) -> Result<LabeledArray<bool>> {
        if axis_a.len() != self.len_a || axis_b.len() != self.len_b {
            return Err(GridError::dimension_mismatch(
                format!("{}x{} mask", self.len_a, self.len_b),
                format!("axes {}x{}", axis_a.len(), axis_b.len()),
            ));
        }
        LabeledArray::new(
            self.data.clone(),
            vec![axis_a.clone(), axis_b.clone()],
            None,
        )
    }
}
