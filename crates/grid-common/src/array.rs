//! N-dimensional labeled arrays with zero-copy windowed views.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::{GridError, Result};
use crate::value::{CellValue, NoData};

/// Inclusive index interval along one axis.
///
/// Both bounds are 0-based cell indices and always lie within
/// `[0, axis_len - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRange {
    pub start: usize,
    pub end: usize,
}

impl AxisRange {
    /// Create a range; `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// The full extent of an axis with `len` cells.
    pub fn full(len: usize) -> Self {
        Self {
            start: 0,
            end: len.saturating_sub(1),
        }
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// An inclusive range always covers at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if an index falls inside the range.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    /// Expand symmetrically by `pad` cells, clamped to `[0, axis_len - 1]`.
    ///
    /// Padding never extends past the original axis extent.
    pub fn pad(&self, pad: usize, axis_len: usize) -> Self {
        Self {
            start: self.start.saturating_sub(pad),
            end: (self.end + pad).min(axis_len.saturating_sub(1)),
        }
    }
}

/// An N-dimensional element grid with named axes and a missing-value
/// sentinel.
///
/// Storage is row-major over the axis order and shared behind an `Arc`:
/// [`LabeledArray::view`] restricts the window without copying, and
/// mutating operations copy-on-write only when the backing is shared.
///
/// Invariant: the logical shape always equals the product of axis
/// lengths, in axis order.
#[derive(Debug, Clone)]
pub struct LabeledArray<T> {
    data: Arc<Vec<T>>,
    axes: Vec<Axis>,
    /// Strides over the backing buffer, in elements.
    strides: Vec<usize>,
    offset: usize,
    nodata: Option<NoData<T>>,
}

impl<T: CellValue> LabeledArray<T> {
    /// Create an array from row-major data and its axes.
    ///
    /// Fails with DimensionMismatch when `data.len()` differs from the
    /// product of the axis lengths.
    pub fn new(data: Vec<T>, axes: Vec<Axis>, nodata: Option<NoData<T>>) -> Result<Self> {
        let expected: usize = axes.iter().map(Axis::len).product();
        if data.len() != expected {
            return Err(GridError::dimension_mismatch(
                format!("{} elements", data.len()),
                format!("shape {:?} = {} elements", shape_of(&axes), expected),
            ));
        }

        let strides = row_major_strides(&axes);
        Ok(Self {
            data: Arc::new(data),
            axes,
            strides,
            offset: 0,
            nodata,
        })
    }

    /// The array's axes, in storage order.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Logical shape: one length per axis, in axis order.
    pub fn shape(&self) -> Vec<usize> {
        shape_of(&self.axes)
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Total number of logical elements.
    pub fn len(&self) -> usize {
        self.axes.iter().map(Axis::len).product()
    }

    /// Check if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look an axis up by tag.
    pub fn axis(&self, tag: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.tag == tag)
    }

    /// Position of an axis in storage order, by tag.
    pub fn axis_position(&self, tag: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.tag == tag)
    }

    /// Comma-separated axis tags, for error messages.
    pub fn axis_tags(&self) -> String {
        self.axes
            .iter()
            .map(|a| a.tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The missing-value sentinel, if one is defined.
    pub fn nodata(&self) -> Option<&NoData<T>> {
        self.nodata.as_ref()
    }

    /// Replace the sentinel without touching the data.
    pub fn with_nodata(mut self, nodata: Option<NoData<T>>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Read the element at an N-dimensional index.
    pub fn get(&self, index: &[usize]) -> Option<T> {
        if !self.in_bounds(index) {
            return None;
        }
        Some(self.data[self.flat_offset(index)])
    }

    /// Write the element at an N-dimensional index.
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        if !self.in_bounds(index) {
            return Err(GridError::invalid_argument(format!(
                "index {:?} out of bounds for shape {:?}",
                index,
                self.shape()
            )));
        }
        let flat = self.flat_offset(index);
        Arc::make_mut(&mut self.data)[flat] = value;
        Ok(())
    }

    /// Check whether the cell at `index` holds valid (non-missing) data.
    ///
    /// Out-of-bounds indices and missing cells are both invalid; arrays
    /// without a sentinel are valid everywhere.
    pub fn is_valid(&self, index: &[usize]) -> bool {
        match self.get(index) {
            Some(value) => match &self.nodata {
                Some(nodata) => !nodata.is_missing(&value),
                None => true,
            },
            None => false,
        }
    }

    /// Restrict the array to one [`AxisRange`] per axis without copying.
    ///
    /// The view shares the backing storage; only the window offset and
    /// the axis coordinate slices change.
    pub fn view(&self, ranges: &[AxisRange]) -> Result<Self> {
        if ranges.len() != self.axes.len() {
            return Err(GridError::dimension_mismatch(
                format!("{} ranges", ranges.len()),
                format!("{} axes", self.axes.len()),
            ));
        }
        for (range, axis) in ranges.iter().zip(&self.axes) {
            if range.end >= axis.len() {
                return Err(GridError::invalid_argument(format!(
                    "range [{}, {}] out of bounds for axis '{}' with {} cells",
                    range.start,
                    range.end,
                    axis.tag,
                    axis.len()
                )));
            }
        }

        let offset = self.offset
            + ranges
                .iter()
                .zip(&self.strides)
                .map(|(r, s)| r.start * s)
                .sum::<usize>();
        let axes = ranges
            .iter()
            .zip(&self.axes)
            .map(|(r, a)| a.slice(r.start, r.end))
            .collect();

        Ok(Self {
            data: Arc::clone(&self.data),
            axes,
            strides: self.strides.clone(),
            offset,
            nodata: self.nodata,
        })
    }

    /// Rebuild the array with new backing data and/or a new sentinel,
    /// keeping the axes.
    pub fn with_data<U: CellValue>(
        &self,
        data: Vec<U>,
        nodata: Option<NoData<U>>,
    ) -> Result<LabeledArray<U>> {
        LabeledArray::new(data, self.axes.clone(), nodata)
    }

    /// Visit every logical element in row-major order.
    pub fn for_each(&self, mut f: impl FnMut(&[usize], T)) {
        if self.is_empty() {
            return;
        }
        let shape = self.shape();
        let mut index = vec![0usize; shape.len()];

        'outer: loop {
            f(&index, self.data[self.flat_offset(&index)]);
            for d in (0..shape.len()).rev() {
                index[d] += 1;
                if index[d] < shape[d] {
                    continue 'outer;
                }
                index[d] = 0;
            }
            break;
        }
    }

    /// Rewrite every logical element in place.
    ///
    /// Copies the backing buffer first if it is shared with other
    /// arrays or views.
    pub fn map_in_place(&mut self, mut f: impl FnMut(&[usize], T) -> T) {
        if self.is_empty() {
            return;
        }
        let shape = self.shape();
        let strides = self.strides.clone();
        let offset = self.offset;
        let data = Arc::make_mut(&mut self.data);
        let mut index = vec![0usize; shape.len()];

        'outer: loop {
            let flat = offset
                + index
                    .iter()
                    .zip(&strides)
                    .map(|(i, s)| i * s)
                    .sum::<usize>();
            data[flat] = f(&index, data[flat]);
            for d in (0..shape.len()).rev() {
                index[d] += 1;
                if index[d] < shape[d] {
                    continue 'outer;
                }
                index[d] = 0;
            }
            break;
        }
    }

    /// Derive a same-shape array by mapping every element.
    pub fn map_values<U: CellValue>(
        &self,
        nodata: Option<NoData<U>>,
        mut f: impl FnMut(&[usize], T) -> U,
    ) -> LabeledArray<U> {
        let mut values = Vec::with_capacity(self.len());
        self.for_each(|index, value| values.push(f(index, value)));

        let strides = row_major_strides(&self.axes);
        LabeledArray {
            data: Arc::new(values),
            axes: self.axes.clone(),
            strides,
            offset: 0,
            nodata,
        }
    }

    /// Materialize the logical elements in row-major order.
    pub fn values(&self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len());
        self.for_each(|_, value| values.push(value));
        values
    }

    fn in_bounds(&self, index: &[usize]) -> bool {
        index.len() == self.axes.len()
            && index.iter().zip(&self.axes).all(|(i, a)| *i < a.len())
    }

    fn flat_offset(&self, index: &[usize]) -> usize {
        self.offset
            + index
                .iter()
                .zip(&self.strides)
                .map(|(i, s)| i * s)
                .sum::<usize>()
    }
}

fn shape_of(axes: &[Axis]) -> Vec<usize> {
    axes.iter().map(Axis::len).collect()
}

fn row_major_strides(axes: &[Axis]) -> Vec<usize> {
    let mut strides = vec![1usize; axes.len()];
    for d in (0..axes.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * axes[d + 1].len();
    }
    strides
}
