//! Missing-data trimming.
//!
//! Shrinks an array's viewport to the smallest bounding sub-range that
//! still contains every valid cell along the chosen axes. One full pass
//! over the elements feeds a per-axis validity tracker; the resulting
//! ranges are padded, clamped, and turned into a zero-copy view.

use grid_common::{
    AxisRange, CellValue, GridError, GridStack, LabeledArray, Result,
};

/// Per-axis validity accumulator for a single trim scan.
///
/// Holds one boolean vector per kept axis, sized to that axis. After a
/// complete scan, `seen[k][i]` is true iff at least one element whose
/// index along kept axis `k` equals `i` was valid. OR-accumulation is
/// commutative and associative, so the result is independent of scan
/// order and may be fed chunk by chunk.
#[derive(Debug)]
pub struct AxisReductionTracker {
    /// Positions of the kept axes in storage order.
    positions: Vec<usize>,
    /// One validity vector per kept axis.
    seen: Vec<Vec<bool>>,
}

impl AxisReductionTracker {
    /// Create a tracker for the kept axes at `positions` with the given
    /// axis lengths.
    pub fn new(positions: Vec<usize>, lens: &[usize]) -> Self {
        debug_assert_eq!(positions.len(), lens.len());
        let seen = lens.iter().map(|&len| vec![false; len]).collect();
        Self { positions, seen }
    }

    /// Fold one element's validity into the per-axis vectors.
    pub fn observe(&mut self, index: &[usize], valid: bool) {
        if !valid {
            return;
        }
        for (k, &pos) in self.positions.iter().enumerate() {
            self.seen[k][index[pos]] = true;
        }
    }

    /// Scan every element of an array.
    pub fn scan<T: CellValue>(&mut self, array: &LabeledArray<T>) {
        let nodata = array.nodata().copied();
        array.for_each(|index, value| {
            let valid = match &nodata {
                Some(nodata) => !nodata.is_missing(&value),
                None => true,
            };
            self.observe(index, valid);
        });
    }

    /// Extract the minimal valid range per kept axis, padded and clamped.
    ///
    /// An axis with no valid cell at all falls back to its full extent;
    /// that is the documented degenerate policy, not an error.
    pub fn ranges(&self, pad: usize) -> Vec<AxisRange> {
        self.seen
            .iter()
            .zip(&self.positions)
            .map(|(seen, &pos)| {
                let len = seen.len();
                let first = seen.iter().position(|&v| v);
                let last = seen.iter().rposition(|&v| v);
                let range = match (first, last) {
                    (Some(first), Some(last)) => AxisRange::new(first, last),
                    _ => {
                        tracing::debug!(
                            axis_position = pos,
                            axis_len = len,
                            "no valid data along axis, keeping full extent"
                        );
                        AxisRange::full(len)
                    }
                };
                range.pad(pad, len)
            })
            .collect()
    }
}

/// Trim an array to the smallest sub-range holding valid data along the
/// given axes.
///
/// Axes not named in `dims` keep their full extent. `pad` expands each
/// computed range symmetrically, clamped to the axis bounds. The result
/// is a view sharing the original storage.
pub fn trim<T: CellValue>(
    array: &LabeledArray<T>,
    dims: &[&str],
    pad: usize,
) -> Result<LabeledArray<T>> {
    let positions = resolve_dims(array, dims)?;
    let lens: Vec<usize> = positions.iter().map(|&p| array.axes()[p].len()).collect();

    let mut tracker = AxisReductionTracker::new(positions.clone(), &lens);
    tracker.scan(array);

    array.view(&view_ranges(array, &positions, &tracker.ranges(pad)))
}

/// Trim every member of a stack to one shared sub-range.
///
/// Validity is OR-accumulated across all members, so a cell kept by any
/// member keeps that index for the whole stack.
pub fn trim_stack<T: CellValue>(
    stack: &GridStack<T>,
    dims: &[&str],
    pad: usize,
) -> Result<GridStack<T>> {
    let first = stack.first().ok_or_else(|| {
        GridError::invalid_argument("cannot trim an empty stack")
    })?;
    let positions = resolve_dims(first, dims)?;
    let lens: Vec<usize> = positions.iter().map(|&p| first.axes()[p].len()).collect();

    let mut tracker = AxisReductionTracker::new(positions.clone(), &lens);
    for (_, member) in stack.iter() {
        tracker.scan(member);
    }
    let ranges = tracker.ranges(pad);

    let mut trimmed = GridStack::new();
    for (name, member) in stack.iter() {
        let view = member.view(&view_ranges(member, &positions, &ranges))?;
        trimmed.insert(name, view)?;
    }
    Ok(trimmed)
}

/// Resolve axis tags to storage positions, rejecting unknown tags.
fn resolve_dims<T: CellValue>(array: &LabeledArray<T>, dims: &[&str]) -> Result<Vec<usize>> {
    dims.iter()
        .map(|tag| {
            array.axis_position(tag).ok_or_else(|| {
                GridError::dimension_mismatch(format!("axis '{}'", tag), array.axis_tags())
            })
        })
        .collect()
}

/// Per-axis view ranges: computed ranges on kept axes, full extent on
/// the rest.
fn view_ranges<T: CellValue>(
    array: &LabeledArray<T>,
    positions: &[usize],
    kept: &[AxisRange],
) -> Vec<AxisRange> {
    let mut ranges: Vec<AxisRange> = array
        .axes()
        .iter()
        .map(|axis| AxisRange::full(axis.len()))
        .collect();
    for (&pos, &range) in positions.iter().zip(kept) {
        ranges[pos] = range;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_common::testdata::{filled_grid, island_grid, TEST_NODATA};
    use grid_common::{Axis, NoData};

    #[test]
    fn test_trim_island() {
        // valid data only where x index in {1, 2}, y index in {1, 2, 3}
        let grid = island_grid();
        let trimmed = trim(&grid, &["x", "y"], 0).unwrap();

        assert_eq!(trimmed.shape(), vec![2, 3]);
        assert_eq!(trimmed.axis("x").unwrap().coords, vec![2.0, 3.0]);
        assert_eq!(trimmed.axis("y").unwrap().coords, vec![2.0, 3.0, 4.0]);
        assert_eq!(trimmed.get(&[0, 0]), Some(11.0));
    }

    #[test]
    fn test_trim_pad_clamps_to_extent() {
        let grid = island_grid();
        let trimmed = trim(&grid, &["x", "y"], 1).unwrap();

        // x: [1,2] padded to [0,3]; y: [1,3] padded to [0,3] (4=3+1 clamped)
        assert_eq!(trimmed.shape(), vec![4, 4]);
        assert_eq!(trimmed.axis("x").unwrap().coords, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_trim_all_valid_keeps_full_extent() {
        let grid = filled_grid(3, 5, 7.0);
        let trimmed = trim(&grid, &["x", "y"], 0).unwrap();
        assert_eq!(trimmed.shape(), vec![3, 5]);
    }

    #[test]
    fn test_trim_all_missing_falls_back_to_full_extent() {
        let grid = filled_grid(3, 5, TEST_NODATA);
        let trimmed = trim(&grid, &["x", "y"], 0).unwrap();
        // degenerate policy: full extent, not an empty range
        assert_eq!(trimmed.shape(), vec![3, 5]);
    }

    #[test]
    fn test_trim_single_axis_leaves_others_full() {
        let grid = island_grid();
        let trimmed = trim(&grid, &["y"], 0).unwrap();
        assert_eq!(trimmed.shape(), vec![4, 3]);
    }

    #[test]
    fn test_trim_unknown_axis() {
        let grid = island_grid();
        let result = trim(&grid, &["x", "time"], 0);
        assert!(matches!(result, Err(GridError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_trim_no_sentinel_keeps_everything() {
        let grid = island_grid().with_nodata(None);
        let trimmed = trim(&grid, &["x", "y"], 0).unwrap();
        assert_eq!(trimmed.shape(), vec![4, 4]);
    }

    #[test]
    fn test_trim_nan_sentinel() {
        let mut data = vec![f64::NAN; 4];
        data[2] = 1.0;
        let grid = LabeledArray::new(
            data,
            vec![Axis::regular("x", 0.0, 1.0, 4)],
            Some(NoData::Nan),
        )
        .unwrap();

        let trimmed = trim(&grid, &["x"], 0).unwrap();
        assert_eq!(trimmed.shape(), vec![1]);
        assert_eq!(trimmed.get(&[0]), Some(1.0));
    }

    #[test]
    fn test_trim_result_is_a_view() {
        let grid = island_grid();
        let mut trimmed = trim(&grid, &["x", "y"], 0).unwrap();
        trimmed.set(&[0, 0], 123.0).unwrap();
        // copy-on-write: the original stays intact
        assert_eq!(grid.get(&[1, 1]), Some(11.0));
    }

    #[test]
    fn test_trim_stack_ors_validity_across_members() {
        // member A valid at x index 0 only, member B valid at x index 3 only
        let mut a = filled_grid(4, 1, TEST_NODATA);
        a.set(&[0, 0], 1.0).unwrap();
        let mut b = filled_grid(4, 1, TEST_NODATA);
        b.set(&[3, 0], 2.0).unwrap();

        let mut stack = GridStack::new();
        stack.insert("a", a).unwrap();
        stack.insert("b", b).unwrap();

        let trimmed = trim_stack(&stack, &["x"], 0).unwrap();
        // union of both members spans the whole axis
        assert_eq!(trimmed.get("a").unwrap().shape(), vec![4, 1]);
    }

    #[test]
    fn test_trim_stack_shared_range() {
        let mut a = filled_grid(6, 1, TEST_NODATA);
        a.set(&[2, 0], 1.0).unwrap();
        let mut b = filled_grid(6, 1, TEST_NODATA);
        b.set(&[3, 0], 2.0).unwrap();

        let mut stack = GridStack::new();
        stack.insert("a", a).unwrap();
        stack.insert("b", b).unwrap();

        let trimmed = trim_stack(&stack, &["x"], 0).unwrap();
        for (_, member) in trimmed.iter() {
            assert_eq!(member.shape(), vec![2, 1]);
            assert_eq!(member.axis("x").unwrap().coords, vec![3.0, 4.0]);
        }
    }

    #[test]
    fn test_trim_empty_stack() {
        let stack: GridStack<f64> = GridStack::new();
        assert!(matches!(
            trim_stack(&stack, &["x"], 0),
            Err(GridError::InvalidArgument(_))
        ));
    }
}
