//! Coverage masking.
//!
//! Resolves a coverage source (reference array, boolean grid, or
//! geometry) into per-cell coverage and blanks out the excluded cells
//! with a missing value. Stack variants derive the coverage once and
//! broadcast it to every member.

use grid_common::{
    CellValue, CoverageMask, Geometry, GridError, GridStack, LabeledArray, NoData, Result,
};

use crate::rasterize::rasterize_on;

/// Where a masking operation takes its coverage from.
#[derive(Debug)]
pub enum MaskSource<'a, T> {
    /// Covered where the reference array holds valid data under its own
    /// sentinel. Shapes must match.
    Reference(&'a LabeledArray<T>),
    /// A boolean grid used directly: either the full array shape, or a
    /// two-axis grid broadcast across the remaining axes.
    Grid(&'a LabeledArray<bool>),
    /// A geometry rasterized on the array's first two axes.
    Geometry(&'a Geometry),
}

/// Coverage resolved against a concrete array shape.
enum Coverage {
    /// Row-major coverage over the full logical shape.
    Full { data: Vec<bool>, strides: Vec<usize> },
    /// Two-axis coverage broadcast across all remaining axes.
    TwoAxis {
        data: Vec<bool>,
        pos_a: usize,
        pos_b: usize,
        len_b: usize,
    },
}

impl Coverage {
    fn covered(&self, index: &[usize]) -> bool {
        match self {
            Coverage::Full { data, strides } => {
                let flat: usize = index.iter().zip(strides).map(|(i, s)| i * s).sum();
                data[flat]
            }
            Coverage::TwoAxis {
                data,
                pos_a,
                pos_b,
                len_b,
            } => data[index[*pos_a] * len_b + index[*pos_b]],
        }
    }
}

/// Mask an array, returning a new one.
///
/// Cells where the coverage is false are replaced with the missing
/// value; covered cells are unchanged. The replacement is the explicit
/// `missing` argument if given, else the array's own sentinel.
pub fn mask<T: CellValue>(
    array: &LabeledArray<T>,
    source: &MaskSource<'_, T>,
    missing: Option<T>,
) -> Result<LabeledArray<T>> {
    let mut masked = array.clone();
    mask_in_place(&mut masked, source, missing)?;
    Ok(masked)
}

/// Mask an array in place.
///
/// Arguments are validated before any cell is written; a rejected call
/// leaves the array unmodified.
pub fn mask_in_place<T: CellValue>(
    array: &mut LabeledArray<T>,
    source: &MaskSource<'_, T>,
    missing: Option<T>,
) -> Result<()> {
    let fill = replacement_value(array, missing)?;
    let coverage = resolve_coverage(array, source)?;
    apply_coverage(array, &coverage, fill);
    Ok(())
}

/// Mask every member of a stack, returning a new stack.
pub fn mask_stack<T: CellValue>(
    stack: &GridStack<T>,
    source: &MaskSource<'_, T>,
    missing: Option<T>,
) -> Result<GridStack<T>> {
    let mut masked = stack.clone();
    mask_stack_in_place(&mut masked, source, missing)?;
    Ok(masked)
}

/// Mask every member of a stack in place.
///
/// The coverage is resolved once (against the first member's axes) and
/// broadcast to all members; a geometry is rasterized a single time for
/// the whole stack.
pub fn mask_stack_in_place<T: CellValue>(
    stack: &mut GridStack<T>,
    source: &MaskSource<'_, T>,
    missing: Option<T>,
) -> Result<()> {
    let Some(first) = stack.first() else {
        return Ok(());
    };
    let coverage = resolve_coverage(first, source)?;

    // validate every member's replacement before mutating any of them
    let fills: Vec<T> = stack
        .iter()
        .map(|(_, member)| replacement_value(member, missing))
        .collect::<Result<_>>()?;

    for ((_, member), fill) in stack.iter_mut().zip(fills) {
        apply_coverage(member, &coverage, fill);
    }
    Ok(())
}

/// Boolean validity grid: `true` where the cell is not missing.
///
/// All three sentinel kinds go through the shared predicate; arrays
/// without a sentinel are valid everywhere. The result carries no
/// sentinel of its own.
pub fn boolmask<T: CellValue>(array: &LabeledArray<T>) -> LabeledArray<bool> {
    let nodata = array.nodata().copied();
    array.map_values(None, |_, value| match &nodata {
        Some(nodata) => !nodata.is_missing(&value),
        None => true,
    })
}

/// Validity grid with an absent marker: `Some(true)` where valid, `None`
/// where missing.
pub fn missingmask<T: CellValue>(array: &LabeledArray<T>) -> LabeledArray<Option<bool>> {
    let nodata = array.nodata().copied();
    array.map_values(Some(NoData::Absent), |_, value| {
        let valid = match &nodata {
            Some(nodata) => !nodata.is_missing(&value),
            None => true,
        };
        if valid {
            Some(true)
        } else {
            None
        }
    })
}

/// The value written into excluded cells.
fn replacement_value<T: CellValue>(array: &LabeledArray<T>, missing: Option<T>) -> Result<T> {
    if let Some(value) = missing {
        return Ok(value);
    }
    match array.nodata() {
        Some(nodata) => nodata.fill_value().ok_or_else(|| {
            GridError::configuration("missing-value sentinel is not representable in the element type")
        }),
        None => Err(GridError::configuration(
            "array defines no missing value and none was provided",
        )),
    }
}

fn resolve_coverage<T: CellValue>(
    array: &LabeledArray<T>,
    source: &MaskSource<'_, T>,
) -> Result<Coverage> {
    match source {
        MaskSource::Reference(reference) => {
            if reference.shape() != array.shape() {
                return Err(GridError::dimension_mismatch(
                    format!("reference shape {:?}", reference.shape()),
                    format!("array shape {:?}", array.shape()),
                ));
            }
            let reference_nodata = reference.nodata().copied();
            let mut data = Vec::with_capacity(reference.len());
            reference.for_each(|_, value| {
                data.push(match &reference_nodata {
                    Some(nodata) => !nodata.is_missing(&value),
                    None => true,
                });
            });
            Ok(Coverage::Full {
                data,
                strides: logical_strides(&array.shape()),
            })
        }
        MaskSource::Grid(grid) => {
            if grid.shape() == array.shape() {
                return Ok(Coverage::Full {
                    data: grid.values(),
                    strides: logical_strides(&array.shape()),
                });
            }
            if grid.ndim() == 2 {
                let tags: Vec<&str> =
                    grid.axes().iter().map(|axis| axis.tag.as_str()).collect();
                let pos_a = array.axis_position(tags[0]);
                let pos_b = array.axis_position(tags[1]);
                if let (Some(pos_a), Some(pos_b)) = (pos_a, pos_b) {
                    let lens_match = array.axes()[pos_a].len() == grid.axes()[0].len()
                        && array.axes()[pos_b].len() == grid.axes()[1].len();
                    if lens_match {
                        return Ok(Coverage::TwoAxis {
                            data: grid.values(),
                            pos_a,
                            pos_b,
                            len_b: grid.axes()[1].len(),
                        });
                    }
                }
            }
            Err(GridError::dimension_mismatch(
                format!("mask shape {:?}", grid.shape()),
                format!("array shape {:?}", array.shape()),
            ))
        }
        MaskSource::Geometry(geometry) => {
            if array.ndim() < 2 {
                return Err(GridError::dimension_mismatch(
                    "two axes for geometry masking".to_string(),
                    array.axis_tags(),
                ));
            }
            let tag_a = array.axes()[0].tag.clone();
            let tag_b = array.axes()[1].tag.clone();
            let mask = rasterize_on(array, (tag_a.as_str(), tag_b.as_str()), geometry)?;
            Ok(coverage_from_mask(&mask, 0, 1))
        }
    }
}

fn coverage_from_mask(mask: &CoverageMask, pos_a: usize, pos_b: usize) -> Coverage {
    Coverage::TwoAxis {
        data: mask.data().to_vec(),
        pos_a,
        pos_b,
        len_b: mask.shape().1,
    }
}

fn apply_coverage<T: CellValue>(array: &mut LabeledArray<T>, coverage: &Coverage, fill: T) {
    array.map_in_place(|index, value| {
        if coverage.covered(index) {
            value
        } else {
            fill
        }
    });
}

fn logical_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_common::testdata::{filled_grid, island_grid, sequential_grid, TEST_NODATA};
    use grid_common::{Axis, CoverageMask};

    #[test]
    fn test_mask_all_true_is_identity() {
        let grid = sequential_grid(3, 3);
        let all_true = CoverageMask::all_true(3, 3, ("x", "y"))
            .to_grid(grid.axis("x").unwrap(), grid.axis("y").unwrap())
            .unwrap();

        let masked = mask(&grid, &MaskSource::Grid(&all_true), None).unwrap();
        assert_eq!(masked.values(), grid.values());
    }

    #[test]
    fn test_mask_all_false_fills_sentinel() {
        let grid = sequential_grid(3, 3);
        let all_false = CoverageMask::all_false(3, 3, ("x", "y"))
            .to_grid(grid.axis("x").unwrap(), grid.axis("y").unwrap())
            .unwrap();

        let masked = mask(&grid, &MaskSource::Grid(&all_false), None).unwrap();
        assert!(masked.values().iter().all(|&v| v == TEST_NODATA));
    }

    #[test]
    fn test_explicit_missing_wins_over_sentinel() {
        let grid = sequential_grid(2, 2);
        let all_false = CoverageMask::all_false(2, 2, ("x", "y"))
            .to_grid(grid.axis("x").unwrap(), grid.axis("y").unwrap())
            .unwrap();

        let masked = mask(&grid, &MaskSource::Grid(&all_false), Some(-1.0)).unwrap();
        assert!(masked.values().iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_mask_without_sentinel_is_configuration_error() {
        let grid = sequential_grid(2, 2).with_nodata(None);
        let all_false = CoverageMask::all_false(2, 2, ("x", "y"))
            .to_grid(grid.axis("x").unwrap(), grid.axis("y").unwrap())
            .unwrap();

        let result = mask(&grid, &MaskSource::Grid(&all_false), None);
        assert!(matches!(result, Err(GridError::Configuration(_))));
    }

    #[test]
    fn test_mask_by_reference_array() {
        let grid = sequential_grid(4, 4);
        let reference = island_grid();

        let masked = mask(&grid, &MaskSource::Reference(&reference), None).unwrap();
        // cells where the reference is missing become the sentinel
        assert_eq!(masked.get(&[0, 0]), Some(TEST_NODATA));
        assert_eq!(masked.get(&[1, 1]), Some(1001.0));
        assert_eq!(masked.get(&[2, 3]), Some(2003.0));
        assert_eq!(masked.get(&[3, 3]), Some(TEST_NODATA));
    }

    #[test]
    fn test_mask_reference_shape_mismatch() {
        let grid = sequential_grid(3, 3);
        let reference = sequential_grid(4, 4);
        assert!(matches!(
            mask(&grid, &MaskSource::Reference(&reference), None),
            Err(GridError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_mask_by_geometry() {
        let grid = sequential_grid(4, 4);
        // covers cell centers (2..3, 2..3) only
        let polygon = Geometry::polygon(vec![
            [1.5, 1.5],
            [3.5, 1.5],
            [3.5, 3.5],
            [1.5, 3.5],
        ]);

        let masked = mask(&grid, &MaskSource::Geometry(&polygon), None).unwrap();
        assert_eq!(masked.get(&[1, 1]), Some(1001.0));
        assert_eq!(masked.get(&[2, 2]), Some(2002.0));
        assert_eq!(masked.get(&[0, 0]), Some(TEST_NODATA));
        assert_eq!(masked.get(&[3, 3]), Some(TEST_NODATA));
    }

    #[test]
    fn test_mask_in_place_validates_before_writing() {
        let mut grid = sequential_grid(2, 2).with_nodata(None);
        let original = grid.values();
        let reference = sequential_grid(2, 2);

        let result = mask_in_place(&mut grid, &MaskSource::Reference(&reference), None);
        assert!(result.is_err());
        assert_eq!(grid.values(), original);
    }

    #[test]
    fn test_two_axis_grid_broadcasts_over_extra_axes() {
        // 3-D array over (time, x, y); 2-D mask over (x, y)
        let mut axes = vec![Axis::regular("time", 0.0, 1.0, 2)];
        let base = sequential_grid(2, 2);
        axes.extend(base.axes().iter().cloned());
        let array = LabeledArray::new(
            vec![5.0; 8],
            axes,
            Some(NoData::Value(TEST_NODATA)),
        )
        .unwrap();

        let mask_data =
            CoverageMask::new(vec![true, false, true, false], 2, 2, ("x", "y")).unwrap();
        let grid_mask = mask_data
            .to_grid(base.axis("x").unwrap(), base.axis("y").unwrap())
            .unwrap();

        let masked = mask(&array, &MaskSource::Grid(&grid_mask), None).unwrap();
        for t in 0..2 {
            assert_eq!(masked.get(&[t, 0, 0]), Some(5.0));
            assert_eq!(masked.get(&[t, 0, 1]), Some(TEST_NODATA));
            assert_eq!(masked.get(&[t, 1, 0]), Some(5.0));
            assert_eq!(masked.get(&[t, 1, 1]), Some(TEST_NODATA));
        }
    }

    #[test]
    fn test_mask_stack_shares_one_coverage() {
        let mut stack = GridStack::new();
        stack.insert("a", sequential_grid(4, 4)).unwrap();
        stack.insert("b", filled_grid(4, 4, 3.0)).unwrap();

        let polygon = Geometry::polygon(vec![
            [1.5, 1.5],
            [3.5, 1.5],
            [3.5, 3.5],
            [1.5, 3.5],
        ]);
        let masked = mask_stack(&stack, &MaskSource::Geometry(&polygon), None).unwrap();

        assert_eq!(masked.get("a").unwrap().get(&[0, 0]), Some(TEST_NODATA));
        assert_eq!(masked.get("a").unwrap().get(&[1, 1]), Some(1001.0));
        assert_eq!(masked.get("b").unwrap().get(&[0, 0]), Some(TEST_NODATA));
        assert_eq!(masked.get("b").unwrap().get(&[2, 2]), Some(3.0));
    }

    #[test]
    fn test_boolmask_matches_validity() {
        let grid = island_grid();
        let bools = boolmask(&grid);

        grid.for_each(|index, _| {
            assert_eq!(bools.get(index), Some(grid.is_valid(index)));
        });
        assert!(bools.nodata().is_none());
    }

    #[test]
    fn test_boolmask_nan_sentinel() {
        let grid = LabeledArray::new(
            vec![1.0, f64::NAN, 3.0],
            vec![Axis::regular("x", 0.0, 1.0, 3)],
            Some(NoData::Nan),
        )
        .unwrap();

        let bools = boolmask(&grid);
        assert_eq!(bools.values(), vec![true, false, true]);
    }

    #[test]
    fn test_boolmask_absent_sentinel() {
        let grid = LabeledArray::new(
            vec![Some(1), None, Some(3)],
            vec![Axis::regular("x", 0.0, 1.0, 3)],
            Some(NoData::Absent),
        )
        .unwrap();

        let bools = boolmask(&grid);
        assert_eq!(bools.values(), vec![true, false, true]);
    }

    #[test]
    fn test_missingmask_uses_absent_marker() {
        let grid = island_grid();
        let missing = missingmask(&grid);

        assert_eq!(missing.get(&[1, 1]), Some(Some(true)));
        assert_eq!(missing.get(&[0, 0]), Some(None));
        assert_eq!(missing.nodata(), Some(&NoData::Absent));
    }
}
