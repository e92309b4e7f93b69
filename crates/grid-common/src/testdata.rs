//! Test data generation utilities.
//!
//! Small deterministic grids with known value patterns, used by unit
//! tests across the workspace. The `col * 1000 + row` style patterns
//! make it easy to verify which cells survived an operation.

use crate::array::LabeledArray;
use crate::axis::Axis;
use crate::value::NoData;

/// Conventional sentinel for test grids.
pub const TEST_NODATA: f64 = -9999.0;

/// A 2-D grid over axes (x, y) where value at (col, row) = col * 1000 + row.
pub fn sequential_grid(len_x: usize, len_y: usize) -> LabeledArray<f64> {
    let mut data = Vec::with_capacity(len_x * len_y);
    for col in 0..len_x {
        for row in 0..len_y {
            data.push((col * 1000 + row) as f64);
        }
    }
    LabeledArray::new(
        data,
        vec![
            Axis::regular("x", 1.0, 1.0, len_x),
            Axis::regular("y", 1.0, 1.0, len_y),
        ],
        Some(NoData::Value(TEST_NODATA)),
    )
    .expect("shape matches by construction")
}

/// A 2-D grid filled with one value, sentinel -9999.
pub fn filled_grid(len_x: usize, len_y: usize, value: f64) -> LabeledArray<f64> {
    LabeledArray::new(
        vec![value; len_x * len_y],
        vec![
            Axis::regular("x", 1.0, 1.0, len_x),
            Axis::regular("y", 1.0, 1.0, len_y),
        ],
        Some(NoData::Value(TEST_NODATA)),
    )
    .expect("shape matches by construction")
}

/// The 4x4 trim scenario: axes x = 1..4, y = 1..4, sentinel -9999,
/// valid data only where x is in {2, 3} and y is in {2, 3, 4}.
pub fn island_grid() -> LabeledArray<f64> {
    let mut grid = filled_grid(4, 4, TEST_NODATA);
    for col in 1..=2 {
        for row in 1..=3 {
            grid.set(&[col, row], (col * 10 + row) as f64)
                .expect("in bounds");
        }
    }
    grid
}
