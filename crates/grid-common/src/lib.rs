//! Shared data model for the labeled-grid workspace.
//!
//! This crate provides the labeled-array types the computational core in
//! `grid-ops` operates on:
//!
//! - **Axes**: named dimensions with ordered coordinates and a locus
//! - **Arrays**: N-dimensional grids with zero-copy windowed views and a
//!   missing-value sentinel
//! - **Sentinels**: one validity predicate shared by every operation
//!   (absent marker / NaN / concrete fill value)
//! - **Geometry**: polygons and lines that can be rasterized to coverage
//! - **Stacks**: named collections of arrays sharing the same axes
//!
//! ```text
//! LabeledArray ──┬── Axis (tag, coords, locus)
//!                ├── NoData (validity predicate)
//!                └── Arc<Vec<T>> + window (zero-copy views)
//! ```

pub mod array;
pub mod axis;
pub mod bbox;
pub mod coverage;
pub mod error;
pub mod geometry;
pub mod stack;
pub mod testdata;
pub mod value;

// Re-export commonly used types at crate root
pub use array::{AxisRange, LabeledArray};
pub use axis::{Axis, Locus};
pub use bbox::BoundingBox;
pub use coverage::CoverageMask;
pub use error::{GridError, Result};
pub use geometry::Geometry;
pub use stack::{GridStack, StackSeries};
pub use value::{CellValue, NoData};
