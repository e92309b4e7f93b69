//! Computational core for labeled gridded data.
//!
//! Three operations over `grid-common` arrays, all pure and synchronous:
//!
//! - **Trim**: shrink the viewport to the smallest sub-range holding
//!   valid data along chosen axes (single-pass OR reduction, zero-copy
//!   view result)
//! - **Mask**: derive coverage from a reference array, boolean grid, or
//!   polygon/line geometry and blank out the excluded cells
//! - **Classify**: remap values through an ordered first-match-wins rule
//!   list
//!
//! ```text
//! trim(array, dims, pad)
//!      │
//!      ├─► AxisReductionTracker: one OR-scan over every element
//!      │
//!      └─► padded + clamped AxisRanges ─► zero-copy view
//!
//! mask(array, source, missing)
//!      │
//!      ├─► Reference ─► validity of the reference, cell by cell
//!      ├─► Grid      ─► used directly (full shape or 2-axis broadcast)
//!      └─► Geometry  ─► rasterize: bbox crossover short-circuit,
//!                       else cell-center containment tests
//! ```
//!
//! Mutating variants (`mask_in_place`, `classify_in_place`) require
//! exclusive access to the target; nothing here locks internally.

pub mod classify;
pub mod mask;
pub mod rasterize;
pub mod trim;

// Re-export commonly used entry points at crate root
pub use classify::{
    classify, classify_in_place, classify_series, classify_stack, Classifier, Inclusion, Rule,
};
pub use mask::{
    boolmask, mask, mask_in_place, mask_stack, mask_stack_in_place, missingmask, MaskSource,
};
pub use rasterize::{rasterize, rasterize_on};
pub use trim::{trim, trim_stack, AxisReductionTracker};
