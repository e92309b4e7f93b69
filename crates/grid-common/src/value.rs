//! Cell values and the missing-data sentinel.
//!
//! Every operation in the workspace decides "is this cell missing?" the
//! same way: through [`NoData::is_missing`]. Trimming, masking, and
//! classification all share that single predicate instead of re-deriving
//! comparison logic per component.

use num_traits::Float;

/// Element type bound for labeled arrays.
///
/// The two hooks cover the sentinel kinds that cannot be expressed as a
/// plain equality test: `Option<T>` carries its own absent marker, and
/// IEEE floats have NaN (which never compares equal to itself).
pub trait CellValue: Copy + PartialEq + Send + Sync + 'static {
    /// True if this value is the element type's own absent marker.
    fn is_absent(&self) -> bool {
        false
    }

    /// True if this value is an IEEE NaN.
    fn is_nan_value(&self) -> bool {
        false
    }

    /// The absent marker for this type, if it has one.
    fn absent() -> Option<Self> {
        None
    }

    /// A NaN of this type, if the type has one.
    fn nan() -> Option<Self> {
        None
    }
}

impl CellValue for f32 {
    fn is_nan_value(&self) -> bool {
        Float::is_nan(*self)
    }

    fn nan() -> Option<Self> {
        Some(Float::nan())
    }
}

impl CellValue for f64 {
    fn is_nan_value(&self) -> bool {
        Float::is_nan(*self)
    }

    fn nan() -> Option<Self> {
        Some(Float::nan())
    }
}

macro_rules! impl_cell_value_int {
    ($($t:ty),*) => {
        $(impl CellValue for $t {})*
    };
}

impl_cell_value_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl CellValue for bool {}

impl<T: CellValue> CellValue for Option<T> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn is_nan_value(&self) -> bool {
        self.map(|v| v.is_nan_value()).unwrap_or(false)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }

    fn nan() -> Option<Self> {
        T::nan().map(Some)
    }
}

/// The missing-value sentinel of a labeled array.
///
/// Three kinds are supported:
/// - `Absent`: the element type's own absent marker (e.g. `None` for
///   `Option<T>` cells)
/// - `Nan`: IEEE NaN marks missing cells
/// - `Value(v)`: a concrete fill value marks missing cells
///
/// A NaN fill value must use the `Nan` variant; `Value(f64::NAN)` would
/// never match because NaN is unequal to itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoData<T> {
    /// The element type's absent marker denotes missing.
    Absent,
    /// IEEE NaN denotes missing.
    Nan,
    /// A concrete value denotes missing.
    Value(T),
}

impl<T: CellValue> NoData<T> {
    /// Check whether a cell value is missing under this sentinel.
    pub fn is_missing(&self, value: &T) -> bool {
        match self {
            NoData::Absent => value.is_absent(),
            NoData::Nan => value.is_nan_value(),
            NoData::Value(sentinel) => value == sentinel,
        }
    }

    /// The value written into cells excluded by a mask.
    ///
    /// Returns None when the element type cannot represent this sentinel
    /// (e.g. a NaN sentinel on an integer array).
    pub fn fill_value(&self) -> Option<T> {
        match self {
            NoData::Absent => T::absent(),
            NoData::Nan => T::nan(),
            NoData::Value(sentinel) => Some(*sentinel),
        }
    }
}
