//! Long (tuple-keyed) and wide (labelled matrix) table representations,
//! and the pivot/unpivot steps between them.

pub mod long;
pub mod pivot;
pub mod wide;

pub use long::{Key, LongTable};
pub use pivot::{long_to_wide, wide_to_long};
pub use wide::LabeledMatrix;
