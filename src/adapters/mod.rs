//! Input adapters
//!
//! Convert Arrow record batches into the long and wide tables the builder
//! consumes, cleaning labels on the way in.

pub mod batch;
pub mod labels;

pub use batch::{long_table_from_batches, wide_table_from_batches};
pub use labels::{clean_label, is_total_label};
