pub mod columns;
pub mod row;
pub mod viewport;
pub mod wrap;

pub use columns::{Align, ColumnSpec, ComputedLayout, compute_layout};
pub use row::{DisplayRow, TableSchema, build_row};
pub use viewport::{Viewport, compute_visible};
pub use wrap::wrap;
