//! Batch measurement tables, per-group statistics and distribution plots.

pub mod plot;
pub mod summary;
pub mod table;

pub use plot::{PlotError, render_distribution};
pub use summary::{GroupSummary, format_summary, summarize};
pub use table::{
    Record, RowOutcome, SkipReason, SkippedRow, Table, TableError, TableSchema, read_rows,
};
