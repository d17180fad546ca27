//! The `TraceWriter` trait implemented by trace backends.

use crate::{EventRow, OutputResult, PositionRow};

/// Sink for position snapshots and movement events.
///
/// Errors surface through [`TraceObserver::take_error`](crate::TraceObserver::take_error)
/// because observer callbacks return nothing.
pub trait TraceWriter {
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()>;

    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    /// Flush all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
