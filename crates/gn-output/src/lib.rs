//! `gn-output`: trace writers for the gridnav movement core.
//!
//! | File                    | One row per                                   |
//! |-------------------------|-----------------------------------------------|
//! | `agent_positions.csv`   | agent per snapshot tick (`tick,agent,x,y,phase`) |
//! | `movement_events.csv`   | arrival, stuck, abandonment or group arrival  |
//!
//! Writers implement [`TraceWriter`] and are driven by [`TraceObserver`],
//! which implements `gn_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gn_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./trace"))?;
//! let mut obs = TraceObserver::new(writer);
//! sim.run_ticks(600, &mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("trace error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{EventRow, PositionRow};
pub use writer::TraceWriter;
