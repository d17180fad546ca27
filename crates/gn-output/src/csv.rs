//! CSV trace backend.
//!
//! Creates two files in the output directory:
//! - `agent_positions.csv`
//! - `movement_events.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{EventRow, OutputResult, PositionRow};

pub const POSITIONS_FILE: &str = "agent_positions.csv";
pub const EVENTS_FILE: &str = "movement_events.csv";

/// Writes traces to two CSV files.
pub struct CsvTraceWriter {
    positions: Writer<File>,
    events:    Writer<File>,
    finished:  bool,
}

impl CsvTraceWriter {
    /// Create `dir` if needed, open both files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut positions = Writer::from_path(dir.join(POSITIONS_FILE))?;
        positions.write_record(["tick", "agent", "x", "y", "phase"])?;

        let mut events = Writer::from_path(dir.join(EVENTS_FILE))?;
        events.write_record(["tick", "agent", "event", "cell_x", "cell_y"])?;

        Ok(Self { positions, events, finished: false })
    }
}

fn opt(v: Option<i32>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl TraceWriter for CsvTraceWriter {
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
        for row in rows {
            self.positions.write_record(&[
                row.tick.to_string(),
                row.agent.to_string(),
                format!("{:.4}", row.x),
                format!("{:.4}", row.y),
                row.phase.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.tick.to_string(),
            row.agent.to_string(),
            row.event.to_string(),
            opt(row.cell_x),
            opt(row.cell_y),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.positions.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
