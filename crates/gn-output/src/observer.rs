//! `TraceObserver<W>`: bridges `SimObserver` to a `TraceWriter`.

use gn_core::{AgentId, ArrivalReaction, CellCoord, Tick};
use gn_mobility::MobilityStore;
use gn_sim::{GroupId, SimObserver};

use crate::row::{EventRow, PositionRow};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records snapshots and events to any
/// [`TraceWriter`].
///
/// Write errors are kept because observer methods cannot return them; only
/// the first one is retained.  Check [`take_error`](Self::take_error) after
/// the run.
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer now instead of waiting for `on_run_end`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn event(&mut self, tick: Tick, agent: AgentId, event: &'static str, cell: Option<CellCoord>) {
        let row = EventRow {
            tick:   tick.0,
            agent:  agent.0,
            event,
            cell_x: cell.map(|c| c.x),
            cell_y: cell.map(|c| c.y),
        };
        let result = self.writer.write_event(&row);
        self.store_err(result);
    }
}

impl<W: TraceWriter> SimObserver for TraceObserver<W> {
    fn on_arrival(&mut self, tick: Tick, agent: AgentId, cell: CellCoord, _reaction: ArrivalReaction) {
        self.event(tick, agent, "arrived", Some(cell));
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId, _replans: u32) {
        self.event(tick, agent, "stuck", None);
    }

    fn on_abandoned(&mut self, tick: Tick, agent: AgentId, cell: Option<CellCoord>) {
        self.event(tick, agent, "abandoned", cell);
    }

    fn on_group_arrived(&mut self, tick: Tick, _group: GroupId, members: &[AgentId]) {
        for &agent in members {
            self.event(tick, agent, "group_arrived", None);
        }
    }

    fn on_snapshot(&mut self, tick: Tick, mobility: &MobilityStore) {
        let rows: Vec<PositionRow> = mobility
            .iter()
            .map(|(agent, state)| PositionRow {
                tick:  tick.0,
                agent: agent.0,
                x:     state.sim_pos.x,
                y:     state.sim_pos.y,
                phase: state.phase.as_str(),
            })
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_positions(&rows);
            self.store_err(result);
        }
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
