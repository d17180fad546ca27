//! Simulation observer trait for event delivery and data collection.

use gn_core::{AgentId, ArrivalReaction, CellCoord, Tick};
use gn_mobility::MobilityStore;

use crate::GroupId;

/// Callbacks invoked by [`NavSim::tick`][crate::NavSim::tick].
///
/// Movement events are queued during the pass and delivered here after it
/// finishes, so an observer never sees a half-updated store.  All methods
/// have default no-op implementations.
///
/// # Example: arrival counter
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl SimObserver for Arrivals {
///     fn on_arrival(&mut self, _: Tick, _: AgentId, _: CellCoord, _: ArrivalReaction) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `moving` counts agents that were
    /// following a path or snapping when the pass started.
    fn on_tick_end(&mut self, _tick: Tick, _moving: usize) {}

    /// An agent snapped onto its goal.  `reaction` is what its category
    /// wants started next (e.g. villagers begin harvesting).
    fn on_arrival(&mut self, _tick: Tick, _agent: AgentId, _cell: CellCoord, _reaction: ArrivalReaction) {}

    /// An agent made no progress for the stuck window and replanned.
    fn on_stuck(&mut self, _tick: Tick, _agent: AgentId, _replans: u32) {}

    /// A replan failed; the agent stands idle.
    fn on_abandoned(&mut self, _tick: Tick, _agent: AgentId, _cell: Option<CellCoord>) {}

    /// Every remaining member of a group order has arrived.
    fn on_group_arrived(&mut self, _tick: Tick, _group: GroupId, _members: &[AgentId]) {}

    /// Called every `config.snapshot_interval_ticks` ticks with read-only
    /// access to all movement state.
    fn on_snapshot(&mut self, _tick: Tick, _mobility: &MobilityStore) {}

    /// Called once after the last tick of [`NavSim::run_ticks`][crate::NavSim::run_ticks].
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
