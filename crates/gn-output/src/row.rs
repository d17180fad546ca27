//! Plain data rows written by trace backends.

/// One agent's simulated position at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRow {
    pub tick:  u64,
    pub agent: u32,
    pub x:     f32,
    pub y:     f32,
    /// `MovementPhase::as_str` of the agent.
    pub phase: &'static str,
}

/// One movement event.  `cell_*` are empty when the event has no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRow {
    pub tick:   u64,
    pub agent:  u32,
    /// `arrived`, `stuck`, `abandoned` or `group_arrived`.
    pub event:  &'static str,
    pub cell_x: Option<i32>,
    pub cell_y: Option<i32>,
}
