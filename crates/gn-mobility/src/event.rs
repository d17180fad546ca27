//! Events produced by the movement pass.

use gn_core::{AgentId, CellCoord};

/// Something observers may react to.  Queued during the pass; the caller
/// drains the queue with [`MovementEngine::drain_events`](crate::MovementEngine::drain_events).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementEvent {
    /// The agent reached its final waypoint and snapped onto the goal.
    Arrived { agent: AgentId, cell: CellCoord },
    /// No progress for the stuck window; a replan was triggered.
    Stuck { agent: AgentId, replans: u32 },
    /// A replan failed; the agent is idle where it stands.
    Abandoned { agent: AgentId, cell: Option<CellCoord> },
}

impl MovementEvent {
    pub fn agent(&self) -> AgentId {
        match *self {
            MovementEvent::Arrived { agent, .. }
            | MovementEvent::Stuck { agent, .. }
            | MovementEvent::Abandoned { agent, .. } => agent,
        }
    }

    /// Target cell the event refers to, if any.
    pub fn cell(&self) -> Option<CellCoord> {
        match *self {
            MovementEvent::Arrived { cell, .. } => Some(cell),
            MovementEvent::Stuck { .. } => None,
            MovementEvent::Abandoned { cell, .. } => cell,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MovementEvent::Arrived { .. } => "arrived",
            MovementEvent::Stuck { .. } => "stuck",
            MovementEvent::Abandoned { .. } => "abandoned",
        }
    }
}

/// Counters for one tick pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Agents following a path or snapping at the start of the pass.
    pub moving:    usize,
    pub arrived:   usize,
    pub replans:   usize,
    pub abandoned: usize,
}
