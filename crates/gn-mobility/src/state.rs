//! Per-agent movement state.

use gn_core::{CellCoord, WorldPoint};
use gn_grid::Path;

/// Where an agent is in its movement cycle.
///
/// Stuck recovery is not a separate phase: it is a replan performed while
/// `FollowingPath`.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementPhase {
    #[default]
    Idle,
    FollowingPath,
    /// Final approach tween from `from` to `to`.
    SmoothSnapping {
        from:     WorldPoint,
        to:       WorldPoint,
        elapsed:  f32,
        duration: f32,
    },
}

impl MovementPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementPhase::Idle => "idle",
            MovementPhase::FollowingPath => "following",
            MovementPhase::SmoothSnapping { .. } => "snapping",
        }
    }
}

/// Movement state of one agent.
///
/// `prev_pos` is the simulated position at the start of the latest tick;
/// render interpolation blends it with `sim_pos`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementState {
    pub sim_pos:          WorldPoint,
    pub prev_pos:         WorldPoint,
    pub phase:            MovementPhase,
    pub path:             Option<Path>,
    /// Index of the waypoint being approached.
    pub cursor:           usize,
    /// Cell of the current order.
    pub target_cell:      Option<CellCoord>,
    /// World point of the current order (center of `target_cell`).
    pub goal_point:       Option<WorldPoint>,
    /// Keep the reservation after arrival.
    pub hold:             bool,
    /// Seconds spent below the stuck threshold.
    pub stuck_timer:      f32,
    /// Cells per second.
    pub speed:            f32,
    /// Replans since the current order was issued.
    pub replans:          u32,
    /// Grid revision the remaining path was last validated against.
    pub checked_revision: u64,
}

impl MovementState {
    /// Idle agent standing at `pos`.
    pub fn idle_at(pos: WorldPoint, speed: f32) -> Self {
        Self {
            sim_pos:          pos,
            prev_pos:         pos,
            phase:            MovementPhase::Idle,
            path:             None,
            cursor:           0,
            target_cell:      None,
            goal_point:       None,
            hold:             false,
            stuck_timer:      0.0,
            speed,
            replans:          0,
            checked_revision: 0,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == MovementPhase::Idle
    }

    /// `true` while following a path (including the final snap).
    #[inline]
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    pub fn current_waypoint(&self) -> Option<WorldPoint> {
        self.path.as_ref()?.waypoints.get(self.cursor).copied()
    }

    /// Waypoints not yet reached.
    pub fn remaining_waypoints(&self) -> &[WorldPoint] {
        match &self.path {
            Some(path) => path.waypoints.get(self.cursor..).unwrap_or(&[]),
            None => &[],
        }
    }

    /// Drop the path and go idle in place.  Order bookkeeping (target, hold)
    /// is left for the caller.
    pub fn clear_path(&mut self) {
        self.phase = MovementPhase::Idle;
        self.path = None;
        self.cursor = 0;
        self.stuck_timer = 0.0;
    }

    /// Blend of previous and current simulated position.
    #[inline]
    pub fn render_position(&self, alpha: f32) -> WorldPoint {
        self.prev_pos.lerp(self.sim_pos, alpha)
    }
}
