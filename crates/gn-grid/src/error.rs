//! Grid-subsystem error type.

use thiserror::Error;

use gn_core::CellCoord;

/// Errors produced by `gn-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },

    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f32),

    #[error("goal cell {goal} is not walkable")]
    GoalBlocked { goal: CellCoord },

    #[error("no path from {from} to {to}")]
    Unreachable { from: CellCoord, to: CellCoord },
}

pub type GridResult<T> = Result<T, GridError>;
