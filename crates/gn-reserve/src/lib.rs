//! `gn-reserve`: exclusive cell reservations.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`arbiter`]   | `ReservationArbiter`: reserve / release / find-and-reserve   |
//! | [`occupancy`] | `AgentPositions`, `OccupancyProbe`, `GridCellProbe`, `CollisionProbe` |
//! | [`config`]    | `ReservationConfig`, `OccupancyStrategy`, `ConflictFallback` |
//! | [`error`]     | `ReserveError`, `ReserveResult<T>`                           |
//!
//! # Two views of "taken"
//!
//! A cell can be unavailable to an agent for two independent reasons:
//!
//! 1. **Reserved**: the reservation table maps it to another live agent.
//! 2. **Physically occupied**: another tracked agent's reserved cell,
//!    last-assigned cell, or current simulated position lands on it.
//!
//! The second view catches agents that arrived and released their claim but
//! still stand on the cell, and agents in transit whose position already
//! overlaps it.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | Derives `Serialize`/`Deserialize` on the config types.   |
//! | `fx-hash` | Uses `FxHashMap` for the cell and agent tables.          |

pub mod arbiter;
pub mod config;
pub mod error;
pub mod occupancy;


pub use arbiter::ReservationArbiter;
pub use config::{ConflictFallback, OccupancyStrategy, ReservationConfig};
pub use error::{ReserveError, ReserveResult};
pub use occupancy::{AgentPositions, CollisionProbe, GridCellProbe, OccupancyProbe};
