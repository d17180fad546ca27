//! `gn-core`: foundational types for the `gridnav` movement core.
//!
//! This crate is a dependency of every other `gn-*` crate.  It intentionally
//! has no `gn-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `CellCoord`                                |
//! | [`geo`]         | `WorldPoint` (world-space 2-D vector)                 |
//! | [`time`]        | `Tick`, `FixedStep`                                   |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`category`]    | `UnitCategory`, `CategoryHooks`, `ArrivalReaction`    |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod category;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use category::{ArrivalReaction, CategoryHooks, UnitCategory};
pub use error::{CoreError, CoreResult};
pub use geo::WorldPoint;
pub use ids::{AgentId, CellCoord, DIAGONAL_COST, STRAIGHT_COST};
pub use rng::{AgentRng, SimRng};
pub use time::{FixedStep, Tick};
