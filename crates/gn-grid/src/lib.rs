//! `gn-grid`: walkability grid, priority queue, and A* pathfinding.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`grid`]       | `Grid`, `Cell`, `GridBuilder`, footprint edits            |
//! | [`heap`]       | `IndexedHeap`: binary min-heap with O(1) membership and in-place key updates |
//! | [`pathfinder`] | `Pathfinder` trait, `PathRequest`, `Path`, `AStarPathfinder` |
//! | [`error`]      | `GridError`, `GridResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod grid;
pub mod heap;
pub mod pathfinder;

#[cfg(test)]
mod tests;

pub use error::{GridError, GridResult};
pub use grid::{Cell, Grid, GridBuilder};
pub use heap::IndexedHeap;
pub use pathfinder::{AStarPathfinder, Path, PathRequest, Pathfinder, SearchStats};
