//! `gn-mobility`: per-agent movement along grid paths.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`state`]      | `MovementPhase`, `MovementState`: per-agent movement state      |
//! | [`store`]      | `MobilityStore`: dense state table + per-agent RNGs             |
//! | [`separation`] | `NeighborIndex`: R-tree over tick-start positions               |
//! | [`engine`]     | `MovementEngine<P>`: orders, the tick pass, arrival handling     |
//! | [`event`]      | `MovementEvent`, `TickSummary`                                   |
//! | [`config`]     | `MovementConfig`                                                 |
//! | [`error`]      | `MobilityError`, `MobilityResult<T>`                             |
//!
//! # Movement model (fixed-step path following)
//!
//! 1. `MovementEngine::set_destination` plans a path from the agent's
//!    simulated position to the center of the target cell and installs it.
//! 2. Each `MovementEngine::tick` moves every following agent toward its
//!    current waypoint by `speed × dt`, plus a separation push away from
//!    nearby agents.  Waypoints within the acceptance radius are consumed.
//! 3. Reaching the final waypoint snaps the agent onto the goal, releases the
//!    reservation unless it is held, and queues `MovementEvent::Arrived`.
//! 4. An agent that barely moves for longer than the stuck window replans
//!    from where it stands; a path crossing newly blocked cells replans at
//!    once.  A failed replan leaves the agent idle.
//!
//! Events are queued during the pass and drained by the caller afterwards,
//! so no callback ever runs while the pass holds the store.
//!
//! For rendering, [`MobilityStore::render_position`] blends the previous and
//! current simulated position; it never writes to simulation state.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod separation;
pub mod state;
pub mod store;


pub use config::MovementConfig;
pub use engine::{Destination, MovementEngine};
pub use error::{MobilityError, MobilityResult};
pub use event::{MovementEvent, TickSummary};
pub use separation::NeighborIndex;
pub use state::{MovementPhase, MovementState};
pub use store::MobilityStore;
