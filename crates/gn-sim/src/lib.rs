//! `gn-sim`: orchestrator for the gridnav movement core.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`sim`]       | `NavSim`: spawn/despawn, queries, the tick loop            |
//! | [`orders`]    | `request_destination`, `issue_group_order`, `OrderOutcome`  |
//! | [`group`]     | `GroupId`, `GroupOrder`, group completion tracking          |
//! | [`builder`]   | `SimBuilder`                                                |
//! | [`observer`]  | `SimObserver`, `NoopObserver`                               |
//! | [`config`]    | `NavConfig` (TOML)                                          |
//! | [`error`]     | `SimError`, `SimResult<T>`                                  |
//!
//! # Tick loop
//!
//! ```text
//! frame → advance(frame_secs) → FixedStep::push_frame → n due ticks
//!
//! tick:
//!   ① Movement: MovementEngine::tick over all agents, ascending id
//!   ② Events  : drained queue → SimObserver + group tracker
//!   ③ Cleanup : purge reservations of untracked agents
//!   ④ Output  : on_tick_end, on_snapshot every N ticks
//!
//! render: NavSim::render_position(agent, sim.alpha())
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                           |
//! |-----------|--------------------------------------------------|
//! | `fx-hash` | FxHash maps in the reservation arbiter.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gn_core::{CellCoord, UnitCategory, WorldPoint};
//! use gn_grid::{AStarPathfinder, GridBuilder};
//! use gn_sim::{NavConfig, NoopObserver, SimBuilder};
//!
//! let grid = GridBuilder::new(64, 64, 1.0).build_open()?;
//! let pathfinder = AStarPathfinder::for_grid(&grid);
//! let mut sim = SimBuilder::new(NavConfig::default(), grid, pathfinder).build()?;
//! let scout = sim.spawn(UnitCategory::Cavalry, WorldPoint::new(0.5, 0.5))?;
//! sim.request_destination(scout, CellCoord::new(40, 12), false)?;
//! sim.run_ticks(200, &mut NoopObserver);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod group;
pub mod observer;
pub mod orders;
pub mod sim;


pub use builder::SimBuilder;
pub use config::NavConfig;
pub use error::{SimError, SimResult};
pub use group::{GroupId, GroupOrder};
pub use observer::{NoopObserver, SimObserver};
pub use orders::{OrderOutcome, RejectReason};
pub use sim::NavSim;
