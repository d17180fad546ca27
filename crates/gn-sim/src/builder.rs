//! Fluent builder for constructing a [`NavSim`].

use gn_agent::AgentRegistry;
use gn_core::{Tick, UnitCategory, WorldPoint};
use gn_grid::{Grid, Pathfinder};
use gn_mobility::MovementEngine;
use gn_reserve::ReservationArbiter;

use crate::group::GroupTracker;
use crate::{NavConfig, NavSim, SimResult};

/// Fluent builder for [`NavSim<P>`].
///
/// # Required inputs
///
/// - [`NavConfig`]: tick length, seed, movement and reservation tuning
/// - [`Grid`]: from [`gn_grid::GridBuilder`]
/// - `P: Pathfinder`: the search (e.g. [`gn_grid::AStarPathfinder`])
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default           |
/// |--------------------|-------------------|
/// | `.agent(c, p)`     | No agents         |
/// | `.agents(v)`       | No agents         |
/// | `.start_tick(t)`   | `Tick(0)`         |
///
/// Initial agents get ids in the order they were added.
///
/// # Example
///
/// ```rust,ignore
/// let grid = GridBuilder::new(32, 32, 1.0).build_open()?;
/// let pathfinder = AStarPathfinder::for_grid(&grid);
/// let mut sim = SimBuilder::new(NavConfig::default(), grid, pathfinder)
///     .agent(UnitCategory::Leader, WorldPoint::new(1.5, 1.5))
///     .build()?;
/// sim.run_ticks(100, &mut NoopObserver);
/// ```
pub struct SimBuilder<P: Pathfinder> {
    config:     NavConfig,
    grid:       Grid,
    pathfinder: P,
    agents:     Vec<(UnitCategory, WorldPoint)>,
    start_tick: Tick,
}

impl<P: Pathfinder> SimBuilder<P> {
    /// Create a builder with all required inputs.
    pub fn new(config: NavConfig, grid: Grid, pathfinder: P) -> Self {
        Self {
            config,
            grid,
            pathfinder,
            agents:     Vec::new(),
            start_tick: Tick(0),
        }
    }

    /// Spawn one agent at its category's default speed.
    pub fn agent(mut self, category: UnitCategory, position: WorldPoint) -> Self {
        self.agents.push((category, position));
        self
    }

    pub fn agents(mut self, agents: impl IntoIterator<Item = (UnitCategory, WorldPoint)>) -> Self {
        self.agents.extend(agents);
        self
    }

    pub fn start_tick(mut self, tick: Tick) -> Self {
        self.start_tick = tick;
        self
    }

    /// Validate the configuration and assemble the simulation.
    ///
    /// # Errors
    ///
    /// Any [`NavConfig::validate`] failure.
    pub fn build(self) -> SimResult<NavSim<P>> {
        self.config.validate()?;
        let clock = self.config.clock()?;
        let arbiter = ReservationArbiter::new(self.config.reservation.clone())?;
        let movement = MovementEngine::new(self.pathfinder, self.config.movement.clone(), self.config.seed)?;

        let mut sim = NavSim {
            config: self.config,
            grid: self.grid,
            registry: AgentRegistry::new(),
            arbiter,
            movement,
            clock,
            groups: GroupTracker::default(),
            tick: self.start_tick,
        };
        for (category, position) in self.agents {
            sim.spawn(category, position)?;
        }
        Ok(sim)
    }
}
