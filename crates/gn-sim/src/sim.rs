//! `NavSim`: owns the grid, registry, arbiter and movement engine.

use gn_agent::{AgentRecord, AgentRegistry};
use gn_core::{AgentId, CategoryHooks, CellCoord, FixedStep, Tick, UnitCategory, WorldPoint};
use gn_grid::{Grid, Pathfinder};
use gn_mobility::{MovementEngine, MovementEvent, TickSummary};
use gn_reserve::ReservationArbiter;
use tracing::debug;

use crate::group::GroupTracker;
use crate::{GroupId, NavConfig, SimError, SimObserver, SimResult};

/// The movement core.  Build with [`SimBuilder`](crate::SimBuilder).
///
/// # Tick order
///
/// 1. `observer.on_tick_start`
/// 2. **Movement pass**: every agent in ascending id order (path following,
///    separation, stuck recovery, arrival).
/// 3. **Events**: the queued movement events go to the observer and the
///    group tracker; finished groups fire `on_group_arrived`.
/// 4. **Cleanup**: reservations whose owner is no longer tracked are purged.
/// 5. `observer.on_tick_end`, then `on_snapshot` on snapshot ticks.
///
/// All mutation happens on the caller's thread; nothing here samples real
/// time.  Drive it with [`tick`](Self::tick) directly or with
/// [`advance`](Self::advance) from a frame loop.
pub struct NavSim<P: Pathfinder> {
    pub config:   NavConfig,
    pub grid:     Grid,
    pub registry: AgentRegistry,
    pub arbiter:  ReservationArbiter,
    pub movement: MovementEngine<P>,
    /// Frame-time accumulator used by `advance`.
    pub clock:    FixedStep,
    pub(crate) groups: GroupTracker,
    pub(crate) tick:   Tick,
}

impl<P: Pathfinder> NavSim<P> {
    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Register an agent of `category` at its default speed, idle at
    /// `position`.
    pub fn spawn(&mut self, category: UnitCategory, position: WorldPoint) -> SimResult<AgentId> {
        self.spawn_with_speed(category, position, category.default_speed())
    }

    /// Like [`spawn`](Self::spawn) with an explicit speed in cells per
    /// second.  Non-finite or negative speeds fall back to the category
    /// default.
    pub fn spawn_with_speed(&mut self, category: UnitCategory, position: WorldPoint, speed: f32) -> SimResult<AgentId> {
        let id = self.registry.activate(category, speed);
        let speed = self.registry.get(id).map_or(speed, |r| r.speed);
        if let Err(e) = self.movement.add_agent(id, position, speed) {
            self.registry.deactivate(id);
            return Err(e.into());
        }
        debug!(agent = %id, %category, %position, "spawned");
        Ok(id)
    }

    /// Spawn at the center of the nearest walkable cell to `near` that no
    /// other agent covers.
    ///
    /// # Errors
    ///
    /// [`SimError::NoFreeCell`] when nothing within the maximum search
    /// radius qualifies.
    pub fn spawn_near(&mut self, category: UnitCategory, near: CellCoord) -> SimResult<AgentId> {
        let near = self.grid.clamp(near);
        let max_radius = self.arbiter.config().max_search_radius;
        let cell = (0..=max_radius)
            .flat_map(|r| near.ring(r))
            .find(|&c| {
                self.grid.is_walkable(c)
                    && !self.arbiter.is_occupied_by_other(&self.grid, &self.movement.store, c, AgentId::INVALID)
            })
            .ok_or(SimError::NoFreeCell { near })?;
        let position = self.grid.cell_center(cell);
        self.spawn(category, position)
    }

    /// Remove an agent and everything it holds.
    pub fn despawn(&mut self, agent: AgentId) -> SimResult<AgentRecord> {
        let record = self.registry.deactivate(agent).ok_or(SimError::UnknownAgent(agent))?;
        self.movement.remove_agent(agent);
        self.arbiter.forget(agent);
        self.groups.leave(agent);
        debug!(%agent, "despawned");
        Ok(record)
    }

    /// Change an agent's speed.  Invalid speeds fall back to its category
    /// default.
    pub fn set_speed(&mut self, agent: AgentId, speed: f32) -> SimResult<()> {
        self.require_active(agent)?;
        self.registry.set_speed(agent, speed);
        let speed = self.registry.get(agent).map_or(speed, |r| r.speed);
        if let Some(state) = self.movement.store.get_mut(agent) {
            state.speed = speed;
        }
        Ok(())
    }

    // ── Order control ─────────────────────────────────────────────────────

    /// Cancel the agent's order and give up its reservation, held or not.
    pub fn stop(&mut self, agent: AgentId) -> SimResult<()> {
        self.require_active(agent)?;
        self.groups.leave(agent);
        self.movement.stop(&mut self.arbiter, agent)?;
        Ok(())
    }

    /// Drop the hold on the agent's reservation.  Released now if the agent
    /// has already arrived, otherwise on arrival.
    pub fn release_hold(&mut self, agent: AgentId) -> SimResult<()> {
        self.require_active(agent)?;
        self.movement.release_hold(&mut self.arbiter, agent)?;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn is_active(&self, agent: AgentId) -> bool {
        self.registry.is_active(agent)
    }

    pub fn has_path(&self, agent: AgentId) -> bool {
        self.movement.has_path(agent)
    }

    pub fn is_idle(&self, agent: AgentId) -> bool {
        self.movement.is_idle(agent)
    }

    pub fn reserved_cell(&self, agent: AgentId) -> Option<CellCoord> {
        self.arbiter.reserved_cell(agent)
    }

    /// Current simulated position.
    pub fn position(&self, agent: AgentId) -> Option<WorldPoint> {
        self.movement.store.get(agent).map(|s| s.sim_pos)
    }

    /// Waypoints the agent has not reached yet; empty when idle or unknown.
    pub fn waypoints(&self, agent: AgentId) -> &[WorldPoint] {
        self.movement.store.get(agent).map(|s| s.remaining_waypoints()).unwrap_or(&[])
    }

    /// Position to draw, `alpha` of the way from the previous tick's
    /// position to the current one.
    pub fn render_position(&self, agent: AgentId, alpha: f32) -> Option<WorldPoint> {
        self.movement.render_position(agent, alpha)
    }

    /// Interpolation fraction left over by the last [`advance`](Self::advance).
    pub fn alpha(&self) -> f32 {
        self.clock.alpha()
    }

    pub fn group_of(&self, agent: AgentId) -> Option<GroupId> {
        self.groups.group_of(agent)
    }

    /// Members of a group order still in flight.
    pub fn group_members(&self, group: GroupId) -> Option<Vec<AgentId>> {
        self.groups.members(group)
    }

    /// Number of group orders still in flight.
    pub fn active_groups(&self) -> usize {
        self.groups.len()
    }

    // ── World edits ───────────────────────────────────────────────────────

    /// Mark a building footprint centered on `origin` unwalkable.  Paths
    /// crossing it are replanned on the next tick.  Returns the number of
    /// cells that changed.
    pub fn occupy_footprint(&mut self, origin: CellCoord, size: (i32, i32)) -> usize {
        self.grid.occupy_footprint(origin, size)
    }

    /// Make a footprint walkable again.  Returns the number of cells that
    /// changed.
    pub fn free_footprint(&mut self, origin: CellCoord, size: (i32, i32)) -> usize {
        self.grid.free_footprint(origin, size)
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run one fixed step.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> TickSummary {
        let now = self.tick;
        observer.on_tick_start(now);

        let summary = self.movement.tick(&self.grid, &mut self.arbiter, self.clock.dt());
        self.dispatch_events(now, observer);

        let purged = self.arbiter.purge_absent(&self.movement.store);
        if purged > 0 {
            debug!(tick = %now, purged, "purged reservations of untracked agents");
        }

        observer.on_tick_end(now, summary.moving);
        let every = self.config.snapshot_interval_ticks;
        if every > 0 && now.0 % every == 0 {
            observer.on_snapshot(now, &self.movement.store);
        }
        self.tick = now + 1;
        summary
    }

    /// Run `n` ticks, then call `on_run_end`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> TickSummary {
        let mut total = TickSummary::default();
        for _ in 0..n {
            let s = self.tick(observer);
            total.moving = s.moving;
            total.arrived += s.arrived;
            total.replans += s.replans;
            total.abandoned += s.abandoned;
        }
        observer.on_run_end(self.tick);
        total
    }

    /// Feed one frame's elapsed seconds and run every tick that became due.
    /// Returns how many ticks ran; [`alpha`](Self::alpha) is then ready for
    /// rendering.
    pub fn advance<O: SimObserver>(&mut self, frame_secs: f32, observer: &mut O) -> u32 {
        let due = self.clock.push_frame(frame_secs);
        for _ in 0..due {
            self.tick(observer);
        }
        due
    }

    // ── Internals ─────────────────────────────────────────────────────────

    pub(crate) fn require_active(&self, agent: AgentId) -> SimResult<()> {
        if self.registry.is_active(agent) {
            Ok(())
        } else {
            Err(SimError::UnknownAgent(agent))
        }
    }

    fn dispatch_events<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        for event in self.movement.drain_events() {
            match event {
                MovementEvent::Arrived { agent, cell } => {
                    let Some(record) = self.registry.get(agent) else { continue };
                    observer.on_arrival(now, agent, cell, record.category.arrival_reaction());
                    self.groups.mark_arrived(agent, cell);
                }
                MovementEvent::Stuck { agent, replans } => {
                    observer.on_stuck(now, agent, replans);
                }
                MovementEvent::Abandoned { agent, cell } => {
                    observer.on_abandoned(now, agent, cell);
                    if self.groups.leave(agent).is_some() {
                        // Leaving the formation drops the hold.
                        self.drop_hold(agent);
                    }
                }
            }
        }

        for group in self.groups.take_completed() {
            if group.release_holds {
                for &agent in &group.members {
                    self.drop_hold(agent);
                }
            }
            debug!(group = %group.id, members = group.members.len(), "group arrived");
            observer.on_group_arrived(now, group.id, &group.members);
        }
    }

    /// Release a hold kept for a group.  Despawning already removes an agent
    /// from its group, so a failure here points at a bookkeeping bug.
    fn drop_hold(&mut self, agent: AgentId) {
        if let Err(error) = self.movement.release_hold(&mut self.arbiter, agent) {
            debug!(%agent, %error, "hold not released");
        }
    }
}
