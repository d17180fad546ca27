//! `MovementEngine`: destination orders and the fixed-step movement pass.

use gn_core::{AgentId, AgentRng, CellCoord, WorldPoint};
use gn_grid::{Grid, GridError, Path, PathRequest, Pathfinder};
use gn_reserve::ReservationArbiter;
use tracing::{debug, warn};

use crate::{
    MobilityResult, MobilityStore, MovementConfig, MovementEvent, MovementPhase,
    MovementState, NeighborIndex, TickSummary,
};

/// Result of installing a destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// A path was installed; the agent starts moving next tick.
    Following { waypoints: usize },
    /// The agent already stood in the target cell and was snapped onto it.
    AlreadyThere,
}

/// Owns every agent's movement state and drives it one tick at a time.
///
/// # Type parameter
///
/// `P` is the search used for orders and replans, usually
/// [`gn_grid::AStarPathfinder`].
pub struct MovementEngine<P: Pathfinder> {
    pub pathfinder: P,
    pub store:      MobilityStore,
    config:         MovementConfig,
    events:         Vec<MovementEvent>,
}

impl<P: Pathfinder> MovementEngine<P> {
    pub fn new(pathfinder: P, config: MovementConfig, seed: u64) -> MobilityResult<Self> {
        config.validate()?;
        Ok(Self {
            pathfinder,
            store: MobilityStore::new(seed),
            config,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start tracking `agent`, idle at `position`.
    pub fn add_agent(&mut self, agent: AgentId, position: WorldPoint, speed: f32) -> MobilityResult<()> {
        self.store.insert(agent, MovementState::idle_at(position, speed))
    }

    /// Stop tracking `agent`.  The caller also clears its reservation.
    pub fn remove_agent(&mut self, agent: AgentId) -> Option<MovementState> {
        self.store.remove(agent)
    }

    // ── Orders ────────────────────────────────────────────────────────────

    /// Plan a path from the agent's simulated position to the center of
    /// `cell` and install it, replacing any path in flight.
    ///
    /// The search may end on an unwalkable `cell` only when the agent holds
    /// the reservation on it.  When the agent already stands in `cell` it is
    /// snapped onto the center and arrival is handled at once.
    ///
    /// # Errors
    ///
    /// [`MobilityError::UnknownAgent`], or [`MobilityError::Path`] when the
    /// goal is blocked or unreachable.  The agent is then left idle.
    pub fn set_destination(
        &mut self,
        grid: &Grid,
        arbiter: &mut ReservationArbiter,
        agent: AgentId,
        cell: CellCoord,
        hold: bool,
    ) -> MobilityResult<Destination> {
        let goal = grid.cell_center(cell);
        let claimed = arbiter.reserved_cell(agent) == Some(cell);
        let state = self.store.require_mut(agent)?;

        let request = PathRequest::new(state.sim_pos, goal).claimed(claimed);
        let result = self.pathfinder.find_path(grid, &request);

        state.clear_path();
        state.target_cell = Some(cell);
        state.goal_point = Some(goal);
        state.hold = hold;
        state.replans = 0;

        match result {
            Ok(path) if path.is_trivial() => {
                state.sim_pos = goal;
                if !hold {
                    arbiter.release(agent);
                }
                self.events.push(MovementEvent::Arrived { agent, cell });
                debug!(%agent, %cell, "already at destination");
                Ok(Destination::AlreadyThere)
            }
            Ok(mut path) => {
                path.retarget_final(goal);
                let waypoints = path.len();
                state.checked_revision = path.revision;
                state.path = Some(path);
                state.phase = MovementPhase::FollowingPath;
                debug!(%agent, %cell, waypoints, "path installed");
                Ok(Destination::Following { waypoints })
            }
            Err(e) => {
                state.target_cell = None;
                state.goal_point = None;
                Err(e.into())
            }
        }
    }

    /// Cancel the current order: drop the path, release the reservation and
    /// forget the assignment.
    pub fn stop(&mut self, arbiter: &mut ReservationArbiter, agent: AgentId) -> MobilityResult<()> {
        let state = self.store.require_mut(agent)?;
        state.clear_path();
        state.target_cell = None;
        state.goal_point = None;
        state.hold = false;
        arbiter.release(agent);
        arbiter.clear_assignment(agent);
        Ok(())
    }

    /// Clear the hold flag.  An agent that has already arrived gives its
    /// reservation up now; one still moving gives it up on arrival.
    pub fn release_hold(&mut self, arbiter: &mut ReservationArbiter, agent: AgentId) -> MobilityResult<()> {
        let state = self.store.require_mut(agent)?;
        state.hold = false;
        if state.is_idle() {
            arbiter.release(agent);
        }
        Ok(())
    }

    pub fn has_path(&self, agent: AgentId) -> bool {
        self.store.get(agent).is_some_and(MovementState::has_path)
    }

    pub fn is_idle(&self, agent: AgentId) -> bool {
        self.store.get(agent).is_some_and(MovementState::is_idle)
    }

    pub fn render_position(&self, agent: AgentId, alpha: f32) -> Option<WorldPoint> {
        self.store.render_position(agent, alpha)
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<MovementEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance every agent by `dt` seconds, in ascending id order.
    ///
    /// Reservation changes made for one agent (release on arrival or on
    /// abandonment) are visible to the agents processed after it.
    pub fn tick(&mut self, grid: &Grid, arbiter: &mut ReservationArbiter, dt: f32) -> TickSummary {
        let neighbors = NeighborIndex::from_store(&self.store);
        let Self { pathfinder, store, config, events } = self;

        let mut pass = Pass {
            grid,
            arbiter,
            pathfinder,
            config,
            neighbors: &neighbors,
            events,
            dt,
            summary: TickSummary::default(),
        };

        for (i, (slot, rng)) in store.states.iter_mut().zip(store.rngs.iter_mut()).enumerate() {
            let (Some(state), Some(rng)) = (slot.as_mut(), rng.as_mut()) else { continue };
            pass.advance(AgentId(i as u32), state, rng);
        }
        pass.summary
    }
}

// ── Movement pass ─────────────────────────────────────────────────────────────

struct Pass<'a, P: Pathfinder> {
    grid:       &'a Grid,
    arbiter:    &'a mut ReservationArbiter,
    pathfinder: &'a mut P,
    config:     &'a MovementConfig,
    neighbors:  &'a NeighborIndex,
    events:     &'a mut Vec<MovementEvent>,
    dt:         f32,
    summary:    TickSummary,
}

impl<P: Pathfinder> Pass<'_, P> {
    fn advance(&mut self, agent: AgentId, state: &mut MovementState, rng: &mut AgentRng) {
        state.prev_pos = state.sim_pos;
        match state.phase {
            MovementPhase::Idle => state.stuck_timer = 0.0,
            MovementPhase::SmoothSnapping { from, to, elapsed, duration } => {
                self.summary.moving += 1;
                let elapsed = elapsed + self.dt;
                let t = if duration <= 0.0 { 1.0 } else { (elapsed / duration).min(1.0) };
                state.sim_pos = from.lerp(to, t);
                if t >= 1.0 {
                    self.finish_arrival(agent, state);
                } else {
                    state.phase = MovementPhase::SmoothSnapping { from, to, elapsed, duration };
                }
            }
            MovementPhase::FollowingPath => {
                self.summary.moving += 1;
                self.follow(agent, state, rng);
            }
        }
    }

    fn follow(&mut self, agent: AgentId, state: &mut MovementState, rng: &mut AgentRng) {
        let cell = self.grid.cell_size();

        if state.checked_revision != self.grid.revision() {
            if self.path_blocked(agent, state) {
                debug!(%agent, "path crosses newly blocked cells, replanning");
                self.summary.replans += 1;
                state.replans += 1;
                if !self.replan(agent, state) {
                    return;
                }
            }
            state.checked_revision = self.grid.revision();
        }

        let Some(target) = state.current_waypoint() else {
            self.begin_snap(agent, state);
            return;
        };
        let goal = state.goal_point.unwrap_or(target);
        let pos = state.sim_pos;

        // Seek.
        let to_target = target - pos;
        let dist = to_target.length();
        let step = state.speed * cell * self.dt;
        let seek = if dist > 0.0 { to_target.normalized() * step.min(dist) } else { WorldPoint::ZERO };

        // Separate, except on the final approach.
        let push = if pos.distance(goal) > self.config.separation_goal_cutoff * cell {
            self.neighbors.separation(agent, pos, self.config.separation_radius * cell, rng)
        } else {
            WorldPoint::ZERO
        };

        let mut next = pos + seek + push * (self.config.separation_strength * step);
        if push != WorldPoint::ZERO && !self.can_stand(agent, state, next) {
            next = pos + seek;
        }
        state.sim_pos = next;

        if next.distance(target) <= self.config.acceptance_radius * cell {
            state.cursor += 1;
            if state.current_waypoint().is_none() {
                self.begin_snap(agent, state);
                return;
            }
        }

        // Stuck detection.
        if state.sim_pos.distance(state.prev_pos) < self.config.stuck_threshold * cell {
            state.stuck_timer += self.dt;
        } else {
            state.stuck_timer = 0.0;
        }
        if state.stuck_timer > self.config.stuck_window_secs
            && state.sim_pos.distance(goal) > self.config.stuck_min_goal_distance * cell
        {
            state.stuck_timer = 0.0;
            state.replans += 1;
            self.summary.replans += 1;
            debug!(%agent, replans = state.replans, "stuck, replanning");
            self.events.push(MovementEvent::Stuck { agent, replans: state.replans });
            self.replan(agent, state);
        }
    }

    /// A remaining waypoint cell turned unwalkable.  The goal cell is exempt
    /// while the agent holds its reservation.
    fn path_blocked(&self, agent: AgentId, state: &MovementState) -> bool {
        let Some(path) = &state.path else { return false };
        let claimed = state.target_cell.is_some() && self.arbiter.reserved_cell(agent) == state.target_cell;
        let last = path.cells.len().saturating_sub(1);
        path.cells
            .iter()
            .enumerate()
            .skip(state.cursor)
            .any(|(i, &c)| !self.grid.is_walkable(c) && !(claimed && i == last))
    }

    /// `point` is inside the grid on a walkable cell, or on the agent's own
    /// claimed goal cell.
    fn can_stand(&self, agent: AgentId, state: &MovementState, point: WorldPoint) -> bool {
        if !self.grid.contains_point(point) {
            return false;
        }
        let c = self.grid.world_to_coord(point);
        self.grid.is_walkable(c)
            || (state.target_cell == Some(c) && self.arbiter.reserved_cell(agent) == Some(c))
    }

    /// Plan again from the current position to the unchanged goal.  Returns
    /// `true` if the agent keeps following a path.
    fn replan(&mut self, agent: AgentId, state: &mut MovementState) -> bool {
        let Some(goal) = state.goal_point else {
            self.abandon(agent, state, None);
            return false;
        };
        let claimed = state.target_cell.is_some() && self.arbiter.reserved_cell(agent) == state.target_cell;
        let request = PathRequest::new(state.sim_pos, goal).claimed(claimed);

        match self.pathfinder.find_path(self.grid, &request) {
            Ok(path) if path.is_trivial() => {
                self.begin_snap(agent, state);
                false
            }
            Ok(mut path) => {
                path.retarget_final(goal);
                state.cursor = nearest_waypoint(&path, state.sim_pos);
                state.checked_revision = path.revision;
                state.path = Some(path);
                state.phase = MovementPhase::FollowingPath;
                true
            }
            Err(e) => {
                self.abandon(agent, state, Some(e));
                false
            }
        }
    }

    fn begin_snap(&mut self, agent: AgentId, state: &mut MovementState) {
        let to = state.goal_point.unwrap_or(state.sim_pos);
        let duration = self.config.snap_duration_secs;
        if duration <= 0.0 {
            state.sim_pos = to;
            self.finish_arrival(agent, state);
        } else {
            state.phase = MovementPhase::SmoothSnapping { from: state.sim_pos, to, elapsed: 0.0, duration };
        }
    }

    fn finish_arrival(&mut self, agent: AgentId, state: &mut MovementState) {
        state.clear_path();
        let cell = state.target_cell.unwrap_or_else(|| self.grid.world_to_coord(state.sim_pos));
        if !state.hold {
            self.arbiter.release(agent);
        }
        self.summary.arrived += 1;
        debug!(%agent, %cell, hold = state.hold, "arrived");
        self.events.push(MovementEvent::Arrived { agent, cell });
    }

    fn abandon(&mut self, agent: AgentId, state: &mut MovementState, error: Option<GridError>) {
        state.clear_path();
        let cell = state.target_cell;
        if !state.hold {
            self.arbiter.release(agent);
            self.arbiter.clear_assignment(agent);
        }
        self.summary.abandoned += 1;
        match error {
            Some(e) => warn!(%agent, error = %e, "replan failed, agent idle"),
            None => warn!(%agent, "no goal to replan toward, agent idle"),
        }
        self.events.push(MovementEvent::Abandoned { agent, cell });
    }
}

/// Index of the waypoint closest to `pos`, earliest on ties.  The path was
/// planned from `pos`, so nothing before it is ground already covered.
fn nearest_waypoint(path: &Path, pos: WorldPoint) -> usize {
    let mut best = (f32::INFINITY, 0);
    for (i, wp) in path.waypoints.iter().enumerate() {
        let d = (*wp - pos).length_squared();
        if d < best.0 {
            best = (d, i);
        }
    }
    best.1
}

