//! Order issuance: the reservation fallback chain and formation allocation.
//!
//! # Single orders
//!
//! ```text
//! request_destination(agent, target, hold)
//!   ① reserve the (clamped) target cell itself, if walkable
//!   ② find_and_reserve_best around it, radius r, 2r, 4r … ≤ max
//!   ③ ConflictFallback::MoveUnreserved → move to the target unreserved
//!      ConflictFallback::Abandon        → Rejected, agent untouched
//! ```
//!
//! # Group orders
//!
//! Members are sorted by category priority, then id.  Candidate cells come
//! from square rings around the target, nearest ring first; each member
//! takes the next candidate it can reserve.  Every member moves with its
//! hold flag set so arrived members keep their cells while the rest are
//! still walking.

use gn_core::{AgentId, CellCoord};
use gn_grid::{GridError, Pathfinder};
use gn_mobility::{Destination, MobilityError};
use gn_reserve::ConflictFallback;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{GroupOrder, NavSim, SimError, SimResult};

/// What happened to an order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OrderOutcome {
    /// A path to `cell` was installed.  `reserved` is false when the
    /// fallback sent the agent without a claim.
    Moving { cell: CellCoord, reserved: bool },
    /// The agent already stood in `cell`; arrival fires on the next tick.
    ArrivedImmediately { cell: CellCoord },
    Rejected(RejectReason),
}

impl OrderOutcome {
    /// The cell the agent was sent to, unless rejected.
    pub fn cell(&self) -> Option<CellCoord> {
        match *self {
            OrderOutcome::Moving { cell, .. } | OrderOutcome::ArrivedImmediately { cell } => Some(cell),
            OrderOutcome::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, OrderOutcome::Rejected(_))
    }
}

/// Why an order was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No reservable cell near the target and the fallback is `Abandon`.
    NoFreeCell,
    /// The chosen cell is not walkable.
    GoalBlocked,
    /// No path from the agent to the chosen cell.
    Unreachable,
}

impl<P: Pathfinder> NavSim<P> {
    /// Send one agent toward `target`.
    ///
    /// Out-of-bounds targets are clamped onto the grid.  With `hold` set the
    /// reservation survives arrival until [`release_hold`](Self::release_hold).
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownAgent`] when `agent` is not active.  Everything
    /// else is reported through [`OrderOutcome::Rejected`].
    pub fn request_destination(&mut self, agent: AgentId, target: CellCoord, hold: bool) -> SimResult<OrderOutcome> {
        self.require_active(agent)?;
        self.groups.leave(agent);
        let target = self.grid.clamp(target);

        if let Some(cell) = self.claim_near(agent, target) {
            return self.install(agent, cell, hold, true);
        }

        match self.arbiter.config().fallback {
            ConflictFallback::MoveUnreserved => {
                debug!(%agent, %target, "no reservable cell; moving unreserved");
                self.arbiter.release(agent);
                self.arbiter.note_assignment(agent, target);
                self.install(agent, target, hold, false)
            }
            ConflictFallback::Abandon => {
                warn!(%agent, %target, "order abandoned: no reservable cell");
                Ok(OrderOutcome::Rejected(RejectReason::NoFreeCell))
            }
        }
    }

    /// Move `agents` as a formation around `target`.
    ///
    /// Inactive and duplicate ids are ignored.  When every accepted member
    /// has arrived, [`SimObserver::on_group_arrived`](crate::SimObserver::on_group_arrived)
    /// fires and, if `release_on_completion` is set, all holds are dropped.
    ///
    /// # Errors
    ///
    /// [`SimError::EmptyGroup`] when no listed agent is active.
    pub fn issue_group_order(
        &mut self,
        agents: &[AgentId],
        target: CellCoord,
        release_on_completion: bool,
    ) -> SimResult<GroupOrder> {
        let mut members: Vec<(u8, AgentId)> = agents
            .iter()
            .filter_map(|&a| self.registry.get(a).map(|r| (r.category.priority(), a)))
            .collect();
        members.sort_unstable();
        members.dedup();
        if members.is_empty() {
            return Err(SimError::EmptyGroup);
        }
        let target = self.grid.clamp(target);

        // Members' old claims must not block their own formation.
        for &(_, agent) in &members {
            self.groups.leave(agent);
            self.arbiter.release(agent);
            self.arbiter.clear_assignment(agent);
        }

        let max_radius = self.arbiter.config().max_search_radius;
        let candidates: Vec<CellCoord> = (0..=max_radius)
            .flat_map(|r| target.ring(r))
            .filter(|&c| self.grid.is_walkable(c))
            .collect();
        let mut cursor = 0;

        let mut assignments = Vec::with_capacity(members.len());
        let mut slots = Vec::with_capacity(members.len());
        for &(_, agent) in &members {
            let mut claimed = None;
            while cursor < candidates.len() {
                let cell = candidates[cursor];
                cursor += 1;
                if self.arbiter.reserve(&self.grid, &self.movement.store, cell, agent) {
                    claimed = Some(cell);
                    break;
                }
            }

            let outcome = match (claimed, self.arbiter.config().fallback) {
                (Some(cell), _) => self.install(agent, cell, true, true)?,
                (None, ConflictFallback::MoveUnreserved) => {
                    self.arbiter.note_assignment(agent, target);
                    self.install(agent, target, true, false)?
                }
                (None, ConflictFallback::Abandon) => OrderOutcome::Rejected(RejectReason::NoFreeCell),
            };
            match outcome.cell() {
                Some(cell) => slots.push((agent, cell)),
                None => self.movement.stop(&mut self.arbiter, agent)?,
            }
            assignments.push((agent, outcome));
        }

        let group = if slots.is_empty() {
            warn!(%target, members = members.len(), "group order rejected for every member");
            None
        } else {
            let id = self.groups.open(slots, release_on_completion);
            debug!(group = %id, %target, members = assignments.len(), "group order issued");
            Some(id)
        };
        Ok(GroupOrder { group, assignments })
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Steps ① and ② of the fallback chain.
    fn claim_near(&mut self, agent: AgentId, target: CellCoord) -> Option<CellCoord> {
        if self.grid.is_walkable(target)
            && self.arbiter.reserve(&self.grid, &self.movement.store, target, agent)
        {
            return Some(target);
        }
        debug!(%agent, %target, "target taken; searching nearby");
        let radii = self.arbiter.config().radius_schedule();
        for radius in radii {
            let found = self
                .arbiter
                .find_and_reserve_best(&self.grid, &self.movement.store, target, agent, radius);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Plan and install the path.  Planning failures give the claim back.
    fn install(&mut self, agent: AgentId, cell: CellCoord, hold: bool, reserved: bool) -> SimResult<OrderOutcome> {
        match self.movement.set_destination(&self.grid, &mut self.arbiter, agent, cell, hold) {
            Ok(Destination::Following { .. }) => Ok(OrderOutcome::Moving { cell, reserved }),
            Ok(Destination::AlreadyThere) => Ok(OrderOutcome::ArrivedImmediately { cell }),
            Err(MobilityError::Path(e)) => {
                self.arbiter.release(agent);
                self.arbiter.clear_assignment(agent);
                warn!(%agent, %cell, error = %e, "order rejected");
                let reason = match e {
                    GridError::GoalBlocked { .. } => RejectReason::GoalBlocked,
                    _ => RejectReason::Unreachable,
                };
                Ok(OrderOutcome::Rejected(reason))
            }
            Err(e) => Err(e.into()),
        }
    }
}
