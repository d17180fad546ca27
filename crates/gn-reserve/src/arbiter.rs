//! `ReservationArbiter`: the cell ⇄ agent table and its conflict rules.
//!
//! # Table invariants
//!
//! - a cell maps to at most one agent, an agent to at most one cell;
//! - `cells[c] == a` iff `agents[a] == c`.
//!
//! Every mutation removes the old pair before installing the new one, so a
//! call that bails out early never leaves a half entry behind.
//!
//! # Last-assigned cells
//!
//! Separately from the live table, the arbiter remembers the most recent
//! cell each agent was sent to.  It survives release on arrival (the agent is
//! standing there) and is replaced by the next assignment.

use std::fmt;

use gn_core::{AgentId, CellCoord, WorldPoint};
use gn_grid::Grid;
use tracing::debug;

use crate::occupancy::{probe_for, AgentPositions, OccupancyProbe};
use crate::{ReservationConfig, ReserveResult};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

pub struct ReservationArbiter {
    config:        ReservationConfig,
    probe:         Box<dyn OccupancyProbe>,
    cells:         Map<CellCoord, AgentId>,
    agents:        Map<AgentId, CellCoord>,
    last_assigned: Map<AgentId, CellCoord>,
}

impl fmt::Debug for ReservationArbiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReservationArbiter")
            .field("config", &self.config)
            .field("reservations", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl ReservationArbiter {
    /// Build an arbiter with the probe named by `config.occupancy`.
    pub fn new(config: ReservationConfig) -> ReserveResult<Self> {
        config.validate()?;
        let probe = probe_for(config.occupancy);
        Ok(Self::with_probe(config, probe))
    }

    /// Build an arbiter with a caller-supplied occupancy probe.
    pub fn with_probe(config: ReservationConfig, probe: Box<dyn OccupancyProbe>) -> Self {
        Self {
            config,
            probe,
            cells:         Map::default(),
            agents:        Map::default(),
            last_assigned: Map::default(),
        }
    }

    pub fn config(&self) -> &ReservationConfig {
        &self.config
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn owner_of(&self, cell: CellCoord) -> Option<AgentId> {
        self.cells.get(&cell).copied()
    }

    #[inline]
    pub fn reserved_cell(&self, agent: AgentId) -> Option<CellCoord> {
        self.agents.get(&agent).copied()
    }

    #[inline]
    pub fn last_assigned(&self, agent: AgentId) -> Option<CellCoord> {
        self.last_assigned.get(&agent).copied()
    }

    /// Number of live reservations.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Live `(cell, owner)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, AgentId)> + '_ {
        self.cells.iter().map(|(&c, &a)| (c, a))
    }

    /// `true` if a tracked agent other than `agent` physically covers `cell`
    /// through its reserved cell, its last-assigned cell, or its position.
    pub fn is_occupied_by_other<P>(&self, grid: &Grid, positions: &P, cell: CellCoord, agent: AgentId) -> bool
    where
        P: AgentPositions + ?Sized,
    {
        let mut occupied = false;
        positions.visit_positions(&mut |other, pos| {
            if occupied || other == agent {
                return;
            }
            occupied = self.reserved_cell(other) == Some(cell)
                || self.last_assigned(other) == Some(cell)
                || self.probe.covers(grid, pos, cell);
        });
        occupied
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Claim `cell` for `agent`.
    ///
    /// Fails when another tracked agent owns the cell or physically covers
    /// it, and for out-of-bounds cells.  A stale owner (not tracked) is
    /// purged first.  On success the agent's previous reservation is
    /// released.  Re-reserving a cell the agent already owns succeeds.
    pub fn reserve<P>(&mut self, grid: &Grid, positions: &P, cell: CellCoord, agent: AgentId) -> bool
    where
        P: AgentPositions + ?Sized,
    {
        if !grid.in_bounds(cell) {
            return false;
        }

        if let Some(owner) = self.owner_of(cell) {
            if owner == agent {
                self.last_assigned.insert(agent, cell);
                return true;
            }
            if positions.is_tracked(owner) {
                debug!(%agent, %owner, %cell, "reservation conflict");
                return false;
            }
            debug!(%owner, %cell, "purging reservation of absent agent");
            self.forget(owner);
        }

        if self.is_occupied_by_other(grid, positions, cell, agent) {
            debug!(%agent, %cell, "cell physically occupied");
            return false;
        }

        self.release(agent);
        self.cells.insert(cell, agent);
        self.agents.insert(agent, cell);
        self.last_assigned.insert(agent, cell);
        true
    }

    /// Drop `agent`'s reservation.  Returns the cell it held, if any.
    pub fn release(&mut self, agent: AgentId) -> Option<CellCoord> {
        let cell = self.agents.remove(&agent)?;
        if self.cells.get(&cell) == Some(&agent) {
            self.cells.remove(&cell);
        }
        Some(cell)
    }

    /// Record a destination that was not reserved (unreserved fallback move),
    /// so physical-occupancy checks still see it.
    pub fn note_assignment(&mut self, agent: AgentId, cell: CellCoord) {
        self.last_assigned.insert(agent, cell);
    }

    /// Forget the last-assigned cell without touching the reservation.
    pub fn clear_assignment(&mut self, agent: AgentId) {
        self.last_assigned.remove(&agent);
    }

    /// Release and clear everything about `agent` (agent destroyed).
    pub fn forget(&mut self, agent: AgentId) {
        self.release(agent);
        self.last_assigned.remove(&agent);
    }

    /// Drop every entry whose agent is no longer tracked.  Returns the
    /// number of reservations removed.
    pub fn purge_absent<P>(&mut self, positions: &P) -> usize
    where
        P: AgentPositions + ?Sized,
    {
        let stale: Vec<AgentId> = self
            .agents
            .keys()
            .copied()
            .filter(|&a| !positions.is_tracked(a))
            .collect();
        for &agent in &stale {
            self.forget(agent);
        }
        self.last_assigned.retain(|&a, _| positions.is_tracked(a));
        if !stale.is_empty() {
            debug!(count = stale.len(), "purged reservations of absent agents");
        }
        stale.len()
    }

    /// Reserve the best free cell within `radius` of `center`.
    ///
    /// Candidates are walkable, in-bounds, not reserved by another tracked
    /// agent and not physically occupied by one.  Each is scored
    /// `distance(agent, candidate) + path_bias * distance(center, candidate)`
    /// in world units; the lowest score wins, earliest in row-major scan
    /// order on ties.  Returns `None` if nothing qualifies.
    pub fn find_and_reserve_best<P>(
        &mut self,
        grid: &Grid,
        positions: &P,
        center: CellCoord,
        agent: AgentId,
        radius: i32,
    ) -> Option<CellCoord>
    where
        P: AgentPositions + ?Sized,
    {
        let center_point = grid.cell_center(center);
        let agent_point = positions.position_of(agent).unwrap_or(center_point);

        // One pass over positions instead of one per candidate.
        let mut others: Vec<(AgentId, WorldPoint)> = Vec::new();
        positions.visit_positions(&mut |other, pos| {
            if other != agent {
                others.push((other, pos));
            }
        });

        let r = radius.max(0);
        let mut best: Option<(f32, CellCoord)> = None;
        for dy in -r..=r {
            for dx in -r..=r {
                let cell = center.offset(dx, dy);
                if !grid.is_walkable(cell) {
                    continue;
                }
                if let Some(owner) = self.owner_of(cell) {
                    if owner != agent && positions.is_tracked(owner) {
                        continue;
                    }
                }
                if self.is_occupied_by_other(grid, others.as_slice(), cell, agent) {
                    continue;
                }

                let point = grid.cell_center(cell);
                let score = agent_point.distance(point) + self.config.path_bias * center_point.distance(point);
                if best.is_none_or(|(s, _)| score < s) {
                    best = Some((score, cell));
                }
            }
        }

        let (_, cell) = best?;
        if self.reserve(grid, positions, cell, agent) {
            Some(cell)
        } else {
            None
        }
    }
}
