//! Position sources and physical-occupancy probes.
//!
//! The arbiter never stores positions itself.  It reads them through
//! [`AgentPositions`] at call time, so a check made halfway through a
//! movement pass already sees the agents that moved earlier in that pass.

use gn_core::{AgentId, CellCoord, WorldPoint};
use gn_grid::Grid;

use crate::OccupancyStrategy;

// ── AgentPositions ────────────────────────────────────────────────────────────

/// Read access to the simulated position of every tracked agent.
///
/// "Tracked" means present in the external agent list.  Anything not visited
/// by [`visit_positions`](Self::visit_positions) is treated as absent.
pub trait AgentPositions {
    /// Call `f` once per tracked agent.
    fn visit_positions(&self, f: &mut dyn FnMut(AgentId, WorldPoint));

    fn position_of(&self, agent: AgentId) -> Option<WorldPoint>;

    fn is_tracked(&self, agent: AgentId) -> bool {
        self.position_of(agent).is_some()
    }
}

impl AgentPositions for [(AgentId, WorldPoint)] {
    fn visit_positions(&self, f: &mut dyn FnMut(AgentId, WorldPoint)) {
        for &(agent, pos) in self {
            f(agent, pos);
        }
    }

    fn position_of(&self, agent: AgentId) -> Option<WorldPoint> {
        self.iter().find(|(a, _)| *a == agent).map(|&(_, p)| p)
    }
}

impl AgentPositions for Vec<(AgentId, WorldPoint)> {
    fn visit_positions(&self, f: &mut dyn FnMut(AgentId, WorldPoint)) {
        self.as_slice().visit_positions(f)
    }

    fn position_of(&self, agent: AgentId) -> Option<WorldPoint> {
        self.as_slice().position_of(agent)
    }
}

// ── OccupancyProbe ────────────────────────────────────────────────────────────

/// Decides whether a simulated position physically covers a cell.
pub trait OccupancyProbe {
    fn covers(&self, grid: &Grid, position: WorldPoint, cell: CellCoord) -> bool;
}

/// A position covers exactly the (clamped) grid cell it falls in.
#[derive(Copy, Clone, Debug, Default)]
pub struct GridCellProbe;

impl OccupancyProbe for GridCellProbe {
    #[inline]
    fn covers(&self, grid: &Grid, position: WorldPoint, cell: CellCoord) -> bool {
        grid.world_to_coord(position) == cell
    }
}

/// A position covers every cell whose center lies within `radius` cell
/// sizes.  Used where grid mapping is too coarse, e.g. large unit bodies.
#[derive(Copy, Clone, Debug)]
pub struct CollisionProbe {
    pub radius: f32,
}

impl OccupancyProbe for CollisionProbe {
    fn covers(&self, grid: &Grid, position: WorldPoint, cell: CellCoord) -> bool {
        let reach = self.radius * grid.cell_size();
        position.distance(grid.cell_center(cell)) <= reach
    }
}

/// Build the probe named by `strategy`.
pub fn probe_for(strategy: OccupancyStrategy) -> Box<dyn OccupancyProbe> {
    match strategy {
        OccupancyStrategy::Grid => Box::new(GridCellProbe),
        OccupancyStrategy::Collision { radius } => Box::new(CollisionProbe { radius }),
    }
}
