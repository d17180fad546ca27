//! Pathfinding trait and default A* implementation.
//!
//! # Pluggability
//!
//! Movement and order code call search through the [`Pathfinder`] trait, so
//! an application can swap in another search without touching the mover.
//! [`AStarPathfinder`] is the default.
//!
//! # Cost units
//!
//! Costs are integers under the 10/14 model: 10 per axis-aligned step, 14 per
//! diagonal step.  The heuristic is the same octile function, which keeps it
//! admissible and consistent on an 8-connected uniform grid.
//!
//! # Scratch reuse
//!
//! Per-cell search state (`g`, `h`, parent, closed flag) lives in an arena
//! owned by the pathfinder, parallel to the grid's cell vector.  Each search
//! bumps a version counter; an arena slot is only trusted when its stored
//! version matches, so no search ever pays for clearing the whole grid.

use gn_core::{CellCoord, WorldPoint, DIAGONAL_COST, STRAIGHT_COST};
use tracing::trace;

use crate::grid::Grid;
use crate::heap::IndexedHeap;
use crate::{GridError, GridResult};

// ── PathRequest ───────────────────────────────────────────────────────────────

/// Input to a search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathRequest {
    pub start:        WorldPoint,
    pub goal:         WorldPoint,
    /// The requesting agent holds the reservation on the goal cell.  Lets the
    /// search end on that cell even when it is statically unwalkable.
    pub goal_claimed: bool,
}

impl PathRequest {
    pub fn new(start: WorldPoint, goal: WorldPoint) -> Self {
        Self { start, goal, goal_claimed: false }
    }

    pub fn claimed(mut self, claimed: bool) -> Self {
        self.goal_claimed = claimed;
        self
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Result of a successful search.
///
/// `waypoints[i]` is the world-space center of `cells[i]`.  The start cell is
/// not included, so a path whose start and goal share a cell is empty.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub waypoints: Vec<WorldPoint>,
    pub cells:     Vec<CellCoord>,
    /// Total cost in 10/14 units.
    pub cost:      u32,
    /// `Grid::revision()` at planning time.
    pub revision:  u64,
}

impl Path {
    /// Zero-length path (start and goal in the same cell).
    pub fn trivial(revision: u64) -> Self {
        Self { waypoints: Vec::new(), cells: Vec::new(), cost: 0, revision }
    }

    /// `true` if the start and goal share a cell.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn final_point(&self) -> Option<WorldPoint> {
        self.waypoints.last().copied()
    }

    /// Overwrite the last waypoint.  No-op on a trivial path.
    pub fn retarget_final(&mut self, point: WorldPoint) {
        if let Some(last) = self.waypoints.last_mut() {
            *last = point;
        }
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Pluggable grid search.
///
/// Takes `&mut self` so implementations can keep scratch memory between
/// requests; the simulation is single-threaded.
pub trait Pathfinder {
    /// Search from `request.start` to `request.goal` over `grid`.
    ///
    /// Returns a trivial path when both points fall in the same cell, even
    /// one that has since turned unwalkable.
    ///
    /// # Errors
    ///
    /// - [`GridError::GoalBlocked`] if the goal cell is unwalkable and not
    ///   claimed by the requester.
    /// - [`GridError::Unreachable`] if the open set empties first.
    fn find_path(&mut self, grid: &Grid, request: &PathRequest) -> GridResult<Path>;
}

/// Counters from the most recent search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the open set.
    pub expanded: usize,
    /// Arena slots initialised for this search.
    pub touched:  usize,
    /// Version stamp the search ran under.
    pub version:  u32,
}

// ── AStarPathfinder ───────────────────────────────────────────────────────────

const NO_PARENT: u32 = u32::MAX;

#[derive(Copy, Clone, Debug)]
struct SearchNode {
    g:       u32,
    h:       u32,
    parent:  u32,
    version: u32,
    closed:  bool,
}

impl SearchNode {
    const STALE: SearchNode = SearchNode { g: u32::MAX, h: 0, parent: NO_PARENT, version: 0, closed: false };
}

/// Open-set ordering: lower total cost first, then lower heuristic (closer to
/// the goal).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SearchKey {
    f: u32,
    h: u32,
}

/// A* over a [`Grid`] with versioned scratch and an indexed open set.
#[derive(Debug)]
pub struct AStarPathfinder {
    nodes:   Vec<SearchNode>,
    open:    IndexedHeap<SearchKey>,
    version: u32,
    stats:   SearchStats,
}

impl Default for AStarPathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl AStarPathfinder {
    pub fn new() -> Self {
        Self {
            nodes:   Vec::new(),
            open:    IndexedHeap::with_capacity(0),
            version: 0,
            stats:   SearchStats::default(),
        }
    }

    /// Pre-size scratch for `grid`.  Optional; searches size it lazily.
    pub fn for_grid(grid: &Grid) -> Self {
        let mut pf = Self::new();
        pf.fit(grid.cell_count());
        pf
    }

    pub fn last_search_stats(&self) -> SearchStats {
        self.stats
    }

    /// Version the next search will run under, minus one.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Jump the version counter, e.g. to exercise wraparound in tests.
    #[cfg(test)]
    pub(crate) fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    fn fit(&mut self, cell_count: usize) {
        if self.nodes.len() != cell_count {
            self.nodes = vec![SearchNode::STALE; cell_count];
            self.open = IndexedHeap::with_capacity(cell_count);
            self.version = 0;
        }
    }

    /// Advance the version.  On wraparound every slot is reset once so a slot
    /// stamped long ago can never match again.
    fn next_version(&mut self) -> u32 {
        self.version = self.version.wrapping_add(1);
        if self.version == 0 {
            self.nodes.fill(SearchNode::STALE);
            self.version = 1;
        }
        self.version
    }

    /// Slot for `index`, initialised if it belongs to an older search.
    #[inline]
    fn touch(&mut self, index: usize) -> &mut SearchNode {
        let version = self.version;
        let node = &mut self.nodes[index];
        if node.version != version {
            *node = SearchNode { version, ..SearchNode::STALE };
            self.stats.touched += 1;
        }
        node
    }

    fn retrace(&self, grid: &Grid, goal_index: usize) -> Path {
        let mut cells = Vec::new();
        let mut cur = goal_index;
        loop {
            let node = &self.nodes[cur];
            if node.parent == NO_PARENT {
                break;
            }
            if let Some(cell) = grid.cell_at(cur) {
                cells.push(cell.coord);
            }
            cur = node.parent as usize;
        }
        cells.reverse();

        Path {
            waypoints: cells.iter().map(|&c| grid.cell_center(c)).collect(),
            cost:      self.nodes[goal_index].g,
            revision:  grid.revision(),
            cells,
        }
    }
}

impl Pathfinder for AStarPathfinder {
    fn find_path(&mut self, grid: &Grid, request: &PathRequest) -> GridResult<Path> {
        let start = grid.world_to_coord(request.start);
        let goal = grid.world_to_coord(request.goal);

        // Already inside the goal cell: arrive even if it was blocked since.
        if start == goal {
            return Ok(Path::trivial(grid.revision()));
        }
        if !grid.is_walkable(goal) && !request.goal_claimed {
            return Err(GridError::GoalBlocked { goal });
        }

        self.fit(grid.cell_count());
        let version = self.next_version();
        self.open.clear();
        self.stats = SearchStats { version, ..SearchStats::default() };

        // Both coordinates come from `world_to_coord`, which clamps.
        let (Some(start_index), Some(goal_index)) = (grid.index_of(start), grid.index_of(goal)) else {
            return Err(GridError::Unreachable { from: start, to: goal });
        };

        let h = start.octile_cost(goal);
        let node = self.touch(start_index);
        node.g = 0;
        node.h = h;
        self.open.insert(start_index, SearchKey { f: h, h });

        while let Some((_, current)) = self.open.remove_best() {
            self.stats.expanded += 1;

            if current == goal_index {
                let path = self.retrace(grid, goal_index);
                trace!(
                    %start, %goal,
                    expanded = self.stats.expanded,
                    touched  = self.stats.touched,
                    cost     = path.cost,
                    "path found"
                );
                return Ok(path);
            }

            let (current_g, current_coord) = {
                let node = &mut self.nodes[current];
                node.closed = true;
                match grid.cell_at(current) {
                    Some(cell) => (node.g, cell.coord),
                    None => continue,
                }
            };

            for next in grid.neighbors(current_coord) {
                let is_goal = next == goal;
                if !grid.is_walkable(next) && !(is_goal && request.goal_claimed) {
                    continue;
                }
                let Some(next_index) = grid.index_of(next) else { continue };

                let step = if next.x != current_coord.x && next.y != current_coord.y {
                    DIAGONAL_COST
                } else {
                    STRAIGHT_COST
                };
                let tentative = current_g.saturating_add(step);

                let node = self.touch(next_index);
                if node.closed || tentative >= node.g {
                    continue;
                }
                node.g = tentative;
                node.h = next.octile_cost(goal);
                node.parent = current as u32;
                let key = SearchKey { f: tentative + node.h, h: node.h };
                self.open.insert(next_index, key);
            }
        }

        trace!(%start, %goal, expanded = self.stats.expanded, "open set exhausted");
        Err(GridError::Unreachable { from: start, to: goal })
    }
}
