//! Neighbour lookup for local separation.
//!
//! The index is rebuilt from the tick-start snapshot of simulated positions,
//! so every agent in a pass is pushed by the same neighbour layout no matter
//! where it sits in the processing order.

use gn_core::{AgentId, AgentRng, WorldPoint};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::MobilityStore;

/// Below this distance two agents count as exactly overlapping.
const OVERLAP_EPSILON: f32 = 1e-4;

#[derive(Clone)]
struct AgentEntry {
    point: [f32; 2],
    id:    AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over agent positions.
pub struct NeighborIndex {
    tree: RTree<AgentEntry>,
}

impl NeighborIndex {
    /// Index every tracked agent's current simulated position.
    pub fn from_store(store: &MobilityStore) -> Self {
        let entries = store
            .iter()
            .map(|(id, s)| AgentEntry { point: s.sim_pos.to_array(), id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn from_points(points: &[(AgentId, WorldPoint)]) -> Self {
        let entries = points
            .iter()
            .map(|&(id, p)| AgentEntry { point: p.to_array(), id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Agents other than `agent` within `radius` of `pos`.
    pub fn neighbors_within(&self, agent: AgentId, pos: WorldPoint, radius: f32) -> Vec<(AgentId, WorldPoint)> {
        self.tree
            .locate_within_distance(pos.to_array(), radius * radius)
            .filter(|e| e.id != agent)
            .map(|e| (e.id, WorldPoint::new(e.point[0], e.point[1])))
            .collect()
    }

    /// Inverse-distance repulsion from neighbours within `radius`.
    ///
    /// Each neighbour at distance `d` contributes `radius / d - 1` along the
    /// direction away from it (zero at the edge of the radius).  The sum is
    /// clamped to unit length.  Exactly overlapping neighbours push along a
    /// random direction drawn from the agent's own RNG.
    pub fn separation(&self, agent: AgentId, pos: WorldPoint, radius: f32, rng: &mut AgentRng) -> WorldPoint {
        if radius <= 0.0 {
            return WorldPoint::ZERO;
        }
        let mut push = WorldPoint::ZERO;
        for (_, other) in self.neighbors_within(agent, pos, radius) {
            let away = pos - other;
            let d = away.length();
            let (dir, d) = if d < OVERLAP_EPSILON {
                (rng.unit_vector(), (radius * 0.05).max(OVERLAP_EPSILON))
            } else {
                (away * (1.0 / d), d)
            };
            push += dir * (radius / d - 1.0).max(0.0);
        }
        if push.length_squared() > 1.0 { push.normalized() } else { push }
    }
}
