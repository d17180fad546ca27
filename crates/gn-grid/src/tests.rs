//! Unit tests for gn-grid.
//!
//! Grids are built in code from small predicates; cell size is 1.0 unless a
//! test needs otherwise, so cell `(x, y)` has center `(x + 0.5, y + 0.5)`.

#[cfg(test)]
mod helpers {
    use gn_core::{CellCoord, WorldPoint};
    use crate::{Grid, GridBuilder};

    pub fn open(width: i32, height: i32) -> Grid {
        GridBuilder::new(width, height, 1.0).build_open().unwrap()
    }

    /// Grid with the listed cells blocked.
    pub fn with_walls(width: i32, height: i32, walls: &[(i32, i32)]) -> Grid {
        let mut grid = open(width, height);
        for &(x, y) in walls {
            grid.occupy_footprint(CellCoord::new(x, y), (1, 1));
        }
        grid
    }

    pub fn center(x: i32, y: i32) -> WorldPoint {
        WorldPoint::new(x as f32 + 0.5, y as f32 + 0.5)
    }
}

// ── Grid construction & mapping ───────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use gn_core::{CellCoord, WorldPoint};
    use crate::{GridBuilder, GridError};
    use super::helpers::open;

    #[test]
    fn builder_rejects_empty_and_bad_cell_size() {
        assert!(matches!(
            GridBuilder::new(0, 4, 1.0).build_open(),
            Err(GridError::EmptyGrid { width: 0, height: 4 })
        ));
        assert!(matches!(
            GridBuilder::new(4, 4, 0.0).build_open(),
            Err(GridError::InvalidCellSize(_))
        ));
        assert!(matches!(
            GridBuilder::new(4, 4, f32::NAN).build_open(),
            Err(GridError::InvalidCellSize(_))
        ));
    }

    #[test]
    fn predicate_sees_cell_centers() {
        let grid = GridBuilder::new(4, 2, 1.0)
            .build_with(|p| p.x < 2.0)
            .unwrap();
        assert!(grid.is_walkable(CellCoord::new(0, 0)));
        assert!(grid.is_walkable(CellCoord::new(1, 1)));
        assert!(!grid.is_walkable(CellCoord::new(2, 0)));
        assert!(!grid.is_walkable(CellCoord::new(3, 1)));
    }

    #[test]
    fn cell_geometry_follows_origin() {
        let grid = GridBuilder::new(4, 4, 2.0)
            .origin(WorldPoint::new(-4.0, -4.0))
            .build_open()
            .unwrap();
        let cell = grid.cell(CellCoord::new(1, 2)).unwrap();
        assert_eq!(cell.corner, WorldPoint::new(-2.0, 0.0));
        assert_eq!(cell.center, WorldPoint::new(-1.0, 1.0));
        assert_eq!(grid.cell_center(CellCoord::new(1, 2)), cell.center);
    }

    #[test]
    fn world_to_cell_clamps() {
        let grid = GridBuilder::new(4, 4, 2.0)
            .origin(WorldPoint::new(-4.0, -4.0))
            .build_open()
            .unwrap();
        assert_eq!(grid.world_to_coord(WorldPoint::new(0.1, -0.1)), CellCoord::new(2, 1));
        assert_eq!(grid.world_to_coord(WorldPoint::new(-100.0, 100.0)), CellCoord::new(0, 3));
        assert_eq!(grid.world_to_coord(WorldPoint::new(f32::NAN, 1e30)), CellCoord::new(0, 3));
        assert_eq!(grid.world_to_cell(WorldPoint::new(50.0, 50.0)).coord, CellCoord::new(3, 3));
    }

    #[test]
    fn out_of_bounds_is_unwalkable() {
        let grid = open(3, 3);
        assert!(!grid.is_walkable(CellCoord::new(-1, 0)));
        assert!(!grid.is_walkable(CellCoord::new(0, 3)));
        assert!(grid.cell(CellCoord::new(3, 0)).is_none());
    }

    #[test]
    fn neighbor_counts() {
        let grid = open(5, 5);
        assert_eq!(grid.neighbors(CellCoord::new(0, 0)).count(), 3);
        assert_eq!(grid.neighbors(CellCoord::new(2, 0)).count(), 5);
        assert_eq!(grid.neighbors(CellCoord::new(2, 2)).count(), 8);
        assert!(grid.neighbors(CellCoord::new(2, 2)).all(|c| c != CellCoord::new(2, 2)));
    }
}

// ── Closest-walkable ring search ──────────────────────────────────────────────

#[cfg(test)]
mod closest {
    use gn_core::CellCoord;
    use crate::GridBuilder;

    #[test]
    fn walkable_origin_returns_itself() {
        let grid = GridBuilder::new(4, 4, 1.0).build_open().unwrap();
        assert_eq!(grid.find_closest_walkable(CellCoord::new(2, 2), 3), Some(CellCoord::new(2, 2)));
    }

    #[test]
    fn respects_max_radius() {
        // Only the far corner is walkable.
        let grid = GridBuilder::new(5, 5, 1.0)
            .build_with(|p| p.x > 4.0 && p.y > 4.0)
            .unwrap();
        assert_eq!(grid.find_closest_walkable(CellCoord::new(0, 0), 3), None);
        assert_eq!(grid.find_closest_walkable(CellCoord::new(0, 0), 4), Some(CellCoord::new(4, 4)));
    }

    #[test]
    fn origin_may_lie_outside_grid() {
        let grid = GridBuilder::new(3, 3, 1.0).build_open().unwrap();
        assert_eq!(grid.find_closest_walkable(CellCoord::new(-2, -2), 1), None);
        assert_eq!(grid.find_closest_walkable(CellCoord::new(-2, -2), 2), Some(CellCoord::new(0, 0)));
    }
}

// ── Footprint edits ───────────────────────────────────────────────────────────

#[cfg(test)]
mod footprint {
    use gn_core::CellCoord;
    use super::helpers::open;

    #[test]
    fn even_footprint_centers_with_floor_division() {
        let mut grid = open(10, 10);
        let changed = grid.occupy_footprint(CellCoord::new(5, 5), (2, 2));
        assert_eq!(changed, 4);
        for (x, y) in [(4, 4), (5, 4), (4, 5), (5, 5)] {
            assert!(!grid.is_walkable(CellCoord::new(x, y)), "({x},{y}) should be blocked");
        }
        assert!(grid.is_walkable(CellCoord::new(6, 6)));
        assert!(grid.is_walkable(CellCoord::new(3, 3)));
    }

    #[test]
    fn odd_footprint_is_symmetric() {
        let mut grid = open(10, 10);
        assert_eq!(grid.occupy_footprint(CellCoord::new(5, 5), (3, 3)), 9);
        assert!(!grid.is_walkable(CellCoord::new(4, 4)));
        assert!(!grid.is_walkable(CellCoord::new(6, 6)));
        assert!(grid.is_walkable(CellCoord::new(7, 5)));
    }

    #[test]
    fn footprint_is_clipped_to_bounds() {
        let mut grid = open(4, 4);
        assert_eq!(grid.occupy_footprint(CellCoord::new(0, 0), (3, 3)), 4);
    }

    #[test]
    fn revision_bumps_only_on_change() {
        let mut grid = open(6, 6);
        assert_eq!(grid.revision(), 0);
        grid.occupy_footprint(CellCoord::new(2, 2), (2, 2));
        assert_eq!(grid.revision(), 1);
        assert_eq!(grid.occupy_footprint(CellCoord::new(2, 2), (2, 2)), 0);
        assert_eq!(grid.revision(), 1);
        assert_eq!(grid.free_footprint(CellCoord::new(2, 2), (2, 2)), 4);
        assert_eq!(grid.revision(), 2);
        assert!(grid.is_walkable(CellCoord::new(1, 1)));
    }
}

// ── Indexed heap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod heap {
    use std::collections::BTreeMap;

    use proptest::prelude::*;
    use crate::IndexedHeap;

    #[test]
    fn pops_in_key_order() {
        let mut heap = IndexedHeap::with_capacity(8);
        for (id, key) in [(0, 50), (1, 10), (2, 30), (3, 20)] {
            heap.insert(id, key);
        }
        let order: Vec<_> = std::iter::from_fn(|| heap.remove_best()).map(|(_, id)| id).collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
        assert!(heap.is_empty());
    }

    #[test]
    fn update_key_resorts_in_place() {
        let mut heap = IndexedHeap::with_capacity(4);
        heap.insert(0, 5);
        heap.insert(1, 7);
        heap.insert(2, 9);
        assert!(heap.update_key(2, 1));
        assert_eq!(heap.len(), 3, "no duplicate entry");
        assert_eq!(heap.peek(), Some((1, 2)));
        assert!(heap.update_key(2, 8));
        assert_eq!(heap.peek(), Some((5, 0)));
        assert!(!heap.update_key(3, 0), "unqueued id");
    }

    #[test]
    fn contains_tracks_membership() {
        let mut heap = IndexedHeap::with_capacity(4);
        heap.insert(3, 1);
        assert!(heap.contains(3));
        assert!(!heap.contains(2));
        assert!(!heap.contains(99));
        heap.remove_best();
        assert!(!heap.contains(3));
    }

    #[test]
    fn clear_resets_slots() {
        let mut heap = IndexedHeap::with_capacity(4);
        heap.insert(0, 1);
        heap.insert(1, 2);
        heap.clear();
        assert!(heap.is_empty());
        assert!(!heap.contains(0));
        assert!(!heap.contains(1));
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(usize, u32),
        RemoveBest,
        Update(usize, u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..24, 0u32..100).prop_map(|(id, k)| Op::Insert(id, k)),
            Just(Op::RemoveBest),
            (0usize..24, 0u32..100).prop_map(|(id, k)| Op::Update(id, k)),
        ]
    }

    proptest! {
        #[test]
        fn matches_model(ops in prop::collection::vec(op(), 1..200)) {
            let mut heap = IndexedHeap::with_capacity(24);
            let mut model: BTreeMap<usize, u32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(id, key) => {
                        heap.insert(id, key);
                        model.insert(id, key);
                    }
                    Op::RemoveBest => {
                        let popped = heap.remove_best();
                        let min = model.values().min().copied();
                        prop_assert_eq!(popped.map(|(k, _)| k), min);
                        if let Some((key, id)) = popped {
                            prop_assert_eq!(model.remove(&id), Some(key));
                        }
                    }
                    Op::Update(id, key) => {
                        let expected = model.contains_key(&id);
                        prop_assert_eq!(heap.update_key(id, key), expected);
                        if expected {
                            model.insert(id, key);
                        }
                    }
                }

                prop_assert_eq!(heap.len(), model.len());
                for id in 0..24 {
                    prop_assert_eq!(heap.contains(id), model.contains_key(&id));
                    prop_assert_eq!(heap.key_of(id), model.get(&id).copied());
                }
            }
        }
    }
}

// ── A* search ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use gn_core::{CellCoord, WorldPoint, DIAGONAL_COST, STRAIGHT_COST};
    use crate::{AStarPathfinder, GridError, PathRequest, Pathfinder};
    use super::helpers::{center, open, with_walls};

    #[test]
    fn open_diagonal_is_seven_steps() {
        let grid = open(8, 8);
        let mut pf = AStarPathfinder::new();
        let path = pf.find_path(&grid, &PathRequest::new(center(0, 0), center(7, 7))).unwrap();

        assert_eq!(path.cost, 7 * DIAGONAL_COST);
        assert_eq!(path.len(), 7);
        let expected: Vec<_> = (1..=7).map(|i| CellCoord::new(i, i)).collect();
        assert_eq!(path.cells, expected);
        assert_eq!(path.final_point(), Some(center(7, 7)));
    }

    #[test]
    fn straight_line_cost() {
        let grid = open(8, 3);
        let mut pf = AStarPathfinder::new();
        let path = pf.find_path(&grid, &PathRequest::new(center(0, 1), center(5, 1))).unwrap();
        assert_eq!(path.cost, 5 * STRAIGHT_COST);
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn routes_around_wall() {
        // Wall at x = 2 with a gap at the top row.
        let grid = with_walls(5, 5, &[(2, 0), (2, 1), (2, 2), (2, 3)]);
        let mut pf = AStarPathfinder::new();
        let path = pf.find_path(&grid, &PathRequest::new(center(0, 0), center(4, 0))).unwrap();

        assert_eq!(path.cost, 96);
        assert!(path.cells.contains(&CellCoord::new(2, 4)));
        assert!(path.cells.iter().all(|&c| grid.is_walkable(c)));
    }

    #[test]
    fn same_cell_is_trivial() {
        let grid = open(4, 4);
        let mut pf = AStarPathfinder::new();
        let path = pf
            .find_path(&grid, &PathRequest::new(WorldPoint::new(0.2, 0.2), WorldPoint::new(0.8, 0.8)))
            .unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn blocked_own_cell_is_trivial() {
        let mut grid = open(4, 4);
        grid.occupy_footprint(CellCoord::new(2, 2), (1, 1));
        let mut pf = AStarPathfinder::new();
        let path = pf
            .find_path(&grid, &PathRequest::new(WorldPoint::new(2.1, 2.7), center(2, 2)))
            .unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.revision, grid.revision());
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let grid = with_walls(6, 6, &[(4, 4), (5, 4), (4, 5)]);
        let mut pf = AStarPathfinder::new();
        let err = pf.find_path(&grid, &PathRequest::new(center(0, 0), center(5, 5))).unwrap_err();
        assert!(matches!(
            err,
            GridError::Unreachable { to, .. } if to == CellCoord::new(5, 5)
        ));
    }

    #[test]
    fn blocked_goal_needs_claim() {
        let grid = with_walls(6, 6, &[(3, 3)]);
        let mut pf = AStarPathfinder::new();
        let request = PathRequest::new(center(0, 0), center(3, 3));

        assert!(matches!(
            pf.find_path(&grid, &request),
            Err(GridError::GoalBlocked { goal }) if goal == CellCoord::new(3, 3)
        ));

        let path = pf.find_path(&grid, &request.claimed(true)).unwrap();
        assert_eq!(path.cells.last(), Some(&CellCoord::new(3, 3)));
        assert_eq!(path.cost, 42);
    }

    #[test]
    fn claim_does_not_open_intermediate_cells() {
        // Goal sits behind a blocked cell; the claim only applies to the goal.
        let grid = with_walls(5, 1, &[(2, 0), (4, 0)]);
        let mut pf = AStarPathfinder::new();
        let request = PathRequest::new(center(0, 0), center(4, 0)).claimed(true);
        assert!(matches!(pf.find_path(&grid, &request), Err(GridError::Unreachable { .. })));
    }

    #[test]
    fn retarget_final_replaces_only_last() {
        let grid = open(4, 4);
        let mut pf = AStarPathfinder::new();
        let mut path = pf.find_path(&grid, &PathRequest::new(center(0, 0), center(3, 0))).unwrap();
        let before = path.waypoints.clone();
        path.retarget_final(WorldPoint::new(3.4, 0.6));
        assert_eq!(path.waypoints[..2], before[..2]);
        assert_eq!(path.final_point(), Some(WorldPoint::new(3.4, 0.6)));
    }

    #[test]
    fn path_records_grid_revision() {
        let mut grid = open(6, 6);
        grid.occupy_footprint(CellCoord::new(3, 3), (1, 1));
        let mut pf = AStarPathfinder::new();
        let path = pf.find_path(&grid, &PathRequest::new(center(0, 0), center(5, 0))).unwrap();
        assert_eq!(path.revision, grid.revision());
    }
}

// ── Scratch reuse across searches ─────────────────────────────────────────────

#[cfg(test)]
mod incremental {
    use gn_core::CellCoord;
    use crate::{AStarPathfinder, PathRequest, Pathfinder};
    use super::helpers::{center, open};

    #[test]
    fn reused_pathfinder_matches_fresh_one() {
        let mut grid = open(10, 10);
        let mut reused = AStarPathfinder::new();
        let request = PathRequest::new(center(0, 5), center(9, 5));

        let first = reused.find_path(&grid, &request).unwrap();
        assert_eq!(first.cost, 90);

        // Block the straight corridor the first search walked through.
        grid.occupy_footprint(CellCoord::new(5, 5), (1, 7));
        let second = reused.find_path(&grid, &request).unwrap();
        let fresh = AStarPathfinder::new().find_path(&grid, &request).unwrap();

        assert_eq!(second, fresh);
        assert!(second.cells.iter().all(|&c| grid.is_walkable(c)), "no stale parent chain");
        assert!(second.cost > first.cost);
    }

    #[test]
    fn each_search_gets_new_version() {
        let grid = open(5, 5);
        let mut pf = AStarPathfinder::new();
        let request = PathRequest::new(center(0, 0), center(4, 4));
        pf.find_path(&grid, &request).unwrap();
        let v1 = pf.last_search_stats().version;
        pf.find_path(&grid, &request).unwrap();
        let v2 = pf.last_search_stats().version;
        assert_eq!(v2, v1 + 1);
        assert!(pf.last_search_stats().touched <= grid.cell_count());
    }

    #[test]
    fn version_wraparound_resets_scratch() {
        let mut grid = open(8, 8);
        let mut pf = AStarPathfinder::new();
        let request = PathRequest::new(center(0, 0), center(7, 7));

        pf.find_path(&grid, &request).unwrap();
        pf.set_version(u32::MAX - 1);
        pf.find_path(&grid, &request).unwrap();
        assert_eq!(pf.last_search_stats().version, u32::MAX);

        // Next search wraps; every slot stamped before must be ignored.
        grid.occupy_footprint(CellCoord::new(4, 4), (3, 3));
        let wrapped = pf.find_path(&grid, &request).unwrap();
        assert_eq!(pf.last_search_stats().version, 1);

        let fresh = AStarPathfinder::new().find_path(&grid, &request).unwrap();
        assert_eq!(wrapped, fresh);
        assert!(wrapped.cells.iter().all(|&c| grid.is_walkable(c)));
    }

    #[test]
    fn scratch_resizes_for_a_different_grid() {
        let small = open(3, 3);
        let large = open(12, 12);
        let mut pf = AStarPathfinder::for_grid(&small);
        pf.find_path(&small, &PathRequest::new(center(0, 0), center(2, 2))).unwrap();
        let path = pf.find_path(&large, &PathRequest::new(center(0, 0), center(11, 11))).unwrap();
        assert_eq!(path.cost, 11 * 14);
    }
}
