//! The walkability grid and its builder.
//!
//! # Data layout
//!
//! Cells are stored row-major in a single `Vec<Cell>`; the cell at `(x, y)`
//! lives at index `y * width + x`.  World space maps onto the grid through an
//! `origin` (the world position of cell `(0, 0)`'s lower corner) and a square
//! `cell_size`.
//!
//! Every lookup that takes a world point clamps to the grid bounds, so callers
//! never see an out-of-range cell.  Lookups that take a `CellCoord` report
//! out-of-bounds coordinates as `None` / unwalkable instead.
//!
//! Search scratch state does not live on `Cell`; the pathfinder keeps its own
//! versioned per-cell arena so a `&Grid` can be shared while searching.

use gn_core::{CellCoord, WorldPoint};

use crate::{GridError, GridResult};

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One addressable unit of the world grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub coord:    CellCoord,
    /// World position of the cell's lower (min x, min y) corner.
    pub corner:   WorldPoint,
    /// World position of the cell's center.
    pub center:   WorldPoint,
    pub walkable: bool,
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Fixed-size 2-D walkability grid.
///
/// Built once by [`GridBuilder`]; afterwards only footprint edits change it.
/// Each edit that flips at least one cell bumps [`Grid::revision`].
#[derive(Clone, Debug)]
pub struct Grid {
    width:     i32,
    height:    i32,
    cell_size: f32,
    origin:    WorldPoint,
    cells:     Vec<Cell>,
    revision:  u64,
}

impl Grid {
    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Incremented whenever a footprint edit changes walkability.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Coordinate mapping ────────────────────────────────────────────────

    #[inline]
    pub fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Nearest in-bounds coordinate.
    #[inline]
    pub fn clamp(&self, coord: CellCoord) -> CellCoord {
        CellCoord::new(coord.x.clamp(0, self.width - 1), coord.y.clamp(0, self.height - 1))
    }

    /// Row-major index of `coord`, or `None` if out of bounds.
    #[inline]
    pub fn index_of(&self, coord: CellCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    /// `true` if `point` lies inside the grid's world rectangle.
    pub fn contains_point(&self, point: WorldPoint) -> bool {
        let max_x = self.origin.x + self.width as f32 * self.cell_size;
        let max_y = self.origin.y + self.height as f32 * self.cell_size;
        point.x >= self.origin.x && point.x < max_x && point.y >= self.origin.y && point.y < max_y
    }

    /// Cell coordinate for a world point, clamped to the grid.
    pub fn world_to_coord(&self, point: WorldPoint) -> CellCoord {
        // `as i32` saturates and maps NaN to 0, so the clamp below always holds.
        let fx = ((point.x - self.origin.x) / self.cell_size).floor() as i32;
        let fy = ((point.y - self.origin.y) / self.cell_size).floor() as i32;
        self.clamp(CellCoord::new(fx, fy))
    }

    /// The cell containing a world point, clamped to the grid.  Never fails.
    pub fn world_to_cell(&self, point: WorldPoint) -> &Cell {
        let coord = self.world_to_coord(point);
        let index = coord.y as usize * self.width as usize + coord.x as usize;
        &self.cells[index]
    }

    /// World-space center of `coord` after clamping it to the grid.
    pub fn cell_center(&self, coord: CellCoord) -> WorldPoint {
        let c = self.clamp(coord);
        WorldPoint::new(
            self.origin.x + (c.x as f32 + 0.5) * self.cell_size,
            self.origin.y + (c.y as f32 + 0.5) * self.cell_size,
        )
    }

    // ── Cell access ───────────────────────────────────────────────────────

    #[inline]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index_of(coord).map(|i| &self.cells[i])
    }

    /// Cell by row-major index.  Callers obtain indices from [`Grid::index_of`].
    #[inline]
    pub fn cell_at(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// `false` for blocked and for out-of-bounds coordinates.
    #[inline]
    pub fn is_walkable(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_some_and(|c| c.walkable)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    // ── Neighbourhood queries ─────────────────────────────────────────────

    /// Up to 8 in-bounds neighbours (4 axis-aligned + 4 diagonal) of `coord`.
    pub fn neighbors(&self, coord: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        const OFFSETS: [(i32, i32); 8] = [
            (0, 1), (1, 0), (0, -1), (-1, 0),
            (1, 1), (1, -1), (-1, -1), (-1, 1),
        ];
        OFFSETS
            .iter()
            .map(move |&(dx, dy)| coord.offset(dx, dy))
            .filter(move |&c| self.in_bounds(c))
    }

    /// First walkable cell on rings of growing radius around `from`, up to
    /// and including `max_radius`.
    ///
    /// `from` does not have to lie inside the grid; ring cells outside it are
    /// skipped.  Within a ring, cells are visited in row-major order.
    pub fn find_closest_walkable(&self, from: CellCoord, max_radius: i32) -> Option<CellCoord> {
        (0..=max_radius.max(0))
            .flat_map(|r| from.ring(r))
            .find(|&c| self.is_walkable(c))
    }

    // ── Footprint edits ───────────────────────────────────────────────────

    /// In-bounds cells covered by a `size` footprint centered on `origin`.
    ///
    /// The block starts at `origin - size / 2` (floor division), so a 2×2
    /// footprint covers `origin` and the cells below/left of it.
    pub fn footprint(&self, origin: CellCoord, size: (i32, i32)) -> impl Iterator<Item = CellCoord> + '_ {
        let (w, h) = (size.0.max(0), size.1.max(0));
        let x0 = origin.x - w.div_euclid(2);
        let y0 = origin.y - h.div_euclid(2);
        (y0..y0 + h)
            .flat_map(move |y| (x0..x0 + w).map(move |x| CellCoord::new(x, y)))
            .filter(move |&c| self.in_bounds(c))
    }

    /// Mark a footprint unwalkable (structure placed).  Returns the number of
    /// cells that changed.
    pub fn occupy_footprint(&mut self, origin: CellCoord, size: (i32, i32)) -> usize {
        self.set_footprint(origin, size, false)
    }

    /// Mark a footprint walkable again (structure removed).  Returns the
    /// number of cells that changed.
    pub fn free_footprint(&mut self, origin: CellCoord, size: (i32, i32)) -> usize {
        self.set_footprint(origin, size, true)
    }

    fn set_footprint(&mut self, origin: CellCoord, size: (i32, i32), walkable: bool) -> usize {
        let indices: Vec<usize> = self
            .footprint(origin, size)
            .filter_map(|c| self.index_of(c))
            .collect();

        let mut changed = 0;
        for i in indices {
            let cell = &mut self.cells[i];
            if cell.walkable != walkable {
                cell.walkable = walkable;
                changed += 1;
            }
        }
        if changed > 0 {
            self.revision += 1;
        }
        changed
    }
}

// ── GridBuilder ───────────────────────────────────────────────────────────────

/// Builds a [`Grid`] from dimensions, cell size and a walkability predicate.
///
/// ```rust,ignore
/// let grid = GridBuilder::new(64, 64, 1.0)
///     .origin(WorldPoint::new(-32.0, -32.0))
///     .build_with(|center| !level.collides(center))?;
/// ```
pub struct GridBuilder {
    width:     i32,
    height:    i32,
    cell_size: f32,
    origin:    WorldPoint,
}

impl GridBuilder {
    pub fn new(width: i32, height: i32, cell_size: f32) -> Self {
        Self { width, height, cell_size, origin: WorldPoint::ZERO }
    }

    /// World position of the lower corner of cell `(0, 0)`.  Default: origin.
    pub fn origin(mut self, origin: WorldPoint) -> Self {
        self.origin = origin;
        self
    }

    /// Build a grid where every cell is walkable.
    pub fn build_open(self) -> GridResult<Grid> {
        self.build_with(|_| true)
    }

    /// Build the grid, asking `is_walkable` once per cell center.
    ///
    /// # Errors
    ///
    /// [`GridError::EmptyGrid`] for non-positive dimensions and
    /// [`GridError::InvalidCellSize`] for a non-finite or non-positive size.
    pub fn build_with<F>(self, mut is_walkable: F) -> GridResult<Grid>
    where
        F: FnMut(WorldPoint) -> bool,
    {
        if self.width <= 0 || self.height <= 0 {
            return Err(GridError::EmptyGrid { width: self.width, height: self.height });
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(self.cell_size));
        }

        let mut cells = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let corner = WorldPoint::new(
                    self.origin.x + x as f32 * self.cell_size,
                    self.origin.y + y as f32 * self.cell_size,
                );
                let half = self.cell_size * 0.5;
                let center = WorldPoint::new(corner.x + half, corner.y + half);
                cells.push(Cell {
                    coord: CellCoord::new(x, y),
                    corner,
                    center,
                    walkable: is_walkable(center),
                });
            }
        }

        Ok(Grid {
            width:     self.width,
            height:    self.height,
            cell_size: self.cell_size,
            origin:    self.origin,
            cells,
            revision:  0,
        })
    }
}
