//! Strongly typed identifiers and integer grid coordinates.
//!
//! `AgentId` is `Copy + Ord + Hash` so it can be used as a map key and sorted
//! without ceremony.  The registry hands out ids monotonically and never
//! reuses them, so a handle to a destroyed agent stays detectably stale.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID": equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Handle of an active agent.  Never reused after the agent is destroyed.
    pub struct AgentId(u32);
}

// ── CellCoord ─────────────────────────────────────────────────────────────────

/// Movement cost of one axis-aligned step.
pub const STRAIGHT_COST: u32 = 10;

/// Movement cost of one diagonal step (≈ √2 × 10).
pub const DIAGONAL_COST: u32 = 14;

/// Integer grid coordinate.  May lie outside any particular grid; the grid
/// clamps or rejects it at lookup time.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate shifted by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// 8-connected movement cost between two cells under the 10/14 model.
    ///
    /// Also the A* heuristic: admissible and consistent on a uniform grid.
    #[inline]
    pub fn octile_cost(self, other: CellCoord) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
        DIAGONAL_COST * lo + STRAIGHT_COST * (hi - lo)
    }

    /// Chebyshev (king-move) distance: the ring index of `other` around `self`.
    #[inline]
    pub fn chebyshev(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Coordinates on the square ring at Chebyshev distance `radius`, in
    /// row-major order.  Radius 0 yields only `self`.
    pub fn ring(self, radius: i32) -> impl Iterator<Item = CellCoord> {
        let r = radius.max(0);
        (-r..=r).flat_map(move |dy| {
            (-r..=r)
                .filter(move |dx| dy.abs() == r || dx.abs() == r)
                .map(move |dx| self.offset(dx, dy))
        })
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}
