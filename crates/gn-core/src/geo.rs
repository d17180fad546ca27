//! World-space point type.
//!
//! `WorldPoint` uses `f32` components, matching the precision a fixed-step
//! movement simulation needs at map scale while keeping per-agent state small.

use std::ops::{Add, AddAssign, Mul, Sub};

/// A 2-D world-space position or displacement.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or `ZERO` for a (near-)zero vector.
    #[inline]
    pub fn normalized(self) -> WorldPoint {
        let len = self.length();
        if len <= f32::EPSILON {
            WorldPoint::ZERO
        } else {
            WorldPoint::new(self.x / len, self.y / len)
        }
    }

    /// Linear interpolation; `t` is clamped to `[0, 1]`.  Both ends are
    /// exact: `t = 0` yields `self` and `t = 1` yields `to`.
    #[inline]
    pub fn lerp(self, to: WorldPoint, t: f32) -> WorldPoint {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return to;
        }
        WorldPoint::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    #[inline]
    pub fn dot(self, other: WorldPoint) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// `[x, y]` array form, as used by spatial indexes.
    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for WorldPoint {
    type Output = WorldPoint;
    #[inline]
    fn add(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for WorldPoint {
    #[inline]
    fn add_assign(&mut self, rhs: WorldPoint) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for WorldPoint {
    type Output = WorldPoint;
    #[inline]
    fn sub(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for WorldPoint {
    type Output = WorldPoint;
    #[inline]
    fn mul(self, rhs: f32) -> WorldPoint {
        WorldPoint::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
