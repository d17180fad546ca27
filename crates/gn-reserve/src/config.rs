//! Tuning for the reservation arbiter and the order fallback chain.

use crate::{ReserveError, ReserveResult};

/// How physical occupancy is detected.  Chosen once when the arbiter is
/// built.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OccupancyStrategy {
    /// A position occupies the grid cell it maps to.
    #[default]
    Grid,
    /// A position occupies any cell whose center lies within `radius`
    /// cell sizes of it.
    Collision { radius: f32 },
}

/// What an order does when no cell near the target can be reserved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConflictFallback {
    /// Move to the requested cell without holding a reservation.
    #[default]
    MoveUnreserved,
    /// Reject the order and leave the agent where it is.
    Abandon,
}

/// Reservation tuning.  All radii are in cells.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReservationConfig {
    /// First neighborhood radius tried by `find_and_reserve_best`.
    pub search_radius:     i32,
    /// The radius doubles on failure until it exceeds this.
    pub max_search_radius: i32,
    /// Weight of candidate-to-target distance in the candidate score.
    pub path_bias:         f32,
    pub occupancy:         OccupancyStrategy,
    pub fallback:          ConflictFallback,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            search_radius:     3,
            max_search_radius: 12,
            path_bias:         0.12,
            occupancy:         OccupancyStrategy::Grid,
            fallback:          ConflictFallback::MoveUnreserved,
        }
    }
}

impl ReservationConfig {
    pub fn validate(&self) -> ReserveResult<()> {
        if self.search_radius < 0 {
            return Err(ReserveError::NegativeRadius(self.search_radius));
        }
        if self.max_search_radius < self.search_radius {
            return Err(ReserveError::RadiusOrder {
                base: self.search_radius,
                max:  self.max_search_radius,
            });
        }
        if !self.path_bias.is_finite() || self.path_bias < 0.0 {
            return Err(ReserveError::InvalidPathBias(self.path_bias));
        }
        if let OccupancyStrategy::Collision { radius } = self.occupancy {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ReserveError::InvalidProbeRadius(radius));
            }
        }
        Ok(())
    }

    /// Radii tried in order: `search_radius`, doubled until it passes
    /// `max_search_radius`, with the maximum itself always tried last.
    pub fn radius_schedule(&self) -> Vec<i32> {
        let max = self.max_search_radius.max(0);
        let mut radii = Vec::new();
        let mut r = self.search_radius.max(0);
        while r < max {
            radii.push(r);
            r = if r == 0 { 1 } else { r * 2 };
        }
        radii.push(max);
        radii
    }
}
