//! Movement tuning.
//!
//! Distances are in cell sizes so one config works for any grid scale;
//! durations are in seconds.

use crate::{MobilityError, MobilityResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// A waypoint counts as reached inside this radius.
    pub acceptance_radius:       f32,
    /// Neighbours closer than this push the agent away.
    pub separation_radius:       f32,
    /// Separation push as a fraction of the agent's per-tick step.
    pub separation_strength:     f32,
    /// Separation is switched off this close to the final goal.
    pub separation_goal_cutoff:  f32,
    /// Per-tick displacement below this counts as not moving.
    pub stuck_threshold:         f32,
    /// Seconds of not moving before a replan is forced.
    pub stuck_window_secs:       f32,
    /// No stuck replans this close to the final goal.
    pub stuck_min_goal_distance: f32,
    /// Length of the final snap onto the goal.  Zero snaps in the same tick.
    pub snap_duration_secs:      f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            acceptance_radius:       0.1,
            separation_radius:       1.0,
            separation_strength:     0.6,
            separation_goal_cutoff:  1.5,
            stuck_threshold:         0.01,
            stuck_window_secs:       1.0,
            stuck_min_goal_distance: 0.75,
            snap_duration_secs:      0.0,
        }
    }
}

impl MovementConfig {
    pub fn validate(&self) -> MobilityResult<()> {
        let non_negative = [
            ("acceptance_radius",       self.acceptance_radius),
            ("separation_radius",       self.separation_radius),
            ("separation_strength",     self.separation_strength),
            ("separation_goal_cutoff",  self.separation_goal_cutoff),
            ("stuck_threshold",         self.stuck_threshold),
            ("stuck_window_secs",       self.stuck_window_secs),
            ("stuck_min_goal_distance", self.stuck_min_goal_distance),
            ("snap_duration_secs",      self.snap_duration_secs),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(MobilityError::InvalidConfig { field, value });
            }
        }
        if self.acceptance_radius == 0.0 {
            return Err(MobilityError::InvalidConfig { field: "acceptance_radius", value: 0.0 });
        }
        Ok(())
    }
}
