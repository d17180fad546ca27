//! `NavConfig`: the aggregate tuning file.
//!
//! ```toml
//! tick_dt_secs = 0.05
//! seed         = 7
//!
//! [movement]
//! separation_strength = 0.4
//!
//! [reservation]
//! search_radius = 2
//! fallback      = "abandon"
//! occupancy     = { collision = { radius = 0.6 } }
//! ```
//!
//! Every key is optional; missing ones take their `Default` value.

use std::path::Path;

use gn_core::FixedStep;
use gn_mobility::MovementConfig;
use gn_reserve::ReservationConfig;
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Length of one fixed tick in seconds.
    pub tick_dt_secs:            f32,
    /// Global seed; per-agent RNG streams are derived from it.
    pub seed:                    u64,
    /// Ticks a single `advance` call may run before dropping the backlog.
    pub max_catch_up:            u32,
    /// Call `SimObserver::on_snapshot` every this many ticks.  0 disables.
    pub snapshot_interval_ticks: u64,
    pub movement:                MovementConfig,
    pub reservation:             ReservationConfig,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            tick_dt_secs:            0.05,
            seed:                    0,
            max_catch_up:            gn_core::time::DEFAULT_MAX_CATCH_UP,
            snapshot_interval_ticks: 1,
            movement:                MovementConfig::default(),
            reservation:             ReservationConfig::default(),
        }
    }
}

impl NavConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let config: NavConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML, e.g. to write out the effective settings.
    pub fn to_toml_string(&self) -> SimResult<String> {
        toml::to_string(self).map_err(|e| SimError::Config(e.to_string()))
    }

    pub fn validate(&self) -> SimResult<()> {
        FixedStep::new(self.tick_dt_secs)?;
        if self.max_catch_up == 0 {
            return Err(SimError::Config("max_catch_up must be at least 1".into()));
        }
        self.movement.validate()?;
        self.reservation.validate()?;
        Ok(())
    }

    pub(crate) fn clock(&self) -> SimResult<FixedStep> {
        Ok(FixedStep::new(self.tick_dt_secs)?.with_max_catch_up(self.max_catch_up))
    }
}
