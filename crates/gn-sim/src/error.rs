use std::path::PathBuf;

use gn_core::{AgentId, CellCoord, CoreError};
use gn_grid::GridError;
use gn_mobility::MobilityError;
use gn_reserve::ReserveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("agent {0} is not active")]
    UnknownAgent(AgentId),

    #[error("no free walkable cell near {near}")]
    NoFreeCell { near: CellCoord },

    #[error("group order needs at least one active agent")]
    EmptyGroup,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Reserve(#[from] ReserveError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
