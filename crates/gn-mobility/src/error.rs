use gn_core::AgentId;
use gn_grid::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("agent {0} has no movement state")]
    UnknownAgent(AgentId),

    #[error("agent {0} already has movement state")]
    DuplicateAgent(AgentId),

    #[error("pathfinding failed: {0}")]
    Path(#[from] GridError),

    #[error("invalid movement config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f32 },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
