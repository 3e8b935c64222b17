use thiserror::Error;

use crate::config::ConfigError;
use crate::control::lander::DescentPhase;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Physics error: {0}")]
    PhysicsError(String),

    #[error("Refinement in {phase:?} did not settle after {iterations} iterations")]
    RefinementLimit { phase: DescentPhase, iterations: u32 },

    #[error("Input error: {0}")]
    InputError(String),

    #[error("No further burn rate command available")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
