pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;

pub use config::{load_config, SimulationConfig};
pub use constants::*;
pub use control::input_gate::{BurnRateSource, ConsoleGate, RandomPilot, ScriptedBurnRates};
pub use control::lander::{DescentPhase, Lander};
pub use control::landing::{LandingOutcome, LandingReport};
pub use control::propulsion::{BurnLimits, BurnRate};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::kinematics::{Candidate, SimulationState};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::{StatusReport, Telemetry};
