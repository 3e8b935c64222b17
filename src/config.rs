//! Mission configuration: initial conditions, physics constants, command
//! window limits and the step refinement tolerances.
//!
//! Every section falls back to the historical mission values, so a TOML file
//! only needs to name what it overrides:
//!
//! ```toml
//! [initial]
//! altitude = 80.0
//!
//! [tolerances]
//! correction_margin = 0.04
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// State the capsule starts every attempt in.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InitialConditions {
    pub altitude: f64,
    pub velocity: f64,
    pub total_mass: f64,
    pub dry_mass: f64,
}

impl Default for InitialConditions {
    fn default() -> Self {
        InitialConditions {
            altitude: INITIAL_ALTITUDE,
            velocity: INITIAL_VELOCITY,
            total_mass: INITIAL_TOTAL_MASS,
            dry_mass: DRY_MASS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Physics {
    pub gravity: f64,
    pub thrust_coefficient: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Physics {
            gravity: GRAVITY,
            thrust_coefficient: THRUST_COEFFICIENT,
        }
    }
}

/// Length of a command window and the burn rates an operator may choose.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CommandWindow {
    pub duration: f64,
    pub min_burn_rate: f64,
    pub max_burn_rate: f64,
}

impl Default for CommandWindow {
    fn default() -> Self {
        CommandWindow {
            duration: COMMAND_WINDOW,
            min_burn_rate: MIN_BURN_RATE,
            max_burn_rate: MAX_BURN_RATE,
        }
    }
}

/// Policy constants of the step refinement. These were fitted to the
/// historical output and are not derived from the physics.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Tolerances {
    /// Propellant (and window time) below which it counts as exhausted.
    pub fuel_exhaustion: f64,
    /// Step length below which approach refinement declares touchdown.
    pub min_refine_step: f64,
    /// Added to the turning-point step so the correction overshoots slightly.
    pub correction_margin: f64,
    pub max_refine_iterations: u32,
    pub max_correction_iterations: u32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            fuel_exhaustion: FUEL_EXHAUSTION_TOLERANCE,
            min_refine_step: MIN_REFINE_STEP,
            correction_margin: CORRECTION_MARGIN,
            max_refine_iterations: MAX_REFINE_ITERATIONS,
            max_correction_iterations: MAX_CORRECTION_ITERATIONS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub initial: InitialConditions,
    pub physics: Physics,
    pub command: CommandWindow,
    pub tolerances: Tolerances,
}

impl SimulationConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let initial = &self.initial;
        if !(initial.dry_mass > 0.0) {
            return Err(invalid("dry mass must be positive"));
        }
        if initial.total_mass < initial.dry_mass {
            return Err(invalid("total mass must not be below dry mass"));
        }
        if !(initial.altitude >= 0.0) || !initial.velocity.is_finite() {
            return Err(invalid("initial altitude must be non-negative and velocity finite"));
        }
        if !(self.physics.gravity > 0.0) || !(self.physics.thrust_coefficient > 0.0) {
            return Err(invalid("gravity and thrust coefficient must be positive"));
        }

        let command = &self.command;
        if !(command.duration > 0.0) {
            return Err(invalid("command window must be positive"));
        }
        if !(command.min_burn_rate > 0.0) || command.min_burn_rate > command.max_burn_rate {
            return Err(invalid("burn limits must satisfy 0 < min <= max"));
        }

        let tolerances = &self.tolerances;
        if !(tolerances.fuel_exhaustion > 0.0)
            || !(tolerances.min_refine_step > 0.0)
            || !(tolerances.correction_margin >= 0.0)
        {
            return Err(invalid("tolerances must be positive"));
        }
        if tolerances.max_refine_iterations == 0 || tolerances.max_correction_iterations == 0 {
            return Err(invalid("iteration caps must be at least 1"));
        }
        Ok(())
    }
}

/// Load and validate a configuration from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    SimulationConfig::from_toml_str(&contents)
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matches_historical_mission() {
        let config = SimulationConfig::default();
        assert_eq!(config.initial.altitude, 120.0);
        assert_eq!(config.initial.velocity, 1.0);
        assert_eq!(config.initial.total_mass - config.initial.dry_mass, 16_000.0);
        assert_eq!(config.command.max_burn_rate, 200.0);
        assert_eq!(config.tolerances.correction_margin, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config = SimulationConfig::from_toml_str(
            "[initial]\naltitude = 80.0\n\n[tolerances]\nmin_refine_step = 0.001\n",
        )
        .expect("partial config should parse");

        assert_eq!(config.initial.altitude, 80.0);
        assert_eq!(config.initial.dry_mass, DRY_MASS);
        assert_eq!(config.tolerances.min_refine_step, 0.001);
        assert_eq!(config.tolerances.fuel_exhaustion, FUEL_EXHAUSTION_TOLERANCE);
        assert_eq!(config.physics, Physics::default());
    }

    #[test]
    fn test_rejects_total_mass_below_dry_mass() {
        let result =
            SimulationConfig::from_toml_str("[initial]\ntotal_mass = 100.0\ndry_mass = 200.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_inverted_burn_limits() {
        let result = SimulationConfig::from_toml_str(
            "[command]\nmin_burn_rate = 50.0\nmax_burn_rate = 10.0\n",
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result = SimulationConfig::from_toml_str("[physics]\ndrag = 0.3\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[physics]\ngravity = 0.002").expect("write config");

        let config = load_config(file.path()).expect("config should load");
        assert_eq!(config.physics.gravity, 0.002);
        assert_eq!(config.physics.thrust_coefficient, THRUST_COEFFICIENT);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/lunar.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
