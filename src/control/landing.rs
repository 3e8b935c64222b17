use crate::constants::*;
use crate::trajectory_system::kinematics::SimulationState;

/// Touchdown outcome, ordered from softest to hardest impact.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum LandingOutcome {
    Perfect,
    Good,
    Poor,
    CraftDamage,
    CrashLanding,
    NoSurvivors { crater_depth: f64 },
}

impl LandingOutcome {
    /// Classifies an impact speed in mph. Each threshold is inclusive, so a
    /// speed sitting exactly on a boundary belongs to the softer outcome.
    pub fn classify(impact_mph: f64) -> Self {
        if impact_mph <= PERFECT_LANDING_SPEED {
            LandingOutcome::Perfect
        } else if impact_mph <= GOOD_LANDING_SPEED {
            LandingOutcome::Good
        } else if impact_mph <= POOR_LANDING_SPEED {
            LandingOutcome::Poor
        } else if impact_mph <= CRAFT_DAMAGE_SPEED {
            LandingOutcome::CraftDamage
        } else if impact_mph <= CRASH_LANDING_SPEED {
            LandingOutcome::CrashLanding
        } else {
            LandingOutcome::NoSurvivors {
                crater_depth: impact_mph * CRATER_DEPTH_PER_MPH,
            }
        }
    }

    pub fn is_survivable(&self) -> bool {
        !matches!(self, LandingOutcome::NoSurvivors { .. })
    }
}

/// Terminal result of an attempt, handed to whoever renders it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingReport {
    pub elapsed_time: f64,
    pub impact_velocity: f64,
    pub fuel_remaining: f64,
    pub outcome: LandingOutcome,
}

impl LandingReport {
    pub fn from_state(state: &SimulationState) -> Self {
        let impact_velocity = state.velocity * SECONDS_PER_HOUR;
        LandingReport {
            elapsed_time: state.elapsed_time,
            impact_velocity,
            fuel_remaining: state.fuel_remaining(),
            outcome: LandingOutcome::classify(impact_velocity),
        }
    }
}
