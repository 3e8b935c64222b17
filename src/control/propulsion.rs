use crate::config::CommandWindow;
use crate::errors::SimulationError;
use crate::trajectory_system::kinematics::SimulationState;

/// Burn rates an operator may command: exactly zero (free fall) or anything
/// inside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnLimits {
    pub min: f64,
    pub max: f64,
}

impl BurnLimits {
    pub fn new(min: f64, max: f64) -> Self {
        BurnLimits { min, max }
    }

    pub fn accepts(&self, rate: f64) -> bool {
        rate == 0.0 || (rate >= self.min && rate <= self.max)
    }
}

impl From<&CommandWindow> for BurnLimits {
    fn from(window: &CommandWindow) -> Self {
        BurnLimits::new(window.min_burn_rate, window.max_burn_rate)
    }
}

impl Default for BurnLimits {
    fn default() -> Self {
        BurnLimits::from(&CommandWindow::default())
    }
}

/// A propellant flow rate in lbs/s that has passed the range check.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BurnRate(f64);

impl BurnRate {
    pub const ZERO: BurnRate = BurnRate(0.0);

    pub fn new(rate: f64, limits: &BurnLimits) -> Result<Self, SimulationError> {
        if limits.accepts(rate) {
            Ok(BurnRate(rate))
        } else {
            Err(SimulationError::InputError(format!(
                "burn rate {} outside 0 or [{}, {}]",
                rate, limits.min, limits.max
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Step length that runs `step` seconds at the current burn rate, shortened
/// so that it burns at most the propellant that is left.
pub fn fuel_limited_step(state: &SimulationState, step: f64) -> f64 {
    if state.dry_mass + step * state.burn_rate > state.total_mass {
        (state.total_mass - state.dry_mass) / state.burn_rate
    } else {
        step
    }
}

pub fn is_out_of_fuel(state: &SimulationState, tolerance: f64) -> bool {
    state.fuel_remaining() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InitialConditions, Physics};

    fn state_with(fuel: f64, burn_rate: f64) -> SimulationState {
        let mut state = SimulationState::new(&InitialConditions::default(), &Physics::default());
        state.total_mass = state.dry_mass + fuel;
        state.burn_rate = burn_rate;
        state
    }

    #[test]
    fn test_limits_accept_zero_and_closed_range() {
        let limits = BurnLimits::default();
        assert!(limits.accepts(0.0));
        assert!(limits.accepts(8.0));
        assert!(limits.accepts(200.0));
        assert!(!limits.accepts(7.99));
        assert!(!limits.accepts(200.01));
        assert!(!limits.accepts(-8.0));
    }

    #[test]
    fn test_burn_rate_rejects_out_of_range() {
        let limits = BurnLimits::default();
        assert_eq!(BurnRate::new(170.0, &limits).unwrap().value(), 170.0);
        assert!(matches!(
            BurnRate::new(5.0, &limits),
            Err(SimulationError::InputError(_))
        ));
        assert!(BurnRate::new(f64::NAN, &limits).is_err());
    }

    #[test]
    fn test_full_step_when_fuel_suffices() {
        let state = state_with(16_000.0, 200.0);
        assert_eq!(fuel_limited_step(&state, 10.0), 10.0);
    }

    #[test]
    fn test_step_shortened_to_remaining_fuel() {
        let state = state_with(500.0, 200.0);
        assert_eq!(fuel_limited_step(&state, 10.0), 2.5);
    }

    #[test]
    fn test_zero_burn_never_shortens() {
        let state = state_with(0.0, 0.0);
        assert_eq!(fuel_limited_step(&state, 10.0), 10.0);
    }

    #[test]
    fn test_is_out_of_fuel() {
        assert!(is_out_of_fuel(&state_with(0.0005, 0.0), 1e-3));
        assert!(!is_out_of_fuel(&state_with(0.5, 0.0), 1e-3));
    }
}
