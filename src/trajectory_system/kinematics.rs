use crate::config::{InitialConditions, Physics};

/// Vertical state of the capsule. Distances in miles, velocities in miles/s
/// (positive = closing on the surface), masses in lbs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub altitude: f64,
    pub velocity: f64,
    pub total_mass: f64,
    pub dry_mass: f64,
    pub elapsed_time: f64,
    pub interval_remaining: f64,
    pub burn_rate: f64,
    pub gravity: f64,
    pub thrust_coefficient: f64,
}

/// Altitude and velocity at the end of a tentative step. Nothing is
/// written back until the candidate is passed to [`SimulationState::commit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub step: f64,
    pub altitude: f64,
    pub velocity: f64,
}

impl SimulationState {
    pub fn new(initial: &InitialConditions, physics: &Physics) -> Self {
        SimulationState {
            altitude: initial.altitude,
            velocity: initial.velocity,
            total_mass: initial.total_mass,
            dry_mass: initial.dry_mass,
            elapsed_time: 0.0,
            interval_remaining: 0.0,
            burn_rate: 0.0,
            gravity: physics.gravity,
            thrust_coefficient: physics.thrust_coefficient,
        }
    }

    pub fn fuel_remaining(&self) -> f64 {
        self.total_mass - self.dry_mass
    }

    /// Propagates the state over `step` seconds at the current burn rate.
    ///
    /// Uses the fifth-order series expansion of the rocket equation in the
    /// impulse ratio `q = step * burn_rate / total_mass`. The term count and
    /// evaluation order are fixed; results are compared bit for bit against
    /// historical runs.
    pub fn integrate(&self, step: f64) -> Candidate {
        let q = step * self.burn_rate / self.total_mass;
        let q2 = q * q;
        let q3 = q2 * q;
        let q4 = q3 * q;
        let q5 = q4 * q;

        let velocity = self.velocity
            + self.gravity * step
            + self.thrust_coefficient * (-q - q2 / 2.0 - q3 / 3.0 - q4 / 4.0 - q5 / 5.0);
        let altitude = self.altitude - self.gravity * step * step / 2.0 - self.velocity * step
            + self.thrust_coefficient
                * step
                * (q / 2.0 + q2 / 6.0 + q3 / 12.0 + q4 / 20.0 + q5 / 30.0);

        Candidate {
            step,
            altitude,
            velocity,
        }
    }

    /// Applies a candidate: advances the clocks, burns propellant for the
    /// candidate's step and takes over its altitude and velocity.
    pub fn commit(&mut self, candidate: &Candidate) {
        let step = candidate.step;
        self.elapsed_time += step;
        self.interval_remaining -= step;
        self.total_mass -= step * self.burn_rate;
        self.altitude = candidate.altitude;
        self.velocity = candidate.velocity;

        debug_assert!(
            self.total_mass >= self.dry_mass - 1e-9,
            "Committed step burned past dry mass: total {} dry {}",
            self.total_mass,
            self.dry_mass
        );
    }

    /// Net downward acceleration at the current mass and burn rate.
    pub fn net_acceleration(&self) -> f64 {
        self.gravity - self.thrust_coefficient * self.burn_rate / self.total_mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn default_state() -> SimulationState {
        SimulationState::new(&InitialConditions::default(), &Physics::default())
    }

    #[test]
    fn test_new_state() {
        let state = default_state();
        assert_eq!(state.altitude, 120.0);
        assert_eq!(state.velocity, 1.0);
        assert_eq!(state.fuel_remaining(), 16_000.0);
        assert_eq!(state.elapsed_time, 0.0);
        assert_eq!(state.burn_rate, 0.0);
    }

    #[test]
    fn test_integrate_without_thrust_is_ballistic() {
        let state = default_state();
        let candidate = state.integrate(10.0);

        // v + g t and a - v t - g t² / 2
        assert_abs_diff_eq!(candidate.velocity, 1.01, epsilon = 1e-12);
        assert_abs_diff_eq!(candidate.altitude, 109.95, epsilon = 1e-12);
        assert_eq!(candidate.step, 10.0);
    }

    #[test]
    fn test_integrate_does_not_mutate_state() {
        let mut state = default_state();
        state.burn_rate = 200.0;
        let before = state;
        let _ = state.integrate(10.0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_integrate_with_thrust_matches_series() {
        let mut state = default_state();
        state.burn_rate = 200.0;
        let candidate = state.integrate(10.0);

        let q: f64 = 10.0 * 200.0 / 32_500.0;
        let series_v = -q - q.powi(2) / 2.0 - q.powi(3) / 3.0 - q.powi(4) / 4.0 - q.powi(5) / 5.0;
        let expected_v = 1.0 + 0.001 * 10.0 + 1.8 * series_v;
        assert_abs_diff_eq!(candidate.velocity, expected_v, epsilon = 1e-12);

        // The series tracks the exact logarithmic delta-v closely for small q.
        let exact_v = 1.0 + 0.001 * 10.0 + 1.8 * (1.0 - q).ln();
        assert_abs_diff_eq!(candidate.velocity, exact_v, epsilon = 1e-6);
        assert!(candidate.velocity < state.velocity);
    }

    #[test]
    fn test_commit_applies_candidate() {
        let mut state = default_state();
        state.burn_rate = 100.0;
        state.interval_remaining = 10.0;
        let candidate = state.integrate(4.0);
        state.commit(&candidate);

        assert_eq!(state.elapsed_time, 4.0);
        assert_eq!(state.interval_remaining, 6.0);
        assert_eq!(state.total_mass, 32_100.0);
        assert_eq!(state.altitude, candidate.altitude);
        assert_eq!(state.velocity, candidate.velocity);
    }

    #[test]
    fn test_net_acceleration() {
        let mut state = default_state();
        assert_eq!(state.net_acceleration(), 0.001);
        state.burn_rate = 200.0;
        assert!(state.net_acceleration() < 0.0);
    }
}
