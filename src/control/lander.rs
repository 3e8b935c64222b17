use tracing::{debug, info, trace, warn};

use super::input_gate::BurnRateSource;
use super::landing::LandingReport;
use super::propulsion::{fuel_limited_step, is_out_of_fuel, BurnLimits};
use crate::config::SimulationConfig;
use crate::errors::SimulationError;
use crate::telemetry_system::telemetry::{StatusReport, Telemetry};
use crate::trajectory_system::free_fall;
use crate::trajectory_system::kinematics::{Candidate, SimulationState};

/// Control phase of the descent.
///
/// | Phase                | Meaning                                                   |
/// |----------------------|-----------------------------------------------------------|
/// | `AwaitingCommand`    | a new command window starts, burn rate is requested       |
/// | `Descending`         | stepping through the window at the commanded burn rate    |
/// | `RefineApproach`     | the last step would cross the surface, shrinking it       |
/// | `VelocityCorrection` | the last step would reverse the velocity, stepping to the turning point |
/// | `FreeFall`           | propellant is gone, touchdown solved in closed form       |
/// | `Landed`             | on the surface, report available                          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescentPhase {
    AwaitingCommand,
    Descending,
    RefineApproach,
    VelocityCorrection,
    FreeFall,
    Landed,
}

pub struct Lander {
    pub state: SimulationState,
    pub phase: DescentPhase,
    pub telemetry: Telemetry,
    config: SimulationConfig,
    limits: BurnLimits,
    // Length of the most recent candidate step, carried across phases.
    step: f64,
    refine_iterations: u32,
    correction_iterations: u32,
    report: Option<LandingReport>,
}

impl Default for Lander {
    fn default() -> Self {
        Lander::build(SimulationConfig::default())
    }
}

impl Lander {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Lander::build(config))
    }

    fn build(config: SimulationConfig) -> Self {
        Lander {
            state: SimulationState::new(&config.initial, &config.physics),
            phase: DescentPhase::AwaitingCommand,
            telemetry: Telemetry::new(),
            limits: BurnLimits::from(&config.command),
            config,
            step: 0.0,
            refine_iterations: 0,
            correction_iterations: 0,
            report: None,
        }
    }

    /// Puts the capsule back at the start of the mission with the same
    /// constants, ready for another attempt.
    pub fn reset(&mut self) {
        *self = Lander::build(self.config);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn limits(&self) -> BurnLimits {
        self.limits
    }

    pub fn landing_report(&self) -> Option<LandingReport> {
        self.report
    }

    /// Flies the attempt to touchdown, asking `source` for every command.
    pub fn run(&mut self, source: &mut dyn BurnRateSource) -> Result<LandingReport, SimulationError> {
        while self.update(source)? != DescentPhase::Landed {}
        self.report
            .ok_or_else(|| SimulationError::PhysicsError("landed without a report".to_string()))
    }

    /// Performs the action of the current phase and returns the phase it
    /// leads to.
    pub fn update(&mut self, source: &mut dyn BurnRateSource) -> Result<DescentPhase, SimulationError> {
        match self.phase {
            DescentPhase::AwaitingCommand => self.await_command(source)?,
            DescentPhase::Descending => self.descend(),
            DescentPhase::RefineApproach => self.refine_approach()?,
            DescentPhase::VelocityCorrection => self.correct_velocity()?,
            DescentPhase::FreeFall => {
                let step = free_fall::solve(&mut self.state);
                trace!(step, "free fall to the surface");
                self.land();
            }
            DescentPhase::Landed => {}
        }
        Ok(self.phase)
    }

    fn await_command(&mut self, source: &mut dyn BurnRateSource) -> Result<(), SimulationError> {
        let status = StatusReport::from_state(&self.state);
        let rate = source
            .next_burn_rate(&status)?
            .ok_or(SimulationError::InputClosed)?;

        self.state.burn_rate = rate.value();
        self.state.interval_remaining = self.config.command.duration;
        self.telemetry.record_command(status, rate.value());
        debug!(burn_rate = rate.value(), elapsed = self.state.elapsed_time, "command accepted");

        self.transition(DescentPhase::Descending);
        Ok(())
    }

    fn descend(&mut self) {
        let tolerance = self.config.tolerances.fuel_exhaustion;
        if is_out_of_fuel(&self.state, tolerance) {
            info!(elapsed = self.state.elapsed_time, "fuel exhausted");
            self.telemetry.record_fuel_out(self.state.elapsed_time);
            self.transition(DescentPhase::FreeFall);
            return;
        }
        if self.state.interval_remaining < tolerance {
            self.transition(DescentPhase::AwaitingCommand);
            return;
        }

        self.step = fuel_limited_step(&self.state, self.state.interval_remaining);
        let candidate = self.state.integrate(self.step);

        if candidate.altitude <= 0.0 {
            self.refine_iterations = 0;
            self.transition(DescentPhase::RefineApproach);
        } else if self.state.velocity <= 0.0 {
            self.commit(&candidate);
        } else if candidate.velocity < 0.0 {
            self.correction_iterations = 0;
            self.transition(DescentPhase::VelocityCorrection);
        } else {
            self.commit(&candidate);
        }
    }

    fn refine_approach(&mut self) -> Result<(), SimulationError> {
        let tolerances = self.config.tolerances;
        if self.step < tolerances.min_refine_step {
            self.land();
            return Ok(());
        }
        if is_out_of_fuel(&self.state, tolerances.fuel_exhaustion) {
            info!(elapsed = self.state.elapsed_time, "fuel exhausted during approach");
            self.telemetry.record_fuel_out(self.state.elapsed_time);
            self.transition(DescentPhase::FreeFall);
            return Ok(());
        }

        self.refine_iterations += 1;
        if self.refine_iterations > tolerances.max_refine_iterations {
            return Err(SimulationError::RefinementLimit {
                phase: DescentPhase::RefineApproach,
                iterations: self.refine_iterations - 1,
            });
        }
        self.telemetry.record_refine_iterations(self.refine_iterations);

        let state = &self.state;
        let residual = clamped_root(
            state.velocity * state.velocity + 2.0 * state.altitude * state.net_acceleration(),
            "approach",
        );
        let step = 2.0 * state.altitude / (state.velocity + residual);
        if step <= 0.0 {
            // Already at or marginally below the surface.
            self.land();
            return Ok(());
        }
        self.step = self.capped_step(step)?;

        let candidate = self.state.integrate(self.step);
        self.commit(&candidate);
        Ok(())
    }

    fn correct_velocity(&mut self) -> Result<(), SimulationError> {
        let tolerances = self.config.tolerances;
        if is_out_of_fuel(&self.state, tolerances.fuel_exhaustion) {
            self.transition(DescentPhase::Descending);
            return Ok(());
        }

        let state = &self.state;
        if state.burn_rate <= 0.0 {
            return Err(SimulationError::PhysicsError(
                "velocity correction entered without thrust".to_string(),
            ));
        }

        self.correction_iterations += 1;
        if self.correction_iterations > tolerances.max_correction_iterations {
            return Err(SimulationError::RefinementLimit {
                phase: DescentPhase::VelocityCorrection,
                iterations: self.correction_iterations - 1,
            });
        }
        self.telemetry.record_correction_iterations(self.correction_iterations);

        let thrust = state.thrust_coefficient * state.burn_rate;
        let turning = (1.0 - state.total_mass * state.gravity / thrust) / 2.0;
        let residual = clamped_root(
            turning * turning + state.velocity / state.thrust_coefficient,
            "turning point",
        );
        let step = state.total_mass * state.velocity / (thrust * (turning + residual))
            + tolerances.correction_margin;
        self.step = self.capped_step(step)?;

        let candidate = self.state.integrate(self.step);
        if candidate.altitude <= 0.0 {
            self.refine_iterations = 0;
            self.transition(DescentPhase::RefineApproach);
            return Ok(());
        }

        self.commit(&candidate);
        if candidate.velocity >= 0.0 || self.state.velocity <= 0.0 {
            self.transition(DescentPhase::Descending);
        }
        Ok(())
    }

    /// Shortens a refinement step that would burn more propellant than is left.
    fn capped_step(&self, step: f64) -> Result<f64, SimulationError> {
        if !step.is_finite() {
            return Err(SimulationError::PhysicsError(format!(
                "non-finite step in {:?} at t={}",
                self.phase, self.state.elapsed_time
            )));
        }
        let capped = fuel_limited_step(&self.state, step);
        if capped != step {
            warn!(step, capped, phase = ?self.phase, "refinement step capped at remaining fuel");
        }
        Ok(capped)
    }

    fn commit(&mut self, candidate: &Candidate) {
        self.state.commit(candidate);
        self.telemetry.record_step(&self.state);
        trace!(
            step = candidate.step,
            altitude = self.state.altitude,
            velocity = self.state.velocity,
            mass = self.state.total_mass,
            "step committed"
        );
    }

    fn land(&mut self) {
        self.state.altitude = self.state.altitude.max(0.0);
        let report = LandingReport::from_state(&self.state);
        info!(
            elapsed = report.elapsed_time,
            impact_mph = report.impact_velocity,
            fuel = report.fuel_remaining,
            outcome = ?report.outcome,
            survived = report.outcome.is_survivable(),
            "touchdown"
        );
        self.report = Some(report);
        self.transition(DescentPhase::Landed);
    }

    fn transition(&mut self, next: DescentPhase) {
        debug!(from = ?self.phase, to = ?next, elapsed = self.state.elapsed_time, "phase transition");
        self.telemetry.record_transition(next, self.state.elapsed_time);
        self.phase = next;
    }
}

/// Square root with negative arguments read as zero. They only appear from
/// rounding right at a refinement boundary.
fn clamped_root(value: f64, context: &str) -> f64 {
    if value < 0.0 {
        warn!(value, context, "negative square root argument clamped to zero");
        0.0
    } else {
        value.sqrt()
    }
}
