use crate::constants::{FEET_PER_MILE, SECONDS_PER_HOUR};
use crate::control::lander::DescentPhase;
use crate::control::landing::{LandingOutcome, LandingReport};
use crate::trajectory_system::kinematics::SimulationState;

/// What the operator is shown before choosing the next burn rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusReport {
    pub elapsed_time: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub fuel_remaining: f64,
}

impl StatusReport {
    pub fn from_state(state: &SimulationState) -> Self {
        StatusReport {
            elapsed_time: state.elapsed_time,
            altitude: state.altitude,
            velocity: state.velocity,
            fuel_remaining: state.fuel_remaining(),
        }
    }

    /// Altitude split into whole miles and the remaining feet.
    pub fn miles_and_feet(&self) -> (f64, f64) {
        let miles = self.altitude.trunc();
        (miles, FEET_PER_MILE * (self.altitude - miles))
    }

    pub fn velocity_mph(&self) -> f64 {
        self.velocity * SECONDS_PER_HOUR
    }
}

/// Column header matching [`format_status_line`].
pub const STATUS_HEADER: &str =
    "TIME,SECS   ALTITUDE,MILES+FEET   VELOCITY,MPH   FUEL,LBS   FUEL RATE";

pub fn format_status_line(status: &StatusReport) -> String {
    let (miles, feet) = status.miles_and_feet();
    format!(
        "{:9.0}{:12.0}{:8.0}         {:6.2}      {:6.1}      ",
        status.elapsed_time,
        miles,
        feet,
        status.velocity_mph(),
        status.fuel_remaining
    )
}

pub fn format_fuel_out(elapsed_time: f64) -> String {
    format!("FUEL OUT AT{:9.2} SECS", elapsed_time)
}

/// The touchdown block: time, impact speed, fuel left and the verdict.
pub fn format_landing(report: &LandingReport) -> Vec<String> {
    let fuel = format!("{:.2}", report.fuel_remaining);
    let width = if fuel.len() >= 8 { fuel.len() + 2 } else { 9 };

    let mut lines = vec![
        format!("ON THE MOON AT{:9.2} SECS", report.elapsed_time),
        format!("IMPACT VELOCITY OF{:9.2}M.P.H.", report.impact_velocity),
        format!("FUEL LEFT:{:>width$} LBS", fuel, width = width),
    ];
    lines.extend(outcome_message(&report.outcome));
    lines
}

fn outcome_message(outcome: &LandingOutcome) -> Vec<String> {
    match outcome {
        LandingOutcome::Perfect => vec!["PERFECT LANDING !-(LUCKY)".to_string()],
        LandingOutcome::Good => vec!["GOOD LANDING-(COULD BE BETTER)".to_string()],
        LandingOutcome::Poor => vec!["CONGRATULATIONS ON A POOR LANDING".to_string()],
        LandingOutcome::CraftDamage => vec!["CRAFT DAMAGE. GOOD LUCK".to_string()],
        LandingOutcome::CrashLanding => vec!["CRASH LANDING-YOU'VE 5 HRS OXYGEN".to_string()],
        LandingOutcome::NoSurvivors { crater_depth } => vec![
            "SORRY,BUT THERE WERE NO SURVIVORS-YOU BLEW IT!".to_string(),
            format!(
                "IN FACT YOU BLASTED A NEW LUNAR CRATER{:9.2} FT.DEEP",
                crater_depth
            ),
        ],
    }
}

/// Flight log of one attempt: the status at every command, each phase
/// entered, and how hard the refinement loops had to work.
#[derive(Debug, Default, Clone)]
pub struct Telemetry {
    pub commands: Vec<(StatusReport, f64)>,
    phase_log: Vec<(DescentPhase, f64)>,
    committed_steps: usize,
    max_refine_iterations: u32,
    max_correction_iterations: u32,
    fuel_out_time: Option<f64>,
    min_fuel: Option<f64>,
}

impl Telemetry {
    pub fn new() -> Self {
        Telemetry::default()
    }

    pub fn record_command(&mut self, status: StatusReport, burn_rate: f64) {
        self.commands.push((status, burn_rate));
    }

    pub fn record_transition(&mut self, phase: DescentPhase, elapsed_time: f64) {
        self.phase_log.push((phase, elapsed_time));
    }

    pub fn record_step(&mut self, state: &SimulationState) {
        self.committed_steps += 1;
        let fuel = state.fuel_remaining();
        if self.min_fuel.map_or(true, |min| fuel < min) {
            self.min_fuel = Some(fuel);
        }
    }

    pub fn record_refine_iterations(&mut self, iterations: u32) {
        self.max_refine_iterations = self.max_refine_iterations.max(iterations);
    }

    pub fn record_correction_iterations(&mut self, iterations: u32) {
        self.max_correction_iterations = self.max_correction_iterations.max(iterations);
    }

    pub fn record_fuel_out(&mut self, elapsed_time: f64) {
        self.fuel_out_time = Some(elapsed_time);
    }

    /// How many times the machine entered `phase`.
    pub fn entries(&self, phase: DescentPhase) -> usize {
        self.phase_log.iter().filter(|(p, _)| *p == phase).count()
    }

    pub fn phase_log(&self) -> &[(DescentPhase, f64)] {
        &self.phase_log
    }

    pub fn committed_steps(&self) -> usize {
        self.committed_steps
    }

    pub fn max_refine_iterations(&self) -> u32 {
        self.max_refine_iterations
    }

    pub fn max_correction_iterations(&self) -> u32 {
        self.max_correction_iterations
    }

    pub fn fuel_out_time(&self) -> Option<f64> {
        self.fuel_out_time
    }

    /// Lowest propellant mass seen after any committed step.
    pub fn min_fuel(&self) -> Option<f64> {
        self.min_fuel
    }

    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Commands: {}", self.commands.len()),
            format!("Committed steps: {}", self.committed_steps),
            format!("Max approach refinements: {}", self.max_refine_iterations),
            format!("Max velocity corrections: {}", self.max_correction_iterations),
        ];
        if let Some(fuel) = self.min_fuel() {
            lines.push(format!("Lowest fuel: {:.2} lbs", fuel));
        }
        if let Some(time) = self.fuel_out_time {
            lines.push(format!("Fuel out at: {:.2}s", time));
        }
        for (phase, time) in &self.phase_log {
            lines.push(format!("Phase {:?} entered at: {:.3}s", phase, time));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InitialConditions, Physics};

    fn initial_status() -> StatusReport {
        StatusReport {
            elapsed_time: 0.0,
            altitude: 120.0,
            velocity: 1.0,
            fuel_remaining: 16_000.0,
        }
    }

    #[test]
    fn test_status_line_initial() {
        assert_eq!(
            format_status_line(&initial_status()),
            "        0         120       0         3600.00      16000.0      "
        );
    }

    #[test]
    fn test_miles_and_feet() {
        let status = StatusReport {
            altitude: 109.5,
            ..initial_status()
        };
        assert_eq!(status.miles_and_feet(), (109.0, 2640.0));
    }

    #[test]
    fn test_fuel_out_line() {
        assert_eq!(format_fuel_out(143.75), "FUEL OUT AT   143.75 SECS");
    }

    #[test]
    fn test_landing_block_fatal() {
        let report = LandingReport {
            elapsed_time: 214.03,
            impact_velocity: 102.1,
            fuel_remaining: 319.48,
            outcome: LandingOutcome::classify(102.1),
        };
        let lines = format_landing(&report);
        assert_eq!(lines[0], "ON THE MOON AT   214.03 SECS");
        assert_eq!(lines[1], "IMPACT VELOCITY OF   102.10M.P.H.");
        assert_eq!(lines[2], "FUEL LEFT:   319.48 LBS");
        assert_eq!(lines[3], "SORRY,BUT THERE WERE NO SURVIVORS-YOU BLEW IT!");
        assert!(lines[4].starts_with("IN FACT YOU BLASTED A NEW LUNAR CRATER"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_landing_block_widens_for_large_fuel() {
        let report = LandingReport {
            elapsed_time: 113.55,
            impact_velocity: 4008.79,
            fuel_remaining: 16_000.0,
            outcome: LandingOutcome::classify(4008.79),
        };
        assert_eq!(format_landing(&report)[2], "FUEL LEFT:  16000.00 LBS");
    }

    #[test]
    fn test_entries_and_min_fuel() {
        let mut telemetry = Telemetry::new();
        telemetry.record_transition(DescentPhase::Descending, 0.0);
        telemetry.record_transition(DescentPhase::VelocityCorrection, 5.0);
        telemetry.record_transition(DescentPhase::Descending, 6.0);
        telemetry.record_refine_iterations(2);
        telemetry.record_refine_iterations(1);

        assert_eq!(telemetry.entries(DescentPhase::Descending), 2);
        assert_eq!(telemetry.entries(DescentPhase::VelocityCorrection), 1);
        assert_eq!(telemetry.entries(DescentPhase::FreeFall), 0);
        assert_eq!(telemetry.max_refine_iterations(), 2);
        assert_eq!(telemetry.min_fuel(), None);
    }

    #[test]
    fn test_summary_reports_lowest_fuel() {
        let mut state = SimulationState::new(&InitialConditions::default(), &Physics::default());
        let mut telemetry = Telemetry::new();
        assert!(!telemetry.summary().iter().any(|line| line.starts_with("Lowest fuel")));

        state.total_mass -= 400.0;
        telemetry.record_step(&state);
        state.total_mass -= 100.0;
        telemetry.record_step(&state);

        assert_eq!(telemetry.min_fuel(), Some(15_500.0));
        let summary = telemetry.summary();
        assert_eq!(summary[1], "Committed steps: 2");
        assert!(summary.contains(&"Lowest fuel: 15500.00 lbs".to_string()));
    }
}
