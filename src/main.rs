use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use lunar_descent::telemetry_system::telemetry::{format_fuel_out, format_landing, STATUS_HEADER};
use lunar_descent::trajectory_system::free_fall;
use lunar_descent::*;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Powered lunar descent simulator")]
struct Cli {
    /// TOML file overriding mission constants and tolerances
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated burn rates, one per command window, instead of the keyboard
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    burns: Option<Vec<f64>>,

    /// Let a seeded random pilot fly the descent
    #[arg(long, conflicts_with = "burns")]
    random_seed: Option<u64>,

    /// Print the flight log summary after touchdown
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    let mut lander = Lander::new(config)?;

    if let Some(burns) = cli.burns {
        let mut source = ScriptedBurnRates::new(burns, lander.limits());
        fly_unattended(&mut lander, &mut source, cli.summary)?;
        if source.remaining() > 0 {
            warn!(unused = source.remaining(), "burn rates left over after touchdown");
        }
    } else if let Some(seed) = cli.random_seed {
        let mut source = RandomPilot::new(seed, lander.limits());
        fly_unattended(&mut lander, &mut source, cli.summary)?;
    } else {
        play(&mut lander, cli.summary)?;
    }

    Ok(())
}

/// Keyboard play with restarts until the operator declines or input ends.
fn play(lander: &mut Lander, summary: bool) -> Result<(), SimulationError> {
    let stdin = io::stdin();
    let mut gate = ConsoleGate::new(stdin.lock(), io::stdout(), lander.limits());

    loop {
        write_intro(gate.output(), lander.config())?;
        match lander.run(&mut gate) {
            Ok(report) => write_touchdown(gate.output(), lander, &report, summary)?,
            Err(SimulationError::InputClosed) => {
                writeln!(gate.output(), "\nCONTROL OUT\n\n")?;
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        if !gate.ask_try_again()? {
            writeln!(gate.output(), "CONTROL OUT\n\n")?;
            return Ok(());
        }
        lander.reset();
    }
}

fn fly_unattended(
    lander: &mut Lander,
    source: &mut dyn BurnRateSource,
    summary: bool,
) -> Result<(), SimulationError> {
    let report = lander.run(source)?;
    let stdout = io::stdout();
    write_touchdown(&mut stdout.lock(), lander, &report, summary)
}

fn write_intro(out: &mut impl Write, config: &SimulationConfig) -> Result<(), SimulationError> {
    let initial = &config.initial;
    let estimate = free_fall::time_to_impact(initial.altitude, initial.velocity, config.physics.gravity);

    writeln!(out, "CONTROL CALLING LUNAR MODULE. MANUAL CONTROL IS NECESSARY")?;
    writeln!(
        out,
        "YOU MAY RESET FUEL RATE K EACH {} SECS TO 0 OR ANY VALUE",
        config.command.duration
    )?;
    writeln!(
        out,
        "BETWEEN {} & {} LBS/SEC. YOU'VE {} LBS FUEL. ESTIMATED",
        config.command.min_burn_rate,
        config.command.max_burn_rate,
        initial.total_mass - initial.dry_mass
    )?;
    writeln!(
        out,
        "FREE FALL IMPACT TIME-{:.0} SECS. CAPSULE WEIGHT-{} LBS",
        estimate, initial.total_mass
    )?;
    writeln!(out, "FIRST RADAR CHECK COMING UP\n\n")?;
    writeln!(out, "COMMENCE LANDING PROCEDURE")?;
    writeln!(out, "{}", STATUS_HEADER)?;
    Ok(())
}

fn write_touchdown(
    out: &mut impl Write,
    lander: &Lander,
    report: &LandingReport,
    summary: bool,
) -> Result<(), SimulationError> {
    if let Some(time) = lander.telemetry.fuel_out_time() {
        writeln!(out, "{}", format_fuel_out(time))?;
    }
    for line in format_landing(report) {
        writeln!(out, "{}", line)?;
    }
    if summary {
        writeln!(out)?;
        for line in lander.telemetry.summary() {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()?;
    Ok(())
}
