//! Sources of burn rate commands.
//!
//! The descent core asks a [`BurnRateSource`] for the next rate at the start
//! of every command window and only ever sees values that passed the range
//! check. Rejected input is the source's problem: it re-requests until it has
//! a valid value or runs dry.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use super::propulsion::{BurnLimits, BurnRate};
use crate::errors::SimulationError;
use crate::telemetry_system::telemetry::{format_status_line, StatusReport};

pub trait BurnRateSource {
    /// Next command for a window that starts in `status`. `Ok(None)` means no
    /// more input will come and the attempt ends.
    fn next_burn_rate(&mut self, status: &StatusReport) -> Result<Option<BurnRate>, SimulationError>;
}

/// Replays a fixed list of commands, one per window.
pub struct ScriptedBurnRates {
    rates: VecDeque<f64>,
    limits: BurnLimits,
}

impl ScriptedBurnRates {
    pub fn new<I: IntoIterator<Item = f64>>(rates: I, limits: BurnLimits) -> Self {
        ScriptedBurnRates {
            rates: rates.into_iter().collect(),
            limits,
        }
    }

    /// Commands not yet handed out.
    pub fn remaining(&self) -> usize {
        self.rates.len()
    }
}

impl BurnRateSource for ScriptedBurnRates {
    fn next_burn_rate(&mut self, status: &StatusReport) -> Result<Option<BurnRate>, SimulationError> {
        while let Some(rate) = self.rates.pop_front() {
            match BurnRate::new(rate, &self.limits) {
                Ok(rate) => return Ok(Some(rate)),
                Err(_) => warn!(
                    rate,
                    elapsed = status.elapsed_time,
                    "skipping scripted burn rate outside limits"
                ),
            }
        }
        Ok(None)
    }
}

/// Reads commands from an operator at a terminal.
///
/// Prints the status row and a `K=:` prompt before each read. The leading
/// number of a line is the command (`100 LBS` reads as 100), a line that does
/// not start with one counts as 0. Out-of-range numbers are answered with
/// `NOT POSSIBLE` and prompted for again.
pub struct ConsoleGate<R, W> {
    input: R,
    output: W,
    limits: BurnLimits,
}

impl<R: BufRead, W: Write> ConsoleGate<R, W> {
    pub fn new(input: R, output: W, limits: BurnLimits) -> Self {
        ConsoleGate {
            input,
            output,
            limits,
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>, SimulationError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks whether to fly again. End of input counts as no.
    pub fn ask_try_again(&mut self) -> Result<bool, SimulationError> {
        write!(self.output, "\n\n\n\nTRY AGAIN?\n")?;
        loop {
            write!(self.output, "(ANS. YES OR NO):")?;
            self.output.flush()?;
            let answer = match self.read_line()? {
                Some(answer) => answer.to_ascii_uppercase(),
                None => return Ok(false),
            };
            match answer.as_str() {
                "YES" => return Ok(true),
                "NO" => return Ok(false),
                _ => continue,
            }
        }
    }
}

impl<R: BufRead, W: Write> BurnRateSource for ConsoleGate<R, W> {
    fn next_burn_rate(&mut self, status: &StatusReport) -> Result<Option<BurnRate>, SimulationError> {
        write!(self.output, "{}K=:", format_status_line(status))?;
        loop {
            self.output.flush()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            let requested = leading_number(&line).unwrap_or(0.0);
            match BurnRate::new(requested, &self.limits) {
                Ok(rate) => return Ok(Some(rate)),
                Err(_) => write!(self.output, "NOT POSSIBLE{}K=:", ".".repeat(51))?,
            }
        }
    }
}

/// Longest prefix of `text` that reads as a decimal number.
fn leading_number(text: &str) -> Option<f64> {
    let numeric = text
        .find(|c: char| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .map_or(text, |end| &text[..end]);
    (1..=numeric.len())
        .rev()
        .find_map(|end| numeric[..end].parse::<f64>().ok())
}

/// Picks commands at random. Seeded, so a run can be replayed exactly.
pub struct RandomPilot {
    rng: StdRng,
    limits: BurnLimits,
    coast_probability: f64,
}

impl RandomPilot {
    pub fn new(seed: u64, limits: BurnLimits) -> Self {
        RandomPilot {
            rng: StdRng::seed_from_u64(seed),
            limits,
            coast_probability: 0.25,
        }
    }

    pub fn with_coast_probability(mut self, probability: f64) -> Self {
        self.coast_probability = probability.clamp(0.0, 1.0);
        self
    }
}

impl BurnRateSource for RandomPilot {
    fn next_burn_rate(&mut self, _status: &StatusReport) -> Result<Option<BurnRate>, SimulationError> {
        let rate = if self.rng.gen_bool(self.coast_probability) {
            0.0
        } else {
            self.rng.gen_range(self.limits.min..=self.limits.max)
        };
        BurnRate::new(rate, &self.limits).map(Some)
    }
}
