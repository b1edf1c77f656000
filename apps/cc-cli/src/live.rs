//! Real-time interactive session driven from stdin.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use cc_config::SliderDef;
use cc_controls::Term;
use cc_core::{s, to_duration};
use cc_sim::{Command, Governor, Mode, TickDriver};
use tracing::{debug, info};

use crate::error::{CliError, CliResult};
use crate::print_status;

/// One parsed operator line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiveInput {
    Command(Command),
    Status,
    History,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  cruise | manual | mode     switch / toggle mode
  pause                      toggle pause
  p | i | d                  toggle a controller term
  perturb <m>                drop speed by m (e.g. 2, 5, 10)
  desired <v> | initial <v>  set a speed target (snapped to slider steps)
  status | history | help | quit";

/// Parse a line typed by the operator. Blank lines yield `None`.
pub fn parse_line(line: &str, sliders: &SliderDef) -> Result<Option<LiveInput>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments: {line}"));
    }

    let number = |what: &str| -> Result<f64, String> {
        let raw = arg.ok_or_else(|| format!("{what} needs a value"))?;
        raw.parse::<f64>()
            .map_err(|_| format!("not a number: {raw}"))
    };

    let input = match head.to_ascii_lowercase().as_str() {
        "cruise" => LiveInput::Command(Command::SetMode { mode: Mode::Cruise }),
        "manual" => LiveInput::Command(Command::SetMode { mode: Mode::Manual }),
        "mode" | "start" | "stop" => LiveInput::Command(Command::ToggleMode),
        "pause" => LiveInput::Command(Command::TogglePause),
        "p" => LiveInput::Command(Command::ToggleTerm { term: Term::P }),
        "i" => LiveInput::Command(Command::ToggleTerm { term: Term::I }),
        "d" => LiveInput::Command(Command::ToggleTerm { term: Term::D }),
        "perturb" => LiveInput::Command(Command::RequestPerturbation {
            magnitude: number("perturb")?,
        }),
        "desired" => LiveInput::Command(Command::SetDesiredSpeed {
            speed: sliders.quantize_desired(number("desired")?),
        }),
        "initial" => LiveInput::Command(Command::SetInitialSpeed {
            speed: sliders.quantize_initial(number("initial")?),
        }),
        "status" => LiveInput::Status,
        "history" => LiveInput::History,
        "help" | "?" => LiveInput::Help,
        "quit" | "exit" | "q" => LiveInput::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(input))
}

/// Run `governor` in real time until `quit`, stdin EOF or `seconds` elapse.
///
/// `speedup` scales wall-clock time: 2.0 ticks twice as often as `dt`.
pub fn run_live(
    governor: &Governor,
    sliders: &SliderDef,
    seconds: Option<f64>,
    speedup: f64,
) -> CliResult<u64> {
    if !speedup.is_finite() || speedup <= 0.0 {
        return Err(CliError::InvalidInput(format!(
            "speedup must be positive, got {speedup}"
        )));
    }
    let period = to_duration(s(governor.params().dt / speedup)).map_err(cc_sim::SimError::from)?;
    let deadline = match seconds {
        Some(secs) if secs.is_finite() && secs > 0.0 => {
            Some(Instant::now() + Duration::from_secs_f64(secs))
        }
        Some(secs) => {
            return Err(CliError::InvalidInput(format!(
                "seconds must be positive, got {secs}"
            )));
        }
        None => None,
    };

    let (line_tx, line_rx) = mpsc::channel::<String>();
    // Detached: a blocked stdin read must not keep the session alive.
    thread::Builder::new()
        .name("cc-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    let driver = TickDriver::spawn_with_period(governor.clone(), period)?;
    info!(period_ms = driver.period().as_secs_f64() * 1e3, "live session started");
    println!("{HELP}");

    let mut cursor = (0_u64, 0_usize);
    let mut stdin_open = true;
    loop {
        let wait = match deadline {
            Some(d) => {
                let now = Instant::now();
                if now >= d {
                    break;
                }
                d - now
            }
            None => Duration::from_millis(250),
        };

        if !stdin_open {
            // Nothing left to read; just let the clock run out.
            thread::sleep(wait);
            continue;
        }

        let line = match line_rx.recv_timeout(wait) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("stdin closed");
                if deadline.is_none() {
                    break;
                }
                stdin_open = false;
                continue;
            }
        };

        match parse_line(&line, sliders) {
            Ok(None) => {}
            Ok(Some(LiveInput::Command(command))) => governor.apply(command),
            Ok(Some(LiveInput::Status)) => print_status(&governor.snapshot_state()),
            Ok(Some(LiveInput::History)) => {
                let slice = governor.snapshot_history_since(cursor.0, cursor.1);
                if slice.reset {
                    println!("(history restarted)");
                }
                for sample in slice.samples.iter().rev().take(10).rev() {
                    println!(
                        "  t={:>7.2}s  speed={:>7.2}  error={:>7.2}  throttle={:>6.3}",
                        sample.time, sample.speed, sample.error, sample.throttle
                    );
                }
                println!("  ({} new samples)", slice.samples.len());
                cursor = slice.next_cursor();
            }
            Ok(Some(LiveInput::Help)) => println!("{HELP}"),
            Ok(Some(LiveInput::Quit)) => break,
            Err(message) => eprintln!("{message}"),
        }
    }

    let ticks = driver.stop()?;
    info!(ticks, "live session finished");
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Option<LiveInput>, String> {
        parse_line(line, &SliderDef::default())
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn mode_words() {
        assert_eq!(
            parse("cruise"),
            Ok(Some(LiveInput::Command(Command::SetMode { mode: Mode::Cruise })))
        );
        assert_eq!(
            parse("STOP"),
            Ok(Some(LiveInput::Command(Command::ToggleMode)))
        );
    }

    #[test]
    fn desired_speed_is_snapped_to_cruise_step() {
        assert_eq!(
            parse("desired 103"),
            Ok(Some(LiveInput::Command(Command::SetDesiredSpeed { speed: 105.0 })))
        );
        assert_eq!(
            parse("initial 250"),
            Ok(Some(LiveInput::Command(Command::SetInitialSpeed { speed: 200.0 })))
        );
    }

    #[test]
    fn perturb_needs_a_number() {
        assert_eq!(
            parse("perturb 10"),
            Ok(Some(LiveInput::Command(Command::RequestPerturbation {
                magnitude: 10.0
            })))
        );
        assert!(parse("perturb").is_err());
        assert!(parse("perturb lots").is_err());
        assert!(parse("perturb 1 2").is_err());
    }

    #[test]
    fn term_toggles_and_unknown_words() {
        assert_eq!(
            parse("d"),
            Ok(Some(LiveInput::Command(Command::ToggleTerm { term: Term::D })))
        );
        assert_eq!(parse("q"), Ok(Some(LiveInput::Quit)));
        assert!(parse("faster").is_err());
    }
}
