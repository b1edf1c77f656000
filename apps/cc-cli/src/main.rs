use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use cc_config::{Script, SessionConfig, build_engine, run_script};
use cc_core::display_kph;
use cc_results::{ExportManifest, HistoryStore, write_history_csv};
use cc_sim::{Governor, Mode, StateSnapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod live;

use error::CliResult;

#[derive(Parser)]
#[command(name = "cc-cli")]
#[command(about = "Cruise-control governor - PID speed controller simulation", long_about = None)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a session file
    Validate {
        /// Path to the session YAML or JSON file
        session_path: PathBuf,
    },
    /// Run a session headless for a fixed number of ticks
    Run {
        /// Path to the session YAML or JSON file
        session_path: PathBuf,
        /// Number of ticks to simulate
        #[arg(long, default_value_t = 200)]
        ticks: u64,
        /// Enter cruise mode before the first tick
        #[arg(long)]
        cruise: bool,
        /// Save the run under .cruise/exports next to the session file
        #[arg(long)]
        export: bool,
        /// Write the history as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drive a session in real time, reading commands from stdin
    Live {
        /// Path to the session YAML or JSON file
        session_path: PathBuf,
        /// Stop after this many wall-clock seconds
        #[arg(long)]
        seconds: Option<f64>,
        /// Tick faster (or slower) than real time
        #[arg(long, default_value_t = 1.0)]
        speedup: f64,
    },
    /// List saved exports for a session
    Exports {
        /// Path to the session YAML or JSON file
        session_path: PathBuf,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { session_path } => cmd_validate(&session_path),
        Commands::Run {
            session_path,
            ticks,
            cruise,
            export,
            csv,
            json,
        } => cmd_run(&session_path, ticks, cruise, export, csv.as_deref(), json),
        Commands::Live {
            session_path,
            seconds,
            speedup,
        } => cmd_live(&session_path, seconds, speedup),
        Commands::Exports { session_path } => cmd_exports(&session_path),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cmd_validate(session_path: &Path) -> CliResult<()> {
    println!("Validating session: {}", session_path.display());
    let config = cc_config::load(session_path)?;
    println!("✓ Session '{}' is valid", config.name);
    print_config(&config);
    Ok(())
}

fn cmd_run(
    session_path: &Path,
    ticks: u64,
    cruise: bool,
    export: bool,
    csv_path: Option<&Path>,
    json: bool,
) -> CliResult<()> {
    let config = cc_config::load(session_path)?;
    let mut engine = build_engine(&config)?;
    if cruise {
        engine.set_mode(Mode::Cruise);
    }
    let mut script = Script::new(&config.script);

    info!(session = %config.name, ticks, "running session");
    let started = Instant::now();
    run_script(&mut engine, &mut script, ticks);
    let wall = started.elapsed();

    let final_state = engine.snapshot_state();
    let samples = engine.snapshot_history();

    if json {
        println!("{}", serde_json::to_string_pretty(&final_state)?);
    } else {
        println!("✓ Ran {} ticks in {:.3}s", ticks, wall.as_secs_f64());
        print_status(&final_state);
        println!("  History samples: {}", samples.len());
        if script.remaining() > 0 {
            println!("  Unused script steps: {}", script.remaining());
        }
    }

    if let Some(path) = csv_path {
        let mut writer = BufWriter::new(File::create(path)?);
        write_history_csv(&mut writer, &samples)?;
        writer.flush()?;
        println!("✓ Wrote CSV: {}", path.display());
    }

    if export {
        let store = HistoryStore::for_session(session_path)?;
        let manifest = ExportManifest::new(&config.name, *engine.params(), final_state, &samples);
        let dir = store.save(&manifest, &samples)?;
        println!("✓ Saved export {} to {}", manifest.export_id, dir.display());
    }

    Ok(())
}

fn cmd_live(session_path: &Path, seconds: Option<f64>, speedup: f64) -> CliResult<()> {
    let config = cc_config::load(session_path)?;
    let governor = Governor::from_engine(build_engine(&config)?);
    println!(
        "Live session '{}' (dt = {:.3}s, speedup x{})",
        config.name, config.controller.dt, speedup
    );

    let ticks = live::run_live(&governor, &config.sliders, seconds, speedup)?;
    println!("✓ Stopped after {} ticks", ticks);
    print_status(&governor.snapshot_state());
    Ok(())
}

fn cmd_exports(session_path: &Path) -> CliResult<()> {
    let store = HistoryStore::for_session(session_path)?;
    let exports = store.list_exports()?;

    if exports.is_empty() {
        println!("No exports found next to {}", session_path.display());
    } else {
        println!("Exports:");
        for manifest in exports {
            println!(
                "  {}  {} samples, {:.1}s, final {} ({})",
                manifest.export_id,
                manifest.sample_count,
                manifest.duration_s,
                display_kph(manifest.final_state.actual_speed),
                manifest.final_state.mode,
            );
        }
    }
    Ok(())
}

fn print_config(config: &SessionConfig) {
    let c = &config.controller;
    println!(
        "  Controller: kp={} ki={} kd={} max_delta={} dt={}s drag={}",
        c.kp, c.ki, c.kd, c.max_delta, c.dt, c.drag_coeff
    );
    println!(
        "  Sliders: {}..{} (steps {} / {})",
        display_kph(config.sliders.min_speed),
        display_kph(config.sliders.max_speed),
        config.sliders.step_manual,
        config.sliders.step_cruise
    );
    println!(
        "  Start: {} mode, initial {}, desired {}",
        config.start_mode,
        display_kph(config.initial_speed),
        display_kph(config.desired_speed)
    );
    if !config.script.is_empty() {
        println!("  Script steps: {}", config.script.len());
    }
}

pub(crate) fn print_status(state: &StateSnapshot) {
    let terms: String = [('P', state.terms.p), ('I', state.terms.i), ('D', state.terms.d)]
        .iter()
        .filter(|(_, on)| *on)
        .map(|(c, _)| *c)
        .collect();
    println!(
        "  t={:.2}s  mode={}{}  speed={}  desired={}  initial={}  terms={}",
        state.elapsed_time,
        state.mode,
        if state.paused { " (paused)" } else { "" },
        display_kph(state.actual_speed),
        display_kph(state.desired_speed),
        display_kph(state.initial_speed),
        if terms.is_empty() { "-" } else { terms.as_str() },
    );
}
