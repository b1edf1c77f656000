//! Deterministic scripted runs.

use cc_sim::{Command, HistorySample, Mode, SimulationEngine};
use tracing::debug;

use crate::ConfigResult;
use crate::schema::{ScriptStep, SessionConfig};

/// Hands out scripted commands in tick order.
#[derive(Debug, Clone)]
pub struct Script {
    steps: Vec<ScriptStep>,
    cursor: usize,
}

impl Script {
    /// Steps sharing a tick keep their file order.
    pub fn new(steps: &[ScriptStep]) -> Self {
        let mut steps = steps.to_vec();
        steps.sort_by_key(|step| step.at_tick);
        Self { steps, cursor: 0 }
    }

    /// Commands scheduled at or before `tick` that have not been handed out.
    pub fn due(&mut self, tick: u64) -> Vec<Command> {
        let start = self.cursor;
        while self
            .steps
            .get(self.cursor)
            .is_some_and(|step| step.at_tick <= tick)
        {
            self.cursor += 1;
        }
        self.steps[start..self.cursor]
            .iter()
            .map(|step| step.command)
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.steps.len() - self.cursor
    }
}

/// Build an engine from `config` in its start mode.
pub fn build_engine(config: &SessionConfig) -> ConfigResult<SimulationEngine> {
    let mut engine = SimulationEngine::new(config.engine_setup())?;
    if config.start_mode == Mode::Cruise {
        engine.set_mode(Mode::Cruise);
    }
    Ok(engine)
}

/// Step `engine` for `ticks` ticks, applying scripted commands before the
/// tick they are scheduled for. Returns the samples produced.
pub fn run_script(
    engine: &mut SimulationEngine,
    script: &mut Script,
    ticks: u64,
) -> Vec<HistorySample> {
    let mut samples = Vec::new();
    for tick in 0..ticks {
        for command in script.due(tick) {
            debug!(tick, ?command, "scripted command");
            engine.apply(command);
        }
        samples.extend(engine.tick());
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(at_tick: u64, command: Command) -> ScriptStep {
        ScriptStep { at_tick, command }
    }

    #[test]
    fn due_returns_commands_in_tick_order() {
        let mut script = Script::new(&[
            step(5, Command::TogglePause),
            step(1, Command::ToggleMode),
            step(5, Command::RequestPerturbation { magnitude: 2.0 }),
        ]);
        assert!(script.due(0).is_empty());
        assert_eq!(script.due(1), vec![Command::ToggleMode]);
        assert_eq!(
            script.due(7),
            vec![
                Command::TogglePause,
                Command::RequestPerturbation { magnitude: 2.0 }
            ]
        );
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn scripted_perturbation_lands_on_its_tick() {
        let config = SessionConfig {
            start_mode: Mode::Cruise,
            script: vec![step(10, Command::RequestPerturbation { magnitude: 10.0 })],
            ..SessionConfig::default()
        };
        let mut engine = build_engine(&config).unwrap();
        let mut script = Script::new(&config.script);
        let samples = run_script(&mut engine, &mut script, 20);

        assert_eq!(samples.len(), 20);
        assert_eq!(samples[10].perturbation_magnitude, 10.0);
        let total: f64 = samples.iter().map(|s| s.perturbation_magnitude).sum();
        assert_eq!(total, 10.0);
    }

    #[test]
    fn paused_ticks_produce_no_samples() {
        let config = SessionConfig {
            script: vec![
                step(3, Command::TogglePause),
                step(8, Command::TogglePause),
            ],
            ..SessionConfig::default()
        };
        let mut engine = build_engine(&config).unwrap();
        let mut script = Script::new(&config.script);
        let samples = run_script(&mut engine, &mut script, 10);
        assert_eq!(samples.len(), 5);
    }
}
