//! Closed-loop scenarios for the cruise governor.

use cc_controls::{ControllerParams, Term};
use cc_sim::{EngineSetup, HistorySample, Mode, SimulationEngine};

fn reference_setup() -> EngineSetup {
    EngineSetup {
        params: ControllerParams::new(0.2, 0.05, 0.0, 0.5, 0.1, 0.01).unwrap(),
        initial_speed: 60.0,
        desired_speed: 100.0,
        ..EngineSetup::default()
    }
}

fn cruising() -> SimulationEngine {
    let mut engine = SimulationEngine::new(reference_setup()).expect("valid setup");
    engine.set_mode(Mode::Cruise);
    engine
}

fn run(engine: &mut SimulationEngine, ticks: usize) -> Vec<HistorySample> {
    (0..ticks).filter_map(|_| engine.tick()).collect()
}

#[test]
fn step_response_error_shrinks() {
    let mut engine = cruising();
    let samples = run(&mut engine, 200);

    assert_eq!(samples.len(), 200);
    let err_20 = samples[19].error;
    let err_200 = samples[199].error;
    assert!(
        err_200.abs() < err_20.abs(),
        "error did not shrink: tick 20 = {err_20}, tick 200 = {err_200}"
    );

    let speed = engine.state().actual_speed;
    assert!((95.0..105.0).contains(&speed), "speed {speed} outside settled band");
    assert!((engine.state().elapsed_time - 20.0).abs() < 1e-9);
}

#[test]
fn step_response_settles_on_target() {
    let mut engine = cruising();
    run(&mut engine, 3000);
    assert!((engine.state().actual_speed - 100.0).abs() < 1e-3);
}

#[test]
fn history_times_strictly_increase() {
    let mut engine = cruising();
    run(&mut engine, 50);
    let history = engine.snapshot_history();
    assert!(history.windows(2).all(|w| w[1].time > w[0].time));
    assert!(history.iter().all(|s| s.input_speed == 100.0));
}

#[test]
fn perturbation_at_steady_state() {
    let mut engine = cruising();
    run(&mut engine, 3000);
    let steady = engine.state().actual_speed;
    assert!((steady - 100.0).abs() < 1e-3);

    engine.request_perturbation(10.0);
    let hit = engine.tick().expect("not paused");
    assert_eq!(hit.perturbation_magnitude, 10.0);
    // The drop lands before the control law runs
    assert!((hit.error - (100.0 - (steady - 10.0))).abs() < 1e-9);
    assert!(hit.speed < steady - 9.5);

    let mut previous = hit.speed;
    let mut recovered = false;
    for _ in 0..600 {
        let sample = engine.tick().expect("not paused");
        assert_eq!(sample.perturbation_magnitude, 0.0);
        assert!(
            sample.speed > previous,
            "recovery stalled at {} (previous {previous})",
            sample.speed
        );
        previous = sample.speed;
        if sample.speed >= 100.0 {
            recovered = true;
            break;
        }
    }
    assert!(recovered, "speed never regained the target");
}

#[test]
fn repeated_request_applies_once() {
    let mut engine = cruising();
    run(&mut engine, 100);
    engine.request_perturbation(5.0);
    engine.request_perturbation(5.0);

    let sample = engine.tick().unwrap();
    assert_eq!(sample.perturbation_magnitude, 5.0);
    let next = engine.tick().unwrap();
    assert_eq!(next.perturbation_magnitude, 0.0);
}

#[test]
fn pause_freezes_then_resumes_exactly() {
    let mut engine = cruising();
    run(&mut engine, 100);

    let twin = engine.clone();
    let frozen = engine.state().clone();

    engine.toggle_pause();
    for _ in 0..25 {
        assert!(engine.tick().is_none());
        let state = engine.state();
        assert_eq!(state.actual_speed, frozen.actual_speed);
        assert_eq!(state.integral(), frozen.integral());
        assert_eq!(state.previous_throttle, frozen.previous_throttle);
    }
    assert_eq!(engine.history().len(), 100);

    engine.toggle_pause();
    let resumed = engine.tick().unwrap();

    let mut twin = twin;
    let expected = twin.tick().unwrap();
    assert_eq!(resumed.speed, expected.speed);
    assert_eq!(resumed.throttle, expected.throttle);
    assert_eq!(resumed.error, expected.error);
    assert_eq!(engine.state().integral(), twin.state().integral());
    assert!(resumed.time > expected.time);
}

#[test]
fn disabling_integral_freezes_it() {
    let mut engine = cruising();
    run(&mut engine, 50);

    engine.set_term(Term::I, false);
    let held = engine.state().integral();
    for sample in run(&mut engine, 100) {
        assert_eq!(sample.i_term, 0.0);
        assert_eq!(engine.state().integral(), held);
    }

    engine.toggle_term(Term::I);
    engine.tick();
    assert_ne!(engine.state().integral(), held);
}

#[test]
fn proportional_only_leaves_offset() {
    let mut engine = cruising();
    engine.set_term(Term::I, false);
    run(&mut engine, 3000);
    // P-only against drag settles below the setpoint
    let speed = engine.state().actual_speed;
    assert!(speed < 100.0 && speed > 90.0, "speed {speed}");
}

#[test]
fn derivative_term_reports_when_enabled() {
    let mut setup = reference_setup();
    setup.params.kd = 0.05;
    let mut engine = SimulationEngine::new(setup).unwrap();
    engine.set_mode(Mode::Cruise);
    engine.toggle_term(Term::D);

    let first = engine.tick().unwrap();
    // previous error starts at zero after the reset: 0.05 * 40 / 0.1
    assert!((first.d_term - 20.0).abs() < 1e-9);
    let second = engine.tick().unwrap();
    assert!((second.d_term - 0.05 * (second.error - first.error) / 0.1).abs() < 1e-9);
}

#[test]
fn reentering_cruise_starts_fresh_episode() {
    let mut engine = cruising();
    run(&mut engine, 40);
    engine.set_mode(Mode::Manual);
    engine.set_initial_speed(80.0);
    run(&mut engine, 3);
    assert_eq!(engine.state().actual_speed, 80.0);

    engine.set_mode(Mode::Cruise);
    assert!(engine.history().is_empty());
    assert_eq!(engine.state().elapsed_time, 0.0);
    assert_eq!(engine.state().integral(), 0.0);
    assert!((engine.state().previous_throttle - 0.8).abs() < 1e-12);

    let first = engine.tick().unwrap();
    assert!((first.time - 0.1).abs() < 1e-12);
    assert!((first.error - 20.0).abs() < 1e-12);
}
