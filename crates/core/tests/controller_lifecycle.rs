//! Controller state machine and tick scheduling
//!
//! Exercises the threaded run loop: pause suppresses the next tick but not
//! the in-flight one, stop fires the completion hook exactly once, and a
//! previous run's cancellation can never leak into a new run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use wildfire_sim_core::{
    CancelHandle, Grid, RunState, Simulation, SimulationError, SimulationParameters,
    SimulationSpeed, TerrainKind, WindDirection,
};

/// Large forest that burns for many seconds at x8 speed
fn long_burning_sim(seed: u64) -> Simulation {
    let grid = Grid::uniform(100, 100, TerrainKind::Forest).unwrap();
    let params =
        SimulationParameters::new(SimulationSpeed::X8, WindDirection::North, 67.0).unwrap();
    let mut sim = Simulation::with_seed(grid, params, seed);
    sim.seed_ignition(50, 50).unwrap();
    sim
}

#[test]
fn pause_suspends_the_tick_counter() {
    let mut sim = long_burning_sim(3);

    sim.start().unwrap();
    assert_eq!(sim.run_state(), RunState::Running);
    thread::sleep(Duration::from_millis(400));

    sim.pause().unwrap();
    assert_eq!(sim.run_state(), RunState::Paused);
    let paused_at = sim.tick();
    assert!(paused_at > 0, "no ticks ran before pause");

    thread::sleep(Duration::from_millis(300));
    assert_eq!(sim.tick(), paused_at, "ticks advanced while paused");

    // Resume and confirm the loop picks the counter back up
    sim.start().unwrap();
    thread::sleep(Duration::from_millis(400));
    sim.stop().unwrap();
    assert!(sim.tick() > paused_at, "no ticks ran after resume");
}

#[test]
fn stop_from_paused_fires_the_hook_exactly_once() {
    let mut sim = long_burning_sim(4);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    sim.set_completion_hook(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    sim.start().unwrap();
    thread::sleep(Duration::from_millis(200));
    sim.pause().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0, "pause must not fire the hook");

    sim.stop().unwrap();
    assert_eq!(sim.run_state(), RunState::Stopped);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Stopped is terminal: repeated stop is rejected and does not re-fire
    assert!(matches!(
        sim.stop(),
        Err(SimulationError::InvalidTransition { .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn grid_edits_are_rejected_while_running() {
    let mut sim = long_burning_sim(5);
    sim.start().unwrap();

    assert_eq!(sim.seed_ignition(10, 10), Err(SimulationError::EditWhileRunning));
    assert_eq!(sim.extinguish(50, 50), Err(SimulationError::EditWhileRunning));
    let params =
        SimulationParameters::new(SimulationSpeed::X1, WindDirection::East, 5.0).unwrap();
    assert_eq!(sim.set_params(params), Err(SimulationError::EditWhileRunning));

    sim.pause().unwrap();
    sim.seed_ignition(10, 10).unwrap();
    sim.stop().unwrap();
}

#[test]
fn pause_is_only_valid_while_running() {
    let mut sim = long_burning_sim(6);
    assert!(matches!(
        sim.pause(),
        Err(SimulationError::InvalidTransition { .. })
    ));

    sim.start().unwrap();
    sim.pause().unwrap();
    assert!(matches!(
        sim.pause(),
        Err(SimulationError::InvalidTransition { .. })
    ));
    sim.stop().unwrap();
}

#[test]
fn a_stale_cancellation_does_not_abort_a_resumed_run() {
    let mut sim = long_burning_sim(7);

    sim.start().unwrap();
    thread::sleep(Duration::from_millis(200));
    sim.pause().unwrap();
    let paused_at = sim.tick();

    // Resuming issues a fresh handle; the cancelled one from the paused
    // run must not stop the new loop.
    sim.start().unwrap();
    thread::sleep(Duration::from_millis(400));
    assert_eq!(sim.run_state(), RunState::Running);
    assert!(sim.tick() > paused_at);
    sim.stop().unwrap();
}

#[test]
fn cancel_handles_are_per_run() {
    let stale = CancelHandle::new();
    stale.cancel();
    assert!(stale.is_cancelled());

    let fresh = CancelHandle::new();
    assert!(!fresh.is_cancelled());
    assert!(!fresh.wait_timeout(Duration::from_millis(5)));
    assert!(stale.wait_timeout(Duration::from_millis(5)));
}

#[test]
fn natural_completion_stops_the_run_and_notifies() {
    // Single urban cell: burns out after 2 ticks, completes on the 3rd
    let grid = Grid::uniform(1, 1, TerrainKind::HighDensityUrban).unwrap();
    let params =
        SimulationParameters::new(SimulationSpeed::X8, WindDirection::North, 0.0).unwrap();
    let mut sim = Simulation::with_seed(grid, params, 8);
    sim.seed_ignition(0, 0).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    sim.set_completion_hook(move |metrics| {
        counter.fetch_add(1, Ordering::SeqCst);
        assert_eq!(metrics.latest().unwrap().burning_area, 0);
    });

    sim.start().unwrap();
    for _ in 0..100 {
        if sim.run_state() == RunState::Stopped {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }

    assert_eq!(sim.run_state(), RunState::Stopped);
    assert!(sim.is_complete());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Manual stop after natural completion is an invalid transition
    assert!(matches!(
        sim.stop(),
        Err(SimulationError::InvalidTransition { .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
