//! Simulation controller: run/pause/resume/stop state machine and tick loop
//!
//! The controller exclusively owns the grid for the duration of a run. Each
//! tick it asks the step engine for a transition set over the pre-tick
//! snapshot, applies it atomically, feeds it to the metrics aggregator and
//! then waits out the speed-scaled inter-tick delay on a per-run
//! cancellation handle. Pausing and stopping take effect at that wait
//! boundary; an in-flight tick always finishes.

pub mod cancel;

pub use cancel::CancelHandle;

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::core_types::SimulationParameters;
use crate::engine::{apply_transitions, compute_tick, is_run_complete};
use crate::error::SimulationError;
use crate::grid::Grid;
use crate::metrics::{MetricsEntry, SimulationMetrics};

/// Lifecycle state of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run started yet; grid edits permitted
    Idle,
    /// Tick loop active
    Running,
    /// Run suspended; resumable via `start`
    Paused,
    /// Run finished (naturally or by user); terminal for this run
    Stopped,
}

impl RunState {
    fn name(self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Stopped => "stopped",
        }
    }
}

/// Callback invoked exactly once when a run ends, with the final metrics
pub type CompletionHook = Box<dyn FnMut(&SimulationMetrics) + Send>;

/// State shared between the controller and the tick-loop worker
struct SharedState {
    grid: Grid,
    metrics: SimulationMetrics,
    tick: u64,
    run_state: RunState,
    complete: bool,
    rng: StdRng,
    hook: Option<CompletionHook>,
    hook_fired: bool,
}

impl SharedState {
    /// Compute, apply and record one tick; returns whether the run finished
    fn run_one_tick(&mut self, params: &SimulationParameters) -> bool {
        let transitions = compute_tick(&self.grid, params, &mut self.rng);
        apply_transitions(&mut self.grid, &transitions);
        self.metrics.record_tick(&self.grid, &transitions);
        self.tick += 1;
        debug!(
            tick = self.tick,
            transitions = transitions.len(),
            burning = self.grid.burning_count(),
            "applied tick"
        );
        is_run_complete(&self.grid, &transitions)
    }

    /// Invoke the completion hook if it has not fired for this run yet
    fn fire_completion(&mut self) {
        if self.hook_fired {
            return;
        }
        self.hook_fired = true;
        if let Some(hook) = self.hook.as_mut() {
            hook(&self.metrics);
        }
    }
}

/// Owns a grid and drives the cellular automaton over it
pub struct Simulation {
    shared: Arc<Mutex<SharedState>>,
    params: SimulationParameters,
    cancel: Option<CancelHandle>,
    worker: Option<JoinHandle<()>>,
}

impl Simulation {
    /// Create a simulation over `grid` with an entropy-seeded RNG
    pub fn new(grid: Grid, params: SimulationParameters) -> Self {
        Simulation::with_rng(grid, params, StdRng::from_os_rng())
    }

    /// Create a simulation with a fixed RNG seed for reproducible runs
    pub fn with_seed(grid: Grid, params: SimulationParameters, seed: u64) -> Self {
        Simulation::with_rng(grid, params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: Grid, params: SimulationParameters, rng: StdRng) -> Self {
        let metrics = SimulationMetrics::seeded_from(&grid);
        Simulation {
            shared: Arc::new(Mutex::new(SharedState {
                grid,
                metrics,
                tick: 0,
                run_state: RunState::Idle,
                complete: false,
                rng,
                hook: None,
                hook_fired: false,
            })),
            params,
            cancel: None,
            worker: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.shared.lock().expect("simulation state lock poisoned")
    }

    /// Register the hook fired exactly once when this run ends
    pub fn set_completion_hook(&mut self, hook: impl FnMut(&SimulationMetrics) + Send + 'static) {
        self.lock().hook = Some(Box::new(hook));
    }

    /// Current lifecycle state
    pub fn run_state(&self) -> RunState {
        self.lock().run_state
    }

    /// Whether the fire has run out of fuel or self-extinguished
    pub fn is_complete(&self) -> bool {
        self.lock().complete
    }

    /// Monotone tick counter for the current run
    pub fn tick(&self) -> u64 {
        self.lock().tick
    }

    /// Metrics entry for the most recent tick
    pub fn current_tick_metrics(&self) -> MetricsEntry {
        self.lock()
            .metrics
            .latest()
            .expect("metrics always hold the seeded index-0 entry")
    }

    /// Snapshot of the full metrics series
    pub fn metrics(&self) -> SimulationMetrics {
        self.lock().metrics.clone()
    }

    /// Read-only snapshot of the grid for presentation projections
    pub fn snapshot(&self) -> Grid {
        self.lock().grid.clone()
    }

    /// Run parameters in effect
    pub fn params(&self) -> SimulationParameters {
        self.params
    }

    /// Replace the run parameters
    ///
    /// # Errors
    /// Returns `EditWhileRunning` while the tick loop is active.
    pub fn set_params(&mut self, params: SimulationParameters) -> Result<(), SimulationError> {
        params.validate()?;
        if self.lock().run_state == RunState::Running {
            return Err(SimulationError::EditWhileRunning);
        }
        self.params = params;
        Ok(())
    }

    /// Manually set a cell on fire
    ///
    /// # Errors
    /// Returns `EditWhileRunning` while the tick loop is active, plus the
    /// grid-level rejections for bad coordinates or unburnable cells.
    pub fn seed_ignition(&mut self, x: u32, y: u32) -> Result<(), SimulationError> {
        let mut state = self.lock();
        if state.run_state == RunState::Running {
            return Err(SimulationError::EditWhileRunning);
        }
        state.grid.ignite(x, y)
    }

    /// Manually put out a burning cell
    ///
    /// # Errors
    /// Returns `EditWhileRunning` while the tick loop is active, plus the
    /// grid-level rejections for bad coordinates or burned-out cells.
    pub fn extinguish(&mut self, x: u32, y: u32) -> Result<(), SimulationError> {
        let mut state = self.lock();
        if state.run_state == RunState::Running {
            return Err(SimulationError::EditWhileRunning);
        }
        state.grid.extinguish(x, y)
    }

    /// Start a new run from `Idle` or resume a paused one
    ///
    /// Starting from `Idle` re-seeds the metrics from the current grid and
    /// issues a fresh cancellation handle; a previous run's handle is never
    /// reused.
    ///
    /// # Errors
    /// Returns `NoBurningCells` when starting with nothing on fire and
    /// `InvalidTransition` from `Running` or `Stopped`.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        {
            let mut state = self.lock();
            match state.run_state {
                RunState::Idle => {
                    if state.grid.burning_count() == 0 {
                        return Err(SimulationError::NoBurningCells);
                    }
                    state.metrics = SimulationMetrics::seeded_from(&state.grid);
                    state.tick = 0;
                    state.hook_fired = false;
                    info!(
                        width = state.grid.width(),
                        height = state.grid.height(),
                        burning = state.grid.burning_count(),
                        "starting simulation run"
                    );
                }
                RunState::Paused => info!(tick = state.tick, "resuming simulation run"),
                other => {
                    return Err(SimulationError::InvalidTransition {
                        state: other.name(),
                        action: "start",
                    })
                }
            }
            state.run_state = RunState::Running;
        }

        // A paused run's worker has already exited; reap it before spawning
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        let cancel = CancelHandle::new();
        self.cancel = Some(cancel.clone());
        let shared = Arc::clone(&self.shared);
        let params = self.params;
        let delay = params.speed.tick_delay();
        self.worker = Some(thread::spawn(move || {
            tick_loop(&shared, &params, &cancel, delay);
        }));
        Ok(())
    }

    /// Suspend a running simulation at the next tick boundary
    ///
    /// The in-flight tick finishes; only the next one is suppressed.
    ///
    /// # Errors
    /// Returns `InvalidTransition` unless the simulation is `Running`.
    pub fn pause(&mut self) -> Result<(), SimulationError> {
        {
            let mut state = self.lock();
            if state.run_state != RunState::Running {
                return Err(SimulationError::InvalidTransition {
                    state: state.run_state.name(),
                    action: "pause",
                });
            }
            state.run_state = RunState::Paused;
        }
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        info!("simulation paused");
        Ok(())
    }

    /// End the run and fire the completion hook
    ///
    /// # Errors
    /// Returns `InvalidTransition` unless the simulation is `Running` or
    /// `Paused`.
    pub fn stop(&mut self) -> Result<(), SimulationError> {
        {
            let state = self.lock();
            if !matches!(state.run_state, RunState::Running | RunState::Paused) {
                return Err(SimulationError::InvalidTransition {
                    state: state.run_state.name(),
                    action: "stop",
                });
            }
        }
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        let mut state = self.lock();
        state.run_state = RunState::Stopped;
        state.fire_completion();
        info!(tick = state.tick, "simulation stopped");
        Ok(())
    }

    /// Synchronously advance one tick without the scheduler
    ///
    /// Intended for headless runs and debugging; permitted from `Idle` or
    /// `Paused`. The first tick seeds the metrics exactly like `start` does.
    /// Returns `true` once the run completes, at which point the simulation
    /// transitions to `Stopped` and the completion hook fires.
    ///
    /// # Errors
    /// Returns `NoBurningCells` on a first tick with nothing on fire and
    /// `InvalidTransition` from `Running` or `Stopped`.
    pub fn advance_tick(&mut self) -> Result<bool, SimulationError> {
        let mut state = self.lock();
        if !matches!(state.run_state, RunState::Idle | RunState::Paused) {
            return Err(SimulationError::InvalidTransition {
                state: state.run_state.name(),
                action: "step",
            });
        }
        if state.tick == 0 {
            if state.grid.burning_count() == 0 {
                return Err(SimulationError::NoBurningCells);
            }
            state.metrics = SimulationMetrics::seeded_from(&state.grid);
        }

        let complete = state.run_one_tick(&self.params);
        if complete {
            state.run_state = RunState::Stopped;
            state.complete = true;
            state.fire_completion();
            info!(tick = state.tick, "simulation complete");
        }
        Ok(complete)
    }
}

/// Worker loop: tick, then wait out the delay or a cancellation
fn tick_loop(
    shared: &Arc<Mutex<SharedState>>,
    params: &SimulationParameters,
    cancel: &CancelHandle,
    delay: Duration,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }
        {
            let mut state = shared.lock().expect("simulation state lock poisoned");
            if state.run_state != RunState::Running {
                break;
            }
            if state.run_one_tick(params) {
                state.run_state = RunState::Stopped;
                state.complete = true;
                state.fire_completion();
                info!(tick = state.tick, "simulation complete");
                break;
            }
        }
        if cancel.wait_timeout(delay) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{SimulationSpeed, TerrainKind, WindDirection};

    fn params() -> SimulationParameters {
        SimulationParameters::new(SimulationSpeed::X8, WindDirection::North, 0.0).unwrap()
    }

    fn seeded_sim(width: u32, height: u32, terrain: TerrainKind) -> Simulation {
        let grid = Grid::uniform(width, height, terrain).unwrap();
        let mut sim = Simulation::with_seed(grid, params(), 42);
        sim.seed_ignition(0, 0).unwrap();
        sim
    }

    #[test]
    fn start_requires_a_burning_cell() {
        let grid = Grid::uniform(3, 3, TerrainKind::Forest).unwrap();
        let mut sim = Simulation::new(grid, params());
        assert_eq!(sim.start(), Err(SimulationError::NoBurningCells));
        assert_eq!(sim.run_state(), RunState::Idle);
    }

    #[test]
    fn manual_stepping_runs_to_completion() {
        let mut sim = seeded_sim(1, 1, TerrainKind::Plain);

        // Plain burns for 2 ticks, burns out on the 3rd
        assert!(!sim.advance_tick().unwrap());
        assert!(!sim.advance_tick().unwrap());
        assert!(!sim.advance_tick().unwrap());
        assert!(sim.advance_tick().unwrap());

        assert!(sim.is_complete());
        assert_eq!(sim.run_state(), RunState::Stopped);
        assert_eq!(sim.tick(), 4);

        // Terminal: no further control operations are accepted
        assert!(matches!(
            sim.advance_tick(),
            Err(SimulationError::InvalidTransition { .. })
        ));
        assert!(matches!(
            sim.start(),
            Err(SimulationError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn completion_hook_fires_once_on_natural_completion() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut sim = seeded_sim(1, 1, TerrainKind::HighDensityUrban);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        sim.set_completion_hook(move |metrics| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert!(metrics.burned_area().last() == Some(&1));
        });

        while !sim.advance_tick().unwrap() {}

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Stop after natural completion is rejected and does not re-fire
        assert!(sim.stop().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn metrics_seed_reflects_manual_edits() {
        let mut sim = seeded_sim(3, 3, TerrainKind::Forest);
        sim.seed_ignition(2, 2).unwrap();
        sim.extinguish(0, 0).unwrap();

        sim.advance_tick().unwrap();
        let metrics = sim.metrics();
        assert_eq!(metrics.burning_area()[0], 1);
        assert_eq!(metrics.burning_speed()[0], 1);
    }

    #[test]
    fn cells_seeded_between_ticks_join_the_burning_area() {
        // Plain cells isolated by water never spread, so the run is
        // deterministic regardless of the RNG seed.
        let rows = vec![vec![
            TerrainKind::Plain,
            TerrainKind::Water,
            TerrainKind::Plain,
            TerrainKind::Water,
            TerrainKind::Plain,
        ]];
        let grid = Grid::from_terrain_rows(&rows).unwrap();
        let mut sim = Simulation::with_seed(grid, params(), 42);
        sim.seed_ignition(0, 0).unwrap();

        sim.advance_tick().unwrap();
        sim.seed_ignition(2, 0).unwrap();
        sim.seed_ignition(4, 0).unwrap();

        while !sim.advance_tick().unwrap() {
            assert!(sim.tick() < 100, "run did not terminate");
        }

        // The hand-seeded cells enter the series at the next tick and all
        // three burn-outs are absorbed without losing count.
        let metrics = sim.metrics();
        assert_eq!(metrics.burning_area(), &[1, 1, 3, 2, 0, 0]);
        assert_eq!(metrics.burned_area(), &[0, 0, 0, 1, 3, 3]);
    }

    #[test]
    fn tick_counter_is_monotone() {
        let mut sim = seeded_sim(2, 2, TerrainKind::Grassland);
        let mut previous = sim.tick();
        while !sim.advance_tick().unwrap() {
            let current = sim.tick();
            assert_eq!(current, previous + 1);
            previous = current;
        }
    }
}
