//! Headless wildfire simulation runner
//!
//! Loads a map file (or generates a uniform forest), seeds ignitions, runs
//! the cellular automaton synchronously to completion and prints the
//! metrics series as semicolon-separated CSV.

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wildfire_sim_core::{
    load_map, Grid, Simulation, SimulationParameters, SimulationSpeed, TerrainKind, WindDirection,
};

/// Wildfire spread simulation, headless run
#[derive(Parser, Debug)]
#[command(name = "wildfire-demo")]
#[command(about = "Probabilistic wildfire spread over a terrain grid", long_about = None)]
struct Args {
    /// Map file (JSON map document); omit to generate a uniform forest
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Parameters file (JSON); the wind and speed flags override its values
    #[arg(long)]
    params: Option<PathBuf>,

    /// Generated map width in cells (ignored with --map)
    #[arg(long, default_value_t = 20)]
    width: u32,

    /// Generated map height in cells (ignored with --map)
    #[arg(long, default_value_t = 20)]
    height: u32,

    /// Simulation speed multiplier: 1, 2, 4 or 8 [default: 1]
    #[arg(short, long)]
    speed: Option<u64>,

    /// Wind direction (compass name, e.g. "North" or "South-East") [default: North]
    #[arg(short = 'd', long)]
    wind_direction: Option<String>,

    /// Wind speed in m/s (0-67) [default: 0]
    #[arg(short = 'w', long)]
    wind_speed: Option<f64>,

    /// Ignition seeds as x,y pairs; defaults to the map center
    #[arg(short, long, value_parser = parse_coordinate)]
    ignite: Vec<(u32, u32)>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks even if fire is still burning
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,
}

fn parse_coordinate(value: &str) -> Result<(u32, u32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{value}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok((x, y))
}

fn speed_from_multiplier(multiplier: u64) -> Result<SimulationSpeed, String> {
    match multiplier {
        1 => Ok(SimulationSpeed::X1),
        2 => Ok(SimulationSpeed::X2),
        4 => Ok(SimulationSpeed::X4),
        8 => Ok(SimulationSpeed::X8),
        other => Err(format!("unsupported speed multiplier x{other}")),
    }
}

/// Parameters file first, then any explicitly given flag on top
fn build_params(args: &Args) -> Result<SimulationParameters, String> {
    let base = match &args.params {
        Some(path) => SimulationParameters::load(path).map_err(|e| e.to_string())?,
        None => SimulationParameters::default(),
    };
    let speed = match args.speed {
        Some(multiplier) => speed_from_multiplier(multiplier)?,
        None => base.speed,
    };
    let direction = match &args.wind_direction {
        Some(name) => WindDirection::from_str(name).map_err(|e| e.to_string())?,
        None => base.wind_direction,
    };
    let wind_speed = args.wind_speed.unwrap_or(base.wind_speed);
    SimulationParameters::new(speed, direction, wind_speed).map_err(|e| e.to_string())
}

fn build_grid(args: &Args) -> Result<Grid, String> {
    match &args.map {
        Some(path) => load_map(path).map_err(|e| e.to_string()),
        None => Grid::uniform(args.width, args.height, TerrainKind::Forest)
            .map_err(|e| e.to_string()),
    }
}

fn run(args: &Args) -> Result<(), String> {
    let params = build_params(args)?;
    let grid = build_grid(args)?;
    info!(
        width = grid.width(),
        height = grid.height(),
        wind = %params.wind_direction,
        wind_speed = params.wind_speed,
        "grid ready"
    );

    let mut sim = match args.seed {
        Some(seed) => Simulation::with_seed(grid, params, seed),
        None => Simulation::new(grid, params),
    };

    let seeds = if args.ignite.is_empty() {
        let snapshot = sim.snapshot();
        vec![(snapshot.width() / 2, snapshot.height() / 2)]
    } else {
        args.ignite.clone()
    };
    for (x, y) in seeds {
        sim.seed_ignition(x, y).map_err(|e| e.to_string())?;
    }

    loop {
        let complete = sim.advance_tick().map_err(|e| e.to_string())?;
        if complete {
            info!(ticks = sim.tick(), "fire has run out of fuel");
            break;
        }
        if sim.tick() >= args.max_ticks {
            info!(ticks = sim.tick(), "tick limit reached");
            break;
        }
    }

    print!("{}", sim.metrics().to_csv());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            map: None,
            params: None,
            width: 20,
            height: 20,
            speed: None,
            wind_direction: None,
            wind_speed: None,
            ignite: Vec::new(),
            seed: None,
            max_ticks: 10_000,
        }
    }

    #[test]
    fn defaults_apply_without_a_parameters_file() {
        let params = build_params(&args()).unwrap();
        assert_eq!(params.speed, SimulationSpeed::X1);
        assert_eq!(params.wind_direction, WindDirection::North);
        assert_eq!(params.wind_speed, 0.0);
    }

    #[test]
    fn flags_override_the_parameters_file() {
        let stored =
            SimulationParameters::new(SimulationSpeed::X4, WindDirection::SouthEast, 12.5).unwrap();
        let path = std::env::temp_dir().join("wildfire_demo_params_override.json");
        stored.save(&path).unwrap();

        let mut cli = args();
        cli.params = Some(path.clone());
        cli.wind_speed = Some(30.0);
        let params = build_params(&cli).unwrap();

        // File values hold unless a flag replaces them
        assert_eq!(params.speed, SimulationSpeed::X4);
        assert_eq!(params.wind_direction, WindDirection::SouthEast);
        assert_eq!(params.wind_speed, 30.0);

        let _ = std::fs::remove_file(path);
    }
}
