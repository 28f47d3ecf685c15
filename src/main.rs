//! Intersection Sim - headless driver
//!
//! Runs the simulation in real time, reading input events from stdin and
//! logging the HUD. A quit command, EOF or Ctrl+C ends the session.

use tokio::sync::{mpsc, watch};
use tracing::{info, trace, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intersection_sim::config::Config;
use intersection_sim::input::spawn_reader;
use intersection_sim::scenery::{generate_trees, sort_back_to_front};
use intersection_sim::sim::{FrameSnapshot, Simulation, SimulationClock, VehicleTuning};
use intersection_sim::util::time::{simulated_millis, ticks_for, Timer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Intersection Sim");

    let mut trees = generate_trees(config.scenery_seed);
    sort_back_to_front(&mut trees);
    info!(trees = trees.len(), seed = config.scenery_seed, "Scenery generated");

    let timing = config.signal_timing();
    if timing.cycle_ms() % config.tick_interval_ms != 0 {
        warn!(
            cycle_ms = timing.cycle_ms(),
            tick_ms = config.tick_interval_ms,
            "Signal cycle is not a whole number of ticks; phase edges will round up"
        );
    }
    info!(
        cycle_ticks = ticks_for(timing.cycle_ms(), config.tick_interval_ms),
        "Signal timing configured"
    );

    let sim = Simulation::new(config.tick_interval_ms, VehicleTuning::default(), timing);
    let session = sim.id;

    let (input_tx, input_rx) = mpsc::channel(64);
    spawn_reader(tokio::io::stdin(), input_tx);

    let (clock, frames) = SimulationClock::new(sim, input_rx, config.hud_interval_ticks);
    tokio::spawn(consume_frames(frames));

    info!(
        session = %session,
        tick_ms = config.tick_interval_ms,
        green_ms = config.signal_green_ms,
        yellow_ms = config.signal_yellow_ms,
        "Controls: press/release up|down|left|right, reset, brake, quit"
    );

    let wall = Timer::new();
    tokio::select! {
        sim = clock.run() => {
            info!(
                session = %session,
                ticks = sim.tick(),
                simulated_ms = simulated_millis(sim.tick(), sim.tick_ms()),
                wall_ms = wall.elapsed_ms(),
                "Simulation finished"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            info!(session = %session, "Received Ctrl+C, exiting");
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Stand-in renderer: reads each published frame
async fn consume_frames(mut frames: watch::Receiver<FrameSnapshot>) {
    while frames.changed().await.is_ok() {
        let frame = *frames.borrow_and_update();
        if let Ok(json) = serde_json::to_string(&frame) {
            trace!(frame = %json, "Frame");
        }
    }
}
