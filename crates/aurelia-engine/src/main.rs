//! Engine binary for the Aurelia jellyfish simulator.
//!
//! This is the main entry point that wires together the life clock,
//! message pools, tank drifter, status cache, and terminal renderer.
//! It loads configuration, initializes all subsystems, and runs the
//! fixed-interval simulation loop until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `aurelia-config.yaml` (or `AURELIA_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the life clock from the lifecycle config
//! 4. Build the per-phase message pools
//! 5. Build the tank and drifter
//! 6. Open the status cache (degrade to in-memory on failure)
//! 7. Assemble the simulation state
//! 8. Run the simulation loop
//! 9. Log the result

mod error;
mod render;

use std::path::{Path, PathBuf};

use aurelia_core::clock::LifeClock;
use aurelia_core::config::SimulationConfig;
use aurelia_core::runner::{self, RunBounds};
use aurelia_core::status::{MemoryStatusStore, MessagePools, StatusStore};
use aurelia_core::tick::SimulationState;
use aurelia_store::RedbStatusStore;
use aurelia_world::{Drifter, TankBounds};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::render::TerminalRenderer;

/// Application entry point for the simulator engine.
///
/// Initializes all subsystems and runs the simulation loop.
///
/// # Errors
///
/// Returns an error if any initialization step fails. Once the loop is
/// running, irregularities degrade gracefully instead of erroring.
#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging. RUST_LOG overrides the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("aurelia-engine starting");
    info!(
        config = %config_path.display(),
        tick_interval_ms = config.engine.tick_interval_ms,
        max_ticks = config.engine.max_ticks,
        max_real_time_seconds = config.engine.max_real_time_seconds,
        "Configuration loaded"
    );

    // 3. Build the life clock. An invalid phase table is fatal here,
    //    never tolerated at query time.
    let clock = LifeClock::new(&config.lifecycle)?;
    info!(
        origin = %clock.origin(),
        phases = clock.spans().len(),
        total_cycle_seconds = clock.total_cycle_seconds(),
        "Life clock initialized"
    );

    // 4. Build the message pools with any configured overrides.
    let pools = MessagePools::with_overrides(&config.status.messages)?;
    info!("Message pools initialized");

    // 5. Build the tank and drifter.
    let bounds = TankBounds::new(
        config.tank.width,
        config.tank.height,
        config.tank.sprite_size,
    )?;
    let drifter = Drifter::new(
        bounds,
        config.tank.swim_speed,
        config.tank.turn_interval_ms,
        config.tank.seed,
    )?;
    let drift = drifter.initial_state();
    info!(
        width = config.tank.width,
        height = config.tank.height,
        seed = config.tank.seed,
        "Tank initialized"
    );

    // 6. Open the status cache. A failed open is not fatal: the cache is
    //    a display convenience, so the run continues with an in-memory
    //    store and simply forgets the status across restarts.
    let store: Box<dyn StatusStore> =
        match RedbStatusStore::open(Path::new(&config.engine.store_path)) {
            Ok(store) => {
                info!(path = %config.engine.store_path, "Status store opened");
                Box::new(store)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    path = %config.engine.store_path,
                    "status store unavailable, caching in memory for this run"
                );
                Box::new(MemoryStatusStore::new())
            }
        };

    // 7. Assemble the simulation state.
    let mut state = SimulationState {
        clock,
        drifter,
        drift,
        pools,
        status_utc_offset_hours: config.status.utc_offset_hours,
        status_reset_hour: config.status.reset_hour,
        tick: 0,
    };
    let run_bounds = RunBounds::from(&config.engine);
    let mut rng = SmallRng::from_os_rng();
    let mut renderer = TerminalRenderer::stdout();

    info!("Simulation state assembled, entering tick loop");

    // 8. Run the simulation.
    let result = runner::run_simulation(
        &mut state,
        store.as_ref(),
        &mut rng,
        run_bounds,
        &mut renderer,
    )
    .await;

    // 9. Log results.
    runner::log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "aurelia-engine shutdown complete"
    );

    Ok(())
}

/// Resolve the configuration file path.
///
/// `AURELIA_CONFIG` overrides the default `aurelia-config.yaml` in the
/// current working directory.
fn config_path() -> PathBuf {
    std::env::var("AURELIA_CONFIG")
        .map_or_else(|_| PathBuf::from("aurelia-config.yaml"), PathBuf::from)
}

/// Load the simulator configuration from the given path.
///
/// A missing file is not an error: the defaults reproduce the original
/// widget's constants, so the engine runs out of the box.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}
