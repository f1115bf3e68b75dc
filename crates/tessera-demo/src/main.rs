//! Tessera demo: streams procedural terrain chunks around a moving viewer.
//!
//! Loads `config.ron` (creating it on first run), applies CLI overrides and
//! runs a fixed number of simulation ticks, logging chunk activity.
//!
//! Run with: `cargo run -p tessera-demo -- --ticks 600`

mod biomes;
mod coordinator;
mod error;
mod streaming;
mod water_check;
mod world;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tessera_config::{CliArgs, Config};
use tracing::{error, info, warn};

use crate::error::WorldError;
use crate::world::{StepReport, World};

/// Seconds between config hot-reload checks.
const RELOAD_INTERVAL_SECS: u32 = 5;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().or_else(tessera_config::default_config_dir);

    let (mut config, load_error) = match config_dir.as_deref().map(Config::load_or_create) {
        Some(Ok(config)) => (config, None),
        Some(Err(err)) => (Config::default(), Some(err)),
        None => (Config::default(), None),
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    tessera_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));
    if let Some(err) = load_error {
        warn!("Falling back to default config: {err}");
    }

    match run(config, config_dir.as_deref(), &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(mut config: Config, config_dir: Option<&Path>, args: &CliArgs) -> Result<(), WorldError> {
    let ticks = args.ticks;
    let mut world = World::new(&config)?;
    let rate = config.streaming.tick_rate_hz;
    let dt = 1.0 / rate as f32;
    let mut total = StepReport::default();

    info!("Running {ticks} ticks at {rate} Hz");
    for tick in 1..=ticks {
        let report = world.step(dt)?;
        accumulate(&mut total, &report);

        if tick % rate == 0 {
            let grid = world.grid();
            let active = grid.iter().filter(|c| c.is_active()).count();
            let textured = grid.iter().filter(|c| c.has_biome_texture()).count();
            let watered = grid.iter().filter(|c| c.has_water_layer()).count();
            info!(
                "t={}s viewer={} mode={} resident={} active={active} textured={textured} water={watered} checks={}",
                tick / rate,
                world.viewer_chunk(),
                world.draw_mode(),
                grid.len(),
                grid.coordinator().pending_water_checks(),
            );
        }

        if tick % (rate * RELOAD_INTERVAL_SECS) == 0
            && let Some(dir) = config_dir
        {
            reload(&mut world, &mut config, dir, args);
        }
    }

    info!(
        "Done: loaded={} unloaded={} activated={} textures={} water_layers={} water_updates={}",
        total.loaded,
        total.unloaded,
        total.activated,
        total.textures_built,
        total.water_layers,
        total.water_updates,
    );
    Ok(())
}

/// Picks up edits to `config.ron`. CLI overrides keep precedence.
fn reload(world: &mut World, config: &mut Config, dir: &Path, args: &CliArgs) {
    let mut new = match config.reload(dir) {
        Ok(Some(new)) => new,
        Ok(None) => return,
        Err(err) => {
            warn!("Config reload failed: {err}");
            return;
        }
    };
    new.apply_cli_overrides(args);
    if new == *config {
        return;
    }
    if new.terrain != config.terrain {
        warn!("Terrain settings changed; they take effect on restart");
    }
    match world.apply_config(&new) {
        Ok(()) => *config = new,
        Err(err) => warn!("Config reload rejected: {err}"),
    }
}

fn accumulate(total: &mut StepReport, step: &StepReport) {
    total.loaded += step.loaded;
    total.unloaded += step.unloaded;
    total.activated += step.activated;
    total.deactivated += step.deactivated;
    total.water_layers += step.water_layers;
    total.textures_built += step.textures_built;
    total.water_updates += step.water_updates;
}
