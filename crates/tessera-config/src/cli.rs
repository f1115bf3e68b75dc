//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tessera command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tessera", about = "Streamed terrain chunk simulation")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Active radius around the viewer, in chunks.
    #[arg(long)]
    pub view_distance: Option<u32>,

    /// Initial draw mode (biome, height, temperature, humidity).
    #[arg(long)]
    pub draw_mode: Option<String>,

    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 300)]
    pub ticks: u32,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(vd) = args.view_distance {
            self.streaming.view_distance = vd;
        }
        if let Some(ref mode) = args.draw_mode {
            self.streaming.draw_mode = mode.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
