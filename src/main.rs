//! terra2d - A 2D tile sandbox
//!
//! Generates a world, drops an actor onto it and runs a scripted headless session.

mod config;
mod headless;
mod script;
mod vitals;

use anyhow::{Context, Result};
use clap::Parser;
use config::SessionConfig;
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Procedural 2D tile world with a scripted actor", long_about = None)]
struct Cli {
    /// Session config (default: config/terra2d.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to simulate (default: script length, then the configured tick count)
    #[arg(long)]
    ticks: Option<u64>,

    /// Per-tick command script
    #[arg(long)]
    script: Option<PathBuf>,

    /// Column the actor spawns above
    #[arg(long)]
    spawn_column: Option<usize>,

    /// Write the event log (JSONL) here
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write the session metrics report here
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Write the effective config to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Skip printing the final frame
    #[arg(long)]
    no_frame: bool,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        let mut cfg = match &self.config {
            Some(path) => SessionConfig::load_from_path(path),
            None => SessionConfig::load(),
        };
        if let Some(seed) = self.seed {
            cfg.world.seed = seed;
        }
        if self.spawn_column.is_some() {
            cfg.session.spawn_column = self.spawn_column;
        }
        if self.events.is_some() {
            cfg.session.events_path = self.events.clone();
        }
        if self.metrics.is_some() {
            cfg.session.metrics_path = self.metrics.clone();
        }
        cfg
    }
}

fn main() -> Result<()> {
    // WARN by default (RUST_LOG overrides); logs on stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting terra2d v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let session_cfg = cli.session_config();

    if let Some(path) = &cli.write_config {
        session_cfg
            .save_to_path(path)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    let session = headless::run(HeadlessConfig {
        session: session_cfg,
        script: cli.script.clone(),
        max_ticks: cli.ticks,
    })?;

    if !cli.no_frame {
        print!("{}", session.frame());
    }

    let metrics = session.metrics();
    println!(
        "tick {} | pos ({:.1}, {:.1}) | on ground: {} | broken {} placed {} landings {} | health {} hunger {}",
        metrics.ticks,
        metrics.final_position[0],
        metrics.final_position[1],
        session.body().on_ground,
        metrics.blocks_broken,
        metrics.blocks_placed,
        metrics.landings,
        metrics.final_health,
        metrics.final_hunger
    );
    info!(trees = session.world().trees.len(), "world summary");
    if !session.inventory().is_empty() {
        let items: Vec<String> = session
            .inventory()
            .iter()
            .map(|(kind, count)| format!("{kind} x{count}"))
            .collect();
        println!("inventory: {}", items.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terra2d.toml");
        std::fs::write(&path, "[world]\nseed = 5\n\n[session]\nticks = 9\n").unwrap();

        let cli = Cli::try_parse_from([
            "terra2d",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            "77",
            "--events",
            "out/events.jsonl",
        ])
        .unwrap();
        let cfg = cli.session_config();
        assert_eq!(cfg.world.seed, 77);
        assert_eq!(cfg.session.ticks, 9);
        assert_eq!(
            cfg.session.events_path,
            Some(PathBuf::from("out/events.jsonl"))
        );
        assert_eq!(cfg.session.metrics_path, None);
    }
}
