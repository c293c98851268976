//! Debug World Tool
//!
//! Debugging utility for world generation visualization and validation.
//!
//! Features:
//! - Height map silhouette (ASCII art)
//! - Full world dump, one glyph per tile
//! - Block statistics with a JSON metrics report
//!
//! Usage:
//!   debug-world heightmap --seed 12345
//!   debug-world render --seed 12345 --width 120 --height 40
//!   debug-world stats --seed 12345 --output target/metrics/world_stats.json

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use terra2d_core::BlockKind;
use terra2d_testkit::{
    block_histogram, MetricsReportBuilder, MetricsSink, TerrainMetrics, TestExecutionMetrics,
};
use terra2d_world::{GeneratedWorld, HeightMap, WorldConfig, WorldGenerator, DEFAULT_SEED};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "World generation debugging utility for terra2d", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot the surface line as an ASCII silhouette
    Heightmap(WorldArgs),
    /// Dump the generated world, one glyph per tile
    Render {
        #[command(flatten)]
        world: WorldArgs,

        /// First column to draw
        #[arg(long, default_value_t = 0)]
        from: usize,

        /// Number of columns to draw (default: all)
        #[arg(long)]
        columns: Option<usize>,
    },
    /// Print a block histogram and write a metrics report
    Stats(WorldArgs),
}

#[derive(Args, Debug)]
struct WorldArgs {
    /// World seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// World width in tiles
    #[arg(long, default_value_t = 100)]
    width: usize,

    /// World height in tiles
    #[arg(long, default_value_t = 50)]
    height: usize,

    /// Output file (default: stdout; for `stats`, target/metrics/debug_world_stats.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl WorldArgs {
    fn config(&self) -> Result<WorldConfig> {
        if self.width == 0 || self.height < 2 {
            bail!(
                "world must be at least 1x2 tiles (got {}x{})",
                self.width,
                self.height
            );
        }
        Ok(WorldConfig::default()
            .with_seed(self.seed)
            .with_size(self.width, self.height))
    }

    fn generate(&self) -> Result<(GeneratedWorld, f64)> {
        let config = self.config()?;
        let start = Instant::now();
        let world = WorldGenerator::new(config).generate();
        Ok((world, start.elapsed().as_secs_f64() * 1000.0))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Heightmap(args) => visualize_heightmap(&args),
        Command::Render {
            world,
            from,
            columns,
        } => render_world(&world, from, columns),
        Command::Stats(args) => world_stats(&args),
    }
}

fn emit(text: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "output saved");
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// One text row per world row between the highest and lowest surface; `#` is ground.
fn heightmap_silhouette(height_map: &HeightMap) -> String {
    let top = height_map.min_height();
    let bottom = height_map.max_height() + 1;
    let mut out = String::new();
    for row in top..=bottom {
        out.push_str(&format!("{:>4} ", row));
        for &surface in height_map.heights() {
            out.push(if row > surface { '#' } else { ' ' });
        }
        out.push('\n');
    }
    out
}

fn visualize_heightmap(args: &WorldArgs) -> Result<()> {
    let (world, elapsed_ms) = args.generate()?;
    let hm = &world.height_map;
    info!(seed = args.seed, elapsed_ms, "height map generated");

    let mut text = String::new();
    text.push_str(&format!("Height map (seed: {})\n", args.seed));
    text.push_str(&format!(
        "Surface rows: {} to {} (avg {:.1})\n\n",
        hm.min_height(),
        hm.max_height(),
        hm.avg_height()
    ));
    text.push_str(&heightmap_silhouette(hm));
    emit(&text, args.output.as_ref())
}

fn render_world(args: &WorldArgs, from: usize, columns: Option<usize>) -> Result<()> {
    let (world, _) = args.generate()?;
    let width = world.grid.width();
    if from >= width {
        bail!("--from {} is past the last column ({})", from, width - 1);
    }
    let end = columns.map_or(width, |n| (from + n).min(width));

    let mut text = String::new();
    text.push_str(&format!(
        "World (seed: {}, {}x{}, columns {}..{})\n",
        args.seed,
        width,
        world.grid.height(),
        from,
        end
    ));
    text.push_str("Legend: ");
    for kind in BlockKind::ALL.into_iter().filter(|k| *k != BlockKind::Air) {
        text.push_str(&format!("{}={} ", kind.glyph(), kind));
    }
    text.push_str("\n\n");
    text.push_str(&world.grid.render_columns(from..end));
    emit(&text, args.output.as_ref())
}

fn world_stats(args: &WorldArgs) -> Result<()> {
    let (world, gen_time_ms) = args.generate()?;
    let start = Instant::now();

    let block_counts = block_histogram(world.grid.iter().map(|(_, cell)| cell.kind()));
    let metrics = TerrainMetrics {
        seed: args.seed,
        width: world.grid.width(),
        height: world.grid.height(),
        gen_time_ms,
        min_surface: world.height_map.min_height(),
        max_surface: world.height_map.max_height(),
        avg_surface: world.height_map.avg_height() as f64,
        trees: world.trees.len(),
        block_counts,
    };

    println!("Block statistics (seed: {})", args.seed);
    println!("  Size: {}x{}", metrics.width, metrics.height);
    println!("  Generation: {:.2}ms", gen_time_ms);
    println!("  Trees: {}", metrics.trees);
    for kind in BlockKind::ALL {
        let count = metrics.block_counts.get(kind.name()).copied().unwrap_or(0);
        if count > 0 {
            println!(
                "  {:<12} {:>7} ({:.2}%)",
                kind.name(),
                count,
                metrics.fraction(kind) * 100.0
            );
        }
    }

    let report = MetricsReportBuilder::new("debug_world_stats")
        .terrain(metrics)
        .execution(TestExecutionMetrics {
            duration_seconds: start.elapsed().as_secs_f64() + gen_time_ms / 1000.0,
            ..TestExecutionMetrics::default()
        })
        .build();

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("target/metrics/debug_world_stats.json"));
    let sink = MetricsSink::create(&path)
        .with_context(|| format!("failed to create metrics sink at {}", path.display()))?;
    sink.write(&report)?;
    println!("Metrics: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silhouette_marks_ground_below_surface() {
        let hm = HeightMap::from_heights(vec![2, 3, 2]);
        let text = heightmap_silhouette(&hm);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], "   2    ");
        assert_eq!(rows[1], "   3 # #");
        assert_eq!(rows[2], "   4 ###");
    }

    #[test]
    fn tiny_worlds_are_rejected() {
        let args = WorldArgs {
            seed: 1,
            width: 0,
            height: 10,
            output: None,
        };
        assert!(args.config().is_err());
    }

    #[test]
    fn cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "debug-world",
            "render",
            "--seed",
            "7",
            "--from",
            "10",
            "--columns",
            "20",
        ])
        .unwrap();
        match cli.command {
            Command::Render {
                world,
                from,
                columns,
            } => {
                assert_eq!(world.seed, 7);
                assert_eq!(world.width, 100);
                assert_eq!(from, 10);
                assert_eq!(columns, Some(20));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
