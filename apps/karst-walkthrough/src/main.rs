//! Karst streaming walkthrough.
//!
//! Flies a scripted camera through the procedural world without a window or
//! GPU, streaming chunks into a headless sink and logging per-tick stats.
//! Useful for profiling generation/meshing throughput and for soak-testing
//! the streamer's budget behavior.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p karst-walkthrough -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `--ticks <N>`: Number of control-loop ticks to simulate (default: 600)
//! - `--seed <N>`: World generation seed (default: 42)
//! - `--chunk-size <N>`: Chunk edge length in blocks (default: 16)
//! - `--render-distance <N>`: Render cube radius in chunks (default: 4)
//! - `--budget <N>`: Max chunk mutations per tick (default: 8)
//! - `--speed <N>`: Camera speed in blocks per tick (default: 1.5)
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use anyhow::Result;
use glam::Vec3;
use tracing::info;

use karst_core::sink::HeadlessSink;
use karst_world::{
    ChunkExtents, ChunkStreamer, FieldConfig, StreamingConfig, TerrainField, ViewSnapshot,
    WorldSeed,
};

/// Walkthrough parameters, populated from the command line.
#[derive(Debug, Clone)]
struct WalkthroughParams {
    ticks: u32,
    seed: WorldSeed,
    chunk_size: u32,
    render_distance: i64,
    budget: usize,
    speed: f32,
}

impl Default for WalkthroughParams {
    fn default() -> Self {
        Self {
            ticks: 600,
            seed: 42,
            chunk_size: 16,
            render_distance: 4,
            budget: 8,
            speed: 1.5,
        }
    }
}

impl WalkthroughParams {
    fn from_args() -> Self {
        let mut params = Self::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--ticks" => {
                    if i + 1 < args.len() {
                        if let Ok(v) = args[i + 1].parse() {
                            params.ticks = v;
                            i += 1;
                        }
                    }
                }
                "--seed" => {
                    if i + 1 < args.len() {
                        if let Ok(v) = args[i + 1].parse() {
                            params.seed = v;
                            i += 1;
                        }
                    }
                }
                "--chunk-size" => {
                    if i + 1 < args.len() {
                        if let Ok(v) = args[i + 1].parse() {
                            params.chunk_size = v;
                            i += 1;
                        }
                    }
                }
                "--render-distance" => {
                    if i + 1 < args.len() {
                        if let Ok(v) = args[i + 1].parse() {
                            params.render_distance = v;
                            i += 1;
                        }
                    }
                }
                "--budget" => {
                    if i + 1 < args.len() {
                        if let Ok(v) = args[i + 1].parse() {
                            params.budget = v;
                            i += 1;
                        }
                    }
                }
                "--speed" => {
                    if i + 1 < args.len() {
                        if let Ok(v) = args[i + 1].parse() {
                            params.speed = v;
                            i += 1;
                        }
                    }
                }
                _ => {}
            }
            i += 1;
        }

        params
    }
}

/// Camera position along the scripted path at the given tick.
///
/// A steady march along +X with a gentle sine weave on Z, hovering a little
/// above the terrain amplitude so both surface and sky chunks stream through.
fn camera_position(tick: u32, speed: f32) -> Vec3 {
    let t = tick as f32;
    Vec3::new(t * speed, 12.0, (t * 0.02).sin() * 48.0)
}

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    tracing_subscriber::fmt::init();

    let params = WalkthroughParams::from_args();
    info!(?params, "starting walkthrough");

    let field = TerrainField::new(FieldConfig {
        seed: params.seed,
        ..Default::default()
    });
    let config = StreamingConfig {
        extents: ChunkExtents::cubic(params.chunk_size),
        render_distance: params.render_distance,
        mutation_budget: params.budget,
    };
    let mut streamer = ChunkStreamer::new(config, field)?;
    let mut sink = HeadlessSink::new();

    let started = std::time::Instant::now();
    let mut total_loaded = 0usize;
    let mut total_unloaded = 0usize;

    for tick in 0..params.ticks {
        let view = ViewSnapshot::new(camera_position(tick, params.speed));
        let update = streamer.update(view, &mut sink)?;
        total_loaded += update.loaded.len();
        total_unloaded += update.unloaded.len();

        if update.mutations() > 0 {
            info!(
                tick,
                loaded = update.loaded.len(),
                unloaded = update.unloaded.len(),
                live = streamer.len(),
                vertices = sink.live_vertices(),
                "tick"
            );
        }
    }

    info!(
        ticks = params.ticks,
        elapsed_ms = started.elapsed().as_millis() as u64,
        total_loaded,
        total_unloaded,
        live = streamer.len(),
        live_vertices = sink.live_vertices(),
        live_indices = sink.live_indices(),
        "walkthrough complete"
    );

    Ok(())
}

fn print_help() {
    eprintln!(
        "Karst Streaming Walkthrough

Flies a scripted camera through the procedural world headlessly, streaming
chunks into a counting sink and logging per-tick statistics.

USAGE:
    cargo run -p karst-walkthrough -- [OPTIONS]

OPTIONS:
    --ticks <N>            Control-loop ticks to simulate (default: 600)
    --seed <N>             World generation seed (default: 42)
    --chunk-size <N>       Chunk edge length in blocks (default: 16)
    --render-distance <N>  Render cube radius in chunks (default: 4)
    --budget <N>           Max chunk mutations per tick (default: 8)
    --speed <N>            Camera speed in blocks per tick (default: 1.5)
    -h, --help             Print this help message

EXAMPLES:
    # Default walkthrough
    cargo run -p karst-walkthrough

    # Stress the budget with a big render cube
    cargo run -p karst-walkthrough -- --render-distance 8 --budget 4

ENVIRONMENT VARIABLES:
    RUST_LOG               Set log level (e.g., info, debug, trace)"
    );
}
