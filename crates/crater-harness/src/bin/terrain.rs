//! Terrain pipeline driver.
//!
//! Reads `H W octaves persistence lacunarity base_freq height_scale perlin_seed`
//! from stdin, prints the height-map digest to stdout and `time_sec=` to stderr.
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use crater_core::{digest::digest_hex, generate_terrain, Config};
use crater_harness::artifact::{write_ppm, write_raw};
use crater_harness::colormap::colorize;
use crater_harness::report::{MapDigest, RunReport};
use crater_harness::{init_logging, read_stdin};

#[derive(Parser, Debug)]
#[command(name = "terrain", about = "Generate an eroded 8-bit height map from a stdin configuration")]
struct Args {
    /// Write the raw height map (H×W bytes, row-major)
    #[arg(long)]
    output_raw: Option<PathBuf>,

    /// Write a colour-mapped P6 preview
    #[arg(long)]
    visualize: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let cfg = Config::from_terrain_stream(&read_stdin()?).context("invalid terrain configuration")?;
    log::info!(
        "terrain {}×{}, {} octaves, seed {}",
        cfg.width,
        cfg.height,
        cfg.terrain.octaves,
        cfg.seeds.terrain
    );

    let start = Instant::now();
    let heights = generate_terrain(&cfg);
    let elapsed = start.elapsed().as_secs_f64();

    let digest = digest_hex(heights.as_bytes());
    println!("{digest}");
    eprintln!("time_sec={elapsed:.6}");

    if let Some(path) = &args.output_raw {
        match write_raw(path, &heights) {
            Ok(()) => log::info!("wrote raw height map to {}", path.display()),
            Err(e) => log::error!("{e:#}"),
        }
    }

    if let Some(path) = &args.visualize {
        log::info!("rendering colour preview to {}", path.display());
        if let Err(e) = write_ppm(path, &colorize(heights.as_bytes()), cfg.width, cfg.height) {
            log::error!("{e:#}");
        }
    }

    if let Some(path) = &args.report {
        let report = RunReport {
            pipeline: "terrain",
            width: cfg.width,
            height: cfg.height,
            elapsed_sec: elapsed,
            digests: vec![MapDigest::of("height", &heights)],
            config: cfg,
        };
        if let Err(e) = report.write(path) {
            log::error!("{e:#}");
        }
    }

    Ok(())
}
