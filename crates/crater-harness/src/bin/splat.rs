//! Splat pipeline driver.
//!
//! Reads `H W bomb_count bomb_r_min bomb_r_max gaussian_flag bullet_count
//! bullet_r_min bullet_r_max events_seed` from stdin, composites every event
//! over the height map and prints the occlusion digest.
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use crater_core::{composite_splat, digest::digest_hex, place_splat_events, ByteMap, Config};
use crater_harness::artifact::{read_height_map, write_ppm, write_raw};
use crater_harness::colormap::grayscale;
use crater_harness::report::{MapDigest, RunReport};
use crater_harness::{init_logging, read_stdin};

const DEFAULT_PREVIEW: &str = "occlusion_S.ppm";

#[derive(Parser, Debug)]
#[command(name = "splat", about = "Composite bomb and bullet impacts into damage and occlusion maps")]
struct Args {
    /// Raw H×W height map from the terrain pipeline; flat terrain if omitted
    #[arg(long)]
    input_heightmap: Option<PathBuf>,

    #[arg(long)]
    output_damage_raw: Option<PathBuf>,

    #[arg(long)]
    output_occlusion_raw: Option<PathBuf>,

    /// Write the occlusion map as a grayscale P6 preview
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_PREVIEW)]
    visualize: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let cfg = Config::from_splat_stream(&read_stdin()?).context("invalid splat configuration")?;
    log::info!(
        "splat {}×{}, {} bombs, {} bullets, seed {}",
        cfg.width,
        cfg.height,
        cfg.bombs.count,
        cfg.bullets.count,
        cfg.seeds.events
    );

    let heights = match &args.input_heightmap {
        Some(path) => read_height_map(path, cfg.width, cfg.height)?,
        None => {
            log::info!("no height map given, using flat terrain");
            ByteMap::zeroed(cfg.width, cfg.height)
        }
    };

    // Only compositing is timed; event placement stays outside the window.
    let events = place_splat_events(&cfg, &heights)?;
    let start = Instant::now();
    let maps = composite_splat(&cfg, &heights, &events);
    let elapsed = start.elapsed().as_secs_f64();

    println!("{}", digest_hex(maps.occlusion.as_bytes()));
    eprintln!("time_sec={elapsed:.6}");

    for (path, map, what) in [
        (&args.output_damage_raw, &maps.damage, "damage"),
        (&args.output_occlusion_raw, &maps.occlusion, "occlusion"),
    ] {
        let Some(path) = path else { continue };
        match write_raw(path, map) {
            Ok(()) => log::info!("wrote {what} map to {}", path.display()),
            Err(e) => log::error!("{e:#}"),
        }
    }

    if let Some(path) = &args.visualize {
        log::info!("rendering occlusion preview to {}", path.display());
        if let Err(e) = write_ppm(path, &grayscale(maps.occlusion.as_bytes()), cfg.width, cfg.height) {
            log::error!("{e:#}");
        }
    }

    if let Some(path) = &args.report {
        let report = RunReport {
            pipeline: "splat",
            width: cfg.width,
            height: cfg.height,
            elapsed_sec: elapsed,
            digests: vec![
                MapDigest::of("damage", &maps.damage),
                MapDigest::of("occlusion", &maps.occlusion),
            ],
            config: cfg,
        };
        if let Err(e) = report.write(path) {
            log::error!("{e:#}");
        }
    }

    Ok(())
}
