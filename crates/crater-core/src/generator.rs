//! Pipeline orchestrators: run the stages of each pipeline in order.

use std::time::Instant;

use crate::bytemap::ByteMap;
use crate::config::Config;
use crate::error::{CraterError, Result};
use crate::events::{generate_scene_events, Event};
use crate::hydraulic::{erode, ErosionParams};
use crate::noise::fractal_field;
use crate::prng::XorShift64;
use crate::quantize::quantize_field;
use crate::splat::{composite, SplatMaps};

/// Terrain pipeline: warped fractal noise, droplet erosion, 8-bit quantization.
///
/// Erosion spawns droplets from the events seed, not the terrain seed.
pub fn generate_terrain(config: &Config) -> ByteMap {
    // ── 1. Noise synthesis ──────────────────────────────────────────────────
    let t = Instant::now();
    let mut hf = fractal_field(config);
    log::debug!("fractal field {}×{} in {:.3}s", config.width, config.height, t.elapsed().as_secs_f64());

    // ── 2. Hydraulic erosion ────────────────────────────────────────────────
    let t = Instant::now();
    let mut rng = XorShift64::new(config.seeds.events);
    let stats = erode(&mut hf, &mut rng, &ErosionParams::default());
    log::debug!(
        "erosion: {} droplets, {} steps, {} escaped in {:.3}s",
        stats.droplets,
        stats.steps,
        stats.escaped,
        t.elapsed().as_secs_f64()
    );

    // ── 3. Quantization ─────────────────────────────────────────────────────
    let t = Instant::now();
    let map = quantize_field(&hf);
    log::debug!("quantized in {:.3}s", t.elapsed().as_secs_f64());
    map
}

/// Splat pipeline: place every event, then composite them over `heights`.
pub fn generate_splat(config: &Config, heights: &ByteMap) -> Result<SplatMaps> {
    let events = place_splat_events(config, heights)?;
    Ok(composite_splat(config, heights, &events))
}

/// First half of [`generate_splat`]: check `heights` against the grid and draw
/// the bomb and bullet events.
pub fn place_splat_events(config: &Config, heights: &ByteMap) -> Result<Vec<Event>> {
    let expected = config.cells();
    if heights.len() != expected {
        return Err(CraterError::DimensionMismatch { expected, found: heights.len() });
    }

    let t = Instant::now();
    let events = generate_scene_events(config);
    log::debug!("placed {} events in {:.3}s", events.len(), t.elapsed().as_secs_f64());
    Ok(events)
}

/// Second half of [`generate_splat`]: the compositing pass the benchmarks time.
pub fn composite_splat(config: &Config, heights: &ByteMap, events: &[Event]) -> SplatMaps {
    let t = Instant::now();
    let mut maps = SplatMaps::zeroed(config.width, config.height);
    composite(events, config, heights, &mut maps);
    log::debug!("composited in {:.3}s", t.elapsed().as_secs_f64());
    maps
}
