//! Elliptical splat compositing into the damage and occlusion maps.
//!
//! Every event rasterizes its clipped bounding box; pixels whose normalized
//! elliptical distance exceeds 1 are skipped. Contributions are attenuated by
//! the height map and added with 8-bit saturation.
//!
//! All contributions are non-negative, so the saturating sum at a pixel equals
//! `min(255, Σ)` in any order. The threaded path uses that to rasterize
//! horizontal bands independently.
pub mod footprint;

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::bytemap::ByteMap;
use crate::config::Config;
use crate::events::Event;
use footprint::Footprint;

/// Guards the inverse squared radius against a zero radius.
const RADIUS_EPSILON: f32 = 1e-6;

#[cfg(feature = "threading")]
const BAND_ROWS: usize = 64;

/// Damage and occlusion accumulators for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplatMaps {
    pub damage: ByteMap,
    pub occlusion: ByteMap,
}

impl SplatMaps {
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self { damage: ByteMap::zeroed(width, height), occlusion: ByteMap::zeroed(width, height) }
    }
}

#[inline]
fn saturating_add_u8(a: u8, b: i32) -> u8 {
    (a as i32 + b).clamp(0, 255) as u8
}

/// Integer bounding box of an event, clipped to the grid. Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    x_min: usize,
    x_max: usize,
    y_min: usize,
    y_max: usize,
}

impl Bounds {
    fn of(ev: &Event, width: usize, height: usize) -> Self {
        let x_min = (ev.x - ev.rx).floor().max(0.0) as usize;
        let x_max = (ev.x + ev.rx).ceil().min((width - 1) as f32) as usize;
        let y_min = (ev.y - ev.ry).floor().max(0.0) as usize;
        let y_max = (ev.y + ev.ry).ceil().min((height - 1) as f32) as usize;
        Self { x_min, x_max, y_min, y_max }
    }
}

/// Rasterize one event over rows `[row_lo, row_hi]` (inclusive, global indices)
/// into buffers that start at global row `row_base`.
#[allow(clippy::too_many_arguments)]
fn rasterize(
    ev: &Event,
    footprint: Footprint,
    bounds: Bounds,
    row_lo: usize,
    row_hi: usize,
    row_base: usize,
    width: usize,
    heights: &[u8],
    damage: &mut [u8],
    occlusion: &mut [u8],
) {
    let inv_rx_sq = 1.0 / (ev.rx * ev.rx + RADIUS_EPSILON);
    let inv_ry_sq = 1.0 / (ev.ry * ev.ry + RADIUS_EPSILON);

    for y in row_lo..=row_hi {
        let dy = (y as f32 + 0.5) - ev.y;
        let ky = (dy * dy) * inv_ry_sq;

        let mut dx = (bounds.x_min as f32 + 0.5) - ev.x;
        let global_row = y * width;
        let local_row = (y - row_base) * width;

        for x in bounds.x_min..=bounds.x_max {
            let dist_sq = (dx * dx) * inv_rx_sq + ky;
            if dist_sq <= 1.0 {
                let c = footprint.contribution(ev.intensity, dist_sq, heights[global_row + x]);
                let i = local_row + x;
                damage[i] = saturating_add_u8(damage[i], c.damage);
                occlusion[i] = saturating_add_u8(occlusion[i], c.occlusion);
            }
            dx += 1.0;
        }
    }
}

/// Composite `events` in order into `maps`, attenuating damage by `heights`.
///
/// `heights` and both maps must be `config.width × config.height`.
pub fn composite(events: &[Event], config: &Config, heights: &ByteMap, maps: &mut SplatMaps) {
    let (width, height) = (config.width, config.height);
    debug_assert_eq!(heights.len(), width * height);
    debug_assert_eq!(maps.damage.len(), width * height);
    debug_assert_eq!(maps.occlusion.len(), width * height);
    if width == 0 || height == 0 {
        return;
    }

    #[cfg(feature = "threading")]
    composite_banded(events, config, heights, maps);
    #[cfg(not(feature = "threading"))]
    composite_sequential(events, config, heights, maps);
}

/// Single pass over the events in generation order.
pub fn composite_sequential(events: &[Event], config: &Config, heights: &ByteMap, maps: &mut SplatMaps) {
    let (width, height) = (config.width, config.height);
    for ev in events {
        let footprint = Footprint::resolve(ev.kind, config.bombs.gaussian);
        let b = Bounds::of(ev, width, height);
        rasterize(
            ev,
            footprint,
            b,
            b.y_min,
            b.y_max,
            0,
            width,
            &heights.data,
            &mut maps.damage.data,
            &mut maps.occlusion.data,
        );
    }
}

/// Row-band parallel compositing.
///
/// Events are bucketed by the bands their boxes overlap, keeping generation
/// order inside each bucket; each band then owns its slice of both maps.
#[cfg(feature = "threading")]
pub fn composite_banded(events: &[Event], config: &Config, heights: &ByteMap, maps: &mut SplatMaps) {
    let (width, height) = (config.width, config.height);
    let n_bands = height.div_ceil(BAND_ROWS);

    let mut buckets: Vec<Vec<(usize, Bounds)>> = vec![Vec::new(); n_bands];
    for (i, ev) in events.iter().enumerate() {
        let b = Bounds::of(ev, width, height);
        for bucket in &mut buckets[b.y_min / BAND_ROWS..=b.y_max / BAND_ROWS] {
            bucket.push((i, b));
        }
    }

    let band_len = BAND_ROWS * width;
    maps.damage
        .data
        .par_chunks_mut(band_len)
        .zip(maps.occlusion.data.par_chunks_mut(band_len))
        .zip(buckets.par_iter())
        .enumerate()
        .for_each(|(band, ((damage, occlusion), bucket))| {
            let row_base = band * BAND_ROWS;
            let row_end = row_base + damage.len() / width - 1;
            for &(i, b) in bucket {
                let ev = &events[i];
                let footprint = Footprint::resolve(ev.kind, config.bombs.gaussian);
                rasterize(
                    ev,
                    footprint,
                    b,
                    b.y_min.max(row_base),
                    b.y_max.min(row_end),
                    row_base,
                    width,
                    &heights.data,
                    damage,
                    occlusion,
                );
            }
        });
}
