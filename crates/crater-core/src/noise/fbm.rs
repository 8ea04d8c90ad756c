//! Normalized fractal accumulation over the warped grid.
//!
//! fBm: sum of octaves with amplitude = persistence^i and frequency =
//! base_freq · lacunarity^i, divided by the amplitude sum so the result stays
//! in [0, 1]. The shaped value `v^1.5` biases cells toward low ground.
use noise::NoiseFn;
#[cfg(feature = "threading")]
use rayon::prelude::*;

use super::warp::DomainWarp;
use super::GradientNoise;
use crate::config::{Config, TerrainParams};
use crate::heightfield::HeightField;

pub const SHAPING_EXPONENT: f64 = 1.5;

pub struct Fbm {
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub base_freq: f64,
    noise: GradientNoise,
}

impl Fbm {
    pub fn new(seed: u64, params: &TerrainParams) -> Self {
        Self {
            octaves: params.octaves,
            persistence: params.persistence,
            lacunarity: params.lacunarity,
            base_freq: params.base_freq,
            noise: GradientNoise::new(seed),
        }
    }

    /// Amplitude-normalized fBm at `(x, y)`, in [0, 1] before clamping.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0f64;
        let mut amp = 1.0f64;
        let mut freq = self.base_freq;
        let mut amp_sum = 0.0f64;
        for _ in 0..self.octaves {
            total += self.noise.get([x * freq, y * freq]) * amp;
            amp_sum += amp;
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        if amp_sum > 0.0 {
            total /= amp_sum;
        }
        total
    }
}

/// Evaluate one cell: warp, accumulate, clamp, shape.
#[inline]
fn shaped_cell(fbm: &Fbm, warp: &DomainWarp, x: usize, y: usize) -> f32 {
    let (xw, yw) = warp.apply(x as f64, y as f64);
    let v = fbm.sample(xw, yw).clamp(0.0, 1.0);
    v.powf(SHAPING_EXPONENT) as f32
}

/// Generate the shaped fractal field for the configured grid.
///
/// Cells are independent, so with the `threading` feature rows are filled in
/// parallel; the output is identical either way.
pub fn fractal_field(config: &Config) -> HeightField {
    let (width, height) = (config.width, config.height);
    let mut hf = HeightField::flat(width, height);
    if width == 0 || height == 0 {
        return hf;
    }

    let fbm = Fbm::new(config.seeds.terrain, &config.terrain);
    let warp = DomainWarp::new(config.seeds.terrain);

    let fill_row = |y: usize, row: &mut [f32]| {
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = shaped_cell(&fbm, &warp, x, y);
        }
    };

    #[cfg(feature = "threading")]
    hf.data.par_chunks_mut(width).enumerate().for_each(|(y, row)| fill_row(y, row));
    #[cfg(not(feature = "threading"))]
    hf.data.chunks_mut(width).enumerate().for_each(|(y, row)| fill_row(y, row));

    hf
}
