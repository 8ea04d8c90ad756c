//! 2D gradient noise with a seeded permutation table, plus the warped fractal
//! field built on top of it.
pub mod fbm;
pub mod warp;

use noise::NoiseFn;

use crate::prng::XorShift64;

pub use fbm::{fractal_field, SHAPING_EXPONENT};

/// Perlin-type gradient noise over a 256-periodic lattice.
///
/// The permutation is a Fisher–Yates shuffle of 0..255 driven by
/// [`XorShift64`], stored twice so corner lookups never wrap.
#[derive(Debug, Clone)]
pub struct GradientNoise {
    perm: [u8; 512],
}

impl GradientNoise {
    pub fn new(seed: u64) -> Self {
        let mut perm = [0u8; 512];
        for (i, p) in perm.iter_mut().take(256).enumerate() {
            *p = i as u8;
        }
        let mut rng = XorShift64::new(seed);
        for i in (1..256usize).rev() {
            let j = rng.uniform_int(0, i as i32) as usize;
            perm.swap(i, j);
        }
        perm.copy_within(0..256, 256);
        Self { perm }
    }

    /// The duplicated 512-entry permutation table.
    pub fn permutation(&self) -> &[u8; 512] {
        &self.perm
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// Noise value in [0, 1] at `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let fx = x.floor();
        let fy = y.floor();
        let xi = (fx as i32 & 255) as usize;
        let yi = (fy as i32 & 255) as usize;
        let xf = x - fx;
        let yf = y - fy;
        let u = fade(xf);
        let v = fade(yf);

        let aa = self.p(self.p(xi) + yi);
        let ab = self.p(self.p(xi) + yi + 1);
        let ba = self.p(self.p(xi + 1) + yi);
        let bb = self.p(self.p(xi + 1) + yi + 1);

        let res = lerp(
            lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u),
            lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u),
            v,
        );
        (res + 1.0) / 2.0
    }
}

impl NoiseFn<f64, 2> for GradientNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

/// Quintic fade curve `t³(t(6t − 15) + 10)`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of the diagonals (±1, ±1), picked by the low two hash bits.
#[inline]
fn grad(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}
