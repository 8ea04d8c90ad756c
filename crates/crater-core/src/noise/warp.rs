//! Single-level domain warp.
//!
//! A second gradient field, seeded one above the primary, displaces each grid
//! coordinate by up to ±`WARP_AMPLITUDE` cells before the fractal stack is
//! evaluated. This breaks up the lattice alignment of the primary field.
use noise::NoiseFn;

use super::GradientNoise;

pub const WARP_FREQUENCY: f64 = 0.005;
pub const WARP_AMPLITUDE: f64 = 60.0;
/// Offset of the second (y) sample, decorrelating it from the first.
pub const WARP_OFFSET: (f64, f64) = (123.4, 567.8);

pub struct DomainWarp {
    field: GradientNoise,
}

impl DomainWarp {
    /// Build the warp field for a terrain seed (the field itself uses `seed + 1`).
    pub fn new(terrain_seed: u64) -> Self {
        Self { field: GradientNoise::new(terrain_seed.wrapping_add(1)) }
    }

    /// Warped coordinates for grid cell `(x, y)`.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let q1 = self.field.get([x * WARP_FREQUENCY, y * WARP_FREQUENCY]);
        let q2 = self.field.get([
            (x + WARP_OFFSET.0) * WARP_FREQUENCY,
            (y + WARP_OFFSET.1) * WARP_FREQUENCY,
        ]);
        (x + WARP_AMPLITUDE * (2.0 * q1 - 1.0), y + WARP_AMPLITUDE * (2.0 * q2 - 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_bounded_by_amplitude() {
        let warp = DomainWarp::new(99);
        for i in 0..200 {
            let (x, y) = (i as f64 * 3.0, i as f64 * 7.0);
            let (xw, yw) = warp.apply(x, y);
            assert!((xw - x).abs() <= WARP_AMPLITUDE + 1e-9, "x displacement {}", xw - x);
            assert!((yw - y).abs() <= WARP_AMPLITUDE + 1e-9, "y displacement {}", yw - y);
        }
    }

    #[test]
    fn nonzero_warp_moves_points() {
        let warp = DomainWarp::new(7);
        let moved = (0..50).any(|i| {
            let p = i as f64 * 13.7 + 0.5;
            let (xw, yw) = warp.apply(p, p);
            (xw - p).abs() > 1e-6 || (yw - p).abs() > 1e-6
        });
        assert!(moved, "warp should displace at least one point");
    }

    #[test]
    fn origin_x_is_fixed_point() {
        // The first sample at (0, 0) lands on a lattice corner, where noise is 0.5.
        let warp = DomainWarp::new(1234);
        let (xw, _) = warp.apply(0.0, 0.0);
        assert!(xw.abs() < 1e-9, "x at origin should not move, got {xw}");
    }
}
