//! Output comparison for validating optimized builds against a baseline.
//!
//! Raw maps are compared byte by byte with a small tolerance; rendered images
//! are compared per RGB pixel and summarized with RMSE and PSNR.

use serde::Serialize;

use crate::error::{CraterError, Result};

/// Largest per-byte difference that still counts as a match.
pub const TOLERANCE: u8 = 1;

/// Largest share of out-of-tolerance bytes a passing candidate may have.
pub const MAX_MISMATCH_RATIO: f64 = 0.001;

/// PSNR reported for identical images.
pub const PSNR_IDENTICAL: f64 = 99.99;

/// Visual diff amplification: `min(255, err · 16)`.
const DIFF_GAIN: u32 = 16;

// ── Raw buffers ───────────────────────────────────────────────────────────────

/// Byte-wise comparison of a candidate raw map against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawComparison {
    pub len: usize,
    pub max_abs_error: u8,
    pub rmse: f64,
    /// Bytes whose error exceeds [`TOLERANCE`].
    pub mismatches: usize,
    pub mismatch_ratio: f64,
    /// Offset, baseline value and candidate value of the first mismatch.
    pub first_mismatch: Option<(usize, u8, u8)>,
}

impl RawComparison {
    pub fn passed(&self) -> bool {
        self.mismatch_ratio <= MAX_MISMATCH_RATIO
    }
}

pub fn compare_raw(baseline: &[u8], candidate: &[u8]) -> Result<RawComparison> {
    if baseline.len() != candidate.len() {
        return Err(CraterError::DimensionMismatch { expected: baseline.len(), found: candidate.len() });
    }

    let mut max_abs_error = 0u8;
    let mut sum_sq = 0.0f64;
    let mut mismatches = 0usize;
    let mut first_mismatch = None;

    for (i, (&a, &b)) in baseline.iter().zip(candidate).enumerate() {
        let err = a.abs_diff(b);
        if err > TOLERANCE {
            if first_mismatch.is_none() {
                first_mismatch = Some((i, a, b));
            }
            mismatches += 1;
        }
        max_abs_error = max_abs_error.max(err);
        sum_sq += f64::from(err) * f64::from(err);
    }

    let len = baseline.len();
    let (rmse, mismatch_ratio) = if len == 0 {
        (0.0, 0.0)
    } else {
        ((sum_sq / len as f64).sqrt(), mismatches as f64 / len as f64)
    };

    Ok(RawComparison { len, max_abs_error, rmse, mismatches, mismatch_ratio, first_mismatch })
}

// ── RGB images ────────────────────────────────────────────────────────────────

/// Per-pixel difference of two RGB images of equal size.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelDiff {
    pub width: usize,
    pub height: usize,
    /// Pixels where any channel differs.
    pub mismatched: usize,
    /// Largest single-channel error.
    pub max_abs_error: u8,
    /// Over all channels of all pixels.
    pub rmse: f64,
    pub psnr: f64,
    /// One byte per pixel, amplified max channel error.
    pub diff_map: Vec<u8>,
}

impl PixelDiff {
    pub fn pixels(&self) -> usize {
        self.width * self.height
    }

    pub fn mismatch_ratio(&self) -> f64 {
        if self.pixels() == 0 {
            0.0
        } else {
            self.mismatched as f64 / self.pixels() as f64
        }
    }
}

/// Compare two packed RGB buffers of `width × height` pixels each.
pub fn compare_pixels(baseline: &[u8], candidate: &[u8], width: usize, height: usize) -> Result<PixelDiff> {
    let expected = width * height * 3;
    for buf in [baseline, candidate] {
        if buf.len() != expected {
            return Err(CraterError::DimensionMismatch { expected, found: buf.len() });
        }
    }

    let mut mismatched = 0usize;
    let mut max_abs_error = 0u8;
    let mut sum_sq = 0.0f64;
    let mut diff_map = Vec::with_capacity(width * height);

    for (pa, pb) in baseline.chunks_exact(3).zip(candidate.chunks_exact(3)) {
        let mut pixel_max = 0u8;
        for (&a, &b) in pa.iter().zip(pb) {
            let err = a.abs_diff(b);
            pixel_max = pixel_max.max(err);
            sum_sq += f64::from(err) * f64::from(err);
        }
        if pixel_max > 0 {
            mismatched += 1;
        }
        max_abs_error = max_abs_error.max(pixel_max);
        diff_map.push((u32::from(pixel_max) * DIFF_GAIN).min(255) as u8);
    }

    let mse = if expected == 0 { 0.0 } else { sum_sq / expected as f64 };
    let psnr = if mse > 1e-9 { 10.0 * (255.0 * 255.0 / mse).log10() } else { PSNR_IDENTICAL };

    Ok(PixelDiff { width, height, mismatched, max_abs_error, rmse: mse.sqrt(), psnr, diff_map })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identical_raw_passes() {
        let data: Vec<u8> = (0..=255).collect();
        let r = compare_raw(&data, &data).unwrap();
        assert_eq!(r.max_abs_error, 0);
        assert_eq!(r.mismatches, 0);
        assert_eq!(r.first_mismatch, None);
        assert!(r.passed());
    }

    #[test]
    fn off_by_one_is_within_tolerance() {
        let a = vec![100u8; 1000];
        let b: Vec<u8> = a.iter().enumerate().map(|(i, &v)| if i % 2 == 0 { v + 1 } else { v - 1 }).collect();
        let r = compare_raw(&a, &b).unwrap();
        assert_eq!(r.max_abs_error, 1);
        assert_eq!(r.mismatches, 0);
        assert_relative_eq!(r.rmse, 1.0);
        assert!(r.passed());
    }

    #[test]
    fn ratio_threshold_decides_verdict() {
        let a = vec![0u8; 2000];
        let mut b = a.clone();
        b[10] = 5;
        b[20] = 9;
        let r = compare_raw(&a, &b).unwrap();
        assert_eq!(r.mismatches, 2);
        assert_eq!(r.first_mismatch, Some((10, 0, 5)));
        assert_eq!(r.max_abs_error, 9);
        assert_relative_eq!(r.mismatch_ratio, 0.001);
        assert!(r.passed());

        b[30] = 2;
        let r = compare_raw(&a, &b).unwrap();
        assert_eq!(r.mismatches, 3);
        assert!(!r.passed());
    }

    #[test]
    fn raw_size_mismatch_is_an_error() {
        let err = compare_raw(&[0; 4], &[0; 5]).unwrap_err();
        assert!(matches!(err, CraterError::DimensionMismatch { expected: 4, found: 5 }));
    }

    #[test]
    fn empty_raw_passes_trivially() {
        let r = compare_raw(&[], &[]).unwrap();
        assert_eq!(r.len, 0);
        assert!(r.passed());
    }

    #[test]
    fn identical_images_report_capped_psnr() {
        let img = vec![7u8; 4 * 3 * 3];
        let d = compare_pixels(&img, &img, 4, 3).unwrap();
        assert_eq!(d.mismatched, 0);
        assert_eq!(d.psnr, PSNR_IDENTICAL);
        assert!(d.diff_map.iter().all(|&v| v == 0));
        assert_eq!(d.diff_map.len(), 12);
    }

    #[test]
    fn pixel_statistics() {
        // Two pixels; the second differs by (3, 0, 20).
        let a = [10, 10, 10, 50, 50, 50];
        let b = [10, 10, 10, 53, 50, 30];
        let d = compare_pixels(&a, &b, 2, 1).unwrap();
        assert_eq!(d.mismatched, 1);
        assert_eq!(d.max_abs_error, 20);
        let mse = (9.0 + 400.0) / 6.0;
        assert_relative_eq!(d.rmse, f64::sqrt(mse));
        assert_relative_eq!(d.psnr, 10.0 * (65025.0 / mse).log10());
        assert_eq!(d.diff_map, vec![0, 255]);
        assert_relative_eq!(d.mismatch_ratio(), 0.5);
    }

    #[test]
    fn diff_map_scales_small_errors() {
        let d = compare_pixels(&[0, 0, 0], &[0, 2, 0], 1, 1).unwrap();
        assert_eq!(d.diff_map, vec![32]);
    }

    #[test]
    fn pixel_buffer_size_checked() {
        let err = compare_pixels(&[0; 6], &[0; 5], 2, 1).unwrap_err();
        assert!(matches!(err, CraterError::DimensionMismatch { expected: 6, found: 5 }));
    }
}
