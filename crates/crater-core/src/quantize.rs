//! Float field → 8-bit height map.
#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::bytemap::ByteMap;
use crate::heightfield::HeightField;

/// `round(clamp(v, 0, 1) · 255)`, halves rounding away from zero. NaN maps to 0.
#[inline]
pub fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Quantize every cell independently.
pub fn quantize_field(hf: &HeightField) -> ByteMap {
    #[cfg(feature = "threading")]
    let data: Vec<u8> = hf.data.par_iter().map(|&v| quantize(v)).collect();
    #[cfg(not(feature = "threading"))]
    let data: Vec<u8> = hf.data.iter().map(|&v| quantize(v)).collect();

    ByteMap { data, width: hf.width, height: hf.height }
}
