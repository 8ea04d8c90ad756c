use crate::digest::fnv1a64;
use crate::error::{CraterError, Result};

/// Row-major 8-bit grid: height map, damage map or occlusion map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteMap {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl ByteMap {
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self { data: vec![0; width * height], width, height }
    }

    /// Wrap a headerless raw buffer, which must hold exactly `width * height` bytes.
    pub fn from_raw(data: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(CraterError::DimensionMismatch { expected, found: data.len() });
        }
        Ok(Self { data, width, height })
    }

    /// Same (row, col) order as [`HeightField::get`](crate::HeightField::get).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.width + col]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// FNV-1a digest of the raw bytes.
    pub fn digest(&self) -> u64 {
        fnv1a64(&self.data)
    }

    /// Number of non-zero cells.
    pub fn coverage(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = ByteMap::from_raw(vec![0; 11], 4, 3).unwrap_err();
        assert!(
            matches!(err, CraterError::DimensionMismatch { expected: 12, found: 11 }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn from_raw_keeps_layout() {
        let map = ByteMap::from_raw((0..12).collect(), 4, 3).unwrap();
        assert_eq!(map.get(0, 3), 3);
        assert_eq!(map.get(2, 0), 8);
        assert_eq!(map.coverage(), 11);
    }

    #[test]
    fn indexes_like_height_field() {
        let mut hf = crate::HeightField::new(5, 3, 0.0);
        hf.set(1, 4, 1.0);
        let map = crate::quantize::quantize_field(&hf);
        assert_eq!(map.get(1, 4), 255);
        assert_eq!(map.coverage(), 1);
    }
}
