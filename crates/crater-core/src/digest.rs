//! 64-bit FNV-1a over output buffers, printed as the grading checkpoint.
//!
//! The offset basis is 1469598103934665603, one digit short of the canonical
//! FNV basis. Digests must match the existing baselines, so it stays.

pub const FNV_OFFSET_BASIS: u64 = 1_469_598_103_934_665_603;
pub const FNV_PRIME: u64 = 1_099_511_628_211;

pub fn fnv1a64(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, &b| (hash ^ b as u64).wrapping_mul(FNV_PRIME))
}

/// Digest formatted as 16 lowercase hex digits.
pub fn digest_hex(data: &[u8]) -> String {
    format!("{:016x}", fnv1a64(data))
}
