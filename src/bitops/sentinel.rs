//! The hex operations with in-band error values instead of `Result`:
//! `-1` / `-1.0` for invalid input and `1` / `0` / `-1` for containment.
//! Useful when the results cross into a C-style API. Counts beyond
//! `i32::MAX` saturate.

use crate::bitops::hex::{self, Containment};

fn count_or_minus_one(count: Result<u64, crate::error::HexError>) -> i32 {
    count.map_or(-1, |c| i32::try_from(c).unwrap_or(i32::MAX))
}

/// `1` if `fp` is a valid hex fingerprint, `0` otherwise.
pub fn hex_isvalid(fp: &[u8]) -> i32 {
    hex::hex_is_valid(fp) as i32
}

/// Popcount of `fp`, `-1` if it holds a non-hex byte.
pub fn hex_popcount(fp: &[u8]) -> i32 {
    count_or_minus_one(hex::hex_popcount(fp))
}

/// Popcount of `fp1 & fp2`, `-1` if either input holds a non-hex byte.
pub fn hex_intersect_popcount(fp1: &[u8], fp2: &[u8]) -> i32 {
    count_or_minus_one(hex::hex_intersect_popcount(fp1, fp2))
}

/// Tanimoto similarity in `[0, 1]`, `-1.0` on invalid input.
pub fn hex_tanimoto(fp1: &[u8], fp2: &[u8]) -> f64 {
    hex::hex_tanimoto(fp1, fp2).unwrap_or(-1.0)
}

/// `1` if `query` is contained in `target`, `0` if not, `-1` on invalid input.
pub fn hex_contains(query: &[u8], target: &[u8]) -> i32 {
    match hex::hex_contains(query, target) {
        Containment::Contained => 1,
        Containment::NotContained => 0,
        Containment::Invalid => -1,
    }
}
