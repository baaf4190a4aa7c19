use crate::bitops::tables::byte_popcount_of;

// Every byte value is a legal bit pattern here, so none of these can fail.
// They place no alignment requirement on their input either; see
// `numerics` for the aligned, vectorized popcount.

/// Population count of a byte fingerprint.
pub fn byte_popcount(fp: &[u8]) -> u64 {
    fp.iter().map(|&b| byte_popcount_of(b)).sum()
}

/// Population count of `fp1 & fp2`.
pub fn byte_intersect_popcount(fp1: &[u8], fp2: &[u8]) -> u64 {
    fp1.iter()
        .zip(fp2)
        .map(|(&a, &b)| byte_popcount_of(a & b))
        .sum()
}

/// Population count of `fp1 | fp2`.
pub fn byte_union_popcount(fp1: &[u8], fp2: &[u8]) -> u64 {
    fp1.iter()
        .zip(fp2)
        .map(|(&a, &b)| byte_popcount_of(a | b))
        .sum()
}

/// Tanimoto similarity between two byte fingerprints, `1.0` when neither
/// has any bit set.
pub fn byte_tanimoto(fp1: &[u8], fp2: &[u8]) -> f64 {
    let mut union_popcount = 0u64;
    let mut intersect_popcount = 0u64;
    for (&a, &b) in fp1.iter().zip(fp2) {
        union_popcount += byte_popcount_of(a | b);
        intersect_popcount += byte_popcount_of(a & b);
    }
    tanimoto_from_counts(intersect_popcount, union_popcount)
}

/// `intersect / union` as a float in `[0, 1]`, `1.0` when `union` is 0.
pub fn tanimoto_from_counts(intersect_popcount: u64, union_popcount: u64) -> f64 {
    debug_assert!(intersect_popcount <= union_popcount);
    if union_popcount == 0 {
        return 1.0;
    }
    intersect_popcount as f64 / union_popcount as f64
}

/// Returns `true` if every bit set in `query` is also set in `target`.
pub fn byte_contains(query: &[u8], target: &[u8]) -> bool {
    query.iter().zip(target).all(|(&q, &t)| q & t == q)
}
