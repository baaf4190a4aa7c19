use crate::{
    bitops::{
        byte_contains, byte_intersect_popcount, byte_popcount, byte_tanimoto, byte_union_popcount,
        tanimoto_from_counts,
    },
    numerics::{aligned_block::AlignedBlock, strategy::PopcountStrategy},
};

/// Similarity metrics as methods on byte fingerprints. The trait exists
/// because inherent methods cannot be added to `[u8]`.
///
/// Implemented for plain `[u8]` (scalar lookup tables) and for
/// `[AlignedBlock]`, where popcounts go through the best
/// [`PopcountStrategy`] the CPU supports.
///
/// # Contract
///
/// - Operations involving two fingerprints require that they have the same
///   length.
pub trait Fingerprint {
    fn popcount(&self) -> u64;
    fn intersect_popcount(&self, othr: &Self) -> u64;
    fn union_popcount(&self, othr: &Self) -> u64;
    fn tanimoto(&self, othr: &Self) -> f64;
    fn contained_in(&self, othr: &Self) -> bool;
}

impl Fingerprint for [u8] {
    #[inline]
    fn popcount(&self) -> u64 {
        byte_popcount(self)
    }

    #[inline]
    fn intersect_popcount(&self, othr: &[u8]) -> u64 {
        byte_intersect_popcount(self, othr)
    }

    #[inline]
    fn union_popcount(&self, othr: &[u8]) -> u64 {
        byte_union_popcount(self, othr)
    }

    #[inline]
    fn tanimoto(&self, othr: &[u8]) -> f64 {
        byte_tanimoto(self, othr)
    }

    #[inline]
    fn contained_in(&self, othr: &[u8]) -> bool {
        byte_contains(self, othr)
    }
}

impl Fingerprint for [AlignedBlock] {
    #[inline]
    fn popcount(&self) -> u64 {
        PopcountStrategy::detect_cached().popcount(self)
    }

    /// # Panics
    ///
    /// Panics if the two fingerprints have different lengths.
    #[inline]
    fn intersect_popcount(&self, othr: &[AlignedBlock]) -> u64 {
        PopcountStrategy::detect_cached().intersect_popcount(self, othr)
    }

    /// `|A ∪ B| = |A| + |B| - |A ∩ B|`, so three vectorized popcounts give
    /// the exact union count.
    #[inline]
    fn union_popcount(&self, othr: &[AlignedBlock]) -> u64 {
        let strategy = PopcountStrategy::detect_cached();
        let intersection = strategy.intersect_popcount(self, othr);
        strategy.popcount(self) + strategy.popcount(othr) - intersection
    }

    /// # Panics
    ///
    /// Panics if the two fingerprints have different lengths.
    #[inline]
    fn tanimoto(&self, othr: &[AlignedBlock]) -> f64 {
        let strategy = PopcountStrategy::detect_cached();
        let intersection = strategy.intersect_popcount(self, othr);
        let union = strategy.popcount(self) + strategy.popcount(othr) - intersection;
        tanimoto_from_counts(intersection, union)
    }

    #[inline]
    fn contained_in(&self, othr: &[AlignedBlock]) -> bool {
        assert_eq!(self.len(), othr.len());
        byte_contains(AlignedBlock::as_bytes(self), AlignedBlock::as_bytes(othr))
    }
}
