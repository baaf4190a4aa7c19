//! SSSE3 popcount over aligned blocks.
//!
//! Each byte is split into nibbles whose popcounts come out of a 16-entry
//! table via `pshufb`. Per-lane byte counts accumulate in 8-bit lanes and are
//! folded into 64-bit sums with `psadbw` after at most [`CHUNK_BLOCKS`]
//! blocks: 16 blocks contribute at most 16 * 8 = 128 per lane, while 32
//! blocks could reach 256 and wrap.
//!
//! Both functions require SSSE3. Call them through
//! [`PopcountStrategy`](super::PopcountStrategy) unless the feature has
//! already been checked.

use std::arch::x86_64::*;

use crate::numerics::aligned_block::AlignedBlock;

pub const CHUNK_BLOCKS: usize = 16;
const UNROLL: usize = 4;

/// Number of bits set in `fp`.
#[target_feature(enable = "ssse3")]
pub fn popcount(fp: &[AlignedBlock]) -> u64 {
    let mut count64 = _mm_setzero_si128();
    for chunk in fp.chunks(CHUNK_BLOCKS) {
        count64 = _mm_add_epi64(count64, fold(popcount_chunk(chunk)));
    }
    horizontal_sum(count64)
}

/// Number of bits set in `fp1 & fp2`.
///
/// # Panics
///
/// Panics if the two fingerprints have different lengths.
#[target_feature(enable = "ssse3")]
pub fn intersect_popcount(fp1: &[AlignedBlock], fp2: &[AlignedBlock]) -> u64 {
    assert_eq!(fp1.len(), fp2.len());

    let mut count64 = _mm_setzero_si128();
    for (c1, c2) in fp1.chunks(CHUNK_BLOCKS).zip(fp2.chunks(CHUNK_BLOCKS)) {
        count64 = _mm_add_epi64(count64, fold(intersect_popcount_chunk(c1, c2)));
    }
    horizontal_sum(count64)
}

#[inline]
#[target_feature(enable = "ssse3")]
fn load(block: &AlignedBlock) -> __m128i {
    // SAFETY: AlignedBlock is 16 bytes on a 16-byte boundary.
    unsafe { _mm_load_si128(block.data.as_ptr().cast::<__m128i>()) }
}

/// Popcount of every byte of `v`, one count per lane.
#[inline]
#[target_feature(enable = "ssse3")]
fn byte_counts(v: __m128i) -> __m128i {
    // popcounts of 0..=15, low to high
    let lut = _mm_setr_epi8(0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4);
    let mask = _mm_set1_epi8(0x0F);

    let lo = _mm_and_si128(mask, v);
    let hi = _mm_and_si128(mask, _mm_srli_epi16(v, 4));
    _mm_add_epi8(_mm_shuffle_epi8(lut, lo), _mm_shuffle_epi8(lut, hi))
}

/// 8-bit per-lane totals for at most [`CHUNK_BLOCKS`] blocks.
#[inline]
#[target_feature(enable = "ssse3")]
fn popcount_chunk(chunk: &[AlignedBlock]) -> __m128i {
    debug_assert!(chunk.len() <= CHUNK_BLOCKS);
    let mut total = _mm_setzero_si128();

    let mut quads = chunk.chunks_exact(UNROLL);
    for quad in &mut quads {
        let count0 = byte_counts(load(&quad[0]));
        let count1 = byte_counts(load(&quad[1]));
        let count2 = byte_counts(load(&quad[2]));
        let count3 = byte_counts(load(&quad[3]));
        total = _mm_add_epi8(
            total,
            _mm_add_epi8(_mm_add_epi8(count0, count1), _mm_add_epi8(count2, count3)),
        );
    }
    for block in quads.remainder() {
        total = _mm_add_epi8(total, byte_counts(load(block)));
    }
    total
}

#[inline]
#[target_feature(enable = "ssse3")]
fn intersect_popcount_chunk(c1: &[AlignedBlock], c2: &[AlignedBlock]) -> __m128i {
    debug_assert!(c1.len() <= CHUNK_BLOCKS);
    let mut total = _mm_setzero_si128();

    let mut quads1 = c1.chunks_exact(UNROLL);
    let mut quads2 = c2.chunks_exact(UNROLL);
    for (q1, q2) in (&mut quads1).zip(&mut quads2) {
        let v0 = _mm_and_si128(load(&q1[0]), load(&q2[0]));
        let v1 = _mm_and_si128(load(&q1[1]), load(&q2[1]));
        let v2 = _mm_and_si128(load(&q1[2]), load(&q2[2]));
        let v3 = _mm_and_si128(load(&q1[3]), load(&q2[3]));

        let count0 = byte_counts(v0);
        let count1 = byte_counts(v1);
        let count2 = byte_counts(v2);
        let count3 = byte_counts(v3);
        total = _mm_add_epi8(
            total,
            _mm_add_epi8(_mm_add_epi8(count0, count1), _mm_add_epi8(count2, count3)),
        );
    }
    for (b1, b2) in quads1.remainder().iter().zip(quads2.remainder()) {
        total = _mm_add_epi8(total, byte_counts(_mm_and_si128(load(b1), load(b2))));
    }
    total
}

/// 16 x 8-bit -> 2 x 64-bit (sum of absolute differences against zero).
#[inline]
#[target_feature(enable = "ssse3")]
fn fold(counts: __m128i) -> __m128i {
    _mm_sad_epu8(counts, _mm_setzero_si128())
}

#[inline]
#[target_feature(enable = "ssse3")]
fn horizontal_sum(count64: __m128i) -> u64 {
    let lo = _mm_cvtsi128_si64(count64) as u64;
    let hi = _mm_cvtsi128_si64(_mm_unpackhi_epi64(count64, count64)) as u64;
    lo + hi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitops::{byte_intersect_popcount, byte_popcount};
    use rand::prelude::*;

    fn random_blocks(rng: &mut StdRng, num_bytes: usize) -> Vec<AlignedBlock> {
        let mut bytes = vec![0u8; num_bytes];
        rng.fill(&mut bytes[..]);
        AlignedBlock::allocate_padded(&bytes)
    }

    #[test]
    fn test_popcount_matches_scalar() {
        if !is_x86_feature_detected!("ssse3") {
            return;
        }
        let mut rng = StdRng::seed_from_u64(42);
        // 0, one block, 128 bytes, and sizes that are not multiples of 64
        for num_bytes in [0usize, 16, 128, 16 * 5, 16 * 67, 1000, 4096 + 48] {
            let fp = random_blocks(&mut rng, num_bytes);
            let expected = byte_popcount(AlignedBlock::as_bytes(&fp));
            let got = unsafe { popcount(&fp) };
            assert_eq!(got, expected, "num_bytes={num_bytes}");
        }
    }

    #[test]
    fn test_intersect_popcount_matches_scalar() {
        if !is_x86_feature_detected!("ssse3") {
            return;
        }
        let mut rng = StdRng::seed_from_u64(43);
        for num_bytes in [0usize, 16, 128, 16 * 5, 16 * 67, 1000, 4096 + 48] {
            let fp1 = random_blocks(&mut rng, num_bytes);
            let fp2 = random_blocks(&mut rng, num_bytes);
            let expected =
                byte_intersect_popcount(AlignedBlock::as_bytes(&fp1), AlignedBlock::as_bytes(&fp2));
            let got = unsafe { intersect_popcount(&fp1, &fp2) };
            assert_eq!(got, expected, "num_bytes={num_bytes}");
        }
    }

    #[test]
    fn test_all_ones_does_not_overflow_lanes() {
        if !is_x86_feature_detected!("ssse3") {
            return;
        }
        for num_blocks in [1usize, 15, 16, 17, 31, 32, 33, 64, 1000] {
            let fp = vec![AlignedBlock::new([0xFF; 16]); num_blocks];
            let expected = (num_blocks * 16 * 8) as u64;
            assert_eq!(unsafe { popcount(&fp) }, expected);
            assert_eq!(unsafe { intersect_popcount(&fp, &fp) }, expected);
        }
    }

    #[test]
    fn test_single_bit_patterns() {
        if !is_x86_feature_detected!("ssse3") {
            return;
        }
        let mut data = [0u8; 16];
        data[0] = 0x41;
        data[15] = 0x80;
        let fp = [AlignedBlock::new(data)];
        assert_eq!(unsafe { popcount(&fp) }, 3);

        let other = [AlignedBlock::new([0x01; 16])];
        assert_eq!(unsafe { intersect_popcount(&fp, &other) }, 1);
    }
}
