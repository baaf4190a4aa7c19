use crate::bitops::byte::tanimoto_from_counts;
use crate::bitops::tables::{BIG, HEX_POPCOUNT, hex_value, nibble_popcount};
use crate::error::HexError;

/// Outcome of a subset test between two hex fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// Every bit set in the query is also set in the target.
    Contained,
    /// Some bit of the query is missing from the target.
    NotContained,
    /// One of the inputs holds a non-hex byte.
    Invalid,
}

impl Containment {
    /// `Some(true/false)` for a decided test, `None` for invalid input.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Containment::Contained => Some(true),
            Containment::NotContained => Some(false),
            Containment::Invalid => None,
        }
    }
}

/// Returns `true` if every byte of `fp` is one of `0-9A-Fa-f`.
/// An empty fingerprint is valid.
pub fn hex_is_valid(fp: &[u8]) -> bool {
    let union_w = fp.iter().fold(0u8, |acc, &c| acc | hex_value(c));
    union_w < BIG
}

/// Position of the first non-hex byte in `fp`, if any.
pub fn hex_first_invalid(fp: &[u8]) -> Option<usize> {
    fp.iter().position(|&c| hex_value(c) >= BIG)
}

/// Population count of a hex fingerprint, computed in the same pass that
/// validates it.
pub fn hex_popcount(fp: &[u8]) -> Result<u64, HexError> {
    let mut union_w = 0u8;
    let mut popcount = 0u64;
    for &c in fp {
        popcount += HEX_POPCOUNT[c as usize] as u64;
        union_w |= hex_value(c);
    }
    check_valid(union_w, fp, &[])?;
    Ok(popcount)
}

/// Population count of `fp1 & fp2`. A non-hex byte in either input, at any
/// position, fails the whole call.
pub fn hex_intersect_popcount(fp1: &[u8], fp2: &[u8]) -> Result<u64, HexError> {
    let (fp1, fp2) = common_prefix(fp1, fp2);
    let mut union_w = 0u8;
    let mut intersect_popcount = 0u64;
    for (&c1, &c2) in fp1.iter().zip(fp2) {
        let w1 = hex_value(c1);
        let w2 = hex_value(c2);
        union_w |= w1 | w2;
        intersect_popcount += nibble_popcount(w1 & w2);
    }
    check_valid(union_w, fp1, fp2)?;
    Ok(intersect_popcount)
}

/// Population count of `fp1 | fp2`.
pub fn hex_union_popcount(fp1: &[u8], fp2: &[u8]) -> Result<u64, HexError> {
    let (fp1, fp2) = common_prefix(fp1, fp2);
    let mut union_w = 0u8;
    let mut union_popcount = 0u64;
    for (&c1, &c2) in fp1.iter().zip(fp2) {
        let w = hex_value(c1) | hex_value(c2);
        union_w |= w;
        union_popcount += nibble_popcount(w);
    }
    check_valid(union_w, fp1, fp2)?;
    Ok(union_popcount)
}

/// Tanimoto similarity between two hex fingerprints.
///
/// Two characters are consumed per iteration; an odd trailing character is
/// handled separately. If neither fingerprint has a bit set the result is
/// `1.0` rather than `0/0`.
pub fn hex_tanimoto(fp1: &[u8], fp2: &[u8]) -> Result<f64, HexError> {
    let (fp1, fp2) = common_prefix(fp1, fp2);
    let mut union_w = 0u8;
    let mut union_popcount = 0u64;
    let mut intersect_popcount = 0u64;

    let mut pairs1 = fp1.chunks_exact(2);
    let mut pairs2 = fp2.chunks_exact(2);
    for (p1, p2) in (&mut pairs1).zip(&mut pairs2) {
        let w1 = hex_value(p1[0]);
        let w2 = hex_value(p2[0]);
        let w3 = hex_value(p1[1]);
        let w4 = hex_value(p2[1]);
        union_w |= w1 | w2 | w3 | w4;
        // largest index is BIG | 15, only reachable on invalid input
        union_popcount += nibble_popcount(w1 | w2) + nibble_popcount(w3 | w4);
        intersect_popcount += nibble_popcount(w1 & w2) + nibble_popcount(w3 & w4);
    }
    for (&c1, &c2) in pairs1.remainder().iter().zip(pairs2.remainder()) {
        let w1 = hex_value(c1);
        let w2 = hex_value(c2);
        union_w |= w1 | w2;
        union_popcount += nibble_popcount(w1 | w2);
        intersect_popcount += nibble_popcount(w1 & w2);
    }

    check_valid(union_w, fp1, fp2)?;
    Ok(tanimoto_from_counts(intersect_popcount, union_popcount))
}

/// Subset test: is every bit of `query` also set in `target`?
///
/// The scan stops at the first position that fails the test, but validity
/// seen so far (that position included) is checked first: garbage read
/// through the sentinel can make the comparison fail, and that must come out
/// as [`Containment::Invalid`], not [`Containment::NotContained`]. A
/// completed scan is `Invalid` if any position was invalid.
pub fn hex_contains(query: &[u8], target: &[u8]) -> Containment {
    let (query, target) = common_prefix(query, target);
    let mut union_w = 0u8;
    for (&q, &t) in query.iter().zip(target) {
        let query_w = hex_value(q);
        let target_w = hex_value(t);
        union_w |= query_w | target_w;
        if query_w & target_w != query_w {
            return if union_w >= BIG {
                Containment::Invalid
            } else {
                Containment::NotContained
            };
        }
    }
    if union_w >= BIG {
        Containment::Invalid
    } else {
        Containment::Contained
    }
}

/// Both inputs cut to the length of the shorter one.
fn common_prefix<'a>(fp1: &'a [u8], fp2: &'a [u8]) -> (&'a [u8], &'a [u8]) {
    let len = fp1.len().min(fp2.len());
    (&fp1[..len], &fp2[..len])
}

/// Turns a cumulative OR into an error naming the earliest non-hex byte.
/// `fp1` and `fp2` must be exactly the bytes the OR was taken over; pass an
/// empty `fp2` for single-fingerprint operations.
fn check_valid(union_w: u8, fp1: &[u8], fp2: &[u8]) -> Result<(), HexError> {
    if union_w < BIG {
        return Ok(());
    }
    let first1 = hex_first_invalid(fp1);
    let first2 = hex_first_invalid(fp2);
    let (position, byte) = match (first1, first2) {
        (Some(a), Some(b)) if b < a => (b, fp2[b]),
        (Some(a), _) => (a, fp1[a]),
        (None, Some(b)) => (b, fp2[b]),
        // the OR only reaches BIG through a non-hex byte
        (None, None) => return Ok(()),
    };
    Err(HexError::InvalidDigit { position, byte })
}
