use crate::bitops::hex::hex_first_invalid;
use crate::bitops::tables::{BIG, hex_value};
use crate::error::HexError;

const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Encodes a byte fingerprint as uppercase hex, high nibble first.
pub fn hex_encode(fp: &[u8]) -> String {
    let mut out = String::with_capacity(fp.len() * 2);
    for &b in fp {
        out.push(UPPER_DIGITS[(b >> 4) as usize] as char);
        out.push(UPPER_DIGITS[(b & 0x0F) as usize] as char);
    }
    out
}

/// Decodes a hex fingerprint into bytes. Unlike the hex metrics, this needs
/// an even number of characters.
pub fn hex_decode(hex: &[u8]) -> Result<Vec<u8>, HexError> {
    if !hex.len().is_multiple_of(2) {
        return Err(HexError::OddLength { len: hex.len() });
    }

    let mut out = Vec::with_capacity(hex.len() / 2);
    let mut union_w = 0u8;
    for pair in hex.chunks_exact(2) {
        let hi = hex_value(pair[0]);
        let lo = hex_value(pair[1]);
        union_w |= hi | lo;
        out.push(((hi & 0x0F) << 4) | (lo & 0x0F));
    }

    if union_w >= BIG {
        if let Some(position) = hex_first_invalid(hex) {
            return Err(HexError::InvalidDigit {
                position,
                byte: hex[position],
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitops::{
        byte_intersect_popcount, byte_popcount, byte_tanimoto, hex_intersect_popcount,
        hex_popcount, hex_tanimoto,
    };
    use rand::prelude::*;

    #[test]
    fn test_encode() {
        assert_eq!(hex_encode(&[0x41]), "41");
        assert_eq!(hex_encode(&[0x00, 0xAB, 0xFF]), "00ABFF");
        assert_eq!(hex_encode(&[]), "");
    }

    #[test]
    fn test_decode() {
        assert_eq!(hex_decode(b"41"), Ok(vec![0x41]));
        assert_eq!(hex_decode(b"00abFF"), Ok(vec![0x00, 0xAB, 0xFF]));
        assert_eq!(hex_decode(b""), Ok(vec![]));
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        assert_eq!(hex_decode(b"414"), Err(HexError::OddLength { len: 3 }));
    }

    #[test]
    fn test_decode_rejects_bad_digit() {
        assert_eq!(
            hex_decode(b"4142zz"),
            Err(HexError::InvalidDigit {
                position: 4,
                byte: b'z'
            })
        );
    }

    #[test]
    fn test_decode_inverts_encode() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut fp = vec![0u8; 97];
        rng.fill(&mut fp[..]);
        assert_eq!(hex_decode(hex_encode(&fp).as_bytes()), Ok(fp));
    }

    #[test]
    fn test_hex_and_byte_metrics_agree() {
        let mut rng = StdRng::seed_from_u64(23);
        for len in [0usize, 1, 16, 128, 333] {
            let mut b1 = vec![0u8; len];
            let mut b2 = vec![0u8; len];
            rng.fill(&mut b1[..]);
            rng.fill(&mut b2[..]);
            let h1 = hex_encode(&b1);
            let h2 = hex_encode(&b2);

            assert_eq!(hex_popcount(h1.as_bytes()), Ok(byte_popcount(&b1)));
            assert_eq!(
                hex_intersect_popcount(h1.as_bytes(), h2.as_bytes()),
                Ok(byte_intersect_popcount(&b1, &b2))
            );
            let ht = hex_tanimoto(h1.as_bytes(), h2.as_bytes()).unwrap();
            assert!((ht - byte_tanimoto(&b1, &b2)).abs() < 1e-12);
        }
    }
}
