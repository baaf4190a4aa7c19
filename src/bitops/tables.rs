/// Marker value for bytes that are not hex digits. It is the one bit no
/// valid nibble sets, so a cumulative OR over a whole fingerprint is `< BIG`
/// exactly when every byte was a hex digit.
pub const BIG: u8 = 16;

/// ASCII byte -> nibble value (0-15), or [`BIG`] for non-hex bytes.
pub static HEX_VALUE: [u8; 256] = build_hex_value();

/// ASCII byte -> popcount of the nibble it encodes, 0 for non-hex bytes.
/// Only meaningful once the input is known to be valid.
pub static HEX_POPCOUNT: [u8; 256] = build_hex_popcount();

/// Popcount of a 5-bit index. Entries 16-31 only come up when a [`BIG`] got
/// combined with another value, and are zero.
pub static NIBBLE_POPCOUNT: [u8; 32] = build_nibble_popcount();

/// Popcount of a full byte.
pub static BYTE_POPCOUNT: [u8; 256] = build_byte_popcount();

const fn build_hex_value() -> [u8; 256] {
    let mut table = [BIG; 256];
    let mut c = 0;
    while c < 256 {
        table[c] = match c as u8 {
            b'0'..=b'9' => c as u8 - b'0',
            b'A'..=b'F' => c as u8 - b'A' + 10,
            b'a'..=b'f' => c as u8 - b'a' + 10,
            _ => BIG,
        };
        c += 1;
    }
    table
}

const fn build_hex_popcount() -> [u8; 256] {
    let values = build_hex_value();
    let mut table = [0; 256];
    let mut c = 0;
    while c < 256 {
        if values[c] < BIG {
            table[c] = values[c].count_ones() as u8;
        }
        c += 1;
    }
    table
}

const fn build_nibble_popcount() -> [u8; 32] {
    let mut table = [0; 32];
    let mut i = 0;
    while i < BIG as usize {
        table[i] = (i as u8).count_ones() as u8;
        i += 1;
    }
    table
}

const fn build_byte_popcount() -> [u8; 256] {
    let mut table = [0; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).count_ones() as u8;
        i += 1;
    }
    table
}

#[inline(always)]
pub(crate) fn hex_value(c: u8) -> u8 {
    HEX_VALUE[c as usize]
}

/// `w` is at most `BIG | 15`, the mask only lets the compiler drop the bounds check.
#[inline(always)]
pub(crate) fn nibble_popcount(w: u8) -> u64 {
    NIBBLE_POPCOUNT[(w & 0x1F) as usize] as u64
}

#[inline(always)]
pub(crate) fn byte_popcount_of(b: u8) -> u64 {
    BYTE_POPCOUNT[b as usize] as u64
}
