//! Error types for fingerprint operations and popcount strategy selection.
//!
//! Byte fingerprints cannot be invalid, so the only domain error is a hex
//! fingerprint holding something other than `0-9A-Fa-f`.

use thiserror::Error;

/// A hex fingerprint could not be interpreted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexError {
    /// A byte outside `0-9A-Fa-f` was found.
    #[error("invalid hex digit {byte:#04x} at position {position}")]
    InvalidDigit {
        /// Index of the first offending byte
        position: usize,
        /// The offending byte itself
        byte: u8,
    },

    /// Decoding to bytes needs two hex characters per byte.
    #[error("hex fingerprint has odd length {len}, cannot decode to bytes")]
    OddLength {
        /// Length of the rejected input
        len: usize,
    },
}

/// A popcount strategy was requested that cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("popcount strategy `{strategy}` is not supported by this CPU")]
    Unsupported { strategy: &'static str },

    #[error("unknown popcount strategy `{0}` (expected one of: auto, scalar, ssse3)")]
    Unknown(String),
}
