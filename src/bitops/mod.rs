//! Table-driven bit operations over byte and hex fingerprints.
//!
//! A byte fingerprint stores 8 fingerprint bits per byte, most significant
//! bit first (the byte `0x41` is the bit pattern `01000001`). A hex
//! fingerprint stores 4 bits per byte as one of `0-9A-Fa-f`; anything else
//! makes the whole fingerprint invalid.
//!
//! # Contract
//!
//! - Binary operations expect both inputs to have the same length. Given
//!   inputs of different lengths they work on the common prefix, and bytes
//!   past it are never looked at.
//! - Counts are `u64`.
//! - Hex operations validate and compute in a single pass. The validity
//!   check is a cumulative OR against the sentinel [`tables::BIG`], so valid
//!   input never takes a branch.

mod byte;
mod codec;
mod hex;
pub mod sentinel;
pub mod tables;

pub use byte::*;
pub use codec::*;
pub use hex::*;
