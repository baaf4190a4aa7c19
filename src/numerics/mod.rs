//! Aligned fingerprint storage and the vectorized popcount path.
//!
//! Fingerprints destined for the SIMD kernel live in 16-byte aligned
//! [`AlignedBlock`]s. [`PopcountStrategy`] picks between the scalar lookup
//! tables and the SSSE3 kernel at runtime.

mod aligned_block;
mod fingerprint;
#[cfg(target_arch = "x86_64")]
pub mod ssse3;
mod strategy;

pub use aligned_block::{AlignedBlock, BLOCK_BYTES};
pub use fingerprint::Fingerprint;
pub use strategy::PopcountStrategy;
