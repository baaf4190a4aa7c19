//! Throughput statistics for popcount benchmarks.
//!
//! This module provides a counter structure that records calls, bytes
//! processed, set bits found and elapsed time, and merges across runs.

mod stats;
pub use stats::*;
