use std::time::Duration;

use serde::Serialize;

/// Throughput counters for a run of popcount calls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    calls: usize,
    bytes_processed: usize,
    bits_counted: u64,
    elapsed: Duration,
}

impl Stats {
    pub fn new() -> Self {
        Stats {
            calls: 0,
            bytes_processed: 0,
            bits_counted: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Record a popcount call over `num_bytes` bytes that found `bits` set bits.
    pub fn bump_call(&mut self, num_bytes: usize, bits: u64) {
        self.calls += 1;
        self.bytes_processed += num_bytes;
        self.bits_counted += bits;
    }

    pub fn add_elapsed(&mut self, elapsed: Duration) {
        self.elapsed += elapsed
    }

    pub fn get_calls(&self) -> usize {
        self.calls
    }

    pub fn get_bytes_processed(&self) -> usize {
        self.bytes_processed
    }

    /// Sum of all popcounts seen. Two runs over the same inputs must agree
    /// on this, whatever strategy they used.
    pub fn get_bits_counted(&self) -> u64 {
        self.bits_counted
    }

    pub fn get_elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Bytes per second, 0 if no time was recorded.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.bytes_processed as f64 / secs
        }
    }

    pub fn merge(&self, other: &Stats) -> Stats {
        Stats {
            calls: self.calls + other.calls,
            bytes_processed: self.bytes_processed + other.bytes_processed,
            bits_counted: self.bits_counted + other.bits_counted,
            elapsed: self.elapsed + other.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_initialized_to_zero() {
        let stats = Stats::new();
        assert_eq!(stats.get_calls(), 0);
        assert_eq!(stats.get_bytes_processed(), 0);
        assert_eq!(stats.get_bits_counted(), 0);
        assert_eq!(stats.get_elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_default_stats_initialized_to_zero() {
        let stats = Stats::default();
        assert_eq!(stats.get_calls(), 0);
        assert_eq!(stats.get_bytes_processed(), 0);
    }

    #[test]
    fn test_bump_call_accumulates() {
        let mut stats = Stats::new();
        stats.bump_call(128, 10);
        stats.bump_call(128, 5);
        assert_eq!(stats.get_calls(), 2);
        assert_eq!(stats.get_bytes_processed(), 256);
        assert_eq!(stats.get_bits_counted(), 15);
    }

    #[test]
    fn test_throughput() {
        let mut stats = Stats::new();
        assert_eq!(stats.throughput(), 0.0);
        stats.bump_call(1000, 0);
        stats.add_elapsed(Duration::from_millis(500));
        assert!((stats.throughput() - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge() {
        let mut a = Stats::new();
        a.bump_call(16, 3);
        a.add_elapsed(Duration::from_secs(1));
        let mut b = Stats::new();
        b.bump_call(32, 4);
        b.bump_call(32, 1);
        b.add_elapsed(Duration::from_secs(2));

        let merged = a.merge(&b);
        assert_eq!(merged.get_calls(), 3);
        assert_eq!(merged.get_bytes_processed(), 80);
        assert_eq!(merged.get_bits_counted(), 8);
        assert_eq!(merged.get_elapsed(), Duration::from_secs(3));
    }

    #[test]
    fn test_large_values() {
        let mut stats = Stats::new();
        for _ in 0..1000 {
            stats.bump_call(1 << 20, u32::MAX as u64 + 1);
        }
        assert_eq!(stats.get_calls(), 1000);
        assert_eq!(stats.get_bits_counted(), 1000 * (u32::MAX as u64 + 1));
    }

    #[test]
    fn test_serializes() {
        let mut stats = Stats::new();
        stats.bump_call(64, 7);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["calls"], 1);
        assert_eq!(json["bits_counted"], 7);
    }
}
