//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Counters collected during a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Candidate moves evaluated at the root.
    pub root_moves: u32,

    /// Random playouts run.
    pub playouts: u64,

    /// Moves executed inside playouts.
    pub plies: u64,

    /// Longest playout, in plies.
    pub max_depth: u32,

    /// Time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a finished playout of `plies` moves.
    pub fn record_playout(&mut self, plies: u32) {
        self.playouts += 1;
        self.plies += u64::from(plies);
        self.max_depth = self.max_depth.max(plies);
    }

    #[must_use]
    pub fn playouts_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.playouts as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Mean playout length.
    #[must_use]
    pub fn average_plies(&self) -> f64 {
        if self.playouts == 0 {
            0.0
        } else {
            self.plies as f64 / self.playouts as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_playout() {
        let mut stats = SearchStats::new();
        stats.record_playout(4);
        stats.record_playout(8);

        assert_eq!(stats.playouts, 2);
        assert_eq!(stats.plies, 12);
        assert_eq!(stats.max_depth, 8);
        assert_eq!(stats.average_plies(), 6.0);
    }

    #[test]
    fn test_rates_without_time() {
        let stats = SearchStats::new();
        assert_eq!(stats.playouts_per_second(), 0.0);
        assert_eq!(stats.average_plies(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut stats = SearchStats::new();
        stats.record_playout(3);
        stats.time_us = 10;
        stats.reset();
        assert_eq!(stats, SearchStats::default());
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = SearchStats::new();
        stats.record_playout(5);

        let json = serde_json::to_string(&stats).unwrap();
        let back: SearchStats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, back);
    }
}
