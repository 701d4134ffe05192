//! Sector valuation benchmarks for the Brazilian market.
//!
//! Reference averages approximated from historical B3 data. The table is a
//! lookup collaborator: valuation code receives already-normalized inputs
//! (e.g. a dividend per share derived from the sector average yield) and
//! never embeds these numbers itself.

use serde::{Deserialize, Serialize};

/// Average multiples for one sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorBenchmark {
    pub avg_pe: f64,
    pub avg_pb: f64,
    /// Average dividend yield as a decimal.
    pub avg_dividend_yield: f64,
}

impl SectorBenchmark {
    /// The dividend per share a stock at `price` would pay at the sector's
    /// average yield. Useful for normalizing an extraordinary dividend
    /// before a yield-based valuation.
    pub fn reference_dps(&self, price: f64) -> Option<f64> {
        (price > 0.0).then(|| self.avg_dividend_yield * price)
    }
}

const SECTOR_BENCHMARKS: &[(&str, SectorBenchmark)] = &[
    ("Financial Services", SectorBenchmark { avg_pe: 8.0, avg_pb: 1.2, avg_dividend_yield: 0.06 }),
    ("Banks", SectorBenchmark { avg_pe: 7.0, avg_pb: 1.0, avg_dividend_yield: 0.07 }),
    ("Technology", SectorBenchmark { avg_pe: 25.0, avg_pb: 5.0, avg_dividend_yield: 0.01 }),
    ("Consumer Cyclical", SectorBenchmark { avg_pe: 15.0, avg_pb: 2.5, avg_dividend_yield: 0.03 }),
    ("Consumer Defensive", SectorBenchmark { avg_pe: 18.0, avg_pb: 3.0, avg_dividend_yield: 0.04 }),
    ("Energy", SectorBenchmark { avg_pe: 6.0, avg_pb: 1.2, avg_dividend_yield: 0.10 }),
    ("Basic Materials", SectorBenchmark { avg_pe: 8.0, avg_pb: 1.5, avg_dividend_yield: 0.06 }),
    ("Industrials", SectorBenchmark { avg_pe: 12.0, avg_pb: 2.0, avg_dividend_yield: 0.03 }),
    ("Healthcare", SectorBenchmark { avg_pe: 20.0, avg_pb: 3.5, avg_dividend_yield: 0.02 }),
    ("Utilities", SectorBenchmark { avg_pe: 10.0, avg_pb: 1.5, avg_dividend_yield: 0.06 }),
    ("Real Estate", SectorBenchmark { avg_pe: 12.0, avg_pb: 1.0, avg_dividend_yield: 0.07 }),
    ("Communication Services", SectorBenchmark { avg_pe: 15.0, avg_pb: 2.0, avg_dividend_yield: 0.04 }),
];

/// Broad-market fallback for unmapped sectors.
pub const DEFAULT_BENCHMARK: SectorBenchmark = SectorBenchmark {
    avg_pe: 12.0,
    avg_pb: 2.0,
    avg_dividend_yield: 0.04,
};

/// Benchmark for a sector name: exact match first, then a case-insensitive
/// partial match in either direction, then the broad-market default.
pub fn sector_benchmark(sector: &str) -> SectorBenchmark {
    if let Some((_, benchmark)) = SECTOR_BENCHMARKS.iter().find(|(name, _)| *name == sector) {
        return *benchmark;
    }

    let sector_lower = sector.to_lowercase();
    for (name, benchmark) in SECTOR_BENCHMARKS {
        let name_lower = name.to_lowercase();
        if name_lower.contains(&sector_lower) || sector_lower.contains(&name_lower) {
            return *benchmark;
        }
    }

    DEFAULT_BENCHMARK
}
