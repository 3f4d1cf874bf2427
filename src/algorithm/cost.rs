// src/algorithm/cost.rs
use serde::Serialize;

/// Running cost/benefit accumulator.
///
/// Reset per candidate evaluation by the lattice, then folded into the
/// driver's running total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cost {
    /// Estimated cost of materializing the aggregate.
    pub cost: f64,
    /// Workload rows saved, frequency-weighted.
    pub benefit: f64,
    /// Number of distinct query patterns that improve.
    pub benefit_count: usize,
}

impl Cost {
    pub fn clear(&mut self) {
        *self = Cost::default();
    }
}

/// Per-aggregate cost/benefit record, computed against the final
/// materialized set after the selection loop stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBenefit {
    /// Estimated rows in the aggregate.
    pub row_count: f64,
    /// Estimated storage bytes.
    pub space: f64,
    /// Estimated load cost (row units).
    pub load_time: f64,
    /// Workload query rows this aggregate saves, frequency-weighted.
    pub saved_query_rows: f64,
    /// Fraction of workload query weight served by this aggregate.
    pub query_load: f64,
}

impl CostBenefit {
    /// One-line human-readable summary for a CLI/log sink.
    pub fn describe(&self) -> String {
        format!(
            "{} rows, {} bytes, {} load cost, {} query rows saved, used by {}% of queries",
            self.row_count as i64,
            self.space as i64,
            self.load_time as i64,
            self.saved_query_rows as i64,
            (self.query_load * 100.0) as i64
        )
    }
}
