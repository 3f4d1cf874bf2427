// src/model/statistics.rs
//! Row-count and load-time estimation for attribute subsets.

use crate::model::AttributeSet;
use thiserror::Error;

/// Errors raised by a statistics provider.
///
/// Cost/benefit numbers computed from bad statistics are meaningless, so a
/// provider failure aborts the run instead of being silently defaulted.
#[derive(Debug, Clone, Error)]
pub enum StatisticsError {
    #[error("no estimate available for attribute set {bits:#x}")]
    MissingEstimate { bits: u64 },

    #[error("statistics provider failed: {0}")]
    Provider(String),
}

/// External estimator of row counts and load times for arbitrary attribute
/// subsets.
///
/// Both methods are pure functions of the attribute set: same input, same
/// estimate, no side effects. The selection loop consults the provider once
/// per distinct subset (estimates are memoized by the lattice), but a
/// provider backed by real I/O should still answer from memory.
pub trait StatisticsProvider: std::fmt::Debug + Send + Sync {
    /// Estimated distinct-row count of a roll-up grouping by `attributes`.
    fn row_count(&self, attributes: &AttributeSet) -> Result<f64, StatisticsError>;

    /// Estimated cost (in row units) of building and maintaining a roll-up
    /// grouping by `attributes`.
    fn load_time(&self, attributes: &AttributeSet) -> Result<f64, StatisticsError>;
}

/// Default heuristic provider.
///
/// Row count is the product of the attribute cardinalities, capped at the
/// fact-table row count (a roll-up can never have more rows than the fact
/// table it summarizes). Load time equals the estimated row count.
#[derive(Debug, Clone)]
pub struct HeuristicStatistics {
    fact_row_count: f64,
    cardinalities: Vec<f64>,
}

impl HeuristicStatistics {
    pub fn new(fact_row_count: f64, cardinalities: Vec<f64>) -> Self {
        Self {
            fact_row_count,
            cardinalities,
        }
    }
}

impl StatisticsProvider for HeuristicStatistics {
    fn row_count(&self, attributes: &AttributeSet) -> Result<f64, StatisticsError> {
        if attributes.width() != self.cardinalities.len() {
            return Err(StatisticsError::MissingEstimate {
                bits: attributes.bits(),
            });
        }
        let mut rows = 1.0;
        for index in attributes.indices() {
            rows *= self.cardinalities[index].max(1.0);
            if rows >= self.fact_row_count {
                return Ok(self.fact_row_count);
            }
        }
        Ok(rows.min(self.fact_row_count).max(1.0))
    }

    fn load_time(&self, attributes: &AttributeSet) -> Result<f64, StatisticsError> {
        self.row_count(attributes)
    }
}
