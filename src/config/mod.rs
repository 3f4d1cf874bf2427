//! Run parameters for a design run.
//!
//! Supplied once at run start and read-only thereafter. Also deserializes
//! from TOML/JSON so a parameter file can be passed through unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for run-parameter validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("COST_LIMIT must be positive, got {0}")]
    NonPositiveCostLimit(f64),

    #[error("MIN_COST_BENEFIT_RATIO must be non-negative, got {0}")]
    NegativeRatio(f64),

    #[error("AGGREGATE_LIMIT must be at least 1")]
    ZeroAggregateLimit,
}

/// The run parameters recognized by the algorithms.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Wall-clock limit for the run, in seconds. Absent means unbounded.
    pub time_limit_seconds: Option<u64>,

    /// Storage/load-time budget for the whole aggregate set. Required,
    /// must be positive.
    pub cost_limit: f64,

    /// Minimum acceptable benefit per unit cost for any single aggregate.
    pub min_cost_benefit_ratio: f64,

    /// Cap on the number of materialized aggregates. Enforced via a
    /// per-aggregate cost surcharge of `cost_limit / (limit + 1)`, which is
    /// an approximation, not an exact cap. Absent means unlimited.
    pub aggregate_limit: Option<u32>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            time_limit_seconds: None,
            cost_limit: 0.0,
            min_cost_benefit_ratio: 0.0,
            aggregate_limit: None,
        }
    }
}

impl ParameterSet {
    /// Check the parameter values before a run starts; the loop never
    /// begins with invalid parameters.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.cost_limit > 0.0) {
            return Err(ParameterError::NonPositiveCostLimit(self.cost_limit));
        }
        if !(self.min_cost_benefit_ratio >= 0.0) {
            return Err(ParameterError::NegativeRatio(self.min_cost_benefit_ratio));
        }
        if self.aggregate_limit == Some(0) {
            return Err(ParameterError::ZeroAggregateLimit);
        }
        Ok(())
    }

    /// Metadata for the recognized parameters.
    pub fn parameters() -> &'static [ParameterInfo] {
        PARAMETERS
    }
}

/// Metadata describing one recognized run parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

const PARAMETERS: &[ParameterInfo] = &[
    ParameterInfo {
        name: "timeLimitSeconds",
        description: "Maximum time, in seconds, to run the algorithm",
        required: false,
    },
    ParameterInfo {
        name: "costLimit",
        description: "Maximum total cost of the aggregates produced",
        required: true,
    },
    ParameterInfo {
        name: "minCostBenefitRatio",
        description: "Minimum benefit per unit cost for any aggregate",
        required: false,
    },
    ParameterInfo {
        name: "aggregateLimit",
        description: "Maximum number of aggregates to create",
        required: false,
    },
];
