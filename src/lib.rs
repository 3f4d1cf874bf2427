//! # Aggdes
//!
//! A greedy aggregate-table designer for star-schema workloads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          Schema + Workload (TOML, via loader)            │
//! │   (attributes, measures, fact stats, query patterns)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model::loader]
//! ┌─────────────────────────────────────────────────────────┐
//! │            Schema / Workload (Rust Types)                │
//! │            + StatisticsProvider (estimates)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [algorithm]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Lattice (2^N candidate roll-ups, bitset-encoded)     │
//! │     + greedy selection loop (budget, ratio, timeout)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │     DesignResult (chosen aggregates + cost/benefit)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The selection engine is exhaustive over the candidate space but greedy
//! across picks: at each step it materializes the aggregate with the best
//! benefit/cost ratio given everything materialized so far. With `N`
//! attributes and `M` chosen aggregates the running time is `M * 2^N`,
//! which is prohibitive for all but small schemas (20 levels and 40
//! aggregates already means 40 million candidate evaluations).

pub mod algorithm;
pub mod config;
pub mod model;

// Re-export the main surface at crate root for convenience.
pub use algorithm::{
    Aggregate, Algorithm, AlgorithmError, CancelToken, CostBenefit, DesignResult, GreedyAlgorithm,
    Progress,
};
pub use config::ParameterSet;
pub use model::{
    Attribute, AttributeSet, Measure, QueryPattern, Schema, StatisticsProvider, Workload,
};
