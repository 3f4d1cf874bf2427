// src/algorithm/result.rs
use crate::algorithm::candidate::Aggregate;
use crate::algorithm::cost::CostBenefit;

/// The outcome of a design run: the chosen aggregates in materialization
/// order, a parallel per-aggregate cost/benefit breakdown, and the realized
/// totals against the original budget. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct DesignResult {
    aggregates: Vec<Aggregate>,
    cost_benefits: Vec<CostBenefit>,
    cost_limit: f64,
    total_cost: f64,
    total_benefit: f64,
}

impl DesignResult {
    pub fn new(
        aggregates: Vec<Aggregate>,
        cost_benefits: Vec<CostBenefit>,
        cost_limit: f64,
        total_cost: f64,
        total_benefit: f64,
    ) -> Self {
        debug_assert_eq!(aggregates.len(), cost_benefits.len());
        Self {
            aggregates,
            cost_benefits,
            cost_limit,
            total_cost,
            total_benefit,
        }
    }

    /// Chosen aggregates, in the order they were materialized.
    pub fn aggregates(&self) -> &[Aggregate] {
        &self.aggregates
    }

    /// Cost/benefit record for each aggregate, parallel to
    /// [`aggregates`](DesignResult::aggregates).
    pub fn cost_benefits(&self) -> &[CostBenefit] {
        &self.cost_benefits
    }

    /// The budget the run was given.
    pub fn cost_limit(&self) -> f64 {
        self.cost_limit
    }

    /// Realized total cost, surcharges included.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Realized total benefit across the workload.
    pub fn total_benefit(&self) -> f64 {
        self.total_benefit
    }
}
