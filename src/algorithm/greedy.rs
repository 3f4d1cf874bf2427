// src/algorithm/greedy.rs
//! The greedy selection driver.

use crate::algorithm::cost::{Cost, CostBenefit};
use crate::algorithm::lattice::Lattice;
use crate::algorithm::result::DesignResult;
use crate::algorithm::{Aggregate, Algorithm, AlgorithmResult, CancelToken, Progress};
use crate::config::ParameterSet;
use crate::model::{Schema, StatisticsError, Workload};
use std::time::{Duration, Instant};
use tracing::debug;

/// Absolute minimum benefit (workload rows saved) an aggregate must offer
/// to be materialized, independent of its benefit/cost ratio. Guards
/// against picks that save a negligible absolute number of rows — e.g. a
/// 999,999-row aggregate for a 1,000,000-row fact table.
const MIN_BENEFIT: f64 = 1.0;

/// Greedy aggregate selection.
///
/// At each step, materializes the not-yet-chosen candidate with the best
/// benefit/cost ratio over the current coverage, until the budget, ratio
/// floor, benefit floor, candidate supply, time limit, or a cancellation
/// request stops it. The selection is greedy, not globally optimal.
#[derive(Debug, Default)]
pub struct GreedyAlgorithm {
    cancel: CancelToken,
    canceled: bool,
    deadline: Option<Instant>,
}

impl GreedyAlgorithm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets run-local state and computes the deadline, once, from the
    /// configured time limit.
    fn on_start(&mut self, parameters: &ParameterSet) {
        self.canceled = false;
        self.deadline = parameters
            .time_limit_seconds
            .map(|seconds| Instant::now() + Duration::from_secs(seconds));
    }

    /// Cooperative cancel/timeout poll; called once per loop iteration.
    ///
    /// Latching: the first observation reports a terminal progress message
    /// and marks the run canceled; later calls keep returning `true`
    /// without reporting again.
    fn check_cancel_timeout(&mut self, progress: &mut dyn Progress) -> bool {
        if self.canceled {
            return true;
        }
        if self.cancel.is_cancel_requested() {
            self.canceled = true;
            self.cancel.clear();
            progress.report("Algorithm was canceled", 1.0);
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() > deadline {
                self.canceled = true;
                progress.report("Algorithm exceeded time limit", 1.0);
                return true;
            }
        }
        false
    }
}

impl Algorithm for GreedyAlgorithm {
    fn run(
        &mut self,
        schema: &Schema,
        workload: &Workload,
        parameters: &ParameterSet,
        progress: &mut dyn Progress,
    ) -> AlgorithmResult<DesignResult> {
        parameters.validate()?;
        self.on_start(parameters);

        // Simulate an aggregate limit by charging an extra 1/(limit+1) of
        // the budget per pick. Approximate: the surcharge can admit one
        // more aggregate than the nominal limit.
        let cost_per_aggregate = match parameters.aggregate_limit {
            Some(limit) => parameters.cost_limit / (limit as f64 + 1.0),
            None => 0.0,
        };

        let mut lattice = Lattice::new(schema, workload);
        let mut agg_cost = Cost::default();
        let mut total_cost = Cost::default();
        let mut remaining_cost = parameters.cost_limit;
        loop {
            // Have we timed out or been canceled?
            if self.check_cancel_timeout(progress) {
                break;
            }
            // Choose an aggregate to materialize; none left means done.
            agg_cost.clear();
            let Some(aggregate) = lattice.choose_aggregate(
                remaining_cost,
                parameters.min_cost_benefit_ratio,
                &mut agg_cost,
            )?
            else {
                break;
            };
            // Below the absolute benefit floor, stop regardless of ratio.
            if agg_cost.benefit < MIN_BENEFIT {
                break;
            }
            let cost = agg_cost.cost + cost_per_aggregate;
            total_cost.cost += cost;
            total_cost.benefit += agg_cost.benefit;
            total_cost.benefit_count += agg_cost.benefit_count;
            remaining_cost -= cost;
            if remaining_cost <= 0.0 {
                break;
            }
            debug!(
                aggregate = %aggregate.description(schema),
                rows = aggregate.row_count(),
                cost = agg_cost.cost,
                benefit = agg_cost.benefit,
                count = agg_cost.benefit_count,
                "materialize"
            );

            // Materialize it; future scoring sees the new coverage.
            lattice.materialize(aggregate);
        }

        let aggregates = lattice.materialized().to_vec();
        let cost_benefits = compute_aggregate_costs(schema, workload, &aggregates)?;

        if !self.canceled {
            progress.report("Algorithm completed", 1.0);
        }

        Ok(DesignResult::new(
            aggregates,
            cost_benefits,
            parameters.cost_limit,
            total_cost.cost,
            total_cost.benefit,
        ))
    }

    fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

/// Per-aggregate cost/benefit breakdown against a final aggregate set.
///
/// This is a confirmatory recomputation, not a reuse of the loop's running
/// totals: the ratios observed during the loop were measured against
/// intermediate coverage and are not individually meaningful once the set
/// is complete. Each workload pattern is attributed to the cheapest cover
/// in the final set (ties to the earliest aggregate in materialization
/// order); patterns whose cheapest cover is the fact table contribute
/// nothing.
pub fn compute_aggregate_costs(
    schema: &Schema,
    workload: &Workload,
    aggregates: &[Aggregate],
) -> Result<Vec<CostBenefit>, StatisticsError> {
    let mut saved_rows = vec![0.0; aggregates.len()];
    let mut served_weight = vec![0.0; aggregates.len()];

    for pattern in workload.patterns() {
        let mut best: Option<usize> = None;
        let mut best_rows = schema.fact_row_count();
        for (position, aggregate) in aggregates.iter().enumerate() {
            if aggregate.attributes().is_superset_of(&pattern.attributes)
                && aggregate.row_count() < best_rows
            {
                best = Some(position);
                best_rows = aggregate.row_count();
            }
        }
        if let Some(position) = best {
            saved_rows[position] += (schema.fact_row_count() - best_rows) * pattern.frequency;
            served_weight[position] += pattern.frequency;
        }
    }

    let total_weight = workload.total_frequency();
    aggregates
        .iter()
        .enumerate()
        .map(|(position, aggregate)| {
            Ok(CostBenefit {
                row_count: aggregate.row_count(),
                space: aggregate.space(),
                load_time: schema.statistics().load_time(aggregate.attributes())?,
                saved_query_rows: saved_rows[position],
                query_load: if total_weight > 0.0 {
                    served_weight[position] / total_weight
                } else {
                    0.0
                },
            })
        })
        .collect()
}
