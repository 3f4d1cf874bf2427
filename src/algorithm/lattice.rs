// src/algorithm/lattice.rs
//! The candidate lattice and its scoring query.

use crate::algorithm::candidate::Aggregate;
use crate::algorithm::cost::Cost;
use crate::model::{AttributeSet, Schema, StatisticsError, Workload};
use std::collections::{HashMap, HashSet};

/// The power-set lattice of candidate roll-ups plus the set of candidates
/// materialized so far.
///
/// Candidates are never allocated up front: [`choose_aggregate`] iterates
/// bitset values `0 .. 2^N - 1` lazily, which preserves the selection order
/// a full in-memory lattice would give. The full universe is excluded —
/// that roll-up IS the fact table, which is always available as the
/// baseline cover. The empty set (the grand-total roll-up) is a valid
/// candidate.
///
/// Row-count and load-time estimates are coverage-independent and memoized
/// per bitset. Benefit depends on the materialized set and is recomputed
/// from scratch on every scoring call; caching it across materializations
/// would be wrong.
///
/// [`choose_aggregate`]: Lattice::choose_aggregate
pub struct Lattice<'a> {
    schema: &'a Schema,
    workload: &'a Workload,
    materialized: Vec<Aggregate>,
    materialized_bits: HashSet<u64>,
    row_counts: HashMap<u64, f64>,
    load_times: HashMap<u64, f64>,
}

impl<'a> Lattice<'a> {
    pub fn new(schema: &'a Schema, workload: &'a Workload) -> Self {
        Self {
            schema,
            workload,
            materialized: Vec::new(),
            materialized_bits: HashSet::new(),
            row_counts: HashMap::new(),
            load_times: HashMap::new(),
        }
    }

    /// Aggregates materialized so far, in materialization order.
    pub fn materialized(&self) -> &[Aggregate] {
        &self.materialized
    }

    /// Find the best not-yet-materialized candidate under the current
    /// coverage.
    ///
    /// A candidate is accepted only if its cost fits `remaining_budget` and
    /// its benefit/cost ratio reaches `min_ratio` (a zero-cost candidate
    /// with positive benefit passes any ratio). Among accepted candidates
    /// the highest ratio wins; ties break to lower cost, then to lower
    /// bitset value. On success the winner's raw cost, benefit, and
    /// benefiting-pattern count are written into `cost`.
    ///
    /// Scoring is relative to the current materialized set, so the result
    /// of one call is invalidated by the next [`materialize`]. Returns
    /// `Ok(None)` when no feasible candidate remains.
    ///
    /// [`materialize`]: Lattice::materialize
    pub fn choose_aggregate(
        &mut self,
        remaining_budget: f64,
        min_ratio: f64,
        cost: &mut Cost,
    ) -> Result<Option<Aggregate>, StatisticsError> {
        let width = self.schema.attribute_count();
        let universe = AttributeSet::universe(width).bits();
        let patterns = self.workload.patterns();

        // Cheapest currently-available cover per pattern. Depends only on
        // the materialized set, so compute it once per scoring pass.
        let mut cover_rows = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            cover_rows.push(self.cheapest_cover_rows(&pattern.attributes));
        }

        let mut best: Option<(u64, f64, f64, f64, usize)> = None;
        for bits in 0..universe {
            if self.materialized_bits.contains(&bits) {
                continue;
            }
            let set = AttributeSet::from_bits(width, bits);
            let raw_cost = self.load_time(&set)?;
            if raw_cost > remaining_budget {
                continue;
            }

            let candidate_rows = self.row_count(&set)?;
            let mut benefit = 0.0;
            let mut benefit_count = 0;
            for (pattern, &before) in patterns.iter().zip(&cover_rows) {
                if !set.is_superset_of(&pattern.attributes) {
                    continue;
                }
                if candidate_rows < before {
                    benefit += (before - candidate_rows) * pattern.frequency;
                    benefit_count += 1;
                }
            }

            let ratio = if benefit <= 0.0 {
                0.0
            } else if raw_cost <= 0.0 {
                f64::INFINITY
            } else {
                benefit / raw_cost
            };
            if ratio < min_ratio {
                continue;
            }

            // Ascending bitset iteration makes "strictly better" the full
            // deterministic tie-break: equal ratio and cost keeps the
            // earlier (lower) bitset.
            let better = match best {
                None => true,
                Some((_, best_ratio, best_cost, _, _)) => {
                    ratio > best_ratio || (ratio == best_ratio && raw_cost < best_cost)
                }
            };
            if better {
                best = Some((bits, ratio, raw_cost, benefit, benefit_count));
            }
        }

        match best {
            None => Ok(None),
            Some((bits, _, raw_cost, benefit, benefit_count)) => {
                cost.cost = raw_cost;
                cost.benefit = benefit;
                cost.benefit_count = benefit_count;
                let set = AttributeSet::from_bits(width, bits);
                Ok(Some(Aggregate::new(self.schema, set)?))
            }
        }
    }

    /// Commit a chosen candidate. Future scoring calls see it as available
    /// coverage. The materialized set only grows; materializing the same
    /// bitset twice is a programming error.
    pub fn materialize(&mut self, aggregate: Aggregate) {
        assert!(
            self.materialized_bits.insert(aggregate.attributes().bits()),
            "aggregate {:?} is already materialized",
            aggregate.attributes()
        );
        self.materialized.push(aggregate);
    }

    /// Rows of the cheapest cover currently available for a query pattern:
    /// the fact table, or the smallest materialized superset aggregate.
    fn cheapest_cover_rows(&self, pattern: &AttributeSet) -> f64 {
        let mut rows = self.schema.fact_row_count();
        for aggregate in &self.materialized {
            if aggregate.attributes().is_superset_of(pattern) && aggregate.row_count() < rows {
                rows = aggregate.row_count();
            }
        }
        rows
    }

    fn row_count(&mut self, set: &AttributeSet) -> Result<f64, StatisticsError> {
        if let Some(&rows) = self.row_counts.get(&set.bits()) {
            return Ok(rows);
        }
        let rows = self.schema.statistics().row_count(set)?;
        self.row_counts.insert(set.bits(), rows);
        Ok(rows)
    }

    fn load_time(&mut self, set: &AttributeSet) -> Result<f64, StatisticsError> {
        if let Some(&load) = self.load_times.get(&set.bits()) {
            return Ok(load);
        }
        let load = self.schema.statistics().load_time(set)?;
        self.load_times.insert(set.bits(), load);
        Ok(load)
    }
}
