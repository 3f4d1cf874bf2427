//! The aggregate-selection engine.
//!
//! Three-piece architecture:
//! 1. Candidate model: attribute subsets as bitsets, with row/space/load
//!    estimates ([`candidate`]).
//! 2. Lattice: the `2^N` candidate space plus the materialized set, and the
//!    scoring query that finds the best next pick ([`lattice`]).
//! 3. Greedy driver: iterative materialization under budget, ratio, and
//!    time limits ([`greedy`]).

pub mod candidate;
pub mod cost;
pub mod greedy;
pub mod lattice;
pub mod result;

pub use candidate::Aggregate;
pub use cost::{Cost, CostBenefit};
pub use greedy::{compute_aggregate_costs, GreedyAlgorithm};
pub use lattice::Lattice;
pub use result::DesignResult;

use crate::config::{ParameterError, ParameterInfo, ParameterSet};
use crate::model::{Schema, StatisticsError, Workload};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during a design run.
#[derive(Debug, Error)]
pub enum AlgorithmError {
    #[error("invalid run parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    #[error("attribute index {index} out of range for schema with {len} attributes")]
    AttributeOutOfRange { index: usize, len: usize },
}

pub type AlgorithmResult<T> = Result<T, AlgorithmError>;

/// Progress callback for a design run.
///
/// The driver reports at least once on termination with `complete = 1.0`;
/// whether the run finished, was canceled, or timed out is carried in the
/// message text.
pub trait Progress {
    fn report(&mut self, message: &str, complete: f64);
}

/// A progress sink that discards reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopProgress;

impl Progress for NopProgress {
    fn report(&mut self, _message: &str, _complete: f64) {}
}

/// Handle for requesting cancellation of a running design from another
/// thread. Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The running loop observes the request at
    /// iteration granularity, never pre-emptively.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// An aggregate-selection strategy.
///
/// The trait boundary keeps alternative strategies (randomized, ILP-based,
/// ...) swappable without touching callers.
pub trait Algorithm {
    /// Run the selection. Cancellation and timeout are normal termination
    /// paths yielding the best partial result found so far, never errors.
    fn run(
        &mut self,
        schema: &Schema,
        workload: &Workload,
        parameters: &ParameterSet,
        progress: &mut dyn Progress,
    ) -> AlgorithmResult<DesignResult>;

    /// Handle for canceling a run from another thread.
    fn cancel_token(&self) -> CancelToken;

    /// Metadata for the run parameters this algorithm recognizes.
    fn parameters(&self) -> &'static [ParameterInfo] {
        ParameterSet::parameters()
    }

    /// Construct a single aggregate from an explicit attribute-index list,
    /// outside the search. Used for what-if evaluation of a user-suggested
    /// roll-up.
    fn create_aggregate(
        &self,
        schema: &Schema,
        attribute_indices: &[usize],
    ) -> AlgorithmResult<Aggregate> {
        Aggregate::from_indices(schema, attribute_indices)
    }
}
