//! Evaluation of batches of WEAT cases.
//!
//! Every case is evaluated independently. A case that fails, e.g.
//! because one of its sets is empty, results in a failed outcome for
//! that case only.
//!
//! With a seed, the sampler of the case at position *i* is seeded with
//! *seed + i*. Sampled p-values therefore do not depend on whether the
//! batch is evaluated sequentially or in parallel.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::case::WeatCase;
use crate::config::WeatConfig;
use crate::embeddings::EmbeddingLookup;
use crate::error::Result;
use crate::eval::{Weat, WeatResult};

/// Outcome of a single case in a batch.
#[derive(Debug)]
pub struct CaseOutcome {
    pub label: String,
    pub result: Result<WeatResult>,
}

impl CaseOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl<'a, L> Weat<'a, L>
where
    L: EmbeddingLookup,
{
    /// Evaluate cases in order.
    pub fn run_batch(&self, cases: &[WeatCase]) -> Vec<CaseOutcome> {
        let outcomes: Vec<_> = cases
            .iter()
            .enumerate()
            .map(|(idx, case)| self.outcome(idx, case))
            .collect();
        log_summary(&outcomes);
        outcomes
    }

    fn outcome(&self, idx: usize, case: &WeatCase) -> CaseOutcome {
        let label = case.label();
        let result = self.evaluate_nth(idx, case);
        if let Err(ref err) = result {
            warn!("Case '{}' failed: {}", label, err);
        }

        CaseOutcome { label, result }
    }
}

impl<'a, L> Weat<'a, L>
where
    L: EmbeddingLookup + Sync,
{
    /// Evaluate cases in parallel.
    ///
    /// Outcomes are returned in the order of the cases.
    pub fn par_run_batch(&self, cases: &[WeatCase]) -> Vec<CaseOutcome> {
        let outcomes: Vec<_> = cases
            .par_iter()
            .enumerate()
            .map(|(idx, case)| self.outcome(idx, case))
            .collect();
        log_summary(&outcomes);
        outcomes
    }
}

/// Evaluate cases in order.
pub fn run_batch<L>(lookup: &L, cases: &[WeatCase], config: &WeatConfig) -> Vec<CaseOutcome>
where
    L: EmbeddingLookup,
{
    Weat::new(lookup, config).run_batch(cases)
}

/// Evaluate cases in parallel.
pub fn par_run_batch<L>(lookup: &L, cases: &[WeatCase], config: &WeatConfig) -> Vec<CaseOutcome>
where
    L: EmbeddingLookup + Sync,
{
    Weat::new(lookup, config).par_run_batch(cases)
}

fn log_summary(outcomes: &[CaseOutcome]) {
    let n_ok = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    info!(
        "Evaluated {} case(s): {} succeeded, {} failed",
        outcomes.len(),
        n_ok,
        outcomes.len() - n_ok
    );
}
