//! Permutation test for the WEAT statistic.
//!
//! The p-value is the fraction of equal-sized partitions of the pooled
//! target words whose test statistic is at least as large as the
//! observed statistic. Partitions are enumerated exhaustively when
//! their number does not exceed a limit, otherwise they are sampled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use tracing::debug;

use crate::config::WeatConfig;
use crate::error::{Error, Result};

/// Way in which partitions were obtained.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PermutationMode {
    /// All partitions were enumerated.
    Exhaustive,

    /// Partitions were sampled randomly.
    Sampled,
}

impl PermutationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PermutationMode::Exhaustive => "exhaustive",
            PermutationMode::Sampled => "sampled",
        }
    }
}

/// Reason why a permutation test stopped early.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Interruption {
    Cancelled,
    Timeout,
}

impl Interruption {
    fn into_error(self) -> Error {
        match self {
            Interruption::Cancelled => Error::Cancelled,
            Interruption::Timeout => Error::Timeout,
        }
    }
}

/// One-sided p-value of a permutation test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PValue {
    pub value: f64,
    pub mode: PermutationMode,

    /// Number of partitions that the p-value is based on, including the
    /// observed partition.
    pub n_partitions: u64,

    /// Set when the test stopped before evaluating all partitions. The
    /// p-value is then an estimate from the partitions evaluated so far.
    pub interrupted: Option<Interruption>,
}

impl PValue {
    /// Check whether all planned partitions were evaluated.
    pub fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }
}

/// Shared cancellation flag.
///
/// Clones share the same flag, so a test running on one thread can be
/// cancelled from another.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    cancelled: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Interrupt::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Permutation test.
#[derive(Clone, Debug)]
pub struct PermutationTest {
    max_exhaustive_partitions: u64,
    n_samples: usize,
    seed: Option<u64>,
    timeout: Option<Duration>,
    interrupt: Option<Interrupt>,
}

impl Default for PermutationTest {
    fn default() -> Self {
        PermutationTest::from_config(&WeatConfig::default())
    }
}

impl PermutationTest {
    pub fn from_config(config: &WeatConfig) -> Self {
        PermutationTest {
            max_exhaustive_partitions: config.max_exhaustive_partitions,
            n_samples: config.n_samples,
            seed: config.seed,
            timeout: config.timeout(),
            interrupt: None,
        }
    }

    /// Largest number of partitions that is enumerated exhaustively.
    pub fn max_exhaustive_partitions(mut self, max_exhaustive_partitions: u64) -> Self {
        self.max_exhaustive_partitions = max_exhaustive_partitions;
        self
    }

    /// Number of partitions to draw when sampling.
    pub fn n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Seed of the sampler.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Stop the test after the given duration.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stop the test when the interrupt is cancelled.
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Get the mode that will be used for target sets of the given sizes.
    pub fn mode(&self, n_first: usize, n_second: usize) -> PermutationMode {
        match n_partitions(n_first + n_second, n_first) {
            Some(n) if n <= self.max_exhaustive_partitions => PermutationMode::Exhaustive,
            _ => PermutationMode::Sampled,
        }
    }

    /// Compute the p-value of the statistic of the given target
    /// associations.
    pub fn p_value(&self, first: &[f64], second: &[f64]) -> Result<PValue> {
        if first.is_empty() || second.is_empty() {
            return Err(Error::InvalidInput("target set is empty".to_owned()));
        }

        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let interrupt = self.interrupt.as_ref();
        let stop = |_: u64| {
            if interrupt.map(Interrupt::is_cancelled).unwrap_or(false) {
                Some(Interruption::Cancelled)
            } else if deadline.map(|d| Instant::now() >= d).unwrap_or(false) {
                Some(Interruption::Timeout)
            } else {
                None
            }
        };

        let mode = self.mode(first.len(), second.len());
        if mode == PermutationMode::Sampled && self.n_samples == 0 {
            return Err(Error::InvalidInput(
                "sampled permutation test requires at least one sample".to_owned(),
            ));
        }

        debug!(
            "Permutation test with {} + {} targets: {}",
            first.len(),
            second.len(),
            mode.as_str()
        );

        let pool = Pool::new(first, second);
        match mode {
            PermutationMode::Exhaustive => pool.exhaustive(stop),
            PermutationMode::Sampled => {
                let mut rng = match self.seed {
                    Some(seed) => XorShiftRng::seed_from_u64(seed),
                    None => XorShiftRng::from_entropy(),
                };
                pool.sampled(&mut rng, self.n_samples, stop)
            }
        }
    }
}

/// Number of ways to choose `k` out of `n`, `None` on overflow.
pub fn n_partitions(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }

    let k = k.min(n - k);
    let mut count = 1u128;
    for i in 0..k {
        count = count * (n - i) as u128 / (i + 1) as u128;
        if count > u64::MAX as u128 {
            return None;
        }
    }

    Some(count as u64)
}

/// Pooled target associations. The first `k` associations belong to the
/// first target set.
struct Pool {
    associations: Vec<f64>,
    k: usize,
    total: f64,
    observed: f64,
    tolerance: f64,
}

impl Pool {
    fn new(first: &[f64], second: &[f64]) -> Self {
        let associations: Vec<f64> = first.iter().chain(second).cloned().collect();
        let total = associations.iter().sum();

        let mut pool = Pool {
            associations,
            k: first.len(),
            total,
            observed: 0.,
            tolerance: 0.,
        };

        // The statistic is computed as 2 * sum(A_i) - sum(A ∪ B) for every
        // partition, including the observed one.
        pool.observed = pool.statistic(0..first.len());
        // Tolerate rounding differences between equal statistics.
        pool.tolerance = pool.observed.abs().max(1.) * 1e-12;

        pool
    }

    fn statistic(&self, first: impl IntoIterator<Item = usize>) -> f64 {
        let sum: f64 = first.into_iter().map(|idx| self.associations[idx]).sum();
        2. * sum - self.total
    }

    fn at_least_observed(&self, statistic: f64) -> bool {
        statistic >= self.observed - self.tolerance
    }

    fn exhaustive<F>(&self, mut stop: F) -> Result<PValue>
    where
        F: FnMut(u64) -> Option<Interruption>,
    {
        let mut n_evaluated = 0u64;
        let mut n_extreme = 0u64;
        let mut interrupted = None;

        // The first combination is the observed partition.
        for combination in (0..self.associations.len()).combinations(self.k) {
            if let Some(interruption) = stop(n_evaluated) {
                interrupted = Some(interruption);
                break;
            }

            if self.at_least_observed(self.statistic(combination)) {
                n_extreme += 1;
            }
            n_evaluated += 1;
        }

        if n_evaluated == 0 {
            return Err(interrupted.map_or(Error::Cancelled, Interruption::into_error));
        }

        Ok(PValue {
            value: n_extreme as f64 / n_evaluated as f64,
            mode: PermutationMode::Exhaustive,
            n_partitions: n_evaluated,
            interrupted,
        })
    }

    fn sampled<F>(&self, rng: &mut XorShiftRng, n_samples: usize, mut stop: F) -> Result<PValue>
    where
        F: FnMut(u64) -> Option<Interruption>,
    {
        let mut indices: Vec<usize> = (0..self.associations.len()).collect();
        let mut n_drawn = 0u64;
        let mut n_extreme = 0u64;
        let mut interrupted = None;

        for _ in 0..n_samples {
            if let Some(interruption) = stop(n_drawn) {
                interrupted = Some(interruption);
                break;
            }

            let (first, _) = indices.partial_shuffle(rng, self.k);
            if self.at_least_observed(self.statistic(first.iter().cloned())) {
                n_extreme += 1;
            }
            n_drawn += 1;
        }

        if let Some(interruption) = interrupted {
            if n_drawn == 0 {
                return Err(interruption.into_error());
            }
        }

        // The observed partition is counted in addition to the draws.
        Ok(PValue {
            value: (n_extreme + 1) as f64 / (n_drawn + 1) as f64,
            mode: PermutationMode::Sampled,
            n_partitions: n_drawn + 1,
            interrupted,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::{n_partitions, Interrupt, Interruption, PermutationMode, PermutationTest, Pool};
    use crate::error::Error;

    static FIRST: &[f64] = &[1., 0.];
    static SECOND: &[f64] = &[-1., -1.];

    #[test]
    fn partition_counts() {
        assert_eq!(n_partitions(4, 2), Some(6));
        assert_eq!(n_partitions(20, 10), Some(184_756));
        assert_eq!(n_partitions(5, 0), Some(1));
        assert_eq!(n_partitions(2, 3), Some(0));
        assert_eq!(n_partitions(200, 100), None);
    }

    #[test]
    fn mode_follows_partition_limit() {
        let test = PermutationTest::default().max_exhaustive_partitions(6);
        assert_eq!(test.mode(2, 2), PermutationMode::Exhaustive);
        assert_eq!(test.mode(3, 2), PermutationMode::Sampled);
        assert_eq!(
            PermutationTest::default().mode(100, 100),
            PermutationMode::Sampled
        );
    }

    #[test]
    fn exhaustive_p_value() {
        let p = PermutationTest::default().p_value(FIRST, SECOND).unwrap();
        assert_eq!(p.mode, PermutationMode::Exhaustive);
        assert_eq!(p.n_partitions, 6);
        assert!(p.is_complete());
        assert_abs_diff_eq!(p.value, 1. / 6., epsilon = 1e-12);
    }

    #[test]
    fn p_value_counts_observed_partition() {
        // The observed partition has the lowest statistic.
        let p = PermutationTest::default()
            .p_value(&[-1., -1.], &[1., 0.])
            .unwrap();
        assert_abs_diff_eq!(p.value, 1., epsilon = 1e-12);

        let first = [0.9, 0.8, 0.7];
        let second = [-0.1, -0.2, -0.3];
        let p = PermutationTest::default()
            .max_exhaustive_partitions(0)
            .n_samples(100)
            .seed(Some(1))
            .p_value(&first, &second)
            .unwrap();
        assert!(p.value >= 1. / p.n_partitions as f64);
    }

    #[test]
    fn sampled_agrees_with_exhaustive() {
        let exhaustive = PermutationTest::default().p_value(FIRST, SECOND).unwrap();
        let sampled = PermutationTest::default()
            .max_exhaustive_partitions(0)
            .n_samples(10_000)
            .seed(Some(42))
            .p_value(FIRST, SECOND)
            .unwrap();

        assert_eq!(sampled.mode, PermutationMode::Sampled);
        assert_eq!(sampled.n_partitions, 10_001);
        assert_abs_diff_eq!(sampled.value, exhaustive.value, epsilon = 0.02);
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let first = [0.31, 0.05, 0.12, -0.02, 0.2];
        let second = [-0.1, 0.07, -0.21, 0.0, -0.05];
        let test = PermutationTest::default()
            .max_exhaustive_partitions(0)
            .n_samples(2_000)
            .seed(Some(7));

        assert_eq!(
            test.p_value(&first, &second).unwrap(),
            test.p_value(&first, &second).unwrap()
        );
    }

    #[test]
    fn cancelled_before_start_is_an_error() {
        let interrupt = Interrupt::new();
        interrupt.cancel();
        let test = PermutationTest::default().interrupt(interrupt.clone());
        assert!(matches!(test.p_value(FIRST, SECOND), Err(Error::Cancelled)));

        let test = test.max_exhaustive_partitions(0).seed(Some(1));
        assert!(matches!(test.p_value(FIRST, SECOND), Err(Error::Cancelled)));
    }

    #[test]
    fn zero_timeout_is_an_error() {
        let test = PermutationTest::default().timeout(Some(Duration::from_secs(0)));
        assert!(matches!(test.p_value(FIRST, SECOND), Err(Error::Timeout)));
    }

    #[test]
    fn interrupted_exhaustive_test_is_partial() {
        let pool = Pool::new(FIRST, SECOND);
        let p = pool
            .exhaustive(|n| if n == 3 { Some(Interruption::Cancelled) } else { None })
            .unwrap();

        assert_eq!(p.n_partitions, 3);
        assert_eq!(p.interrupted, Some(Interruption::Cancelled));
        assert!(!p.is_complete());
        assert_abs_diff_eq!(p.value, 1. / 3., epsilon = 1e-12);
    }

    #[test]
    fn interrupted_sampled_test_is_partial() {
        let pool = Pool::new(FIRST, SECOND);
        let mut rng = XorShiftRng::seed_from_u64(3);
        let p = pool
            .sampled(&mut rng, 1000, |n| {
                if n == 10 {
                    Some(Interruption::Timeout)
                } else {
                    None
                }
            })
            .unwrap();

        assert_eq!(p.n_partitions, 11);
        assert_eq!(p.interrupted, Some(Interruption::Timeout));
        assert!(p.value >= 1. / 11.);
    }

    #[test]
    fn sampling_without_samples_is_invalid() {
        let test = PermutationTest::default()
            .max_exhaustive_partitions(0)
            .n_samples(0);
        assert!(matches!(
            test.p_value(FIRST, SECOND),
            Err(Error::InvalidInput(_))
        ));

        // Exhaustive tests do not draw samples.
        let p = PermutationTest::default()
            .n_samples(0)
            .p_value(FIRST, SECOND)
            .unwrap();
        assert_abs_diff_eq!(p.value, 1. / 6., epsilon = 1e-12);
    }

    #[test]
    fn empty_target_set_is_invalid() {
        assert!(matches!(
            PermutationTest::default().p_value(&[], SECOND),
            Err(Error::InvalidInput(_))
        ));
    }
}
