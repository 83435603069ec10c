//! Evaluation of single WEAT cases.

use ndarray::{ArrayView1, CowArray, Ix1};
use tracing::debug;

use crate::association::associations;
use crate::case::{OriginalFinding, WeatCase, WordSet};
use crate::config::{MissingWords, WeatConfig};
use crate::embeddings::EmbeddingLookup;
use crate::error::{Error, Result};
use crate::permutation::{Interrupt, PValue, PermutationTest};
use crate::statistic::{effect_size, EffectSize};

/// A word that was left out because it is not in the vocabulary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Exclusion {
    pub set: String,
    pub word: String,
}

/// Result of a WEAT case.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatResult {
    pub label: String,
    pub effect_size: EffectSize,
    pub p_value: Option<PValue>,
    pub n_first_target: usize,
    pub n_second_target: usize,
    pub n_first_attribute: usize,
    pub n_second_attribute: usize,

    /// Out-of-vocabulary words that were excluded from the sets.
    pub excluded: Vec<Exclusion>,

    /// Published finding for comparison, not recomputed.
    pub original_finding: Option<OriginalFinding>,
}

impl WeatResult {
    /// Raw test statistic.
    pub fn s(&self) -> f64 {
        self.effect_size.s
    }

    /// Effect size.
    pub fn d(&self) -> f64 {
        self.effect_size.d
    }
}

/// WEAT evaluator.
///
/// The evaluator borrows the embeddings that cases are evaluated
/// against and never modifies them, so a single evaluator can be shared
/// between threads.
pub struct Weat<'a, L> {
    lookup: &'a L,
    config: &'a WeatConfig,
    interrupt: Option<Interrupt>,
}

impl<'a, L> Weat<'a, L>
where
    L: EmbeddingLookup,
{
    pub fn new(lookup: &'a L, config: &'a WeatConfig) -> Self {
        Weat {
            lookup,
            config,
            interrupt: None,
        }
    }

    /// Stop running permutation tests when the interrupt is cancelled.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn config(&self) -> &WeatConfig {
        self.config
    }

    /// Evaluate a single case.
    pub fn evaluate(&self, case: &WeatCase) -> Result<WeatResult> {
        self.evaluate_seeded(case, self.config.seed)
    }

    /// Evaluate the case at position `idx` of a batch.
    ///
    /// With a seed, the sampler of the case is seeded with the seed
    /// offset by `idx`, so that cases draw from different streams.
    pub(crate) fn evaluate_nth(&self, idx: usize, case: &WeatCase) -> Result<WeatResult> {
        let seed = self.config.seed.map(|seed| seed.wrapping_add(idx as u64));
        self.evaluate_seeded(case, seed)
    }

    fn evaluate_seeded(&self, case: &WeatCase, seed: Option<u64>) -> Result<WeatResult> {
        case.validate()?;

        let mut excluded = Vec::new();
        let first_target = self.resolve(&case.first_target, &mut excluded)?;
        let second_target = self.resolve(&case.second_target, &mut excluded)?;
        let first_attribute = self.resolve(&case.first_attribute, &mut excluded)?;
        let second_attribute = self.resolve(&case.second_attribute, &mut excluded)?;

        let first_attribute = views(&first_attribute);
        let second_attribute = views(&second_attribute);
        let first_associations =
            associations(&views(&first_target), &first_attribute, &second_attribute)?;
        let second_associations =
            associations(&views(&second_target), &first_attribute, &second_attribute)?;

        let effect_size = effect_size(&first_associations, &second_associations)?;

        let p_value = if self.config.with_pvalue {
            Some(
                self.permutation_test(seed)
                    .p_value(&first_associations, &second_associations)?,
            )
        } else {
            None
        };

        let original_finding = if self.config.with_original_finding {
            case.original_finding
        } else {
            None
        };

        Ok(WeatResult {
            label: case.label(),
            effect_size,
            p_value,
            n_first_target: first_target.len(),
            n_second_target: second_target.len(),
            n_first_attribute: first_attribute.len(),
            n_second_attribute: second_attribute.len(),
            excluded,
            original_finding,
        })
    }

    fn permutation_test(&self, seed: Option<u64>) -> PermutationTest {
        let test = PermutationTest::from_config(self.config).seed(seed);
        match &self.interrupt {
            Some(interrupt) => test.interrupt(interrupt.clone()),
            None => test,
        }
    }

    fn resolve(
        &self,
        set: &WordSet,
        excluded: &mut Vec<Exclusion>,
    ) -> Result<Vec<CowArray<'a, f32, Ix1>>> {
        let mut vectors = Vec::with_capacity(set.len());

        for word in &set.words {
            match self.lookup.lookup(word) {
                Some(vector) => vectors.push(vector),
                None => match self.config.missing_words {
                    MissingWords::Fail => {
                        return Err(Error::WordNotFound {
                            word: word.clone(),
                            set: set.name.clone(),
                        })
                    }
                    MissingWords::Exclude => {
                        debug!("Excluding '{}' from '{}': not in vocabulary", word, set.name);
                        excluded.push(Exclusion {
                            set: set.name.clone(),
                            word: word.clone(),
                        })
                    }
                },
            }
        }

        if vectors.is_empty() {
            return Err(Error::InvalidInput(format!(
                "None of the words of '{}' are in the vocabulary",
                set.name
            )));
        }

        Ok(vectors)
    }
}

fn views<'b>(vectors: &'b [CowArray<f32, Ix1>]) -> Vec<ArrayView1<'b, f32>> {
    vectors.iter().map(|v| v.view()).collect()
}
