//! Prelude exports the most commonly-used types and traits.

pub use crate::batch::{par_run_batch, run_batch, CaseOutcome};

pub use crate::case::{read_cases, OriginalFinding, WeatCase, WordSet};

pub use crate::compat::text::{ReadText, ReadTextDims};

pub use crate::compat::word2vec::ReadWord2Vec;

pub use crate::config::{MissingWords, WeatConfig};

pub use crate::embeddings::{EmbeddingLookup, Embeddings};

pub use crate::permutation::{Interrupt, PValue, PermutationMode, PermutationTest};

pub use crate::report::{read_results, ResultRow, WriteCsv};

pub use crate::similarity::{WordSimilarity, WordSimilarityResult};

pub use crate::storage::{NdArray, Storage, StorageView};

pub use crate::summary::{summarize, write_summaries, ScoreSummary};

pub use crate::vocab::{vocab_difference, SimpleVocab, Vocab, VocabDifference};

pub use crate::eval::{Weat, WeatResult};
