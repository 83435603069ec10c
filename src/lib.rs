//! Word Embedding Association Test (WEAT).
//!
//! This crate measures the differential association of two sets of
//! target words with two sets of attribute words in word embeddings. For
//! every case it computes the test statistic, the standardized effect
//! size and a permutation test p-value. Results of replicate models can
//! be summarized, and embeddings can be inspected with nearest-neighbor
//! queries and vocabulary comparisons.
//!
//! Embeddings are read in GloVe text, word2vec text, or word2vec binary
//! format, but any type that implements
//! [`EmbeddingLookup`](embeddings/trait.EmbeddingLookup.html) can be
//! evaluated.
//!
//! ```
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! use weat::prelude::*;
//!
//! let mut reader = BufReader::new(File::open("testdata/toy.txt").unwrap());
//! let embeddings = Embeddings::read_text(&mut reader).unwrap();
//!
//! let cases = read_cases(File::open("testdata/cases.json").unwrap()).unwrap();
//! let config = WeatConfig::default();
//!
//! for outcome in Weat::new(&embeddings, &config).run_batch(&cases) {
//!     match outcome.result {
//!         Ok(result) => println!("{}: d = {:.2}", outcome.label, result.d()),
//!         Err(err) => println!("{}: {}", outcome.label, err),
//!     }
//! }
//! ```

pub mod association;

pub mod batch;

pub mod case;

pub mod compat;

pub mod config;

pub mod embeddings;

pub mod error;

pub mod permutation;

pub mod prelude;

pub mod report;

pub mod similarity;

pub mod statistic;

pub mod storage;

pub mod summary;

pub(crate) mod util;

pub mod vocab;

pub mod eval;

#[cfg(test)]
mod tests;
