//! Vector similarity and similarity queries.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ndarray::ArrayView1;
use ordered_float::NotNan;

use crate::embeddings::Embeddings;
use crate::error::{Error, Result};
use crate::storage::StorageView;
use crate::vocab::Vocab;

/// Compute the dot product of two vectors in double precision.
pub fn dot(u: ArrayView1<f32>, v: ArrayView1<f32>) -> f64 {
    u.iter()
        .zip(v.iter())
        .map(|(&a, &b)| f64::from(a) * f64::from(b))
        .sum()
}

/// Compute the l2 norm of a vector in double precision.
pub fn l2_norm(v: ArrayView1<f32>) -> f64 {
    dot(v, v).sqrt()
}

/// Compute the cosine similarity of two vectors.
///
/// *cos(u, v) = (u · v) / (|u| |v|)*
///
/// The vectors must have the same length. The similarity is undefined
/// when either vector has a norm of zero, in which case
/// `Error::DivideByZero` is returned.
pub fn cosine_similarity(u: ArrayView1<f32>, v: ArrayView1<f32>) -> Result<f64> {
    if u.len() != v.len() {
        return Err(Error::InvalidInput(format!(
            "Cannot compare vectors of lengths {} and {}",
            u.len(),
            v.len()
        )));
    }

    let norms = l2_norm(u) * l2_norm(v);
    if norms == 0. {
        return Err(Error::DivideByZero(
            "cosine similarity of a zero-norm vector".to_owned(),
        ));
    }

    Ok(dot(u, v) / norms)
}

/// A word with its similarity.
///
/// This data structure is used to store a pair consisting of a word and
/// its cosine similarity to a query word.
#[derive(Debug, Eq, PartialEq)]
pub struct WordSimilarityResult<'a> {
    similarity: NotNan<f64>,
    word: &'a str,
}

impl<'a> WordSimilarityResult<'a> {
    /// Get the cosine similarity of the word to the query word.
    pub fn cosine_similarity(&self) -> f64 {
        *self.similarity
    }

    pub fn word(&self) -> &str {
        self.word
    }
}

impl<'a> Ord for WordSimilarityResult<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.similarity.cmp(&self.similarity) {
            Ordering::Equal => self.word.cmp(other.word),
            ordering => ordering,
        }
    }
}

impl<'a> PartialOrd for WordSimilarityResult<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Trait for word similarity queries.
pub trait WordSimilarity {
    /// Find the words that are most similar to the query word.
    ///
    /// Words are ranked by their cosine similarity to the query word,
    /// ties are ordered by word. The query word itself and words with a
    /// zero vector are not returned. At most `limit` results are
    /// returned, `None` if the query word is not in the vocabulary.
    fn word_similarity(&self, word: &str, limit: usize) -> Option<Vec<WordSimilarityResult>>;
}

impl<V, S> WordSimilarity for Embeddings<V, S>
where
    V: Vocab,
    S: StorageView,
{
    fn word_similarity(&self, word: &str, limit: usize) -> Option<Vec<WordSimilarityResult>> {
        let query = self.embedding(word)?;
        let query_norm = l2_norm(query.view());
        if limit == 0 || query_norm == 0. {
            return Some(Vec::new());
        }

        let mut results = BinaryHeap::with_capacity(limit);
        let storage = self.storage().view();
        for (candidate, embedding) in self.vocab().words().iter().zip(storage.outer_iter()) {
            if candidate == word {
                continue;
            }

            let norm = l2_norm(embedding);
            if norm == 0. {
                continue;
            }

            let similarity = dot(embedding, query.view()) / (norm * query_norm);
            let similarity = match NotNan::new(similarity) {
                Ok(similarity) => similarity,
                Err(_) => continue,
            };

            let word_similarity = WordSimilarityResult {
                similarity,
                word: candidate,
            };

            if results.len() < limit {
                results.push(word_similarity);
            } else if let Some(mut peek) = results.peek_mut() {
                if word_similarity < *peek {
                    *peek = word_similarity;
                }
            }
        }

        Some(results.into_sorted_vec())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2};

    use super::{cosine_similarity, WordSimilarity};
    use crate::embeddings::Embeddings;
    use crate::error::Error;
    use crate::storage::NdArray;
    use crate::tests::TOY_EMBEDDINGS;
    use crate::vocab::SimpleVocab;

    #[test]
    fn cosine_similarity_is_symmetric() {
        let u = arr1(&[0.3f32, -1.2, 4.0]);
        let v = arr1(&[2.0f32, 0.5, -0.7]);
        assert_abs_diff_eq!(
            cosine_similarity(u.view(), v.view()).unwrap(),
            cosine_similarity(v.view(), u.view()).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn self_similarity_is_one() {
        let u = arr1(&[0.3f32, -1.2, 4.0]);
        assert_abs_diff_eq!(
            cosine_similarity(u.view(), u.view()).unwrap(),
            1.,
            epsilon = 1e-9
        );
    }

    #[test]
    fn similarity_is_scale_invariant() {
        let u = arr1(&[1f32, 1.]);
        let v = arr1(&[0f32, 3.]);
        assert_abs_diff_eq!(
            cosine_similarity(u.view(), v.view()).unwrap(),
            1. / 2f64.sqrt(),
            epsilon = 1e-9
        );
        let w = arr1(&[-2f32, 0.]);
        assert_abs_diff_eq!(
            cosine_similarity(w.view(), arr1(&[1f32, 0.]).view()).unwrap(),
            -1.,
            epsilon = 1e-9
        );
    }

    #[test]
    fn zero_vector_is_divide_by_zero() {
        let u = arr1(&[0f32, 0.]);
        let v = arr1(&[1f32, 0.]);
        assert!(matches!(
            cosine_similarity(u.view(), v.view()),
            Err(Error::DivideByZero(_))
        ));
    }

    #[test]
    fn length_mismatch_is_invalid_input() {
        let u = arr1(&[1f32, 0., 0.]);
        let v = arr1(&[1f32, 0.]);
        assert!(matches!(
            cosine_similarity(u.view(), v.view()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn most_similar_words() {
        let results = TOY_EMBEDDINGS.word_similarity("flower", 3).unwrap();
        let words: Vec<_> = results.iter().map(|r| r.word()).collect();
        assert_eq!(words, &["love", "pleasant", "rose"]);

        assert_abs_diff_eq!(results[0].cosine_similarity(), 1., epsilon = 1e-9);
        assert_abs_diff_eq!(
            results[2].cosine_similarity(),
            1. / 2f64.sqrt(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn similarity_query_limits() {
        assert_eq!(TOY_EMBEDDINGS.word_similarity("ant", 100).unwrap().len(), 7);
        assert!(TOY_EMBEDDINGS.word_similarity("ant", 0).unwrap().is_empty());
        assert!(TOY_EMBEDDINGS.word_similarity("wasp", 5).is_none());
    }

    #[test]
    fn similarity_query_skips_zero_vectors() {
        let embeddings = Embeddings::new(
            SimpleVocab::new(vec!["rose".to_owned(), "void".to_owned(), "ant".to_owned()]),
            NdArray::new(arr2(&[[1f32, 0.], [0., 0.], [1., 1.]])),
        );

        let results = embeddings.word_similarity("rose", 5).unwrap();
        let words: Vec<_> = results.iter().map(|r| r.word()).collect();
        assert_eq!(words, &["ant"]);
        assert!(embeddings.word_similarity("void", 5).unwrap().is_empty());
    }
}
