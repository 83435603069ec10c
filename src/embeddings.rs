//! Word embeddings and the lookup capability used by the WEAT engine.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::iter::Enumerate;
use std::slice;

use ndarray::{Array1, CowArray, Ix1};

use crate::storage::Storage;
use crate::vocab::Vocab;

/// Read-only word vector lookup.
///
/// The WEAT engine only reads embeddings through this trait. Anything
/// that can map a word to a fixed-length vector can be evaluated, be it
/// embeddings read from a file or a table built in memory.
pub trait EmbeddingLookup {
    /// Look up the vector of `word`, `None` if the word is unknown.
    fn lookup(&self, word: &str) -> Option<CowArray<f32, Ix1>>;

    /// Get the dimensionality of the vectors.
    fn dims(&self) -> usize;
}

/// Word embeddings.
///
/// This data structure stores word embeddings (also known as *word
/// vectors*) as a vocabulary and a storage for the embedding matrix.
#[derive(Clone, Debug)]
pub struct Embeddings<V, S> {
    storage: S,
    vocab: V,
}

impl<V, S> Embeddings<V, S>
where
    V: Vocab,
    S: Storage,
{
    /// Construct embeddings from a vocabulary and a storage.
    ///
    /// Panics when the vocabulary size does not match the number of
    /// embeddings in the storage.
    pub fn new(vocab: V, storage: S) -> Self {
        assert_eq!(
            vocab.words_len(),
            storage.shape().0,
            "Vocab and storage sizes differ."
        );

        Embeddings { vocab, storage }
    }

    /// Return the length (in vector components) of the word embeddings.
    pub fn dims(&self) -> usize {
        self.storage.shape().1
    }

    /// Get the embedding of a word.
    pub fn embedding(&self, word: &str) -> Option<CowArray<f32, Ix1>> {
        self.vocab.idx(word).map(|idx| self.storage.embedding(idx))
    }

    /// Get an iterator over pairs of words and the corresponding embeddings.
    pub fn iter(&self) -> Iter<S> {
        Iter {
            storage: &self.storage,
            inner: self.vocab.words().iter().enumerate(),
        }
    }

    /// Get the number of words.
    pub fn len(&self) -> usize {
        self.vocab.words_len()
    }

    /// Check whether there are no embeddings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the embedding storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get the vocabulary.
    pub fn vocab(&self) -> &V {
        &self.vocab
    }
}

impl<V, S> EmbeddingLookup for Embeddings<V, S>
where
    V: Vocab,
    S: Storage,
{
    fn lookup(&self, word: &str) -> Option<CowArray<f32, Ix1>> {
        self.embedding(word)
    }

    fn dims(&self) -> usize {
        Embeddings::dims(self)
    }
}

impl<H> EmbeddingLookup for HashMap<String, Array1<f32>, H>
where
    H: BuildHasher,
{
    fn lookup(&self, word: &str) -> Option<CowArray<f32, Ix1>> {
        self.get(word).map(|v| CowArray::from(v.view()))
    }

    fn dims(&self) -> usize {
        self.values().next().map(Array1::len).unwrap_or(0)
    }
}

impl<'a, V, S> IntoIterator for &'a Embeddings<V, S>
where
    V: Vocab,
    S: Storage,
{
    type Item = (&'a str, CowArray<'a, f32, Ix1>);
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over embeddings.
pub struct Iter<'a, S> {
    storage: &'a S,
    inner: Enumerate<slice::Iter<'a, String>>,
}

impl<'a, S> Iterator for Iter<'a, S>
where
    S: Storage,
{
    type Item = (&'a str, CowArray<'a, f32, Ix1>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(idx, word)| (word.as_str(), self.storage.embedding(idx)))
    }
}

#[cfg(test)]
mod tests {
    use maplit::hashmap;
    use ndarray::{arr1, arr2};

    use super::{EmbeddingLookup, Embeddings};
    use crate::storage::NdArray;
    use crate::vocab::SimpleVocab;

    #[test]
    fn lookup_known_and_unknown_words() {
        let embeddings = Embeddings::new(
            SimpleVocab::new(vec!["love".to_owned(), "hate".to_owned()]),
            NdArray::new(arr2(&[[1f32, 0.], [0., 3.]])),
        );

        assert_eq!(embeddings.dims(), 2);
        assert_eq!(
            embeddings.lookup("hate").unwrap().view(),
            arr1(&[0f32, 3.]).view()
        );
        assert!(embeddings.lookup("pleasant").is_none());

        let words: Vec<_> = embeddings.iter().map(|(word, _)| word).collect();
        assert_eq!(words, &["love", "hate"]);
    }

    #[test]
    fn hash_map_lookup() {
        let table = hashmap! {
            "love".to_owned() => arr1(&[1f32, 0., 0.]),
        };

        assert_eq!(table.dims(), 3);
        assert!(table.lookup("love").is_some());
        assert!(table.lookup("hate").is_none());
    }

    #[test]
    #[should_panic]
    fn mismatched_vocab_and_storage_panic() {
        Embeddings::new(
            SimpleVocab::new(vec!["love".to_owned()]),
            NdArray::new(arr2(&[[1f32, 0.], [0., 3.]])),
        );
    }
}
