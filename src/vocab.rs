//! Embedding vocabularies.

use fnv::FnvHashMap;

/// Embedding vocabularies.
#[allow(clippy::len_without_is_empty)]
pub trait Vocab {
    /// Get the index of a token.
    fn idx(&self, word: &str) -> Option<usize>;

    /// Get the number of words in the vocabulary.
    fn words_len(&self) -> usize;

    /// Get the words in the vocabulary.
    fn words(&self) -> &[String];
}

/// Vocabulary of whole words.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimpleVocab {
    indices: FnvHashMap<String, usize>,
    words: Vec<String>,
}

impl SimpleVocab {
    /// Construct a new simple vocabulary.
    ///
    /// Words are assigned indices in the given order.
    ///
    /// Panics when there are duplicate words.
    pub fn new(words: impl Into<Vec<String>>) -> Self {
        let words = words.into();

        let mut indices = FnvHashMap::default();
        indices.reserve(words.len());
        for (idx, word) in words.iter().enumerate() {
            indices.insert(word.clone(), idx);
        }

        assert_eq!(
            words.len(),
            indices.len(),
            "words contained duplicate entries."
        );

        SimpleVocab { indices, words }
    }
}

impl Vocab for SimpleVocab {
    fn idx(&self, word: &str) -> Option<usize> {
        self.indices.get(word).cloned()
    }

    fn words_len(&self) -> usize {
        self.words.len()
    }

    fn words(&self) -> &[String] {
        &self.words
    }
}

/// Words that occur in only one of two vocabularies.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VocabDifference {
    /// Words of the first vocabulary that are not in the second.
    pub only_first: Vec<String>,

    /// Words of the second vocabulary that are not in the first.
    pub only_second: Vec<String>,
}

impl VocabDifference {
    /// Get the symmetric difference of the vocabularies.
    pub fn symmetric(&self) -> impl Iterator<Item = &str> {
        self.only_first
            .iter()
            .chain(&self.only_second)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.only_first.len() + self.only_second.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compare two vocabularies.
///
/// Words are returned in vocabulary order.
pub fn vocab_difference<V1, V2>(first: &V1, second: &V2) -> VocabDifference
where
    V1: Vocab + ?Sized,
    V2: Vocab + ?Sized,
{
    VocabDifference {
        only_first: first
            .words()
            .iter()
            .filter(|word| second.idx(word).is_none())
            .cloned()
            .collect(),
        only_second: second
            .words()
            .iter()
            .filter(|word| first.idx(word).is_none())
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{vocab_difference, SimpleVocab, Vocab, VocabDifference};

    fn test_simple_vocab() -> SimpleVocab {
        let words = vec![
            "flower".to_owned(),
            "rose".to_owned(),
            "insect".to_owned(),
            "ant".to_owned(),
        ];

        SimpleVocab::new(words)
    }

    #[test]
    fn indices_follow_word_order() {
        let vocab = test_simple_vocab();
        assert_eq!(vocab.idx("flower"), Some(0));
        assert_eq!(vocab.idx("ant"), Some(3));
        assert_eq!(vocab.idx("bee"), None);
        assert_eq!(vocab.words_len(), 4);
        assert_eq!(vocab.words()[2], "insect");
    }

    #[test]
    #[should_panic]
    fn duplicate_words_panic() {
        SimpleVocab::new(vec!["rose".to_owned(), "rose".to_owned()]);
    }

    #[test]
    fn difference_of_vocabularies() {
        let glove = test_simple_vocab();
        let w2v = SimpleVocab::new(vec!["ant".to_owned(), "bee".to_owned(), "rose".to_owned()]);

        let diff = vocab_difference(&glove, &w2v);
        assert_eq!(
            diff,
            VocabDifference {
                only_first: vec!["flower".to_owned(), "insect".to_owned()],
                only_second: vec!["bee".to_owned()],
            }
        );
        assert_eq!(diff.len(), 3);
        assert_eq!(
            diff.symmetric().collect::<Vec<_>>(),
            &["flower", "insect", "bee"]
        );

        assert!(vocab_difference(&glove, &glove).is_empty());
    }
}
