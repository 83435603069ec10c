use std::fs::File;
use std::io::BufReader;

use lazy_static::lazy_static;

use crate::case::{WeatCase, WordSet};
use crate::compat::text::ReadText;
use crate::embeddings::Embeddings;
use crate::storage::NdArray;
use crate::vocab::SimpleVocab;

lazy_static! {
    /// Two-dimensional toy embeddings. Flowers and pleasant words lie on
    /// the first axis, insects and unpleasant words on the second axis,
    /// rose lies in between.
    pub static ref TOY_EMBEDDINGS: Embeddings<SimpleVocab, NdArray> = {
        let f = File::open("testdata/toy.txt").unwrap();
        Embeddings::read_text(&mut BufReader::new(f)).unwrap()
    };
}

pub fn flowers_insects() -> WeatCase {
    WeatCase::new(
        WordSet::new("Flowers", vec!["flower", "rose"]),
        WordSet::new("Insects", vec!["insect", "ant"]),
        WordSet::new("Pleasant", vec!["pleasant", "love"]),
        WordSet::new("Unpleasant", vec!["unpleasant", "hate"]),
    )
}

/// Effect size of `flowers_insects` on the toy embeddings.
///
/// The associations are 1 (flower), 0 (rose), -1 (insect) and -1 (ant).
/// The mean difference is 1.5, the sample variance of all associations
/// is 11/12.
pub fn toy_d() -> f64 {
    1.5 / (11f64 / 12.).sqrt()
}

#[test]
fn toy_embeddings_cover_case_vocabulary() {
    let case = flowers_insects();
    for set in &[
        &case.first_target,
        &case.second_target,
        &case.first_attribute,
        &case.second_attribute,
    ] {
        for word in &set.words {
            assert!(TOY_EMBEDDINGS.embedding(word).is_some(), "{}", word);
        }
    }
}
