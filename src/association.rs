//! Association of words with attribute sets.

use ndarray::ArrayView1;

use crate::error::{Error, Result};
use crate::similarity::cosine_similarity;

/// Compute the association of a word with two attribute sets.
///
/// *s(w, X, Y) = mean_{x ∈ X} cos(w, x) - mean_{y ∈ Y} cos(w, y)*
///
/// Both attribute sets must be non-empty.
pub fn association<'a, X, Y>(word: ArrayView1<f32>, first: X, second: Y) -> Result<f64>
where
    X: IntoIterator<Item = ArrayView1<'a, f32>>,
    Y: IntoIterator<Item = ArrayView1<'a, f32>>,
{
    let score = mean_similarity(word, first)? - mean_similarity(word, second)?;
    if score.is_nan() {
        return Err(Error::InvalidInput("association is not a number".to_owned()));
    }

    Ok(score)
}

/// Compute the association of every target with two attribute sets.
pub fn associations<'a>(
    targets: &[ArrayView1<'a, f32>],
    first: &[ArrayView1<'a, f32>],
    second: &[ArrayView1<'a, f32>],
) -> Result<Vec<f64>> {
    targets
        .iter()
        .map(|target| {
            association(
                target.view(),
                first.iter().map(|v| v.view()),
                second.iter().map(|v| v.view()),
            )
        })
        .collect()
}

fn mean_similarity<'a, I>(word: ArrayView1<f32>, attributes: I) -> Result<f64>
where
    I: IntoIterator<Item = ArrayView1<'a, f32>>,
{
    let mut sum = 0.;
    let mut n = 0usize;
    for attribute in attributes {
        sum += cosine_similarity(word, attribute)?;
        n += 1;
    }

    if n == 0 {
        return Err(Error::InvalidInput("attribute set is empty".to_owned()));
    }

    Ok(sum / n as f64)
}
