//! WEAT test statistic and effect size.

use crate::error::{Error, Result};

/// Test statistic and effect size of a WEAT case.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSize {
    /// Raw test statistic *s(A, B, X, Y)*.
    pub s: f64,

    /// Standardized effect size *d*.
    pub d: f64,
}

/// Compute the raw test statistic from target associations.
///
/// *s(A, B, X, Y) = sum_{a ∈ A} s(a, X, Y) - sum_{b ∈ B} s(b, X, Y)*
pub fn test_statistic(first: &[f64], second: &[f64]) -> f64 {
    first.iter().sum::<f64>() - second.iter().sum::<f64>()
}

/// Compute the test statistic and the effect size from target
/// associations.
///
/// The effect size is the difference of the mean associations of both
/// target sets, divided by the sample standard deviation of all
/// associations. A positive effect size indicates that the first target
/// set is more associated with the first attribute set than the second
/// target set is.
pub fn effect_size(first: &[f64], second: &[f64]) -> Result<EffectSize> {
    let n = first.len() + second.len();
    if n < 2 {
        return Err(Error::InsufficientData(format!(
            "standard deviation is undefined for {} association(s)",
            n
        )));
    }

    if first.is_empty() || second.is_empty() {
        return Err(Error::InvalidInput("target set is empty".to_owned()));
    }

    let std_dev = sample_std_dev(first.iter().chain(second.iter()).cloned());
    if std_dev == 0. {
        return Err(Error::DivideByZero(
            "all target associations are equal".to_owned(),
        ));
    }

    Ok(EffectSize {
        s: test_statistic(first, second),
        d: (mean(first) - mean(second)) / std_dev,
    })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation, at least two values are required.
pub(crate) fn sample_std_dev<I>(values: I) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let (n, sum) = values
        .clone()
        .fold((0usize, 0f64), |(n, sum), v| (n + 1, sum + v));
    let mean = sum / n as f64;
    let squared_deviations: f64 = values.map(|v| (v - mean).powi(2)).sum();
    (squared_deviations / (n - 1) as f64).sqrt()
}
