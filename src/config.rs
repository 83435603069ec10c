//! Evaluation configuration.
//!
//! The configuration can be read from TOML. Omitted fields take their
//! default values:
//!
//! ```toml
//! missing_words = "exclude"
//! with_pvalue = true
//! with_original_finding = false
//! max_exhaustive_partitions = 200000
//! n_samples = 10000
//! seed = 42
//! timeout_ms = 60000
//! ```

use std::io::Read;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Treatment of words that are not in the embedding vocabulary.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingWords {
    /// Remove the word from its set and record the exclusion.
    Exclude,

    /// Fail the case.
    Fail,
}

impl Default for MissingWords {
    fn default() -> Self {
        MissingWords::Exclude
    }
}

/// WEAT evaluation configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatConfig {
    pub missing_words: MissingWords,

    /// Compute permutation test p-values.
    pub with_pvalue: bool,

    /// Attach the original finding of a case to its result.
    pub with_original_finding: bool,

    /// Largest number of partitions that is enumerated exhaustively.
    /// Larger tests are approximated by sampling.
    pub max_exhaustive_partitions: u64,

    /// Number of random partitions drawn when sampling.
    pub n_samples: usize,

    /// Seed of the sampler. Sampled p-values are only reproducible
    /// with a seed.
    pub seed: Option<u64>,

    /// Time limit for a single permutation test in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl Default for WeatConfig {
    fn default() -> Self {
        WeatConfig {
            missing_words: MissingWords::Exclude,
            with_pvalue: true,
            with_original_finding: false,
            max_exhaustive_partitions: 200_000,
            n_samples: 10_000,
            seed: None,
            timeout_ms: None,
        }
    }
}

impl WeatConfig {
    /// Read a configuration in TOML format.
    pub fn read_toml<R>(mut reader: R) -> Result<Self>
    where
        R: Read,
    {
        let mut data = String::new();
        reader
            .read_to_string(&mut data)
            .map_err(|e| Error::io_error("Cannot read configuration", e))?;
        let config: WeatConfig = toml::from_str(&data)?;

        if config.n_samples == 0 {
            return Err(Error::InvalidInput(
                "n_samples must be at least 1".to_owned(),
            ));
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::time::Duration;

    use super::{MissingWords, WeatConfig};
    use crate::error::Error;

    #[test]
    fn read_config_file() {
        let config = WeatConfig::read_toml(File::open("testdata/config.toml").unwrap()).unwrap();
        assert_eq!(
            config,
            WeatConfig {
                missing_words: MissingWords::Fail,
                with_pvalue: true,
                with_original_finding: true,
                max_exhaustive_partitions: 1000,
                n_samples: 5000,
                seed: Some(42),
                timeout_ms: Some(60000),
            }
        );
        assert_eq!(config.timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let config = WeatConfig::read_toml("seed = 7".as_bytes()).unwrap();
        assert_eq!(
            config,
            WeatConfig {
                seed: Some(7),
                ..WeatConfig::default()
            }
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            WeatConfig::read_toml("samples = 7".as_bytes()),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn rejects_zero_samples() {
        assert!(WeatConfig::read_toml("n_samples = 0".as_bytes()).is_err());
    }
}
