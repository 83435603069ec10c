//! WEAT case definitions.
//!
//! A case consists of two target word sets and two attribute word
//! sets. Cases are read from a JSON array:
//!
//! ```json
//! [
//!   {
//!     "first_target": {"name": "Flowers", "words": ["aster", "clover"]},
//!     "second_target": {"name": "Insects", "words": ["ant", "caterpillar"]},
//!     "first_attribute": {"name": "Pleasant", "words": ["caress", "freedom"]},
//!     "second_attribute": {"name": "Unpleasant", "words": ["abuse", "crash"]},
//!     "original_finding": {"d": 1.5, "p": 1.0e-7}
//!   }
//! ]
//! ```

use std::io::Read;

use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named set of words.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WordSet {
    pub name: String,
    pub words: Vec<String>,
}

impl WordSet {
    pub fn new<S>(name: impl Into<String>, words: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        WordSet {
            name: name.into(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Check that the set is non-empty and does not contain duplicates.
    pub fn validate(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Word set '{}' is empty",
                self.name
            )));
        }

        let mut seen = FnvHashSet::default();
        for word in &self.words {
            if !seen.insert(word.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "Word set '{}' contains '{}' more than once",
                    self.name, word
                )));
            }
        }

        Ok(())
    }
}

/// Effect size and p-value reported in the literature for a case.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct OriginalFinding {
    pub d: f64,
    #[serde(default)]
    pub p: Option<f64>,
}

/// A WEAT case.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WeatCase {
    #[serde(default)]
    label: Option<String>,
    pub first_target: WordSet,
    pub second_target: WordSet,
    pub first_attribute: WordSet,
    pub second_attribute: WordSet,
    #[serde(default)]
    pub original_finding: Option<OriginalFinding>,
}

impl WeatCase {
    pub fn new(
        first_target: WordSet,
        second_target: WordSet,
        first_attribute: WordSet,
        second_attribute: WordSet,
    ) -> Self {
        WeatCase {
            label: None,
            first_target,
            second_target,
            first_attribute,
            second_attribute,
            original_finding: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_original_finding(mut self, finding: OriginalFinding) -> Self {
        self.original_finding = Some(finding);
        self
    }

    /// Get the case label.
    ///
    /// Without an explicit label, the label is derived from the set
    /// names: *A vs. B / X vs. Y*.
    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!(
                "{} vs. {} / {} vs. {}",
                self.first_target.name,
                self.second_target.name,
                self.first_attribute.name,
                self.second_attribute.name
            ),
        }
    }

    /// Check that all sets are valid and that the target sets and the
    /// attribute sets are disjoint.
    pub fn validate(&self) -> Result<()> {
        self.first_target.validate()?;
        self.second_target.validate()?;
        self.first_attribute.validate()?;
        self.second_attribute.validate()?;

        ensure_disjoint(&self.first_target, &self.second_target)?;
        ensure_disjoint(&self.first_attribute, &self.second_attribute)
    }
}

fn ensure_disjoint(first: &WordSet, second: &WordSet) -> Result<()> {
    let words: FnvHashSet<_> = first.words.iter().collect();
    match second.words.iter().find(|word| words.contains(word)) {
        Some(word) => Err(Error::InvalidInput(format!(
            "Word '{}' occurs in both '{}' and '{}'",
            word, first.name, second.name
        ))),
        None => Ok(()),
    }
}

/// Read case definitions from a JSON array.
pub fn read_cases<R>(reader: R) -> Result<Vec<WeatCase>>
where
    R: Read,
{
    Ok(serde_json::from_reader(reader)?)
}
