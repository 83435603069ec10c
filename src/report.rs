//! Tabular output of batch outcomes.
//!
//! Outcomes are written as CSV with one row per case. The same rows can
//! be read back with `read_results`, e.g. to summarize the results of
//! several models.

use std::io::{Read, Write};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::batch::CaseOutcome;
use crate::error::{Error, Result};

static HEADER: &[&str] = &[
    "label",
    "model",
    "n_targets",
    "n_attributes",
    "s",
    "d",
    "p",
    "p_mode",
    "n_partitions",
    "excluded",
    "original_d",
    "original_p",
    "error",
];

/// A row of the results table.
///
/// Rows of failed cases only have a label, a model and an error.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ResultRow {
    pub label: String,
    pub model: String,

    /// Target set sizes after exclusion, `NxN` or `N+M`.
    pub n_targets: Option<String>,

    /// Attribute set sizes after exclusion.
    pub n_attributes: Option<String>,
    pub s: Option<f64>,
    pub d: Option<f64>,
    pub p: Option<f64>,

    /// `exhaustive` or `sampled`, with a ` (partial)` suffix when the
    /// test was interrupted.
    pub p_mode: Option<String>,
    pub n_partitions: Option<u64>,

    /// Excluded words, separated by spaces, `None` when no word was
    /// excluded.
    pub excluded: Option<String>,
    pub original_d: Option<f64>,
    pub original_p: Option<f64>,
    pub error: Option<String>,
}

impl ResultRow {
    /// Construct the row of a case outcome.
    pub fn new(outcome: &CaseOutcome, model: &str) -> Self {
        let mut row = ResultRow {
            label: outcome.label.clone(),
            model: model.to_owned(),
            ..ResultRow::default()
        };

        let result = match &outcome.result {
            Ok(result) => result,
            Err(err) => {
                row.error = Some(err.to_string());
                return row;
            }
        };

        row.n_targets = Some(set_sizes(result.n_first_target, result.n_second_target));
        row.n_attributes = Some(set_sizes(
            result.n_first_attribute,
            result.n_second_attribute,
        ));
        row.s = Some(result.s());
        row.d = Some(result.d());

        if let Some(p) = result.p_value {
            row.p = Some(p.value);
            row.p_mode = Some(match p.interrupted {
                Some(_) => format!("{} (partial)", p.mode.as_str()),
                None => p.mode.as_str().to_owned(),
            });
            row.n_partitions = Some(p.n_partitions);
        }

        if !result.excluded.is_empty() {
            row.excluded = Some(
                result
                    .excluded
                    .iter()
                    .map(|exclusion| exclusion.word.as_str())
                    .join(" "),
            );
        }

        if let Some(finding) = result.original_finding {
            row.original_d = Some(finding.d);
            row.original_p = finding.p;
        }

        row
    }

    /// Check whether the row is the result of a failed case.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Write batch outcomes as comma-separated values.
pub trait WriteCsv<W>
where
    W: Write,
{
    /// Write the outcomes, `model` identifies the embeddings that the
    /// cases were evaluated against.
    fn write_csv(&self, write: W, model: &str) -> Result<()>;
}

impl<W> WriteCsv<W> for [CaseOutcome]
where
    W: Write,
{
    fn write_csv(&self, write: W, model: &str) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(write);
        writer.write_record(HEADER)?;

        for outcome in self {
            writer.serialize(ResultRow::new(outcome, model))?;
        }

        writer
            .flush()
            .map_err(|e| Error::io_error("Cannot flush results", e))
    }
}

impl<W> WriteCsv<W> for Vec<CaseOutcome>
where
    W: Write,
{
    fn write_csv(&self, write: W, model: &str) -> Result<()> {
        self.as_slice().write_csv(write, model)
    }
}

/// Read a results table written by `WriteCsv`.
pub fn read_results<R>(reader: R) -> Result<Vec<ResultRow>>
where
    R: Read,
{
    let mut reader = csv::Reader::from_reader(reader);
    reader
        .deserialize()
        .map(|row| row.map_err(Error::from))
        .collect()
}

fn set_sizes(first: usize, second: usize) -> String {
    if first == second {
        format!("{}x2", first)
    } else {
        format!("{}+{}", first, second)
    }
}
