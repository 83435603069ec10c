//! Summaries of results over replicate models.
//!
//! Results of the same case and model, e.g. of embeddings that were
//! trained several times with different seeds, are grouped. Every group
//! is summarized by the mean and sample standard deviation of the effect
//! sizes and p-values.

use std::io::Write;

use fnv::FnvHashMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::report::ResultRow;
use crate::statistic::{mean, sample_std_dev};

/// Summary of the results of a case for a model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub label: String,
    pub model: String,

    /// Number of successful results.
    pub n_results: usize,

    /// Number of failed results, these are not summarized.
    pub n_failed: usize,
    pub mean_d: Option<f64>,

    /// Undefined for fewer than two results.
    pub std_d: Option<f64>,
    pub mean_p: Option<f64>,
    pub std_p: Option<f64>,
}

#[derive(Default)]
struct Group {
    label: String,
    model: String,
    d: Vec<f64>,
    p: Vec<f64>,
    n_failed: usize,
}

impl Group {
    fn into_summary(self) -> ScoreSummary {
        ScoreSummary {
            label: self.label,
            model: self.model,
            n_results: self.d.len(),
            n_failed: self.n_failed,
            mean_d: mean_of(&self.d),
            std_d: std_dev_of(&self.d),
            mean_p: mean_of(&self.p),
            std_p: std_dev_of(&self.p),
        }
    }
}

/// Summarize results by case label and model.
///
/// Summaries are in the order in which their label and model first
/// occur.
pub fn summarize<'a, I>(rows: I) -> Vec<ScoreSummary>
where
    I: IntoIterator<Item = &'a ResultRow>,
{
    let mut indices = FnvHashMap::default();
    let mut groups: Vec<Group> = Vec::new();

    for row in rows {
        let key = (row.label.clone(), row.model.clone());
        let idx = *indices.entry(key).or_insert_with(|| {
            groups.push(Group {
                label: row.label.clone(),
                model: row.model.clone(),
                ..Group::default()
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];

        match row.d {
            Some(d) if !row.is_failure() => {
                group.d.push(d);
                group.p.extend(row.p);
            }
            _ => group.n_failed += 1,
        }
    }

    groups.into_iter().map(Group::into_summary).collect()
}

/// Write summaries as comma-separated values.
pub fn write_summaries<W>(summaries: &[ScoreSummary], write: W) -> Result<()>
where
    W: Write,
{
    let mut writer = csv::Writer::from_writer(write);
    for summary in summaries {
        writer.serialize(summary)?;
    }

    writer
        .flush()
        .map_err(|e| Error::io_error("Cannot flush summaries", e))
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(mean(values))
    }
}

fn std_dev_of(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        None
    } else {
        Some(sample_std_dev(values.iter().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use approx::assert_abs_diff_eq;

    use super::{summarize, write_summaries};
    use crate::batch::run_batch;
    use crate::case::read_cases;
    use crate::config::WeatConfig;
    use crate::report::{read_results, ResultRow, WriteCsv};
    use crate::tests::{toy_d, TOY_EMBEDDINGS};

    fn row(label: &str, model: &str, d: Option<f64>, p: Option<f64>) -> ResultRow {
        ResultRow {
            label: label.to_owned(),
            model: model.to_owned(),
            d,
            p,
            error: if d.is_none() {
                Some("Invalid input".to_owned())
            } else {
                None
            },
            ..ResultRow::default()
        }
    }

    #[test]
    fn groups_by_label_and_model() {
        let rows = vec![
            row("Flowers", "glove", Some(1.), Some(0.1)),
            row("Flowers", "w2v", Some(0.5), None),
            row("Flowers", "glove", Some(2.), Some(0.3)),
            row("Flowers", "glove", None, None),
            row("Weapons", "glove", Some(-1.), Some(0.9)),
        ];

        let summaries = summarize(&rows);
        assert_eq!(summaries.len(), 3);

        let glove = &summaries[0];
        assert_eq!((glove.label.as_str(), glove.model.as_str()), ("Flowers", "glove"));
        assert_eq!(glove.n_results, 2);
        assert_eq!(glove.n_failed, 1);
        assert_abs_diff_eq!(glove.mean_d.unwrap(), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(glove.std_d.unwrap(), 0.5f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(glove.mean_p.unwrap(), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(glove.std_p.unwrap(), 0.02f64.sqrt(), epsilon = 1e-12);

        let w2v = &summaries[1];
        assert_eq!(w2v.model, "w2v");
        assert_eq!(w2v.n_results, 1);
        assert_eq!(w2v.mean_d, Some(0.5));
        assert_eq!(w2v.std_d, None);
        assert_eq!(w2v.mean_p, None);

        assert_eq!(summaries[2].label, "Weapons");
    }

    #[test]
    fn summarize_replicate_result_tables() {
        let cases = read_cases(fs::File::open("testdata/cases.json").unwrap()).unwrap();
        let config = WeatConfig::default();

        let mut rows = Vec::new();
        for _ in 0..3 {
            let mut table = Vec::new();
            run_batch(&*TOY_EMBEDDINGS, &cases, &config)
                .write_csv(&mut table, "toy")
                .unwrap();
            rows.extend(read_results(table.as_slice()).unwrap());
        }

        let summaries = summarize(&rows);
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].n_results, 3);
        assert_abs_diff_eq!(summaries[0].mean_d.unwrap(), toy_d(), epsilon = 1e-9);
        assert_abs_diff_eq!(summaries[0].std_d.unwrap(), 0., epsilon = 1e-12);
        assert_eq!(summaries[1].label, "Empty targets");
        assert_eq!(summaries[1].n_failed, 3);
        assert_eq!(summaries[1].mean_d, None);

        let mut output = Vec::new();
        write_summaries(&summaries, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output.lines().next().unwrap(),
            "label,model,n_results,n_failed,mean_d,std_d,mean_p,std_p"
        );
        assert!(output.lines().nth(2).unwrap().starts_with("Empty targets,toy,0,3,,,,"));
    }
}
