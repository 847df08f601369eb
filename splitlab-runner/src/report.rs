//! Distribution report — realized vs. expected group shares.
//!
//! Purely derived from assigned labels; contains no assignment logic. The
//! report is the human-facing check that a split landed where its weights
//! say it should (it does not attempt statistical sample-ratio-mismatch
//! detection).

use std::io;

use serde::Serialize;
use splitlab_core::GroupSpec;
use thiserror::Error;

use crate::apply::AssignSummary;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("label '{0}' does not name any group in the specification")]
    UnknownGroup(String),

    #[error("{counts} counts for {groups} groups")]
    CountMismatch { counts: usize, groups: usize },

    #[error("column '{0}' not found in header")]
    MissingColumn(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// One group's share of the population.
#[derive(Debug, Clone, Serialize)]
pub struct GroupShare {
    pub name: String,
    pub count: usize,
    /// Observed share of the total, in percent.
    pub observed_pct: f64,
    /// Share the spec's weight promises, in percent.
    pub expected_pct: f64,
}

/// Realized distribution of one experiment's assignments, in spec order.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub total: usize,
    pub shares: Vec<GroupShare>,
}

impl DistributionReport {
    /// Build a report from per-group counts in spec declaration order.
    pub fn from_counts(counts: &[usize], spec: &GroupSpec) -> Result<Self, ReportError> {
        if counts.len() != spec.len() {
            return Err(ReportError::CountMismatch {
                counts: counts.len(),
                groups: spec.len(),
            });
        }
        let total: usize = counts.iter().sum();
        let shares = spec
            .names()
            .iter()
            .zip(spec.weights())
            .zip(counts)
            .map(|((name, &weight), &count)| GroupShare {
                name: name.clone(),
                count,
                observed_pct: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                },
                expected_pct: weight * 100.0,
            })
            .collect();
        Ok(Self { total, shares })
    }

    /// Build a report by tallying assigned labels against the spec.
    ///
    /// A label outside the spec means the table was assigned under a
    /// different specification — that is an error, not a zero-count row.
    pub fn from_labels<'a, I>(labels: I, spec: &GroupSpec) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = vec![0_usize; spec.len()];
        for label in labels {
            let index = spec
                .names()
                .iter()
                .position(|n| n == label)
                .ok_or_else(|| ReportError::UnknownGroup(label.to_string()))?;
            counts[index] += 1;
        }
        Self::from_counts(&counts, spec)
    }

    /// Build a report from a bulk-run summary.
    pub fn from_summary(summary: &AssignSummary, spec: &GroupSpec) -> Result<Self, ReportError> {
        Self::from_counts(&summary.counts, spec)
    }

    /// Render as a Markdown table.
    pub fn render(&self) -> String {
        let mut out = String::from("| group | count | observed | expected |\n");
        out.push_str("|-------|-------|----------|----------|\n");
        for share in &self.shares {
            out.push_str(&format!(
                "| {} | {} | {:.2}% | {:.2}% |\n",
                share.name, share.count, share.observed_pct, share.expected_pct
            ));
        }
        out.push_str(&format!("| total | {} | | |\n", self.total));
        out
    }
}

/// Tally an assignment column of an existing CSV table into a report.
pub fn report_csv_column<R: io::Read>(
    reader: R,
    column: &str,
    spec: &GroupSpec,
) -> Result<DistributionReport, ReportError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let index = rdr
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| ReportError::MissingColumn(column.to_string()))?;

    let mut counts = vec![0_usize; spec.len()];
    for record in rdr.records() {
        let record = record?;
        let label = record.get(index).unwrap_or("");
        let group = spec
            .names()
            .iter()
            .position(|n| n == label)
            .ok_or_else(|| ReportError::UnknownGroup(label.to_string()))?;
        counts[group] += 1;
    }
    DistributionReport::from_counts(&counts, spec)
}
