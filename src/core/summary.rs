//! Run summary reporting

use crate::core::state::watermark::Watermark;
use std::time::Duration;
use tracing::{error, info};

/// Outcome of one dataset's extraction
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetOutcome {
    /// New rows were exported and the watermark advanced
    Updated {
        records: usize,
        partitions: usize,
        watermark: Watermark,
    },
    /// The scan found no rows newer than the watermark
    NoNewRows { watermark: Watermark },
    /// The dataset failed; other datasets are unaffected
    Failed { message: String },
}

/// One dataset's entry in the run summary
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub dataset: String,
    pub outcome: DatasetOutcome,
    pub duration: Duration,
}

/// Aggregated result of a full extraction run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<DatasetReport>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: DatasetReport) {
        self.reports.push(report);
    }

    /// Number of datasets that failed
    pub fn failed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, DatasetOutcome::Failed { .. }))
            .count()
    }

    /// Number of datasets that completed, with or without new rows
    pub fn succeeded(&self) -> usize {
        self.reports.len() - self.failed()
    }

    /// Total rows exported across all datasets
    pub fn total_records(&self) -> usize {
        self.reports
            .iter()
            .map(|r| match r.outcome {
                DatasetOutcome::Updated { records, .. } => records,
                _ => 0,
            })
            .sum()
    }

    /// Whether every dataset completed
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Log the run summary at the end of an extraction
pub fn log_summary(summary: &RunSummary) {
    for report in &summary.reports {
        match &report.outcome {
            DatasetOutcome::Updated {
                records,
                partitions,
                watermark,
            } => info!(
                dataset = %report.dataset,
                records,
                partitions,
                watermark = %watermark,
                duration_ms = report.duration.as_millis() as u64,
                "Dataset updated"
            ),
            DatasetOutcome::NoNewRows { watermark } => info!(
                dataset = %report.dataset,
                watermark = %watermark,
                duration_ms = report.duration.as_millis() as u64,
                "Dataset has no new rows"
            ),
            DatasetOutcome::Failed { message } => error!(
                dataset = %report.dataset,
                error = %message,
                duration_ms = report.duration.as_millis() as u64,
                "Dataset failed"
            ),
        }
    }

    info!(
        datasets = summary.reports.len(),
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        total_records = summary.total_records(),
        duration_ms = summary.duration.as_millis() as u64,
        "Extraction run complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, outcome: DatasetOutcome) -> DatasetReport {
        DatasetReport {
            dataset: name.to_string(),
            outcome,
            duration: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_counts() {
        let mut summary = RunSummary::new();
        summary.record(report(
            "sales",
            DatasetOutcome::Updated {
                records: 2,
                partitions: 2,
                watermark: Watermark::new(105),
            },
        ));
        summary.record(report(
            "promotions",
            DatasetOutcome::NoNewRows {
                watermark: Watermark::new(200),
            },
        ));
        summary.record(report(
            "broken",
            DatasetOutcome::Failed {
                message: "no watermark".to_string(),
            },
        ));

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total_records(), 2);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_empty_summary_is_success() {
        let summary = RunSummary::new();
        assert!(summary.is_success());
        assert_eq!(summary.total_records(), 0);
    }
}
