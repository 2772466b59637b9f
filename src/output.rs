//! Output formatting and persistence for subject averages.
//!
//! Supports the plain text report, JSON, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::grades::SubjectAggregate;
use crate::grades::grade::verbal_grade;

/// One subject's line in the final report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectReport {
    pub subject: String,
    pub average: f64,
    pub total_weight: f64,
    pub grade_count: usize,
    pub verbal_grade: String,
}

/// A report row as appended to the CSV history file.
#[derive(Serialize)]
struct ReportRecord<'a> {
    generated_at: DateTime<Utc>,
    source: &'a str,
    subject: &'a str,
    average: f64,
    total_weight: f64,
    grade_count: usize,
    verbal_grade: &'a str,
}

/// Flattens the aggregation result into reports sorted by subject name.
pub fn subject_reports(subjects: &HashMap<String, SubjectAggregate>) -> Vec<SubjectReport> {
    let mut reports: Vec<SubjectReport> = subjects
        .iter()
        .map(|(subject, data)| SubjectReport {
            subject: subject.clone(),
            average: data.average,
            total_weight: data.total_weight,
            grade_count: data.grade_count,
            verbal_grade: verbal_grade(data.average),
        })
        .collect();
    reports.sort_by(|a, b| a.subject.cmp(&b.subject));
    reports
}

/// Writes the `<subject>: <average>` report, one line per subject.
pub fn write_report<W: Write>(out: &mut W, reports: &[SubjectReport]) -> std::io::Result<()> {
    if reports.is_empty() {
        writeln!(
            out,
            "No subject averages could be calculated from the provided data."
        )?;
        return Ok(());
    }

    writeln!(out, "--- Subject Weighted Averages ---")?;
    for report in reports {
        writeln!(out, "{}: {:.3}", report.subject, report.average)?;
    }
    Ok(())
}

/// Writes the reports as a pretty-printed JSON array.
pub fn write_json<W: Write>(out: &mut W, reports: &[SubjectReport]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;
    Ok(())
}

/// Appends one CSV row per subject to `path`.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, source: &str, reports: &[SubjectReport]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = reports.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    let generated_at = Utc::now();
    for report in reports {
        writer.serialize(ReportRecord {
            generated_at,
            source,
            subject: &report.subject,
            average: report.average,
            total_weight: report.total_weight,
            grade_count: report.grade_count,
            verbal_grade: &report.verbal_grade,
        })?;
    }
    writer.flush()?;

    Ok(())
}
