// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Building and displaying the final report.
//!
//! A [`ScanReport`] is a read-only view over scan results, split into pairs that passed every
//! run and pairs that didn't. [`ReportDisplayer`] renders it, either for humans (optionally with
//! color) or as JSON.

use crate::{
    errors::WriteReportError,
    helpers::plural,
    outcome::OutcomeKind,
    scanner::ScanResults,
    table::ResultTable,
    tokens::TokenPair,
};
use camino::{Utf8Path, Utf8PathBuf};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;
use std::io::{self, Write};

/// The outcome of a scan, split into passing and failing pairs.
///
/// Both sections are sorted short-major, collateral-minor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScanReport {
    /// The number of runs scanned.
    pub run_count: usize,

    /// The directory logs were read from.
    pub log_dir: Utf8PathBuf,

    /// Pairs that passed in every run.
    pub passing: Vec<TokenPair>,

    /// Pairs that didn't pass in every run.
    pub failing: Vec<FailingPair>,

    /// The number of malformed lines that were skipped.
    pub skipped_lines: usize,
}

impl ScanReport {
    /// Builds a report from the results of a scan.
    pub fn new(results: &ScanResults, log_dir: &Utf8Path) -> Self {
        Self::from_table(
            results.table(),
            results.run_count(),
            results.skipped_lines().len(),
            log_dir,
        )
    }

    /// Builds a report from a table and run count.
    pub fn from_table(
        table: &ResultTable,
        run_count: usize,
        skipped_lines: usize,
        log_dir: &Utf8Path,
    ) -> Self {
        let mut passing = Vec::new();
        let mut failing = Vec::new();

        for (pair, counts) in table.iter() {
            if counts.passes() == run_count {
                passing.push(pair);
            } else {
                let outcomes = counts
                    .non_zero()
                    .map(|(outcome, count)| OutcomeCount {
                        outcome: outcome.clone(),
                        count,
                    })
                    .collect();
                failing.push(FailingPair { pair, outcomes });
            }
        }

        Self {
            run_count,
            log_dir: log_dir.to_owned(),
            passing,
            failing,
            skipped_lines,
        }
    }
}

/// A pair that didn't pass in every run, along with its non-zero outcome counts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FailingPair {
    /// The token pair.
    #[serde(flatten)]
    pub pair: TokenPair,

    /// Non-zero outcome counts, in [`OutcomeKind`] order.
    pub outcomes: Vec<OutcomeCount>,
}

/// The number of times an outcome was seen for a pair.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutcomeCount {
    /// The outcome.
    pub outcome: OutcomeKind,

    /// How many runs produced it.
    pub count: usize,
}

/// The format to write a report in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReportFormat {
    /// Human-readable sections.
    #[default]
    Human,

    /// Compact JSON.
    Json,

    /// Pretty-printed JSON.
    JsonPretty,
}

/// Writes a [`ScanReport`] out.
#[derive(Debug, Default)]
pub struct ReportDisplayer {
    styles: Styles,
}

impl ReportDisplayer {
    /// Creates a new displayer without colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Colorizes output.
    pub fn colorize(&mut self) {
        self.styles.colorize();
    }

    /// Writes the report in the given format.
    pub fn write(
        &self,
        report: &ScanReport,
        format: ReportFormat,
        mut writer: impl Write,
    ) -> Result<(), WriteReportError> {
        match format {
            ReportFormat::Human => self.write_human(report, &mut writer)?,
            ReportFormat::Json => {
                serde_json::to_writer(&mut writer, report)?;
                writeln!(writer)?;
            }
            ReportFormat::JsonPretty => {
                serde_json::to_writer_pretty(&mut writer, report)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the report in human-readable form.
    pub fn write_human(&self, report: &ScanReport, mut writer: impl Write) -> io::Result<()> {
        let iterations = plural::iterations_str(report.run_count);

        writeln!(
            writer,
            "{}:",
            format!(
                "Stable pairs that PASS all {} {iterations} of tests",
                report.run_count
            )
            .style(self.styles.pass),
        )?;
        for pair in &report.passing {
            self.write_pair(pair, &mut writer)?;
        }

        writeln!(writer)?;
        writeln!(
            writer,
            "{}:",
            "Pairs that FAIL any iterations of tests".style(self.styles.fail)
        )?;
        writeln!(writer, "(Error message: #ofIterationsErrorManifested)")?;
        writeln!(writer)?;

        for pair in &report.failing {
            self.write_pair(&pair.pair, &mut writer)?;
            for OutcomeCount { outcome, count } in &pair.outcomes {
                let style = if outcome.is_pass() {
                    self.styles.pass
                } else {
                    self.styles.fail
                };
                writeln!(writer, "{}: {count}", outcome.style(style))?;
            }
            writeln!(writer)?;
        }

        if report.skipped_lines > 0 {
            writeln!(
                writer,
                "{}: {} malformed {} {} skipped",
                "warning".style(self.styles.warning),
                report.skipped_lines.style(self.styles.bold),
                plural::lines_str(report.skipped_lines),
                plural::were_str(report.skipped_lines),
            )?;
        }

        writeln!(
            writer,
            "Analysis of {} {iterations} of tests complete.",
            report.run_count.style(self.styles.bold),
        )?;
        writeln!(
            writer,
            "View the {} directory for more details about the tests.",
            report.log_dir.style(self.styles.bold),
        )?;

        Ok(())
    }

    fn write_pair(&self, pair: &TokenPair, mut writer: impl Write) -> io::Result<()> {
        writeln!(
            writer,
            "shortToken: {}\tbaseToken: {}",
            pair.short.style(self.styles.bold),
            pair.collateral.style(self.styles.bold),
        )
    }
}

#[derive(Clone, Debug, Default)]
struct Styles {
    bold: Style,
    pass: Style,
    fail: Style,
    warning: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.bold = Style::new().bold();
        self.pass = Style::new().green();
        self.fail = Style::new().red();
        self.warning = Style::new().yellow().bold();
    }
}
