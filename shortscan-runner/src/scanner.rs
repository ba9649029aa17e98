// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scanning log directories into a [`ResultTable`].
//!
//! Each file in the log directory is the output of one full run of the test suite. Files are
//! read line by line; see [`parse`](crate::parse) for the line grammar.

use crate::{
    errors::{LineError, LineErrorKind, ScanError},
    outcome::{OutcomeKind, UnknownReasonPolicy},
    parse::{LineResult, LogLine, parse_line},
    table::ResultTable,
    tokens::{TokenPair, TokenUniverse},
};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufRead, BufReader},
    ops::ControlFlow,
};
use tracing::{debug, warn};

/// What to do when an outcome line can't be parsed or refers to an unknown token.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedLinePolicy {
    /// Stop the whole scan at the first malformed line.
    #[default]
    Abort,

    /// Log a warning, record the line as skipped, and keep going.
    Skip,
}

/// Scans test logs and aggregates their outcomes.
#[derive(Clone, Debug)]
pub struct LogScanner<'a> {
    universe: &'a TokenUniverse,
    unknown_reasons: UnknownReasonPolicy,
    on_malformed_line: MalformedLinePolicy,
}

impl<'a> LogScanner<'a> {
    /// Creates a new scanner over the given tokens, with default policies.
    pub fn new(universe: &'a TokenUniverse) -> Self {
        Self {
            universe,
            unknown_reasons: UnknownReasonPolicy::default(),
            on_malformed_line: MalformedLinePolicy::default(),
        }
    }

    /// Sets the policy for failure reasons that aren't recognized.
    pub fn set_unknown_reasons(&mut self, policy: UnknownReasonPolicy) -> &mut Self {
        self.unknown_reasons = policy;
        self
    }

    /// Sets the policy for malformed lines.
    pub fn set_on_malformed_line(&mut self, policy: MalformedLinePolicy) -> &mut Self {
        self.on_malformed_line = policy;
        self
    }

    /// Returns a fresh, zeroed set of results for this scanner's tokens.
    pub fn new_results(&self) -> ScanResults {
        ScanResults {
            table: ResultTable::new(self.universe),
            run_count: 0,
            skipped_lines: Vec::new(),
        }
    }

    /// Scans every file in `dir`. Each file counts as one run.
    ///
    /// Entries are visited in sorted order. Entries that aren't files (or symlinks to files) are
    /// skipped with a warning.
    pub fn scan_dir(&self, dir: &Utf8Path) -> Result<ScanResults, ScanError> {
        let read_dir_err = |err| ScanError::ReadDir {
            dir: dir.to_owned(),
            err,
        };

        let mut paths = Vec::new();
        for entry in dir.as_std_path().read_dir().map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            let path = Utf8PathBuf::try_from(entry.path()).map_err(|err| {
                ScanError::NonUtf8Path {
                    path: err.into_path_buf(),
                }
            })?;
            paths.push(path);
        }
        paths.sort_unstable();

        let mut results = self.new_results();
        for path in paths {
            let metadata = path.metadata().map_err(|err| ScanError::ReadFile {
                path: path.clone(),
                err,
            })?;
            if !metadata.is_file() {
                warn!("skipping `{path}` in log directory: not a file");
                continue;
            }
            self.scan_file(&path, &mut results)?;
        }

        debug!(
            "scanned {} runs in `{dir}` ({} lines skipped)",
            results.run_count,
            results.skipped_lines.len(),
        );
        Ok(results)
    }

    /// Scans a single log file as one run, adding its outcomes to `results`.
    pub fn scan_file(&self, path: &Utf8Path, results: &mut ScanResults) -> Result<(), ScanError> {
        debug!("scanning log file `{path}`");
        let file = File::open(path).map_err(|err| ScanError::ReadFile {
            path: path.to_owned(),
            err,
        })?;
        self.scan_reader(path, BufReader::new(file), results)
    }

    /// Scans the contents of one run from a reader, adding its outcomes to `results`.
    ///
    /// `path` is only used for error reporting.
    ///
    /// Every outcome line is counted. A pair reported more than once in the same run is counted
    /// each time and logged as a warning, so its counts can exceed the number of runs.
    pub fn scan_reader(
        &self,
        path: &Utf8Path,
        reader: impl BufRead,
        results: &mut ScanResults,
    ) -> Result<(), ScanError> {
        results.run_count += 1;
        let mut seen = BTreeSet::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|err| ScanError::ReadFile {
                path: path.to_owned(),
                err,
            })?;

            match self.process_line(&line, &mut results.table) {
                Ok(ControlFlow::Continue(None)) => {}
                Ok(ControlFlow::Continue(Some(pair))) => {
                    if let Some(pair) = seen.replace(pair) {
                        warn!(
                            "`{path}` line {}: {pair} was already reported in this run \
                             and is counted again",
                            idx + 1,
                        );
                    }
                }
                Ok(ControlFlow::Break(())) => break,
                Err(kind) => {
                    let error = LineError::new(path, idx + 1, line, kind);
                    match self.on_malformed_line {
                        MalformedLinePolicy::Abort => {
                            return Err(ScanError::MalformedLine(Box::new(error)));
                        }
                        MalformedLinePolicy::Skip => {
                            warn!("skipping malformed line: {error}");
                            results.skipped_lines.push(error);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn process_line(
        &self,
        line: &str,
        table: &mut ResultTable,
    ) -> Result<ControlFlow<(), Option<TokenPair>>, LineErrorKind> {
        let outcome = match parse_line(line)? {
            LogLine::Summary => return Ok(ControlFlow::Break(())),
            LogLine::Ignored => return Ok(ControlFlow::Continue(None)),
            LogLine::Outcome(outcome) => outcome,
        };

        let kind = match outcome.result {
            LineResult::Pass => OutcomeKind::Pass,
            LineResult::Fail { reason } => OutcomeKind::from_reason(reason, self.unknown_reasons),
        };
        table.record(outcome.short, outcome.collateral, kind)?;
        Ok(ControlFlow::Continue(Some(TokenPair::new(
            outcome.short,
            outcome.collateral,
        ))))
    }
}

/// The results of a scan.
#[derive(Clone, Debug)]
pub struct ScanResults {
    table: ResultTable,
    run_count: usize,
    skipped_lines: Vec<LineError>,
}

impl ScanResults {
    /// Returns the aggregated outcome table.
    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    /// Returns the number of runs (log files) scanned.
    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// Returns lines that were skipped because they were malformed.
    ///
    /// This is always empty with [`MalformedLinePolicy::Abort`].
    pub fn skipped_lines(&self) -> &[LineError] {
        &self.skipped_lines
    }
}
