// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING, StderrStyles};
use owo_colors::OwoColorize;
use shortscan_runner::{ShortscanExitCode, errors::*};
use std::error::Error;
use thiserror::Error;
use tracing::{error, info};

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected error that shortscan knows how to report.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("error reading prompt")]
    DialoguerError {
        #[source]
        err: dialoguer::Error,
    },
    #[error("log generation error")]
    GenerateLogError {
        #[from]
        err: GenerateLogError,
    },
    #[error("scan error")]
    ScanError {
        #[from]
        err: ScanError,
    },
    #[error("error writing report")]
    WriteReportError {
        #[from]
        err: WriteReportError,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseError { .. } | Self::DialoguerError { .. } => {
                ShortscanExitCode::SETUP_ERROR
            }
            Self::GenerateLogError { .. } => ShortscanExitCode::GENERATE_FAILED,
            Self::ScanError { .. } => ShortscanExitCode::SCAN_FAILED,
            Self::WriteReportError { .. } => ShortscanExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse shortscan config at `{}`",
                    err.config_file().style(styles.bold)
                );
                err.source()
            }
            Self::DialoguerError { err } => {
                error!("error reading input prompt");
                Some(err as &dyn Error)
            }
            Self::GenerateLogError { err } => {
                error!("failed to generate a new test log");
                Some(err as &dyn Error)
            }
            Self::ScanError { err } => match err.line_error() {
                Some(line_error) => {
                    error!(
                        "malformed line in `{}` at line {}: {}",
                        line_error.path().style(styles.bold),
                        line_error.line_number(),
                        line_error.kind(),
                    );
                    info!(
                        target: NO_HEADING,
                        "  {}",
                        line_error.line().style(styles.warning_text)
                    );
                    info!(
                        target: NO_HEADING,
                        "(pass `--on-malformed-line skip` to skip malformed lines)"
                    );
                    None
                }
                None => {
                    error!("{err}");
                    err.source()
                }
            },
            Self::WriteReportError { err } => {
                error!("failed to write report");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
