// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Running the test suite to produce a new log.

use crate::{config::GenerateConfig, errors::GenerateLogError};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use std::{fs::File, process::ExitStatus};
use tracing::{debug, info, warn};

/// The format used for log file names, e.g. `19-10-26_14-03-59`.
pub const LOG_FILE_TIMESTAMP_FORMAT: &str = "%d-%m-%y_%H-%M-%S";

/// Runs the configured test command, writing its standard output to a new file in a log
/// directory.
#[derive(Clone, Debug)]
pub struct LogGenerator<'a> {
    config: &'a GenerateConfig,
    log_dir: &'a Utf8Path,
}

impl<'a> LogGenerator<'a> {
    /// Creates a new generator.
    pub fn new(config: &'a GenerateConfig, log_dir: &'a Utf8Path) -> Self {
        Self { config, log_dir }
    }

    /// Returns the command line that will be run, as individual arguments.
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.config.program.clone())
            .chain(self.config.resolved_args())
            .collect()
    }

    /// Convert the command to a [`duct::Expression`].
    pub fn to_expression(&self) -> duct::Expression {
        duct::cmd(&self.config.program, self.config.resolved_args())
    }

    /// Returns the path of the log file that would be written at `now`.
    pub fn log_path_at(&self, now: DateTime<Local>) -> Utf8PathBuf {
        self.log_dir
            .join(format!("{}.txt", now.format(LOG_FILE_TIMESTAMP_FORMAT)))
    }

    /// Runs the command, writing its output to a log file named after the current local time.
    pub fn generate(&self) -> Result<GeneratedLog, GenerateLogError> {
        self.generate_at(Local::now())
    }

    /// Runs the command, writing its output to a log file named after `now`.
    ///
    /// A command that runs but exits with a non-zero status is not an error: the test suite
    /// exits non-zero whenever any test fails, and the log is still useful. If the command can't
    /// be started at all, the log file is removed again.
    pub fn generate_at(&self, now: DateTime<Local>) -> Result<GeneratedLog, GenerateLogError> {
        std::fs::create_dir_all(self.log_dir).map_err(|err| GenerateLogError::CreateDir {
            dir: self.log_dir.to_owned(),
            err,
        })?;

        let path = self.log_path_at(now);
        let file = File::create(&path).map_err(|err| GenerateLogError::CreateFile {
            path: path.clone(),
            err,
        })?;

        let command = shell_words::join(self.command_line());
        info!("generating a new test log at `{path}`, this may take a minute or two");
        debug!("running `{command}`");

        let result = self.to_expression().stdout_file(file).unchecked().run();
        let output = match result {
            Ok(output) => output,
            Err(err) => {
                // Nothing ran, so the empty log must not be scanned as a run.
                if let Err(remove_err) = std::fs::remove_file(&path) {
                    warn!("failed to remove empty log file `{path}`: {remove_err}");
                }
                return Err(GenerateLogError::Exec { command, err });
            }
        };

        if output.status.success() {
            debug!("`{command}` exited successfully");
        } else {
            warn!("`{command}` exited with {}", output.status);
        }

        Ok(GeneratedLog {
            path,
            status: output.status,
        })
    }
}

/// A log written by [`LogGenerator`].
#[derive(Clone, Debug)]
pub struct GeneratedLog {
    /// The path to the log file.
    pub path: Utf8PathBuf,

    /// The exit status of the test command.
    pub status: ExitStatus,
}
