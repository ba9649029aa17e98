// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for `shortscan`.
//!
//! The basic flow is:
//!
//! 1. Load a [`ShortscanConfig`](config::ShortscanConfig), which carries the token sets.
//! 2. Optionally run the test suite once more with a [`LogGenerator`](generate::LogGenerator).
//! 3. Scan every log in the log directory with a [`LogScanner`](scanner::LogScanner).
//! 4. Build a [`ScanReport`](report::ScanReport) and write it out with a
//!    [`ReportDisplayer`](report::ReportDisplayer).

pub mod config;
pub mod errors;
mod exit_codes;
pub mod generate;
mod helpers;
pub mod outcome;
pub mod parse;
pub mod report;
pub mod scanner;
pub mod table;
pub mod tokens;

pub use exit_codes::ShortscanExitCode;
