// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `shortscan` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ShortscanExitCode {}

impl ShortscanExitCode {
    /// No errors occurred and shortscan exited normally.
    pub const OK: i32 = 0;

    /// An error occurred before scanning began: an invalid config, invalid arguments, or a
    /// failed prompt.
    pub const SETUP_ERROR: i32 = 96;

    /// Scanning the log directory failed, either on I/O or on a malformed line.
    pub const SCAN_FAILED: i32 = 97;

    /// Running the test command to generate a new log failed.
    pub const GENERATE_FAILED: i32 = 98;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
