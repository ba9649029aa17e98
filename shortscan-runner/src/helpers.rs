// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for shortscan-runner.

/// Utilities for pluralizing various words based on count or plurality.
pub mod plural {
    /// Returns "iteration" if `count` is 1, otherwise "iterations".
    pub fn iterations_str(count: usize) -> &'static str {
        if count == 1 {
            "iteration"
        } else {
            "iterations"
        }
    }

    /// Returns "line" if `count` is 1, otherwise "lines".
    pub fn lines_str(count: usize) -> &'static str {
        if count == 1 { "line" } else { "lines" }
    }

    /// Returns "was" if `count` is 1, otherwise "were".
    pub fn were_str(count: usize) -> &'static str {
        if count == 1 { "was" } else { "were" }
    }
}
