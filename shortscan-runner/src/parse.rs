// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing individual lines of `forge test` output.
//!
//! Only a handful of line shapes matter:
//!
//! * `Test result: ...` marks the end of the test listing. Nothing after it is inspected.
//! * Lines containing `[PASS` or `[FAIL` describe the outcome of one test case, for example:
//!
//!   ```text
//!   [PASS] test_short_all_DAI_using_WETH(uint256) (runs: 256, μ: 1234, ~: 1234)
//!   [FAIL. Reason: Arithmetic over/underflow Counterexample: calldata=0x, args=[1]] test_short_all_DAI_using_USDC(uint256) (runs: 3, μ: 0, ~: 0)
//!   ```
//!
//! * Everything else is ignored.
//!
//! Fields are extracted positionally, by looking for fixed prefix and suffix literals. For each
//! field the text starts after the first occurrence of the prefix, and ends at the last
//! occurrence of the suffix after that.

use crate::errors::LineErrorKind;
use std::fmt;

const SUMMARY_PREFIX: &str = "Test result:";
const PASS_MARKER: &str = "[PASS";
const FAIL_MARKER: &str = "[FAIL";
const PASS_TOKEN: &str = "PASS";

/// A single classified log line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LogLine<'a> {
    /// The final summary line. Remaining lines in the file are not inspected.
    Summary,

    /// The outcome of a single test case.
    Outcome(LineOutcome<'a>),

    /// A line that doesn't matter.
    Ignored,
}

/// The outcome of a single test case, borrowed from the log line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineOutcome<'a> {
    /// The short token.
    pub short: &'a str,

    /// The collateral token.
    pub collateral: &'a str,

    /// Whether the test passed, and if not, why.
    pub result: LineResult<'a>,
}

/// Pass, or failure along with its reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineResult<'a> {
    /// The test passed.
    Pass,

    /// The test failed for the given reason.
    Fail {
        /// The literal reason text.
        reason: &'a str,
    },
}

/// A delimited field within an outcome line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineField {
    /// The four-letter result token (`PASS` or `FAIL`).
    Result,
    /// The short token, between `test_short_all_` and `_using`.
    ShortToken,
    /// The collateral token, between `using_` and `(uint256`.
    CollateralToken,
    /// The failure reason, between `Reason: ` and ` Counterexample`.
    Reason,
}

impl LineField {
    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            LineField::Result => ("", ""),
            LineField::ShortToken => ("test_short_all_", "_using"),
            LineField::CollateralToken => ("using_", "(uint256"),
            LineField::Reason => ("Reason: ", " Counterexample"),
        }
    }
}

impl fmt::Display for LineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineField::Result => return write!(f, "result token (4 uppercase letters)"),
            LineField::ShortToken => "short token",
            LineField::CollateralToken => "collateral token",
            LineField::Reason => "failure reason",
        };
        let (prefix, suffix) = self.delimiters();
        write!(f, "{name} (between `{prefix}` and `{suffix}`)")
    }
}

/// Classifies a single line of output, with any trailing newline already removed.
pub fn parse_line(line: &str) -> Result<LogLine<'_>, LineErrorKind> {
    if line.starts_with(SUMMARY_PREFIX) {
        return Ok(LogLine::Summary);
    }
    if !line.contains(FAIL_MARKER) && !line.contains(PASS_MARKER) {
        return Ok(LogLine::Ignored);
    }

    let result = result_token(line).ok_or(LineErrorKind::MissingField {
        field: LineField::Result,
    })?;
    let short = extract(line, LineField::ShortToken)?;
    let collateral = extract(line, LineField::CollateralToken)?;

    let result = if result == PASS_TOKEN {
        LineResult::Pass
    } else {
        LineResult::Fail {
            reason: extract(line, LineField::Reason)?,
        }
    };

    Ok(LogLine::Outcome(LineOutcome {
        short,
        collateral,
        result,
    }))
}

/// Returns the first run of four uppercase ASCII letters.
fn result_token(line: &str) -> Option<&str> {
    let mut run = 0;
    for (idx, b) in line.bytes().enumerate() {
        if b.is_ascii_uppercase() {
            run += 1;
            if run == 4 {
                return Some(&line[idx - 3..=idx]);
            }
        } else {
            run = 0;
        }
    }
    None
}

fn extract(line: &str, field: LineField) -> Result<&str, LineErrorKind> {
    let (prefix, suffix) = field.delimiters();
    let missing = || LineErrorKind::MissingField { field };

    let start = line.find(prefix).ok_or_else(missing)? + prefix.len();
    let rest = &line[start..];
    let end = rest.rfind(suffix).ok_or_else(missing)?;
    Ok(&rest[..end])
}
