// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome kinds for a single test case.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The classification of a single test case's result.
///
/// Known failure reasons map onto dedicated variants. Any other reason text is carried verbatim
/// in [`OutcomeKind::Other`].
///
/// The derived ordering lists known kinds first in their canonical order, then `Other` reasons
/// sorted by text.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum OutcomeKind {
    /// `EvmError: Revert`.
    Revert,
    /// `EvmError: FatalExternalError`.
    FatalExternalError,
    /// `Arithmetic over/underflow`.
    ArithmeticOverflow,
    /// `Log != expected log`.
    LogMismatch,
    /// `SPL`.
    Spl,
    /// The test passed.
    Pass,
    /// A failure reason that isn't otherwise recognized.
    Other(String),
}

impl OutcomeKind {
    /// Every known (non-`Other`) outcome kind, in canonical order.
    pub const KNOWN: [OutcomeKind; 6] = [
        OutcomeKind::Revert,
        OutcomeKind::FatalExternalError,
        OutcomeKind::ArithmeticOverflow,
        OutcomeKind::LogMismatch,
        OutcomeKind::Spl,
        OutcomeKind::Pass,
    ];

    /// The reason recorded when unknown reasons are bucketed together.
    pub const BUCKETED_REASON: &'static str = "other";

    /// Classifies a failure reason extracted from a log line.
    pub fn from_reason(reason: &str, policy: UnknownReasonPolicy) -> Self {
        match reason {
            "EvmError: Revert" => OutcomeKind::Revert,
            "EvmError: FatalExternalError" => OutcomeKind::FatalExternalError,
            "Arithmetic over/underflow" => OutcomeKind::ArithmeticOverflow,
            "Log != expected log" => OutcomeKind::LogMismatch,
            "SPL" => OutcomeKind::Spl,
            other => match policy {
                UnknownReasonPolicy::Track => OutcomeKind::Other(other.to_owned()),
                UnknownReasonPolicy::Bucket => OutcomeKind::Other(Self::BUCKETED_REASON.to_owned()),
            },
        }
    }

    /// Returns the text shown for this outcome: the literal reason as it appears in logs.
    pub fn label(&self) -> &str {
        match self {
            OutcomeKind::Revert => "EvmError: Revert",
            OutcomeKind::FatalExternalError => "EvmError: FatalExternalError",
            OutcomeKind::ArithmeticOverflow => "Arithmetic over/underflow",
            OutcomeKind::LogMismatch => "Log != expected log",
            OutcomeKind::Spl => "SPL",
            OutcomeKind::Pass => "PASS",
            OutcomeKind::Other(reason) => reason,
        }
    }

    /// Returns true if this is [`OutcomeKind::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, OutcomeKind::Pass)
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OutcomeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// What to do with failure reasons that don't match a known [`OutcomeKind`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownReasonPolicy {
    /// Track every distinct reason separately.
    #[default]
    Track,

    /// Fold all unknown reasons into a single catch-all.
    Bucket,
}
