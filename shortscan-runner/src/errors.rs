// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by shortscan.

use crate::{parse::LineField, tokens::TokenKind};
use camino::Utf8PathBuf;
use config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// An error that occurred while constructing a [`TokenSet`](crate::tokens::TokenSet).
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum TokenSetError {
    /// No tokens were specified.
    #[error("no {kind} tokens were specified (at least one is required)")]
    Empty {
        /// The kind of token set.
        kind: TokenKind,
    },

    /// A token was empty or contained whitespace.
    #[error("invalid {kind} token `{token}` (tokens must be non-empty and contain no whitespace)")]
    InvalidToken {
        /// The kind of token set.
        kind: TokenKind,

        /// The invalid token.
        token: String,
    },
}

/// An error that occurred while parsing the shortscan config.
#[derive(Debug, Error)]
#[error("failed to parse shortscan config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building or deserializing the config.
    #[error(transparent)]
    DeserializeError(ConfigError),

    /// A token list in the config was invalid.
    #[error(transparent)]
    InvalidTokens(TokenSetError),
}

/// Why a single log line could not be turned into an outcome.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum LineErrorKind {
    /// The line had a pass or fail marker, but an expected field was missing.
    #[error("outcome line is missing the {field}")]
    MissingField {
        /// The field that was missing.
        field: LineField,
    },

    /// A token extracted from the line is not in the configured token set.
    #[error("{kind} token `{token}` is not in the configured {kind} tokens")]
    UnknownToken {
        /// Which token set was consulted.
        kind: TokenKind,

        /// The token as it appeared in the line.
        token: String,
    },
}

/// A malformed line, along with where it was found.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{path}:{line_number}: {kind}")]
pub struct LineError {
    path: Utf8PathBuf,
    line_number: usize,
    line: String,
    kind: LineErrorKind,
}

impl LineError {
    pub(crate) fn new(
        path: impl Into<Utf8PathBuf>,
        line_number: usize,
        line: impl Into<String>,
        kind: LineErrorKind,
    ) -> Self {
        Self {
            path: path.into(),
            line_number,
            line: line.into(),
            kind,
        }
    }

    /// Returns the log file the line was found in.
    pub fn path(&self) -> &Utf8PathBuf {
        &self.path
    }

    /// Returns the 1-based line number.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the text of the line.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> &LineErrorKind {
        &self.kind
    }
}

/// An error that occurred while scanning a log directory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScanError {
    /// The log directory could not be read.
    #[error("error reading log directory `{dir}`")]
    ReadDir {
        /// The log directory.
        dir: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },

    /// A path in the log directory was not valid UTF-8.
    #[error("log path `{}` is not valid UTF-8", path.display())]
    NonUtf8Path {
        /// The path.
        path: PathBuf,
    },

    /// A log file could not be read.
    #[error("error reading log file `{path}`")]
    ReadFile {
        /// The log file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },

    /// A log line was malformed and the scan was configured to abort.
    #[error("malformed log line")]
    MalformedLine(#[source] Box<LineError>),
}

impl ScanError {
    /// Returns the malformed line that caused this error, if any.
    pub fn line_error(&self) -> Option<&LineError> {
        match self {
            ScanError::MalformedLine(err) => Some(err),
            _ => None,
        }
    }
}

/// An error that occurred while generating a new test log.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerateLogError {
    /// The log directory could not be created.
    #[error("error creating log directory `{dir}`")]
    CreateDir {
        /// The log directory.
        dir: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },

    /// The log file could not be created.
    #[error("error creating log file `{path}`")]
    CreateFile {
        /// The log file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },

    /// The test command could not be executed.
    #[error("error executing `{command}`")]
    Exec {
        /// The command, joined shell-style.
        command: String,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },
}

/// An error that occurs while writing a report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// An error occurred while writing the report to the provided output.
    #[error("error writing to output")]
    Io(#[from] std::io::Error),

    /// An error occurred while serializing the report.
    #[error("error serializing report to JSON")]
    Json(#[from] serde_json::Error),
}
