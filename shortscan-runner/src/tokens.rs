// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token sets and token pairs.
//!
//! Every short test in the suite is named after two tokens: the token being
//! sold short, and the collateral (or base) token backing the position. The
//! set of tokens that can appear is fixed configuration, not something derived
//! from the logs.

use crate::errors::TokenSetError;
use serde::Serialize;
use std::{collections::BTreeSet, fmt};

/// An ordered set of token identifiers.
///
/// Identifiers are sorted lexicographically by byte value, so uppercase symbols sort before
/// lowercase-prefixed ones (`USDC` < `agEUR`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenSet {
    tokens: BTreeSet<String>,
}

impl TokenSet {
    /// Creates a new token set, returning an error if no tokens were specified or if any token
    /// is empty.
    pub fn new(
        kind: TokenKind,
        tokens: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, TokenSetError> {
        let mut set = BTreeSet::new();
        for token in tokens {
            let token = token.into();
            if token.is_empty() || token.chars().any(char::is_whitespace) {
                return Err(TokenSetError::InvalidToken { kind, token });
            }
            set.insert(token);
        }

        if set.is_empty() {
            return Err(TokenSetError::Empty { kind });
        }
        Ok(Self { tokens: set })
    }

    /// Returns the number of tokens in this set.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the set has no tokens. Sets built through [`Self::new`] are never empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns true if the set contains this token.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Iterates over tokens in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(|s| s.as_str())
    }
}

/// The short and collateral token sets used for a scan.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenUniverse {
    short: TokenSet,
    collateral: TokenSet,
}

impl TokenUniverse {
    /// Creates a new universe from a pair of token sets.
    pub fn new(short: TokenSet, collateral: TokenSet) -> Self {
        Self { short, collateral }
    }

    /// Returns the short token set.
    pub fn short(&self) -> &TokenSet {
        &self.short
    }

    /// Returns the collateral token set.
    pub fn collateral(&self) -> &TokenSet {
        &self.collateral
    }

    /// Iterates over every (short, collateral) pair, short-major.
    pub fn pairs(&self) -> impl Iterator<Item = TokenPair> + '_ {
        self.short.iter().flat_map(move |short| {
            self.collateral
                .iter()
                .map(move |collateral| TokenPair::new(short, collateral))
        })
    }
}

/// Which side of a pair a token is on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// The token being sold short.
    Short,
    /// The token backing the short position.
    Collateral,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Short => write!(f, "short"),
            TokenKind::Collateral => write!(f, "collateral"),
        }
    }
}

/// A (short, collateral) token pair.
///
/// Pairs order short-major, collateral-minor.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TokenPair {
    /// The token being sold short.
    pub short: String,
    /// The collateral token.
    pub collateral: String,
}

impl TokenPair {
    /// Creates a new token pair.
    pub fn new(short: impl Into<String>, collateral: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            collateral: collateral.into(),
        }
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.short, self.collateral)
    }
}
