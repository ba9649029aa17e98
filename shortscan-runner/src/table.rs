// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-pair, per-outcome counter table.

use crate::{
    errors::LineErrorKind,
    outcome::OutcomeKind,
    tokens::{TokenKind, TokenPair, TokenUniverse},
};
use std::collections::BTreeMap;

/// Counts of each outcome kind, for a single token pair.
///
/// Every known [`OutcomeKind`] is always present, starting at zero. [`OutcomeKind::Other`]
/// entries are added the first time they're recorded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PairCounts {
    counts: BTreeMap<OutcomeKind, usize>,
}

impl PairCounts {
    fn new() -> Self {
        Self {
            counts: OutcomeKind::KNOWN.iter().map(|kind| (kind.clone(), 0)).collect(),
        }
    }

    /// Returns the count for this outcome kind.
    pub fn get(&self, kind: &OutcomeKind) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    /// Returns the number of passes.
    pub fn passes(&self) -> usize {
        self.get(&OutcomeKind::Pass)
    }

    /// Returns the total number of recorded outcomes across all kinds.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Iterates over outcome kinds with a non-zero count, in [`OutcomeKind`] order.
    pub fn non_zero(&self) -> impl Iterator<Item = (&OutcomeKind, usize)> + '_ {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(kind, count)| (kind, *count))
    }

    fn increment(&mut self, kind: OutcomeKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }
}

/// A table of outcome counts keyed by (short token, collateral token, outcome kind).
///
/// The table is created with a zeroed row for every pair in a [`TokenUniverse`], and only ever
/// grows through [`record`](Self::record).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultTable {
    // short -> collateral -> counts
    rows: BTreeMap<String, BTreeMap<String, PairCounts>>,
}

impl ResultTable {
    /// Creates a zeroed table for every pair in the universe.
    pub fn new(universe: &TokenUniverse) -> Self {
        let rows = universe
            .short()
            .iter()
            .map(|short| {
                let row = universe
                    .collateral()
                    .iter()
                    .map(|collateral| (collateral.to_owned(), PairCounts::new()))
                    .collect();
                (short.to_owned(), row)
            })
            .collect();
        Self { rows }
    }

    /// Records a single outcome for a pair.
    ///
    /// Returns an error if either token isn't part of the table.
    pub fn record(
        &mut self,
        short: &str,
        collateral: &str,
        kind: OutcomeKind,
    ) -> Result<(), LineErrorKind> {
        let row = self
            .rows
            .get_mut(short)
            .ok_or_else(|| LineErrorKind::UnknownToken {
                kind: TokenKind::Short,
                token: short.to_owned(),
            })?;
        let counts = row
            .get_mut(collateral)
            .ok_or_else(|| LineErrorKind::UnknownToken {
                kind: TokenKind::Collateral,
                token: collateral.to_owned(),
            })?;
        counts.increment(kind);
        Ok(())
    }

    /// Returns the counts for a pair, or `None` if the pair isn't part of the table.
    pub fn get(&self, short: &str, collateral: &str) -> Option<&PairCounts> {
        self.rows.get(short)?.get(collateral)
    }

    /// Returns the number of pairs in the table.
    pub fn pair_count(&self) -> usize {
        self.rows.values().map(|row| row.len()).sum()
    }

    /// Iterates over all pairs, short-major then collateral-minor, both in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenPair, &PairCounts)> + '_ {
        self.rows.iter().flat_map(|(short, row)| {
            row.iter()
                .map(move |(collateral, counts)| (TokenPair::new(short, collateral), counts))
        })
    }
}
