// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summarize repeated `forge test` runs of short positions, per token pair.
//!
//! For the scanning and reporting logic, see the `shortscan-runner` crate.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;
#[cfg(test)]
mod tests_integration;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
