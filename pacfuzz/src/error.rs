// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

/// Boxed error returned by a [`Target`](crate::Target) implementation.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// Errors produced while configuring or running a fuzzing campaign.
///
/// Mutators themselves are total and never fail; everything here is either
/// a configuration problem detected before the first iteration, or a broken
/// contract with the target program detected during the run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An alphabet has no symbols.
    #[error("{name} alphabet is empty")]
    EmptyAlphabet {
        /// Which alphabet.
        name: &'static str,
    },
    /// An alphabet lists the same symbol twice.
    #[error("{name} alphabet contains {symbol:?} more than once")]
    DuplicateSymbol {
        /// Which alphabet.
        name: &'static str,
        /// The repeated symbol.
        symbol: char,
    },
    /// A seed uses a symbol outside of its alphabet.
    #[error("symbol {symbol:?} is not in the {name} alphabet")]
    UnknownSymbol {
        /// Which alphabet.
        name: &'static str,
        /// The offending symbol.
        symbol: char,
    },
    /// The exit symbol is not part of the action alphabet.
    #[error("exit symbol {0:?} is not in the action alphabet")]
    ExitNotInAlphabet(char),
    /// Grid rows have different lengths.
    #[error("row {row} has width {width}, expected {expected}")]
    RaggedGrid {
        /// Index of the first row with a mismatching width.
        row: usize,
        /// Its width.
        width: usize,
        /// Width of the first row.
        expected: usize,
    },
    /// Neither an iteration nor a time budget was selected.
    #[error("no quit condition: either an iteration count or a time budget is required")]
    NoQuitCondition,
    /// Both an iteration and a time budget were selected.
    #[error("conflicting quit conditions: an iteration count and a time budget are exclusive")]
    ConflictingQuitConditions,
    /// The time budget does not fit the platform clock.
    #[error("time budget of {0}s is too large")]
    TimeBudgetOverflow(u64),
    /// The mutation count range is empty or allows zero mutations.
    #[error("invalid mutation count range {min}..={max} (need 1 <= min <= max)")]
    InvalidMutationRange {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// No mutation operator is enabled for a structure.
    #[error("no {0} mutators enabled")]
    NoMutators(&'static str),
    /// Two target outcomes share the same exit code.
    #[error("exit code {0} is assigned to more than one outcome")]
    AmbiguousExitCode(i32),
    /// The target returned an exit code outside the known set.
    #[error("unknown target exit code: {0}")]
    UnknownStatus(i32),
    /// The target could not be run.
    #[error("target invocation failed")]
    Target(#[source] BoxError),
    /// Writing to the record sink failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Wrap an arbitrary target invocation failure.
    pub fn target(err: impl Into<BoxError>) -> Self {
        Self::Target(err.into())
    }
}
