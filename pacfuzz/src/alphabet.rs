// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt::{self, Display};

use rand::Rng;

use crate::Error;

/// Actions understood by the target: up, down, left, right, start, exit, quit, wait.
pub const ACTIONS: &str = "UDLRSEQW";

/// The action that makes the target terminate cleanly.
pub const EXIT_ACTION: char = 'E';

/// Map cells: empty, wall, player, food, monster.
pub const CELLS: &str = "0WPFM";

/// A finite, ordered set of symbols that mutators draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    name: &'static str,
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet, rejecting empty and duplicated symbol lists.
    ///
    /// `name` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Fails when `symbols` is empty or contains the same symbol twice.
    pub fn new(name: &'static str, symbols: &str) -> Result<Self, Error> {
        let mut v: Vec<char> = Vec::with_capacity(symbols.len());
        for symbol in symbols.chars() {
            if v.contains(&symbol) {
                return Err(Error::DuplicateSymbol { name, symbol });
            }
            v.push(symbol);
        }
        if v.is_empty() {
            return Err(Error::EmptyAlphabet { name });
        }
        Ok(Self { name, symbols: v })
    }

    /// The default action alphabet, [`ACTIONS`].
    #[must_use]
    pub fn actions() -> Self {
        Self {
            name: "action",
            symbols: ACTIONS.chars().collect(),
        }
    }

    /// The default map cell alphabet, [`CELLS`].
    #[must_use]
    pub fn cells() -> Self {
        Self {
            name: "cell",
            symbols: CELLS.chars().collect(),
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Symbols in declaration order.
    #[must_use]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Number of symbols (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether `symbol` belongs to the alphabet.
    #[must_use]
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Check that every symbol of `symbols` belongs to the alphabet.
    ///
    /// # Errors
    ///
    /// Returns the first symbol that does not.
    pub fn validate(&self, mut symbols: impl Iterator<Item = char>) -> Result<(), Error> {
        match symbols.find(|&s| !self.contains(s)) {
            Some(symbol) => Err(Error::UnknownSymbol {
                name: self.name,
                symbol,
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.symbols[rng.gen_range(0..self.symbols.len())]
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
