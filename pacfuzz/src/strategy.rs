// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rand::Rng;

use crate::Alphabet;

/// A rendered test input: the action string and the raw map file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    /// Flat action string passed as one argument.
    pub actions: String,
    /// Map file bytes, rows joined by `\n` for grid-based strategies.
    pub map: Vec<u8>,
}

/// A source of test inputs driven by the run loop.
pub trait Strategy {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Next input, or `None` when this iteration's candidate was discarded.
    /// A discarded candidate still consumes an iteration.
    fn next_input(&mut self) -> Option<Input>;
}

/// Maximum length of a random action string.
pub const RANDOM_ACTIONS_MAX_LEN: usize = 4;

/// Maximum length of a random map, in bytes.
pub const RANDOM_MAP_MAX_LEN: usize = 100;

/// Structure-unaware generation: uniformly random actions and map bytes.
///
/// Lengths are drawn from `0..=max` so that empty, single and multi-element
/// inputs all occur.
#[derive(Debug)]
pub struct RandomStrategy<R> {
    actions: Alphabet,
    max_actions_len: usize,
    max_map_len: usize,
    rng: R,
}

impl<R: Rng> RandomStrategy<R> {
    /// Create a random strategy with the default length limits.
    pub fn new(actions: Alphabet, rng: R) -> Self {
        Self {
            actions,
            max_actions_len: RANDOM_ACTIONS_MAX_LEN,
            max_map_len: RANDOM_MAP_MAX_LEN,
            rng,
        }
    }

    /// Override the maximum action string length.
    #[must_use]
    pub fn with_max_actions_len(mut self, len: usize) -> Self {
        self.max_actions_len = len;
        self
    }

    /// Override the maximum map length.
    #[must_use]
    pub fn with_max_map_len(mut self, len: usize) -> Self {
        self.max_map_len = len;
        self
    }
}

impl<R: Rng> Strategy for RandomStrategy<R> {
    fn name(&self) -> &'static str {
        "random"
    }

    fn next_input(&mut self) -> Option<Input> {
        let n = self.rng.gen_range(0..=self.max_actions_len);
        let actions = (0..n).map(|_| self.actions.choose(&mut self.rng)).collect();
        let mut map = vec![0u8; self.rng.gen_range(0..=self.max_map_len)];
        self.rng.fill(map.as_mut_slice());
        Some(Input { actions, map })
    }
}
