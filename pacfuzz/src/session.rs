// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::debug;
use rand::Rng;

use crate::{Alphabet, Error, Grid, GridMutator, Input, Sequence, SequenceMutator, Strategy};

/// Inclusive range of mutation counts drawn per structure and iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationRange {
    min: usize,
    max: usize,
}

impl MutationRange {
    /// Mutation count range used when nothing else is configured.
    pub const DEFAULT: Self = Self { min: 1, max: 10 };

    /// Build a range; at least one mutation must always be applied.
    ///
    /// # Errors
    ///
    /// Fails unless `1 <= min <= max`.
    pub fn new(min: usize, max: usize) -> Result<Self, Error> {
        if min < 1 || min > max {
            return Err(Error::InvalidMutationRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    #[must_use]
    pub fn min(self) -> usize {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(self) -> usize {
        self.max
    }

    pub(crate) fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> usize {
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for MutationRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Immutable parameters of a [`MutationSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    actions: Alphabet,
    cells: Alphabet,
    exit: char,
    mutations: MutationRange,
    sequence_mutators: Vec<SequenceMutator>,
    grid_mutators: Vec<GridMutator>,
}

impl SessionConfig {
    /// Configure a session with every mutator enabled.
    ///
    /// # Errors
    ///
    /// Fails when `exit` is not in `actions`.
    pub fn new(
        actions: Alphabet,
        cells: Alphabet,
        exit: char,
        mutations: MutationRange,
    ) -> Result<Self, Error> {
        if !actions.contains(exit) {
            return Err(Error::ExitNotInAlphabet(exit));
        }
        Ok(Self {
            actions,
            cells,
            exit,
            mutations,
            sequence_mutators: SequenceMutator::ALL.to_vec(),
            grid_mutators: GridMutator::ALL.to_vec(),
        })
    }

    /// Restrict the sequence operators the session picks from.
    ///
    /// # Errors
    ///
    /// Fails when `mutators` is empty.
    pub fn with_sequence_mutators(mut self, mutators: Vec<SequenceMutator>) -> Result<Self, Error> {
        if mutators.is_empty() {
            return Err(Error::NoMutators("sequence"));
        }
        self.sequence_mutators = mutators;
        Ok(self)
    }

    /// Restrict the grid operators the session picks from.
    ///
    /// # Errors
    ///
    /// Fails when `mutators` is empty.
    pub fn with_grid_mutators(mut self, mutators: Vec<GridMutator>) -> Result<Self, Error> {
        if mutators.is_empty() {
            return Err(Error::NoMutators("grid"));
        }
        self.grid_mutators = mutators;
        Ok(self)
    }

    /// Action alphabet.
    #[must_use]
    pub fn actions(&self) -> &Alphabet {
        &self.actions
    }

    /// Cell alphabet.
    #[must_use]
    pub fn cells(&self) -> &Alphabet {
        &self.cells
    }

    /// Symbol every submitted sequence must end with.
    #[must_use]
    pub fn exit(&self) -> char {
        self.exit
    }

    /// Mutation count range.
    #[must_use]
    pub fn mutations(&self) -> MutationRange {
        self.mutations
    }
}

/// The starting point of every mutation chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    /// Seed action sequence.
    pub sequence: Sequence,
    /// Seed map.
    pub grid: Grid,
}

/// A mutated (sequence, grid) pair produced by one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Mutated actions; always ends with the exit symbol.
    pub sequence: Sequence,
    /// Mutated map.
    pub grid: Grid,
}

impl Candidate {
    /// External form handed to the target.
    #[must_use]
    pub fn render(&self) -> Input {
        Input {
            actions: self.sequence.to_string(),
            map: self.grid.to_string().into_bytes(),
        }
    }
}

/// Mutation-based generation: every iteration applies a random number of
/// random operators to fresh copies of the same seed.
#[derive(Debug)]
pub struct MutationSession<R> {
    config: SessionConfig,
    seed: Seed,
    rng: R,
}

impl<R: Rng> MutationSession<R> {
    /// Create a session after checking the seed against the configured alphabets.
    ///
    /// # Errors
    ///
    /// Fails when a seed symbol lies outside its alphabet.
    pub fn new(config: SessionConfig, seed: Seed, rng: R) -> Result<Self, Error> {
        config.actions.validate(seed.sequence.symbols().iter().copied())?;
        config
            .cells
            .validate(seed.grid.rows().iter().flatten().copied())?;
        Ok(Self { config, seed, rng })
    }

    /// Session parameters.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The seed pair.
    #[must_use]
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// A mutated copy of the seed sequence.
    pub fn mutate_sequence(&mut self) -> Sequence {
        let n = self.config.mutations.draw(&mut self.rng);
        let mut seq = self.seed.sequence.clone();
        let ops = &self.config.sequence_mutators;
        for _ in 0..n {
            let m = ops[self.rng.gen_range(0..ops.len())];
            seq = m.apply(&seq, &self.config.actions, &mut self.rng);
        }
        seq
    }

    /// A mutated copy of the seed grid.
    pub fn mutate_grid(&mut self) -> Grid {
        let n = self.config.mutations.draw(&mut self.rng);
        let mut grid = self.seed.grid.clone();
        let ops = &self.config.grid_mutators;
        for _ in 0..n {
            let m = ops[self.rng.gen_range(0..ops.len())];
            grid = m.apply(&grid, &self.config.cells, &mut self.rng);
        }
        grid
    }

    /// Produce the next candidate, or `None` when the mutated sequence no
    /// longer ends with the exit symbol. The grid is only mutated for
    /// candidates that survive the check.
    pub fn next_candidate(&mut self) -> Option<Candidate> {
        let sequence = self.mutate_sequence();
        if !sequence.ends_with(self.config.exit) {
            debug!("discarding {sequence:?}: does not end with {:?}", self.config.exit);
            return None;
        }
        let grid = self.mutate_grid();
        Some(Candidate { sequence, grid })
    }
}

impl<R: Rng> Strategy for MutationSession<R> {
    fn name(&self) -> &'static str {
        "mutation"
    }

    fn next_input(&mut self) -> Option<Input> {
        self.next_candidate().map(|c| c.render())
    }
}
