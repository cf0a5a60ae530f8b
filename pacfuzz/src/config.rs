// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt::{Debug, Display};
use std::sync::Once;

use log::{info, warn};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

use crate::{
    ACTIONS, Alphabet, CELLS, EXIT_ACTION, Error, GridMutator, MutationRange, MutationSession,
    RandomStrategy, Seed, SequenceMutator, SessionConfig,
};

const VAR_PREFIX: &str = "PACFUZZ_";

const RNG_SEED_VAR: &str = "PACFUZZ_RNG_SEED";
const MUTATIONS_MIN_VAR: &str = "PACFUZZ_MUTATIONS_MIN";
const MUTATIONS_MAX_VAR: &str = "PACFUZZ_MUTATIONS_MAX";
const ACTIONS_VAR: &str = "PACFUZZ_ACTIONS";
const CELLS_VAR: &str = "PACFUZZ_CELLS";
const EXIT_VAR: &str = "PACFUZZ_EXIT";

const KNOWN_CONFIG_VARS: &[&str] = &[
    RNG_SEED_VAR,
    MUTATIONS_MIN_VAR,
    MUTATIONS_MAX_VAR,
    ACTIONS_VAR,
    CELLS_VAR,
    EXIT_VAR,
];

/// Seed action sequence of the reference campaign.
pub const SEED_ACTIONS_DEFAULT: &str = "SUELDUWRUESLUWDE";

fn param_fallback<T: Debug, E: Display>(
    name: &'static str,
    default_: T,
    use_env_vars: bool,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> T {
    let s = if use_env_vars {
        std::env::var(name).unwrap_or_default()
    } else {
        String::new()
    };
    param_parse(name, &s, default_, parse)
}

// Debug bound on T should really be a Display one.
fn param_parse<T: Debug, E: Display>(
    name: &'static str,
    s: &str,
    default_: T,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> T {
    if s.is_empty() {
        return default_;
    }
    parse(s).unwrap_or_else(|e| {
        warn!("failed to parse {name} value {s:?}, using default {default_:?} ({e})");
        default_
    })
}

fn parse_char(s: &str) -> Result<char, &'static str> {
    let mut it = s.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Ok(c),
        _ => Err("expected a single character"),
    }
}

fn parse_count(s: &str) -> Result<usize, core::num::ParseIntError> {
    let mut s = s.to_owned();
    s.retain(|c| c != '_');
    s.parse()
}

/// Campaign configuration.
///
/// Values set explicitly win; otherwise, when environment variables are
/// enabled, the following are consulted:
/// - `PACFUZZ_RNG_SEED` (hex),
/// - `PACFUZZ_MUTATIONS_MIN`,
/// - `PACFUZZ_MUTATIONS_MAX`,
/// - `PACFUZZ_ACTIONS`,
/// - `PACFUZZ_CELLS`,
/// - `PACFUZZ_EXIT`,
///
/// and defaults are used for the rest. The RNG seed defaults to a fresh random value.
#[must_use]
#[derive(Debug, Default, Clone)]
pub struct Config {
    rng_seed: Option<u64>,
    mutations_min: Option<usize>,
    mutations_max: Option<usize>,
    actions: Option<String>,
    cells: Option<String>,
    exit: Option<char>,
    sequence_mutators: Option<Vec<SequenceMutator>>,
    grid_mutators: Option<Vec<GridMutator>>,
}

impl Config {
    /// Override the pseudo-random seed.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Override the minimum number of mutations per structure.
    pub fn with_mutations_min(mut self, min: usize) -> Self {
        self.mutations_min = Some(min);
        self
    }

    /// Override the maximum number of mutations per structure.
    pub fn with_mutations_max(mut self, max: usize) -> Self {
        self.mutations_max = Some(max);
        self
    }

    /// Override the action alphabet.
    pub fn with_actions(mut self, actions: &str) -> Self {
        self.actions = Some(actions.to_owned());
        self
    }

    /// Override the cell alphabet.
    pub fn with_cells(mut self, cells: &str) -> Self {
        self.cells = Some(cells.to_owned());
        self
    }

    /// Override the exit symbol.
    pub fn with_exit(mut self, exit: char) -> Self {
        self.exit = Some(exit);
        self
    }

    /// Restrict the sequence operators.
    pub fn with_sequence_mutators(mut self, mutators: Vec<SequenceMutator>) -> Self {
        self.sequence_mutators = Some(mutators);
        self
    }

    /// Restrict the grid operators.
    pub fn with_grid_mutators(mut self, mutators: Vec<GridMutator>) -> Self {
        self.grid_mutators = Some(mutators);
        self
    }

    /// Resolve all values and validate them.
    ///
    /// # Errors
    ///
    /// Fails on invalid alphabets, exit symbol, mutation range or operator sets.
    pub fn settings(self, use_env_vars: bool) -> Result<Settings, Error> {
        static CHECK_ENV_ONCE: Once = Once::new();
        if use_env_vars {
            CHECK_ENV_ONCE.call_once(|| {
                for (var, _) in std::env::vars_os() {
                    if let Some(var) = var.to_str()
                        && var.starts_with(VAR_PREFIX)
                        && !KNOWN_CONFIG_VARS.contains(&var)
                    {
                        warn!("unknown environment variable {var}, ignoring");
                    }
                }
            });
        }

        let rng_seed = self.rng_seed.unwrap_or_else(|| {
            param_fallback(RNG_SEED_VAR, None, use_env_vars, |s| {
                u64::from_str_radix(s, 16).map(Some)
            })
            .unwrap_or_else(rand::random)
        });
        let min = self.mutations_min.unwrap_or_else(|| {
            param_fallback(
                MUTATIONS_MIN_VAR,
                MutationRange::DEFAULT.min(),
                use_env_vars,
                parse_count,
            )
        });
        let max = self.mutations_max.unwrap_or_else(|| {
            param_fallback(
                MUTATIONS_MAX_VAR,
                MutationRange::DEFAULT.max(),
                use_env_vars,
                parse_count,
            )
        });
        let actions = self.actions.unwrap_or_else(|| {
            param_fallback(ACTIONS_VAR, ACTIONS.to_owned(), use_env_vars, |s| {
                Ok::<_, &'static str>(s.to_owned())
            })
        });
        let cells = self.cells.unwrap_or_else(|| {
            param_fallback(CELLS_VAR, CELLS.to_owned(), use_env_vars, |s| {
                Ok::<_, &'static str>(s.to_owned())
            })
        });
        let exit = self
            .exit
            .unwrap_or_else(|| param_fallback(EXIT_VAR, EXIT_ACTION, use_env_vars, parse_char));

        let mut session = SessionConfig::new(
            Alphabet::new("action", &actions)?,
            Alphabet::new("cell", &cells)?,
            exit,
            MutationRange::new(min, max)?,
        )?;
        if let Some(m) = self.sequence_mutators {
            session = session.with_sequence_mutators(m)?;
        }
        if let Some(m) = self.grid_mutators {
            session = session.with_grid_mutators(m)?;
        }
        Ok(Settings { rng_seed, session })
    }
}

/// Validated configuration, ready to build strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    rng_seed: u64,
    session: SessionConfig,
}

impl Settings {
    /// Seed of the pseudo-random source.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Mutation session parameters.
    #[must_use]
    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }

    fn rng(&self) -> ChaCha8Rng {
        let seed = self.rng_seed;
        info!("rng seed {seed:x} (set {RNG_SEED_VAR}={seed:x} to reproduce)");
        ChaCha8Rng::seed_from_u64(self.rng_seed)
    }

    /// Build a mutation session around `seed`.
    ///
    /// # Errors
    ///
    /// Fails when `seed` uses symbols outside the configured alphabets.
    pub fn mutation_session(&self, seed: Seed) -> Result<MutationSession<ChaCha8Rng>, Error> {
        MutationSession::new(self.session.clone(), seed, self.rng())
    }

    /// Build a structure-unaware random strategy.
    #[must_use]
    pub fn random_strategy(&self) -> RandomStrategy<ChaCha8Rng> {
        RandomStrategy::new(self.session.actions().clone(), self.rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Strategy as _,
        tests::{grid, seq},
    };

    #[test]
    fn defaults() {
        let settings = Config::default().with_rng_seed(1).settings(false).unwrap();
        let s = settings.session_config();
        assert_eq!(settings.rng_seed(), 1);
        assert_eq!(s.actions(), &Alphabet::actions());
        assert_eq!(s.cells(), &Alphabet::cells());
        assert_eq!(s.exit(), EXIT_ACTION);
        assert_eq!(s.mutations(), MutationRange::DEFAULT);
    }

    #[test]
    fn explicit_values_are_validated() {
        let c = Config::default().with_rng_seed(0);
        assert!(matches!(
            c.clone().with_mutations_min(0).settings(false),
            Err(Error::InvalidMutationRange { min: 0, .. })
        ));
        assert!(matches!(
            c.clone().with_mutations_min(5).with_mutations_max(2).settings(false),
            Err(Error::InvalidMutationRange { min: 5, max: 2 })
        ));
        assert!(matches!(
            c.clone().with_actions("UDSQ").settings(false),
            Err(Error::ExitNotInAlphabet('E'))
        ));
        assert!(matches!(
            c.clone().with_cells("").settings(false),
            Err(Error::EmptyAlphabet { name: "cell" })
        ));
        assert!(matches!(
            c.with_grid_mutators(vec![]).settings(false),
            Err(Error::NoMutators("grid"))
        ));
    }

    #[test]
    fn same_rng_seed_same_stream() {
        let settings = Config::default().with_rng_seed(0xc0ffee).settings(false).unwrap();
        let seed = Seed {
            sequence: seq(SEED_ACTIONS_DEFAULT),
            grid: grid(&["0WPF", "0MF0"]),
        };
        let mut a = settings.mutation_session(seed.clone()).unwrap();
        let mut b = settings.mutation_session(seed).unwrap();
        for _ in 0..16 {
            assert_eq!(a.next_input(), b.next_input());
        }
        let mut a = settings.random_strategy();
        let mut b = settings.random_strategy();
        assert_eq!(a.next_input(), b.next_input());
    }

    #[test]
    fn param_parse_falls_back() {
        assert_eq!(param_parse("X", "", 3, parse_count), 3);
        assert_eq!(param_parse("X", "1_000", 3, parse_count), 1000);
        assert_eq!(param_parse("X", "many", 3, parse_count), 3);
        assert_eq!(param_parse("X", "Q", 'E', parse_char), 'Q');
        assert_eq!(param_parse("X", "QE", 'E', parse_char), 'E');
    }
}
