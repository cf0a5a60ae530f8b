// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::{
    fmt::{self, Display},
    str::FromStr,
};

use rand::Rng;

use crate::{Alphabet, Error};

/// An ordered list of action symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sequence {
    symbols: Vec<char>,
}

impl Sequence {
    /// Parse a sequence, checking every symbol against `alphabet`.
    ///
    /// # Errors
    ///
    /// Fails on the first symbol not in `alphabet`.
    pub fn parse(s: &str, alphabet: &Alphabet) -> Result<Self, Error> {
        alphabet.validate(s.chars())?;
        Ok(s.chars().collect())
    }

    /// Symbols in order.
    #[must_use]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the sequence has no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether the last symbol is `symbol`. An empty sequence ends with nothing.
    #[must_use]
    pub fn ends_with(&self, symbol: char) -> bool {
        self.symbols.last() == Some(&symbol)
    }

    /// Copy with `symbol` spliced in before position `pos` (`pos == len` appends).
    #[must_use]
    #[track_caller]
    pub fn inserted(&self, pos: usize, symbol: char) -> Self {
        assert!(pos <= self.len(), "insert position {pos} out of 0..={}", self.len());
        let mut symbols = Vec::with_capacity(self.len() + 1);
        symbols.extend_from_slice(&self.symbols[..pos]);
        symbols.push(symbol);
        symbols.extend_from_slice(&self.symbols[pos..]);
        Self { symbols }
    }

    /// Copy without the symbol at `pos`.
    #[must_use]
    #[track_caller]
    pub fn removed(&self, pos: usize) -> Self {
        assert!(pos < self.len(), "delete position {pos} out of 0..{}", self.len());
        let mut symbols = self.symbols.clone();
        symbols.remove(pos);
        Self { symbols }
    }

    /// Copy with the symbol at `pos` overwritten by `symbol`.
    #[must_use]
    #[track_caller]
    pub fn replaced(&self, pos: usize, symbol: char) -> Self {
        assert!(pos < self.len(), "replace position {pos} out of 0..{}", self.len());
        let mut symbols = self.symbols.clone();
        symbols[pos] = symbol;
        Self { symbols }
    }
}

impl FromStr for Sequence {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.chars().collect())
    }
}

impl FromIterator<char> for Sequence {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Structural edits of a [`Sequence`].
///
/// Every operator is total: degenerate inputs yield a no-op instead of an error,
/// so operators can be chained in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceMutator {
    /// Splice a random symbol in at a random position in `0..=len`.
    Insert,
    /// Remove the symbol at a random position; no-op when empty.
    Delete,
    /// Overwrite the symbol at a random position; no-op when empty.
    Replace,
}

impl SequenceMutator {
    /// All operators, in a fixed order.
    pub const ALL: [Self; 3] = [Self::Insert, Self::Delete, Self::Replace];

    /// Short kebab-case name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Replace => "replace",
        }
    }

    /// Apply the operator to a copy of `seq`.
    pub fn apply<R: Rng + ?Sized>(
        self,
        seq: &Sequence,
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> Sequence {
        match self {
            Self::Insert => {
                let pos = rng.gen_range(0..=seq.len());
                seq.inserted(pos, alphabet.choose(rng))
            }
            Self::Delete if seq.is_empty() => seq.clone(),
            Self::Delete => seq.removed(rng.gen_range(0..seq.len())),
            Self::Replace if seq.is_empty() => seq.clone(),
            Self::Replace => {
                let pos = rng.gen_range(0..seq.len());
                seq.replaced(pos, alphabet.choose(rng))
            }
        }
    }
}

impl FromStr for SequenceMutator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown sequence mutator {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use chaos_theory::check;
    use rand::SeedableRng as _;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::tests::{any_sequence, seq};

    #[test]
    fn insert_grows_by_one() {
        check(|src| {
            let seq = any_sequence(src);
            let mut rng = ChaCha8Rng::seed_from_u64(src.any("rng"));
            let out = SequenceMutator::Insert.apply(&seq, &Alphabet::actions(), &mut rng);
            assert_eq!(out.len(), seq.len() + 1);
        });
    }

    #[test]
    fn delete_shrinks_by_one_or_stays_empty() {
        check(|src| {
            let seq = any_sequence(src);
            let mut rng = ChaCha8Rng::seed_from_u64(src.any("rng"));
            let out = SequenceMutator::Delete.apply(&seq, &Alphabet::actions(), &mut rng);
            assert_eq!(out.len(), seq.len().saturating_sub(1));
        });
    }

    #[test]
    fn replace_keeps_length() {
        check(|src| {
            let seq = any_sequence(src);
            let mut rng = ChaCha8Rng::seed_from_u64(src.any("rng"));
            let out = SequenceMutator::Replace.apply(&seq, &Alphabet::actions(), &mut rng);
            assert_eq!(out.len(), seq.len());
            let diff = seq
                .symbols()
                .iter()
                .zip(out.symbols())
                .filter(|(a, b)| a != b)
                .count();
            assert!(diff <= 1);
        });
    }

    #[test]
    fn empty_is_fixed_point_of_delete_and_replace() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let empty = Sequence::default();
        for m in [SequenceMutator::Delete, SequenceMutator::Replace] {
            assert_eq!(m.apply(&empty, &Alphabet::actions(), &mut rng), empty);
        }
    }

    #[test]
    fn lengths_from_short_inputs() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let a = Alphabet::actions();
        for (s, ins, del, rpl) in [("", 1, 0, 0), ("E", 2, 0, 1), ("UE", 3, 1, 2)] {
            let seq = seq(s);
            assert_eq!(SequenceMutator::Insert.apply(&seq, &a, &mut rng).len(), ins);
            assert_eq!(SequenceMutator::Delete.apply(&seq, &a, &mut rng).len(), del);
            assert_eq!(SequenceMutator::Replace.apply(&seq, &a, &mut rng).len(), rpl);
        }
    }

    #[test]
    fn input_is_left_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let seq = seq("SUE");
        for m in SequenceMutator::ALL {
            let _ = m.apply(&seq, &Alphabet::actions(), &mut rng);
            assert_eq!(seq.to_string(), "SUE");
        }
    }

    #[test]
    fn positional_edits() {
        let seq = seq("SE");
        assert_eq!(seq.inserted(0, 'U').to_string(), "USE");
        assert_eq!(seq.inserted(1, 'U').to_string(), "SUE");
        assert_eq!(seq.inserted(2, 'U').to_string(), "SEU");
        assert_eq!(seq.removed(0).to_string(), "E");
        assert_eq!(seq.replaced(1, 'Q').to_string(), "SQ");
    }

    #[test]
    #[should_panic(expected = "delete position")]
    fn removed_out_of_range_panics() {
        let _ = Sequence::default().removed(0);
    }

    #[test]
    fn parse_checks_alphabet() {
        assert!(Sequence::parse("SUELDUWRUESLUWDE", &Alphabet::actions()).is_ok());
        assert!(matches!(
            Sequence::parse("SUX", &Alphabet::actions()),
            Err(Error::UnknownSymbol { symbol: 'X', .. })
        ));
    }

    #[test]
    fn ends_with() {
        assert!(!Sequence::default().ends_with('E'));
        assert!(seq("SE").ends_with('E'));
        assert!(!seq("ES").ends_with('E'));
    }

    #[test]
    fn mutator_names_roundtrip() {
        for m in SequenceMutator::ALL {
            assert_eq!(m.name().parse::<SequenceMutator>(), Ok(m));
        }
        assert!("swap".parse::<SequenceMutator>().is_err());
    }
}
