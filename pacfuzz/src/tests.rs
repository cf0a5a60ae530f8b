// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chaos_theory::{Source, make};

use crate::{ACTIONS, Alphabet, CELLS, Error, Grid, Input, Sequence};

pub(crate) fn seq(s: &str) -> Sequence {
    s.chars().collect()
}

pub(crate) fn grid(rows: &[&str]) -> Grid {
    Grid::from_rows(rows).unwrap()
}

pub(crate) fn any_sequence(src: &mut Source) -> Sequence {
    let actions: Vec<char> = ACTIONS.chars().collect();
    let s: String = src.any_of("sequence", make::string(make::one_of(&actions)));
    seq(&s)
}

pub(crate) fn any_grid(src: &mut Source) -> Grid {
    let cells: Vec<char> = CELLS.chars().collect();
    let height = src.any_of("height", make::int_in_range(0..=6usize));
    let width = src.any_of("width", make::int_in_range(0..=6usize));
    let rows = (0..height)
        .map(|_| {
            let row: String =
                src.any_of("row", make::string_with_size(make::one_of(&cells), width..=width));
            row.chars().collect()
        })
        .collect();
    Grid::new(rows).unwrap()
}

#[track_caller]
pub(crate) fn assert_rectangular(g: &Grid) {
    let width = g.width();
    assert!(
        g.rows().iter().all(|r| r.len() == width),
        "grid is not rectangular: {g:?}"
    );
}

mod scenarios {
    use chaos_theory::check;
    use rand::SeedableRng as _;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::{
        EXIT_ACTION, ExitCodes, GridMutator, MutationRange, MutationSession, QuitCondition,
        Recorder, Seed, SequenceMutator, SessionConfig, run,
    };

    #[test]
    fn long_operator_chains_stay_rectangular() {
        check(|src| {
            let mut g = any_grid(src);
            let mut rng = ChaCha8Rng::seed_from_u64(src.any("rng"));
            let steps = src.any_of("steps", make::int_in_range(0..=32usize));
            for _ in 0..steps {
                let (&m, _) = src.choose("mutator", &GridMutator::ALL).unwrap();
                g = m.apply(&g, &Alphabet::cells(), &mut rng);
                assert_rectangular(&g);
            }
        });
    }

    #[test]
    fn sequence_chains_track_length() {
        check(|src| {
            let mut s = any_sequence(src);
            let mut rng = ChaCha8Rng::seed_from_u64(src.any("rng"));
            let steps = src.any_of("steps", make::int_in_range(0..=32usize));
            for _ in 0..steps {
                let (&m, _) = src.choose("mutator", &SequenceMutator::ALL).unwrap();
                let before = s.len();
                s = m.apply(&s, &Alphabet::actions(), &mut rng);
                let expected = match m {
                    SequenceMutator::Insert => before + 1,
                    SequenceMutator::Delete => before.saturating_sub(1),
                    SequenceMutator::Replace => before,
                };
                assert_eq!(s.len(), expected);
            }
        });
    }

    #[test]
    fn insert_into_start_exit() {
        // Only insertions that keep `E` last survive the exit check.
        let mut survivors = 0;
        for pos in 0..=2 {
            for a in ACTIONS.chars() {
                let out = seq("SE").inserted(pos, a);
                assert_eq!(out.len(), 3);
                if out.ends_with(EXIT_ACTION) {
                    survivors += 1;
                    assert!(pos < 2 || a == EXIT_ACTION);
                }
            }
        }
        assert_eq!(survivors, 2 * ACTIONS.len() + 1);
    }

    #[test]
    fn unknown_exit_code_aborts_campaign() {
        let config = SessionConfig::new(
            Alphabet::actions(),
            Alphabet::cells(),
            EXIT_ACTION,
            MutationRange::new(1, 3).unwrap(),
        )
        .unwrap()
        .with_sequence_mutators(vec![SequenceMutator::Replace, SequenceMutator::Insert])
        .unwrap();
        let seed = Seed {
            sequence: seq("SUE"),
            grid: grid(&["0WPF", "0MF0"]),
        };
        let mut session =
            MutationSession::new(config, seed, ChaCha8Rng::seed_from_u64(17)).unwrap();
        let mut calls = 0;
        let mut target = |_: &Input| -> Result<i32, Error> {
            calls += 1;
            Ok(99)
        };
        let mut recorder = Recorder::new(Vec::new());
        let budget = QuitCondition::Counted(1_000).start().unwrap();
        let res = run(budget, &mut session, &mut target, &ExitCodes::DEFAULT, &mut recorder);
        assert!(matches!(res, Err(Error::UnknownStatus(99))));
        assert_eq!(calls, 1);
        assert!(recorder.into_inner().is_empty());
    }

    #[test]
    fn crash_log_holds_only_crashing_candidates() {
        let config = SessionConfig::new(
            Alphabet::actions(),
            Alphabet::cells(),
            EXIT_ACTION,
            MutationRange::new(1, 4).unwrap(),
        )
        .unwrap();
        let seed = Seed {
            sequence: seq("SUELDUWRUESLUWDE"),
            grid: grid(&["WWWW", "WP0W", "W0FW", "WWWW"]),
        };
        let mut session = MutationSession::new(config, seed, ChaCha8Rng::seed_from_u64(3)).unwrap();
        // Pretend maps without a player crash the target.
        let mut target = |i: &Input| -> Result<i32, Error> {
            Ok(if i.map.contains(&b'P') { 0 } else { 1 })
        };
        let mut recorder = Recorder::new(Vec::new());
        let budget = QuitCondition::Counted(200).start().unwrap();
        let summary =
            run(budget, &mut session, &mut target, &ExitCodes::DEFAULT, &mut recorder).unwrap();
        assert_eq!(summary.iterations, 200);
        assert_eq!(summary.tally.total(), 200);
        let log = String::from_utf8(recorder.into_inner()).unwrap();
        assert_eq!(log.lines().count() as u64, summary.tally.crashed);
        for line in log.lines() {
            let (code, rest) = line.split_once(',').unwrap();
            let (actions, map) = rest.split_once(',').unwrap();
            assert_eq!(code, "1");
            assert!(actions.ends_with(EXIT_ACTION));
            assert!(map.starts_with('"') && map.ends_with('"'));
            assert!(!map.contains('P'));
        }
    }
}
