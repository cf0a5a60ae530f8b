// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::time::Duration;
use std::{io::Write, time::Instant};

use log::{debug, info};

use crate::{Budget, Error, ExitCodes, Input, Recorder, Status, Strategy, Tally};

/// The program under test.
pub trait Target {
    /// Run the target once on `input` and return its exit code.
    ///
    /// # Errors
    ///
    /// Fails when the target could not be run to completion.
    fn run(&mut self, input: &Input) -> Result<i32, Error>;
}

impl<F: FnMut(&Input) -> Result<i32, Error>> Target for F {
    fn run(&mut self, input: &Input) -> Result<i32, Error> {
        self(input)
    }
}

/// What a finished campaign did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Iterations consumed, discarded candidates included.
    pub iterations: u64,
    /// Per-outcome counters.
    pub tally: Tally,
    /// Wall-clock duration of the loop.
    pub elapsed: Duration,
}

/// Drive `strategy` against `target` until `budget` runs out.
///
/// Each iteration produces at most one input, runs the target to
/// completion, classifies the exit code and hands it to `recorder`.
/// Discarded candidates consume an iteration without running the target.
///
/// # Errors
///
/// Stops at the first unknown exit code, target failure or sink failure;
/// nothing is recorded for the offending input.
pub fn run<S, T, W>(
    mut budget: Budget,
    strategy: &mut S,
    target: &mut T,
    codes: &ExitCodes,
    recorder: &mut Recorder<W>,
) -> Result<Summary, Error>
where
    S: Strategy + ?Sized,
    T: Target + ?Sized,
    W: Write,
{
    let start = Instant::now();
    let mut iterations = 0;
    while budget.should_continue() {
        iterations += 1;
        if let Some(input) = strategy.next_input() {
            let code = target.run(&input)?;
            let status = codes.classify(code)?;
            debug!(
                "#{iterations} {}: {} ({:?}, {} map bytes)",
                strategy.name(),
                status,
                input.actions,
                input.map.len()
            );
            if status == Status::Crash {
                info!("#{iterations} crash with actions {:?}", input.actions);
            }
            recorder.record(status, code, &input)?;
        } else {
            recorder.discard();
        }
        budget.advance();
    }
    recorder.flush()?;

    let summary = Summary {
        iterations,
        tally: recorder.tally(),
        elapsed: start.elapsed(),
    };
    info!(
        "{} done: {} iterations, {} accepted, {} rejected, {} crashed, {} discarded in {:.1?}",
        strategy.name(),
        summary.iterations,
        summary.tally.accepted,
        summary.tally.rejected,
        summary.tally.crashed,
        summary.tally.discarded,
        summary.elapsed
    );
    Ok(summary)
}
