// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt::{self, Display};
use std::io::{self, Write};

use crate::{Input, Status};

/// One persisted outcome: `code,actions,"map"` on a single line.
///
/// Map bytes are ASCII-escaped, so newlines become the two characters `\n`
/// and arbitrary bytes from the random strategy stay on one line too.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Raw exit code of the target.
    pub code: i32,
    /// The input that produced it.
    pub input: &'a Input,
}

impl Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},\"{}\"",
            self.code,
            self.input.actions.escape_debug(),
            self.input.map.escape_ascii()
        )
    }
}

/// Outcome counters of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Inputs the target accepted.
    pub accepted: u64,
    /// Inputs the target rejected.
    pub rejected: u64,
    /// Inputs that crashed the target.
    pub crashed: u64,
    /// Candidates dropped before reaching the target.
    pub discarded: u64,
}

impl Tally {
    /// Count one classified run.
    pub fn count(&mut self, status: Status) {
        match status {
            Status::Accept => self.accepted += 1,
            Status::Reject => self.rejected += 1,
            Status::Crash => self.crashed += 1,
        }
    }

    /// Total iterations accounted for.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.accepted + self.rejected + self.crashed + self.discarded
    }
}

/// Append-only sink of [`Record`]s.
///
/// By default only crashes are written, which bounds storage on long runs.
#[derive(Debug)]
pub struct Recorder<W> {
    sink: W,
    record_all: bool,
    tally: Tally,
}

impl<W: Write> Recorder<W> {
    /// Record crashes into `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            record_all: false,
            tally: Tally::default(),
        }
    }

    /// Also record accepted and rejected inputs.
    #[must_use]
    pub fn with_record_all(mut self, enabled: bool) -> Self {
        self.record_all = enabled;
        self
    }

    /// Count a classified run and persist it if needed.
    ///
    /// # Errors
    ///
    /// Propagates sink write failures.
    pub fn record(&mut self, status: Status, code: i32, input: &Input) -> io::Result<()> {
        self.tally.count(status);
        if status == Status::Crash || self.record_all {
            writeln!(self.sink, "{}", Record { code, input })?;
        }
        Ok(())
    }

    /// Count a candidate that never reached the target.
    pub fn discard(&mut self) {
        self.tally.discarded += 1;
    }

    /// Counters so far.
    #[must_use]
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Flush the sink.
    ///
    /// # Errors
    ///
    /// Propagates sink flush failures.
    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Give back the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
