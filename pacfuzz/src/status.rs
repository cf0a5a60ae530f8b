// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt::{self, Display};

use crate::Error;

/// How the target handled an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The target consumed the input normally.
    Accept,
    /// The target detected invalid input and rejected it cleanly.
    Reject,
    /// The target failed unexpectedly; the input is a finding.
    Crash,
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Crash => "crash",
        })
    }
}

/// Exit codes the target uses for each [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCodes {
    accept: i32,
    reject: i32,
    crash: i32,
}

impl ExitCodes {
    /// Codes used by the reference target: 0 accept, 10 reject, 1 crash.
    pub const DEFAULT: Self = Self {
        accept: 0,
        reject: 10,
        crash: 1,
    };

    /// Assign one distinct exit code per outcome.
    ///
    /// # Errors
    ///
    /// Fails when two outcomes share a code.
    pub fn new(accept: i32, reject: i32, crash: i32) -> Result<Self, Error> {
        if accept == reject || accept == crash {
            return Err(Error::AmbiguousExitCode(accept));
        }
        if reject == crash {
            return Err(Error::AmbiguousExitCode(reject));
        }
        Ok(Self {
            accept,
            reject,
            crash,
        })
    }

    /// Map an exit code to its outcome.
    ///
    /// # Errors
    ///
    /// An unknown code means the target broke its contract, which is fatal
    /// for the run rather than a finding.
    pub fn classify(&self, code: i32) -> Result<Status, Error> {
        match code {
            c if c == self.accept => Ok(Status::Accept),
            c if c == self.reject => Ok(Status::Reject),
            c if c == self.crash => Ok(Status::Crash),
            c => Err(Error::UnknownStatus(c)),
        }
    }
}

impl Default for ExitCodes {
    fn default() -> Self {
        Self::DEFAULT
    }
}
