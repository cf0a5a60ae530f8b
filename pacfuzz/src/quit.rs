// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::time::Duration;
use std::time::Instant;

use crate::Error;

/// When a campaign stops: after a number of iterations or after a wall-clock budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitCondition {
    /// Stop after this many iterations.
    Counted(u64),
    /// Stop once this much time has passed since the start.
    Timed(Duration),
}

impl QuitCondition {
    /// Select the quit condition from two optional limits, exactly one of which must be set.
    ///
    /// # Errors
    ///
    /// Fails when neither or both limits are set.
    pub fn from_limits(iterations: Option<u64>, time: Option<Duration>) -> Result<Self, Error> {
        match (iterations, time) {
            (Some(n), None) => Ok(Self::Counted(n)),
            (None, Some(d)) => Ok(Self::Timed(d)),
            (None, None) => Err(Error::NoQuitCondition),
            (Some(_), Some(_)) => Err(Error::ConflictingQuitConditions),
        }
    }

    /// Start tracking progress, taking the current time for timed budgets.
    ///
    /// # Errors
    ///
    /// Fails when a time budget overflows the clock.
    pub fn start(self) -> Result<Budget, Error> {
        match self {
            Self::Counted(stop) => Ok(Budget::Counted { current: 0, stop }),
            Self::Timed(d) => {
                let current = Instant::now();
                let stop = current
                    .checked_add(d)
                    .ok_or(Error::TimeBudgetOverflow(d.as_secs()))?;
                Ok(Budget::Timed { current, stop })
            }
        }
    }
}

/// Progress of a running campaign against its stop threshold.
///
/// Both variants share one interface, so the run loop has a single code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Iterations done so far and the iteration limit.
    Counted {
        /// Iterations done.
        current: u64,
        /// Iteration limit.
        stop: u64,
    },
    /// Clock reading at the last advance and the deadline.
    Timed {
        /// Last clock reading.
        current: Instant,
        /// Deadline.
        stop: Instant,
    },
}

impl Budget {
    /// Whether another iteration may run.
    #[must_use]
    pub fn should_continue(&self) -> bool {
        match self {
            Self::Counted { current, stop } => current < stop,
            Self::Timed { current, stop } => current < stop,
        }
    }

    /// Record one finished iteration.
    pub fn advance(&mut self) {
        match self {
            Self::Counted { current, .. } => *current += 1,
            Self::Timed { current, .. } => *current = Instant::now(),
        }
    }
}
