// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*!
`pacfuzz` is a mutation-based black-box input generator for programs that
take an action string and a grid-shaped map file.

Every iteration copies a fixed seed pair, applies a random number of
structural mutations to each half, and hands the result to the target.
There is no coverage feedback and no corpus evolution: each candidate is
derived from the seed independently.

```
use pacfuzz::{Config, ExitCodes, Grid, Input, QuitCondition, Recorder, Seed, Sequence};

let settings = Config::default().with_rng_seed(7).settings(false)?;
let seed = Seed {
    sequence: Sequence::parse("SUE", settings.session_config().actions())?,
    grid: Grid::parse("0W\nPF", settings.session_config().cells())?,
};
let mut session = settings.mutation_session(seed)?;
let mut target = |_: &Input| -> Result<i32, pacfuzz::Error> { Ok(0) };
let mut recorder = Recorder::new(Vec::new());
let budget = QuitCondition::Counted(10).start()?;
let summary = pacfuzz::run(budget, &mut session, &mut target, &ExitCodes::DEFAULT, &mut recorder)?;
assert_eq!(summary.iterations, 10);
# Ok::<(), pacfuzz::Error>(())
```
*/

mod alphabet;
mod config;
mod error;
mod grid;
mod quit;
mod record;
mod run;
mod sequence;
mod session;
mod status;
mod strategy;
#[cfg(test)]
mod tests;

pub use alphabet::*;
pub use config::*;
pub use error::*;
pub use grid::*;
pub use quit::*;
pub use record::*;
pub use run::*;
pub use sequence::*;
pub use session::*;
pub use status::*;
pub use strategy::*;
