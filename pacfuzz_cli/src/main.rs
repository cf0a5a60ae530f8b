// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Black-box fuzzer for the JPacman command-line game.

use core::time::Duration;
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, ensure};
use clap::{Args, Parser, Subcommand};
use log::info;
use pacfuzz::{
    Config, ExitCodes, Grid, GridMutator, Input, QuitCondition, Recorder, SEED_ACTIONS_DEFAULT,
    Seed, Sequence, SequenceMutator, Strategy, Summary, Target,
};
use xshell::{Shell, cmd};

#[derive(Parser, Debug)]
/// Mutation-based black-box fuzzer for JPacman
struct Cli {
    #[command(flatten)]
    quit: QuitArgs,

    /// Target jar, run as `java -jar <JAR> <MAP_FILE> <ACTIONS>`
    #[arg(long, default_value = "jpacman-3.0.1.jar")]
    jar: PathBuf,

    /// Scratch file the generated map is written to
    #[arg(long, default_value = "fuzz.map")]
    map_file: PathBuf,

    /// Crash log, one CSV-like record per line
    #[arg(long, default_value = "pacman-error.csv")]
    out: PathBuf,

    /// Seed of the pseudo-random source, in hex
    #[arg(long, value_parser = parse_hex)]
    rng_seed: Option<u64>,

    /// Record accepted and rejected inputs too
    #[arg(long)]
    record_all: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
/// The fuzzer stops when its quit condition is met
struct QuitArgs {
    /// Number of fuzzing iterations to run
    #[arg(long)]
    max: Option<u64>,

    /// Time budget in seconds
    #[arg(long)]
    time: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mutate a seed action sequence and a seed map
    Mutation {
        /// Seed map file
        #[arg(long, default_value = "sample.map")]
        seed_map: PathBuf,

        /// Seed action sequence
        #[arg(long, default_value = SEED_ACTIONS_DEFAULT)]
        seed_actions: String,

        /// Minimum number of mutations per structure
        #[arg(long)]
        min: Option<usize>,

        /// Maximum number of mutations per structure
        #[arg(long)]
        max_mutations: Option<usize>,

        /// Enabled sequence operators
        #[arg(long, value_delimiter = ',')]
        sequence_ops: Vec<SequenceMutator>,

        /// Enabled grid operators
        #[arg(long, value_delimiter = ',')]
        grid_ops: Vec<GridMutator>,
    },
    /// Generate completely random actions and map bytes
    Random {
        /// Maximum action string length
        #[arg(long, default_value_t = pacfuzz::RANDOM_ACTIONS_MAX_LEN)]
        max_actions_len: usize,

        /// Maximum map length in bytes
        #[arg(long, default_value_t = pacfuzz::RANDOM_MAP_MAX_LEN)]
        max_map_len: usize,
    },
    /// Check the setup without running any iteration
    Noop,
}

#[test]
fn verify_cli() {
    use clap::CommandFactory as _;
    Cli::command().debug_assert();
}

fn parse_hex(s: &str) -> Result<u64, core::num::ParseIntError> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
}

/// Runs the jar once per input, passing the map through a scratch file.
struct JarTarget<'a> {
    sh: &'a Shell,
    jar: &'a Path,
    map_file: &'a Path,
}

impl Target for JarTarget<'_> {
    fn run(&mut self, input: &Input) -> Result<i32, pacfuzz::Error> {
        self.sh
            .write_file(self.map_file, &input.map)
            .map_err(pacfuzz::Error::target)?;
        let (jar, map_file, actions) = (self.jar, self.map_file, &input.actions);
        let out = cmd!(self.sh, "java -jar {jar} {map_file} {actions}")
            .quiet()
            .ignore_status()
            .output()
            .map_err(pacfuzz::Error::target)?;
        log::trace!("stderr: {}", String::from_utf8_lossy(&out.stderr));
        out.status
            .code()
            .ok_or_else(|| pacfuzz::Error::target(format!("target terminated by {}", out.status)))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("fuzzing config: {cli:#?}");

    let quit = QuitCondition::from_limits(cli.quit.max, cli.quit.time.map(Duration::from_secs))?;
    let sh = Shell::new()?;
    ensure!(
        sh.path_exists(&cli.jar),
        "{} not found, run the fuzzer from the directory containing the jar",
        cli.jar.display()
    );

    let mut config = Config::default();
    if let Some(seed) = cli.rng_seed {
        config = config.with_rng_seed(seed);
    }
    let mut strategy = build_strategy(cli.command, config, &sh)?;

    // Fail on an impossible budget before touching the crash log.
    let budget = quit.start()?;
    info!("start fuzzing");
    if let Some(strategy) = strategy.as_deref_mut() {
        let file = File::create(&cli.out)
            .with_context(|| format!("failed to create {}", cli.out.display()))?;
        let mut recorder = Recorder::new(BufWriter::new(file)).with_record_all(cli.record_all);
        let mut target = JarTarget {
            sh: &sh,
            jar: &cli.jar,
            map_file: &cli.map_file,
        };
        let summary = pacfuzz::run(
            budget,
            strategy,
            &mut target,
            &ExitCodes::DEFAULT,
            &mut recorder,
        )?;
        report(&summary, &cli.out);
    }
    info!("stop fuzzing");

    Ok(())
}

/// Builds the input strategy for `command`, or `None` for a dry run.
fn build_strategy(
    command: Commands,
    mut config: Config,
    sh: &Shell,
) -> Result<Option<Box<dyn Strategy>>> {
    let strategy: Box<dyn Strategy> = match command {
        Commands::Mutation {
            seed_map,
            seed_actions,
            min,
            max_mutations,
            sequence_ops,
            grid_ops,
        } => {
            if let Some(min) = min {
                config = config.with_mutations_min(min);
            }
            if let Some(max) = max_mutations {
                config = config.with_mutations_max(max);
            }
            if !sequence_ops.is_empty() {
                config = config.with_sequence_mutators(sequence_ops);
            }
            if !grid_ops.is_empty() {
                config = config.with_grid_mutators(grid_ops);
            }
            let settings = config.settings(true)?;
            let text = sh
                .read_file(&seed_map)
                .with_context(|| format!("failed to read seed map {}", seed_map.display()))?;
            let seed = Seed {
                sequence: Sequence::parse(&seed_actions, settings.session_config().actions())
                    .context("invalid seed actions")?,
                grid: Grid::parse(&text, settings.session_config().cells())
                    .with_context(|| format!("invalid seed map {}", seed_map.display()))?,
            };
            Box::new(settings.mutation_session(seed)?)
        }
        Commands::Random {
            max_actions_len,
            max_map_len,
        } => {
            let settings = config.settings(true)?;
            Box::new(
                settings
                    .random_strategy()
                    .with_max_actions_len(max_actions_len)
                    .with_max_map_len(max_map_len),
            )
        }
        Commands::Noop => {
            config.settings(true)?;
            return Ok(None);
        }
    };
    Ok(Some(strategy))
}

fn report(summary: &Summary, out: &Path) {
    if summary.tally.crashed > 0 {
        info!(
            "{} crashing inputs written to {}",
            summary.tally.crashed,
            out.display()
        );
    }
}
