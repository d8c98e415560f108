// Copyright 2025 Steven Dee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    fs::{self, create_dir_all},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use limbgen_conf::{Config, Format, RawSweep, TEMPLATE};
use num_bigint::BigUint;

use crate::emit::{write_case, write_sweep, write_values};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Log more; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the minimal binary digits of each value; zero prints an empty line.
    Bin {
        /// Integer expressions, e.g. `2**65 + 3`.
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Print the 64-bit limbs of each value, least significant first.
    Limbs {
        /// Print most significant limb first, with `0` for zero.
        #[arg(long)]
        test_out: bool,

        /// Integer expressions, e.g. `2**65 + 3`.
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Replay a shift sweep: shift left one bit at a time, then right.
    Sweep {
        #[arg(long, default_value = "1 << 16")]
        start: String,

        #[arg(long, default_value_t = 100)]
        left: u32,

        #[arg(long, default_value_t = 120)]
        right: u32,

        #[arg(long, default_value_t = Format::TestOut)]
        format: Format,
    },

    /// Print every case and sweep in a case file.
    Run {
        /// Case file; defaults to `limbgen/cases.toml` in the config dir.
        #[arg(short, long, env = "LIMBGEN_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Write a commented case file to start from.
    Init {
        /// Where to write it; defaults to `limbgen/cases.toml` in the config dir.
        #[arg(short, long, env = "LIMBGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    pub fn run(&self, w: &mut dyn Write) -> Result<()> {
        match self {
            Command::Bin { values } => {
                write_values(w, Format::Bin, &parse_all(values)?)?;
            }
            Command::Limbs { test_out, values } => {
                let format = if *test_out {
                    Format::TestOut
                } else {
                    Format::Limbs
                };
                write_values(w, format, &parse_all(values)?)?;
            }
            Command::Sweep {
                start,
                left,
                right,
                format,
            } => {
                let sweep = RawSweep {
                    name: "sweep".into(),
                    start: start.clone(),
                    left: *left,
                    right: *right,
                }
                .resolve()?;
                write_sweep(w, &sweep, *format)?;
            }
            Command::Run { config } => {
                let config = Config::from_or_default(config.as_deref())
                    .context("failed loading cases")?;
                for case in config.cases()? {
                    write_case(w, &case)?;
                }
                let format = config.default_format();
                for sweep in config.sweeps()? {
                    write_sweep(w, &sweep, format)?;
                }
            }
            Command::Init { config, force } => {
                let path = match config {
                    Some(path) => path.clone(),
                    None => Config::default_path()?,
                };
                init(&path, *force)?;
                tracing::info!(path = %path.display(), "wrote case file");
            }
        }
        Ok(())
    }
}

fn parse_all(values: &[String]) -> Result<Vec<BigUint>> {
    values
        .iter()
        .map(|value| {
            let n = limbgen_expr::parse_natural(value).with_context(|| format!("{value:?}"))?;
            tracing::debug!(%value, bits = n.bits(), "parsed");
            Ok(n)
        })
        .collect()
}

fn init(path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    if let Some(dir) = path.parent() {
        create_dir_all(dir).context("failed creating config dir")?;
    }
    fs::write(path, TEMPLATE).with_context(|| format!("failed writing {}", path.display()))
}
