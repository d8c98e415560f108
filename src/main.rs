use std::io::{BufWriter, Write, stdout};

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

mod cli;
mod emit;
mod logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut out = BufWriter::new(stdout().lock());
    cli.command.run(&mut out)?;
    out.flush()?;
    Ok(())
}
