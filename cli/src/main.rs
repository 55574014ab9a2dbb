//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Interactive prompts driving the records controller
//! - Printing the rendered records screen

use clap::Parser;

mod cli;
mod config;
mod prompt;

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run()
}
