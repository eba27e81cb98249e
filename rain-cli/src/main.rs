//! Binary crate for the `will-it-rain` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Scoping log verbosity to one invocation
//! - Wiring the wall clock and real HTTP clients into `rain-core`

use clap::Parser;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
