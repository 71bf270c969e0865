//! `badger-stats`: answers the Battersea Badgers quiz from the club's
//! published stats.
//!
//! ```bash
//! badger-stats                 # interactive quiz
//! badger-stats ask 3           # one answer, then exit
//! badger-stats refresh         # re-download and rebuild the caches
//! RUST_LOG=info badger-stats   # show cache decisions
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use clap::Parser as _;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = cli::Cli::parse();
    cli::run(cli)
}
