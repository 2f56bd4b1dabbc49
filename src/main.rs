//! Command-line entrypoint for the deltagram applier.
use eyre::Result;

pub mod cli;
pub mod clipboard;
pub mod engine;
pub mod logging;

fn main() -> Result<()> {
    cli::run()
}
