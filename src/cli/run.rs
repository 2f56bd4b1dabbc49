use eyre::{Result, WrapErr};
use std::path::PathBuf;

use crate::clipboard;
use crate::engine;

use super::io;
use super::specials;

/// CLI entrypoint: handle one-shot specials, then dispatch the verb.
pub fn run() -> Result<()> {
    crate::logging::init();

    if specials::handle_specials_if_needed() {
        return Ok(());
    }

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("apply") => apply(args.next()),
        Some(other) => {
            eprintln!("Unknown command: {other}\n");
            specials::print_usage();
            std::process::exit(1);
        }
        None => {
            specials::print_usage();
            std::process::exit(1);
        }
    }
}

/// Read the envelope (file argument, piped stdin, or the clipboard), parse
/// it, and apply it to the current working directory.
fn apply(file: Option<String>) -> Result<()> {
    let raw = match file {
        Some(path) => {
            std::fs::read_to_string(&path).wrap_err_with(|| format!("failed to read {path}"))?
        }
        None => match io::read_whole_stdin()? {
            Some(content) => content,
            None => clipboard::read_text().wrap_err("failed to read deltagram from clipboard")?,
        },
    };

    let deltagram = engine::parse(&raw).wrap_err("failed to parse deltagram")?;
    let base_dir: PathBuf =
        std::env::current_dir().wrap_err("failed to get current working directory")?;

    let report = engine::apply(&engine::RealFileSystem, &base_dir, &deltagram)
        .wrap_err("failed to apply deltagram")?;

    for action in &report.actions {
        println!("{action}");
    }
    println!("Deltagram applied successfully");
    Ok(())
}
