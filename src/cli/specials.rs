/// Handle one-shot commands like `help` and `version`.
/// Returns true if a special action was handled and the program should exit.
pub fn handle_specials_if_needed() -> bool {
    let mut args = std::env::args();
    let _ = args.next(); // binary name

    let arg = args.next().unwrap_or_default();

    if matches!(arg.as_str(), "help" | "--help" | "-h" | "-?") {
        print_usage();
        return true;
    }

    if matches!(arg.as_str(), "version" | "--version" | "-v" | "-V") {
        println!("deltagram {}", env!("CARGO_PKG_VERSION"));
        return true;
    }

    // Otherwise, not a special
    false
}

pub fn print_usage() {
    println!(
        "{}",
        concat!(
            "deltagram: apply clipboard-borne file operations to the working tree\n\n",
            "Usage: deltagram <command>\n\n",
            "Commands:\n",
            "  apply [FILE]    Apply a deltagram from FILE, piped stdin, or the clipboard\n",
            "  version, -v     Show version information\n",
            "  help, -h        Show this help message"
        )
    );
}
