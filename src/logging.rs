/// Route tracing events to stderr, keeping stdout for the action report.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
