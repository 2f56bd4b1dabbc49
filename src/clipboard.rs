//! System clipboard access, the default input source for `apply`.
use eyre::{Result, WrapErr};

/// Read the clipboard as text, trimming outer whitespace.
pub fn read_text() -> Result<String> {
    let mut clipboard =
        arboard::Clipboard::new().wrap_err("failed to access the system clipboard")?;
    let text = clipboard
        .get_text()
        .wrap_err("failed to read text from the clipboard")?;
    Ok(text.trim().to_string())
}
