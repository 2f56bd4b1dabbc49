pub fn normalize_eol(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Byte equality with every `\r` dropped from both sides. This is the only
/// normalisation applied when matching patch context against a buffer;
/// spaces and all other bytes must match exactly.
pub fn eq_ignoring_cr(a: &str, b: &str) -> bool {
    a.bytes()
        .filter(|&b| b != b'\r')
        .eq(b.bytes().filter(|&b| b != b'\r'))
}

/// Single-line rendering of a payload for diagnostics.
pub fn preview(s: &str) -> String {
    let s = s.replace('\n', "\\n");
    if s.chars().count() > 120 {
        let cut: String = s.chars().take(120).collect();
        format!("{cut}…")
    } else {
        s
    }
}
