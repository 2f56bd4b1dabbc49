use super::model::{Hunk, HunkHeader, HunkOp};
use super::patching::PatchError;

/// Tokenise the body of a content part into its hunks.
///
/// Anything before the first `@@` header (typically `---`/`+++` file
/// headers) is skipped. Inside a hunk, lines are classified by their first
/// byte; blank lines and stray text are tolerated but never treated as
/// context.
pub fn lex_hunks(body: &str) -> Result<Vec<Hunk>, PatchError> {
    let mut hunks: Vec<Hunk> = Vec::new();

    for line in body.split('\n') {
        if line.starts_with("@@") {
            let header = parse_hunk_header(line)?;
            hunks.push(Hunk {
                header,
                ops: Vec::new(),
            });
            continue;
        }
        let Some(current) = hunks.last_mut() else {
            continue;
        };
        if line.is_empty() {
            continue;
        }
        let payload = || line[1..].to_string();
        match line.as_bytes()[0] {
            b' ' => current.ops.push(HunkOp::Context(payload())),
            b'-' => current.ops.push(HunkOp::Deletion(payload())),
            b'+' => current.ops.push(HunkOp::Insertion(payload())),
            _ => {}
        }
    }

    Ok(hunks)
}

/// Parse `@@ -A(,B)? +C(,D)? @@`; omitted counts default to 1.
fn parse_hunk_header(line: &str) -> Result<HunkHeader, PatchError> {
    let invalid = || PatchError::InvalidHunkHeader {
        line: line.to_string(),
    };

    let rest = line.strip_prefix("@@ -").ok_or_else(invalid)?;
    let (old, rest) = rest.split_once(" +").ok_or_else(invalid)?;
    let (new, _) = rest.split_once(" @@").ok_or_else(invalid)?;

    let (old_start, old_count) = parse_span(old).ok_or_else(invalid)?;
    let (new_start, new_count) = parse_span(new).ok_or_else(invalid)?;

    Ok(HunkHeader {
        old_start,
        old_count,
        new_start,
        new_count,
    })
}

fn parse_span(field: &str) -> Option<(usize, usize)> {
    match field.split_once(',') {
        Some((start, count)) => Some((parse_number(start)?, parse_number(count)?)),
        None => Some((parse_number(field)?, 1)),
    }
}

fn parse_number(field: &str) -> Option<usize> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
