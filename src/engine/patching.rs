use super::model::{Hunk, HunkOp};
use super::text::{eq_ignoring_cr, preview};

/// How far, in lines either way, a hunk may be relocated from its stated
/// position when its context does not validate there.
const RELOCATION_WINDOW: isize = 5;

#[derive(Debug, PartialEq, Eq)]
pub enum PatchError {
    InvalidHunkHeader { line: String },
    HunkOutOfRange { line: usize, buffer_len: usize },
    ContextMismatch { at: usize, expected: String, got: String },
    TruncatedContext { line: usize, buffer_len: usize },
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchError::InvalidHunkHeader { line } => {
                write!(f, "invalid hunk header: {}", preview(line))
            }
            PatchError::HunkOutOfRange { line, buffer_len } => {
                write!(
                    f,
                    "hunk refers to line {line} but file only has {buffer_len} lines"
                )
            }
            PatchError::ContextMismatch { at, expected, got } => {
                write!(
                    f,
                    "context mismatch at line {at}: expected `{}`, found `{}`",
                    preview(expected),
                    preview(got)
                )
            }
            PatchError::TruncatedContext { line, buffer_len } => {
                write!(
                    f,
                    "diff attempts to remove line {line} but file only has {buffer_len} lines"
                )
            }
        }
    }
}

impl std::error::Error for PatchError {}

/// Apply hunks addressed against *original* line numbers to a buffer.
///
/// The applier keeps a mapping from original line indices to their current
/// positions in the working copy, so every hunk may be written against the
/// file as it looked before any of them ran. Context is validated against
/// the original buffer with `\r`-insensitive equality; when it does not
/// match at the stated line, nearby positions are probed before giving up.
pub fn apply_hunks(original: &str, hunks: &[Hunk]) -> Result<String, PatchError> {
    let original_lines: Vec<&str> = original.split('\n').collect();
    let mut result: Vec<String> = original_lines.iter().map(|s| (*s).to_string()).collect();
    // mapping[i] is the current index in `result` of original line i; the
    // extra slot addresses the end-of-buffer insertion point.
    let mut mapping: Vec<usize> = (0..=original_lines.len()).collect();

    for hunk in hunks {
        apply_one(&original_lines, &mut result, &mut mapping, hunk)?;
    }

    Ok(result.join("\n"))
}

fn apply_one(
    original: &[&str],
    result: &mut Vec<String>,
    mapping: &mut [usize],
    hunk: &Hunk,
) -> Result<(), PatchError> {
    let len = original.len();
    let stated = hunk.header.old_start.saturating_sub(1);
    let old_lines = hunk.old_lines();
    // The span actually consumed comes from the ops; it equals `old_count`
    // whenever the hunk is well formed, and stays truthful when an author
    // miscounted the header.
    let span = old_lines.len();

    if hunk.header.old_count == 0 || span == 0 {
        // Pure insertion: consumes no buffer lines.
        if stated > len {
            return Err(PatchError::HunkOutOfRange {
                line: hunk.header.old_start,
                buffer_len: len,
            });
        }
        let at = mapping[stated];
        let added: Vec<String> = hunk
            .ops
            .iter()
            .filter_map(|op| match op {
                HunkOp::Insertion(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect();
        let count = added.len() as isize;
        result.splice(at..at, added);
        shift(mapping, stated, count);
        return Ok(());
    }

    if stated >= len {
        return Err(PatchError::HunkOutOfRange {
            line: hunk.header.old_start,
            buffer_len: len,
        });
    }

    let pos = locate(original, stated, &old_lines)?;
    if pos != stated {
        let offset = pos as isize - stated as isize;
        tracing::debug!(line = hunk.header.old_start, offset, "relocated hunk");
    }

    let at = mapping[pos];
    if at + span > result.len() {
        return Err(PatchError::TruncatedContext {
            line: result.len() + 1,
            buffer_len: result.len(),
        });
    }

    let mut replacement: Vec<String> = Vec::with_capacity(hunk.ops.len());
    let mut consumed = 0usize;
    for op in &hunk.ops {
        match op {
            HunkOp::Context(payload) => {
                if consumed < span {
                    // Carry the buffer's own bytes so CRs on untouched
                    // CRLF lines survive application.
                    replacement.push(result[at + consumed].clone());
                    consumed += 1;
                } else {
                    replacement.push(payload.clone());
                }
            }
            HunkOp::Deletion(_) => consumed += 1,
            HunkOp::Insertion(payload) => replacement.push(payload.clone()),
        }
    }

    let delta = replacement.len() as isize - span as isize;
    result.splice(at..at + span, replacement);
    shift(mapping, pos + span, delta);
    Ok(())
}

/// Move every original line at or after `from` by the net line change of
/// an applied hunk.
fn shift(mapping: &mut [usize], from: usize, delta: isize) {
    for slot in &mut mapping[from..] {
        *slot = (*slot as isize + delta) as usize;
    }
}

/// Find the position where the hunk's old lines validate: the stated one
/// first, then 1..=RELOCATION_WINDOW lines forward and backward. The
/// diagnostic surfaced on failure is the one recorded at the first probe.
fn locate(original: &[&str], stated: usize, old_lines: &[&str]) -> Result<usize, PatchError> {
    let len = original.len();
    let span = old_lines.len();
    let mut first_failure: Option<PatchError> = None;

    for delta in probe_offsets() {
        let pos = stated as isize + delta;
        if pos < 0 {
            continue;
        }
        let pos = pos as usize;
        if pos + span > len {
            continue;
        }
        match validate(original, pos, old_lines) {
            Ok(()) => return Ok(pos),
            Err(err) => {
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
    }

    Err(first_failure.unwrap_or(PatchError::TruncatedContext {
        line: len + 1,
        buffer_len: len,
    }))
}

fn probe_offsets() -> impl Iterator<Item = isize> {
    std::iter::once(0).chain((1..=RELOCATION_WINDOW).flat_map(|d| [d, -d]))
}

fn validate(original: &[&str], pos: usize, old_lines: &[&str]) -> Result<(), PatchError> {
    for (k, expected) in old_lines.iter().enumerate() {
        let got = original[pos + k];
        if !eq_ignoring_cr(expected, got) {
            return Err(PatchError::ContextMismatch {
                at: pos + k + 1,
                expected: (*expected).to_string(),
                got: got.to_string(),
            });
        }
    }
    Ok(())
}
