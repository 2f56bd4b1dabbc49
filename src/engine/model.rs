/// Locations with this scheme mark a part as a human-readable note
/// rather than a file operation.
pub const MESSAGE_LOCATION: &str = "deltagram://message";

/// Pre-rename counterpart of [`MESSAGE_LOCATION`], still honored.
pub const LEGACY_MESSAGE_LOCATION: &str = "mimeogram://message";

/// One addressable operation inside a deltagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub content_location: String,
    pub content_type: String,
    pub delta_operation: String,
    pub body: String,
}

impl Part {
    pub fn is_message(&self) -> bool {
        self.content_location == MESSAGE_LOCATION
            || self.content_location == LEGACY_MESSAGE_LOCATION
    }
}

/// A parsed envelope: the boundary identifier plus its parts, in stream order.
#[derive(Debug, Clone)]
pub struct Deltagram {
    pub identifier: String,
    pub parts: Vec<Part>,
}

/// Addresses of a hunk, as written in its `@@ -A,B +C,D @@` header.
/// Starts are 1-based; counts default to 1 in the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
}

/// A single typed line of a hunk body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkOp {
    /// Expected to match the buffer, carried through unchanged.
    Context(String),
    /// Removed from the old text.
    Deletion(String),
    /// Added to the new text.
    Insertion(String),
}

#[derive(Debug, Clone)]
pub struct Hunk {
    pub header: HunkHeader,
    pub ops: Vec<HunkOp>,
}

impl Hunk {
    /// Lines of the original buffer this hunk covers, in order: the
    /// payloads of its context and deletion ops.
    pub fn old_lines(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                HunkOp::Context(s) | HunkOp::Deletion(s) => Some(s.as_str()),
                HunkOp::Insertion(_) => None,
            })
            .collect()
    }
}
