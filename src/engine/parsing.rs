use super::model::{Deltagram, Part};
use super::text::normalize_eol;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    NoBoundary,
    InvalidIdentifier(String),
    MissingHeader(&'static str),
    TrailingGarbage,
    Empty,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::NoBoundary => {
                write!(f, "invalid deltagram format: missing or malformed boundary")
            }
            ParseError::InvalidIdentifier(id) => {
                write!(f, "invalid boundary identifier format: {id}")
            }
            ParseError::MissingHeader(name) => write!(f, "missing {name} header"),
            ParseError::TrailingGarbage => {
                write!(f, "unexpected content after the final boundary")
            }
            ParseError::Empty => write!(f, "invalid deltagram format: no parts found"),
        }
    }
}

impl std::error::Error for ParseError {}

const BOUNDARY_LEAD: &str = "--====";

/// Boundary flavors, current one first. The legacy token is accepted as a
/// synonym; whichever the first boundary carries is used to split the stream.
const FLAVORS: [&str; 2] = ["DELTAGRAM_", "MIMEOGRAM_"];

/// Split a raw envelope into its identifier and ordered parts.
///
/// Line terminators are normalised to LF before anything else, so CRLF
/// envelopes (clipboard round trips through Windows) parse identically.
pub fn parse(raw: &str) -> Result<Deltagram, ParseError> {
    let content = normalize_eol(raw);

    let (flavor, identifier) = find_first_boundary(&content).ok_or(ParseError::NoBoundary)?;
    if !is_valid_identifier(identifier) {
        return Err(ParseError::InvalidIdentifier(identifier.to_string()));
    }

    let boundary = format!("{BOUNDARY_LEAD}{flavor}{identifier}====");
    let mut segments: Vec<&str> = content.split(boundary.as_str()).collect();

    // Anything before the first boundary: blank is discarded, prose is
    // treated as a part and surfaces a header error.
    let lead = segments.remove(0);

    let mut parts = Vec::new();
    if !lead.trim().is_empty() {
        parts.push(parse_part(lead)?);
    }

    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.iter().enumerate() {
        if i == last
            && let Some(rest) = segment.trim().strip_prefix("--")
        {
            // Final boundary marker. Only blank content may follow it.
            if !rest.trim().is_empty() {
                return Err(ParseError::TrailingGarbage);
            }
            continue;
        }
        parts.push(parse_part(segment)?);
    }

    if parts.is_empty() {
        return Err(ParseError::Empty);
    }

    Ok(Deltagram {
        identifier: identifier.to_string(),
        parts,
    })
}

/// At least 8 characters of `[A-Za-z0-9_-]`.
fn is_valid_identifier(candidate: &str) -> bool {
    candidate.len() >= 8
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Locate the first boundary-shaped token and extract its flavor and
/// candidate identifier (everything up to the closing `====`, unvalidated).
fn find_first_boundary(content: &str) -> Option<(&'static str, &str)> {
    for (at, _) in content.match_indices(BOUNDARY_LEAD) {
        let after_lead = &content[at + BOUNDARY_LEAD.len()..];
        for flavor in FLAVORS {
            if let Some(rest) = after_lead.strip_prefix(flavor)
                && let Some(end) = rest.find("====")
                && !rest[..end].contains('\n')
            {
                return Some((flavor, &rest[..end]));
            }
        }
    }
    None
}

fn parse_part(segment: &str) -> Result<Part, ParseError> {
    let segment = segment.trim();
    let lines: Vec<&str> = segment.split('\n').collect();

    let mut content_location = "";
    let mut content_type = "";
    let mut delta_operation = "";
    let mut body_start = lines.len();

    for (i, line) in lines.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            body_start = i + 1;
            break;
        }
        if let Some(value) = line.strip_prefix("Content-Location:") {
            content_location = value.trim();
        } else if let Some(value) = line.strip_prefix("Content-Type:") {
            content_type = value.trim();
        } else if let Some(value) = line.strip_prefix("Delta-Operation:") {
            delta_operation = value.trim();
        }
        // Unrecognised header lines are ignored.
    }

    if content_location.is_empty() {
        return Err(ParseError::MissingHeader("Content-Location"));
    }
    if content_type.is_empty() {
        return Err(ParseError::MissingHeader("Content-Type"));
    }

    let body = if body_start < lines.len() {
        lines[body_start..].join("\n")
    } else {
        String::new()
    };

    let mut part = Part {
        content_location: content_location.to_string(),
        content_type: content_type.to_string(),
        delta_operation: delta_operation.to_string(),
        body,
    };
    // Message parts may omit the operation; everything else defaults to
    // `create` for compatibility with envelopes that predate the header.
    if !part.is_message() && part.delta_operation.is_empty() {
        part.delta_operation = "create".to_string();
    }

    Ok(part)
}
