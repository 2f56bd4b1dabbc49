use std::io;
use std::path::{Path, PathBuf};

use super::filesystem::FileSystem;
use super::model::Deltagram;
use super::operations;
use super::patching::PatchError;

/// The closed set of operation verbs a part may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Delete,
    Move,
    Copy,
    Content,
}

impl Operation {
    /// Unknown and empty verbs fall back to `create`, for envelopes that
    /// predate the `Delta-Operation` header.
    pub fn from_verb(verb: &str) -> Operation {
        match verb {
            "delete" => Operation::Delete,
            "move" => Operation::Move,
            "copy" => Operation::Copy,
            "content" => Operation::Content,
            _ => Operation::Create,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::Move => "move",
            Operation::Copy => "copy",
            Operation::Content => "content",
        }
    }
}

/// One applied step, in stream order. The engine never prints; callers
/// render these however they like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyAction {
    Message(String),
    Created(String),
    Modified(String),
    Deleted(String),
    DeleteSkipped(String),
    Moved { from: String, to: String },
    Copied { from: String, to: String },
}

impl std::fmt::Display for ApplyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyAction::Message(text) => write!(f, "Message: {text}"),
            ApplyAction::Created(location) => write!(f, "Created: {location}"),
            ApplyAction::Modified(location) => write!(f, "Modified: {location}"),
            ApplyAction::Deleted(location) => write!(f, "Deleted: {location}"),
            ApplyAction::DeleteSkipped(location) => {
                write!(f, "Warning: file {location} does not exist (already deleted)")
            }
            ApplyAction::Moved { from, to } => write!(f, "Moved: {from} -> {to}"),
            ApplyAction::Copied { from, to } => write!(f, "Copied: {from} -> {to}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ApplyReport {
    pub actions: Vec<ApplyAction>,
}

#[derive(Debug)]
pub enum ApplyError {
    FileMissing {
        path: String,
    },
    SourceMissing {
        path: String,
    },
    MissingPath {
        operation: &'static str,
    },
    Patch {
        source: PatchError,
    },
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    Operation {
        operation: &'static str,
        location: String,
        source: Box<ApplyError>,
    },
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyError::FileMissing { path } => {
                write!(
                    f,
                    "cannot apply content operation to non-existent file: {path}; \
                     use a create operation for new files"
                )
            }
            ApplyError::SourceMissing { path } => {
                write!(f, "source file does not exist: {path}")
            }
            ApplyError::MissingPath { operation } => {
                write!(
                    f,
                    "invalid {operation} operation: missing source or destination path"
                )
            }
            ApplyError::Patch { source } => write!(f, "failed to apply diff: {source}"),
            ApplyError::Io {
                action,
                path,
                source,
            } => {
                write!(f, "failed to {action} {}: {source}", path.display())
            }
            ApplyError::Operation {
                operation,
                location,
                source,
            } => {
                write!(f, "failed to apply {operation} operation to {location}: {source}")
            }
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApplyError::Patch { source } => Some(source),
            ApplyError::Io { source, .. } => Some(source),
            ApplyError::Operation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Apply a parsed deltagram to `base_dir`, strictly in stream order,
/// halting on the first failing part.
pub fn apply(
    fs: &dyn FileSystem,
    base_dir: &Path,
    deltagram: &Deltagram,
) -> Result<ApplyReport, ApplyError> {
    let mut actions = Vec::with_capacity(deltagram.parts.len());

    for part in &deltagram.parts {
        if part.is_message() {
            actions.push(ApplyAction::Message(part.body.trim().to_string()));
            continue;
        }

        let operation = Operation::from_verb(&part.delta_operation);
        let action = match operation {
            Operation::Create => operations::create(fs, base_dir, part),
            Operation::Delete => operations::delete(fs, base_dir, part),
            Operation::Move => operations::move_file(fs, base_dir, part),
            Operation::Copy => operations::copy(fs, base_dir, part),
            Operation::Content => operations::content(fs, base_dir, part),
        }
        .map_err(|err| ApplyError::Operation {
            operation: operation.verb(),
            location: part.content_location.clone(),
            source: Box::new(err),
        })?;

        actions.push(action);
    }

    Ok(ApplyReport { actions })
}
