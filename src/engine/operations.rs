use std::io::{self, ErrorKind};
use std::path::Path;

use super::applying::{ApplyAction, ApplyError};
use super::filesystem::{FileSystem, resolve_location};
use super::lexing::lex_hunks;
use super::model::Part;
use super::patching::apply_hunks;

pub fn create(fs: &dyn FileSystem, base_dir: &Path, part: &Part) -> Result<ApplyAction, ApplyError> {
    let path = resolve_location(base_dir, &part.content_location);
    let body = strip_creation_marker(&part.body);

    ensure_parent_dir(fs, &path)?;
    fs.write_file(&path, body.as_bytes())
        .map_err(|err| ApplyError::Io {
            action: "write",
            path: path.clone(),
            source: err,
        })?;

    Ok(ApplyAction::Created(part.content_location.clone()))
}

/// Drop the optional leading `+++ <path>` marker line; the rest is file
/// bytes verbatim, with no trailing newline appended.
fn strip_creation_marker(body: &str) -> &str {
    if body.starts_with("+++") {
        match body.split_once('\n') {
            Some((_, rest)) => rest,
            None => "",
        }
    } else {
        body
    }
}

pub fn delete(fs: &dyn FileSystem, base_dir: &Path, part: &Part) -> Result<ApplyAction, ApplyError> {
    let path = resolve_location(base_dir, &part.content_location);
    match fs.remove_file(&path) {
        Ok(()) => Ok(ApplyAction::Deleted(part.content_location.clone())),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::warn!(location = %part.content_location, "delete of a file that does not exist");
            Ok(ApplyAction::DeleteSkipped(part.content_location.clone()))
        }
        Err(err) => Err(ApplyError::Io {
            action: "delete",
            path,
            source: err,
        }),
    }
}

pub fn move_file(fs: &dyn FileSystem, base_dir: &Path, part: &Part) -> Result<ApplyAction, ApplyError> {
    let (source, dest) = source_and_dest(&part.body);
    let (Some(source), Some(dest)) = (source, dest) else {
        return Err(ApplyError::MissingPath { operation: "move" });
    };

    let from = resolve_location(base_dir, source);
    let to = resolve_location(base_dir, dest);
    ensure_parent_dir(fs, &to)?;
    fs.rename(&from, &to).map_err(|err| ApplyError::Io {
        action: "move",
        path: from,
        source: err,
    })?;

    Ok(ApplyAction::Moved {
        from: source.to_string(),
        to: dest.to_string(),
    })
}

pub fn copy(fs: &dyn FileSystem, base_dir: &Path, part: &Part) -> Result<ApplyAction, ApplyError> {
    let (source, dest) = source_and_dest(&part.body);
    let (Some(source), Some(dest)) = (source, dest) else {
        return Err(ApplyError::MissingPath { operation: "copy" });
    };

    let from = resolve_location(base_dir, source);
    let to = resolve_location(base_dir, dest);
    match fs.stat(&from) {
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ApplyError::SourceMissing {
                path: source.to_string(),
            });
        }
        Err(err) => {
            return Err(ApplyError::Io {
                action: "inspect",
                path: from,
                source: err,
            });
        }
    }

    ensure_parent_dir(fs, &to)?;
    let mut reader = fs.open_read(&from).map_err(|err| ApplyError::Io {
        action: "open",
        path: from,
        source: err,
    })?;
    let mut writer = fs.open_write(&to).map_err(|err| ApplyError::Io {
        action: "create",
        path: to.clone(),
        source: err,
    })?;
    io::copy(&mut reader, &mut writer).map_err(|err| ApplyError::Io {
        action: "copy",
        path: to,
        source: err,
    })?;

    Ok(ApplyAction::Copied {
        from: source.to_string(),
        to: dest.to_string(),
    })
}

pub fn content(fs: &dyn FileSystem, base_dir: &Path, part: &Part) -> Result<ApplyAction, ApplyError> {
    let path = resolve_location(base_dir, &part.content_location);
    match fs.stat(&path) {
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ApplyError::FileMissing {
                path: part.content_location.clone(),
            });
        }
        Err(err) => {
            return Err(ApplyError::Io {
                action: "inspect",
                path,
                source: err,
            });
        }
    }

    let bytes = fs.read_file(&path).map_err(|err| ApplyError::Io {
        action: "read",
        path: path.clone(),
        source: err,
    })?;
    let before = String::from_utf8_lossy(&bytes);

    let hunks = lex_hunks(&part.body).map_err(|source| ApplyError::Patch { source })?;
    let after = apply_hunks(&before, &hunks).map_err(|source| ApplyError::Patch { source })?;

    fs.write_file(&path, after.as_bytes())
        .map_err(|err| ApplyError::Io {
            action: "write",
            path,
            source: err,
        })?;

    Ok(ApplyAction::Modified(part.content_location.clone()))
}

/// Pull `--- <src>` and `+++ <dst>` out of a move/copy body, in either order.
fn source_and_dest(body: &str) -> (Option<&str>, Option<&str>) {
    let mut source = None;
    let mut dest = None;
    for line in body.split('\n') {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("---") {
            let rest = rest.trim();
            if !rest.is_empty() {
                source = Some(rest);
            }
        } else if let Some(rest) = line.strip_prefix("+++") {
            let rest = rest.trim();
            if !rest.is_empty() {
                dest = Some(rest);
            }
        }
    }
    (source, dest)
}

fn ensure_parent_dir(fs: &dyn FileSystem, path: &Path) -> Result<(), ApplyError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs.create_dir_all(parent).map_err(|err| ApplyError::Io {
            action: "create directory",
            path: parent.to_path_buf(),
            source: err,
        })?;
    }
    Ok(())
}
