//! Expands declared source paths into the entries written to an archive.

use crate::archiver::function_path;
use crate::archiver::path_resolver::{SourcePath, WorkingDir};
use crate::archiver::result_error::error::Error;
use crate::archiver::result_error::result::Result;
use crate::archiver::result_error::WithFunctionName;
use function_name::named;
use itertools::Itertools;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Final path component that selects the regular files directly inside its
/// parent directory.
pub static WILDCARD: &str = "*";

/// A single file or directory to be stored in an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Absolute location on disk
    pub src: PathBuf,
    /// `/`-separated name inside the archive
    pub dst: String,
    pub is_dir: bool,
}

impl ArchiveEntry {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(src: P, dst: S, is_dir: bool) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            is_dir,
        }
    }
}

pub fn is_wildcard<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .is_some_and(|name| name == WILDCARD)
}

/// Name under which `relative` is stored: root, `.` and leading `..` components
/// are dropped so entries never escape the extraction directory.
pub fn archive_name<P: AsRef<Path>>(relative: P) -> Result<String> {
    let relative = relative.as_ref();
    let mut parts: Vec<&str> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(|| {
                Error::InvalidArchivePath {
                    path: relative.to_path_buf(),
                }
            })?),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Ok(parts.join("/"))
}

/// Relative paths of the regular files directly inside the parent of a
/// wildcard source, sorted by name.
#[named]
pub fn expand_wildcard(work_dir: &WorkingDir, source: &SourcePath) -> Result<Vec<PathBuf>> {
    let parent = source
        .resolved()
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let parent_abs = work_dir.absolute(&parent);
    let missing = || Error::MissingFile {
        path: source.declared().clone(),
    };

    if !parent_abs.is_dir() {
        return Err(missing());
    }

    let files = std::fs::read_dir(&parent_abs)
        .map_err(Error::from)
        .with_fn_name(function_path!())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| parent.join(entry.file_name()))
        .sorted()
        .collect_vec();

    if files.is_empty() {
        tracing::debug!("Wildcard {:?} matched no regular file", source.declared());
        return Err(missing());
    }

    Ok(files)
}

/// Enumerates every entry for `sources`, failing on the first source that does
/// not exist. Entries stored under the same name are kept once.
#[named]
pub fn collect_entries(work_dir: &WorkingDir, sources: &[SourcePath]) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();
    for source in sources {
        let resolved = source.resolved();
        let absolute = work_dir.absolute(resolved);

        if is_wildcard(resolved) {
            for file in expand_wildcard(work_dir, source)? {
                entries.push(ArchiveEntry::new(
                    work_dir.absolute(&file),
                    archive_name(&file)?,
                    false,
                ));
            }
        } else if absolute.is_dir() {
            for dir_entry in WalkDir::new(&absolute)
                .follow_links(true)
                .sort_by_file_name()
            {
                let dir_entry = dir_entry
                    .map_err(Error::from)
                    .with_fn_name(function_path!())?;
                let nested = dir_entry
                    .path()
                    .strip_prefix(&absolute)
                    .map(|p| resolved.join(p))
                    .unwrap_or_else(|_| resolved.clone());
                let name = archive_name(&nested)?;
                if name.is_empty() {
                    tracing::trace!("Skipping unnamed root entry {:?}", dir_entry.path());
                    continue;
                }
                entries.push(ArchiveEntry::new(
                    dir_entry.path(),
                    name,
                    dir_entry.file_type().is_dir(),
                ));
            }
        } else if absolute.exists() {
            entries.push(ArchiveEntry::new(absolute, archive_name(resolved)?, false));
        } else {
            return Err(Error::MissingFile {
                path: source.declared().clone(),
            });
        }
    }

    let entries = entries
        .into_iter()
        .unique_by(|entry| entry.dst.clone())
        .collect_vec();
    tracing::debug!("Collected {} archive entries", entries.len());
    Ok(entries)
}
