//! Rewrites declared source paths against an optional working root.
//!
//! The working root never touches the process working directory. Instead a
//! [`WorkingDir`] carries the effective directory for one archive and every
//! filesystem access joins against it.

use getset::Getters;
use std::path::{Component, Path, PathBuf};

/// Effective working directory for a single archive.
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct WorkingDir {
    path: PathBuf,
}

impl WorkingDir {
    /// `root` is taken relative to `base_dir` unless it is absolute.
    pub fn new<P: AsRef<Path>>(base_dir: P, root: Option<&Path>) -> Self {
        let base_dir = base_dir.as_ref();
        let path = match root {
            Some(root) => normalize(&base_dir.join(root)),
            None => normalize(base_dir),
        };
        Self { path }
    }

    /// Absolute location of a path relative to this working directory.
    pub fn absolute<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.path.join(relative)
    }
}

/// A source path as written in the preset, and as rewritten for the working
/// directory.
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct SourcePath {
    declared: PathBuf,
    resolved: PathBuf,
}

impl SourcePath {
    pub fn new<A: Into<PathBuf>, B: Into<PathBuf>>(declared: A, resolved: B) -> Self {
        Self {
            declared: declared.into(),
            resolved: resolved.into(),
        }
    }
}

/// Rewrites `raw_files` for the working directory derived from `root`.
///
/// Without a root, paths are used as declared. With a root, relative paths
/// already name locations under the root, and absolute paths are rewritten
/// relative to it. The last component is kept verbatim so a trailing wildcard
/// survives.
pub fn resolve_files<P: AsRef<Path>>(
    raw_files: &[PathBuf],
    base_dir: P,
    root: Option<&Path>,
) -> (WorkingDir, Vec<SourcePath>) {
    let work_dir = WorkingDir::new(base_dir, root);
    let files = raw_files
        .iter()
        .map(|raw| {
            let resolved = if root.is_some() && raw.is_absolute() {
                relative_to(&normalize(raw), work_dir.path())
            } else {
                raw.clone()
            };
            tracing::trace!("Resolved {:?} -> {:?}", raw, resolved);
            SourcePath::new(raw.clone(), resolved)
        })
        .collect();

    (work_dir, files)
}

/// Lexically folds `.` and `..` without touching the filesystem, so paths whose
/// parents do not exist yet still resolve.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            c => out.push(c.as_os_str()),
        }
    }
    out
}

/// Expresses absolute `path` relative to absolute `base`, stepping out with
/// `..` where the two diverge.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_components: Vec<_> = path.components().collect();
    let base_components: Vec<_> = base.components().collect();
    let common = path_components
        .iter()
        .zip(base_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base_components.len() {
        out.push("..");
    }
    for component in &path_components[common..] {
        out.push(component.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
