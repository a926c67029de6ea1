//! 7z containers written by an external 7-Zip executable.
//!
//! Produces the same kind of archive as [`SevenZipBackend`](super::sevenz::SevenZipBackend):
//! same filter, level, password and header encryption. Output is not byte
//! identical.

use crate::archiver::backend::sevenz::SevenZipOptions;
use crate::archiver::backend::ArchiveBackend;
use crate::archiver::path_resolver::{SourcePath, WorkingDir};
use crate::archiver::redacted::{RedactedString, REDACTED_PASSWORD};
use crate::archiver::result_error::error::Error;
use crate::archiver::result_error::result::Result;
use crate::archiver::source::{collect_entries, expand_wildcard, is_wildcard};
use itertools::Itertools;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executable names tried in order when no explicit binary is configured
pub static SEVENZIP_EXECUTABLES: [&str; 3] = ["7zz", "7z", "7za"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeSevenZipBackend {
    options: SevenZipOptions,
    program: Option<PathBuf>,
}

impl NativeSevenZipBackend {
    pub fn new(options: SevenZipOptions, program: Option<PathBuf>) -> Self {
        Self { options, program }
    }

    fn program(&self) -> Result<PathBuf> {
        match &self.program {
            Some(program) => Ok(program.clone()),
            None => find_executable(&SEVENZIP_EXECUTABLES).ok_or(Error::ExternalArchiverNotFound),
        }
    }

    /// Switches passed before the archive name. The password switch is last so
    /// it can be redacted when logging. A bare `-p` makes 7-Zip prompt for a
    /// password, so an empty one is left out.
    fn switches(&self, password: Option<&RedactedString>) -> Vec<String> {
        let mut switches = vec![
            "a".to_string(),
            "-t7z".to_string(),
            "-y".to_string(),
            "-bd".to_string(),
            format!("-m0={}", self.options.algo().switch_name()),
        ];
        if let Some(lvl) = self.options.lvl {
            switches.push(format!("-mx={lvl}"));
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            if self.options.encrypt_header() {
                switches.push("-mhe=on".to_string());
            }
            switches.push(format!("-p{}", password.inner()));
        }
        switches
    }

    /// Paths handed to the executable, relative to the working directory.
    /// Wildcards are expanded here so only direct regular files are picked up.
    fn operands(&self, work_dir: &WorkingDir, files: &[SourcePath]) -> Result<Vec<PathBuf>> {
        let mut operands = Vec::new();
        for file in files {
            if is_wildcard(file.resolved()) {
                operands.extend(expand_wildcard(work_dir, file)?);
            } else {
                operands.push(file.resolved().clone());
            }
        }
        Ok(operands)
    }
}

impl ArchiveBackend for NativeSevenZipBackend {
    fn write(
        &self,
        archive_path: &Path,
        work_dir: &WorkingDir,
        files: &[SourcePath],
        password: Option<&RedactedString>,
    ) -> Result<()> {
        // Fails on the first missing source before anything is written.
        collect_entries(work_dir, files)?;
        let operands = self.operands(work_dir, files)?;
        let program = self.program()?;
        let switches = self.switches(password);

        if archive_path.exists() {
            // `7z a` appends to an existing archive.
            std::fs::remove_file(archive_path)?;
        }

        tracing::debug!(
            "Running {:?} {} -- {:?} {:?} in {:?}",
            program,
            switches
                .iter()
                .map(|s| if s.starts_with("-p") {
                    format!("-p{REDACTED_PASSWORD}")
                } else {
                    s.clone()
                })
                .join(" "),
            archive_path,
            operands,
            work_dir.path()
        );

        let status = Command::new(&program)
            .args(&switches)
            .arg("--")
            .arg(archive_path)
            .args(&operands)
            .current_dir(work_dir.path())
            .status()?;

        if !status.success() {
            return Err(Error::ExternalArchiver { program, status });
        }

        tracing::info!("Wrote {:?} with {:?}", archive_path, program);
        Ok(())
    }
}

/// First of `names` found as a file in one of the `PATH` directories
pub fn find_executable(names: &[&str]) -> Option<PathBuf> {
    let path = std::env::var_os("PATH").unwrap_or_else(OsString::new);
    std::env::split_paths(&path)
        .cartesian_product(names.iter())
        .map(|(dir, name)| dir.join(name))
        .find(|candidate| candidate.is_file())
}
