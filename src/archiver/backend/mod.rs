pub mod native;
pub mod sevenz;
pub mod tar;

use crate::archiver::backend::native::NativeSevenZipBackend;
use crate::archiver::backend::sevenz::SevenZipBackend;
use crate::archiver::backend::tar::TarBackend;
use crate::archiver::file_ext::FileExtProvider;
use crate::archiver::path_resolver::{SourcePath, WorkingDir};
use crate::archiver::redacted::RedactedString;
use crate::archiver::result_error::error::Error;
use crate::archiver::result_error::result::Result;
use crate::archiver::result_error::WithDebugObjectAndFnName;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Archive container family selected by the `mode` setting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Mode {
    #[display("7z")]
    SevenZip,
    #[display("tar")]
    Tar,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "7z" => Ok(Mode::SevenZip),
            "tar" => Ok(Mode::Tar),
            other => Err(Error::UnknownMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// `mode` exactly as written in a preset; parsed into [`Mode`] when an archive
/// is resolved.
#[derive(Clone, Debug, PartialEq, Eq, From, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeName(String);

impl ModeName {
    pub fn parse(&self) -> Result<Mode> {
        self.0.parse()
    }
}

impl From<&str> for ModeName {
    fn from(value: &str) -> Self {
        ModeName(value.to_string())
    }
}

/// Writes one archive container from a list of sources.
///
/// Creates or overwrites `archive_path`. Every source is checked before the
/// file is created; a missing source fails with [`Error::MissingFile`].
pub trait ArchiveBackend {
    fn write(
        &self,
        archive_path: &Path,
        work_dir: &WorkingDir,
        files: &[SourcePath],
        password: Option<&RedactedString>,
    ) -> Result<()>;
}

#[derive(Clone, Debug, From, PartialEq, Eq)]
pub enum Backend {
    SevenZip(SevenZipBackend),
    NativeSevenZip(NativeSevenZipBackend),
    Tar(TarBackend),
}

impl ArchiveBackend for Backend {
    fn write(
        &self,
        archive_path: &Path,
        work_dir: &WorkingDir,
        files: &[SourcePath],
        password: Option<&RedactedString>,
    ) -> Result<()> {
        match self {
            Backend::SevenZip(b) => b.write(archive_path, work_dir, files, password),
            Backend::NativeSevenZip(b) => b.write(archive_path, work_dir, files, password),
            Backend::Tar(b) => b.write(archive_path, work_dir, files, password),
        }
        .with_debug_object_and_fn_name(self.clone(), "write")
    }
}

impl FileExtProvider for Backend {
    fn file_ext(&self) -> Option<impl AsRef<str>> {
        match self {
            Backend::SevenZip(_) | Backend::NativeSevenZip(_) => Some("7z".to_string()),
            Backend::Tar(b) => b.file_ext().map(|ext| ext.as_ref().to_string()),
        }
    }
}
