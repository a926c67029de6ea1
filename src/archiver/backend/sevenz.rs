//! 7z containers written in-process.

use crate::archiver::backend::ArchiveBackend;
use crate::archiver::path_resolver::{SourcePath, WorkingDir};
use crate::archiver::redacted::RedactedString;
use crate::archiver::result_error::error::Error;
use crate::archiver::result_error::result::Result;
use crate::archiver::result_error::WithMsg;
use crate::archiver::source::collect_entries;
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::path::Path;
use validator::Validate;
use zesven::codec::CodecMethod;
use zesven::{ArchivePath, Password, WriteOptions, Writer};

/// Compression level used when `lvl` is not set
pub static DEFAULT_COMPRESSION_LEVEL: u32 = 5;

/// Compression filter applied to every 7z entry
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SevenZipAlgo {
    #[default]
    Lzma2,
    Lzma,
    Bzip2,
    Ppmd,
    Deflate,
    Copy,
}

impl SevenZipAlgo {
    pub fn codec_method(&self) -> CodecMethod {
        match self {
            SevenZipAlgo::Lzma2 => CodecMethod::Lzma2,
            SevenZipAlgo::Lzma => CodecMethod::Lzma,
            SevenZipAlgo::Bzip2 => CodecMethod::BZip2,
            SevenZipAlgo::Ppmd => CodecMethod::PPMd,
            SevenZipAlgo::Deflate => CodecMethod::Deflate,
            SevenZipAlgo::Copy => CodecMethod::Copy,
        }
    }

    /// Method name understood by the `-m0=` switch of the 7z executable
    pub fn switch_name(&self) -> &'static str {
        match self {
            SevenZipAlgo::Lzma2 => "LZMA2",
            SevenZipAlgo::Lzma => "LZMA",
            SevenZipAlgo::Bzip2 => "BZip2",
            SevenZipAlgo::Ppmd => "PPMd",
            SevenZipAlgo::Deflate => "Deflate",
            SevenZipAlgo::Copy => "Copy",
        }
    }
}

/// The `7z` block of a preset or archive
#[skip_serializing_none]
#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize, Deserialize, Validate, Builder)]
#[serde(deny_unknown_fields)]
pub struct SevenZipOptions {
    pub algo: Option<SevenZipAlgo>,
    /// Compression level (0-9)
    #[validate(range(min = 0, max = 9))]
    pub lvl: Option<u32>,
    /// Also encrypt the file listing. Needs a password.
    pub crypt_h: Option<bool>,
    /// Shell out to a 7z executable instead of writing in-process
    pub native: Option<bool>,
}

impl SevenZipOptions {
    pub fn algo(&self) -> SevenZipAlgo {
        self.algo.unwrap_or_default()
    }

    pub fn encrypt_header(&self) -> bool {
        self.crypt_h.unwrap_or(false)
    }

    pub fn native(&self) -> bool {
        self.native.unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SevenZipBackend {
    options: SevenZipOptions,
}

impl SevenZipBackend {
    pub fn new(options: SevenZipOptions) -> Self {
        Self { options }
    }

    fn write_options(&self, password: Option<&RedactedString>) -> Result<WriteOptions> {
        let mut options = WriteOptions::new()
            .method(self.options.algo().codec_method())
            .level(self.options.lvl.unwrap_or(DEFAULT_COMPRESSION_LEVEL))?;

        // An empty password is the same as none.
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            options = options
                .password(Password::new(password.inner().as_str()))
                .encrypt_data(true)
                .encrypt_header(self.options.encrypt_header());
        } else if self.options.encrypt_header() {
            tracing::warn!("crypt_h is set without a password, header stays readable");
        }

        Ok(options)
    }
}

impl ArchiveBackend for SevenZipBackend {
    fn write(
        &self,
        archive_path: &Path,
        work_dir: &WorkingDir,
        files: &[SourcePath],
        password: Option<&RedactedString>,
    ) -> Result<()> {
        let entries = collect_entries(work_dir, files)?;
        let options = self.write_options(password)?;
        tracing::debug!("Writing 7z archive {:?} with {:?}", archive_path, options);

        let mut writer = Writer::create_path(archive_path)?.options(options);
        for entry in &entries {
            tracing::trace!("Adding {:?} as {:?}", entry.src, entry.dst);
            writer
                .add_path(&entry.src, ArchivePath::new(&entry.dst)?)
                .map_err(Error::from)
                .with_msg(format!("Adding {:?} failed", entry.src))?;
        }

        let result = writer.finish()?;
        tracing::info!(
            "Wrote {:?}: {} files, {} directories, {} -> {} bytes",
            archive_path,
            result.entries_written,
            result.directories_written,
            result.total_size,
            result.compressed_size
        );
        Ok(())
    }
}
