//! Per-invocation settings threaded through preset processing.

use crate::archiver::result_error::result::Result;
use bon::Builder;
use getset::{CopyGetters, Getters};
use std::path::PathBuf;

/// Values that used to be process-wide state: verbosity and the directory the
/// tool was started from. Relative `outdir` and `root` settings are resolved
/// against `base_dir`.
#[derive(Clone, Debug, Builder, Getters, CopyGetters)]
pub struct RunContext {
    #[builder(default)]
    #[getset(get_copy = "pub")]
    verbose: bool,
    #[builder(into)]
    #[getset(get = "pub")]
    base_dir: PathBuf,
    /// Pins the external 7z executable instead of searching `PATH`.
    #[builder(into)]
    #[getset(get = "pub")]
    sevenzip_bin: Option<PathBuf>,
}

impl RunContext {
    pub fn from_current_dir(verbose: bool, sevenzip_bin: Option<PathBuf>) -> Result<Self> {
        Ok(Self::builder()
            .verbose(verbose)
            .base_dir(std::env::current_dir()?)
            .maybe_sevenzip_bin(sevenzip_bin)
            .build())
    }
}
