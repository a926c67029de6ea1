use crate::archiver::compress::{Compressor, CompressorBuilder};
use crate::archiver::result_error::result::Result;
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::io::Write;
use validator::Validate;

/// Default xz preset, same as the `xz` command line tool
pub static DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Configuration for XZ (LZMA2) compression of a tar stream
#[skip_serializing_none]
#[derive(Clone, Default, Validate, Serialize, Deserialize, Debug, PartialEq, Eq, Builder)]
#[serde(deny_unknown_fields)]
pub struct XzConfig {
    /// Compression preset (0-9)
    #[validate(range(min = 0, max = 9))]
    level: Option<u32>,
}

impl XzConfig {
    pub fn level(&self) -> u32 {
        self.level.unwrap_or(DEFAULT_COMPRESSION_LEVEL)
    }
}

impl<W: Write> CompressorBuilder<W> for XzConfig {
    fn build_compressor(&self, writer: W) -> Result<Compressor<W>> {
        let level = self.level();
        tracing::debug!("Creating XZ compressor with level={}", level);
        Ok(liblzma::write::XzEncoder::new(writer, level).into())
    }
}
