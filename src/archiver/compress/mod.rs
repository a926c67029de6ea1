pub mod xz;

use crate::archiver::file_ext::FileExtProvider;
use crate::archiver::finish::Finish;
use crate::archiver::result_error::result::Result;
use crate::archiver::result_error::WithDebugObjectAndFnName;
use bzip2::write::BzEncoder;
use derive_more::From;
use flate2::write::GzEncoder;
use io_enum::Write;
use liblzma::write::XzEncoder;
use serde::Serialize;
use std::io;
use std::io::Write;

/// Stream compressor wrapped around a tar container.
#[derive(Write, From)]
pub enum Compressor<W: Write> {
    None(W),
    GzEncoder(GzEncoder<W>),
    BzEncoder(BzEncoder<W>),
    XzEncoder(XzEncoder<W>),
}

#[derive(Clone, Default, Serialize, Debug, PartialEq, Eq)]
#[serde(tag = "compressor_type")]
#[serde(rename_all = "snake_case")]
pub enum CompressorConfig {
    #[default]
    None,
    Gzip,
    Bzip2,
    Xz(xz::XzConfig),
}

pub trait CompressorBuilder<W: Write> {
    fn build_compressor(&self, writer: W) -> Result<Compressor<W>>;
}

impl<W: Write> Finish<W> for Compressor<W> {
    fn finish(self) -> io::Result<W> {
        match self {
            Compressor::None(w) => Ok(w),
            Compressor::GzEncoder(w) => w.finish(),
            Compressor::BzEncoder(w) => w.finish(),
            Compressor::XzEncoder(w) => w.finish(),
        }
    }
}

impl<W: Write> CompressorBuilder<W> for CompressorConfig {
    fn build_compressor(&self, writer: W) -> Result<Compressor<W>> {
        match self {
            CompressorConfig::None => Ok(Compressor::None(writer)),
            CompressorConfig::Gzip => {
                tracing::debug!("Creating gzip compressor");
                Ok(GzEncoder::new(writer, flate2::Compression::default()).into())
            }
            CompressorConfig::Bzip2 => {
                tracing::debug!("Creating bzip2 compressor");
                Ok(BzEncoder::new(writer, bzip2::Compression::default()).into())
            }
            CompressorConfig::Xz(xz) => xz.build_compressor(writer),
        }
        .with_debug_object_and_fn_name(self.clone(), "build_compressor")
    }
}

impl FileExtProvider for CompressorConfig {
    fn file_ext(&self) -> Option<impl AsRef<str>> {
        match self {
            CompressorConfig::None => None,
            CompressorConfig::Gzip => Some("gz"),
            CompressorConfig::Bzip2 => Some("bz2"),
            CompressorConfig::Xz(_) => Some("xz"),
        }
    }
}
