//! Layered lookup of archive settings.
//!
//! An archive's own values win over the preset's. Option blocks (`7z`, `tar`)
//! are taken whole from the first layer that has one; they are never merged
//! key by key.

use crate::archiver::backend::sevenz::SevenZipOptions;
use crate::archiver::backend::tar::TarOptions;
use crate::archiver::backend::{Mode, ModeName};
use crate::archiver::redacted::RedactedString;
use crate::archiver::result_error::error::Error;
use crate::archiver::result_error::result::Result;
use std::path::Path;

/// Timestamp format used when `timestamp` is on and no custom format is set
pub static DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d";

/// One level of settings. Every accessor returns `None` when the key is unset
/// at that level.
pub trait SettingSource {
    fn mode(&self) -> Option<&ModeName>;
    fn password(&self) -> Option<&RedactedString>;
    fn outdir(&self) -> Option<&Path>;
    fn root(&self) -> Option<&Path>;
    fn timestamp(&self) -> Option<bool>;
    fn custom_timestamp(&self) -> Option<&str>;
    fn sevenzip(&self) -> Option<&SevenZipOptions>;
    fn tar(&self) -> Option<&TarOptions>;
}

/// Setting sources queried in priority order
pub struct SettingLayers<'a> {
    layers: Vec<&'a dyn SettingSource>,
}

impl<'a> SettingLayers<'a> {
    pub fn new(layers: Vec<&'a dyn SettingSource>) -> Self {
        Self { layers }
    }

    /// First value any layer has for a key
    pub fn lookup<T, F>(&self, get: F) -> Option<T>
    where
        F: Fn(&'a dyn SettingSource) -> Option<T>,
    {
        self.layers.iter().find_map(|layer| get(*layer))
    }

    /// Like [`lookup`](Self::lookup), but a key nobody sets is an error
    pub fn require<T, F>(&self, key: &'static str, get: F) -> Result<T>
    where
        F: Fn(&'a dyn SettingSource) -> Option<T>,
    {
        self.lookup(get)
            .ok_or(Error::MissingRequiredSetting { key })
    }

    pub fn mode(&self) -> Result<Mode> {
        self.require("mode", |l| l.mode())?.parse()
    }

    pub fn password(&self) -> Option<&'a RedactedString> {
        self.lookup(|l| l.password())
    }

    pub fn outdir(&self) -> Option<&'a Path> {
        self.lookup(|l| l.outdir())
    }

    pub fn root(&self) -> Option<&'a Path> {
        self.lookup(|l| l.root())
    }

    /// Timestamp format to append to the archive name, `None` when
    /// timestamping is off.
    pub fn timestamp_format(&self) -> Option<&'a str> {
        if !self.lookup(|l| l.timestamp()).unwrap_or(false) {
            return None;
        }
        Some(
            self.lookup(|l| l.custom_timestamp().filter(|f| !f.is_empty()))
                .unwrap_or(DEFAULT_TIMESTAMP_FORMAT),
        )
    }

    pub fn sevenzip(&self) -> SevenZipOptions {
        self.lookup(|l| l.sevenzip()).cloned().unwrap_or_default()
    }

    pub fn tar(&self) -> TarOptions {
        self.lookup(|l| l.tar()).cloned().unwrap_or_default()
    }
}
