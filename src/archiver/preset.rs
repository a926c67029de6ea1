//! Preset documents: preset-wide defaults plus the archives to build.

use crate::archiver::backend::sevenz::SevenZipOptions;
use crate::archiver::backend::tar::TarOptions;
use crate::archiver::backend::ModeName;
use crate::archiver::redacted::RedactedString;
use crate::archiver::result_error::error::Error;
use crate::archiver::result_error::result::Result;
use crate::archiver::result_error::WithMsg;
use crate::archiver::setting::SettingSource;
use crate::archiver::validate::{validate_timestamp_format, validate_valid_archive_name};
use bon::Builder;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::skip_serializing_none;
use std::fmt::Formatter;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    pub mode: Option<ModeName>,
    #[serde(rename = "pass")]
    #[validate(nested)]
    #[builder(into)]
    pub password: Option<RedactedString>,
    #[builder(into)]
    pub outdir: Option<PathBuf>,
    #[builder(into)]
    pub root: Option<PathBuf>,
    pub timestamp: Option<bool>,
    #[validate(custom(function = validate_timestamp_format))]
    #[builder(into)]
    pub custom_timestamp: Option<String>,
    #[serde(rename = "7z")]
    #[validate(nested)]
    pub sevenzip: Option<SevenZipOptions>,
    #[validate(nested)]
    pub tar: Option<TarOptions>,
    #[validate(nested)]
    pub archives: ArchiveSpecs,
}

/// One archive of a preset. Every setting overrides the preset's.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder)]
#[serde(deny_unknown_fields)]
pub struct ArchiveSpec {
    pub mode: Option<ModeName>,
    #[serde(rename = "pass")]
    #[validate(nested)]
    #[builder(into)]
    pub password: Option<RedactedString>,
    #[builder(into)]
    pub outdir: Option<PathBuf>,
    #[builder(into)]
    pub root: Option<PathBuf>,
    pub timestamp: Option<bool>,
    #[validate(custom(function = validate_timestamp_format))]
    #[builder(into)]
    pub custom_timestamp: Option<String>,
    #[serde(rename = "7z")]
    #[validate(nested)]
    pub sevenzip: Option<SevenZipOptions>,
    #[validate(nested)]
    pub tar: Option<TarOptions>,
    /// Files, directories, or `dir/*` for the regular files directly in `dir`
    pub files: Vec<PathBuf>,
}

macro_rules! impl_setting_source {
    ($($t:ty),+) => {
        $(
            impl SettingSource for $t {
                fn mode(&self) -> Option<&ModeName> {
                    self.mode.as_ref()
                }

                fn password(&self) -> Option<&RedactedString> {
                    self.password.as_ref()
                }

                fn outdir(&self) -> Option<&Path> {
                    self.outdir.as_deref()
                }

                fn root(&self) -> Option<&Path> {
                    self.root.as_deref()
                }

                fn timestamp(&self) -> Option<bool> {
                    self.timestamp
                }

                fn custom_timestamp(&self) -> Option<&str> {
                    self.custom_timestamp.as_deref()
                }

                fn sevenzip(&self) -> Option<&SevenZipOptions> {
                    self.sevenzip.as_ref()
                }

                fn tar(&self) -> Option<&TarOptions> {
                    self.tar.as_ref()
                }
            }
        )+
    };
}

impl_setting_source!(Preset, ArchiveSpec);

/// The `archives` mapping, kept in document order.
#[derive(Clone, Debug, Default)]
pub struct ArchiveSpecs(Vec<(String, ArchiveSpec)>);

impl ArchiveSpecs {
    pub fn new(specs: Vec<(String, ArchiveSpec)>) -> Self {
        Self(specs)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArchiveSpec)> {
        self.0.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ArchiveSpec)> for ArchiveSpecs {
    fn from_iter<I: IntoIterator<Item = (S, ArchiveSpec)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, s)| (n.into(), s)).collect())
    }
}

impl Validate for ArchiveSpecs {
    /// Checks every archive; name errors go under `archive_name`, setting
    /// errors under `archives` by position.
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut nested = BTreeMap::new();
        for (index, (name, spec)) in self.0.iter().enumerate() {
            if let Err(e) = validate_valid_archive_name(name) {
                errors.add("archive_name", e);
            }
            if let Err(e) = spec.validate() {
                nested.insert(index, Box::new(e));
            }
        }

        if !nested.is_empty() {
            errors
                .errors_mut()
                .insert("archives".into(), ValidationErrorsKind::List(nested));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Serialize for ArchiveSpecs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, spec) in &self.0 {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

struct ArchiveSpecsVisitor;

impl<'de> Visitor<'de> for ArchiveSpecsVisitor {
    type Value = ArchiveSpecs;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a mapping from archive name to archive settings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut specs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, spec)) = map.next_entry::<String, ArchiveSpec>()? {
            if specs.iter().any(|(n, _): &(String, ArchiveSpec)| n == &name) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate archive name {name:?}"
                )));
            }
            specs.push((name, spec));
        }
        Ok(ArchiveSpecs(specs))
    }
}

impl<'de> Deserialize<'de> for ArchiveSpecs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(ArchiveSpecsVisitor)
    }
}

impl Preset {
    /// Reads and validates a preset document.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        File::open(path)
            .map_err(Error::from)
            .with_msg(format!("Open preset failed: {path:?}"))
            .and_then(|f| {
                serde_yml::from_reader::<_, Preset>(f)
                    .map_err(Error::from)
                    .with_msg(format!("Parse YAML preset failed: {path:?}"))
            })
            .and_then(|preset| {
                preset
                    .validate()
                    .map_err(Error::from)
                    .map(|_| preset)
                    .with_msg(format!("Preset validation failed: {path:?}"))
            })
    }
}
