//! Turns one archive of a preset into a fully resolved job.

use crate::archiver::backend::native::NativeSevenZipBackend;
use crate::archiver::backend::sevenz::SevenZipBackend;
use crate::archiver::backend::tar::TarBackend;
use crate::archiver::backend::{ArchiveBackend, Backend, Mode};
use crate::archiver::context::RunContext;
use crate::archiver::file_ext::FileExtProvider;
use crate::archiver::function_path;
use crate::archiver::path_resolver::{normalize, resolve_files, SourcePath, WorkingDir};
use crate::archiver::preset::{ArchiveSpec, Preset};
use crate::archiver::redacted::RedactedString;
use crate::archiver::result_error::error::Error;
use crate::archiver::result_error::result::Result;
use crate::archiver::result_error::{WithDebugObjectAndFnName, WithFunctionName};
use crate::archiver::setting::{SettingLayers, SettingSource};
use crate::archiver::validate::is_valid_timestamp_format;
use chrono::{DateTime, Local};
use function_name::named;
use getset::Getters;
use std::path::PathBuf;

/// Everything needed to write one archive, with all settings resolved.
#[derive(Clone, Debug, Getters)]
#[getset(get = "pub")]
pub struct ResolvedArchiveJob {
    name: String,
    /// Absolute output path including extension and timestamp suffix
    archive_path: PathBuf,
    password: Option<RedactedString>,
    backend: Backend,
    work_dir: WorkingDir,
    files: Vec<SourcePath>,
}

impl ResolvedArchiveJob {
    /// Resolves `spec` against its `preset`. Touches nothing on disk.
    ///
    /// `now` is the instant used for the timestamp suffix.
    #[named]
    pub fn resolve(
        name: &str,
        spec: &ArchiveSpec,
        preset: &Preset,
        ctx: &RunContext,
        now: &DateTime<Local>,
    ) -> Result<Self> {
        let layers = SettingLayers::new(vec![spec as &dyn SettingSource, preset]);

        let backend = Self::select_backend(&layers, ctx).with_fn_name(function_path!())?;

        let base_name = match layers.timestamp_format() {
            Some(format) if !is_valid_timestamp_format(format) => {
                return Err(Error::InvalidTimestampFormat {
                    format: format.to_string(),
                })
            }
            Some(format) => format!("{name} {}", now.format(format)),
            None => name.to_string(),
        };
        let file_name = match backend.file_ext() {
            Some(ext) => format!("{base_name}.{}", ext.as_ref()),
            None => base_name,
        };

        let out_dir = match layers.outdir() {
            Some(outdir) => ctx.base_dir().join(outdir),
            None => ctx.base_dir().clone(),
        };
        let archive_path = normalize(&out_dir.join(file_name));

        let (work_dir, files) = resolve_files(&spec.files, ctx.base_dir(), layers.root());

        Ok(Self {
            name: name.to_string(),
            archive_path,
            password: layers.password().cloned(),
            backend,
            work_dir,
            files,
        })
    }

    fn select_backend(layers: &SettingLayers, ctx: &RunContext) -> Result<Backend> {
        Ok(match layers.mode()? {
            Mode::SevenZip => {
                let options = layers.sevenzip();
                if options.native() {
                    NativeSevenZipBackend::new(options, ctx.sevenzip_bin().clone()).into()
                } else {
                    SevenZipBackend::new(options).into()
                }
            }
            Mode::Tar => TarBackend::new(layers.tar()).into(),
        })
    }

    /// Creates the output directory and writes the archive.
    #[named]
    pub fn run(&self) -> Result<()> {
        if let Some(parent) = self.archive_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(Error::from)
                .with_fn_name(function_path!())?;
        }

        self.backend
            .write(
                &self.archive_path,
                &self.work_dir,
                &self.files,
                self.password.as_ref(),
            )
            .with_debug_object_and_fn_name(self.name.clone(), function_path!())
    }
}
