use crate::archiver::backend::ArchiveBackend;
use crate::archiver::compress::xz::XzConfig;
use crate::archiver::compress::{CompressorBuilder, CompressorConfig};
use crate::archiver::file_ext::FileExtProvider;
use crate::archiver::finish::Finish;
use crate::archiver::path_resolver::{SourcePath, WorkingDir};
use crate::archiver::redacted::RedactedString;
use crate::archiver::result_error::result::Result;
use crate::archiver::source::collect_entries;
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fs::File;
use std::io::{BufWriter, IntoInnerError};
use std::path::Path;
use validator::Validate;

static TAR_FILE_EXT: &str = "tar";

/// Compression applied to the tar stream. `lzma` is accepted as another name
/// for `xz`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TarAlgo {
    #[default]
    None,
    #[serde(alias = "gz")]
    Gzip,
    #[serde(alias = "bz2")]
    Bzip2,
    #[serde(alias = "lzma")]
    Xz,
}

/// The `tar` block of a preset or archive
#[skip_serializing_none]
#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize, Deserialize, Validate, Builder)]
#[serde(deny_unknown_fields)]
pub struct TarOptions {
    pub algo: Option<TarAlgo>,
    /// xz preset (0-9), ignored by the other algorithms
    #[validate(range(min = 0, max = 9))]
    pub lvl: Option<u32>,
}

impl TarOptions {
    pub fn compressor(&self) -> CompressorConfig {
        let algo = self.algo.unwrap_or_default();
        if self.lvl.is_some() && algo != TarAlgo::Xz {
            tracing::debug!("lvl only applies to xz, ignoring it for {:?}", algo);
        }
        match algo {
            TarAlgo::None => CompressorConfig::None,
            TarAlgo::Gzip => CompressorConfig::Gzip,
            TarAlgo::Bzip2 => CompressorConfig::Bzip2,
            TarAlgo::Xz => CompressorConfig::Xz(XzConfig::builder().maybe_level(self.lvl).build()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TarBackend {
    compressor: CompressorConfig,
}

impl TarBackend {
    pub fn new(options: TarOptions) -> Self {
        Self {
            compressor: options.compressor(),
        }
    }
}

impl FileExtProvider for TarBackend {
    fn file_ext(&self) -> Option<impl AsRef<str>> {
        Some(match self.compressor.file_ext() {
            Some(ext) => format!("{TAR_FILE_EXT}.{}", ext.as_ref()),
            None => TAR_FILE_EXT.to_string(),
        })
    }
}

impl ArchiveBackend for TarBackend {
    fn write(
        &self,
        archive_path: &Path,
        work_dir: &WorkingDir,
        files: &[SourcePath],
        password: Option<&RedactedString>,
    ) -> Result<()> {
        let entries = collect_entries(work_dir, files)?;
        if password.is_some() {
            tracing::warn!(
                "tar has no encryption, {:?} is written without a password",
                archive_path
            );
        }

        let file = File::create(archive_path)?;
        let mut writer = tar::Builder::new(self.compressor.build_compressor(BufWriter::new(file))?);
        writer.follow_symlinks(true);

        for entry in &entries {
            tracing::trace!("Adding {:?} as {:?}", entry.src, entry.dst);
            if entry.is_dir {
                writer.append_dir(&entry.dst, &entry.src)?;
            } else {
                writer.append_path_with_name(&entry.src, &entry.dst)?;
            }
        }

        writer
            .into_inner()?
            .finish()?
            .into_inner()
            .map_err(IntoInnerError::into_error)?;

        tracing::info!("Wrote {:?}: {} entries", archive_path, entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archiver::path_resolver::resolve_files;
    use crate::archiver::result_error::error::Error;
    use std::io::Read;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("docs")).unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "hello").unwrap();
        std::fs::write(temp_dir.path().join("docs/b.txt"), "nested").unwrap();
        temp_dir
    }

    fn write(temp_dir: &TempDir, options: TarOptions, files: &[&str]) -> Result<PathBuf> {
        let raw: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
        let (work_dir, files) = resolve_files(&raw, temp_dir.path(), None);
        let backend = TarBackend::new(options);
        let archive_path = temp_dir
            .path()
            .join(format!("out.{}", backend.file_ext().unwrap().as_ref()));
        backend.write(&archive_path, &work_dir, &files, None)?;
        Ok(archive_path)
    }

    fn read_entries<R: Read>(reader: R) -> Vec<(String, String)> {
        let mut archive = tar::Archive::new(reader);
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let name = entry
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .trim_end_matches('/')
                    .to_string();
                let mut content = String::new();
                entry.read_to_string(&mut content).unwrap();
                (name, content)
            })
            .collect()
    }

    #[test]
    fn test_algo_aliases() {
        let lzma: TarOptions = serde_yml::from_str("algo: lzma").unwrap();
        assert_eq!(lzma.algo, Some(TarAlgo::Xz));
        let gz: TarOptions = serde_yml::from_str("algo: gz").unwrap();
        assert_eq!(gz.algo, Some(TarAlgo::Gzip));
        let bz2: TarOptions = serde_yml::from_str("algo: bz2").unwrap();
        assert_eq!(bz2.algo, Some(TarAlgo::Bzip2));
        assert!(serde_yml::from_str::<TarOptions>("algo: zstd").is_err());
        assert!(serde_yml::from_str::<TarOptions>("crypt_h: true").is_err());
    }

    #[test]
    fn test_level_only_reaches_xz() {
        let xz = TarOptions::builder().algo(TarAlgo::Xz).lvl(1).build();
        assert_eq!(
            xz.compressor(),
            CompressorConfig::Xz(XzConfig::builder().level(1).build())
        );

        let gzip = TarOptions::builder().algo(TarAlgo::Gzip).lvl(1).build();
        assert_eq!(gzip.compressor(), CompressorConfig::Gzip);
    }

    #[test]
    fn test_file_ext() {
        let ext = |algo| {
            TarBackend::new(TarOptions::builder().algo(algo).build())
                .file_ext()
                .unwrap()
                .as_ref()
                .to_string()
        };
        assert_eq!(ext(TarAlgo::None), "tar");
        assert_eq!(ext(TarAlgo::Gzip), "tar.gz");
        assert_eq!(ext(TarAlgo::Bzip2), "tar.bz2");
        assert_eq!(ext(TarAlgo::Xz), "tar.xz");
    }

    #[test]
    fn test_plain_tar_round_trip() {
        let temp_dir = fixture();
        let archive_path = write(&temp_dir, TarOptions::default(), &["a.txt", "docs"]).unwrap();

        let entries = read_entries(File::open(archive_path).unwrap());
        assert_eq!(
            entries,
            vec![
                ("a.txt".to_string(), "hello".to_string()),
                ("docs".to_string(), String::new()),
                ("docs/b.txt".to_string(), "nested".to_string()),
            ]
        );
    }

    #[test]
    fn test_gzip_single_file() {
        let temp_dir = fixture();
        let options = TarOptions::builder().algo(TarAlgo::Gzip).build();
        let archive_path = write(&temp_dir, options, &["a.txt"]).unwrap();
        assert!(archive_path.to_string_lossy().ends_with("out.tar.gz"));

        let entries = read_entries(flate2::read::GzDecoder::new(File::open(archive_path).unwrap()));
        assert_eq!(entries, vec![("a.txt".to_string(), "hello".to_string())]);
    }

    #[test]
    fn test_bzip2_and_xz_round_trip() {
        let temp_dir = fixture();

        let options = TarOptions::builder().algo(TarAlgo::Bzip2).build();
        let archive_path = write(&temp_dir, options, &["docs/*"]).unwrap();
        let entries = read_entries(bzip2::read::BzDecoder::new(File::open(archive_path).unwrap()));
        assert_eq!(entries, vec![("docs/b.txt".to_string(), "nested".to_string())]);

        let options = TarOptions::builder().algo(TarAlgo::Xz).lvl(9).build();
        let archive_path = write(&temp_dir, options, &["a.txt"]).unwrap();
        let entries =
            read_entries(liblzma::read::XzDecoder::new(File::open(archive_path).unwrap()));
        assert_eq!(entries, vec![("a.txt".to_string(), "hello".to_string())]);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = fixture();
        match write(&temp_dir, TarOptions::default(), &["a.txt", "ghost"]) {
            Err(Error::MissingFile { path }) => assert_eq!(path, PathBuf::from("ghost")),
            r => panic!("Expected MissingFile, got {r:?}"),
        }
        assert!(!temp_dir.path().join("out.tar").exists());
    }
}
