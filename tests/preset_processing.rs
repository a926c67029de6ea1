use auto_archive::archiver::context::RunContext;
use auto_archive::archiver::preset::Preset;
use auto_archive::archiver::processor::process_preset;
use auto_archive::archiver::result_error::error::Error;
use chrono::Local;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zesven::Archive;

fn preset(yaml: &str) -> Preset {
    serde_yml::from_str(yaml).unwrap()
}

fn ctx(base_dir: &Path) -> RunContext {
    RunContext::builder().base_dir(base_dir).build()
}

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("data/docs")).unwrap();
    std::fs::create_dir_all(root.join("data/photos/raw")).unwrap();
    std::fs::write(root.join("a.txt"), "hello").unwrap();
    std::fs::write(root.join("data/docs/report.txt"), "report").unwrap();
    std::fs::write(root.join("data/photos/one.jpg"), "one").unwrap();
    std::fs::write(root.join("data/photos/two.jpg"), "two").unwrap();
    std::fs::write(root.join("data/photos/raw/big.raw"), "raw").unwrap();
    temp_dir
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap().path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn tar_entries<R: Read>(reader: R) -> Vec<(String, String)> {
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

fn sevenz_names(path: &Path) -> Vec<String> {
    let archive = Archive::open_path(path).unwrap();
    let mut names: Vec<_> = archive
        .entries()
        .iter()
        .map(|e| e.path.as_str().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn tar_gzip_single_file() {
    let temp_dir = fixture();
    let preset = preset("archives:\n  notes:\n    mode: tar\n    tar:\n      algo: gzip\n    files: [a.txt]\n");

    process_preset(&preset, &ctx(temp_dir.path())).unwrap();

    let archive = File::open(temp_dir.path().join("notes.tar.gz")).unwrap();
    assert_eq!(
        tar_entries(flate2::read::GzDecoder::new(archive)),
        vec![("a.txt".to_string(), "hello".to_string())]
    );
}

#[test]
fn tar_ignores_password() {
    let temp_dir = fixture();
    let preset = preset("mode: tar\npass: secret\narchives:\n  notes:\n    files: [a.txt]\n");

    process_preset(&preset, &ctx(temp_dir.path())).unwrap();

    let archive = File::open(temp_dir.path().join("notes.tar")).unwrap();
    assert_eq!(
        tar_entries(archive),
        vec![("a.txt".to_string(), "hello".to_string())]
    );
}

#[test]
fn sevenz_encrypted_header_hides_listing() {
    let temp_dir = fixture();
    let preset = preset(
        "mode: 7z\npass: secret\n7z:\n  crypt_h: true\narchives:\n  vault:\n    files: [a.txt]\n",
    );

    process_preset(&preset, &ctx(temp_dir.path())).unwrap();

    let path = temp_dir.path().join("vault.7z");
    assert!(Archive::open_path(&path).is_err());
    let mut archive = Archive::open_path_with_password(&path, "secret").unwrap();
    assert_eq!(archive.extract_to_vec("a.txt").unwrap(), b"hello");
}

#[test]
fn missing_mode_writes_nothing() {
    let temp_dir = fixture();
    let before = list_files(temp_dir.path());
    let preset = preset("outdir: out\narchives:\n  notes:\n    files: [a.txt]\n");

    let err = process_preset(&preset, &ctx(temp_dir.path())).unwrap_err();

    match err.root_cause() {
        Error::MissingRequiredSetting { key } => assert_eq!(*key, "mode"),
        e => panic!("Expected MissingRequiredSetting, got {e:?}"),
    }
    assert_eq!(list_files(temp_dir.path()), before);
}

#[test]
fn unknown_mode_aborts_preset() {
    let temp_dir = fixture();
    let preset = preset("archives:\n  first:\n    mode: rar\n    files: [a.txt]\n  second:\n    mode: tar\n    files: [a.txt]\n");

    let err = process_preset(&preset, &ctx(temp_dir.path())).unwrap_err();

    match err.root_cause() {
        Error::UnknownMode { mode } => assert_eq!(mode, "rar"),
        e => panic!("Expected UnknownMode, got {e:?}"),
    }
    assert!(!temp_dir.path().join("second.tar").exists());
}

#[test]
fn missing_file_is_named_as_declared() {
    let temp_dir = fixture();
    for (mode, missing) in [
        ("tar", "data/nope.txt"),
        ("7z", "data/nope.txt"),
        ("tar", "data/empty/*"),
        ("7z", "data/missing/*"),
    ] {
        std::fs::create_dir_all(temp_dir.path().join("data/empty")).unwrap();
        let preset = preset(&format!(
            "mode: {mode}\narchives:\n  broken:\n    files: [a.txt, \"{missing}\"]\n"
        ));

        let err = process_preset(&preset, &ctx(temp_dir.path())).unwrap_err();

        match err.root_cause() {
            Error::MissingFile { path } => assert_eq!(path, Path::new(missing)),
            e => panic!("Expected MissingFile for {mode} {missing}, got {e:?}"),
        }
        assert!(!temp_dir.path().join(format!("broken.{mode}")).exists());
    }
}

#[test]
fn archive_level_overrides_preset_level() {
    let temp_dir = fixture();
    let preset = preset(
        r#"
mode: 7z
pass: preset-pass
outdir: preset-out
root: data/docs
7z:
  crypt_h: true
archives:
  photos:
    pass: archive-pass
    outdir: archive-out
    root: data/photos
    7z:
      algo: bzip2
    files: [one.jpg]
"#,
    );

    process_preset(&preset, &ctx(temp_dir.path())).unwrap();

    assert!(!temp_dir.path().join("preset-out").exists());
    let path = temp_dir.path().join("archive-out/photos.7z");
    // The archive-level 7z map has no crypt_h, so the listing stays readable.
    assert_eq!(sevenz_names(&path), vec!["one.jpg"]);
    let mut archive = Archive::open_path_with_password(&path, "archive-pass").unwrap();
    assert_eq!(archive.extract_to_vec("one.jpg").unwrap(), b"one");
}

#[test]
fn tar_options_override_whole_map() {
    let temp_dir = fixture();
    let preset = preset(
        "mode: tar\ntar:\n  algo: xz\n  lvl: 9\narchives:\n  plain:\n    tar: {}\n    files: [a.txt]\n  packed:\n    files: [a.txt]\n",
    );

    process_preset(&preset, &ctx(temp_dir.path())).unwrap();

    assert!(temp_dir.path().join("plain.tar").is_file());
    let packed = File::open(temp_dir.path().join("packed.tar.xz")).unwrap();
    assert_eq!(
        tar_entries(liblzma::read::XzDecoder::new(packed)),
        vec![("a.txt".to_string(), "hello".to_string())]
    );
}

#[test]
fn wildcard_and_directory_sources() {
    let temp_dir = fixture();
    let preset = preset(
        "mode: 7z\nroot: data\narchives:\n  mixed:\n    files: [docs, \"photos/*\"]\n",
    );

    process_preset(&preset, &ctx(temp_dir.path())).unwrap();

    assert_eq!(
        sevenz_names(&temp_dir.path().join("mixed.7z")),
        vec!["docs", "docs/report.txt", "photos/one.jpg", "photos/two.jpg"]
    );
}

#[test]
fn absolute_sources_are_rewritten_under_root() {
    let temp_dir = fixture();
    let absolute = temp_dir.path().join("data/docs/report.txt");
    let preset = preset(&format!(
        "mode: tar\nroot: data\narchives:\n  docs:\n    files: [\"{}\"]\n",
        absolute.display()
    ));

    process_preset(&preset, &ctx(temp_dir.path())).unwrap();

    let archive = File::open(temp_dir.path().join("docs.tar")).unwrap();
    assert_eq!(
        tar_entries(archive),
        vec![("docs/report.txt".to_string(), "report".to_string())]
    );
}

#[test]
fn timestamp_suffix_uses_current_date() {
    let temp_dir = fixture();
    let preset = preset(
        "mode: tar\ntimestamp: true\narchives:\n  first:\n    files: [a.txt]\n  second:\n    files: [a.txt]\n",
    );
    let before = Local::now().format("%Y-%m-%d").to_string();

    process_preset(&preset, &ctx(temp_dir.path())).unwrap();

    let after = Local::now().format("%Y-%m-%d").to_string();
    for name in ["first", "second"] {
        let stamped = |day: &str| temp_dir.path().join(format!("{name} {day}.tar"));
        assert!(stamped(&before).is_file() || stamped(&after).is_file());
    }
}

#[test]
fn working_directory_is_unchanged() {
    let temp_dir = fixture();
    let cwd = std::env::current_dir().unwrap();

    let ok = preset("mode: tar\nroot: data\narchives:\n  ok:\n    files: [docs]\n");
    process_preset(&ok, &ctx(temp_dir.path())).unwrap();
    assert_eq!(std::env::current_dir().unwrap(), cwd);

    let broken = preset("mode: tar\nroot: data\narchives:\n  broken:\n    files: [nope]\n");
    assert!(process_preset(&broken, &ctx(temp_dir.path())).is_err());
    assert_eq!(std::env::current_dir().unwrap(), cwd);
}
