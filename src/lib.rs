//! # auto_archive
//!
//! Builds 7z and tar archives from declarative YAML presets.
//!
//! ## Features
//!
//! - **Presets**: preset-wide defaults with per-archive overrides
//! - **7z**: in-process writer or an external `7z` executable, optional AES
//!   encryption of content and file listing
//! - **tar**: plain, gzip, bzip2 or xz compressed
//! - **Naming**: output directory, working root and date suffixes per archive
//!
//! ## Quick Start
//!
//! ```no_run
//! use auto_archive::archiver::context::RunContext;
//! use auto_archive::archiver::preset::Preset;
//! use auto_archive::archiver::processor::process_preset;
//!
//! let preset = Preset::load("preset.yml")?;
//! let ctx = RunContext::from_current_dir(false, None)?;
//! process_preset(&preset, &ctx)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archiver;
