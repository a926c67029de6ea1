//! Runs every archive of a preset, and every preset of an invocation.

use crate::archiver::context::RunContext;
use crate::archiver::function_path;
use crate::archiver::job::ResolvedArchiveJob;
use crate::archiver::preset::Preset;
use crate::archiver::result_error::result::Result;
use crate::archiver::result_error::{WithFunctionName, WithMsg};
use chrono::Local;
use function_name::named;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Builds the archives of `preset` in document order. The first failing
/// archive stops the preset; archives already written are left in place.
#[named]
pub fn process_preset(preset: &Preset, ctx: &RunContext) -> Result<()> {
    for (name, spec) in preset.archives.iter() {
        let job = ResolvedArchiveJob::resolve(name, spec, preset, ctx, &Local::now())
            .with_msg(format!("Resolving archive {name:?} failed"))?;

        if ctx.verbose() {
            info!("{job:#?}");
        } else {
            debug!("Resolved archive {:?} -> {:?}", name, job.archive_path());
        }

        job.run()
            .with_fn_name(function_path!())
            .with_msg(format!("Archive {name:?} failed"))?;
    }

    Ok(())
}

/// Loads and processes each preset in order, stopping at the first error.
pub fn run<P: AsRef<Path>>(presets: &[P], ctx: &RunContext) -> Result<()> {
    for path in presets {
        let path = path.as_ref();
        let started = Instant::now();
        let preset = Preset::load(path)?;
        info!("Processing preset {:?}: {} archives", path, preset.archives.len());

        process_preset(&preset, ctx).with_msg(format!("Preset {path:?} failed"))?;

        if ctx.verbose() {
            info!("Preset {:?} done in {:?}", path, started.elapsed());
        }
    }

    Ok(())
}
