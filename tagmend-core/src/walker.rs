//! Recursive batch driver.
//!
//! Visits every regular file under a root, depth-first, feeding each through
//! the pipeline with the caller's fix set. Any failure scoped to one entry
//! (pipeline failure, unstattable entry, non-UTF-8 name) is handed to the
//! sink and the walk continues; only a failure reading a directory itself
//! aborts the batch. Sibling order is whatever the filesystem yields and
//! must not be relied upon.

use crate::pipeline::{PipelineError, bludgeon_tag};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tagmend_types::{BatchResult, FixSet, TagOutcome};
use tracing::debug;

/// Walk `root` recursively, bludgeoning every regular file.
///
/// The sink sees each file's path and result as it completes; the returned
/// counters accumulate over the whole walk. A file that failed counts in
/// `total` and never in `success`.
pub fn bludgeon_dir(
    root: &Utf8Path,
    fixes: FixSet,
    on_file: &mut dyn FnMut(&Utf8Path, Result<TagOutcome, PipelineError>),
) -> anyhow::Result<BatchResult> {
    let mut batch = BatchResult::default();
    walk(root, fixes, on_file, &mut batch)?;
    debug!(%root, total = batch.total, success = batch.success, "batch walk finished");
    Ok(batch)
}

fn walk(
    dir: &Utf8Path,
    fixes: FixSet,
    on_file: &mut dyn FnMut(&Utf8Path, Result<TagOutcome, PipelineError>),
    batch: &mut BatchResult,
) -> anyhow::Result<()> {
    for entry in fs::read_dir(dir.as_std_path()).with_context(|| format!("read directory {dir}"))? {
        let entry = entry.with_context(|| format!("read directory {dir}"))?;
        let path = match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(path) => path,
            Err(raw) => {
                let lossy = Utf8PathBuf::from(raw.to_string_lossy().into_owned());
                batch.record(false);
                on_file(&lossy, Err(PipelineError::NonUtf8Path { path: lossy.clone() }));
                continue;
            }
        };
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(source) => {
                batch.record(false);
                on_file(
                    &path,
                    Err(PipelineError::Stat {
                        path: path.clone(),
                        source,
                    }),
                );
                continue;
            }
        };

        if file_type.is_dir() {
            walk(&path, fixes, on_file, batch)?;
        } else if file_type.is_file() {
            let result = bludgeon_tag(&path, fixes);
            batch.record(matches!(&result, Ok(outcome) if outcome.bludgeoned));
            on_file(&path, result);
        }
    }
    Ok(())
}
