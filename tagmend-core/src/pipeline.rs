//! The per-file pipeline: open, validate header, parse, run fixes, and
//! conditionally rewrite.
//!
//! Every step is a hard gate: a file with a malformed header never reaches
//! the body parser, and a file that does not parse never reaches the fixers.
//! Findings themselves are data on the normal return path, never errors.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::Write as _;
use tagmend_fixers::builtin_fixers;
use tagmend_tag::{HEADER_LEN, HeaderError, ParseError, TagHeader, parse_body, serialize};
use tagmend_types::{FixSet, TagOutcome};
use thiserror::Error;
use tracing::debug;

/// Terminal failure for one file. Never aborts a batch walk; always carries
/// the path it happened on.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to open {path}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed header in {path}")]
    MalformedHeader {
        path: Utf8PathBuf,
        #[source]
        source: HeaderError,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to write {path}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stat {path}")]
    Stat {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path { path: Utf8PathBuf },
}

impl PipelineError {
    pub fn path(&self) -> &Utf8Path {
        match self {
            PipelineError::Open { path, .. }
            | PipelineError::MalformedHeader { path, .. }
            | PipelineError::Parse { path, .. }
            | PipelineError::Write { path, .. }
            | PipelineError::Stat { path, .. }
            | PipelineError::NonUtf8Path { path } => path,
        }
    }
}

/// Run one tag through the pipeline.
///
/// An empty `fixes` set runs every registered fix in detect mode and never
/// touches the disk. A non-empty set runs exactly its members in apply mode
/// and atomically rewrites the file in place iff any of them changed the
/// graph. Fixes not in the set are not invoked at all.
pub fn bludgeon_tag(path: &Utf8Path, fixes: FixSet) -> Result<TagOutcome, PipelineError> {
    let data = fs::read(path).map_err(|source| PipelineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let header = TagHeader::read(&data).map_err(|source| PipelineError::MalformedHeader {
        path: path.to_path_buf(),
        source,
    })?;

    let mut graph =
        parse_body(header.class, &data[HEADER_LEN..]).map_err(|source| PipelineError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(%path, class = %header.class, body_len = header.body_len, "parsed tag");

    // The registry's fixed order, every invocation, so that output is
    // reproducible and upstream defect classes are handled first.
    let mut outcome = TagOutcome::default();
    let detect_only = fixes.is_empty();
    for fixer in builtin_fixers() {
        if detect_only {
            if fixer.run(&mut graph, false) {
                outcome.record(fixer.fix(), false);
            }
        } else if fixes.contains(fixer.fix()) && fixer.run(&mut graph, true) {
            outcome.record(fixer.fix(), true);
        }
    }

    // Detection never writes; neither does an apply run that changed
    // nothing.
    if detect_only || !outcome.bludgeoned {
        return Ok(outcome);
    }

    let bytes = serialize(&graph);
    write_replace(path, &bytes).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(%path, fixes_applied = outcome.reports.len(), "rewrote tag");

    Ok(outcome)
}

/// All-or-nothing replacement: write to a temporary file in the same
/// directory, then rename over the original. A failure at any point leaves
/// the original bytes untouched.
fn write_replace(path: &Utf8Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Utf8Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir.as_std_path())?;
    tmp.write_all(bytes)?;
    tmp.persist(path.as_std_path()).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagmend_tag::{BoundedValue, EnumField, TagClass, TagGraph, parse};
    use tagmend_types::Fix;
    use tempfile::TempDir;

    fn defective_graph() -> TagGraph {
        let mut graph = TagGraph::empty(TagClass(*b"test"));
        graph.enums.push(EnumField {
            value: 9,
            variant_count: 5,
        });
        graph.ranges.push(BoundedValue {
            value: 2.0,
            min: 0.0,
            max: 1.0,
        });
        graph
    }

    fn write_tag(dir: &TempDir, name: &str, graph: &TagGraph) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8 temp path");
        fs::write(&path, serialize(graph)).expect("write tag");
        path
    }

    #[test]
    fn detect_mode_reports_without_touching_disk() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_tag(&dir, "weapon.test", &defective_graph());
        let before = fs::read(&path).expect("read");

        let outcome = bludgeon_tag(&path, FixSet::EMPTY).expect("pipeline");
        assert!(outcome.bludgeoned);
        assert_eq!(outcome.reports.len(), 2);
        assert!(outcome.reports.iter().all(|r| !r.applied));
        assert_eq!(fs::read(&path).expect("read"), before);
    }

    #[test]
    fn apply_mode_rewrites_and_rerun_is_clean() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_tag(&dir, "weapon.test", &defective_graph());

        let fixes = FixSet::everything();
        let outcome = bludgeon_tag(&path, fixes).expect("pipeline");
        assert!(outcome.bludgeoned);

        let rewritten = fs::read(&path).expect("read");
        let graph = parse(&rewritten).expect("rewritten tag parses");
        assert_eq!(graph.enums[0].value, 0);
        assert_eq!(graph.ranges[0].value, 1.0);

        let second = bludgeon_tag(&path, fixes).expect("pipeline");
        assert!(!second.bludgeoned);
        assert_eq!(fs::read(&path).expect("read"), rewritten);
    }

    #[test]
    fn mask_selects_exactly_the_named_fix() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_tag(&dir, "weapon.test", &defective_graph());

        let mut fixes = FixSet::EMPTY;
        fixes.insert(Fix::OutOfRange);
        let outcome = bludgeon_tag(&path, fixes).expect("pipeline");

        assert!(outcome.bludgeoned);
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].fix, Fix::OutOfRange);

        // The enum defect was out of scope and must survive the rewrite.
        let graph = parse(&fs::read(&path).expect("read")).expect("parses");
        assert_eq!(graph.enums[0].value, 9);
        assert_eq!(graph.ranges[0].value, 1.0);
    }

    #[test]
    fn clean_tag_is_not_rewritten() {
        let dir = TempDir::new().expect("tempdir");
        let graph = TagGraph::empty(TagClass(*b"test"));
        let path = write_tag(&dir, "clean.test", &graph);
        let before = fs::read(&path).expect("read");

        let outcome = bludgeon_tag(&path, FixSet::everything()).expect("pipeline");
        assert!(!outcome.bludgeoned);
        assert_eq!(fs::read(&path).expect("read"), before);
    }

    #[test]
    fn malformed_header_aborts_before_fixes() {
        let dir = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("broken.test")).expect("utf8");
        fs::write(&path, b"not a tag").expect("write");

        match bludgeon_tag(&path, FixSet::everything()) {
            Err(PipelineError::MalformedHeader { .. }) => {}
            other => panic!("expected malformed header, got {other:?}"),
        }
        assert_eq!(fs::read(&path).expect("read"), b"not a tag");
    }

    #[test]
    fn unparsable_body_aborts_with_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let mut bytes = serialize(&defective_graph());
        bytes.truncate(bytes.len() - 2);
        let body_len = (bytes.len() - HEADER_LEN) as u32;
        bytes[12..16].copy_from_slice(&body_len.to_le_bytes());

        let path = Utf8PathBuf::from_path_buf(dir.path().join("torn.test")).expect("utf8");
        fs::write(&path, &bytes).expect("write");

        match bludgeon_tag(&path, FixSet::EMPTY) {
            Err(PipelineError::Parse { .. }) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.test")).expect("utf8");
        match bludgeon_tag(&path, FixSet::EMPTY) {
            Err(PipelineError::Open { .. }) => {}
            other => panic!("expected open error, got {other:?}"),
        }
    }
}
