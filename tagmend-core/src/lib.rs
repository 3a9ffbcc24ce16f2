//! Orchestration engine for tag repair.
//!
//! The pipeline is single-threaded and synchronous: each file is opened,
//! parsed, fixed, and (when something changed in apply mode) rewritten
//! before the next file is considered. Graphs are never shared between
//! files, and the fix registry is read-only, so no locking discipline is
//! needed anywhere in the engine.

mod pipeline;
mod report;
mod walker;

pub use pipeline::{PipelineError, bludgeon_tag};
pub use report::{render_batch_summary, render_clean, render_file_report};
pub use walker::bludgeon_dir;
