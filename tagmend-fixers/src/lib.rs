//! Fix predicates: one capability per defect class, plus the ordered
//! registry.
//!
//! Every fixer honors the same contract. In detect mode (`apply == false`)
//! it must not mutate the graph and returns whether its defect class is
//! present. In apply mode it may repair the graph in place and returns
//! whether the defect was present; a fixer that finds nothing leaves the
//! graph bit-for-bit unchanged, and a second apply is always a no-op that
//! returns false. A fixer that cannot repair safely (malformed bounds, a
//! corrupt compiled script blob) reports false rather than failing: findings
//! are data, not errors.

use tagmend_tag::TagGraph;
use tagmend_types::{ALL_FIXES, Fix, UnknownFixName};

mod enums;
mod indices;
mod markers;
mod normals;
mod ranges;
mod references;
mod scripts;
mod sound;
mod strings;
mod vertices;

pub use enums::BrokenEnumsFixer;
pub use indices::InvalidIndicesFixer;
pub use markers::InvalidModelMarkersFixer;
pub use normals::NonnormalVectorsFixer;
pub use ranges::OutOfRangeFixer;
pub use references::BrokenReferenceClassesFixer;
pub use scripts::MissingScriptSourceFixer;
pub use sound::IncorrectSoundBufferFixer;
pub use strings::BrokenStringsFixer;
pub use vertices::MissingVerticesFixer;

/// A two-mode detect/repair capability over a parsed tag graph.
pub trait Fixer: Sync {
    /// The defect class this fixer owns.
    fn fix(&self) -> Fix;

    /// Detect (`apply == false`) or detect-and-repair (`apply == true`).
    /// Returns whether the defect was present.
    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool;
}

fn fixer_for(fix: Fix) -> Box<dyn Fixer> {
    match fix {
        Fix::BrokenEnums => Box::new(BrokenEnumsFixer),
        Fix::BrokenReferenceClasses => Box::new(BrokenReferenceClassesFixer),
        Fix::InvalidModelMarkers => Box::new(InvalidModelMarkersFixer),
        Fix::IncorrectSoundBuffer => Box::new(IncorrectSoundBufferFixer),
        Fix::MissingVertices => Box::new(MissingVerticesFixer),
        Fix::OutOfRange => Box::new(OutOfRangeFixer),
        Fix::MissingScriptSource => Box::new(MissingScriptSourceFixer),
        Fix::InvalidIndices => Box::new(InvalidIndicesFixer),
        Fix::NonnormalVectors => Box::new(NonnormalVectorsFixer),
        Fix::BrokenStrings => Box::new(BrokenStringsFixer),
    }
}

/// Every registered fixer, in canonical execution order. The pipeline
/// iterates this list for every invocation so that output is reproducible.
pub fn builtin_fixers() -> Vec<Box<dyn Fixer>> {
    ALL_FIXES.into_iter().map(fixer_for).collect()
}

/// Look a fixer up by its canonical name.
pub fn lookup_fixer(name: &str) -> Result<Box<dyn Fixer>, UnknownFixName> {
    Fix::from_name(name)
        .map(fixer_for)
        .ok_or_else(|| UnknownFixName(name.to_string()))
}
