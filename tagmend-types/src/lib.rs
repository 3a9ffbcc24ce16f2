//! Shared vocabulary for tagmend: the closed set of defect-class fixes, the
//! selection set built from canonical names, and the outcome types the
//! pipeline and batch walker report through.
//!
//! This crate owns *names and shapes* only. What each fix actually does to a
//! tag lives in `tagmend-fixers`; how files are driven through the fixes
//! lives in `tagmend-core`.

mod fix;
mod outcome;

pub use fix::{ALL_FIXES, EVERYTHING_NAME, Fix, FixInfo, FixSet, NONE_NAME, UnknownFixName};
pub use outcome::{BatchResult, FixReport, TagOutcome};
