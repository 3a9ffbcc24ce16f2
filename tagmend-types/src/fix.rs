use serde::Serialize;
use thiserror::Error;

/// A defect class a tag body may exhibit, named after the fix that resolves
/// it.
///
/// The variant order is the canonical execution order: the pipeline always
/// iterates fixes in this order, both in detect and in apply mode, so that
/// output is reproducible and upstream defects (dangling references, bad
/// indices) are reported before checks that assume a well-formed graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fix {
    /// Enum fields holding values outside their variant range.
    BrokenEnums,
    /// Tag references whose class does not match the referencing slot.
    BrokenReferenceClasses,
    /// Model markers stored on instances instead of the top-level array.
    InvalidModelMarkers,
    /// Sound permutations reporting the wrong buffer size.
    IncorrectSoundBuffer,
    /// Missing compressed or uncompressed vertex data.
    MissingVertices,
    /// Bounded values outside their declared range.
    OutOfRange,
    /// Script source data missing while compiled data is present.
    MissingScriptSource,
    /// Index fields pointing past the end of their arrays.
    InvalidIndices,
    /// Normal vectors that are not unit length.
    NonnormalVectors,
    /// Fixed strings that are unterminated or carry bytes after the
    /// terminator.
    BrokenStrings,
}

/// Every fix, in canonical execution order.
pub const ALL_FIXES: [Fix; 10] = [
    Fix::BrokenEnums,
    Fix::BrokenReferenceClasses,
    Fix::InvalidModelMarkers,
    Fix::IncorrectSoundBuffer,
    Fix::MissingVertices,
    Fix::OutOfRange,
    Fix::MissingScriptSource,
    Fix::InvalidIndices,
    Fix::NonnormalVectors,
    Fix::BrokenStrings,
];

/// Reserved selection name: run every fix in detect-only mode.
pub const NONE_NAME: &str = "none";

/// Reserved selection name: apply every fix.
pub const EVERYTHING_NAME: &str = "everything";

/// Static `{variant, canonical name}` table. The names are the external CLI
/// vocabulary and must stay stable.
const NAMES: [(Fix, &str); 10] = [
    (Fix::BrokenEnums, "invalid-enums"),
    (Fix::BrokenReferenceClasses, "invalid-reference-classes"),
    (Fix::InvalidModelMarkers, "invalid-model-markers"),
    (Fix::IncorrectSoundBuffer, "incorrect-sound-buffer"),
    (Fix::MissingVertices, "missing-vertices"),
    (Fix::OutOfRange, "out-of-range"),
    (Fix::MissingScriptSource, "missing-script-source"),
    (Fix::InvalidIndices, "invalid-indices"),
    (Fix::NonnormalVectors, "nonnormal-vectors"),
    (Fix::BrokenStrings, "invalid-strings"),
];

impl Fix {
    /// Canonical CLI name for this fix.
    pub fn canonical_name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(fix, _)| *fix == self)
            .map(|(_, name)| *name)
            .unwrap_or_else(|| unreachable!("every fix has a canonical name"))
    }

    /// Look a fix up by its canonical name. Exact match only.
    pub fn from_name(name: &str) -> Option<Fix> {
        NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(fix, _)| *fix)
    }

    /// One-line message used when this defect is detected but not repaired.
    pub fn detect_message(self) -> &'static str {
        match self {
            Fix::BrokenEnums => "invalid enums detected",
            Fix::BrokenReferenceClasses => "invalid reference class detected",
            Fix::InvalidModelMarkers => "invalid model markers detected",
            Fix::IncorrectSoundBuffer => {
                "incorrect sound buffer size on one or more permutations"
            }
            Fix::MissingVertices => "missing compressed or uncompressed vertices",
            Fix::OutOfRange => "value(s) are out of range",
            Fix::MissingScriptSource => "script source data is missing",
            Fix::InvalidIndices => "indices are out of bounds",
            Fix::NonnormalVectors => "problematic nonnormal vectors detected",
            Fix::BrokenStrings => "problematic strings detected",
        }
    }

    /// Longer description for `list-fixes` output.
    pub fn description(self) -> &'static str {
        match self {
            Fix::BrokenEnums => "reset enum fields holding values outside their variant range",
            Fix::BrokenReferenceClasses => {
                "rewrite tag references to the class their slot expects"
            }
            Fix::InvalidModelMarkers => {
                "move markers stored on model instances into the top-level marker array"
            }
            Fix::IncorrectSoundBuffer => {
                "recompute sound permutation buffer sizes from the sample data"
            }
            Fix::MissingVertices => {
                "regenerate missing compressed or uncompressed vertex buffers"
            }
            Fix::OutOfRange => "clamp bounded values back into their declared range",
            Fix::MissingScriptSource => {
                "re-extract missing script source from the compiled script data"
            }
            Fix::InvalidIndices => "null out indices pointing past the end of their arrays",
            Fix::NonnormalVectors => "renormalize vectors that are not unit length",
            Fix::BrokenStrings => {
                "terminate fixed strings and zero everything after the terminator"
            }
        }
    }

    pub fn info(self) -> FixInfo {
        FixInfo {
            name: self.canonical_name(),
            description: self.description(),
        }
    }

    fn bit(self) -> u16 {
        let position = ALL_FIXES
            .iter()
            .position(|fix| *fix == self)
            .unwrap_or_else(|| unreachable!("every fix is registered"));
        1 << position
    }
}

/// Serializable metadata row for one fix, used by `list-fixes --format json`.
#[derive(Debug, Clone, Serialize)]
pub struct FixInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// A caller named a fix that is not in the registry. Fatal to the whole
/// invocation, before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fix name `{0}`")]
pub struct UnknownFixName(pub String);

/// A set of fixes selected for one invocation.
///
/// The empty set means "run every fix in detect-only mode"; a non-empty set
/// means "run exactly these fixes in apply mode". Built from canonical names;
/// the reserved name `none` resets the set, and `everything` saturates it.
/// Because the fix set is closed, a saturated set can never be grown by later
/// names, which reproduces the "everything always wins" behavior callers
/// expect from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixSet {
    bits: u16,
}

impl FixSet {
    /// No fixes selected: detect-only mode.
    pub const EMPTY: FixSet = FixSet { bits: 0 };

    pub fn everything() -> FixSet {
        let mut set = FixSet::EMPTY;
        for fix in ALL_FIXES {
            set.insert(fix);
        }
        set
    }

    pub fn insert(&mut self, fix: Fix) {
        self.bits |= fix.bit();
    }

    pub fn contains(self, fix: Fix) -> bool {
        self.bits & fix.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn len(self) -> usize {
        self.iter().count()
    }

    /// Members in canonical execution order.
    pub fn iter(self) -> impl Iterator<Item = Fix> {
        ALL_FIXES.into_iter().filter(move |fix| self.contains(*fix))
    }

    /// Add one canonical name, honoring the reserved `none` / `everything`
    /// literals.
    pub fn insert_name(&mut self, name: &str) -> Result<(), UnknownFixName> {
        if name == NONE_NAME {
            *self = FixSet::EMPTY;
        } else if name == EVERYTHING_NAME {
            *self = FixSet::everything();
        } else {
            let fix = Fix::from_name(name).ok_or_else(|| UnknownFixName(name.to_string()))?;
            self.insert(fix);
        }
        Ok(())
    }

    /// Build a set from canonical names in order. An unknown name fails the
    /// whole construction.
    pub fn from_names<I, S>(names: I) -> Result<FixSet, UnknownFixName>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = FixSet::EMPTY;
        for name in names {
            set.insert_name(name.as_ref())?;
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_names_round_trip() {
        for fix in ALL_FIXES {
            assert_eq!(Fix::from_name(fix.canonical_name()), Some(fix));
        }
    }

    #[test]
    fn canonical_names_are_distinct() {
        for (i, a) in ALL_FIXES.iter().enumerate() {
            for b in &ALL_FIXES[i + 1..] {
                assert_ne!(a.canonical_name(), b.canonical_name());
            }
        }
    }

    #[test]
    fn reserved_names_are_not_fixes() {
        assert_eq!(Fix::from_name(NONE_NAME), None);
        assert_eq!(Fix::from_name(EVERYTHING_NAME), None);
    }

    #[test]
    fn empty_set_contains_nothing() {
        let set = FixSet::EMPTY;
        assert!(set.is_empty());
        for fix in ALL_FIXES {
            assert!(!set.contains(fix));
        }
    }

    #[test]
    fn everything_contains_every_fix() {
        let set = FixSet::everything();
        assert_eq!(set.len(), ALL_FIXES.len());
        for fix in ALL_FIXES {
            assert!(set.contains(fix));
        }
    }

    #[test]
    fn from_names_ors_flags_together() {
        let set = FixSet::from_names(["out-of-range", "invalid-enums"]).expect("known names");
        assert!(set.contains(Fix::OutOfRange));
        assert!(set.contains(Fix::BrokenEnums));
        assert!(!set.contains(Fix::BrokenStrings));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn from_names_rejects_unknown_name() {
        let err = FixSet::from_names(["frobnicate"]).expect_err("unknown name");
        assert_eq!(err, UnknownFixName("frobnicate".to_string()));
        assert_eq!(err.to_string(), "unknown fix name `frobnicate`");
    }

    #[test]
    fn none_resets_earlier_names() {
        let set = FixSet::from_names(["out-of-range", "none"]).expect("known names");
        assert!(set.is_empty());
    }

    #[test]
    fn everything_saturates_regardless_of_order() {
        let before = FixSet::from_names(["everything", "out-of-range"]).expect("known names");
        let after = FixSet::from_names(["out-of-range", "everything"]).expect("known names");
        assert_eq!(before, FixSet::everything());
        assert_eq!(after, FixSet::everything());
    }

    #[test]
    fn none_after_everything_still_resets() {
        let set = FixSet::from_names(["everything", "none"]).expect("known names");
        assert!(set.is_empty());
    }

    #[test]
    fn iter_yields_canonical_order() {
        let set = FixSet::from_names(["invalid-strings", "invalid-enums"]).expect("known names");
        let order: Vec<Fix> = set.iter().collect();
        assert_eq!(order, vec![Fix::BrokenEnums, Fix::BrokenStrings]);
    }

    #[test]
    fn fix_info_serializes_to_json() {
        let info = Fix::OutOfRange.info();
        let json = serde_json::to_value(&info).expect("serialize");
        assert_eq!(json["name"], "out-of-range");
    }
}
