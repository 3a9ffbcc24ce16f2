use crate::Fixer;
use tagmend_tag::TagGraph;
use tagmend_types::Fix;

/// Resets enum fields whose stored value is outside the variant range.
///
/// A field with `variant_count == 0` has no valid value to reset to, so it
/// is left alone and not reported.
pub struct BrokenEnumsFixer;

impl Fixer for BrokenEnumsFixer {
    fn fix(&self) -> Fix {
        Fix::BrokenEnums
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        let mut found = false;
        for field in &mut graph.enums {
            if field.variant_count > 0 && field.value >= field.variant_count {
                found = true;
                if apply {
                    field.value = 0;
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagmend_tag::{EnumField, TagClass};

    fn graph_with(fields: &[EnumField]) -> TagGraph {
        let mut graph = TagGraph::empty(TagClass(*b"test"));
        graph.enums = fields.to_vec();
        graph
    }

    #[test]
    fn clean_fields_report_nothing() {
        let mut graph = graph_with(&[EnumField {
            value: 2,
            variant_count: 5,
        }]);
        assert!(!BrokenEnumsFixer.run(&mut graph, true));
    }

    #[test]
    fn detect_finds_but_does_not_mutate() {
        let mut graph = graph_with(&[EnumField {
            value: 9,
            variant_count: 5,
        }]);
        let before = graph.clone();
        assert!(BrokenEnumsFixer.run(&mut graph, false));
        assert_eq!(graph, before);
    }

    #[test]
    fn apply_resets_and_is_idempotent() {
        let mut graph = graph_with(&[
            EnumField {
                value: 9,
                variant_count: 5,
            },
            EnumField {
                value: 1,
                variant_count: 3,
            },
        ]);
        assert!(BrokenEnumsFixer.run(&mut graph, true));
        assert_eq!(graph.enums[0].value, 0);
        assert_eq!(graph.enums[1].value, 1);

        let repaired = graph.clone();
        assert!(!BrokenEnumsFixer.run(&mut graph, true));
        assert_eq!(graph, repaired);
    }

    #[test]
    fn zero_variant_enum_is_left_alone() {
        let mut graph = graph_with(&[EnumField {
            value: 7,
            variant_count: 0,
        }]);
        let before = graph.clone();
        assert!(!BrokenEnumsFixer.run(&mut graph, true));
        assert_eq!(graph, before);
    }
}
