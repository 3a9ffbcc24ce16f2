use crate::Fixer;
use tagmend_tag::{NULL_INDEX, TagGraph};
use tagmend_types::Fix;

/// Nulls out index fields that point past the end of the array they index.
/// The null sentinel is a legal "no element" value everywhere an index
/// appears; a dangling index is a crash in the consumer.
pub struct InvalidIndicesFixer;

impl Fixer for InvalidIndicesFixer {
    fn fix(&self) -> Fix {
        Fix::InvalidIndices
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        let mut found = false;
        for field in &mut graph.indices {
            if field.index != NULL_INDEX && field.index >= field.array_len {
                found = true;
                if apply {
                    field.index = NULL_INDEX;
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagmend_tag::{IndexField, TagClass};

    fn graph_with(fields: &[IndexField]) -> TagGraph {
        let mut graph = TagGraph::empty(TagClass(*b"test"));
        graph.indices = fields.to_vec();
        graph
    }

    #[test]
    fn in_bounds_and_null_indices_report_nothing() {
        let mut graph = graph_with(&[
            IndexField {
                index: 3,
                array_len: 4,
            },
            IndexField {
                index: NULL_INDEX,
                array_len: 0,
            },
        ]);
        assert!(!InvalidIndicesFixer.run(&mut graph, true));
    }

    #[test]
    fn detect_finds_but_does_not_mutate() {
        let mut graph = graph_with(&[IndexField {
            index: 4,
            array_len: 4,
        }]);
        let before = graph.clone();
        assert!(InvalidIndicesFixer.run(&mut graph, false));
        assert_eq!(graph, before);
    }

    #[test]
    fn apply_nulls_dangling_indices_and_is_idempotent() {
        let mut graph = graph_with(&[
            IndexField {
                index: 10,
                array_len: 4,
            },
            IndexField {
                index: 0,
                array_len: 0,
            },
        ]);
        assert!(InvalidIndicesFixer.run(&mut graph, true));
        assert_eq!(graph.indices[0].index, NULL_INDEX);
        assert_eq!(graph.indices[1].index, NULL_INDEX);
        assert!(!InvalidIndicesFixer.run(&mut graph, true));
    }
}
