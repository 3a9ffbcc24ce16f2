use crate::Fixer;
use tagmend_tag::TagGraph;
use tagmend_types::Fix;

/// Rewrites tag references whose class does not match the class their slot
/// expects, e.g. a light tag referenced where a bitmap belongs. The path is
/// kept; only the class is corrected.
pub struct BrokenReferenceClassesFixer;

impl Fixer for BrokenReferenceClassesFixer {
    fn fix(&self) -> Fix {
        Fix::BrokenReferenceClasses
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        let mut found = false;
        for reference in &mut graph.references {
            if reference.class != reference.expected_class {
                found = true;
                if apply {
                    reference.class = reference.expected_class;
                }
            }
        }
        found
    }
}
