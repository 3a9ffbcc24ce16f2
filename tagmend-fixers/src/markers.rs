use crate::Fixer;
use tagmend_tag::TagGraph;
use tagmend_types::Fix;

/// Moves markers that ended up on model instances into the canonical
/// top-level marker array. Downstream tooling only reads the top-level
/// array, so stray instance markers are silently dropped geometry.
pub struct InvalidModelMarkersFixer;

impl Fixer for InvalidModelMarkersFixer {
    fn fix(&self) -> Fix {
        Fix::InvalidModelMarkers
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        if graph.instance_markers.is_empty() {
            return false;
        }
        if apply {
            let mut stray = std::mem::take(&mut graph.instance_markers);
            graph.markers.append(&mut stray);
        }
        true
    }
}
