use crate::Fixer;
use tagmend_tag::TagGraph;
use tagmend_types::Fix;

/// Re-extracts missing script source from the compiled script blob. Tags
/// built without source in place compile fine but break any tool that needs
/// to recompile, so the embedded copy is restored verbatim.
///
/// A blob that is absent, truncated, or carries a corrupt length prefix has
/// nothing to extract; the fixer reports false rather than failing.
pub struct MissingScriptSourceFixer;

impl Fixer for MissingScriptSourceFixer {
    fn fix(&self) -> Fix {
        Fix::MissingScriptSource
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        if !graph.script.source.is_empty() {
            return false;
        }
        let embedded = match graph.script.embedded_source() {
            Some(source) if !source.is_empty() => source.to_string(),
            _ => return false,
        };
        if apply {
            graph.script.source = embedded;
        }
        true
    }
}
