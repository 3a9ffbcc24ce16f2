use crate::Fixer;
use tagmend_tag::TagGraph;
use tagmend_types::Fix;

/// Recomputes sound permutation buffer sizes from the raw sample data.
/// Misreported sizes were historically used to smuggle unsupported formats
/// past the loader and are undefined behavior downstream.
pub struct IncorrectSoundBufferFixer;

impl Fixer for IncorrectSoundBufferFixer {
    fn fix(&self) -> Fix {
        Fix::IncorrectSoundBuffer
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        let mut found = false;
        for permutation in &mut graph.sounds {
            let actual = permutation.samples.len() as u32;
            if permutation.buffer_size != actual {
                found = true;
                if apply {
                    permutation.buffer_size = actual;
                }
            }
        }
        found
    }
}
