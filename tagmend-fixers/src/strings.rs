use crate::Fixer;
use tagmend_tag::TagGraph;
use tagmend_types::Fix;

/// Repairs 32-byte fixed strings that are unterminated or carry nonzero
/// bytes after the terminator. Unterminated buffers lose their final byte to
/// make room for the NUL; everything after the terminator is zeroed.
pub struct BrokenStringsFixer;

fn broken(buffer: &[u8; 32]) -> bool {
    match buffer.iter().position(|b| *b == 0) {
        None => true,
        Some(nul) => buffer[nul..].iter().any(|b| *b != 0),
    }
}

fn repair(buffer: &mut [u8; 32]) {
    let keep = buffer
        .iter()
        .position(|b| *b == 0)
        .unwrap_or(buffer.len() - 1);
    let mut fixed = [0u8; 32];
    fixed[..keep].copy_from_slice(&buffer[..keep]);
    *buffer = fixed;
}

impl Fixer for BrokenStringsFixer {
    fn fix(&self) -> Fix {
        Fix::BrokenStrings
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        let mut found = false;
        for string in &mut graph.strings {
            if broken(&string.0) {
                found = true;
                if apply {
                    repair(&mut string.0);
                }
            }
        }
        found
    }
}
