use crate::Fixer;
use tagmend_tag::TagGraph;
use tagmend_types::Fix;

/// Renormalizes vertex normals that are not unit length. Degenerate and
/// non-finite normals become +Z, which keeps lightmap generation from
/// dividing by zero downstream.
pub struct NonnormalVectorsFixer;

/// Allowed deviation of a normal's length from 1.0.
const TOLERANCE: f32 = 1e-4;

const UP: [f32; 3] = [0.0, 0.0, 1.0];

fn length_squared(normal: [f32; 3]) -> f32 {
    normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]
}

fn nonnormal(normal: [f32; 3]) -> bool {
    let len_sq = length_squared(normal);
    !len_sq.is_finite() || (len_sq.sqrt() - 1.0).abs() > TOLERANCE
}

fn renormalize(normal: [f32; 3]) -> [f32; 3] {
    let len_sq = length_squared(normal);
    if !len_sq.is_finite() || len_sq == 0.0 {
        return UP;
    }
    let len = len_sq.sqrt();
    [normal[0] / len, normal[1] / len, normal[2] / len]
}

impl Fixer for NonnormalVectorsFixer {
    fn fix(&self) -> Fix {
        Fix::NonnormalVectors
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        let mut found = false;
        for vertex in &mut graph.uncompressed_vertices {
            if nonnormal(vertex.normal) {
                found = true;
                if apply {
                    vertex.normal = renormalize(vertex.normal);
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagmend_tag::{TagClass, Vertex};

    fn graph_with(normal: [f32; 3]) -> TagGraph {
        let mut graph = TagGraph::empty(TagClass(*b"mod2"));
        graph.uncompressed_vertices.push(Vertex {
            position: [0.0; 3],
            normal,
        });
        graph
    }

    #[test]
    fn unit_normal_reports_nothing() {
        let mut graph = graph_with([0.0, 1.0, 0.0]);
        assert!(!NonnormalVectorsFixer.run(&mut graph, true));
    }

    #[test]
    fn detect_finds_but_does_not_mutate() {
        let mut graph = graph_with([0.0, 2.0, 0.0]);
        let before = graph.clone();
        assert!(NonnormalVectorsFixer.run(&mut graph, false));
        assert_eq!(graph, before);
    }

    #[test]
    fn apply_renormalizes_and_is_idempotent() {
        let mut graph = graph_with([3.0, 0.0, 4.0]);
        assert!(NonnormalVectorsFixer.run(&mut graph, true));
        let normal = graph.uncompressed_vertices[0].normal;
        assert!((normal[0] - 0.6).abs() < 1e-6);
        assert!((normal[2] - 0.8).abs() < 1e-6);
        assert!(!NonnormalVectorsFixer.run(&mut graph, true));
    }

    #[test]
    fn zero_normal_becomes_up() {
        let mut graph = graph_with([0.0, 0.0, 0.0]);
        assert!(NonnormalVectorsFixer.run(&mut graph, true));
        assert_eq!(graph.uncompressed_vertices[0].normal, UP);
        assert!(!NonnormalVectorsFixer.run(&mut graph, true));
    }

    #[test]
    fn non_finite_normal_becomes_up() {
        let mut graph = graph_with([f32::NAN, 0.0, f32::INFINITY]);
        assert!(NonnormalVectorsFixer.run(&mut graph, true));
        assert_eq!(graph.uncompressed_vertices[0].normal, UP);
        assert!(!NonnormalVectorsFixer.run(&mut graph, true));
    }
}
