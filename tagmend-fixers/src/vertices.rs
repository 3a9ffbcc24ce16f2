use crate::Fixer;
use tagmend_tag::{CompressedVertex, TagGraph, Vertex, pack_normal, unpack_normal};
use tagmend_types::Fix;

/// Regenerates a missing vertex representation from its sibling. Models are
/// expected to carry both the full-precision and the compressed buffer;
/// lightmap generation reads whichever one the missing side would have been.
///
/// A model with neither buffer has no vertex data at all, which is a
/// different problem this fixer cannot repair, so it is not reported here.
pub struct MissingVerticesFixer;

impl Fixer for MissingVerticesFixer {
    fn fix(&self) -> Fix {
        Fix::MissingVertices
    }

    fn run(&self, graph: &mut TagGraph, apply: bool) -> bool {
        let missing_compressed =
            graph.compressed_vertices.is_empty() && !graph.uncompressed_vertices.is_empty();
        let missing_uncompressed =
            graph.uncompressed_vertices.is_empty() && !graph.compressed_vertices.is_empty();

        if apply {
            if missing_compressed {
                graph.compressed_vertices = graph
                    .uncompressed_vertices
                    .iter()
                    .map(|vertex| CompressedVertex {
                        position: vertex.position,
                        normal: pack_normal(vertex.normal),
                    })
                    .collect();
            } else if missing_uncompressed {
                graph.uncompressed_vertices = graph
                    .compressed_vertices
                    .iter()
                    .map(|vertex| Vertex {
                        position: vertex.position,
                        normal: unpack_normal(vertex.normal),
                    })
                    .collect();
            }
        }

        missing_compressed || missing_uncompressed
    }
}
