//! Strict little-endian codec for the tag body.
//!
//! Sections are read and written in one fixed order; every declared count is
//! checked against the remaining bytes before allocation, and any bytes left
//! over after the last section fail the parse. Serialization is the exact
//! inverse of parsing.

use crate::error::{HeaderError, ParseError};
use crate::graph::{
    BoundedValue, CompressedVertex, EnumField, IndexField, ModelMarker, Script, SoundPermutation,
    TagGraph, TagReference, TagString, Vertex,
};
use crate::header::{TagClass, TagHeader};
use thiserror::Error;

/// Either failure class of a whole-file parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagFileError {
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parse a complete tag file: header validation followed by the body.
pub fn parse(data: &[u8]) -> Result<TagGraph, TagFileError> {
    let header = TagHeader::read(data)?;
    let graph = parse_body(header.class, &data[crate::header::HEADER_LEN..])?;
    Ok(graph)
}

/// Serialize a graph into a complete tag file, header included. The class
/// written is the class the graph was parsed with.
pub fn serialize(graph: &TagGraph) -> Vec<u8> {
    let body = serialize_body(graph);
    let mut out = Vec::with_capacity(crate::header::HEADER_LEN + body.len());
    TagHeader {
        class: graph.class,
        body_len: body.len() as u32,
    }
    .write(&mut out);
    out.extend_from_slice(&body);
    out
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Reader<'a> {
        Reader { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize, section: &'static str) -> Result<&'a [u8], ParseError> {
        if self.remaining() < len {
            return Err(ParseError::Truncated { section });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn u16(&mut self, section: &'static str) -> Result<u16, ParseError> {
        Ok(u16::from_le_bytes(
            self.take(2, section)?.try_into().expect("sliced 2 bytes"),
        ))
    }

    fn u32(&mut self, section: &'static str) -> Result<u32, ParseError> {
        Ok(u32::from_le_bytes(
            self.take(4, section)?.try_into().expect("sliced 4 bytes"),
        ))
    }

    fn f32(&mut self, section: &'static str) -> Result<f32, ParseError> {
        Ok(f32::from_le_bytes(
            self.take(4, section)?.try_into().expect("sliced 4 bytes"),
        ))
    }

    fn vec3(&mut self, section: &'static str) -> Result<[f32; 3], ParseError> {
        Ok([self.f32(section)?, self.f32(section)?, self.f32(section)?])
    }

    fn four(&mut self, section: &'static str) -> Result<[u8; 4], ParseError> {
        Ok(self.take(4, section)?.try_into().expect("sliced 4 bytes"))
    }

    /// Read a section entry count and reject counts that could not possibly
    /// fit in the remaining bytes, before any allocation happens.
    fn count(&mut self, section: &'static str, min_entry: usize) -> Result<usize, ParseError> {
        let declared = self.u32(section)?;
        let count = declared as usize;
        if count > self.remaining() / min_entry {
            return Err(ParseError::CountOverrun {
                section,
                declared,
                remaining: self.remaining(),
            });
        }
        Ok(count)
    }

    /// Read a declared byte length bounded by what remains.
    fn len(&mut self, section: &'static str) -> Result<usize, ParseError> {
        let declared = self.u32(section)?;
        let len = declared as usize;
        if len > self.remaining() {
            return Err(ParseError::CountOverrun {
                section,
                declared,
                remaining: self.remaining(),
            });
        }
        Ok(len)
    }

    fn string(&mut self, section: &'static str) -> Result<String, ParseError> {
        let len = self.len(section)?;
        let bytes = self.take(len, section)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ParseError::InvalidUtf8 { section })
    }
}

fn read_marker(reader: &mut Reader<'_>, section: &'static str) -> Result<ModelMarker, ParseError> {
    Ok(ModelMarker {
        name: reader
            .take(32, section)?
            .try_into()
            .expect("sliced 32 bytes"),
        region: reader.u16(section)?,
        permutation: reader.u16(section)?,
        position: reader.vec3(section)?,
    })
}

fn write_marker(out: &mut Vec<u8>, marker: &ModelMarker) {
    out.extend_from_slice(&marker.name);
    out.extend_from_slice(&marker.region.to_le_bytes());
    out.extend_from_slice(&marker.permutation.to_le_bytes());
    for component in marker.position {
        out.extend_from_slice(&component.to_le_bytes());
    }
}

/// Decode a tag body into the object graph. `class` comes from the validated
/// header.
pub fn parse_body(class: TagClass, body: &[u8]) -> Result<TagGraph, ParseError> {
    let mut r = Reader::new(body);
    let mut graph = TagGraph::empty(class);

    let enum_count = r.count("enums", 4)?;
    for _ in 0..enum_count {
        graph.enums.push(EnumField {
            value: r.u16("enums")?,
            variant_count: r.u16("enums")?,
        });
    }

    let reference_count = r.count("references", 12)?;
    for _ in 0..reference_count {
        graph.references.push(TagReference {
            expected_class: TagClass(r.four("references")?),
            class: TagClass(r.four("references")?),
            path: r.string("references")?,
        });
    }

    let marker_count = r.count("markers", 48)?;
    for _ in 0..marker_count {
        graph.markers.push(read_marker(&mut r, "markers")?);
    }

    let instance_marker_count = r.count("instance markers", 48)?;
    for _ in 0..instance_marker_count {
        graph
            .instance_markers
            .push(read_marker(&mut r, "instance markers")?);
    }

    let range_count = r.count("bounded values", 12)?;
    for _ in 0..range_count {
        graph.ranges.push(BoundedValue {
            value: r.f32("bounded values")?,
            min: r.f32("bounded values")?,
            max: r.f32("bounded values")?,
        });
    }

    let string_count = r.count("strings", 32)?;
    for _ in 0..string_count {
        graph.strings.push(TagString(
            r.take(32, "strings")?.try_into().expect("sliced 32 bytes"),
        ));
    }

    graph.script = Script {
        source: r.string("script source")?,
        compiled: {
            let len = r.len("script data")?;
            r.take(len, "script data")?.to_vec()
        },
    };

    let index_count = r.count("indices", 4)?;
    for _ in 0..index_count {
        graph.indices.push(IndexField {
            index: r.u16("indices")?,
            array_len: r.u16("indices")?,
        });
    }

    let uncompressed_count = r.count("uncompressed vertices", 24)?;
    for _ in 0..uncompressed_count {
        graph.uncompressed_vertices.push(Vertex {
            position: r.vec3("uncompressed vertices")?,
            normal: r.vec3("uncompressed vertices")?,
        });
    }

    let compressed_count = r.count("compressed vertices", 16)?;
    for _ in 0..compressed_count {
        graph.compressed_vertices.push(CompressedVertex {
            position: r.vec3("compressed vertices")?,
            normal: r.u32("compressed vertices")?,
        });
    }

    let sound_count = r.count("sound permutations", 8)?;
    for _ in 0..sound_count {
        graph.sounds.push(SoundPermutation {
            buffer_size: r.u32("sound permutations")?,
            samples: {
                let len = r.len("sound permutations")?;
                r.take(len, "sound permutations")?.to_vec()
            },
        });
    }

    if r.remaining() != 0 {
        return Err(ParseError::TrailingBytes(r.remaining()));
    }

    Ok(graph)
}

/// Encode the object graph back into the canonical body layout.
pub fn serialize_body(graph: &TagGraph) -> Vec<u8> {
    let mut out = Vec::new();

    out.extend_from_slice(&(graph.enums.len() as u32).to_le_bytes());
    for field in &graph.enums {
        out.extend_from_slice(&field.value.to_le_bytes());
        out.extend_from_slice(&field.variant_count.to_le_bytes());
    }

    out.extend_from_slice(&(graph.references.len() as u32).to_le_bytes());
    for reference in &graph.references {
        out.extend_from_slice(&reference.expected_class.0);
        out.extend_from_slice(&reference.class.0);
        out.extend_from_slice(&(reference.path.len() as u32).to_le_bytes());
        out.extend_from_slice(reference.path.as_bytes());
    }

    out.extend_from_slice(&(graph.markers.len() as u32).to_le_bytes());
    for marker in &graph.markers {
        write_marker(&mut out, marker);
    }

    out.extend_from_slice(&(graph.instance_markers.len() as u32).to_le_bytes());
    for marker in &graph.instance_markers {
        write_marker(&mut out, marker);
    }

    out.extend_from_slice(&(graph.ranges.len() as u32).to_le_bytes());
    for range in &graph.ranges {
        out.extend_from_slice(&range.value.to_le_bytes());
        out.extend_from_slice(&range.min.to_le_bytes());
        out.extend_from_slice(&range.max.to_le_bytes());
    }

    out.extend_from_slice(&(graph.strings.len() as u32).to_le_bytes());
    for string in &graph.strings {
        out.extend_from_slice(&string.0);
    }

    out.extend_from_slice(&(graph.script.source.len() as u32).to_le_bytes());
    out.extend_from_slice(graph.script.source.as_bytes());
    out.extend_from_slice(&(graph.script.compiled.len() as u32).to_le_bytes());
    out.extend_from_slice(&graph.script.compiled);

    out.extend_from_slice(&(graph.indices.len() as u32).to_le_bytes());
    for field in &graph.indices {
        out.extend_from_slice(&field.index.to_le_bytes());
        out.extend_from_slice(&field.array_len.to_le_bytes());
    }

    out.extend_from_slice(&(graph.uncompressed_vertices.len() as u32).to_le_bytes());
    for vertex in &graph.uncompressed_vertices {
        for component in vertex.position {
            out.extend_from_slice(&component.to_le_bytes());
        }
        for component in vertex.normal {
            out.extend_from_slice(&component.to_le_bytes());
        }
    }

    out.extend_from_slice(&(graph.compressed_vertices.len() as u32).to_le_bytes());
    for vertex in &graph.compressed_vertices {
        for component in vertex.position {
            out.extend_from_slice(&component.to_le_bytes());
        }
        out.extend_from_slice(&vertex.normal.to_le_bytes());
    }

    out.extend_from_slice(&(graph.sounds.len() as u32).to_le_bytes());
    for sound in &graph.sounds {
        out.extend_from_slice(&sound.buffer_size.to_le_bytes());
        out.extend_from_slice(&(sound.samples.len() as u32).to_le_bytes());
        out.extend_from_slice(&sound.samples);
    }

    out
}
