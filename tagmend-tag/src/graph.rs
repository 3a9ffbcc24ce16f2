use crate::header::TagClass;

/// Sentinel meaning "no element" in an index field.
pub const NULL_INDEX: u16 = 0xFFFF;

/// An enum field: the stored discriminant plus the variant count its
/// definition allows. `value` must be `< variant_count` in a valid tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumField {
    pub value: u16,
    pub variant_count: u16,
}

/// A weak reference to another tag, by path and class. Never an ownership
/// edge; the referenced tag is not loaded. `expected_class` is the class the
/// referencing slot requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReference {
    pub expected_class: TagClass,
    pub class: TagClass,
    pub path: String,
}

/// A named attachment point on a model.
///
/// Valid tags keep all markers in the graph's top-level `markers` array;
/// markers found on instances instead are the defect the model-marker fix
/// repairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelMarker {
    pub name: [u8; 32],
    pub region: u16,
    pub permutation: u16,
    pub position: [f32; 3],
}

/// A float constrained to a declared closed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedValue {
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

/// A 32-byte fixed string buffer. Valid buffers hold a NUL terminator with
/// only zero bytes after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagString(pub [u8; 32]);

impl TagString {
    /// Bytes before the first NUL, or the whole buffer if unterminated.
    pub fn text_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(self.0.len());
        &self.0[..end]
    }
}

/// Embedded script data: the human-readable source and the compiled blob.
///
/// The compiled blob starts with a `u32` length prefix followed by the
/// source it was compiled from, then opaque node data; that embedded copy is
/// what the missing-script-source fix recovers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub source: String,
    pub compiled: Vec<u8>,
}

impl Script {
    /// Build a compiled blob embedding `source`, followed by `nodes`.
    pub fn compile(source: &str, nodes: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + source.len() + nodes.len());
        out.extend_from_slice(&(source.len() as u32).to_le_bytes());
        out.extend_from_slice(source.as_bytes());
        out.extend_from_slice(nodes);
        out
    }

    /// Recover the embedded source from the compiled blob, if the blob is
    /// intact.
    pub fn embedded_source(&self) -> Option<&str> {
        let len_bytes: [u8; 4] = self.compiled.get(0..4)?.try_into().ok()?;
        let len = u32::from_le_bytes(len_bytes) as usize;
        let bytes = self.compiled.get(4..4 + len)?;
        std::str::from_utf8(bytes).ok()
    }
}

/// An index into a sibling array, with the length of that array. `NULL_INDEX`
/// means "none"; any other value must be `< array_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexField {
    pub index: u16,
    pub array_len: u16,
}

/// A full-precision model vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// A model vertex with its normal packed into 11/11/10 signed bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressedVertex {
    pub position: [f32; 3],
    pub normal: u32,
}

/// One sound permutation: the declared playback buffer size and the raw
/// sample bytes. For the sample format this pipeline carries, a valid
/// permutation declares `buffer_size == samples.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundPermutation {
    pub buffer_size: u32,
    pub samples: Vec<u8>,
}

/// The in-memory object graph of one tag body.
///
/// Owned exclusively by the pipeline invocation that parsed it; fixes mutate
/// it in place and the codec writes it back out in the same fixed section
/// order it was read in.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGraph {
    pub class: TagClass,
    pub enums: Vec<EnumField>,
    pub references: Vec<TagReference>,
    pub markers: Vec<ModelMarker>,
    pub instance_markers: Vec<ModelMarker>,
    pub ranges: Vec<BoundedValue>,
    pub strings: Vec<TagString>,
    pub script: Script,
    pub indices: Vec<IndexField>,
    pub uncompressed_vertices: Vec<Vertex>,
    pub compressed_vertices: Vec<CompressedVertex>,
    pub sounds: Vec<SoundPermutation>,
}

impl TagGraph {
    /// An empty graph of the given class. Useful as a test scaffold and as
    /// the identity for section-by-section construction.
    pub fn empty(class: TagClass) -> TagGraph {
        TagGraph {
            class,
            enums: Vec::new(),
            references: Vec::new(),
            markers: Vec::new(),
            instance_markers: Vec::new(),
            ranges: Vec::new(),
            strings: Vec::new(),
            script: Script::default(),
            indices: Vec::new(),
            uncompressed_vertices: Vec::new(),
            compressed_vertices: Vec::new(),
            sounds: Vec::new(),
        }
    }
}

/// Pack a unit normal into 11/11/10 signed fixed-point bits (x low, z high).
pub fn pack_normal(normal: [f32; 3]) -> u32 {
    fn field(value: f32, bits: u32) -> u32 {
        let max = ((1i32 << (bits - 1)) - 1) as f32;
        let scaled = (value.clamp(-1.0, 1.0) * max).round() as i32;
        (scaled as u32) & ((1 << bits) - 1)
    }
    field(normal[0], 11) | (field(normal[1], 11) << 11) | (field(normal[2], 10) << 22)
}

/// Inverse of [`pack_normal`]. Lossy in the low bits, exact in sign.
pub fn unpack_normal(packed: u32) -> [f32; 3] {
    fn field(packed: u32, shift: u32, bits: u32) -> f32 {
        let mask = (1u32 << bits) - 1;
        let raw = ((packed >> shift) & mask) as i32;
        // Sign-extend from `bits` wide.
        let signed = (raw << (32 - bits)) >> (32 - bits);
        let max = ((1i32 << (bits - 1)) - 1) as f32;
        (signed as f32 / max).clamp(-1.0, 1.0)
    }
    [
        field(packed, 0, 11),
        field(packed, 11, 11),
        field(packed, 22, 10),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_string_text_stops_at_first_nul() {
        let mut buffer = [0u8; 32];
        buffer[..5].copy_from_slice(b"hello");
        assert_eq!(TagString(buffer).text_bytes(), b"hello");

        let full = TagString([b'x'; 32]);
        assert_eq!(full.text_bytes().len(), 32);
    }

    #[test]
    fn script_embedded_source_round_trips() {
        let script = Script {
            source: String::new(),
            compiled: Script::compile("(sleep 30)", &[1, 2, 3]),
        };
        assert_eq!(script.embedded_source(), Some("(sleep 30)"));
    }

    #[test]
    fn script_embedded_source_rejects_corrupt_blob() {
        let truncated = Script {
            source: String::new(),
            compiled: vec![0xFF, 0xFF, 0xFF, 0xFF],
        };
        assert_eq!(truncated.embedded_source(), None);

        let short = Script {
            source: String::new(),
            compiled: vec![1, 0],
        };
        assert_eq!(short.embedded_source(), None);
    }

    #[test]
    fn normal_packing_preserves_axes() {
        for (axis, expected) in [
            ([1.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            ([0.0, -1.0, 0.0], [0.0, -1.0, 0.0]),
            ([0.0, 0.0, 1.0], [0.0, 0.0, 1.0]),
        ] {
            let unpacked = unpack_normal(pack_normal(axis));
            for (got, want) in unpacked.iter().zip(expected) {
                assert!((got - want).abs() < 1e-2, "{axis:?} -> {unpacked:?}");
            }
        }
    }

    #[test]
    fn normal_packing_is_close_for_arbitrary_unit_vectors() {
        let n = {
            let v: [f32; 3] = [0.3, -0.5, 0.8];
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            [v[0] / len, v[1] / len, v[2] / len]
        };
        let unpacked = unpack_normal(pack_normal(n));
        for (got, want) in unpacked.iter().zip(n) {
            assert!((got - want).abs() < 1e-2);
        }
    }
}
