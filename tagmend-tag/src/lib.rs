//! The tag file format.
//!
//! A tag is a fixed-layout little-endian file: a 20-byte header carrying a
//! content class and a declared body length, followed by eleven body sections
//! in fixed order. `parse` reconstructs the in-memory [`TagGraph`];
//! `serialize` is its exact inverse: for a well-formed file,
//! `serialize(parse(bytes)) == bytes`.
//!
//! Header problems and body problems are distinct failure classes
//! ([`HeaderError`] vs [`ParseError`]) because the pipeline gates on them
//! separately: a file with a bad header never reaches the body parser.

mod codec;
mod error;
mod graph;
mod header;

pub use codec::{TagFileError, parse, parse_body, serialize, serialize_body};
pub use error::{HeaderError, ParseError};
pub use graph::{
    BoundedValue, CompressedVertex, EnumField, IndexField, ModelMarker, NULL_INDEX, Script,
    SoundPermutation, TagGraph, TagReference, TagString, Vertex, pack_normal, unpack_normal,
};
pub use header::{HEADER_LEN, MAGIC, TagClass, TagHeader, VERSION};
