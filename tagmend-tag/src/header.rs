use crate::error::HeaderError;
use std::fmt;

/// File magic at offset 0.
pub const MAGIC: [u8; 4] = *b"tag!";

/// The only body layout version this tool understands.
pub const VERSION: u16 = 1;

/// Fixed header length in bytes.
pub const HEADER_LEN: usize = 20;

/// Four-character content class code, e.g. `mod2` or `snd!`.
///
/// The class travels with the graph and is written back verbatim on
/// re-serialization; the engine never converts between classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagClass(pub [u8; 4]);

impl fmt::Display for TagClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// The validated fixed-layout header of a tag file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub class: TagClass,
    pub body_len: u32,
}

impl TagHeader {
    /// Validate the header at the front of `data` against the actual file
    /// length. Every inconsistency is terminal for the file.
    pub fn read(data: &[u8]) -> Result<TagHeader, HeaderError> {
        if data.len() < HEADER_LEN {
            return Err(HeaderError::TooShort { len: data.len() });
        }

        let magic: [u8; 4] = data[0..4].try_into().expect("sliced 4 bytes");
        if magic != MAGIC {
            return Err(HeaderError::BadMagic { found: magic });
        }

        let class = TagClass(data[4..8].try_into().expect("sliced 4 bytes"));

        let version = u16::from_le_bytes(data[8..10].try_into().expect("sliced 2 bytes"));
        if version != VERSION {
            return Err(HeaderError::UnsupportedVersion(version));
        }

        let header_len = u16::from_le_bytes(data[10..12].try_into().expect("sliced 2 bytes"));
        if header_len as usize != HEADER_LEN {
            return Err(HeaderError::HeaderLenMismatch {
                declared: header_len,
            });
        }

        let body_len = u32::from_le_bytes(data[12..16].try_into().expect("sliced 4 bytes"));
        let actual = data.len() - HEADER_LEN;
        if body_len as usize != actual {
            return Err(HeaderError::BodyLenMismatch {
                declared: body_len,
                actual,
            });
        }

        let reserved = u32::from_le_bytes(data[16..20].try_into().expect("sliced 4 bytes"));
        if reserved != 0 {
            return Err(HeaderError::ReservedNonzero);
        }

        Ok(TagHeader { class, body_len })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.class.0);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&(HEADER_LEN as u16).to_le_bytes());
        out.extend_from_slice(&self.body_len.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
    }
}
