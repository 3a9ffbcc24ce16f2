use crate::header::HEADER_LEN;
use thiserror::Error;

/// Structural problems with the fixed tag header. A file failing any of
/// these never reaches the body parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("file is {len} bytes, shorter than the {HEADER_LEN}-byte header")]
    TooShort { len: usize },

    #[error("bad magic {found:?}")]
    BadMagic { found: [u8; 4] },

    #[error("unsupported tag version {0}")]
    UnsupportedVersion(u16),

    #[error("header declares a {declared}-byte header, expected {HEADER_LEN}")]
    HeaderLenMismatch { declared: u16 },

    #[error("header declares a {declared}-byte body but {actual} bytes follow the header")]
    BodyLenMismatch { declared: u32, actual: usize },

    #[error("reserved header field is nonzero")]
    ReservedNonzero,
}

/// Structural problems with the tag body. The header was fine; the body does
/// not decode to a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("truncated {section} section")]
    Truncated { section: &'static str },

    #[error("{section} declares {declared} entries but only {remaining} bytes remain")]
    CountOverrun {
        section: &'static str,
        declared: u32,
        remaining: usize,
    },

    #[error("{section} is not valid UTF-8")]
    InvalidUtf8 { section: &'static str },

    #[error("{0} trailing bytes after the last body section")]
    TrailingBytes(usize),
}
