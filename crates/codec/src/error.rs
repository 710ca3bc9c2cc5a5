use thiserror::Error;

/// Malformed geometry data.
///
/// Offsets are in bytes from the start of the buffer.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum DecodeError {
    #[error("Offset {offset}: Unknown record type {tag}.")]
    UnknownType { offset: usize, tag: u8 },
    #[error("Offset {offset}: Expected a 16 bytes record header, got {remaining} bytes.")]
    TruncatedHeader { offset: usize, remaining: usize },
    #[error("Offset {offset}: Invalid record size {size}, {remaining} bytes remaining.")]
    InvalidSize {
        offset: usize,
        size: i64,
        remaining: usize,
    },
}

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum EncodeError {
    #[error("Path {index} of the region is not closed.")]
    OpenPathInRegion { index: usize },
}
