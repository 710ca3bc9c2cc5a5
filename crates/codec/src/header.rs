//! Record headers.
//!
//! Every record starts with the same 16 bytes:
//!
//! | bytes  | content                                            |
//! |--------|----------------------------------------------------|
//! | 0..8   | size of the record and its children, `i64`         |
//! | 8      | record type                                        |
//! | 9..12  | reserved, zero                                     |
//! | 12..16 | flags, `u32`                                       |
//!
//! All values are little-endian.

use crate::error::DecodeError;
use crate::math::{point, Point};

use byteorder::{ByteOrder, LittleEndian};

pub const HEADER_SIZE: usize = 16;
pub(crate) const POINT_SIZE: usize = 16;

/// Type tag of a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GeometryDataType {
    /// Marks the end of the content.
    End = 0,
    /// Paths follow, up to the size of the record.
    Region = 1,
    /// Start point, then segments up to the size of the record.
    Path = 2,
    /// End point.
    Line = 3,
    /// End point, center and radius.
    Arc = 4,
}

impl GeometryDataType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(GeometryDataType::End),
            1 => Some(GeometryDataType::Region),
            2 => Some(GeometryDataType::Path),
            3 => Some(GeometryDataType::Line),
            4 => Some(GeometryDataType::Arc),
            _ => None,
        }
    }

    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Size of the header and body, children excluded.
    pub fn record_size(self) -> usize {
        match self {
            GeometryDataType::End => 0,
            GeometryDataType::Region => HEADER_SIZE,
            GeometryDataType::Path => HEADER_SIZE + POINT_SIZE,
            GeometryDataType::Line => HEADER_SIZE + POINT_SIZE,
            GeometryDataType::Arc => HEADER_SIZE + 2 * POINT_SIZE + 8,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeometryDataHeader {
    pub size: i64,
    pub data_type: GeometryDataType,
    pub flags: u32,
}

impl GeometryDataHeader {
    pub const PATH_IS_CLOSED: u32 = 1;
    pub const ARC_CLOCKWISE: u32 = 1 << 1;

    /// The header reported past the last record.
    pub const END: Self = GeometryDataHeader {
        size: 0,
        data_type: GeometryDataType::End,
        flags: 0,
    };

    pub fn new(data_type: GeometryDataType) -> Self {
        GeometryDataHeader {
            size: data_type.record_size() as i64,
            data_type,
            flags: 0,
        }
    }

    #[inline]
    pub fn is_path_closed(&self) -> bool {
        self.flags & Self::PATH_IS_CLOSED != 0
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.flags & Self::ARC_CLOCKWISE != 0
    }

    pub fn set_path_closed(&mut self, closed: bool) {
        self.set_flag(Self::PATH_IS_CLOSED, closed);
    }

    pub fn set_clockwise(&mut self, clockwise: bool) {
        self.set_flag(Self::ARC_CLOCKWISE, clockwise);
    }

    fn set_flag(&mut self, flag: u32, value: bool) {
        if value {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// Decodes and validates the header of the record starting at `offset`.
    ///
    /// An empty remainder or an end marker decodes as [`GeometryDataHeader::END`]; the
    /// size stored in an end marker is ignored. Otherwise the declared size must cover
    /// the fixed part of the record and fit in the remaining bytes.
    pub fn decode(data: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let remaining = data.len().saturating_sub(offset);
        if remaining == 0 {
            return Ok(Self::END);
        }
        if remaining < HEADER_SIZE {
            return Err(DecodeError::TruncatedHeader { offset, remaining });
        }

        let bytes = &data[offset..offset + HEADER_SIZE];
        let tag = bytes[8];
        let data_type =
            GeometryDataType::from_tag(tag).ok_or(DecodeError::UnknownType { offset, tag })?;
        let header = GeometryDataHeader {
            size: LittleEndian::read_i64(&bytes[0..8]),
            data_type,
            flags: LittleEndian::read_u32(&bytes[12..16]),
        };

        if data_type == GeometryDataType::End {
            return Ok(Self::END);
        }

        let fits = usize::try_from(header.size)
            .map(|size| size >= data_type.record_size() && size <= remaining)
            .unwrap_or(false);
        if !fits {
            return Err(DecodeError::InvalidSize {
                offset,
                size: header.size,
                remaining,
            });
        }

        Ok(header)
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0; HEADER_SIZE];
        LittleEndian::write_i64(&mut bytes[0..8], self.size);
        bytes[8] = self.data_type.tag();
        LittleEndian::write_u32(&mut bytes[12..16], self.flags);
        bytes
    }
}

pub(crate) fn read_point(bytes: &[u8]) -> Point {
    point(
        LittleEndian::read_f64(&bytes[0..8]),
        LittleEndian::read_f64(&bytes[8..16]),
    )
}

pub(crate) fn encode_point(p: Point) -> [u8; POINT_SIZE] {
    let mut bytes = [0; POINT_SIZE];
    LittleEndian::write_f64(&mut bytes[0..8], p.x);
    LittleEndian::write_f64(&mut bytes[8..16], p.y);
    bytes
}

#[test]
fn record_sizes() {
    assert_eq!(GeometryDataType::Region.record_size(), 16);
    assert_eq!(GeometryDataType::Path.record_size(), 32);
    assert_eq!(GeometryDataType::Line.record_size(), 32);
    assert_eq!(GeometryDataType::Arc.record_size(), 56);
}

#[test]
fn header_layout() {
    let mut header = GeometryDataHeader::new(GeometryDataType::Arc);
    header.set_clockwise(true);
    let bytes = header.encode();
    assert_eq!(&bytes[0..8], &56i64.to_le_bytes());
    assert_eq!(bytes[8], 4);
    assert_eq!(&bytes[9..12], &[0, 0, 0]);
    assert_eq!(&bytes[12..16], &2u32.to_le_bytes());

    let mut data = bytes.to_vec();
    data.resize(56, 0);
    assert_eq!(GeometryDataHeader::decode(&data, 0), Ok(header));
    assert!(!header.is_path_closed());
}

#[test]
fn malformed_headers() {
    assert_eq!(GeometryDataHeader::decode(&[], 0), Ok(GeometryDataHeader::END));
    assert_eq!(
        GeometryDataHeader::decode(&[0; 7], 0),
        Err(DecodeError::TruncatedHeader {
            offset: 0,
            remaining: 7
        })
    );

    let mut data = GeometryDataHeader::new(GeometryDataType::Line).encode().to_vec();
    data[8] = 9;
    assert_eq!(
        GeometryDataHeader::decode(&data, 0),
        Err(DecodeError::UnknownType { offset: 0, tag: 9 })
    );

    // The body of the line is missing.
    data[8] = GeometryDataType::Line.tag();
    assert_eq!(
        GeometryDataHeader::decode(&data, 0),
        Err(DecodeError::InvalidSize {
            offset: 0,
            size: 32,
            remaining: 16
        })
    );

    let mut short = GeometryDataHeader::new(GeometryDataType::Path);
    short.size = 20;
    let mut data = short.encode().to_vec();
    data.resize(32, 0);
    assert!(matches!(
        GeometryDataHeader::decode(&data, 0),
        Err(DecodeError::InvalidSize { size: 20, .. })
    ));
}

#[test]
fn end_marker_size_is_ignored() {
    for size in [-1, i64::MIN, i64::MAX, 16] {
        let mut data = GeometryDataHeader {
            size,
            data_type: GeometryDataType::End,
            flags: 3,
        }
        .encode()
        .to_vec();
        data.resize(32, 0);
        assert_eq!(GeometryDataHeader::decode(&data, 0), Ok(GeometryDataHeader::END));
    }
}
