use crate::error::DecodeError;
use crate::geom::{ArcSegment, LineSegment, PathSegment};
use crate::header::{read_point, GeometryDataHeader, GeometryDataType, HEADER_SIZE, POINT_SIZE};
use crate::math::Point;
use crate::path::{Path, Region};

use byteorder::{ByteOrder, LittleEndian};
use std::ops::Range;

use tracing::{trace, warn};

/// A value decoded from a single record.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Region(Region),
    Path(Path),
    Segment(PathSegment),
}

/// A cursor over encoded geometry data.
///
/// The reader always holds the validated header of the record at the cursor. Segment
/// records do not store their start point: it is the last vertex seen by the reader,
/// either the start point of the enclosing path or the end point of the previous
/// segment.
pub struct GeometryDataReader<'l> {
    data: &'l [u8],
    offset: usize,
    current: GeometryDataHeader,
    region: Option<Range<usize>>,
    path: Option<Range<usize>>,
    last_vertex: Point,
}

impl<'l> GeometryDataReader<'l> {
    pub fn new(data: &'l [u8]) -> Result<Self, DecodeError> {
        let mut reader = GeometryDataReader {
            data,
            offset: 0,
            current: GeometryDataHeader::END,
            region: None,
            path: None,
            last_vertex: Point::origin(),
        };
        reader.peek()?;

        Ok(reader)
    }

    /// Header of the record at the cursor.
    #[inline]
    pub fn current_header(&self) -> &GeometryDataHeader {
        &self.current
    }

    #[inline]
    pub fn has_content(&self) -> bool {
        self.current.data_type != GeometryDataType::End
    }

    /// Position of the cursor in bytes.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Decodes the record at the cursor along with its children and moves past it.
    ///
    /// Returns `None` at the end of the content.
    pub fn read(&mut self) -> Result<Option<Geometry>, DecodeError> {
        let geometry = match self.current.data_type {
            GeometryDataType::End => return Ok(None),
            GeometryDataType::Region => Geometry::Region(self.read_region()?),
            GeometryDataType::Path => Geometry::Path(self.read_path()?),
            GeometryDataType::Line | GeometryDataType::Arc => {
                Geometry::Segment(self.read_segment()?)
            }
        };

        Ok(Some(geometry))
    }

    /// Decodes every remaining record.
    pub fn read_all(&mut self) -> Result<Vec<Geometry>, DecodeError> {
        let mut result = Vec::new();
        while let Some(geometry) = self.read()? {
            result.push(geometry);
        }

        Ok(result)
    }

    /// Moves past the record at the cursor and all of its children.
    ///
    /// Unlike [`move_next`](Self::move_next), which stops on the first child, this
    /// advances by the whole declared size of the record. Does nothing at the end of
    /// the content.
    pub fn skip(&mut self) -> Result<(), DecodeError> {
        if !self.has_content() {
            return Ok(());
        }
        // The size was validated when the header was peeked.
        let size = self.current.size as usize;
        self.advance(size)
    }

    /// Moves past the header and body of the record at the cursor, onto its first child.
    pub fn move_next(&mut self) -> Result<(), DecodeError> {
        self.advance(self.current.data_type.record_size())
    }

    /// Rewinds to the start of the data.
    pub fn reset(&mut self) -> Result<(), DecodeError> {
        self.offset = 0;
        self.region = None;
        self.path = None;
        self.last_vertex = Point::origin();
        self.peek()
    }

    /// Rewinds to the start of the region the cursor is in.
    ///
    /// Returns `false` if the cursor is not inside a region.
    pub fn reset_region(&mut self) -> Result<bool, DecodeError> {
        let Some(range) = self.region.clone() else {
            return Ok(false);
        };
        self.jump(range.start)?;
        Ok(true)
    }

    /// Moves past the end of the region the cursor is in.
    ///
    /// Returns `false` if the cursor is not inside a region.
    pub fn skip_region(&mut self) -> Result<bool, DecodeError> {
        let Some(range) = self.region.clone() else {
            return Ok(false);
        };
        self.jump(range.end)?;
        Ok(true)
    }

    /// Rewinds to the start of the path the cursor is in.
    ///
    /// Returns `false` if the cursor is not inside a path.
    pub fn reset_path(&mut self) -> Result<bool, DecodeError> {
        let Some(range) = self.path.clone() else {
            return Ok(false);
        };
        self.jump(range.start)?;
        Ok(true)
    }

    /// Moves past the end of the path the cursor is in.
    ///
    /// Returns `false` if the cursor is not inside a path.
    pub fn skip_path(&mut self) -> Result<bool, DecodeError> {
        let Some(range) = self.path.clone() else {
            return Ok(false);
        };
        self.jump(range.end)?;
        Ok(true)
    }

    fn read_region(&mut self) -> Result<Region, DecodeError> {
        let end = self.record_end();
        self.move_next()?;

        let mut paths = Vec::new();
        while self.offset < end && self.has_content() {
            match self.current.data_type {
                GeometryDataType::Path => paths.push(self.read_path()?),
                data_type => {
                    warn!(offset = self.offset, ?data_type, "skipping a record in a region");
                    self.skip()?;
                }
            }
        }
        trace!(paths = paths.len(), "decoded region");

        Ok(Region::from_paths(paths))
    }

    fn read_path(&mut self) -> Result<Path, DecodeError> {
        let end = self.record_end();
        self.move_next()?;

        let mut segments = Vec::new();
        while self.offset < end && self.has_content() {
            match self.current.data_type {
                GeometryDataType::Line | GeometryDataType::Arc => {
                    segments.push(self.read_segment()?)
                }
                data_type => {
                    warn!(offset = self.offset, ?data_type, "skipping a record in a path");
                    self.skip()?;
                }
            }
        }
        trace!(segments = segments.len(), "decoded path");

        Ok(Path::from_segments(segments))
    }

    fn read_segment(&mut self) -> Result<PathSegment, DecodeError> {
        let from = self.last_vertex;
        let body = self.offset + HEADER_SIZE;
        let to = read_point(&self.data[body..]);
        let segment = match self.current.data_type {
            GeometryDataType::Arc => {
                let center = read_point(&self.data[body + POINT_SIZE..]);
                let radius = LittleEndian::read_f64(&self.data[body + 2 * POINT_SIZE..]);
                let clockwise = self.current.is_clockwise();
                PathSegment::Arc(ArcSegment::new(from, to, center, radius, clockwise))
            }
            _ => PathSegment::Line(LineSegment::new(from, to)),
        };
        self.move_next()?;

        Ok(segment)
    }

    fn record_end(&self) -> usize {
        self.offset + self.current.size as usize
    }

    fn advance(&mut self, len: usize) -> Result<(), DecodeError> {
        if matches!(
            self.current.data_type,
            GeometryDataType::Line | GeometryDataType::Arc
        ) {
            self.last_vertex = read_point(&self.data[self.offset + HEADER_SIZE..]);
        }
        self.offset += len;
        self.peek()
    }

    fn jump(&mut self, offset: usize) -> Result<(), DecodeError> {
        self.offset = offset;
        self.peek()
    }

    /// Leaves the region and path that end before the cursor, then decodes the header
    /// at the cursor.
    fn peek(&mut self) -> Result<(), DecodeError> {
        let offset = self.offset;
        if self.region.as_ref().is_some_and(|r| r.end <= offset || r.start > offset) {
            self.region = None;
        }
        if self.path.as_ref().is_some_and(|p| p.end <= offset || p.start > offset) {
            self.path = None;
            self.last_vertex = Point::origin();
        }

        self.current = GeometryDataHeader::END;
        let header = GeometryDataHeader::decode(self.data, offset)?;
        self.current = header;

        match header.data_type {
            GeometryDataType::Region => {
                trace!(offset, size = header.size, "region record");
                self.region = Some(offset..offset + header.size as usize);
                self.path = None;
            }
            GeometryDataType::Path => {
                trace!(offset, size = header.size, "path record");
                self.path = Some(offset..offset + header.size as usize);
                self.last_vertex = read_point(&self.data[offset + HEADER_SIZE..]);
            }
            _ => {}
        }

        Ok(())
    }
}

/// Decodes every record of `data`.
pub fn decode(data: &[u8]) -> Result<Vec<Geometry>, DecodeError> {
    GeometryDataReader::new(data)?.read_all()
}

#[cfg(test)]
use crate::header::encode_point;
#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn record(data_type: GeometryDataType, size: usize, flags: u32, points: &[Point]) -> Vec<u8> {
    let header = GeometryDataHeader {
        size: size as i64,
        data_type,
        flags,
    };
    let mut bytes = header.encode().to_vec();
    for p in points {
        bytes.extend_from_slice(&encode_point(*p));
    }
    bytes
}

#[test]
fn segments_start_at_the_last_vertex() {
    let mut data = record(GeometryDataType::Path, 96, 0, &[point(1.0, 1.0)]);
    data.extend(record(GeometryDataType::Line, 32, 0, &[point(5.0, 1.0)]));
    data.extend(record(GeometryDataType::Line, 32, 0, &[point(5.0, 4.0)]));

    let mut reader = GeometryDataReader::new(&data).unwrap();
    assert_eq!(reader.current_header().data_type, GeometryDataType::Path);
    reader.move_next().unwrap();
    reader.move_next().unwrap();
    assert_eq!(
        reader.read().unwrap(),
        Some(Geometry::Segment(PathSegment::Line(LineSegment::new(
            point(5.0, 1.0),
            point(5.0, 4.0)
        ))))
    );
    assert!(!reader.has_content());
    assert_eq!(reader.read().unwrap(), None);

    // Rewinding restores the path start point.
    reader.reset().unwrap();
    reader.move_next().unwrap();
    assert_eq!(
        reader.read().unwrap(),
        Some(Geometry::Segment(PathSegment::Line(LineSegment::new(
            point(1.0, 1.0),
            point(5.0, 1.0)
        ))))
    );
}

#[test]
fn end_marker_stops_the_content() {
    let mut data = record(GeometryDataType::Path, 64, 0, &[point(0.0, 0.0)]);
    data.extend(record(GeometryDataType::Line, 32, 0, &[point(2.0, 0.0)]));
    data.extend(record(GeometryDataType::End, 0, 0, &[]));
    data.extend(record(GeometryDataType::Path, 32, 0, &[point(9.0, 9.0)]));

    let geometries = decode(&data).unwrap();
    assert_eq!(geometries.len(), 1);
}

#[test]
fn skip_and_rewind_paths() {
    let mut data = record(GeometryDataType::Region, 16 + 64 + 64, 0, &[]);
    for x in [0.0, 10.0] {
        data.extend(record(GeometryDataType::Path, 64, 1, &[point(x, 0.0)]));
        data.extend(record(GeometryDataType::Line, 32, 0, &[point(x + 1.0, 0.0)]));
    }

    let mut reader = GeometryDataReader::new(&data).unwrap();
    assert!(!reader.skip_path().unwrap());
    reader.move_next().unwrap();
    reader.move_next().unwrap();
    assert_eq!(reader.offset(), 48);
    assert!(reader.skip_path().unwrap());
    assert_eq!(reader.offset(), 80);
    assert_eq!(reader.current_header().data_type, GeometryDataType::Path);

    reader.move_next().unwrap();
    assert!(reader.reset_path().unwrap());
    assert_eq!(reader.offset(), 80);
    assert!(reader.current_header().is_path_closed());

    assert!(reader.reset_region().unwrap());
    assert_eq!(reader.offset(), 0);
    assert!(reader.skip_region().unwrap());
    assert!(!reader.has_content());
    assert!(!reader.skip_region().unwrap());
}

#[test]
fn oversized_child_is_an_error() {
    let mut data = record(GeometryDataType::Path, 64, 0, &[point(0.0, 0.0)]);
    data.extend(record(GeometryDataType::Line, 48, 0, &[point(2.0, 0.0)]));

    let mut reader = GeometryDataReader::new(&data).unwrap();
    assert_eq!(
        reader.read(),
        Err(DecodeError::InvalidSize {
            offset: 32,
            size: 48,
            remaining: 32
        })
    );
}

#[test]
fn end_marker_with_a_bogus_size() {
    let mut data = record(GeometryDataType::Path, 64, 0, &[point(0.0, 0.0)]);
    data.extend(record(GeometryDataType::Line, 32, 0, &[point(2.0, 0.0)]));
    let end = GeometryDataHeader {
        size: -1,
        data_type: GeometryDataType::End,
        flags: 0,
    };
    data.extend_from_slice(&end.encode());

    let geometries = decode(&data).unwrap();
    assert_eq!(
        geometries,
        vec![Geometry::Path(Path::from_segments(vec![LineSegment::new(
            point(0.0, 0.0),
            point(2.0, 0.0)
        )
        .into()]))]
    );

    let mut reader = GeometryDataReader::new(&data).unwrap();
    reader.skip().unwrap();
    assert_eq!(reader.offset(), 64);
    assert_eq!(reader.current_header(), &GeometryDataHeader::END);
    reader.skip().unwrap();
    reader.move_next().unwrap();
    assert_eq!(reader.offset(), 64);
    assert!(!reader.has_content());
}
