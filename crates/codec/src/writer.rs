use crate::error::EncodeError;
use crate::geom::PathSegment;
use crate::header::{encode_point, GeometryDataHeader, GeometryDataType};
use crate::math::Point;
use crate::path::{Path, Region};

use byteorder::{ByteOrder, LittleEndian};

use tracing::{debug, trace};

/// Appends encoded regions and paths to a byte buffer.
///
/// Container records are written with a placeholder size which is patched once their
/// children have been written.
#[derive(Clone, Debug, Default)]
pub struct GeometryDataWriter {
    buffer: Vec<u8>,
}

impl GeometryDataWriter {
    pub fn new() -> Self {
        GeometryDataWriter { buffer: Vec::new() }
    }

    /// Appends to an existing buffer.
    pub fn with_buffer(buffer: Vec<u8>) -> Self {
        GeometryDataWriter { buffer }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Writes a region record followed by its paths.
    ///
    /// Every non-empty path of the region must be closed. On error nothing is written.
    /// An empty region writes nothing.
    pub fn write_region(&mut self, region: &Region) -> Result<(), EncodeError> {
        let paths = || region.paths().iter().filter(|path| !path.is_empty());
        if let Some((index, _)) = region
            .paths()
            .iter()
            .enumerate()
            .find(|(_, path)| !path.is_empty() && !path.is_closed())
        {
            return Err(EncodeError::OpenPathInRegion { index });
        }
        if paths().next().is_none() {
            return Ok(());
        }

        let start = self.begin_record(GeometryDataHeader::new(GeometryDataType::Region));
        for path in paths() {
            self.write_path_record(path, true);
        }
        self.end_record(start);
        debug!(
            paths = region.len(),
            bytes = self.buffer.len() - start,
            "encoded region"
        );

        Ok(())
    }

    /// Writes a standalone path, closed or not.
    ///
    /// An empty path writes nothing.
    pub fn write_path(&mut self, path: &Path) {
        if !path.is_empty() {
            self.write_path_record(path, path.is_closed());
        }
    }

    /// Writes a path flagged as closed, with a closing line if it does not end where
    /// it starts.
    pub fn write_path_closed(&mut self, path: &Path) {
        if !path.is_empty() {
            self.write_path_record(path, true);
        }
    }

    fn write_path_record(&mut self, path: &Path, closed: bool) {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return;
        };
        let start_point = first.from();

        let mut header = GeometryDataHeader::new(GeometryDataType::Path);
        header.set_path_closed(closed);
        let start = self.begin_record(header);
        self.buffer.extend_from_slice(&encode_point(start_point));

        for segment in path {
            self.write_segment(segment);
        }
        if closed && last.to() != start_point {
            self.write_line(start_point);
        }

        self.end_record(start);
        trace!(
            segments = path.len(),
            offset = start,
            closed,
            "encoded path"
        );
    }

    fn write_segment(&mut self, segment: &PathSegment) {
        match segment {
            PathSegment::Line(line) => self.write_line(line.to),
            PathSegment::Arc(arc) => {
                let mut header = GeometryDataHeader::new(GeometryDataType::Arc);
                header.set_clockwise(arc.clockwise);
                self.buffer.extend_from_slice(&header.encode());
                self.buffer.extend_from_slice(&encode_point(arc.to));
                self.buffer.extend_from_slice(&encode_point(arc.center));
                let mut radius = [0; 8];
                LittleEndian::write_f64(&mut radius, arc.radius);
                self.buffer.extend_from_slice(&radius);
            }
        }
    }

    fn write_line(&mut self, to: Point) {
        let header = GeometryDataHeader::new(GeometryDataType::Line);
        self.buffer.extend_from_slice(&header.encode());
        self.buffer.extend_from_slice(&encode_point(to));
    }

    fn begin_record(&mut self, header: GeometryDataHeader) -> usize {
        let start = self.buffer.len();
        self.buffer.extend_from_slice(&header.encode());
        start
    }

    fn end_record(&mut self, start: usize) {
        let size = (self.buffer.len() - start) as i64;
        LittleEndian::write_i64(&mut self.buffer[start..start + 8], size);
    }
}

/// Encodes a region into a new buffer.
pub fn encode_region(region: &Region) -> Result<Vec<u8>, EncodeError> {
    let mut writer = GeometryDataWriter::new();
    writer.write_region(region)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
use crate::geom::{ArcSegment, LineSegment};
#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn open_path() -> Path {
    Path::from_segments(vec![
        LineSegment::new(point(0.0, 0.0), point(4.0, 0.0)).into(),
        LineSegment::new(point(4.0, 0.0), point(4.0, 3.0)).into(),
    ])
}

#[test]
fn sizes_are_backpatched() {
    let path = Path::from_segments(vec![
        LineSegment::new(point(0.0, 0.0), point(2.0, 0.0)).into(),
        ArcSegment::new(point(2.0, 0.0), point(0.0, 0.0), point(1.0, 0.0), 1.0, true).into(),
    ]);
    let bytes = encode_region(&Region::from_paths(vec![path])).unwrap();

    assert_eq!(bytes.len(), 16 + 32 + 32 + 56);
    assert_eq!(&bytes[0..8], &136i64.to_le_bytes());
    assert_eq!(bytes[8], GeometryDataType::Region.tag());
    assert_eq!(&bytes[16..24], &120i64.to_le_bytes());
    assert_eq!(&bytes[28..32], &1u32.to_le_bytes());
    // The arc record carries the sweep direction.
    assert_eq!(bytes[80 + 8], GeometryDataType::Arc.tag());
    assert_eq!(&bytes[80 + 12..80 + 16], &2u32.to_le_bytes());
}

#[test]
fn open_path_in_region() {
    let mut writer = GeometryDataWriter::new();
    writer.write_path(&open_path());
    let before = writer.as_bytes().to_vec();

    let region = Region::from_paths(vec![Path::new(), open_path()]);
    assert_eq!(
        writer.write_region(&region),
        Err(EncodeError::OpenPathInRegion { index: 1 })
    );
    assert_eq!(writer.as_bytes(), &before[..]);
}

#[test]
fn empty_geometry_writes_nothing() {
    let mut writer = GeometryDataWriter::new();
    writer.write_region(&Region::new()).unwrap();
    writer.write_region(&Region::from_paths(vec![Path::new()])).unwrap();
    writer.write_path(&Path::new());
    writer.write_path_closed(&Path::new());
    assert!(writer.as_bytes().is_empty());
}

#[test]
fn closing_line_is_appended() {
    let mut writer = GeometryDataWriter::new();
    writer.write_path(&open_path());
    assert_eq!(writer.as_bytes().len(), 32 + 2 * 32);
    assert_eq!(&writer.as_bytes()[12..16], &0u32.to_le_bytes());

    let mut writer = GeometryDataWriter::new();
    writer.write_path_closed(&open_path());
    let bytes = writer.into_inner();
    assert_eq!(bytes.len(), 32 + 3 * 32);
    assert_eq!(&bytes[0..8], &128i64.to_le_bytes());
    assert_eq!(&bytes[12..16], &1u32.to_le_bytes());
    assert_eq!(&bytes[112..128], &encode_point(point(0.0, 0.0)));
}
