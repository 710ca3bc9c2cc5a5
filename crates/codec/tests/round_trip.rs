use tracery_codec::geom::{ArcSegment, Engine, LineSegment, PathSegment};
use tracery_codec::math::point;
use tracery_codec::path::construct::{create_path, create_path_from_segments};
use tracery_codec::path::{Path, Region};
use tracery_codec::{
    decode, encode_region, DecodeError, Geometry, GeometryDataReader, GeometryDataType,
    GeometryDataWriter,
};

fn rounded_slot(engine: &Engine) -> Path {
    create_path_from_segments(
        engine,
        true,
        [
            LineSegment::new(point(0.0, 0.0), point(10.0, 0.0)).into(),
            ArcSegment::new(point(10.0, 0.0), point(10.0, 4.0), point(10.0, 2.0), 2.0, false).into(),
            LineSegment::new(point(10.0, 4.0), point(0.0, 4.0)).into(),
            ArcSegment::new(point(0.0, 4.0), point(0.0, 0.0), point(0.0, 2.0), 2.0, false).into(),
        ],
    )
}

fn hole(engine: &Engine) -> Path {
    create_path_from_segments(
        engine,
        true,
        [ArcSegment::circle(point(6.0, 2.0), point(5.0, 2.0), true).into()],
    )
}

#[test]
fn region_round_trip() {
    let engine = Engine::default();
    let region = Region::from_paths(vec![rounded_slot(&engine), hole(&engine)]);
    let bytes = encode_region(&region).unwrap();

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.len(), 1);
    let Geometry::Region(decoded) = &decoded[0] else {
        panic!("expected a region, got {:?}", decoded[0]);
    };

    assert_eq!(decoded.len(), 2);
    for (a, b) in decoded.paths().iter().zip(region.paths()) {
        assert_eq!(a.len(), b.len());
        for (sa, sb) in a.segments().iter().zip(b.segments()) {
            match (sa, sb) {
                (PathSegment::Line(la), PathSegment::Line(lb)) => assert_eq!(la, lb),
                (PathSegment::Arc(aa), PathSegment::Arc(ab)) => {
                    assert_eq!(aa.from, ab.from);
                    assert_eq!(aa.to, ab.to);
                    assert_eq!(aa.center, ab.center);
                    assert_eq!(aa.radius, ab.radius);
                    assert_eq!(aa.clockwise, ab.clockwise);
                }
                _ => panic!("segment kinds differ: {:?} {:?}", sa, sb),
            }
        }
    }

    assert!(decoded.is_inner_point(point(1.0, 1.0), false, &engine));
    assert!(!decoded.is_inner_point(point(5.0, 2.0), false, &engine));
}

#[test]
fn sequential_reading() {
    let engine = Engine::default();
    let square = create_path(
        &engine,
        true,
        [point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)],
    );
    let open = create_path(&engine, false, [point(5.0, 5.0), point(8.0, 5.0)]);

    let mut writer = GeometryDataWriter::new();
    writer
        .write_region(&Region::from_paths(vec![hole(&engine)]))
        .unwrap();
    writer.write_path(&open);
    writer
        .write_region(&Region::from_paths(vec![square.clone()]))
        .unwrap();
    let bytes = writer.into_inner();

    let mut reader = GeometryDataReader::new(&bytes).unwrap();
    assert_eq!(reader.current_header().data_type, GeometryDataType::Region);
    reader.skip().unwrap();

    // Walk into the open path and pick its only segment.
    assert_eq!(reader.current_header().data_type, GeometryDataType::Path);
    assert!(!reader.current_header().is_path_closed());
    reader.move_next().unwrap();
    assert_eq!(
        reader.read().unwrap(),
        Some(Geometry::Segment(
            LineSegment::new(point(5.0, 5.0), point(8.0, 5.0)).into()
        ))
    );

    assert_eq!(
        reader.read().unwrap(),
        Some(Geometry::Region(Region::from_paths(vec![square])))
    );
    assert!(!reader.has_content());
    assert_eq!(reader.read().unwrap(), None);

    reader.reset().unwrap();
    assert_eq!(reader.read_all().unwrap().len(), 3);
}

#[test]
fn truncated_data() {
    let engine = Engine::default();
    let region = Region::from_paths(vec![rounded_slot(&engine)]);
    let bytes = encode_region(&region).unwrap();

    assert!(matches!(
        decode(&bytes[..bytes.len() - 8]),
        Err(DecodeError::InvalidSize { offset: 0, .. })
    ));

    let mut padded = bytes.clone();
    padded.extend_from_slice(&[0; 5]);
    assert_eq!(
        decode(&padded),
        Err(DecodeError::TruncatedHeader {
            offset: bytes.len(),
            remaining: 5
        })
    );
}
