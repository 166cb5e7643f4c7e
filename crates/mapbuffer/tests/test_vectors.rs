//! Tests using the `vectors.json` test vectors, plus hand-assembled buffers
//! that pin the byte layout independently of the builder.

use mapbuffer::{
    CompactArray, CompactArrayBuilder, Error, MapBuffer, MapBufferBuilder, TypedValue, WireType,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct TestVectors {
    maps: Vec<MapVector>,
    arrays: Vec<ArrayVector>,
}

#[derive(Deserialize)]
struct MapVector {
    name: String,
    entries: Vec<MapVectorEntry>,
    absent: Vec<u16>,
}

#[derive(Deserialize)]
struct MapVectorEntry {
    key: u16,
    #[serde(flatten)]
    value: VectorValue,
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
enum VectorValue {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
}

#[derive(Deserialize)]
struct ArrayVector {
    name: String,
    ints: Vec<i32>,
}

fn vectors() -> TestVectors {
    serde_json::from_str(include_str!("vectors.json")).expect("vectors.json must parse")
}

fn build_map(entries: &[MapVectorEntry]) -> Vec<u8> {
    let mut builder = MapBufferBuilder::new();
    for entry in entries {
        match &entry.value {
            VectorValue::Null => builder.put_null(entry.key),
            VectorValue::Bool(v) => builder.put_bool(entry.key, *v),
            VectorValue::Int(v) => builder.put_int(entry.key, *v),
            VectorValue::Long(v) => builder.put_long(entry.key, *v),
            VectorValue::Double(v) => builder.put_double(entry.key, *v),
            VectorValue::String(v) => builder.put_string(entry.key, v),
        }
    }
    builder.build()
}

#[test]
fn map_vectors_round_trip() {
    for vector in &vectors().maps {
        let bytes = build_map(&vector.entries);
        // Well-formed fixtures must pass the validating construction too.
        MapBuffer::validated(&bytes).unwrap_or_else(|e| panic!("{}: {e}", vector.name));
        let map = MapBuffer::new(&bytes).unwrap();

        assert_eq!(
            usize::from(map.count()),
            vector.entries.len(),
            "{}",
            vector.name
        );

        for entry in &vector.entries {
            let key = entry.key;
            assert!(map.contains(key), "{}: key {key}", vector.name);
            match &entry.value {
                VectorValue::Null => {
                    assert_eq!(map.entry_type(key).unwrap(), WireType::Null);
                }
                VectorValue::Bool(v) => {
                    assert_eq!(map.entry_type(key).unwrap(), WireType::Bool);
                    assert_eq!(map.get_bool(key).unwrap(), *v);
                }
                VectorValue::Int(v) => {
                    assert_eq!(map.entry_type(key).unwrap(), WireType::Int);
                    assert_eq!(map.get_int(key).unwrap(), *v);
                }
                VectorValue::Long(v) => {
                    assert_eq!(map.entry_type(key).unwrap(), WireType::Long);
                    assert_eq!(map.get_long(key).unwrap(), *v);
                }
                VectorValue::Double(v) => {
                    assert_eq!(map.entry_type(key).unwrap(), WireType::Double);
                    assert!((map.get_double(key).unwrap() - v).abs() < f64::EPSILON);
                }
                VectorValue::String(v) => {
                    assert_eq!(map.entry_type(key).unwrap(), WireType::String);
                    assert_eq!(map.get_string(key).unwrap(), v.as_str());
                }
            }
        }

        for &key in &vector.absent {
            assert!(!map.contains(key), "{}: key {key}", vector.name);
            assert_eq!(
                map.entry_type(key),
                Err(Error::KeyNotFound { key }),
                "{}",
                vector.name
            );
            assert_eq!(map.get_int_or(key, -1).unwrap(), -1, "{}", vector.name);
        }

        // Iteration yields every entry once, in ascending key order.
        let keys: Vec<u16> = map.iter().map(|e| e.key()).collect();
        let mut expected: Vec<u16> = vector.entries.iter().map(|e| e.key).collect();
        expected.sort_unstable();
        assert_eq!(keys, expected, "{}", vector.name);
    }
}

#[test]
fn array_vectors_round_trip() {
    for vector in &vectors().arrays {
        let mut builder = CompactArrayBuilder::new();
        for &v in &vector.ints {
            builder.push_int(v);
        }
        let bytes = builder.build();
        let arr = CompactArray::new(&bytes).unwrap();

        assert_eq!(usize::from(arr.count()), vector.ints.len(), "{}", vector.name);
        for (i, &v) in vector.ints.iter().enumerate() {
            assert_eq!(arr.get_int(i as u16).unwrap(), v, "{}", vector.name);
        }
        let iterated: Vec<i32> = arr.iter().map(|e| e.int_value()).collect();
        assert_eq!(iterated, vector.ints, "{}", vector.name);
    }
}

/// Hand-assemble the keyed scenario table byte by byte, independent of the
/// builder: (1, INT, 42), (5, STRING, "hi"), (9, BOOL, true).
fn scenario_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    // Header: reserved, count = 3, size.
    buf.extend_from_slice(&[0u8; 2]);
    buf.extend_from_slice(&3u16.to_ne_bytes());
    buf.extend_from_slice(&0u32.to_ne_bytes());
    // Bucket 0: key 1, INT, inline 42.
    buf.extend_from_slice(&1u16.to_ne_bytes());
    buf.extend_from_slice(&2u16.to_ne_bytes());
    buf.extend_from_slice(&42i32.to_ne_bytes());
    buf.extend_from_slice(&[0u8; 4]);
    // Bucket 1: key 5, STRING, offset 0 into the dynamic region.
    buf.extend_from_slice(&5u16.to_ne_bytes());
    buf.extend_from_slice(&5u16.to_ne_bytes());
    buf.extend_from_slice(&0u32.to_ne_bytes());
    buf.extend_from_slice(&[0u8; 4]);
    // Bucket 2: key 9, BOOL, 4-byte integer 1.
    buf.extend_from_slice(&9u16.to_ne_bytes());
    buf.extend_from_slice(&1u16.to_ne_bytes());
    buf.extend_from_slice(&1i32.to_ne_bytes());
    buf.extend_from_slice(&[0u8; 4]);
    // Dynamic region: [len 2]["hi"].
    buf.extend_from_slice(&2u32.to_ne_bytes());
    buf.extend_from_slice(b"hi");
    buf
}

#[test]
fn hand_assembled_scenario() {
    let bytes = scenario_bytes();
    let map = MapBuffer::new(&bytes).unwrap();

    assert_eq!(map.get_int(1).unwrap(), 42);
    assert_eq!(map.get_string(5).unwrap(), "hi");
    assert!(map.get_bool(9).unwrap());
    assert!(!map.contains(7));
    assert_eq!(map.get_int_or(7, -1).unwrap(), -1);
    assert!(matches!(
        map.get_string(1),
        Err(Error::TypeMismatch {
            key: 1,
            expected: WireType::String,
            actual: WireType::Int,
        })
    ));
}

#[test]
fn builder_matches_hand_assembled_layout() {
    let mut builder = MapBufferBuilder::new();
    builder.put_int(1, 42);
    builder.put_string(5, "hi");
    builder.put_bool(9, true);
    let built = builder.build();

    let mut manual = scenario_bytes();
    // The builder fills the informational size field; mirror it.
    let manual_len = manual.len() as u32;
    manual[4..8].copy_from_slice(&manual_len.to_ne_bytes());
    assert_eq!(built, manual);
}

#[test]
fn hand_assembled_dense_scenario() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&[0u8; 2]);
    buf.extend_from_slice(&3u16.to_ne_bytes());
    buf.extend_from_slice(&0u32.to_ne_bytes());
    for v in [7i32, 8, 9] {
        buf.extend_from_slice(&v.to_ne_bytes());
        buf.extend_from_slice(&[0u8; 4]);
    }

    let arr = CompactArray::new(&buf).unwrap();
    assert_eq!(arr.get_int(0).unwrap(), 7);
    assert_eq!(arr.get_int(1).unwrap(), 8);
    assert_eq!(arr.get_int(2).unwrap(), 9);
    assert_eq!(arr.iter().count(), 3);
}

#[test]
fn bool_is_one_anything_else_is_false() {
    let mut bytes = scenario_bytes();
    // Key 9's BOOL slot starts at bucket 2's value field.
    let slot = 8 + 2 * 12 + 4;
    bytes[slot..slot + 4].copy_from_slice(&2i32.to_ne_bytes());
    let map = MapBuffer::new(&bytes).unwrap();
    assert!(!map.get_bool(9).unwrap());

    bytes[slot..slot + 4].copy_from_slice(&1i32.to_ne_bytes());
    let map = MapBuffer::new(&bytes).unwrap();
    assert!(map.get_bool(9).unwrap());
}

#[test]
fn truncated_buffers_fail_deterministically() {
    let bytes = scenario_bytes();

    // Short of the header.
    assert!(matches!(
        MapBuffer::new(&bytes[..4]),
        Err(Error::OutOfBounds { .. })
    ));
    // Header intact, table region cut.
    assert!(matches!(
        MapBuffer::new(&bytes[..20]),
        Err(Error::OutOfBounds { .. })
    ));
    // Table intact, dynamic payload cut: construction succeeds, the string
    // read fails.
    let cut = &bytes[..bytes.len() - 1];
    let map = MapBuffer::new(cut).unwrap();
    assert_eq!(map.get_int(1).unwrap(), 42);
    assert!(matches!(
        map.get_string(5),
        Err(Error::OutOfBounds { .. })
    ));
}

#[test]
fn nested_decode_is_self_similar() {
    let mut inner = MapBufferBuilder::new();
    inner.put_int(1, 42);
    inner.put_string(5, "hi");
    let inner_bytes = inner.build();

    let mut outer = MapBufferBuilder::new();
    outer.put_map(2, inner_bytes.clone());
    let outer_bytes = outer.build();

    let map = MapBuffer::new(&outer_bytes).unwrap();
    assert_eq!(map.entry_type(2).unwrap(), WireType::Array);

    // The nested blob is byte-identical to the standalone table...
    assert_eq!(map.get_blob(2).unwrap(), inner_bytes.as_slice());

    // ...and the nested decoder behaves identically to a top-level decoder
    // over the same bytes.
    let nested = map.get_map(2).unwrap();
    let standalone = MapBuffer::new(&inner_bytes).unwrap();
    assert_eq!(nested.count(), standalone.count());
    for probe in 0..8u16 {
        assert_eq!(nested.contains(probe), standalone.contains(probe));
    }
    assert_eq!(nested.get_int(1).unwrap(), standalone.get_int(1).unwrap());
    assert_eq!(
        nested.get_string(5).unwrap(),
        standalone.get_string(5).unwrap()
    );
    assert_eq!(
        nested.entry_type(5).unwrap(),
        standalone.entry_type(5).unwrap()
    );
}

#[test]
fn deep_nesting() {
    // Three levels down via typed reads.
    let mut level2 = MapBufferBuilder::new();
    level2.put_string(0, "deep");
    let mut level1 = MapBufferBuilder::new();
    level1.put_map(4, level2.build());
    let mut level0 = MapBufferBuilder::new();
    level0.put_map(9, level1.build());
    let bytes = level0.build();

    let map = MapBuffer::new(&bytes).unwrap();
    let value = map.get_map(9).unwrap().get_map(4).unwrap();
    assert_eq!(value.get_string(0).unwrap(), "deep");

    match map.entry_at(0).unwrap().typed().unwrap() {
        TypedValue::Map(nested) => assert!(nested.contains(4)),
        other => panic!("expected nested table, got {other:?}"),
    }
}
