//! Builders that serialize tables in the wire layout.
//!
//! These are the producer side of the format: the decoder's own tests and
//! the JSON bridge build their fixtures here, and an in-process producer
//! can use them directly. Layout per table:
//!
//! ```text
//! [2B reserved][2B count][4B size] [count x bucket] [dynamic-data region]
//! ```
//!
//! Keyed bucket: `[2B key][2B type tag][8B inline value or 4B offset]`.
//! Positional bucket: `[8B inline value or 4B offset]`. Dynamic-data
//! entries: `[4B length][length bytes]`, offsets relative to the region
//! start. All numeric fields are native-endian, matching the decoder.

use std::collections::BTreeMap;

use crate::buffer::HEADER_SIZE;
use crate::tag::WireType;

/// One pending keyed value.
#[derive(Debug, Clone)]
enum Slot {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    Map(Vec<u8>),
}

impl Slot {
    fn wire_type(&self) -> WireType {
        match self {
            Slot::Null => WireType::Null,
            Slot::Bool(_) => WireType::Bool,
            Slot::Int(_) => WireType::Int,
            Slot::Long(_) => WireType::Long,
            Slot::Double(_) => WireType::Double,
            Slot::String(_) => WireType::String,
            Slot::Map(_) => WireType::Array,
        }
    }
}

/// Append a slot's 8-byte value field to `out`, spilling variable-length
/// payloads into `dynamic`.
fn write_value_field(out: &mut Vec<u8>, dynamic: &mut Vec<u8>, slot: &Slot) {
    match slot {
        Slot::Null => out.extend_from_slice(&[0u8; 8]),
        Slot::Bool(v) => {
            out.extend_from_slice(&i32::from(*v).to_ne_bytes());
            out.extend_from_slice(&[0u8; 4]);
        }
        Slot::Int(v) => {
            out.extend_from_slice(&v.to_ne_bytes());
            out.extend_from_slice(&[0u8; 4]);
        }
        Slot::Long(v) => out.extend_from_slice(&v.to_ne_bytes()),
        Slot::Double(v) => out.extend_from_slice(&v.to_ne_bytes()),
        Slot::String(s) => write_blob_ref(out, dynamic, s.as_bytes()),
        Slot::Map(bytes) => write_blob_ref(out, dynamic, bytes),
    }
}

/// Append a dynamic-region reference (offset + zero padding) to `out` and
/// the length-prefixed payload to `dynamic`.
fn write_blob_ref(out: &mut Vec<u8>, dynamic: &mut Vec<u8>, payload: &[u8]) {
    let rel_offset = dynamic.len() as u32;
    out.extend_from_slice(&rel_offset.to_ne_bytes());
    out.extend_from_slice(&[0u8; 4]);
    dynamic.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
    dynamic.extend_from_slice(payload);
}

/// Write the 8-byte header: reserved bytes, entry count, total size.
fn write_header(out: &mut Vec<u8>, count: u16) {
    out.extend_from_slice(&[0u8; 2]);
    out.extend_from_slice(&count.to_ne_bytes());
    out.extend_from_slice(&[0u8; 4]); // size, patched in finish
}

/// Patch the header's size field with the final buffer length.
fn finish(mut out: Vec<u8>) -> Vec<u8> {
    let total = out.len() as u32;
    out[4..8].copy_from_slice(&total.to_ne_bytes());
    out
}

/// Builder for the keyed table layout.
///
/// Entries may be put in any order; `build` sorts them by key. Putting the
/// same key twice keeps the last value.
///
/// ```
/// use mapbuffer::{MapBuffer, MapBufferBuilder};
///
/// let mut b = MapBufferBuilder::new();
/// b.put_int(1, 42);
/// b.put_string(5, "hi");
/// let bytes = b.build();
///
/// let map = MapBuffer::new(&bytes).unwrap();
/// assert_eq!(map.get_int(1).unwrap(), 42);
/// ```
#[derive(Debug, Default)]
pub struct MapBufferBuilder {
    entries: Vec<(u16, Slot)>,
}

impl MapBufferBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_null(&mut self, key: u16) {
        self.entries.push((key, Slot::Null));
    }

    pub fn put_bool(&mut self, key: u16, value: bool) {
        self.entries.push((key, Slot::Bool(value)));
    }

    pub fn put_int(&mut self, key: u16, value: i32) {
        self.entries.push((key, Slot::Int(value)));
    }

    pub fn put_long(&mut self, key: u16, value: i64) {
        self.entries.push((key, Slot::Long(value)));
    }

    pub fn put_double(&mut self, key: u16, value: f64) {
        self.entries.push((key, Slot::Double(value)));
    }

    pub fn put_string(&mut self, key: u16, value: &str) {
        self.entries.push((key, Slot::String(value.to_string())));
    }

    /// Attach a nested table, pre-built with another builder (or any bytes
    /// in the wire layout). Tagged ARRAY on the wire.
    pub fn put_map(&mut self, key: u16, table: Vec<u8>) {
        self.entries.push((key, Slot::Map(table)));
    }

    /// Serialize. Buckets come out sorted by key, unique (last write wins),
    /// followed by the dynamic-data region.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        // BTreeMap gives sorted-unique keys; insertion order makes the
        // last write win.
        let slots: BTreeMap<u16, Slot> = self.entries.into_iter().collect();
        let count = slots.len() as u16;

        let mut out = Vec::with_capacity(HEADER_SIZE + slots.len() * 12);
        let mut dynamic = Vec::new();
        write_header(&mut out, count);
        for (key, slot) in &slots {
            out.extend_from_slice(&key.to_ne_bytes());
            out.extend_from_slice(&slot.wire_type().raw().to_ne_bytes());
            write_value_field(&mut out, &mut dynamic, slot);
        }
        out.extend_from_slice(&dynamic);
        finish(out)
    }
}

/// One pending positional value. No null or bool: the dense layout carries
/// only what its consumers address by convention.
#[derive(Debug, Clone)]
enum DenseSlot {
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
}

/// Builder for the dense positional layout. Slot order is push order;
/// the slot's type is whatever convention the consumer reads it with.
#[derive(Debug, Default)]
pub struct CompactArrayBuilder {
    entries: Vec<DenseSlot>,
}

impl CompactArrayBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_int(&mut self, value: i32) {
        self.entries.push(DenseSlot::Int(value));
    }

    pub fn push_long(&mut self, value: i64) {
        self.entries.push(DenseSlot::Long(value));
    }

    pub fn push_double(&mut self, value: f64) {
        self.entries.push(DenseSlot::Double(value));
    }

    pub fn push_string(&mut self, value: &str) {
        self.entries.push(DenseSlot::String(value.to_string()));
    }

    /// Serialize in push order.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let count = self.entries.len() as u16;
        let mut out = Vec::with_capacity(HEADER_SIZE + self.entries.len() * 8);
        let mut dynamic = Vec::new();
        write_header(&mut out, count);
        for entry in &self.entries {
            match entry {
                DenseSlot::Int(v) => {
                    out.extend_from_slice(&v.to_ne_bytes());
                    out.extend_from_slice(&[0u8; 4]);
                }
                DenseSlot::Long(v) => out.extend_from_slice(&v.to_ne_bytes()),
                DenseSlot::Double(v) => out.extend_from_slice(&v.to_ne_bytes()),
                DenseSlot::String(s) => write_blob_ref(&mut out, &mut dynamic, s.as_bytes()),
            }
        }
        out.extend_from_slice(&dynamic);
        finish(out)
    }
}
