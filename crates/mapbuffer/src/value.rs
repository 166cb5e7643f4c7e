//! Dynamic-value surface over decoded entries.
//!
//! These adapters let a generic, type-agnostic caller consume a decoded
//! entry without knowing the concrete accessor to call ahead of time. All
//! coercions delegate to the keyed decoder's checked getters, so a wrong
//! coercion fails with the same `TypeMismatch` it would there — never a
//! silent conversion.

use crate::error::{Error, Result};
use crate::map::MapBuffer;
use crate::tag::WireType;

/// A decoded value for pattern matching: the closed union of the seven
/// wire types, borrowing string and nested-table data from the backing
/// buffer.
///
/// ```
/// use mapbuffer::{MapBuffer, MapBufferBuilder, TypedValue};
///
/// let mut b = MapBufferBuilder::new();
/// b.put_int(1, 42);
/// let bytes = b.build();
/// let map = MapBuffer::new(&bytes).unwrap();
///
/// match map.entry_at(0).unwrap().typed().unwrap() {
///     TypedValue::Int(n) => assert_eq!(n, 42),
///     _ => panic!("expected int"),
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub enum TypedValue<'a> {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 64-bit floating point number.
    Double(f64),
    /// UTF-8 string (zero-copy reference).
    Str(&'a str),
    /// Nested keyed table.
    Map(MapBuffer<'a>),
}

/// One entry viewed as an "any value", bound to `(table, key)`.
///
/// Constructed via [`MapBuffer::dynamic`]. Coercion accessors delegate to
/// the table's checked getters.
#[derive(Clone, Copy, Debug)]
pub struct DynamicValue<'a> {
    map: MapBuffer<'a>,
    key: u16,
}

impl<'a> DynamicValue<'a> {
    #[inline]
    pub(crate) fn new(map: MapBuffer<'a>, key: u16) -> Self {
        Self { map, key }
    }

    /// The key this value is bound to.
    #[inline]
    #[must_use]
    pub fn key(&self) -> u16 {
        self.key
    }

    /// Whether the entry is null-typed.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if the key is absent.
    pub fn is_null(&self) -> Result<bool> {
        Ok(self.map.entry_type(self.key)? == WireType::Null)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_bool`] does.
    pub fn as_bool(&self) -> Result<bool> {
        self.map.get_bool(self.key)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_int`] does.
    pub fn as_int(&self) -> Result<i32> {
        self.map.get_int(self.key)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_long`] does.
    pub fn as_long(&self) -> Result<i64> {
        self.map.get_long(self.key)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_double`] does.
    pub fn as_double(&self) -> Result<f64> {
        self.map.get_double(self.key)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_string`] does.
    pub fn as_string(&self) -> Result<&'a str> {
        self.map.get_string(self.key)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_map`] does.
    pub fn as_map(&self) -> Result<MapBuffer<'a>> {
        self.map.get_map(self.key)
    }

    /// Coerce to an index-addressable sequence view over a nested table.
    ///
    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_map`] does.
    pub fn as_array(&self) -> Result<ArrayView<'a>> {
        Ok(ArrayView::new(self.map.get_map(self.key)?))
    }

    /// Raw payload bytes, uninterpreted.
    ///
    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_blob`] does.
    pub fn as_raw_bytes(&self) -> Result<&'a [u8]> {
        self.map.get_blob(self.key)
    }

    /// Disposal hook, kept for interface symmetry with pooled dynamic-value
    /// implementations. Decoded views hold no resources; this releases
    /// nothing.
    pub fn dispose(&self) {}
}

/// A nested keyed table viewed as an ordered, index-addressable sequence.
///
/// Sequences on the wire are keyed tables whose keys are the positions
/// `0..count-1`; this adapter treats the key space as indices. Map-valued
/// and raw-byte access through it are intentionally unsupported and fail
/// fast — a caller must not mistake "unsupported" for "empty".
#[derive(Clone, Copy, Debug)]
pub struct ArrayView<'a> {
    map: MapBuffer<'a>,
}

impl<'a> ArrayView<'a> {
    /// Wrap a decoded table in the sequence view.
    #[inline]
    #[must_use]
    pub fn new(map: MapBuffer<'a>) -> Self {
        Self { map }
    }

    /// Number of positions.
    #[inline]
    #[must_use]
    pub fn size(&self) -> u16 {
        self.map.count()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Wire type at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if the position is not populated.
    pub fn entry_type(&self, index: u16) -> Result<WireType> {
        self.map.entry_type(index)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_bool`] does.
    pub fn get_bool(&self, index: u16) -> Result<bool> {
        self.map.get_bool(index)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_int`] does.
    pub fn get_int(&self, index: u16) -> Result<i32> {
        self.map.get_int(index)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_long`] does.
    pub fn get_long(&self, index: u16) -> Result<i64> {
        self.map.get_long(index)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_double`] does.
    pub fn get_double(&self, index: u16) -> Result<f64> {
        self.map.get_double(index)
    }

    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_string`] does.
    pub fn get_string(&self, index: u16) -> Result<&'a str> {
        self.map.get_string(index)
    }

    /// Descend into a nested sequence at `index`.
    ///
    /// # Errors
    ///
    /// Fails exactly as [`MapBuffer::get_map`] does.
    pub fn get_array(&self, index: u16) -> Result<ArrayView<'a>> {
        Ok(ArrayView::new(self.map.get_map(index)?))
    }

    /// Map-valued access through the sequence view.
    ///
    /// # Errors
    ///
    /// Always returns `Error::Unsupported`.
    pub fn get_map(&self, index: u16) -> Result<MapBuffer<'a>> {
        let _ = index;
        Err(Error::Unsupported("map access through an array view"))
    }

    /// Raw payload access through the sequence view.
    ///
    /// # Errors
    ///
    /// Always returns `Error::Unsupported`.
    pub fn get_blob(&self, index: u16) -> Result<&'a [u8]> {
        let _ = index;
        Err(Error::Unsupported("raw byte access through an array view"))
    }
}
