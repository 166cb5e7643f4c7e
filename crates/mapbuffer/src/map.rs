//! Keyed table decoder: sorted keys, binary search, type-checked access.
//!
//! A [`MapBuffer`] is a sparse `u16 -> value` table whose buckets are sorted
//! by key. Lookups binary-search the bucket keys; typed getters then compare
//! the entry's wire tag against the requested type and fail with
//! `TypeMismatch` instead of coercing.
//!
//! Lookup operations speak in **bucket indices**, never byte offsets:
//! [`MapBuffer::find_index`] returns an index a caller can cache and replay
//! through [`MapBuffer::entry_at`].

use crate::buffer::{KEYED_BUCKET_SIZE, TableReader};
use crate::entry::{MapEntry, MapIter};
use crate::error::{Error, Result};
use crate::tag::WireType;
use crate::value::DynamicValue;

/// Zero-copy decoder for the keyed table layout.
///
/// Cheap to copy (a slice reference plus the parsed count); all reads go
/// back to the backing bytes. Holds no interior mutability, so sharing one
/// instance across threads for concurrent reads is safe as long as the
/// producer does not mutate the buffer.
#[derive(Clone, Copy)]
pub struct MapBuffer<'a> {
    reader: TableReader<'a>,
}

impl<'a> MapBuffer<'a> {
    /// Decode a keyed table, trusting the producer's invariants (unique
    /// ascending keys, in-range tags, resolvable offsets).
    ///
    /// The entry count is read from the header once, here. Only the header
    /// and table-region extent are checked; use [`MapBuffer::validated`]
    /// for untrusted input.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` if the buffer cannot hold the header
    /// plus the bucket table.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Ok(Self {
            reader: TableReader::new(data, KEYED_BUCKET_SIZE)?,
        })
    }

    /// Decode a keyed table with an externally supplied entry count. The
    /// header's count field is not read.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` if the buffer cannot hold the header
    /// plus `count` buckets.
    pub fn with_count(data: &'a [u8], count: u16) -> Result<Self> {
        Ok(Self {
            reader: TableReader::with_count(data, KEYED_BUCKET_SIZE, count)?,
        })
    }

    /// Decode a keyed table from untrusted bytes, checking the producer's
    /// invariants up front: every tag in range, keys strictly ascending,
    /// every offset-carrying entry's payload resolvable.
    ///
    /// After this succeeds, binary search and blob reads are trustworthy.
    /// Nested tables are not descended into; validate them at their own
    /// decode site.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds`, `Error::InvalidTypeTag`, or
    /// `Error::UnsortedKeys`.
    pub fn validated(data: &'a [u8]) -> Result<Self> {
        let buf = Self::new(data)?;
        let mut prev_key: Option<u16> = None;
        for index in 0..buf.count() {
            let entry = MapEntry::new(buf.reader, index);
            let key = entry.key();
            if let Some(prev) = prev_key {
                if key <= prev {
                    return Err(Error::UnsortedKeys { index });
                }
            }
            prev_key = Some(key);
            match entry.wire_type()? {
                WireType::String | WireType::Array => {
                    entry.blob_value()?;
                }
                _ => {}
            }
        }
        Ok(buf)
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn count(&self) -> u16 {
        self.reader.count()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The backing bytes of this table.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.reader.data()
    }

    /// Whether the table holds `key`. O(log N).
    #[must_use]
    pub fn contains(&self, key: u16) -> bool {
        self.find_index(key).is_some()
    }

    /// Binary search for `key`, returning its bucket index.
    ///
    /// The index stays valid for the decoder's lifetime and can be replayed
    /// through [`MapBuffer::entry_at`] to skip the search. Undefined results
    /// if the producer violated the sorted-unique-keys invariant (see
    /// [`MapBuffer::validated`]).
    #[must_use]
    pub fn find_index(&self, key: u16) -> Option<u16> {
        let mut lo = 0u32;
        let mut hi = u32::from(self.count());
        while lo < hi {
            let mid = (lo + hi) / 2;
            let mid_key = self.reader.read_u16(self.reader.bucket_offset(mid as u16));
            if mid_key < key {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo < u32::from(self.count()) {
            let found = lo as u16;
            if self.reader.read_u16(self.reader.bucket_offset(found)) == key {
                return Some(found);
            }
        }
        None
    }

    /// O(1) cursor construction from a known bucket index, bypassing the
    /// search.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` when `index >= count()`.
    pub fn entry_at(&self, index: u16) -> Result<MapEntry<'a>> {
        if index >= self.count() {
            return Err(Error::OutOfBounds {
                offset: self.reader.bucket_offset(index),
                len: KEYED_BUCKET_SIZE,
                buffer_len: self.reader.data().len(),
            });
        }
        Ok(MapEntry::new(self.reader, index))
    }

    /// Wire type of the entry at `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if the key is absent — checked before
    /// any read — and `Error::InvalidTypeTag` on a corrupt tag.
    pub fn entry_type(&self, key: u16) -> Result<WireType> {
        let index = self.find_index(key).ok_or(Error::KeyNotFound { key })?;
        MapEntry::new(self.reader, index).wire_type()
    }

    /// Look up `key` and require its tag to match `expected`.
    fn lookup(&self, key: u16, expected: WireType) -> Result<MapEntry<'a>> {
        let index = self.find_index(key).ok_or(Error::KeyNotFound { key })?;
        let entry = MapEntry::new(self.reader, index);
        let actual = entry.wire_type()?;
        if actual != expected {
            return Err(Error::TypeMismatch {
                key,
                expected,
                actual,
            });
        }
        Ok(entry)
    }

    // --- Strict typed access ---

    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` or `Error::TypeMismatch`.
    pub fn get_bool(&self, key: u16) -> Result<bool> {
        Ok(self.lookup(key, WireType::Bool)?.bool_value())
    }

    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` or `Error::TypeMismatch`.
    pub fn get_int(&self, key: u16) -> Result<i32> {
        Ok(self.lookup(key, WireType::Int)?.int_value())
    }

    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` or `Error::TypeMismatch`.
    pub fn get_long(&self, key: u16) -> Result<i64> {
        Ok(self.lookup(key, WireType::Long)?.long_value())
    }

    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` or `Error::TypeMismatch`.
    pub fn get_double(&self, key: u16) -> Result<f64> {
        Ok(self.lookup(key, WireType::Double)?.double_value())
    }

    /// Get a string value, borrowed from the backing bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound`, `Error::TypeMismatch`,
    /// `Error::OutOfBounds` on a truncated payload, or `Error::InvalidUtf8`.
    pub fn get_string(&self, key: u16) -> Result<&'a str> {
        self.lookup(key, WireType::String)?.string_value()
    }

    /// Decode a nested table. The child decoder borrows the same backing
    /// bytes and is fully independent of its parent.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound`, `Error::TypeMismatch`, or
    /// `Error::OutOfBounds`.
    pub fn get_map(&self, key: u16) -> Result<MapBuffer<'a>> {
        self.lookup(key, WireType::Array)?.map_value()
    }

    /// Raw payload bytes of a string or nested-table entry, without
    /// interpretation.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound`; `Error::TypeMismatch` for inline-kind
    /// entries (which have no payload); `Error::OutOfBounds` on truncation.
    pub fn get_blob(&self, key: u16) -> Result<&'a [u8]> {
        let index = self.find_index(key).ok_or(Error::KeyNotFound { key })?;
        let entry = MapEntry::new(self.reader, index);
        let actual = entry.wire_type()?;
        match actual {
            WireType::String | WireType::Array => entry.blob_value(),
            _ => Err(Error::TypeMismatch {
                key,
                expected: WireType::String,
                actual,
            }),
        }
    }

    /// List-of-nested-table retrieval. Declared for interface completeness
    /// but not implemented; always fails rather than returning an empty
    /// list a caller could mistake for "no data".
    ///
    /// # Errors
    ///
    /// Always returns `Error::Unsupported`.
    pub fn get_map_list(&self, key: u16) -> Result<Vec<MapBuffer<'a>>> {
        let _ = key;
        Err(Error::Unsupported("list-of-table retrieval"))
    }

    // --- Default-value access ---
    //
    // Absence is soft: `KeyNotFound` becomes the default. A type mismatch
    // is still a hard failure even with a default in hand; a producer
    // writing the wrong type must not be masked.

    fn soften<T>(result: Result<T>, default: T) -> Result<T> {
        match result {
            Err(Error::KeyNotFound { .. }) => Ok(default),
            other => other,
        }
    }

    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if the key exists with another type.
    pub fn get_bool_or(&self, key: u16, default: bool) -> Result<bool> {
        Self::soften(self.get_bool(key), default)
    }

    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if the key exists with another type.
    pub fn get_int_or(&self, key: u16, default: i32) -> Result<i32> {
        Self::soften(self.get_int(key), default)
    }

    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if the key exists with another type.
    pub fn get_long_or(&self, key: u16, default: i64) -> Result<i64> {
        Self::soften(self.get_long(key), default)
    }

    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if the key exists with another type.
    pub fn get_double_or(&self, key: u16, default: f64) -> Result<f64> {
        Self::soften(self.get_double(key), default)
    }

    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if the key exists with another type.
    pub fn get_string_or(&self, key: u16, default: &'a str) -> Result<&'a str> {
        Self::soften(self.get_string(key), default)
    }

    /// View the entry at `key` through the dynamic-value surface.
    #[must_use]
    pub fn dynamic(&self, key: u16) -> DynamicValue<'a> {
        DynamicValue::new(*self, key)
    }

    /// Iterate entries in ascending key order. Restartable: each call
    /// starts a fresh pass.
    #[must_use]
    pub fn iter(&self) -> MapIter<'a> {
        MapIter::new(self.reader)
    }
}

impl<'a> IntoIterator for MapBuffer<'a> {
    type Item = MapEntry<'a>;
    type IntoIter = MapIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &MapBuffer<'a> {
    type Item = MapEntry<'a>;
    type IntoIter = MapIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Identity equality (backing bytes + count), inherited from the reader.
impl PartialEq for MapBuffer<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.reader == other.reader
    }
}

impl std::fmt::Debug for MapBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapBuffer")
            .field("count", &self.count())
            .finish()
    }
}
