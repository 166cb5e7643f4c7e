//! Positional table decoder: dense, index-addressed, untyped.
//!
//! A [`CompactArray`] packs one 8-byte slot per index with **no per-entry
//! type tag**. The caller must already know each slot's type by calling
//! convention (position implies type); the accessors here are *unchecked*
//! in that sense — asking for the wrong type yields garbage, not an error.
//! This is a deliberate zero-overhead trade-off; checked access exists only
//! on the keyed decoder.
//!
//! Slot indices are still validated: reading past `count` fails
//! `OutOfBounds` rather than touching adjacent memory.

use crate::buffer::{DENSE_BUCKET_SIZE, TableReader};
use crate::entry::{ArrayEntry, ArrayIter};
use crate::error::{Error, Result};

/// Zero-copy decoder for the dense positional layout.
#[derive(Clone, Copy)]
pub struct CompactArray<'a> {
    reader: TableReader<'a>,
}

impl<'a> CompactArray<'a> {
    /// Decode a positional table, reading the slot count from the header
    /// once.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` if the buffer cannot hold the header
    /// plus the slot table.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Ok(Self {
            reader: TableReader::new(data, DENSE_BUCKET_SIZE)?,
        })
    }

    /// Decode a positional table with an externally supplied slot count.
    /// The header's count field is not read.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` if the buffer cannot hold the header
    /// plus `count` slots.
    pub fn with_count(data: &'a [u8], count: u16) -> Result<Self> {
        Ok(Self {
            reader: TableReader::with_count(data, DENSE_BUCKET_SIZE, count)?,
        })
    }

    /// Number of slots.
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

    /// Byte offset of slot `index`, or `OutOfBounds` past the end.
    fn slot(&self, index: u16) -> Result<usize> {
        if index >= self.count() {
            return Err(Error::OutOfBounds {
                offset: self.reader.bucket_offset(index),
                len: DENSE_BUCKET_SIZE,
                buffer_len: self.reader.data().len(),
            });
        }
        Ok(self.reader.bucket_offset(index))
    }

    /// Read slot `index` as an i32. Unchecked as to type.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` when `index >= count()`.
    pub fn get_int(&self, index: u16) -> Result<i32> {
        Ok(self.reader.read_i32(self.slot(index)?))
    }

    /// Read slot `index` as an i64. Unchecked as to type.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` when `index >= count()`.
    pub fn get_long(&self, index: u16) -> Result<i64> {
        Ok(self.reader.read_i64(self.slot(index)?))
    }

    /// Read slot `index` as an f64. Unchecked as to type.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` when `index >= count()`.
    pub fn get_double(&self, index: u16) -> Result<f64> {
        Ok(self.reader.read_f64(self.slot(index)?))
    }

    /// Read slot `index` as a string payload in the dynamic-data region.
    /// Unchecked as to type: a slot that does not actually hold an offset
    /// resolves to garbage and fails bounds or UTF-8 checks.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` on a bad index or truncated payload,
    /// `Error::InvalidUtf8` on non-UTF-8 bytes.
    pub fn get_string(&self, index: u16) -> Result<&'a str> {
        let offset = self.reader.read_u32(self.slot(index)?);
        std::str::from_utf8(self.reader.read_blob(offset)?).map_err(|_| Error::InvalidUtf8)
    }

    /// Iterate slots in index order. Restartable: each call starts a fresh
    /// pass.
    #[must_use]
    pub fn iter(&self) -> ArrayIter<'a> {
        ArrayIter::new(self.reader)
    }
}

impl<'a> IntoIterator for CompactArray<'a> {
    type Item = ArrayEntry<'a>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &CompactArray<'a> {
    type Item = ArrayEntry<'a>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Identity equality (backing bytes + count), inherited from the reader.
impl PartialEq for CompactArray<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.reader == other.reader
    }
}

impl std::fmt::Debug for CompactArray<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompactArray")
            .field("count", &self.count())
            .finish()
    }
}
