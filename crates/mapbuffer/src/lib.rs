//! Zero-copy decoder for compact binary key/value and positional tables.
//!
//! The format moves structured, possibly sparse and nested data across an
//! in-process runtime boundary without deep-copying the payload. Two table
//! shapes share one physical layout (8-byte header, fixed-size buckets,
//! trailing dynamic-data region):
//!
//! - [`MapBuffer`] — keyed, sorted, binary-searchable, type-checked access;
//! - [`CompactArray`] — dense positional slots with no per-entry type tag,
//!   read under a caller-enforced type convention.
//!
//! Decoders borrow the buffer they are given and never mutate or copy it;
//! strings and nested tables are views into the same bytes. All operations
//! are synchronous memory reads, and a constructed decoder holds no mutable
//! state, so sharing one across threads is safe while the producer leaves
//! the buffer alone.
//!
//! # Example
//!
//! ```
//! use mapbuffer::{MapBuffer, MapBufferBuilder};
//!
//! let mut b = MapBufferBuilder::new();
//! b.put_int(1, 42);
//! b.put_string(5, "hi");
//! b.put_bool(9, true);
//! let bytes = b.build();
//!
//! let map = MapBuffer::new(&bytes)?;
//! assert_eq!(map.get_int(1)?, 42);
//! assert_eq!(map.get_string(5)?, "hi");
//! assert_eq!(map.get_int_or(7, -1)?, -1);
//! # Ok::<(), mapbuffer::Error>(())
//! ```

pub mod arr;
pub mod buffer;
pub mod builder;
pub mod entry;
pub mod error;
pub mod json;
pub mod map;
pub mod tag;
pub mod value;

pub use arr::CompactArray;
pub use buffer::{DENSE_BUCKET_SIZE, HEADER_SIZE, KEYED_BUCKET_SIZE, TableReader};
pub use builder::{CompactArrayBuilder, MapBufferBuilder};
pub use entry::{ArrayEntry, ArrayIter, MapEntry, MapIter};
pub use error::{Error, Result};
pub use json::{from_json, to_json};
pub use map::MapBuffer;
pub use tag::WireType;
pub use value::{ArrayView, DynamicValue, TypedValue};
