//! Error types for table decoding.

use std::fmt;

use crate::tag::WireType;

/// Error type for table operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // Lookup errors
    /// Key not found in a keyed table (strict access).
    KeyNotFound { key: u16 },
    /// Entry exists but its encoded type differs from the requested one.
    TypeMismatch {
        key: u16,
        expected: WireType,
        actual: WireType,
    },

    // Buffer errors
    /// A computed read of `len` bytes at `offset` exceeds the buffer extent.
    /// Signals a truncated or corrupt buffer; reads never silently truncate.
    OutOfBounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    // Validation errors
    /// Type tag outside the 0-6 wire range.
    InvalidTypeTag(u16),
    /// Keys are not strictly ascending at the given bucket index.
    UnsortedKeys { index: u16 },

    // Value errors
    /// String payload is not valid UTF-8.
    InvalidUtf8,

    /// Accessor is intentionally not implemented.
    Unsupported(&'static str),

    // JSON errors
    /// Failed to parse JSON input.
    JsonParse(String),
    /// Failed to serialize to JSON.
    JsonSerialize(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound { key } => write!(f, "key {key} not found"),
            Error::TypeMismatch {
                key,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "key {key}: expected {}, found {}",
                    expected.name(),
                    actual.name()
                )
            }
            Error::OutOfBounds {
                offset,
                len,
                buffer_len,
            } => {
                write!(
                    f,
                    "read of {len} bytes at offset {offset} out of bounds (buffer len={buffer_len})"
                )
            }
            Error::InvalidTypeTag(raw) => write!(f, "invalid type tag: {raw}"),
            Error::UnsortedKeys { index } => {
                write!(f, "keys not strictly ascending at bucket {index}")
            }
            Error::InvalidUtf8 => write!(f, "invalid UTF-8 in string value"),
            Error::Unsupported(what) => write!(f, "unsupported operation: {what}"),
            Error::JsonParse(msg) => write!(f, "JSON parse error: {msg}"),
            Error::JsonSerialize(msg) => write!(f, "JSON serialize error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, Error>;
