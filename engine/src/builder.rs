//! Incremental JSON output.

use crate::{error::Result, Error};
use serde::Serialize;

/// A sink that JSON documents are written into piece by piece.
///
/// Structural bytes (`{`, `:`, `,`, ...) go through [`JsonSink::write_byte`];
/// anything that needs encoding goes through [`JsonSink::write_json`].
pub trait JsonSink {
    /// Append a single raw byte.
    fn write_byte(&mut self, byte: u8);

    /// Append the JSON encoding of `value`.
    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()>;
}

/// [`JsonSink`] backed by a growable byte buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonBuilder {
    buf: Vec<u8>,
}

impl JsonBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discard everything written so far, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Take the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Take the written bytes as a string.
    pub fn into_string(self) -> Result<String> {
        String::from_utf8(self.buf).map_err(|e| Error::Encode(e.to_string()))
    }
}

impl JsonSink for JsonBuilder {
    fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let mark = self.buf.len();
        serde_json::to_writer(&mut self.buf, value).map_err(|e| {
            // Drop the half-written value so the buffer ends on a token boundary.
            self.buf.truncate(mark);
            Error::Encode(e.to_string())
        })
    }
}
