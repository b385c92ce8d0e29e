//! # Wire Primitives
//!
//! Primitive encoding shared by every value that travels inside a parcel.
//!
//! All integers are big-endian. Byte arrays and strings carry an `i32`
//! length prefix. Optional values carry a single presence tag byte
//! (`0` absent, `1` present) ahead of their payload, so absence is encoded
//! explicitly rather than inferred.
//!
//! ```text
//! bool      [0|1]
//! i32/i64   [big-endian]
//! bytes     [len: i32] [data(len)]
//! option<T> [tag: 0]  |  [tag: 1] [T]
//! ```
//!
//! The reader checks the remaining input before every read and validates
//! lengths against [`DecodeLimits`] before allocating.

use crate::error::{constants, ParcelError, Result};
use bytes::{Buf, BufMut};

/// Default maximum number of entries in any encoded map
pub const DEFAULT_MAX_MAP_ENTRIES: usize = 4096;

/// Default maximum length of a single byte array or string (1 MiB)
pub const DEFAULT_MAX_FIELD_LEN: usize = 1024 * 1024;

const TAG_ABSENT: u8 = 0;
const TAG_PRESENT: u8 = 1;

/// Bounds applied while decoding untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum entries in a crypto data or passphrase map
    pub max_map_entries: usize,
    /// Maximum length of a single byte array or string
    pub max_field_len: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_map_entries: DEFAULT_MAX_MAP_ENTRIES,
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }
}

/// Values that know how to write themselves to and read themselves from a parcel
pub trait WireFormat: Sized {
    /// Append the encoded value to the writer
    fn write_to(&self, writer: &mut ParcelWriter) -> Result<()>;

    /// Read one value from the reader
    fn read_from(reader: &mut ParcelReader<'_>) -> Result<Self>;
}

/// Append-only encoder over a growable buffer
#[derive(Debug, Default)]
pub struct ParcelWriter {
    buf: Vec<u8>,
}

impl ParcelWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.put_u64(value);
    }

    /// Write a count or length as a non-negative `i32`
    ///
    /// # Errors
    /// Returns `ParcelError::EncodeError` if `len` does not fit in an `i32`
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| ParcelError::EncodeError(constants::ERR_FIELD_TOO_LARGE.into()))?;
        self.write_i32(len);
        Ok(())
    }

    /// Write a length-prefixed byte array
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.write_len(data.len())?;
        self.buf.put_slice(data);
        Ok(())
    }

    /// Write a length-prefixed UTF-8 string
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Write a presence tag followed by the value, if any
    pub fn write_optional<T: WireFormat>(&mut self, value: Option<&T>) -> Result<()> {
        match value {
            Some(inner) => {
                self.write_u8(TAG_PRESENT);
                inner.write_to(self)
            }
            None => {
                self.write_u8(TAG_ABSENT);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor-based decoder over a borrowed byte slice
#[derive(Debug)]
pub struct ParcelReader<'a> {
    buf: &'a [u8],
    limits: DecodeLimits,
}

impl<'a> ParcelReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_limits(buf, DecodeLimits::default())
    }

    pub fn with_limits(buf: &'a [u8], limits: DecodeLimits) -> Self {
        Self { buf, limits }
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn require(&self, needed: usize, field: &'static str) -> Result<()> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(ParcelError::Truncated {
                field,
                needed,
                remaining,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        self.require(1, field)?;
        Ok(self.buf.get_u8())
    }

    /// Read a boolean byte. Anything other than 0 or 1 is rejected.
    pub fn read_bool(&mut self, field: &'static str) -> Result<bool> {
        match self.read_u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(ParcelError::InvalidTag { field, value }),
        }
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        self.require(2, field)?;
        Ok(self.buf.get_u16())
    }

    pub fn read_i32(&mut self, field: &'static str) -> Result<i32> {
        self.require(4, field)?;
        Ok(self.buf.get_i32())
    }

    pub fn read_i64(&mut self, field: &'static str) -> Result<i64> {
        self.require(8, field)?;
        Ok(self.buf.get_i64())
    }

    pub fn read_u64(&mut self, field: &'static str) -> Result<u64> {
        self.require(8, field)?;
        Ok(self.buf.get_u64())
    }

    /// Read a map entry count, rejecting negatives and counts above the limit
    pub fn read_count(&mut self, field: &'static str) -> Result<usize> {
        let raw = self.read_i32(field)?;
        let count = usize::try_from(raw).map_err(|_| ParcelError::InvalidLength {
            field,
            value: i64::from(raw),
        })?;
        if count > self.limits.max_map_entries {
            return Err(ParcelError::LimitExceeded {
                field,
                value: count,
                limit: self.limits.max_map_entries,
            });
        }
        Ok(count)
    }

    /// Read a length-prefixed byte array
    pub fn read_bytes(&mut self, field: &'static str) -> Result<Vec<u8>> {
        let raw = self.read_i32(field)?;
        let len = usize::try_from(raw).map_err(|_| ParcelError::InvalidLength {
            field,
            value: i64::from(raw),
        })?;
        if len > self.limits.max_field_len {
            return Err(ParcelError::LimitExceeded {
                field,
                value: len,
                limit: self.limits.max_field_len,
            });
        }
        self.require(len, field)?;
        let mut data = vec![0u8; len];
        self.buf.copy_to_slice(&mut data);
        Ok(data)
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self, field: &'static str) -> Result<String> {
        let data = self.read_bytes(field)?;
        String::from_utf8(data).map_err(|_| ParcelError::InvalidUtf8(field))
    }

    /// Read a presence tag and, if present, the value behind it
    pub fn read_optional<T: WireFormat>(&mut self, field: &'static str) -> Result<Option<T>> {
        match self.read_u8(field)? {
            TAG_ABSENT => Ok(None),
            TAG_PRESENT => T::read_from(self).map(Some),
            value => Err(ParcelError::InvalidTag { field, value }),
        }
    }

    /// Fail unless every byte of the input has been consumed
    pub fn finish(self) -> Result<()> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(ParcelError::TrailingBytes(n)),
        }
    }
}
