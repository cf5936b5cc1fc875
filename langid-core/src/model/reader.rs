//! Bounds-checked little-endian reading and writing of model blobs
//!
//! Every length read from the data is compared with what is left before a
//! slice is taken or a buffer is allocated, so a truncated or hostile file
//! produces an error instead of an out-of-bounds access or a huge
//! allocation.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Write};
use thiserror::Error;

/// Low-level decoding failures; callers wrap them into the
/// [`crate::ModelError`] variant of the blob being read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReadError {
    #[error("unexpected end of data while reading {0}")]
    Truncated(&'static str),

    #[error("{what} declares {declared} bytes but only {remaining} remain")]
    Overlong {
        what: &'static str,
        declared: usize,
        remaining: usize,
    },

    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("bad magic number, expected {expected:?}")]
    BadMagic { expected: &'static [u8; 4] },

    #[error("{0} trailing bytes after the last field")]
    TrailingBytes(usize),
}

/// Cursor over a borrowed byte slice
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn expect_magic(&mut self, expected: &'static [u8; 4]) -> Result<(), ReadError> {
        if self.bytes.len() < expected.len() || &self.bytes[..expected.len()] != expected {
            return Err(ReadError::BadMagic { expected });
        }
        self.bytes = &self.bytes[expected.len()..];
        Ok(())
    }

    pub(crate) fn read_u8(&mut self, what: &'static str) -> Result<u8, ReadError> {
        self.bytes.read_u8().map_err(|_| ReadError::Truncated(what))
    }

    pub(crate) fn read_u32(&mut self, what: &'static str) -> Result<u32, ReadError> {
        self.bytes
            .read_u32::<LittleEndian>()
            .map_err(|_| ReadError::Truncated(what))
    }

    /// A `u32` used as a count or size
    pub(crate) fn read_len(&mut self, what: &'static str) -> Result<usize, ReadError> {
        self.read_u32(what).map(|value| value as usize)
    }

    /// Length-prefixed byte blob, borrowed from the input
    pub(crate) fn read_blob(&mut self, what: &'static str) -> Result<&'a [u8], ReadError> {
        let len = self.read_len(what)?;
        self.take(len, what)
    }

    /// Length-prefixed UTF-8 string
    pub(crate) fn read_string(&mut self, what: &'static str) -> Result<String, ReadError> {
        let blob = self.read_blob(what)?;
        std::str::from_utf8(blob)
            .map(str::to_string)
            .map_err(|_| ReadError::InvalidUtf8(what))
    }

    /// `count` little-endian floats
    pub(crate) fn read_f32s(
        &mut self,
        count: usize,
        what: &'static str,
    ) -> Result<Vec<f32>, ReadError> {
        let declared = count.checked_mul(4).ok_or(ReadError::Overlong {
            what,
            declared: usize::MAX,
            remaining: self.remaining(),
        })?;
        let mut raw = self.take(declared, what)?;
        let mut values = vec![0.0f32; count];
        raw.read_f32_into::<LittleEndian>(&mut values)
            .map_err(|_| ReadError::Truncated(what))?;
        Ok(values)
    }

    /// Fail unless every byte has been consumed
    pub(crate) fn finish(self) -> Result<(), ReadError> {
        if self.bytes.is_empty() {
            Ok(())
        } else {
            Err(ReadError::TrailingBytes(self.bytes.len()))
        }
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], ReadError> {
        if len > self.bytes.len() {
            return Err(ReadError::Overlong {
                what,
                declared: len,
                remaining: self.bytes.len(),
            });
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }
}

fn len_to_u32(len: usize, what: &str) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{what} is too large to serialize ({len})"),
        )
    })
}

/// Writing counterparts of [`ByteReader`]
pub(crate) trait WriteModelExt: Write {
    fn write_len(&mut self, len: usize, what: &str) -> io::Result<()> {
        self.write_u32::<LittleEndian>(len_to_u32(len, what)?)
    }

    fn write_blob(&mut self, bytes: &[u8], what: &str) -> io::Result<()> {
        self.write_len(bytes.len(), what)?;
        self.write_all(bytes)
    }

    fn write_string(&mut self, value: &str, what: &str) -> io::Result<()> {
        self.write_blob(value.as_bytes(), what)
    }

    fn write_f32s(&mut self, values: &[f32]) -> io::Result<()> {
        for &value in values {
            self.write_f32::<LittleEndian>(value)?;
        }
        Ok(())
    }
}

impl<W: Write + ?Sized> WriteModelExt for W {}
