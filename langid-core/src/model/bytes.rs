//! Read-only model bytes, memory-mapped when they come from a file

use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::ops::Deref;
use std::path::Path;

/// Bytes backing a loaded model
///
/// Borrowed views handed out while parsing stay valid for as long as this
/// value lives.
#[derive(Debug)]
pub enum ModelBytes {
    /// Read-only mapping of a file
    Mapped(Mmap),
    /// Bytes owned in memory
    Owned(Vec<u8>),
}

impl ModelBytes {
    /// Map the file at `path`
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_file(&file)
    }

    /// Map an already opened file; the handle may be closed afterwards
    pub fn from_file(file: &File) -> io::Result<Self> {
        // Zero-length mappings are rejected on some platforms.
        if file.metadata()?.len() == 0 {
            return Ok(ModelBytes::Owned(Vec::new()));
        }
        // SAFETY: the mapping is read-only. Model files are not expected to
        // be modified while a classifier is alive.
        let mmap = unsafe { Mmap::map(file)? };
        Ok(ModelBytes::Mapped(mmap))
    }
}

impl Deref for ModelBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            ModelBytes::Mapped(mmap) => &mmap[..],
            ModelBytes::Owned(bytes) => bytes.as_slice(),
        }
    }
}

impl AsRef<[u8]> for ModelBytes {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl From<Vec<u8>> for ModelBytes {
    fn from(bytes: Vec<u8>) -> Self {
        ModelBytes::Owned(bytes)
    }
}
