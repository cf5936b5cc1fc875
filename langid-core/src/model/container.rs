//! Outer model container
//!
//! ```text
//! "LIDM"
//! u32 format version (1)
//! string task spec (TOML)
//! u32 file count
//!     string file name, blob contents
//! ```
//!
//! File contents are borrowed from the underlying bytes; nothing is copied
//! while parsing.

use super::reader::{ByteReader, ReadError, WriteModelExt};
use super::task_spec::TaskSpec;
use crate::error::{ModelError, Result};
use std::io::{self, Write};

/// Magic number of a model container
pub const CONTAINER_MAGIC: &[u8; 4] = b"LIDM";

/// Supported container format version
pub const CONTAINER_VERSION: u32 = 1;

/// Parsed view of a container
#[derive(Debug)]
pub struct ModelContainer<'a> {
    task_spec: TaskSpec,
    files: Vec<(String, &'a [u8])>,
}

impl<'a> ModelContainer<'a> {
    /// Parse the container header, task spec and file table
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let malformed = |e: ReadError| ModelError::MalformedContainer(e.to_string());
        let mut reader = ByteReader::new(bytes);
        reader.expect_magic(CONTAINER_MAGIC).map_err(malformed)?;

        let version = reader.read_u32("format version").map_err(malformed)?;
        if version != CONTAINER_VERSION {
            return Err(ModelError::MalformedContainer(format!(
                "unsupported format version {version}"
            )));
        }

        let spec_text = reader.read_string("task spec").map_err(malformed)?;
        let task_spec = TaskSpec::from_toml(&spec_text)?;

        let count = reader.read_len("file count").map_err(malformed)?;
        let mut files: Vec<(String, &'a [u8])> = Vec::new();
        for _ in 0..count {
            let name = reader.read_string("file name").map_err(malformed)?;
            let contents = reader.read_blob("file contents").map_err(malformed)?;
            if files.iter().any(|(existing, _)| *existing == name) {
                return Err(ModelError::MalformedContainer(format!(
                    "duplicate file '{name}'"
                )));
            }
            files.push((name, contents));
        }
        reader.finish().map_err(malformed)?;

        Ok(Self { task_spec, files })
    }

    /// Configuration stored in the container
    pub fn task_spec(&self) -> &TaskSpec {
        &self.task_spec
    }

    /// Contents of a file by name
    pub fn file(&self, name: &str) -> Option<&'a [u8]> {
        self.files
            .iter()
            .find(|(file, _)| file == name)
            .map(|(_, contents)| *contents)
    }

    /// Names of all files in container order
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }

    /// Bytes of a named input, which must consist of exactly one file
    pub fn bytes_for_input(&self, name: &str) -> Result<&'a [u8]> {
        let input = self
            .task_spec
            .input(name)
            .ok_or_else(|| ModelError::MissingInput {
                name: name.to_string(),
            })?;
        let [part] = input.parts.as_slice() else {
            return Err(ModelError::WrongPartCount {
                name: name.to_string(),
                parts: input.parts.len(),
            });
        };
        self.file(part).ok_or_else(|| ModelError::MissingFile {
            name: name.to_string(),
            file: part.clone(),
        })
    }
}

/// Writes model containers
///
/// ```
/// use langid_core::{ModelContainerBuilder, TaskSpec};
///
/// let bytes = ModelContainerBuilder::new(TaskSpec::default())
///     .file("notes.txt", b"hello".to_vec())
///     .build()
///     .unwrap();
/// assert_eq!(&bytes[..4], b"LIDM");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelContainerBuilder {
    task_spec: TaskSpec,
    files: Vec<(String, Vec<u8>)>,
}

impl ModelContainerBuilder {
    /// Start a container with the given configuration
    pub fn new(task_spec: TaskSpec) -> Self {
        Self {
            task_spec,
            files: Vec::new(),
        }
    }

    /// Add a file
    pub fn file(mut self, name: impl Into<String>, contents: Vec<u8>) -> Self {
        self.files.push((name.into(), contents));
        self
    }

    /// Write the container to `wtr`
    pub fn write_to<W: Write>(&self, mut wtr: W) -> io::Result<()> {
        let spec = self
            .task_spec
            .to_toml()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        wtr.write_all(CONTAINER_MAGIC)?;
        wtr.write_len(CONTAINER_VERSION as usize, "format version")?;
        wtr.write_string(&spec, "task spec")?;
        wtr.write_len(self.files.len(), "file count")?;
        for (name, contents) in &self.files {
            wtr.write_string(name, "file name")?;
            wtr.write_blob(contents, "file contents")?;
        }
        Ok(())
    }

    /// Serialize the container into a new buffer
    pub fn build(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }
}
