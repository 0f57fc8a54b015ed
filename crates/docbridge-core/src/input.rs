//! # Input Acquisition
//!
//! Normalizes the three ways a caller can hand over a document (a named
//! file, a streaming reader, an in-memory buffer) into one byte buffer.

use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{BridgeError, Result};

/// Declared syntax of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    /// JSON text.
    Json,
    /// YAML text.
    Yaml,
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

impl FromStr for DataFormat {
    type Err = BridgeError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(BridgeError::UnsupportedFormat(tag.to_string())),
        }
    }
}

/// Where the document bytes come from.
///
/// `Reader` and `Bytes` carry an `Option` so that a caller which selected
/// the source but has nothing to supply is reported as a process error
/// at read time rather than silently validating an empty document.
pub enum InputSource<'a> {
    /// A file on disk, read in full.
    File(PathBuf),
    /// A readable stream, drained to end of stream.
    Reader(Option<Box<dyn Read + 'a>>),
    /// An in-memory buffer, used as is.
    Bytes(Option<Cow<'a, [u8]>>),
}

impl fmt::Debug for InputSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Reader(reader) => f
                .debug_tuple("Reader")
                .field(&reader.as_ref().map(|_| "<reader>"))
                .finish(),
            Self::Bytes(bytes) => f
                .debug_tuple("Bytes")
                .field(&bytes.as_ref().map(|b| b.len()))
                .finish(),
        }
    }
}

/// One document to validate: its source, declared format and label.
#[derive(Debug)]
pub struct ValidationInput<'a> {
    /// Where the bytes come from.
    pub source: InputSource<'a>,
    /// How the bytes are to be parsed.
    pub format: DataFormat,
    /// Label echoed back in the result. Not used to locate the data.
    pub name: String,
}

impl<'a> ValidationInput<'a> {
    /// A document read from `path`, labelled with the path itself.
    pub fn file(path: impl Into<PathBuf>, format: DataFormat) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self {
            source: InputSource::File(path),
            format,
            name,
        }
    }

    /// A document drained from `reader`.
    pub fn reader(reader: impl Read + 'a, format: DataFormat) -> Self {
        Self {
            source: InputSource::Reader(Some(Box::new(reader))),
            format,
            name: String::new(),
        }
    }

    /// A document held in memory.
    pub fn bytes(data: impl Into<Cow<'a, [u8]>>, format: DataFormat) -> Self {
        Self {
            source: InputSource::Bytes(Some(data.into())),
            format,
            name: String::new(),
        }
    }

    /// Replace the label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Produce the full document bytes for `source`.
///
/// Borrowed buffers are passed through without copying.
pub fn read_input(source: InputSource<'_>) -> Result<Cow<'_, [u8]>> {
    match source {
        InputSource::File(path) => match std::fs::read(&path) {
            Ok(data) => Ok(Cow::Owned(data)),
            Err(source) => Err(BridgeError::ReadFile { path, source }),
        },
        InputSource::Reader(None) => Err(BridgeError::MissingReader),
        InputSource::Reader(Some(mut reader)) => {
            let mut data = Vec::new();
            reader
                .read_to_end(&mut data)
                .map_err(|source| BridgeError::ReadStream { source })?;
            Ok(Cow::Owned(data))
        }
        InputSource::Bytes(None) => Err(BridgeError::MissingData),
        InputSource::Bytes(Some(data)) => Ok(data),
    }
}
