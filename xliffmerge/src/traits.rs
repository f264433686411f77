//! Traits for reading and writing the file formats handled by xliffmerge.

use std::{
    fs::File,
    io::{BufRead, Cursor, Read, Write},
    path::Path,
};

use crate::error::Error;

/// A trait for parsing one file into an in-memory model.
///
/// # Example
///
/// ```rust,no_run
/// use xliffmerge::traits::Parser;
/// let catalog = xliffmerge::formats::po::Catalog::read_from("fr.po")?;
/// println!("{} messages", catalog.len());
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// Input is decoded BOM-aware, so UTF-16 files written by Windows
    /// tooling load the same as UTF-8 ones.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }
}

/// A trait for writing an in-memory model back out.
pub trait Serializer {
    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Render into an owned string.
    fn to_string_pretty(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        String::from_utf8(out).map_err(|e| Error::DataMismatch(e.to_string()))
    }
}
