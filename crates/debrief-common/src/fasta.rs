//! FASTA reading and writing
//!
//! Parsing goes through `needletail`; records are converted to owned
//! [`FastaRecord`]s with the sequence lines joined.

use needletail::errors::{ParseError, ParseErrorKind};
use needletail::parser::{write_fasta, FastxReader, LineEnding};
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{DebriefError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Header line without the leading `>`
    pub header: String,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// Record label: the first whitespace-delimited token of the header
    pub fn id(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }
}

impl From<ParseError> for DebriefError {
    fn from(err: ParseError) -> Self {
        DebriefError::Fasta(err.to_string())
    }
}

/// Parse all records from any reader
///
/// Empty input has no records. Anything that is not FASTA (or FASTQ) from
/// the first byte on is rejected.
pub fn parse_reader<R: Read + Send>(reader: R) -> Result<Vec<FastaRecord>> {
    match needletail::parse_fastx_reader(reader) {
        Ok(reader) => collect_records(reader),
        Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

pub fn parse_str(text: &str) -> Result<Vec<FastaRecord>> {
    parse_reader(text.as_bytes())
}

pub fn parse_file(path: &Path) -> Result<Vec<FastaRecord>> {
    // Open first so a missing file stays an IO error.
    let file = std::fs::File::open(path)?;
    parse_reader(file)
}

fn collect_records(mut reader: Box<dyn FastxReader + '_>) -> Result<Vec<FastaRecord>> {
    let mut records = Vec::new();

    while let Some(record) = reader.next() {
        let record = record?;

        let header = String::from_utf8_lossy(record.id()).trim().to_string();
        if header.is_empty() {
            return Err(DebriefError::Fasta(format!(
                "record {} has an empty header",
                records.len() + 1
            )));
        }

        let sequence: String = record
            .seq()
            .iter()
            .filter(|b| !b.is_ascii_whitespace())
            .map(|&b| char::from(b))
            .collect();

        records.push(FastaRecord::new(header, sequence));
    }

    Ok(records)
}

/// Write records as `>header` followed by the sequence on one line
pub fn write_records<'a, W, I>(writer: &mut W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (header, sequence) in records {
        write_fasta(header.as_bytes(), sequence.as_bytes(), writer, LineEnding::Unix)?;
    }
    Ok(())
}

/// Render records to an in-memory FASTA document
pub fn to_string<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut buf = Vec::new();
    write_records(&mut buf, records)?;
    String::from_utf8(buf)
        .map_err(|e| DebriefError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
