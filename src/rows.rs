//! Lazy iteration over rows of delimited text.
//!
//! The reader is borrowed, never opened or closed here: each pull reads at
//! most one more physical line from it, so the caller decides how long the
//! underlying file or stream stays alive.

use std::{io::BufRead, rc::Rc};

use delimited::{parse_record, Delimiter};
use log::trace;
use pest::error::LineColLocation;

use crate::{
    error::SourceError,
    lazy_sequence::{LazySequence, Step},
    source::Source,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowFormat {
    pub delimiter: Delimiter,
    /// Treat the first non-blank line as a header and do not yield it.
    pub has_header: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based physical line number.
    pub line: usize,
    pub fields: Vec<String>,
}

/// A row paired with the names from the header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    header: Rc<[String]>,
    fields: Vec<String>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&str> {
        let idx = self.header.iter().position(|column| column == name)?;
        self.fields.get(idx).map(String::as_str)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

struct RowSource<'a, R: ?Sized> {
    reader: &'a mut R,
    delimiter: Delimiter,
    line: usize,
    buf: String,
}

impl<'a, R: BufRead + ?Sized> RowSource<'a, R> {
    fn new(reader: &'a mut R, delimiter: Delimiter) -> Self {
        Self {
            reader,
            delimiter,
            line: 0,
            buf: String::new(),
        }
    }

    fn read_row(&mut self) -> Result<Step<Row>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(Step::Exhausted);
            }
            self.line += 1;
            let text = self.buf.trim_end_matches(&['\n', '\r'][..]);
            if text.is_empty() {
                continue;
            }
            let line = self.line;
            let fields = parse_record(text, self.delimiter).map_err(|err| {
                let column = match err.line_col {
                    LineColLocation::Pos((_, col)) => col,
                    LineColLocation::Span((_, col), _) => col,
                };
                SourceError::MalformedRow {
                    line,
                    message: format!("column {}: {}", column, err.variant.message()),
                }
            })?;
            return Ok(Step::Yielded(Row { line, fields }));
        }
    }

    /// Reads the header line. `None` means the input has no rows at all.
    fn read_header(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        let header = self.read_row()?.into_option().map(|row| {
            trace!("header at line {}: {:?}", row.line, row.fields);
            row.fields
        });
        Ok(header)
    }
}

struct Rows<'a, R: ?Sized> {
    source: RowSource<'a, R>,
    skip_header: bool,
}

impl<'a, R: BufRead + ?Sized> Source for Rows<'a, R> {
    type Item = Row;

    fn pull(&mut self) -> Result<Step<Row>, SourceError> {
        if self.skip_header {
            // a malformed header line still counts as the header
            self.skip_header = false;
            if self.source.read_header()?.is_none() {
                return Ok(Step::Exhausted);
            }
        }
        self.source.read_row()
    }
}

struct Records<'a, R: ?Sized> {
    source: RowSource<'a, R>,
    header: Option<Rc<[String]>>,
}

impl<'a, R: BufRead + ?Sized> Source for Records<'a, R> {
    type Item = Record;

    fn pull(&mut self) -> Result<Step<Record>, SourceError> {
        let header = match self.header.clone() {
            Some(header) => header,
            None => match self.source.read_header()? {
                Some(names) => {
                    let header: Rc<[String]> = names.into();
                    self.header = Some(header.clone());
                    header
                }
                None => return Ok(Step::Exhausted),
            },
        };
        let row = match self.source.read_row()? {
            Step::Yielded(row) => row,
            Step::Exhausted => return Ok(Step::Exhausted),
        };
        if row.fields.len() != header.len() {
            return Err(SourceError::FieldCount {
                line: row.line,
                expected: header.len(),
                found: row.fields.len(),
            });
        }
        Ok(Step::Yielded(Record {
            line: row.line,
            header,
            fields: row.fields,
        }))
    }
}

/// Rows of `reader`, read and parsed one line per pull. Blank lines are
/// skipped. A malformed line is reported as [`SourceError::MalformedRow`] and
/// the next pull continues with the line after it. With
/// [`RowFormat::has_header`] the first non-blank line is consumed as the
/// header on the first pull, even if it is malformed.
pub fn rows<'a, R>(reader: &'a mut R, format: RowFormat) -> LazySequence<'a, Row>
where
    R: BufRead + ?Sized,
{
    LazySequence::new(Rows {
        source: RowSource::new(reader, format.delimiter),
        skip_header: format.has_header,
    })
}

/// Rows of `reader` keyed by the names on its first line.
pub fn records<'a, R>(reader: &'a mut R, delimiter: Delimiter) -> LazySequence<'a, Record>
where
    R: BufRead + ?Sized,
{
    LazySequence::new(Records {
        source: RowSource::new(reader, delimiter),
        header: None,
    })
}
