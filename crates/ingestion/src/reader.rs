//! CSV tick input.
//!
//! Columns are located by header name (case-insensitive, trimmed). Rows may be
//! wider than the header: everything from the fourth column onward is then
//! treated as pieces of the volume.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use vwap_core::{Error, RawTick, Result, BASE_FIELD_COUNT};

pub const TIMESTAMP_COLUMN: &str = "TIMESTAMP";
pub const CURRENCY_PAIR_COLUMN: &str = "CURRENCY-PAIR";
pub const PRICE_COLUMN: &str = "PRICE";
pub const VOLUME_COLUMN: &str = "VOLUME";

/// Positional index of the volume column when a row is split.
const SPLIT_VOLUME_START: usize = BASE_FIELD_COUNT - 1;

/// Header positions of the base columns.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    timestamp: usize,
    currency_pair: usize,
    price: usize,
    volume: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::invalid_record(format!("missing column '{}'", name)))
        };
        Ok(Self {
            timestamp: find(TIMESTAMP_COLUMN)?,
            currency_pair: find(CURRENCY_PAIR_COLUMN)?,
            price: find(PRICE_COLUMN)?,
            volume: find(VOLUME_COLUMN)?,
        })
    }
}

/// Streams raw tick rows from CSV input.
pub struct TickReader<R: Read> {
    reader: csv::Reader<R>,
    /// None when the input has no header row at all.
    columns: Option<ColumnMap>,
    record: StringRecord,
    rows_read: u64,
}

impl TickReader<File> {
    /// Open a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening tick input");
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> TickReader<R> {
    /// Wrap any byte source.
    pub fn from_reader(source: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(source);

        let headers = reader.headers()?;
        let columns = if headers.is_empty() {
            None
        } else {
            Some(ColumnMap::from_headers(headers)?)
        };

        Ok(Self {
            reader,
            columns,
            record: StringRecord::new(),
            rows_read: 0,
        })
    }

    /// Read the next row, or None at end of input.
    pub fn next_tick(&mut self) -> Result<Option<RawTick>> {
        let Some(columns) = self.columns else {
            return Ok(None);
        };
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        self.rows_read += 1;

        let line = self.record.position().map(|p| p.line()).unwrap_or(0);
        let field = |idx: usize, name: &str| {
            self.record
                .get(idx)
                .map(str::to_string)
                .ok_or_else(|| Error::invalid_record(format!("line {}: missing {}", line, name)))
        };

        let volume_fields = if self.record.len() > BASE_FIELD_COUNT {
            self.record
                .iter()
                .skip(SPLIT_VOLUME_START)
                .map(str::to_string)
                .collect()
        } else {
            vec![field(columns.volume, VOLUME_COLUMN)?]
        };

        Ok(Some(RawTick {
            timestamp: field(columns.timestamp, TIMESTAMP_COLUMN)?,
            currency_pair: field(columns.currency_pair, CURRENCY_PAIR_COLUMN)?,
            price: field(columns.price, PRICE_COLUMN)?,
            volume_fields,
        }))
    }

    /// Data rows read so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }
}

impl<R: Read> Iterator for TickReader<R> {
    type Item = Result<RawTick>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_tick().transpose()
    }
}
