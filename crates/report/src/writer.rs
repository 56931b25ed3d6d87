//! CSV listing of closed aggregates.

use crate::format::format_vwap;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;
use vwap_core::{AggregateRecord, Result};

/// Header row of the output listing.
pub const OUTPUT_HEADERS: [&str; 3] = ["TIME WINDOW", "CURRENCY-PAIR", "VWAP"];

/// Write the listing to `path`, replacing any existing file.
pub fn write_records(path: impl AsRef<Path>, records: &[AggregateRecord]) -> Result<()> {
    let path = path.as_ref();
    // Render first so a bad record leaves no half-written file behind.
    let rows = render_rows(records)?;
    let file = File::create(path)?;
    write_rows(file, &rows)?;
    debug!(path = %path.display(), rows = rows.len(), "wrote vwap listing");
    Ok(())
}

/// Write the listing to any sink.
pub fn write_records_to<W: Write>(sink: W, records: &[AggregateRecord]) -> Result<()> {
    let rows = render_rows(records)?;
    write_rows(sink, &rows)
}

/// Read a listing back as its header and data rows.
pub fn read_listing(path: impl AsRef<Path>) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((headers, rows))
}

fn render_rows(records: &[AggregateRecord]) -> Result<Vec<[String; 3]>> {
    records
        .iter()
        .map(|record| {
            Ok([
                record.window_label().to_string(),
                record.currency_pair().to_string(),
                format_vwap(record.vwap()?),
            ])
        })
        .collect()
}

fn write_rows<W: Write>(sink: W, rows: &[[String; 3]]) -> Result<()> {
    // Header written by hand so an empty listing still carries it.
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);
    writer.write_record(OUTPUT_HEADERS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vwap_core::Error;

    fn sample_records() -> Vec<AggregateRecord> {
        vec![
            AggregateRecord::new("09:10 AM - 10:10 AM", "AUD/USD", 1310.0, 2000),
            AggregateRecord::new("09:10 AM - 10:10 AM", "USD/JPY", 155_000.0, 1000),
            AggregateRecord::new("10:10 AM - 11:10 AM", "AUD/USD", 1560.0, 2000),
        ]
    }

    #[test]
    fn test_round_trip_listing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vwap.csv");

        write_records(&path, &sample_records()).unwrap();
        let (headers, rows) = read_listing(&path).unwrap();

        assert_eq!(headers, StringRecord::from(OUTPUT_HEADERS.to_vec()));
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "09:10 AM - 10:10 AM");
        assert_eq!(&rows[0][1], "AUD/USD");
        assert_eq!(&rows[0][2], "0.655");
        assert_eq!(&rows[1][2], "155.00");
        assert_eq!(&rows[2][0], "10:10 AM - 11:10 AM");
        assert_eq!(&rows[2][2], "0.78");

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_empty_listing_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vwap-header.csv");

        write_records(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), "TIME WINDOW,CURRENCY-PAIR,VWAP");

        let (_, rows) = read_listing(&path).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_zero_volume_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vwap.csv");
        let records = vec![AggregateRecord::new("09:10 AM - 10:10 AM", "AUD/USD", 0.0, 0)];

        let err = write_records(&path, &records).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path() {
        let err = write_records("/nonexistent/dir/vwap.csv", &sample_records()).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buf = Vec::new();
        write_records_to(&mut buf, &sample_records()[..1]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            ["TIME WINDOW,CURRENCY-PAIR,VWAP", "09:10 AM - 10:10 AM,AUD/USD,0.655"]
        );
    }
}
