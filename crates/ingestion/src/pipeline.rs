//! One calculation run: CSV rows in, closed aggregates out.

use crate::reader::TickReader;
use crate::window::WindowAggregator;
use std::io::Read;
use std::path::Path;
use tracing::info;
use vwap_core::{AggregateRecord, Config, Result};

/// Compute per-window VWAP aggregates for the ticks in a CSV file.
///
/// The configuration is checked before the file is opened. The first bad row
/// aborts the run; no partial output is returned.
pub fn calculate_vwap(path: impl AsRef<Path>, config: &Config) -> Result<Vec<AggregateRecord>> {
    let aggregator = WindowAggregator::from_config(config)?;
    let reader = TickReader::from_path(path)?;
    run(reader, aggregator)
}

/// Same as [`calculate_vwap`] over any byte source.
pub fn calculate_vwap_from_reader<R: Read>(
    source: R,
    config: &Config,
) -> Result<Vec<AggregateRecord>> {
    let aggregator = WindowAggregator::from_config(config)?;
    let reader = TickReader::from_reader(source)?;
    run(reader, aggregator)
}

fn run<R: Read>(
    mut reader: TickReader<R>,
    mut aggregator: WindowAggregator,
) -> Result<Vec<AggregateRecord>> {
    while let Some(raw) = reader.next_tick()? {
        aggregator.ingest_raw(&raw)?;
    }
    let records = aggregator.finalize()?;

    info!(
        anchor_date = %aggregator.anchor_date(),
        window_ms = aggregator.window_size_ms(),
        ticks = aggregator.ticks_ingested(),
        windows = aggregator.windows_closed(),
        records = records.len(),
        "vwap calculation complete"
    );
    Ok(records)
}
