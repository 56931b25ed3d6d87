//! Display formatting.

use chrono::Utc;
use std::path::{Path, PathBuf};
use vwap_core::{AggregateRecord, Result};

/// Minimum fractional digits shown for a VWAP.
const MIN_FRACTION_DIGITS: usize = 2;

/// Render a VWAP with at least two fractional digits: `155.00`, `0.6533`.
pub fn format_vwap(value: f64) -> String {
    let text = value.to_string();
    if !value.is_finite() {
        return text;
    }
    let digits = match text.split_once('.') {
        Some((_, fraction)) => fraction.len(),
        None => 0,
    };
    if digits >= MIN_FRACTION_DIGITS {
        text
    } else {
        format!("{:.*}", MIN_FRACTION_DIGITS, value)
    }
}

/// One console line per record, e.g. `09:00 AM - 10:00 AM -> VWAP for AUD/USD: 0.6533`.
pub fn console_line(record: &AggregateRecord) -> Result<String> {
    Ok(format!(
        "{} -> VWAP for {}: {}",
        record.window_label(),
        record.currency_pair(),
        format_vwap(record.vwap()?)
    ))
}

/// Output file name stamped with the given epoch milliseconds.
pub fn output_file_name(epoch_ms: i64) -> String {
    format!("vwap-{}.csv", epoch_ms)
}

/// Output path in `dir`, stamped with the current time.
pub fn output_path(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref()
        .join(output_file_name(Utc::now().timestamp_millis()))
}
