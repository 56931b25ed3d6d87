//! Core data types for the VWAP calculator.

use crate::error::{Error, Result};
use crate::rounding::{round_to_places, VWAP_DECIMAL_PLACES};
use crate::time::TimestampNormalizer;
use serde::{Deserialize, Serialize};

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Number of base columns in an input row.
pub const BASE_FIELD_COUNT: usize = 4;

/// Case-insensitive key for a currency pair.
#[inline]
pub fn normalize_pair(pair: &str) -> String {
    pair.to_uppercase()
}

/// An input row before validation.
///
/// `volume_fields` is a single entry for a well-formed row. Rows wider than
/// [`BASE_FIELD_COUNT`] carry every field from the fourth column onward, which
/// happens when a thousands separator splits the volume (`1,000`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTick {
    /// Clock time as written, e.g. `9:10 AM`.
    pub timestamp: String,
    /// Currency pair as written.
    pub currency_pair: String,
    /// Price field.
    pub price: String,
    /// Volume field, or its pieces.
    pub volume_fields: Vec<String>,
}

impl RawTick {
    /// Validate the row and pin its time to the normalizer's anchor date.
    pub fn resolve(&self, normalizer: &TimestampNormalizer) -> Result<Tick> {
        let ts_ms = normalizer.normalize(&self.timestamp)?;
        let price = parse_price(&self.price)?;
        let volume = parse_volume(&self.volume_fields)?;

        Ok(Tick {
            ts_ms,
            currency_pair: self.currency_pair.clone(),
            price,
            volume,
        })
    }
}

/// Parse a price field.
pub fn parse_price(field: &str) -> Result<f64> {
    let price: f64 = field
        .parse()
        .map_err(|_| Error::invalid_record(format!("price '{}' is not a number", field)))?;
    if !price.is_finite() {
        return Err(Error::invalid_record(format!("price '{}' is not finite", field)));
    }
    Ok(price)
}

/// Join the volume pieces and parse them as one number.
///
/// The joined text may carry a fraction; it is truncated toward zero.
pub fn parse_volume(fields: &[String]) -> Result<u64> {
    let joined = fields.concat();
    let volume: f64 = joined
        .parse()
        .map_err(|_| Error::invalid_record(format!("volume '{}' is not a number", joined)))?;
    if !volume.is_finite() || volume < 0.0 || volume >= u64::MAX as f64 {
        return Err(Error::invalid_record(format!(
            "volume '{}' is out of range",
            joined
        )));
    }
    Ok(volume.trunc() as u64)
}

/// A single trade observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Timestamp in milliseconds.
    pub ts_ms: TimestampMs,
    /// Currency pair as written in the input.
    pub currency_pair: String,
    /// Trade price.
    pub price: f64,
    /// Trade volume.
    pub volume: u64,
}

impl Tick {
    /// Price times volume.
    #[inline]
    pub fn price_volume(&self) -> f64 {
        self.price * self.volume as f64
    }
}

/// Closed per-(window, pair) aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    window_label: String,
    currency_pair: String,
    cumulative_price_volume: f64,
    cumulative_volume: u64,
}

impl AggregateRecord {
    /// Create a record from final totals.
    pub fn new(
        window_label: impl Into<String>,
        currency_pair: impl Into<String>,
        cumulative_price_volume: f64,
        cumulative_volume: u64,
    ) -> Self {
        Self {
            window_label: window_label.into(),
            currency_pair: currency_pair.into(),
            cumulative_price_volume,
            cumulative_volume,
        }
    }

    /// Window range label, e.g. `09:00 AM - 10:00 AM`.
    pub fn window_label(&self) -> &str {
        &self.window_label
    }

    /// Currency pair, spelled as in the first tick of the window.
    pub fn currency_pair(&self) -> &str {
        &self.currency_pair
    }

    /// Sum of price times volume.
    pub fn cumulative_price_volume(&self) -> f64 {
        self.cumulative_price_volume
    }

    /// Sum of volume.
    pub fn cumulative_volume(&self) -> u64 {
        self.cumulative_volume
    }

    /// Volume-weighted average price rounded to four places.
    pub fn vwap(&self) -> Result<f64> {
        if self.cumulative_volume == 0 {
            return Err(Error::division_by_zero(format!(
                "no volume for {} in {}",
                self.currency_pair, self.window_label
            )));
        }
        let ratio = self.cumulative_price_volume / self.cumulative_volume as f64;
        Ok(round_to_places(ratio, VWAP_DECIMAL_PLACES))
    }
}
