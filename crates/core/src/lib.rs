//! Core types and configuration for the VWAP calculator.
//!
//! This crate provides shared types used across all other crates:
//! - Tick and aggregate record types
//! - Timestamp normalization against an anchor date
//! - Decimal rounding
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod rounding;
pub mod time;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use rounding::round_to_places;
pub use time::TimestampNormalizer;
pub use types::*;
