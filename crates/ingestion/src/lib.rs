//! Tick ingestion and windowed aggregation for the VWAP calculator.
//!
//! This crate handles:
//! - Reading tick rows from CSV input
//! - Window state machine and per-pair accumulation
//! - Running a full calculation over one input file

pub mod pipeline;
pub mod reader;
pub mod window;

pub use pipeline::{calculate_vwap, calculate_vwap_from_reader};
pub use reader::TickReader;
pub use window::WindowAggregator;
