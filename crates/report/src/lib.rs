//! Output rendering for the VWAP calculator.
//!
//! This crate provides:
//! - CSV listing of closed aggregates
//! - Console lines
//! - VWAP display formatting and output file naming

pub mod format;
pub mod writer;

pub use format::{console_line, format_vwap, output_file_name, output_path};
pub use writer::{read_listing, write_records, write_records_to, OUTPUT_HEADERS};
