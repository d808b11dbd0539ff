//! Shared utilities for SDTM crates.
//!
//! Cell conversion helpers and case-insensitive column access over polars
//! `DataFrame`s.

pub mod frame;
pub mod polars;

pub use frame::{ColumnReader, string_column};
pub use polars::{any_to_string, any_to_string_non_empty, format_numeric};
