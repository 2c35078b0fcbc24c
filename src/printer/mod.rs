// src/printer/mod.rs

//! The `printer` module is for printing user-facing V-log records
//! ([`Record`s]) with colors, field projection, and width clipping, and for
//! printing the run summary.
//!
//! [`Record`s]: crate::data::record::Record

pub mod formatter;
pub mod printers;
pub mod summary;
