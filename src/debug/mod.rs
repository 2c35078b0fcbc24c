// src/debug/mod.rs

//! The `debug` module is functions for printing errors and warnings, some
//! only in debug builds and test builds.

pub mod printers;
