// src/lib.rs

//! _vlplib_ is the library of the _vlp_ program, a streaming pretty-printer
//! for V-logs, the structured logs of test runs.
//!
//! A V-log stream is consumed line by line. Each line is classified and
//! tokenized, multi-line headers and tracebacks are reassembled, display
//! filters are applied, the result is colorized and width-constrained, and
//! at the end of the stream a summary of the run (suite → test case → step)
//! with per-node runtime and pass/fail status is printed.
//!
//! See [_Definitions of data_] and the [_Overview of readers_].
//!
//! [_Definitions of data_]: crate::data
//! [_Overview of readers_]: crate::readers

pub mod common;
pub mod config;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
