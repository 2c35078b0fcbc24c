// src/tests/mod.rs

//! Tests for _vlplib_.
//!
//! Tests are placed at `src/tests/`, inside the `vlplib`. This is a
//! reasonable trade-off of separation and access.
//!
//! Tests placed at top-level path `tests/` do not have crate-internal
//! visibility; those tests run the _vlp_ program end to end.

pub mod common;
pub mod config_tests;
pub mod record_tests;
pub mod summary_tests;
pub mod summarytree_tests;
