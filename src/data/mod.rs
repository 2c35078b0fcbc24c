// src/data/mod.rs

//! The `data` module is the V-log grammar and the typed containers built
//! from it: [`patterns`], [`fields`], and [`Record`]s.
//!
//! ## Definitions of data
//!
//! ### Standard line
//!
//! A "standard line" is one line of text with six space-separated fields:
//!
//! ```text
//! 2017-10-30 19:13:32.208116 DEBUG [res.core:636] [MainProcess:MainThread] Sending HTTP POST request
//! └─ date ─┘ └──── time ───┘ kind  └─ source ──┘ └──────── thread ──────┘ └──────── details ──────┘
//! ```
//!
//! It is represented by a [`StandardRecord`].
//!
//! ### Header
//!
//! A "header" is a description framed by two border lines of 105 identical
//! characters; `=` for suite, test case, and general headers, `-` for step
//! headers. A step header description is two lines, the action and the
//! `Expect:` line.
//!
//! It is represented by a [`HeaderRecord`].
//!
//! ### Traceback
//!
//! A "traceback" is a sequence of lines beginning with
//! `Traceback (most recent call last):` and ending with an exception line
//! like `ValueError: bad value`. All lines may share a framing prefix such as
//! `|! `.
//!
//! It is represented by a [`TracebackRecord`].
//!
//! ### Other
//!
//! Any other non-blank line.
//!
//! [`patterns`]: crate::data::patterns
//! [`fields`]: crate::data::fields
//! [`Record`]: crate::data::record::Record
//! [`StandardRecord`]: crate::data::record::StandardRecord
//! [`HeaderRecord`]: crate::data::record::HeaderRecord
//! [`TracebackRecord`]: crate::data::record::TracebackRecord

pub mod fields;
pub mod patterns;
pub mod record;
