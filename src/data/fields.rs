// src/data/fields.rs

//! Typed values parsed from the tokens of a [Standard line]:
//! [`Timestamp`], [`RecordKind`], [`Source`], [`Thread`], and [`Details`].
//!
//! Every field renders back to its exact original lexical form unless
//! shortening is requested.
//!
//! [Standard line]: crate::data#standard-line

use crate::common::{VlogError, VlogResult, SHORTEN_KIND_WIDTH, SHORTEN_LIMIT};
use crate::data::patterns::{RE_SOURCE, RE_THREAD, RE_TIMESTAMP};

use std::fmt;

use ::chrono::{Duration, NaiveDateTime};
use ::phf::phf_map;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RecordKind
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The categorical type of a record.
///
/// The declaration order is stable; it is the order of the
/// `DISPLAY LOG TYPES` configuration section and of [`KindSet`] indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Traceback,
    Other,
    StepHeader,
    TestCaseHeader,
    SuiteHeader,
    GeneralHeader,
}

/// Count of [`RecordKind`] variants.
pub const RECORDKIND_COUNT: usize = 12;

/// Map the kind token of a Standard line to its [`RecordKind`].
static MAP_TOKEN_TO_KIND: phf::Map<&'static str, RecordKind> = phf_map! {
    "DEBUG" => RecordKind::Debug,
    "INFO" => RecordKind::Info,
    "NOTICE" => RecordKind::Notice,
    "WARNING" => RecordKind::Warning,
    "ERROR" => RecordKind::Error,
    "CRITICAL" => RecordKind::Critical,
};

impl RecordKind {
    pub const ALL: [RecordKind; RECORDKIND_COUNT] = [
        RecordKind::Debug,
        RecordKind::Info,
        RecordKind::Notice,
        RecordKind::Warning,
        RecordKind::Error,
        RecordKind::Critical,
        RecordKind::Traceback,
        RecordKind::Other,
        RecordKind::StepHeader,
        RecordKind::TestCaseHeader,
        RecordKind::SuiteHeader,
        RecordKind::GeneralHeader,
    ];

    /// Index into [`RecordKind::ALL`].
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Is this one of the kinds a Standard line may carry,
    /// `Debug` through `Critical`?
    pub const fn is_standard(&self) -> bool {
        matches!(
            self,
            RecordKind::Debug
                | RecordKind::Info
                | RecordKind::Notice
                | RecordKind::Warning
                | RecordKind::Error
                | RecordKind::Critical
        )
    }

    /// Is this one of the four header kinds?
    pub const fn is_header(&self) -> bool {
        matches!(
            self,
            RecordKind::StepHeader
                | RecordKind::TestCaseHeader
                | RecordKind::SuiteHeader
                | RecordKind::GeneralHeader
        )
    }

    /// May a [`Traceback`] be attached to a Standard record of this kind?
    ///
    /// [`Traceback`]: RecordKind::Traceback
    pub const fn accepts_traceback(&self) -> bool {
        matches!(self, RecordKind::Error | RecordKind::Warning)
    }

    /// Rank of a header kind; a general header outranks a suite header
    /// outranks a test case header outranks a step header.
    pub const fn header_rank(&self) -> Option<u8> {
        match self {
            RecordKind::StepHeader => Some(0),
            RecordKind::TestCaseHeader => Some(1),
            RecordKind::SuiteHeader => Some(2),
            RecordKind::GeneralHeader => Some(3),
            _ => None,
        }
    }

    /// The long form, as it appears in a Standard line for the Standard
    /// kinds.
    pub const fn token(&self) -> &'static str {
        match self {
            RecordKind::Debug => "DEBUG",
            RecordKind::Info => "INFO",
            RecordKind::Notice => "NOTICE",
            RecordKind::Warning => "WARNING",
            RecordKind::Error => "ERROR",
            RecordKind::Critical => "CRITICAL",
            RecordKind::Traceback => "TRACEBACK",
            RecordKind::Other => "OTHER",
            RecordKind::StepHeader => "STEP HEADER",
            RecordKind::TestCaseHeader => "TEST CASE HEADER",
            RecordKind::SuiteHeader => "SUITE HEADER",
            RecordKind::GeneralHeader => "GENERAL HEADER",
        }
    }

    /// The short form, at most [`SHORTEN_KIND_WIDTH`] characters.
    pub const fn short_token(&self) -> &'static str {
        match self {
            RecordKind::Debug => "DEBUG",
            RecordKind::Info => "INFO",
            RecordKind::Notice => "NOTE",
            RecordKind::Warning => "WARN",
            RecordKind::Error => "ERROR",
            RecordKind::Critical => "CRIT",
            RecordKind::Traceback => "TRACE",
            RecordKind::Other => "OTHER",
            RecordKind::StepHeader => "STEP",
            RecordKind::TestCaseHeader => "CASE",
            RecordKind::SuiteHeader => "SUITE",
            RecordKind::GeneralHeader => "GEN",
        }
    }

    /// Key of this kind in the `DISPLAY LOG TYPES` configuration section.
    pub const fn config_key(&self) -> &'static str {
        match self {
            RecordKind::Debug => "debug",
            RecordKind::Info => "info",
            RecordKind::Notice => "notice",
            RecordKind::Warning => "warning",
            RecordKind::Error => "error",
            RecordKind::Critical => "critical",
            RecordKind::Traceback => "traceback",
            RecordKind::Other => "other",
            RecordKind::StepHeader => "step_header",
            RecordKind::TestCaseHeader => "test_case_header",
            RecordKind::SuiteHeader => "suite_header",
            RecordKind::GeneralHeader => "general_header",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Parse the kind token of a Standard line.
///
/// Only `DEBUG` through `CRITICAL` are accepted.
pub fn parse_kind(s: &str) -> VlogResult<RecordKind> {
    match MAP_TOKEN_TO_KIND.get(s) {
        Some(kind) => Ok(*kind),
        None => Err(VlogError::InvalidField(FieldKind::Type)),
    }
}

/// Render a kind; the short form is right-padded to
/// [`SHORTEN_KIND_WIDTH`] characters.
pub fn render_kind(
    kind: RecordKind,
    shorten: bool,
) -> String {
    match shorten {
        true => format!("{:<width$}", kind.short_token(), width = SHORTEN_KIND_WIDTH),
        false => String::from(kind.token()),
    }
}

/// A set of [`RecordKind`], e.g. the kinds configured for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindSet([bool; RECORDKIND_COUNT]);

impl KindSet {
    /// Every kind.
    pub const fn all() -> KindSet {
        KindSet([true; RECORDKIND_COUNT])
    }

    /// No kind.
    pub const fn none() -> KindSet {
        KindSet([false; RECORDKIND_COUNT])
    }

    pub fn contains(
        &self,
        kind: RecordKind,
    ) -> bool {
        self.0[kind.index()]
    }

    pub fn set(
        &mut self,
        kind: RecordKind,
        value: bool,
    ) {
        self.0[kind.index()] = value;
    }

    /// Builder-style [`set`](KindSet::set).
    pub fn with(
        mut self,
        kind: RecordKind,
        value: bool,
    ) -> KindSet {
        self.set(kind, value);

        self
    }
}

impl Default for KindSet {
    fn default() -> Self {
        KindSet::all()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FieldKind
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The displayable pieces of a Standard record, in line order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    Date,
    Time,
    Type,
    Source,
    Thread,
    Details,
}

/// Count of [`FieldKind`] variants.
pub const FIELDKIND_COUNT: usize = 6;

impl FieldKind {
    pub const ALL: [FieldKind; FIELDKIND_COUNT] = [
        FieldKind::Date,
        FieldKind::Time,
        FieldKind::Type,
        FieldKind::Source,
        FieldKind::Thread,
        FieldKind::Details,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Key of this field in the `DISPLAY FIELDS` configuration section.
    pub const fn config_key(&self) -> &'static str {
        match self {
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::Type => "type",
            FieldKind::Source => "source",
            FieldKind::Thread => "thread",
            FieldKind::Details => "details",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            FieldKind::Date => write!(f, "Date"),
            FieldKind::Time => write!(f, "Time"),
            FieldKind::Type => write!(f, "Type"),
            FieldKind::Source => write!(f, "Source"),
            FieldKind::Thread => write!(f, "Thread"),
            FieldKind::Details => write!(f, "Details"),
        }
    }
}

/// A set of [`FieldKind`], e.g. the fields configured for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSet([bool; FIELDKIND_COUNT]);

impl FieldSet {
    pub const fn all() -> FieldSet {
        FieldSet([true; FIELDKIND_COUNT])
    }

    pub fn contains(
        &self,
        field: FieldKind,
    ) -> bool {
        self.0[field.index()]
    }

    pub fn set(
        &mut self,
        field: FieldKind,
        value: bool,
    ) {
        self.0[field.index()] = value;
    }

    pub fn with(
        mut self,
        field: FieldKind,
        value: bool,
    ) -> FieldSet {
        self.set(field, value);

        self
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        FieldSet::all()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Timestamp
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`chrono` strftime] pattern of the date of a [`Timestamp`].
///
/// [`chrono` strftime]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Pattern of the time of a [`Timestamp`], microsecond precision.
pub const TIME_FORMAT: &str = "%H:%M:%S%.6f";
/// Pattern of a whole [`Timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Calendar date plus time-of-day at microsecond resolution,
/// e.g. `2017-10-30 19:13:32.208116`.
///
/// V-log timestamps carry no timezone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parse the literal form `YYYY-MM-DD hh:mm:ss.ffffff`.
    pub fn parse(s: &str) -> VlogResult<Timestamp> {
        if !RE_TIMESTAMP.is_match(s) {
            return Err(VlogError::InvalidField(FieldKind::Time));
        }
        match NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
            Ok(dt) => Ok(Timestamp(dt)),
            Err(_err) => {
                defñ!("parse_from_str({:?}) failed {}", s, _err);
                Err(VlogError::InvalidField(FieldKind::Time))
            }
        }
    }

    /// The date, e.g. `2017-10-30`.
    pub fn date_string(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    /// The time, e.g. `19:13:32.208116`.
    pub fn time_string(&self) -> String {
        self.0.format(TIME_FORMAT).to_string()
    }

    /// `self - earlier`
    pub fn since(
        &self,
        earlier: &Timestamp,
    ) -> Duration {
        self.0 - earlier.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// Parse the literal form `YYYY-MM-DD hh:mm:ss.ffffff`.
#[inline(always)]
pub fn parse_timestamp(s: &str) -> VlogResult<Timestamp> {
    Timestamp::parse(s)
}

/// Format a non-negative duration as `HH:MM:SS.ffffff`. Hours may exceed
/// two digits.
pub fn duration_to_string(duration: &Duration) -> String {
    let micros_total: i64 = duration.num_microseconds().unwrap_or(i64::MAX).max(0);
    let micros = micros_total % 1_000_000;
    let secs_total = micros_total / 1_000_000;
    let secs = secs_total % 60;
    let mins = (secs_total / 60) % 60;
    let hours = secs_total / 3600;

    format!("{:02}:{:02}:{:02}.{:06}", hours, mins, secs, micros)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Source, Thread, Details
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Module path and line number that emitted a Standard line,
/// from `[dotted.module.path:integer]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Source {
    pub module: String,
    pub line: u64,
    /// the line number as written, e.g. `0636`
    line_token: String,
}

impl Source {
    pub fn parse(s: &str) -> VlogResult<Source> {
        if !RE_SOURCE.is_match(s) {
            return Err(VlogError::InvalidField(FieldKind::Source));
        }
        // the regex guarantees the brackets and the colon
        let inner: &str = &s[1..s.len() - 1];
        let (module, line) = match inner.rsplit_once(':') {
            Some(val) => val,
            None => return Err(VlogError::InvalidField(FieldKind::Source)),
        };
        let line_token: String = String::from(line);
        let line: u64 = match line.parse::<u64>() {
            Ok(val) => val,
            Err(_) => return Err(VlogError::InvalidField(FieldKind::Source)),
        };

        Ok(Source {
            module: String::from(module),
            line,
            line_token,
        })
    }

    /// Render the source token.
    ///
    /// When `shorten` the text between the brackets is cut to
    /// [`SHORTEN_LIMIT`] characters, keeping the whole `:line` suffix, then
    /// padded to that width so shortened lines stay aligned.
    pub fn render(
        &self,
        shorten: bool,
    ) -> String {
        if !shorten {
            return format!("[{}:{}]", self.module, self.line_token);
        }
        let suffix: String = format!(":{}", self.line_token);
        let room: usize = SHORTEN_LIMIT.saturating_sub(suffix.len()).max(1);
        let module: String = self.module.chars().take(room).collect();
        let inner: String = format!("{}{}", module, suffix);

        format!("[{:<width$}]", inner, width = SHORTEN_LIMIT)
    }
}

impl fmt::Display for Source {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

/// Parse a source token.
#[inline(always)]
pub fn parse_source(s: &str) -> VlogResult<Source> {
    Source::parse(s)
}

/// The (process, thread) pair that emitted a Standard line,
/// from `[process:thread]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Thread {
    pub process: String,
    pub thread: String,
}

impl Thread {
    pub fn parse(s: &str) -> VlogResult<Thread> {
        if !RE_THREAD.is_match(s) {
            return Err(VlogError::InvalidField(FieldKind::Thread));
        }
        let inner: &str = &s[1..s.len() - 1];
        match inner.split_once(':') {
            Some((process, thread)) => Ok(Thread {
                process: String::from(process),
                thread: String::from(thread),
            }),
            None => Err(VlogError::InvalidField(FieldKind::Thread)),
        }
    }
}

impl fmt::Display for Thread {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "[{}:{}]", self.process, self.thread)
    }
}

/// Parse a thread token.
#[inline(always)]
pub fn parse_thread(s: &str) -> VlogResult<Thread> {
    Thread::parse(s)
}

/// Opaque tail text of a Standard line. May be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Details(pub String);

impl Details {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Details {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
