// src/data/record.rs

//! Implements the tagged [`Record`] and its variants [`StandardRecord`],
//! [`TracebackRecord`], and [`HeaderRecord`].
//!
//! A `Record` is built from one or more raw lines. A `StandardRecord` is one
//! line. A `TracebackRecord` and a `HeaderRecord` are reassembled from
//! several lines by the [assemblers].
//!
//! [assemblers]: crate::readers

use crate::common::{
    VlogError,
    VlogResult,
    BORDER_CHAR_MAJOR,
    BORDER_CHAR_MINOR,
    FIELD_SEP,
};
use crate::data::fields::{
    parse_kind,
    render_kind,
    Details,
    FieldKind,
    FieldSet,
    RecordKind,
    Source,
    Thread,
    Timestamp,
};
use crate::data::patterns::{
    border_line,
    CGN_DETAILS,
    CGN_KIND,
    CGN_SOURCE,
    CGN_THREAD,
    RE_STANDARD,
    RE_STEP_HEADER,
    RE_SUITE_HEADER,
    RE_TESTCASE_HEADER,
    RE_TESTCASE_HEADER_PREFIX,
    SUITE_HEADER_PREFIX,
};

use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// StandardRecord
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One Standard line,
/// `date time kind [source] [thread] details`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandardRecord {
    pub timestamp: Timestamp,
    /// one of `Debug` through `Critical`
    pub kind: RecordKind,
    pub source: Source,
    pub thread: Thread,
    /// `None` if the line ended right after the thread token
    pub details: Option<Details>,
    /// Records rendered as a continuation of this one, i.e. a traceback
    /// glued onto a preceding error.
    pub attached: Vec<Record>,
}

impl StandardRecord {
    /// Parse a Standard line.
    ///
    /// Fails with `InvalidField` naming the first field that did not match
    /// its pattern.
    pub fn parse(line: &str) -> VlogResult<StandardRecord> {
        let captures = match RE_STANDARD.captures(line) {
            Some(val) => val,
            None => return Err(VlogError::InvalidField(FieldKind::Date)),
        };
        // the date and the time are captured separately but parsed as one
        let ts_end: usize = match captures.name(CGN_KIND) {
            Some(m) => m.start() - 1,
            None => return Err(VlogError::InvalidField(FieldKind::Type)),
        };
        let timestamp = Timestamp::parse(&line[..ts_end])?;
        let kind = parse_kind(&captures[CGN_KIND])?;
        let source = Source::parse(&captures[CGN_SOURCE])?;
        let thread = Thread::parse(&captures[CGN_THREAD])?;
        let details: Option<Details> = captures
            .name(CGN_DETAILS)
            .map(|m| Details(String::from(m.as_str())));

        Ok(StandardRecord {
            timestamp,
            kind,
            source,
            thread,
            details,
            attached: Vec::new(),
        })
    }

    /// Render one field.
    ///
    /// `Time` renders the exact original lexical form; `Type` and `Source`
    /// may be shortened. Returns `None` for an absent `Details`.
    pub fn render_field(
        &self,
        field: FieldKind,
        shorten: bool,
    ) -> Option<String> {
        match field {
            FieldKind::Date => Some(self.timestamp.date_string()),
            FieldKind::Time => Some(self.timestamp.time_string()),
            FieldKind::Type => Some(render_kind(self.kind, shorten)),
            FieldKind::Source => Some(self.source.render(shorten)),
            FieldKind::Thread => Some(self.thread.to_string()),
            FieldKind::Details => self
                .details
                .as_ref()
                .map(|d| d.0.clone()),
        }
    }

    /// Render the displayed `fields` joined by the field separator.
    ///
    /// With every field displayed and no shortening this is the original
    /// line, byte for byte.
    pub fn render(
        &self,
        fields: &FieldSet,
        shorten: bool,
    ) -> String {
        let mut out = String::with_capacity(128);
        let mut first = true;
        for field in FieldKind::ALL.iter() {
            if !fields.contains(*field) {
                continue;
            }
            if let Some(s) = self.render_field(*field, shorten) {
                if !first {
                    out.push(FIELD_SEP);
                }
                out.push_str(s.as_str());
                first = false;
            }
        }

        out
    }

    /// The details text, empty if absent.
    pub fn details_str(&self) -> &str {
        match &self.details {
            Some(details) => details.as_str(),
            None => "",
        }
    }

    /// Attach a traceback (or any other record) as a continuation.
    pub fn attach(
        &mut self,
        record: Record,
    ) {
        defñ!("attach {:?} to {} at {}", record.kind(), self.kind, self.timestamp);
        self.attached.push(record);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TracebackRecord
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A multi-line traceback, from `Traceback (most recent call last):`
/// through the exception line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TracebackRecord {
    /// the raw lines, prefix included
    pub lines: Vec<String>,
    /// the common leading framing, e.g. `"|! "`; empty if none
    pub prefix: String,
}

impl TracebackRecord {
    pub fn new(
        lines: Vec<String>,
        prefix: String,
    ) -> TracebackRecord {
        TracebackRecord { lines, prefix }
    }

    /// The terminal exception line without the prefix.
    pub fn exception(&self) -> Option<&str> {
        self.lines
            .last()
            .map(|line| line.strip_prefix(self.prefix.as_str()).unwrap_or(line))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HeaderRecord
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Phase of a suite or a test case named in its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Setup,
    Test,
    Teardown,
}

impl Phase {
    fn parse(s: &str) -> Option<Phase> {
        match s {
            "Setup" => Some(Phase::Setup),
            "Test" => Some(Phase::Test),
            "Teardown" => Some(Phase::Teardown),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            Phase::Setup => write!(f, "Setup"),
            Phase::Test => write!(f, "Test"),
            Phase::Teardown => write!(f, "Teardown"),
        }
    }
}

/// The identity parsed from a header description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderIdentity {
    /// The synthetic root of a run, never parsed from input.
    Root,
    General {
        description: String,
    },
    Suite {
        phase: Phase,
        name: String,
    },
    TestCase {
        number: u32,
        phase: Phase,
        name: String,
    },
    Step {
        number: u32,
        test_case: String,
        action: String,
        expected: String,
    },
}

impl HeaderIdentity {
    /// The [`RecordKind`] of a header with this identity.
    pub const fn kind(&self) -> RecordKind {
        match self {
            HeaderIdentity::Root | HeaderIdentity::General { .. } => RecordKind::GeneralHeader,
            HeaderIdentity::Suite { .. } => RecordKind::SuiteHeader,
            HeaderIdentity::TestCase { .. } => RecordKind::TestCaseHeader,
            HeaderIdentity::Step { .. } => RecordKind::StepHeader,
        }
    }
}

impl fmt::Display for HeaderIdentity {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            HeaderIdentity::Root => write!(f, "Run"),
            HeaderIdentity::General { description } => write!(f, "{}", description),
            HeaderIdentity::Suite { phase, name } => write!(f, "Test Suite {} ({})", name, phase),
            HeaderIdentity::TestCase {
                number,
                phase,
                name,
            } => write!(f, "Test Case {}: {} ({})", number, name, phase),
            HeaderIdentity::Step { number, action, .. } => write!(f, "Step {}: {}", number, action),
        }
    }
}

/// Pass/fail status of a header, derived from the errors attached beneath
/// it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Passed,
    Failed,
}

/// A header reassembled from a border, a description, and a border.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderRecord {
    pub identity: HeaderIdentity,
    /// `=` or `-`
    pub border: char,
    /// the raw description, lines joined by `'\n'`
    pub description: String,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub status: Status,
    /// Error records attached by the summary tree.
    pub errors: Vec<StandardRecord>,
}

impl HeaderRecord {
    /// Build a header from the border character and the raw description.
    ///
    /// The header grammar is chosen by the border and the description
    /// prefix. Fails with `InvalidHeader` if the chosen grammar does not
    /// match.
    pub fn parse(
        border: char,
        description: &str,
    ) -> VlogResult<HeaderRecord> {
        let identity: HeaderIdentity = match border {
            BORDER_CHAR_MAJOR => {
                if description.starts_with(SUITE_HEADER_PREFIX) {
                    parse_suite(description)?
                } else if RE_TESTCASE_HEADER_PREFIX.is_match(description) {
                    parse_testcase(description)?
                } else {
                    HeaderIdentity::General {
                        description: String::from(description),
                    }
                }
            }
            BORDER_CHAR_MINOR => parse_step(description)?,
            _ => return Err(VlogError::InvalidHeader(String::from(description))),
        };
        defñ!("{:?}", identity);

        Ok(HeaderRecord {
            identity,
            border,
            description: String::from(description),
            start_time: None,
            end_time: None,
            status: Status::default(),
            errors: Vec::new(),
        })
    }

    /// The synthetic root of a summary tree.
    pub fn new_root() -> HeaderRecord {
        HeaderRecord {
            identity: HeaderIdentity::Root,
            border: BORDER_CHAR_MAJOR,
            description: String::new(),
            start_time: None,
            end_time: None,
            status: Status::default(),
            errors: Vec::new(),
        }
    }

    pub const fn kind(&self) -> RecordKind {
        self.identity.kind()
    }

    /// The display lines: border, description line(s), border.
    pub fn display_lines(&self) -> Vec<String> {
        let border: String = border_line(self.border);
        let mut lines: Vec<String> = Vec::with_capacity(4);
        lines.push(border.clone());
        for line in self.description.split('\n') {
            lines.push(String::from(line));
        }
        lines.push(border);

        lines
    }
}

fn parse_suite(description: &str) -> VlogResult<HeaderIdentity> {
    let captures = match RE_SUITE_HEADER.captures(description) {
        Some(val) => val,
        None => return Err(VlogError::InvalidHeader(String::from(description))),
    };
    let phase = match Phase::parse(&captures["phase"]) {
        Some(val) => val,
        None => return Err(VlogError::InvalidHeader(String::from(description))),
    };

    Ok(HeaderIdentity::Suite {
        phase,
        name: String::from(&captures["name"]),
    })
}

fn parse_testcase(description: &str) -> VlogResult<HeaderIdentity> {
    let captures = match RE_TESTCASE_HEADER.captures(description) {
        Some(val) => val,
        None => return Err(VlogError::InvalidHeader(String::from(description))),
    };
    let number: u32 = match captures["number"].parse::<u32>() {
        Ok(val) => val,
        Err(_) => return Err(VlogError::InvalidHeader(String::from(description))),
    };
    let phase = match Phase::parse(&captures["phase"]) {
        Some(val) => val,
        None => return Err(VlogError::InvalidHeader(String::from(description))),
    };

    Ok(HeaderIdentity::TestCase {
        number,
        phase,
        name: String::from(&captures["name"]),
    })
}

fn parse_step(description: &str) -> VlogResult<HeaderIdentity> {
    let captures = match RE_STEP_HEADER.captures(description) {
        Some(val) => val,
        None => return Err(VlogError::InvalidHeader(String::from(description))),
    };
    let number: u32 = match captures["number"].parse::<u32>() {
        Ok(val) => val,
        Err(_) => return Err(VlogError::InvalidHeader(String::from(description))),
    };

    Ok(HeaderIdentity::Step {
        number,
        test_case: String::from(&captures["name"]),
        action: String::from(&captures["action"]),
        expected: String::from(&captures["expected"]),
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A typed log record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    Standard(StandardRecord),
    Traceback(TracebackRecord),
    Header(HeaderRecord),
    /// unclassified raw text
    Other(String),
    /// marker for one displayed blank line
    Blank,
}

impl Record {
    /// The kind of this record. A `Blank` has no kind.
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            Record::Standard(standard) => Some(standard.kind),
            Record::Traceback(_) => Some(RecordKind::Traceback),
            Record::Header(header) => Some(header.kind()),
            Record::Other(_) => Some(RecordKind::Other),
            Record::Blank => None,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Record::Header(_))
    }

    /// Is this a Standard record that accepts an attached traceback?
    pub fn accepts_traceback(&self) -> bool {
        match self {
            Record::Standard(standard) => standard.kind.accepts_traceback(),
            _ => false,
        }
    }

    /// The timestamp of a Standard record.
    pub fn timestamp(&self) -> Option<&Timestamp> {
        match self {
            Record::Standard(standard) => Some(&standard.timestamp),
            _ => None,
        }
    }
}
