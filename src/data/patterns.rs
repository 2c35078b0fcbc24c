// src/data/patterns.rs

//! The canonical grammar of a V-log: regular expressions for the
//! [Standard line] and each of its fields, the header border, and the two
//! traceback markers.
//!
//! All patterns are compiled once, on first use, and are constant for the
//! lifetime of the process.
//!
//! [Standard line]: crate::data#standard-line

use crate::common::{BORDER_CHAR_MAJOR, BORDER_CHAR_MINOR, BORDER_LEN};

use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::regex::Regex;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// regex pattern strings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Regex pattern `str`
#[allow(non_camel_case_types)]
pub type Pattern_str = str;

/// date, e.g. `2017-10-30`
pub const RP_DATE: &Pattern_str = r"\d{4}-\d{2}-\d{2}";
/// time with microseconds, e.g. `19:13:32.208116`
pub const RP_TIME: &Pattern_str = r"\d{2}:\d{2}:\d{2}\.\d{6}";
/// the six kinds a Standard line may carry
pub const RP_KIND: &Pattern_str = r"DEBUG|INFO|NOTICE|WARNING|ERROR|CRITICAL";
/// source, e.g. `[res.core:636]`
pub const RP_SOURCE: &Pattern_str = r"\[[A-Za-z_][\w.]*:\d+\]";
/// thread, e.g. `[MainProcess:MainThread]`
pub const RP_THREAD: &Pattern_str = r"\[[^\s:\[\]]+:[^\s:\[\]]+\]";

/// Capture group name of the date.
pub const CGN_DATE: &str = "date";
/// Capture group name of the time.
pub const CGN_TIME: &str = "time";
/// Capture group name of the kind token.
pub const CGN_KIND: &str = "kind";
/// Capture group name of the source.
pub const CGN_SOURCE: &str = "source";
/// Capture group name of the thread.
pub const CGN_THREAD: &str = "thread";
/// Capture group name of the details.
pub const CGN_DETAILS: &str = "details";
/// Capture group name of the traceback prefix.
pub const CGN_PREFIX: &str = "prefix";

/// The full Standard line,
/// `date SP time SP kind SP source SP thread [SP details]`.
///
/// The kind is matched as any token so a line that resembles the Standard
/// prefix but carries an unknown kind is still recognized as such (and
/// left unclassified).
pub const RP_STANDARD: &Pattern_str = concatcp!(
    r"^(?P<", CGN_DATE, ">", RP_DATE, r") ",
    r"(?P<", CGN_TIME, ">", RP_TIME, r") ",
    r"(?P<", CGN_KIND, r">\S+) ",
    r"(?P<", CGN_SOURCE, r">\[[^\]]*\]) ",
    r"(?P<", CGN_THREAD, r">\[[^\]]*\])",
    r"(?: (?P<", CGN_DETAILS, ">.*))?$"
);

/// Any line beginning with a date and a time. Used by the V-log detection
/// heuristic.
pub const RP_TIMESTAMP_PREFIX: &Pattern_str = concatcp!(r"^", RP_DATE, r" \d{2}:\d{2}:\d{2}");

/// Traceback start marker with an optional captured framing prefix,
/// e.g. `|! Traceback (most recent call last):`.
pub const RP_TRACEBACK_START: &Pattern_str = concatcp!(
    r"^(?P<", CGN_PREFIX, r">.*?)Traceback \(most recent call last\):$"
);

/// Traceback terminal exception line, after stripping the framing prefix.
pub const RP_TRACEBACK_EXCEPTION: &Pattern_str = r"^[A-Za-z_.]+(?:Error|Exception)[^:]*: .*";

/// Suite header description.
pub const RP_SUITE_HEADER: &Pattern_str =
    r"^Test Suite: Starting (?P<phase>Setup|Test|Teardown) of (?P<name>\S.*)$";

/// Test case header description.
pub const RP_TESTCASE_HEADER: &Pattern_str =
    r"^Test Case (?P<number>\d+): Starting (?P<phase>Setup|Test|Teardown) of (?P<name>\S.*)$";

/// Step header description, two lines.
pub const RP_STEP_HEADER: &Pattern_str =
    r"^Starting Step (?P<number>\d+) for (?P<name>[^:]+): (?P<action>.*)\nExpect: (?P<expected>.*)$";

/// Prefix that routes a `=` header description to the suite grammar.
pub const SUITE_HEADER_PREFIX: &str = "Test Suite:";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// compiled regex
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

lazy_static! {
    pub static ref RE_STANDARD: Regex = Regex::new(RP_STANDARD).unwrap();
    pub static ref RE_TIMESTAMP: Regex = Regex::new(concatcp!("^", RP_DATE, " ", RP_TIME, "$")).unwrap();
    pub static ref RE_SOURCE: Regex = Regex::new(concatcp!("^", RP_SOURCE, "$")).unwrap();
    pub static ref RE_THREAD: Regex = Regex::new(concatcp!("^", RP_THREAD, "$")).unwrap();
    pub static ref RE_TIMESTAMP_PREFIX: Regex = Regex::new(RP_TIMESTAMP_PREFIX).unwrap();
    pub static ref RE_TRACEBACK_START: Regex = Regex::new(RP_TRACEBACK_START).unwrap();
    pub static ref RE_TRACEBACK_EXCEPTION: Regex = Regex::new(RP_TRACEBACK_EXCEPTION).unwrap();
    pub static ref RE_SUITE_HEADER: Regex = Regex::new(RP_SUITE_HEADER).unwrap();
    pub static ref RE_TESTCASE_HEADER: Regex = Regex::new(RP_TESTCASE_HEADER).unwrap();
    pub static ref RE_STEP_HEADER: Regex = Regex::new(RP_STEP_HEADER).unwrap();
    /// `Test Case N:` routes a `=` header description to the test case grammar.
    pub static ref RE_TESTCASE_HEADER_PREFIX: Regex = Regex::new(r"^Test Case \d+:").unwrap();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// border lines
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// If `line` is a header border return its border character.
///
/// A border is exactly [`BORDER_LEN`] consecutive `=` or `-`.
pub fn border_char(line: &str) -> Option<char> {
    // borders are ASCII so the byte length is the char count
    if line.len() != BORDER_LEN {
        return None;
    }
    for c in [BORDER_CHAR_MAJOR, BORDER_CHAR_MINOR] {
        if line.bytes().all(|b| b == c as u8) {
            return Some(c);
        }
    }

    None
}

/// Is `line` a header border?
#[inline(always)]
pub fn is_border(line: &str) -> bool {
    border_char(line).is_some()
}

/// Create a border line of `c`.
pub fn border_line(c: char) -> String {
    std::iter::repeat(c).take(BORDER_LEN).collect()
}

/// Does `line` begin like a Standard line (a date and a time)?
#[inline(always)]
pub fn has_timestamp_prefix(line: &str) -> bool {
    RE_TIMESTAMP_PREFIX.is_match(line)
}
