// src/tests/common.rs

//! common data and helpers shared by the tests of _vlplib_

#![allow(non_upper_case_globals)]
#![allow(dead_code)]

use crate::common::{BORDER_CHAR_MAJOR, BORDER_CHAR_MINOR};
use crate::config::Config;
use crate::data::patterns::border_line;
use crate::printer::formatter::Formatter;
use crate::printer::printers::PrinterVlog;
use crate::readers::selection::Selection;

use ::termcolor::Buffer;

pub const DATE: &str = "2017-10-30";

/// A typical Standard line.
pub const LINE_DEBUG: &str =
    "2017-10-30 19:13:32.208116 DEBUG [res.core:636] [MainProcess:MainThread] Sending HTTP POST request";

pub const LINE_INFO: &str =
    "2017-10-30 19:13:33.000001 INFO [res.core:700] [MainProcess:MainThread] Response 200";

pub const LINE_WARNING: &str =
    "2017-10-30 19:13:34.000002 WARNING [res.retry:12] [MainProcess:Worker-1] Retrying";

pub const LINE_ERROR: &str =
    "2017-10-30 19:13:35.500000 ERROR [res.api:101] [MainProcess:MainThread] call failed";

/// Standard line without details.
pub const LINE_NO_DETAILS: &str = "2017-10-30 19:13:36.000000 NOTICE [res.api:5] [MainProcess:MainThread]";

pub const TB_START: &str = "Traceback (most recent call last):";
pub const TB_FRAME: &str = "  File \"/opt/res/api.py\", line 101, in call";
pub const TB_EXCEPTION: &str = "ValueError: bad response";

/// `=` border
pub fn border_major() -> String {
    border_line(BORDER_CHAR_MAJOR)
}

/// `-` border
pub fn border_minor() -> String {
    border_line(BORDER_CHAR_MINOR)
}

/// A Standard line at `time` on [`DATE`].
pub fn standard_line(
    time: &str,
    kind: &str,
    details: &str,
) -> String {
    format!("{} {} {} [tests.module:1] [MainProcess:MainThread] {}", DATE, time, kind, details)
}

pub fn suite_header(
    phase: &str,
    name: &str,
) -> Vec<String> {
    vec![
        border_major(),
        format!("Test Suite: Starting {} of {}", phase, name),
        border_major(),
    ]
}

pub fn testcase_header(
    number: u32,
    name: &str,
) -> Vec<String> {
    vec![
        border_major(),
        format!("Test Case {}: Starting Test of {}", number, name),
        border_major(),
    ]
}

pub fn step_header(
    number: u32,
    testcase: &str,
    action: &str,
) -> Vec<String> {
    vec![
        border_minor(),
        format!("Starting Step {} for {}: {}", number, testcase, action),
        format!("Expect: {} succeeds", action),
        border_minor(),
    ]
}

pub type FormatterBuffer = Formatter<Buffer>;

/// A `Formatter` printing to an uncolored in-memory buffer.
pub fn new_formatter(
    config: Config,
    selection: Selection,
) -> FormatterBuffer {
    let printer = PrinterVlog::new(Buffer::no_color(), false, None);

    Formatter::new(config, selection, printer)
}

/// Run `lines` through a new `Formatter`, complete it, and return it.
pub fn run_formatter<S: AsRef<str>>(
    config: Config,
    selection: Selection,
    lines: &[S],
) -> FormatterBuffer {
    let mut formatter = new_formatter(config, selection);
    for line in lines.iter() {
        formatter.process_line(line.as_ref()).unwrap();
    }
    formatter.complete().unwrap();

    formatter
}

/// The text printed so far.
pub fn output(formatter: &FormatterBuffer) -> String {
    String::from_utf8(formatter.printer().get_ref().as_slice().to_vec()).unwrap()
}

/// `lines` joined with a trailing newline each, the way they print.
pub fn as_printed<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for line in lines.iter() {
        out.push_str(line.as_ref());
        out.push('\n');
    }

    out
}
