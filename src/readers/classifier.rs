// src/readers/classifier.rs

//! Map one raw line to a [`RecordKind`].
//!
//! Classification is pure; it does not know the display configuration, the
//! selection, or the summary tree. The only state it is given is the prior
//! classification and whether the [`TracebackAssembler`] is collecting.
//!
//! [`TracebackAssembler`]: crate::readers::tracebackassembler::TracebackAssembler

use crate::data::fields::{parse_kind, RecordKind};
use crate::data::patterns::{
    is_border,
    CGN_KIND,
    RE_STANDARD,
    RE_TRACEBACK_START,
};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Classify a raw `line` (trailing newline removed).
///
/// * A line matching the Standard pattern classifies as its kind, or `None`
///   if the kind token is not one of `DEBUG` through `CRITICAL`.
/// * A header border classifies as `None`; the header assembler owns it.
/// * A traceback start marker classifies as `Traceback`.
/// * A line following a `Traceback` while the traceback is still open
///   classifies as `Traceback`.
/// * Anything else is `Other`.
///
/// Blank lines are never passed here.
pub fn classify(
    line: &str,
    prior: Option<RecordKind>,
    traceback_open: bool,
) -> Option<RecordKind> {
    if let Some(captures) = RE_STANDARD.captures(line) {
        let kind = parse_kind(&captures[CGN_KIND]).ok();
        defñ!("Standard kind {:?}", kind);
        return kind;
    }
    if is_border(line) {
        defñ!("border");
        return None;
    }
    if RE_TRACEBACK_START.is_match(line) {
        defñ!("Traceback start");
        return Some(RecordKind::Traceback);
    }
    if prior == Some(RecordKind::Traceback) && traceback_open {
        defñ!("Traceback continued");
        return Some(RecordKind::Traceback);
    }
    defñ!("Other");

    Some(RecordKind::Other)
}

/// Is `line` empty or only whitespace?
#[inline(always)]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
