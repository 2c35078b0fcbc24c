// src/tests/record_tests.rs

//! tests for `src/data/record.rs`

#![allow(non_snake_case)]

use crate::common::{VlogError, BORDER_CHAR_MAJOR, BORDER_CHAR_MINOR};
use crate::data::fields::{FieldKind, FieldSet, RecordKind};
use crate::data::record::{
    HeaderIdentity,
    HeaderRecord,
    Phase,
    Record,
    StandardRecord,
    Status,
    TracebackRecord,
};
use crate::tests::common::{
    border_major,
    border_minor,
    LINE_DEBUG,
    LINE_ERROR,
    LINE_INFO,
    LINE_NO_DETAILS,
    LINE_WARNING,
};

#[allow(unused_imports)]
use ::si_trace_print::printers::{defn, defo, defx};
use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_StandardRecord_parse() {
    let record = StandardRecord::parse(LINE_DEBUG).unwrap();
    assert_eq!(record.timestamp.to_string(), "2017-10-30 19:13:32.208116");
    assert_eq!(record.kind, RecordKind::Debug);
    assert_eq!(record.source.module, "res.core");
    assert_eq!(record.source.line, 636);
    assert_eq!(record.thread.process, "MainProcess");
    assert_eq!(record.thread.thread, "MainThread");
    assert_eq!(record.details_str(), "Sending HTTP POST request");
    assert!(record.attached.is_empty());
}

#[test]
fn test_StandardRecord_parse_no_details() {
    let record = StandardRecord::parse(LINE_NO_DETAILS).unwrap();
    assert_eq!(record.kind, RecordKind::Notice);
    assert!(record.details.is_none());
    assert_eq!(record.details_str(), "");
    assert_eq!(record.render_field(FieldKind::Details, false), None);
}

#[test_case(LINE_DEBUG)]
#[test_case(LINE_INFO)]
#[test_case(LINE_WARNING)]
#[test_case(LINE_ERROR)]
#[test_case(LINE_NO_DETAILS)]
#[test_case("2017-10-30 19:13:32.000000 CRITICAL [a.b:1] [P:T] details [with] {structure}  and  spaces"; "details kept verbatim")]
#[test_case("2017-10-30 19:13:32.208116 DEBUG [res.core:0636] [MainProcess:MainThread] x"; "zero padded source line")]
fn test_StandardRecord_render_roundtrip(line: &str) {
    let record = StandardRecord::parse(line).unwrap();
    assert_eq!(record.render(&FieldSet::all(), false), line);
}

#[test]
fn test_StandardRecord_render_fields_subset() {
    let record = StandardRecord::parse(LINE_DEBUG).unwrap();
    let fields = FieldSet::all()
        .with(FieldKind::Date, false)
        .with(FieldKind::Source, false)
        .with(FieldKind::Thread, false);
    assert_eq!(record.render(&fields, false), "19:13:32.208116 DEBUG Sending HTTP POST request");
}

#[test]
fn test_StandardRecord_render_shorten() {
    let record = StandardRecord::parse(LINE_WARNING).unwrap();
    assert_eq!(
        record.render(&FieldSet::all(), true),
        "2017-10-30 19:13:34.000002 WARN  [res.retry:12        ] [MainProcess:Worker-1] Retrying"
    );
}

#[test_case("2017-10-30 19:13:32.208116 TRACE [res.core:636] [MainProcess:MainThread] x", FieldKind::Type; "unknown kind")]
#[test_case("2017-10-30 19:13:32.208116 DEBUG [res.core] [MainProcess:MainThread] x", FieldKind::Source; "bad source")]
#[test_case("2017-10-30 19:13:32.208116 DEBUG [res.core:636] [MainProcess] x", FieldKind::Thread; "bad thread")]
#[test_case("2017-02-30 19:13:32.208116 DEBUG [res.core:636] [MainProcess:MainThread] x", FieldKind::Time; "bad date")]
#[test_case("hello world", FieldKind::Date; "not standard")]
fn test_StandardRecord_parse_invalid(
    line: &str,
    expect: FieldKind,
) {
    match StandardRecord::parse(line) {
        Err(VlogError::InvalidField(field)) => assert_eq!(field, expect),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_StandardRecord_attach() {
    let mut record = StandardRecord::parse(LINE_ERROR).unwrap();
    let traceback = TracebackRecord::new(
        vec![String::from("Traceback (most recent call last):"), String::from("KeyError: 'x'")],
        String::new(),
    );
    record.attach(Record::Traceback(traceback.clone()));
    assert_eq!(record.attached, vec![Record::Traceback(traceback)]);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_TracebackRecord_exception() {
    let traceback = TracebackRecord::new(
        vec![
            String::from("|! Traceback (most recent call last):"),
            String::from("|!   File \"x.py\", line 1, in <module>"),
            String::from("|! KeyError: 'x'"),
        ],
        String::from("|! "),
    );
    assert_eq!(traceback.exception(), Some("KeyError: 'x'"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_HeaderRecord_parse_suite() {
    let header = HeaderRecord::parse(BORDER_CHAR_MAJOR, "Test Suite: Starting Setup of TsLogin").unwrap();
    assert_eq!(
        header.identity,
        HeaderIdentity::Suite {
            phase: Phase::Setup,
            name: String::from("TsLogin"),
        }
    );
    assert_eq!(header.kind(), RecordKind::SuiteHeader);
    assert_eq!(header.identity.to_string(), "Test Suite TsLogin (Setup)");
    assert_eq!(header.status, Status::Passed);
    assert!(header.start_time.is_none());
    assert!(header.end_time.is_none());
}

#[test]
fn test_HeaderRecord_parse_testcase() {
    let header = HeaderRecord::parse(BORDER_CHAR_MAJOR, "Test Case 3: Starting Teardown of login").unwrap();
    assert_eq!(
        header.identity,
        HeaderIdentity::TestCase {
            number: 3,
            phase: Phase::Teardown,
            name: String::from("login"),
        }
    );
    assert_eq!(header.kind(), RecordKind::TestCaseHeader);
    assert_eq!(header.identity.to_string(), "Test Case 3: login (Teardown)");
}

#[test]
fn test_HeaderRecord_parse_step() {
    let header = HeaderRecord::parse(
        BORDER_CHAR_MINOR,
        "Starting Step 2 for login: submit the form\nExpect: the form is accepted",
    )
    .unwrap();
    assert_eq!(
        header.identity,
        HeaderIdentity::Step {
            number: 2,
            test_case: String::from("login"),
            action: String::from("submit the form"),
            expected: String::from("the form is accepted"),
        }
    );
    assert_eq!(header.kind(), RecordKind::StepHeader);
    assert_eq!(header.identity.to_string(), "Step 2: submit the form");
}

#[test]
fn test_HeaderRecord_parse_general() {
    let header = HeaderRecord::parse(BORDER_CHAR_MAJOR, "Collecting environment").unwrap();
    assert_eq!(
        header.identity,
        HeaderIdentity::General {
            description: String::from("Collecting environment"),
        }
    );
    assert_eq!(header.kind(), RecordKind::GeneralHeader);
}

#[test_case(BORDER_CHAR_MAJOR, "Test Suite: garbage"; "suite prefix bad grammar")]
#[test_case(BORDER_CHAR_MAJOR, "Test Case 1: Starting Lunch of login"; "testcase bad phase")]
#[test_case(BORDER_CHAR_MINOR, "Starting Step 1 for login: act"; "step missing expect")]
#[test_case(BORDER_CHAR_MINOR, "just text"; "step bad grammar")]
#[test_case('*', "Test Suite: Starting Setup of x"; "bad border")]
fn test_HeaderRecord_parse_invalid(
    border: char,
    description: &str,
) {
    match HeaderRecord::parse(border, description) {
        Err(VlogError::InvalidHeader(desc)) => assert_eq!(desc, description),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_HeaderRecord_display_lines() {
    let header = HeaderRecord::parse(
        BORDER_CHAR_MINOR,
        "Starting Step 1 for login: open\nExpect: opened",
    )
    .unwrap();
    assert_eq!(
        header.display_lines(),
        vec![
            border_minor(),
            String::from("Starting Step 1 for login: open"),
            String::from("Expect: opened"),
            border_minor(),
        ]
    );
    let header = HeaderRecord::parse(BORDER_CHAR_MAJOR, "Collecting environment").unwrap();
    assert_eq!(
        header.display_lines(),
        vec![border_major(), String::from("Collecting environment"), border_major()]
    );
}

#[test]
fn test_HeaderRecord_new_root() {
    let root = HeaderRecord::new_root();
    assert_eq!(root.identity, HeaderIdentity::Root);
    assert_eq!(root.identity.to_string(), "Run");
    assert_eq!(root.kind(), RecordKind::GeneralHeader);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_Record_kind() {
    let standard = Record::Standard(StandardRecord::parse(LINE_ERROR).unwrap());
    assert_eq!(standard.kind(), Some(RecordKind::Error));
    assert!(standard.accepts_traceback());
    assert!(standard.timestamp().is_some());
    let info = Record::Standard(StandardRecord::parse(LINE_INFO).unwrap());
    assert!(!info.accepts_traceback());
    assert_eq!(Record::Other(String::from("x")).kind(), Some(RecordKind::Other));
    assert_eq!(Record::Blank.kind(), None);
    assert!(Record::Blank.timestamp().is_none());
    let header = Record::Header(HeaderRecord::new_root());
    assert!(header.is_header());
    assert_eq!(
        Record::Traceback(TracebackRecord::new(Vec::new(), String::new())).kind(),
        Some(RecordKind::Traceback)
    );
}
