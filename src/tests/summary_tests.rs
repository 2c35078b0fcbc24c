// src/tests/summary_tests.rs

//! tests for `src/printer/summary.rs`

#![allow(non_snake_case)]

use crate::common::{VlogError, BORDER_CHAR_MAJOR};
use crate::data::fields::{RecordKind, Timestamp};
use crate::data::patterns::border_line;
use crate::data::record::{HeaderRecord, StandardRecord};
use crate::printer::summary::{
    render_summary,
    runtime_string,
    status_string,
    SummaryLine,
    SummaryStyle,
    SUMMARY_RULE_LEN,
    SUMMARY_TITLE,
};
use crate::readers::summarytree::{SummaryTree, NODE_ROOT};
use crate::tests::common::standard_line;

#[allow(unused_imports)]
use ::si_trace_print::printers::{defn, defo, defx};

fn ts(time: &str) -> Timestamp {
    Timestamp::parse(format!("2017-10-30 {}", time).as_str()).unwrap()
}

fn tree_one_suite(with_error: bool) -> SummaryTree {
    let mut tree = SummaryTree::new();
    tree.add_header(HeaderRecord::parse(BORDER_CHAR_MAJOR, "Test Suite: Starting Setup of TsLogin").unwrap());
    tree.observe_timestamp(&ts("10:00:00.000000"));
    if with_error {
        let err = StandardRecord::parse(standard_line("10:00:01.250000", "ERROR", "boom").as_str()).unwrap();
        tree.observe_timestamp(&err.timestamp);
        tree.attach_error(err);
    }
    tree.observe_timestamp(&ts("10:00:02.500000"));
    tree.complete();

    tree
}

fn rule(indent: usize) -> String {
    format!("{}{}", " ".repeat(indent), "-".repeat(SUMMARY_RULE_LEN - indent))
}

#[test]
fn test_runtime_string() {
    let tree = tree_one_suite(false);
    assert_eq!(runtime_string(&tree, NODE_ROOT).unwrap(), "Runtime: 00:00:02.500000");
}

#[test]
fn test_runtime_string_incomplete() {
    let mut tree = SummaryTree::new();
    tree.complete();
    match runtime_string(&tree, NODE_ROOT) {
        Err(VlogError::SummaryIncomplete(node)) => assert_eq!(node, "Run"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_status_string() {
    let tree = tree_one_suite(false);
    assert_eq!(status_string(&tree, NODE_ROOT), "Status: Passed");
    let tree = tree_one_suite(true);
    assert_eq!(status_string(&tree, NODE_ROOT), "Status: Failed at 2017-10-30 10:00:01.250000");
}

#[test]
fn test_render_summary() {
    let tree = tree_one_suite(true);
    let lines: Vec<SummaryLine> = render_summary(&tree);
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    let rule0 = rule(0);
    let rule2 = rule(2);
    let border = border_line(BORDER_CHAR_MAJOR);
    assert_eq!(
        texts,
        vec![
            border.as_str(),
            SUMMARY_TITLE,
            border.as_str(),
            "Run",
            "  Runtime: 00:00:02.500000",
            "  Status: Failed at 2017-10-30 10:00:01.250000",
            rule0.as_str(),
            "  Test Suite TsLogin (Setup)",
            "    Runtime: 00:00:02.500000",
            "    Status: Failed at 2017-10-30 10:00:01.250000",
            rule2.as_str(),
        ]
    );
    assert_eq!(lines[3].style, SummaryStyle::Identity(RecordKind::GeneralHeader));
    assert_eq!(lines[5].style, SummaryStyle::Failed);
    assert_eq!(lines[7].style, SummaryStyle::Identity(RecordKind::SuiteHeader));
}

#[test]
fn test_render_summary_passed() {
    let tree = tree_one_suite(false);
    let lines = render_summary(&tree);
    assert_eq!(lines[5].text, "  Status: Passed");
    assert_eq!(lines[5].style, SummaryStyle::Passed);
    assert_eq!(lines[4].style, SummaryStyle::Runtime);
}

#[test]
fn test_render_summary_incomplete() {
    let mut tree = SummaryTree::new();
    tree.complete();
    let lines = render_summary(&tree);
    assert_eq!(lines.len(), 3 + 4);
    assert_eq!(lines[4].text, "  WARNING: summary incomplete for \"Run\"");
    assert_eq!(lines[4].style, SummaryStyle::Warning);
}
