// src/tests/summarytree_tests.rs

//! tests for `src/readers/summarytree.rs`

#![allow(non_snake_case)]

use crate::common::{BORDER_CHAR_MAJOR, BORDER_CHAR_MINOR};
use crate::data::fields::{duration_to_string, Timestamp};
use crate::data::record::{HeaderIdentity, HeaderRecord, Phase, StandardRecord, Status};
use crate::readers::summarytree::{NodeId, SummaryTree, NODE_ROOT};
use crate::tests::common::standard_line;

use ::more_asserts::assert_ge;
#[allow(unused_imports)]
use ::si_trace_print::printers::{defn, defo, defx};

fn suite(name: &str) -> HeaderRecord {
    HeaderRecord::parse(BORDER_CHAR_MAJOR, format!("Test Suite: Starting Test of {}", name).as_str()).unwrap()
}

fn testcase(
    number: u32,
    name: &str,
) -> HeaderRecord {
    HeaderRecord::parse(
        BORDER_CHAR_MAJOR,
        format!("Test Case {}: Starting Test of {}", number, name).as_str(),
    )
    .unwrap()
}

fn step(
    number: u32,
    testcase: &str,
) -> HeaderRecord {
    HeaderRecord::parse(
        BORDER_CHAR_MINOR,
        format!("Starting Step {} for {}: act\nExpect: done", number, testcase).as_str(),
    )
    .unwrap()
}

fn general(description: &str) -> HeaderRecord {
    HeaderRecord::parse(BORDER_CHAR_MAJOR, description).unwrap()
}

fn ts(time: &str) -> Timestamp {
    Timestamp::parse(format!("2017-10-30 {}", time).as_str()).unwrap()
}

fn error(time: &str) -> StandardRecord {
    StandardRecord::parse(standard_line(time, "ERROR", "failed").as_str()).unwrap()
}

fn runtime(
    tree: &SummaryTree,
    id: NodeId,
) -> String {
    let header = &tree.node(id).header;
    duration_to_string(&header.end_time.unwrap().since(&header.start_time.unwrap()))
}

/// A suite with two test cases; an error in the second.
///
/// ```text
/// 10:00:00  suite
/// 10:00:01  tc1
/// 10:00:02
/// 10:00:05  tc2
/// 10:00:06  ERROR
/// ```
fn tree_suite_two_testcases() -> (SummaryTree, NodeId, NodeId, NodeId) {
    let mut tree = SummaryTree::new();
    let id_suite = tree.add_header(suite("TsLogin"));
    tree.observe_timestamp(&ts("10:00:00.000000"));
    let id_tc1 = tree.add_header(testcase(1, "login"));
    tree.observe_timestamp(&ts("10:00:01.000000"));
    tree.observe_timestamp(&ts("10:00:02.000000"));
    let id_tc2 = tree.add_header(testcase(2, "logout"));
    tree.observe_timestamp(&ts("10:00:05.000000"));
    let err = error("10:00:06.000000");
    tree.observe_timestamp(&err.timestamp);
    tree.attach_error(err);
    tree.complete();

    (tree, id_suite, id_tc1, id_tc2)
}

#[test]
fn test_SummaryTree_new() {
    let tree = SummaryTree::new();
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert_eq!(tree.root().header.identity, HeaderIdentity::Root);
    assert_eq!(tree.root().depth, 0);
    assert!(tree.current_testcase().is_none());
    assert!(tree.current_step().is_none());
    assert_eq!(tree.deepest_open(), NODE_ROOT);
}

#[test]
fn test_SummaryTree_structure() {
    let (tree, id_suite, id_tc1, id_tc2) = tree_suite_two_testcases();
    // one node per header plus the root
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.node(id_suite).parent, Some(NODE_ROOT));
    assert_eq!(tree.node(id_tc1).parent, Some(id_suite));
    assert_eq!(tree.node(id_tc2).parent, Some(id_suite));
    assert_eq!(tree.node(id_suite).children, vec![id_tc1, id_tc2]);
    assert_eq!(tree.node(id_tc2).depth, 2);
    assert_eq!(tree.walk(), vec![NODE_ROOT, id_suite, id_tc1, id_tc2]);
    assert!(tree.is_completed());
}

#[test]
fn test_SummaryTree_times() {
    let (tree, id_suite, id_tc1, id_tc2) = tree_suite_two_testcases();
    assert_eq!(tree.first_timestamp(), Some(&ts("10:00:00.000000")));
    assert_eq!(tree.last_timestamp(), Some(&ts("10:00:06.000000")));
    assert_eq!(runtime(&tree, NODE_ROOT), "00:00:06.000000");
    assert_eq!(runtime(&tree, id_suite), "00:00:06.000000");
    assert_eq!(tree.node(id_tc1).header.start_time, Some(ts("10:00:01.000000")));
    assert_eq!(tree.node(id_tc1).header.end_time, Some(ts("10:00:05.000000")));
    assert_eq!(runtime(&tree, id_tc1), "00:00:04.000000");
    assert_eq!(runtime(&tree, id_tc2), "00:00:01.000000");
    for node in tree.nodes() {
        assert_ge!(node.header.end_time, node.header.start_time);
    }
}

#[test]
fn test_SummaryTree_clock_backwards() {
    let mut tree = SummaryTree::new();
    let id_suite = tree.add_header(suite("TsClock"));
    tree.observe_timestamp(&ts("10:00:05.000000"));
    let id_tc1 = tree.add_header(testcase(1, "TcA"));
    tree.observe_timestamp(&ts("10:00:10.000000"));
    let id_tc2 = tree.add_header(testcase(2, "TcB"));
    tree.observe_timestamp(&ts("10:00:02.000000"));
    tree.complete();
    // the next sibling starts earlier; the end is clamped to the start
    assert_eq!(tree.node(id_tc1).header.end_time, Some(ts("10:00:10.000000")));
    assert_eq!(runtime(&tree, id_tc1), "00:00:00.000000");
    assert_eq!(tree.node(id_suite).header.end_time, Some(ts("10:00:05.000000")));
    assert_eq!(tree.node(id_tc2).header.end_time, Some(ts("10:00:05.000000")));
    for id in 1..tree.len() {
        let header = &tree.node(id).header;
        assert_ge!(header.end_time.unwrap(), header.start_time.unwrap());
    }
}

#[test]
fn test_SummaryTree_status() {
    let (tree, id_suite, id_tc1, id_tc2) = tree_suite_two_testcases();
    assert_eq!(tree.node(id_tc2).header.status, Status::Failed);
    assert_eq!(tree.node(id_suite).header.status, Status::Failed);
    assert_eq!(tree.root().header.status, Status::Failed);
    assert_eq!(tree.node(id_tc1).header.status, Status::Passed);
    assert_eq!(tree.node(id_tc2).header.errors.len(), 1);
    assert_eq!(tree.failed_at(NODE_ROOT), vec![ts("10:00:06.000000")]);
    assert!(tree.failed_at(id_tc1).is_empty());
    assert_eq!(tree.count_errors, 1);
}

#[test]
fn test_SummaryTree_steps() {
    let mut tree = SummaryTree::new();
    let id_tc = tree.add_header(testcase(1, "login"));
    tree.observe_timestamp(&ts("10:00:00.000000"));
    let id_s1 = tree.add_header(step(1, "login"));
    tree.observe_timestamp(&ts("10:00:01.000000"));
    let id_s2 = tree.add_header(step(2, "login"));
    tree.observe_timestamp(&ts("10:00:03.000000"));
    assert_eq!(tree.deepest_open(), id_s2);
    tree.attach_error(error("10:00:03.500000"));
    tree.observe_timestamp(&ts("10:00:04.000000"));
    tree.complete();

    // no suite; the test case hangs off the root
    assert_eq!(tree.node(id_tc).parent, Some(NODE_ROOT));
    assert_eq!(tree.node(id_s1).parent, Some(id_tc));
    assert_eq!(runtime(&tree, id_s1), "00:00:02.000000");
    assert_eq!(runtime(&tree, id_s2), "00:00:01.000000");
    assert_eq!(tree.node(id_s1).header.status, Status::Passed);
    assert_eq!(tree.node(id_s2).header.status, Status::Failed);
    assert_eq!(tree.node(id_tc).header.status, Status::Failed);
}

#[test]
fn test_SummaryTree_pending_start() {
    let mut tree = SummaryTree::new();
    // a suite and a test case with no record between them share a start
    let id_suite = tree.add_header(suite("TsA"));
    let id_tc = tree.add_header(testcase(1, "a"));
    tree.observe_timestamp(&ts("11:00:00.000000"));
    assert_eq!(tree.node(id_suite).header.start_time, Some(ts("11:00:00.000000")));
    assert_eq!(tree.node(id_tc).header.start_time, Some(ts("11:00:00.000000")));
}

#[test]
fn test_SummaryTree_pending_replaced() {
    let mut tree = SummaryTree::new();
    // a test case directly followed by another test case never started
    let id_tc1 = tree.add_header(testcase(1, "a"));
    let id_tc2 = tree.add_header(testcase(2, "b"));
    tree.observe_timestamp(&ts("11:00:00.000000"));
    tree.complete();
    assert!(tree.node(id_tc1).header.start_time.is_none());
    assert_eq!(tree.node(id_tc2).header.start_time, Some(ts("11:00:00.000000")));
}

#[test]
fn test_SummaryTree_general_resets() {
    let mut tree = SummaryTree::new();
    tree.add_header(suite("TsA"));
    tree.add_header(testcase(1, "a"));
    let id_general = tree.add_header(general("Cleaning up"));
    assert!(tree.current_testcase().is_none());
    assert_eq!(tree.deepest_open(), id_general);
    let id_suite = tree.add_header(suite("TsB"));
    assert_eq!(tree.node(id_suite).parent, Some(id_general));
}

#[test]
fn test_SummaryTree_error_before_headers() {
    let mut tree = SummaryTree::new();
    let err = error("09:00:00.000000");
    tree.observe_timestamp(&err.timestamp);
    tree.attach_error(err);
    tree.complete();
    assert_eq!(tree.root().header.status, Status::Failed);
    assert_eq!(tree.root().header.errors.len(), 1);
    assert_eq!(runtime(&tree, NODE_ROOT), "00:00:00.000000");
}

#[test]
fn test_SummaryTree_find() {
    let (tree, id_suite, _, _) = tree_suite_two_testcases();
    let identity = HeaderIdentity::Suite {
        phase: Phase::Test,
        name: String::from("TsLogin"),
    };
    assert_eq!(tree.find(&identity), Some(id_suite));
    assert_eq!(tree.find(&HeaderIdentity::Root), Some(NODE_ROOT));
    let missing = HeaderIdentity::General {
        description: String::from("nope"),
    };
    assert_eq!(tree.find(&missing), None);
}
