// src/tests/config_tests.rs

//! tests for `src/config/mod.rs` and `src/config/ini.rs`

#![allow(non_snake_case)]

use crate::common::{FPath, VlogError};
use crate::config::ini::{load, parse, parse_bool, parse_max_line_len, CONFIG_NAME};
use crate::config::{Config, Credentials, MAX_LINE_LEN_DEFAULT, MAX_LINE_LEN_MIN};
use crate::data::fields::{FieldKind, FieldSet, KindSet, RecordKind};

use std::io::Write;

#[allow(unused_imports)]
use ::si_trace_print::printers::{defn, defo, defx};
use ::test_case::test_case;

const INI_FULL: &str = "\
# vlp configuration
[AT2 LOG CREDENTIALS]
username = tester
password = hunter2
fetch-task-instance-script-path = /opt/fetch.sh

[DISPLAY LOG TYPES]
debug = false
info = yes
other = 0
step_header = no

[DISPLAY FIELDS]
thread = False
source: f

[GENERAL]
; comment
condense_line = True
shorten_fields = 1
display_summary = no
max_line_len = 120
use_colors = n
format_api = t
";

#[test]
fn test_Config_default() {
    let config = Config::default();
    assert_eq!(config.kinds, KindSet::all());
    assert_eq!(config.fields, FieldSet::all());
    assert!(config.use_colors);
    assert!(config.display_summary);
    assert!(!config.use_unformatted);
    assert_eq!(config.max_line_len, MAX_LINE_LEN_DEFAULT);
    let plain = Config::plain();
    assert!(!plain.use_colors);
    assert!(!plain.display_summary);
}

#[test]
fn test_Config_clip_width() {
    let mut config = Config::default();
    config.max_line_len = 5;
    assert_eq!(config.clip_width(), MAX_LINE_LEN_MIN);
    config.max_line_len = 100;
    assert_eq!(config.clip_width(), 100);
}

#[test]
fn test_Credentials_debug_hides_password() {
    let credentials = Credentials {
        username: Some(String::from("tester")),
        password: Some(String::from("hunter2")),
        fetch_script_path: None,
    };
    let s = format!("{:?}", credentials);
    assert!(s.contains("tester"));
    assert!(!s.contains("hunter2"));
}

#[test_case("true", true; "lower true")]
#[test_case("TRUE", true; "upper true")]
#[test_case("yes", true; "yes")]
#[test_case("t", true; "t")]
#[test_case("Y", true; "upper y")]
#[test_case("1", true; "one")]
#[test_case(" yes ", true; "padded")]
#[test_case("false", false; "false")]
#[test_case("no", false; "no")]
#[test_case("0", false; "zero")]
#[test_case("", false; "empty")]
#[test_case("enabled", false; "other word")]
fn test_parse_bool(
    value: &str,
    expect: bool,
) {
    assert_eq!(parse_bool(value), expect);
}

#[test]
fn test_parse_full() {
    let config = parse(INI_FULL).unwrap();
    assert_eq!(config.credentials.username.as_deref(), Some("tester"));
    assert_eq!(config.credentials.password.as_deref(), Some("hunter2"));
    assert_eq!(config.credentials.fetch_script_path.as_deref(), Some("/opt/fetch.sh"));
    assert!(!config.kinds.contains(RecordKind::Debug));
    assert!(config.kinds.contains(RecordKind::Info));
    assert!(!config.kinds.contains(RecordKind::Other));
    assert!(!config.kinds.contains(RecordKind::StepHeader));
    assert!(config.kinds.contains(RecordKind::Error));
    assert!(!config.fields.contains(FieldKind::Thread));
    assert!(!config.fields.contains(FieldKind::Source));
    assert!(config.fields.contains(FieldKind::Details));
    assert!(config.condense_line);
    assert!(config.shorten_fields);
    assert!(!config.display_summary);
    assert!(!config.use_colors);
    assert!(config.format_api);
    assert_eq!(config.max_line_len, 120);
}

#[test]
fn test_parse_empty() {
    assert_eq!(parse("").unwrap(), Config::default());
}

#[test]
fn test_parse_unknown_ignored() {
    let text = "[NOPE]\na = b\n[GENERAL]\nnot_a_key = 1\nnot a pair\n[DISPLAY FIELDS]\nzone = false\n";
    assert_eq!(parse(text).unwrap(), Config::default());
}

#[test]
fn test_parse_use_defaults() {
    let text = format!("{}use_defaults = yes\n", INI_FULL);
    let config = parse(text.as_str()).unwrap();
    let expect = Config {
        credentials: config.credentials.clone(),
        ..Config::default()
    };
    assert_eq!(config, expect);
    assert_eq!(config.credentials.username.as_deref(), Some("tester"));
}

#[test_case("10"; "too small")]
#[test_case("wide"; "not a number")]
#[test_case("-80"; "negative")]
fn test_parse_max_line_len_invalid(value: &str) {
    match parse_max_line_len(value) {
        Err(VlogError::Config(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
    let text = format!("[GENERAL]\nmax_line_len = {}\n", value);
    assert!(parse(text.as_str()).is_err());
}

#[test]
fn test_parse_max_line_len() {
    assert_eq!(parse_max_line_len("20").unwrap(), 20);
    assert_eq!(parse_max_line_len(" 200 ").unwrap(), 200);
}

#[test]
fn test_load_missing_file() {
    let dir = ::tempfile::tempdir().unwrap();
    let path: FPath = dir.path().join(CONFIG_NAME).to_string_lossy().into_owned();
    assert_eq!(load(&path).unwrap(), Config::default());
}

#[test]
fn test_load_file() {
    let mut tmp = ::tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(b"[GENERAL]\nuse_unformatted = yes\n").unwrap();
    tmp.flush().unwrap();
    let path: FPath = tmp.path().to_string_lossy().into_owned();
    let config = load(&path).unwrap();
    assert!(config.use_unformatted);
}

#[test]
fn test_load_directory() {
    let dir = ::tempfile::tempdir().unwrap();
    let path: FPath = dir.path().to_string_lossy().into_owned();
    match load(&path) {
        Err(VlogError::Config(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}
