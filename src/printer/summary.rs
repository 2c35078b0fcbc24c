// src/printer/summary.rs

//! Render a completed [`SummaryTree`] as an indented report.
//!
//! ```text
//! Run
//!   Runtime: 08:00:00.000000
//!   Status: Failed at 2017-10-30 19:13:32.208116
//! ----------------------------------------
//!   Test Suite TsSuite (Setup)
//!     Runtime: 07:00:00.000000
//!     Status: Failed at 2017-10-30 19:13:32.208116
//!   --------------------------------------
//! ```
//!
//! [`SummaryTree`]: crate::readers::summarytree::SummaryTree

use crate::common::{VlogError, BORDER_CHAR_MAJOR, BORDER_CHAR_MINOR};
use crate::data::fields::{duration_to_string, RecordKind, Timestamp};
use crate::data::patterns::border_line;
use crate::data::record::Status;
use crate::readers::summarytree::{NodeId, SummaryTree};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Title of the summary report.
pub const SUMMARY_TITLE: &str = "Run Summary";

/// Width of the rule after each node, before indentation.
pub const SUMMARY_RULE_LEN: usize = 40;

/// Indentation per tree depth.
pub const SUMMARY_INDENT: usize = 2;

/// How a summary line is to be colored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryStyle {
    /// the title block
    Title,
    /// a node identity line, colored as the node kind
    Identity(RecordKind),
    Runtime,
    Passed,
    Failed,
    Rule,
    /// a node is missing a start or an end time
    Warning,
}

/// One line of the summary report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryLine {
    pub text: String,
    pub style: SummaryStyle,
}

impl SummaryLine {
    fn new(
        text: String,
        style: SummaryStyle,
    ) -> SummaryLine {
        SummaryLine { text, style }
    }
}

/// `Runtime: HH:MM:SS.ffffff` of a node, or the `SummaryIncomplete` error
/// if a time is missing.
pub fn runtime_string(
    tree: &SummaryTree,
    id: NodeId,
) -> Result<String, VlogError> {
    let header = &tree.node(id).header;
    match (header.start_time, header.end_time) {
        (Some(start), Some(end)) => Ok(format!("Runtime: {}", duration_to_string(&end.since(&start)))),
        _ => Err(VlogError::SummaryIncomplete(header.identity.to_string())),
    }
}

/// `Status: Passed` or `Status: Failed at t1, t2, …` of a node.
pub fn status_string(
    tree: &SummaryTree,
    id: NodeId,
) -> String {
    match tree.node(id).header.status {
        Status::Passed => String::from("Status: Passed"),
        Status::Failed => {
            let times: Vec<String> = tree
                .failed_at(id)
                .iter()
                .map(Timestamp::to_string)
                .collect();
            format!("Status: Failed at {}", times.join(", "))
        }
    }
}

/// Render the completed `tree`, root first, depth-first.
pub fn render_summary(tree: &SummaryTree) -> Vec<SummaryLine> {
    defn!("{} nodes", tree.len());
    let mut lines: Vec<SummaryLine> = Vec::with_capacity(tree.len() * 4 + 3);
    lines.push(SummaryLine::new(border_line(BORDER_CHAR_MAJOR), SummaryStyle::Title));
    lines.push(SummaryLine::new(String::from(SUMMARY_TITLE), SummaryStyle::Title));
    lines.push(SummaryLine::new(border_line(BORDER_CHAR_MAJOR), SummaryStyle::Title));

    for id in tree.walk() {
        let node = tree.node(id);
        let indent: String = " ".repeat(node.depth * SUMMARY_INDENT);
        let indent_inner: String = " ".repeat((node.depth + 1) * SUMMARY_INDENT);
        lines.push(SummaryLine::new(
            format!("{}{}", indent, node.header.identity),
            SummaryStyle::Identity(node.kind()),
        ));
        match runtime_string(tree, id) {
            Ok(runtime) => {
                lines.push(SummaryLine::new(format!("{}{}", indent_inner, runtime), SummaryStyle::Runtime));
            }
            Err(err) => {
                defo!("{}", err);
                lines.push(SummaryLine::new(format!("{}WARNING: {}", indent_inner, err), SummaryStyle::Warning));
            }
        }
        let style = match node.header.status {
            Status::Passed => SummaryStyle::Passed,
            Status::Failed => SummaryStyle::Failed,
        };
        lines.push(SummaryLine::new(format!("{}{}", indent_inner, status_string(tree, id)), style));
        let rule: String = std::iter::repeat(BORDER_CHAR_MINOR)
            .take(SUMMARY_RULE_LEN.saturating_sub(node.depth * SUMMARY_INDENT).max(1))
            .collect();
        lines.push(SummaryLine::new(format!("{}{}", indent, rule), SummaryStyle::Rule));
    }
    defx!("{} lines", lines.len());

    lines
}
