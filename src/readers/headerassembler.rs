// src/readers/headerassembler.rs

//! Implements a [`HeaderAssembler`], the state machine that reassembles a
//! [`HeaderRecord`] from a border, a description, and a closing border.

use crate::common::{Count, VlogError};
use crate::data::patterns::{border_char, border_line};
use crate::data::record::HeaderRecord;
use crate::debug::printers::de_wrn;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Most description lines a header may have; a step header has two.
pub const HEADER_DESCRIPTION_LINES_MAX: usize = 2;

/// State of a [`HeaderAssembler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderState {
    Idle,
    /// An opening border of this character was seen.
    AwaitingDescription(char),
}

/// Result of [`HeaderAssembler::offer`].
#[derive(Debug, PartialEq, Eq)]
pub enum HeaderOutcome {
    /// The line is not part of a header; classify it normally.
    Passthrough,
    /// The line was absorbed into a pending header.
    Consumed,
    /// The closing border completed a header.
    Complete(HeaderRecord),
    /// The border-wrapped description did not match any header grammar.
    /// These raw lines (borders included) are to be emitted as `Other`.
    Invalid(Vec<String>),
    /// The pending header was abandoned. These raw lines are to be emitted
    /// as `Other`. If `consumed` then the current line opened a new header,
    /// else the current line is to be classified normally.
    Aborted {
        lines: Vec<String>,
        consumed: bool,
    },
}

/// Reassembles headers across the border, description, border triple.
///
/// Blank lines are not offered; they pass around the assembler.
#[derive(Debug)]
pub struct HeaderAssembler {
    state: HeaderState,
    /// description lines collected since the opening border
    description: Vec<String>,
    /// count of headers completed
    pub(crate) count_complete: Count,
    /// count of border-wrapped descriptions that failed to parse
    pub(crate) count_invalid: Count,
}

impl Default for HeaderAssembler {
    fn default() -> Self {
        HeaderAssembler::new()
    }
}

impl HeaderAssembler {
    pub fn new() -> HeaderAssembler {
        HeaderAssembler {
            state: HeaderState::Idle,
            description: Vec::with_capacity(HEADER_DESCRIPTION_LINES_MAX),
            count_complete: 0,
            count_invalid: 0,
        }
    }

    pub const fn state(&self) -> HeaderState {
        self.state
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.state, HeaderState::AwaitingDescription(_))
    }

    /// The pending raw lines, opening border first.
    fn pending_lines(
        &mut self,
        c: char,
    ) -> Vec<String> {
        let mut lines: Vec<String> = Vec::with_capacity(self.description.len() + 1);
        lines.push(border_line(c));
        lines.append(&mut self.description);

        lines
    }

    /// Offer the next non-blank raw line.
    pub fn offer(
        &mut self,
        line: &str,
    ) -> HeaderOutcome {
        defn!("{:?}", self.state);
        let border: Option<char> = border_char(line);
        let outcome = match (self.state, border) {
            (HeaderState::Idle, None) => HeaderOutcome::Passthrough,
            (HeaderState::Idle, Some(c)) => {
                self.state = HeaderState::AwaitingDescription(c);
                HeaderOutcome::Consumed
            }
            (HeaderState::AwaitingDescription(c), Some(c_))
                if c == c_ && !self.description.is_empty() =>
            {
                self.state = HeaderState::Idle;
                let description: String = self.description.join("\n");
                match HeaderRecord::parse(c, description.as_str()) {
                    Ok(header) => {
                        self.description.clear();
                        self.count_complete += 1;
                        HeaderOutcome::Complete(header)
                    }
                    Err(VlogError::InvalidHeader(_desc)) => {
                        de_wrn!("invalid header description {:?}", _desc);
                        self.count_invalid += 1;
                        let mut lines = self.pending_lines(c);
                        lines.push(border_line(c));
                        HeaderOutcome::Invalid(lines)
                    }
                    Err(_err) => {
                        de_wrn!("unexpected error {}", _err);
                        self.count_invalid += 1;
                        let mut lines = self.pending_lines(c);
                        lines.push(border_line(c));
                        HeaderOutcome::Invalid(lines)
                    }
                }
            }
            (HeaderState::AwaitingDescription(c), Some(c_)) => {
                // an empty description or a mismatched border; the prior
                // opening border was not a header, this one may be
                let lines = self.pending_lines(c);
                self.state = HeaderState::AwaitingDescription(c_);
                HeaderOutcome::Aborted {
                    lines,
                    consumed: true,
                }
            }
            (HeaderState::AwaitingDescription(c), None) => {
                if self.description.len() >= HEADER_DESCRIPTION_LINES_MAX {
                    let lines = self.pending_lines(c);
                    self.state = HeaderState::Idle;
                    HeaderOutcome::Aborted {
                        lines,
                        consumed: false,
                    }
                } else {
                    self.description.push(String::from(line));
                    HeaderOutcome::Consumed
                }
            }
        };
        defx!("{:?}", self.state);

        outcome
    }

    /// Stream ended; return any pending raw lines for emission as `Other`.
    pub fn close(&mut self) -> Vec<String> {
        defñ!("{:?}", self.state);
        match self.state {
            HeaderState::Idle => Vec::new(),
            HeaderState::AwaitingDescription(c) => {
                self.state = HeaderState::Idle;
                self.pending_lines(c)
            }
        }
    }
}
