// src/readers/tracebackassembler.rs

//! Implements a [`TracebackAssembler`], the state machine that reassembles
//! a [`TracebackRecord`] from the start marker, the inner frames, and the
//! terminal exception line.

use crate::common::Count;
use crate::data::fields::RecordKind;
use crate::data::patterns::{CGN_PREFIX, RE_TRACEBACK_EXCEPTION, RE_TRACEBACK_START};
use crate::data::record::TracebackRecord;
use crate::readers::releasequeue::ReleaseQueue;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Result of [`TracebackAssembler::offer`].
#[derive(Debug, PartialEq, Eq)]
pub enum TracebackOutcome {
    /// Not collecting and the line is not a start marker.
    Idle,
    /// The line was appended to the collecting traceback.
    Consumed,
    /// The exception line completed the traceback.
    Complete(TracebackRecord),
    /// The line does not belong to a traceback. These collected raw lines
    /// are to be emitted as `Other`, then the current line reclassified.
    Aborted(Vec<String>),
}

#[derive(Debug)]
enum State {
    Idle,
    Collecting {
        prefix: String,
        lines: Vec<String>,
    },
}

/// Reassembles multi-line tracebacks.
///
/// While collecting, the hold flag of the [`ReleaseQueue`] is asserted so no
/// record escapes until the traceback completes or aborts.
#[derive(Debug)]
pub struct TracebackAssembler {
    state: State,
    pub(crate) count_complete: Count,
    pub(crate) count_aborted: Count,
}

impl Default for TracebackAssembler {
    fn default() -> Self {
        TracebackAssembler::new()
    }
}

impl TracebackAssembler {
    pub fn new() -> TracebackAssembler {
        TracebackAssembler {
            state: State::Idle,
            count_complete: 0,
            count_aborted: 0,
        }
    }

    pub const fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting { .. })
    }

    /// Offer a non-blank raw `line` with its classification.
    pub fn offer(
        &mut self,
        line: &str,
        kind: Option<RecordKind>,
        queue: &mut ReleaseQueue,
    ) -> TracebackOutcome {
        defn!("kind {:?} collecting {}", kind, self.is_collecting());
        let outcome = match &mut self.state {
            State::Idle => {
                if kind != Some(RecordKind::Traceback) {
                    defx!("Idle");
                    return TracebackOutcome::Idle;
                }
                let prefix: String = match RE_TRACEBACK_START.captures(line) {
                    Some(captures) => match captures.name(CGN_PREFIX) {
                        Some(m) => String::from(m.as_str()),
                        None => String::new(),
                    },
                    None => {
                        // only a start marker may open a traceback
                        defx!("Idle; not a start marker");
                        return TracebackOutcome::Idle;
                    }
                };
                defo!("prefix {:?}", prefix);
                self.state = State::Collecting {
                    prefix,
                    lines: vec![String::from(line)],
                };
                queue.set_hold(true);
                TracebackOutcome::Consumed
            }
            State::Collecting { prefix, lines } => {
                let stripped: &str = line.strip_prefix(prefix.as_str()).unwrap_or(line);
                match kind {
                    Some(RecordKind::Traceback) | Some(RecordKind::Other) => {
                        lines.push(String::from(line));
                        if RE_TRACEBACK_EXCEPTION.is_match(stripped) {
                            let lines_ = std::mem::take(lines);
                            let prefix_ = std::mem::take(prefix);
                            self.state = State::Idle;
                            self.count_complete += 1;
                            queue.set_hold(false);
                            TracebackOutcome::Complete(TracebackRecord::new(lines_, prefix_))
                        } else {
                            TracebackOutcome::Consumed
                        }
                    }
                    _ => TracebackOutcome::Aborted(self.abort(queue)),
                }
            }
        };
        defx!("collecting {}", self.is_collecting());

        outcome
    }

    /// Abandon a collecting traceback, e.g. a blank line or a Standard line
    /// arrived. Returns the collected raw lines.
    pub fn abort(
        &mut self,
        queue: &mut ReleaseQueue,
    ) -> Vec<String> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => Vec::new(),
            State::Collecting { lines, .. } => {
                defñ!("aborted with {} lines", lines.len());
                self.count_aborted += 1;
                queue.set_hold(false);
                lines
            }
        }
    }

    /// Stream ended; return any dangling frames.
    pub fn close(
        &mut self,
        queue: &mut ReleaseQueue,
    ) -> Vec<String> {
        self.abort(queue)
    }
}
