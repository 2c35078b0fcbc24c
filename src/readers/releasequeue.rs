// src/readers/releasequeue.rs

//! Implements a [`ReleaseQueue`], a two-phase holding buffer of
//! [`Record`s].
//!
//! The most recently enqueued record is held as _current_; it may still be
//! changed by the line(s) that follow it. It is _released_ when the next
//! record arrives.
//!
//! Each record carries whether it was selected for display when it was
//! produced. A record attached to another shares the fate of its parent.
//!
//! [`Record`s]: crate::data::record::Record

use crate::data::record::Record;

use std::collections::VecDeque;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Was the record selected for display when it was produced?
pub type Selected = bool;

/// A queued [`Record`] and its selection.
pub type QueuedRecord = (Record, Selected);

/// Two-phase release of [`Record`]s.
///
/// * at most one _current_ record exists
/// * [`dequeue`] never returns the current record
/// * after [`flush`] the queue is empty
///
/// [`dequeue`]: ReleaseQueue::dequeue
/// [`flush`]: ReleaseQueue::flush
#[derive(Debug, Default)]
pub struct ReleaseQueue {
    released: VecDeque<QueuedRecord>,
    current: Option<QueuedRecord>,
    hold: bool,
}

impl ReleaseQueue {
    pub fn new() -> ReleaseQueue {
        ReleaseQueue::default()
    }

    /// Enqueue `record` as the new current record, releasing the prior
    /// current record.
    ///
    /// A `Traceback` that follows a Standard `Error` or `Warning` is attached
    /// to that record instead.
    pub fn enqueue(
        &mut self,
        record: Record,
        selected: Selected,
    ) {
        defn!("{:?}", record.kind());
        if let Some(current) = self.current.take() {
            self.released.push_back(current);
        }
        if matches!(record, Record::Traceback(_)) {
            if let Some((Record::Standard(standard), _)) = self.released.back_mut() {
                if standard.kind.accepts_traceback() {
                    standard.attach(record);
                    defx!("attached to released tail");
                    return;
                }
            }
        }
        self.current = Some((record, selected));
        defx!("released {}", self.released.len());
    }

    /// Remove and return the released records, oldest first.
    ///
    /// Returns nothing while the hold flag is set.
    pub fn dequeue(&mut self) -> Vec<QueuedRecord> {
        if self.hold {
            defñ!("hold; released {}", self.released.len());
            return Vec::new();
        }
        defñ!("released {}", self.released.len());

        self.released.drain(..).collect()
    }

    /// Remove and return every record, current record last. Resets all
    /// state.
    pub fn flush(&mut self) -> Vec<QueuedRecord> {
        defñ!("released {} current {}", self.released.len(), self.current.is_some());
        let mut records: Vec<QueuedRecord> = self.released.drain(..).collect();
        if let Some(current) = self.current.take() {
            records.push(current);
        }
        self.hold = false;

        records
    }

    pub fn set_hold(
        &mut self,
        hold: bool,
    ) {
        defñ!("{}", hold);
        self.hold = hold;
    }

    pub const fn is_held(&self) -> bool {
        self.hold
    }

    pub fn current(&self) -> Option<&Record> {
        self.current.as_ref().map(|(record, _)| record)
    }

    /// Count of released records waiting for [`dequeue`](ReleaseQueue::dequeue).
    pub fn len_released(&self) -> usize {
        self.released.len()
    }

    pub fn is_empty(&self) -> bool {
        self.released.is_empty() && self.current.is_none()
    }
}
