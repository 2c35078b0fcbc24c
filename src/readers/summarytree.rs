// src/readers/summarytree.rs

//! Implements a [`SummaryTree`], the hierarchy of headers of a run
//! (general → suite → test case → step) with per-node start time, end time,
//! and pass/fail status.
//!
//! Nodes are stored in an arena and identified by a stable [`NodeId`]. A
//! node is always inserted after its parent so arena order is parent-first.

use crate::common::Count;
use crate::data::fields::{RecordKind, Timestamp};
use crate::data::record::{HeaderIdentity, HeaderRecord, StandardRecord, Status};

use ::more_asserts::{debug_assert_ge, debug_assert_lt};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Stable handle of a [`HeaderNode`] within its [`SummaryTree`].
pub type NodeId = usize;

/// [`NodeId`] of the synthetic root.
pub const NODE_ROOT: NodeId = 0;

/// A [`HeaderRecord`] placed in the tree.
#[derive(Clone, Debug)]
pub struct HeaderNode {
    pub header: HeaderRecord,
    /// `None` only for the root
    pub parent: Option<NodeId>,
    /// in arrival order
    pub children: Vec<NodeId>,
    /// root is depth `0`
    pub depth: usize,
}

impl HeaderNode {
    pub const fn kind(&self) -> RecordKind {
        self.header.kind()
    }
}

/// Tree of header nodes of one run.
///
/// Start times are absorbed live as timestamps are observed. End times are
/// computed once by [`complete`](SummaryTree::complete) at stream end.
#[derive(Debug)]
pub struct SummaryTree {
    nodes: Vec<HeaderNode>,
    current_general: NodeId,
    current_suite: Option<NodeId>,
    current_testcase: Option<NodeId>,
    current_step: Option<NodeId>,
    /// nodes waiting for the next observed timestamp
    pending_start: Vec<NodeId>,
    first_timestamp: Option<Timestamp>,
    last_timestamp: Option<Timestamp>,
    completed: bool,
    /// count of errors attached
    pub(crate) count_errors: Count,
}

impl Default for SummaryTree {
    fn default() -> Self {
        SummaryTree::new()
    }
}

impl SummaryTree {
    pub fn new() -> SummaryTree {
        let root = HeaderNode {
            header: HeaderRecord::new_root(),
            parent: None,
            children: Vec::new(),
            depth: 0,
        };
        SummaryTree {
            nodes: vec![root],
            current_general: NODE_ROOT,
            current_suite: None,
            current_testcase: None,
            current_step: None,
            pending_start: Vec::new(),
            first_timestamp: None,
            last_timestamp: None,
            completed: false,
            count_errors: 0,
        }
    }

    /// Place `header` by its kind and return its handle.
    ///
    /// * a general header is a child of the root
    /// * a suite header is a child of the current general header
    /// * a test case header is a child of the current suite
    /// * a step header is a child of the current test case
    ///
    /// If the expected parent does not exist the nearest existing ancestor
    /// position is used.
    pub fn add_header(
        &mut self,
        header: HeaderRecord,
    ) -> NodeId {
        defn!("{:?}", header.identity);
        let kind: RecordKind = header.kind();
        let parent: NodeId = match kind {
            RecordKind::SuiteHeader => self.current_general,
            RecordKind::TestCaseHeader => self.current_suite.unwrap_or(self.current_general),
            RecordKind::StepHeader => self
                .current_testcase
                .or(self.current_suite)
                .unwrap_or(self.current_general),
            _ => NODE_ROOT,
        };
        let id: NodeId = self.nodes.len();
        let depth: usize = self.nodes[parent].depth + 1;
        self.nodes.push(HeaderNode {
            header,
            parent: Some(parent),
            children: Vec::new(),
            depth,
        });
        self.nodes[parent].children.push(id);

        match kind {
            RecordKind::SuiteHeader => {
                self.current_suite = Some(id);
                self.current_testcase = None;
                self.current_step = None;
            }
            RecordKind::TestCaseHeader => {
                self.current_testcase = Some(id);
                self.current_step = None;
            }
            RecordKind::StepHeader => {
                self.current_step = Some(id);
            }
            _ => {
                self.current_general = id;
                self.current_suite = None;
                self.current_testcase = None;
                self.current_step = None;
            }
        }

        // a header of equal or higher rank ends the wait of pending nodes
        let rank: u8 = kind.header_rank().unwrap_or(0);
        let nodes = &self.nodes;
        self.pending_start.retain(|pid| nodes[*pid].kind().header_rank().unwrap_or(0) > rank);
        self.pending_start.push(id);
        defx!("id {} parent {} pending {:?}", id, parent, self.pending_start);

        id
    }

    /// Observe the timestamp of a record, in stream order.
    pub fn observe_timestamp(
        &mut self,
        timestamp: &Timestamp,
    ) {
        if self.first_timestamp.is_none() {
            defñ!("first timestamp {}", timestamp);
            self.first_timestamp = Some(*timestamp);
            self.nodes[NODE_ROOT].header.start_time = Some(*timestamp);
        }
        self.last_timestamp = Some(*timestamp);
        for id in self.pending_start.drain(..) {
            defñ!("start_time of {} is {}", id, timestamp);
            self.nodes[id].header.start_time = Some(*timestamp);
        }
    }

    /// The deepest currently open node.
    pub fn deepest_open(&self) -> NodeId {
        self.current_step
            .or(self.current_testcase)
            .or(self.current_suite)
            .unwrap_or(self.current_general)
    }

    /// Attach an `Error` record to the deepest open node. That node and all
    /// its ancestors are `Failed`.
    pub fn attach_error(
        &mut self,
        record: StandardRecord,
    ) {
        let mut id: NodeId = self.deepest_open();
        defñ!("attach error at {} to node {}", record.timestamp, id);
        self.nodes[id].header.errors.push(record);
        self.count_errors += 1;
        loop {
            self.nodes[id].header.status = Status::Failed;
            match self.nodes[id].parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
    }

    /// Compute end times. Call once after the stream ended.
    ///
    /// The root ends at the last observed timestamp. Every other node ends
    /// at the start of its next sibling, else at the end of its parent.
    /// An end time is never before its start time.
    pub fn complete(&mut self) {
        defn!("{} nodes", self.nodes.len());
        self.nodes[NODE_ROOT].header.end_time = self.last_timestamp;
        // arena order is parent-first so a parent's end is final before any
        // child reads it
        for id in 1..self.nodes.len() {
            let parent: NodeId = match self.nodes[id].parent {
                Some(val) => val,
                None => continue,
            };
            debug_assert_lt!(parent, id, "parent must precede its child");
            let siblings: &Vec<NodeId> = &self.nodes[parent].children;
            let next_start: Option<Timestamp> = siblings
                .iter()
                .position(|sid| *sid == id)
                .and_then(|at| siblings.get(at + 1))
                .and_then(|sid| self.nodes[*sid].header.start_time);
            let mut end: Option<Timestamp> = next_start.or(self.nodes[parent].header.end_time);
            if let (Some(start), Some(end_)) = (self.nodes[id].header.start_time, end) {
                if end_ < start {
                    end = Some(start);
                }
            }
            if let (Some(start), Some(end_)) = (self.nodes[id].header.start_time, end) {
                debug_assert_ge!(end_, start, "node {} ends before it starts", id);
            }
            self.nodes[id].header.end_time = end;
        }
        self.completed = true;
        defx!();
    }

    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Count of nodes, the synthetic root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always has its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn node(
        &self,
        id: NodeId,
    ) -> &HeaderNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[HeaderNode] {
        self.nodes.as_slice()
    }

    pub fn root(&self) -> &HeaderNode {
        &self.nodes[NODE_ROOT]
    }

    pub const fn first_timestamp(&self) -> Option<&Timestamp> {
        self.first_timestamp.as_ref()
    }

    pub const fn last_timestamp(&self) -> Option<&Timestamp> {
        self.last_timestamp.as_ref()
    }

    /// The current test case, if one is open.
    pub fn current_testcase(&self) -> Option<&HeaderRecord> {
        self.current_testcase
            .map(|id| &self.nodes[id].header)
    }

    /// The current step, if one is open.
    pub fn current_step(&self) -> Option<&HeaderRecord> {
        self.current_step
            .map(|id| &self.nodes[id].header)
    }

    /// Node ids in depth-first pre-order, root first.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order: Vec<NodeId> = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = vec![NODE_ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            for child in self.nodes[id].children.iter().rev() {
                stack.push(*child);
            }
        }
        debug_assert_eq!(order.len(), self.nodes.len());

        order
    }

    /// Timestamps of the errors attached to `id` and all its descendants,
    /// in time order.
    pub fn failed_at(
        &self,
        id: NodeId,
    ) -> Vec<Timestamp> {
        let mut times: Vec<Timestamp> = Vec::new();
        let mut stack: Vec<NodeId> = vec![id];
        while let Some(nid) = stack.pop() {
            times.extend(self.nodes[nid].header.errors.iter().map(|e| e.timestamp));
            stack.extend(self.nodes[nid].children.iter());
        }
        times.sort();

        times
    }

    /// The first node whose identity equals `identity`.
    pub fn find(
        &self,
        identity: &HeaderIdentity,
    ) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| &node.header.identity == identity)
    }
}
