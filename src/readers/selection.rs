// src/readers/selection.rs

//! Implements a [`SelectionFilter`]; drop records by kind and by the current
//! (test case, step) position.

use crate::common::VlogError;
use crate::data::fields::{KindSet, RecordKind};
use crate::data::record::{HeaderIdentity, HeaderRecord};

use std::fmt;
use std::str::FromStr;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// The test case (and optionally the step) to display, from the
/// `name|number[:step]` form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub tc_name: Option<String>,
    pub tc_number: Option<u32>,
    pub step_number: Option<u32>,
}

impl Selection {
    /// Is any target set?
    pub fn is_active(&self) -> bool {
        self.tc_name.is_some() || self.tc_number.is_some()
    }
}

impl FromStr for Selection {
    type Err = VlogError;

    /// Parse `name`, `number`, `name:step`, or `number:step`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tc, step) = match s.rsplit_once(':') {
            Some((tc, step)) => (tc, Some(step)),
            None => (s, None),
        };
        if tc.is_empty() {
            return Err(VlogError::Config(format!("empty test case in selection {:?}", s)));
        }
        let step_number: Option<u32> = match step {
            Some(step) => match step.parse::<u32>() {
                Ok(val) => Some(val),
                Err(err) => {
                    return Err(VlogError::Config(format!("bad step {:?} in selection: {}", step, err)));
                }
            },
            None => None,
        };
        let selection = match tc.parse::<u32>() {
            Ok(number) => Selection {
                tc_name: None,
                tc_number: Some(number),
                step_number,
            },
            Err(_) => Selection {
                tc_name: Some(String::from(tc)),
                tc_number: None,
                step_number,
            },
        };
        defñ!("{:?}", selection);

        Ok(selection)
    }
}

impl fmt::Display for Selection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match (&self.tc_name, self.tc_number) {
            (Some(name), _) => write!(f, "{}", name)?,
            (None, Some(number)) => write!(f, "{}", number)?,
            (None, None) => write!(f, "*")?,
        }
        if let Some(step) = self.step_number {
            write!(f, ":{}", step)?;
        }

        Ok(())
    }
}

/// Combines the kind mask and the [`Selection`].
#[derive(Clone, Debug)]
pub struct SelectionFilter {
    kinds: KindSet,
    selection: Selection,
}

impl SelectionFilter {
    pub fn new(
        kinds: KindSet,
        selection: Selection,
    ) -> SelectionFilter {
        SelectionFilter { kinds, selection }
    }

    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Kind predicate. Headers always pass.
    pub fn kind_passes(
        &self,
        kind: RecordKind,
    ) -> bool {
        kind.is_header() || self.kinds.contains(kind)
    }

    /// Position predicate over the current test case and step.
    ///
    /// Call after a header record has been applied to the summary tree, so
    /// the records following a header are gated by that header.
    pub fn position_passes(
        &self,
        testcase: Option<&HeaderRecord>,
        step: Option<&HeaderRecord>,
    ) -> bool {
        if !self.selection.is_active() {
            return true;
        }
        let tc_matches: bool = match testcase.map(|h| &h.identity) {
            Some(HeaderIdentity::TestCase { number, name, .. }) => {
                let number_ok = match self.selection.tc_number {
                    Some(target) => target == *number,
                    None => true,
                };
                let name_ok = match &self.selection.tc_name {
                    Some(target) => target == name,
                    None => true,
                };
                number_ok && name_ok
            }
            _ => false,
        };
        if !tc_matches {
            return false;
        }
        match self.selection.step_number {
            None => true,
            Some(target) => matches!(
                step.map(|h| &h.identity),
                Some(HeaderIdentity::Step { number, .. }) if *number == target
            ),
        }
    }

    /// Should a record of `kind` at the current position be displayed?
    pub fn passes(
        &self,
        kind: RecordKind,
        testcase: Option<&HeaderRecord>,
        step: Option<&HeaderRecord>,
    ) -> bool {
        if kind.is_header() {
            return true;
        }

        self.kind_passes(kind) && self.position_passes(testcase, step)
    }
}
