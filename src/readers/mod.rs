// src/readers/mod.rs

//! "Readers" for _vlplib_.
//!
//! ## Overview of readers
//!
//! * A [`Pipeline`] drives a [`LineSource`] on a producer thread and a
//!   [`Formatter`] as the consumer.
//! * A `Formatter` drives a [`HeaderAssembler`], the [`classify`] function,
//!   and a [`TracebackAssembler`] to derive [`Record`s].
//! * `Record`s wait in a [`ReleaseQueue`] so the most recent record may still
//!   absorb a following traceback.
//! * Header records are placed in a [`SummaryTree`] which the
//!   [`SelectionFilter`] consults for the current test case and step.
//!
//! <br/>
//!
//! Also see [_Definitions of data_].
//!
//! [_Definitions of data_]: crate::data
//! [`Record`s]: crate::data::record::Record
//! [`Formatter`]: crate::printer::formatter::Formatter
//! [`Pipeline`]: crate::readers::pipeline::Pipeline
//! [`LineSource`]: crate::readers::source::LineSource
//! [`HeaderAssembler`]: crate::readers::headerassembler::HeaderAssembler
//! [`classify`]: crate::readers::classifier::classify
//! [`TracebackAssembler`]: crate::readers::tracebackassembler::TracebackAssembler
//! [`ReleaseQueue`]: crate::readers::releasequeue::ReleaseQueue
//! [`SummaryTree`]: crate::readers::summarytree::SummaryTree
//! [`SelectionFilter`]: crate::readers::selection::SelectionFilter

pub mod classifier;
pub mod headerassembler;
pub mod pipeline;
pub mod releasequeue;
pub mod selection;
pub mod source;
pub mod summarytree;
pub mod tracebackassembler;
