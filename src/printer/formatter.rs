// src/printer/formatter.rs

//! Implements the [`Formatter`], the consumer side of the [pipeline].
//!
//! A `Formatter` takes one raw line at a time and drives the
//! [`HeaderAssembler`], the [`classify`] function, the
//! [`TracebackAssembler`], the [`SummaryTree`], the [`SelectionFilter`], and
//! the [`ReleaseQueue`], then renders the released records to a
//! [`PrinterVlog`].
//!
//! Records are printed in the order their terminating input line was read.
//!
//! [pipeline]: crate::readers::pipeline
//! [`HeaderAssembler`]: crate::readers::headerassembler::HeaderAssembler
//! [`classify`]: crate::readers::classifier::classify
//! [`TracebackAssembler`]: crate::readers::tracebackassembler::TracebackAssembler
//! [`SummaryTree`]: crate::readers::summarytree::SummaryTree
//! [`SelectionFilter`]: crate::readers::selection::SelectionFilter
//! [`ReleaseQueue`]: crate::readers::releasequeue::ReleaseQueue
//! [`PrinterVlog`]: crate::printer::printers::PrinterVlog

use crate::common::{Count, VlogError, FIELD_SEP};
use crate::config::Config;
use crate::data::fields::{FieldKind, RecordKind};
use crate::data::patterns::{has_timestamp_prefix, is_border, RE_STANDARD};
use crate::data::record::{Record, StandardRecord};
use crate::debug::printers::de_wrn;
use crate::printer::printers::{
    color_spec_fg,
    color_spec_field,
    color_spec_kind,
    PrinterVlog,
    Segment,
    WriteColor,
    ColorSpec,
    COLOR_API,
    COLOR_FAILED,
    COLOR_LOCATION,
    COLOR_PASSED,
    COLOR_WARNING,
};
use crate::printer::summary::{render_summary, SummaryStyle};
use crate::readers::classifier::{classify, is_blank};
use crate::readers::headerassembler::{HeaderAssembler, HeaderOutcome};
use crate::readers::releasequeue::{ReleaseQueue, Selected};
use crate::readers::selection::{Selection, SelectionFilter};
use crate::readers::summarytree::SummaryTree;
use crate::readers::tracebackassembler::{TracebackAssembler, TracebackOutcome};

use std::io::Result;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::unicode_width::UnicodeWidthChar;

/// Characters of a bracketed structure kept when a clip is widened.
pub const CLIP_STRUCTURE_PREFIX: usize = 24;

/// Marker appended to a line clipped inside a `[` structure.
pub const CLIP_MARKER_BRACKET: &str = "...]";

/// Marker appended to a line clipped inside a `{` structure.
pub const CLIP_MARKER_BRACE: &str = "...}";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// width clipping and API payloads
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where to clip a rendered line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clip {
    /// byte length of the line to keep
    pub keep: usize,
    /// appended after the kept text; may be empty
    pub marker: &'static str,
}

/// Find the byte offset at which the display width of `line` reaches
/// `width`, or `None` if the whole line fits.
fn width_offset(
    line: &str,
    width: usize,
) -> Option<usize> {
    let mut used: usize = 0;
    for (at, c) in line.char_indices() {
        let w: usize = c.width().unwrap_or(0);
        if used + w > width {
            return Some(at);
        }
        used += w;
    }

    None
}

/// Decide how to clip `line` to `width` display columns.
///
/// `details_at` is the byte offset of the details within `line`. If the
/// details open a `[` or `{` structure before the clip point then the clip
/// is widened to keep a short prefix of the structure, and a closing
/// marker is appended.
///
/// Returns `None` if the line fits.
pub fn clip_line(
    line: &str,
    details_at: Option<usize>,
    width: usize,
) -> Option<Clip> {
    let clip_at: usize = width_offset(line, width)?;
    let details_at: usize = match details_at {
        Some(at) if at < clip_at => at,
        _ => {
            return Some(Clip {
                keep: clip_at,
                marker: "",
            })
        }
    };
    let opening = line[details_at..clip_at]
        .char_indices()
        .find(|(_, c)| *c == '[' || *c == '{')
        .map(|(at, c)| (details_at + at, c));
    match opening {
        None => Some(Clip {
            keep: clip_at,
            marker: "",
        }),
        Some((open_at, c)) => {
            let marker: &'static str = match c {
                '[' => CLIP_MARKER_BRACKET,
                _ => CLIP_MARKER_BRACE,
            };
            // keep through a short prefix of the structure, never less than
            // the plain clip
            let prefix_end: usize = line[open_at..]
                .char_indices()
                .nth(CLIP_STRUCTURE_PREFIX + 1)
                .map(|(at, _)| open_at + at)
                .unwrap_or(line.len());
            let keep: usize = prefix_end.max(clip_at);
            if keep >= line.len() {
                return None;
            }
            Some(Clip { keep, marker })
        }
    }
}

/// If `details` ends with a JSON object or array return the offset where
/// it begins and its pretty-printed form.
pub fn find_api_payload(details: &str) -> Option<(usize, String)> {
    let trimmed: &str = details.trim_end();
    if !(trimmed.ends_with('}') || trimmed.ends_with(']')) {
        return None;
    }
    for (at, c) in trimmed.char_indices() {
        if c != '{' && c != '[' {
            continue;
        }
        if let Ok(value) = ::serde_json::from_str::<::serde_json::Value>(&trimmed[at..]) {
            if !(value.is_object() || value.is_array()) {
                continue;
            }
            match ::serde_json::to_string_pretty(&value) {
                Ok(pretty) => return Some((at, pretty)),
                Err(_err) => {
                    de_wrn!("to_string_pretty failed {}", _err);
                    return None;
                }
            }
        }
    }

    None
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Formatter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Orchestrates classification, assembly, selection, and printing of a
/// V-log stream.
pub struct Formatter<W: WriteColor> {
    config: Config,
    filter: SelectionFilter,
    printer: PrinterVlog<W>,
    headers: HeaderAssembler,
    tracebacks: TracebackAssembler,
    queue: ReleaseQueue,
    tree: SummaryTree,
    /// classification of the prior non-blank line
    prior_kind: Option<RecordKind>,
    /// print every line as-is
    passthrough: bool,
    /// has the V-log detection heuristic decided?
    vlog_checked: bool,
    /// was the last printed line blank?
    last_printed_blank: bool,
    completed: bool,
    count_lines: Count,
    count_records: Count,
    count_printed: Count,
}

impl<W: WriteColor> std::fmt::Debug for Formatter<W> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("Formatter")
            .field("passthrough", &self.passthrough)
            .field("count_lines", &self.count_lines)
            .field("count_records", &self.count_records)
            .field("count_printed", &self.count_printed)
            .finish()
    }
}

impl<W: WriteColor> Formatter<W> {
    pub fn new(
        config: Config,
        selection: Selection,
        printer: PrinterVlog<W>,
    ) -> Formatter<W> {
        defñ!("{:?} {:?}", config, selection);
        let filter = SelectionFilter::new(config.kinds, selection);
        let passthrough: bool = config.use_unformatted;
        Formatter {
            config,
            filter,
            printer,
            headers: HeaderAssembler::new(),
            tracebacks: TracebackAssembler::new(),
            queue: ReleaseQueue::new(),
            tree: SummaryTree::new(),
            prior_kind: None,
            passthrough,
            vlog_checked: passthrough,
            last_printed_blank: false,
            completed: false,
            count_lines: 0,
            count_records: 0,
            count_printed: 0,
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn tree(&self) -> &SummaryTree {
        &self.tree
    }

    pub const fn printer(&self) -> &PrinterVlog<W> {
        &self.printer
    }

    pub const fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    pub const fn count_lines(&self) -> Count {
        self.count_lines
    }

    pub const fn count_records(&self) -> Count {
        self.count_records
    }

    /// Count of records printed (a header or a traceback counts once).
    pub const fn count_printed(&self) -> Count {
        self.count_printed
    }

    /// Process one raw `line` (trailing newline removed).
    ///
    /// Only an output failure is returned; malformed input is downgraded to
    /// `Other` records.
    pub fn process_line(
        &mut self,
        line: &str,
    ) -> Result<()> {
        defn!("{:?}", line);
        self.count_lines += 1;

        if self.passthrough {
            defx!("passthrough");
            return self.print_plain(line);
        }

        if is_blank(line) {
            let lines = self.tracebacks.abort(&mut self.queue);
            self.produce_others(lines);
            let selected: Selected = self.position_passes();
            self.queue.enqueue(Record::Blank, selected);
            defx!("blank");
            return self.drain();
        }

        if !self.vlog_checked && has_timestamp_prefix(line) {
            self.vlog_checked = true;
            if !RE_STANDARD.is_match(line) {
                defo!("not V-log formatted; pass through");
                self.enter_passthrough()?;
                defx!("passthrough");
                return self.print_plain(line);
            }
        }

        // a border ends any traceback
        if self.tracebacks.is_collecting() && is_border(line) {
            let lines = self.tracebacks.abort(&mut self.queue);
            self.abort_traceback(lines);
        }
        match self.headers.offer(line) {
            HeaderOutcome::Passthrough => {}
            HeaderOutcome::Consumed => {
                defx!("header consumed");
                return Ok(());
            }
            HeaderOutcome::Complete(header) => {
                self.prior_kind = Some(header.kind());
                self.produce(Record::Header(header));
                defx!("header complete");
                return self.drain();
            }
            HeaderOutcome::Invalid(lines) => {
                self.produce_others(lines);
                self.prior_kind = Some(RecordKind::Other);
                defx!("header invalid");
                return self.drain();
            }
            HeaderOutcome::Aborted { lines, consumed } => {
                self.produce_others(lines);
                if consumed {
                    defx!("header aborted; new border");
                    return self.drain();
                }
            }
        }

        let mut kind: Option<RecordKind> = classify(line, self.prior_kind, self.tracebacks.is_collecting());
        match self.tracebacks.offer(line, kind, &mut self.queue) {
            TracebackOutcome::Idle => {}
            TracebackOutcome::Consumed => {
                self.prior_kind = Some(RecordKind::Traceback);
                defx!("traceback consumed");
                return Ok(());
            }
            TracebackOutcome::Complete(traceback) => {
                self.prior_kind = Some(RecordKind::Traceback);
                self.produce(Record::Traceback(traceback));
                defx!("traceback complete");
                return self.drain();
            }
            TracebackOutcome::Aborted(lines) => {
                self.abort_traceback(lines);
                kind = classify(line, None, false);
            }
        }

        let record: Record = match kind {
            Some(kind_) if kind_.is_standard() => match StandardRecord::parse(line) {
                Ok(standard) => Record::Standard(standard),
                Err(_err) => {
                    de_wrn!("line {}: {}; downgraded to Other", self.count_lines, _err);
                    Record::Other(String::from(line))
                }
            },
            _ => Record::Other(String::from(line)),
        };
        self.prior_kind = kind;
        self.produce(record);
        defx!();

        self.drain()
    }

    /// The stream ended. Flush all held records, close the assemblers, and
    /// print the summary if enabled.
    pub fn complete(&mut self) -> Result<()> {
        defn!();
        if self.completed {
            defx!("already completed");
            return Ok(());
        }
        self.completed = true;
        let lines = self.tracebacks.close(&mut self.queue);
        self.produce_others(lines);
        let lines = self.headers.close();
        self.produce_others(lines);
        for (record, selected) in self.queue.flush() {
            if selected {
                self.print_record(&record)?;
            }
        }
        self.tree.complete();
        if self.config.display_summary && !self.passthrough {
            self.print_summary()?;
        }
        self.printer.flush()?;
        defx!();

        Ok(())
    }

    /// Processing was cancelled; flush what was already printed. Held
    /// records and the summary are dropped.
    pub fn interrupt(&mut self) -> Result<()> {
        defñ!();
        self.completed = true;

        self.printer.flush()
    }

    /// Complete and return the color sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.complete()?;

        self.printer.into_inner()
    }

    // ────────────────────────────────────────────────────────────────────────
    // record production
    // ────────────────────────────────────────────────────────────────────────

    fn position_passes(&self) -> bool {
        self.filter
            .position_passes(self.tree.current_testcase(), self.tree.current_step())
    }

    /// Update the summary tree, decide selection, and enqueue.
    fn produce(
        &mut self,
        record: Record,
    ) {
        self.count_records += 1;
        match &record {
            Record::Standard(standard) => {
                self.tree.observe_timestamp(&standard.timestamp);
                if standard.kind == RecordKind::Error {
                    self.tree.attach_error(standard.clone());
                }
            }
            Record::Header(header) => {
                self.tree.add_header(header.clone());
            }
            _ => {}
        }
        let selected: Selected = match record.kind() {
            Some(kind) => self.filter.passes(kind, self.tree.current_testcase(), self.tree.current_step()),
            None => self.position_passes(),
        };
        defñ!("{:?} selected {}", record.kind(), selected);
        self.queue.enqueue(record, selected);
    }

    fn produce_others(
        &mut self,
        lines: Vec<String>,
    ) {
        for line in lines.into_iter() {
            self.produce(Record::Other(line));
        }
    }

    fn abort_traceback(
        &mut self,
        lines: Vec<String>,
    ) {
        if lines.is_empty() {
            return;
        }
        de_wrn!("line {}: {}", self.count_lines, VlogError::TracebackAborted(lines.len()));
        self.produce_others(lines);
        self.prior_kind = Some(RecordKind::Other);
    }

    /// Switch to pass-through; whatever is pending is printed as-is.
    fn enter_passthrough(&mut self) -> Result<()> {
        self.passthrough = true;
        let lines = self.tracebacks.close(&mut self.queue);
        self.produce_others(lines);
        let lines = self.headers.close();
        self.produce_others(lines);
        for (record, selected) in self.queue.flush() {
            if selected {
                self.print_record(&record)?;
            }
        }

        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        for (record, selected) in self.queue.dequeue() {
            if selected {
                self.print_record(&record)?;
            }
        }

        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // printing
    // ────────────────────────────────────────────────────────────────────────

    fn print_plain(
        &mut self,
        line: &str,
    ) -> Result<()> {
        self.last_printed_blank = false;
        self.count_printed += 1;

        self.printer.print_line(line, &ColorSpec::new())
    }

    fn print_blank(&mut self) -> Result<()> {
        if self.last_printed_blank {
            return Ok(());
        }
        self.last_printed_blank = true;

        self.printer.print_blank()
    }

    fn print_record(
        &mut self,
        record: &Record,
    ) -> Result<()> {
        if let Record::Blank = record {
            return self.print_blank();
        }
        self.last_printed_blank = false;
        self.count_printed += 1;
        match record {
            Record::Standard(standard) => self.print_standard(standard),
            Record::Traceback(traceback) => {
                let spec = color_spec_kind(RecordKind::Traceback);
                for line in traceback.lines.iter() {
                    self.printer.print_line(line, &spec)?;
                }
                Ok(())
            }
            Record::Header(header) => {
                let spec = color_spec_kind(header.kind());
                for line in header.display_lines().iter() {
                    self.printer.print_line(line, &spec)?;
                }
                Ok(())
            }
            Record::Other(text) => self.printer.print_line(text, &color_spec_kind(RecordKind::Other)),
            Record::Blank => Ok(()),
        }
    }

    /// Render the fields of a Standard record as colored segments.
    ///
    /// Returns the segments and the byte offset of the details within the
    /// joined line.
    fn standard_segments(
        &self,
        standard: &StandardRecord,
        details: Option<&str>,
    ) -> (Vec<Segment>, Option<usize>) {
        let shorten: bool = self.config.shorten_fields;
        let mut segments: Vec<Segment> = Vec::with_capacity(FieldKind::ALL.len() * 2);
        let mut at: usize = 0;
        let mut details_at: Option<usize> = None;
        for field in FieldKind::ALL.iter() {
            if !self.config.fields.contains(*field) {
                continue;
            }
            let text: String = match field {
                FieldKind::Details => match details {
                    Some(details) => String::from(details),
                    None => continue,
                },
                _ => match standard.render_field(*field, shorten) {
                    Some(text) => text,
                    None => continue,
                },
            };
            if !segments.is_empty() {
                segments.push(Segment::plain(String::from(FIELD_SEP)));
                at += FIELD_SEP.len_utf8();
            }
            if *field == FieldKind::Details {
                details_at = Some(at);
            }
            at += text.len();
            segments.push(Segment::new(text, color_spec_field(*field, standard.kind)));
        }

        (segments, details_at)
    }

    fn print_standard(
        &mut self,
        standard: &StandardRecord,
    ) -> Result<()> {
        let mut details: Option<&str> = standard.details.as_ref().map(|d| d.as_str());
        let mut payload: Option<String> = None;
        if self.config.format_api && self.config.fields.contains(FieldKind::Details) {
            if let Some((at, pretty)) = find_api_payload(standard.details_str()) {
                details = Some(standard.details_str()[..at].trim_end());
                payload = Some(pretty);
            }
        }
        let (mut segments, details_at) = self.standard_segments(standard, details);

        if self.config.condense_line {
            let line: String = segments.iter().map(|s| s.text.as_str()).collect();
            if let Some(clip) = clip_line(line.as_str(), details_at, self.config.clip_width()) {
                defo!("clip {:?}", clip);
                segments = clip_segments(segments, clip);
            }
        }
        self.printer.print_segments(&segments)?;

        if let Some(payload) = payload {
            let spec = color_spec_fg(COLOR_API);
            for line in payload.lines() {
                self.printer.print_line(line, &spec)?;
            }
        }
        for attached in standard.attached.iter() {
            match attached {
                Record::Traceback(traceback) => {
                    let spec = color_spec_kind(RecordKind::Traceback);
                    for line in traceback.lines.iter() {
                        self.printer.print_line(line, &spec)?;
                    }
                }
                other => self.print_record(other)?,
            }
        }

        Ok(())
    }

    fn print_summary(&mut self) -> Result<()> {
        defn!();
        self.print_blank()?;
        for line in render_summary(&self.tree).iter() {
            let spec: ColorSpec = match line.style {
                SummaryStyle::Title => color_spec_kind(RecordKind::GeneralHeader),
                SummaryStyle::Identity(kind) => color_spec_kind(kind),
                SummaryStyle::Runtime => ColorSpec::new(),
                SummaryStyle::Passed => color_spec_fg(COLOR_PASSED),
                SummaryStyle::Failed => color_spec_fg(COLOR_FAILED),
                SummaryStyle::Rule => color_spec_fg(COLOR_LOCATION),
                SummaryStyle::Warning => color_spec_fg(COLOR_WARNING),
            };
            self.printer.print_line(line.text.as_str(), &spec)?;
        }
        self.last_printed_blank = false;
        defx!();

        Ok(())
    }
}

/// Cut `segments` to `clip.keep` bytes of joined text and append the clip
/// marker in the color of the last kept segment.
fn clip_segments(
    segments: Vec<Segment>,
    clip: Clip,
) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len() + 1);
    let mut left: usize = clip.keep;
    for mut segment in segments.into_iter() {
        if left == 0 {
            break;
        }
        if segment.text.len() > left {
            segment.text.truncate(left);
            left = 0;
        } else {
            left -= segment.text.len();
        }
        out.push(segment);
    }
    if !clip.marker.is_empty() {
        let spec: ColorSpec = match out.last() {
            Some(last) => last.spec.clone(),
            None => ColorSpec::new(),
        };
        out.push(Segment::new(String::from(clip.marker), spec));
    }

    out
}
