// src/printer/printers.rs

//! Specialized printer struct [`PrinterVlog`] and the [`Color`s] used to
//! print V-log records.
//!
//! A `PrinterVlog` writes colored [`Segment`s] to any [`WriteColor`] and,
//! optionally, the same text without colors to a save file.
//!
//! [`Color`s]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html

use crate::common::NLc;
use crate::data::fields::{FieldKind, RecordKind};
use crate::debug::printers::de_err;

use std::fs::File;
use std::io::{BufWriter, Result, Write};

#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, WriteColor};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`Color`] for printing the date and time fields.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_DATETIME: Color = Color::Rgb(102, 153, 204);

/// [`Color`] for printing the source and thread fields.
pub const COLOR_LOCATION: Color = Color::Rgb(127, 127, 127);

/// [`Color`] for printing tracebacks.
pub const COLOR_TRACEBACK: Color = Color::Rgb(230, 127, 230);

/// [`Color`] for printing a pretty-printed API payload.
pub const COLOR_API: Color = Color::Rgb(127, 230, 230);

/// [`Color`] for a passed summary node.
pub const COLOR_PASSED: Color = Color::Green;

/// [`Color`] for a failed summary node.
pub const COLOR_FAILED: Color = Color::Red;

/// [`Color`] for printing some user-facing warnings.
pub const COLOR_WARNING: Color = Color::Yellow;

/// Foreground [`Color`] of a record kind, `None` for the console default.
///
/// Chosen for a dark background console.
//
// XXX: colors with low pixel values are difficult to see on dark console
//      backgrounds; keep at least one pixel value of 102 or greater
pub const fn color_kind(kind: RecordKind) -> Option<Color> {
    match kind {
        RecordKind::Debug => Some(Color::Rgb(153, 153, 153)),
        RecordKind::Info => Some(Color::Green),
        RecordKind::Notice => Some(Color::Cyan),
        RecordKind::Warning => Some(Color::Yellow),
        RecordKind::Error => Some(Color::Red),
        RecordKind::Critical => Some(Color::Rgb(255, 51, 51)),
        RecordKind::Traceback => Some(COLOR_TRACEBACK),
        RecordKind::Other => None,
        RecordKind::StepHeader => Some(Color::Rgb(153, 153, 255)),
        RecordKind::TestCaseHeader => Some(Color::Rgb(127, 230, 127)),
        RecordKind::SuiteHeader => Some(Color::Rgb(230, 230, 127)),
        RecordKind::GeneralHeader => Some(Color::Rgb(230, 230, 230)),
    }
}

/// Is a record kind printed in bold?
const fn bold_kind(kind: RecordKind) -> bool {
    matches!(kind, RecordKind::Critical) || kind.is_header()
}

/// [`ColorSpec`] of a record kind.
pub fn color_spec_kind(kind: RecordKind) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(color_kind(kind));
    spec.set_bold(bold_kind(kind));

    spec
}

/// [`ColorSpec`] of a field of a Standard record of `kind`.
///
/// The details of `Warning`, `Error`, and `Critical` records share the kind
/// color; all other details use the console default.
pub fn color_spec_field(
    field: FieldKind,
    kind: RecordKind,
) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match field {
        FieldKind::Date | FieldKind::Time => {
            spec.set_fg(Some(COLOR_DATETIME));
        }
        FieldKind::Type => {
            spec = color_spec_kind(kind);
        }
        FieldKind::Source | FieldKind::Thread => {
            spec.set_fg(Some(COLOR_LOCATION));
        }
        FieldKind::Details => {
            if matches!(kind, RecordKind::Warning | RecordKind::Error | RecordKind::Critical) {
                spec.set_fg(color_kind(kind));
            }
        }
    }

    spec
}

/// [`ColorSpec`] with only a foreground.
pub fn color_spec_fg(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));

    spec
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Segment
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A piece of one output line and its color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub spec: ColorSpec,
}

impl Segment {
    pub fn new(
        text: String,
        spec: ColorSpec,
    ) -> Segment {
        Segment { text, spec }
    }

    /// Text in the console default color.
    pub fn plain(text: String) -> Segment {
        Segment {
            text,
            spec: ColorSpec::new(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PrinterVlog
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Macro to write to a writer. If there is an error then
/// print a debug message and return the error.
macro_rules! write_or_return {
    ($out:expr, $slice_:expr) => {
        if let Err(err) = $out.write_all($slice_) {
            // XXX: this will print when this program stdout is truncated, like when piping
            //      to `head`, e.g. `vlp file.log | head`
            //          Broken pipe (os error 32)
            de_err!("{}.write_all(len {}) error {}", stringify!($out), $slice_.len(), err);
            return Err(err);
        }
    };
}

/// Macro that sets output color, only changed if needed.
///
/// Unnecessary changes to `set_color` may cause errant formatting bytes to
/// print to the terminal.
macro_rules! setcolor_or_return {
    ($out:expr, $color_spec:expr, $color_spec_last:expr) => {
        if $color_spec != &$color_spec_last {
            if let Err(err) = $out.set_color($color_spec) {
                de_err!("{}.set_color({:?}) returned error {}", stringify!($out), $color_spec, err);
                return Err(err);
            };
            $color_spec_last = $color_spec.clone();
        }
    };
}

/// A printer of rendered V-log lines.
pub struct PrinterVlog<W: WriteColor> {
    /// the console, or any other color sink
    out: W,
    /// should printing be in color?
    do_color: bool,
    /// plain text copy of all output
    save: Option<BufWriter<File>>,
    /// last value passed to `self.out.set_color()`
    color_spec_last: ColorSpec,
    /// count of lines printed
    pub(crate) count_lines: u64,
}

impl<W: WriteColor> std::fmt::Debug for PrinterVlog<W> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("PrinterVlog")
            .field("do_color", &self.do_color)
            .field("save", &self.save.is_some())
            .field("count_lines", &self.count_lines)
            .finish()
    }
}

impl<W: WriteColor> PrinterVlog<W> {
    /// Create a new `PrinterVlog`.
    pub fn new(
        out: W,
        do_color: bool,
        save: Option<File>,
    ) -> PrinterVlog<W> {
        PrinterVlog {
            do_color: do_color && out.supports_color(),
            out,
            save: save.map(BufWriter::new),
            color_spec_last: ColorSpec::new(),
            count_lines: 0,
        }
    }

    /// Print one line made of `segments` followed by a newline.
    pub fn print_segments(
        &mut self,
        segments: &[Segment],
    ) -> Result<()> {
        for segment in segments.iter() {
            if segment.text.is_empty() {
                continue;
            }
            if self.do_color {
                setcolor_or_return!(self.out, &segment.spec, self.color_spec_last);
            }
            write_or_return!(self.out, segment.text.as_bytes());
            if let Some(save) = self.save.as_mut() {
                write_or_return!(save, segment.text.as_bytes());
            }
        }
        if self.do_color && self.color_spec_last != ColorSpec::new() {
            // reset before the newline so a colored background never bleeds
            if let Err(err) = self.out.reset() {
                de_err!("out.reset() returned error {}", err);
                return Err(err);
            }
            self.color_spec_last = ColorSpec::new();
        }
        let mut nl: [u8; 4] = [0; 4];
        let nl: &[u8] = NLc.encode_utf8(&mut nl).as_bytes();
        write_or_return!(self.out, nl);
        if let Some(save) = self.save.as_mut() {
            write_or_return!(save, nl);
        }
        self.count_lines += 1;

        Ok(())
    }

    /// Print one line in one color.
    pub fn print_line(
        &mut self,
        text: &str,
        spec: &ColorSpec,
    ) -> Result<()> {
        self.print_segments(&[Segment::new(String::from(text), spec.clone())])
    }

    /// Print an empty line.
    pub fn print_blank(&mut self) -> Result<()> {
        self.print_segments(&[])
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        if let Some(save) = self.save.as_mut() {
            save.flush()?;
        }

        Ok(())
    }

    pub const fn count_lines(&self) -> u64 {
        self.count_lines
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Flush and return the color sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;

        Ok(self.out)
    }
}
