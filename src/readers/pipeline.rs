// src/readers/pipeline.rs

//! Couples a line-producing thread with a [`Formatter`] consumer through a
//! bounded [`crossbeam_channel`].
//!
//! ```text
//!  LineSource ──▶ producer thread ──▶ bounded channel ──▶ consumer ──▶ Formatter
//!                                    (ChanLine, ChanLine::Complete)
//! ```
//!
//! Cancellation is cooperative. Setting the cancel flag causes both threads
//! to exit at their next channel interaction.
//!
//! [`Formatter`]: crate::printer::formatter::Formatter
//! [`crossbeam_channel`]: https://docs.rs/crossbeam-channel/0.5.15/crossbeam_channel/

use crate::common::{Count, VlogError, VlogResult};
use crate::debug::printers::{de_err, de_wrn};
use crate::printer::formatter::Formatter;
use crate::printer::printers::WriteColor;
use crate::readers::source::LineSource;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ::crossbeam_channel::{RecvTimeoutError, SendTimeoutError};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Default capacity of the channel between the producer and the consumer.
pub const CHANNEL_CAPACITY: usize = 1024;

/// How long a thread blocks on the channel before checking the cancel flag.
pub const CHANNEL_POLL: Duration = Duration::from_millis(50);

/// Datum passed from the producer to the consumer.
#[derive(Debug)]
pub enum ChanLine {
    /// one raw line, trailing newline removed
    Line(String),
    /// the source is exhausted
    Complete,
    /// reading the source failed
    Error(std::io::Error),
}

impl fmt::Display for ChanLine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            ChanLine::Line(line) => write!(f, "Line(len {})", line.len()),
            ChanLine::Complete => write!(f, "Complete"),
            ChanLine::Error(err) => write!(f, "Error({})", err),
        }
    }
}

/// Sender channel (used by the producer thread).
type ChanSendLine = crossbeam_channel::Sender<ChanLine>;

/// Receiver channel (used by the consumer).
type ChanRecvLine = crossbeam_channel::Receiver<ChanLine>;

/// Shared cancel flag. Single writer.
pub type CancelFlag = Arc<AtomicBool>;

/// What a finished [`Pipeline::run`] returns.
pub struct PipelineOutcome<W: WriteColor> {
    /// the consumer's formatter, completed unless interrupted or failed
    pub formatter: Formatter<W>,
    /// `Err(Interrupted)` if cancelled
    pub result: VlogResult<()>,
    /// count of lines received by the consumer
    pub lines: Count,
}

/// One producer, one consumer.
#[derive(Debug)]
pub struct Pipeline {
    capacity: usize,
    cancel: CancelFlag,
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(CHANNEL_CAPACITY)
    }
}

impl Pipeline {
    pub fn new(capacity: usize) -> Pipeline {
        Pipeline {
            capacity: capacity.max(1),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle to the cancel flag, e.g. for a signal handler.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Request both threads to exit.
    ///
    /// Cancellation is final: the flag is never cleared, so any later
    /// [`run`](Pipeline::run) returns `Err(Interrupted)` without printing.
    /// A cancel that arrives before `run` starts is therefore not lost.
    pub fn cancel(&self) {
        defñ!();
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Run `source` through `formatter` to completion or cancellation.
    ///
    /// The producer runs on a new thread; the consumer runs on the calling
    /// thread. On completion [`Formatter::complete`] has been called. On
    /// cancellation no further output is printed and the summary is
    /// dropped.
    pub fn run<W>(
        &self,
        source: LineSource,
        formatter: Formatter<W>,
    ) -> PipelineOutcome<W>
    where
        W: WriteColor,
    {
        defn!("capacity {}", self.capacity);
        let (chan_send, chan_recv): (ChanSendLine, ChanRecvLine) =
            crossbeam_channel::bounded(self.capacity);

        let cancel_p = self.cancel.clone();
        let producer = match thread::Builder::new()
            .name(String::from("vlp-producer"))
            .spawn(move || exec_producer(source, chan_send, cancel_p))
        {
            Ok(handle) => handle,
            Err(err) => {
                de_err!("producer spawn failed {}", err);
                defx!("spawn failed");
                return PipelineOutcome {
                    formatter,
                    result: Err(VlogError::Io(err)),
                    lines: 0,
                };
            }
        };

        let (mut formatter, result, lines) = exec_consumer(formatter, chan_recv, self.cancel.clone());

        let cancelled: bool = self.is_cancelled();
        // XXX: a producer blocked reading an interactive source cannot be
        //      woken; when cancelled do not wait for it
        if !cancelled && producer.join().is_err() {
            de_err!("producer thread panicked");
        }

        let result: VlogResult<()> = match result {
            Ok(()) if cancelled => {
                let _ = formatter.interrupt();
                Err(VlogError::Interrupted)
            }
            Ok(()) => formatter.complete().map_err(VlogError::Io),
            Err(VlogError::Interrupted) => {
                let _ = formatter.interrupt();
                Err(VlogError::Interrupted)
            }
            Err(err) => Err(err),
        };
        defx!("{:?} lines {}", result.as_ref().err(), lines);

        PipelineOutcome {
            formatter,
            result,
            lines,
        }
    }
}

/// Producer thread: read lines, push them, then push the sentinel.
fn exec_producer(
    mut source: LineSource,
    chan_send: ChanSendLine,
    cancel: CancelFlag,
) {
    defn!("{:?}", source.name());
    loop {
        if cancel.load(Ordering::SeqCst) {
            defx!("cancelled");
            return;
        }
        let datum: ChanLine = match source.read_line() {
            Ok(Some(line)) => ChanLine::Line(line),
            Ok(None) => ChanLine::Complete,
            Err(err) => ChanLine::Error(err),
        };
        let is_last: bool = !matches!(datum, ChanLine::Line(_));
        if !send_or_cancel(&chan_send, datum, &cancel) {
            defx!("receiver gone or cancelled");
            return;
        }
        if is_last {
            defx!("sent last datum after {} lines", source.count_lines());
            return;
        }
    }
}

/// Blocking send that wakes to check the cancel flag. Returns `false` if the
/// datum was not sent.
fn send_or_cancel(
    chan_send: &ChanSendLine,
    mut datum: ChanLine,
    cancel: &CancelFlag,
) -> bool {
    loop {
        match chan_send.send_timeout(datum, CHANNEL_POLL) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(datum_)) => {
                if cancel.load(Ordering::SeqCst) {
                    return false;
                }
                datum = datum_;
            }
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

/// Consumer: pop lines into the `formatter` until the sentinel or
/// cancellation.
fn exec_consumer<W>(
    mut formatter: Formatter<W>,
    chan_recv: ChanRecvLine,
    cancel: CancelFlag,
) -> (Formatter<W>, VlogResult<()>, Count)
where
    W: WriteColor,
{
    defn!();
    let mut lines: Count = 0;
    loop {
        if cancel.load(Ordering::SeqCst) {
            defx!("cancelled after {} lines", lines);
            return (formatter, Err(VlogError::Interrupted), lines);
        }
        let datum: ChanLine = match chan_recv.recv_timeout(CHANNEL_POLL) {
            Ok(datum) => datum,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                // the producer exits without the sentinel only if cancelled
                de_wrn!("producer disconnected without completing");
                defx!("disconnected");
                let result = match cancel.load(Ordering::SeqCst) {
                    true => Err(VlogError::Interrupted),
                    false => Ok(()),
                };
                return (formatter, result, lines);
            }
        };
        match datum {
            ChanLine::Line(line) => {
                lines += 1;
                if let Err(err) = formatter.process_line(line.as_str()) {
                    de_err!("output failed {}", err);
                    // stop the producer
                    cancel.store(true, Ordering::SeqCst);
                    defx!("output failed");
                    return (formatter, Err(VlogError::Io(err)), lines);
                }
            }
            ChanLine::Complete => {
                defx!("complete after {} lines", lines);
                return (formatter, Ok(()), lines);
            }
            ChanLine::Error(err) => {
                de_err!("input failed {}", err);
                defx!("input failed");
                return (formatter, Err(VlogError::Io(err)), lines);
            }
        }
    }
}
