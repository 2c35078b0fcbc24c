// src/readers/source.rs

//! Implements a [`LineSource`], the line-producing side of the
//! [pipeline].
//!
//! [pipeline]: crate::readers::pipeline

use crate::common::{Count, FPath, File, VlogError, VlogResult};

use std::io::{BufRead, BufReader, Result};

use ::bstr::ByteSlice;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Default capacity of the read buffer.
pub const LINE_SOURCE_BUFFER_SZ: usize = 0x10000;

/// Yields the lines of any [`BufRead`] with the trailing `\n` or `\r\n`
/// removed.
///
/// Bytes are decoded as UTF-8 lossily so a stray invalid byte never aborts a
/// run.
pub struct LineSource {
    reader: Box<dyn BufRead + Send>,
    /// reusable line buffer
    buffer: Vec<u8>,
    /// description of the source, e.g. the file path
    name: String,
    pub(crate) count_lines: Count,
}

impl std::fmt::Debug for LineSource {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("LineSource")
            .field("name", &self.name)
            .field("count_lines", &self.count_lines)
            .finish()
    }
}

impl LineSource {
    pub fn new<R>(
        reader: R,
        name: &str,
    ) -> LineSource
    where
        R: BufRead + Send + 'static,
    {
        defñ!("{:?}", name);
        LineSource {
            reader: Box::new(reader),
            buffer: Vec::with_capacity(256),
            name: String::from(name),
            count_lines: 0,
        }
    }

    /// Open the file at `path`.
    ///
    /// Fails with `SourceUnavailable`.
    pub fn open_file(path: &FPath) -> VlogResult<LineSource> {
        defn!("{:?}", path);
        let file: File = match File::open(path) {
            Ok(val) => val,
            Err(err) => {
                defx!("error {}", err);
                return Err(VlogError::SourceUnavailable(path.clone(), err));
            }
        };
        if let Ok(metadata) = file.metadata() {
            if metadata.is_dir() {
                defx!("is a directory");
                return Err(VlogError::SourceUnavailable(
                    path.clone(),
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "is a directory"),
                ));
            }
        }
        defx!();

        Ok(LineSource::new(BufReader::with_capacity(LINE_SOURCE_BUFFER_SZ, file), path.as_str()))
    }

    /// Read from standard input.
    pub fn stdin() -> LineSource {
        LineSource::new(BufReader::new(std::io::stdin()), "-")
    }

    /// Read the lines of `text`. Intended for testing.
    pub fn from_string(text: String) -> LineSource {
        LineSource::new(std::io::Cursor::new(text.into_bytes()), "<string>")
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub const fn count_lines(&self) -> Count {
        self.count_lines
    }

    /// Read the next line. `Ok(None)` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        let read: usize = self.reader.read_until(b'\n', &mut self.buffer)?;
        if read == 0 {
            return Ok(None);
        }
        let mut end: usize = self.buffer.len();
        if self.buffer.ends_with(b"\n") {
            end -= 1;
            if self.buffer[..end].ends_with(b"\r") {
                end -= 1;
            }
        }
        self.count_lines += 1;

        Ok(Some(self.buffer[..end].to_str_lossy().into_owned()))
    }
}

impl Iterator for LineSource {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}
