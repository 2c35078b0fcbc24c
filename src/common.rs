// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

//! Common type aliases, grammar constants, and the [`VlogError`] taxonomy
//! shared by all modules of _vlplib_.

use std::fmt;
use std::io::Error;

use crate::data::fields::FieldKind;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use std::fs::File;
pub use std::path::Path;

// TODO: use `std::path::PathBuf` for `FPath`
/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;

/// A count of lines, records, etc.
pub type Count = u64;

/// Line number within the input stream, starting at `1`.
pub type LineNumber = u64;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// V-log grammar constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Separator between fields of a Standard line.
pub const FIELD_SEP: char = ' ';

/// Exact length of a header border line.
pub const BORDER_LEN: usize = 105;

/// Border character of suite, test case, and general headers.
pub const BORDER_CHAR_MAJOR: char = '=';

/// Border character of step headers.
pub const BORDER_CHAR_MINOR: char = '-';

/// Maximum length of a shortened source field, `:line` suffix included.
pub const SHORTEN_LIMIT: usize = 20;

/// Width of a shortened kind field.
pub const SHORTEN_KIND_WIDTH: usize = 5;

/// NewLine as char
#[allow(non_upper_case_globals)]
pub const NLc: char = '\n';

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// All the ways processing a V-log may go wrong.
///
/// Field and header errors are recovered where they are raised (the line is
/// downgraded to an `Other` record). Source and I/O errors are fatal.
#[derive(Debug)]
pub enum VlogError {
    /// A token did not match the pattern of its field.
    InvalidField(FieldKind),
    /// A border-wrapped description did not match any header grammar.
    /// Carries the raw description.
    InvalidHeader(String),
    /// A traceback was interrupted by an unexpected line.
    /// Carries the count of collected lines flushed as `Other`.
    TracebackAborted(usize),
    /// The input could not be opened.
    SourceUnavailable(FPath, Error),
    /// A summary node is missing a start time or an end time.
    SummaryIncomplete(String),
    /// The user cancelled processing.
    Interrupted,
    /// Reading the input or writing the output failed.
    Io(Error),
    /// A configuration value could not be interpreted.
    Config(String),
}

impl fmt::Display for VlogError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            VlogError::InvalidField(kind) => write!(f, "invalid field {}", kind),
            VlogError::InvalidHeader(desc) => write!(f, "invalid header {:?}", desc),
            VlogError::TracebackAborted(count) => {
                write!(f, "traceback aborted after {} lines", count)
            }
            VlogError::SourceUnavailable(path, err) => {
                write!(f, "log source {:?} is unavailable: {}", path, err)
            }
            VlogError::SummaryIncomplete(node) => write!(f, "summary incomplete for {:?}", node),
            VlogError::Interrupted => write!(f, "interrupted"),
            VlogError::Io(err) => write!(f, "{}", err),
            VlogError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for VlogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VlogError::SourceUnavailable(_, err) | VlogError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Error> for VlogError {
    fn from(err: Error) -> Self {
        VlogError::Io(err)
    }
}

/// `Result` for functions that may fail with a [`VlogError`].
pub type VlogResult<T> = std::result::Result<T, VlogError>;
