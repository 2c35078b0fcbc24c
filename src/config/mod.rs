// src/config/mod.rs

//! The `config` module is the immutable [`Config`] value built once at
//! startup and passed by reference into the [`Formatter`], and the loading
//! of it from an [INI file].
//!
//! [`Formatter`]: crate::printer::formatter::Formatter
//! [INI file]: crate::config::ini

pub mod ini;

use crate::data::fields::{FieldSet, KindSet};

use std::fmt;

/// Default [`Config::max_line_len`].
pub const MAX_LINE_LEN_DEFAULT: usize = 150;

/// Smallest accepted [`Config::max_line_len`].
pub const MAX_LINE_LEN_MIN: usize = 20;

/// Credentials for the collaborator that fetches archived logs.
///
/// Opaque; never interpreted by _vlplib_.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub fetch_script_path: Option<String>,
}

// never print the password
impl fmt::Debug for Credentials {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "…"))
            .field("fetch_script_path", &self.fetch_script_path)
            .finish()
    }
}

/// Display configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// kinds to display
    pub kinds: KindSet,
    /// fields of Standard records to display
    pub fields: FieldSet,
    /// print every line as-is
    pub use_unformatted: bool,
    pub use_colors: bool,
    /// pretty-print a JSON payload at the end of details
    pub format_api: bool,
    /// clip Standard records to `max_line_len`
    pub condense_line: bool,
    pub shorten_fields: bool,
    pub display_summary: bool,
    /// take `max_line_len` from the console width
    pub use_console_len: bool,
    pub max_line_len: usize,
    pub credentials: Credentials,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kinds: KindSet::all(),
            fields: FieldSet::all(),
            use_unformatted: false,
            use_colors: true,
            format_api: false,
            condense_line: false,
            shorten_fields: false,
            display_summary: true,
            use_console_len: false,
            max_line_len: MAX_LINE_LEN_DEFAULT,
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    /// Plain settings: no colors, no summary. With these settings a
    /// V-log prints back exactly as read.
    pub fn plain() -> Config {
        Config {
            use_colors: false,
            display_summary: false,
            ..Config::default()
        }
    }

    /// Width used for clipping; never below [`MAX_LINE_LEN_MIN`].
    pub fn clip_width(&self) -> usize {
        self.max_line_len.max(MAX_LINE_LEN_MIN)
    }
}
