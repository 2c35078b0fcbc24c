// src/config/ini.rs

//! Load a [`Config`] from an INI file at `~/`[`CONFIG_NAME`].
//!
//! Four sections are read:
//!
//! ```text
//! [AT2 LOG CREDENTIALS]
//! username = …
//! password = …
//! fetch-task-instance-script-path = …
//!
//! [DISPLAY LOG TYPES]
//! debug = true
//! …
//! general_header = true
//!
//! [DISPLAY FIELDS]
//! date = true
//! …
//!
//! [GENERAL]
//! use_defaults = false
//! max_line_len = 150
//! …
//! ```
//!
//! Unknown sections and keys are ignored. Missing keys keep their default.

use crate::common::{FPath, VlogError, VlogResult};
use crate::config::{Config, MAX_LINE_LEN_MIN};
use crate::data::fields::{FieldKind, RecordKind};
use crate::debug::printers::de_wrn;

use std::path::PathBuf;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// File name of the configuration file in the user's home directory.
pub const CONFIG_NAME: &str = ".vlp.ini";

pub const SECTION_CREDENTIALS: &str = "AT2 LOG CREDENTIALS";
pub const SECTION_LOG_TYPES: &str = "DISPLAY LOG TYPES";
pub const SECTION_FIELDS: &str = "DISPLAY FIELDS";
pub const SECTION_GENERAL: &str = "GENERAL";

/// Interpret a configuration boolean; `true`, `yes`, `t`, `y`, `1` in any
/// case are true, anything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "t" | "y" | "1"
    )
}

/// Path of the configuration file, `~/`[`CONFIG_NAME`].
pub fn config_path_default() -> Option<PathBuf> {
    ::dirs::home_dir().map(|home| home.join(CONFIG_NAME))
}

/// Load the configuration at `path`.
///
/// A missing file is not an error; the default configuration is returned.
pub fn load(path: &FPath) -> VlogResult<Config> {
    defn!("{:?}", path);
    let text: String = match std::fs::read_to_string(path) {
        Ok(val) => val,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            defx!("not found");
            return Ok(Config::default());
        }
        Err(err) => {
            defx!("error {}", err);
            return Err(VlogError::Config(format!("{:?}: {}", path, err)));
        }
    };
    let config = parse(text.as_str());
    defx!();

    config
}

/// Load the configuration at `~/`[`CONFIG_NAME`], or the default
/// configuration if there is no home directory.
pub fn load_default() -> VlogResult<Config> {
    match config_path_default() {
        Some(path) => load(&path.to_string_lossy().into_owned()),
        None => {
            de_wrn!("no home directory; using the default configuration");
            Ok(Config::default())
        }
    }
}

/// Parse INI `text` into a [`Config`].
pub fn parse(text: &str) -> VlogResult<Config> {
    let mut config = Config::default();
    let mut use_defaults: bool = false;
    let mut section: String = String::new();

    for (at, line) in text.lines().enumerate() {
        let line: &str = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            section = String::from(name.trim());
            defo!("section {:?}", section);
            continue;
        }
        let (key, value) = match line.split_once('=').or_else(|| line.split_once(':')) {
            Some((key, value)) => (key.trim(), value.trim()),
            None => {
                de_wrn!("line {}: ignored {:?}", at + 1, line);
                continue;
            }
        };
        defo!("[{}] {:?} = {:?}", section, key, value);
        match section.as_str() {
            SECTION_CREDENTIALS => match key {
                "username" => config.credentials.username = Some(String::from(value)),
                "password" => config.credentials.password = Some(String::from(value)),
                "fetch-task-instance-script-path" => {
                    config.credentials.fetch_script_path = Some(String::from(value))
                }
                _ => de_wrn!("line {}: unknown key {:?}", at + 1, key),
            },
            SECTION_LOG_TYPES => match RecordKind::ALL.iter().find(|k| k.config_key() == key) {
                Some(kind) => config.kinds.set(*kind, parse_bool(value)),
                None => de_wrn!("line {}: unknown key {:?}", at + 1, key),
            },
            SECTION_FIELDS => match FieldKind::ALL.iter().find(|f| f.config_key() == key) {
                Some(field) => config.fields.set(*field, parse_bool(value)),
                None => de_wrn!("line {}: unknown key {:?}", at + 1, key),
            },
            SECTION_GENERAL => match key {
                "use_defaults" => use_defaults = parse_bool(value),
                "use_unformatted" => config.use_unformatted = parse_bool(value),
                "use_colors" => config.use_colors = parse_bool(value),
                "format_api" => config.format_api = parse_bool(value),
                "condense_line" => config.condense_line = parse_bool(value),
                "shorten_fields" => config.shorten_fields = parse_bool(value),
                "display_summary" => config.display_summary = parse_bool(value),
                "use_console_len" => config.use_console_len = parse_bool(value),
                "max_line_len" => config.max_line_len = parse_max_line_len(value)?,
                _ => de_wrn!("line {}: unknown key {:?}", at + 1, key),
            },
            _ => de_wrn!("line {}: unknown section {:?}", at + 1, section),
        }
    }

    if use_defaults {
        defo!("use_defaults; keep only credentials");
        let credentials = config.credentials;
        config = Config {
            credentials,
            ..Config::default()
        };
    }

    Ok(config)
}

/// Parse a `max_line_len` value.
pub fn parse_max_line_len(value: &str) -> VlogResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(val) if val >= MAX_LINE_LEN_MIN => Ok(val),
        Ok(val) => Err(VlogError::Config(format!(
            "max_line_len {} is less than {}",
            val, MAX_LINE_LEN_MIN
        ))),
        Err(err) => Err(VlogError::Config(format!("max_line_len {:?}: {}", value, err))),
    }
}
