// src/bin/vlp.rs

//! Driver program _vlp_.
//!
//! Processes user-passed command-line arguments, loads the configuration,
//! opens the log source, then runs the [`Pipeline`] of _vlplib_ until the
//! stream completes or the user interrupts.
//!
//! [`Pipeline`]: vlplib::readers::pipeline::Pipeline

#![allow(non_camel_case_types)]

use std::fs::File;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use ::clap::{Parser, ValueEnum};
use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::si_trace_print::stack::stack_offset_set;

use ::vlplib::common::{FPath, VlogError};
use ::vlplib::config::ini::{load, load_default, parse_max_line_len, CONFIG_NAME};
use ::vlplib::config::Config;
use ::vlplib::debug::printers::{de_wrn, e_err, e_wrn};
use ::vlplib::printer::formatter::Formatter;
use ::vlplib::printer::printers::{ColorChoice, PrinterVlog};
use ::vlplib::readers::pipeline::{CancelFlag, Pipeline};
use ::vlplib::readers::selection::Selection;
use ::vlplib::readers::source::LineSource;

// --------------------
// command-line parsing

/// Default path of the save file for `--save` without a value.
const SAVE_PATH_DEFAULT: &str = "vlp-saved.log";

/// Environment variable holding the console width.
const ENV_COLUMNS: &str = "COLUMNS";

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
LOG_SOURCE may be:
    a V-log file path ending in \".log\"
    \"-\" to read standard input, e.g. the output of a live test run
An archive ID (all digits) or a test suite path (ending in \"Ts…\") must first
be fetched or run by their own tools, then passed as a file or a pipe.

Display settings are read from \"~/", CONFIG_NAME, "\".
Command-line options override the settings file.

---

Version: ", env!("CARGO_PKG_VERSION"), "
MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "
License: ", env!("CARGO_PKG_LICENSE"), "
",
    CLI_HELP_AFTER_NOTE_DEBUG
);

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

/// clap command-line arguments build-time definitions.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    name = "vlp",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(V-log Pretty Printer)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// The V-log to print: a path ending in ".log", or "-" for standard
    /// input.
    #[clap(
        required = true,
        verbatim_doc_comment,
    )]
    log_source: String,

    /// Print only this test case, by name or by number, and optionally only
    /// one step of it, e.g. "TcLogin", "3", or "3:1".
    #[clap(
        short = 't',
        long = "test-case",
        verbatim_doc_comment,
        value_parser = cli_parse_selection,
    )]
    test_case: Option<Selection>,

    /// Pretty-print a JSON payload at the end of log details.
    #[clap(
        short = 'a',
        long = "format-api",
        verbatim_doc_comment,
    )]
    format_api: bool,

    /// Also save the printed log, without colors, to this file.
    #[clap(
        short = 's',
        long = "save",
        verbatim_doc_comment,
        num_args = 0..=1,
        default_missing_value = SAVE_PATH_DEFAULT,
    )]
    save: Option<String>,

    /// Choose to print to terminal using colors.
    #[clap(
        required = false,
        short = 'c',
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,

    /// Do not print the run summary.
    #[clap(
        long = "no-summary",
        verbatim_doc_comment,
    )]
    no_summary: bool,

    /// Clip log lines to the maximum line length.
    #[clap(
        long = "condense",
        verbatim_doc_comment,
    )]
    condense: bool,

    /// Print short forms of the log type and source fields.
    #[clap(
        long = "shorten",
        verbatim_doc_comment,
    )]
    shorten: bool,

    /// Print every line as-is.
    #[clap(
        long = "unformatted",
        verbatim_doc_comment,
    )]
    unformatted: bool,

    /// Maximum line length for "--condense".
    #[clap(
        long = "max-line-len",
        verbatim_doc_comment,
        value_parser = cli_parse_max_line_len,
    )]
    max_line_len: Option<usize>,

    /// Path of the settings file.
    #[clap(
        long = "config",
        verbatim_doc_comment,
    )]
    config: Option<String>,
}

/// `clap` value parser for `--test-case`.
fn cli_parse_selection(s: &str) -> std::result::Result<Selection, String> {
    s.parse::<Selection>().map_err(|err| err.to_string())
}

/// `clap` value parser for `--max-line-len`.
fn cli_parse_max_line_len(s: &str) -> std::result::Result<usize, String> {
    parse_max_line_len(s).map_err(|err| err.to_string())
}

lazy_static! {
    /// A V-log file path.
    static ref RE_SOURCE_FILE: Regex = Regex::new(r"\.log$").unwrap();
    /// A task archive ID.
    static ref RE_SOURCE_ARCHIVE: Regex = Regex::new(r"^\d+$").unwrap();
    /// A test suite path.
    static ref RE_SOURCE_SUITE: Regex = Regex::new(r"^(?:\w|-|/|\.)*Ts(?:\w|-)+$").unwrap();
}

/// The kind of a `log_source` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
enum LogSource {
    File(FPath),
    Stdin,
    Archive(String),
    Suite(String),
}

/// Discriminate the `log_source` argument.
fn cli_process_log_source(log_source: &str) -> Option<LogSource> {
    if log_source == "-" {
        return Some(LogSource::Stdin);
    }
    if RE_SOURCE_FILE.is_match(log_source) {
        return Some(LogSource::File(FPath::from(log_source)));
    }
    if RE_SOURCE_ARCHIVE.is_match(log_source) {
        return Some(LogSource::Archive(String::from(log_source)));
    }
    if RE_SOURCE_SUITE.is_match(log_source) {
        return Some(LogSource::Suite(String::from(log_source)));
    }

    None
}

/// Map the CLI color choice and the configuration to a
/// [`termcolor::ColorChoice`] and whether to print colors at all.
fn cli_process_color_choice(
    color_choice: CLI_Color_Choice,
    use_colors: bool,
) -> (ColorChoice, bool) {
    match color_choice {
        CLI_Color_Choice::always => (ColorChoice::Always, true),
        CLI_Color_Choice::never => (ColorChoice::Never, false),
        CLI_Color_Choice::auto => match use_colors {
            true => (ColorChoice::Auto, true),
            false => (ColorChoice::Never, false),
        },
    }
}

/// Apply the command-line overrides to the loaded `config`.
fn cli_process_config(
    args: &CLI_Args,
    mut config: Config,
    columns: Option<&str>,
) -> Config {
    if args.format_api {
        config.format_api = true;
    }
    if args.no_summary {
        config.display_summary = false;
    }
    if args.condense {
        config.condense_line = true;
    }
    if args.shorten {
        config.shorten_fields = true;
    }
    if args.unformatted {
        config.use_unformatted = true;
    }
    if config.use_console_len {
        match columns.map(parse_max_line_len) {
            Some(Ok(val)) => config.max_line_len = val,
            Some(Err(_err)) => de_wrn!("{} {}", ENV_COLUMNS, _err),
            None => {}
        }
    }
    if let Some(max_line_len) = args.max_line_len {
        config.max_line_len = max_line_len;
    }
    config.use_colors = cli_process_color_choice(args.color_choice, config.use_colors).1;

    config
}

/// set a process signal handler that cancels the pipeline
fn set_signal_handler(cancel: CancelFlag) -> anyhow::Result<(), ctrlc::Error> {
    defn!();
    ctrlc::set_handler(move || {
        defñ!("signal; cancel");
        cancel.store(true, Ordering::SeqCst);
    })?;
    defx!();

    Ok(())
}

/// Process the user-passed command-line arguments.
/// Run the pipeline.
/// Determine a process return code.
pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();

    let args = CLI_Args::parse();
    defo!("{:?}", args);

    let config: Config = match &args.config {
        Some(path) => load(path),
        None => load_default(),
    }
    .map(|config| cli_process_config(&args, config, std::env::var(ENV_COLUMNS).ok().as_deref()))
    .unwrap_or_else(|err| {
        e_wrn!("{}; using the default configuration", err);
        cli_process_config(&args, Config::default(), None)
    });
    let (color_choice, do_color) = cli_process_color_choice(args.color_choice, config.use_colors);

    let source: LineSource = match cli_process_log_source(args.log_source.as_str()) {
        Some(LogSource::File(path)) => match LineSource::open_file(&path) {
            Ok(val) => val,
            Err(err) => {
                e_err!("{}", err);
                defx!("SourceUnavailable");
                return ExitCode::FAILURE;
            }
        },
        Some(LogSource::Stdin) => LineSource::stdin(),
        Some(LogSource::Archive(id)) => {
            e_err!("task archive {:?} must be fetched first, then passed as a \".log\" file", id);
            defx!("archive");
            return ExitCode::FAILURE;
        }
        Some(LogSource::Suite(path)) => {
            e_err!("test suite {:?} must be run first, then its output passed as \"-\"", path);
            defx!("suite");
            return ExitCode::FAILURE;
        }
        None => {
            e_err!("invalid log source {:?}", args.log_source);
            defx!("invalid");
            return ExitCode::FAILURE;
        }
    };

    let save: Option<File> = match &args.save {
        Some(path) => match File::create(path) {
            Ok(file) => Some(file),
            Err(err) => {
                e_err!("cannot create save file {:?}: {}", path, err);
                defx!("save");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let printer = PrinterVlog::new(termcolor::StandardStream::stdout(color_choice), do_color, save);
    let formatter = Formatter::new(config, args.test_case.clone().unwrap_or_default(), printer);
    let pipeline = Pipeline::default();
    if let Err(_err) = set_signal_handler(pipeline.cancel_flag()) {
        de_wrn!("set_signal_handler failed {}", _err);
    }

    let outcome = pipeline.run(source, formatter);
    let exitcode: ExitCode = match outcome.result {
        Ok(()) => ExitCode::SUCCESS,
        Err(VlogError::Interrupted) => ExitCode::SUCCESS,
        Err(VlogError::Io(err)) if err.kind() == std::io::ErrorKind::BrokenPipe => {
            // the reader of stdout went away, e.g. `vlp file.log | head`
            ExitCode::FAILURE
        }
        Err(err) => {
            e_err!("{}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?} lines {}", exitcode, outcome.lines);

    exitcode
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use ::test_case::test_case;

    #[test_case("-", Some(LogSource::Stdin); "stdin")]
    #[test_case("run.log", Some(LogSource::File(FPath::from("run.log"))); "file")]
    #[test_case("/tmp/a/TsLogin.log", Some(LogSource::File(FPath::from("/tmp/a/TsLogin.log"))); "file in suite dir")]
    #[test_case("123456", Some(LogSource::Archive(String::from("123456"))); "archive")]
    #[test_case("suites/net/TsLogin", Some(LogSource::Suite(String::from("suites/net/TsLogin"))); "suite path")]
    #[test_case("TsLogin-v2", Some(LogSource::Suite(String::from("TsLogin-v2"))); "suite dash")]
    #[test_case("run.txt", None; "not a log")]
    #[test_case("12ab", None; "not digits")]
    fn test_cli_process_log_source(
        log_source: &str,
        expect: Option<LogSource>,
    ) {
        assert_eq!(cli_process_log_source(log_source), expect);
    }

    #[test_case(CLI_Color_Choice::always, false, ColorChoice::Always, true)]
    #[test_case(CLI_Color_Choice::never, true, ColorChoice::Never, false)]
    #[test_case(CLI_Color_Choice::auto, true, ColorChoice::Auto, true)]
    #[test_case(CLI_Color_Choice::auto, false, ColorChoice::Never, false)]
    fn test_cli_process_color_choice(
        cli: CLI_Color_Choice,
        use_colors: bool,
        expect_choice: ColorChoice,
        expect_color: bool,
    ) {
        let (choice, color) = cli_process_color_choice(cli, use_colors);
        assert_eq!(choice, expect_choice);
        assert_eq!(color, expect_color);
    }

    #[test]
    fn test_cli_args_selection() {
        let args = CLI_Args::try_parse_from(["vlp", "-t", "3:1", "run.log"]).unwrap();
        let selection = args.test_case.unwrap();
        assert_eq!(selection.tc_number, Some(3));
        assert_eq!(selection.step_number, Some(1));
        assert_eq!(args.log_source, "run.log");
    }

    #[test]
    fn test_cli_args_save_default() {
        let args = CLI_Args::try_parse_from(["vlp", "run.log", "-s"]).unwrap();
        assert_eq!(args.save.as_deref(), Some(SAVE_PATH_DEFAULT));
        let args = CLI_Args::try_parse_from(["vlp", "-s", "out.txt", "run.log"]).unwrap();
        assert_eq!(args.save.as_deref(), Some("out.txt"));
        let args = CLI_Args::try_parse_from(["vlp", "run.log"]).unwrap();
        assert_eq!(args.save, None);
    }

    #[test]
    fn test_cli_args_bad_max_line_len() {
        assert!(CLI_Args::try_parse_from(["vlp", "--max-line-len", "x", "run.log"]).is_err());
        assert!(CLI_Args::try_parse_from(["vlp", "--max-line-len", "3", "run.log"]).is_err());
    }

    #[test]
    fn test_cli_process_config_overrides() {
        let args = CLI_Args::try_parse_from([
            "vlp", "-a", "--no-summary", "--condense", "--shorten", "--max-line-len", "80", "-c", "never", "run.log",
        ])
        .unwrap();
        let config = cli_process_config(&args, Config::default(), None);
        assert!(config.format_api);
        assert!(!config.display_summary);
        assert!(config.condense_line);
        assert!(config.shorten_fields);
        assert!(!config.use_colors);
        assert_eq!(config.max_line_len, 80);
    }

    #[test]
    fn test_cli_process_config_columns() {
        let args = CLI_Args::try_parse_from(["vlp", "run.log"]).unwrap();
        let config = Config {
            use_console_len: true,
            ..Config::default()
        };
        let config = cli_process_config(&args, config, Some("132"));
        assert_eq!(config.max_line_len, 132);
    }
}
