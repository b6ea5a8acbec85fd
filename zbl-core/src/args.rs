//! Command-line argument validation.
//!
//! Raw tokens go through a `clap` derive struct ([`Args`]) and are then
//! converted into a typed [`Invocation`].  Every parse failure is reported
//! as [`ZblError::InvalidArgument`]; nothing in this module touches the
//! window system.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;

use crate::errors::ZblError;
use crate::options::CaptureOptions;

#[derive(Parser, Debug)]
#[command(
    name = "zbl",
    version,
    about = "Capture a window or display via Windows.Graphics.Capture",
    args_override_self = true,
    infer_long_args = true
)]
struct Args {
    /// Capture the window whose title matches (exact, else substring)
    #[arg(long, value_name = "NAME")]
    window_name: Option<String>,

    /// Capture the display with this zero-based index
    #[arg(
        long,
        value_name = "ID",
        allow_hyphen_values = true,
        value_parser = parse_display_id
    )]
    display_id: Option<i64>,

    /// Include the mouse cursor in captured frames
    #[arg(long)]
    capture_cursor: bool,

    /// Grab a single frame, write it as PNG to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with = "list")]
    snapshot: Option<PathBuf>,

    /// Print capturable displays and windows as JSON and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

/// What the process should do once arguments are valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Stream frames from the target until it closes.
    Show,
    /// Write one frame to the given path.
    Snapshot(PathBuf),
    /// Enumerate capture targets.
    List,
}

/// A fully validated command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub options: CaptureOptions,
    pub mode: Mode,
    pub verbose: bool,
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Run(Invocation),
    /// `--help` / `--version`: print the text and exit with status 0.
    Exit(String),
}

impl Args {
    fn validate(self) -> Result<Invocation, ZblError> {
        if let Some(name) = &self.window_name {
            if name.is_empty() {
                return Err(ZblError::InvalidArgument(
                    "window-name must not be empty".into(),
                ));
            }
        }

        let mode = match (self.snapshot, self.list) {
            (Some(path), _) => Mode::Snapshot(path),
            (None, true) => Mode::List,
            (None, false) => Mode::Show,
        };

        Ok(Invocation {
            options: CaptureOptions {
                window_name: self.window_name,
                display_id: self.display_id,
                capture_cursor: self.capture_cursor,
            },
            mode,
            verbose: self.verbose,
        })
    }
}

const DISPLAY_ID_MESSAGE: &str = "display-id must be an integer";

/// Integer parsing with the usual CLI leniency: surrounding whitespace,
/// a leading sign and `_` digit separators (`1_000`) are accepted.
fn parse_display_id(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed).as_bytes();

    // `_` must sit between two digits.
    let separators_ok = digits.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && i + 1 < digits.len()
                && digits[i - 1].is_ascii_digit()
                && digits[i + 1].is_ascii_digit())
    });
    if !separators_ok {
        return Err(DISPLAY_ID_MESSAGE.into());
    }

    trimmed
        .replace('_', "")
        .parse::<i64>()
        .map_err(|_| DISPLAY_ID_MESSAGE.into())
}

/// The offending token recorded by clap, if any.
fn invalid_token(err: &clap::Error) -> Option<String> {
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// First line of clap's rendered message without the `error: ` prefix.
fn clap_summary(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_owned()
}

/// Parse `tokens` (program name first) into a [`ParseOutcome`].
///
/// # Errors
///
/// - `InvalidArgument("display-id must be an integer")` for a
///   non-integer `--display-id` value.
/// - `InvalidArgument("unrecognized argument: <token>")` for unknown
///   flags or stray positional tokens.
/// - `InvalidArgument(...)` with clap's summary for any other usage error
///   (missing value, `--capture-cursor=yes`, conflicting flags).
pub fn parse_args<I, T>(tokens: I) -> Result<ParseOutcome, ZblError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(tokens) {
        Ok(args) => args,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    Ok(ParseOutcome::Exit(err.render().to_string()))
                }
                ErrorKind::UnknownArgument => {
                    let token = invalid_token(&err).unwrap_or_default();
                    Err(ZblError::InvalidArgument(format!(
                        "unrecognized argument: {token}"
                    )))
                }
                ErrorKind::ValueValidation
                    if invalid_token(&err).is_some_and(|t| t.starts_with("--display-id")) =>
                {
                    Err(ZblError::InvalidArgument(DISPLAY_ID_MESSAGE.into()))
                }
                _ => Err(ZblError::InvalidArgument(clap_summary(&err))),
            };
        }
    };

    args.validate().map(ParseOutcome::Run)
}

/// Usage text for error reporting.
pub fn usage() -> String {
    use clap::CommandFactory;
    Args::command().render_usage().to_string()
}
