//! ui::output
//!
//! Output formatting and logging.
//!
//! # Design
//!
//! Replies to the console go to stdout and respect the quiet flag. Log lines
//! go to stderr, prefixed with a `[HH:MM:SS]` wall-clock timestamp. Errors
//! from the messenger carry their numeric code as `(error N)`.

use std::fmt::Display;

use chrono::Local;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet mode - replies only, no log lines
    Quiet,
    /// Normal mode - replies and event log
    #[default]
    Normal,
    /// Debug mode - also tokenizer and resolver traces
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

fn timestamp() -> String {
    Local::now().format("[%H:%M:%S]").to_string()
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a reply line. Replies are the bot's output and are always shown.
pub fn reply(message: impl Display) {
    println!("{}", message);
}

/// Log an event with a timestamp (respects quiet mode).
pub fn log(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("{} {}", timestamp(), message);
    }
}

/// Log a failure with its error code (always shown).
pub fn log_error(code: i32, message: impl Display) {
    eprintln!("{} {} (error {})", timestamp(), message, code);
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Shorten text for a log line, escaping newlines.
///
/// Texts longer than `limit` bytes are cut and suffixed with
/// `...<limit>/<len>` so a relayed message does not flood the log.
///
/// # Example
///
/// ```
/// use toxbot::ui::output::shorten;
///
/// assert_eq!(shorten("a\nb", 64), "a\\nb");
/// assert_eq!(shorten(&"x".repeat(20), 16), "xxxxxxxx...16/20");
/// ```
pub fn shorten(text: &str, limit: usize) -> String {
    let escaped = text.replace('\n', "\\n");
    if text.len() < limit {
        return escaped;
    }
    let suffix = format!("...{}/{}", limit, text.len());
    let keep = limit.saturating_sub(suffix.len());
    let mut cut = keep.min(escaped.len());
    while !escaped.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &escaped[..cut], suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn shorten_keeps_short_text() {
        assert_eq!(shorten("hello", 64), "hello");
    }

    #[test]
    fn shorten_respects_char_boundaries() {
        let text = "é".repeat(40);
        let short = shorten(&text, 16);
        assert!(short.ends_with("...16/80"));
        assert!(short.len() <= 16);
    }
}
