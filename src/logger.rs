//! Colored terminal logging.
//!
//! Every line starts with a bracketed module tag:
//!
//! ```text
//! [build] /blog/feed.xml
//! [content] warning: /blog/post1: field `pub_date` is not a valid Date, ignoring it
//! ```
//!
//! `log!` and `debug!` go to stdout, `warn!` goes to stderr. `debug!` is
//! silent unless `--verbose` was given.

use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// `log!("build"; "{} feed(s) written", n)`
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::emit($crate::logger::Level::Info, $module, &format!($($arg)*))
    }};
}

/// Like `log!`, but on stderr and flagged as a warning.
#[macro_export]
macro_rules! warn {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::emit($crate::logger::Level::Warn, $module, &format!($($arg)*))
    }};
}

/// Like `log!`, only under `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::emit($crate::logger::Level::Debug, $module, &format!($($arg)*))
        }
    }};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Debug,
}

pub fn emit(level: Level, module: &str, message: &str) {
    let line = format_line(level, module, message);
    // rayon workers log concurrently, one locked write per line
    match level {
        Level::Warn => {
            let mut out = stderr().lock();
            writeln!(out, "{line}").ok();
        }
        Level::Info | Level::Debug => {
            let mut out = stdout().lock();
            writeln!(out, "{line}").ok();
            out.flush().ok();
        }
    }
}

fn format_line(level: Level, module: &str, message: &str) -> String {
    let tag = format!("[{module}]");
    match level {
        Level::Warn => {
            let warn = Style::new().bright_magenta();
            format!(
                "{} {} {message}",
                paint(&tag, warn.bold(), Stream::Stderr),
                paint("warning:", warn, Stream::Stderr)
            )
        }
        Level::Debug => format!("{} {message}", paint(&tag, Style::new().dimmed(), Stream::Stdout)),
        Level::Info => format!("{} {message}", paint(&tag, tag_style(module), Stream::Stdout)),
    }
}

fn tag_style(module: &str) -> Style {
    let style = match module.to_ascii_lowercase().as_str() {
        "atom" | "feed" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        _ => Style::new().bright_yellow(),
    };
    style.bold()
}

/// Apply `style` only when `stream` supports color and `--color` allows it.
pub fn paint(text: &str, style: Style, stream: Stream) -> String {
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}
