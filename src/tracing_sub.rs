//! Tracing subscriber setup.
//!
//! While the overlay owns the terminal, log lines go to the in-process
//! diagnostics buffer instead of stderr.

use std::io::{self, Write};
use std::str::FromStr;

use tracing::Level;

use crate::debug_log::{DebugLogWriter, global_debug_log};

/// Environment variable that overrides the default log level.
pub const LOG_LEVEL_ENV: &str = "TERM_HOVER_LOG";

/// Destination of a single formatted event.
pub enum LogSink {
    Buffer(DebugLogWriter),
    Stderr(io::Stderr),
}

impl LogSink {
    fn current() -> Self {
        match global_debug_log() {
            Some(handle) => LogSink::Buffer(handle.writer()),
            None => LogSink::Stderr(io::stderr()),
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::Buffer(w) => w.write(buf),
            LogSink::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::Buffer(w) => w.flush(),
            LogSink::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogMakeWriter {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        LogSink::current()
    }
}

/// Parse a level name such as `debug` or `WARN`. `None` for anything else.
pub fn parse_level(value: &str) -> Option<Level> {
    Level::from_str(value.trim()).ok()
}

/// Install the global subscriber at `max_level`. Later calls are no-ops.
pub fn init(max_level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(LogMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .without_time()
        .try_init();
}

/// [`init`] at the level named by `TERM_HOVER_LOG`, `DEBUG` when unset or
/// unreadable.
pub fn init_default() {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(Level::DEBUG);
    init(level);
}
