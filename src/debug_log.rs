//! In-process diagnostics buffer.
//!
//! The overlay owns the terminal, so log output cannot go to stderr while
//! it runs. The tracing subscriber writes into this bounded ring instead and
//! the demo shows its tail in a "Log" tab.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

pub const DEFAULT_MAX_LINES: usize = 500;

static GLOBAL_LOG: OnceLock<DebugLogHandle> = OnceLock::new();

/// Install `handle` as the process-wide log sink. Returns `false` if one was
/// already installed.
pub fn set_global_debug_log(handle: DebugLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_debug_log() -> Option<DebugLogHandle> {
    GLOBAL_LOG.get().cloned()
}

#[derive(Debug)]
struct Ring {
    lines: VecDeque<String>,
    capacity: usize,
    evicted: u64,
}

/// Shared handle to a bounded list of log lines. Clones see the same lines.
#[derive(Clone, Debug)]
pub struct DebugLogHandle {
    ring: Arc<Mutex<Ring>>,
}

impl DebugLogHandle {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: Arc::new(Mutex::new(Ring {
                lines: VecDeque::with_capacity(capacity.min(DEFAULT_MAX_LINES)),
                capacity,
                evicted: 0,
            })),
        }
    }

    // A panic while holding the lock leaves the ring intact; keep logging.
    fn ring(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, line: impl Into<String>) {
        let mut ring = self.ring();
        if ring.lines.len() == ring.capacity {
            ring.lines.pop_front();
            ring.evicted += 1;
        }
        ring.lines.push_back(line.into());
    }

    /// The last `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let ring = self.ring();
        let skip = ring.lines.len().saturating_sub(count);
        ring.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ring().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lines dropped so far to stay within capacity.
    pub fn evicted(&self) -> u64 {
        self.ring().evicted
    }

    pub fn writer(&self) -> DebugLogWriter {
        DebugLogWriter {
            handle: self.clone(),
            partial: Vec::new(),
        }
    }
}

impl Default for DebugLogHandle {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

/// `io::Write` adapter that records one entry per written line. Blank lines
/// are skipped and an unterminated tail is kept until flush or drop.
#[derive(Debug)]
pub struct DebugLogWriter {
    handle: DebugLogHandle,
    partial: Vec<u8>,
}

impl DebugLogWriter {
    fn record(&self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim_end_matches(['\n', '\r']);
        if !text.is_empty() {
            self.handle.push(text);
        }
    }
}

impl Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.extend_from_slice(buf);
        while let Some(end) = self.partial.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=end).collect();
            self.record(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let rest = std::mem::take(&mut self.partial);
        self.record(&rest);
        Ok(())
    }
}

impl Drop for DebugLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
