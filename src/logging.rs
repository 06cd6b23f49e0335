//! Startup diagnostics channel
//!
//! The initialization pipeline reports progress ("Initializing token list...",
//! per-source notices, final count) and per-source fetch errors through a
//! single injected sink instead of writing to ambient streams at each call
//! site. Production uses stderr for both channels, since stdout carries the
//! MCP protocol.

/// A line-oriented diagnostics sink with separate progress and error channels.
pub trait LogSink: Send + Sync {
    /// Write one human-readable progress line.
    fn progress(&self, line: &str);

    /// Write one error diagnostic line.
    fn error(&self, line: &str);
}

/// Production sink: both channels go to stderr, keeping stdout clean for the
/// stdio transport.
pub struct StderrSink;

impl LogSink for StderrSink {
    fn progress(&self, line: &str) {
        eprintln!("{}", line);
    }

    fn error(&self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Capturing sink for tests.
#[cfg(test)]
pub struct MemorySink {
    pub lines: std::sync::Mutex<Vec<String>>,
    pub errors: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self {
            lines: std::sync::Mutex::new(Vec::new()),
            errors: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl LogSink for MemorySink {
    fn progress(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }

    fn error(&self, line: &str) {
        self.errors.lock().unwrap().push(line.to_string());
    }
}
