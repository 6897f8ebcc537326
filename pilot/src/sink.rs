//! Append-only progress sinks
//!
//! A sink is created once per category (pipeline, ad-hoc logs) and passed
//! explicitly to everything that writes progress text.

use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::Local;

/// An append-only text channel shown to the user
pub trait LogSink: Send + Sync {
    /// Append raw text; each call is written atomically
    fn append(&self, text: &str);

    fn append_line(&self, line: &str) {
        self.append(&format!("{}\n", line));
    }

    /// Append a line prefixed with the local time
    fn stamped(&self, message: &str) {
        self.append_line(&format!("[{}] {}", timestamp(), message));
    }

    /// Append a stage banner
    fn banner(&self, stage: &str) {
        let rule = "─".repeat(60);
        self.append(&format!("\n{}\n  {}\n{}\n", rule, stage, rule));
    }
}

/// Local wall-clock time used to prefix progress lines
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Sink writing to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn append(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

/// Sink keeping everything in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    buffer: Arc<Mutex<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended so far
    pub fn contents(&self) -> String {
        self.buffer.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn append(&self, text: &str) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push_str(text);
        }
    }
}
