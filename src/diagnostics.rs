//! Per-call diagnostic trail.
//!
//! Locators record every place they looked and why a candidate was rejected.
//! The trail is returned to the caller so a failed lookup can be reported in
//! full; each line is also emitted at debug level.

use log::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLog {
    lines: Vec<String>,
}

impl SearchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!("{line}");
        self.lines.push(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
