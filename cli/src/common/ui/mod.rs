//! # PackRS UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Human-facing progress output. Build steps never print directly: they take a
//! `Reporter`, so the console is just one implementation and tests can record
//! what a step would have shown.
//!
//! Log output (`tracing`) goes to stderr and is controlled by `-v`; reporter
//! output goes to stdout and is always shown.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::ui::{ConsoleReporter, Reporter};
//!
//! let reporter = ConsoleReporter;
//! reporter.step("Compressing Application (10MB)");
//! ```
//!

/// Receives the progress messages of a build step.
pub trait Reporter {
    /// Announces a step.
    fn step(&self, message: &str);

    /// Prints a blank separator line, used before a fatal message.
    fn line(&self);
}

/// Writes progress to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn step(&self, message: &str) {
        println!("==> {}", message);
    }

    fn line(&self) {
        println!();
    }
}

/// Keeps every message in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub messages: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn line(&self) {
        self.messages.borrow_mut().push(String::new());
    }
}
