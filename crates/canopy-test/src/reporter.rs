//! Failure reporting for API tests.
//!
//! Request helpers and expectations never decide on their own how a failure
//! ends a test. They hand messages to a [`Reporter`]:
//!
//! - [`Reporter::fatal`] stops the test immediately
//! - [`Reporter::error`] records a failure; the reporter decides whether to stop
//! - [`Reporter::log`] records context such as the request line
//!
//! [`FailFast`] stops on the first failure. [`SoftReporter`] collects failures
//! and fails the test once, listing all of them.

use parking_lot::Mutex;

/// Sink for test log lines and failures.
pub trait Reporter: Send + Sync {
    /// Records an informational message.
    fn log(&self, message: &str);

    /// Records a failure.
    fn error(&self, message: &str);

    /// Records a failure and aborts the test.
    fn fatal(&self, message: &str) -> !;
}

/// Reporter that panics on the first error.
///
/// This is the right choice for plain `#[test]` functions where any failed
/// expectation should end the test.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl Reporter for FailFast {
    fn log(&self, message: &str) {
        tracing::info!(target: "canopy_test", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "canopy_test", "{message}");
        panic!("{message}");
    }

    fn fatal(&self, message: &str) -> ! {
        tracing::error!(target: "canopy_test", "{message}");
        panic!("{message}");
    }
}

/// Reporter that collects errors and keeps the test running.
///
/// Collected errors fail the test when [`assert_clean`](Self::assert_clean)
/// is called or, failing that, when the reporter is dropped.
///
/// # Example
///
/// ```
/// use canopy_test::{Reporter, SoftReporter};
///
/// let reporter = SoftReporter::new();
/// reporter.error("status: expected 200, got 404");
/// reporter.error("header 'etag' missing");
///
/// assert_eq!(reporter.take_errors().len(), 2);
/// reporter.assert_clean();
/// ```
#[derive(Debug, Default)]
pub struct SoftReporter {
    errors: Mutex<Vec<String>>,
    logs: Mutex<Vec<String>>,
}

impl SoftReporter {
    /// Creates a reporter with no recorded errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded errors.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    /// Returns a copy of the recorded log lines.
    #[must_use]
    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().clone()
    }

    /// Returns true if any error has been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.lock().is_empty()
    }

    /// Removes and returns the recorded errors.
    pub fn take_errors(&self) -> Vec<String> {
        std::mem::take(&mut *self.errors.lock())
    }

    /// Panics listing every recorded error, if there are any.
    pub fn assert_clean(&self) {
        let errors = self.take_errors();
        if !errors.is_empty() {
            panic!("{}", render_failures(&errors));
        }
    }
}

impl Reporter for SoftReporter {
    fn log(&self, message: &str) {
        tracing::info!(target: "canopy_test", "{message}");
        self.logs.lock().push(message.to_string());
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "canopy_test", "{message}");
        self.errors.lock().push(message.to_string());
    }

    fn fatal(&self, message: &str) -> ! {
        tracing::error!(target: "canopy_test", "{message}");
        let mut errors = self.take_errors();
        errors.push(message.to_string());
        panic!("{}", render_failures(&errors));
    }
}

impl Drop for SoftReporter {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let errors = std::mem::take(self.errors.get_mut());
        if !errors.is_empty() {
            panic!("{}", render_failures(&errors));
        }
    }
}

fn render_failures(errors: &[String]) -> String {
    let mut out = format!("{} expectation(s) failed:", errors.len());
    for (i, error) in errors.iter().enumerate() {
        out.push_str(&format!("\n  {}. {error}", i + 1));
    }
    out
}
