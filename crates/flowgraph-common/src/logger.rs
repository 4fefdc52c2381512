/// The logging sink consumed by the core pipeline.
///
/// Kept minimal and decoupled from any concrete logging backend so the
/// tokenizer and parser can be exercised in tests without a subscriber
/// installed. The CLI wires a [`TracingLogger`] in for real runs.
pub trait Logger {
    fn info(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Forwards to the `tracing` crate's `info!`/`error!` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }
}

/// A logger that records messages in memory instead of emitting them.
/// Used by tests that need to assert on what the core logged.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    pub info: std::cell::RefCell<Vec<String>>,
    pub error: std::cell::RefCell<Vec<String>>,
}

impl Logger for RecordingLogger {
    fn info(&self, msg: &str) {
        self.info.borrow_mut().push(msg.to_string());
    }

    fn error(&self, msg: &str) {
        self.error.borrow_mut().push(msg.to_string());
    }
}

/// A logger that discards everything. Handy default for call sites that do
/// not care about observability (e.g. quick one-off parses in tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_logger_collects_messages() {
        let logger = RecordingLogger::default();
        logger.info("hello");
        logger.error("oops");
        assert_eq!(logger.info.borrow().as_slice(), ["hello"]);
        assert_eq!(logger.error.borrow().as_slice(), ["oops"]);
    }
}
