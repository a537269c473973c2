//! No-op logger implementation

use super::traits::Logger;

/// A logger that does nothing
///
/// The default logger for library components such as the process runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    /// Create a new no-op logger
    pub fn new() -> Self {
        Self
    }
}

impl Logger for NoOpLogger {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_default_runner_logs_nowhere() {
        use crate::logging::{MemorySink, Sink};
        use crate::run::{exit_code_of, Runner};

        // only the command's own output reaches the sink
        let out = MemorySink::new();
        let sinks: Vec<Sink> = vec![out.sink()];
        let runner = Runner::default();
        runner.run_with_sinks(&["sh", "-c", "echo one"], &sinks).unwrap();
        let err = runner.run_with_sinks(&["sh", "-c", "echo two; exit 6"], &sinks).unwrap_err();

        assert_eq!(exit_code_of(Some(&err)), 6);
        assert_eq!(out.lines(), vec!["one", "two"]);
    }

    #[test]
    fn test_noop_logger() {
        let logger = NoOpLogger::new();

        // These should all do nothing without panicking
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }
}
