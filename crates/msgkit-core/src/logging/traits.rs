//! Logger trait definition

use std::sync::Arc;

/// Runtime-agnostic logger abstraction
///
/// Components that only need to report progress take a `SharedLogger`
/// instead of a concrete logger.
///
/// Implementations:
/// - `NoOpLogger`: Silent logger, the default for library components
/// - `MsgLogger`: Template-driven logger writing to sinks
pub trait Logger: Send + Sync {
    /// Log a debug message
    fn debug(&self, message: &str);

    /// Log an info message
    fn info(&self, message: &str);

    /// Log a warning message
    fn warn(&self, message: &str);

    /// Log an error message. Never terminates the process.
    fn error(&self, message: &str);
}

/// Type alias for a boxed logger
pub type BoxedLogger = Box<dyn Logger>;

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<dyn Logger>;

/// Convenience macros for logging through a `Logger` trait object
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::logging::Logger::debug(&*$logger, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::logging::Logger::info(&*$logger, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::logging::Logger::warn(&*$logger, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::logging::Logger::error(&*$logger, &format!($($arg)*))
    };
}
