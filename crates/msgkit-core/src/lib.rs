//! msgkit Core
//!
//! Template-driven message logging and process running.
//!
//! ## Message logging
//!
//! A `MsgLogger` renders each message through a compiled template and writes
//! the line to one or more shared sinks:
//!
//! ```rust
//! use msgkit_core::{msg_info, MemorySink, MsgLogger};
//!
//! let out = MemorySink::new();
//! let logger = MsgLogger::new("MyPackage", "%pkg %(-7)type %msg", "", vec![out.sink()]).unwrap();
//! msg_info!(logger, "started {} workers", 4).unwrap();
//! assert_eq!(out.contents(), "MyPackage INFO    started 4 workers\n");
//! ```
//!
//! ## Running commands
//!
//! The `run` module spawns external commands and captures their combined
//! output, optionally echoing it as it arrives.

pub mod template;
pub mod logging;
pub mod config;
pub mod run;

// Re-export commonly used types
pub use template::{CompileError, CompileResult, FieldFormat, FieldId, Segment, Template};

pub use logging::{
    BacktraceResolver, CallSite, CallerResolver,
    MsgLogger, MsgError, MsgResult, EmitError, EmitResult, EmitResultExt,
    Level, Sink, MemorySink,
    Logger, NoOpLogger, BoxedLogger, SharedLogger,
    DEFAULT_DEPTH, DEFAULT_EXIT_CODE, DEFAULT_TEMPLATE, DEFAULT_TIME_FORMAT,
};

pub use config::{ConfigError, ConfigResult, LoggerConfig};

pub use run::{exit_code_of, run, run_silent, run_with_sinks, RunError, RunResult, Runner};
