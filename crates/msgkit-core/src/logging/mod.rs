//! Message logging
//!
//! - `MsgLogger` renders messages through a compiled template and writes them
//!   to shared `Sink`s
//! - `Logger` is the runtime-agnostic trait library components log through
//! - `CallerResolver` finds the file, function and line of a log call

mod caller;
mod emitter;
mod error;
mod level;
mod noop;
mod sink;
mod traits;

pub use caller::{BacktraceResolver, CallSite, CallerResolver};
pub use emitter::{MsgLogger, DEFAULT_DEPTH, DEFAULT_EXIT_CODE, DEFAULT_TEMPLATE, DEFAULT_TIME_FORMAT};
pub use error::{EmitError, EmitResult, EmitResultExt, MsgError, MsgResult};
pub use level::Level;
pub use noop::NoOpLogger;
pub use sink::{MemorySink, Sink};
pub use traits::{BoxedLogger, Logger, SharedLogger};
