//! Message template compiler
//!
//! A template is plain text with field placeholders:
//! - `%<id>` inserts the field value unformatted
//! - `%(<fmt>)<id>` applies a printf-style format (e.g. `%(-27)time`)
//!
//! Recognized ids: `file`, `func`, `line`, `msg`, `pkg`, `time`, `type`, `utc`.
//! Templates are compiled once, when a logger is built.

mod compiler;
mod error;
mod field;
mod format;

pub use compiler::{Segment, Template};
pub use error::{CompileError, CompileResult};
pub use field::FieldId;
pub use format::FieldFormat;
