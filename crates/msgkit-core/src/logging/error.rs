//! Logger error types

use std::io;

use thiserror::Error;

use super::caller::CallSite;
use crate::template::CompileError;

/// Errors that can occur while building a logger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MsgError {
    /// The message template is malformed
    #[error("invalid template: {0}")]
    Template(#[from] CompileError),

    /// The timestamp pattern is not a valid strftime pattern
    #[error("invalid time format '{0}'")]
    TimeFormat(String),
}

pub type MsgResult<T> = Result<T, MsgError>;

/// Faults raised while emitting a line.
///
/// These are not recoverable for the logging call that raised them: the line
/// is lost for the failing sink and for every sink after it. Callers decide
/// whether to terminate; [`EmitResultExt::or_abort`] does so the same way
/// every time.
#[derive(Error, Debug)]
pub enum EmitError {
    /// Writing a line to a sink failed
    #[error("write to sink '{sink}' failed at {site} for line {line:?}: {source}")]
    SinkWrite {
        sink: String,
        site: CallSite,
        line: String,
        #[source]
        source: io::Error,
    },
}

impl EmitError {
    /// Create a sink write error
    pub fn sink_write(sink: impl Into<String>, site: CallSite, line: impl Into<String>, source: io::Error) -> Self {
        Self::SinkWrite {
            sink: sink.into(),
            site,
            line: line.into(),
            source,
        }
    }

    /// Report the fault on stderr and terminate the process with status 1
    pub fn abort(self) -> ! {
        eprintln!("ERROR: {}", self);
        std::process::exit(1)
    }
}

pub type EmitResult<T> = Result<T, EmitError>;

/// Terminate on emit faults instead of handling them
pub trait EmitResultExt<T> {
    /// Unwrap the value, or report the fault and exit with status 1
    fn or_abort(self) -> T;
}

impl<T> EmitResultExt<T> for EmitResult<T> {
    fn or_abort(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => err.abort(),
        }
    }
}
