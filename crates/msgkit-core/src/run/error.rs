//! Process runner errors

use std::io;

use thiserror::Error;

/// Errors that can occur while running a command
#[derive(Error, Debug)]
pub enum RunError {
    /// The argument list was empty
    #[error("no command specified")]
    NoCommand,

    /// The program could not be started
    #[error("failed to start '{program}': {source}")]
    Spawn { program: String, source: io::Error },

    /// Waiting for the program or copying its output failed
    #[error("I/O error while running '{program}': {source}")]
    Io { program: String, source: io::Error },

    /// The program ran and did not succeed. `output` is what was captured.
    #[error("'{program}' {}", describe_exit(.code))]
    Exit {
        program: String,
        /// `None` when terminated by a signal
        code: Option<i32>,
        output: String,
    },
}

impl RunError {
    /// Output captured before the failure, if any was collected
    pub fn output(&self) -> Option<&str> {
        match self {
            RunError::Exit { output, .. } => Some(output),
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

pub type RunResult<T> = Result<T, RunError>;

/// Exit code carried by a run failure.
///
/// `0` when there is no error, the process exit status for an exit failure,
/// and `-1` for signals and failures that are not exit statuses.
pub fn exit_code_of(err: Option<&RunError>) -> i32 {
    match err {
        None => 0,
        Some(RunError::Exit { code: Some(code), .. }) => *code,
        Some(_) => -1,
    }
}
