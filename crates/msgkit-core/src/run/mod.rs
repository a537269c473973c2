//! External command execution
//!
//! Commands run with stdout and stderr merged into one stream that is
//! captured and, depending on the entry point, echoed to stdout or forwarded
//! to sinks.
//!
//! ```rust,ignore
//! use msgkit_core::run::{exit_code_of, run_silent};
//!
//! let result = run_silent(&["make", "test"]);
//! std::process::exit(exit_code_of(result.as_ref().err()));
//! ```

mod error;
mod runner;

pub use error::{exit_code_of, RunError, RunResult};
pub use runner::{run, run_silent, run_with_sinks, Runner};
