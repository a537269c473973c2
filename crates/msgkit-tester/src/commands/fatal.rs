//! Fatal error command
//!
//! Usage: msgkit-tester fatal [--code <N>] <MESSAGE>...

use clap::Args;
use msgkit_core::{msg_err, MsgLogger};

use super::CommandResult;

#[derive(Debug, Args)]
pub struct FatalArgs {
    /// Exit code (defaults to the configured one)
    #[arg(long)]
    pub code: Option<i32>,

    /// Message to log
    #[arg(required = true)]
    pub message: Vec<String>,
}

/// Log the message at error level and exit. Never returns.
pub fn execute(args: FatalArgs, logger: &mut MsgLogger) -> CommandResult {
    if let Some(code) = args.code {
        logger.error_exit_code = code;
    }
    msg_err!(logger, "{}", args.message.join(" "))
}
