//! Run command
//!
//! Usage: msgkit-tester run [-s] <CMD>...

use std::sync::Arc;

use clap::Args;
use msgkit_core::{exit_code_of, msg_info, MsgLogger, Runner};

use super::CommandResult;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Capture the output without echoing it
    #[arg(short, long)]
    pub silent: bool,

    /// Command and arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run the command, report the result and exit with the command's status
pub fn execute(args: RunArgs, logger: &MsgLogger) -> CommandResult {
    let runner = Runner::new(Arc::new(logger.clone()));
    msg_info!(logger, "cmd = {}", args.command.join(" "))?;

    let result = if args.silent {
        runner.run_silent(&args.command)
    } else {
        runner.run(&args.command)
    };

    let size = match &result {
        Ok(output) => output.len(),
        Err(e) => e.output().map_or(0, str::len),
    };
    let code = exit_code_of(result.as_ref().err());
    msg_info!(logger, "size = {}", size)?;
    msg_info!(logger, "exit code = {}", code)?;
    if let Err(e) = &result {
        msg_info!(logger, "err = {}", e)?;
    }

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
