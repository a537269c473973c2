//! Logger and runner self test
//!
//! Usage: msgkit-tester [selftest]

use std::ffi::OsStr;
use std::sync::Arc;

use msgkit_core::{exit_code_of, msg_debug, msg_err_no_exit, msg_info, msg_raw, msg_warn, MsgLogger, Runner};

use super::CommandResult;

pub fn execute(logger: &mut MsgLogger) -> CommandResult {
    exercise_levels(logger)?;
    exercise_runner(logger)?;
    msg_info!(logger, "success")?;
    Ok(())
}

fn exercise_levels(logger: &mut MsgLogger) -> CommandResult {
    msg_debug!(logger, "debug message")?;
    msg_info!(logger, "info message pid = {}", std::process::id())?;
    msg_warn!(logger, "warning")?;
    msg_err_no_exit!(logger, "this error is recoverable!")?;

    logger.debug_enabled = false;
    msg_debug!(logger, "this debug message will not display")?;
    logger.debug_enabled = true;
    msg_debug!(logger, "this debug message will display")?;

    logger.info_enabled = false;
    msg_info!(logger, "this info message will not display")?;
    logger.info_enabled = true;
    msg_info!(logger, "this info message will display")?;

    logger.warning_enabled = false;
    msg_warn!(logger, "this warning message will not display")?;
    logger.warning_enabled = true;
    msg_warn!(logger, "this warning message will display")?;

    msg_raw!(logger, "any old random stuff\n")?;
    Ok(())
}

fn exercise_runner(logger: &MsgLogger) -> CommandResult {
    let exe = std::env::current_exe()?;
    let argv = [exe.as_os_str(), OsStr::new("genout"), OsStr::new("10"), OsStr::new("72")];
    let runner = Runner::new(Arc::new(logger.clone()));

    msg_info!(logger, "testing Runner::run")?;
    msg_info!(logger, "cmd = {} genout 10 72", exe.display())?;
    let result = runner.run(&argv);
    report(logger, &result)?;
    result?;

    msg_info!(logger, "testing Runner::run_silent")?;
    msg_info!(logger, "cmd = {} genout 10 72", exe.display())?;
    let result = runner.run_silent(&argv);
    report(logger, &result)?;
    result?;
    Ok(())
}

fn report(logger: &MsgLogger, result: &msgkit_core::RunResult<String>) -> CommandResult {
    match result {
        Ok(output) => msg_info!(logger, "size = {}", output.len())?,
        Err(e) => msg_info!(logger, "err = {}", e)?,
    }
    msg_info!(logger, "exit code = {}", exit_code_of(result.as_ref().err()))?;
    Ok(())
}
