//! Command execution with combined output capture

use std::ffi::OsStr;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use super::error::{RunError, RunResult};
use crate::logging::{Logger, MemorySink, NoOpLogger, SharedLogger, Sink};

const CHUNK_SIZE: usize = 8192;

/// Runs external commands and collects their combined stdout and stderr
pub struct Runner {
    logger: SharedLogger,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(Arc::new(NoOpLogger::new()))
    }
}

impl Runner {
    /// Create a runner that reports to `logger`
    pub fn new(logger: SharedLogger) -> Self {
        Self { logger }
    }

    /// Create from a boxed logger (converts to Arc)
    pub fn from_boxed(logger: Box<dyn Logger>) -> Self {
        Self::new(Arc::from(logger))
    }

    /// Run `argv`, echoing output to stdout and returning it.
    ///
    /// The child inherits stdin.
    pub fn run<S: AsRef<OsStr>>(&self, argv: &[S]) -> RunResult<String> {
        let capture = MemorySink::new();
        let status = self.execute(argv, Stdio::inherit(), &[capture.sink(), Sink::stdout()])?;
        self.finish(argv, status, capture.contents())
    }

    /// Run `argv` with stdin closed, returning its output without echoing it
    pub fn run_silent<S: AsRef<OsStr>>(&self, argv: &[S]) -> RunResult<String> {
        let capture = MemorySink::new();
        let status = self.execute(argv, Stdio::null(), &[capture.sink()])?;
        self.finish(argv, status, capture.contents())
    }

    /// Run `argv`, forwarding output to `sinks` only.
    ///
    /// The child inherits stdin.
    pub fn run_with_sinks<S: AsRef<OsStr>>(&self, argv: &[S], sinks: &[Sink]) -> RunResult<()> {
        let status = self.execute(argv, Stdio::inherit(), sinks)?;
        self.finish(argv, status, String::new()).map(|_| ())
    }

    fn execute<S: AsRef<OsStr>>(&self, argv: &[S], stdin: Stdio, sinks: &[Sink]) -> RunResult<ExitStatus> {
        let (program, args) = argv.split_first().ok_or(RunError::NoCommand)?;
        let name = program_name(argv);
        self.logger.debug(&format!("[Runner] Running: {}", command_line(argv)));

        let mut child = Command::new(program)
            .args(args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: name.clone(),
                source,
            })?;

        let tee = Tee::new(sinks);
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let copied = thread::scope(|scope| {
            let tee = &tee;
            let readers = [
                stdout.map(|pipe| scope.spawn(move || tee.pump(pipe))),
                stderr.map(|pipe| scope.spawn(move || tee.pump(pipe))),
            ];
            let mut result = Ok(());
            for handle in readers.into_iter().flatten() {
                let outcome = handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "output reader panicked")));
                if result.is_ok() {
                    result = outcome;
                }
            }
            result
        });

        let status = child.wait().map_err(|source| RunError::Io {
            program: name.clone(),
            source,
        })?;
        copied
            .and_then(|()| tee.into_failure().map_or(Ok(()), Err))
            .map_err(|source| RunError::Io { program: name, source })?;
        Ok(status)
    }

    fn finish<S: AsRef<OsStr>>(&self, argv: &[S], status: ExitStatus, output: String) -> RunResult<String> {
        let program = program_name(argv);
        if status.success() {
            self.logger.debug(&format!("[Runner] {} exited with status 0", program));
            return Ok(output);
        }
        let err = RunError::Exit {
            program,
            code: status.code(),
            output,
        };
        self.logger.warn(&format!("[Runner] {}", err));
        Err(err)
    }
}

/// Forwards chunks from both pipes to every sink.
///
/// A chunk goes to all sinks before the next one starts, so sinks see the
/// same interleaving. After the first write failure the pipes are still
/// drained so the child cannot block on a full pipe.
struct Tee<'a> {
    sinks: &'a [Sink],
    state: Mutex<Option<io::Error>>,
}

impl<'a> Tee<'a> {
    fn new(sinks: &'a [Sink]) -> Self {
        Self {
            sinks,
            state: Mutex::new(None),
        }
    }

    fn pump(&self, mut pipe: impl Read) -> io::Result<()> {
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.forward(&buf[..n]);
        }
        Ok(())
    }

    /// First sink write failure, if any
    fn into_failure(self) -> Option<io::Error> {
        self.state.into_inner()
    }

    fn forward(&self, chunk: &[u8]) {
        let mut failed = self.state.lock();
        if failed.is_some() {
            return;
        }
        for sink in self.sinks {
            if let Err(err) = sink.write_all(chunk) {
                *failed = Some(io::Error::new(
                    err.kind(),
                    format!("write to sink '{}' failed: {}", sink.label(), err),
                ));
                return;
            }
        }
    }
}

fn program_name<S: AsRef<OsStr>>(argv: &[S]) -> String {
    argv.first()
        .map(|p| p.as_ref().to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn command_line<S: AsRef<OsStr>>(argv: &[S]) -> String {
    argv.iter()
        .map(|arg| arg.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `argv` with a silent default runner, echoing output to stdout
pub fn run<S: AsRef<OsStr>>(argv: &[S]) -> RunResult<String> {
    Runner::default().run(argv)
}

/// Run `argv` with a silent default runner, capturing output only
pub fn run_silent<S: AsRef<OsStr>>(argv: &[S]) -> RunResult<String> {
    Runner::default().run_silent(argv)
}

/// Run `argv` with a silent default runner, forwarding output to `sinks`
pub fn run_with_sinks<S: AsRef<OsStr>>(argv: &[S], sinks: &[Sink]) -> RunResult<()> {
    Runner::default().run_with_sinks(argv, sinks)
}
