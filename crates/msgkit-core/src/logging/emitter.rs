//! Template-driven message logger
//!
//! `MsgLogger` renders each message through a compiled [`Template`] and writes
//! the line to every configured sink, in order, before returning. There is no
//! buffering and no background thread.
//!
//! ```no_run
//! use msgkit_core::logging::{MsgLogger, Sink};
//! use msgkit_core::msg_info;
//!
//! let mut log = MsgLogger::new(
//!     "MyPackage",
//!     "%pkg %(-27)time %(-7)type %file %line - %msg",
//!     "",
//!     vec![Sink::stdout()],
//! )?;
//!
//! msg_info!(log, "pid = {}", std::process::id())?;
//!
//! log.debug_enabled = false;
//! msg_info!(log, "debug messages are now suppressed")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Timelike, Utc};
use chrono_tz::Tz;

use super::caller::{BacktraceResolver, CallSite, CallerResolver};
use super::error::{EmitError, EmitResult, EmitResultExt, MsgError, MsgResult};
use super::level::Level;
use super::sink::Sink;
use super::traits::Logger;
use crate::config::LoggerConfig;
use crate::template::{FieldId, Template};

/// Template used when none is given
pub const DEFAULT_TEMPLATE: &str = "%(-27)time %(-7)type %file %line - %msg";

/// Timestamp pattern used when none is given (chrono strftime syntax).
///
/// Date, 24 hour time with milliseconds, and the zone abbreviation.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %Z";

/// Exit code used by [`MsgLogger::err`] unless changed
pub const DEFAULT_EXIT_CODE: i32 = 1;

/// Caller depth used by the plain level methods: the caller of the method
pub const DEFAULT_DEPTH: usize = 2;

/// Configurable message logger.
///
/// The public fields may be changed at any time by the owner. The logger does
/// no locking of its own; share it behind a `Mutex` or hand out clones when
/// several threads log through it.
#[derive(Clone)]
pub struct MsgLogger {
    /// Rendered by `%pkg`
    pub name: String,
    pub debug_enabled: bool,
    pub info_enabled: bool,
    pub warning_enabled: bool,
    /// Process exit code for [`MsgLogger::err`]
    pub error_exit_code: i32,
    /// Destinations, written in order
    pub sinks: Vec<Sink>,
    time_format: String,
    /// `None` renders `%time` with chrono's `Local`
    zone: Option<Tz>,
    template: Template,
    resolver: Arc<dyn CallerResolver>,
}

impl MsgLogger {
    /// Create a logger.
    ///
    /// - `name` - rendered by `%pkg`
    /// - `template` - message template, `""` selects [`DEFAULT_TEMPLATE`]
    /// - `time_format` - strftime pattern, `""` selects [`DEFAULT_TIME_FORMAT`]
    /// - `sinks` - destinations, empty selects standard output
    ///
    /// Fails if the template or the time format is malformed.
    pub fn new(
        name: impl Into<String>,
        template: &str,
        time_format: &str,
        sinks: Vec<Sink>,
    ) -> MsgResult<Self> {
        let template = if template.is_empty() { DEFAULT_TEMPLATE } else { template };
        let time_format = if time_format.is_empty() { DEFAULT_TIME_FORMAT } else { time_format };
        validate_time_format(time_format)?;

        let sinks = if sinks.is_empty() { vec![Sink::stdout()] } else { sinks };

        Ok(Self {
            name: name.into(),
            debug_enabled: true,
            info_enabled: true,
            warning_enabled: true,
            error_exit_code: DEFAULT_EXIT_CODE,
            sinks,
            time_format: time_format.to_string(),
            zone: local_zone(),
            template: Template::compile(template)?,
            resolver: Arc::new(BacktraceResolver::new()),
        })
    }

    /// Create a logger from a loaded configuration
    pub fn from_config(config: &LoggerConfig, sinks: Vec<Sink>) -> MsgResult<Self> {
        let mut logger = Self::new(&config.name, &config.template, &config.time_format, sinks)?;
        logger.debug_enabled = config.debug;
        logger.info_enabled = config.info;
        logger.warning_enabled = config.warning;
        logger.error_exit_code = config.exit_code;
        Ok(logger)
    }

    /// Replace how caller locations are found
    pub fn with_resolver(mut self, resolver: impl CallerResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Render `%time` in `zone` instead of the resolved local zone
    pub fn with_time_zone(mut self, zone: Tz) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Zone used for `%time`, `None` when the local zone could not be resolved
    pub fn time_zone(&self) -> Option<Tz> {
        self.zone
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    /// Change the timestamp pattern; `""` selects the default
    pub fn set_time_format(&mut self, time_format: &str) -> MsgResult<()> {
        let time_format = if time_format.is_empty() { DEFAULT_TIME_FORMAT } else { time_format };
        validate_time_format(time_format)?;
        self.time_format = time_format.to_string();
        Ok(())
    }

    /// Whether messages of `level` are written. Errors always are.
    pub fn is_enabled(&self, level: Level) -> bool {
        match level {
            Level::Debug => self.debug_enabled,
            Level::Info => self.info_enabled,
            Level::Warning => self.warning_enabled,
            Level::Error => true,
        }
    }

    /// Enable or disable a level. The error level cannot be disabled.
    pub fn set_enabled(&mut self, level: Level, enabled: bool) {
        match level {
            Level::Debug => self.debug_enabled = enabled,
            Level::Info => self.info_enabled = enabled,
            Level::Warning => self.warning_enabled = enabled,
            Level::Error => {}
        }
    }

    /// Enable `level` and everything above it, disable everything below
    pub fn set_min_level(&mut self, level: Level) {
        for l in [Level::Debug, Level::Info, Level::Warning] {
            self.set_enabled(l, l >= level);
        }
    }

    pub fn add_sink(&mut self, sink: Sink) {
        self.sinks.push(sink);
    }

    /// Remove every handle to the same destination as `sink`
    pub fn remove_sink(&mut self, sink: &Sink) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|s| !s.same_as(sink));
        self.sinks.len() != before
    }

    #[track_caller]
    #[inline(never)]
    pub fn debug(&self, args: fmt::Arguments<'_>) -> EmitResult<()> {
        self.emit_frame(Level::Debug, DEFAULT_DEPTH, args)
    }

    /// Like [`debug`](Self::debug), attributing the message to the caller at `depth`
    #[track_caller]
    #[inline(never)]
    pub fn debug_with_level(&self, depth: usize, args: fmt::Arguments<'_>) -> EmitResult<()> {
        self.emit_frame(Level::Debug, depth, args)
    }

    #[track_caller]
    #[inline(never)]
    pub fn info(&self, args: fmt::Arguments<'_>) -> EmitResult<()> {
        self.emit_frame(Level::Info, DEFAULT_DEPTH, args)
    }

    #[track_caller]
    #[inline(never)]
    pub fn info_with_level(&self, depth: usize, args: fmt::Arguments<'_>) -> EmitResult<()> {
        self.emit_frame(Level::Info, depth, args)
    }

    #[track_caller]
    #[inline(never)]
    pub fn warn(&self, args: fmt::Arguments<'_>) -> EmitResult<()> {
        self.emit_frame(Level::Warning, DEFAULT_DEPTH, args)
    }

    #[track_caller]
    #[inline(never)]
    pub fn warn_with_level(&self, depth: usize, args: fmt::Arguments<'_>) -> EmitResult<()> {
        self.emit_frame(Level::Warning, depth, args)
    }

    /// Write an error message and keep running
    #[track_caller]
    #[inline(never)]
    pub fn err_no_exit(&self, args: fmt::Arguments<'_>) -> EmitResult<()> {
        self.emit_frame(Level::Error, DEFAULT_DEPTH, args)
    }

    #[track_caller]
    #[inline(never)]
    pub fn err_no_exit_with_level(&self, depth: usize, args: fmt::Arguments<'_>) -> EmitResult<()> {
        self.emit_frame(Level::Error, depth, args)
    }

    /// Write an error message, then exit with [`error_exit_code`](Self::error_exit_code).
    ///
    /// If a sink fails the fault is reported on stderr and the process still
    /// exits with the same code.
    #[track_caller]
    #[inline(never)]
    pub fn err(&self, args: fmt::Arguments<'_>) -> ! {
        let result = self.emit_frame(Level::Error, DEFAULT_DEPTH, args);
        self.exit_after(result)
    }

    #[track_caller]
    #[inline(never)]
    pub fn err_with_level(&self, depth: usize, args: fmt::Arguments<'_>) -> ! {
        let result = self.emit_frame(Level::Error, depth, args);
        self.exit_after(result)
    }

    /// Write a message of any level, attributed to the caller at `depth`
    #[track_caller]
    #[inline(never)]
    pub fn log(&self, level: Level, depth: usize, args: fmt::Arguments<'_>) -> EmitResult<()> {
        self.emit_frame(level, depth, args)
    }

    /// Write formatted text to every sink as-is.
    ///
    /// The template is not used: no fields, no timestamp, no added newline.
    #[track_caller]
    pub fn raw_write(&self, args: fmt::Arguments<'_>) -> EmitResult<()> {
        let text = match args.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(args.to_string()),
        };
        let site = CallSite::from_location(Location::caller());
        self.write_all(&text, &site)
    }

    /// Depths passed to the resolver are counted from this frame.
    #[track_caller]
    #[inline(never)]
    fn emit_frame(&self, level: Level, depth: usize, args: fmt::Arguments<'_>) -> EmitResult<()> {
        if !self.is_enabled(level) {
            return Ok(());
        }
        let fallback = Location::caller();
        let needs_site = self.template.fields().iter().any(FieldId::needs_call_site);
        let site = if needs_site {
            self.resolver
                .resolve(depth)
                .unwrap_or_else(|| CallSite::from_location(fallback))
        } else {
            CallSite::from_location(fallback)
        };

        let message = fmt::format(args);
        let line = self.render_line(level, &site, &message, now_millis());
        self.write_all(&line, &site)
    }

    fn render_line(&self, level: Level, site: &CallSite, message: &str, now: DateTime<Utc>) -> String {
        let mut line = self.template.render(|id| {
            match id {
                FieldId::File => Cow::Borrowed(site.file.as_str()),
                FieldId::Func => Cow::Borrowed(site.func.as_str()),
                FieldId::Line => Cow::Owned(site.line.to_string()),
                FieldId::Msg => Cow::Borrowed(message),
                FieldId::Pkg => Cow::Borrowed(self.name.as_str()),
                FieldId::Time => Cow::Owned(self.local_time(now)),
                FieldId::Utc => Cow::Owned(now.format(&self.time_format).to_string()),
                FieldId::Type => Cow::Borrowed(level.as_str()),
            }
        });
        line.push('\n');
        line
    }

    fn local_time(&self, now: DateTime<Utc>) -> String {
        match self.zone {
            Some(zone) => now.with_timezone(&zone).format(&self.time_format).to_string(),
            None => now.with_timezone(&Local).format(&self.time_format).to_string(),
        }
    }

    fn write_all(&self, text: &str, site: &CallSite) -> EmitResult<()> {
        for sink in &self.sinks {
            sink.write_all(text.as_bytes())
                .map_err(|e| EmitError::sink_write(sink.label(), site.clone(), text, e))?;
        }
        Ok(())
    }

    fn exit_after(&self, result: EmitResult<()>) -> ! {
        if let Err(err) = result {
            eprintln!("ERROR: {}", err);
        }
        std::process::exit(self.error_exit_code)
    }
}

impl fmt::Debug for MsgLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MsgLogger")
            .field("name", &self.name)
            .field("debug_enabled", &self.debug_enabled)
            .field("info_enabled", &self.info_enabled)
            .field("warning_enabled", &self.warning_enabled)
            .field("error_exit_code", &self.error_exit_code)
            .field("sinks", &self.sinks)
            .field("time_format", &self.time_format)
            .field("zone", &self.zone)
            .field("template", &self.template.source())
            .finish()
    }
}

/// Bridge for code written against the runtime-agnostic [`Logger`] trait.
///
/// There is no caller to hand a fault to here, so sink failures abort.
/// `error` does not exit.
impl Logger for MsgLogger {
    #[track_caller]
    fn debug(&self, message: &str) {
        self.emit_frame(Level::Debug, DEFAULT_DEPTH, format_args!("{}", message))
            .or_abort()
    }

    #[track_caller]
    fn info(&self, message: &str) {
        self.emit_frame(Level::Info, DEFAULT_DEPTH, format_args!("{}", message))
            .or_abort()
    }

    #[track_caller]
    fn warn(&self, message: &str) {
        self.emit_frame(Level::Warning, DEFAULT_DEPTH, format_args!("{}", message))
            .or_abort()
    }

    #[track_caller]
    fn error(&self, message: &str) {
        self.emit_frame(Level::Error, DEFAULT_DEPTH, format_args!("{}", message))
            .or_abort()
    }
}

fn validate_time_format(time_format: &str) -> MsgResult<()> {
    if StrftimeItems::new(time_format).any(|item| matches!(item, Item::Error)) {
        return Err(MsgError::TimeFormat(time_format.to_string()));
    }
    Ok(())
}

/// The local IANA zone: `TZ` when set, otherwise the system zone.
///
/// `None` when the name is not in the zone database.
fn local_zone() -> Option<Tz> {
    match std::env::var("TZ") {
        Ok(name) => name.trim_start_matches(':').parse().ok(),
        Err(_) => iana_time_zone::get_timezone().ok()?.parse().ok(),
    }
}

/// Current instant truncated to whole milliseconds
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    let nanos = now.nanosecond() / 1_000_000 * 1_000_000;
    now.with_nanosecond(nanos).unwrap_or(now)
}

/// Log a debug message through a [`MsgLogger`]
#[macro_export]
macro_rules! msg_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(format_args!($($arg)*))
    };
}

/// Log an info message through a [`MsgLogger`]
#[macro_export]
macro_rules! msg_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(format_args!($($arg)*))
    };
}

/// Log a warning through a [`MsgLogger`]
#[macro_export]
macro_rules! msg_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(format_args!($($arg)*))
    };
}

/// Log an error and exit the process
#[macro_export]
macro_rules! msg_err {
    ($logger:expr, $($arg:tt)*) => {
        $logger.err(format_args!($($arg)*))
    };
}

/// Log an error and keep running
#[macro_export]
macro_rules! msg_err_no_exit {
    ($logger:expr, $($arg:tt)*) => {
        $logger.err_no_exit(format_args!($($arg)*))
    };
}

/// Write formatted text to every sink, bypassing the template
#[macro_export]
macro_rules! msg_raw {
    ($logger:expr, $($arg:tt)*) => {
        $logger.raw_write(format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use parking_lot::Mutex;
    use std::io;

    /// Resolver returning a fixed site and recording requested depths
    #[derive(Default)]
    struct RecordingResolver {
        depths: Arc<Mutex<Vec<usize>>>,
    }

    impl CallerResolver for RecordingResolver {
        fn resolve(&self, depth: usize) -> Option<CallSite> {
            self.depths.lock().push(depth);
            Some(CallSite::new("src/handler.rs", "app::handler", 99))
        }
    }

    struct BrokenWriter;

    impl io::Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logger_with(template: &str, sinks: Vec<Sink>) -> (MsgLogger, Arc<Mutex<Vec<usize>>>) {
        let resolver = RecordingResolver::default();
        let depths = resolver.depths.clone();
        let logger = MsgLogger::new("Tester", template, "", sinks)
            .unwrap()
            .with_resolver(resolver);
        (logger, depths)
    }

    #[test]
    fn test_defaults() {
        let logger = MsgLogger::new("pkg", "", "", vec![]).unwrap();
        assert_eq!(logger.template().source(), DEFAULT_TEMPLATE);
        assert_eq!(logger.time_format(), DEFAULT_TIME_FORMAT);
        assert_eq!(logger.sinks.len(), 1);
        assert!(logger.sinks[0].same_as(&Sink::stdout()));
        assert!(logger.debug_enabled && logger.info_enabled && logger.warning_enabled);
        assert_eq!(logger.error_exit_code, 1);
    }

    #[test]
    fn test_malformed_template_fails_construction() {
        let err = MsgLogger::new("pkg", "%linex", "", vec![]).unwrap_err();
        assert!(matches!(err, MsgError::Template(_)));
        assert!(err.to_string().contains("linex"));

        let err = MsgLogger::new("pkg", "%(-27", "", vec![]).unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_invalid_time_format() {
        let err = MsgLogger::new("pkg", "", "%Y %!", vec![]).unwrap_err();
        assert_eq!(err, MsgError::TimeFormat("%Y %!".to_string()));

        let mut logger = MsgLogger::new("pkg", "", "%Y", vec![]).unwrap();
        assert!(logger.set_time_format("%!").is_err());
        assert_eq!(logger.time_format(), "%Y");
        logger.set_time_format("").unwrap();
        assert_eq!(logger.time_format(), DEFAULT_TIME_FORMAT);
    }

    #[test]
    fn test_line_goes_to_every_sink() {
        let a = MemorySink::new();
        let b = MemorySink::new();
        let (logger, _) = logger_with("%pkg %(-7)type %file %line %func - %msg", vec![a.sink(), b.sink()]);

        logger.info(format_args!("hello {}", 5)).unwrap();

        let expected = "Tester INFO    handler 99 app::handler - hello 5\n";
        assert_eq!(a.contents(), expected);
        assert_eq!(b.contents(), expected);
    }

    #[test]
    fn test_level_names_rendered() {
        let out = MemorySink::new();
        let (logger, _) = logger_with("%type:%msg", vec![out.sink()]);

        logger.debug(format_args!("d")).unwrap();
        logger.info(format_args!("i")).unwrap();
        logger.warn(format_args!("w")).unwrap();
        logger.err_no_exit(format_args!("e")).unwrap();

        assert_eq!(out.lines(), vec!["DEBUG:d", "INFO:i", "WARNING:w", "ERROR:e"]);
    }

    #[test]
    fn test_disabled_level_is_silent() {
        let out = MemorySink::new();
        let copy = MemorySink::new();
        let (mut logger, depths) = logger_with("%type %file %msg", vec![out.sink(), copy.sink()]);

        logger.info(format_args!("before")).unwrap();
        logger.debug_enabled = false;
        logger.debug(format_args!("hidden")).unwrap();
        logger.debug_enabled = true;
        logger.debug(format_args!("shown")).unwrap();

        logger.warning_enabled = false;
        logger.warn(format_args!("hidden")).unwrap();
        logger.warning_enabled = true;

        logger.info_enabled = false;
        logger.info(format_args!("hidden")).unwrap();
        logger.info_enabled = true;
        logger.warn(format_args!("after")).unwrap();

        let expected = vec!["INFO handler before", "DEBUG handler shown", "WARNING handler after"];
        assert_eq!(out.lines(), expected);
        assert_eq!(copy.lines(), expected);
        // no location lookups for suppressed calls
        assert_eq!(depths.lock().len(), 3);
    }

    #[test]
    fn test_error_level_cannot_be_disabled() {
        let out = MemorySink::new();
        let (mut logger, _) = logger_with("%msg", vec![out.sink()]);
        logger.set_enabled(Level::Error, false);
        logger.set_min_level(Level::Error);
        assert!(logger.is_enabled(Level::Error));
        assert!(!logger.is_enabled(Level::Warning));

        logger.warn(format_args!("dropped")).unwrap();
        logger.err_no_exit(format_args!("kept")).unwrap();
        assert_eq!(out.lines(), vec!["kept"]);
    }

    #[test]
    fn test_set_min_level() {
        let (mut logger, _) = logger_with("%msg", vec![MemorySink::new().sink()]);
        logger.set_min_level(Level::Info);
        assert!(!logger.debug_enabled);
        assert!(logger.info_enabled);
        assert!(logger.warning_enabled);
    }

    #[test]
    fn test_depths_passed_to_resolver() {
        let (logger, depths) = logger_with("%line %msg", vec![MemorySink::new().sink()]);

        logger.info(format_args!("a")).unwrap();
        logger.info_with_level(3, format_args!("b")).unwrap();
        logger.debug_with_level(4, format_args!("c")).unwrap();
        logger.warn_with_level(5, format_args!("d")).unwrap();
        logger.err_no_exit_with_level(6, format_args!("e")).unwrap();
        logger.log(Level::Info, 7, format_args!("f")).unwrap();

        assert_eq!(*depths.lock(), vec![DEFAULT_DEPTH, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_location_skipped_when_template_has_no_site_fields() {
        let out = MemorySink::new();
        let (logger, depths) = logger_with("%type %msg", vec![out.sink()]);
        logger.info(format_args!("x")).unwrap();
        assert!(depths.lock().is_empty());
        assert_eq!(out.contents(), "INFO x\n");
    }

    #[test]
    fn test_raw_write_bypasses_template() {
        let out = MemorySink::new();
        let other = MemorySink::new();
        let (logger, depths) = logger_with("%(-27)time %type %file - %msg", vec![out.sink(), other.sink()]);

        logger.raw_write(format_args!("any old %msg {}", "stuff")).unwrap();
        logger.raw_write(format_args!("literal")).unwrap();

        assert_eq!(out.contents(), "any old %msg stuffliteral");
        assert_eq!(other.contents(), "any old %msg stuffliteral");
        assert!(depths.lock().is_empty());
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let first = MemorySink::new();
        let last = MemorySink::new();
        let sinks = vec![first.sink(), Sink::new("broken", BrokenWriter), last.sink()];
        let (logger, _) = logger_with("%type %msg", sinks);

        let err = logger.info(format_args!("lost")).unwrap_err();
        match &err {
            EmitError::SinkWrite { sink, site, line, source } => {
                assert_eq!(sink, "broken");
                assert_eq!(site.line, 99);
                assert_eq!(line, "INFO lost\n");
                assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
            }
        }
        assert_eq!(first.contents(), "INFO lost\n");
        assert!(last.is_empty());

        let err = logger.raw_write(format_args!("raw")).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_time_fields() {
        let out = MemorySink::new();
        let logger = MsgLogger::new("t", "%time|%utc", "%Y|%S%.3f", vec![out.sink()]).unwrap();
        logger.info(format_args!("ignored")).unwrap();

        let line = out.contents();
        let fields: Vec<&str> = line.trim_end().split('|').collect();
        assert_eq!(fields.len(), 4);
        let year = Utc::now().format("%Y").to_string();
        assert_eq!(fields[2], year);
        // same instant, milliseconds only
        assert_eq!(fields[1], fields[3]);
        let (secs, millis) = fields[3].split_once('.').unwrap();
        assert_eq!(secs.len(), 2);
        assert_eq!(millis.len(), 3);
    }

    #[test]
    fn test_local_time_uses_zone_abbreviation() {
        use chrono::TimeZone;

        let denver: Tz = "America/Denver".parse().unwrap();
        let logger = MsgLogger::new("t", "%time|%utc", "", vec![MemorySink::new().sink()])
            .unwrap()
            .with_time_zone(denver);
        assert_eq!(logger.time_zone(), Some(denver));
        let site = CallSite::new("main.rs", "main", 1);

        let winter = Utc.with_ymd_and_hms(2026, 1, 15, 19, 0, 0).unwrap().with_nanosecond(123_000_000).unwrap();
        assert_eq!(
            logger.render_line(Level::Info, &site, "m", winter),
            "2026-01-15 12:00:00.123 MST|2026-01-15 19:00:00.123 UTC\n"
        );

        let summer = Utc.with_ymd_and_hms(2026, 7, 15, 18, 0, 0).unwrap();
        assert_eq!(
            logger.render_line(Level::Info, &site, "m", summer),
            "2026-07-15 12:00:00.000 MDT|2026-07-15 18:00:00.000 UTC\n"
        );
    }

    #[test]
    fn test_clone_is_a_snapshot() {
        let a = MemorySink::new();
        let b = MemorySink::new();
        let (mut logger, _) = logger_with("%msg", vec![a.sink()]);
        let snapshot = logger.clone();

        logger.add_sink(b.sink());
        logger.info_enabled = false;

        snapshot.info(format_args!("from snapshot")).unwrap();
        assert_eq!(a.lines(), vec!["from snapshot"]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_add_and_remove_sink() {
        let a = MemorySink::new();
        let b = MemorySink::new();
        let (mut logger, _) = logger_with("%msg", vec![a.sink()]);

        logger.add_sink(b.sink());
        logger.info(format_args!("both")).unwrap();
        assert!(logger.remove_sink(&b.sink()));
        assert!(!logger.remove_sink(&b.sink()));
        logger.info(format_args!("one")).unwrap();

        assert_eq!(a.lines(), vec!["both", "one"]);
        assert_eq!(b.lines(), vec!["both"]);
    }

    #[test]
    fn test_macros() {
        let out = MemorySink::new();
        let (logger, _) = logger_with("%type %msg", vec![out.sink()]);
        let n = 3;

        crate::msg_debug!(logger, "n = {}", n).unwrap();
        crate::msg_info!(logger, "n = {n}").unwrap();
        crate::msg_warn!(&logger, "warn {}", n + 1).unwrap();
        crate::msg_err_no_exit!(logger, "recoverable").unwrap();
        crate::msg_raw!(logger, "raw {}\n", n).unwrap();

        assert_eq!(
            out.lines(),
            vec!["DEBUG n = 3", "INFO n = 3", "WARNING warn 4", "ERROR recoverable", "raw 3"]
        );
    }

    #[test]
    fn test_logger_trait_bridge() {
        let out = MemorySink::new();
        let (logger, depths) = logger_with("%type %line %msg", vec![out.sink()]);
        let shared: Arc<dyn Logger> = Arc::new(logger);

        shared.debug("d");
        shared.info("i");
        shared.warn("w");
        shared.error("e");

        assert_eq!(out.lines(), vec!["DEBUG 99 d", "INFO 99 i", "WARNING 99 w", "ERROR 99 e"]);
        assert_eq!(*depths.lock(), vec![DEFAULT_DEPTH; 4]);
    }

    /// Resolver that never finds a frame, forcing the `#[track_caller]` site
    struct UnresolvedCaller;

    impl CallerResolver for UnresolvedCaller {
        fn resolve(&self, _depth: usize) -> Option<CallSite> {
            None
        }
    }

    #[test]
    fn test_logger_trait_reports_its_caller() {
        let out = MemorySink::new();
        let logger = MsgLogger::new("t", "%file|%line|%func", "", vec![out.sink()])
            .unwrap()
            .with_resolver(UnresolvedCaller);

        let expected_line = line!() + 1;
        Logger::warn(&logger, "via trait");

        assert_eq!(out.contents(), format!("emitter|{}|?\n", expected_line));
    }

    #[test]
    fn test_backtrace_resolution_of_caller() {
        let out = MemorySink::new();
        let logger = MsgLogger::new("t", "%file|%line|%func", "", vec![out.sink()]).unwrap();

        let expected_line = line!() + 1;
        logger.info(format_args!("here")).unwrap();

        let line = out.contents();
        let parts: Vec<&str> = line.trim_end().split('|').collect();
        assert_eq!(parts[0], "emitter");
        assert_eq!(parts[1], expected_line.to_string());
        // "?" when the test binary has no usable debug info
        assert!(
            parts[2] == "?" || parts[2].contains("test_backtrace_resolution_of_caller"),
            "unexpected func {}",
            parts[2]
        );
    }

    #[inline(never)]
    fn log_from_helper(logger: &MsgLogger) {
        logger.info_with_level(3, format_args!("helper")).unwrap();
    }

    #[test]
    fn test_backtrace_resolution_at_depth() {
        let out = MemorySink::new();
        let logger = MsgLogger::new("t", "%line|%func", "", vec![out.sink()]).unwrap();

        let expected_line = line!() + 1;
        log_from_helper(&logger);

        let line = out.contents();
        let (line_no, func) = line.trim_end().split_once('|').unwrap();
        if func != "?" {
            assert_eq!(line_no, expected_line.to_string());
            assert!(func.contains("test_backtrace_resolution_at_depth"), "unexpected func {}", func);
        }
    }
}
