//! Caller location resolution
//!
//! The `%file`, `%func` and `%line` fields describe the code that called the
//! logger. How that location is found is hidden behind [`CallerResolver`] so
//! the emitter does not depend on a particular mechanism.
//!
//! Depths count frames outward from the emitter:
//! - `1` is the public logging method (`info`, `warn_with_level`, ...)
//! - `2` is whoever called it (the default)
//! - `3` is that caller's caller, useful for logging helpers

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Symbol of the emitter frame that depths are counted from
pub(crate) const ANCHOR_SYMBOL: &str = "MsgLogger::emit_frame";

/// Where a log call came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// File name without directory or extension
    pub file: String,
    /// Function path, `"?"` when unknown
    pub func: String,
    pub line: u32,
}

impl CallSite {
    pub fn new(file: impl AsRef<str>, func: impl Into<String>, line: u32) -> Self {
        Self {
            file: strip_file(file.as_ref()),
            func: func.into(),
            line,
        }
    }

    /// Site from a `#[track_caller]` location. The function is unknown.
    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), "?", location.line())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.func, self.line)
    }
}

/// Resolves the call site `depth` frames out from the emitter
pub trait CallerResolver: Send + Sync {
    /// `None` when the frame cannot be determined
    fn resolve(&self, depth: usize) -> Option<CallSite>;
}

/// Resolver that walks a captured stack backtrace.
///
/// Needs debug info to report files and lines; without it every lookup
/// returns `None` and the emitter falls back to the `#[track_caller]` site.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceResolver;

impl BacktraceResolver {
    pub fn new() -> Self {
        Self
    }
}

impl CallerResolver for BacktraceResolver {
    fn resolve(&self, depth: usize) -> Option<CallSite> {
        let backtrace = Backtrace::force_capture();
        if backtrace.status() != BacktraceStatus::Captured {
            return None;
        }
        let frames = parse_frames(&backtrace.to_string());
        let anchor = frames.iter().position(|f| f.symbol.contains(ANCHOR_SYMBOL))?;
        let frame = frames.get(anchor + depth)?;
        let file = frame.file.as_deref()?;
        let line = frame.line?;
        Some(CallSite::new(file, trim_hash(&frame.symbol), line))
    }
}

#[derive(Debug, Default, PartialEq)]
struct Frame {
    symbol: String,
    file: Option<String>,
    line: Option<u32>,
}

/// Parse the display form of a backtrace:
///
/// ```text
///    3: my_crate::module::function
///              at ./src/module.rs:42:9
/// ```
fn parse_frames(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let mut parts = location.rsplitn(3, ':');
                let _column = parts.next();
                let line_no = parts.next().and_then(|l| l.parse().ok());
                if let (Some(line_no), Some(file)) = (line_no, parts.next()) {
                    frame.file = Some(file.to_string());
                    frame.line = Some(line_no);
                }
            }
            continue;
        }
        if let Some((index, symbol)) = trimmed.split_once(": ") {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                frames.push(Frame {
                    symbol: symbol.trim().to_string(),
                    ..Default::default()
                });
            }
        }
    }
    frames
}

/// Drop a trailing `::h0123456789abcdef` symbol hash
fn trim_hash(symbol: &str) -> String {
    match symbol.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) => {
            head.to_string()
        }
        _ => symbol.to_string(),
    }
}

fn strip_file(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
   0: std::backtrace::Backtrace::force_capture
             at /rustc/abc/library/std/src/backtrace.rs:312:13
   1: msgkit_core::logging::caller::BacktraceResolver::resolve
             at ./crates/msgkit-core/src/logging/caller.rs:70:25
   2: msgkit_core::logging::emitter::MsgLogger::emit_frame
             at ./crates/msgkit-core/src/logging/emitter.rs:200:13
   3: msgkit_core::logging::emitter::MsgLogger::info
             at ./crates/msgkit-core/src/logging/emitter.rs:120:9
   4: my_app::handlers::serve::h0123456789abcdef
             at ./src/handlers.rs:42:5
   5: __libc_start_main
";

    #[test]
    fn test_parse_frames() {
        let frames = parse_frames(SAMPLE);
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[4].symbol, "my_app::handlers::serve::h0123456789abcdef");
        assert_eq!(frames[4].file.as_deref(), Some("./src/handlers.rs"));
        assert_eq!(frames[4].line, Some(42));
        assert_eq!(frames[5].file, None);
    }

    #[test]
    fn test_anchor_offsets() {
        let frames = parse_frames(SAMPLE);
        let anchor = frames.iter().position(|f| f.symbol.contains(ANCHOR_SYMBOL)).unwrap();
        assert_eq!(anchor, 2);
        assert!(frames[anchor + 1].symbol.ends_with("MsgLogger::info"));
        assert!(frames[anchor + 2].symbol.starts_with("my_app::handlers::serve"));
    }

    #[test]
    fn test_trim_hash() {
        assert_eq!(trim_hash("a::b::h0123456789abcdef"), "a::b");
        assert_eq!(trim_hash("a::b::hello"), "a::b::hello");
        assert_eq!(trim_hash("main"), "main");
    }

    #[test]
    fn test_call_site_strips_file() {
        let site = CallSite::new("/src/project/tester.rs", "tester::main", 7);
        assert_eq!(site.file, "tester");
        assert_eq!(site.to_string(), "tester:tester::main:7");

        let site = CallSite::new("C:\\code\\main.rs", "main", 1);
        assert!(site.file.ends_with("main"));
    }

    #[test]
    fn test_from_location() {
        let site = CallSite::from_location(Location::caller());
        assert_eq!(site.file, "caller");
        assert_eq!(site.func, "?");
        assert!(site.line > 0);
    }
}
