//! Field identifiers recognized in a message template

use std::fmt;

/// A field that can be substituted into a log line.
///
/// Templates reference fields with `%<id>` or `%(<fmt>)<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// Caller file name, directory and extension stripped
    File,
    /// Caller function (symbol) name
    Func,
    /// Caller line number
    Line,
    /// The formatted user message
    Msg,
    /// The logger name
    Pkg,
    /// Local timestamp
    Time,
    /// Level name: DEBUG, INFO, WARNING, ERROR
    Type,
    /// UTC timestamp
    Utc,
}

impl FieldId {
    /// Order in which identifiers are tried at a `%` marker.
    ///
    /// The first identifier that is a textual prefix of the remaining input wins.
    pub const PRECEDENCE: [FieldId; 8] = [
        FieldId::File,
        FieldId::Func,
        FieldId::Line,
        FieldId::Msg,
        FieldId::Pkg,
        FieldId::Time,
        FieldId::Type,
        FieldId::Utc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::File => "file",
            FieldId::Func => "func",
            FieldId::Line => "line",
            FieldId::Msg => "msg",
            FieldId::Pkg => "pkg",
            FieldId::Time => "time",
            FieldId::Type => "type",
            FieldId::Utc => "utc",
        }
    }

    /// Whether this field needs the caller location resolved
    pub fn needs_call_site(&self) -> bool {
        matches!(self, FieldId::File | FieldId::Func | FieldId::Line)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bytes that may continue an identifier.
///
/// A candidate followed by one of these is an over-match (`%linex`).
pub(crate) fn is_ident_continuation(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'$')
}
