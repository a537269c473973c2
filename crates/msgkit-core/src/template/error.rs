//! Template compile errors

use thiserror::Error;

/// Errors that can occur while compiling a message template
///
/// Each variant carries the offending part of the template.
///
/// The scanner itself raises `Unterminated`, `UnrecognizedId` and `Syntax`.
/// `InvalidFieldFormat` is the one extra check: text inside `%( )` that is
/// not a printf-style flags/width/precision spec is rejected here so that
/// rendering can never fail later.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// `%(` without a closing `)`
    #[error("unterminated format spec: missing ')' for '{0}'")]
    Unterminated(String),

    /// A known identifier immediately followed by an identifier character
    #[error("unrecognized specification id '{0}'")]
    UnrecognizedId(String),

    /// Nothing recognizable after `%`
    #[error("specification syntax error '{0}'")]
    Syntax(String),

    /// The text between the parentheses is not a valid field format
    #[error("invalid field format '{spec}' in '{token}'")]
    InvalidFieldFormat { spec: String, token: String },
}

impl CompileError {
    /// Create an invalid field format error
    pub fn invalid_field_format(spec: impl Into<String>, token: impl Into<String>) -> Self {
        Self::InvalidFieldFormat {
            spec: spec.into(),
            token: token.into(),
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
