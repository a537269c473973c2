//! Per-field print formatting
//!
//! The text inside `%(...)` is a printf-style spec applied to the field's
//! string value: flags, an optional width and an optional `.precision`.
//!
//! ```text
//! %(-27)time   left aligned, padded to 27 characters
//! %(8)line     right aligned, padded to 8 characters
//! %(08)line    right aligned, zero padded
//! %(.3)type    truncated to 3 characters
//! ```

use super::error::{CompileError, CompileResult};

/// Parsed formatting options for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFormat {
    raw: String,
    left: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl FieldFormat {
    /// The generic, unformatted placeholder (`%v`)
    pub fn plain() -> Self {
        Self::default()
    }

    /// Parse a spec captured from between the parentheses.
    ///
    /// `token` is the template text starting at the `%`, used in the error.
    pub fn parse(spec: &str, token: &str) -> CompileResult<Self> {
        let bytes = spec.as_bytes();
        let mut fmt = FieldFormat {
            raw: spec.to_string(),
            ..Default::default()
        };

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'-' => fmt.left = true,
                b'0' => fmt.zero = true,
                // accepted for printf compatibility, no effect on strings
                b'+' | b'#' | b' ' => {}
                _ => break,
            }
            i += 1;
        }

        let (width, next) = parse_number(bytes, i);
        fmt.width = width;
        i = next;

        if i < bytes.len() && bytes[i] == b'.' {
            let (precision, next) = parse_number(bytes, i + 1);
            fmt.precision = Some(precision.unwrap_or(0));
            i = next;
        }

        if i != bytes.len() {
            return Err(CompileError::invalid_field_format(spec, token));
        }
        Ok(fmt)
    }

    /// The spec text exactly as written in the template
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_left_aligned(&self) -> bool {
        self.left
    }

    pub fn width(&self) -> Option<usize> {
        self.width
    }

    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    /// Append `value` to `out` with this format applied.
    pub fn apply(&self, value: &str, out: &mut String) {
        let value = match self.precision {
            Some(p) => match value.char_indices().nth(p) {
                Some((idx, _)) => &value[..idx],
                None => value,
            },
            None => value,
        };

        let pad = self
            .width
            .map(|w| w.saturating_sub(value.chars().count()))
            .unwrap_or(0);

        if pad == 0 {
            out.push_str(value);
        } else if self.left {
            out.push_str(value);
            out.extend(std::iter::repeat(' ').take(pad));
        } else {
            let fill = if self.zero { '0' } else { ' ' };
            out.extend(std::iter::repeat(fill).take(pad));
            out.push_str(value);
        }
    }
}

fn parse_number(bytes: &[u8], start: usize) -> (Option<usize>, usize) {
    let mut i = start;
    let mut n: Option<usize> = None;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        let digit = (bytes[i] - b'0') as usize;
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(digit));
        i += 1;
    }
    (n, i)
}
