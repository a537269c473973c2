//! Template scanner
//!
//! Translates a human-authored template into a render template and the
//! ordered list of fields to substitute at each log call.
//!
//! ```text
//! input  = "MYSTUFF %(-27)time %(-7)type %file %line - %msg"
//!
//! render = "MYSTUFF %-27v %-7v %v %v - %v"
//! fields = [time, type, file, line, msg]
//! ```

use std::fmt;
use std::str::FromStr;

use super::error::{CompileError, CompileResult};
use super::field::{is_ident_continuation, FieldId};
use super::format::FieldFormat;

/// One piece of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied verbatim from the template
    Literal(String),
    /// A field placeholder with its formatting
    Field { id: FieldId, format: FieldFormat },
}

/// A compiled message template. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    render: String,
    segments: Vec<Segment>,
    fields: Vec<FieldId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Copying template text
    Normal,
    /// Just saw a `%`
    Spec,
}

impl Template {
    /// Compile a template.
    ///
    /// Recognized forms are `%<id>` and `%(<fmt>)<id>`; everything else is
    /// copied verbatim. Compilation stops at the first error.
    pub fn compile(input: &str) -> CompileResult<Self> {
        let bytes = input.as_bytes();
        let mut builder = Builder::with_capacity(input.len());
        let mut state = State::Normal;
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            match state {
                State::Normal => {
                    if bytes[i] == b'%' {
                        builder.literal(&input[literal_start..i]);
                        state = State::Spec;
                    }
                    i += 1;
                }
                State::Spec => {
                    state = State::Normal;
                    let beg = i - 1;

                    let format = if bytes[i] == b'(' {
                        let close = match input[i..].find(')') {
                            Some(offset) => i + offset,
                            None => return Err(CompileError::Unterminated(input[beg..].to_string())),
                        };
                        let format = FieldFormat::parse(&input[i + 1..close], &input[beg..=close])?;
                        i = close + 1;
                        format
                    } else {
                        FieldFormat::plain()
                    };

                    let id = match match_field(&bytes[i..])? {
                        Some(id) => id,
                        None => return Err(CompileError::Syntax(input[beg..].to_string())),
                    };

                    builder.field(id, format);
                    i += id.as_str().len();
                    literal_start = i;
                }
            }
        }

        // A trailing '%' has nothing to introduce and is dropped.
        if state == State::Normal {
            builder.literal(&input[literal_start..]);
        }

        Ok(builder.finish(input))
    }

    /// The template text as supplied
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The printf-style render template, e.g. `"%-27v %-7v %v %v - %v"`
    pub fn render_template(&self) -> &str {
        &self.render
    }

    /// Fields in order of appearance; one per placeholder
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any placeholder refers to `id`
    pub fn uses(&self, id: FieldId) -> bool {
        self.fields.contains(&id)
    }

    /// Render a line, asking `value_of` for each placeholder in order.
    pub fn render<F, V>(&self, mut value_of: F) -> String
    where
        F: FnMut(FieldId) -> V,
        V: AsRef<str>,
    {
        let mut out = String::with_capacity(self.source.len() * 2);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { id, format } => format.apply(value_of(*id).as_ref(), &mut out),
            }
        }
        out
    }
}

impl FromStr for Template {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::compile(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Match an identifier at the start of `rest` in precedence order.
///
/// `Ok(None)` means no identifier is a prefix of `rest`.
fn match_field(rest: &[u8]) -> CompileResult<Option<FieldId>> {
    for id in FieldId::PRECEDENCE {
        let name = id.as_str().as_bytes();
        if !rest.starts_with(name) {
            continue;
        }
        if let Some(&next) = rest.get(name.len()) {
            if is_ident_continuation(next) {
                let mut token = id.as_str().to_string();
                token.push(next as char);
                return Err(CompileError::UnrecognizedId(token));
            }
        }
        return Ok(Some(id));
    }
    Ok(None)
}

struct Builder {
    render: String,
    segments: Vec<Segment>,
    fields: Vec<FieldId>,
}

impl Builder {
    fn with_capacity(n: usize) -> Self {
        Self {
            render: String::with_capacity(n),
            segments: Vec::new(),
            fields: Vec::new(),
        }
    }

    fn literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.render.push_str(text);
        match self.segments.last_mut() {
            Some(Segment::Literal(prev)) => prev.push_str(text),
            _ => self.segments.push(Segment::Literal(text.to_string())),
        }
    }

    fn field(&mut self, id: FieldId, format: FieldFormat) {
        self.render.push('%');
        self.render.push_str(format.raw());
        self.render.push('v');
        self.fields.push(id);
        self.segments.push(Segment::Field { id, format });
    }

    fn finish(self, source: &str) -> Template {
        Template {
            source: source.to_string(),
            render: self.render,
            segments: self.segments,
            fields: self.fields,
        }
    }
}
