use thiserror::Error;

use crate::source::Source;

/// Errors reported by scans, lookups and conversions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("syntax error at byte {offset}: {kind}")]
    Syntax { offset: usize, kind: SyntaxKind },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("number {text:?} does not fit in {target}")]
    InexactConversion { target: &'static str, text: String },

    /// The scan ran past the bytes currently buffered by a streaming
    /// source. Recovered internally by [`crate::StreamSource::pump`];
    /// callers of static sources never observe it.
    #[error("need more input")]
    InputExhausted,

    #[error("io error: {0}")]
    Io(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    #[error("invalid character 0x{0:02x}")]
    UnexpectedByte(u8),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated number")]
    UnterminatedNumber,
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn syntax(offset: usize, kind: SyntaxKind) -> Self {
        Error::Syntax { offset, kind }
    }

    /// Byte offset the error points at, when it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Syntax { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Decorates a syntax error with its line and column in `source`.
    ///
    /// Positions are not tracked during scanning; they are recovered here
    /// by counting newlines in the prefix, so the cost is paid only when a
    /// diagnostic is actually rendered.
    pub fn location<S: Source>(&self, source: &S) -> Option<Location> {
        self.offset().map(|o| Location::of(source, o))
    }
}

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn of<S: Source>(source: &S, offset: usize) -> Location {
        let mut line = 1;
        let mut column = 1;
        let end = offset.min(source.len());
        let mut i = 0;
        while i < end {
            if source.byte_at(i) == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            i = source.advance(i);
        }
        Location { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Text;

    #[test]
    fn location_counts_newlines_lazily() {
        let text = Text::from("{\n  \"a\": 1,\n  \"b\": x\n}");
        let err = Error::syntax(19, SyntaxKind::UnexpectedByte(b'x'));
        assert_eq!(
            err.location(&text),
            Some(Location { line: 3, column: 8 })
        );
    }

    #[test]
    fn non_positional_errors_have_no_location() {
        let text = Text::from("{}");
        assert_eq!(Error::KeyNotFound("a".into()).location(&text), None);
    }
}
