//! Stateless boundary scans.
//!
//! Every routine here is a pure function of `(source, offset)`: it reads
//! bytes forward until it can name the boundary it was asked for and
//! returns the offset, leaving navigation state to the caller. The
//! sentinel contract of [`Source`] lets the loops run without length
//! checks; a [`MORE_INPUT`] sentinel surfaces as
//! [`Error::InputExhausted`] so a streaming caller can refill and retry
//! the identical call.

use crate::error::{Error, Result, SyntaxKind};
use crate::source::{MORE_INPUT, Source, TERMINATOR};

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Whitespace plus the separators that carry no information between
/// tokens.
#[inline]
pub(crate) fn is_noise(b: u8) -> bool {
    is_whitespace(b) || b == b',' || b == b':'
}

#[inline]
pub(crate) fn is_number_start(b: u8) -> bool {
    b == b'-' || b.is_ascii_digit()
}

#[inline]
fn is_number_end(b: u8) -> bool {
    is_whitespace(b) || b == b'}' || b == b']' || b == b',' || b == TERMINATOR
}

pub(crate) fn skip_whitespace<S: Source>(src: &S, mut i: usize) -> usize {
    while is_whitespace(src.byte_at(i)) {
        i = src.advance(i);
    }
    i
}

/// Steps past the byte at `i`, then past any following noise. This is the
/// canonical move between members of a collection.
pub(crate) fn skip_noise<S: Source>(src: &S, i: usize) -> usize {
    let mut i = src.advance(i);
    while is_noise(src.byte_at(i)) {
        i = src.advance(i);
    }
    i
}

/// Offset of the last byte of the value whose first byte is at `i`.
pub fn end_of_value<S: Source>(src: &S, i: usize) -> Result<usize> {
    match src.byte_at(i) {
        b'{' | b'[' => end_of_collection(src, i),
        b'"' => Ok(end_of_string(src, i)?.end),
        b't' => expect_literal(src, i, b"true"),
        b'f' => expect_literal(src, i, b"false"),
        b'n' => expect_literal(src, i, b"null"),
        b if is_number_start(b) => end_of_number(src, i),
        MORE_INPUT => Err(Error::InputExhausted),
        TERMINATOR => Err(Error::syntax(i, SyntaxKind::UnexpectedEndOfInput)),
        b => Err(Error::syntax(i, SyntaxKind::UnexpectedByte(b))),
    }
}

/// Matching close bracket for the `{` or `[` at `i`.
///
/// Strings are skipped through [`end_of_string`] so that brackets inside
/// them do not disturb the nesting counter.
fn end_of_collection<S: Source>(src: &S, i: usize) -> Result<usize> {
    let mut depth = 1usize;
    let mut i = i;
    loop {
        i = skip_noise(src, i);
        match src.byte_at(i) {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            b'"' => i = end_of_string(src, i)?.end,
            b't' => i = expect_literal(src, i, b"true")?,
            b'f' => i = expect_literal(src, i, b"false")?,
            b'n' => i = expect_literal(src, i, b"null")?,
            MORE_INPUT => return Err(Error::InputExhausted),
            TERMINATOR => {
                return Err(Error::syntax(i, SyntaxKind::UnexpectedEndOfInput));
            }
            b if is_number_start(b) => i = end_of_number(src, i)?,
            b => return Err(Error::syntax(i, SyntaxKind::UnexpectedByte(b))),
        }
    }
}

/// Result of scanning a string token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StringEnd {
    /// Offset of the closing quote.
    pub end: usize,
    /// Whether a backslash appeared in the body. When `false` the body
    /// bytes are the decoded text and may be borrowed as-is.
    pub has_escape: bool,
}

/// Scans the string whose opening quote is at `i`.
///
/// A backslash consumes the following byte unconditionally, which is
/// enough to step over every escape form including the `u` of `\uXXXX`;
/// the hex digits that follow contain no quote or backslash and fall
/// through the plain loop.
pub(crate) fn end_of_string<S: Source>(src: &S, i: usize) -> Result<StringEnd> {
    let mut has_escape = false;
    let mut j = src.advance(i);
    loop {
        match src.byte_at(j) {
            b'"' => return Ok(StringEnd { end: j, has_escape }),
            b'\\' => {
                has_escape = true;
                j = src.advance(j);
                match src.byte_at(j) {
                    MORE_INPUT => return Err(Error::InputExhausted),
                    TERMINATOR => {
                        return Err(Error::syntax(i, SyntaxKind::UnterminatedString));
                    }
                    _ => j = src.advance(j),
                }
            }
            MORE_INPUT => return Err(Error::InputExhausted),
            TERMINATOR => {
                return Err(Error::syntax(i, SyntaxKind::UnterminatedString));
            }
            _ => j = src.advance(j),
        }
    }
}

/// Last byte of the number starting at `i`: the scan runs until a
/// delimiter (whitespace, close bracket, comma, terminator). Validity of
/// the covered text is the number view's concern, not the scanner's.
pub(crate) fn end_of_number<S: Source>(src: &S, i: usize) -> Result<usize> {
    let mut last = i;
    let mut j = src.advance(i);
    loop {
        let b = src.byte_at(j);
        if b == MORE_INPUT {
            return Err(Error::InputExhausted);
        }
        if is_number_end(b) {
            return Ok(last);
        }
        last = j;
        j = src.advance(j);
    }
}

/// Verifies the literal at `i` byte-for-byte, returning its last offset.
pub(crate) fn expect_literal<S: Source>(src: &S, i: usize, lit: &'static [u8]) -> Result<usize> {
    let mut j = i;
    for (n, &expected) in lit.iter().enumerate() {
        let b = src.byte_at(j);
        if b != expected {
            return Err(match b {
                MORE_INPUT => Error::InputExhausted,
                _ => Error::syntax(i + n, SyntaxKind::InvalidLiteral),
            });
        }
        j = src.advance(j);
    }
    Ok(i + lit.len() - 1)
}

/// Looks up `key` among the members of the object whose `{` is at `obj`.
///
/// Returns the offset of the matched member's value, or `None` on the
/// closing brace. Iteration honours textual order; passing `from` (the
/// offset of a previously consumed member boundary) turns a sequence of
/// lookups in declaration order into a single pass over the text.
///
/// Keys without escapes are compared raw; a key containing escapes is
/// compared through the decoded form.
pub(crate) fn find_key<S: Source>(
    src: &S,
    obj: usize,
    key: &[u8],
    from: Option<usize>,
) -> Result<Option<usize>> {
    let mut i = from.unwrap_or(obj);
    loop {
        i = skip_noise(src, i);
        match src.byte_at(i) {
            b'}' => return Ok(None),
            b'"' => {
                let scanned = end_of_string(src, i)?;
                let matched = if scanned.has_escape {
                    crate::string::decoded_eq(src, i + 1, scanned.end, key)
                } else {
                    raw_eq(src, i + 1, scanned.end, key)
                };
                // The colon is noise, so one step lands on the value.
                let value = skip_noise(src, scanned.end);
                if matched {
                    return Ok(Some(value));
                }
                i = end_of_value(src, value)?;
            }
            MORE_INPUT => return Err(Error::InputExhausted),
            TERMINATOR => {
                return Err(Error::syntax(i, SyntaxKind::UnexpectedEndOfInput));
            }
            b => return Err(Error::syntax(i, SyntaxKind::UnexpectedByte(b))),
        }
    }
}

fn raw_eq<S: Source>(src: &S, start: usize, end: usize, key: &[u8]) -> bool {
    if end - start != key.len() {
        return false;
    }
    let mut i = start;
    for &k in key {
        if src.byte_at(i) != k {
            return false;
        }
        i = src.advance(i);
    }
    true
}
