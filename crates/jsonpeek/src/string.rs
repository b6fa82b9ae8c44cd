//! Lazy string view.
//!
//! A [`Str`] is a handle to a JSON string token. The body between the
//! quotes is left untouched until a caller asks for decoded content:
//! escape-free strings borrow straight from the source, and even strings
//! with escapes can be iterated code point by code point without
//! materialising the whole decoded form.
//!
//! Decoding is tolerant in the direction of acceptance: a `\uXXXX` lone
//! surrogate is kept and encoded in the three-byte pattern of its code
//! unit, and an unknown or truncated escape keeps its literal backslash.
//! Rejecting such documents would make values unreachable that every
//! other access path can serve.

use std::borrow::Cow;

use crate::error::Result;
use crate::scan::{self, StringEnd};
use crate::source::Source;

pub struct Str<'a, S: Source> {
    source: &'a S,
    offset: usize,
}

impl<'a, S: Source> Clone for Str<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: Source> Copy for Str<'a, S> {}

impl<'a, S: Source> std::fmt::Debug for Str<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Str").field("offset", &self.offset).finish()
    }
}

impl<'a, S: Source> Str<'a, S> {
    pub(crate) fn new(source: &'a S, offset: usize) -> Self {
        Str { source, offset }
    }

    /// Offset of the opening quote in the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn scan(&self) -> Result<StringEnd> {
        scan::end_of_string(self.source, self.offset)
    }

    /// Number of bytes between the quotes (code units, not characters).
    pub fn raw_len(&self) -> Result<usize> {
        let s = self.scan()?;
        Ok(s.end - self.offset - 1)
    }

    /// Whether the body contains a backslash.
    pub fn has_escape(&self) -> Result<bool> {
        Ok(self.scan()?.has_escape)
    }

    /// Verbatim JSON text of the token, quotes included.
    pub fn as_text(&self) -> Result<Cow<'a, [u8]>> {
        let s = self.scan()?;
        Ok(self.source.slice(self.offset, s.end + 1))
    }

    /// The body as-is when no escape occurred: the bytes are already the
    /// decoded text, so this costs one scan and no allocation.
    pub fn as_bytes_if_no_escape(&self) -> Result<Option<Cow<'a, [u8]>>> {
        let s = self.scan()?;
        if s.has_escape {
            return Ok(None);
        }
        Ok(Some(self.source.slice(self.offset + 1, s.end)))
    }

    /// Decoded content bytes. Borrows when escape-free; otherwise builds
    /// an owned buffer, copying plain runs verbatim and transcoding
    /// escapes.
    pub fn decode(&self) -> Result<Cow<'a, [u8]>> {
        let s = self.scan()?;
        let start = self.offset + 1;
        if !s.has_escape {
            return Ok(self.source.slice(start, s.end));
        }
        let mut out = Vec::with_capacity(s.end - start);
        let mut i = start;
        while i < s.end {
            let b = self.source.byte_at(i);
            if b == b'\\' {
                match decode_escape(self.source, i, s.end) {
                    (Unescaped::Char(cp), next) => {
                        push_code_point(&mut out, cp);
                        i = next;
                    }
                    (Unescaped::LiteralBackslash, next) => {
                        out.push(b'\\');
                        i = next;
                    }
                }
            } else {
                out.push(b);
                i = self.source.advance(i);
            }
        }
        Ok(Cow::Owned(out))
    }

    /// Lazy iteration of `(position, code point)` pairs, where the
    /// position is a byte offset into the undecoded body. Only offsets at
    /// which a character begins are ever yielded; an offset inside an
    /// escape sequence or a multi-byte character never appears, which is
    /// what makes "next valid character position" a single iterator step.
    pub fn code_points(&self) -> Result<CodePoints<'a, S>> {
        let s = self.scan()?;
        Ok(CodePoints {
            source: self.source,
            body: self.offset + 1,
            i: self.offset + 1,
            end: s.end,
        })
    }
}

pub struct CodePoints<'a, S: Source> {
    source: &'a S,
    body: usize,
    i: usize,
    end: usize,
}

impl<'a, S: Source> Iterator for CodePoints<'a, S> {
    type Item = (usize, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.end {
            return None;
        }
        let pos = self.i - self.body;
        let b = self.source.byte_at(self.i);
        if b == b'\\' {
            return Some(match decode_escape(self.source, self.i, self.end) {
                (Unescaped::Char(cp), next) => {
                    self.i = next;
                    (pos, cp)
                }
                (Unescaped::LiteralBackslash, next) => {
                    self.i = next;
                    (pos, u32::from(b'\\'))
                }
            });
        }
        if b < 0x80 {
            self.i += 1;
            return Some((pos, u32::from(b)));
        }
        let (cp, width) = decode_utf8(self.source, self.i, self.end);
        self.i += width;
        Some((pos, cp))
    }
}

enum Unescaped {
    Char(u32),
    /// The escape was unknown or truncated; the backslash stands for
    /// itself and scanning resumes right after it.
    LiteralBackslash,
}

/// Decodes the escape starting at the backslash at `i`. Returns the
/// decoded form and the offset to resume from.
fn decode_escape<S: Source>(src: &S, i: usize, end: usize) -> (Unescaped, usize) {
    if i + 1 >= end {
        return (Unescaped::LiteralBackslash, i + 1);
    }
    let esc = src.byte_at(i + 1);
    let simple = match esc {
        b'"' => Some(u32::from(b'"')),
        b'\\' => Some(u32::from(b'\\')),
        b'/' => Some(u32::from(b'/')),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(u32::from(b'\n')),
        b'r' => Some(u32::from(b'\r')),
        b't' => Some(u32::from(b'\t')),
        _ => None,
    };
    if let Some(cp) = simple {
        return (Unescaped::Char(cp), i + 2);
    }
    if esc != b'u' {
        return (Unescaped::LiteralBackslash, i + 1);
    }
    let Some(unit) = hex4(src, i + 2, end) else {
        return (Unescaped::LiteralBackslash, i + 1);
    };
    if (0xD800..0xDC00).contains(&unit) {
        // A high surrogate pairs with an immediately following \uXXXX
        // low surrogate; anything else leaves it lone.
        if src.byte_at(i + 6) == b'\\' && src.byte_at(i + 7) == b'u' {
            if let Some(low) = hex4(src, i + 8, end) {
                if (0xDC00..0xE000).contains(&low) {
                    let cp = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return (Unescaped::Char(cp), i + 12);
                }
            }
        }
    }
    (Unescaped::Char(unit), i + 6)
}

fn hex4<S: Source>(src: &S, i: usize, end: usize) -> Option<u32> {
    if i + 4 > end {
        return None;
    }
    let mut v = 0u32;
    for k in 0..4 {
        let d = (src.byte_at(i + k) as char).to_digit(16)?;
        v = v << 4 | d;
    }
    Some(v)
}

fn decode_utf8<S: Source>(src: &S, i: usize, end: usize) -> (u32, usize) {
    let b0 = src.byte_at(i);
    let (width, mut cp) = match b0 {
        0xC0..=0xDF => (2, u32::from(b0 & 0x1F)),
        0xE0..=0xEF => (3, u32::from(b0 & 0x0F)),
        0xF0..=0xF7 => (4, u32::from(b0 & 0x07)),
        // Stray continuation or invalid lead: pass the byte through.
        _ => return (u32::from(b0), 1),
    };
    if i + width > end {
        return (u32::from(b0), 1);
    }
    for k in 1..width {
        let b = src.byte_at(i + k);
        if b & 0xC0 != 0x80 {
            return (u32::from(b0), 1);
        }
        cp = cp << 6 | u32::from(b & 0x3F);
    }
    (cp, width)
}

/// Appends `cp` in UTF-8, using the raw three-byte pattern for a lone
/// surrogate that `char` cannot carry.
fn push_code_point(out: &mut Vec<u8>, cp: u32) {
    match char::from_u32(cp) {
        Some(c) => {
            let mut tmp = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
        }
        None => {
            out.push(0xE0 | (cp >> 12) as u8);
            out.push(0x80 | (cp >> 6 & 0x3F) as u8);
            out.push(0x80 | (cp & 0x3F) as u8);
        }
    }
}

fn encode_code_point(cp: u32, tmp: &mut [u8; 4]) -> usize {
    match char::from_u32(cp) {
        Some(c) => c.encode_utf8(tmp).len(),
        None => {
            tmp[0] = 0xE0 | (cp >> 12) as u8;
            tmp[1] = 0x80 | (cp >> 6 & 0x3F) as u8;
            tmp[2] = 0x80 | (cp & 0x3F) as u8;
            3
        }
    }
}

/// Compares the decoded form of the body `start..end` against `expected`
/// without allocating. Used for key matching when the stored key carries
/// escapes.
pub(crate) fn decoded_eq<S: Source>(src: &S, start: usize, end: usize, expected: &[u8]) -> bool {
    let mut k = 0;
    let mut i = start;
    let mut tmp = [0u8; 4];
    while i < end {
        let b = src.byte_at(i);
        let piece: &[u8] = if b == b'\\' {
            match decode_escape(src, i, end) {
                (Unescaped::Char(cp), next) => {
                    i = next;
                    let n = encode_code_point(cp, &mut tmp);
                    &tmp[..n]
                }
                (Unescaped::LiteralBackslash, next) => {
                    i = next;
                    b"\\"
                }
            }
        } else {
            i = src.advance(i);
            tmp[0] = b;
            &tmp[..1]
        };
        if expected.len() < k + piece.len() || &expected[k..k + piece.len()] != piece {
            return false;
        }
        k += piece.len();
    }
    k == expected.len()
}
