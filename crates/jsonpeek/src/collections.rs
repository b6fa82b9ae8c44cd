//! Array and object views.
//!
//! Both views drive the scanner with the same two-phase step: from the
//! boundary of the token just consumed, [`scan::skip_noise`] lands either
//! on the next child's first byte or on the closing bracket. Nothing is
//! cached; iterating twice scans twice.

use std::borrow::Cow;

use crate::error::{Error, Result, SyntaxKind};
use crate::scan;
use crate::source::{MORE_INPUT, Source, TERMINATOR};
use crate::string::Str;
use crate::value::{self, Value};

pub struct Array<'a, S: Source> {
    source: &'a S,
    offset: usize,
}

impl<'a, S: Source> Clone for Array<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: Source> Copy for Array<'a, S> {}

impl<'a, S: Source> std::fmt::Debug for Array<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Array").field("offset", &self.offset).finish()
    }
}

impl<'a, S: Source> Array<'a, S> {
    pub(crate) fn new(source: &'a S, offset: usize) -> Self {
        Array { source, offset }
    }

    /// Offset of the `[` in the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The element at 1-based position `index`.
    pub fn get(&self, index: usize) -> Result<Value<'a, S>> {
        let offset = nth_element(self.source, self.offset, index)?;
        Value::at(self.source, offset)
    }

    /// Number of elements, by a full scan.
    pub fn len(&self) -> Result<usize> {
        let mut n = 0;
        for item in self.iter() {
            item?;
            n += 1;
        }
        Ok(n)
    }

    pub fn is_empty(&self) -> Result<bool> {
        let i = scan::skip_noise(self.source, self.offset);
        Ok(self.source.byte_at(i) == b']')
    }

    /// Elements in positional order.
    pub fn iter(&self) -> Items<'a, S> {
        Items {
            source: self.source,
            cursor: Some(self.offset),
        }
    }

    pub fn as_text(&self) -> Result<Cow<'a, [u8]>> {
        value::text_of(self.source, self.offset)
    }
}

impl<'a, S: Source> IntoIterator for Array<'a, S> {
    type Item = Result<Value<'a, S>>;
    type IntoIter = Items<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Offset of the 1-based `index`-th element of the array whose `[` is at
/// `arr`. Walking to `]` first yields the length for the error.
pub(crate) fn nth_element<S: Source>(src: &S, arr: usize, index: usize) -> Result<usize> {
    let mut seen = 0;
    let mut i = arr;
    loop {
        i = scan::skip_noise(src, i);
        match src.byte_at(i) {
            b']' => return Err(Error::IndexOutOfRange { index, len: seen }),
            MORE_INPUT => return Err(Error::InputExhausted),
            TERMINATOR => {
                return Err(Error::syntax(i, SyntaxKind::UnexpectedEndOfInput));
            }
            _ => {
                seen += 1;
                if seen == index {
                    return Ok(i);
                }
                i = scan::end_of_value(src, i)?;
            }
        }
    }
}

pub struct Items<'a, S: Source> {
    source: &'a S,
    /// Boundary of the last consumed token; `None` once done or failed.
    cursor: Option<usize>,
}

impl<'a, S: Source> Iterator for Items<'a, S> {
    type Item = Result<Value<'a, S>>;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.cursor?;
        let i = scan::skip_noise(self.source, cur);
        match self.source.byte_at(i) {
            b']' => {
                self.cursor = None;
                None
            }
            MORE_INPUT => {
                self.cursor = None;
                Some(Err(Error::InputExhausted))
            }
            TERMINATOR => {
                self.cursor = None;
                Some(Err(Error::syntax(i, SyntaxKind::UnexpectedEndOfInput)))
            }
            _ => match scan::end_of_value(self.source, i) {
                Ok(end) => {
                    self.cursor = Some(end);
                    Some(Value::at(self.source, i))
                }
                Err(e) => {
                    self.cursor = None;
                    Some(Err(e))
                }
            },
        }
    }
}

pub struct Object<'a, S: Source> {
    source: &'a S,
    offset: usize,
}

impl<'a, S: Source> Clone for Object<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: Source> Copy for Object<'a, S> {}

impl<'a, S: Source> std::fmt::Debug for Object<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object").field("offset", &self.offset).finish()
    }
}

impl<'a, S: Source> Object<'a, S> {
    pub(crate) fn new(source: &'a S, offset: usize) -> Self {
        Object { source, offset }
    }

    /// Offset of the `{` in the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The value of the first member named `key`, in textual order.
    pub fn get(&self, key: &str) -> Result<Value<'a, S>> {
        match scan::find_key(self.source, self.offset, key.as_bytes(), None)? {
            Some(offset) => Value::at(self.source, offset),
            None => Err(Error::KeyNotFound(key.to_owned())),
        }
    }

    /// Like [`get`](Object::get), but resuming the member walk from
    /// `from` (a value boundary previously obtained from this object).
    /// Reading fields in their declaration order this way costs one pass
    /// over the members instead of one pass per field.
    pub fn get_from(&self, key: &str, from: usize) -> Result<Value<'a, S>> {
        match scan::find_key(self.source, self.offset, key.as_bytes(), Some(from))? {
            Some(offset) => Value::at(self.source, offset),
            None => Err(Error::KeyNotFound(key.to_owned())),
        }
    }

    /// Number of members, by a full scan.
    pub fn len(&self) -> Result<usize> {
        let mut n = 0;
        for entry in self.iter() {
            entry?;
            n += 1;
        }
        Ok(n)
    }

    pub fn is_empty(&self) -> Result<bool> {
        let i = scan::skip_noise(self.source, self.offset);
        Ok(self.source.byte_at(i) == b'}')
    }

    /// `(key, value)` pairs in declaration order. A repeated key shows up
    /// once per occurrence; folding the pairs into a map naturally makes
    /// the last occurrence win.
    pub fn iter(&self) -> Entries<'a, S> {
        Entries {
            source: self.source,
            cursor: Some(self.offset),
        }
    }

    pub fn as_text(&self) -> Result<Cow<'a, [u8]>> {
        value::text_of(self.source, self.offset)
    }
}

impl<'a, S: Source> IntoIterator for Object<'a, S> {
    type Item = Result<(Str<'a, S>, Value<'a, S>)>;
    type IntoIter = Entries<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Entries<'a, S: Source> {
    source: &'a S,
    cursor: Option<usize>,
}

impl<'a, S: Source> Entries<'a, S> {
    fn step(&mut self, cur: usize) -> Result<Option<(Str<'a, S>, Value<'a, S>)>> {
        let i = scan::skip_noise(self.source, cur);
        match self.source.byte_at(i) {
            b'}' => Ok(None),
            b'"' => {
                let key_end = scan::end_of_string(self.source, i)?.end;
                let key = Str::new(self.source, i);
                let value_offset = scan::skip_noise(self.source, key_end);
                let value = Value::at(self.source, value_offset)?;
                let end = scan::end_of_value(self.source, value_offset)?;
                self.cursor = Some(end);
                Ok(Some((key, value)))
            }
            MORE_INPUT => Err(Error::InputExhausted),
            TERMINATOR => Err(Error::syntax(i, SyntaxKind::UnexpectedEndOfInput)),
            b => Err(Error::syntax(i, SyntaxKind::UnexpectedByte(b))),
        }
    }
}

impl<'a, S: Source> Iterator for Entries<'a, S> {
    type Item = Result<(Str<'a, S>, Value<'a, S>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.cursor?;
        self.cursor = None;
        match self.step(cur) {
            Ok(Some(pair)) => Some(Ok(pair)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
