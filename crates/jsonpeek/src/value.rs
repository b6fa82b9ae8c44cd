//! Lazy value handles.
//!
//! A [`Value`] is the only runtime representation of a JSON value: a tag
//! plus `(source, offset)` for the four variants that have structure to
//! navigate. `true`, `false` and `null` are not handles; they are
//! delivered as the boolean itself and a null variant, since there is
//! nothing lazy left to do with them once the literal is verified.
//!
//! # Examples
//!
//! ```
//! use jsonpeek::{Text, Value};
//!
//! let text = Text::from(r#"{"foo": [1, 2, 3, "four"]}"#);
//! let item = text.root().unwrap().get("foo").unwrap().get(4).unwrap();
//! assert_eq!(item.as_text().unwrap().as_ref(), br#""four""#);
//! ```

use std::borrow::Cow;

use crate::collections::{Array, Object};
use crate::error::{Error, Result, SyntaxKind};
use crate::number::Number;
use crate::path::{self, Step};
use crate::scan;
use crate::source::{MORE_INPUT, Source, TERMINATOR};
use crate::string::Str;

pub enum Value<'a, S: Source> {
    Null,
    Bool(bool),
    Number(Number<'a, S>),
    String(Str<'a, S>),
    Array(Array<'a, S>),
    Object(Object<'a, S>),
}

/// The tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl<'a, S: Source> Clone for Value<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: Source> Copy for Value<'a, S> {}

impl<'a, S: Source> Value<'a, S> {
    /// Handle to the root value of `source`.
    pub fn read(source: &'a S) -> Result<Self> {
        let i = scan::skip_whitespace(source, 0);
        Value::at(source, i)
    }

    /// Handle to the value reached by walking `path` from the root.
    pub fn read_at(source: &'a S, path: &[Step]) -> Result<Self> {
        let offset = path::resolve(source, path)?;
        Value::at(source, offset)
    }

    /// Dispatches on the first byte of a value. `offset` must point at a
    /// non-whitespace byte; producers of offsets uphold that.
    pub(crate) fn at(source: &'a S, offset: usize) -> Result<Self> {
        match source.byte_at(offset) {
            b'{' => Ok(Value::Object(Object::new(source, offset))),
            b'[' => Ok(Value::Array(Array::new(source, offset))),
            b'"' => Ok(Value::String(Str::new(source, offset))),
            b't' => {
                scan::expect_literal(source, offset, b"true")?;
                Ok(Value::Bool(true))
            }
            b'f' => {
                scan::expect_literal(source, offset, b"false")?;
                Ok(Value::Bool(false))
            }
            b'n' => {
                scan::expect_literal(source, offset, b"null")?;
                Ok(Value::Null)
            }
            b if scan::is_number_start(b) => Ok(Value::Number(Number::new(source, offset))),
            MORE_INPUT => Err(Error::InputExhausted),
            TERMINATOR => Err(Error::syntax(offset, SyntaxKind::UnexpectedEndOfInput)),
            b => Err(Error::syntax(offset, SyntaxKind::UnexpectedByte(b))),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Source offset of the first byte, for the variants that keep one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Value::Null | Value::Bool(_) => None,
            Value::Number(n) => Some(n.offset()),
            Value::String(s) => Some(s.offset()),
            Value::Array(a) => Some(a.offset()),
            Value::Object(o) => Some(o.offset()),
        }
    }

    /// Verbatim JSON text of the value: the canonical serialised form.
    pub fn as_text(&self) -> Result<Cow<'a, [u8]>> {
        match self {
            Value::Null => Ok(Cow::Borrowed(b"null")),
            Value::Bool(true) => Ok(Cow::Borrowed(b"true")),
            Value::Bool(false) => Ok(Cow::Borrowed(b"false")),
            Value::Number(n) => n.as_text(),
            Value::String(s) => s.as_text(),
            Value::Array(a) => a.as_text(),
            Value::Object(o) => o.as_text(),
        }
    }

    /// Navigates into a child: a key for objects, a 1-based position for
    /// arrays. A step of the wrong shape for the value fails the same way
    /// a missing child would.
    pub fn get(&self, step: impl Into<Step>) -> Result<Value<'a, S>> {
        match (self, step.into()) {
            (Value::Object(o), Step::Key(k)) => o.get(&k),
            (Value::Array(a), Step::Index(n)) => a.get(n),
            (_, Step::Key(k)) => Err(Error::KeyNotFound(k)),
            (_, Step::Index(n)) => Err(Error::KeyNotFound(format!("[{n}]"))),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number<'a, S>> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<Str<'a, S>> {
        match self {
            Value::String(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<Array<'a, S>> {
        match self {
            Value::Array(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<Object<'a, S>> {
        match self {
            Value::Object(o) => Some(*o),
            _ => None,
        }
    }
}

/// Text of the value starting at `offset`: `[offset, end_of_value]`.
pub(crate) fn text_of<S: Source>(src: &S, offset: usize) -> Result<Cow<'_, [u8]>> {
    let end = scan::end_of_value(src, offset)?;
    Ok(src.slice(offset, end + 1))
}

impl<'a, S: Source> std::fmt::Debug for Value<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number(@{})", n.offset()),
            Value::String(s) => write!(f, "String(@{})", s.offset()),
            Value::Array(a) => write!(f, "Array(@{})", a.offset()),
            Value::Object(o) => write!(f, "Object(@{})", o.offset()),
        }
    }
}

impl<'a, S: Source> std::fmt::Display for Value<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self.as_text().map_err(|_| std::fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&text))
    }
}

/// Two handles are equal when they spell out the same JSON text.
impl<'a, 'b, S: Source, T: Source> PartialEq<Value<'b, T>> for Value<'a, S> {
    fn eq(&self, other: &Value<'b, T>) -> bool {
        match (self.as_text(), other.as_text()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}
