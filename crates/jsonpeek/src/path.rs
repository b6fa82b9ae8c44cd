//! Key paths.
//!
//! A path is a slice of [`Step`]s, each an object key or a 1-based array
//! position. [`resolve`] walks the steps over the scanner and returns the
//! offset of the addressed value, which is how both navigation
//! ([`crate::Value::read_at`]) and editing ([`crate::splice`]) find their
//! target.

use crate::collections;
use crate::error::{Error, Result};
use crate::scan;
use crate::source::Source;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Object member key, matched against the decoded key text.
    Key(String),
    /// Array position, 1-based.
    Index(usize),
}

impl From<&str> for Step {
    fn from(key: &str) -> Step {
        Step::Key(key.to_owned())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Step {
        Step::Key(key)
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Step {
        Step::Index(index)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Key(k) => write!(f, "{k}"),
            Step::Index(n) => write!(f, "[{n}]"),
        }
    }
}

/// Offset of the value reached by walking `path` from the root.
///
/// Every failure along the walk, including an out-of-range index and a
/// step of the wrong shape for the value it meets, reports as
/// `KeyNotFound` naming the failing step; direct indexing through
/// [`crate::Array::get`] keeps the finer-grained error.
pub(crate) fn resolve<S: Source>(src: &S, path: &[Step]) -> Result<usize> {
    let mut offset = scan::skip_whitespace(src, 0);
    for step in path {
        offset = match (step, src.byte_at(offset)) {
            (Step::Key(k), b'{') => scan::find_key(src, offset, k.as_bytes(), None)?
                .ok_or_else(|| Error::KeyNotFound(k.clone()))?,
            (Step::Index(n), b'[') => collections::nth_element(src, offset, *n)
                .map_err(|e| match e {
                    Error::IndexOutOfRange { .. } => Error::KeyNotFound(step.to_string()),
                    e => e,
                })?,
            _ => return Err(Error::KeyNotFound(step.to_string())),
        };
    }
    Ok(offset)
}
