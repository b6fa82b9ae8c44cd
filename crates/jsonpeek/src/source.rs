//! Byte sources the scanner runs over.
//!
//! A [`Source`] is a logically contiguous byte sequence terminated by a
//! sentinel byte, so scan loops never need an explicit length check: any
//! read at or past [`Source::len`] observes [`TERMINATOR`] (or
//! [`MORE_INPUT`] for a streaming source that has not yet reached end of
//! input). [`Text`] is the flat implementation; [`crate::PieceTable`] and
//! [`crate::StreamSource`] provide the fragmented and streaming ones.

use std::borrow::Cow;
use std::sync::Arc;

/// Sentinel read past the end of a complete source.
pub const TERMINATOR: u8 = 0x00;

/// Sentinel read past the end of a streaming source that expects more
/// input (ASCII ETB).
pub const MORE_INPUT: u8 = 0x17;

/// Random-access, sentinel-terminated bytes.
pub trait Source {
    /// Byte at `i`; the sentinel for any `i >= len()`.
    fn byte_at(&self, i: usize) -> u8;

    /// Number of bytes before the sentinel.
    fn len(&self) -> usize;

    /// The offset following `i`.
    #[inline]
    fn advance(&self, i: usize) -> usize {
        i + 1
    }

    /// Verbatim text of `start..end` (end exclusive).
    fn slice(&self, start: usize, end: usize) -> Cow<'_, [u8]>;

    /// Zero-copy fragments covering `start..end`, for splicing.
    fn share(&self, start: usize, end: usize) -> Vec<Fragment>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A view over a slice of some shared immutable buffer.
///
/// Fragments are the currency of [`crate::PieceTable`]: cloning one
/// bumps a reference count, never copies text.
#[derive(Clone)]
pub struct Fragment {
    data: Arc<[u8]>,
    start: usize,
    end: usize,
}

impl Fragment {
    pub(crate) fn new(data: Arc<[u8]>, start: usize, end: usize) -> Fragment {
        debug_assert!(start <= end && end <= data.len());
        Fragment { data, start, end }
    }

    /// A fragment owning a fresh copy of `bytes`.
    pub fn owned(bytes: &[u8]) -> Fragment {
        let data: Arc<[u8]> = Arc::from(bytes);
        let end = data.len();
        Fragment::new(data, 0, end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    /// Narrows the view to `start..end` relative to this fragment.
    pub(crate) fn narrow(&self, start: usize, end: usize) -> Fragment {
        debug_assert!(start <= end && end <= self.len());
        Fragment::new(self.data.clone(), self.start + start, self.start + end)
    }
}

impl std::fmt::Debug for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragment")
            .field("len", &self.len())
            .finish()
    }
}

/// A complete JSON document held in one flat buffer.
///
/// The terminator sentinel is stored physically after the text, matching
/// the scan contract without a bounds branch on the hot path.
///
/// # Examples
///
/// ```
/// use jsonpeek::Text;
///
/// let text = Text::from(r#"{"a": [1, 2]}"#);
/// let root = text.root().unwrap();
/// assert!(root.is_object());
/// ```
#[derive(Clone)]
pub struct Text {
    /// Document bytes plus one trailing [`TERMINATOR`].
    bytes: Arc<[u8]>,
}

impl Text {
    pub fn new(document: &[u8]) -> Text {
        let mut buf = Vec::with_capacity(document.len() + 1);
        buf.extend_from_slice(document);
        buf.push(TERMINATOR);
        Text { bytes: buf.into() }
    }

    /// The document text, without the sentinel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// Root value of the document.
    pub fn root(&self) -> crate::Result<crate::Value<'_, Text>> {
        crate::Value::read(self)
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Text {
        Text::new(s.as_bytes())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Text {
        Text::new(s.as_bytes())
    }
}

impl From<&[u8]> for Text {
    fn from(b: &[u8]) -> Text {
        Text::new(b)
    }
}

impl Source for Text {
    #[inline]
    fn byte_at(&self, i: usize) -> u8 {
        // The buffer carries its own sentinel; reads past it (possible
        // only from a corrupt offset) degrade to the sentinel value.
        *self.bytes.get(i).unwrap_or(&TERMINATOR)
    }

    #[inline]
    fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    fn slice(&self, start: usize, end: usize) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.as_bytes()[start..end])
    }

    fn share(&self, start: usize, end: usize) -> Vec<Fragment> {
        if start >= end {
            return Vec::new();
        }
        vec![Fragment::new(self.bytes.clone(), start, end)]
    }
}

impl std::fmt::Debug for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Text({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_past_the_end() {
        let t = Text::from("[]");
        assert_eq!(t.len(), 2);
        assert_eq!(t.byte_at(0), b'[');
        assert_eq!(t.byte_at(2), TERMINATOR);
        assert_eq!(t.byte_at(100), TERMINATOR);
    }

    #[test]
    fn share_skips_empty_ranges() {
        let t = Text::from("abc");
        assert!(t.share(1, 1).is_empty());
        let frags = t.share(0, 2);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].as_bytes(), b"ab");
    }
}
