//! Piece-table documents.
//!
//! A [`PieceTable`] is a logical byte string stored as an ordered list of
//! [`Fragment`]s, each a reference-counted view over some immutable
//! backing buffer. It implements [`Source`], so an edited document can be
//! re-read by the same scanner without being re-serialised first.
//!
//! The one structural mutation is [`splice`]: replace the byte range of
//! an existing value with new text, sharing the untouched prefix and
//! suffix with the original. Tables are flattened on construction, so a
//! fragment is always a leaf view, never another table.

use std::borrow::Cow;

use crate::error::Result;
use crate::path::{self, Step};
use crate::scan;
use crate::source::{Fragment, Source, TERMINATOR};

pub struct PieceTable {
    fragments: Vec<Fragment>,
    /// Logical start offset of each fragment; parallel to `fragments`.
    starts: Vec<usize>,
    total: usize,
}

impl PieceTable {
    /// Builds a table from `fragments`, dropping empty ones. The cached
    /// total always equals the sum of fragment lengths.
    pub fn new(fragments: Vec<Fragment>) -> PieceTable {
        let fragments: Vec<Fragment> = fragments.into_iter().filter(|f| !f.is_empty()).collect();
        let mut starts = Vec::with_capacity(fragments.len());
        let mut total = 0;
        for f in &fragments {
            starts.push(total);
            total += f.len();
        }
        PieceTable {
            fragments,
            starts,
            total,
        }
    }

    /// A single-fragment table over a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> PieceTable {
        PieceTable::new(vec![Fragment::owned(bytes)])
    }

    /// Shares the whole of `src` as a table.
    pub fn from_source<S: Source>(src: &S) -> PieceTable {
        PieceTable::new(src.share(0, src.len()))
    }

    /// Root value of the document held by this table.
    pub fn root(&self) -> Result<crate::Value<'_, PieceTable>> {
        crate::Value::read(self)
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// The whole logical string as one owned buffer.
    pub fn flatten(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total);
        for f in &self.fragments {
            out.extend_from_slice(f.as_bytes());
        }
        out
    }

    /// Replaces the inclusive byte range `[start, end]` with `text`,
    /// producing a new table. Untouched fragments are shared, not copied.
    pub fn splice(&self, start: usize, end: usize, text: &[u8]) -> PieceTable {
        let mut fragments = self.share(0, start);
        if !text.is_empty() {
            fragments.push(Fragment::owned(text));
        }
        fragments.extend(self.share(end + 1, self.total));
        PieceTable::new(fragments)
    }

    /// Like [`splice`](PieceTable::splice) with another table as the
    /// replacement; its fragments are inlined, keeping the tree one level
    /// deep.
    pub fn splice_table(&self, start: usize, end: usize, replacement: &PieceTable) -> PieceTable {
        let mut fragments = self.share(0, start);
        fragments.extend(replacement.share(0, replacement.total));
        fragments.extend(self.share(end + 1, self.total));
        PieceTable::new(fragments)
    }

    /// Fragment index and in-fragment offset for logical offset `i`.
    fn locate(&self, i: usize) -> (usize, usize) {
        debug_assert!(i < self.total);
        let idx = self.starts.partition_point(|&s| s <= i) - 1;
        (idx, i - self.starts[idx])
    }
}

impl Source for PieceTable {
    fn byte_at(&self, i: usize) -> u8 {
        if i >= self.total {
            return TERMINATOR;
        }
        let (idx, within) = self.locate(i);
        self.fragments[idx].as_bytes()[within]
    }

    fn len(&self) -> usize {
        self.total
    }

    fn slice(&self, start: usize, end: usize) -> Cow<'_, [u8]> {
        if start >= end {
            return Cow::Borrowed(&[]);
        }
        let (idx, within) = self.locate(start);
        if within + (end - start) <= self.fragments[idx].len() {
            return Cow::Borrowed(&self.fragments[idx].as_bytes()[within..within + end - start]);
        }
        let mut out = Vec::with_capacity(end - start);
        for f in self.share(start, end) {
            out.extend_from_slice(f.as_bytes());
        }
        Cow::Owned(out)
    }

    fn share(&self, start: usize, end: usize) -> Vec<Fragment> {
        if start >= end {
            return Vec::new();
        }
        let (mut idx, mut within) = self.locate(start);
        let mut remaining = end - start;
        let mut out = Vec::new();
        while remaining > 0 {
            let f = &self.fragments[idx];
            let take = remaining.min(f.len() - within);
            out.push(f.narrow(within, within + take));
            remaining -= take;
            idx += 1;
            within = 0;
        }
        out
    }
}

impl std::fmt::Debug for PieceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PieceTable")
            .field("fragments", &self.fragments.len())
            .field("total", &self.total)
            .finish()
    }
}

/// Replaces the value at `path` inside `source` with the JSON text
/// `replacement`, producing a new document.
///
/// The result shares the prefix and suffix bytes of `source`; only the
/// replacement text is fresh. Re-parsing it yields handles into whichever
/// fragments survived the edit.
///
/// # Examples
///
/// ```
/// use jsonpeek::{splice, Text};
///
/// let text = Text::from(r#"{"a":1,"b":[1,2,3]}"#);
/// let edited = splice(&text, &["b".into(), 2.into()], b"7").unwrap();
/// assert_eq!(edited.flatten(), br#"{"a":1,"b":[1,7,3]}"#);
/// ```
pub fn splice<S: Source>(source: &S, path: &[Step], replacement: &[u8]) -> Result<PieceTable> {
    let offset = path::resolve(source, path)?;
    let end = scan::end_of_value(source, offset)?;
    let mut fragments = source.share(0, offset);
    if !replacement.is_empty() {
        fragments.push(Fragment::owned(replacement));
    }
    fragments.extend(source.share(end + 1, source.len()));
    Ok(PieceTable::new(fragments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Text;

    #[test]
    fn invariants_after_construction() {
        let text = Text::from("abcdef");
        let pt = PieceTable::new(text.share(0, 3));
        assert_eq!(pt.len(), 3);
        assert_eq!(pt.flatten(), b"abc");
        // Empty fragments are dropped on construction.
        let pt = PieceTable::new(vec![Fragment::owned(b""), Fragment::owned(b"x")]);
        assert_eq!(pt.fragment_count(), 1);
        assert_eq!(pt.len(), 1);
    }

    #[test]
    fn byte_at_crosses_fragments() {
        let a = Text::from("abc");
        let b = Text::from("def");
        let mut frags = a.share(0, 3);
        frags.extend(b.share(1, 3));
        let pt = PieceTable::new(frags);
        assert_eq!(pt.flatten(), b"abcef");
        assert_eq!(pt.byte_at(0), b'a');
        assert_eq!(pt.byte_at(3), b'e');
        assert_eq!(pt.byte_at(4), b'f');
        assert_eq!(pt.byte_at(5), TERMINATOR);
    }

    #[test]
    fn slice_borrows_within_a_fragment() {
        let text = Text::from("abcdef");
        let pt = PieceTable::from_source(&text);
        assert!(matches!(pt.slice(1, 4), Cow::Borrowed(s) if s == b"bcd"));
    }

    #[test]
    fn splice_shares_prefix_and_suffix() {
        let text = Text::from("hello world");
        let pt = PieceTable::from_source(&text);
        let edited = pt.splice(6, 10, b"there");
        assert_eq!(edited.flatten(), b"hello there");
        assert_eq!(edited.fragment_count(), 2);
    }

    #[test]
    fn splice_table_flattens() {
        let base = PieceTable::from_bytes(b"0123456789");
        let middle = base.splice(2, 7, b"ab");   // 01ab89
        let outer = base.splice_table(0, 4, &middle); // 01ab89 + 56789
        assert_eq!(outer.flatten(), b"01ab8956789");
        // Every fragment of the result is a leaf view.
        assert_eq!(outer.fragment_count(), middle.fragment_count() + 1);
    }

    #[test]
    fn splice_at_the_edges() {
        let pt = PieceTable::from_bytes(b"abc");
        assert_eq!(pt.splice(0, 0, b"X").flatten(), b"Xbc");
        assert_eq!(pt.splice(2, 2, b"Y").flatten(), b"abY");
        assert_eq!(pt.splice(0, 2, b"").flatten(), b"");
    }
}
