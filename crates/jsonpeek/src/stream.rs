//! Streaming adaptor.
//!
//! [`StreamSource`] wraps a [`std::io::Read`] with an append-only buffer and
//! exposes the [`Source`] contract over it. Reads past the buffered bytes
//! observe the [`MORE_INPUT`] sentinel until the stream reaches end of
//! input, after which they observe the terminator; a scan that meets
//! `MORE_INPUT` fails with [`Error::InputExhausted`], and [`pump`] turns
//! that failure into "read another chunk and run the scan again". All
//! scans are pure functions of `(source, offset)`, which is what makes
//! the blind retry sound.
//!
//! [`pump`]: StreamSource::pump

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::io::Read;

use crate::error::{Error, Result, SyntaxKind};
use crate::path::Step;
use crate::source::{Fragment, MORE_INPUT, Source, TERMINATOR};
use crate::value::Value;

const DEFAULT_CHUNK: usize = 8 * 1024;

pub struct StreamSource<R> {
    buf: RefCell<Vec<u8>>,
    reader: RefCell<R>,
    eof: Cell<bool>,
    chunk: usize,
}

impl<R: Read> StreamSource<R> {
    pub fn new(reader: R) -> StreamSource<R> {
        StreamSource::with_chunk_size(reader, DEFAULT_CHUNK)
    }

    /// `chunk` is the largest number of bytes pulled per refill; mostly
    /// of interest to tests that want to observe suspension points.
    pub fn with_chunk_size(reader: R, chunk: usize) -> StreamSource<R> {
        StreamSource {
            buf: RefCell::new(Vec::new()),
            reader: RefCell::new(reader),
            eof: Cell::new(false),
            chunk: chunk.max(1),
        }
    }

    /// Runs `op` until it stops failing with [`Error::InputExhausted`],
    /// reading more of the stream between attempts. `op` must be a pure
    /// scan so that re-running it from the top is equivalent to resuming
    /// it.
    ///
    /// When the stream ends before `op` can finish, the exhaustion is
    /// re-raised as a parse error: from the document's point of view the
    /// input ended unexpectedly.
    pub fn pump<'s, T>(&'s self, op: impl Fn(&'s Self) -> Result<T>) -> Result<T> {
        loop {
            match op(self) {
                Err(Error::InputExhausted) => self.fill()?,
                other => return other,
            }
        }
    }

    /// Root value of the streamed document, reading as little as needed
    /// to see its first byte.
    pub fn root(&self) -> Result<Value<'_, Self>> {
        self.pump(|s| Value::read(s))
    }

    /// Value at `path`, reading only until the walk can complete.
    pub fn read_at(&self, path: &[Step]) -> Result<Value<'_, Self>> {
        self.pump(|s| Value::read_at(s, path))
    }

    /// Bytes buffered so far.
    pub fn buffered(&self) -> usize {
        self.buf.borrow().len()
    }

    fn fill(&self) -> Result<()> {
        if self.eof.get() {
            return Err(Error::syntax(self.len(), SyntaxKind::UnexpectedEndOfInput));
        }
        let mut tmp = vec![0u8; self.chunk];
        let n = self
            .reader
            .borrow_mut()
            .read(&mut tmp)
            .map_err(|e| Error::Io(e.to_string()))?;
        if n == 0 {
            self.eof.set(true);
        } else {
            self.buf.borrow_mut().extend_from_slice(&tmp[..n]);
        }
        Ok(())
    }
}

impl<R: Read> Source for StreamSource<R> {
    fn byte_at(&self, i: usize) -> u8 {
        match self.buf.borrow().get(i) {
            Some(&b) => b,
            None if self.eof.get() => TERMINATOR,
            None => MORE_INPUT,
        }
    }

    fn len(&self) -> usize {
        self.buf.borrow().len()
    }

    fn slice(&self, start: usize, end: usize) -> Cow<'_, [u8]> {
        Cow::Owned(self.buf.borrow()[start..end].to_vec())
    }

    fn share(&self, start: usize, end: usize) -> Vec<Fragment> {
        if start >= end {
            return Vec::new();
        }
        vec![Fragment::owned(&self.buf.borrow()[start..end])]
    }
}

impl<R> std::fmt::Debug for StreamSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSource")
            .field("buffered", &self.buf.borrow().len())
            .field("eof", &self.eof.get())
            .finish()
    }
}
