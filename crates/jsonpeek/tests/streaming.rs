use std::io::{self, Read};

use jsonpeek::{StreamSource, Text, Value};

/// Serves a document as a fixed sequence of chunks, one per read call.
struct Chunks {
    parts: Vec<Vec<u8>>,
    next: usize,
}

impl Chunks {
    fn new(doc: &[u8], sizes: &[usize]) -> Chunks {
        let mut parts = Vec::new();
        let mut rest = doc;
        for &n in sizes {
            let n = n.min(rest.len());
            parts.push(rest[..n].to_vec());
            rest = &rest[n..];
        }
        if !rest.is_empty() {
            parts.push(rest.to_vec());
        }
        Chunks { parts, next: 0 }
    }
}

impl Read for Chunks {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.next >= self.parts.len() {
            return Ok(0);
        }
        let part = &self.parts[self.next];
        assert!(out.len() >= part.len(), "test chunks must fit the buffer");
        out[..part.len()].copy_from_slice(part);
        self.next += 1;
        Ok(part.len())
    }
}

#[test]
fn interleaved_reads_over_three_chunks() {
    let doc = br#"{"id":1296269,"owner":{"login":"oct"}}"#;
    let src = StreamSource::new(Chunks::new(doc, &[10, 15]));

    // "id" is complete once the second chunk is in.
    let id = src.read_at(&["id".into()]).unwrap();
    let id = src.pump(|_| id.as_number().unwrap().to_i64()).unwrap();
    assert_eq!(id, 1296269);

    let login = src
        .read_at(&["owner".into(), "login".into()])
        .unwrap();
    let login = src
        .pump(|_| login.as_string().unwrap().decode())
        .unwrap();
    assert_eq!(login.as_ref(), b"oct");
}

#[test]
fn any_chunking_matches_the_flat_read() {
    let doc = br#"{"a": [1, 22, 333], "b": {"c": "deAf", "d": [true, null]}}"#;
    let flat = Text::from(&doc[..]);
    let flat_text = Value::read_at(&flat, &["b".into(), "c".into()])
        .unwrap()
        .as_text()
        .unwrap()
        .into_owned();

    for size in [1, 2, 3, 5, 7, 11, 64] {
        let sizes: Vec<usize> = std::iter::repeat(size).take(doc.len() / size + 1).collect();
        let src = StreamSource::new(Chunks::new(doc, &sizes));
        let v = src.read_at(&["b".into(), "c".into()]).unwrap();
        let text = src.pump(|_| v.as_text()).unwrap();
        assert_eq!(text.as_ref(), flat_text.as_slice(), "chunk size {size}");

        let arr = src.read_at(&["a".into()]).unwrap();
        let sum: i64 = src
            .pump(|_| {
                let mut total = 0;
                for item in arr.as_array().unwrap().iter() {
                    total += item?.as_number().unwrap().to_i64()?;
                }
                Ok(total)
            })
            .unwrap();
        assert_eq!(sum, 356);
    }
}

#[test]
fn values_resolve_as_soon_as_their_closing_byte_arrives() {
    let doc = br#"{"head": [1, 2], "tail": "unsent"#; // truncated on purpose
    let src = StreamSource::new(Chunks::new(doc, &[8, 8]));
    // The complete prefix is readable even though the document never
    // finishes.
    let head = src.read_at(&["head".into()]).unwrap();
    let text = src.pump(|_| head.as_text()).unwrap();
    assert_eq!(text.as_ref(), b"[1, 2]");
    // The truncated tail surfaces as a parse error, not a hang.
    let tail = src.read_at(&["tail".into()]).unwrap();
    assert!(src.pump(|_| tail.as_text()).is_err());
}
