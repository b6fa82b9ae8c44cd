//! Randomised cross-checks against `serde_json` as the oracle.

use jsonpeek::{splice, Num, Step, Text, Value};
use quickcheck::{Arbitrary, Gen, QuickCheck};
use serde_json::Value as J;

#[derive(Clone, Debug)]
struct ArbJson(J);

impl Arbitrary for ArbJson {
    fn arbitrary(g: &mut Gen) -> Self {
        ArbJson(gen_value(g, 3))
    }
}

fn gen_value(g: &mut Gen, depth: usize) -> J {
    let variants: u8 = if depth == 0 { 4 } else { 6 };
    match u8::arbitrary(g) % variants {
        0 => J::Null,
        1 => J::Bool(bool::arbitrary(g)),
        2 => J::from(i64::arbitrary(g)),
        3 => J::String(gen_string(g)),
        4 => {
            let n = usize::arbitrary(g) % 4;
            J::Array((0..n).map(|_| gen_value(g, depth - 1)).collect())
        }
        _ => {
            let n = usize::arbitrary(g) % 4;
            (0..n)
                .map(|i| (format!("k{i}_{}", gen_string(g)), gen_value(g, depth - 1)))
                .collect::<serde_json::Map<_, _>>()
                .into()
        }
    }
}

fn gen_string(g: &mut Gen) -> String {
    const ALPHABET: &[char] = &[
        'a', 'b', 'z', '0', ' ', '"', '\\', '/', '\n', '\t', '\u{8}', 'é', 'Ω', '𝄞', '😀',
    ];
    let n = usize::arbitrary(g) % 6;
    (0..n)
        .map(|_| *g.choose(ALPHABET).unwrap())
        .collect()
}

/// Every `(path, subvalue)` pair of `v`, array positions 1-based.
fn all_paths(v: &J, prefix: &[Step], out: &mut Vec<(Vec<Step>, J)>) {
    out.push((prefix.to_vec(), v.clone()));
    match v {
        J::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let mut p = prefix.to_vec();
                p.push(Step::Index(i + 1));
                all_paths(item, &p, out);
            }
        }
        J::Object(map) => {
            for (k, item) in map {
                let mut p = prefix.to_vec();
                p.push(Step::Key(k.clone()));
                all_paths(item, &p, out);
            }
        }
        _ => {}
    }
}

fn test_count() -> u64 {
    if is_ci::cached() { 2_000 } else { 500 }
}

#[test]
fn every_path_spells_out_the_oracle_subvalue() {
    fn prop(doc: ArbJson) -> bool {
        let rendered = serde_json::to_string(&doc.0).unwrap();
        let text = Text::from(rendered.as_str());
        let mut paths = Vec::new();
        all_paths(&doc.0, &[], &mut paths);
        paths.into_iter().all(|(path, expected)| {
            let Ok(value) = Value::read_at(&text, &path) else {
                return false;
            };
            let Ok(sub) = value.as_text() else {
                return false;
            };
            matches!(serde_json::from_slice::<J>(&sub), Ok(re) if re == expected)
        })
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(ArbJson) -> bool);
}

#[test]
fn iteration_follows_textual_order_everywhere() {
    fn check(value: &Value<'_, Text>, oracle: &J) -> bool {
        match (value, oracle) {
            (Value::Array(arr), J::Array(items)) => {
                let mine: Vec<_> = arr.iter().map(Result::unwrap).collect();
                mine.len() == items.len()
                    && mine.iter().zip(items).all(|(v, o)| check(v, o))
            }
            (Value::Object(obj), J::Object(map)) => {
                let mine: Vec<_> = obj.iter().map(Result::unwrap).collect();
                mine.len() == map.len()
                    && mine.iter().zip(map).all(|((k, v), (ok, ov))| {
                        k.decode().unwrap().as_ref() == ok.as_bytes() && check(v, ov)
                    })
            }
            (Value::String(s), J::String(o)) => s.decode().unwrap().as_ref() == o.as_bytes(),
            (Value::Number(n), J::Number(o)) => match (n.parse().unwrap(), o.as_i64()) {
                (Num::Int(a), Some(b)) => a == b,
                (parsed, _) => parsed == Num::Float(o.as_f64().unwrap()),
            },
            (Value::Bool(b), J::Bool(o)) => b == o,
            (Value::Null, J::Null) => true,
            _ => false,
        }
    }

    fn prop(doc: ArbJson) -> bool {
        let rendered = serde_json::to_string(&doc.0).unwrap();
        let text = Text::from(rendered.as_str());
        check(&Value::read(&text).unwrap(), &doc.0)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(ArbJson) -> bool);
}

#[test]
fn identity_splice_reproduces_the_document() {
    fn prop(doc: ArbJson) -> bool {
        let rendered = serde_json::to_string(&doc.0).unwrap();
        let text = Text::from(rendered.as_str());
        let mut paths = Vec::new();
        all_paths(&doc.0, &[], &mut paths);
        paths.into_iter().all(|(path, _)| {
            let current = Value::read_at(&text, &path)
                .unwrap()
                .as_text()
                .unwrap()
                .into_owned();
            let edited = splice(&text, &path, &current).unwrap();
            edited.flatten() == rendered.as_bytes()
        })
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(ArbJson) -> bool);
}

#[test]
fn integer_parse_matches_the_platform() {
    fn prop(v: i64) -> bool {
        let doc = v.to_string();
        let text = Text::from(doc.as_str());
        let n = text.root().unwrap().as_number().unwrap();
        n.parse().unwrap() == Num::Int(v) && n.to_i64().unwrap() == v
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(i64) -> bool);
}
