use jsonpeek::{splice, PieceTable, Source, Text, Value};

#[test]
fn replace_an_array_element() {
    let text = Text::from(r#"{"a":1,"b":[1,2,3]}"#);
    let edited = splice(&text, &["b".into(), 2.into()], b"7").unwrap();
    assert_eq!(edited.flatten(), br#"{"a":1,"b":[1,7,3]}"#);
}

#[test]
fn identity_splice_preserves_the_text() {
    let doc = r#"{ "a" : [1, {"b": "x"}], "c": null }"#;
    let text = Text::from(doc);
    for path in [
        vec![],
        vec!["a".into()],
        vec!["a".into(), 2.into()],
        vec!["c".into()],
    ] {
        let current = Value::read_at(&text, &path).unwrap().as_text().unwrap();
        let edited = splice(&text, &path, &current).unwrap();
        assert_eq!(edited.flatten(), doc.as_bytes(), "path {path:?}");
    }
}

#[test]
fn splice_is_prefix_replacement_suffix() {
    let doc = r#"{"x": [10, 20], "y": 3}"#;
    let text = Text::from(doc);
    let target = Value::read_at(&text, &["x".into(), 1.into()]).unwrap();
    let start = target.offset().unwrap();
    let end = jsonpeek::end_of_value(&text, start).unwrap();

    let edited = splice(&text, &["x".into(), 1.into()], b"[true]").unwrap();
    let mut expected = Vec::new();
    expected.extend_from_slice(&doc.as_bytes()[..start]);
    expected.extend_from_slice(b"[true]");
    expected.extend_from_slice(&doc.as_bytes()[end + 1..]);
    assert_eq!(edited.flatten(), expected);
}

#[test]
fn edited_documents_reparse() {
    let text = Text::from(r#"{"a":1,"b":[1,2,3]}"#);
    let edited = splice(&text, &["b".into(), 2.into()], br#"{"deep": [5]}"#).unwrap();
    let b2 = Value::read_at(&edited, &["b".into(), 2.into(), "deep".into(), 1.into()]).unwrap();
    assert_eq!(b2.as_text().unwrap().as_ref(), b"5");
    // And an edit of the edit still shares, never re-serialises.
    let again = splice(&edited, &["a".into()], b"9").unwrap();
    assert_eq!(again.flatten(), br#"{"a":9,"b":[1,{"deep": [5]},3]}"#);
}

#[test]
fn piece_table_length_invariant() {
    let text = Text::from(r#"[1, 2, 3]"#);
    let edited = splice(&text, &[2.into()], b"\"two\"").unwrap();
    assert_eq!(edited.flatten().len(), edited.len());
    let pt = PieceTable::from_source(&text);
    assert_eq!(pt.len(), text.len());
}

#[test]
fn replacing_the_root() {
    let text = Text::from("  [1, 2]  ");
    let edited = splice(&text, &[], b"null").unwrap();
    assert_eq!(edited.flatten(), b"  null  ");
}
