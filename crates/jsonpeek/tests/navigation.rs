use jsonpeek::{Error, Text, Value};

#[test]
fn string_element_by_path() {
    let text = Text::from(r#"{"foo": [1, 2, 3, "four"]}"#);
    let item = text.root().unwrap().get("foo").unwrap().get(4).unwrap();
    let s = item.as_string().expect("string handle");
    assert_eq!(s.as_text().unwrap().as_ref(), br#""four""#);
    assert_eq!(s.decode().unwrap().as_ref(), b"four");
}

#[test]
fn path_walk_equals_step_by_step_navigation() {
    let text = Text::from(r#"{"Image":{"Width":800,"Height":600,"IDs":[116,943,234,38793]}}"#);
    let by_path = Value::read_at(&text, &["Image".into(), "IDs".into(), 4.into()]).unwrap();
    let by_steps = text
        .root()
        .unwrap()
        .get("Image")
        .unwrap()
        .get("IDs")
        .unwrap()
        .get(4)
        .unwrap();
    assert_eq!(by_path, by_steps);
    assert_eq!(by_path.as_text().unwrap().as_ref(), b"38793");
}

#[test]
fn subvalue_text_is_the_exact_substring() {
    let doc = r#"{ "a" : { "deep" : [ true , null ] } }"#;
    let text = Text::from(doc);
    let inner = Value::read_at(&text, &["a".into(), "deep".into()]).unwrap();
    let got = inner.as_text().unwrap();
    let spelled = &doc[doc.find('[').unwrap()..=doc.find(']').unwrap()];
    assert_eq!(got.as_ref(), spelled.as_bytes());
}

#[test]
fn object_iteration_in_textual_order() {
    let text = Text::from(r#"{"z": 1, "a": 2, "m": 3}"#);
    let obj = text.root().unwrap().as_object().unwrap();
    let keys: Vec<String> = obj
        .iter()
        .map(|e| String::from_utf8(e.unwrap().0.decode().unwrap().into_owned()).unwrap())
        .collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn lone_surrogate_key_is_tolerated() {
    let text = Text::from(r#"{"\uDFAA":0}"#);
    let obj = text.root().unwrap().as_object().unwrap();
    let entries: Vec<_> = obj.iter().map(Result::unwrap).collect();
    assert_eq!(entries.len(), 1);
    let (key, value) = &entries[0];
    assert_eq!(key.decode().unwrap().as_ref(), [0xED, 0xBE, 0xAA]);
    assert_eq!(value.as_text().unwrap().as_ref(), b"0");
}

#[test]
fn navigation_failure_leaves_the_root_usable() {
    let text = Text::from(r#"{"a": {"b": 1}}"#);
    let root = text.root().unwrap();
    assert_eq!(
        Value::read_at(&text, &["a".into(), "missing".into()]).unwrap_err(),
        Error::KeyNotFound("missing".into())
    );
    // The earlier failure changed nothing.
    assert_eq!(
        root.get("a").unwrap().get("b").unwrap().as_text().unwrap().as_ref(),
        b"1"
    );
}

#[test]
fn reading_fields_in_declaration_order_reuses_the_walk() {
    let text = Text::from(r#"{"w": 1, "h": 2, "d": 3}"#);
    let obj = text.root().unwrap().as_object().unwrap();
    let w = obj.get("w").unwrap();
    let w_end = jsonpeek::end_of_value(&text, w.offset().unwrap()).unwrap();
    let h = obj.get_from("h", w_end).unwrap();
    assert_eq!(h.as_text().unwrap().as_ref(), b"2");
    let h_end = jsonpeek::end_of_value(&text, h.offset().unwrap()).unwrap();
    let d = obj.get_from("d", h_end).unwrap();
    assert_eq!(d.as_text().unwrap().as_ref(), b"3");
}

#[test]
fn bool_and_null_roots() {
    assert_eq!(Text::from("true").root().unwrap().as_bool(), Some(true));
    assert!(Text::from("null").root().unwrap().is_null());
}
