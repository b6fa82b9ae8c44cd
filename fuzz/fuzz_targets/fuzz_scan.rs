#![no_main]

use jsonpeek::{Text, Value};
use libfuzzer_sys::fuzz_target;

/// Walk every reachable handle, forcing all the lazy scans to run. The
/// reader must never panic, whatever the bytes; on documents serde_json
/// accepts it must succeed outright.
fn walk(value: &Value<'_, Text>, depth: usize) -> Result<(), jsonpeek::Error> {
    if depth == 0 {
        return Ok(());
    }
    let _ = value.as_text()?;
    match value {
        Value::Number(n) => {
            let _ = n.parse()?;
            let _ = n.to_f64();
            let _ = n.to_i64();
        }
        Value::String(s) => {
            let _ = s.decode()?;
            let _ = s.as_bytes_if_no_escape()?;
            for _ in s.code_points()? {}
        }
        Value::Array(a) => {
            for item in a.iter() {
                walk(&item?, depth - 1)?;
            }
        }
        Value::Object(o) => {
            for entry in o.iter() {
                let (key, item) = entry?;
                let _ = key.decode()?;
                walk(&item, depth - 1)?;
            }
        }
        Value::Null | Value::Bool(_) => {}
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let text = Text::new(data);
    let walked = Value::read(&text).and_then(|root| walk(&root, 64));
    if serde_json::from_slice::<serde_json::Value>(data).is_ok() {
        assert!(walked.is_ok(), "serde accepts but the scanner errors");
    }
});
