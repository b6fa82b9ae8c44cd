//! Read a couple of fields lazily, then splice an edit into the document
//! without re-serialising the rest of it.

use jsonpeek::{splice, Text, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = r#"{
        "Image": {
            "Width": 800,
            "Height": 600,
            "Title": "View from église",
            "IDs": [116, 943, 234, 38793]
        }
    }"#;

    let text = Text::from(doc);

    let title = Value::read_at(&text, &["Image".into(), "Title".into()])?;
    let title = title.as_string().expect("Title is a string");
    println!("title: {}", String::from_utf8_lossy(&title.decode()?));

    let ids = Value::read_at(&text, &["Image".into(), "IDs".into()])?;
    let mut sum = 0i64;
    for id in ids.as_array().expect("IDs is an array").iter() {
        sum += id?.as_number().expect("IDs are numbers").to_i64()?;
    }
    println!("sum of IDs: {sum}");

    // Double the width. Everything but the five replaced bytes is shared
    // with the original text.
    let edited = splice(&text, &["Image".into(), "Width".into()], b"1600")?;
    let width = Value::read_at(&edited, &["Image".into(), "Width".into()])?;
    println!(
        "width after edit: {} ({} fragments)",
        width,
        edited.fragment_count()
    );

    Ok(())
}
