use inicheck::ConfigDocument;
use proptest::collection::{btree_map, btree_set, vec};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,11}"
}

fn value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_./=-]{0,16}"
}

/// Well-formed INI text: unique section names, unique keys per section.
fn well_formed() -> impl Strategy<Value = (Vec<String>, String)> {
    btree_set(name(), 0..6)
        .prop_flat_map(|sections| {
            let names: Vec<String> = sections.into_iter().collect();
            let bodies = vec(btree_map(name(), value(), 0..6), names.len());
            (Just(names), bodies)
        })
        .prop_map(|(names, bodies)| {
            let mut text = String::from("; generated\n");
            for (section, body) in names.iter().zip(&bodies) {
                text.push_str(&format!("[{section}]\n"));
                for (key, value) in body {
                    text.push_str(&format!("  {key} = {value}\n"));
                }
                text.push('\n');
            }
            (names, text)
        })
}

proptest! {
    #[test]
    fn well_formed_input_is_valid((names, text) in well_formed()) {
        let doc = ConfigDocument::parse("prop.ini", &text);

        prop_assert!(doc.is_valid());
        prop_assert_eq!(doc.sections().len(), names.len());
        let parsed: Vec<&String> = doc.sections().keys().collect();
        let expected: Vec<&String> = names.iter().collect();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn parsing_is_deterministic(text in "(\\[[a-c]\\]|[a-c]?=[a-c]*|#.*|[a-c]+| )(\n(\\[[a-c]\\]|[a-c]?=[a-c]*|#.*|[a-c]+| )){0,20}") {
        let first = ConfigDocument::parse("prop.ini", &text);
        let second = ConfigDocument::parse("prop.ini", &text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn first_value_always_wins(key in name(), values in vec(value(), 1..5)) {
        let mut text = String::from("[S]\n");
        for v in &values {
            text.push_str(&format!("{key}={v}\n"));
        }
        let doc = ConfigDocument::parse("prop.ini", &text);

        prop_assert_eq!(doc.get("S", &key), Some(values[0].as_str()));
        prop_assert_eq!(doc.duplicates().len(), values.len() - 1);
        prop_assert!(doc.invalid_lines().is_empty());
    }

    #[test]
    fn anything_never_panics(text in "\\PC*(\n\\PC*){0,10}") {
        let doc = ConfigDocument::parse("prop.ini", &text);
        let total = doc.duplicates().len() + doc.invalid_lines().len();
        prop_assert!(total <= text.lines().count());
    }
}
