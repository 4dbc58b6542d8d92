//! Loading and dumping page fixtures.

use autofill_dom::{Document, DomError, NodeSpec, WriteChannel};

const FORM: &str = r#"{
  "tag": "form",
  "attrs": {"id": "inscription"},
  "children": [
    {
      "tag": "div",
      "attrs": {"role": "listitem"},
      "children": [
        {"tag": "label", "children": [{"text": "Prénom"}]},
        {"tag": "input", "attrs": {"type": "text"}, "blocked": ["property", "attribute"]}
      ]
    },
    {
      "tag": "div",
      "attrs": {"role": "listitem"},
      "children": [
        {"tag": "legend", "children": [{"text": "Conditions"}]},
        {"tag": "input", "attrs": {"type": "checkbox"}, "checked": true}
      ]
    }
  ]
}"#;

#[test]
fn test_load_fixture() {
    let doc = Document::from_json(FORM).unwrap();
    assert_eq!(doc.tag_name(doc.root()), "form");
    assert_eq!(doc.attribute(doc.root(), "id"), Some("inscription"));

    let items = doc.select(doc.root(), "[role=listitem]").unwrap();
    assert_eq!(items.len(), 2);

    let label = doc.select(items[0], "label").unwrap()[0];
    assert_eq!(doc.text_content(label), "Prénom");

    let checkbox = doc.select(items[1], "input[type=checkbox]").unwrap()[0];
    assert!(doc.is_checked(checkbox));
}

#[test]
fn test_blocked_channels_from_fixture() {
    let mut doc = Document::from_json(FORM).unwrap();
    let input = doc.select(doc.root(), "input[type=text]").unwrap()[0];

    assert!(doc.assign_value(input, "Marie").is_err());
    doc.set_value_native(input, "Marie").unwrap();
    assert_eq!(doc.value(input), "Marie");
}

#[test]
fn test_dump_keeps_live_state() {
    let mut doc = Document::from_json(FORM).unwrap();
    let input = doc.select(doc.root(), "input[type=text]").unwrap()[0];
    doc.redefine_value(input, "Marie").unwrap();

    let dumped = doc.to_json_pretty().unwrap();
    let reloaded = Document::from_json(&dumped).unwrap();
    let input = reloaded.select(reloaded.root(), "input[type=text]").unwrap()[0];
    assert_eq!(reloaded.value(input), "Marie");

    let NodeSpec::Element(root) = reloaded.to_spec() else {
        panic!("root should be an element");
    };
    let NodeSpec::Element(item) = &root.children[0] else {
        panic!("first child should be an element");
    };
    let NodeSpec::Element(text_input) = &item.children[1] else {
        panic!("expected the input");
    };
    assert!(text_input.blocked.contains(&WriteChannel::Property));
}

#[test]
fn test_text_root_is_rejected() {
    let result = Document::from_json(r#"{"text": "just text"}"#);
    assert!(matches!(result, Err(DomError::InvalidFixture(_))));
}

#[test]
fn test_malformed_json() {
    let result = Document::from_json("{not json");
    assert!(matches!(result, Err(DomError::Serialization(_))));
}
