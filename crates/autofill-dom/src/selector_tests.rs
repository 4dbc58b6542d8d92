use super::*;

fn form() -> Document {
    Document::from_value(serde_json::json!({
        "tag": "form",
        "children": [
            {"tag": "div", "attrs": {"role": "listitem", "class": "Qr7Oae item"}, "children": [
                {"tag": "div", "attrs": {"role": "heading"}, "children": [{"text": "Email"}]},
                {"tag": "input", "attrs": {"type": "email", "name": "email"}}
            ]},
            {"tag": "div", "attrs": {"role": "listitem"}, "children": [
                {"tag": "div", "attrs": {"aria-label": "Ajouter un fichier", "role": "button"}}
            ]},
            {"tag": "span", "attrs": {"id": "note", "data-tooltip": "Add File"}}
        ]
    }))
    .unwrap()
}

#[test]
fn test_tag_and_attribute() {
    let doc = form();
    assert_eq!(doc.select(doc.root(), "[role=listitem]").unwrap().len(), 2);
    assert_eq!(doc.select(doc.root(), "input[type=email]").unwrap().len(), 1);
    assert_eq!(doc.select(doc.root(), "input[type=text]").unwrap().len(), 0);
}

#[test]
fn test_class_and_id() {
    let doc = form();
    assert_eq!(doc.select(doc.root(), ".Qr7Oae.item").unwrap().len(), 1);
    assert_eq!(doc.select(doc.root(), "#note").unwrap().len(), 1);
    assert_eq!(doc.select(doc.root(), "span#note").unwrap().len(), 1);
}

#[test]
fn test_attribute_operators() {
    let doc = form();
    let root = doc.root();
    assert_eq!(doc.select(root, r#"[aria-label*="un fichier"]"#).unwrap().len(), 1);
    assert_eq!(doc.select(root, r#"[aria-label^="Ajouter"]"#).unwrap().len(), 1);
    assert_eq!(doc.select(root, r#"[aria-label$="fichier"]"#).unwrap().len(), 1);
    assert_eq!(doc.select(root, "[class~=item]").unwrap().len(), 1);
    assert_eq!(doc.select(root, "[data-tooltip]").unwrap().len(), 1);
}

#[test]
fn test_case_insensitive_flag() {
    let doc = form();
    let root = doc.root();
    assert_eq!(doc.select(root, r#"[data-tooltip*="add file"]"#).unwrap().len(), 0);
    assert_eq!(doc.select(root, r#"[data-tooltip*="add file" i]"#).unwrap().len(), 1);
}

#[test]
fn test_combinators() {
    let doc = form();
    let root = doc.root();
    assert_eq!(doc.select(root, "[role=listitem] input").unwrap().len(), 1);
    assert_eq!(doc.select(root, "form > [role=listitem]").unwrap().len(), 2);
    assert_eq!(doc.select(root, "form > input").unwrap().len(), 0);
}

#[test]
fn test_comma_groups_keep_document_order() {
    let doc = form();
    let found = doc.select(doc.root(), "span, [role=heading]").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(doc.tag_name(found[0]), "div");
    assert_eq!(doc.tag_name(found[1]), "span");
}

#[test]
fn test_closest() {
    let doc = form();
    let input = doc.select(doc.root(), "input").unwrap()[0];
    let item = Selector::parse("[role=listitem]").unwrap();
    let found = doc.closest(input, &item).unwrap();
    assert_eq!(doc.attribute(found, "role"), Some("listitem"));
}

#[test]
fn test_universal() {
    let doc = form();
    let all = doc.select(doc.root(), "*").unwrap();
    assert_eq!(all.len(), 6);
}

#[test]
fn test_invalid_selectors() {
    for source in ["", "[role=", "div >", "..x", "[a*b]", "[\"x\"]"] {
        assert!(Selector::parse(source).is_err(), "{source} should not parse");
    }
}

#[test]
fn test_from_str() {
    let selector: Selector = "input[type=checkbox]".parse().unwrap();
    assert_eq!(selector.as_str(), "input[type=checkbox]");
}
