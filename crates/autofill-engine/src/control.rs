//! Control classification.
//!
//! A page control is classified once into a [`Control`]; the filler and the
//! orchestrator then dispatch on its [`ControlKind`] instead of probing
//! attributes again. ARIA roles win over tag and `type`.

use std::fmt;

use autofill_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    /// Text-like input or textarea.
    Text,
    /// Native `<select>`.
    Select,
    /// `role=listbox` dropdown.
    CustomSelect,
    /// Native radio input.
    Radio,
    /// `role=radio` element.
    CustomRadio,
    Checkbox,
    CustomCheckbox,
    Date,
    FileUpload,
}

impl ControlKind {
    pub fn category(self) -> FieldCategory {
        match self {
            ControlKind::Text => FieldCategory::Text,
            ControlKind::Select | ControlKind::CustomSelect => FieldCategory::Select,
            ControlKind::Radio | ControlKind::CustomRadio => FieldCategory::Radio,
            ControlKind::Checkbox | ControlKind::CustomCheckbox => FieldCategory::Checkbox,
            ControlKind::Date => FieldCategory::Date,
            ControlKind::FileUpload => FieldCategory::Other,
        }
    }

    pub fn is_custom(self) -> bool {
        matches!(
            self,
            ControlKind::CustomSelect | ControlKind::CustomRadio | ControlKind::CustomCheckbox
        )
    }
}

/// Coarse field category used for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    Date,
    Select,
    Radio,
    Checkbox,
    Text,
    Other,
}

impl FieldCategory {
    /// Whether the filler can handle fields of this category.
    pub fn is_supported(self) -> bool {
        self != FieldCategory::Other
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldCategory::Date => "date",
            FieldCategory::Select => "select",
            FieldCategory::Radio => "radio",
            FieldCategory::Checkbox => "checkbox",
            FieldCategory::Text => "text",
            FieldCategory::Other => "other",
        };
        f.write_str(name)
    }
}

/// A classified control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub node: NodeId,
    pub kind: ControlKind,
}

impl Control {
    pub fn new(node: NodeId, kind: ControlKind) -> Self {
        Self { node, kind }
    }

    /// Classify `node`, or `None` when it cannot hold a value.
    ///
    /// A `role=radiogroup` resolves to its first `role=radio` option.
    pub fn classify(doc: &Document, node: NodeId) -> Option<Self> {
        if !doc.is_element(node) {
            return None;
        }
        match doc.attribute(node, "role") {
            Some("listbox") => return Some(Self::new(node, ControlKind::CustomSelect)),
            Some("radio") => return Some(Self::new(node, ControlKind::CustomRadio)),
            Some("radiogroup") => {
                return doc
                    .descendants(node)
                    .into_iter()
                    .find(|n| doc.attribute(*n, "role") == Some("radio"))
                    .map(|radio| Self::new(radio, ControlKind::CustomRadio));
            }
            Some("checkbox") => return Some(Self::new(node, ControlKind::CustomCheckbox)),
            _ => {}
        }

        let kind = match doc.tag_name(node) {
            "select" => ControlKind::Select,
            "textarea" => ControlKind::Text,
            "input" => match input_type(doc, node).as_str() {
                "date" => ControlKind::Date,
                "radio" => ControlKind::Radio,
                "checkbox" => ControlKind::Checkbox,
                "file" => ControlKind::FileUpload,
                "hidden" | "submit" | "button" | "reset" | "image" => return None,
                _ => ControlKind::Text,
            },
            _ => return None,
        };
        Some(Self::new(node, kind))
    }

    pub fn category(&self) -> FieldCategory {
        self.kind.category()
    }
}

/// Lowercased `type` of an input, `text` when absent.
pub fn input_type(doc: &Document, node: NodeId) -> String {
    doc.attribute(node, "type")
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "text".to_string())
}

/// Short description of a control for the observation log: its role, the
/// input type, or the tag name.
pub fn describe_input(doc: &Document, node: NodeId) -> String {
    if let Some(role) = doc.attribute(node, "role") {
        return role.to_string();
    }
    match doc.tag_name(node) {
        "input" => input_type(doc, node),
        tag => tag.to_string(),
    }
}

/// Classify the control found in a container, falling back on the
/// container's structure when the control itself is not recognised.
pub fn classify_field(doc: &Document, container: NodeId, node: NodeId) -> (FieldCategory, Option<Control>) {
    if let Some(control) = Control::classify(doc, node) {
        return (control.category(), Some(control));
    }

    let fallbacks: [(&str, ControlKind); 5] = [
        ("listbox", ControlKind::CustomSelect),
        ("radio", ControlKind::CustomRadio),
        ("checkbox", ControlKind::CustomCheckbox),
        ("date", ControlKind::Date),
        ("select", ControlKind::Select),
    ];
    let descendants = doc.descendants(container);
    for (marker, kind) in fallbacks {
        let found = descendants.iter().copied().find(|n| match kind {
            ControlKind::Date => doc.tag_name(*n) == "input" && input_type(doc, *n) == "date",
            ControlKind::Select => doc.tag_name(*n) == "select",
            _ => doc.attribute(*n, "role") == Some(marker),
        });
        if let Some(found) = found {
            return (kind.category(), Some(Control::new(found, kind)));
        }
    }
    (FieldCategory::Other, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_one(tag: &str, attrs: &[(&str, &str)]) -> Option<ControlKind> {
        let mut doc = Document::new();
        let root = doc.root();
        let node = doc.append_element(root, tag, attrs).unwrap();
        Control::classify(&doc, node).map(|c| c.kind)
    }

    #[test]
    fn test_role_wins_over_tag() {
        assert_eq!(
            classify_one("input", &[("type", "text"), ("role", "listbox")]),
            Some(ControlKind::CustomSelect)
        );
        assert_eq!(classify_one("div", &[("role", "radio")]), Some(ControlKind::CustomRadio));
        assert_eq!(
            classify_one("div", &[("role", "checkbox")]),
            Some(ControlKind::CustomCheckbox)
        );
    }

    #[test]
    fn test_native_controls() {
        assert_eq!(classify_one("select", &[]), Some(ControlKind::Select));
        assert_eq!(classify_one("textarea", &[]), Some(ControlKind::Text));
        assert_eq!(classify_one("input", &[]), Some(ControlKind::Text));
        assert_eq!(classify_one("input", &[("type", "email")]), Some(ControlKind::Text));
        assert_eq!(classify_one("input", &[("type", "DATE")]), Some(ControlKind::Date));
        assert_eq!(classify_one("input", &[("type", "radio")]), Some(ControlKind::Radio));
        assert_eq!(
            classify_one("input", &[("type", "checkbox")]),
            Some(ControlKind::Checkbox)
        );
        assert_eq!(classify_one("input", &[("type", "file")]), Some(ControlKind::FileUpload));
        assert_eq!(classify_one("input", &[("type", "hidden")]), None);
        assert_eq!(classify_one("div", &[]), None);
    }

    #[test]
    fn test_radiogroup_resolves_to_first_radio() {
        let mut doc = Document::new();
        let root = doc.root();
        let group = doc.append_element(root, "div", &[("role", "radiogroup")]).unwrap();
        let first = doc.append_element(group, "div", &[("role", "radio")]).unwrap();
        doc.append_element(group, "div", &[("role", "radio")]).unwrap();

        let control = Control::classify(&doc, group).unwrap();
        assert_eq!(control, Control::new(first, ControlKind::CustomRadio));
    }

    #[test]
    fn test_categories() {
        assert_eq!(ControlKind::CustomSelect.category(), FieldCategory::Select);
        assert_eq!(ControlKind::FileUpload.category(), FieldCategory::Other);
        assert!(!FieldCategory::Other.is_supported());
        assert!(FieldCategory::Date.is_supported());
        assert_eq!(FieldCategory::Checkbox.to_string(), "checkbox");
    }

    #[test]
    fn test_structure_fallback() {
        let mut doc = Document::new();
        let root = doc.root();
        let container = doc.append_element(root, "div", &[]).unwrap();
        let button = doc
            .append_element(container, "input", &[("type", "button")])
            .unwrap();
        let listbox = doc.append_element(container, "div", &[("role", "listbox")]).unwrap();

        let (category, control) = classify_field(&doc, container, button);
        assert_eq!(category, FieldCategory::Select);
        assert_eq!(control, Some(Control::new(listbox, ControlKind::CustomSelect)));
    }

    #[test]
    fn test_unclassifiable_field() {
        let mut doc = Document::new();
        let root = doc.root();
        let container = doc.append_element(root, "div", &[]).unwrap();
        let button = doc
            .append_element(container, "input", &[("type", "submit")])
            .unwrap();
        assert_eq!(classify_field(&doc, container, button), (FieldCategory::Other, None));
    }

    #[test]
    fn test_describe_input() {
        let mut doc = Document::new();
        let root = doc.root();
        let email = doc.append_element(root, "input", &[("type", "email")]).unwrap();
        let area = doc.append_element(root, "textarea", &[]).unwrap();
        let listbox = doc.append_element(root, "div", &[("role", "listbox")]).unwrap();
        assert_eq!(describe_input(&doc, email), "email");
        assert_eq!(describe_input(&doc, area), "textarea");
        assert_eq!(describe_input(&doc, listbox), "listbox");
    }
}
