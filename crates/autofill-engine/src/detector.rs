//! Question discovery on a page.
//!
//! Google Forms wraps each question in a `role=listitem`; other builders are
//! recognised by their question root class, `fieldset` or `.form-group`.

use autofill_dom::{Document, NodeId, Selector};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::control::input_type;
use crate::normalize::normalize_label;
use crate::upload::{ExpectedFileType, FileUploadFieldInfo, ADD_FILE_SELECTORS};

/// Container selectors, tried in order until one matches.
const CONTAINER_SELECTORS: &[&str] = &[
    "[role=listitem]",
    ".freebirdFormviewerComponentsQuestionBaseRoot",
    ".Qr7Oae",
    "fieldset",
    ".form-group",
];

static CONTAINERS: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTAINER_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
});

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("[role=heading]").expect("valid selector"));

static LABEL_FALLBACK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("label, legend, .M7eMe").expect("valid selector"));

static ADD_FILE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(&ADD_FILE_SELECTORS.join(", ")).expect("valid selector"));

/// Finds question containers, their labels and their controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormDetector;

impl FormDetector {
    pub fn new() -> Self {
        Self
    }

    /// Top-level question containers in document order.
    ///
    /// The first selector with any match wins. Containers nested inside
    /// another match (option rows of a Google Forms checkbox list are
    /// `role=listitem` too) are dropped.
    pub fn find_question_containers(&self, doc: &Document) -> Vec<NodeId> {
        for selector in CONTAINERS.iter() {
            let found = doc.query_selector_all(doc.root(), selector);
            if found.is_empty() {
                continue;
            }
            let top_level: Vec<NodeId> = found
                .iter()
                .copied()
                .filter(|n| !found.iter().any(|other| other != n && doc.contains(*other, *n)))
                .collect();
            debug!(selector = selector.as_str(), count = top_level.len(), "question containers");
            return top_level;
        }
        Vec::new()
    }

    /// Normalized question text of a container, empty when there is none.
    pub fn extract_question_label(&self, doc: &Document, container: NodeId) -> String {
        let text = doc
            .query_selector_all(container, &HEADING)
            .into_iter()
            .chain(doc.query_selector_all(container, &LABEL_FALLBACK))
            .map(|n| doc.text_content(n))
            .find(|text| !text.trim().is_empty());
        text.map(|t| normalize_label(&t)).unwrap_or_default()
    }

    /// The control answering the question, by kind priority.
    pub fn find_input_field(&self, doc: &Document, container: NodeId) -> Option<NodeId> {
        let descendants = doc.descendants(container);
        let is_input = |n: NodeId, kind: &str| doc.tag_name(n) == "input" && input_type(doc, n) == kind;
        let has_role = |n: NodeId, role: &str| doc.attribute(n, "role") == Some(role);

        let probes: [&dyn Fn(NodeId) -> bool; 7] = [
            &|n| is_input(n, "date"),
            &|n| has_role(n, "listbox"),
            &|n| doc.tag_name(n) == "select",
            &|n| has_role(n, "radio") || is_input(n, "radio"),
            &|n| has_role(n, "checkbox") || is_input(n, "checkbox"),
            &|n| doc.tag_name(n) == "textarea",
            &|n| doc.tag_name(n) == "input" && input_type(doc, n) != "hidden",
        ];
        probes
            .iter()
            .find_map(|probe| descendants.iter().copied().find(|n| probe(*n)))
    }

    /// Questions expecting a file, either through a file input or an
    /// add-file button.
    pub fn detect_file_upload_fields(&self, doc: &Document) -> Vec<FileUploadFieldInfo> {
        self.find_question_containers(doc)
            .into_iter()
            .filter(|container| {
                doc.query_selector(*container, &ADD_FILE).is_some()
                    || doc
                        .descendants(*container)
                        .into_iter()
                        .any(|n| doc.tag_name(n) == "input" && input_type(doc, n) == "file")
            })
            .map(|container| {
                let question_label = self.extract_question_label(doc, container);
                FileUploadFieldInfo {
                    container,
                    expected_file_type: ExpectedFileType::from_label(&question_label),
                    question_label,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
