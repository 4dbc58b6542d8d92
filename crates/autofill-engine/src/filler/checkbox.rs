use autofill_dom::{Document, EventKind, NodeId};
use tracing::debug;

use super::{answer_matches, choice_label, enclosing_group, fire, FieldFiller};
use crate::control::{input_type, Control, ControlKind};
use crate::mappings::{exam_full_name, EXAM_CODES};
use crate::normalize::fold_accents;
use crate::profile::Profile;

const TOGGLE_SEQUENCE: &[EventKind] = &[EventKind::Change, EventKind::Click, EventKind::Input];

/// Words that only appear in full exam names.
const FULL_NAME_MARKERS: &[&str] = &["comprehension", "expression", "ecrite", "orale"];

fn is_native_checkbox(doc: &Document, node: NodeId) -> bool {
    doc.tag_name(node) == "input" && input_type(doc, node) == "checkbox"
}

fn is_custom_checkbox(doc: &Document, node: NodeId) -> bool {
    doc.attribute(node, "role") == Some("checkbox")
}

/// Exam code or exam full name, accents and case ignored.
fn is_exam_value(value: &str) -> bool {
    let folded = fold_accents(value.trim());
    exam_full_name(value).is_some() || EXAM_CODES.iter().any(|(_, full)| fold_accents(full) == folded)
}

/// Check or uncheck one box and notify the page.
fn set_box(doc: &mut Document, kind: ControlKind, node: NodeId, checked: bool) -> bool {
    let written = if kind == ControlKind::CustomCheckbox {
        doc.set_attribute(node, "aria-checked", if checked { "true" } else { "false" })
    } else {
        doc.set_checked(node, checked)
    };
    if let Err(e) = written {
        debug!(%node, error = %e, "checkbox update failed");
        return false;
    }
    fire(doc, node, TOGGLE_SEQUENCE);
    true
}

impl FieldFiller {
    /// Single checkbox driven by a scalar value.
    pub(crate) fn fill_checkbox(&self, doc: &mut Document, control: &Control, value: &str) -> bool {
        let token = value.trim().to_lowercase();
        let checked = self.truthy_tokens.iter().any(|t| *t == token);
        set_box(doc, control.kind, control.node, checked)
    }

    /// Several boxes of one question driven by a list value.
    ///
    /// For exam values the page's labels decide whether short codes or full
    /// names are expected, and the matching representation is taken from the
    /// profile when available. Any other list is used as it is. Each wanted
    /// value checks the first box it matches that is not already taken.
    pub(crate) fn fill_checkbox_list(
        &self,
        doc: &mut Document,
        control: &Control,
        values: &[String],
        profile: &Profile,
    ) -> bool {
        let member: fn(&Document, NodeId) -> bool = if control.kind == ControlKind::CustomCheckbox {
            is_custom_checkbox
        } else {
            is_native_checkbox
        };
        let boxes: Vec<NodeId> = match enclosing_group(doc, control.node, member) {
            Some(group) => doc
                .descendants(group)
                .into_iter()
                .filter(|n| member(doc, *n))
                .collect(),
            None => vec![control.node],
        };
        let labels: Vec<String> = boxes
            .iter()
            .map(|b| {
                let label = choice_label(doc, *b);
                if label.is_empty() {
                    doc.attribute(*b, "value").unwrap_or_default().to_string()
                } else {
                    label
                }
            })
            .collect();

        let expects_full_names = labels.iter().any(|label| {
            let folded = fold_accents(label);
            FULL_NAME_MARKERS.iter().any(|m| folded.contains(m))
        });
        let exam_values = !values.is_empty() && values.iter().all(|v| is_exam_value(v));
        let from_profile = if !exam_values {
            None
        } else if expects_full_names {
            profile
                .list("choices", "examTypesFull")
                .or_else(|| profile.list("misc", "examSubjectsFull"))
        } else {
            profile.list("choices", "examTypes")
        };
        let wanted = from_profile.unwrap_or(values);
        debug!(
            node = %control.node,
            boxes = boxes.len(),
            exam_values,
            expects_full_names,
            wanted = ?wanted,
            "multi-value checkbox fill"
        );

        let mut taken = vec![false; boxes.len()];
        let mut checked = 0;
        for value in wanted {
            let folded_value = fold_accents(value);
            let found = (0..boxes.len()).find(|&i| {
                !taken[i]
                    && (answer_matches(&labels[i], value)
                        || answer_matches(&fold_accents(&labels[i]), &folded_value)
                        || doc
                            .attribute(boxes[i], "data-value")
                            .is_some_and(|d| answer_matches(d, value)))
            });
            match found {
                Some(i) => {
                    taken[i] = true;
                    if set_box(doc, control.kind, boxes[i], true) {
                        checked += 1;
                    }
                }
                None => debug!(value = %value, "no checkbox for value"),
            }
        }
        checked > 0
    }
}
