use autofill_dom::{Document, EventKind, NodeId};
use tracing::debug;

use super::{answer_matches, choice_label, enclosing_group, fire, FieldFiller};
use crate::control::{input_type, Control, ControlKind};

const SELECT_SEQUENCE: &[EventKind] = &[EventKind::Change, EventKind::Click, EventKind::Input];

fn is_native_radio(doc: &Document, node: NodeId) -> bool {
    doc.tag_name(node) == "input" && input_type(doc, node) == "radio"
}

fn is_custom_radio(doc: &Document, node: NodeId) -> bool {
    doc.attribute(node, "role") == Some("radio")
}

/// Group root of a custom radio: its `role=radiogroup` ancestor, else its
/// parent.
fn custom_group_root(doc: &Document, radio: NodeId) -> Option<NodeId> {
    doc.ancestors(radio)
        .into_iter()
        .find(|a| doc.attribute(*a, "role") == Some("radiogroup"))
        .or_else(|| enclosing_group(doc, radio, is_custom_radio))
}

/// Every option of the group `control` belongs to.
fn radio_group(doc: &Document, control: &Control) -> Vec<NodeId> {
    match control.kind {
        ControlKind::CustomRadio => match custom_group_root(doc, control.node) {
            Some(root) => doc
                .descendants(root)
                .into_iter()
                .filter(|n| is_custom_radio(doc, *n))
                .collect(),
            None => vec![control.node],
        },
        _ => match doc.attribute(control.node, "name") {
            Some(name) => doc
                .descendants(doc.root())
                .into_iter()
                .filter(|n| is_native_radio(doc, *n) && doc.attribute(*n, "name") == Some(name))
                .collect(),
            None => vec![control.node],
        },
    }
}

impl FieldFiller {
    pub(crate) fn fill_radio(&self, doc: &mut Document, control: &Control, value: &str) -> bool {
        if value.trim().is_empty() {
            return false;
        }
        let group = radio_group(doc, control);
        let chosen = group
            .iter()
            .copied()
            .find(|option| answer_matches(&choice_label(doc, *option), value));
        let Some(chosen) = chosen else {
            debug!(node = %control.node, value, options = group.len(), "no matching radio option");
            return false;
        };

        if control.kind == ControlKind::CustomRadio {
            for option in &group {
                let checked = if *option == chosen { "true" } else { "false" };
                if let Err(e) = doc.set_attribute(*option, "aria-checked", checked) {
                    debug!(option = %option, error = %e, "aria-checked update failed");
                }
            }
            if let Err(e) = doc.focus(chosen) {
                debug!(node = %chosen, error = %e, "focus failed");
            }
            fire(doc, chosen, SELECT_SEQUENCE);
            sync_shadow_radio(doc, chosen, &group);
        } else {
            for option in &group {
                if let Err(e) = doc.set_checked(*option, *option == chosen) {
                    debug!(option = %option, error = %e, "checked update failed");
                }
            }
            if let Err(e) = doc.focus(chosen) {
                debug!(node = %chosen, error = %e, "focus failed");
            }
            fire(doc, chosen, SELECT_SEQUENCE);
        }
        true
    }
}

/// Custom radio groups sometimes keep hidden native radios in sync for form
/// submission; check the one matching the chosen option.
fn sync_shadow_radio(doc: &mut Document, chosen: NodeId, group: &[NodeId]) {
    let Some(root) = custom_group_root(doc, chosen) else {
        return;
    };
    let shadows: Vec<NodeId> = doc
        .descendants(root)
        .into_iter()
        .filter(|n| is_native_radio(doc, *n))
        .collect();
    if shadows.is_empty() {
        return;
    }

    let label = choice_label(doc, chosen);
    let by_value = shadows.iter().copied().find(|s| {
        doc.attribute(*s, "value")
            .is_some_and(|v| answer_matches(v, &label))
    });
    let by_index = group
        .iter()
        .position(|o| *o == chosen)
        .and_then(|i| shadows.get(i).copied());
    let Some(shadow) = by_value.or(by_index).or(shadows.first().copied()) else {
        return;
    };

    for other in &shadows {
        if let Err(e) = doc.set_checked(*other, *other == shadow) {
            debug!(node = %other, error = %e, "shadow radio update failed");
        }
    }
    fire(doc, shadow, &[EventKind::Change]);
}
