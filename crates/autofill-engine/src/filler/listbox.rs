use autofill_dom::{Document, EventKind, NodeId};
use tracing::debug;

use super::{cross_equivalent, fire, related, semantically_equal, FieldFiller};
use crate::normalize::normalize_option;

const OPEN_SEQUENCE: &[EventKind] = &[
    EventKind::Click,
    EventKind::MouseDown,
    EventKind::MouseUp,
    EventKind::Click,
];

impl FieldFiller {
    /// `role=listbox` dropdown.
    pub(crate) fn fill_listbox(&self, doc: &mut Document, listbox: NodeId, value: &str) -> bool {
        let target = normalize_option(value);
        if target.is_empty() {
            return false;
        }

        if needs_opening(doc, listbox) {
            debug!(%listbox, "opening dropdown");
            if let Err(e) = doc.focus(listbox) {
                debug!(%listbox, error = %e, "focus failed");
            }
            fire(doc, listbox, OPEN_SEQUENCE);
        }

        let options = listbox_options(doc, listbox);
        let chosen = options
            .iter()
            .copied()
            .filter(|o| !is_placeholder_option(self, doc, *o))
            .find(|o| option_matches(doc, *o, &target));
        let Some(chosen) = chosen else {
            debug!(%listbox, value, options = options.len(), "no matching dropdown option");
            return false;
        };

        fire(doc, chosen, OPEN_SEQUENCE);
        for option in &options {
            let selected = if *option == chosen { "true" } else { "false" };
            if let Err(e) = doc.set_attribute(*option, "aria-selected", selected) {
                debug!(option = %option, error = %e, "aria-selected update failed");
            }
        }
        true
    }
}

fn needs_opening(doc: &Document, listbox: NodeId) -> bool {
    doc.attribute(listbox, "aria-expanded") == Some("false")
        || !listbox_options(doc, listbox)
            .into_iter()
            .any(|o| doc.is_visible(o))
}

/// `role=option` descendants plus options owned through `aria-owns` or
/// `aria-controls`, without duplicates.
fn listbox_options(doc: &Document, listbox: NodeId) -> Vec<NodeId> {
    let is_option = |n: &NodeId| doc.attribute(*n, "role") == Some("option");
    let mut options: Vec<NodeId> = doc.descendants(listbox).into_iter().filter(is_option).collect();

    let owned_ids: Vec<&str> = ["aria-owns", "aria-controls"]
        .iter()
        .filter_map(|a| doc.attribute(listbox, a))
        .flat_map(str::split_whitespace)
        .collect();
    for id in owned_ids {
        let Some(owned) = doc.get_element_by_id(id) else {
            continue;
        };
        let candidates = std::iter::once(owned).chain(doc.descendants(owned));
        for candidate in candidates.filter(is_option) {
            if !options.contains(&candidate) {
                options.push(candidate);
            }
        }
    }
    options
}

fn is_placeholder_option(filler: &FieldFiller, doc: &Document, option: NodeId) -> bool {
    filler.is_placeholder(&doc.text_content(option))
        && doc
            .attribute(option, "data-value")
            .is_none_or(|v| v.trim().is_empty())
}

fn option_matches(doc: &Document, option: NodeId, target: &str) -> bool {
    let text = normalize_option(&doc.text_content(option));
    let data_value = doc
        .attribute(option, "data-value")
        .map(normalize_option)
        .unwrap_or_default();

    [&text, &data_value].into_iter().any(|candidate| {
        related(candidate, target) || (!candidate.is_empty() && semantically_equal(candidate, target))
    }) || (!data_value.is_empty() && cross_equivalent(&data_value, target))
}
