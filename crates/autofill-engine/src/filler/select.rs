use autofill_dom::{Document, EventKind, NodeId};
use tracing::debug;

use super::{fire, related, FieldFiller};
use crate::normalize::normalize_option;

impl FieldFiller {
    /// Native `<select>`: first option whose text or value matches wins.
    pub(crate) fn fill_native_select(&self, doc: &mut Document, node: NodeId, value: &str) -> bool {
        let target = normalize_option(value);
        if target.is_empty() {
            return false;
        }

        let options: Vec<NodeId> = doc
            .descendants(node)
            .into_iter()
            .filter(|n| doc.tag_name(*n) == "option")
            .collect();

        let chosen = options.iter().copied().find(|option| {
            let text = doc.text_content(*option);
            if self.is_placeholder(&text) && doc.attribute(*option, "value").is_none_or(str::is_empty) {
                return false;
            }
            let option_value = doc.attribute(*option, "value").unwrap_or_default();
            related(&normalize_option(&text), &target) || related(&normalize_option(option_value), &target)
        });
        let Some(chosen) = chosen else {
            debug!(%node, value, "no matching option");
            return false;
        };

        let selected_value = doc
            .attribute(chosen, "value")
            .map(str::to_string)
            .unwrap_or_else(|| doc.text_content(chosen).trim().to_string());
        let written = doc
            .assign_value(node, &selected_value)
            .or_else(|_| doc.set_value_native(node, &selected_value));
        if let Err(e) = written {
            debug!(%node, error = %e, "select value rejected");
            return false;
        }

        for option in &options {
            if let Err(e) = doc.set_selected(*option, *option == chosen) {
                debug!(option = %option, error = %e, "select option failed");
            }
        }
        fire(doc, node, &[EventKind::Change]);
        true
    }
}
