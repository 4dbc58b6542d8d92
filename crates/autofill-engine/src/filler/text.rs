use std::fmt;

use autofill_dom::{Document, EventKind, NodeId};
use tracing::{debug, warn};

use super::{fire, FieldFiller};

/// Value write strategies for text-like controls, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStrategy {
    /// Clear, then plain property assignment.
    Direct,
    /// `value` attribute.
    Attribute,
    /// Prototype native setter, bypassing an instance accessor.
    NativeSetter,
    /// Redefine the instance's `value` property.
    Redefine,
}

impl fmt::Display for TextStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextStrategy::Direct => "direct",
            TextStrategy::Attribute => "attribute",
            TextStrategy::NativeSetter => "native_setter",
            TextStrategy::Redefine => "redefine",
        };
        f.write_str(name)
    }
}

/// Try each strategy until one does not fail.
pub(crate) fn write_text_value(doc: &mut Document, node: NodeId, value: &str) -> Option<TextStrategy> {
    if doc
        .assign_value(node, "")
        .and_then(|_| doc.assign_value(node, value))
        .is_ok()
    {
        return Some(TextStrategy::Direct);
    }
    if doc.set_attribute(node, "value", value).is_ok() {
        return Some(TextStrategy::Attribute);
    }
    if doc.set_value_native(node, value).is_ok() {
        return Some(TextStrategy::NativeSetter);
    }
    if doc.redefine_value(node, value).is_ok() {
        return Some(TextStrategy::Redefine);
    }
    None
}

impl FieldFiller {
    pub(crate) fn fill_text(&self, doc: &mut Document, node: NodeId, value: &str) -> bool {
        let applied = {
            let mut scope = doc.suppress_host_errors();
            let strategy = write_text_value(&mut scope, node, value);
            if strategy.is_some() {
                if let Err(e) = scope.focus(node) {
                    debug!(%node, error = %e, "focus failed");
                }
                fire(&mut scope, node, &[EventKind::Input, EventKind::Change]);
            }
            strategy
        };

        match applied {
            Some(strategy) => {
                debug!(%node, %strategy, "text value applied");
                true
            }
            None => {
                let last_try = doc.assign_value(node, value).is_ok();
                warn!(%node, last_try, "every text write strategy failed");
                last_try
            }
        }
    }
}
