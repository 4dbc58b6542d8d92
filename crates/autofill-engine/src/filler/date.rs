use autofill_dom::{Document, EventKind, NodeId};
use tracing::debug;

use super::{fire, FieldFiller};

impl FieldFiller {
    /// Dates are written as given, without parsing or reformatting.
    pub(crate) fn fill_date(&self, doc: &mut Document, node: NodeId, value: &str) -> bool {
        let mut scope = doc.suppress_host_errors();
        let written = scope
            .assign_value(node, value)
            .or_else(|_| scope.set_value_native(node, value));
        if let Err(e) = written {
            debug!(%node, error = %e, "date write failed");
            return false;
        }

        if let Err(e) = scope.focus(node) {
            debug!(%node, error = %e, "focus failed");
        }
        fire(&mut scope, node, &[EventKind::Input, EventKind::Change]);
        if let Err(e) = scope.blur(node) {
            debug!(%node, error = %e, "blur failed");
        }
        true
    }
}
