//! Host page error handling and scoped suppression.
//!
//! Some pages install global error handlers that rethrow errors raised by
//! their own scripts while we mutate controls. [`HostErrorScope`] shields a
//! block of DOM work from that interference and always restores the page's
//! behaviour when dropped.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{DomError, ScriptError};

/// What the page's global error handler does with a script error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostErrorPolicy {
    /// Report and carry on, like an unhandled error in the console.
    #[default]
    Report,
    /// Rethrow into whoever triggered the event.
    Propagate,
}

impl HostErrorPolicy {
    pub(crate) fn handle(
        self,
        err: ScriptError,
        uncaught: &mut Vec<ScriptError>,
    ) -> Result<(), DomError> {
        match self {
            HostErrorPolicy::Report => {
                uncaught.push(err);
                Ok(())
            }
            HostErrorPolicy::Propagate => Err(DomError::HostInterference(err.message)),
        }
    }
}

/// Scope during which page script errors are swallowed.
///
/// Derefs to the document, so DOM work inside the scope reads exactly like
/// work outside it.
pub struct HostErrorScope<'a> {
    doc: &'a mut Document,
}

impl Deref for HostErrorScope<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        self.doc
    }
}

impl DerefMut for HostErrorScope<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        self.doc
    }
}

impl Drop for HostErrorScope<'_> {
    fn drop(&mut self) {
        self.doc.suppression_depth -= 1;
    }
}

impl Document {
    /// Open a suppression scope; it closes when the guard is dropped.
    pub fn suppress_host_errors(&mut self) -> HostErrorScope<'_> {
        self.suppression_depth += 1;
        HostErrorScope { doc: self }
    }

    pub fn is_suppressing_host_errors(&self) -> bool {
        self.suppression_depth > 0
    }

    pub fn host_error_policy(&self) -> HostErrorPolicy {
        self.host_policy
    }

    pub fn set_host_error_policy(&mut self, policy: HostErrorPolicy) {
        self.host_policy = policy;
    }

    /// Errors swallowed inside suppression scopes.
    pub fn suppressed_errors(&self) -> &[ScriptError] {
        &self.suppressed_errors
    }

    /// Errors the page reported without rethrowing.
    pub fn uncaught_errors(&self) -> &[ScriptError] {
        &self.uncaught_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    fn hostile_document() -> (Document, crate::NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let input = doc.append_element(root, "input", &[("type", "date")]).unwrap();
        doc.set_host_error_policy(HostErrorPolicy::Propagate);
        doc.add_event_listener(input, EventKind::Change, |_, _| {
            Err(ScriptError::new("datepicker is undefined"))
        });
        (doc, input)
    }

    #[test]
    fn test_propagate_policy_surfaces_error() {
        let (mut doc, input) = hostile_document();
        let result = doc.dispatch_event(input, EventKind::Change);
        assert!(matches!(result, Err(DomError::HostInterference(_))));
    }

    #[test]
    fn test_scope_suppresses_and_restores() {
        let (mut doc, input) = hostile_document();
        {
            let mut scope = doc.suppress_host_errors();
            assert!(scope.is_suppressing_host_errors());
            scope.dispatch_event(input, EventKind::Change).unwrap();
        }
        assert!(!doc.is_suppressing_host_errors());
        assert_eq!(doc.host_error_policy(), HostErrorPolicy::Propagate);
        assert_eq!(doc.suppressed_errors().len(), 1);
        assert!(doc.dispatch_event(input, EventKind::Change).is_err());
    }

    #[test]
    fn test_nested_scopes() {
        let (mut doc, input) = hostile_document();
        {
            let mut outer = doc.suppress_host_errors();
            {
                let mut inner = outer.suppress_host_errors();
                inner.dispatch_event(input, EventKind::Change).unwrap();
            }
            assert!(outer.is_suppressing_host_errors());
            outer.dispatch_event(input, EventKind::Change).unwrap();
        }
        assert!(!doc.is_suppressing_host_errors());
    }

    #[test]
    fn test_report_policy_collects_uncaught() {
        let (mut doc, input) = hostile_document();
        doc.set_host_error_policy(HostErrorPolicy::Report);
        doc.dispatch_event(input, EventKind::Change).unwrap();
        assert_eq!(doc.uncaught_errors().len(), 1);
        assert!(doc.suppressed_errors().is_empty());
    }
}
