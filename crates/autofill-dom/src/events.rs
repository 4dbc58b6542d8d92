//! Event listeners and bubbling dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::document::Document;
use crate::error::{DomError, ScriptError};
use crate::node::NodeId;

/// Events the filler synthesizes and page scripts listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Focus,
    Blur,
    Input,
    Change,
    Click,
    MouseDown,
    MouseUp,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Click => "click",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
        };
        f.write_str(name)
    }
}

/// An event as seen by a listener.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub target: NodeId,
    /// Node the running listener is attached to.
    pub current_target: NodeId,
}

/// One dispatched event, kept for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub target: NodeId,
    pub kind: EventKind,
}

/// Handle returned by listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Listener callback. Returning an error mimics an exception thrown by a
/// page script.
pub type ListenerFn = Box<dyn FnMut(&mut Document, &Event) -> Result<(), ScriptError> + Send>;

pub(crate) struct ListenerEntry {
    pub(crate) id: ListenerId,
    pub(crate) node: NodeId,
    pub(crate) kind: EventKind,
    pub(crate) token: Option<CancellationToken>,
    pub(crate) callback: Option<ListenerFn>,
}

impl ListenerEntry {
    fn is_live(&self) -> bool {
        self.token.as_ref().map(|t| !t.is_cancelled()).unwrap_or(true)
    }
}

impl Document {
    /// Register a listener on `node` for `kind`.
    pub fn add_event_listener<F>(&mut self, node: NodeId, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&mut Document, &Event) -> Result<(), ScriptError> + Send + 'static,
    {
        self.push_listener(node, kind, None, Box::new(listener))
    }

    /// Register a listener that is dropped once `token` is cancelled.
    pub fn add_event_listener_with_token<F>(
        &mut self,
        node: NodeId,
        kind: EventKind,
        token: CancellationToken,
        listener: F,
    ) -> ListenerId
    where
        F: FnMut(&mut Document, &Event) -> Result<(), ScriptError> + Send + 'static,
    {
        self.push_listener(node, kind, Some(token), Box::new(listener))
    }

    fn push_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        token: Option<CancellationToken>,
        callback: ListenerFn,
    ) -> ListenerId {
        let id = ListenerId(self.next_handle);
        self.next_handle += 1;
        self.listeners.push(ListenerEntry {
            id,
            node,
            kind,
            token,
            callback: Some(callback),
        });
        id
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Number of listeners still attached.
    pub fn listener_count(&self) -> usize {
        self.listeners.iter().filter(|l| l.is_live()).count()
    }

    /// Dispatch `kind` at `target`, bubbling up to the root.
    ///
    /// Listener errors are routed through the host error policy; only a
    /// page that rethrows from its global handler makes this fail, and even
    /// then every listener on the path still runs.
    pub fn dispatch_event(&mut self, target: NodeId, kind: EventKind) -> Result<(), DomError> {
        self.node(target)?;
        self.event_log.push(EventRecord { target, kind });
        self.dispatch_depth += 1;

        let path: Vec<NodeId> = std::iter::once(target).chain(self.ancestors(target)).collect();
        let mut outcome = Ok(());

        for current in path {
            let ids: Vec<ListenerId> = self
                .listeners
                .iter()
                .filter(|l| l.node == current && l.kind == kind && l.is_live())
                .map(|l| l.id)
                .collect();

            for id in ids {
                let Some(mut callback) = self
                    .listeners
                    .iter_mut()
                    .find(|l| l.id == id && l.is_live())
                    .and_then(|l| l.callback.take())
                else {
                    continue;
                };

                let event = Event {
                    kind,
                    target,
                    current_target: current,
                };
                let result = callback(self, &event);

                if let Some(entry) = self.listeners.iter_mut().find(|l| l.id == id) {
                    entry.callback = Some(callback);
                }

                if let Err(err) = result {
                    let routed = self.report_script_error(err);
                    if outcome.is_ok() {
                        outcome = routed;
                    }
                }
            }
        }

        self.listeners.retain(|l| l.is_live());
        self.dispatch_depth -= 1;
        self.maybe_flush();
        outcome
    }

    /// Every event dispatched so far.
    pub fn event_log(&self) -> &[EventRecord] {
        &self.event_log
    }

    /// Event kinds dispatched at `target`, in order.
    pub fn events_for(&self, target: NodeId) -> Vec<EventKind> {
        self.event_log
            .iter()
            .filter(|r| r.target == target)
            .map(|r| r.kind)
            .collect()
    }

    pub fn clear_event_log(&mut self) {
        self.event_log.clear();
    }

    pub(crate) fn report_script_error(&mut self, err: ScriptError) -> Result<(), DomError> {
        if self.suppression_depth > 0 {
            debug!(error = %err, "suppressed page script error");
            self.suppressed_errors.push(err);
            return Ok(());
        }
        self.host_policy.handle(err, &mut self.uncaught_errors)
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
