//! Unfilled-field markers.
//!
//! A highlighted container carries a marker class until it holds an answer.
//! Each marker comes with a watch (event listeners plus a mutation observer
//! bound to one [`CancellationToken`]) that strips the marker the first time
//! the container is found answered, then cancels itself.

use std::collections::HashMap;
use std::sync::Arc;

use autofill_config::HighlightConfig;
use autofill_dom::{Document, EventKind, NodeId, ObserveOptions};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::control::input_type;
use crate::filler::FieldFiller;

const WATCHED_EVENTS: [EventKind; 3] = [EventKind::Input, EventKind::Change, EventKind::Click];

type Watches = Arc<Mutex<HashMap<NodeId, CancellationToken>>>;

/// Adds and removes unfilled-field markers.
pub struct Highlighter {
    enabled: bool,
    class_name: String,
    filler: Arc<FieldFiller>,
    watches: Watches,
}

impl Highlighter {
    pub fn new(config: &HighlightConfig, filler: FieldFiller) -> Self {
        Self {
            enabled: config.enabled,
            class_name: config.class_name.clone(),
            filler: Arc::new(filler),
            watches: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Containers currently watched.
    pub fn active_watches(&self) -> usize {
        self.watches.lock().len()
    }

    /// Whether anything inside `container` counts as an answer.
    pub fn container_has_answer(&self, doc: &Document, container: NodeId) -> bool {
        container_has_answer(&self.filler, doc, container)
    }

    /// Mark `container` and watch it until answered.
    ///
    /// A previous watch on the same container is cancelled first.
    pub fn highlight(&self, doc: &mut Document, container: NodeId) -> bool {
        self.cancel_watch(container);
        if let Err(e) = doc.add_class(container, &self.class_name) {
            debug!(%container, error = %e, "cannot mark container");
            return false;
        }

        let token = CancellationToken::new();
        let check = Arc::new(AnswerWatch {
            container,
            class_name: self.class_name.clone(),
            filler: Arc::clone(&self.filler),
            watches: Arc::clone(&self.watches),
            token: token.clone(),
        });
        for kind in WATCHED_EVENTS {
            let check = Arc::clone(&check);
            doc.add_event_listener_with_token(container, kind, token.clone(), move |doc, _event| {
                check.run(doc);
                Ok(())
            });
        }
        doc.observe_with_token(container, ObserveOptions::all(), token.clone(), move |doc, _records| {
            check.run(doc)
        });

        self.watches.lock().insert(container, token);
        debug!(%container, "container highlighted");
        true
    }

    /// Cancel every watch and strip every marker; returns how many markers
    /// were removed.
    pub fn remove_all(&self, doc: &mut Document) -> usize {
        let drained: Vec<CancellationToken> = self.watches.lock().drain().map(|(_, t)| t).collect();
        for token in &drained {
            token.cancel();
        }

        let root = doc.root();
        let marked: Vec<NodeId> = std::iter::once(root)
            .chain(doc.descendants(root))
            .filter(|n| doc.has_class(*n, &self.class_name))
            .collect();
        let removed = marked
            .into_iter()
            .filter(|n| doc.remove_class(*n, &self.class_name).unwrap_or(false))
            .count();
        debug!(removed, watches = drained.len(), "highlights removed");
        removed
    }

    fn cancel_watch(&self, container: NodeId) {
        if let Some(previous) = self.watches.lock().remove(&container) {
            previous.cancel();
        }
    }
}

/// State shared by the listeners and the observer of one highlighted
/// container.
struct AnswerWatch {
    container: NodeId,
    class_name: String,
    filler: Arc<FieldFiller>,
    watches: Watches,
    token: CancellationToken,
}

impl AnswerWatch {
    fn run(&self, doc: &mut Document) {
        if self.token.is_cancelled() || !container_has_answer(&self.filler, doc, self.container) {
            return;
        }
        self.token.cancel();
        self.watches.lock().remove(&self.container);
        if let Err(e) = doc.remove_class(self.container, &self.class_name) {
            debug!(container = %self.container, error = %e, "cannot unmark container");
        }
        debug!(container = %self.container, "answered, highlight removed");
    }
}

fn container_has_answer(filler: &FieldFiller, doc: &Document, container: NodeId) -> bool {
    doc.descendants(container)
        .into_iter()
        .any(|n| node_has_answer(filler, doc, n))
}

fn node_has_answer(filler: &FieldFiller, doc: &Document, node: NodeId) -> bool {
    if !doc.is_element(node) {
        return false;
    }
    if doc.attribute(node, "aria-checked") == Some("true") {
        return true;
    }
    match doc.tag_name(node) {
        "input" => match input_type(doc, node).as_str() {
            "radio" | "checkbox" => doc.is_checked(node),
            "hidden" | "submit" | "button" | "reset" | "image" => false,
            _ => !doc.value(node).trim().is_empty(),
        },
        "textarea" => !doc.value(node).trim().is_empty(),
        "option" => doc.is_selected(node) && !is_placeholder_option(filler, doc, node, "value"),
        _ => {
            doc.attribute(node, "role") == Some("option")
                && doc.attribute(node, "aria-selected") == Some("true")
                && !is_placeholder_option(filler, doc, node, "data-value")
        }
    }
}

fn is_placeholder_option(filler: &FieldFiller, doc: &Document, option: NodeId, value_attr: &str) -> bool {
    filler.is_placeholder(&doc.text_content(option))
        && doc.attribute(option, value_attr).is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
#[path = "highlight_tests.rs"]
mod tests;
