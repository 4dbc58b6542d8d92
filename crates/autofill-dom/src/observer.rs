//! Mutation observers.
//!
//! Records are queued per observer and delivered once the outermost DOM
//! operation (or event dispatch) finishes, which plays the role of the
//! browser's microtask checkpoint. Callbacks get `&mut Document` and may
//! disconnect themselves or cancel their token.

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::document::Document;
use crate::node::NodeId;

/// Upper bound on delivery rounds triggered by observers mutating the page.
const MAX_DELIVERY_ROUNDS: usize = 32;

/// What an observer wants to hear about.
#[derive(Debug, Clone, Default)]
pub struct ObserveOptions {
    pub subtree: bool,
    pub attributes: bool,
    pub child_list: bool,
    pub character_data: bool,
    /// Restrict attribute records to these names.
    pub attribute_filter: Option<Vec<String>>,
}

impl ObserveOptions {
    /// Everything below the observed node.
    pub fn all() -> Self {
        Self {
            subtree: true,
            attributes: true,
            child_list: true,
            character_data: true,
            attribute_filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    Attributes {
        name: String,
        old_value: Option<String>,
    },
    ChildList {
        added: Vec<NodeId>,
    },
    CharacterData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub kind: MutationKind,
}

/// Handle returned by [`Document::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

pub type ObserverFn = Box<dyn FnMut(&mut Document, &[MutationRecord]) + Send>;

pub(crate) struct ObserverEntry {
    pub(crate) id: ObserverId,
    pub(crate) root: NodeId,
    pub(crate) options: ObserveOptions,
    pub(crate) token: Option<CancellationToken>,
    pub(crate) callback: Option<ObserverFn>,
    pub(crate) queue: Vec<MutationRecord>,
}

impl ObserverEntry {
    fn is_live(&self) -> bool {
        self.token.as_ref().map(|t| !t.is_cancelled()).unwrap_or(true)
    }

    fn wants(&self, doc: &Document, record: &MutationRecord) -> bool {
        let in_scope = record.target == self.root
            || (self.options.subtree && doc.contains(self.root, record.target));
        if !in_scope {
            return false;
        }
        match &record.kind {
            MutationKind::Attributes { name, .. } => {
                self.options.attributes
                    && self
                        .options
                        .attribute_filter
                        .as_ref()
                        .map(|filter| filter.iter().any(|f| f == name))
                        .unwrap_or(true)
            }
            MutationKind::ChildList { .. } => self.options.child_list,
            MutationKind::CharacterData => self.options.character_data,
        }
    }
}

impl Document {
    /// Observe mutations at or below `root`.
    pub fn observe<F>(&mut self, root: NodeId, options: ObserveOptions, callback: F) -> ObserverId
    where
        F: FnMut(&mut Document, &[MutationRecord]) + Send + 'static,
    {
        self.push_observer(root, options, None, Box::new(callback))
    }

    /// Observe until `token` is cancelled.
    pub fn observe_with_token<F>(
        &mut self,
        root: NodeId,
        options: ObserveOptions,
        token: CancellationToken,
        callback: F,
    ) -> ObserverId
    where
        F: FnMut(&mut Document, &[MutationRecord]) + Send + 'static,
    {
        self.push_observer(root, options, Some(token), Box::new(callback))
    }

    fn push_observer(
        &mut self,
        root: NodeId,
        options: ObserveOptions,
        token: Option<CancellationToken>,
        callback: ObserverFn,
    ) -> ObserverId {
        let id = ObserverId(self.next_handle);
        self.next_handle += 1;
        self.observers.push(ObserverEntry {
            id,
            root,
            options,
            token,
            callback: Some(callback),
            queue: Vec::new(),
        });
        id
    }

    /// Stop an observer; pending records are dropped.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    /// Number of observers still connected.
    pub fn observer_count(&self) -> usize {
        self.observers.iter().filter(|o| o.is_live()).count()
    }

    pub(crate) fn record_mutation(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let interested: Vec<usize> = self
            .observers
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_live() && o.wants(self, &record))
            .map(|(i, _)| i)
            .collect();
        for index in interested {
            self.observers[index].queue.push(record.clone());
        }
    }

    pub(crate) fn maybe_flush(&mut self) {
        if self.dispatch_depth == 0 {
            self.flush_mutations();
        }
    }

    /// Deliver queued records to their observers.
    pub fn flush_mutations(&mut self) {
        if self.delivering {
            return;
        }
        self.delivering = true;

        for _ in 0..MAX_DELIVERY_ROUNDS {
            let ready: Vec<ObserverId> = self
                .observers
                .iter()
                .filter(|o| o.is_live() && !o.queue.is_empty())
                .map(|o| o.id)
                .collect();
            if ready.is_empty() {
                break;
            }

            for id in ready {
                let Some(entry) = self
                    .observers
                    .iter_mut()
                    .find(|o| o.id == id && o.is_live())
                else {
                    continue;
                };
                let records = std::mem::take(&mut entry.queue);
                let Some(mut callback) = entry.callback.take() else {
                    continue;
                };

                callback(self, &records);

                if let Some(entry) = self.observers.iter_mut().find(|o| o.id == id) {
                    entry.callback = Some(callback);
                }
            }
        }

        if self.observers.iter().any(|o| o.is_live() && !o.queue.is_empty()) {
            warn!("mutation delivery did not settle, dropping pending records");
            for observer in &mut self.observers {
                observer.queue.clear();
            }
        }

        self.observers.retain(|o| o.is_live());
        self.delivering = false;
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
