//! The document arena: tree structure, attributes, classes and control state.

use tracing::trace;

use crate::error::{DomError, ScriptError};
use crate::events::{EventRecord, ListenerEntry};
use crate::host::HostErrorPolicy;
use crate::node::{ElementData, Node, NodeData, NodeId, WriteChannel};
use crate::observer::{MutationKind, MutationRecord, ObserverEntry};

/// A single-owner, in-memory page.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. Listeners and
/// mutation observers are stored alongside the tree and receive
/// `&mut Document` when they run, so they can mutate the page the same way
/// page scripts do.
pub struct Document {
    pub(crate) nodes: Vec<Node>,
    root: NodeId,
    focused: Option<NodeId>,
    pub(crate) listeners: Vec<ListenerEntry>,
    pub(crate) observers: Vec<ObserverEntry>,
    pub(crate) next_handle: u64,
    pub(crate) event_log: Vec<EventRecord>,
    pub(crate) host_policy: HostErrorPolicy,
    pub(crate) suppression_depth: usize,
    pub(crate) suppressed_errors: Vec<ScriptError>,
    pub(crate) uncaught_errors: Vec<ScriptError>,
    pub(crate) dispatch_depth: usize,
    pub(crate) delivering: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Document {
    /// Create an empty document with a `body` root.
    pub fn new() -> Self {
        Self::with_root(ElementData::new("body"))
    }

    pub(crate) fn with_root(root: ElementData) -> Self {
        Self {
            nodes: vec![Node::element(root)],
            root: NodeId(0),
            focused: None,
            listeners: Vec::new(),
            observers: Vec::new(),
            next_handle: 1,
            event_log: Vec::new(),
            host_policy: HostErrorPolicy::default(),
            suppression_depth: 0,
            suppressed_errors: Vec::new(),
            uncaught_errors: Vec::new(),
            dispatch_depth: 0,
            delivering: false,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    pub(crate) fn element_data(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(data) => Some(data),
            NodeData::Text(_) => None,
        }
    }

    pub(crate) fn element_data_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match &mut self
            .nodes
            .get_mut(id.0)
            .ok_or(DomError::UnknownNode(id))?
            .data
        {
            NodeData::Element(data) => Ok(data),
            NodeData::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    // ------------------------------------------------------------------
    // Tree construction
    // ------------------------------------------------------------------

    /// Append a new element under `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<NodeId, DomError> {
        let mut data = ElementData::new(tag);
        for (name, value) in attributes {
            data.attributes.insert(name.to_string(), value.to_string());
        }
        if let Some(value) = data.attributes.get("value") {
            data.value = value.clone();
        }
        self.append_node(parent, Node::element(data))
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        self.append_node(parent, Node::text(text))
    }

    pub(crate) fn append_node(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, DomError> {
        self.element_data(parent)
            .ok_or(DomError::NotAnElement(parent))?;
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        self.record_mutation(MutationRecord {
            target: parent,
            kind: MutationKind::ChildList { added: vec![id] },
        });
        self.maybe_flush();
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Element children only.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// Descendants in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// Whether `node` is `ancestor` or lies below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    /// Siblings after `id`, in order.
    pub fn next_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        match siblings.iter().position(|s| *s == id) {
            Some(pos) => siblings[pos + 1..].to_vec(),
            None => Vec::new(),
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element_data(id).is_some()
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(id.0).map(|n| &n.data),
            Some(NodeData::Text(_))
        )
    }

    /// Lowercase tag name, empty for text nodes.
    pub fn tag_name(&self, id: NodeId) -> &str {
        self.element_data(id).map(|d| d.tag.as_str()).unwrap_or("")
    }

    // ------------------------------------------------------------------
    // Attributes and classes
    // ------------------------------------------------------------------

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element_data(id)?
            .attributes
            .get(name)
            .map(|v| v.as_str())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute. Writing `value` also updates the live value and
    /// fails when the page intercepts the attribute channel.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let data = self.element_data_mut(id)?;
        if name == "value" {
            if data.blocked.contains(&WriteChannel::Attribute) {
                return Err(DomError::WriteBlocked {
                    node: id,
                    channel: WriteChannel::Attribute,
                });
            }
            data.value = value.to_string();
        }
        let old_value = data.attributes.insert(name.to_string(), value.to_string());
        if old_value.as_deref() != Some(value) {
            self.record_mutation(MutationRecord {
                target: id,
                kind: MutationKind::Attributes {
                    name: name.to_string(),
                    old_value,
                },
            });
        }
        self.maybe_flush();
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        let old_value = self.element_data_mut(id)?.attributes.remove(name);
        let removed = old_value.is_some();
        if removed {
            self.record_mutation(MutationRecord {
                target: id,
                kind: MutationKind::Attributes {
                    name: name.to_string(),
                    old_value,
                },
            });
            self.maybe_flush();
        }
        Ok(removed)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_data(id)
            .map(|d| d.classes().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Add a class; returns whether it was missing.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        if self.has_class(id, class) {
            return Ok(false);
        }
        let mut classes: Vec<String> = self
            .element_data_mut(id)?
            .classes()
            .map(str::to_string)
            .collect();
        classes.push(class.to_string());
        self.set_attribute(id, "class", &classes.join(" "))?;
        Ok(true)
    }

    /// Remove a class; returns whether it was present.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        if !self.has_class(id, class) {
            return Ok(false);
        }
        let classes: Vec<String> = self
            .element_data_mut(id)?
            .classes()
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        self.set_attribute(id, "class", &classes.join(" "))?;
        Ok(true)
    }

    /// First element whose `id` attribute equals `html_id`.
    pub fn get_element_by_id(&self, html_id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|n| self.attribute(*n, "id") == Some(html_id))
    }

    // ------------------------------------------------------------------
    // Control state
    // ------------------------------------------------------------------

    /// Live value of a form control (empty for anything else).
    pub fn value(&self, id: NodeId) -> &str {
        self.element_data(id).map(|d| d.value.as_str()).unwrap_or("")
    }

    /// `el.value = v` through the instance accessor.
    pub fn assign_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        self.write_value(id, WriteChannel::Property, value)
    }

    /// Write through the prototype's native setter.
    pub fn set_value_native(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        self.write_value(id, WriteChannel::NativeSetter, value)
    }

    /// Redefine the instance's `value` property.
    pub fn redefine_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        self.write_value(id, WriteChannel::Redefine, value)
    }

    fn write_value(&mut self, id: NodeId, channel: WriteChannel, value: &str) -> Result<(), DomError> {
        let data = self.element_data_mut(id)?;
        if data.blocked.contains(&channel) {
            return Err(DomError::WriteBlocked { node: id, channel });
        }
        trace!(node = %id, %channel, "value write");
        data.value = value.to_string();
        Ok(())
    }

    /// Mark a write channel as intercepted by the page.
    pub fn block_channel(&mut self, id: NodeId, channel: WriteChannel) -> Result<(), DomError> {
        self.element_data_mut(id)?.blocked.insert(channel);
        Ok(())
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.element_data(id).map(|d| d.checked).unwrap_or(false)
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), DomError> {
        let data = self.element_data_mut(id)?;
        if data.blocked.contains(&WriteChannel::Property) {
            return Err(DomError::WriteBlocked {
                node: id,
                channel: WriteChannel::Property,
            });
        }
        data.checked = checked;
        Ok(())
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.element_data(id).map(|d| d.selected).unwrap_or(false)
    }

    pub fn set_selected(&mut self, id: NodeId, selected: bool) -> Result<(), DomError> {
        self.element_data_mut(id)?.selected = selected;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Text and visibility
    // ------------------------------------------------------------------

    /// Concatenated text of `id` and everything below it.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(Node {
            data: NodeData::Text(text),
            ..
        }) = self.nodes.get(id.0)
        {
            return text.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match &self.nodes[n.0].data {
                NodeData::Text(text) => Some(text.as_str()),
                NodeData::Element(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Replace the content of a text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        let node = self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))?;
        match &mut node.data {
            NodeData::Text(current) => *current = text.to_string(),
            NodeData::Element(_) => return Err(DomError::NotAnElement(id)),
        }
        self.record_mutation(MutationRecord {
            target: id,
            kind: MutationKind::CharacterData,
        });
        self.maybe_flush();
        Ok(())
    }

    /// Visible when neither the node nor any ancestor is hidden.
    pub fn is_visible(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .all(|n| !self.element_data(n).map(|d| d.is_hidden()).unwrap_or(false))
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move focus to `id` and fire `focus`.
    pub fn focus(&mut self, id: NodeId) -> Result<(), DomError> {
        self.node(id)?;
        self.focused = Some(id);
        self.dispatch_event(id, crate::events::EventKind::Focus)
    }

    /// Drop focus from `id` and fire `blur`.
    pub fn blur(&mut self, id: NodeId) -> Result<(), DomError> {
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.dispatch_event(id, crate::events::EventKind::Blur)
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
