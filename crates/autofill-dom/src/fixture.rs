//! JSON page fixtures.
//!
//! A fixture is a tree of [`NodeSpec`]s. Elements carry their attributes and
//! live control state; text nodes are `{"text": "..."}`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::DomError;
use crate::node::{ElementData, Node, NodeData, NodeId, WriteChannel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Text { text: String },
    Element(ElementSpec),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub checked: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,

    /// Write channels the page intercepts on this control.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub blocked: BTreeSet<WriteChannel>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ElementSpec {
    fn to_data(&self) -> ElementData {
        let mut data = ElementData::new(&self.tag);
        data.attributes = self.attrs.clone();
        data.value = self
            .value
            .clone()
            .or_else(|| self.attrs.get("value").cloned())
            .unwrap_or_default();
        data.checked = self.checked;
        data.selected = self.selected;
        data.blocked = self.blocked.clone();
        data
    }
}

impl Document {
    /// Build a document whose root is the fixture's top element.
    pub fn from_spec(spec: &NodeSpec) -> Result<Self, DomError> {
        let NodeSpec::Element(root) = spec else {
            return Err(DomError::InvalidFixture(
                "fixture root must be an element".to_string(),
            ));
        };
        if root.tag.trim().is_empty() {
            return Err(DomError::InvalidFixture("element without tag".to_string()));
        }
        let mut doc = Document::with_root(root.to_data());
        let root_id = doc.root();
        for child in &root.children {
            doc.build_subtree(root_id, child)?;
        }
        Ok(doc)
    }

    fn build_subtree(&mut self, parent: NodeId, spec: &NodeSpec) -> Result<(), DomError> {
        match spec {
            NodeSpec::Text { text } => {
                self.append_node(parent, Node::text(text.as_str()))?;
            }
            NodeSpec::Element(element) => {
                if element.tag.trim().is_empty() {
                    return Err(DomError::InvalidFixture("element without tag".to_string()));
                }
                let id = self.append_node(parent, Node::element(element.to_data()))?;
                for child in &element.children {
                    self.build_subtree(id, child)?;
                }
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, DomError> {
        let spec: NodeSpec = serde_json::from_str(json)?;
        Self::from_spec(&spec)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, DomError> {
        let spec: NodeSpec = serde_json::from_value(value)?;
        Self::from_spec(&spec)
    }

    /// Snapshot the current page, including live control state.
    pub fn to_spec(&self) -> NodeSpec {
        self.spec_of(self.root())
    }

    fn spec_of(&self, id: NodeId) -> NodeSpec {
        match &self.nodes[id.0].data {
            NodeData::Text(text) => NodeSpec::Text { text: text.clone() },
            NodeData::Element(data) => NodeSpec::Element(ElementSpec {
                tag: data.tag.clone(),
                attrs: data.attributes.clone(),
                children: self
                    .children(id)
                    .iter()
                    .map(|child| self.spec_of(*child))
                    .collect(),
                value: (!data.value.is_empty()).then(|| data.value.clone()),
                checked: data.checked,
                selected: data.selected,
                blocked: data.blocked.clone(),
            }),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, DomError> {
        Ok(serde_json::to_string_pretty(&self.to_spec())?)
    }
}
