//! Node storage: ids, element data and value write channels.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a node inside its [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The independent ways a script can write an input's value.
///
/// Framework-controlled pages override some of them on the instance; a
/// blocked channel makes the corresponding write fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteChannel {
    /// Plain `el.value = v` through the instance accessor.
    Property,
    /// `el.setAttribute("value", v)`.
    Attribute,
    /// The prototype's native value setter.
    NativeSetter,
    /// Redefining the `value` property on the instance.
    Redefine,
}

impl fmt::Display for WriteChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriteChannel::Property => "property",
            WriteChannel::Attribute => "attribute",
            WriteChannel::NativeSetter => "native_setter",
            WriteChannel::Redefine => "redefine",
        };
        f.write_str(name)
    }
}

/// Element payload.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Tag name (lowercase).
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Live value of form controls.
    pub value: String,
    pub checked: bool,
    pub selected: bool,
    /// Write channels the page intercepts.
    pub blocked: BTreeSet<WriteChannel>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            ..Default::default()
        }
    }

    /// Whitespace separated class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .get("class")
            .map(|c| c.split_whitespace())
            .into_iter()
            .flatten()
    }

    /// Whether inline state hides this element.
    pub fn is_hidden(&self) -> bool {
        if self.attributes.contains_key("hidden") {
            return true;
        }
        self.attributes
            .get("style")
            .map(|style| {
                let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();
                compact.contains("display:none") || compact.contains("visibility:hidden")
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn element(data: ElementData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(data),
        }
    }

    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Text(text.into()),
        }
    }
}
