//! DOM error types.

use thiserror::Error;

use crate::node::{NodeId, WriteChannel};

/// DOM operation errors.
#[derive(Debug, Error)]
pub enum DomError {
    /// Node id does not belong to this document.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Operation needs an element but got a text node.
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    /// The page intercepts this way of writing the value.
    #[error("Write through {channel} rejected on node {node}")]
    WriteBlocked { node: NodeId, channel: WriteChannel },

    /// Selector could not be parsed.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// A page script error escaped through the page's own global handler.
    #[error("Host page interference: {0}")]
    HostInterference(String),

    /// Fixture is structurally wrong.
    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error raised by a page script (an event listener).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub message: String,
}

impl ScriptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_blocked_display() {
        let err = DomError::WriteBlocked {
            node: NodeId(3),
            channel: WriteChannel::NativeSetter,
        };
        let display = err.to_string();
        assert!(display.contains("native_setter"));
        assert!(display.contains('3'));
    }

    #[test]
    fn test_invalid_selector_display() {
        let err = DomError::InvalidSelector {
            selector: "[role=".to_string(),
            message: "unterminated attribute".to_string(),
        };
        assert!(err.to_string().contains("[role="));
    }

    #[test]
    fn test_script_error_display() {
        let err = ScriptError::new("Cannot read properties of null");
        assert_eq!(err.to_string(), "Cannot read properties of null");
    }
}
