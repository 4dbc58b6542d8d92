//! In-memory DOM model for autofill.
//!
//! The filler never touches a real browser directly: every page it works on
//! is a [`Document`], an arena of elements and text nodes with just enough
//! browser behaviour to reproduce what matters when injecting values into
//! framework-controlled forms.
//!
//! ## What is modelled
//!
//! - Attributes, classes and visibility (`hidden`, inline `display:none`)
//! - Live control state (`value`, `checked`, `selected`) and the four
//!   independent value write channels a page may intercept
//! - Focus, bubbling events and page listeners that can throw
//! - Mutation observers delivered at the end of each top-level operation
//! - The page's global error policy, and [`HostErrorScope`] to shield a
//!   block of work from it
//! - A CSS selector subset for container and control discovery
//! - JSON fixtures to load and dump pages

mod document;
mod error;
mod events;
mod fixture;
mod host;
mod node;
mod observer;
mod selector;

pub use document::Document;
pub use error::{DomError, ScriptError};
pub use events::{Event, EventKind, EventRecord, ListenerFn, ListenerId};
pub use fixture::{ElementSpec, NodeSpec};
pub use host::{HostErrorPolicy, HostErrorScope};
pub use node::{ElementData, NodeId, WriteChannel};
pub use observer::{MutationKind, MutationRecord, ObserveOptions, ObserverFn, ObserverId};
pub use selector::Selector;
