//! # Autofill Engine
//!
//! Matches form questions against a profile and fills the answers in.
//!
//! ## Pipeline
//!
//! - [`build_dictionary`] expands a [`Profile`] into a flat
//!   variant-to-value [`FlatDictionary`]
//! - [`FormDetector`] finds question containers, labels and controls
//! - [`FieldMatcher`] scores each question label against the dictionary
//! - [`FieldFiller`] applies the value to the classified [`Control`]
//! - [`FormAutoFiller`] runs the pass and reports a [`FillResult`], then
//!   highlights what is left and hands file questions to an
//!   [`UploadModalHandler`]

pub mod auto_filler;
pub mod control;
pub mod detector;
pub mod dictionary;
pub mod error;
pub mod filler;
pub mod highlight;
pub mod mappings;
pub mod matcher;
pub mod normalize;
pub mod profile;
pub mod provider;
pub mod result;
pub mod upload;

pub use auto_filler::FormAutoFiller;
pub use control::{classify_field, Control, ControlKind, FieldCategory};
pub use detector::FormDetector;
pub use dictionary::{build_dictionary, FlatDictionary, ProfileContext};
pub use error::EngineError;
pub use filler::{FieldFiller, TextStrategy};
pub use highlight::Highlighter;
pub use mappings::{field_mappings, FieldMappings};
pub use matcher::{FieldMatcher, MatchResult};
pub use profile::{Profile, ProfileValue};
pub use provider::{JsonProfileProvider, ProfileProvider, StaticProfileProvider};
pub use result::{
    FillResult, HighlightResult, ObservationStatus, QuestionObservation, RemoveHighlightsResult,
};
pub use upload::{
    ButtonClickResult, ExpectedFileType, FileUploadFieldInfo, FileUploadPass, UploadModalHandler,
    UploadOutcome,
};
