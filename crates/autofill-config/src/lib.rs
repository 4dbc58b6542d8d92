//! # Autofill Config
//!
//! Configuration management for the form auto-filler: matcher thresholds,
//! filler vocabularies, highlight marker, upload pacing, profile location and
//! logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
