//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matcher: MatcherConfig,

    #[serde(default)]
    pub filler: FillerConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Field matcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum score a fuzzy match needs to be accepted.
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Keyword categories used to recognise long narrative questions.
    /// The category name itself also counts as a cue inside dictionary keys.
    #[serde(default = "default_keyword_categories")]
    pub keyword_categories: BTreeMap<String, Vec<String>>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            keyword_categories: default_keyword_categories(),
        }
    }
}

fn default_min_score() -> f64 {
    0.7
}

fn default_keyword_categories() -> BTreeMap<String, Vec<String>> {
    let categories: [(&str, &[&str]); 4] = [
        (
            "motifs",
            &["motif", "raison", "pourquoi", "objectif", "projet", "immigration"],
        ),
        (
            "signature",
            &["signature", "signer", "signez", "nom complet", "lu et approuvé"],
        ),
        (
            "engagement",
            &["engage", "certifie", "atteste", "déclare", "accepte", "conditions"],
        ),
        (
            "fileupload",
            &["fichier", "télécharger", "joindre", "photo", "scan", "pièce jointe"],
        ),
    ];
    categories
        .into_iter()
        .map(|(name, words)| {
            (
                name.to_string(),
                words.iter().map(|w| w.to_string()).collect(),
            )
        })
        .collect()
}

/// Field filler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillerConfig {
    /// Scalar values that check a single checkbox.
    #[serde(default = "default_truthy_tokens")]
    pub truthy_tokens: Vec<String>,

    /// Normalized option texts that are never selectable.
    #[serde(default = "default_placeholder_options")]
    pub placeholder_options: Vec<String>,
}

impl Default for FillerConfig {
    fn default() -> Self {
        Self {
            truthy_tokens: default_truthy_tokens(),
            placeholder_options: default_placeholder_options(),
        }
    }
}

fn default_truthy_tokens() -> Vec<String> {
    ["true", "oui", "yes", "1", "checked", "coché", "cochée"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_placeholder_options() -> Vec<String> {
    ["select", "choisir", "selectionner", "choose"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Unfilled-field highlighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Class added to the container of every field left unfilled.
    #[serde(default = "default_class_name")]
    pub class_name: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            class_name: default_class_name(),
        }
    }
}

fn default_class_name() -> String {
    "autofill-unfilled".to_string()
}

/// File-upload pass pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Settle delay before the first upload field is processed.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Delay between two upload fields.
    #[serde(default = "default_field_delay_ms")]
    pub field_delay_ms: u64,

    /// How many times the upload handler is polled for readiness.
    #[serde(default = "default_ready_retries")]
    pub ready_retries: u32,

    #[serde(default = "default_ready_poll_delay_ms")]
    pub ready_poll_delay_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: default_initial_delay_ms(),
            field_delay_ms: default_field_delay_ms(),
            ready_retries: default_ready_retries(),
            ready_poll_delay_ms: default_ready_poll_delay_ms(),
        }
    }
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_field_delay_ms() -> u64 {
    800
}

fn default_ready_retries() -> u32 {
    3
}

fn default_ready_poll_delay_ms() -> u64 {
    200
}

/// Profile source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Path of the JSON profile, `~` is expanded.
    #[serde(default)]
    pub path: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files; console only when unset.
    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
