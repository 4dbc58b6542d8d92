//! File-upload questions.
//!
//! Files cannot be typed into a page: each upload question is handed to an
//! external [`UploadModalHandler`] that drives the page's picker dialog.
//! The pass is paced with fixed delays so the dialog animations settle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use autofill_config::UploadConfig;
use autofill_dom::{Document, EventKind, NodeId, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::filler::fire;
use crate::normalize::fold_accents;

/// Attribute selectors of add-file buttons, in search order.
pub const ADD_FILE_SELECTORS: &[&str] = &[
    r#"[aria-label*="Ajouter un fichier"]"#,
    r#"[aria-label*="Add file"]"#,
    r#"[data-tooltip*="Ajouter un fichier"]"#,
    r#"[data-tooltip*="Add file"]"#,
    r#"[aria-label*="Importer"]"#,
];

const PHOTO_KEYWORDS: &[&str] = &["photo", "image", "portrait", "selfie", "jpg", "jpeg", "png"];
const PDF_KEYWORDS: &[&str] = &["pdf"];
const DOCUMENT_KEYWORDS: &[&str] = &[
    "document",
    "piece",
    "justificatif",
    "passeport",
    "passport",
    "scan",
    "attestation",
    "diplome",
    "certificat",
    "copie",
];

/// Content a file question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedFileType {
    Photo,
    Pdf,
    Document,
    Any,
}

impl ExpectedFileType {
    /// Classify from the question text; photo wins over pdf, pdf over
    /// document.
    pub fn from_label(label: &str) -> Self {
        let folded = fold_accents(label);
        let has = |words: &[&str]| words.iter().any(|w| folded.contains(w));
        if has(PHOTO_KEYWORDS) {
            ExpectedFileType::Photo
        } else if has(PDF_KEYWORDS) {
            ExpectedFileType::Pdf
        } else if has(DOCUMENT_KEYWORDS) {
            ExpectedFileType::Document
        } else {
            ExpectedFileType::Any
        }
    }
}

/// One upload question found on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadFieldInfo {
    #[serde(skip)]
    pub container: NodeId,
    pub question_label: String,
    pub expected_file_type: ExpectedFileType,
}

/// What the upload handler reports for one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Step of the dialog flow the handler reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

impl UploadOutcome {
    pub fn success(step: impl Into<String>) -> Self {
        Self {
            success: true,
            error: None,
            step: Some(step.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            step: None,
        }
    }

    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }
}

/// Drives a page's upload dialog for one question.
#[async_trait]
pub trait UploadModalHandler: Send + Sync {
    /// Whether the handler can take work yet.
    async fn is_ready(&self) -> bool {
        true
    }

    async fn handle_upload_modal(
        &self,
        doc: &mut Document,
        field: &FileUploadFieldInfo,
    ) -> UploadOutcome;
}

/// Counters of one upload pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileUploadReport {
    pub fields: usize,
    pub processed: usize,
    pub errors: Vec<String>,
}

/// Paced upload pass over the detected fields.
pub struct FileUploadPass {
    config: UploadConfig,
    handler: Option<Arc<dyn UploadModalHandler>>,
}

impl FileUploadPass {
    pub fn new(config: UploadConfig, handler: Option<Arc<dyn UploadModalHandler>>) -> Self {
        Self { config, handler }
    }

    pub async fn run(&self, doc: &mut Document, fields: &[FileUploadFieldInfo]) -> FileUploadReport {
        let mut report = FileUploadReport {
            fields: fields.len(),
            ..Default::default()
        };
        if fields.is_empty() || !self.config.enabled {
            return report;
        }
        let Some(handler) = &self.handler else {
            warn!(fields = fields.len(), "no upload handler, skipping file fields");
            report.errors.push(format!(
                "No upload handler available; {} file field(s) left for manual upload",
                fields.len()
            ));
            return report;
        };

        tokio::time::sleep(Duration::from_millis(self.config.initial_delay_ms)).await;
        if !self.wait_until_ready(handler.as_ref()).await {
            warn!(retries = self.config.ready_retries, "upload handler never became ready");
            report.errors.push(format!(
                "Upload handler not ready after {} attempt(s)",
                self.config.ready_retries
            ));
            return report;
        }

        for (index, field) in fields.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.field_delay_ms)).await;
            }
            let outcome = handler.handle_upload_modal(doc, field).await;
            debug!(
                label = %field.question_label,
                file_type = ?field.expected_file_type,
                success = outcome.success,
                step = ?outcome.step,
                "upload field handled"
            );
            if outcome.success {
                report.processed += 1;
            } else {
                let reason = outcome.error.as_deref().unwrap_or("unknown error");
                let entry = match &outcome.step {
                    Some(step) => format!("{}: {} (step: {})", field.question_label, reason, step),
                    None => format!("{}: {}", field.question_label, reason),
                };
                report.errors.push(entry);
            }
        }

        info!(
            fields = report.fields,
            processed = report.processed,
            errors = report.errors.len(),
            "file upload pass finished"
        );
        report
    }

    async fn wait_until_ready(&self, handler: &dyn UploadModalHandler) -> bool {
        for attempt in 0..self.config.ready_retries {
            if handler.is_ready().await {
                return true;
            }
            debug!(attempt, "upload handler not ready yet");
            tokio::time::sleep(Duration::from_millis(self.config.ready_poll_delay_ms)).await;
        }
        false
    }
}

/// Outcome of the add-file button nudge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonClickResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    pub message: String,
}

/// Click the first visible add-file button on the page.
pub fn click_add_file_button(doc: &mut Document) -> ButtonClickResult {
    for source in ADD_FILE_SELECTORS {
        let selector = match Selector::parse(source) {
            Ok(selector) => selector,
            Err(e) => {
                debug!(selector = source, error = %e, "skipping add-file selector");
                continue;
            }
        };
        let Some(button) = doc
            .query_selector_all(doc.root(), &selector)
            .into_iter()
            .find(|n| doc.is_visible(*n))
        else {
            continue;
        };

        let clean = fire(
            doc,
            button,
            &[EventKind::MouseDown, EventKind::MouseUp, EventKind::Click],
        );
        debug!(selector = source, %button, clean, "add-file button clicked");
        return ButtonClickResult {
            success: clean,
            selector: Some(source.to_string()),
            message: if clean {
                "Add-file button clicked".to_string()
            } else {
                "Add-file button click raised a page error".to_string()
            },
        };
    }
    ButtonClickResult {
        success: false,
        selector: None,
        message: "No visible add-file button".to_string(),
    }
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
