//! Result objects returned to the caller.

use autofill_dom::NodeId;
use serde::Serialize;

use crate::control::FieldCategory;
use crate::upload::{ButtonClickResult, FileUploadReport};

/// What happened to one detected question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationStatus {
    /// A value was found and applied.
    Filled,
    /// A value was found but the control rejected it.
    Failed,
    /// No usable profile value for the question.
    Unmatched,
    /// The control kind is not handled.
    Unsupported,
    /// The container holds no control.
    NoInput,
}

/// One row of the per-question log.
///
/// `matched`, `filled`, `has_input_field` and `error` are kept in step with
/// `status` by [`QuestionObservation::with_status`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionObservation {
    #[serde(skip)]
    pub container: NodeId,
    pub question_label: String,
    pub status: ObservationStatus,
    pub matched: bool,
    pub key: Option<String>,
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    pub input_type: Option<String>,
    pub field_category: Option<FieldCategory>,
    pub has_input_field: bool,
    pub filled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuestionObservation {
    pub fn no_input(container: NodeId, question_label: impl Into<String>) -> Self {
        Self {
            container,
            question_label: question_label.into(),
            status: ObservationStatus::NoInput,
            matched: false,
            key: None,
            value: None,
            score: None,
            input_type: None,
            field_category: None,
            has_input_field: false,
            filled: false,
            error: None,
        }
    }

    /// Set the status and the flags derived from it.
    pub fn with_status(mut self, status: ObservationStatus) -> Self {
        self.status = status;
        self.matched = matches!(status, ObservationStatus::Filled | ObservationStatus::Failed);
        self.filled = status == ObservationStatus::Filled;
        self.has_input_field = status != ObservationStatus::NoInput;
        self.error = match status {
            ObservationStatus::Failed => Some(format!(
                "{} control rejected the value",
                self.input_type.as_deref().unwrap_or("unknown")
            )),
            ObservationStatus::Unsupported => Some(format!(
                "unsupported {} control",
                self.input_type.as_deref().unwrap_or("unknown")
            )),
            _ => None,
        };
        self
    }

    pub fn has_input(&self) -> bool {
        self.has_input_field
    }

    /// Supported control left without a value.
    pub fn is_unfilled(&self) -> bool {
        matches!(self.status, ObservationStatus::Unmatched | ObservationStatus::Failed)
    }
}

/// Outcome of a fill pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillResult {
    pub success: bool,
    pub message: String,
    pub fields_detected: usize,
    pub fields_filled: usize,
    pub supported_fields: usize,
    pub unsupported_fields: usize,
    pub fields_without_input: usize,
    pub supported_success_rate: u32,
    pub overall_success_rate: u32,
    pub detection_results: Vec<QuestionObservation>,
    pub file_upload_fields: usize,
    pub file_upload_processed: usize,
    pub file_upload_errors: Vec<String>,
    pub button_click_result: Option<ButtonClickResult>,
}

impl FillResult {
    /// Result of a pass refused for lack of profile data.
    pub fn no_profile() -> Self {
        Self {
            success: false,
            message: "No profile data: fill in the personal section first".to_string(),
            fields_detected: 0,
            fields_filled: 0,
            supported_fields: 0,
            unsupported_fields: 0,
            fields_without_input: 0,
            supported_success_rate: 0,
            overall_success_rate: 0,
            detection_results: Vec::new(),
            file_upload_fields: 0,
            file_upload_processed: 0,
            file_upload_errors: Vec::new(),
            button_click_result: None,
        }
    }

    /// Aggregate the per-question log and the auxiliary passes.
    pub fn from_observations(
        observations: Vec<QuestionObservation>,
        uploads: FileUploadReport,
        button: Option<ButtonClickResult>,
    ) -> Self {
        let count = |status: ObservationStatus| observations.iter().filter(|o| o.status == status).count();
        let fields_detected = observations.len();
        let fields_filled = count(ObservationStatus::Filled);
        let fields_without_input = count(ObservationStatus::NoInput);
        let unsupported_fields = count(ObservationStatus::Unsupported);
        let supported_fields = fields_detected - fields_without_input - unsupported_fields;
        let supported_success_rate = percent(fields_filled, supported_fields);
        let overall_success_rate = percent(fields_filled, fields_detected);

        let mut message = format!(
            "{fields_filled}/{fields_detected} fields filled ({overall_success_rate}%)"
        );
        if uploads.fields > 0 {
            message.push_str(&format!(
                ", {}/{} file uploads handled",
                uploads.processed, uploads.fields
            ));
        }

        Self {
            success: true,
            message,
            fields_detected,
            fields_filled,
            supported_fields,
            unsupported_fields,
            fields_without_input,
            supported_success_rate,
            overall_success_rate,
            detection_results: observations,
            file_upload_fields: uploads.fields,
            file_upload_processed: uploads.processed,
            file_upload_errors: uploads.errors,
            button_click_result: button,
        }
    }
}

/// Rounded percentage, 0 when nothing was counted.
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightResult {
    pub success: bool,
    pub highlighted_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveHighlightsResult {
    pub success: bool,
    pub removed_count: usize,
}
