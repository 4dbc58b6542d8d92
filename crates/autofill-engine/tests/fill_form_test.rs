//! End-to-end fill passes over a registration page fixture.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use autofill_config::Config;
use autofill_dom::{Document, EventKind, NodeId};
use autofill_engine::{
    ExpectedFileType, FileUploadFieldInfo, FormAutoFiller, ObservationStatus, Profile,
    UploadModalHandler, UploadOutcome,
};

const PAGE: &str = include_str!("fixtures/registration_form.json");
const PROFILE: &str = include_str!("fixtures/profile.json");
const MARK: &str = "autofill-unfilled";

// ============================================================================
// Test Helpers
// ============================================================================

fn page() -> Document {
    Document::from_json(PAGE).unwrap()
}

fn profile() -> Profile {
    serde_json::from_str(PROFILE).unwrap()
}

fn filler() -> FormAutoFiller {
    FormAutoFiller::new(&Config::default(), &profile())
}

fn question(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).unwrap()
}

fn control(doc: &Document, id: &str, selector: &str) -> NodeId {
    doc.select(question(doc, id), selector).unwrap()[0]
}

/// Upload handler that records the fields it was given.
struct RecordingUploads {
    seen: Mutex<Vec<(String, ExpectedFileType)>>,
}

#[async_trait]
impl UploadModalHandler for RecordingUploads {
    async fn handle_upload_modal(
        &self,
        _doc: &mut Document,
        field: &FileUploadFieldInfo,
    ) -> UploadOutcome {
        self.seen
            .lock()
            .push((field.question_label.clone(), field.expected_file_type));
        UploadOutcome::success("file-selected")
    }
}

// ============================================================================
// Fill pass
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_fill_registration_form() {
    let mut doc = page();
    let result = filler().fill_form(&mut doc).await;

    assert!(result.success);
    assert_eq!(result.fields_detected, 10);
    assert_eq!(result.fields_without_input, 2);
    assert_eq!(result.supported_fields, 8);
    assert_eq!(result.unsupported_fields, 0);
    assert_eq!(result.fields_filled, 7);
    assert_eq!(result.supported_success_rate, 88);
    assert_eq!(result.overall_success_rate, 70);

    assert_eq!(doc.value(control(&doc, "q-last-name", "input")), "Dupont");
    assert_eq!(doc.value(control(&doc, "q-first-name", "input")), "Marie");
    assert_eq!(
        doc.value(control(&doc, "q-email", "input")),
        "marie.dupont@example.com"
    );
    assert_eq!(doc.value(control(&doc, "q-birth-date", "input")), "1990-04-12");
    assert_eq!(doc.value(control(&doc, "q-city", "select")), "lyon");

    let radios = doc.select(question(&doc, "q-sex"), "[role=radio]").unwrap();
    assert_eq!(doc.attribute(radios[0], "aria-checked"), Some("true"));
    assert_eq!(doc.attribute(radios[1], "aria-checked"), Some("false"));

    let exams: Vec<bool> = doc
        .select(question(&doc, "q-exams"), "[role=checkbox]")
        .unwrap()
        .into_iter()
        .map(|b| doc.attribute(b, "aria-checked") == Some("true"))
        .collect();
    assert_eq!(exams, vec![true, false, false, true]);
}

#[tokio::test(start_paused = true)]
async fn test_observation_log() {
    let mut doc = page();
    let result = filler().fill_form(&mut doc).await;

    let row = |q: &str| {
        result
            .detection_results
            .iter()
            .find(|o| o.question_label == q)
            .unwrap_or_else(|| panic!("no observation for {q}"))
    };
    assert_eq!(row("nom de famille").status, ObservationStatus::Filled);
    assert_eq!(row("nom de famille").score, Some(1.0));
    assert_eq!(row("sujet d'examen").value.as_deref(), Some("CE, EO"));
    assert_eq!(row("numéro de passeport").status, ObservationStatus::Unmatched);
    assert_eq!(row("informations complémentaires").status, ObservationStatus::NoInput);
    assert_eq!(row("sexe").input_type.as_deref(), Some("radio"));
    assert!(result.detection_results.iter().all(|o| !o.question_label.is_empty()));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["fieldsFilled"], 7);
    assert_eq!(json["detectionResults"][0]["status"], "filled");
    assert_eq!(json["detectionResults"][0]["questionLabel"], "nom de famille");
    assert_eq!(json["detectionResults"][0]["matched"], true);
    assert_eq!(json["detectionResults"][0]["key"], "nom de famille");
    assert_eq!(json["detectionResults"][0]["hasInputField"], true);
    assert_eq!(json["detectionResults"][0]["filled"], true);

    let passport = row("numéro de passeport");
    assert!(!passport.matched && passport.has_input_field && !passport.filled);
    let comments = row("informations complémentaires");
    assert!(!comments.has_input_field);
}

#[tokio::test(start_paused = true)]
async fn test_statistics_consistency() {
    let mut doc = page();
    let result = filler().fill_form(&mut doc).await;

    let with_input = result.detection_results.iter().filter(|o| o.has_input()).count();
    assert!(result.fields_filled <= result.supported_fields);
    assert!(result.supported_fields <= result.fields_detected);
    assert_eq!(result.fields_without_input + with_input, result.fields_detected);
    assert_eq!(
        result.supported_fields + result.unsupported_fields + result.fields_without_input,
        result.fields_detected
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_pass_keeps_fields_filled() {
    let mut doc = page();
    let auto_filler = filler();

    let first = auto_filler.fill_form(&mut doc).await;
    let listeners = doc.listener_count();
    let observers = doc.observer_count();
    let second = auto_filler.fill_form(&mut doc).await;

    assert!(second.fields_filled >= first.fields_filled);
    assert_eq!(doc.value(control(&doc, "q-last-name", "input")), "Dupont");
    assert_eq!(doc.listener_count(), listeners);
    assert_eq!(doc.observer_count(), observers);
}

#[tokio::test(start_paused = true)]
async fn test_empty_profile_leaves_page_untouched() {
    let mut doc = page();
    let before = doc.to_spec();
    let auto_filler = FormAutoFiller::new(&Config::default(), &Profile::default());

    let result = auto_filler.fill_form(&mut doc).await;

    assert!(!result.success);
    assert_eq!(result.fields_detected, 0);
    assert_eq!(result.fields_filled, 0);
    assert!(result.detection_results.is_empty());
    assert!(result.button_click_result.is_none());
    assert_eq!(doc.to_spec(), before);
    assert!(doc.event_log().is_empty());
}

// ============================================================================
// Highlighting
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_unfilled_field_highlight_lifecycle() {
    let mut doc = page();
    filler().fill_form(&mut doc).await;

    let passport = question(&doc, "q-passport");
    assert!(doc.has_class(passport, MARK));
    assert!(!doc.has_class(question(&doc, "q-last-name"), MARK));
    assert!(!doc.has_class(question(&doc, "q-comments"), MARK));

    let input = control(&doc, "q-passport", "input");
    doc.assign_value(input, "AB123456").unwrap();
    doc.dispatch_event(input, EventKind::Input).unwrap();

    assert!(!doc.has_class(passport, MARK));
    assert_eq!(doc.listener_count(), 0);
    assert_eq!(doc.observer_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_profile_update_fills_highlighted_field() {
    let mut doc = page();
    let auto_filler = filler();
    auto_filler.fill_form(&mut doc).await;
    assert!(doc.has_class(question(&doc, "q-passport"), MARK));

    let mut updated = profile();
    updated.set("documents", "passportNumber", "AB123456");
    auto_filler.update_user_profile(&updated);
    assert_eq!(
        auto_filler.get_user_profile().text("documents", "passportNumber"),
        Some("AB123456")
    );

    let result = auto_filler.fill_form(&mut doc).await;
    assert_eq!(result.fields_filled, 8);
    assert_eq!(doc.value(control(&doc, "q-passport", "input")), "AB123456");
    assert!(!doc.has_class(question(&doc, "q-passport"), MARK));
}

#[tokio::test(start_paused = true)]
async fn test_highlight_commands() {
    let mut doc = page();
    let auto_filler = filler();

    let highlighted = auto_filler.highlight_unfilled_fields(&mut doc);
    assert!(highlighted.success);
    assert_eq!(highlighted.highlighted_count, 8);
    assert!(!doc.has_class(question(&doc, "q-untitled"), MARK));

    auto_filler.fill_form(&mut doc).await;
    assert_eq!(auto_filler.highlight_unfilled_fields(&mut doc).highlighted_count, 1);

    let removed = auto_filler.remove_highlights(&mut doc);
    assert!(removed.success);
    assert_eq!(removed.removed_count, 1);
    assert_eq!(doc.listener_count(), 0);
    assert_eq!(doc.observer_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_highlight_disabled() {
    let mut config = Config::default();
    config.highlight.enabled = false;
    let auto_filler = FormAutoFiller::new(&config, &profile());
    let mut doc = page();
    auto_filler.fill_form(&mut doc).await;
    assert!(!doc.has_class(question(&doc, "q-passport"), MARK));
}

// ============================================================================
// File uploads
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_upload_without_handler() {
    let mut doc = page();
    let result = filler().fill_form(&mut doc).await;

    assert_eq!(result.file_upload_fields, 1);
    assert_eq!(result.file_upload_processed, 0);
    assert_eq!(result.file_upload_errors.len(), 1);

    let button = result.button_click_result.unwrap();
    assert!(button.success);
    let add_file = control(&doc, "q-photo", "[role=button]");
    assert_eq!(
        doc.events_for(add_file),
        vec![EventKind::MouseDown, EventKind::MouseUp, EventKind::Click]
    );
}

#[tokio::test(start_paused = true)]
async fn test_upload_with_handler() {
    let handler = Arc::new(RecordingUploads {
        seen: Mutex::new(Vec::new()),
    });
    let auto_filler =
        FormAutoFiller::with_upload_handler(&Config::default(), &profile(), Some(handler.clone()));
    let mut doc = page();

    let result = auto_filler.fill_form(&mut doc).await;

    assert_eq!(result.file_upload_processed, 1);
    assert!(result.file_upload_errors.is_empty());
    assert_eq!(
        *handler.seen.lock(),
        vec![("photo d'identité".to_string(), ExpectedFileType::Photo)]
    );
}

// ============================================================================
// Matching surface
// ============================================================================

#[test]
fn test_find_match() {
    let auto_filler = filler();

    let exact = auto_filler.find_match("Nom de famille *").unwrap();
    assert_eq!(exact.key, "nom de famille");
    assert_eq!(exact.score, 1.0);

    let fuzzy = auto_filler.find_match("Votre adresse e-mail personnelle").unwrap();
    assert_eq!(fuzzy.value.to_string(), "marie.dupont@example.com");

    assert!(auto_filler.find_match("xyz totally unrelated").is_none());
    // phone is blank in the profile
    assert!(auto_filler.find_match("Téléphone").is_none());
}

#[test]
fn test_field_mappings_surface() {
    let mappings = filler().get_field_mappings();
    let json = serde_json::to_value(&mappings).unwrap();
    assert_eq!(json["categories"][0]["category"], "personal");
}
