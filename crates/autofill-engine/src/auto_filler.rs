//! Fill pass orchestration.
//!
//! [`FormAutoFiller`] owns the profile context and every collaborator of a
//! fill pass. Questions are processed one at a time in document order; a
//! failing field only degrades its own observation.

use std::sync::Arc;

use autofill_config::Config;
use autofill_dom::{Document, NodeId};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::control::{classify_field, describe_input};
use crate::detector::FormDetector;
use crate::dictionary::ProfileContext;
use crate::error::EngineError;
use crate::filler::FieldFiller;
use crate::highlight::Highlighter;
use crate::mappings::{field_mappings, FieldMappings};
use crate::matcher::{FieldMatcher, MatchResult};
use crate::normalize::normalize_label;
use crate::profile::Profile;
use crate::provider::ProfileProvider;
use crate::result::{
    FillResult, HighlightResult, ObservationStatus, QuestionObservation, RemoveHighlightsResult,
};
use crate::upload::{click_add_file_button, FileUploadPass, UploadModalHandler};

/// Fills detected questions from the current profile.
pub struct FormAutoFiller {
    context: RwLock<Arc<ProfileContext>>,
    matcher: FieldMatcher,
    filler: FieldFiller,
    detector: FormDetector,
    highlighter: Highlighter,
    uploads: FileUploadPass,
}

impl FormAutoFiller {
    pub fn new(config: &Config, profile: &Profile) -> Self {
        Self::with_upload_handler(config, profile, None)
    }

    pub fn with_upload_handler(
        config: &Config,
        profile: &Profile,
        handler: Option<Arc<dyn UploadModalHandler>>,
    ) -> Self {
        let filler = FieldFiller::new(&config.filler);
        Self {
            context: RwLock::new(Arc::new(ProfileContext::new(profile))),
            matcher: FieldMatcher::new(&config.matcher),
            highlighter: Highlighter::new(&config.highlight, filler.clone()),
            filler,
            detector: FormDetector::new(),
            uploads: FileUploadPass::new(config.upload.clone(), handler),
        }
    }

    /// Build from a provider; fails when the provider has no profile.
    pub fn from_provider(config: &Config, provider: &dyn ProfileProvider) -> Result<Self, EngineError> {
        let profile = provider.get_profile().ok_or(EngineError::NoProfileData)?;
        Ok(Self::new(config, &profile))
    }

    /// Current context snapshot.
    pub fn context(&self) -> Arc<ProfileContext> {
        Arc::clone(&self.context.read())
    }

    /// Rebuild the dictionary for `profile` and swap it in.
    pub fn update_user_profile(&self, profile: &Profile) {
        let rebuilt = Arc::new(ProfileContext::new(profile));
        info!(entries = rebuilt.dictionary().len(), "Profile updated");
        *self.context.write() = rebuilt;
    }

    /// Current profile, including derived fields.
    pub fn get_user_profile(&self) -> Profile {
        self.context().profile().clone()
    }

    pub fn get_field_mappings(&self) -> FieldMappings {
        field_mappings()
    }

    /// Best usable dictionary entry for a raw question text.
    ///
    /// The exact key is tried before fuzzy matching. Entries holding a blank
    /// value never count as a match on either path.
    pub fn find_match(&self, question: &str) -> Option<MatchResult> {
        let context = self.context();
        self.lookup(&context, &normalize_label(question))
    }

    fn lookup(&self, context: &ProfileContext, question: &str) -> Option<MatchResult> {
        let dictionary = context.dictionary();
        self.matcher
            .exact_lookup(question, dictionary)
            .filter(|m| !m.value.is_blank())
            .or_else(|| {
                self.matcher
                    .find_best_match(question, dictionary)
                    .filter(|m| !m.value.is_blank())
            })
    }

    /// Run a full fill pass over `doc`.
    pub async fn fill_form(&self, doc: &mut Document) -> FillResult {
        let context = self.context();
        if !context.has_data() {
            info!("Fill skipped, no profile data");
            return FillResult::no_profile();
        }

        let mut observations = Vec::new();
        for container in self.detector.find_question_containers(doc) {
            let question = self.detector.extract_question_label(doc, container);
            if question.is_empty() {
                continue;
            }
            observations.push(self.process_question(doc, &context, container, question));
        }

        if self.highlighter.is_enabled() {
            let highlighted = observations
                .iter()
                .filter(|o| o.is_unfilled())
                .filter(|o| self.highlighter.highlight(doc, o.container))
                .count();
            debug!(highlighted, "Unfilled fields highlighted");
        }

        let upload_fields = self.detector.detect_file_upload_fields(doc);
        let uploads = self.uploads.run(doc, &upload_fields).await;
        let button = click_add_file_button(doc);

        let result = FillResult::from_observations(observations, uploads, Some(button));
        info!(
            detected = result.fields_detected,
            filled = result.fields_filled,
            supported = result.supported_fields,
            without_input = result.fields_without_input,
            "Fill pass finished"
        );
        result
    }

    fn process_question(
        &self,
        doc: &mut Document,
        context: &ProfileContext,
        container: NodeId,
        question: String,
    ) -> QuestionObservation {
        let Some(node) = self.detector.find_input_field(doc, container) else {
            debug!(question = %question, "no input");
            return QuestionObservation::no_input(container, question);
        };

        let (category, control) = classify_field(doc, container, node);
        let mut observation = QuestionObservation {
            input_type: Some(describe_input(doc, node)),
            field_category: Some(category),
            ..QuestionObservation::no_input(container, question)
        };
        let Some(control) = control.filter(|_| category.is_supported()) else {
            debug!(question = %observation.question_label, "unsupported field");
            return observation.with_status(ObservationStatus::Unsupported);
        };

        let Some(found) = self.lookup(context, &observation.question_label) else {
            debug!(question = %observation.question_label, %category, "no match");
            return observation.with_status(ObservationStatus::Unmatched);
        };

        let filled = self
            .filler
            .set_field_value(doc, &control, &found.value, context.profile());
        debug!(
            question = %observation.question_label,
            key = %found.key,
            score = found.score,
            filled,
            "field processed"
        );
        observation.value = Some(found.value.to_string());
        observation.key = Some(found.key);
        observation.score = Some(found.score);
        observation.with_status(if filled {
            ObservationStatus::Filled
        } else {
            ObservationStatus::Failed
        })
    }

    /// Mark every supported question that has no answer yet.
    pub fn highlight_unfilled_fields(&self, doc: &mut Document) -> HighlightResult {
        let mut highlighted_count = 0;
        for container in self.detector.find_question_containers(doc) {
            if self.detector.extract_question_label(doc, container).is_empty() {
                continue;
            }
            let Some(node) = self.detector.find_input_field(doc, container) else {
                continue;
            };
            let (category, _) = classify_field(doc, container, node);
            if !category.is_supported() || self.highlighter.container_has_answer(doc, container) {
                continue;
            }
            if self.highlighter.highlight(doc, container) {
                highlighted_count += 1;
            }
        }
        info!(highlighted_count, "Highlight pass finished");
        HighlightResult {
            success: true,
            highlighted_count,
        }
    }

    pub fn remove_highlights(&self, doc: &mut Document) -> RemoveHighlightsResult {
        let removed_count = self.highlighter.remove_all(doc);
        RemoveHighlightsResult {
            success: true,
            removed_count,
        }
    }
}
