//! Configuration validation.

use crate::schema::Config;

/// Delays above this are legal but almost certainly a typo.
const SLOW_DELAY_MS: u64 = 10_000;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_matcher(config, &mut result);
        Self::validate_filler(config, &mut result);
        Self::validate_highlight(config, &mut result);
        Self::validate_upload(config, &mut result);

        result
    }

    fn validate_matcher(config: &Config, result: &mut ValidationResult) {
        let min_score = config.matcher.min_score;
        if !(min_score > 0.0 && min_score <= 1.0) {
            result.add_error(ValidationError::new(
                "matcher.min_score",
                "min_score must be within (0, 1]",
            ));
        }

        for (name, keywords) in &config.matcher.keyword_categories {
            if keywords.len() < 2 {
                result.add_warning(ValidationWarning::new(
                    format!("matcher.keyword_categories.{}", name),
                    "fewer than 2 keywords, this category can never trigger",
                ));
            }
        }
    }

    fn validate_filler(config: &Config, result: &mut ValidationResult) {
        if config.filler.truthy_tokens.is_empty() {
            result.add_warning(ValidationWarning::new(
                "filler.truthy_tokens",
                "no truthy tokens, text values will never check a checkbox",
            ));
        }
    }

    fn validate_highlight(config: &Config, result: &mut ValidationResult) {
        let class_name = config.highlight.class_name.trim();
        if class_name.is_empty() {
            result.add_error(ValidationError::new(
                "highlight.class_name",
                "class_name cannot be empty",
            ));
        } else if class_name.contains(char::is_whitespace) {
            result.add_error(ValidationError::new(
                "highlight.class_name",
                "class_name must be a single class token",
            ));
        }
    }

    fn validate_upload(config: &Config, result: &mut ValidationResult) {
        let upload = &config.upload;
        if upload.enabled && upload.ready_retries == 0 {
            result.add_error(ValidationError::new(
                "upload.ready_retries",
                "ready_retries must be greater than 0 when uploads are enabled",
            ));
        }

        let delays = [
            ("upload.initial_delay_ms", upload.initial_delay_ms),
            ("upload.field_delay_ms", upload.field_delay_ms),
            ("upload.ready_poll_delay_ms", upload.ready_poll_delay_ms),
        ];
        for (path, value) in delays {
            if value > SLOW_DELAY_MS {
                result.add_warning(ValidationWarning::new(
                    path,
                    format!("{}ms is very long, the fill pass will stall", value),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
