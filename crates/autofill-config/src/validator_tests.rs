use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_min_score_out_of_range() {
    let mut config = Config::default();
    config.matcher.min_score = 1.5;
    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "matcher.min_score"));

    config.matcher.min_score = 0.0;
    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
}

#[test]
fn test_validate_single_keyword_category_warns() {
    let mut config = Config::default();
    config
        .matcher
        .keyword_categories
        .insert("solo".to_string(), vec!["seul".to_string()]);
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "matcher.keyword_categories.solo"));
}

#[test]
fn test_validate_empty_class_name() {
    let mut config = Config::default();
    config.highlight.class_name = "  ".to_string();
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "highlight.class_name"));
}

#[test]
fn test_validate_class_name_with_space() {
    let mut config = Config::default();
    config.highlight.class_name = "two classes".to_string();
    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
}

#[test]
fn test_validate_zero_retries() {
    let mut config = Config::default();
    config.upload.ready_retries = 0;
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "upload.ready_retries"));

    config.upload.enabled = false;
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
}

#[test]
fn test_validate_slow_delay_warning() {
    let mut config = Config::default();
    config.upload.field_delay_ms = 60_000;
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "upload.field_delay_ms"));
}
