use super::*;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.matcher.min_score, 0.7);
    assert!(config.highlight.enabled);
    assert_eq!(config.highlight.class_name, "autofill-unfilled");
    assert!(config.upload.enabled);
    assert_eq!(config.upload.ready_retries, 3);
    assert!(config.profile.path.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_default_keyword_categories() {
    let config = MatcherConfig::default();
    let names: Vec<&str> = config.keyword_categories.keys().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["engagement", "fileupload", "motifs", "signature"]);
    assert!(config.keyword_categories["signature"].contains(&"signature".to_string()));
}

#[test]
fn test_default_filler_vocabulary() {
    let config = FillerConfig::default();
    assert!(config.truthy_tokens.contains(&"oui".to_string()));
    assert!(config.truthy_tokens.contains(&"cochée".to_string()));
    assert!(config.placeholder_options.contains(&"select".to_string()));
}

#[test]
fn test_config_roundtrip_toml() {
    let config = Config::default();
    let serialized = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&serialized).unwrap();
    assert_eq!(parsed.upload.field_delay_ms, config.upload.field_delay_ms);
    assert_eq!(
        parsed.matcher.keyword_categories,
        config.matcher.keyword_categories
    );
}

#[test]
fn test_partial_section_keeps_defaults() {
    let config: Config = toml::from_str("[logging]\njson = true\n").unwrap();
    assert!(config.logging.json);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.directory.is_none());
}
