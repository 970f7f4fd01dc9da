/*!
 * Tests for application configuration functionality
 */

use newsbridge::app_config::{Config, LogLevel};
use newsbridge::translation::client::Backoff;

use crate::common::{create_temp_dir, create_test_file};

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "vi");
    assert!(config.translation.enabled);
    assert_eq!(config.translation.endpoint, "http://localhost:11434");
    assert_eq!(config.translation.model, "qwen3.5:cloud");
    assert_eq!(config.translation.timeout_secs, 300);
    assert_eq!(config.translation.translate_max_chars, 3500);
    assert_eq!(config.translation.format_max_chars, 3500);
    assert_eq!(config.translation.min_length_for_format, 400);
    assert_eq!(config.translation.min_length_for_filter, 50);
    assert_eq!(config.translation.retry.max_retries, 2);
    assert_eq!(config.translation.retry.backoff, Backoff::None);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_configValidation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.target_language = "xx".to_string();
    assert!(config.validate().is_err());
    config.target_language = "vi".to_string();

    config.translation.model = "  ".to_string();
    assert!(config.validate().is_err());
    config.translation.model = "llama3".to_string();

    config.translation.translate_max_chars = 0;
    assert!(config.validate().is_err());
    config.translation.translate_max_chars = 3500;

    config.translation.temperature = Some(3.5);
    assert!(config.validate().is_err());
    config.translation.temperature = Some(0.3);

    config.translation.extra_commentary_patterns = vec!["(broken".to_string()];
    assert!(config.validate().is_err());
    config.translation.extra_commentary_patterns = vec![r"as\s+an\s+ai".to_string()];

    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.translation.model, "qwen3.5:cloud");
    let reloaded = Config::from_file(&path).unwrap();
    assert_eq!(reloaded.translation.endpoint, config.translation.endpoint);
}

#[test]
fn test_fromFile_withPartialConfig_shouldMergeDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "target_language": "fr",
            "translation": {
                "enabled": false,
                "retry": { "max_retries": 5, "backoff": { "type": "exponential", "base_ms": 200 } }
            },
            "log_level": "debug"
        }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.target_language, "fr");
    assert!(!config.translation.enabled);
    assert_eq!(config.translation.retry.max_retries, 5);
    assert_eq!(config.translation.retry.backoff, Backoff::Exponential { base_ms: 200 });
    assert_eq!(config.translation.model, "qwen3.5:cloud");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(!config.translation.pipeline_settings().enabled);
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    let error = Config::from_file(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_commentaryFilter_fromConfig_shouldIncludeExtras() {
    let mut config = Config::default();
    let base = config.translation.commentary_filter().unwrap().pattern_count();

    config.translation.extra_commentary_patterns = vec!["foo".to_string(), "bar".to_string()];

    assert_eq!(config.translation.commentary_filter().unwrap().pattern_count(), base + 2);
}
