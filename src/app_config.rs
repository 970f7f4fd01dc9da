use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::translation::client::RetryPolicy;
use crate::translation::commentary::CommentaryFilter;
use crate::translation::pipeline::PipelineSettings;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Inference service and pipeline settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Master switch; when off every translation short-circuits
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the Ollama server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier passed with every chat request
    #[serde(default = "default_model")]
    pub model: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature; the server default is used when absent
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Character budget per chunk for the translate stage
    #[serde(default = "default_max_chars_per_chunk")]
    pub translate_max_chars: usize,

    /// Character budget per chunk for the format stage
    #[serde(default = "default_max_chars_per_chunk")]
    pub format_max_chars: usize,

    /// Translations shorter than this skip the format stage
    #[serde(default = "default_min_length_for_format")]
    pub min_length_for_format: usize,

    /// Responses shorter than this bypass the commentary filter
    #[serde(default = "default_min_length_for_filter")]
    pub min_length_for_filter: usize,

    /// Retry behaviour around each inference request
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Additional commentary patterns appended to the built-in list
    #[serde(default)]
    pub extra_commentary_patterns: Vec<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
            translate_max_chars: default_max_chars_per_chunk(),
            format_max_chars: default_max_chars_per_chunk(),
            min_length_for_format: default_min_length_for_format(),
            min_length_for_filter: default_min_length_for_filter(),
            retry: RetryPolicy::default(),
            extra_commentary_patterns: Vec::new(),
        }
    }
}

impl TranslationConfig {
    /// Pipeline thresholds derived from this configuration
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            enabled: self.enabled,
            translate_max_chars: self.translate_max_chars,
            format_max_chars: self.format_max_chars,
            min_length_for_format: self.min_length_for_format,
        }
    }

    /// Build the commentary filter with the configured extras
    pub fn commentary_filter(&self) -> Result<CommentaryFilter> {
        CommentaryFilter::with_extra_patterns(&self.extra_commentary_patterns)
            .map(|filter| filter.min_length(self.min_length_for_filter))
            .map_err(|e| anyhow!("{}", e))
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "vi".to_string()
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "qwen3.5:cloud".to_string()
}

fn default_timeout_secs() -> u64 {
    // Long chunks on small local models routinely take minutes
    300
}

fn default_max_chars_per_chunk() -> usize {
    3500
}

fn default_min_length_for_format() -> usize {
    400
}

fn default_min_length_for_filter() -> usize {
    50
}

/// Parse ENABLE_TRANSLATION: `1`, `true` and `yes` enable, anything else disables
pub fn parse_flag(value: &str) -> Result<bool, String> {
    Ok(matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Load the file if it exists, otherwise write and return the defaults
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::get_language_name(&self.source_language)?;
        crate::language_utils::get_language_name(&self.target_language)?;

        let translation = &self.translation;
        if translation.endpoint.trim().is_empty() {
            return Err(anyhow!("Inference endpoint cannot be empty"));
        }
        if translation.model.trim().is_empty() {
            return Err(anyhow!("Model name cannot be empty"));
        }
        if translation.translate_max_chars == 0 || translation.format_max_chars == 0 {
            return Err(anyhow!("Chunk character budgets must be greater than zero"));
        }
        if let Some(temperature) = translation.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(anyhow!("Temperature must be between 0.0 and 2.0, got {}", temperature));
            }
        }

        translation
            .commentary_filter()
            .context("Invalid extra_commentary_patterns")?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
