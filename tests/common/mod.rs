/*!
 * Common test utilities for the newsbridge test suite
 */

use anyhow::Result;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use newsbridge::providers::mock::MockProvider;
use newsbridge::translation::{
    CommentaryFilter, InferenceClient, PipelineEvent, PipelineObserver, PipelineSettings, PromptBuilder,
    TranslationPipeline,
};

/// Route library logs through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A paragraph of exactly `len` characters made of words
pub fn paragraph(word: &str, len: usize) -> String {
    let mut text = String::new();
    while text.chars().count() < len {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(word);
    }
    let mut text: String = text.chars().take(len).collect();
    if text.ends_with(' ') {
        text.pop();
        text.push('x');
    }
    text
}

/// A short English news article of several paragraphs
pub fn sample_article_body() -> String {
    [
        "The central bank raised its benchmark interest rate by a quarter of a percentage point on Wednesday, \
its third increase this year.",
        "Officials said inflation remained too high and signalled that further increases were possible if price \
pressures did not ease over the coming months.",
        "Stock markets fell sharply after the announcement, while the currency strengthened against the dollar.",
    ]
    .join("\n\n")
}

/// Pipeline over a mock provider with the default retry policy
pub fn mock_pipeline(provider: &MockProvider, settings: PipelineSettings) -> TranslationPipeline {
    TranslationPipeline::new(
        InferenceClient::new(Arc::new(provider.clone()), "mock-model"),
        PromptBuilder::new("English", "Vietnamese"),
        CommentaryFilter::default(),
        settings,
    )
}

/// Observer that keeps every event it receives
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().push(event.clone());
    }
}
