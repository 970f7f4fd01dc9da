use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::providers::Provider;
use crate::providers::ollama::Ollama;
use crate::translation::{
    Article, ArticleTranslation, Document, InferenceClient, PipelineEvent, PipelineObserver, PipelineOutcome,
    PromptBuilder, TranslationPipeline,
};

// @module: Application controller for article translation

/// Advances a progress bar as chunks complete
struct ProgressObserver {
    bar: ProgressBar,
}

impl PipelineObserver for ProgressObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageStarted { stage, chunks } => {
                self.bar.set_length(*chunks as u64);
                self.bar.set_position(0);
                self.bar.set_message(format!("{}", stage));
            }
            PipelineEvent::ChunkCompleted { .. } => self.bar.inc(1),
            PipelineEvent::RequestFailed { attempt, max_attempts, .. } => {
                self.bar.set_message(format!("retry {}/{}", attempt, max_attempts));
            }
            _ => {}
        }
    }
}

/// Main application controller for article translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    provider: Arc<dyn Provider>,
    pipeline: TranslationPipeline,
}

impl Controller {
    // @method: Create a controller talking to the configured Ollama endpoint
    pub fn with_config(config: Config) -> Result<Self> {
        let ollama = Ollama::new(&config.translation.endpoint, config.translation.timeout_secs)
            .context("Failed to create Ollama client")?;
        Self::with_provider(config, Arc::new(ollama))
    }

    /// Create a controller over any provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Result<Self> {
        let translation = &config.translation;
        let client = InferenceClient::new(Arc::clone(&provider), translation.model.clone())
            .with_retry(translation.retry)
            .with_temperature(translation.temperature);
        let prompts = PromptBuilder::from_codes(&config.source_language, &config.target_language)
            .context("Failed to resolve language names")?;
        let pipeline = TranslationPipeline::new(
            client,
            prompts,
            translation.commentary_filter()?,
            translation.pipeline_settings(),
        );

        Ok(Self {
            config,
            provider,
            pipeline,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &TranslationPipeline {
        &self.pipeline
    }

    /// Verify the inference service is reachable
    pub async fn check_connection(&self) -> Result<()> {
        self.provider
            .test_connection()
            .await
            .with_context(|| format!("Cannot reach inference service at {}", self.config.translation.endpoint))?;
        info!(
            "Connected to {} (model {})",
            self.config.translation.endpoint, self.config.translation.model
        );
        Ok(())
    }

    /// Translate a plain-text file; returns the path written.
    ///
    /// With `raw` only the translate stage runs.
    pub async fn translate_file(
        &self,
        input_file: &Path,
        title: Option<&str>,
        output_file: Option<&Path>,
        raw: bool,
    ) -> Result<PathBuf> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let body = std::fs::read_to_string(input_file)
            .with_context(|| format!("Failed to read input file: {}", input_file.display()))?;
        let title = title.map(str::to_string).unwrap_or_else(|| file_stem(input_file));
        let document = Document::new(title, body);

        info!(
            "Translating {} ({} chars) with {}",
            input_file.display(),
            document.body_len(),
            self.config.translation.model
        );

        let progress_bar = Self::progress_bar();
        let pipeline = self
            .pipeline
            .clone()
            .with_observer(Arc::new(ProgressObserver { bar: progress_bar.clone() }));

        let text = if raw {
            let result = pipeline.translate_stage(&document.body, &document.title).await;
            progress_bar.finish_and_clear();
            result.context("Translation failed")?
        } else {
            let report = pipeline.translate_document(&document).await;
            progress_bar.finish_and_clear();
            info!("{} in {}", report.summary(), format_duration(report.duration));
            match report.outcome {
                PipelineOutcome::Formatted(text) => text,
                PipelineOutcome::RawTranslationOnly { text, reason } => {
                    warn!("Output is not formatted: {:?}", reason);
                    text
                }
                PipelineOutcome::Failed(e) => return Err(anyhow!(e).context("Translation failed")),
            }
        };

        let output_path = match output_file {
            Some(path) => path.to_path_buf(),
            None => output_path_for(input_file, &self.config.target_language, "txt"),
        };
        std::fs::write(&output_path, text)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

        info!("Success: {}", output_path.display());
        Ok(output_path)
    }

    /// Title-or-summary style translation of a short string
    pub async fn translate_short(&self, text: &str) -> Result<String> {
        self.pipeline
            .translate_short(text)
            .await
            .ok_or_else(|| anyhow!("Translation failed or is disabled"))
    }

    /// Translate an `Article` JSON file into an `ArticleTranslation` JSON file
    pub async fn translate_article_file(&self, input_file: &Path, output_file: Option<&Path>) -> Result<PathBuf> {
        let content = std::fs::read_to_string(input_file)
            .with_context(|| format!("Failed to read article file: {}", input_file.display()))?;
        let article: Article = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse article JSON: {}", input_file.display()))?;

        let progress_bar = Self::progress_bar();
        let pipeline = self
            .pipeline
            .clone()
            .with_observer(Arc::new(ProgressObserver { bar: progress_bar.clone() }));
        let translation = pipeline.translate_article(&article).await;
        progress_bar.finish_and_clear();

        report_missing_fields(&article, &translation);

        let output_path = match output_file {
            Some(path) => path.to_path_buf(),
            None => output_path_for(input_file, &self.config.target_language, "json"),
        };
        let json = serde_json::to_string_pretty(&translation).context("Failed to serialize translation")?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

        info!("Success: {}", output_path.display());
        Ok(output_path)
    }

    fn progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));
        progress_bar
    }
}

fn report_missing_fields(article: &Article, translation: &ArticleTranslation) {
    if translation.is_empty() {
        warn!("Nothing was translated for '{}'", article.title);
        return;
    }
    if translation.title.is_none() {
        warn!("Title could not be translated");
    }
    if article.summary.is_some() && translation.summary.is_none() {
        warn!("Summary could not be translated");
    }
    if translation.content.is_none() {
        warn!("Content could not be translated");
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `<dir>/<stem>.<lang>.<ext>` next to the input file
pub fn output_path_for(input_file: &Path, target_language: &str, extension: &str) -> PathBuf {
    let file_name = format!("{}.{}.{}", file_stem(input_file), target_language, extension);
    match input_file.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

// Format duration in a human-readable format
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
