/*!
 * Two-stage document pipeline: translate, then format.
 *
 * Each stage splits its input into chunks, sends them one at a time in order,
 * filters every reply and joins the results. A failed chunk aborts its stage.
 * A failed translate stage fails the document; a failed format stage falls
 * back to the unformatted translation.
 */

use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::{Stage, TranslationError};
use crate::translation::chunker::{Chunk, PARAGRAPH_SEPARATOR, split_into_chunks};
use crate::translation::client::InferenceClient;
use crate::translation::commentary::CommentaryFilter;
use crate::translation::document::{Article, ArticleTranslation, Document};
use crate::translation::events::{PipelineEvent, PipelineObserver};
use crate::translation::prompts::PromptBuilder;

/// Knobs the orchestrator reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// When false every operation returns its failure sentinel
    pub enabled: bool,

    /// Chunk budget of the translate stage, in characters
    pub translate_max_chars: usize,

    /// Chunk budget of the format stage, in characters
    pub format_max_chars: usize,

    /// Translations shorter than this are not formatted
    pub min_length_for_format: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            translate_max_chars: 3500,
            format_max_chars: 3500,
            min_length_for_format: 400,
        }
    }
}

/// Why a successful translation was returned without formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSkipReason {
    /// Below the formatting threshold
    TooShort { length: usize, threshold: usize },
    /// The format stage failed
    FormatFailed,
}

/// Terminal state of one document
#[derive(Debug)]
pub enum PipelineOutcome {
    Formatted(String),
    RawTranslationOnly { text: String, reason: FormatSkipReason },
    Failed(TranslationError),
}

/// Outcome of `translate_document` plus what it cost
#[derive(Debug)]
pub struct PipelineReport {
    pub outcome: PipelineOutcome,
    /// Chunks the translate stage produced
    pub translate_chunks: usize,
    /// Chunks the format stage produced, 0 when it did not run
    pub format_chunks: usize,
    /// Inference requests sent, retries included
    pub requests: u32,
    pub duration: Duration,
}

impl PipelineReport {
    fn failed(error: TranslationError, started: Instant) -> Self {
        Self {
            outcome: PipelineOutcome::Failed(error),
            translate_chunks: 0,
            format_chunks: 0,
            requests: 0,
            duration: started.elapsed(),
        }
    }

    /// Final text, if any
    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            PipelineOutcome::Formatted(text) | PipelineOutcome::RawTranslationOnly { text, .. } => Some(text),
            PipelineOutcome::Failed(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self.outcome {
            PipelineOutcome::Formatted(text) | PipelineOutcome::RawTranslationOnly { text, .. } => Some(text),
            PipelineOutcome::Failed(_) => None,
        }
    }

    /// One-line description for logs and the CLI
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        parts.push(match &self.outcome {
            PipelineOutcome::Formatted(text) => format!("Formatted ({} chars)", text.chars().count()),
            PipelineOutcome::RawTranslationOnly {
                text,
                reason: FormatSkipReason::TooShort { .. },
            } => format!("Translated, too short to format ({} chars)", text.chars().count()),
            PipelineOutcome::RawTranslationOnly {
                text,
                reason: FormatSkipReason::FormatFailed,
            } => format!("Translated, formatting failed ({} chars)", text.chars().count()),
            PipelineOutcome::Failed(e) => format!("Failed: {}", e),
        });
        parts.push(format!("translate: {} chunk(s)", self.translate_chunks));
        if self.format_chunks > 0 {
            parts.push(format!("format: {} chunk(s)", self.format_chunks));
        }
        parts.push(format!("{} request(s)", self.requests));
        parts.push(format!("{:.2}s", self.duration.as_secs_f32()));

        parts.join(" | ")
    }
}

struct StageRun {
    result: Result<String, TranslationError>,
    chunks: usize,
    requests: u32,
}

/// Drives the inference client over whole documents
#[derive(Clone)]
pub struct TranslationPipeline {
    client: InferenceClient,
    prompts: PromptBuilder,
    filter: CommentaryFilter,
    settings: PipelineSettings,
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl fmt::Debug for TranslationPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationPipeline")
            .field("client", &self.client)
            .field("prompts", &self.prompts)
            .field("settings", &self.settings)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl TranslationPipeline {
    pub fn new(
        client: InferenceClient,
        prompts: PromptBuilder,
        filter: CommentaryFilter,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            client,
            prompts,
            filter,
            settings,
            observer: None,
        }
    }

    /// Send every event, including failed request attempts, to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.client = self.client.with_observer(Arc::clone(&observer));
        self.observer = Some(observer);
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }

    /// Translate and format `body`; `None` when the translate stage fails.
    pub async fn translate(&self, body: &str, title: &str) -> Option<String> {
        self.translate_document(&Document::new(title, body)).await.into_text()
    }

    /// One direct request for a title or summary. The reply is not filtered.
    pub async fn translate_short(&self, text: &str) -> Option<String> {
        if !self.settings.enabled || text.trim().is_empty() {
            return None;
        }
        self.client.invoke(&self.prompts.short_text(text)).await
    }

    /// Title and summary, each translated on its own
    pub async fn translate_title_and_summary(
        &self,
        title: &str,
        summary: Option<&str>,
    ) -> (Option<String>, Option<String>) {
        if !self.settings.enabled {
            return (None, None);
        }

        let title = self.translate_short(title).await;
        let summary = match summary {
            Some(summary) => self.translate_short(summary).await,
            None => None,
        };
        (title, summary)
    }

    /// Title, summary and body; a failure in one field leaves the others intact
    pub async fn translate_article(&self, article: &Article) -> ArticleTranslation {
        if !self.settings.enabled {
            return ArticleTranslation::default();
        }

        let (title, summary) = self
            .translate_title_and_summary(&article.title, article.summary.as_deref())
            .await;
        let content = self.translate_document(&article.as_document()).await.into_text();

        ArticleTranslation { title, summary, content }
    }

    /// Run both stages over a document.
    pub async fn translate_document(&self, document: &Document) -> PipelineReport {
        let started = Instant::now();

        if !self.settings.enabled {
            debug!("[Pipeline] Translation disabled, skipping '{}'", document.title);
            return PipelineReport::failed(TranslationError::Disabled, started);
        }
        if document.body.trim().is_empty() {
            return PipelineReport::failed(TranslationError::EmptyInput, started);
        }

        info!(
            "[Pipeline] Translating '{}' ({} chars) with model {}",
            document.title,
            document.body_len(),
            self.client.model()
        );

        let translate = self.run_translate(&document.body, &document.title).await;
        let mut format_chunks = 0;
        let mut requests = translate.requests;

        let outcome = match translate.result {
            Err(e) => PipelineOutcome::Failed(e),
            Ok(translated) => {
                let length = translated.trim().chars().count();
                let threshold = self.settings.min_length_for_format;

                if length < threshold {
                    debug!("[Pipeline] Translation of {} chars is below {}, not formatting", length, threshold);
                    self.emit(PipelineEvent::FormatSkipped { length, threshold });
                    PipelineOutcome::RawTranslationOnly {
                        text: translated,
                        reason: FormatSkipReason::TooShort { length, threshold },
                    }
                } else {
                    let format = self.run_format(&translated).await;
                    format_chunks = format.chunks;
                    requests += format.requests;

                    match format.result {
                        Ok(formatted) => PipelineOutcome::Formatted(formatted),
                        Err(e) => {
                            warn!("[Pipeline] {}, returning the unformatted translation", e);
                            self.emit(PipelineEvent::FormatFallback);
                            PipelineOutcome::RawTranslationOnly {
                                text: translated,
                                reason: FormatSkipReason::FormatFailed,
                            }
                        }
                    }
                }
            }
        };

        let report = PipelineReport {
            outcome,
            translate_chunks: translate.chunks,
            format_chunks,
            requests,
            duration: started.elapsed(),
        };
        info!("[Pipeline] '{}': {}", document.title, report.summary());
        report
    }

    /// The translate stage alone
    pub async fn translate_stage(&self, body: &str, title: &str) -> Result<String, TranslationError> {
        if !self.settings.enabled {
            return Err(TranslationError::Disabled);
        }
        self.run_translate(body, title).await.result
    }

    /// The format stage alone, over text already in the target language
    pub async fn format_stage(&self, text: &str) -> Result<String, TranslationError> {
        if !self.settings.enabled {
            return Err(TranslationError::Disabled);
        }
        self.run_format(text).await.result
    }

    async fn run_translate(&self, body: &str, title: &str) -> StageRun {
        let chunks = split_into_chunks(body, self.settings.translate_max_chars);
        self.run_stage(Stage::Translate, chunks, |chunk| {
            self.prompts.translation_chunk(title, chunk)
        })
        .await
    }

    async fn run_format(&self, text: &str) -> StageRun {
        let chunks = split_into_chunks(text, self.settings.format_max_chars);
        self.run_stage(Stage::Format, chunks, |chunk| self.prompts.format_chunk(chunk))
            .await
    }

    /// Sequential fold over `chunks`, stopping at the first failure.
    async fn run_stage<F>(&self, stage: Stage, chunks: Vec<Chunk>, prompt_for: F) -> StageRun
    where
        F: Fn(&Chunk) -> String,
    {
        let total = chunks.len();
        let mut requests = 0;

        if chunks.is_empty() {
            return StageRun {
                result: Err(TranslationError::EmptyInput),
                chunks: 0,
                requests,
            };
        }

        info!("[Pipeline] {} stage: {} chunk(s) with model {}", stage, total, self.client.model());
        self.emit(PipelineEvent::StageStarted { stage, chunks: total });

        let mut parts = Vec::with_capacity(total);
        for chunk in &chunks {
            debug!("[Pipeline] {} chunk {}/{} ({} chars)", stage, chunk.index, total, chunk.char_len());
            self.emit(PipelineEvent::ChunkStarted {
                stage,
                index: chunk.index,
                total,
                chars: chunk.char_len(),
            });

            let invocation = self.client.invoke_detailed(&prompt_for(chunk)).await;
            requests += invocation.attempts;

            let Some(reply) = invocation.text else {
                warn!("[Pipeline] {} chunk {}/{} produced no text, aborting stage", stage, chunk.index, total);
                self.emit(PipelineEvent::ChunkFailed {
                    stage,
                    index: chunk.index,
                    total,
                });
                return StageRun {
                    result: Err(TranslationError::ChunkFailed {
                        stage,
                        index: chunk.index,
                        total,
                    }),
                    chunks: total,
                    requests,
                };
            };

            let filtered = self.filter.strip(&reply);
            self.emit(PipelineEvent::ChunkCompleted {
                stage,
                index: chunk.index,
                total,
                chars: filtered.chars().count(),
            });
            parts.push(filtered);
        }

        let joined = parts.join(PARAGRAPH_SEPARATOR);
        self.emit(PipelineEvent::StageCompleted {
            stage,
            chars: joined.chars().count(),
        });

        StageRun {
            result: Ok(joined),
            chunks: total,
            requests,
        }
    }
}
