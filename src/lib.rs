/*!
 * # newsbridge
 *
 * Translation and formatting of long news articles through a local or hosted
 * LLM (Ollama chat API).
 *
 * ## Features
 *
 * - Paragraph-aligned chunking of arbitrarily long text
 * - Two stages per article: translate, then restructure into readable paragraphs
 * - Bounded retries around an unreliable inference service
 * - Removal of model meta-commentary ("Could you clarify...?")
 * - Title and summary translation with independent failures
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * - `app_config`: Configuration management
 * - `translation`: the pipeline and its parts:
 *   - `translation::chunker`: chunk splitting
 *   - `translation::prompts`: prompt templates
 *   - `translation::client`: inference client and retry policy
 *   - `translation::commentary`: commentary filter
 *   - `translation::pipeline`: orchestrator
 * - `app_controller`: file and article workflows for the CLI
 * - `language_utils`: ISO language code utilities
 * - `providers`: `Provider` trait, Ollama client and a mock
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{ProviderError, Stage, TranslationError};
pub use language_utils::{get_language_name, normalize_to_part2t};
pub use translation::{
    Article, ArticleTranslation, Document, PipelineOutcome, PipelineReport, TranslationPipeline,
};
