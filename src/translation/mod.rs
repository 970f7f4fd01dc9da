/*!
 * Document translation through an LLM inference service.
 *
 * - `chunker`: paragraph-aligned splitting under a character budget
 * - `prompts`: instruction templates for each request shape
 * - `client`: one chat exchange with a bounded retry policy
 * - `commentary`: removal of off-task model output
 * - `pipeline`: the translate-then-format orchestrator
 * - `document`: input and output data types
 * - `events`: progress events for observers
 */

pub use self::chunker::{Chunk, split_into_chunks};
pub use self::client::{Backoff, InferenceClient, RetryPolicy};
pub use self::commentary::CommentaryFilter;
pub use self::document::{Article, ArticleTranslation, Document};
pub use self::events::{PipelineEvent, PipelineObserver};
pub use self::pipeline::{
    FormatSkipReason, PipelineOutcome, PipelineReport, PipelineSettings, TranslationPipeline,
};
pub use self::prompts::PromptBuilder;

pub mod chunker;
pub mod client;
pub mod commentary;
pub mod document;
pub mod events;
pub mod pipeline;
pub mod prompts;
