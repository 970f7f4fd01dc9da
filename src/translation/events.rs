/*!
 * Structured progress events emitted by the pipeline.
 *
 * Observers receive every event synchronously on the task running the
 * pipeline. The CLI uses this to drive its progress bar; tests use it to
 * assert on ordering.
 */

use crate::errors::Stage;

/// Something that happened while translating a document
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A stage is about to send its first chunk
    StageStarted { stage: Stage, chunks: usize },

    /// A chunk request is about to be sent
    ChunkStarted { stage: Stage, index: usize, total: usize, chars: usize },

    /// A chunk came back and was filtered
    ChunkCompleted { stage: Stage, index: usize, total: usize, chars: usize },

    /// One attempt of an inference request failed
    RequestFailed { attempt: u32, max_attempts: u32, error: String },

    /// A chunk produced no text; its stage is aborted
    ChunkFailed { stage: Stage, index: usize, total: usize },

    /// All chunks of a stage succeeded and were joined
    StageCompleted { stage: Stage, chars: usize },

    /// The translation is too short to be worth formatting
    FormatSkipped { length: usize, threshold: usize },

    /// Formatting failed and the raw translation is returned instead
    FormatFallback,
}

/// Receives pipeline events
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

impl<F> PipelineObserver for F
where
    F: Fn(&PipelineEvent) + Send + Sync,
{
    fn on_event(&self, event: &PipelineEvent) {
        self(event)
    }
}
