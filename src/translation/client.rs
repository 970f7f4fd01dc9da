/*!
 * Single-exchange inference client with a bounded retry policy.
 *
 * The client knows nothing about chunks or stages: it sends one prompt as one
 * user message, retries provider errors according to its `RetryPolicy`, and
 * reports the result as text or `None`.
 */

use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::providers::{ChatMessage, ChatRequest, Provider};
use crate::translation::events::{PipelineEvent, PipelineObserver};

/// Delay strategy between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Backoff {
    /// Retry immediately
    #[default]
    None,
    /// Same delay before every retry
    Fixed { delay_ms: u64 },
    /// `base_ms`, then doubled on each further retry
    Exponential { base_ms: u64 },
}

/// How many times a failed request is repeated, and how long to wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before each retry
    #[serde(default)]
    pub backoff: Backoff,
}

fn default_max_retries() -> u32 {
    2
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff: Backoff::None,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            backoff: Backoff::None,
        }
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before attempt number `attempt` (1-based); the first attempt never waits
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt <= 1 {
            return None;
        }
        let retry = attempt - 1;
        match self.backoff {
            Backoff::None => None,
            Backoff::Fixed { delay_ms } => Some(Duration::from_millis(delay_ms)),
            Backoff::Exponential { base_ms } => {
                let factor = 1u64.checked_shl(retry - 1).unwrap_or(u64::MAX);
                Some(Duration::from_millis(base_ms.saturating_mul(factor)))
            }
        }
    }
}

/// Result of one `invoke` call
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Trimmed response, `None` on failure or empty output
    pub text: Option<String>,
    /// Requests actually sent
    pub attempts: u32,
}

/// Sends prompts to the inference service
#[derive(Clone)]
pub struct InferenceClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: Option<f32>,
    retry: RetryPolicy,
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("retry", &self.retry)
            .finish()
    }
}

impl InferenceClient {
    /// Create a client with the default retry policy
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            retry: RetryPolicy::default(),
            observer: None,
        }
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Report failed attempts to an observer
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send `prompt` and return the trimmed reply, or `None`.
    pub async fn invoke(&self, prompt: &str) -> Option<String> {
        self.invoke_detailed(prompt).await.text
    }

    /// Like `invoke`, also reporting how many requests were sent.
    ///
    /// Provider errors are retried; an empty reply is a final answer.
    pub async fn invoke_detailed(&self, prompt: &str) -> Invocation {
        let max_attempts = self.retry.max_attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if let Some(delay) = self.retry.delay_before(attempt) {
                tokio::time::sleep(delay).await;
            }

            let mut request = ChatRequest::new(self.model.clone(), vec![ChatMessage::user(prompt)]);
            if let Some(temperature) = self.temperature {
                request = request.temperature(temperature);
            }

            match self.provider.chat(request).await {
                Ok(response) => {
                    let content = self.provider.extract_text(&response);
                    let text = content.trim();
                    return Invocation {
                        text: (!text.is_empty()).then(|| text.to_string()),
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    if attempt < max_attempts {
                        warn!("[Inference] Attempt {}/{} failed: {}. Retrying...", attempt, max_attempts, e);
                    }
                    if let Some(observer) = &self.observer {
                        observer.on_event(&PipelineEvent::RequestFailed {
                            attempt,
                            max_attempts,
                            error: e.to_string(),
                        });
                    }
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            error!("[Inference] Error after {} attempts: {}", max_attempts, e);
        }
        Invocation {
            text: None,
            attempts: max_attempts,
        }
    }
}
