/*!
 * Provider implementations for the inference service.
 *
 * This module contains the client side of the single outbound operation the
 * pipeline needs, `chat(model, messages) -> content`:
 * - Ollama: local or remote Ollama server
 * - Mock: scripted provider used by the test suite
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

pub use self::ollama::{ChatMessage, ChatRequest, ChatResponse};

/// Common trait for all LLM providers
///
/// A provider performs exactly one request/response exchange per call. Retry
/// policy belongs to the caller (`translation::client::InferenceClient`), so
/// implementations must not retry on their own.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Send a chat request and return the complete (non-streamed) response
    ///
    /// # Arguments
    /// * `request` - The chat request to complete
    ///
    /// # Returns
    /// * `Result<ChatResponse, ProviderError>` - The response from the provider or an error
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract the generated text from a response
    fn extract_text(&self, response: &ChatResponse) -> String {
        response.text().to_string()
    }
}

pub mod mock;
pub mod ollama;
