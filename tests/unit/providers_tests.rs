/*!
 * Tests for provider implementations
 */

use newsbridge::errors::ProviderError;
use newsbridge::providers::mock::{MockBehavior, MockProvider};
use newsbridge::providers::ollama::Ollama;
use newsbridge::providers::{ChatMessage, ChatRequest, Provider};

fn request(prompt: &str) -> ChatRequest {
    ChatRequest::new("mock-model", vec![ChatMessage::user(prompt)])
}

#[tokio::test]
async fn test_mockProvider_working_shouldEchoPromptAndCount() {
    let provider = MockProvider::working();

    let response = provider.chat(request("Hello")).await.unwrap();

    assert_eq!(response.text(), "[TRANSLATED] Hello");
    assert_eq!(response.model, "mock-model");
    assert_eq!(provider.request_count(), 1);
    assert_eq!(provider.prompts(), vec!["Hello".to_string()]);
}

#[tokio::test]
async fn test_mockProvider_script_shouldTakePrecedenceOverBehavior() {
    let provider = MockProvider::failing().with_script(vec![Ok("scripted".to_string())]);

    assert_eq!(provider.chat(request("a")).await.unwrap().text(), "scripted");
    assert!(matches!(
        provider.chat(request("b")).await,
        Err(ProviderError::ConnectionError(_))
    ));
}

#[tokio::test]
async fn test_mockProvider_clones_shouldShareCounters() {
    let provider = MockProvider::new(MockBehavior::Slow { delay_ms: 5 });
    let clone = provider.clone();

    clone.chat(request("x")).await.unwrap();

    assert_eq!(provider.request_count(), 1);
}

#[test]
fn test_ollama_new_withBareHost_shouldNormalizeBaseUrl() {
    let ollama = Ollama::new("localhost:11434/", 30).unwrap();
    assert_eq!(ollama.base_url(), "http://localhost:11434");

    assert!(Ollama::new("", 30).is_err());
}

#[tokio::test]
async fn test_ollama_testConnection_withNothingListening_shouldReturnConnectionError() {
    let ollama = Ollama::new("http://127.0.0.1:9", 2).unwrap();

    let result = ollama.test_connection().await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}
