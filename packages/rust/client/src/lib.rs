//! Chat-completion API client for PageForge.
//!
//! This crate provides:
//! - [`ChatProvider`] — the seam the continuation loop talks through
//! - [`OpenRouterClient`] — reqwest-backed client for OpenAI-compatible APIs
//! - [`extract_text`] — model-opaque decoding of a raw completion

pub mod openrouter;

pub use openrouter::OpenRouterClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pageforge_shared::{ChatMessage, PageForgeError, Result};

// ---------------------------------------------------------------------------
// Wire types (OpenAI-compatible chat completions)
// ---------------------------------------------------------------------------

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Raw chat completion response. Fields are public so tests and fakes can
/// build responses directly.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

impl ChatCompletion {
    /// Build a completion carrying a single assistant message.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ChatMessage::assistant(text),
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// A text-generation collaborator that accepts multi-turn conversations.
///
/// `context` is a correlation identifier (the website id) used only for
/// logging; it never affects the request.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn send(
        &self,
        messages: &[ChatMessage],
        model: &str,
        context: &str,
    ) -> Result<ChatCompletion>;
}

// ---------------------------------------------------------------------------
// Response extraction
// ---------------------------------------------------------------------------

/// Extract the plain text of a completion's first choice.
///
/// Model-specific decoding is opaque to callers; today every supported
/// model reports its text in the first choice's message content.
pub fn extract_text(completion: &ChatCompletion, model: &str) -> Result<String> {
    completion
        .choices
        .first()
        .map(|choice| choice.message.content.clone())
        .ok_or_else(|| PageForgeError::parse(format!("no choices in {model} response")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_returns_first_choice() {
        let completion = ChatCompletion::from_text("## Home\n<p>hi</p>");
        let text = extract_text(&completion, "openai/gpt-4o").unwrap();
        assert_eq!(text, "## Home\n<p>hi</p>");
    }

    #[test]
    fn extract_text_without_choices_is_parse_error() {
        let completion = ChatCompletion { choices: vec![] };
        let err = extract_text(&completion, "openai/gpt-4o").unwrap_err();
        assert!(err.to_string().contains("no choices"));
        assert!(err.to_string().contains("openai/gpt-4o"));
    }

    #[test]
    fn request_omits_unset_sampling_fields() {
        let request = ChatCompletionRequest {
            model: "test-model".into(),
            messages: vec![ChatMessage::user("hello")],
            temperature: None,
            max_tokens: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
        assert!(!json.contains("max_tokens"));
        assert!(json.contains(r#""role":"user""#));
    }

    #[test]
    fn completion_deserializes_from_wire_shape() {
        let json = r#"{
            "id": "gen-123",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "done"}}
            ]
        }"#;
        let completion: ChatCompletion = serde_json::from_str(json).unwrap();
        assert_eq!(completion.choices.len(), 1);
        assert_eq!(completion.choices[0].message.content, "done");
    }
}
