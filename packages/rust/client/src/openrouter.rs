//! Reqwest-backed client for OpenAI-compatible chat-completion APIs.
//!
//! OpenRouter is the default endpoint but anything speaking the
//! `/chat/completions` shape works (the base URL comes from config).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use pageforge_shared::{AppConfig, ChatMessage, PageForgeError, Result, validate_api_key};

use crate::{ChatCompletion, ChatCompletionRequest, ChatProvider};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("PageForge/", env!("CARGO_PKG_VERSION"));

/// Request timeout. Generation responses are large; transport-level
/// timeouts live here, not in the continuation loop.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Chat-completion client for an OpenAI-compatible endpoint.
#[derive(Debug)]
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    api_key: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenRouterClient {
    /// Create a client for `base_url` (e.g. `https://openrouter.ai/api/v1`).
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        // Validate early; the endpoint string is assembled per request.
        Url::parse(base_url)
            .map_err(|e| PageForgeError::config(format!("invalid base URL {base_url}: {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PageForgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            temperature: None,
            max_tokens: None,
        })
    }

    /// Build a client from application config, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        validate_api_key(config)?;
        let api_key = std::env::var(&config.openrouter.api_key_env)
            .map_err(|_| PageForgeError::config("API key env var unreadable"))?;

        Ok(Self::new(&config.openrouter.base_url, api_key)?.with_sampling(
            Some(config.generation.temperature),
            config.generation.max_tokens,
        ))
    }

    /// Set the sampling knobs sent with every request.
    pub fn with_sampling(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    #[instrument(skip(self, messages), fields(context = %context, model = %model, turns = messages.len()))]
    async fn send(
        &self,
        messages: &[ChatMessage],
        model: &str,
        context: &str,
    ) -> Result<ChatCompletion> {
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = self.endpoint();
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PageForgeError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(PageForgeError::Network(format!(
                "{url}: HTTP {status}: {excerpt}"
            )));
        }

        let completion = response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| PageForgeError::Network(format!("{url}: invalid response body: {e}")))?;

        debug!(choices = completion.choices.len(), "chat completion received");
        Ok(completion)
    }
}
