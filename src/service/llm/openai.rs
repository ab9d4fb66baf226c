//! Integration with the OpenAI chat completion API.
//!
//! This module provides a thin wrapper around `async-openai` that issues a single
//! chat completion for a user query and resolves the response into a [`Completion`].

use std::sync::Arc;

use crate::base::{
    config::Config,
    types::{Completion, CompletionError},
};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::{GenericLlmClient, LlmClient};

/// Sampling temperature for every completion; favors the most likely output.
pub const COMPLETION_TEMPERATURE: f32 = 0.0;

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let mut cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        if let Some(base_url) = &config.openai_base_url {
            info!("Using OpenAI API base: {}", base_url);
            cfg = cfg.with_api_base(base_url.clone());
        }

        Self {
            client: Client::with_config(cfg),
            model: config.openai_model.clone(),
        }
    }

    /// Build the completion request for a query.
    fn build_request(&self, query: &str) -> Result<CreateChatCompletionRequest, CompletionError> {
        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default().content(query).build()?.into();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message])
            .temperature(COMPLETION_TEMPERATURE)
            .build()?;

        Ok(request)
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::complete", skip_all)]
    async fn complete(&self, query: &str) -> Result<Completion, CompletionError> {
        let request = self.build_request(query)?;

        debug!("Sending completion request to model `{}` ...", self.model);

        let response = self.client.chat().create(request).await?;

        parse_openai_response(&response)
    }
}

/// Resolve the OpenAI response into a [`Completion`].
///
/// The first choice's content is used when present; otherwise the whole message is
/// rendered as JSON.
#[instrument(skip_all)]
pub fn parse_openai_response(response: &CreateChatCompletionResponse) -> Result<Completion, CompletionError> {
    info!("LLM response has {} choices.", response.choices.len());

    let choice = response.choices.first().ok_or(CompletionError::EmptyResponse)?;

    match &choice.message.content {
        Some(content) => Ok(Completion::Text(content.clone())),
        None => Ok(Completion::Raw(serde_json::to_string(&choice.message)?)),
    }
}

// Tests.
