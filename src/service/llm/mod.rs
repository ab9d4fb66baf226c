pub mod openai;

use crate::base::{
    replies::COMPLETION_FALLBACK_REPLY,
    types::{Completion, CompletionError},
};
use async_trait::async_trait;
use std::{ops::Deref, sync::Arc};
use tracing::{error, info, instrument};

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the single completion call the relay makes. Implementing this
/// trait allows different LLM providers to be used with the relay.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Issue one completion request for the given query.
    ///
    /// Failures are returned as-is; see [`LlmClient::answer`] for the never-failing variant.
    async fn complete(&self, query: &str) -> Result<Completion, CompletionError>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }

    /// Answer a query with the completion text.
    ///
    /// Any provider failure is logged and replaced with [`COMPLETION_FALLBACK_REPLY`],
    /// so callers only ever receive text.
    #[instrument(skip_all)]
    pub async fn answer(&self, query: &str) -> String {
        info!("Running completion with query: {}", query);

        match self.complete(query).await {
            Ok(completion) => {
                info!("Completion response: {:?}", completion);
                completion.into_text()
            }
            Err(err) => {
                error!("Error while querying the completion provider: {:?}", err);
                COMPLETION_FALLBACK_REPLY.to_string()
            }
        }
    }
}

// Tests.
