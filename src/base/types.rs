//! Common types, result aliases, and per-request errors.

use async_openai::error::OpenAIError;
use thiserror::Error;

/// Process-level error type.
pub type Err = anyhow::Error;
/// Process-level result type.
pub type Res<T> = Result<T, Err>;
/// Process-level result without a value.
pub type Void = Res<()>;

/// A single mention of the bot, as consumed by the mention handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionEvent {
    /// The user who mentioned the bot.
    pub user_id: String,
    /// The raw message text, including the bot mention itself.
    pub text: String,
    /// The channel the mention was posted in.
    pub channel_id: String,
    /// The thread the mention was posted in, if any.
    pub thread_ts: Option<String>,
}

/// The text produced by a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The provider returned a content field.
    Text(String),
    /// The provider returned no content field; this is the whole response message rendered as text.
    Raw(String),
}

impl Completion {
    /// Consume the completion, yielding its text regardless of kind.
    pub fn into_text(self) -> String {
        match self {
            Completion::Text(text) | Completion::Raw(text) => text,
        }
    }
}

/// Failures at the completion client boundary.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The provider (or the HTTP client talking to it) failed.
    #[error("completion provider error: {0}")]
    Provider(#[from] OpenAIError),
    /// The provider answered without any choices.
    #[error("completion response contained no choices")]
    EmptyResponse,
    /// A response without content could not be rendered as text.
    #[error("failed to render completion response: {0}")]
    Render(#[from] serde_json::Error),
}

/// Failures at the mention handler boundary.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Posting into the conversation failed.
    #[error("failed to send message: {0:#}")]
    Chat(Err),
    /// The completion task died before returning (e.g. it panicked).
    #[error("completion task failed: {0}")]
    Completion(#[from] tokio::task::JoinError),
}

/// What the mention handler delivered after the acknowledgement.
#[derive(Debug)]
pub enum Sent {
    /// The completion text (or the completion fallback) was posted.
    Reply,
    /// The reply failed and an error notice was posted instead.
    ErrorNotice(HandlerError),
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_into_text() {
        assert_eq!(Completion::Text("hello".to_string()).into_text(), "hello");
        assert_eq!(Completion::Raw("{\"role\":\"assistant\"}".to_string()).into_text(), "{\"role\":\"assistant\"}");
    }

    #[test]
    fn test_handler_error_display_includes_cause() {
        let err = HandlerError::Chat(anyhow::anyhow!("channel_not_found"));

        assert_eq!(err.to_string(), "failed to send message: channel_not_found");
    }

    #[test]
    fn test_handler_error_labels_send_failures_once() {
        let err = HandlerError::Chat(anyhow::anyhow!("msg_too_long"));

        assert_eq!(err.to_string().to_lowercase().matches("failed to send message").count(), 1);
    }
}
