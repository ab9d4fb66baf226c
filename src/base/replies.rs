//! Fixed reply texts sent back into the conversation.

/// Sent in place of a completion whenever the provider call fails.
pub const COMPLETION_FALLBACK_REPLY: &str = "An error occurred while processing your request.";

/// Prefix for errors caught by the handler outside of the completion client.
pub const HANDLER_ERROR_PREFIX: &str = "An error occurred: ";

/// Build the acknowledgement sent before the (slow) completion call.
pub fn acknowledgement(user_id: &str) -> String {
    format!("Hey <@{user_id}>! I'm processing your request...")
}

/// Build the user-facing text for an error caught by the handler.
pub fn handler_error(err: &impl std::fmt::Display) -> String {
    format!("{HANDLER_ERROR_PREFIX}{err}")
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledgement_mentions_user() {
        assert_eq!(acknowledgement("U123"), "Hey <@U123>! I'm processing your request...");
    }

    #[test]
    fn test_handler_error_is_prefixed() {
        let text = handler_error(&"boom");

        assert!(text.starts_with(HANDLER_ERROR_PREFIX));
        assert!(text.ends_with("boom"));
    }
}
