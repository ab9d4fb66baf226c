//! Handles mentions of the bot: acknowledge, complete, reply.

use tracing::{Instrument, error, info, instrument};

use crate::{
    base::{
        replies,
        types::{HandlerError, MentionEvent, Sent},
    },
    service::{chat::ChatClient, llm::LlmClient},
};

/// Handles an app mention event.
///
/// Spawns a new task so the transport callback returns immediately; each
/// mention is handled independently and at most once.
#[instrument(skip_all)]
pub fn handle_app_mention(event: MentionEvent, llm: LlmClient, chat: ChatClient) {
    tokio::spawn(
        async move {
            // Process the event.
            let result = process_app_mention(event, llm, chat).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling: {}", err);
            }
        }
        .in_current_span(),
    );
}

/// Handles an app mention event to completion.
///
/// The acknowledgement is sent first; a failure to send it is returned as-is.
/// Any failure after that point is reported into the conversation and returned
/// as [`Sent::ErrorNotice`].
#[instrument(skip_all, fields(user = %event.user_id, channel = %event.channel_id))]
pub async fn process_app_mention(event: MentionEvent, llm: LlmClient, chat: ChatClient) -> Result<Sent, HandlerError> {
    let thread_ts = event.thread_ts.clone().unwrap_or_default();

    // Let the user know we are alive before the slow completion call.

    chat.send_message(&event.channel_id, &thread_ts, &replies::acknowledgement(&event.user_id))
        .await
        .map_err(HandlerError::Chat)?;

    match reply(&event, &thread_ts, llm, &chat).await {
        Ok(()) => Ok(Sent::Reply),
        Err(err) => {
            error!("An error occurred while processing the query: {:?}", err);

            chat.send_message(&event.channel_id, &thread_ts, &replies::handler_error(&err))
                .await
                .map_err(HandlerError::Chat)?;

            Ok(Sent::ErrorNotice(err))
        }
    }
}

/// Run the completion and post its text.
async fn reply(event: &MentionEvent, thread_ts: &str, llm: LlmClient, chat: &ChatClient) -> Result<(), HandlerError> {
    // The completion runs in its own task so a panic surfaces as an error here.
    let query = event.text.clone();
    let response = tokio::spawn(async move { llm.answer(&query).await }.in_current_span()).await?;

    info!("Completion reply: {}", response);

    chat.send_message(&event.channel_id, thread_ts, &response).await.map_err(HandlerError::Chat)?;

    Ok(())
}
