//! Chat service integration for the mention relay.
//!
//! This module provides the Slack implementation of `GenericChatClient`:
//! - Receiving `app_mention` events over socket mode
//! - Posting messages back into the originating conversation

use crate::{
    base::{
        config::Config,
        types::{MentionEvent, Res, Void},
    },
    interaction,
    service::llm::LlmClient,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, llm: LlmClient) -> Res<Self> {
        let client = SlackChatClient::new(config, llm).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Conversions.

impl TryFrom<&SlackAppMentionEvent> for MentionEvent {
    type Error = anyhow::Error;

    fn try_from(event: &SlackAppMentionEvent) -> Res<Self> {
        let text = event.content.text.clone().ok_or(anyhow::anyhow!("App mention event has no `text` field"))?;

        Ok(Self {
            user_id: event.user.0.clone(),
            text,
            channel_id: event.channel.0.clone(),
            thread_ts: event.origin.thread_ts.as_ref().map(|ts| ts.0.clone()),
        })
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    llm: LlmClient,
    chat: ChatClient,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub client: Arc<FullClient>,
    pub llm: LlmClient,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, llm: LlmClient) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Verify the bot token.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;

        info!("Slack bot user ID: {}", bot_user.user_id.0);

        Ok(Self { app_token, bot_token, client, llm })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            llm: self.llm.clone(),
            chat: ChatClient::from(self.clone()),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register the app token to listen for events.
        socket_mode_listener.listen_for(&self.app_token).await?;

        info!("Starting the socket mode listener ...");

        // Serves until Ctrl-C.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Void {
        let request = build_post_message_request(channel_id, thread_ts, text);

        let session = self.client.open_session(&self.bot_token);

        // The handler labels send failures, so the Slack error is returned bare.
        let _ = session.chat_post_message(&request).await?;

        Ok(())
    }
}

/// Build a plain-text post; `@`-names in the text are not turned into notifications.
fn build_post_message_request(channel_id: &str, thread_ts: &str, text: &str) -> SlackApiChatPostMessageRequest {
    let message = SlackMessageContent::new().with_text(text.to_string());

    let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message);

    if thread_ts.is_empty() {
        request
    } else {
        request.with_thread_ts(SlackTs(thread_ts.to_string()))
    }
}

// Socket mode listener callbacks for Slack.

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    match event_callback.event {
        SlackEventCallbackBody::AppMention(slack_app_mention_event) => {
            info!("Received a mention event: {:?}", slack_app_mention_event);

            // A payload without text is not recovered from; the listener logs the error.
            let event = MentionEvent::try_from(&slack_app_mention_event)?;

            interaction::app_mention::handle_app_mention(event, user_state.llm.clone(), user_state.chat.clone());
        }
        _ => {
            warn!("Received unhandled push event.")
        }
    }

    Ok(())
}

// Tests.
