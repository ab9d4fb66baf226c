//! Library root for `mention-relay`.
//!
//! Mention-relay is a Slack bot that forwards @-mentions to an OpenAI chat
//! completion and posts the answer back into the conversation:
//! - Acknowledges every mention immediately
//! - Runs a single, zero-temperature completion for the message text
//! - Replies with the completion, or with an error notice if anything fails
//!
//! The chat platform and the LLM provider sit behind traits, so the handler can
//! be exercised without a live Slack connection.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the relay runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the LLM and chat clients
/// - Starts the socket mode event loop
pub async fn start(config: Config) -> Void {
    info!("Starting mention-relay ...");

    // Start the crypto provider.
    crypto::ring::default_provider().install_default().map_err(|_| anyhow::anyhow!("Failed to install the rustls crypto provider"))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
