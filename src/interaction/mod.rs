//! Event handling and user interactions for the mention relay.
//!
//! This module provides functionality for handling chat events:
//! - Processing incoming @-mentions of the bot
//! - Coordinating the acknowledgement, completion, and reply between services

pub mod app_mention;
