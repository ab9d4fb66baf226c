//! Core components, types, and utilities for the mention relay.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The fixed reply texts the bot sends back to users.
//! - Common types, result aliases, and the per-request error types.

pub mod config;
pub mod replies;
pub mod types;
