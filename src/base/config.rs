//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::Path, sync::Arc};

use anyhow::Context;
use config::{ConfigBuilder, builder::DefaultState};
use serde::Deserialize;
use tracing::{debug, info};

use super::types::{Res, Void};

/// Default OpenAI model to use for completions.
fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

/// Configuration for the mention relay.
#[derive(Debug, Clone)]
pub struct Config {
    /// The shared configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// The configuration values, deserialized from the environment or a TOML file.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Slack bot token (`SLACK_BOT_TOKEN`), used for outbound API calls.
    pub slack_bot_token: String,
    /// Slack app-level token (`SLACK_APP_TOKEN`), used for the socket mode connection.
    pub slack_app_token: String,
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// OpenAI model to use (`OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Alternate OpenAI-compatible API base (`OPENAI_BASE_URL`).
    #[serde(default)]
    pub openai_base_url: Option<String>,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            slack_bot_token: String::new(),
            slack_app_token: String::new(),
            openai_api_key: String::new(),
            openai_model: default_openai_model(),
            openai_base_url: None,
        }
    }
}

impl ConfigInner {
    /// Ensure every required secret is present and non-empty.
    fn validate(&self) -> Void {
        let required = [
            ("SLACK_BOT_TOKEN", &self.slack_bot_token),
            ("SLACK_APP_TOKEN", &self.slack_app_token),
            ("OPENAI_API_KEY", &self.openai_api_key),
        ];

        let missing = required.iter().filter(|(_, value)| value.trim().is_empty()).map(|(name, _)| *name).collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(anyhow::anyhow!("Missing required configuration: {}.", missing.join(", ")));
        }

        Ok(())
    }
}

impl Config {
    /// Load the configuration from `.env`, the environment, and an optional TOML file.
    ///
    /// By default, the file is looked up at `.hidden/config.toml`; values in the file
    /// take precedence over the environment.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Environment variables loaded from `{}`.", path.display()),
            Err(err) => debug!("No `.env` file loaded: {}", err),
        }

        let mut cfg = config::Config::builder().add_source(config::Environment::default());

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        Self::from_builder(cfg)
    }

    /// Build and validate the configuration from a prepared builder.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Res<Self> {
        let inner: ConfigInner = builder
            .build()?
            .try_deserialize()
            .context("SLACK_BOT_TOKEN, SLACK_APP_TOKEN, and OPENAI_API_KEY must be set")?;

        inner.validate()?;

        Ok(Config { inner: Arc::new(inner) })
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_with(values: &[(&str, &str)]) -> ConfigBuilder<DefaultState> {
        values.iter().fold(config::Config::builder(), |builder, (key, value)| builder.set_override(*key, *value).unwrap())
    }

    fn complete_values() -> Vec<(&'static str, &'static str)> {
        vec![("slack_bot_token", "xoxb-test"), ("slack_app_token", "xapp-test"), ("openai_api_key", "sk-test")]
    }

    #[test]
    fn test_config_loads_required_values_and_defaults() {
        let config = Config::from_builder(builder_with(&complete_values())).unwrap();

        assert_eq!(config.slack_bot_token, "xoxb-test");
        assert_eq!(config.slack_app_token, "xapp-test");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert!(config.openai_base_url.is_none());
    }

    #[test]
    fn test_config_accepts_optional_overrides() {
        let mut values = complete_values();
        values.push(("openai_model", "gpt-4o-mini"));
        values.push(("openai_base_url", "http://localhost:8080/v1"));

        let config = Config::from_builder(builder_with(&values)).unwrap();

        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.openai_base_url.as_deref(), Some("http://localhost:8080/v1"));
    }

    #[test]
    fn test_config_fails_when_any_required_value_is_missing() {
        for skipped in ["slack_bot_token", "slack_app_token", "openai_api_key"] {
            let values = complete_values().into_iter().filter(|(key, _)| *key != skipped).collect::<Vec<_>>();

            let result = Config::from_builder(builder_with(&values));

            assert!(result.is_err(), "Missing `{skipped}` should fail");
        }
    }

    #[test]
    fn test_config_fails_when_required_value_is_blank() {
        let values = complete_values().into_iter().map(|(key, value)| if key == "slack_app_token" { (key, "  ") } else { (key, value) }).collect::<Vec<_>>();

        let err = Config::from_builder(builder_with(&values)).unwrap_err();

        assert!(err.to_string().contains("SLACK_APP_TOKEN"));
    }
}
