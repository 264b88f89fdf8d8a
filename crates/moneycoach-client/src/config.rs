use std::time::Duration;

use crate::{ClientError, ClientResult};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_MAX_TOKENS: u32 = 150;

pub const ENDPOINT_ENV_VAR: &str = "MONEYCOACH_API_URL";
pub const MODEL_ENV_VAR: &str = "MONEYCOACH_MODEL";
pub const TIMEOUT_ENV_VAR: &str = "MONEYCOACH_TIMEOUT_SECS";

/// Settings for the chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CoachConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `None` waits for the service indefinitely; cancellation is the escape hatch.
    pub timeout: Option<Duration>,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: None,
        }
    }
}

impl CoachConfig {
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = non_empty(lookup(ENDPOINT_ENV_VAR)) {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ClientError::invalid_config(
                    ENDPOINT_ENV_VAR,
                    "expected an http:// or https:// URL",
                ));
            }
            config.endpoint = endpoint;
        }

        if let Some(model) = non_empty(lookup(MODEL_ENV_VAR)) {
            config.model = model;
        }

        if let Some(raw) = non_empty(lookup(TIMEOUT_ENV_VAR)) {
            let seconds = raw.parse::<u64>().map_err(|_| {
                ClientError::invalid_config(TIMEOUT_ENV_VAR, "expected a whole number of seconds")
            })?;
            config.timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
