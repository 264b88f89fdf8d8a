//! Chat-completion client that turns a freshly logged expense into a short
//! coaching message.
//!
//! Every request is a single attempt. Failures never escape as errors: they
//! resolve to [`CoachReply::Failure`], which displays the fixed fallback
//! message. A request can be cancelled through its [`CoachTask`], and
//! [`CoachSlot`] cancels a stale request when a newer one supersedes it.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::aggregate::SpendingSnapshot;
use crate::config::CoachConfig;
use crate::expense::ExpenseRecord;
use crate::profile::BudgetProfile;
use crate::prompt::{COACH_SYSTEM_PROMPT, build_coach_prompt};
use crate::{ClientError, ClientResult};

pub const COACH_THINKING_MESSAGE: &str = "💭 Thinking...";
pub const COACH_FALLBACK_MESSAGE: &str = "❌ Oops! Couldn't reach your coach right now. Check your API key in settings or try again later.";
pub const COACH_CANCELLED_MESSAGE: &str = "Coach request cancelled.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoachReply {
    Success { text: String },
    Failure { reason: String },
    Cancelled,
}

impl CoachReply {
    /// Text shown to the user: the model's reply verbatim, or a fixed message.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Success { text } => text,
            Self::Failure { .. } => COACH_FALLBACK_MESSAGE,
            Self::Cancelled => COACH_CANCELLED_MESSAGE,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, Error)]
enum CoachFailure {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API request failed with status {0}")]
    Status(StatusCode),
    #[error("response body was not a chat completion: {0}")]
    MalformedBody(String),
    #[error("response contained no choices")]
    NoChoices,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: String,
}

#[derive(Debug, Clone)]
pub struct CoachClient {
    http: reqwest::Client,
    config: CoachConfig,
}

impl CoachClient {
    pub fn new(config: CoachConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|error| ClientError::internal_runtime(&error.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    pub async fn request_reply(
        &self,
        expense: &ExpenseRecord,
        profile: &BudgetProfile,
        snapshot: &SpendingSnapshot,
    ) -> CoachReply {
        let prompt = build_coach_prompt(expense, snapshot, profile.monthly_budget);
        match self.complete(&profile.credential, &prompt).await {
            Ok(text) => {
                debug!(expense_id = expense.id, "coach replied");
                CoachReply::Success { text }
            }
            Err(failure) => {
                error!(expense_id = expense.id, error = %failure, "error getting coach response");
                CoachReply::Failure {
                    reason: failure.to_string(),
                }
            }
        }
    }

    /// Starts the request on the current tokio runtime and returns a handle
    /// that can be awaited or cancelled.
    pub fn spawn(
        &self,
        expense: ExpenseRecord,
        profile: BudgetProfile,
        snapshot: SpendingSnapshot,
    ) -> CoachTask {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let client = self.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => CoachReply::Cancelled,
                reply = client.request_reply(&expense, &profile, &snapshot) => reply,
            }
        });

        CoachTask { token, handle }
    }

    async fn complete(&self, credential: &str, prompt: &str) -> Result<String, CoachFailure> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: COACH_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoachFailure::Status(status));
        }

        let raw = response.text().await?;
        let parsed = serde_json::from_str::<ChatResponse>(&raw)
            .map_err(|error| CoachFailure::MalformedBody(error.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CoachFailure::NoChoices)
    }
}

/// In-flight coach request.
#[derive(Debug)]
pub struct CoachTask {
    token: CancellationToken,
    handle: JoinHandle<CoachReply>,
}

impl CoachTask {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(self) -> CoachReply {
        match self.handle.await {
            Ok(reply) => reply,
            Err(join_error) if join_error.is_cancelled() => CoachReply::Cancelled,
            Err(join_error) => {
                error!(error = %join_error, "coach task panicked");
                CoachReply::Failure {
                    reason: join_error.to_string(),
                }
            }
        }
    }
}

/// Holds at most one in-flight request; installing a new one cancels the old.
#[derive(Debug, Default)]
pub struct CoachSlot {
    current: Option<CoachTask>,
}

impl CoachSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `task`, returning the superseded one (already cancelled).
    pub fn replace(&mut self, task: CoachTask) -> Option<CoachTask> {
        let previous = self.current.replace(task);
        if let Some(stale) = &previous {
            warn!("superseding in-flight coach request");
            stale.cancel();
        }
        previous
    }

    pub fn cancel(&mut self) {
        if let Some(task) = &self.current {
            task.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Waits for the installed request, leaving the slot empty.
    pub async fn settle(&mut self) -> Option<CoachReply> {
        match self.current.take() {
            Some(task) => Some(task.wait().await),
            None => None,
        }
    }
}
