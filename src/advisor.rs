use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::constants;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor rate limit exceeded")]
    RateLimited,
    #[error("advisor request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to reach advisor API: {0}")]
    Request(#[from] reqwest::Error),
    #[error("advisor returned no completion")]
    EmptyCompletion,
}

// Structures matching the OpenAI /v1/chat/completions endpoint
#[derive(Serialize, Debug)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize, Debug)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Turns the recorded interview answers into a roadmap via a chat completion model.
#[derive(Debug, Clone)]
pub struct Advisor {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl Advisor {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            &constants::OPENAI_BASE_URL,
            &constants::OPENAI_API_KEY,
            &constants::ADVISOR_MODEL,
        )
    }

    fn build_request(&self, answers: &[String]) -> CompletionRequest {
        let mut messages: Vec<ChatMessage> = answers
            .iter()
            .map(|answer| ChatMessage {
                role: "user",
                content: answer.clone(),
            })
            .collect();
        messages.push(ChatMessage {
            role: "user",
            content: constants::FINAL_PROMPT.to_string(),
        });
        CompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: constants::ADVISOR_MAX_TOKENS,
            temperature: constants::ADVISOR_TEMPERATURE,
            top_p: constants::ADVISOR_TOP_P,
        }
    }

    #[instrument(skip(self, answers), fields(model = %self.model, answers = answers.len()))]
    pub async fn roadmap(&self, answers: &[String]) -> Result<String, AdvisorError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let payload = self.build_request(answers);
        debug!(messages = payload.messages.len(), "Sending advisor request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            error!(%status, "Advisor rate limited");
            return Err(AdvisorError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "Advisor API request failed");
            return Err(AdvisorError::Status { status, body });
        }

        let completion = response.json::<CompletionResponse>().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AdvisorError::EmptyCompletion)
    }
}
