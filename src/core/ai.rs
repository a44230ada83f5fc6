// chat-completion client - one post, one reply

use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.2-3b-instruct";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
    model: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

// what we send
#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    messages: &'a [Message],
}

// what comes back
#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatClient {
    pub fn new(
        api_key: String,
        url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            url: url.to_string(),
            model: model.to_string(),
        })
    }

    // send the conversation, get the first choice's text
    pub async fn complete(&self, messages: &[Message]) -> Result<String, Error> {
        let request = Request {
            model: &self.model,
            messages,
        };

        debug!(model = %self.model, messages = messages.len(), "sending chat completion");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response: Response = response.json().await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .ok_or(Error::EmptyReply)
    }
}

// models like to wrap json in markdown fences
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim().trim_matches('`').trim();
    let text = text
        .strip_prefix("json")
        .or_else(|| text.strip_prefix("JSON"))
        .unwrap_or(text);
    text.trim()
}
