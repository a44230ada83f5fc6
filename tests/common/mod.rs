// shared helpers for tests that talk to a mock model

#![allow(dead_code)]

use bluum::ChatClient;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::MockServer;

pub const CHAT_PATH: &str = "/api/v1/chat/completions";

// chat-completions body with a single choice
pub fn chat_reply(content: &str) -> Value {
    json!({
        "id": "gen-test",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
}

pub fn client(server: &MockServer) -> ChatClient {
    client_with_timeout(server, Duration::from_secs(5))
}

pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> ChatClient {
    ChatClient::new(
        "test-key".to_string(),
        &format!("{}{CHAT_PATH}", server.uri()),
        "test-model",
        timeout,
    )
    .unwrap()
}
