// tests for entry classification, local rules and the remote model

mod common;

use bluum::core::Sentiment;
use bluum::{Category, Classifier, Turn};
use common::{CHAT_PATH, chat_reply, client, client_with_timeout};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// fixed polarity, so heuristics don't depend on the lexicon
struct Fixed(f64);

impl Sentiment for Fixed {
    fn compound(&self, _text: &str) -> f64 {
        self.0
    }
}

fn heuristic(compound: f64) -> Classifier {
    Classifier::heuristic().with_sentiment(Fixed(compound))
}

#[tokio::test]
async fn test_blank_entry_is_quiet() {
    let classifier = heuristic(0.9);
    assert_eq!(classifier.classify("", &[]).await, Category::Quiet);
    assert_eq!(classifier.classify("   \n ", &[]).await, Category::Quiet);
}

#[tokio::test]
async fn test_safety_skips_remote_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            r#"{"category": "positive"}"#,
        )))
        .expect(0)
        .mount(&server)
        .await;

    let classifier = Classifier::new(Some(client(&server)), "classify");
    assert_eq!(
        classifier.classify("I want to kill myself", &[]).await,
        Category::Safety
    );
    assert_eq!(
        classifier
            .classify("Great promotion today but honestly I want to end it all", &[])
            .await,
        Category::Safety
    );
}

#[tokio::test]
async fn test_short_entries_skip_remote_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            r#"{"category": "positive"}"#,
        )))
        .expect(0)
        .mount(&server)
        .await;

    let classifier = Classifier::new(Some(client(&server)), "classify");
    assert_eq!(classifier.classify("ok", &[]).await, Category::Quiet);
    assert_eq!(classifier.classify("meh", &[]).await, Category::Quiet);
    assert_eq!(classifier.classify("pretty alright", &[]).await, Category::Quiet);
}

#[tokio::test]
async fn test_remote_classification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains("Today I got a promotion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            "```json\n{\"category\": \"positive\"}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = Classifier::new(Some(client(&server)), "classify");
    assert_eq!(
        classifier
            .classify("Today I got a promotion and I'm thrilled!", &[])
            .await,
        Category::Positive
    );
}

#[tokio::test]
async fn test_remote_sees_conversation_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("Conversation so far"))
        .and(body_string_contains("my dog learned a new trick"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            r#"{"category": "positive"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let turns = [Turn::new("What made you smile today?", "my dog learned a new trick")];
    let classifier = Classifier::new(Some(client(&server)), "classify");
    assert_eq!(
        classifier
            .classify("He can roll over now, we practised all week", &turns)
            .await,
        Category::Positive
    );
}

#[tokio::test]
async fn test_malformed_remote_reply_is_unclear() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_reply("I think this one is positive!")),
        )
        .mount(&server)
        .await;

    let classifier = Classifier::new(Some(client(&server)), "classify");
    assert_eq!(
        classifier
            .classify("Spent the afternoon repainting the fence", &[])
            .await,
        Category::Unclear
    );
}

#[tokio::test]
async fn test_unknown_remote_category_is_unclear() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            r#"{"category": "joyful"}"#,
        )))
        .mount(&server)
        .await;

    let classifier = Classifier::new(Some(client(&server)), "classify");
    assert_eq!(
        classifier
            .classify("Spent the afternoon repainting the fence", &[])
            .await,
        Category::Unclear
    );
}

#[tokio::test]
async fn test_remote_http_error_is_unclear() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let classifier = Classifier::new(Some(client(&server)), "classify");
    assert_eq!(
        classifier
            .classify("Spent the afternoon repainting the fence", &[])
            .await,
        Category::Unclear
    );
}

#[tokio::test]
async fn test_remote_timeout_is_unclear() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply(r#"{"category": "positive"}"#))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let classifier = Classifier::new(
        Some(client_with_timeout(&server, Duration::from_millis(500))),
        "classify",
    );
    assert_eq!(
        classifier
            .classify("Spent the afternoon repainting the fence", &[])
            .await,
        Category::Unclear
    );
}

#[test]
fn test_heuristic_instruction_keywords() {
    let classifier = heuristic(0.9);
    assert_eq!(
        classifier.heuristics("Can you explain how closures work"),
        Category::Instruction
    );
    assert_eq!(
        classifier.heuristics("my python script crashed again today"),
        Category::Instruction
    );
    assert_eq!(
        classifier.heuristics("Write me a poem about the sea please"),
        Category::Instruction
    );
}

#[test]
fn test_heuristic_tech_words_match_whole_words() {
    // "capital" contains "api", "codeine" contains "code"
    let classifier = heuristic(0.9);
    assert_eq!(
        classifier.heuristics("Visited the capital with my sister today"),
        Category::Positive
    );
}

#[test]
fn test_heuristic_short_is_quiet() {
    let classifier = heuristic(0.9);
    assert_eq!(classifier.heuristics("fine"), Category::Quiet);
    assert_eq!(classifier.heuristics("good day"), Category::Quiet);
}

#[test]
fn test_heuristic_sentiment_bands() {
    let entry = "I went for a long walk by the river after work";
    assert_eq!(heuristic(0.8).heuristics(entry), Category::Positive);
    assert_eq!(heuristic(0.3).heuristics(entry), Category::Quiet);
    assert_eq!(heuristic(0.0).heuristics(entry), Category::Quiet);
    assert_eq!(heuristic(-0.3).heuristics(entry), Category::Quiet);
    assert_eq!(heuristic(-0.6).heuristics(entry), Category::Safety);
}

#[test]
fn test_heuristic_safety_first() {
    assert_eq!(
        heuristic(0.9).heuristics("explain why I feel so hopeless"),
        Category::Safety
    );
}

#[test]
fn test_vader_scores_obvious_cases() {
    let classifier = Classifier::heuristic();
    assert_eq!(
        classifier.heuristics("Today was wonderful, I am so happy and grateful for my friends"),
        Category::Positive
    );
}
