// tests for the server's session store

mod common;

use bluum::core::Sentiment;
use bluum::{
    Category, Classifier, CsvLog, Journal, Logbook, Prompts, ResponseGenerator, Session,
    SessionStore,
};
use common::{chat_reply, client};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixed(f64);

impl Sentiment for Fixed {
    fn compound(&self, _text: &str) -> f64 {
        self.0
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_submission_does_not_block_other_sessions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply(
                    r#"{"category": "positive", "response_text": "Sea glass is a treasure!"}"#,
                ))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let prompts = Prompts::load(None).unwrap();
    let responder = ResponseGenerator::new(Some(client(&server)), &prompts);
    let journal = Arc::new(Journal::new(
        prompts,
        Classifier::heuristic().with_sentiment(Fixed(0.9)),
        responder,
        Logbook::new(Some(CsvLog::new(dir.path().join("log.csv"))), None),
    ));
    let store = Arc::new(SessionStore::new());

    let busy = store.insert(journal.start(None).unwrap()).await;
    let other = store.insert(journal.start(None).unwrap()).await;

    let handle = {
        let journal = Arc::clone(&journal);
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .submit(busy, &journal, "Walked to the beach and found sea glass")
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(300)).await;

    // none of this touches the busy session
    let started = Instant::now();
    store.insert(journal.start(Some("calm")).unwrap()).await;
    assert!(store.get(other).await.is_some());
    assert!(store.remove(other).await);
    assert!(started.elapsed() < Duration::from_secs(1));

    let outcome = handle.await.unwrap().unwrap();
    assert_eq!(outcome.category(), Category::Positive);

    let busy = store.get(busy).await.unwrap();
    assert_eq!(busy.turns().len(), 1);
}

#[tokio::test]
async fn test_idle_sessions_are_dropped() {
    let store = SessionStore::with_idle_limit(Duration::ZERO);
    let old = store.insert(Session::new("Happy")).await;
    let fresh = store.insert(Session::new("Calm")).await;

    assert!(store.get(old).await.is_none());
    assert_eq!(store.get(fresh).await.unwrap().mood, "Calm");
}

#[tokio::test]
async fn test_active_sessions_are_kept() {
    let store = SessionStore::new();
    let first = store.insert(Session::new("Happy")).await;
    store.insert(Session::new("Calm")).await;

    assert!(store.get(first).await.is_some());
}
