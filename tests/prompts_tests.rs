// tests for the prompt library

use bluum::{Error, Prompts, Session};
use tempfile::TempDir;

#[test]
fn test_builtin_library() {
    let prompts = Prompts::load(None).unwrap();
    let moods: Vec<&str> = prompts.moods().collect();

    assert_eq!(moods[0], "Happy");
    assert!(moods.contains(&"Stressed"));
    assert_eq!(prompts.default_mood(), "Happy");
    assert_eq!(
        prompts.opening_prompt("Happy"),
        Some("What made you smile today?")
    );
    assert!(prompts.system.contains("Bluum"));
    assert!(prompts.user.contains("{{entry}}"));
    assert!(!prompts.version().is_empty());
}

#[test]
fn test_mood_lookup_ignores_case() {
    let prompts = Prompts::load(None).unwrap();
    assert_eq!(prompts.resolve_mood("sTrEsSeD"), Some("Stressed"));
    assert_eq!(prompts.resolve_mood("elated"), None);
    assert!(prompts.prompts_for("calm").is_some());
}

#[test]
fn test_directory_overrides_moods_only() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("prompts.json"),
        r#"{"Curious": ["What did you learn today?", "What surprised you?"]}"#,
    )
    .unwrap();

    let prompts = Prompts::load(Some(dir.path())).unwrap();
    let builtin = Prompts::load(None).unwrap();

    assert_eq!(prompts.moods().collect::<Vec<_>>(), vec!["Curious"]);
    assert_eq!(prompts.opening_prompt("curious"), Some("What did you learn today?"));
    // templates fall back to the shipped copies
    assert_eq!(prompts.system, builtin.system);
    assert_eq!(prompts.user, builtin.user);
    assert_ne!(prompts.version(), builtin.version());
}

#[test]
fn test_version_is_stable() {
    let a = Prompts::load(None).unwrap();
    let b = Prompts::load(None).unwrap();
    assert_eq!(a.version(), b.version());
}

#[test]
fn test_rejects_empty_library() {
    let err = Prompts::from_parts("{}", "s".into(), "c".into(), "u".into()).unwrap_err();
    assert!(matches!(err, Error::Prompts(_)));
}

#[test]
fn test_rejects_mood_without_prompts() {
    let err = Prompts::from_parts(r#"{"Happy": []}"#, "s".into(), "c".into(), "u".into())
        .unwrap_err();
    assert!(matches!(err, Error::Prompts(_)));
}

#[test]
fn test_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("prompts.json"), "{ not json").unwrap();

    let err = Prompts::load(Some(dir.path())).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn test_session_prompt_follows_up() {
    let prompts = Prompts::load(None).unwrap();
    let mut session = Session::new("Happy");
    assert_eq!(session.current_prompt(&prompts), "What made you smile today?");

    session.set_follow_up(Some("What did the two of you do?".to_string()));
    assert_eq!(session.current_prompt(&prompts), "What did the two of you do?");

    // an unknown mood still gets a question
    let lost = Session::new("Nonexistent");
    assert_eq!(lost.current_prompt(&prompts), "How was your day?");
}
