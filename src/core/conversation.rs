// per-session conversation state

use crate::core::journal::{Journal, Outcome};
use crate::core::prompts::Prompts;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub prompt: String,
    pub entry: String,
}

impl Turn {
    pub fn new(prompt: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            entry: entry.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub mood: String,
    pub started_at: DateTime<Utc>,
    turns: Vec<Turn>,
    // set from the last response, replaces the mood prompt
    follow_up: Option<String>,
}

impl Session {
    pub fn new(mood: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mood: mood.into(),
            started_at: Utc::now(),
            turns: Vec::new(),
            follow_up: None,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    // append only, turns are never edited
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn set_follow_up(&mut self, prompt: Option<String>) {
        self.follow_up = prompt.filter(|p| !p.trim().is_empty());
    }

    /// The prompt to show next: the last follow-up, else the mood's opening prompt.
    pub fn current_prompt(&self, prompts: &Prompts) -> String {
        if let Some(follow_up) = &self.follow_up {
            return follow_up.clone();
        }
        prompts
            .opening_prompt(&self.mood)
            .unwrap_or("How was your day?")
            .to_string()
    }

    pub fn history(&self) -> String {
        render_history(&self.turns)
    }
}

pub fn render_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("Prompt: {}\nEntry: {}", t.prompt, t.entry))
        .collect::<Vec<_>>()
        .join("\n\n")
}

// sessions idle longer than this are dropped when a new one is created
pub const SESSION_IDLE_LIMIT: Duration = Duration::from_secs(12 * 60 * 60);

struct Slot {
    session: Arc<Mutex<Session>>,
    last_active: DateTime<Utc>,
}

/// In-memory sessions for the http server.
/// The map lock is only held for lookups. Each session has its own lock, so a
/// slow submission never blocks other sessions.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Slot>>,
    idle_limit: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_limit(SESSION_IDLE_LIMIT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_limit(idle_limit: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_limit,
        }
    }

    pub async fn insert(&self, session: Session) -> Uuid {
        let id = session.id;
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, slot| !is_idle(slot.last_active, now, self.idle_limit));
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, "idle sessions dropped");
        }

        sessions.insert(
            id,
            Slot {
                session: Arc::new(Mutex::new(session)),
                last_active: now,
            },
        );
        id
    }

    // waits for a submission in flight on this session, not on others
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let session = self.slot(id, false).await?;
        let session = session.lock().await;
        Some(session.clone())
    }

    // "start over"
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }

    /// Submit an entry to one session, holding only that session's lock.
    pub async fn submit(&self, id: Uuid, journal: &Journal, entry: &str) -> Option<Outcome> {
        let session = self.slot(id, true).await?;
        let mut session = session.lock().await;
        Some(journal.submit(&mut session, entry).await)
    }

    async fn slot(&self, id: Uuid, touch: bool) -> Option<Arc<Mutex<Session>>> {
        let mut sessions = self.sessions.lock().await;
        let slot = sessions.get_mut(&id)?;
        if touch {
            slot.last_active = Utc::now();
        }
        Some(Arc::clone(&slot.session))
    }
}

fn is_idle(last_active: DateTime<Utc>, now: DateTime<Utc>, limit: Duration) -> bool {
    (now - last_active).to_std().is_ok_and(|idle| idle >= limit)
}
