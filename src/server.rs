// http server mode - the journaling form as a json api

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use crate::core::{Outcome, Session, SessionStore, Turn};
use crate::{Config, Error, Journal};

struct AppState {
    journal: Journal,
    sessions: SessionStore,
}

#[derive(Deserialize, Default)]
struct StartRequest {
    #[serde(default)]
    mood: Option<String>,
}

#[derive(Serialize)]
struct StartResponse {
    session_id: Uuid,
    mood: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EntryRequest {
    entry: String,
}

#[derive(Serialize)]
struct EntryResponse {
    #[serde(flatten)]
    outcome: Outcome,
    next_prompt: String,
}

#[derive(Serialize)]
struct SessionResponse {
    session_id: Uuid,
    mood: String,
    prompt: String,
    turns: Vec<Turn>,
}

#[derive(Serialize)]
struct Mood {
    name: String,
    prompts: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub struct Server;

impl Server {
    pub async fn run(config: &Config, host: &str, port: u16) -> Result<(), Error> {
        let journal = config.build_journal().await?;
        let app = Self::router(journal);

        let addr = format!("{host}:{port}");
        info!(%addr, "server running");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }

    pub fn router(journal: Journal) -> Router {
        let state = Arc::new(AppState {
            journal,
            sessions: SessionStore::new(),
        });

        Router::new()
            .route("/health", get(health))
            .route("/moods", get(moods))
            .route("/sessions", post(start_session))
            .route("/sessions/{id}", get(get_session).delete(start_over))
            .route("/sessions/{id}/entries", post(submit_entry))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn moods(State(state): State<Arc<AppState>>) -> Json<Vec<Mood>> {
    let prompts = state.journal.prompts();
    let moods = prompts
        .moods()
        .map(|name| Mood {
            name: name.to_string(),
            prompts: prompts.prompts_for(name).unwrap_or_default().to_vec(),
        })
        .collect();
    Json(moods)
}

async fn start_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<StartRequest>>,
) -> Result<(StatusCode, Json<StartResponse>), ApiError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();

    let session = state
        .journal
        .start(req.mood.as_deref())
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "unknown mood"))?;

    let response = StartResponse {
        session_id: session.id,
        mood: session.mood.clone(),
        prompt: session.current_prompt(state.journal.prompts()),
    };
    state.sessions.insert(session).await;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "no such session"))?;

    Ok(Json(session_response(&session, &state.journal)))
}

async fn submit_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<EntryResponse>, ApiError> {
    let outcome = state
        .sessions
        .submit(id, &state.journal, &req.entry)
        .await
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "no such session"))?;

    let next_prompt = state
        .sessions
        .get(id)
        .await
        .map(|s| s.current_prompt(state.journal.prompts()))
        .unwrap_or_else(|| outcome.prompt.clone());

    Ok(Json(EntryResponse {
        outcome,
        next_prompt,
    }))
}

// start over: the session and its turns are dropped
async fn start_over(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> StatusCode {
    if state.sessions.remove(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

fn session_response(session: &Session, journal: &Journal) -> SessionResponse {
    SessionResponse {
        session_id: session.id,
        mood: session.mood.clone(),
        prompt: session.current_prompt(journal.prompts()),
        turns: session.turns().to_vec(),
    }
}
