//! REST API route handlers.
//!
//! Every handler resolves its inputs, makes one call into
//! [`QuizService`](crate::quiz::QuizService) and maps the outcome to JSON.
//! Failures become `{"error": "..."}` bodies with a matching status code.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use verbquiz_store::{StoreResult, Verb};

use crate::quiz::{AnswerSubmission, Grade, Progress, QuizError, ResetOutcome, resolve_player};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

impl QuizError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidSize(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotEnoughVerbs { .. } => StatusCode::BAD_REQUEST,
            Self::VerbNotFound(_) => StatusCode::NOT_FOUND,
            Self::MalformedRequest { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<QueryRejection> for QuizError {
    fn from(rejection: QueryRejection) -> Self {
        Self::MalformedRequest {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for QuizError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedRequest {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// `?pseudo=`: the caller's display name.
#[derive(Debug, Default, Deserialize)]
pub struct PlayerParams {
    pub pseudo: Option<String>,
}

impl PlayerParams {
    fn player(&self) -> String {
        resolve_player(self.pseudo.as_deref())
    }
}

/// `?size=`: requested quiz length.
#[derive(Debug, Default, Deserialize)]
pub struct QuizParams {
    pub size: Option<i64>,
}

// ---------------------------------------------------------------------------
// GET /verbs
// ---------------------------------------------------------------------------

/// Return every verb.
pub async fn list_verbs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Verb>>, QuizError> {
    Ok(Json(state.quiz.list_verbs().await?))
}

// ---------------------------------------------------------------------------
// GET /quiz
// ---------------------------------------------------------------------------

/// Return a random set of verbs.
pub async fn quiz(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QuizParams>, QueryRejection>,
) -> Result<Json<Vec<Verb>>, QuizError> {
    let Query(params) = params?;
    Ok(Json(state.quiz.draw(params.size).await?))
}

// ---------------------------------------------------------------------------
// POST /answer
// ---------------------------------------------------------------------------

/// Grade one answer and record the attempt.
pub async fn answer(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PlayerParams>, QueryRejection>,
    body: Result<Json<AnswerSubmission>, JsonRejection>,
) -> Result<Json<Grade>, QuizError> {
    let Query(params) = params?;
    let Json(body) = body?;
    let player = params.player();
    Ok(Json(state.quiz.grade(&player, &body).await?))
}

// ---------------------------------------------------------------------------
// GET /progress
// ---------------------------------------------------------------------------

/// Return the caller's success statistics.
pub async fn progress(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PlayerParams>, QueryRejection>,
) -> Result<Json<Progress>, QuizError> {
    let player = params?.player();
    Ok(Json(state.quiz.progress(&player).await?))
}

// ---------------------------------------------------------------------------
// POST /reset
// ---------------------------------------------------------------------------

/// Erase the caller's recorded attempts.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PlayerParams>, QueryRejection>,
) -> Result<Json<ResetOutcome>, QuizError> {
    let player = params?.player();
    let outcome = state.quiz.reset(&player).await?;
    tracing::info!(player = %player, deleted = outcome.deleted, "progress reset");
    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Response payload for the `/health` endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub verbs: i64,
}

/// Report whether the database answers, and how many verbs it holds.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let verbs: StoreResult<i64> = state
        .db
        .execute(|conn| Ok(conn.query_row("SELECT count(*) FROM verb", [], |row| row.get(0))?))
        .await;

    match verbs {
        Ok(verbs) => Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            verbs,
        })
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

// ── tests ────────────────────────────────────────────────────────────
