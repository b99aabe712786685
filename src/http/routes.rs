//! HTTP routes: leaderboard page and JSON, score submission, status, health.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::{self, header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

use crate::leaderboard::{ScoreEntry, ranking};
use crate::sync::{ConfiguredIdentity, Identity, MemoryBackend, SyncController, SyncError, SyncState};
use crate::ws;

pub type Leaderboard = SyncController<MemoryBackend>;

#[derive(Clone)]
pub struct AppState {
    pub leaderboard: Arc<Leaderboard>,
    pub identity: Arc<ConfiguredIdentity>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(leaderboard_page))
        .route("/healthz", get(healthz))
        .route("/status", get(status))
        .route("/leaderboard", get(leaderboard_json))
        .route("/scores", post(submit_score))
        .route("/ws", get(ws::connection::ws_handler))
        .layer(
            CorsLayer::new()
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str { "ok" }

#[derive(Template)]
#[template(path = "leaderboard.html")]
struct LeaderboardTemplate {
    user: Option<String>,
    rank: Option<usize>,
    lines: Vec<ScoreEntry>,
}

async fn leaderboard_page(State(state): State<AppState>) -> impl IntoResponse {
    let lines = state.leaderboard.view();
    let user = state.identity.current_user().await.ok();
    let rank = user.as_deref().and_then(|u| ranking::position_of(&lines, u));
    LeaderboardTemplate { user, rank, lines }
}

async fn leaderboard_json(State(state): State<AppState>) -> Json<Vec<ScoreEntry>> {
    Json(state.leaderboard.view())
}

#[derive(Serialize)]
struct StatusBody {
    state: SyncState,
    user: Option<String>,
    entries: usize,
    live_feeds: usize,
    feed_error: Option<String>,
}

async fn status(State(state): State<AppState>) -> Json<StatusBody> {
    let lb = &state.leaderboard;
    Json(StatusBody {
        state: lb.state(),
        user: state.identity.current_user().await.ok(),
        entries: lb.entries().len(),
        live_feeds: lb.backend().live_subscriptions(),
        feed_error: lb.feed_error(),
    })
}

#[derive(Deserialize)]
pub struct SubmitScore {
    pub value: i64,
}

#[derive(Serialize)]
struct Submitted {
    entry: ScoreEntry,
    rank: Option<usize>,
}

pub async fn submit_score(
    State(state): State<AppState>,
    Json(SubmitScore { value }): Json<SubmitScore>,
) -> impl IntoResponse {
    let user = match state.identity.current_user().await {
        Ok(user) => user,
        Err(err) => return (StatusCode::UNAUTHORIZED, err.to_string()).into_response(),
    };
    match state.leaderboard.submit(user.as_str(), value).await {
        Ok(entry) => {
            let rank = ranking::position_of(&state.leaderboard.view(), &user);
            tracing::info!(%user, value, ?rank, "score submitted");
            (StatusCode::CREATED, Json(Submitted { entry, rank })).into_response()
        }
        Err(err @ SyncError::NotSynced(_)) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()).into_response(),
        Err(err @ SyncError::Submission(_)) => (StatusCode::BAD_GATEWAY, err.to_string()).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
