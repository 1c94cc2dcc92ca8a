use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::Config,
    session::{SessionManager, SessionOptions, SessionStats},
};

use super::dto::{
    validate_index, ApiResult, GameResponse, MarkSymbols, MoveRequest, MoveResponse,
    SessionListResponse, SessionSummary,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub symbols: Arc<MarkSymbols>,
}

impl AppState {
    pub fn new() -> Self {
        Self::new_with_manager(SessionManager::default(), MarkSymbols::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new_with_manager(
            SessionManager::from_config(config),
            MarkSymbols::from(&config.game),
        )
    }

    pub fn new_with_manager(sessions: SessionManager, symbols: MarkSymbols) -> Self {
        Self {
            sessions: Arc::new(sessions),
            symbols: Arc::new(symbols),
        }
    }

    /// テスト向けに相手の思考時間とシードだけを指定して作成する
    pub fn with_options(options: SessionOptions) -> Self {
        Self::new_with_manager(SessionManager::new(100, options), MarkSymbols::default())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn create_game(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<GameResponse>)> {
    let (_, session) = state.sessions.create_session()?;
    let snapshot = session.lock().await.snapshot();

    Ok((StatusCode::CREATED, Json(GameResponse::from_snapshot(&snapshot, &state.symbols))))
}

pub async fn list_games(State(state): State<AppState>) -> Json<SessionListResponse> {
    let sessions: Vec<SessionSummary> = state
        .sessions
        .list_sessions()
        .await
        .iter()
        .map(SessionSummary::from_snapshot)
        .collect();

    Json(SessionListResponse {
        total_count: sessions.len(),
        sessions,
    })
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> ApiResult<Json<GameResponse>> {
    let session = state.sessions.get_session(&game_id)?;
    let snapshot = session.lock().await.snapshot();

    Ok(Json(GameResponse::from_snapshot(&snapshot, &state.symbols)))
}

/// マスのクリック
/// 無効なクリックはエラーにせず、変化のない状態を `applied: false` で返す
pub async fn make_move(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(payload): Json<MoveRequest>,
) -> ApiResult<Json<MoveResponse>> {
    let index = validate_index(payload.index)?;
    let session = state.sessions.get_session(&game_id)?;

    let (applied, snapshot) = {
        let mut session = session.lock().await;
        let applied = session.on_cell_activated(index.get());
        (applied, session.snapshot())
    };

    Ok(Json(MoveResponse {
        applied,
        game_state: GameResponse::from_snapshot(&snapshot, &state.symbols),
    }))
}

pub async fn restart_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> ApiResult<Json<GameResponse>> {
    let session = state.sessions.get_session(&game_id)?;
    let snapshot = {
        let mut session = session.lock().await;
        session.on_restart();
        session.snapshot()
    };

    Ok(Json(GameResponse::from_snapshot(&snapshot, &state.symbols)))
}

pub async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.sessions.remove_session(&game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_stats(State(state): State<AppState>) -> Json<SessionStats> {
    Json(state.sessions.get_stats().await)
}

pub async fn health_check() -> &'static str {
    "TicTacToe API Server is running"
}
