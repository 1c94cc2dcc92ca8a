//! アプリケーション全体のエラー定義モジュール
//! ゲーム内の無効な操作はエラーではなく無視されるため、
//! ここではセッション管理とリクエスト検証のエラーのみを扱う。

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// セッションとリクエストに関連するエラー
#[derive(Debug, Error)]
pub enum GameError {
    #[error("ゲームセッションが見つかりません: {session_id}")]
    SessionNotFound { session_id: Uuid },

    #[error("セッション制限に達しています (最大: {max})")]
    SessionLimitExceeded { max: usize },

    #[error("無効なマス番号です: {index} (有効範囲: 0-8)")]
    InvalidCell { index: i64 },
}

impl GameError {
    pub fn error_code(&self) -> &'static str {
        match self {
            GameError::SessionNotFound { .. } => "GAME_NOT_FOUND",
            GameError::SessionLimitExceeded { .. } => "MAX_SESSIONS_REACHED",
            GameError::InvalidCell { .. } => "INVALID_CELL",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GameError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
            GameError::SessionLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            GameError::InvalidCell { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;
