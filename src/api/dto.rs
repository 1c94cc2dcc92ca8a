//! 三目並べAPI データ転送オブジェクト (DTO)

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{Cell, CellIndex, GameStatus, Player};
use crate::session::SessionSnapshot;

/// 印の表示記号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkSymbols {
    pub human: String,
    pub opponent: String,
}

impl MarkSymbols {
    pub fn symbol(&self, cell: Cell) -> Option<&str> {
        match cell {
            Cell::Empty => None,
            Cell::Human => Some(self.human.as_str()),
            Cell::Opponent => Some(self.opponent.as_str()),
        }
    }
}

impl Default for MarkSymbols {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

impl From<&GameConfig> for MarkSymbols {
    fn from(config: &GameConfig) -> Self {
        Self {
            human: config.human_symbol.clone(),
            opponent: config.opponent_symbol.clone(),
        }
    }
}

/// 負の番号もINVALID_CELLとして扱うため符号付きで受け取る
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub index: i64,
}

/// マス番号を検証する
pub fn validate_index(index: i64) -> Result<CellIndex, GameError> {
    usize::try_from(index)
        .ok()
        .and_then(CellIndex::new)
        .ok_or(GameError::InvalidCell { index })
}

/// 1マス分の表示情報
#[derive(Debug, Serialize)]
pub struct CellView {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub mark: Option<Player>,
    pub symbol: Option<String>,
    pub clickable: bool,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub game_id: Uuid,
    pub cells: Vec<CellView>,
    pub status: GameStatus,
    pub status_label: &'static str,
    pub winner: Option<Player>,
    pub is_over: bool,
    pub winning_line: Option<[usize; 3]>,
    pub opponent_thinking: bool,
    pub epoch: u64,
    pub move_count: u32,
}

impl GameResponse {
    pub fn from_snapshot(snapshot: &SessionSnapshot, symbols: &MarkSymbols) -> Self {
        let cells = CellIndex::all()
            .map(|index| {
                let cell = snapshot.cell(index);
                CellView {
                    index: index.get(),
                    row: index.row(),
                    col: index.col(),
                    mark: cell.owner(),
                    symbol: symbols.symbol(cell).map(str::to_string),
                    clickable: snapshot.is_cell_clickable(index),
                }
            })
            .collect();

        Self {
            game_id: snapshot.id,
            cells,
            status: snapshot.status,
            status_label: snapshot.status.label(),
            winner: snapshot.state.winner,
            is_over: snapshot.state.is_over,
            winning_line: snapshot.winning_line,
            opponent_thinking: snapshot.status == GameStatus::OpponentTurn,
            epoch: snapshot.state.epoch,
            move_count: snapshot.state.move_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    /// 着手が盤面に反映されたか (無効なクリックはfalse)
    pub applied: bool,
    pub game_state: GameResponse,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub game_id: Uuid,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub move_count: u32,
}

impl SessionSummary {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            game_id: snapshot.id,
            status: snapshot.status,
            created_at: snapshot.created_at,
            last_activity: snapshot.last_activity,
            move_count: snapshot.state.move_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub error_code: Option<String>,
}

impl ErrorResponse {
    pub fn with_code(error: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
            error_code: Some(code.into()),
        }
    }
}

impl From<GameError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: GameError) -> Self {
        let error_response = ErrorResponse::with_code(
            err.error_code(),
            err.to_string(),
            err.error_code(),
        );

        (err.status_code(), Json(error_response))
    }
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{GameSession, SessionOptions};

    #[test]
    fn test_validate_index() {
        assert_eq!(validate_index(0).unwrap().get(), 0);
        assert_eq!(validate_index(8).unwrap().get(), 8);
        assert!(matches!(validate_index(9), Err(GameError::InvalidCell { index: 9 })));
        assert!(matches!(validate_index(-1), Err(GameError::InvalidCell { index: -1 })));
        assert!(validate_index(i64::MIN).is_err());
    }

    #[test]
    fn test_mark_symbols() {
        let symbols = MarkSymbols::default();
        assert_eq!(symbols.symbol(Cell::Human), Some("🐰"));
        assert_eq!(symbols.symbol(Cell::Opponent), Some("🥕"));
        assert_eq!(symbols.symbol(Cell::Empty), None);
    }

    #[tokio::test]
    async fn test_game_response_from_snapshot() {
        let session = GameSession::spawn(SessionOptions::default());
        let snapshot = session.lock().await.snapshot();
        let response = GameResponse::from_snapshot(&snapshot, &MarkSymbols::default());

        assert_eq!(response.game_id, snapshot.id);
        assert_eq!(response.cells.len(), 9);
        assert_eq!((response.cells[5].row, response.cells[5].col), (1, 2));
        assert!(response.cells.iter().all(|cell| cell.clickable && cell.mark.is_none()));
        assert_eq!(response.status_label, "Your turn");
        assert!(!response.opponent_thinking);
        assert_eq!(response.move_count, 0);
    }

    #[test]
    fn test_error_conversion() {
        let (status, Json(body)) = <(StatusCode, Json<ErrorResponse>)>::from(GameError::InvalidCell { index: 11 });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_code.as_deref(), Some("INVALID_CELL"));
        assert!(body.message.contains("11"));
    }
}
