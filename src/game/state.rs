//! ゲーム状態管理モジュール
//! 三目並べの全体的な状態(盤面、手番、勝者、終了フラグ、世代番号)を管理する。

use super::board::Board;
use super::rules::{Outcome, TicTacToeRules};
use super::types::{Cell, CellIndex, Player};
use serde::{Deserialize, Serialize};

/// 画面に表示するゲームの進行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "winner", rename_all = "snake_case")]
pub enum GameStatus {
    /// 人間の手番
    HumanTurn,
    /// 相手が思考中
    OpponentTurn,
    /// 勝敗決定
    WonBy(Player),
    /// 引き分け
    Draw,
}

impl GameStatus {
    /// ステータス表示用の文言
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::HumanTurn => "Your turn",
            GameStatus::OpponentTurn => "Opponent thinking",
            GameStatus::WonBy(Player::Human) => "Winner: Human",
            GameStatus::WonBy(Player::Opponent) => "Winner: Opponent",
            GameStatus::Draw => "Draw",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::WonBy(_) | GameStatus::Draw)
    }
}

/// 三目並べの全体状態を保持する構造体
///
/// 勝者あり(終了)、勝者なしで終了(引き分け)、進行中のいずれか一つだけが成り立つ。
/// `epoch` はリセットの度に増加し、予約済みの相手の手を無効化するために使う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub active_turn: Player,
    pub winner: Option<Player>,
    pub is_over: bool,
    pub epoch: u64,
}

impl GameState {
    /// 新しいゲーム状態を作成する
    /// 初期状態：空の盤面、人間の手番、世代0
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            active_turn: Player::Human,
            winner: None,
            is_over: false,
            epoch: 0,
        }
    }

    /// 現在の進行状態を返す
    pub fn status(&self) -> GameStatus {
        match (self.winner, self.is_over) {
            (Some(winner), _) => GameStatus::WonBy(winner),
            (None, true) => GameStatus::Draw,
            (None, false) => match self.active_turn {
                Player::Human => GameStatus::HumanTurn,
                Player::Opponent => GameStatus::OpponentTurn,
            },
        }
    }

    pub fn cell(&self, index: CellIndex) -> Cell {
        self.board.get_cell(index)
    }

    pub fn is_human_turn(&self) -> bool {
        self.status() == GameStatus::HumanTurn
    }

    /// 人間がこのマスをクリックして着手できるか
    pub fn is_cell_clickable(&self, index: CellIndex) -> bool {
        self.is_human_turn() && TicTacToeRules::is_legal_move(&self.board, index)
    }

    /// プレイヤーの印を置いて勝敗判定を行う
    /// 置けなかった場合はfalseを返し、状態は変わらない
    pub(crate) fn place_mark(&mut self, index: CellIndex, player: Player) -> bool {
        if self.is_over || !self.board.place(index, player) {
            return false;
        }

        let outcome = TicTacToeRules::evaluate(&self.board);
        if let Outcome::Won(winner) = outcome {
            self.winner = Some(winner);
        }
        self.is_over = outcome.is_terminal();
        self.active_turn = player.opposite();
        true
    }

    /// 状態を初期化する
    /// 世代番号だけは引き継いで1つ進める
    pub fn reset(&mut self) {
        let epoch = self.epoch.wrapping_add(1);
        *self = Self {
            epoch,
            ..Self::new()
        };
    }

    /// これまでに置かれた印の数
    pub fn move_count(&self) -> u32 {
        u32::from(self.board.mark_count())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: usize) -> CellIndex {
        CellIndex::new(i).unwrap()
    }

    #[test]
    fn test_game_state_new() {
        let state = GameState::new();

        assert_eq!(state.status(), GameStatus::HumanTurn);
        assert_eq!(state.winner, None);
        assert!(!state.is_over);
        assert_eq!(state.epoch, 0);
        assert_eq!(state.move_count(), 0);
    }

    #[test]
    fn test_place_mark_switches_turn() {
        let mut state = GameState::new();

        assert!(state.place_mark(idx(4), Player::Human));
        assert_eq!(state.active_turn, Player::Opponent);
        assert_eq!(state.status(), GameStatus::OpponentTurn);
        assert!(!state.is_cell_clickable(idx(0)));
    }

    #[test]
    fn test_place_mark_detects_win() {
        let mut state = GameState::new();
        state.place_mark(idx(0), Player::Human);
        state.place_mark(idx(3), Player::Opponent);
        state.place_mark(idx(1), Player::Human);
        state.place_mark(idx(4), Player::Opponent);
        state.place_mark(idx(2), Player::Human);

        assert_eq!(state.winner, Some(Player::Human));
        assert!(state.is_over);
        assert_eq!(state.status(), GameStatus::WonBy(Player::Human));
        assert!(!state.place_mark(idx(8), Player::Opponent));
        assert!(CellIndex::all().all(|index| !state.is_cell_clickable(index)));
    }

    #[test]
    fn test_reset_bumps_epoch() {
        let mut state = GameState::new();
        state.place_mark(idx(0), Player::Human);
        state.reset();

        assert_eq!(state.epoch, 1);
        assert_eq!(state.board, Board::new());
        assert_eq!(state.status(), GameStatus::HumanTurn);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(GameStatus::HumanTurn.label(), "Your turn");
        assert_eq!(GameStatus::OpponentTurn.label(), "Opponent thinking");
        assert_eq!(GameStatus::WonBy(Player::Human).label(), "Winner: Human");
        assert_eq!(GameStatus::WonBy(Player::Opponent).label(), "Winner: Opponent");
        assert_eq!(GameStatus::Draw.label(), "Draw");
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(GameStatus::WonBy(Player::Opponent)).unwrap();
        assert_eq!(json["state"], "won_by");
        assert_eq!(json["winner"], "opponent");

        let json = serde_json::to_value(GameStatus::HumanTurn).unwrap();
        assert_eq!(json["state"], "human_turn");
    }
}
