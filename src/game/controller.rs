//! 手番制御モジュール
//! `(状態, イベント) -> 状態` の純粋な遷移関数で手番の状態機械を実装する。
//! 遅延実行やロックは扱わず、呼び出し側に必要な副作用を `Effect` で伝える。

use super::state::{GameState, GameStatus};
use super::types::{CellIndex, Player};

/// 状態機械に入力されるイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// 人間がマスをクリックした
    HumanMove(CellIndex),
    /// 予約されていた相手の手 (予約時の世代番号付き)
    OpponentMove { epoch: u64, index: CellIndex },
    /// リスタート操作
    Restart,
}

/// 遷移に伴って呼び出し側が実行すべき副作用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// 指定世代で相手の手を遅延実行する
    ScheduleOpponent { epoch: u64 },
    /// 予約済みの相手の手を取り消す
    CancelPending,
}

/// 遷移結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub effect: Effect,
    /// 状態が変化したかどうか (無効な入力ではfalse)
    pub changed: bool,
}

impl Transition {
    fn unchanged(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            effect: Effect::None,
            changed: false,
        }
    }
}

/// 手番の状態機械
/// スタティックメソッドのみを提供する
pub struct TurnController;

impl TurnController {
    /// イベントを適用した次の状態を計算する
    ///
    /// 無効な入力(埋まったマス、手番外、終了後、古い世代の相手の手)は
    /// エラーではなく状態を変えない遷移として扱う。
    pub fn transition(state: &GameState, event: GameEvent) -> Transition {
        match event {
            GameEvent::HumanMove(index) => Self::human_move(state, index),
            GameEvent::OpponentMove { epoch, index } => Self::opponent_move(state, epoch, index),
            GameEvent::Restart => {
                let mut next = state.clone();
                next.reset();
                Transition {
                    state: next,
                    effect: Effect::CancelPending,
                    changed: true,
                }
            }
        }
    }

    fn human_move(state: &GameState, index: CellIndex) -> Transition {
        if !state.is_cell_clickable(index) {
            return Transition::unchanged(state);
        }

        let mut next = state.clone();
        if !next.place_mark(index, Player::Human) {
            return Transition::unchanged(state);
        }

        // 人間の手で決着した場合は相手の手を予約しない
        let effect = if next.status() == GameStatus::OpponentTurn {
            Effect::ScheduleOpponent { epoch: next.epoch }
        } else {
            Effect::None
        };

        Transition {
            state: next,
            effect,
            changed: true,
        }
    }

    fn opponent_move(state: &GameState, epoch: u64, index: CellIndex) -> Transition {
        if epoch != state.epoch || state.status() != GameStatus::OpponentTurn {
            return Transition::unchanged(state);
        }

        let mut next = state.clone();
        if !next.place_mark(index, Player::Opponent) {
            return Transition::unchanged(state);
        }

        Transition {
            state: next,
            effect: Effect::None,
            changed: true,
        }
    }
}
