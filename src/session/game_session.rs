//! ゲームセッションモジュール
//!
//! 画面上の1つの三目並べウィジェットに対応するコンポーネント。
//! ゲーム状態、相手の戦略、乱数源、遅延実行スケジューラを1つにまとめ、
//! 表示層に対してマスの表示・クリック・リスタート・ステータス取得を提供する。
//!
//! 状態の変更は全て `TurnController` の純粋な遷移関数を通して行い、
//! セッション自身の非同期Mutexの内側でのみ発生する。

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::ai::{OpponentStrategy, RandomOpponent, SessionRng};
use crate::config::GameConfig;
use crate::game::{
    Cell, CellIndex, Effect, GameEvent, GameState, GameStatus, TicTacToeRules, Transition,
    TurnController,
};

use super::scheduler::MoveScheduler;

/// 複数のタスクから共有されるセッション
pub type SharedSession = Arc<Mutex<GameSession>>;

/// セッション作成時のオプション
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// 相手の思考時間
    pub opponent_delay: Duration,
    /// 乱数シード (Noneならランダム)
    pub rng_seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            opponent_delay: Duration::from_millis(500),
            rng_seed: None,
        }
    }
}

impl From<&GameConfig> for SessionOptions {
    fn from(config: &GameConfig) -> Self {
        Self {
            opponent_delay: config.opponent_delay,
            rng_seed: config.rng_seed,
        }
    }
}

/// 表示層に渡すセッションのスナップショット
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub state: GameState,
    pub status: GameStatus,
    pub winning_line: Option<[usize; 3]>,
    pub opponent_pending: bool,
    pub rng_seed: u64,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn cell(&self, index: CellIndex) -> Cell {
        self.state.cell(index)
    }

    pub fn is_cell_clickable(&self, index: CellIndex) -> bool {
        self.state.is_cell_clickable(index)
    }
}

/// 1局分の三目並べセッション
pub struct GameSession {
    id: Uuid,
    state: GameState,
    strategy: Arc<dyn OpponentStrategy>,
    rng: SessionRng,
    scheduler: MoveScheduler,
    self_ref: Weak<Mutex<GameSession>>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("status", &self.state.status())
            .field("epoch", &self.state.epoch)
            .field("strategy", &self.strategy.name())
            .field("seed", &self.rng.seed())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl GameSession {
    /// ランダムな相手で新しいセッションを作成する
    pub fn spawn(options: SessionOptions) -> SharedSession {
        Self::spawn_with_strategy(Uuid::new_v4(), options, Arc::new(RandomOpponent::new()))
    }

    /// 指定した相手の戦略で新しいセッションを作成する
    pub fn spawn_with_strategy(
        id: Uuid,
        options: SessionOptions,
        strategy: Arc<dyn OpponentStrategy>,
    ) -> SharedSession {
        let now = Utc::now();
        Arc::new_cyclic(|self_ref| {
            Mutex::new(GameSession {
                id,
                state: GameState::new(),
                strategy,
                rng: SessionRng::from_seed(options.rng_seed),
                scheduler: MoveScheduler::new(options.opponent_delay),
                self_ref: self_ref.clone(),
                created_at: now,
                last_activity: now,
            })
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// 指定したマスの表示内容
    pub fn cell_display(&self, index: CellIndex) -> Cell {
        self.state.cell(index)
    }

    /// 現在の進行状態
    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn is_cell_clickable(&self, index: CellIndex) -> bool {
        self.state.is_cell_clickable(index)
    }

    pub fn is_opponent_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// 人間のクリックを処理する
    ///
    /// 範囲外の番号、埋まったマス、手番外、決着後のクリックは何もしない。
    /// 着手が適用された場合はtrueを返す。相手の手の予約にtokioランタイムが必要。
    pub fn on_cell_activated(&mut self, index: usize) -> bool {
        let Some(index) = CellIndex::new(index) else {
            debug!(session_id = %self.id, index, "範囲外のクリックを無視しました");
            return false;
        };

        let transition = TurnController::transition(&self.state, GameEvent::HumanMove(index));
        if !transition.changed {
            debug!(session_id = %self.id, index = %index, "無効なクリックを無視しました");
            return false;
        }

        self.last_activity = Utc::now();
        self.commit(transition);
        true
    }

    /// ゲームを初期状態に戻す
    /// 予約中の相手の手は取り消され、世代番号が進む
    pub fn on_restart(&mut self) {
        let transition = TurnController::transition(&self.state, GameEvent::Restart);
        self.last_activity = Utc::now();
        self.commit(transition);
        info!(session_id = %self.id, epoch = self.state.epoch, "ゲームをリスタートしました");
    }

    /// セッションを閉じる (アンマウント)
    /// 予約中の相手の手を取り消す
    pub fn shutdown(&mut self) {
        if self.scheduler.cancel() {
            debug!(session_id = %self.id, "終了時に相手の着手を取り消しました");
        }
    }

    /// 予約された相手の手を実行する
    ///
    /// 予約時と世代が異なる場合や相手の手番でない場合は何もしない。
    /// 置ける場所がない場合も何もしない。実行した場合は選んだマスを返す。
    pub fn resolve_opponent_move(&mut self, epoch: u64) -> Option<CellIndex> {
        self.scheduler.complete(epoch);

        if epoch != self.state.epoch || self.state.status() != GameStatus::OpponentTurn {
            debug!(session_id = %self.id, epoch, current = self.state.epoch, "古い相手の着手を破棄しました");
            return None;
        }

        let Some(index) = self.strategy.choose_move(&self.state.board, &mut self.rng) else {
            debug!(session_id = %self.id, "相手が置ける場所がありません");
            return None;
        };

        let transition =
            TurnController::transition(&self.state, GameEvent::OpponentMove { epoch, index });
        if !transition.changed {
            return None;
        }

        self.commit(transition);
        Some(index)
    }

    /// 遷移結果を反映し、副作用を実行する
    fn commit(&mut self, transition: Transition) {
        let Transition { state, effect, .. } = transition;
        self.state = state;

        match effect {
            Effect::ScheduleOpponent { epoch } => self.schedule_opponent(epoch),
            Effect::CancelPending => {
                self.scheduler.cancel();
            }
            Effect::None => {}
        }

        if self.state.status().is_terminal() {
            info!(
                session_id = %self.id,
                status = self.state.status().label(),
                "ゲームが終了しました\n{}",
                self.state.board.display()
            );
        }
    }

    fn schedule_opponent(&mut self, epoch: u64) {
        let session = self.self_ref.clone();
        self.scheduler.schedule(epoch, async move {
            // セッションが破棄されていれば何もしない
            if let Some(session) = session.upgrade() {
                session.lock().await.resolve_opponent_move(epoch);
            }
        });
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            state: self.state.clone(),
            status: self.state.status(),
            winning_line: TicTacToeRules::winning_line(&self.state.board),
            opponent_pending: self.scheduler.is_pending(),
            rng_seed: self.rng.seed(),
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }
}
