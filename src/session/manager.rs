//! ゲームセッション管理モジュール
//! ブラウザ上にマウントされたウィジェット毎のセッションを管理し、
//! セッション数制限、タイムアウト処理、クリーンアップを担当する。

use dashmap::DashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ai::{OpponentStrategy, RandomOpponent};
use crate::config::Config;
use crate::error::{GameError, Result};
use crate::game::GameStatus;

use super::game_session::{GameSession, SessionOptions, SessionSnapshot, SharedSession};

/// ゲームセッションの管理を行うメイン構造体
/// スレッドセーフなDashMapで同時アクセスを効率的に処理
#[derive(Clone)]
pub struct SessionManager {
    /// アクティブセッションのコレクション
    sessions: Arc<DashMap<Uuid, SharedSession>>,
    /// 確保済みのセッション枠の数 (作成中のものを含む)
    reserved: Arc<AtomicUsize>,
    /// 同時存在可能な最大セッション数
    max_sessions: usize,
    /// セッションのタイムアウト時間（分）
    session_timeout_minutes: i64,
    /// 新規セッションに渡すオプション
    options: SessionOptions,
    /// 新規セッションの相手の戦略
    strategy: Arc<dyn OpponentStrategy>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("sessions", &self.sessions.len())
            .field("reserved", &self.reserved.load(Ordering::Relaxed))
            .field("max_sessions", &self.max_sessions)
            .field("session_timeout_minutes", &self.session_timeout_minutes)
            .field("options", &self.options)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl SessionManager {
    /// デフォルトタイムアウト（30分）でセッションマネージャーを作成
    pub fn new(max_sessions: usize, options: SessionOptions) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            reserved: Arc::new(AtomicUsize::new(0)),
            max_sessions,
            session_timeout_minutes: 30,
            options,
            strategy: Arc::new(RandomOpponent::new()),
        }
    }

    /// 設定からセッションマネージャーを作成
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sessions.max_sessions, SessionOptions::from(&config.game))
            .with_timeout(config.sessions.session_timeout_minutes)
    }

    /// カスタムタイムアウトを設定する
    pub fn with_timeout(mut self, timeout_minutes: i64) -> Self {
        self.session_timeout_minutes = timeout_minutes;
        self
    }

    /// 相手の戦略を差し替える
    pub fn with_strategy(mut self, strategy: Arc<dyn OpponentStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// 新しいゲームセッションを作成する (マウント)
    /// 最大セッション数に達している場合はエラーを返す
    pub fn create_session(&self) -> Result<(Uuid, SharedSession)> {
        // 上限の確認と枠の確保を1回の比較交換で行う
        let max_sessions = self.max_sessions;
        if self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < max_sessions).then_some(count + 1)
            })
            .is_err()
        {
            return Err(GameError::SessionLimitExceeded { max: max_sessions });
        }

        let session_id = Uuid::new_v4();
        let session = GameSession::spawn_with_strategy(
            session_id,
            self.options.clone(),
            Arc::clone(&self.strategy),
        );

        self.sessions.insert(session_id, Arc::clone(&session));
        info!(%session_id, total = self.sessions.len(), "セッションを作成しました");

        Ok((session_id, session))
    }

    /// 指定したIDのセッションを取得する
    pub fn get_session(&self, session_id: &Uuid) -> Result<SharedSession> {
        match self.sessions.get(session_id) {
            Some(session) => Ok(Arc::clone(session.value())),
            None => Err(GameError::SessionNotFound { session_id: *session_id }),
        }
    }

    /// セッションを削除する (アンマウント)
    /// 予約中の相手の手は取り消される
    pub async fn remove_session(&self, session_id: &Uuid) -> Result<SessionSnapshot> {
        match self.sessions.remove(session_id) {
            Some((_, session)) => {
                self.release_slot();
                let mut session = session.lock().await;
                session.shutdown();
                info!(%session_id, "セッションを削除しました");
                Ok(session.snapshot())
            }
            None => Err(GameError::SessionNotFound { session_id: *session_id }),
        }
    }

    /// 全セッションのスナップショットを取得する
    pub async fn list_sessions(&self) -> Vec<SessionSnapshot> {
        let mut snapshots = Vec::with_capacity(self.sessions.len());
        for session in self.handles() {
            snapshots.push(session.lock().await.snapshot());
        }
        snapshots.sort_by_key(|snapshot| snapshot.created_at);
        snapshots
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_exists(&self, session_id: &Uuid) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// 一定時間操作のないセッションを削除する
    pub async fn cleanup_inactive_sessions(&self) -> usize {
        let cutoff_time = match Duration::try_minutes(self.session_timeout_minutes)
            .filter(|timeout| *timeout >= Duration::zero())
            .and_then(|timeout| Utc::now().checked_sub_signed(timeout))
        {
            Some(cutoff_time) => cutoff_time,
            None => {
                warn!(
                    timeout_minutes = self.session_timeout_minutes,
                    "タイムアウト値が不正なためクリーンアップを行いません"
                );
                return 0;
            }
        };
        let mut removed_count = 0;

        for session in self.handles() {
            let mut session = session.lock().await;
            if session.last_activity() < cutoff_time && self.sessions.remove(&session.id()).is_some() {
                self.release_slot();
                session.shutdown();
                removed_count += 1;
            }
        }

        if removed_count > 0 {
            info!(removed_count, "非アクティブなセッションを削除しました");
        } else {
            debug!("削除対象のセッションはありません");
        }
        removed_count
    }

    /// セッション統計を取得する
    pub async fn get_stats(&self) -> SessionStats {
        let mut stats = SessionStats {
            total_sessions: self.sessions.len(),
            max_sessions: self.max_sessions,
            ..SessionStats::default()
        };

        for session in self.handles() {
            match session.lock().await.status() {
                GameStatus::HumanTurn => stats.human_turn_count += 1,
                GameStatus::OpponentTurn => stats.opponent_thinking_count += 1,
                GameStatus::WonBy(_) | GameStatus::Draw => stats.finished_count += 1,
            }
        }

        stats
    }

    fn release_slot(&self) {
        self.reserved.fetch_sub(1, Ordering::AcqRel);
    }

    /// ロックを待つ前にDashMapのガードを手放すため、ハンドルを複製して返す
    fn handles(&self) -> Vec<SharedSession> {
        self.sessions.iter().map(|entry| Arc::clone(entry.value())).collect()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(100, SessionOptions::default())
    }
}

#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub max_sessions: usize,
    pub human_turn_count: usize,
    pub opponent_thinking_count: usize,
    pub finished_count: usize,
}
