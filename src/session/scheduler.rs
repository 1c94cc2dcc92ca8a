//! 相手の着手の遅延実行モジュール
//! 人間の着手後、一定時間待ってから相手の手を打つタスクを管理する。
//! 予約は常に高々1件で、取り消し・ドロップ時にはタスクを中断する。

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// 予約中のタスク
#[derive(Debug)]
struct PendingMove {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// 相手の着手を遅延実行するスケジューラ
#[derive(Debug)]
pub struct MoveScheduler {
    delay: Duration,
    pending: Option<PendingMove>,
}

impl MoveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 遅延後に `task` を実行するよう予約する
    ///
    /// 既存の予約があれば中断してから置き換える。
    /// tokioランタイム内から呼び出す必要がある。
    pub fn schedule<F>(&mut self, epoch: u64, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        debug!(epoch, delay_ms = delay.as_millis() as u64, "相手の着手を予約しました");
        self.pending = Some(PendingMove { epoch, handle });
    }

    /// 予約を取り消す
    /// 取り消した予約があった場合はtrueを返す
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) if !pending.handle.is_finished() => {
                pending.handle.abort();
                debug!(epoch = pending.epoch, "相手の着手の予約を取り消しました");
                true
            }
            _ => false,
        }
    }

    /// 実行待ちの予約があるか
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    /// 予約中の世代番号
    pub fn pending_epoch(&self) -> Option<u64> {
        self.pending
            .as_ref()
            .filter(|pending| !pending.handle.is_finished())
            .map(|pending| pending.epoch)
    }

    /// 予約が実行されたあとに呼び出し、記録を片付ける
    pub(crate) fn complete(&mut self, epoch: u64) {
        if self.pending.as_ref().is_some_and(|pending| pending.epoch == epoch) {
            self.pending = None;
        }
    }
}

impl Drop for MoveScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
