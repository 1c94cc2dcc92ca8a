//! 相手の着手選択モジュール
//! 合法手(空マス)の中から一様ランダムに1つを選ぶだけの単純な相手を提供する。
//! 先読みや勝ち筋・防御の判断は行わない。

use rand::Rng;

use crate::game::{Board, CellIndex};

use super::rng::SessionRng;

/// 候補の中から一様ランダムに1つ選ぶ
/// 候補が空の場合はNoneを返す
pub fn pick_uniform<R: Rng>(candidates: &[CellIndex], rng: &mut R) -> Option<CellIndex> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}

/// 相手の着手選択の共通インターフェース
/// テストでは決定的な実装に差し替える
pub trait OpponentStrategy: Send + Sync + std::fmt::Debug {
    /// 盤面から相手の着手を選ぶ
    /// 置ける場所がない場合はNone
    fn choose_move(&self, board: &Board, rng: &mut SessionRng) -> Option<CellIndex>;

    /// 戦略の名前を返す
    fn name(&self) -> &'static str;
}

/// 空マスからランダムに選ぶ相手
#[derive(Debug, Clone, Default)]
pub struct RandomOpponent;

impl RandomOpponent {
    pub fn new() -> Self {
        RandomOpponent
    }
}

impl OpponentStrategy for RandomOpponent {
    fn choose_move(&self, board: &Board, rng: &mut SessionRng) -> Option<CellIndex> {
        pick_uniform(&board.empty_cells(), rng)
    }

    fn name(&self) -> &'static str {
        "RandomOpponent"
    }
}
