//! ゲームの基本型定義モジュール
//! 三目並べで使用されるセル、プレイヤー、セル番号を定義する。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 盤面のマス数
pub const CELL_COUNT: usize = 9;

/// 盤面の一辺の長さ
pub const BOARD_SIZE: usize = 3;

/// 盤面の各マスの状態を表現するenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Human,
    Opponent,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// セルに置かれている印の持ち主を返す
    /// 空マスの場合はNoneを返す
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Human => Some(Player::Human),
            Cell::Opponent => Some(Player::Opponent),
        }
    }
}

/// ゲームのプレイヤーを表すenum
/// 先手は人間、後手はコンピュータ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    Human,
    Opponent,
}

impl Player {
    /// 相手プレイヤーを返す
    pub fn opposite(self) -> Player {
        match self {
            Player::Human => Player::Opponent,
            Player::Opponent => Player::Human,
        }
    }

    /// プレイヤーを対応するセル状態に変換する
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Human => Cell::Human,
            Player::Opponent => Cell::Opponent,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Human => "Human",
            Player::Opponent => "Opponent",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 3x3盤面上のマス番号 (0-8, 行優先)
/// 範囲外の番号は構築できない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct CellIndex(usize);

impl CellIndex {
    /// 範囲チェック付きのコンストラクタ
    /// 0-8の範囲外の場合はNoneを返す
    pub fn new(index: usize) -> Option<CellIndex> {
        if index < CELL_COUNT {
            Some(CellIndex(index))
        } else {
            None
        }
    }

    /// 行・列からマス番号を作成する
    pub fn from_row_col(row: usize, col: usize) -> Option<CellIndex> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(CellIndex(row * BOARD_SIZE + col))
        } else {
            None
        }
    }

    /// 全マス番号を昇順で返す
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..CELL_COUNT).map(CellIndex)
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn row(self) -> usize {
        self.0 / BOARD_SIZE
    }

    pub fn col(self) -> usize {
        self.0 % BOARD_SIZE
    }
}

impl TryFrom<usize> for CellIndex {
    type Error = String;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        CellIndex::new(index).ok_or_else(|| format!("マス番号が範囲外です: {} (有効範囲: 0-8)", index))
    }
}

impl From<CellIndex> for usize {
    fn from(index: CellIndex) -> Self {
        index.0
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opposite() {
        assert_eq!(Player::Human.opposite(), Player::Opponent);
        assert_eq!(Player::Opponent.opposite(), Player::Human);
    }

    #[test]
    fn test_player_to_cell() {
        assert_eq!(Player::Human.to_cell(), Cell::Human);
        assert_eq!(Player::Opponent.to_cell(), Cell::Opponent);
    }

    #[test]
    fn test_cell_owner() {
        assert_eq!(Cell::Empty.owner(), None);
        assert_eq!(Cell::Human.owner(), Some(Player::Human));
        assert_eq!(Cell::Opponent.owner(), Some(Player::Opponent));
        assert!(Cell::default().is_empty());
    }

    #[test]
    fn test_cell_index_new_valid() {
        let index = CellIndex::new(4).unwrap();
        assert_eq!(index.get(), 4);
        assert_eq!(index.row(), 1);
        assert_eq!(index.col(), 1);
    }

    #[test]
    fn test_cell_index_new_invalid() {
        assert!(CellIndex::new(9).is_none());
        assert!(CellIndex::new(100).is_none());
        assert!(CellIndex::from_row_col(3, 0).is_none());
        assert!(CellIndex::from_row_col(0, 3).is_none());
    }

    #[test]
    fn test_cell_index_row_major() {
        assert_eq!(CellIndex::from_row_col(0, 2).unwrap().get(), 2);
        assert_eq!(CellIndex::from_row_col(2, 0).unwrap().get(), 6);
        assert_eq!(CellIndex::all().count(), CELL_COUNT);
    }

    #[test]
    fn test_cell_index_serde() {
        let index: CellIndex = serde_json::from_str("8").unwrap();
        assert_eq!(index.get(), 8);
        assert!(serde_json::from_str::<CellIndex>("9").is_err());
        assert_eq!(serde_json::to_string(&index).unwrap(), "8");
    }
}
