//! 三目並べの盤面状態を管理するモジュール
//! 3x3グリッド(行優先の9マス)の印の配置と操作を担当する。

use super::types::{Cell, CellIndex, Player, CELL_COUNT, BOARD_SIZE};
use serde::{Deserialize, Serialize};

/// 3x3盤面を表現する構造体
/// 一度埋まったマスはリセット以外で空に戻らない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// 全マスが空の盤面を作成する
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// 任意の配置から盤面を作成する
    /// テストや盤面の復元で使用
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Board { cells }
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// 指定したマスのセル状態を取得する
    pub fn get_cell(&self, index: CellIndex) -> Cell {
        self.cells[index.get()]
    }

    /// 指定したマスが空かチェックする
    pub fn is_empty(&self, index: CellIndex) -> bool {
        self.get_cell(index).is_empty()
    }

    /// 空マスにプレイヤーの印を置く
    /// 既に埋まっているマスの場合は何もせずfalseを返す
    pub fn place(&mut self, index: CellIndex, player: Player) -> bool {
        if !self.is_empty(index) {
            return false;
        }
        self.cells[index.get()] = player.to_cell();
        true
    }

    /// 空マスの番号を昇順で返す
    pub fn empty_cells(&self) -> Vec<CellIndex> {
        CellIndex::all().filter(|&index| self.is_empty(index)).collect()
    }

    /// 全マスが埋まっているかチェックする
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// 盤面上の印の数を数える
    /// 戻り値: (人間の印数, 相手の印数)
    pub fn count_marks(&self) -> (u8, u8) {
        let mut human_count = 0;
        let mut opponent_count = 0;

        for &cell in &self.cells {
            match cell {
                Cell::Human => human_count += 1,
                Cell::Opponent => opponent_count += 1,
                Cell::Empty => {}
            }
        }

        (human_count, opponent_count)
    }

    /// 置かれている印の総数
    pub fn mark_count(&self) -> u8 {
        let (human, opponent) = self.count_marks();
        human + opponent
    }

    /// デバッグ用の盤面表示文字列を生成する
    /// Hで人間、Oで相手、.で空マスを表現
    pub fn display(&self) -> String {
        let mut result = String::new();

        for row in 0..BOARD_SIZE {
            let line: Vec<&str> = (0..BOARD_SIZE)
                .filter_map(|col| CellIndex::from_row_col(row, col))
                .map(|index| match self.get_cell(index) {
                    Cell::Empty => ".",
                    Cell::Human => "H",
                    Cell::Opponent => "O",
                })
                .collect();
            result.push_str(&line.join(" "));
            result.push('\n');
        }

        result
    }
}
