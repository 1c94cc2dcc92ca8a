//! 三目並べの勝敗判定モジュール
//! 8本のライン(3行、3列、2対角線)を調べて勝者と引き分けを判定する。
//! 全て副作用のない純粋関数として提供する。

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::types::{CellIndex, Player};

/// 勝利ライン (行、列、対角線の順)
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // 行
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // 列
    [0, 4, 8], [2, 4, 6],            // 対角線
];

/// 盤面から判定したゲームの帰結
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won(Player),
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// 三目並べのルールを実装する構造体
/// スタティックメソッドのみを提供する
pub struct TicTacToeRules;

impl TicTacToeRules {
    /// 3マスが全て埋まり同じ印で揃っている最初のラインを返す
    pub fn winning_line(board: &Board) -> Option<[usize; 3]> {
        let cells = board.cells();

        WIN_LINES.iter().copied().find(|&[a, b, c]| {
            !cells[a].is_empty() && cells[a] == cells[b] && cells[a] == cells[c]
        })
    }

    /// 勝者を判定する
    /// 空マスを含むラインは勝利とみなさない
    pub fn check_winner(board: &Board) -> Option<Player> {
        Self::winning_line(board).and_then(|[a, _, _]| board.cells()[a].owner())
    }

    /// 勝者がおらず全マスが埋まっている場合に引き分け
    pub fn is_draw(board: &Board) -> bool {
        Self::check_winner(board).is_none() && board.is_full()
    }

    /// 勝敗判定をまとめて行う
    /// 勝者判定を満杯判定より優先する(最後の一手で揃った場合は勝利)
    pub fn evaluate(board: &Board) -> Outcome {
        match Self::check_winner(board) {
            Some(winner) => Outcome::Won(winner),
            None if board.is_full() => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }

    /// 指定したマスに置けるかチェックする
    pub fn is_legal_move(board: &Board, index: CellIndex) -> bool {
        Self::evaluate(board) == Outcome::InProgress && board.is_empty(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Cell, CELL_COUNT};

    const E: Cell = Cell::Empty;
    const H: Cell = Cell::Human;
    const O: Cell = Cell::Opponent;

    fn board(cells: [Cell; CELL_COUNT]) -> Board {
        Board::from_cells(cells)
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        let board = Board::new();
        assert_eq!(TicTacToeRules::check_winner(&board), None);
        assert_eq!(TicTacToeRules::evaluate(&board), Outcome::InProgress);
        assert!(!TicTacToeRules::is_draw(&board));
    }

    #[test]
    fn test_every_line_wins() {
        for line in WIN_LINES {
            let mut cells = [E; CELL_COUNT];
            for i in line {
                cells[i] = O;
            }
            let board = board(cells);
            assert_eq!(TicTacToeRules::check_winner(&board), Some(Player::Opponent), "line {:?}", line);
            assert_eq!(TicTacToeRules::winning_line(&board), Some(line));
        }
    }

    #[test]
    fn test_top_row_human_win() {
        let board = board([H, H, H, O, O, E, E, E, E]);
        assert_eq!(TicTacToeRules::check_winner(&board), Some(Player::Human));
        assert_eq!(TicTacToeRules::evaluate(&board), Outcome::Won(Player::Human));
    }

    #[test]
    fn test_mixed_line_does_not_win() {
        let board = board([H, O, H, E, E, E, E, E, E]);
        assert_eq!(TicTacToeRules::check_winner(&board), None);
    }

    #[test]
    fn test_draw_board() {
        // H O H
        // H O O
        // O H H
        let board = board([H, O, H, H, O, O, O, H, H]);
        assert_eq!(TicTacToeRules::check_winner(&board), None);
        assert!(TicTacToeRules::is_draw(&board));
        assert_eq!(TicTacToeRules::evaluate(&board), Outcome::Draw);
        assert!(Outcome::Draw.is_terminal());
    }

    #[test]
    fn test_win_on_full_board_is_not_draw() {
        // H H H
        // O O H
        // H O O
        let board = board([H, H, H, O, O, H, H, O, O]);
        assert!(board.is_full());
        assert!(!TicTacToeRules::is_draw(&board));
        assert_eq!(TicTacToeRules::evaluate(&board), Outcome::Won(Player::Human));
    }

    #[test]
    fn test_is_legal_move() {
        let board = board([H, E, E, E, E, E, E, E, E]);
        assert!(!TicTacToeRules::is_legal_move(&board, CellIndex::new(0).unwrap()));
        assert!(TicTacToeRules::is_legal_move(&board, CellIndex::new(1).unwrap()));

        let finished = self::board([H, H, H, O, O, E, E, E, E]);
        assert!(!TicTacToeRules::is_legal_move(&finished, CellIndex::new(8).unwrap()));
    }
}
