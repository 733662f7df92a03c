use crate::game::{Board, Cell, Player};

/// What a renderer draws in one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCell {
    Empty,
    Chip(Player),
    /// Where the hovering player's chip would land
    Preview(Player),
}

impl DisplayCell {
    /// Numeric form: 0 empty, player id for a chip, negated id for a preview
    pub fn value(self) -> i8 {
        match self {
            DisplayCell::Empty => 0,
            DisplayCell::Chip(player) => player.id() as i8,
            DisplayCell::Preview(player) => -(player.id() as i8),
        }
    }
}

impl From<Cell> for DisplayCell {
    fn from(cell: Cell) -> Self {
        cell.player().map_or(DisplayCell::Empty, DisplayCell::Chip)
    }
}

/// Column-major projection of the board for rendering, with an optional
/// preview chip overlaid. Rebuilt from the canonical board every frame and
/// never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBoard {
    columns: Vec<Vec<DisplayCell>>,
}

impl DisplayBoard {
    /// Project `board`, previewing `player`'s chip under `hover` if that
    /// column has room.
    pub fn project(board: &Board, hover: Option<(usize, Player)>) -> Self {
        let mut columns: Vec<Vec<DisplayCell>> = board
            .transposed()
            .into_iter()
            .map(|column| column.into_iter().map(DisplayCell::from).collect())
            .collect();

        if let Some((col, player)) = hover {
            if let Ok(Some(row)) = board.landing_row(col) {
                columns[col][row] = DisplayCell::Preview(player);
            }
        }
        DisplayBoard { columns }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Cell at `row` (0 = top) of `col`
    pub fn cell(&self, row: usize, col: usize) -> DisplayCell {
        self.columns[col][row]
    }

    pub fn columns(&self) -> &[Vec<DisplayCell>] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameEngine, COLS, ROWS};

    #[test]
    fn test_projection_is_column_major() {
        let mut engine = GameEngine::default();
        engine.apply_move(Player::Red, 2).unwrap();
        let display = DisplayBoard::project(engine.board(), None);

        assert_eq!(display.width(), COLS);
        assert_eq!(display.height(), ROWS);
        assert_eq!(display.columns()[2][ROWS - 1], DisplayCell::Chip(Player::Red));
        assert_eq!(display.cell(ROWS - 1, 2).value(), 1);
    }

    #[test]
    fn test_preview_sits_on_landing_row() {
        let mut engine = GameEngine::default();
        engine.apply_move(Player::Red, 4).unwrap();
        let display = DisplayBoard::project(engine.board(), Some((4, Player::Yellow)));

        assert_eq!(display.cell(ROWS - 2, 4), DisplayCell::Preview(Player::Yellow));
        assert_eq!(display.cell(ROWS - 2, 4).value(), -2);
        assert_eq!(display.cell(ROWS - 1, 4), DisplayCell::Chip(Player::Red));
    }

    #[test]
    fn test_preview_never_touches_board() {
        let mut engine = GameEngine::default();
        for _ in 0..3 {
            engine.apply_move(Player::Red, 0).unwrap();
        }
        let before = engine.clone();
        // The preview would complete four in a row if it leaked into the board.
        let _ = DisplayBoard::project(engine.board(), Some((0, Player::Red)));
        assert_eq!(engine, before);
        assert_eq!(engine.evaluate_win(), None);
    }

    #[test]
    fn test_no_preview_on_full_column() {
        let mut engine = GameEngine::default();
        for i in 0..ROWS {
            let player = if i % 2 == 0 { Player::Red } else { Player::Yellow };
            engine.apply_move(player, 6).unwrap();
        }
        let display = DisplayBoard::project(engine.board(), Some((6, Player::Red)));
        assert!(display.columns()[6]
            .iter()
            .all(|cell| matches!(cell, DisplayCell::Chip(_))));
        assert_eq!(display, DisplayBoard::project(engine.board(), None));
    }
}
