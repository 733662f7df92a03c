use super::player::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Shortest run of cells that can hold a connect-four.
pub const CONNECT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    /// Numeric form of the cell: 0 = empty, 1 = Red, 2 = Yellow
    pub fn value(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Red => 1,
            Cell::Yellow => 2,
        }
    }

    /// The player owning this cell, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some(Player::Red),
            Cell::Yellow => Some(Player::Yellow),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("{axis} index {index} out of range 0..{len}")]
    OutOfRange {
        axis: &'static str,
        index: usize,
        len: usize,
    },

    #[error("board must be at least {min}x{min}, got {height}x{width}", min = CONNECT)]
    TooSmall { height: usize, width: usize },

    #[error("expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },

    #[error("chip at line {line}, column {column} has an empty cell below it")]
    Floating { line: usize, column: usize },
}

/// Grid of cells, row 0 at the top. Stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board of the given size
    pub fn new(height: usize, width: usize) -> Result<Self, BoardError> {
        if height < CONNECT || width < CONNECT {
            return Err(BoardError::TooSmall { height, width });
        }
        Ok(Board {
            height,
            width,
            cells: vec![Cell::Empty; height * width],
        })
    }

    /// The canonical 6x7 board
    pub fn standard() -> Self {
        Board {
            height: ROWS,
            width: COLS,
            cells: vec![Cell::Empty; ROWS * COLS],
        }
    }

    /// Build a board from row-major cells, top row first.
    ///
    /// Rejects boards where a chip sits above an empty cell.
    pub fn from_cells(height: usize, width: usize, cells: Vec<Cell>) -> Result<Self, BoardError> {
        let mut board = Board::new(height, width)?;
        if cells.len() != height * width {
            return Err(BoardError::CellCount {
                expected: height * width,
                actual: cells.len(),
            });
        }
        board.cells = cells;

        for line in 0..height - 1 {
            for column in 0..width {
                if !board.get(line, column).is_empty() && board.get(line + 1, column).is_empty() {
                    return Err(BoardError::Floating { line, column });
                }
            }
        }
        Ok(board)
    }

    /// An empty board of the same size
    pub fn cleared(&self) -> Board {
        Board {
            height: self.height,
            width: self.width,
            cells: vec![Cell::Empty; self.height * self.width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the cell at a specific position.
    /// Row 0 is the top. Panics if the position is off the board.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) is outside the {}x{} board",
            self.height,
            self.width
        );
        self.cells[row * self.width + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let width = self.width;
        self.cells[row * width + col] = cell;
    }

    /// Cells of one column, top row first
    pub fn column(&self, index: usize) -> Result<Vec<Cell>, BoardError> {
        if index >= self.width {
            return Err(BoardError::OutOfRange {
                axis: "column",
                index,
                len: self.width,
            });
        }
        Ok((0..self.height).map(|row| self.get(row, index)).collect())
    }

    /// Cells of one row (line), left to right
    pub fn line(&self, index: usize) -> Result<Vec<Cell>, BoardError> {
        if index >= self.height {
            return Err(BoardError::OutOfRange {
                axis: "line",
                index,
                len: self.height,
            });
        }
        let start = index * self.width;
        Ok(self.cells[start..start + self.width].to_vec())
    }

    /// Row where a chip dropped into `column` would land, or `None` if the
    /// column is full. `column` is a top-to-bottom column as returned by
    /// [`Board::column`].
    pub fn lowest_empty_row(column: &[Cell]) -> Option<usize> {
        match column.first() {
            Some(top) if top.is_empty() => {}
            _ => return None,
        }
        (0..column.len()).find(|&row| row + 1 == column.len() || !column[row + 1].is_empty())
    }

    /// Landing row for a column of this board
    pub fn landing_row(&self, column: usize) -> Result<Option<usize>, BoardError> {
        Ok(Self::lowest_empty_row(&self.column(column)?))
    }

    /// Check if a column is full. Columns off the board count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.width {
            return true;
        }
        !self.get(0, col).is_empty()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.width).all(|col| self.is_column_full(col))
    }

    pub fn chip_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Every row, top to bottom
    pub fn all_lines(&self) -> Vec<Vec<Cell>> {
        self.cells
            .chunks(self.width)
            .map(<[Cell]>::to_vec)
            .collect()
    }

    /// Every column, left to right
    pub fn all_columns(&self) -> Vec<Vec<Cell>> {
        (0..self.width)
            .map(|col| (0..self.height).map(|row| self.get(row, col)).collect())
            .collect()
    }

    /// Every maximal diagonal of at least four cells: descending-left runs
    /// first, then descending-right runs.
    pub fn all_diagonals(&self) -> Vec<Vec<Cell>> {
        let mut diagonals = self.diagonals_descending_left();
        diagonals.extend(self.diagonals_descending_right());
        diagonals
    }

    /// Lines, then columns, then diagonals
    pub fn all_runs(&self) -> Vec<Vec<Cell>> {
        let mut runs = self.all_lines();
        runs.extend(self.all_columns());
        runs.extend(self.all_diagonals());
        runs
    }

    /// Column-major copy of the board, as handed to renderers
    pub fn transposed(&self) -> Vec<Vec<Cell>> {
        self.all_columns()
    }

    fn diagonals_descending_right(&self) -> Vec<Vec<Cell>> {
        let starts = (0..=self.width - CONNECT)
            .map(|col| (0, col))
            .chain((1..=self.height - CONNECT).map(|row| (row, 0)));

        starts
            .filter_map(|(row, col)| {
                let len = (self.height - row).min(self.width - col);
                (len >= CONNECT).then(|| (0..len).map(|i| self.get(row + i, col + i)).collect())
            })
            .collect()
    }

    fn diagonals_descending_left(&self) -> Vec<Vec<Cell>> {
        let starts = (0..=self.width - CONNECT)
            .map(|offset| (0, self.width - 1 - offset))
            .chain((1..=self.height - CONNECT).map(|row| (row, self.width - 1)));

        starts
            .filter_map(|(row, col)| {
                let len = (self.height - row).min(col + 1);
                (len >= CONNECT).then(|| (0..len).map(|i| self.get(row + i, col - i)).collect())
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
