//! Connect-4: 7 columns x 6 rows, gravity-drop, four-in-a-row wins.
//!
//! Board is column-major per distilled spec §3: 42 cells, top row index 0,
//! index = row * 7 + col.
use crate::Rules;
use crate::RuleError;
use crate::Status;
use arena_core::Position;

pub const COLS: usize = 7;
pub const ROWS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Piece {
    Red,
    Blue,
}

impl Piece {
    pub fn other(self) -> Self {
        match self {
            Piece::Red => Piece::Blue,
            Piece::Blue => Piece::Red,
        }
    }
    pub fn seat(self) -> Position {
        match self {
            Piece::Red => 0,
            Piece::Blue => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct State {
    pub cells: [Option<Piece>; COLS * ROWS],
    pub turn: Piece,
    pub status: Status,
    pub history: Vec<usize>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config;

pub struct Connect4;

/// Lowest empty row in `col`, or `None` if the column is full.
fn drop_row(cells: &[Option<Piece>; COLS * ROWS], col: usize) -> Option<usize> {
    (0..ROWS).rev().find(|&row| cells[row * COLS + col].is_none())
}

fn four_in_a_row_through(cells: &[Option<Piece>; COLS * ROWS], row: usize, col: usize) -> bool {
    let piece = match cells[row * COLS + col] {
        Some(p) => p,
        None => return false,
    };
    let directions: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
    directions.iter().any(|&(dr, dc)| {
        let mut count = 1;
        count += run_length(cells, row, col, dr, dc, piece);
        count += run_length(cells, row, col, -dr, -dc, piece);
        count >= 4
    })
}

fn run_length(
    cells: &[Option<Piece>; COLS * ROWS],
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    piece: Piece,
) -> usize {
    let mut r = row as isize + dr;
    let mut c = col as isize + dc;
    let mut n = 0;
    while r >= 0 && r < ROWS as isize && c >= 0 && c < COLS as isize {
        if cells[r as usize * COLS + c as usize] == Some(piece) {
            n += 1;
            r += dr;
            c += dc;
        } else {
            break;
        }
    }
    n
}

impl Rules for Connect4 {
    type State = State;
    type Move = usize;
    type Config = Config;

    fn initial(_config: Config) -> State {
        State {
            cells: [None; COLS * ROWS],
            turn: Piece::Red,
            status: Status::InProgress,
            history: Vec::new(),
        }
    }

    fn legal_moves(state: &State) -> Vec<usize> {
        if state.status.is_terminal() {
            return Vec::new();
        }
        (0..COLS)
            .filter(|&c| drop_row(&state.cells, c).is_some())
            .collect()
    }

    fn turn(state: &State) -> Position {
        state.turn.seat()
    }

    fn status(state: &State) -> Status {
        state.status
    }

    fn apply(state: &State, col: usize) -> Result<(State, Status), RuleError> {
        if state.status.is_terminal() {
            return Err(RuleError::GameOver);
        }
        if col >= COLS {
            return Err(RuleError::OutOfBounds);
        }
        let row = drop_row(&state.cells, col).ok_or(RuleError::ColumnFull)?;
        let mut cells = state.cells;
        cells[row * COLS + col] = Some(state.turn);
        let status = if four_in_a_row_through(&cells, row, col) {
            Status::Won {
                winner: state.turn.seat(),
            }
        } else if cells.iter().all(|c| c.is_some()) {
            Status::Draw
        } else {
            Status::InProgress
        };
        let mut history = state.history.clone();
        history.push(col);
        Ok((
            State {
                cells,
                turn: state.turn.other(),
                status,
                history,
            },
            status,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_board_has_seven_legal_moves() {
        let state = Connect4::initial(Config);
        assert_eq!(Connect4::legal_moves(&state).len(), COLS);
    }

    /// Red has [Red,Red,Red,_,_,_,_] in the bottom row; submitting column 3
    /// wins immediately at cell index 5*7+3 = 38 (distilled spec §8, scenario 1).
    #[test]
    fn bottom_row_three_in_a_row_wins_on_fourth() {
        let mut state = Connect4::initial(Config);
        // Red drops in 0, 1, 2; Blue drops somewhere irrelevant between.
        for (col, mover) in [(0, Piece::Red), (4, Piece::Blue), (1, Piece::Red), (5, Piece::Blue), (2, Piece::Red)] {
            assert_eq!(state.turn, mover);
            state = Connect4::apply(&state, col).expect("legal move").0;
        }
        assert_eq!(state.turn, Piece::Blue);
        // Blue plays an irrelevant move so it's Red's turn again.
        state = Connect4::apply(&state, 6).expect("legal move").0;
        let (state, status) = Connect4::apply(&state, 3).expect("legal move");
        assert_eq!(status, Status::Won { winner: Piece::Red.seat() });
        assert_eq!(state.cells[5 * COLS + 3], Some(Piece::Red));
    }

    #[test]
    fn full_column_is_illegal() {
        let mut state = Connect4::initial(Config);
        for _ in 0..ROWS {
            state = Connect4::apply(&state, 0).expect("legal move").0;
        }
        assert_eq!(Connect4::apply(&state, 0), Err(RuleError::ColumnFull));
    }
}
