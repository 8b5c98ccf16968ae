//! Tic-Tac-Toe: standard 3-in-a-row on a 9-cell board.
use crate::Rules;
use crate::RuleError;
use crate::Status;
use arena_core::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    X,
    O,
}

impl Mark {
    fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
    fn seat(self) -> Position {
        match self {
            Mark::X => 0,
            Mark::O => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct State {
    pub cells: [Option<Mark>; 9],
    pub turn: Mark,
    pub status: Status,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub struct TicTacToe;

impl Rules for TicTacToe {
    type State = State;
    type Move = usize;
    type Config = Config;

    fn initial(_config: Config) -> State {
        State {
            cells: [None; 9],
            turn: Mark::X,
            status: Status::InProgress,
        }
    }

    fn legal_moves(state: &State) -> Vec<usize> {
        if state.status.is_terminal() {
            return Vec::new();
        }
        (0..9).filter(|&i| state.cells[i].is_none()).collect()
    }

    fn turn(state: &State) -> Position {
        state.turn.seat()
    }

    fn status(state: &State) -> Status {
        state.status
    }

    fn apply(state: &State, mv: usize) -> Result<(State, Status), RuleError> {
        if state.status.is_terminal() {
            return Err(RuleError::GameOver);
        }
        if mv >= 9 {
            return Err(RuleError::OutOfBounds);
        }
        if state.cells[mv].is_some() {
            return Err(RuleError::CellOccupied);
        }
        let mut cells = state.cells;
        cells[mv] = Some(state.turn);
        let status = if LINES
            .iter()
            .any(|line| line.iter().all(|&c| cells[c] == Some(state.turn)))
        {
            Status::Won {
                winner: state.turn.seat(),
            }
        } else if cells.iter().all(|c| c.is_some()) {
            Status::Draw
        } else {
            Status::InProgress
        };
        Ok((
            State {
                cells,
                turn: state.turn.other(),
                status,
            },
            status,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(state: &State, mv: usize) -> State {
        TicTacToe::apply(state, mv).expect("legal move").0
    }

    #[test]
    fn fresh_board_has_nine_legal_moves() {
        let state = TicTacToe::initial(Config);
        assert_eq!(TicTacToe::legal_moves(&state).len(), 9);
    }

    #[test]
    fn top_row_wins_for_x() {
        let mut state = TicTacToe::initial(Config);
        // X: 0, 1, 2 / O: 3, 4
        for mv in [0, 3, 1, 4, 2] {
            state = play(&state, mv);
        }
        assert_eq!(
            state.status,
            Status::Won {
                winner: Mark::X.seat()
            }
        );
    }

    #[test]
    fn full_board_with_no_line_is_a_draw() {
        let mut state = TicTacToe::initial(Config);
        // X O X / X O O / O X X  -- no three in a row
        for mv in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            state = play(&state, mv);
        }
        assert_eq!(state.status, Status::Draw);
    }

    #[test]
    fn occupied_cell_is_illegal() {
        let state = TicTacToe::initial(Config);
        let state = play(&state, 0);
        assert_eq!(TicTacToe::apply(&state, 0), Err(RuleError::CellOccupied));
    }

    #[test]
    fn terminal_state_rejects_further_moves() {
        let mut state = TicTacToe::initial(Config);
        for mv in [0, 3, 1, 4, 2] {
            state = play(&state, mv);
        }
        assert_eq!(TicTacToe::apply(&state, 5), Err(RuleError::GameOver));
    }
}
