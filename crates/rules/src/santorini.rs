//! Santorini: 5x5 grid, each player places 2 workers, then moves one worker
//! up to one level and builds adjacent. Reaching level 3 wins immediately;
//! having no legal move loses.
use crate::Rules;
use crate::RuleError;
use crate::Status;
use arena_core::Position;

pub const SIZE: usize = 5;
const CELLS: usize = SIZE * SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Worker {
    P1,
    P2,
}

impl Worker {
    fn seat(self) -> Position {
        match self {
            Worker::P1 => 0,
            Worker::P2 => 1,
        }
    }
    fn other(self) -> Self {
        match self {
            Worker::P1 => Worker::P2,
            Worker::P2 => Worker::P1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    pub level: u8,
    pub worker: Option<Worker>,
    pub domed: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            level: 0,
            worker: None,
            domed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct State {
    pub cells: [Cell; CELLS],
    pub turn: Worker,
    pub placed: [u8; 2],
    pub status: Status,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Move {
    Place { at: usize },
    Build { worker: usize, to: usize, build: usize },
}

pub struct Santorini;

fn neighbors(idx: usize) -> Vec<usize> {
    let (r, c) = (idx / SIZE, idx % SIZE);
    let mut out = Vec::with_capacity(8);
    for dr in -1i32..=1 {
        for dc in -1i32..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let nr = r as i32 + dr;
            let nc = c as i32 + dc;
            if nr >= 0 && nr < SIZE as i32 && nc >= 0 && nc < SIZE as i32 {
                out.push(nr as usize * SIZE + nc as usize);
            }
        }
    }
    out
}

fn worker_positions(state: &State, worker: Worker) -> Vec<usize> {
    state
        .cells
        .iter()
        .enumerate()
        .filter(|(_, c)| c.worker == Some(worker))
        .map(|(i, _)| i)
        .collect()
}

impl Rules for Santorini {
    type State = State;
    type Move = Move;
    type Config = Config;

    fn initial(_config: Config) -> State {
        State {
            cells: [Cell::default(); CELLS],
            turn: Worker::P1,
            placed: [0, 0],
            status: Status::InProgress,
        }
    }

    fn legal_moves(state: &State) -> Vec<Move> {
        if state.status.is_terminal() {
            return Vec::new();
        }
        if state.placed[state.turn.seat()] < 2 {
            return (0..CELLS)
                .filter(|&i| state.cells[i].worker.is_none())
                .map(|at| Move::Place { at })
                .collect();
        }
        let mut moves = Vec::new();
        for worker_cell in worker_positions(state, state.turn) {
            let from_level = state.cells[worker_cell].level;
            for to in neighbors(worker_cell) {
                let target = &state.cells[to];
                if target.worker.is_some() || target.domed {
                    continue;
                }
                if target.level > from_level + 1 {
                    continue;
                }
                for build in neighbors(to) {
                    // vacated cell is buildable once the worker has moved away.
                    let build_cell = &state.cells[build];
                    if build_cell.domed {
                        continue;
                    }
                    if build_cell.worker.is_some() && build != worker_cell {
                        continue;
                    }
                    moves.push(Move::Build {
                        worker: worker_cell,
                        to,
                        build,
                    });
                }
            }
        }
        moves
    }

    fn turn(state: &State) -> Position {
        state.turn.seat()
    }

    fn status(state: &State) -> Status {
        state.status
    }

    fn apply(state: &State, mv: Move) -> Result<(State, Status), RuleError> {
        if state.status.is_terminal() {
            return Err(RuleError::GameOver);
        }
        let mut cells = state.cells;
        let mut placed = state.placed;
        match mv {
            Move::Place { at } => {
                if placed[state.turn.seat()] >= 2 {
                    return Err(RuleError::Other("already placed both workers".into()));
                }
                if at >= CELLS {
                    return Err(RuleError::OutOfBounds);
                }
                if cells[at].worker.is_some() {
                    return Err(RuleError::CellOccupied);
                }
                cells[at].worker = Some(state.turn);
                placed[state.turn.seat()] += 1;
            }
            Move::Build { worker, to, build } => {
                if placed[state.turn.seat()] < 2 {
                    return Err(RuleError::Other("must finish placement first".into()));
                }
                if worker >= CELLS || to >= CELLS || build >= CELLS {
                    return Err(RuleError::OutOfBounds);
                }
                if cells[worker].worker != Some(state.turn) {
                    return Err(RuleError::Other("not your worker".into()));
                }
                if !neighbors(worker).contains(&to) {
                    return Err(RuleError::Other("destination is not adjacent".into()));
                }
                let target = cells[to];
                if target.worker.is_some() || target.domed {
                    return Err(RuleError::OwnPieceTarget);
                }
                if target.level > cells[worker].level + 1 {
                    return Err(RuleError::Other("cannot climb more than one level".into()));
                }
                let reaches_top = target.level == 3;
                cells[worker].worker = None;
                cells[to].worker = Some(state.turn);
                if !reaches_top {
                    if !neighbors(to).contains(&build) {
                        return Err(RuleError::Other("build site is not adjacent".into()));
                    }
                    if cells[build].domed || (cells[build].worker.is_some() && build != worker) {
                        return Err(RuleError::Other("build site is occupied".into()));
                    }
                    if cells[build].level >= 4 {
                        return Err(RuleError::Other("tower already capped".into()));
                    } else if cells[build].level == 3 {
                        cells[build].domed = true;
                    } else {
                        cells[build].level += 1;
                    }
                } else {
                    return Ok((
                        State {
                            cells,
                            turn: state.turn.other(),
                            placed,
                            status: Status::Won {
                                winner: state.turn.seat(),
                            },
                        },
                        Status::Won {
                            winner: state.turn.seat(),
                        },
                    ));
                }
            }
        }
        let next_turn = state.turn.other();
        let next = State {
            cells,
            turn: next_turn,
            placed,
            status: Status::InProgress,
        };
        let status = if Self::legal_moves(&next).is_empty() {
            Status::Won {
                winner: state.turn.seat(),
            }
        } else {
            Status::InProgress
        };
        Ok((State { status, ..next }, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed_state() -> State {
        let mut state = Santorini::initial(Config);
        for (worker, at) in [
            (Worker::P1, 0),
            (Worker::P2, 1),
            (Worker::P1, 2),
            (Worker::P2, 3),
        ] {
            assert_eq!(state.turn, worker);
            state = Santorini::apply(&state, Move::Place { at }).unwrap().0;
        }
        state
    }

    #[test]
    fn placement_phase_offers_one_move_per_empty_cell() {
        let state = Santorini::initial(Config);
        assert_eq!(Santorini::legal_moves(&state).len(), CELLS);
    }

    #[test]
    fn reaching_level_three_wins_immediately() {
        let mut state = placed_state();
        // P1's worker sits at cell 0; raise neighbor cell 5 to level 3 so
        // climbing onto it wins without needing a build step.
        state.cells[5].level = 3;
        let (_, status) = Santorini::apply(
            &state,
            Move::Build {
                worker: 0,
                to: 5,
                build: 6,
            },
        )
        .unwrap();
        assert_eq!(status, Status::Won { winner: Worker::P1.seat() });
    }

    #[test]
    fn cannot_climb_more_than_one_level() {
        let mut state = placed_state();
        state.cells[5].level = 2;
        let result = Santorini::apply(
            &state,
            Move::Build {
                worker: 0,
                to: 5,
                build: 6,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn cannot_build_on_a_domed_tower() {
        let mut state = placed_state();
        state.cells[6].domed = true;
        let result = Santorini::apply(
            &state,
            Move::Build {
                worker: 0,
                to: 5,
                build: 6,
            },
        );
        assert_eq!(result, Err(RuleError::Other("build site is occupied".into())));
    }
}
