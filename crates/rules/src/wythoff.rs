//! Wythoff's game: remove any positive amount from one pile, or the same
//! positive amount from both piles. Normal play: taking the last object wins.
use crate::Rules;
use crate::RuleError;
use crate::Status;
use arena_core::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct State {
    pub a: u32,
    pub b: u32,
    pub turn: Position,
    pub status: Status,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub a: u32,
    pub b: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self { a: 3, b: 5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Move {
    /// Remove `amount` from pile `which` (0 = a, 1 = b).
    FromPile { which: u8, amount: u32 },
    /// Remove `amount` from both piles.
    Diagonal { amount: u32 },
}

pub struct Wythoff;

impl Rules for Wythoff {
    type State = State;
    type Move = Move;
    type Config = Config;

    fn initial(config: Config) -> State {
        State {
            a: config.a,
            b: config.b,
            turn: 0,
            status: Status::InProgress,
        }
    }

    fn legal_moves(state: &State) -> Vec<Move> {
        if state.status.is_terminal() {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for amount in 1..=state.a {
            moves.push(Move::FromPile { which: 0, amount });
        }
        for amount in 1..=state.b {
            moves.push(Move::FromPile { which: 1, amount });
        }
        for amount in 1..=state.a.min(state.b) {
            moves.push(Move::Diagonal { amount });
        }
        moves
    }

    fn turn(state: &State) -> Position {
        state.turn
    }

    fn status(state: &State) -> Status {
        state.status
    }

    fn apply(state: &State, mv: Move) -> Result<(State, Status), RuleError> {
        if state.status.is_terminal() {
            return Err(RuleError::GameOver);
        }
        let (a, b) = match mv {
            Move::FromPile { which: 0, amount } => {
                if amount == 0 || amount > state.a {
                    return Err(RuleError::Other("amount exceeds pile a".into()));
                }
                (state.a - amount, state.b)
            }
            Move::FromPile { which: 1, amount } => {
                if amount == 0 || amount > state.b {
                    return Err(RuleError::Other("amount exceeds pile b".into()));
                }
                (state.a, state.b - amount)
            }
            Move::FromPile { .. } => return Err(RuleError::OutOfBounds),
            Move::Diagonal { amount } => {
                if amount == 0 || amount > state.a.min(state.b) {
                    return Err(RuleError::Other("diagonal amount exceeds smaller pile".into()));
                }
                (state.a - amount, state.b - amount)
            }
        };
        let status = if a == 0 && b == 0 {
            Status::Won { winner: state.turn }
        } else {
            Status::InProgress
        };
        Ok((
            State {
                a,
                b,
                turn: 1 - state.turn,
                status,
            },
            status,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Board [3,5]: the cold-position AI must still return a legal move
    /// (distilled spec §8, scenario 4).
    #[test]
    fn losing_player_still_has_a_legal_move() {
        let state = Wythoff::initial(Config { a: 3, b: 5 });
        assert!(!Wythoff::legal_moves(&state).is_empty());
    }

    #[test]
    fn taking_all_of_both_piles_wins() {
        let state = Wythoff::initial(Config { a: 2, b: 2 });
        let (_, status) = Wythoff::apply(&state, Move::Diagonal { amount: 2 }).expect("legal");
        assert_eq!(status, Status::Won { winner: 0 });
    }

    #[test]
    fn diagonal_move_beyond_smaller_pile_is_illegal() {
        let state = Wythoff::initial(Config { a: 2, b: 5 });
        assert!(Wythoff::apply(&state, Move::Diagonal { amount: 3 }).is_err());
    }
}
