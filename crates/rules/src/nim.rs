//! Nim (misere variant): remove any positive amount from one pile; the
//! player forced to take the last object loses.
use crate::Rules;
use crate::RuleError;
use crate::Status;
use arena_core::Position;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct State {
    pub piles: Vec<u32>,
    pub turn: Position,
    pub status: Status,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub piles: Vec<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            piles: vec![1, 3, 5, 7],
        }
    }
}

/// Take `amount` from `pile_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Move {
    pub pile: usize,
    pub amount: u32,
}

pub struct Nim;

impl Rules for Nim {
    type State = State;
    type Move = Move;
    type Config = Config;

    fn initial(config: Config) -> State {
        State {
            piles: config.piles,
            turn: 0,
            status: Status::InProgress,
        }
    }

    fn legal_moves(state: &State) -> Vec<Move> {
        if state.status.is_terminal() {
            return Vec::new();
        }
        state
            .piles
            .iter()
            .enumerate()
            .flat_map(|(pile, &size)| (1..=size).map(move |amount| Move { pile, amount }))
            .collect()
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
        let size = *state
            .piles
            .get(mv.pile)
            .ok_or(RuleError::OutOfBounds)?;
        if mv.amount == 0 || mv.amount > size {
            return Err(RuleError::Other("amount exceeds pile size".into()));
        }
        let mut piles = state.piles.clone();
        piles[mv.pile] -= mv.amount;
        // misere: the player who takes the last object loses.
        let status = if piles.iter().all(|&p| p == 0) {
            Status::Won { winner: 1 - state.turn }
        } else {
            Status::InProgress
        };
        Ok((
            State {
                piles,
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

    /// Board [0,0,1,1,1], current turn 1: taking 1 from any pile of 1 leaves
    /// two 1-piles, forcing the opponent to take last (distilled spec §8,
    /// scenario 3).
    #[test]
    fn misere_endgame_leaves_opponent_to_take_last() {
        let state = State {
            piles: vec![0, 0, 1, 1, 1],
            turn: 1,
            status: Status::InProgress,
        };
        let (next, status) = Nim::apply(&state, Move { pile: 2, amount: 1 }).expect("legal");
        assert_eq!(status, Status::InProgress);
        assert_eq!(next.piles, vec![0, 0, 0, 1, 1]);
        assert_eq!(next.turn, 0);
    }

    #[test]
    fn taking_the_last_object_loses() {
        let state = State {
            piles: vec![0, 0, 0, 0, 1],
            turn: 0,
            status: Status::InProgress,
        };
        let (_, status) = Nim::apply(&state, Move { pile: 4, amount: 1 }).expect("legal");
        assert_eq!(status, Status::Won { winner: 1 });
    }

    #[test]
    fn overtaking_a_pile_is_illegal() {
        let state = Nim::initial(Config::default());
        assert_eq!(
            Nim::apply(&state, Move { pile: 0, amount: 2 }),
            Err(RuleError::Other("amount exceeds pile size".into()))
        );
    }
}
