//! Kind-indexed dispatch over all seven rule engines.
//!
//! Every caller above this layer — the turn orchestrator in
//! `arena-gameroom`, the AI registry in `arena-players`, the persisted game
//! row in `arena-database` — needs to hold "a game, whichever kind" without
//! being generic over seven unrelated `Rules::State` types. `AnyState`/
//! `AnyMove`/`AnyConfig` are that one seam, matched on
//! [`arena_core::Kind`] exactly the way `Kind` itself documents as the
//! intended dispatch point.
use crate::Rules;
use crate::RuleError;
use crate::Status;
use crate::azul::Azul;
use crate::chess::Chess;
use crate::connect4::Connect4;
use crate::nim::Nim;
use crate::santorini::Santorini;
use crate::tictactoe::TicTacToe;
use crate::wythoff::Wythoff;
use arena_core::Kind;
use arena_core::Position;

/// A game state, any kind. Serializes as the persisted row's `state` blob
/// (distilled spec §6, "persisted state layout").
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyState {
    TicTacToe(crate::tictactoe::State),
    Connect4(crate::connect4::State),
    Chess(crate::chess::State),
    Nim(crate::nim::State),
    Wythoff(crate::wythoff::State),
    Santorini(crate::santorini::State),
    Azul(crate::azul::State),
}

/// A move, any kind. The HTTP move endpoint deserializes the request body
/// against the state's kind via [`AnyMove::from_value`]; the AI registry
/// constructs these directly from each search core's native move type.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnyMove {
    TicTacToe(usize),
    Connect4(usize),
    Chess(crate::chess::UciMove),
    Nim(crate::nim::Move),
    Wythoff(crate::wythoff::Move),
    Santorini(crate::santorini::Move),
    Azul(crate::azul::Move),
}

/// A creation-time configuration, any kind. Serializes with a `kind` tag
/// so an HTTP create request can supply variant-specific fields (custom
/// Nim pile sizes, a Chess960 flag, ...) instead of always falling back
/// to [`AnyConfig::default_for`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyConfig {
    TicTacToe(crate::tictactoe::Config),
    Connect4(crate::connect4::Config),
    Chess(crate::chess::Config),
    Nim(crate::nim::Config),
    Wythoff(crate::wythoff::Config),
    Santorini(crate::santorini::Config),
    Azul(crate::azul::Config),
}

impl AnyConfig {
    /// The engine's own `Default` for `kind`, used when a create request
    /// carries no variant-specific fields.
    pub fn default_for(kind: Kind) -> Self {
        match kind {
            Kind::TicTacToe => AnyConfig::TicTacToe(Default::default()),
            Kind::Connect4 => AnyConfig::Connect4(Default::default()),
            Kind::Chess => AnyConfig::Chess(Default::default()),
            Kind::Nim => AnyConfig::Nim(Default::default()),
            Kind::Wythoff => AnyConfig::Wythoff(Default::default()),
            Kind::Santorini => AnyConfig::Santorini(Default::default()),
            Kind::Azul => AnyConfig::Azul(Default::default()),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            AnyConfig::TicTacToe(_) => Kind::TicTacToe,
            AnyConfig::Connect4(_) => Kind::Connect4,
            AnyConfig::Chess(_) => Kind::Chess,
            AnyConfig::Nim(_) => Kind::Nim,
            AnyConfig::Wythoff(_) => Kind::Wythoff,
            AnyConfig::Santorini(_) => Kind::Santorini,
            AnyConfig::Azul(_) => Kind::Azul,
        }
    }
}

impl AnyState {
    pub fn kind(&self) -> Kind {
        match self {
            AnyState::TicTacToe(_) => Kind::TicTacToe,
            AnyState::Connect4(_) => Kind::Connect4,
            AnyState::Chess(_) => Kind::Chess,
            AnyState::Nim(_) => Kind::Nim,
            AnyState::Wythoff(_) => Kind::Wythoff,
            AnyState::Santorini(_) => Kind::Santorini,
            AnyState::Azul(_) => Kind::Azul,
        }
    }

    pub fn initial(config: AnyConfig) -> Self {
        match config {
            AnyConfig::TicTacToe(c) => AnyState::TicTacToe(TicTacToe::initial(c)),
            AnyConfig::Connect4(c) => AnyState::Connect4(Connect4::initial(c)),
            AnyConfig::Chess(c) => AnyState::Chess(Chess::initial(c)),
            AnyConfig::Nim(c) => AnyState::Nim(Nim::initial(c)),
            AnyConfig::Wythoff(c) => AnyState::Wythoff(Wythoff::initial(c)),
            AnyConfig::Santorini(c) => AnyState::Santorini(Santorini::initial(c)),
            AnyConfig::Azul(c) => AnyState::Azul(Azul::initial(c)),
        }
    }

    pub fn turn(&self) -> Position {
        match self {
            AnyState::TicTacToe(s) => TicTacToe::turn(s),
            AnyState::Connect4(s) => Connect4::turn(s),
            AnyState::Chess(s) => Chess::turn(s),
            AnyState::Nim(s) => Nim::turn(s),
            AnyState::Wythoff(s) => Wythoff::turn(s),
            AnyState::Santorini(s) => Santorini::turn(s),
            AnyState::Azul(s) => Azul::turn(s),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            AnyState::TicTacToe(s) => TicTacToe::status(s),
            AnyState::Connect4(s) => Connect4::status(s),
            AnyState::Chess(s) => Chess::status(s),
            AnyState::Nim(s) => Nim::status(s),
            AnyState::Wythoff(s) => Wythoff::status(s),
            AnyState::Santorini(s) => Santorini::status(s),
            AnyState::Azul(s) => Azul::status(s),
        }
    }

    pub fn legal_moves(&self) -> Vec<AnyMove> {
        match self {
            AnyState::TicTacToe(s) => {
                TicTacToe::legal_moves(s).into_iter().map(AnyMove::TicTacToe).collect()
            }
            AnyState::Connect4(s) => {
                Connect4::legal_moves(s).into_iter().map(AnyMove::Connect4).collect()
            }
            AnyState::Chess(s) => Chess::legal_moves(s).into_iter().map(AnyMove::Chess).collect(),
            AnyState::Nim(s) => Nim::legal_moves(s).into_iter().map(AnyMove::Nim).collect(),
            AnyState::Wythoff(s) => {
                Wythoff::legal_moves(s).into_iter().map(AnyMove::Wythoff).collect()
            }
            AnyState::Santorini(s) => {
                Santorini::legal_moves(s).into_iter().map(AnyMove::Santorini).collect()
            }
            AnyState::Azul(s) => Azul::legal_moves(s).into_iter().map(AnyMove::Azul).collect(),
        }
    }

    /// Validates and applies `mv`. A `mv` whose variant does not match
    /// `self`'s kind is always illegal — this is what lets the HTTP layer's
    /// malformed-body case fall out of the same `illegal_move` path as a
    /// genuinely-illegal same-kind move, rather than needing a separate
    /// `bad_request` branch here (the HTTP handler still reports
    /// `bad_request` for a body that fails to deserialize at all; a body
    /// that deserializes but names the wrong game is a kind mismatch here).
    pub fn apply(&self, mv: AnyMove) -> Result<(AnyState, Status), RuleError> {
        match (self, mv) {
            (AnyState::TicTacToe(s), AnyMove::TicTacToe(m)) => {
                let (s2, status) = TicTacToe::apply(s, m)?;
                Ok((AnyState::TicTacToe(s2), status))
            }
            (AnyState::Connect4(s), AnyMove::Connect4(m)) => {
                let (s2, status) = Connect4::apply(s, m)?;
                Ok((AnyState::Connect4(s2), status))
            }
            (AnyState::Chess(s), AnyMove::Chess(m)) => {
                let (s2, status) = Chess::apply(s, m)?;
                Ok((AnyState::Chess(s2), status))
            }
            (AnyState::Nim(s), AnyMove::Nim(m)) => {
                let (s2, status) = Nim::apply(s, m)?;
                Ok((AnyState::Nim(s2), status))
            }
            (AnyState::Wythoff(s), AnyMove::Wythoff(m)) => {
                let (s2, status) = Wythoff::apply(s, m)?;
                Ok((AnyState::Wythoff(s2), status))
            }
            (AnyState::Santorini(s), AnyMove::Santorini(m)) => {
                let (s2, status) = Santorini::apply(s, m)?;
                Ok((AnyState::Santorini(s2), status))
            }
            (AnyState::Azul(s), AnyMove::Azul(m)) => {
                let (s2, status) = Azul::apply(s, m)?;
                Ok((AnyState::Azul(s2), status))
            }
            _ => Err(RuleError::Other("move kind does not match game kind".into())),
        }
    }

    /// Replays the Chess move list truncated by `plies` (distilled spec
    /// §4.5, "Undo (Chess)"). Every other kind has no undo operation.
    pub fn undo(&self, plies: usize) -> Result<AnyState, RuleError> {
        match self {
            AnyState::Chess(s) => Ok(AnyState::Chess(Chess::undo(s, plies))),
            _ => Err(RuleError::Other("undo is only supported for chess".into())),
        }
    }

    /// Parses a move for `self`'s kind from an untyped JSON body (the HTTP
    /// move endpoint's request payload), without requiring the client to
    /// send the `kind` tag `AnyMove`'s own `Serialize` impl emits.
    pub fn move_from_json(&self, body: serde_json::Value) -> Result<AnyMove, serde_json::Error> {
        Ok(match self {
            AnyState::TicTacToe(_) => AnyMove::TicTacToe(serde_json::from_value(body)?),
            AnyState::Connect4(_) => AnyMove::Connect4(serde_json::from_value(body)?),
            AnyState::Chess(_) => AnyMove::Chess(serde_json::from_value(body)?),
            AnyState::Nim(_) => AnyMove::Nim(serde_json::from_value(body)?),
            AnyState::Wythoff(_) => AnyMove::Wythoff(serde_json::from_value(body)?),
            AnyState::Santorini(_) => AnyMove::Santorini(serde_json::from_value(body)?),
            AnyState::Azul(_) => AnyMove::Azul(serde_json::from_value(body)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_dispatches_to_the_right_kind() {
        for kind in [
            Kind::TicTacToe,
            Kind::Connect4,
            Kind::Chess,
            Kind::Nim,
            Kind::Wythoff,
            Kind::Santorini,
            Kind::Azul,
        ] {
            let state = AnyState::initial(AnyConfig::default_for(kind));
            assert_eq!(state.kind(), kind);
            assert_eq!(state.status(), Status::InProgress);
        }
    }

    #[test]
    fn legal_moves_nonempty_at_a_fresh_tictactoe_state() {
        let state = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        assert_eq!(state.legal_moves().len(), 9);
    }

    #[test]
    fn applying_a_mismatched_move_kind_is_illegal() {
        let state = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        let err = state.apply(AnyMove::Connect4(0)).unwrap_err();
        assert_eq!(err, RuleError::Other("move kind does not match game kind".into()));
    }

    #[test]
    fn move_from_json_round_trips_a_tictactoe_cell() {
        let state = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        let mv = state.move_from_json(serde_json::json!(4)).unwrap();
        let (next, status) = state.apply(mv).unwrap();
        assert_eq!(status, Status::InProgress);
        assert_eq!(next.turn(), 1);
    }
}
