//! Thin decode layer between the wire and [`AnyMove`] (distilled spec
//! §6: "each inbound bus message is forwarded verbatim as a single
//! JSON object"). [`Event`] already is the wire shape for outbound
//! messages, so only the inbound decode direction needs a helper here.
use arena_rules::AnyMove;
use arena_rules::AnyState;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProtocolError {
    #[error("request body is not a valid move for this game: {0}")]
    InvalidMove(String),
}

pub struct Protocol;

impl Protocol {
    /// Parses a client-submitted move body against `state`'s kind.
    pub fn decode(state: &AnyState, body: serde_json::Value) -> Result<AnyMove, ProtocolError> {
        state.move_from_json(body).map_err(|e| ProtocolError::InvalidMove(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_rules::AnyConfig;

    #[test]
    fn decoding_a_tictactoe_cell_round_trips() {
        let state = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        let mv = Protocol::decode(&state, serde_json::json!(4)).unwrap();
        assert!(matches!(mv, AnyMove::TicTacToe(4)));
    }

    #[test]
    fn decoding_garbage_is_an_error() {
        let state = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        assert!(Protocol::decode(&state, serde_json::json!("not a cell")).is_err());
    }
}
