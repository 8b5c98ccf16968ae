//! Events the publisher fans out over a game's logical stream
//! (distilled spec §4.6): `{type: create|move|undo, ...}`, appended in
//! causal order with respect to a single game.
use arena_core::ID;
use arena_database::Member;
use arena_rules::AnyMove;
use arena_rules::AnyState;
use arena_rules::Status;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new game row came into existence.
    Create { state: AnyState, status: Status },
    /// A move was validated and applied.
    Move {
        by: Option<ID<Member>>,
        #[serde(rename = "move")]
        mv: AnyMove,
        state: AnyState,
        status: Status,
    },
    /// The Chess undo handler rewound history by one or two moves.
    Undo { state: AnyState, status: Status },
}

impl Event {
    pub fn state(&self) -> &AnyState {
        match self {
            Event::Create { state, .. } => state,
            Event::Move { state, .. } => state,
            Event::Undo { state, .. } => state,
        }
    }
    pub fn status(&self) -> Status {
        match self {
            Event::Create { status, .. } => *status,
            Event::Move { status, .. } => *status,
            Event::Undo { status, .. } => *status,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::Create { .. } => write!(f, "create"),
            Event::Move { by, .. } => write!(f, "move by {by:?}"),
            Event::Undo { .. } => write!(f, "undo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_rules::AnyConfig;

    #[test]
    fn a_create_event_reports_its_status() {
        let state = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        let status = state.status();
        let event = Event::Create { state, status };
        assert_eq!(event.status(), Status::InProgress);
    }
}
