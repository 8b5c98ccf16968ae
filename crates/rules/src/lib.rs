//! Rule engines for every game this platform hosts.
//!
//! Each game module implements [`Rules`]: a pure state-transition function
//! set (`initial`, `legal_moves`, `apply`, `clone`) with no I/O and no
//! knowledge of turns, persistence, or networking. The orchestrator
//! (`arena-gameroom`) is the only caller.
pub mod any;
pub mod azul;
pub mod chess;
pub mod connect4;
pub mod nim;
pub mod santorini;
pub mod tictactoe;
pub mod wythoff;

pub use any::AnyConfig;
pub use any::AnyMove;
pub use any::AnyState;

use arena_core::Position;
use std::fmt::Debug;

/// Terminal or in-progress status after an `apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    InProgress,
    Won { winner: Position },
    Draw,
    Stalemate,
    Checkmate { winner: Position },
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::InProgress)
    }
}

/// Reasons `apply` refuses a move. Maps 1:1 onto the `illegal_move` taxonomy.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("source is empty")]
    SourceEmpty,
    #[error("wall column already occupied for this color")]
    WallConflict,
    #[error("pattern line holds a different color")]
    LineColorMismatch,
    #[error("column is full")]
    ColumnFull,
    #[error("destination occupied by your own piece")]
    OwnPieceTarget,
    #[error("move would leave the mover in check")]
    IntoCheck,
    #[error("cell is out of bounds")]
    OutOfBounds,
    #[error("cell already occupied")]
    CellOccupied,
    #[error("game is already over")]
    GameOver,
    #[error("{0}")]
    Other(String),
}

/// A pure state-transition engine for one game kind.
///
/// `State` must serialize byte-identically to what gets persisted in a game
/// row (distilled spec §6, "persisted state layout"); `clone` is required to
/// be cheap enough for search (distilled spec §4.1).
pub trait Rules {
    type State: Clone + Debug + serde::Serialize + serde::de::DeserializeOwned;
    type Move: Copy + Eq + Debug;
    type Config: Default;

    /// Deterministic initial state for a configuration.
    fn initial(config: Self::Config) -> Self::State;

    /// Every legal move at `state`'s current mover. Empty iff the current
    /// mover has no move.
    fn legal_moves(state: &Self::State) -> Vec<Self::Move>;

    /// Mover currently on move. Only meaningful while `status(state)` is
    /// `InProgress`.
    fn turn(state: &Self::State) -> Position;

    /// Current status without mutating anything.
    fn status(state: &Self::State) -> Status;

    /// Validate and apply one move, returning the new state and its status.
    fn apply(state: &Self::State, mv: Self::Move) -> Result<(Self::State, Status), RuleError>;
}
