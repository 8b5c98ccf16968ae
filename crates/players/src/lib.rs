//! AI registry: a process-wide `name -> strategy` map populated at startup
//! (distilled spec §4.4). The turn orchestrator looks up a strategy by the
//! AI player's display name and calls [`Player::select_move`]; it never
//! knows which search core backs a given name.
pub mod registry;
pub mod strategies;

pub use registry::Registry;

use arena_rules::AnyMove;
use arena_rules::AnyState;

/// A capability `{ select_move(state) -> move, optional visualize }`
/// (distilled spec §9, "dynamic dispatch over strategies"). Implementors
/// are free to embed arbitrary search; the orchestrator only ever calls
/// through this trait.
#[async_trait::async_trait]
pub trait Player: Send + Sync {
    /// Chooses a move for the mover at `state`'s current turn. `None`
    /// means this strategy has nothing to offer for `state`'s kind (e.g. a
    /// Chess-only strategy asked to move in an Azul game); the
    /// orchestrator treats that exactly like a search error and breaks its
    /// AI cascade (distilled spec §4.5).
    async fn select_move(&self, state: &AnyState) -> Option<AnyMove>;

    /// Policy/value diagnostics for `POST /azul/{id}/visualize_ai`
    /// (distilled spec §6). Strategies with no such breakdown return
    /// `None`; the HTTP layer maps that to `bad_request`.
    fn visualize(&self, _state: &AnyState) -> Option<serde_json::Value> {
        None
    }
}
