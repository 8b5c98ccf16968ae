//! Concrete registry entries: one `Player` impl per search-core family,
//! each declining (`None`) any game kind it was not built for. Grounded on
//! `arena-search`'s per-algorithm modules; this crate's only job is to
//! adapt their native move types into [`AnyMove`] and wire them behind the
//! shared [`Player`] seam.
use crate::Player;
use arena_core::MCTS_DEFAULT_ITERATIONS;
use arena_rules::AnyMove;
use arena_rules::AnyState;
use arena_rules::Rules;
use arena_rules::azul::Azul;
use arena_search::mcts::Mcts;
use arena_search::predictor::Predictor;
use arena_search::predictor::UniformPredictor;
use rand::Rng;
use std::sync::Arc;

/// Uniform-random legal move, any game kind. The fallback entry every
/// lobby can bind an AI seat to regardless of which games it plays.
pub struct RandomPlayer;

#[async_trait::async_trait]
impl Player for RandomPlayer {
    async fn select_move(&self, state: &AnyState) -> Option<AnyMove> {
        let legal = state.legal_moves();
        if legal.is_empty() {
            return None;
        }
        let mut rng = rand::rng();
        Some(legal[rng.random_range(0..legal.len())])
    }
}

/// Azul's greedy one-ply lookahead tier ("random+"/"heuristic" in the
/// distilled spec's AI roster).
pub struct HeuristicPlayer;

#[async_trait::async_trait]
impl Player for HeuristicPlayer {
    async fn select_move(&self, state: &AnyState) -> Option<AnyMove> {
        match state {
            AnyState::Azul(s) => {
                let mut rng = rand::rng();
                Some(AnyMove::Azul(arena_search::heuristic::heuristic_azul(s, &mut rng)))
            }
            _ => None,
        }
    }
}

/// Depth-bounded alpha-beta search, Chess only.
pub struct AlphaBetaPlayer;

#[async_trait::async_trait]
impl Player for AlphaBetaPlayer {
    async fn select_move(&self, state: &AnyState) -> Option<AnyMove> {
        match state {
            AnyState::Chess(s) => {
                let seed: u64 = rand::rng().random();
                Some(AnyMove::Chess(arena_search::alphabeta::select_move(s, seed)))
            }
            _ => None,
        }
    }
}

/// Depth-bounded negamax search, Connect-4 only.
pub struct NegamaxPlayer;

#[async_trait::async_trait]
impl Player for NegamaxPlayer {
    async fn select_move(&self, state: &AnyState) -> Option<AnyMove> {
        match state {
            AnyState::Connect4(s) => {
                let seed: u64 = rand::rng().random();
                Some(AnyMove::Connect4(arena_search::negamax::select_move(s, seed)))
            }
            _ => None,
        }
    }
}

/// Closed-form optimal play for the two combinatorial games (distilled
/// spec §4.3.3): Nim-sum parity with the misere endgame adjustment, and
/// the golden-ratio cold-position test for Wythoff.
pub struct SolverPlayer;

#[async_trait::async_trait]
impl Player for SolverPlayer {
    async fn select_move(&self, state: &AnyState) -> Option<AnyMove> {
        match state {
            AnyState::Nim(s) => Some(AnyMove::Nim(arena_search::solvers::select_nim_move(s))),
            AnyState::Wythoff(s) => Some(AnyMove::Wythoff(arena_search::solvers::select_wythoff_move(s))),
            _ => None,
        }
    }
}

/// Single-player-optimization PUCT MCTS, Azul only. Builds a fresh tree
/// from the live state on every call rather than threading a persistent
/// tree through the registry's process-wide, per-name (not per-game)
/// lifetime — `arena_search::mcts::Mcts::advance` still gives a caller that
/// owns a tree per game (e.g. a future per-room cache) the cross-move reuse
/// distilled spec §4.3.1 describes; this entry trades that reuse for
/// statelessness, which is well within the search budget Azul allows per
/// move.
pub struct MctsPlayer {
    predictor: Arc<dyn Predictor>,
    iterations: arena_core::Visits,
}

impl MctsPlayer {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor, iterations: MCTS_DEFAULT_ITERATIONS }
    }
}

impl Default for MctsPlayer {
    fn default() -> Self {
        Self::new(Arc::new(UniformPredictor))
    }
}

#[async_trait::async_trait]
impl Player for MctsPlayer {
    async fn select_move(&self, state: &AnyState) -> Option<AnyMove> {
        match state {
            AnyState::Azul(s) => {
                let agent = Azul::turn(s);
                let seed: u64 = rand::rng().random();
                let mut mcts = Mcts::new(s.clone(), agent, seed);
                mcts.search_for(self.predictor.as_ref(), self.iterations);
                Some(AnyMove::Azul(mcts.best_move(0.0)))
            }
            _ => None,
        }
    }

    fn visualize(&self, state: &AnyState) -> Option<serde_json::Value> {
        match state {
            AnyState::Azul(s) => {
                let agent = Azul::turn(s);
                let legal = Azul::legal_moves(s);
                let num_factories = s.factories.len();
                let obs = arena_codec::azul::state_to_input(s, agent);
                let mask = arena_codec::azul::legal_mask(&legal, num_factories);
                let (policy, value) = self.predictor.predict(&obs, &mask);
                Some(serde_json::json!({
                    "agent": agent,
                    "value": value,
                    "policy": policy,
                    "legal_indices": legal
                        .iter()
                        .map(|&mv| arena_codec::azul::action_to_index(mv, num_factories))
                        .collect::<Vec<_>>(),
                }))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::Kind;
    use arena_rules::AnyConfig;

    #[tokio::test]
    async fn random_player_moves_in_every_game_kind() {
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
            let mv = RandomPlayer.select_move(&state).await;
            assert!(mv.is_some(), "random player declined {kind:?}");
        }
    }

    #[tokio::test]
    async fn specialist_players_decline_the_wrong_kind() {
        let tictactoe = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        assert!(AlphaBetaPlayer.select_move(&tictactoe).await.is_none());
        assert!(NegamaxPlayer.select_move(&tictactoe).await.is_none());
        assert!(SolverPlayer.select_move(&tictactoe).await.is_none());
        assert!(HeuristicPlayer.select_move(&tictactoe).await.is_none());
        assert!(MctsPlayer::default().select_move(&tictactoe).await.is_none());
    }

    #[tokio::test]
    async fn mcts_player_produces_a_legal_azul_move() {
        let state = AnyState::initial(AnyConfig::Azul(arena_rules::azul::Config::default()));
        let mv = MctsPlayer::default().select_move(&state).await.unwrap();
        assert!(state.legal_moves().contains(&mv));
    }
}
