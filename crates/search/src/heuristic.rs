//! Lighter-weight registry strategies: uniform-random play for Tic-Tac-Toe
//! and Santorini, plus Azul's `random+`/`heuristic` tiers.
//!
//! Grounded on the teacher's `ai_*_random.py`/`heuristic_player.py` family
//! (original_source/): a pure-random baseline and a greedy one-ply
//! lookahead that scores candidate placements by the wall-scoring
//! contiguity they would realize, breaking ties randomly.
use arena_rules::Rules;
use arena_rules::azul::Azul;
use arena_rules::azul::Destination;
use arena_rules::azul::Move as AzulMove;
use arena_rules::azul::PlayerBoard;
use arena_rules::azul::State as AzulState;
use arena_rules::santorini::Move as SantoriniMove;
use arena_rules::santorini::Santorini;
use arena_rules::santorini::State as SantoriniState;
use arena_rules::tictactoe::State as TicTacToeState;
use arena_rules::tictactoe::TicTacToe;
use rand::Rng;

pub fn random_tictactoe(state: &TicTacToeState, rng: &mut impl Rng) -> usize {
    let legal = TicTacToe::legal_moves(state);
    legal[rng.random_range(0..legal.len())]
}

pub fn random_santorini(state: &SantoriniState, rng: &mut impl Rng) -> SantoriniMove {
    let legal = Santorini::legal_moves(state);
    legal[rng.random_range(0..legal.len())]
}

pub fn random_azul(state: &AzulState, rng: &mut impl Rng) -> AzulMove {
    let legal = Azul::legal_moves(state);
    legal[rng.random_range(0..legal.len())]
}

/// The contiguity value `board`'s current mover would realize right now if
/// `mv`'s pattern line were immediately tiled, or `0` for floor-routed moves
/// and lines that `mv` does not complete this turn.
fn immediate_contiguity_value(board: &PlayerBoard, mv: AzulMove) -> arena_core::Score {
    let row = match mv.destination {
        Destination::Row(r) => r,
        Destination::Floor => return 0,
    };
    let line = board.pattern_lines[row];
    let would_be_full = line.color.is_none_or(|c| c == mv.color) && (line.count as usize + 1) == row + 1;
    if !would_be_full {
        return 0;
    }
    let col = PlayerBoard::wall_column(row, mv.color);
    arena_rules::azul::score_wall_placement(&board.wall, row, col)
}

fn floor_penalty_estimate(mv: AzulMove) -> arena_core::Score {
    match mv.destination {
        Destination::Floor => -1,
        Destination::Row(_) => 0,
    }
}

/// Greedy one-ply lookahead: scores each legal move by the wall value it
/// would realize if scored immediately, penalizing floor placements, and
/// breaks ties uniformly at random.
pub fn heuristic_azul(state: &AzulState, rng: &mut impl Rng) -> AzulMove {
    let legal = Azul::legal_moves(state);
    let mover = &state.players[Azul::turn(state)];
    let best = legal
        .iter()
        .map(|&mv| immediate_contiguity_value(mover, mv) + floor_penalty_estimate(mv))
        .max()
        .expect("the turn orchestrator never asks for a move when none is legal");
    let candidates: Vec<AzulMove> = legal
        .iter()
        .copied()
        .filter(|&mv| immediate_contiguity_value(mover, mv) + floor_penalty_estimate(mv) == best)
        .collect();
    candidates[rng.random_range(0..candidates.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_rules::azul::Config as AzulConfig;
    use arena_rules::santorini::Config as SantoriniConfig;
    use arena_rules::tictactoe::Config as TicTacToeConfig;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn random_tictactoe_is_always_legal() {
        let state = TicTacToe::initial(TicTacToeConfig);
        let mut rng = SmallRng::seed_from_u64(1);
        let mv = random_tictactoe(&state, &mut rng);
        assert!(TicTacToe::legal_moves(&state).contains(&mv));
    }

    #[test]
    fn random_santorini_is_always_legal() {
        let state = Santorini::initial(SantoriniConfig);
        let mut rng = SmallRng::seed_from_u64(1);
        let mv = random_santorini(&state, &mut rng);
        assert!(Santorini::legal_moves(&state).contains(&mv));
    }

    #[test]
    fn heuristic_azul_is_always_legal() {
        let state = Azul::initial(AzulConfig::default());
        let mut rng = SmallRng::seed_from_u64(1);
        let mv = heuristic_azul(&state, &mut rng);
        assert!(Azul::legal_moves(&state).contains(&mv));
    }

    #[test]
    fn heuristic_azul_prefers_a_completing_move_over_a_floor_dump() {
        let mut state = Azul::initial(AzulConfig::default());
        let mover = Azul::turn(&state);
        state.players[mover].pattern_lines[0].color = Some(0);
        state.players[mover].pattern_lines[0].count = 0;
        state.factories[0] = [1, 0, 0, 0, 0];
        for f in state.factories.iter_mut().skip(1) {
            *f = [0, 0, 0, 0, 0];
        }
        state.center = [0, 0, 0, 0, 0];
        let mut rng = SmallRng::seed_from_u64(1);
        let mv = heuristic_azul(&state, &mut rng);
        assert_eq!(mv.destination, Destination::Row(0));
    }
}
