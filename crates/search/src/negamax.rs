//! Depth-bounded negamax with alpha-beta pruning for Connect-4.
//!
//! Move ordering (center columns first) and the center-weighted heuristic
//! are grounded on the general minimax/PST idiom in
//! `other_examples/96f48fb3_VenturaBleak-ChessAIWebApp__engine-svc-engines-ab_engine_rust-src-main.rs.rs`,
//! simplified to Connect-4's flat board (no quiescence, no aspiration
//! windows, no LMR: distilled spec §4.3 calls for plain depth-bounded search).
//! The sliding 4-cell window scan below is the same idiom generalized from
//! a chess-evaluation PST lookup to Connect-4's line-based threats.
use arena_core::CONNECT4_DEFAULT_DEPTH;
use arena_core::Depth;
use arena_core::Score;
use arena_rules::Rules;
use arena_rules::Status;
use arena_rules::connect4::COLS;
use arena_rules::connect4::Connect4;
use arena_rules::connect4::Piece;
use arena_rules::connect4::ROWS;
use arena_rules::connect4::State;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Column weights favoring the center, where a piece sits on the most
/// four-in-a-row lines.
const COLUMN_WEIGHT: [Score; COLS] = [1, 2, 3, 4, 3, 2, 1];

/// Per-occupant-count reward for a 4-cell line that is still open (no
/// opposing piece in it). Index 0 (empty line) and 4 (already a win,
/// caught by `terminal_score` before `heuristic` ever runs) score 0.
const WINDOW_WEIGHT: [Score; 5] = [0, 1, 10, 50, 0];

fn order_columns(moves: &[usize], rng: &mut SmallRng) -> Vec<usize> {
    let mut ordered = moves.to_vec();
    ordered.shuffle(rng);
    ordered.sort_by_key(|&c| std::cmp::Reverse(COLUMN_WEIGHT[c]));
    ordered
}

/// All 4-cell windows on the board: horizontal, vertical, and both
/// diagonals, each evaluated once per direction.
fn windows(cells: &[Option<Piece>; COLS * ROWS]) -> Vec<[Option<Piece>; 4]> {
    let at = |row: usize, col: usize| cells[row * COLS + col];
    let mut out = Vec::with_capacity(ROWS * COLS);
    for row in 0..ROWS {
        for col in 0..=COLS - 4 {
            out.push([at(row, col), at(row, col + 1), at(row, col + 2), at(row, col + 3)]);
        }
    }
    for col in 0..COLS {
        for row in 0..=ROWS - 4 {
            out.push([at(row, col), at(row + 1, col), at(row + 2, col), at(row + 3, col)]);
        }
    }
    for row in 0..=ROWS - 4 {
        for col in 0..=COLS - 4 {
            out.push([at(row, col), at(row + 1, col + 1), at(row + 2, col + 2), at(row + 3, col + 3)]);
        }
    }
    for row in 0..=ROWS - 4 {
        for col in 3..COLS {
            out.push([at(row, col), at(row + 1, col - 1), at(row + 2, col - 2), at(row + 3, col - 3)]);
        }
    }
    out
}

/// Scores a single window from `mover`'s perspective: a line occupied only
/// by `mover` rewards near-completion, a line occupied only by the
/// opponent penalizes it by the same scale (so a 3-in-a-row threat against
/// the mover is visible at the search horizon, not just the mover's own
/// near-wins), and a contested or empty line scores 0.
fn score_window(window: [Option<Piece>; 4], mover: Piece) -> Score {
    let mine = window.iter().filter(|c| **c == Some(mover)).count();
    let theirs = window.iter().filter(|c| **c == Some(mover.other())).count();
    match (mine, theirs) {
        (m, 0) if m > 0 => WINDOW_WEIGHT[m],
        (0, t) if t > 0 => -WINDOW_WEIGHT[t],
        _ => 0,
    }
}

fn heuristic(state: &State, mover: Piece) -> Score {
    let center: Score = state
        .cells
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| cell.map(|p| (i, p)))
        .map(|(i, p)| {
            let col = i % COLS;
            let sign = if p == mover { 1 } else { -1 };
            sign * COLUMN_WEIGHT[col]
        })
        .sum();
    let windows: Score = windows(&state.cells).into_iter().map(|w| score_window(w, mover)).sum();
    center + windows
}

/// Mate-distance-scaled terminal scores so the engine prefers faster wins
/// and slower losses once a forced result is found.
fn terminal_score(status: Status, mover: Piece, depth_remaining: Depth) -> Option<Score> {
    match status {
        Status::InProgress => None,
        Status::Draw | Status::Stalemate => Some(0),
        Status::Won { winner } | Status::Checkmate { winner } => {
            let sign = if winner == mover.seat() { 1 } else { -1 };
            Some(sign * (10_000 + depth_remaining as Score))
        }
    }
}

fn negamax(state: &State, depth: Depth, mut alpha: Score, beta: Score, mover: Piece, rng: &mut SmallRng) -> Score {
    let status = Connect4::status(state);
    if let Some(score) = terminal_score(status, mover, depth) {
        return score;
    }
    if depth == 0 {
        return heuristic(state, mover);
    }
    let moves = order_columns(&Connect4::legal_moves(state), rng);
    let mut best = Score::MIN + 1;
    for col in moves {
        let (next, _) = match Connect4::apply(state, col) {
            Ok(result) => result,
            Err(_) => continue,
        };
        let score = -negamax(&next, depth - 1, -beta, -alpha, mover.other(), rng);
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    best
}

/// Picks the column negamax ranks highest at `CONNECT4_DEFAULT_DEPTH` plies.
/// Ties among equally-scored columns break deterministically per `seed`.
/// Panics only if `state` has no legal move, which the caller (the turn
/// orchestrator's AI cascade) never presents.
pub fn select_move(state: &State, seed: u64) -> usize {
    select_move_at_depth(state, CONNECT4_DEFAULT_DEPTH, seed)
}

pub fn select_move_at_depth(state: &State, depth: Depth, seed: u64) -> usize {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mover = Connect4::turn(state);
    let mover_piece = if mover == 0 { Piece::Red } else { Piece::Blue };
    let moves = order_columns(&Connect4::legal_moves(state), &mut rng);
    let mut best_col = moves[0];
    let mut best_score = Score::MIN + 1;
    for col in moves {
        let (next, _) = match Connect4::apply(state, col) {
            Ok(result) => result,
            Err(_) => continue,
        };
        let score = -negamax(&next, depth - 1, Score::MIN + 1, Score::MAX - 1, mover_piece.other(), &mut rng);
        if score > best_score {
            best_score = score;
            best_col = col;
        }
    }
    best_col
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_rules::connect4::Config;

    #[test]
    fn takes_an_immediate_winning_column() {
        let mut state = Connect4::initial(Config::default());
        for &col in &[0usize, 1, 0, 1, 0, 1] {
            let (next, _) = Connect4::apply(&state, col).unwrap();
            state = next;
        }
        let mv = select_move(&state, 0);
        let (after, status) = Connect4::apply(&state, mv).unwrap();
        let _ = after;
        assert!(matches!(status, Status::Won { winner: 0 }));
    }

    #[test]
    fn blocks_an_immediate_opponent_win() {
        let mut state = Connect4::initial(Config::default());
        for &col in &[0usize, 5, 1, 5, 2] {
            let (next, _) = Connect4::apply(&state, col).unwrap();
            state = next;
        }
        let mv = select_move(&state, 0);
        assert_eq!(mv, 3);
    }

    #[test]
    fn always_returns_a_legal_column() {
        let state = Connect4::initial(Config::default());
        let mv = select_move_at_depth(&state, 2, 0);
        assert!(Connect4::legal_moves(&state).contains(&mv));
    }

    #[test]
    fn different_seeds_still_return_a_legal_column() {
        let state = Connect4::initial(Config::default());
        let mv = select_move_at_depth(&state, 2, 42);
        assert!(Connect4::legal_moves(&state).contains(&mv));
    }
}
