//! Depth-bounded alpha-beta search for Chess.
//!
//! Move ordering (MVV-LVA) and piece-square evaluation are grounded on
//! `other_examples/96f48fb3_VenturaBleak-ChessAIWebApp__engine-svc-engines-ab_engine_rust-src-main.rs.rs`
//! (`mvv_lva`, the `PST_*`/`pst_for`/`pst_index_for` scaffold), trimmed to a
//! single fixed-depth search: no quiescence, no aspiration windows, no late
//! move reductions (distilled spec §4.3 calls for plain depth-bounded search
//! with simple move ordering, not a tournament engine). `Square::new_unchecked`
//! and `Board::piece_at` are grounded on
//! `other_examples/82bb9beb_kraktus-helpmate-tb__lib-src-generation.rs.rs`,
//! the one example in the pack that exercises shakmaty's own square/board API.
use arena_core::CHESS_DEFAULT_DEPTH;
use arena_core::Depth;
use arena_core::Score;
use arena_rules::Rules;
use arena_rules::Status;
use arena_rules::chess::Chess;
use arena_rules::chess::Promotion;
use arena_rules::chess::State;
use arena_rules::chess::UciMove;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use shakmaty::Chess as Board;
use shakmaty::Color;
use shakmaty::Role;
use shakmaty::Square;
use shakmaty::fen::Fen;

fn piece_value(role: Role) -> Score {
    match role {
        Role::Pawn => 100,
        Role::Knight => 320,
        Role::Bishop => 330,
        Role::Rook => 500,
        Role::Queen => 900,
        Role::King => 0,
    }
}

#[rustfmt::skip]
const PST_PAWN: [Score; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];
#[rustfmt::skip]
const PST_KNIGHT: [Score; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];
#[rustfmt::skip]
const PST_BISHOP: [Score; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];
#[rustfmt::skip]
const PST_ROOK: [Score; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];
#[rustfmt::skip]
const PST_QUEEN: [Score; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];
#[rustfmt::skip]
const PST_KING: [Score; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

/// `PST_*` is written rank-8-first (standard chart order); `square` is
/// rank-1-first (shakmaty/UCI's a1=0 convention), so the row needs
/// flipping to index into it. Black reads the same White-POV table
/// mirrored back, i.e. without the flip (`idx ^ 56` relative to White's).
fn pst_index(square: usize, color: Color) -> usize {
    let file = square % 8;
    let rank = square / 8;
    let white_idx = (7 - rank) * 8 + file;
    match color {
        Color::White => white_idx,
        Color::Black => white_idx ^ 56,
    }
}

fn pst_value(role: Role, square: usize, color: Color) -> Score {
    let idx = pst_index(square, color);
    match role {
        Role::Pawn => PST_PAWN[idx],
        Role::Knight => PST_KNIGHT[idx],
        Role::Bishop => PST_BISHOP[idx],
        Role::Rook => PST_ROOK[idx],
        Role::Queen => PST_QUEEN[idx],
        Role::King => PST_KING[idx],
    }
}

/// Material + piece-square balance from White's perspective, in centipawns.
fn material(board: &Board) -> Score {
    use shakmaty::Position as _;
    board
        .board()
        .pieces()
        .map(|(square, piece)| {
            let value = piece_value(piece.role) + pst_value(piece.role, square as usize, piece.color);
            if piece.color == Color::White { value } else { -value }
        })
        .sum()
}

fn parse_board(fen: &str) -> Option<Board> {
    let setup: Fen = fen.parse().ok()?;
    setup.into_position(shakmaty::CastlingMode::Chess960).ok()
}

fn evaluate(fen: &str, mover_is_white: bool) -> Score {
    let score = parse_board(fen).map(|board| material(&board)).unwrap_or(0);
    if mover_is_white { score } else { -score }
}

fn promotion_value(promotion: Option<Promotion>) -> Score {
    match promotion {
        Some(Promotion::Queen) => 900,
        Some(_) => 300,
        None => 0,
    }
}

/// MVV-LVA: `victim value * 10 - attacker value`, plus a flat bonus for
/// promotions. Squares are looked up on `board` (the position the move is
/// about to be played from), not re-derived from the bare UCI string.
fn mvv_lva(board: &Board, mv: &UciMove) -> Score {
    let from = unsafe { Square::new_unchecked(mv.from as u32) };
    let to = unsafe { Square::new_unchecked(mv.to as u32) };
    let capture_score = match (board.board().piece_at(to), board.board().piece_at(from)) {
        (Some(victim), Some(attacker)) => piece_value(victim.role) * 10 - piece_value(attacker.role),
        _ => 0,
    };
    capture_score + promotion_value(mv.promotion)
}

/// Captures-first ordering (MVV-LVA) with a seeded shuffle pre-pass so
/// moves tied on score still break deterministically per seed rather than
/// always falling back to list order.
fn ordered_moves(board: &Board, moves: &[UciMove], rng: &mut SmallRng) -> Vec<UciMove> {
    let mut ordered = moves.to_vec();
    ordered.shuffle(rng);
    ordered.sort_by_key(|mv| std::cmp::Reverse(mvv_lva(board, mv)));
    ordered
}

fn terminal_score(status: Status, mover_is_white: bool, depth_remaining: Depth) -> Option<Score> {
    match status {
        Status::InProgress => None,
        Status::Draw | Status::Stalemate => Some(0),
        Status::Checkmate { winner } | Status::Won { winner } => {
            let winner_is_white = winner == 0;
            let sign = if winner_is_white == mover_is_white { 1 } else { -1 };
            Some(sign * (100_000 + depth_remaining as Score))
        }
    }
}

fn search(state: &State, depth: Depth, mut alpha: Score, beta: Score, mover_is_white: bool, rng: &mut SmallRng) -> Score {
    let status = Chess::status(state);
    if let Some(score) = terminal_score(status, mover_is_white, depth) {
        return score;
    }
    if depth == 0 {
        return evaluate(&state.fen, mover_is_white);
    }
    let Some(board) = parse_board(&state.fen) else {
        return evaluate(&state.fen, mover_is_white);
    };
    let moves = ordered_moves(&board, &Chess::legal_moves(state), rng);
    let mut best = Score::MIN + 1;
    for mv in moves {
        let (next, _) = match Chess::apply(state, mv) {
            Ok(result) => result,
            Err(_) => continue,
        };
        let score = -search(&next, depth - 1, -beta, -alpha, !mover_is_white, rng);
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    best
}

/// Picks the move alpha-beta ranks highest at [`CHESS_DEFAULT_DEPTH`] plies.
/// Ties among equally-scored moves break deterministically per `seed`.
/// Panics only if `state` has no legal move, which the turn orchestrator's
/// AI cascade never presents (it only calls a strategy while in progress).
pub fn select_move(state: &State, seed: u64) -> UciMove {
    select_move_at_depth(state, CHESS_DEFAULT_DEPTH, seed)
}

pub fn select_move_at_depth(state: &State, depth: Depth, seed: u64) -> UciMove {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mover_is_white = Chess::turn(state) == 0;
    let board = parse_board(&state.fen).expect("a reachable game state always has a valid FEN");
    let moves = ordered_moves(&board, &Chess::legal_moves(state), &mut rng);
    let mut best_move = moves[0];
    let mut best_score = Score::MIN + 1;
    for mv in moves {
        let (next, _) = match Chess::apply(state, mv) {
            Ok(result) => result,
            Err(_) => continue,
        };
        let score = -search(&next, depth.saturating_sub(1), Score::MIN + 1, Score::MAX - 1, !mover_is_white, &mut rng);
        if score > best_score {
            best_score = score;
            best_move = mv;
        }
    }
    best_move
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_rules::chess::Config;

    fn uci(s: &str) -> UciMove {
        UciMove::from_uci(s).unwrap()
    }

    #[test]
    fn finds_fools_mate_in_one() {
        let config = Config { chess960: false, start_fen: None, seed: 0 };
        let mut state = Chess::initial(config);
        for mv in ["f2f3", "e7e5", "g2g4"] {
            let (next, _) = Chess::apply(&state, uci(mv)).unwrap();
            state = next;
        }
        let mv = select_move_at_depth(&state, 2, 0);
        assert_eq!(mv, uci("d8h4"));
        let (_, status) = Chess::apply(&state, mv).unwrap();
        assert!(matches!(status, Status::Checkmate { winner: 1 }));
    }

    #[test]
    fn always_returns_a_legal_move_from_the_start_position() {
        let config = Config { chess960: false, start_fen: None, seed: 0 };
        let state = Chess::initial(config);
        let mv = select_move_at_depth(&state, 1, 7);
        assert!(Chess::legal_moves(&state).contains(&mv));
    }

    #[test]
    fn a_capture_outranks_a_quiet_move() {
        // White queen can take a hanging black knight on d5, or push a pawn instead.
        let board = parse_board("rnbqkbnr/ppp2ppp/8/3np3/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1").unwrap();
        let capture = uci("d1d5");
        let quiet = uci("a2a3");
        assert!(mvv_lva(&board, &capture) > mvv_lva(&board, &quiet));
    }

    #[test]
    fn the_pawn_pst_rewards_advancing_toward_promotion() {
        let d2 = 1 * 8 + 3; // rank 2, file d
        let d6 = 5 * 8 + 3; // rank 6, file d
        assert!(pst_value(shakmaty::Role::Pawn, d6, Color::White) > pst_value(shakmaty::Role::Pawn, d2, Color::White));
    }
}
