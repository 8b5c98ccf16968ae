//! Closed-form optimal play for Nim (misere) and Wythoff's game.
//!
//! Nim-sum parity and the golden-ratio cold-position test are standard
//! combinatorial game theory (distilled spec §4.4, "closed-form solver, no
//! tree search"); the `any_pile_over_one` misere special case and the
//! Wythoff `Diagonal`-preference-on-cold-position fallback are this
//! platform's own choice among the several equally-optimal replies a closed
//! form admits, recorded as such rather than attributed to any corpus file.
use arena_rules::Rules;
use arena_rules::nim::Move as NimMove;
use arena_rules::nim::Nim;
use arena_rules::nim::State as NimState;
use arena_rules::wythoff::Move as WythoffMove;
use arena_rules::wythoff::State as WythoffState;
use arena_rules::wythoff::Wythoff;

fn nim_sum(piles: &[u32]) -> u32 {
    piles.iter().fold(0, |acc, &p| acc ^ p)
}

/// Optimal misere-Nim move. Standard theory: the misere and normal-play
/// optimal strategies agree as long as at least two piles hold more than one
/// object; the moment a move would leave exactly one such pile, switch to
/// leaving an odd number of piles of size 1 for the opponent instead of
/// zeroing the nim-sum.
pub fn select_nim_move(state: &NimState) -> NimMove {
    let piles = &state.piles;
    let big = piles.iter().filter(|&&p| p > 1).count();

    if big == 0 {
        // Forced endgame: every pile is 0 or 1, so the only legal move takes
        // the whole of some pile of size 1. No strategic choice remains.
        let pile = piles
            .iter()
            .position(|&p| p == 1)
            .expect("a position with no legal move is never handed to a strategy");
        return NimMove { pile, amount: 1 };
    }

    if big == 1 {
        let big_pile = piles.iter().position(|&p| p > 1).unwrap();
        let ones_elsewhere = piles.iter().filter(|&&p| p == 1).count();
        // Leaving the big pile at 1 contributes one more 1-pile than zeroing it.
        let target = if (ones_elsewhere + 1) % 2 == 1 { 1 } else { 0 };
        return NimMove { pile: big_pile, amount: piles[big_pile] - target };
    }

    let sum = nim_sum(piles);
    if sum != 0 {
        for (pile, &size) in piles.iter().enumerate() {
            let target = size ^ sum;
            if target < size {
                return NimMove { pile, amount: size - target };
            }
        }
    }

    // Nim-sum already zero with at least two big piles: already a loss under
    // optimal opponent play. Any move is equally (sub)optimal.
    let (pile, &size) = piles
        .iter()
        .enumerate()
        .max_by_key(|&(_, &p)| p)
        .expect("a position with no legal move is never handed to a strategy");
    NimMove { pile, amount: if size > 0 { 1 } else { 0 } }
}

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// `(a, b)` with `a <= b` is a cold (P-) position iff `floor(phi * (b - a)) == a`.
fn is_cold(a: u32, b: u32) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (GOLDEN_RATIO * (hi - lo) as f64).floor() as u32 == lo
}

/// Optimal Wythoff move: any move landing on a cold position wins; absent
/// one (the mover is already in a cold position and every reply is hot),
/// fall back to emptying the smaller pile.
pub fn select_wythoff_move(state: &WythoffState) -> WythoffMove {
    let (a, b) = (state.a, state.b);
    for amount in 1..=a {
        if is_cold(a - amount, b) {
            return WythoffMove::FromPile { which: 0, amount };
        }
    }
    for amount in 1..=b {
        if is_cold(a, b - amount) {
            return WythoffMove::FromPile { which: 1, amount };
        }
    }
    for amount in 1..=a.min(b) {
        if is_cold(a - amount, b - amount) {
            return WythoffMove::Diagonal { amount };
        }
    }
    if a <= b {
        WythoffMove::FromPile { which: 0, amount: a.max(1) }
    } else {
        WythoffMove::FromPile { which: 1, amount: b.max(1) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_rules::nim::Config as NimConfig;
    use arena_rules::wythoff::Config as WythoffConfig;

    #[test]
    fn nim_move_is_always_legal() {
        let state = Nim::initial(NimConfig::default());
        let mv = select_nim_move(&state);
        assert!(Nim::legal_moves(&state).contains(&mv));
    }

    #[test]
    fn nim_leaves_an_odd_number_of_ones_at_the_endgame_transition() {
        // One pile still >1, one pile already at 1: the critical move that
        // decides the misere endgame.
        let state = NimState { piles: vec![5, 1, 0], turn: 0, status: arena_rules::Status::InProgress };
        let mv = select_nim_move(&state);
        let (next, _) = Nim::apply(&state, mv).unwrap();
        assert_eq!(next.piles.iter().filter(|&&p| p == 1).count() % 2, 1);
    }

    #[test]
    fn wythoff_move_is_always_legal_at_a_cold_position() {
        let state = Wythoff::initial(WythoffConfig { a: 3, b: 5 });
        let mv = select_wythoff_move(&state);
        assert!(Wythoff::legal_moves(&state).contains(&mv));
    }

    #[test]
    fn wythoff_moves_to_a_cold_position_when_one_is_reachable() {
        // (1, 1) is hot: the diagonal move to (0, 0), the coldest position,
        // is available and must be taken.
        let state = WythoffState { a: 1, b: 1, turn: 0, status: arena_rules::Status::InProgress };
        let mv = select_wythoff_move(&state);
        let (next, _) = Wythoff::apply(&state, mv).unwrap();
        assert!(is_cold(next.a, next.b));
    }
}
