//! Bijective action<->index codecs for the games whose move space is small
//! enough to enumerate directly, following the same to-index/from-index
//! shape `azul.rs` uses for its (much larger) action space. Grounded on the
//! teacher's `crates/gameplay/src/action.rs` / `edge.rs` bijective-`u8`
//! idiom (distilled spec §8, "action_to_index . index_to_action = identity").
use arena_rules::chess::Promotion;
use arena_rules::chess::UciMove;
use arena_rules::nim::Move as NimMove;
use arena_rules::santorini::Move as SantoriniMove;
use arena_rules::wythoff::Move as WythoffMove;

/// Tic-Tac-Toe: the move itself is already a flat cell index 0..9.
pub mod tictactoe {
    pub const ACTION_SIZE: usize = 9;
    pub fn action_to_index(mv: usize) -> usize {
        mv
    }
    pub fn index_to_action(index: usize) -> Option<usize> {
        (index < ACTION_SIZE).then_some(index)
    }
}

/// Connect-4: the move is already a flat column index 0..7.
pub mod connect4 {
    pub const ACTION_SIZE: usize = arena_rules::connect4::COLS;
    pub fn action_to_index(mv: usize) -> usize {
        mv
    }
    pub fn index_to_action(index: usize) -> Option<usize> {
        (index < ACTION_SIZE).then_some(index)
    }
}

/// Chess: `from_square * 64 * 5 + to_square * 5 + promotion_code`, with
/// `promotion_code` 0 meaning no promotion and 1..4 the four promotable
/// pieces in [`Promotion`]'s declared order.
pub mod chess {
    use super::Promotion;
    use super::UciMove;

    pub const ACTION_SIZE: usize = 64 * 64 * 5;

    fn promotion_code(p: Option<Promotion>) -> usize {
        match p {
            None => 0,
            Some(Promotion::Knight) => 1,
            Some(Promotion::Bishop) => 2,
            Some(Promotion::Rook) => 3,
            Some(Promotion::Queen) => 4,
        }
    }
    fn code_promotion(code: usize) -> Option<Promotion> {
        match code {
            1 => Some(Promotion::Knight),
            2 => Some(Promotion::Bishop),
            3 => Some(Promotion::Rook),
            4 => Some(Promotion::Queen),
            _ => None,
        }
    }

    pub fn action_to_index(mv: UciMove) -> usize {
        (mv.from as usize * 64 + mv.to as usize) * 5 + promotion_code(mv.promotion)
    }
    pub fn index_to_action(index: usize) -> Option<UciMove> {
        if index >= ACTION_SIZE {
            return None;
        }
        let code = index % 5;
        let rest = index / 5;
        let to = rest % 64;
        let from = rest / 64;
        Some(UciMove {
            from: from as u8,
            to: to as u8,
            promotion: code_promotion(code),
        })
    }
}

/// Nim: piles are capped at [`MAX_PILE`] for the purposes of this flat
/// encoding only; `legal_moves` itself is unbounded in pile size.
pub mod nim {
    use super::NimMove;

    pub const MAX_PILES: usize = 16;
    pub const MAX_PILE: usize = 64;
    pub const ACTION_SIZE: usize = MAX_PILES * MAX_PILE;

    pub fn action_to_index(mv: NimMove) -> Option<usize> {
        if mv.pile >= MAX_PILES || mv.amount == 0 || mv.amount as usize > MAX_PILE {
            return None;
        }
        Some(mv.pile * MAX_PILE + (mv.amount as usize - 1))
    }
    pub fn index_to_action(index: usize) -> Option<NimMove> {
        if index >= ACTION_SIZE {
            return None;
        }
        Some(NimMove {
            pile: index / MAX_PILE,
            amount: (index % MAX_PILE) as u32 + 1,
        })
    }
}

/// Wythoff: pile amounts capped at [`MAX_AMOUNT`] for this flat encoding.
pub mod wythoff {
    use super::WythoffMove;

    pub const MAX_AMOUNT: usize = 128;
    pub const ACTION_SIZE: usize = 2 * MAX_AMOUNT + MAX_AMOUNT;

    pub fn action_to_index(mv: WythoffMove) -> Option<usize> {
        match mv {
            WythoffMove::FromPile { which, amount } => {
                let amount = amount as usize;
                if which > 1 || amount == 0 || amount > MAX_AMOUNT {
                    return None;
                }
                Some(which as usize * MAX_AMOUNT + (amount - 1))
            }
            WythoffMove::Diagonal { amount } => {
                let amount = amount as usize;
                if amount == 0 || amount > MAX_AMOUNT {
                    return None;
                }
                Some(2 * MAX_AMOUNT + (amount - 1))
            }
        }
    }
    pub fn index_to_action(index: usize) -> Option<WythoffMove> {
        if index >= ACTION_SIZE {
            return None;
        }
        if index < 2 * MAX_AMOUNT {
            Some(WythoffMove::FromPile {
                which: (index / MAX_AMOUNT) as u8,
                amount: (index % MAX_AMOUNT) as u32 + 1,
            })
        } else {
            Some(WythoffMove::Diagonal {
                amount: (index - 2 * MAX_AMOUNT) as u32 + 1,
            })
        }
    }
}

/// Santorini: the first 25 indices are placements; the rest address
/// `(worker, to, build)` triples over the 5x5 board.
pub mod santorini {
    use super::SantoriniMove;

    pub const CELLS: usize = 25;
    pub const ACTION_SIZE: usize = CELLS + CELLS * CELLS * CELLS;

    pub fn action_to_index(mv: SantoriniMove) -> Option<usize> {
        match mv {
            SantoriniMove::Place { at } => (at < CELLS).then_some(at),
            SantoriniMove::Build { worker, to, build } => {
                if worker >= CELLS || to >= CELLS || build >= CELLS {
                    return None;
                }
                Some(CELLS + (worker * CELLS + to) * CELLS + build)
            }
        }
    }
    pub fn index_to_action(index: usize) -> Option<SantoriniMove> {
        if index >= ACTION_SIZE {
            return None;
        }
        if index < CELLS {
            return Some(SantoriniMove::Place { at: index });
        }
        let rest = index - CELLS;
        let build = rest % CELLS;
        let rest = rest / CELLS;
        let to = rest % CELLS;
        let worker = rest / CELLS;
        Some(SantoriniMove::Build { worker, to, build })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tictactoe_roundtrips() {
        for cell in 0..tictactoe::ACTION_SIZE {
            assert_eq!(tictactoe::index_to_action(cell), Some(cell));
        }
    }

    #[test]
    fn connect4_roundtrips() {
        for col in 0..connect4::ACTION_SIZE {
            assert_eq!(connect4::index_to_action(col), Some(col));
        }
    }

    #[test]
    fn chess_action_index_roundtrips() {
        for mv in [
            UciMove { from: 12, to: 28, promotion: None },
            UciMove { from: 52, to: 60, promotion: Some(Promotion::Queen) },
            UciMove { from: 6, to: 23, promotion: Some(Promotion::Knight) },
        ] {
            let idx = chess::action_to_index(mv);
            assert_eq!(chess::index_to_action(idx), Some(mv));
        }
    }

    #[test]
    fn nim_roundtrips_in_range() {
        let mv = NimMove { pile: 3, amount: 5 };
        let idx = nim::action_to_index(mv).unwrap();
        assert_eq!(nim::index_to_action(idx), Some(mv));
    }

    #[test]
    fn nim_rejects_piles_outside_the_flat_encoding_bound() {
        let mv = NimMove { pile: 999, amount: 1 };
        assert_eq!(nim::action_to_index(mv), None);
    }

    #[test]
    fn wythoff_roundtrips_both_variants() {
        for mv in [
            WythoffMove::FromPile { which: 0, amount: 7 },
            WythoffMove::FromPile { which: 1, amount: 2 },
            WythoffMove::Diagonal { amount: 4 },
        ] {
            let idx = wythoff::action_to_index(mv).unwrap();
            assert_eq!(wythoff::index_to_action(idx), Some(mv));
        }
    }

    #[test]
    fn santorini_roundtrips_both_variants() {
        for mv in [
            SantoriniMove::Place { at: 12 },
            SantoriniMove::Build { worker: 0, to: 5, build: 6 },
        ] {
            let idx = santorini::action_to_index(mv).unwrap();
            assert_eq!(santorini::index_to_action(idx), Some(mv));
        }
    }
}
